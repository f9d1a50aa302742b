//! Conversion between the data-URI a signature pad produces and the bytes kept at rest.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const DATA_URI_SCHEME: &str = "data:image/";
const BASE64_MARKER: &str = ";base64,";
const DISPLAY_PREFIX: &str = "data:image/png;base64,";
const BUFFER_KIND: &str = "Buffer";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("invalid signature format: expected data:image/<subtype>;base64,<payload>")]
    InvalidFormat,
    #[error("invalid signature format: payload is not base64 ({0})")]
    InvalidPayload(#[from] base64::DecodeError),
}

/// Every shape a signature has been observed in before it reaches storage or display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum StoredSignature {
    /// Raw image bytes.
    Binary(Vec<u8>),
    /// `{ "type": "Buffer", "data": [..] }` envelope left behind by some serializers.
    WrappedArray { kind: String, data: Vec<u8> },
    /// A string presumed to be a data-URI; checked when encoded or decoded.
    DataUri(String),
    /// Any other non-null shape. Displays as empty but is refused on the way into storage.
    Malformed(Value),
    #[default]
    Empty,
}

impl StoredSignature {
    /// Normalise to the binary column value. `Empty` maps to no signature.
    pub fn into_storage(self) -> Result<Option<Vec<u8>>, SignatureError> {
        match self {
            StoredSignature::Binary(bytes) | StoredSignature::WrappedArray { data: bytes, .. } => {
                Ok(Some(bytes).filter(|bytes| !bytes.is_empty()))
            }
            StoredSignature::DataUri(uri) => decode_for_storage(&uri).map(Some),
            StoredSignature::Malformed(_) => Err(SignatureError::InvalidFormat),
            StoredSignature::Empty => Ok(None),
        }
    }
}

impl From<Option<Vec<u8>>> for StoredSignature {
    fn from(value: Option<Vec<u8>>) -> Self {
        match value {
            Some(bytes) => StoredSignature::Binary(bytes),
            None => StoredSignature::Empty,
        }
    }
}

impl From<Value> for StoredSignature {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) if text.is_empty() => StoredSignature::Empty,
            Value::String(text) => StoredSignature::DataUri(text),
            Value::Null => StoredSignature::Empty,
            Value::Array(items) => match byte_array(&items) {
                Some(bytes) => StoredSignature::Binary(bytes),
                None => StoredSignature::Malformed(Value::Array(items)),
            },
            Value::Object(envelope) => match wrapped_array(&envelope) {
                Some(wrapped) => wrapped,
                None => StoredSignature::Malformed(Value::Object(envelope)),
            },
            other @ (Value::Bool(_) | Value::Number(_)) => StoredSignature::Malformed(other),
        }
    }
}

impl From<StoredSignature> for Value {
    fn from(value: StoredSignature) -> Self {
        match value {
            StoredSignature::Binary(bytes) => Value::from(bytes),
            StoredSignature::WrappedArray { kind, data } => {
                let mut envelope = Map::new();
                envelope.insert("type".to_string(), Value::String(kind));
                envelope.insert("data".to_string(), Value::from(data));
                Value::Object(envelope)
            }
            StoredSignature::DataUri(uri) => Value::String(uri),
            StoredSignature::Malformed(value) => value,
            StoredSignature::Empty => Value::Null,
        }
    }
}

fn byte_array(items: &[Value]) -> Option<Vec<u8>> {
    items
        .iter()
        .map(|item| item.as_u64().and_then(|byte| u8::try_from(byte).ok()))
        .collect()
}

fn wrapped_array(envelope: &Map<String, Value>) -> Option<StoredSignature> {
    let data = byte_array(envelope.get("data")?.as_array()?)?;
    let kind = envelope
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or(BUFFER_KIND)
        .to_string();
    Some(StoredSignature::WrappedArray { kind, data })
}

/// Split `data:image/<subtype>;base64,<payload>` and return the payload.
fn data_uri_payload(input: &str) -> Option<&str> {
    let rest = input.strip_prefix(DATA_URI_SCHEME)?;
    let (subtype, payload) = rest.split_once(BASE64_MARKER)?;
    let valid_subtype = !subtype.is_empty()
        && subtype
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
    valid_subtype.then_some(payload)
}

/// Strip the data-URI prefix and decode the base64 payload into image bytes.
pub fn decode_for_storage(input: &str) -> Result<Vec<u8>, SignatureError> {
    let payload = data_uri_payload(input).ok_or(SignatureError::InvalidFormat)?;
    Ok(STANDARD.decode(payload)?)
}

/// Render any stored shape as a displayable data-URI.
///
/// Binary and wrapped payloads become `data:image/png;base64,...`; a string that already is a
/// well-formed image data-URI passes through. Anything else yields an empty string, which
/// callers treat as "no signature on file".
pub fn encode_for_display(stored: &StoredSignature) -> String {
    match stored {
        StoredSignature::Binary(bytes) | StoredSignature::WrappedArray { data: bytes, .. }
            if !bytes.is_empty() =>
        {
            format!("{DISPLAY_PREFIX}{}", STANDARD.encode(bytes))
        }
        StoredSignature::DataUri(uri) if data_uri_payload(uri).is_some() => uri.clone(),
        StoredSignature::Binary(_)
        | StoredSignature::WrappedArray { .. }
        | StoredSignature::DataUri(_)
        | StoredSignature::Malformed(_)
        | StoredSignature::Empty => String::new(),
    }
}
