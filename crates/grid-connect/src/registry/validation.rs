use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::domain::ApplicationForm;

const REQUIRED: &str = "Required";
const TOO_SHORT: &str = "Too short";
const INVALID_EMAIL: &str = "Invalid email";
const SIGNATURE_REQUIRED: &str = "Signature required";
const MIN_POST_CODE_LEN: usize = 4;

/// Field-level problems found in a submitted form, keyed by wire field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    pub fields: BTreeMap<&'static str, &'static str>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn check(&mut self, field: &'static str, problem: Option<&'static str>) {
        if let Some(problem) = problem {
            self.fields.insert(field, problem);
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, problem) in &self.fields {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{field}: {problem}")?;
            first = false;
        }
        Ok(())
    }
}

fn not_blank(value: &str) -> Option<&'static str> {
    value.trim().is_empty().then_some(REQUIRED)
}

fn present(value: &str) -> Option<&'static str> {
    value.is_empty().then_some(REQUIRED)
}

fn post_code(value: &str) -> Option<&'static str> {
    (value.chars().count() < MIN_POST_CODE_LEN).then_some(TOO_SHORT)
}

// Mirrors `^\S+@\S+$`.
fn email(value: &str) -> Option<&'static str> {
    let well_formed = !value.chars().any(char::is_whitespace)
        && value
            .char_indices()
            .any(|(index, ch)| ch == '@' && index > 0 && index + 1 < value.len());
    (!well_formed).then_some(INVALID_EMAIL)
}

impl ApplicationForm {
    /// Check required fields, honouring the same-as flags that make sections optional.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();

        errors.check("street", not_blank(&self.street));
        errors.check("houseNumber", present(&self.house_number));
        errors.check("postCode", post_code(&self.post_code));
        errors.check("city", not_blank(&self.city));

        errors.check("subLegalName", not_blank(&self.sub_legal_name));
        errors.check("subEmail", email(&self.sub_email));
        if !self.sub_address_same_as_plant {
            errors.check("subStreet", not_blank(&self.sub_street));
            errors.check("subHouseNumber", present(&self.sub_house_number));
            errors.check("subPostCode", post_code(&self.sub_post_code));
            errors.check("subCity", not_blank(&self.sub_city));
        }

        if !self.same_as_subscriber {
            errors.check("opLegalName", not_blank(&self.op_legal_name));
            errors.check("opEmail", email(&self.op_email));
            if !self.op_address_same_as_plant {
                errors.check("opStreet", not_blank(&self.op_street));
                errors.check("opHouseNumber", present(&self.op_house_number));
                errors.check("opPostCode", post_code(&self.op_post_code));
                errors.check("opCity", not_blank(&self.op_city));
            }
        }

        errors.check("installerCompany", not_blank(&self.installer_company));
        errors.check(
            "installerRegistrationNumber",
            not_blank(&self.installer_registration_number),
        );

        errors.check("signaturePlace", not_blank(&self.signature_place));
        errors.check(
            "signature",
            self.signature.is_empty().then_some(SIGNATURE_REQUIRED),
        );

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
