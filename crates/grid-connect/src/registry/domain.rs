use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::signature::StoredSignature;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Identifier of a postal address row.
    AddressId
);
record_id!(
    /// Identifier of a subscriber or operator row.
    PersonId
);
record_id!(
    /// Identifier of an installer row.
    InstallerId
);
record_id!(
    /// Identifier of a grid-connection application row.
    ApplicationId
);

/// Legal form of a subscriber or operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationType {
    #[default]
    Company,
    #[serde(alias = "private person")]
    PrivatePerson,
}

/// Kind of change the application registers at the grid connection point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemType {
    #[default]
    #[serde(alias = "New construction")]
    NewConstruction,
    Extension,
    Dismantling,
}

/// Postal address as submitted by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressFields {
    pub street: String,
    pub house_number: String,
    pub post_code: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    #[serde(flatten)]
    pub fields: AddressFields,
}

/// Subscriber or operator. The role is decided by which application column points at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonFields {
    pub organization_type: OrganizationType,
    pub legal_name: String,
    #[serde(default)]
    pub telephone: Option<String>,
    pub email: String,
    pub address_id: AddressId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    #[serde(flatten)]
    pub fields: PersonFields,
}

/// Certified installer, identified by its registration number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallerFields {
    pub company: String,
    pub registration_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installer {
    pub id: InstallerId,
    #[serde(flatten)]
    pub fields: InstallerFields,
}

/// Compliance documents declared alongside an application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentChecklist {
    pub application_grid_connection_attached: bool,
    pub site_plan_attached: bool,
    pub generating_data_sheet_attached: bool,
    pub unit_certificates_available: bool,
    pub na_certificate_attached: bool,
    pub power_flow_monitoring_certificate_attached: bool,
    pub overview_system_diagram_attached: bool,
}

/// Replaceable application fields. `signature` takes every shape clients have been seen to send;
/// any other shape is refused when written.
///
/// Signatures are kept as bytes, so reading fields back yields a `data:image/png` URI whatever
/// image subtype was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationFields {
    pub plant_address_id: AddressId,
    pub system_type: SystemType,
    pub commissioning_date: NaiveDate,
    pub subscriber_id: PersonId,
    pub operator_id: PersonId,
    pub installer_id: InstallerId,
    #[serde(flatten)]
    pub attachments: AttachmentChecklist,
    #[serde(default)]
    pub signature: StoredSignature,
    pub signature_place: String,
}

/// Application as presented to clients. `signature` is a PNG data-URI, or empty when none is on file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub plant_address_id: AddressId,
    pub system_type: SystemType,
    pub commissioning_date: NaiveDate,
    pub subscriber_id: PersonId,
    pub operator_id: PersonId,
    pub installer_id: InstallerId,
    #[serde(flatten)]
    pub attachments: AttachmentChecklist,
    pub signature: String,
    pub signature_place: String,
    pub created_at: DateTime<Utc>,
}

/// Response body for every delete operation, whether or not the row existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    pub deleted: bool,
}

impl Deleted {
    pub const fn confirmed() -> Self {
        Self { deleted: true }
    }
}

/// Flat submission payload captured by the registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationForm {
    pub street: String,
    pub house_number: String,
    pub post_code: String,
    pub city: String,

    #[serde(default)]
    pub sub_organization_type: OrganizationType,
    pub sub_legal_name: String,
    #[serde(default)]
    pub sub_telephone: Option<String>,
    pub sub_email: String,
    #[serde(default)]
    pub sub_address_same_as_plant: bool,
    #[serde(default)]
    pub sub_street: String,
    #[serde(default)]
    pub sub_house_number: String,
    #[serde(default)]
    pub sub_post_code: String,
    #[serde(default)]
    pub sub_city: String,

    #[serde(default)]
    pub same_as_subscriber: bool,
    #[serde(default)]
    pub op_organization_type: OrganizationType,
    #[serde(default)]
    pub op_legal_name: String,
    #[serde(default)]
    pub op_telephone: Option<String>,
    #[serde(default)]
    pub op_email: String,
    #[serde(default)]
    pub op_address_same_as_plant: bool,
    #[serde(default)]
    pub op_street: String,
    #[serde(default)]
    pub op_house_number: String,
    #[serde(default)]
    pub op_post_code: String,
    #[serde(default)]
    pub op_city: String,

    pub installer_company: String,
    #[serde(alias = "installerRegNumber")]
    pub installer_registration_number: String,

    pub system_type: SystemType,
    pub commissioning_date: NaiveDate,

    #[serde(flatten)]
    pub attachments: AttachmentChecklist,

    pub signature: String,
    pub signature_place: String,
}

impl ApplicationForm {
    pub fn plant_address(&self) -> AddressFields {
        AddressFields {
            street: self.street.clone(),
            house_number: self.house_number.clone(),
            post_code: self.post_code.clone(),
            city: self.city.clone(),
        }
    }

    pub fn subscriber_address(&self) -> AddressFields {
        AddressFields {
            street: self.sub_street.clone(),
            house_number: self.sub_house_number.clone(),
            post_code: self.sub_post_code.clone(),
            city: self.sub_city.clone(),
        }
    }

    pub fn operator_address(&self) -> AddressFields {
        AddressFields {
            street: self.op_street.clone(),
            house_number: self.op_house_number.clone(),
            post_code: self.op_post_code.clone(),
            city: self.op_city.clone(),
        }
    }

    pub fn subscriber(&self, address_id: AddressId) -> PersonFields {
        PersonFields {
            organization_type: self.sub_organization_type,
            legal_name: self.sub_legal_name.clone(),
            telephone: non_blank(&self.sub_telephone),
            email: self.sub_email.clone(),
            address_id,
        }
    }

    pub fn operator(&self, address_id: AddressId) -> PersonFields {
        PersonFields {
            organization_type: self.op_organization_type,
            legal_name: self.op_legal_name.clone(),
            telephone: non_blank(&self.op_telephone),
            email: self.op_email.clone(),
            address_id,
        }
    }
}

// The form sends an empty string for a skipped telephone field.
fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
