//! Renaming between the camelCase wire structs and the snake_case storage columns.

use super::domain::{
    Address, AddressFields, AddressId, Application, ApplicationFields, ApplicationId,
    AttachmentChecklist, Installer, InstallerFields, InstallerId, Person, PersonFields, PersonId,
};
use super::signature::{encode_for_display, SignatureError, StoredSignature};
use super::storage::{AddressColumns, ApplicationColumns, InstallerColumns, PersonColumns, Row};

impl From<AddressFields> for AddressColumns {
    fn from(fields: AddressFields) -> Self {
        Self {
            street: fields.street,
            house_number: fields.house_number,
            post_code: fields.post_code,
            city: fields.city,
        }
    }
}

impl From<AddressColumns> for AddressFields {
    fn from(columns: AddressColumns) -> Self {
        Self {
            street: columns.street,
            house_number: columns.house_number,
            post_code: columns.post_code,
            city: columns.city,
        }
    }
}

impl From<Row<AddressColumns>> for Address {
    fn from(row: Row<AddressColumns>) -> Self {
        Self {
            id: AddressId(row.id),
            fields: row.columns.into(),
        }
    }
}

impl From<PersonFields> for PersonColumns {
    fn from(fields: PersonFields) -> Self {
        Self {
            organization_type: fields.organization_type,
            legal_name: fields.legal_name,
            telephone: fields.telephone,
            email: fields.email,
            address_id: fields.address_id.0,
        }
    }
}

impl From<PersonColumns> for PersonFields {
    fn from(columns: PersonColumns) -> Self {
        Self {
            organization_type: columns.organization_type,
            legal_name: columns.legal_name,
            telephone: columns.telephone,
            email: columns.email,
            address_id: AddressId(columns.address_id),
        }
    }
}

impl From<Row<PersonColumns>> for Person {
    fn from(row: Row<PersonColumns>) -> Self {
        Self {
            id: PersonId(row.id),
            fields: row.columns.into(),
        }
    }
}

impl From<InstallerFields> for InstallerColumns {
    fn from(fields: InstallerFields) -> Self {
        Self {
            company: fields.company,
            registration_number: fields.registration_number,
        }
    }
}

impl From<InstallerColumns> for InstallerFields {
    fn from(columns: InstallerColumns) -> Self {
        Self {
            company: columns.company,
            registration_number: columns.registration_number,
        }
    }
}

impl From<Row<InstallerColumns>> for Installer {
    fn from(row: Row<InstallerColumns>) -> Self {
        Self {
            id: InstallerId(row.id),
            fields: row.columns.into(),
        }
    }
}

impl TryFrom<ApplicationFields> for ApplicationColumns {
    type Error = SignatureError;

    fn try_from(fields: ApplicationFields) -> Result<Self, Self::Error> {
        let AttachmentChecklist {
            application_grid_connection_attached,
            site_plan_attached,
            generating_data_sheet_attached,
            unit_certificates_available,
            na_certificate_attached,
            power_flow_monitoring_certificate_attached,
            overview_system_diagram_attached,
        } = fields.attachments;

        Ok(Self {
            plant_address_id: fields.plant_address_id.0,
            system_type: fields.system_type,
            commissioning_date: fields.commissioning_date,
            subscriber_id: fields.subscriber_id.0,
            operator_id: fields.operator_id.0,
            installer_id: fields.installer_id.0,
            application_grid_connection_attached,
            site_plan_attached,
            generating_data_sheet_attached,
            unit_certificates_available,
            na_certificate_attached,
            power_flow_monitoring_certificate_attached,
            overview_system_diagram_attached,
            signature: fields.signature.into_storage()?,
            signature_place: fields.signature_place,
        })
    }
}

impl ApplicationColumns {
    pub fn attachments(&self) -> AttachmentChecklist {
        AttachmentChecklist {
            application_grid_connection_attached: self.application_grid_connection_attached,
            site_plan_attached: self.site_plan_attached,
            generating_data_sheet_attached: self.generating_data_sheet_attached,
            unit_certificates_available: self.unit_certificates_available,
            na_certificate_attached: self.na_certificate_attached,
            power_flow_monitoring_certificate_attached: self
                .power_flow_monitoring_certificate_attached,
            overview_system_diagram_attached: self.overview_system_diagram_attached,
        }
    }

    /// The stored signature rendered as a data-URI; empty when none is on file.
    pub fn display_signature(&self) -> String {
        encode_for_display(&StoredSignature::from(self.signature.clone()))
    }
}

impl From<ApplicationColumns> for ApplicationFields {
    fn from(columns: ApplicationColumns) -> Self {
        let signature = match columns.display_signature() {
            uri if uri.is_empty() => StoredSignature::Empty,
            uri => StoredSignature::DataUri(uri),
        };

        Self {
            plant_address_id: AddressId(columns.plant_address_id),
            system_type: columns.system_type,
            commissioning_date: columns.commissioning_date,
            subscriber_id: PersonId(columns.subscriber_id),
            operator_id: PersonId(columns.operator_id),
            installer_id: InstallerId(columns.installer_id),
            attachments: columns.attachments(),
            signature,
            signature_place: columns.signature_place,
        }
    }
}

impl From<Row<ApplicationColumns>> for Application {
    fn from(row: Row<ApplicationColumns>) -> Self {
        let signature = row.columns.display_signature();
        let attachments = row.columns.attachments();
        let columns = row.columns;

        Self {
            id: ApplicationId(row.id),
            plant_address_id: AddressId(columns.plant_address_id),
            system_type: columns.system_type,
            commissioning_date: columns.commissioning_date,
            subscriber_id: PersonId(columns.subscriber_id),
            operator_id: PersonId(columns.operator_id),
            installer_id: InstallerId(columns.installer_id),
            attachments,
            signature,
            signature_place: columns.signature_place,
            created_at: row.created_at,
        }
    }
}
