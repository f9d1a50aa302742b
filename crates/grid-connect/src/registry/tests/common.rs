use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::config::ProvisioningConfig;
use crate::registry::domain::{ApplicationForm, AttachmentChecklist, OrganizationType, SystemType};
use crate::registry::memory::{MemoryInstallerTable, MemoryTable};
use crate::registry::provisioning::ProvisioningWorkflow;
use crate::registry::service::RegistryService;
use crate::registry::storage::{
    FoundOrCreated, InstallerColumns, InstallerTable, PersonColumns, RegistryStores, Row,
    StoreError, Table,
};
use crate::registry::{registry_router, DetailAssembler};

/// 1x1 transparent PNG.
pub(super) const PIXEL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

/// Form with every section filled in and no same-as flags set.
pub(super) fn form() -> ApplicationForm {
    ApplicationForm {
        street: "Solarweg".to_string(),
        house_number: "1".to_string(),
        post_code: "80331".to_string(),
        city: "München".to_string(),

        sub_organization_type: OrganizationType::Company,
        sub_legal_name: "Sonnenhof GmbH".to_string(),
        sub_telephone: Some("+49 89 123456".to_string()),
        sub_email: "info@sonnenhof.de".to_string(),
        sub_address_same_as_plant: false,
        sub_street: "Marienplatz".to_string(),
        sub_house_number: "8".to_string(),
        sub_post_code: "80331".to_string(),
        sub_city: "München".to_string(),

        same_as_subscriber: false,
        op_organization_type: OrganizationType::PrivatePerson,
        op_legal_name: "Max Huber".to_string(),
        op_telephone: None,
        op_email: "max.huber@example.org".to_string(),
        op_address_same_as_plant: false,
        op_street: "Leopoldstraße".to_string(),
        op_house_number: "20".to_string(),
        op_post_code: "80802".to_string(),
        op_city: "München".to_string(),

        installer_company: "Acme Solar".to_string(),
        installer_registration_number: "R-42".to_string(),

        system_type: SystemType::NewConstruction,
        commissioning_date: NaiveDate::from_ymd_opt(2025, 7, 1).expect("valid date"),

        attachments: AttachmentChecklist {
            application_grid_connection_attached: true,
            site_plan_attached: true,
            generating_data_sheet_attached: true,
            unit_certificates_available: false,
            na_certificate_attached: true,
            power_flow_monitoring_certificate_attached: false,
            overview_system_diagram_attached: true,
        },

        signature: PIXEL.to_string(),
        signature_place: "München".to_string(),
    }
}

/// Subscriber at the plant, operator aliased to the subscriber.
pub(super) fn collapsed_form() -> ApplicationForm {
    ApplicationForm {
        sub_address_same_as_plant: true,
        sub_street: String::new(),
        sub_house_number: String::new(),
        sub_post_code: String::new(),
        sub_city: String::new(),
        same_as_subscriber: true,
        op_legal_name: String::new(),
        op_email: String::new(),
        op_street: String::new(),
        op_house_number: String::new(),
        op_post_code: String::new(),
        op_city: String::new(),
        ..form()
    }
}

pub(super) fn workflow(stores: &RegistryStores) -> ProvisioningWorkflow {
    ProvisioningWorkflow::new(stores.clone(), ProvisioningConfig::default())
}

pub(super) fn assembler(stores: &RegistryStores) -> DetailAssembler {
    DetailAssembler::new(stores.clone())
}

pub(super) fn service(stores: &RegistryStores) -> RegistryService {
    RegistryService::new(stores.clone(), ProvisioningConfig::default())
}

pub(super) fn router(stores: &RegistryStores) -> axum::Router {
    registry_router(Arc::new(service(stores)))
}

pub(super) fn stores_with_persons(persons: Arc<dyn Table<PersonColumns>>) -> RegistryStores {
    RegistryStores {
        persons,
        ..RegistryStores::in_memory()
    }
}

pub(super) async fn counts(stores: &RegistryStores) -> (usize, usize, usize, usize) {
    (
        stores.addresses.list().await.expect("list").len(),
        stores.persons.list().await.expect("list").len(),
        stores.installers.list().await.expect("list").len(),
        stores.applications.list().await.expect("list").len(),
    )
}

/// Table that accepts reads and deletes but refuses every insert.
pub(super) struct RejectingInserts<C> {
    inner: MemoryTable<C>,
}

impl<C> Default for RejectingInserts<C> {
    fn default() -> Self {
        Self {
            inner: MemoryTable::default(),
        }
    }
}

#[async_trait]
impl<C> Table<C> for RejectingInserts<C>
where
    C: Clone + Send + Sync + 'static,
{
    async fn list(&self) -> Result<Vec<Row<C>>, StoreError> {
        self.inner.list().await
    }

    async fn get(&self, id: i64) -> Result<Option<Row<C>>, StoreError> {
        self.inner.get(id).await
    }

    async fn insert(&self, _columns: C) -> Result<Row<C>, StoreError> {
        Err(StoreError::Conflict)
    }

    async fn update(&self, id: i64, columns: C) -> Result<Option<Row<C>>, StoreError> {
        self.inner.update(id, columns).await
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.inner.delete(id).await
    }
}

/// Table whose backing database is offline.
pub(super) struct UnavailableTable;

fn offline<T>() -> Result<T, StoreError> {
    Err(StoreError::Unavailable("database offline".to_string()))
}

#[async_trait]
impl<C> Table<C> for UnavailableTable
where
    C: Clone + Send + Sync + 'static,
{
    async fn list(&self) -> Result<Vec<Row<C>>, StoreError> {
        offline()
    }

    async fn get(&self, _id: i64) -> Result<Option<Row<C>>, StoreError> {
        offline()
    }

    async fn insert(&self, _columns: C) -> Result<Row<C>, StoreError> {
        offline()
    }

    async fn update(&self, _id: i64, _columns: C) -> Result<Option<Row<C>>, StoreError> {
        offline()
    }

    async fn delete(&self, _id: i64) -> Result<(), StoreError> {
        offline()
    }
}

#[async_trait]
impl InstallerTable for UnavailableTable {
    async fn find_or_create(
        &self,
        _company: &str,
        _registration_number: &str,
    ) -> Result<FoundOrCreated, StoreError> {
        offline()
    }
}

pub(super) fn unavailable_stores() -> RegistryStores {
    RegistryStores {
        addresses: Arc::new(UnavailableTable),
        persons: Arc::new(UnavailableTable),
        installers: Arc::new(UnavailableTable),
        applications: Arc::new(UnavailableTable),
    }
}

pub(super) fn installer_table() -> Arc<MemoryInstallerTable> {
    Arc::new(MemoryInstallerTable::default())
}

pub(super) fn installer_columns(company: &str, registration_number: &str) -> InstallerColumns {
    InstallerColumns {
        company: company.to_string(),
        registration_number: registration_number.to_string(),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
