use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{OrganizationType, SystemType};
use super::memory::{MemoryInstallerTable, MemoryTable};

/// A persisted row. The store assigns `id` and `created_at`; updates replace `columns` only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row<C> {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub columns: C,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressColumns {
    pub street: String,
    pub house_number: String,
    pub post_code: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonColumns {
    pub organization_type: OrganizationType,
    pub legal_name: String,
    pub telephone: Option<String>,
    pub email: String,
    pub address_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallerColumns {
    pub company: String,
    pub registration_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationColumns {
    pub plant_address_id: i64,
    pub system_type: SystemType,
    pub commissioning_date: NaiveDate,
    pub subscriber_id: i64,
    pub operator_id: i64,
    pub installer_id: i64,
    pub application_grid_connection_attached: bool,
    pub site_plan_attached: bool,
    pub generating_data_sheet_attached: bool,
    pub unit_certificates_available: bool,
    pub na_certificate_attached: bool,
    pub power_flow_monitoring_certificate_attached: bool,
    pub overview_system_diagram_attached: bool,
    pub signature: Option<Vec<u8>>,
    pub signature_place: String,
}

/// Point-access table abstraction so the registry can be exercised without a database.
///
/// No referential checks happen here: callers make sure referenced ids exist.
#[async_trait]
pub trait Table<C>: Send + Sync
where
    C: Clone + Send + Sync + 'static,
{
    /// All rows in ascending id order.
    async fn list(&self) -> Result<Vec<Row<C>>, StoreError>;
    async fn get(&self, id: i64) -> Result<Option<Row<C>>, StoreError>;
    async fn insert(&self, columns: C) -> Result<Row<C>, StoreError>;
    /// Replace the columns of an existing row; `None` when no row matches.
    async fn update(&self, id: i64, columns: C) -> Result<Option<Row<C>>, StoreError>;
    /// Remove a row. Succeeds whether or not it existed.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

/// Result of an installer lookup keyed on registration number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundOrCreated {
    pub row: Row<InstallerColumns>,
    pub created: bool,
}

/// Installer table with an atomic find-or-create keyed on registration number.
#[async_trait]
pub trait InstallerTable: Table<InstallerColumns> {
    /// Return the first row (in listing order) carrying `registration_number`, or insert one.
    /// Implementations must not let two concurrent calls insert the same registration number.
    async fn find_or_create(
        &self,
        company: &str,
        registration_number: &str,
    ) -> Result<FoundOrCreated, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("row conflicts with an existing row")]
    Conflict,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Handles to the four tables the registry reads and writes.
#[derive(Clone)]
pub struct RegistryStores {
    pub addresses: Arc<dyn Table<AddressColumns>>,
    pub persons: Arc<dyn Table<PersonColumns>>,
    pub installers: Arc<dyn InstallerTable>,
    pub applications: Arc<dyn Table<ApplicationColumns>>,
}

impl RegistryStores {
    pub fn in_memory() -> Self {
        Self {
            addresses: Arc::new(MemoryTable::<AddressColumns>::default()),
            persons: Arc::new(MemoryTable::<PersonColumns>::default()),
            installers: Arc::new(MemoryInstallerTable::default()),
            applications: Arc::new(MemoryTable::<ApplicationColumns>::default()),
        }
    }
}
