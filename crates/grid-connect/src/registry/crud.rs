use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::domain::{
    Address, AddressFields, Application, ApplicationFields, Deleted, Installer, InstallerFields,
    Person, PersonFields,
};
use super::signature::SignatureError;
use super::storage::{
    AddressColumns, ApplicationColumns, InstallerColumns, InstallerTable, PersonColumns, Row,
    StoreError, Table,
};

/// Binds a wire representation to the table that stores it.
pub trait Resource: Send + Sync + 'static {
    type Columns: Clone + Send + Sync + 'static;
    type Store: Table<Self::Columns> + ?Sized + 'static;
    type Fields: DeserializeOwned + Send + 'static;
    type View: Serialize + Send + 'static;

    const NAME: &'static str;

    fn to_columns(fields: Self::Fields) -> Result<Self::Columns, RegistryError>;
    fn to_view(row: Row<Self::Columns>) -> Self::View;
}

pub struct Addresses;
pub struct Persons;
pub struct Installers;
pub struct Applications;

impl Resource for Addresses {
    type Columns = AddressColumns;
    type Store = dyn Table<AddressColumns>;
    type Fields = AddressFields;
    type View = Address;

    const NAME: &'static str = "address";

    fn to_columns(fields: AddressFields) -> Result<AddressColumns, RegistryError> {
        Ok(fields.into())
    }

    fn to_view(row: Row<AddressColumns>) -> Address {
        row.into()
    }
}

impl Resource for Persons {
    type Columns = PersonColumns;
    type Store = dyn Table<PersonColumns>;
    type Fields = PersonFields;
    type View = Person;

    const NAME: &'static str = "person";

    fn to_columns(fields: PersonFields) -> Result<PersonColumns, RegistryError> {
        Ok(fields.into())
    }

    fn to_view(row: Row<PersonColumns>) -> Person {
        row.into()
    }
}

impl Resource for Installers {
    type Columns = InstallerColumns;
    type Store = dyn InstallerTable;
    type Fields = InstallerFields;
    type View = Installer;

    const NAME: &'static str = "installer";

    fn to_columns(fields: InstallerFields) -> Result<InstallerColumns, RegistryError> {
        Ok(fields.into())
    }

    fn to_view(row: Row<InstallerColumns>) -> Installer {
        row.into()
    }
}

impl Resource for Applications {
    type Columns = ApplicationColumns;
    type Store = dyn Table<ApplicationColumns>;
    type Fields = ApplicationFields;
    type View = Application;

    const NAME: &'static str = "application";

    fn to_columns(fields: ApplicationFields) -> Result<ApplicationColumns, RegistryError> {
        Ok(fields.try_into()?)
    }

    fn to_view(row: Row<ApplicationColumns>) -> Application {
        row.into()
    }
}

/// Plain create/read/update/delete over one table, translating between wire and storage.
pub struct Crud<R: Resource> {
    store: Arc<R::Store>,
    _resource: PhantomData<R>,
}

impl<R: Resource> Crud<R> {
    pub fn new(store: Arc<R::Store>) -> Self {
        Self {
            store,
            _resource: PhantomData,
        }
    }

    pub async fn list(&self) -> Result<Vec<R::View>, RegistryError> {
        let rows = self.store.list().await?;
        Ok(rows.into_iter().map(R::to_view).collect())
    }

    /// `None` when no row matches.
    pub async fn get(&self, id: i64) -> Result<Option<R::View>, RegistryError> {
        Ok(self.store.get(id).await?.map(R::to_view))
    }

    pub async fn create(&self, fields: R::Fields) -> Result<R::View, RegistryError> {
        let row = self.store.insert(R::to_columns(fields)?).await?;
        tracing::debug!(resource = R::NAME, id = row.id, "row created");
        Ok(R::to_view(row))
    }

    /// `None` when no row matches.
    pub async fn update(
        &self,
        id: i64,
        fields: R::Fields,
    ) -> Result<Option<R::View>, RegistryError> {
        let columns = R::to_columns(fields)?;
        let updated = self.store.update(id, columns).await?;
        if updated.is_none() {
            tracing::debug!(resource = R::NAME, id, "update matched no row");
        }
        Ok(updated.map(R::to_view))
    }

    /// Always confirms, whether or not the row existed.
    pub async fn delete(&self, id: i64) -> Result<Deleted, RegistryError> {
        self.store.delete(id).await?;
        tracing::debug!(resource = R::NAME, id, "row deleted");
        Ok(Deleted::confirmed())
    }
}

/// Error raised by the CRUD operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Signature(#[from] SignatureError),
    #[error(transparent)]
    Storage(#[from] StoreError),
}
