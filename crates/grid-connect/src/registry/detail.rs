use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{Address, AddressId, Application, ApplicationId, Installer, Person, PersonId};
use super::storage::{RegistryStores, StoreError};

/// A subscriber or operator together with its address, when that still resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyDetail {
    pub person: Person,
    pub address: Option<Address>,
}

/// Denormalized view of one application. Sections whose reference no longer resolves are `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDetail {
    #[serde(flatten)]
    pub application: Application,
    pub plant_address: Option<Address>,
    pub subscriber: Option<PartyDetail>,
    pub operator: Option<PartyDetail>,
    pub installer: Option<Installer>,
}

#[derive(Debug, thiserror::Error)]
pub enum DetailError {
    #[error("application {0} not found")]
    NotFound(ApplicationId),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Rebuilds an application's relational picture from independent point lookups.
pub struct DetailAssembler {
    stores: RegistryStores,
}

impl DetailAssembler {
    pub fn new(stores: RegistryStores) -> Self {
        Self { stores }
    }

    pub async fn assemble(&self, id: ApplicationId) -> Result<ApplicationDetail, DetailError> {
        let application: Application = self
            .stores
            .applications
            .get(id.0)
            .await?
            .ok_or(DetailError::NotFound(id))?
            .into();

        let plant_address = self.address(application.plant_address_id).await?;

        let (subscriber, operator, installer) = tokio::try_join!(
            self.person(application.subscriber_id),
            self.person(application.operator_id),
            self.installer(&application),
        )?;

        let (subscriber, operator) =
            tokio::try_join!(self.party(subscriber), self.party(operator))?;

        debug!(
            application_id = %id,
            plant_address = plant_address.is_some(),
            subscriber = subscriber.is_some(),
            operator = operator.is_some(),
            installer = installer.is_some(),
            "application detail assembled"
        );

        Ok(ApplicationDetail {
            application,
            plant_address,
            subscriber,
            operator,
            installer,
        })
    }

    async fn address(&self, id: AddressId) -> Result<Option<Address>, StoreError> {
        Ok(self.stores.addresses.get(id.0).await?.map(Address::from))
    }

    async fn person(&self, id: PersonId) -> Result<Option<Person>, StoreError> {
        Ok(self.stores.persons.get(id.0).await?.map(Person::from))
    }

    async fn installer(&self, application: &Application) -> Result<Option<Installer>, StoreError> {
        let row = self.stores.installers.get(application.installer_id.0).await?;
        Ok(row.map(Installer::from))
    }

    async fn party(&self, person: Option<Person>) -> Result<Option<PartyDetail>, StoreError> {
        let Some(person) = person else {
            return Ok(None);
        };
        let address = self.address(person.fields.address_id).await?;
        Ok(Some(PartyDetail { person, address }))
    }
}
