use std::sync::Arc;

use crate::config::ProvisioningConfig;

use super::crud::{Addresses, Applications, Crud, Installers, Persons};
use super::detail::DetailAssembler;
use super::provisioning::ProvisioningWorkflow;
use super::storage::RegistryStores;

/// Everything the HTTP layer calls into, built over one set of stores.
pub struct RegistryService {
    pub addresses: Arc<Crud<Addresses>>,
    pub persons: Arc<Crud<Persons>>,
    pub installers: Arc<Crud<Installers>>,
    pub applications: Arc<Crud<Applications>>,
    pub provisioning: ProvisioningWorkflow,
    pub detail: DetailAssembler,
}

impl RegistryService {
    pub fn new(stores: RegistryStores, config: ProvisioningConfig) -> Self {
        Self {
            addresses: Arc::new(Crud::new(stores.addresses.clone())),
            persons: Arc::new(Crud::new(stores.persons.clone())),
            installers: Arc::new(Crud::new(stores.installers.clone())),
            applications: Arc::new(Crud::new(stores.applications.clone())),
            provisioning: ProvisioningWorkflow::new(stores.clone(), config),
            detail: DetailAssembler::new(stores),
        }
    }
}
