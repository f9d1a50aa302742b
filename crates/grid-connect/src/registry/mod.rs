//! Grid-connection application registry: storage seams, provisioning, and detail assembly.

pub mod crud;
pub mod detail;
pub mod domain;
mod mapping;
pub mod memory;
pub mod provisioning;
pub mod router;
pub mod service;
pub mod signature;
pub mod storage;
pub mod validation;

#[cfg(test)]
mod tests;

pub use crud::{Addresses, Applications, Crud, Installers, Persons, RegistryError, Resource};
pub use detail::{ApplicationDetail, DetailAssembler, DetailError, PartyDetail};
pub use domain::{
    Address, AddressFields, AddressId, Application, ApplicationFields, ApplicationForm,
    ApplicationId, AttachmentChecklist, Deleted, Installer, InstallerFields, InstallerId,
    OrganizationType, Person, PersonFields, PersonId, SystemType,
};
pub use memory::{MemoryInstallerTable, MemoryTable};
pub use provisioning::{ProvisioningError, ProvisioningStep, ProvisioningWorkflow};
pub use router::registry_router;
pub use service::RegistryService;
pub use signature::{decode_for_storage, encode_for_display, SignatureError, StoredSignature};
pub use storage::{
    AddressColumns, ApplicationColumns, FoundOrCreated, InstallerColumns, InstallerTable,
    PersonColumns, RegistryStores, Row, StoreError, Table,
};
pub use validation::FormErrors;
