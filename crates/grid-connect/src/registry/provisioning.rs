//! Turns one submitted form into the address, person, installer, and application rows it implies.

use std::fmt;

use tracing::{debug, info, warn};

use crate::config::ProvisioningConfig;

use super::domain::{AddressFields, AddressId, Application, ApplicationForm, PersonFields, PersonId};
use super::signature::{decode_for_storage, SignatureError};
use super::storage::{AddressColumns, ApplicationColumns, RegistryStores, StoreError};
use super::validation::FormErrors;

/// Store-backed steps of a submission, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningStep {
    PlantAddress,
    SubscriberAddress,
    OperatorAddress,
    Subscriber,
    Operator,
    Installer,
    Application,
}

impl ProvisioningStep {
    pub const fn label(self) -> &'static str {
        match self {
            ProvisioningStep::PlantAddress => "plant_address",
            ProvisioningStep::SubscriberAddress => "subscriber_address",
            ProvisioningStep::OperatorAddress => "operator_address",
            ProvisioningStep::Subscriber => "subscriber",
            ProvisioningStep::Operator => "operator",
            ProvisioningStep::Installer => "installer",
            ProvisioningStep::Application => "application",
        }
    }
}

impl fmt::Display for ProvisioningStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error raised by [`ProvisioningWorkflow::submit`].
#[derive(Debug, thiserror::Error)]
pub enum ProvisioningError {
    #[error("submission failed validation: {0}")]
    Invalid(FormErrors),
    #[error(transparent)]
    Signature(#[from] SignatureError),
    #[error("provisioning failed at step {step}: {source} ({compensated} rows rolled back)")]
    Partial {
        step: ProvisioningStep,
        #[source]
        source: StoreError,
        compensated: usize,
    },
}

struct StepFailure {
    step: ProvisioningStep,
    source: StoreError,
}

trait AtStep<T> {
    fn at(self, step: ProvisioningStep) -> Result<T, StepFailure>;
}

impl<T> AtStep<T> for Result<T, StoreError> {
    fn at(self, step: ProvisioningStep) -> Result<T, StepFailure> {
        self.map_err(|source| StepFailure { step, source })
    }
}

/// Rows created by the current submission that compensation may remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Created {
    Address(i64),
    Person(i64),
}

/// Ordered, saga-style provisioning over the registry stores.
pub struct ProvisioningWorkflow {
    stores: RegistryStores,
    config: ProvisioningConfig,
}

impl ProvisioningWorkflow {
    pub fn new(stores: RegistryStores, config: ProvisioningConfig) -> Self {
        Self { stores, config }
    }

    /// Validate the form, then create or reuse every referenced row and the application itself.
    ///
    /// The signature is decoded before any write, so a malformed one leaves no rows behind.
    /// When a later step fails the address and person rows created so far are deleted again,
    /// unless compensation is disabled. Installer rows are shared and never rolled back.
    pub async fn submit(&self, form: ApplicationForm) -> Result<Application, ProvisioningError> {
        form.validate().map_err(ProvisioningError::Invalid)?;
        let signature = decode_for_storage(&form.signature)?;

        let mut created = Vec::new();
        match self.provision(&form, signature, &mut created).await {
            Ok(application) => {
                info!(
                    application_id = %application.id,
                    subscriber_id = %application.subscriber_id,
                    operator_id = %application.operator_id,
                    installer_id = %application.installer_id,
                    "application provisioned"
                );
                Ok(application)
            }
            Err(StepFailure { step, source }) => {
                warn!(%step, error = %source, rows = created.len(), "provisioning step failed");
                let compensated = if self.config.compensate_on_failure {
                    self.compensate(&created).await
                } else {
                    0
                };
                Err(ProvisioningError::Partial {
                    step,
                    source,
                    compensated,
                })
            }
        }
    }

    async fn provision(
        &self,
        form: &ApplicationForm,
        signature: Vec<u8>,
        created: &mut Vec<Created>,
    ) -> Result<Application, StepFailure> {
        let plant_address_id = self
            .create_address(form.plant_address(), created)
            .await
            .at(ProvisioningStep::PlantAddress)?;

        let subscriber_address_id = if form.sub_address_same_as_plant {
            plant_address_id
        } else {
            self.create_address(form.subscriber_address(), created)
                .await
                .at(ProvisioningStep::SubscriberAddress)?
        };

        // An operator aliased to the subscriber never gets an address of its own.
        let operator_address_id = if form.same_as_subscriber {
            None
        } else if form.op_address_same_as_plant {
            Some(plant_address_id)
        } else {
            let id = self
                .create_address(form.operator_address(), created)
                .await
                .at(ProvisioningStep::OperatorAddress)?;
            Some(id)
        };

        let subscriber_id = self
            .create_person(form.subscriber(subscriber_address_id), created)
            .await
            .at(ProvisioningStep::Subscriber)?;

        let operator_id = match operator_address_id {
            None => subscriber_id,
            Some(address_id) => self
                .create_person(form.operator(address_id), created)
                .await
                .at(ProvisioningStep::Operator)?,
        };

        let installer = self
            .stores
            .installers
            .find_or_create(&form.installer_company, &form.installer_registration_number)
            .await
            .at(ProvisioningStep::Installer)?;
        debug!(
            installer_id = installer.row.id,
            created = installer.created,
            "installer resolved"
        );

        let columns = ApplicationColumns {
            plant_address_id: plant_address_id.0,
            system_type: form.system_type,
            commissioning_date: form.commissioning_date,
            subscriber_id: subscriber_id.0,
            operator_id: operator_id.0,
            installer_id: installer.row.id,
            application_grid_connection_attached: form
                .attachments
                .application_grid_connection_attached,
            site_plan_attached: form.attachments.site_plan_attached,
            generating_data_sheet_attached: form.attachments.generating_data_sheet_attached,
            unit_certificates_available: form.attachments.unit_certificates_available,
            na_certificate_attached: form.attachments.na_certificate_attached,
            power_flow_monitoring_certificate_attached: form
                .attachments
                .power_flow_monitoring_certificate_attached,
            overview_system_diagram_attached: form.attachments.overview_system_diagram_attached,
            signature: Some(signature).filter(|bytes| !bytes.is_empty()),
            signature_place: form.signature_place.clone(),
        };

        let row = self
            .stores
            .applications
            .insert(columns)
            .await
            .at(ProvisioningStep::Application)?;
        Ok(row.into())
    }

    async fn create_address(
        &self,
        fields: AddressFields,
        created: &mut Vec<Created>,
    ) -> Result<AddressId, StoreError> {
        let row = self
            .stores
            .addresses
            .insert(AddressColumns::from(fields))
            .await?;
        created.push(Created::Address(row.id));
        debug!(address_id = row.id, "address created");
        Ok(AddressId(row.id))
    }

    async fn create_person(
        &self,
        fields: PersonFields,
        created: &mut Vec<Created>,
    ) -> Result<PersonId, StoreError> {
        let row = self.stores.persons.insert(fields.into()).await?;
        created.push(Created::Person(row.id));
        debug!(person_id = row.id, "person created");
        Ok(PersonId(row.id))
    }

    /// Delete created rows newest first; returns how many deletes succeeded.
    async fn compensate(&self, created: &[Created]) -> usize {
        let mut removed = 0;
        for row in created.iter().rev() {
            let outcome = match *row {
                Created::Address(id) => self.stores.addresses.delete(id).await,
                Created::Person(id) => self.stores.persons.delete(id).await,
            };
            match outcome {
                Ok(()) => removed += 1,
                Err(err) => warn!(?row, error = %err, "compensating delete failed"),
            }
        }
        removed
    }
}
