use super::common::*;
use crate::registry::detail::DetailError;
use crate::registry::domain::ApplicationId;
use crate::registry::storage::{RegistryStores, StoreError};
use std::sync::Arc;

#[tokio::test]
async fn assembles_every_section_of_a_provisioned_application() {
    let stores = RegistryStores::in_memory();
    let application = workflow(&stores).submit(form()).await.expect("provisions");

    let detail = assembler(&stores)
        .assemble(application.id)
        .await
        .expect("detail assembles");

    assert_eq!(detail.application, application);
    assert_eq!(
        detail.plant_address.expect("plant address").fields.street,
        "Solarweg"
    );

    let subscriber = detail.subscriber.expect("subscriber");
    assert_eq!(subscriber.person.fields.legal_name, "Sonnenhof GmbH");
    assert_eq!(
        subscriber.address.expect("subscriber address").fields.street,
        "Marienplatz"
    );

    let operator = detail.operator.expect("operator");
    assert_eq!(operator.person.fields.legal_name, "Max Huber");
    assert_eq!(
        operator.address.expect("operator address").fields.street,
        "Leopoldstraße"
    );

    let installer = detail.installer.expect("installer");
    assert_eq!(installer.fields.registration_number, "R-42");
    assert_eq!(detail.application.signature, PIXEL);
}

#[tokio::test]
async fn deleted_operator_degrades_to_null() {
    let stores = RegistryStores::in_memory();
    let application = workflow(&stores).submit(form()).await.expect("provisions");
    stores
        .persons
        .delete(application.operator_id.0)
        .await
        .expect("delete");

    let detail = assembler(&stores)
        .assemble(application.id)
        .await
        .expect("detail assembles");

    assert!(detail.operator.is_none());
    assert!(detail.subscriber.is_some());
    assert!(detail.plant_address.is_some());
    assert!(detail.installer.is_some());
    assert_eq!(detail.application.operator_id, application.operator_id);
}

#[tokio::test]
async fn shared_plant_address_missing_blanks_every_section_using_it() {
    let stores = RegistryStores::in_memory();
    let application = workflow(&stores)
        .submit(collapsed_form())
        .await
        .expect("provisions");
    stores
        .addresses
        .delete(application.plant_address_id.0)
        .await
        .expect("delete");

    let detail = assembler(&stores)
        .assemble(application.id)
        .await
        .expect("detail assembles");

    assert!(detail.plant_address.is_none());
    let subscriber = detail.subscriber.expect("subscriber");
    let operator = detail.operator.expect("operator");
    assert!(subscriber.address.is_none());
    assert_eq!(subscriber.person, operator.person);
}

#[tokio::test]
async fn missing_application_is_not_found() {
    let stores = RegistryStores::in_memory();

    match assembler(&stores).assemble(ApplicationId(404)).await {
        Err(DetailError::NotFound(ApplicationId(404))) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn store_failures_on_references_propagate() {
    let stores = RegistryStores::in_memory();
    let application = workflow(&stores).submit(form()).await.expect("provisions");
    let degraded = RegistryStores {
        persons: Arc::new(UnavailableTable),
        ..stores
    };

    match assembler(&degraded).assemble(application.id).await {
        Err(DetailError::Storage(StoreError::Unavailable(_))) => {}
        other => panic!("expected storage error, got {other:?}"),
    }
}

#[tokio::test]
async fn detail_serializes_camel_case_with_nested_parties() {
    let stores = RegistryStores::in_memory();
    let application = workflow(&stores)
        .submit(collapsed_form())
        .await
        .expect("provisions");

    let detail = assembler(&stores)
        .assemble(application.id)
        .await
        .expect("detail assembles");
    let value = serde_json::to_value(&detail).expect("serializes");

    assert_eq!(value["id"], application.id.0);
    assert_eq!(value["systemType"], "new_construction");
    assert_eq!(value["commissioningDate"], "2025-07-01");
    assert_eq!(value["plantAddress"]["houseNumber"], "1");
    assert_eq!(value["subscriber"]["person"]["legalName"], "Sonnenhof GmbH");
    assert_eq!(
        value["operator"]["address"]["postCode"],
        value["plantAddress"]["postCode"]
    );
    assert_eq!(value["installer"]["registrationNumber"], "R-42");
    assert_eq!(value["overviewSystemDiagramAttached"], true);
}
