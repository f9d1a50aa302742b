use chrono::{Duration, Local};
use clap::Args;
use grid_connect::config::ProvisioningConfig;
use grid_connect::error::AppError;
use grid_connect::registry::{
    ApplicationDetail, ApplicationForm, AttachmentChecklist, OrganizationType, RegistryService,
    RegistryStores, SystemType,
};

// 1x1 transparent PNG.
const SAMPLE_SIGNATURE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Let the subscriber double as the plant operator.
    #[arg(long)]
    pub(crate) same_as_subscriber: bool,
    /// Register the subscriber at the plant address.
    #[arg(long)]
    pub(crate) sub_address_same_as_plant: bool,
    /// Installer registration number used for deduplication.
    #[arg(long, default_value = "INST-2024-0815")]
    pub(crate) registration_number: String,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = RegistryService::new(RegistryStores::in_memory(), ProvisioningConfig::default());
    let detail = provision_sample(&service, &args).await?;

    let plant = detail
        .plant_address
        .as_ref()
        .map(|address| {
            let fields = &address.fields;
            format!(
                "{} {}, {} {}",
                fields.street, fields.house_number, fields.post_code, fields.city
            )
        })
        .unwrap_or_else(|| "-".to_string());

    println!("Grid connection registry demo");
    println!("Application #{} for {plant}", detail.application.id);
    println!("{}", serde_json::to_string_pretty(&detail)?);
    Ok(())
}

async fn provision_sample(
    service: &RegistryService,
    args: &DemoArgs,
) -> Result<ApplicationDetail, AppError> {
    let application = service.provisioning.submit(sample_form(args)).await?;
    Ok(service.detail.assemble(application.id).await?)
}

fn sample_form(args: &DemoArgs) -> ApplicationForm {
    ApplicationForm {
        street: "Sonnenallee".to_string(),
        house_number: "42".to_string(),
        post_code: "12045".to_string(),
        city: "Berlin".to_string(),
        sub_organization_type: OrganizationType::PrivatePerson,
        sub_legal_name: "Erika Mustermann".to_string(),
        sub_telephone: Some("+49 30 1234567".to_string()),
        sub_email: "erika@example.org".to_string(),
        sub_address_same_as_plant: args.sub_address_same_as_plant,
        sub_street: "Karl-Marx-Straße".to_string(),
        sub_house_number: "7".to_string(),
        sub_post_code: "12043".to_string(),
        sub_city: "Berlin".to_string(),
        same_as_subscriber: args.same_as_subscriber,
        op_organization_type: OrganizationType::Company,
        op_legal_name: "Bürgerenergie Neukölln eG".to_string(),
        op_telephone: None,
        op_email: "betrieb@buergerenergie.example".to_string(),
        op_address_same_as_plant: false,
        op_street: "Hermannstraße".to_string(),
        op_house_number: "101".to_string(),
        op_post_code: "12051".to_string(),
        op_city: "Berlin".to_string(),
        installer_company: "Solarteure Berlin GmbH".to_string(),
        installer_registration_number: args.registration_number.clone(),
        system_type: SystemType::NewConstruction,
        commissioning_date: Local::now().date_naive() + Duration::days(30),
        attachments: AttachmentChecklist {
            application_grid_connection_attached: true,
            site_plan_attached: true,
            generating_data_sheet_attached: true,
            ..AttachmentChecklist::default()
        },
        signature: SAMPLE_SIGNATURE.to_string(),
        signature_place: "Berlin".to_string(),
    }
}
