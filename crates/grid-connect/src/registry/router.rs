use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{error, warn};

use super::crud::{Crud, RegistryError, Resource};
use super::detail::{ApplicationDetail, DetailError};
use super::domain::{Application, ApplicationForm, ApplicationId, Deleted};
use super::provisioning::ProvisioningError;
use super::service::RegistryService;

/// Router builder exposing CRUD for every table plus submission and detail assembly.
pub fn registry_router(service: Arc<RegistryService>) -> Router {
    Router::new()
        .merge(crud_routes("/api/v1/addresses", service.addresses.clone()))
        .merge(crud_routes("/api/v1/persons", service.persons.clone()))
        .merge(crud_routes("/api/v1/installers", service.installers.clone()))
        .merge(crud_routes("/api/v1/applications", service.applications.clone()))
        .merge(
            Router::new()
                .route("/api/v1/applications/submit", post(submit_handler))
                .route("/api/v1/applications/:id/detail", get(detail_handler))
                .with_state(service),
        )
}

fn crud_routes<R: Resource>(base: &str, crud: Arc<Crud<R>>) -> Router {
    Router::new()
        .route(base, get(list_handler::<R>).post(create_handler::<R>))
        .route(
            &format!("{base}/:id"),
            get(get_handler::<R>)
                .put(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .with_state(crud)
}

pub(crate) async fn list_handler<R: Resource>(
    State(crud): State<Arc<Crud<R>>>,
) -> Result<Json<Vec<R::View>>, RegistryError> {
    Ok(Json(crud.list().await?))
}

pub(crate) async fn get_handler<R: Resource>(
    State(crud): State<Arc<Crud<R>>>,
    Path(id): Path<i64>,
) -> Result<Json<Option<R::View>>, RegistryError> {
    Ok(Json(crud.get(id).await?))
}

pub(crate) async fn create_handler<R: Resource>(
    State(crud): State<Arc<Crud<R>>>,
    Json(fields): Json<R::Fields>,
) -> Result<(StatusCode, Json<R::View>), RegistryError> {
    Ok((StatusCode::CREATED, Json(crud.create(fields).await?)))
}

pub(crate) async fn update_handler<R: Resource>(
    State(crud): State<Arc<Crud<R>>>,
    Path(id): Path<i64>,
    Json(fields): Json<R::Fields>,
) -> Result<Json<Option<R::View>>, RegistryError> {
    Ok(Json(crud.update(id, fields).await?))
}

pub(crate) async fn delete_handler<R: Resource>(
    State(crud): State<Arc<Crud<R>>>,
    Path(id): Path<i64>,
) -> Result<Json<Deleted>, RegistryError> {
    Ok(Json(crud.delete(id).await?))
}

pub(crate) async fn submit_handler(
    State(service): State<Arc<RegistryService>>,
    Json(form): Json<ApplicationForm>,
) -> Result<(StatusCode, Json<Application>), ProvisioningError> {
    let application = service.provisioning.submit(form).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

pub(crate) async fn detail_handler(
    State(service): State<Arc<RegistryService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApplicationDetail>, DetailError> {
    Ok(Json(service.detail.assemble(ApplicationId(id)).await?))
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let status = match self {
            RegistryError::Signature(_) => StatusCode::BAD_REQUEST,
            RegistryError::Storage(_) => {
                error!(error = %self, "registry store call failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl IntoResponse for ProvisioningError {
    fn into_response(self) -> Response {
        match self {
            ProvisioningError::Invalid(errors) => {
                let payload = json!({
                    "error": "submission failed validation",
                    "fields": errors.fields,
                });
                (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
            }
            ProvisioningError::Signature(err) => {
                let payload = json!({ "error": err.to_string() });
                (StatusCode::BAD_REQUEST, Json(payload)).into_response()
            }
            ProvisioningError::Partial {
                step, compensated, ..
            } => {
                error!(error = %self, "application submission failed");
                let payload = json!({
                    "error": self.to_string(),
                    "step": step.label(),
                    "compensated": compensated,
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
            }
        }
    }
}

impl IntoResponse for DetailError {
    fn into_response(self) -> Response {
        let status = match self {
            DetailError::NotFound(_) => {
                warn!(error = %self, "detail requested for unknown application");
                StatusCode::NOT_FOUND
            }
            DetailError::Storage(_) => {
                error!(error = %self, "detail assembly failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
