use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use models::customer::WriteOutcome;
use service::{customer_service, errors::ServiceError};

use crate::errors::ApiError;
use crate::routes::ServerState;

/// Create body. Every field is optional; absent fields are stored as NULL
/// and unknown keys are ignored.
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateCustomerInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
}

/// Patch body: the explicit allow-list of mutable fields. Keys outside it
/// are ignored rather than applied blindly.
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateCustomerInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
}

#[utoipa::path(
    get, path = "/customers", tag = "customers",
    responses(
        (status = 200, description = "All customers, ordered by id")
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<models::customer::Model>>, ApiError> {
    match customer_service::list_customers(&state.db).await {
        Ok(list) => {
            info!(count = list.len(), "list customers");
            Ok(Json(list))
        }
        Err(e) => {
            error!(err = %e, "list customers failed");
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

#[utoipa::path(
    post, path = "/customers", tag = "customers",
    request_body = crate::openapi::CreateCustomerInputDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 422, description = "Email already belongs to another customer")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<CreateCustomerInput>,
) -> Result<(StatusCode, Json<models::customer::Model>), ApiError> {
    match customer_service::create_customer(&state.db, input.name, input.email, input.age).await {
        Ok(WriteOutcome::Written(m)) => {
            info!(id = m.id, "created customer");
            Ok((StatusCode::CREATED, Json(m)))
        }
        Ok(WriteOutcome::EmailTaken) => Err(ApiError::Conflict("Email must be unique")),
        Err(e) => {
            error!(err = %e, "create customer failed");
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

#[utoipa::path(
    patch, path = "/customers/{id}", tag = "customers",
    params(("id" = i32, Path, description = "Customer ID")),
    request_body = crate::openapi::UpdateCustomerInputDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Email already belongs to another customer")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateCustomerInput>,
) -> Result<Json<models::customer::Model>, ApiError> {
    match customer_service::patch_customer(&state.db, id, input.name, input.email, input.age).await {
        Ok(WriteOutcome::Written(m)) => {
            info!(id = m.id, "updated customer");
            Ok(Json(m))
        }
        Ok(WriteOutcome::EmailTaken) => Err(ApiError::Conflict("Email already in use")),
        Err(ServiceError::NotFound(_)) => Err(ApiError::NotFound),
        Err(e) => {
            error!(err = %e, "update customer failed");
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

#[utoipa::path(
    delete, path = "/customers/{id}", tag = "customers",
    params(("id" = i32, Path, description = "Customer ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<StatusCode, ApiError> {
    match customer_service::delete_customer(&state.db, id).await {
        Ok(true) => {
            info!(id, "deleted customer");
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(false) => Err(ApiError::NotFound),
        Err(e) => {
            error!(err = %e, "delete customer failed");
            Err(ApiError::Internal(e.to_string()))
        }
    }
}
