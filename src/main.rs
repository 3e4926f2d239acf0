use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use billing_grpc::GrpcBillingClient;
use patient_core::{
    InMemoryPatientRepository, PatientError, PatientRequest, PatientResponse, PatientService,
};

/// Application state shared across REST API handlers
#[derive(Clone)]
struct AppState {
    patient_service: PatientService,
}

/// Health check response body
#[derive(serde::Serialize, ToSchema)]
struct HealthRes {
    ok: bool,
    message: String,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Patient API",
        version = "1.0",
        description = "API documentation for the patient lifecycle service"
    ),
    paths(health, list_patients, create_patient, update_patient, delete_patient),
    components(schemas(HealthRes, PatientRequest, PatientResponse))
)]
struct ApiDoc;

/// Domain errors rendered as field-keyed JSON payloads.
///
/// The payload comes straight from the core's taxonomy; this wrapper only
/// picks the HTTP status class.
struct ApiError(PatientError);

impl From<PatientError> for ApiError {
    fn from(err: PatientError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            PatientError::PatientNotFound(_) => StatusCode::NOT_FOUND,
            PatientError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PatientError::Validation(_)
            | PatientError::InvalidDateFormat { .. }
            | PatientError::EmailAlreadyExists(_) => StatusCode::BAD_REQUEST,
        };

        if status.is_server_error() {
            tracing::error!("patient operation failed: {}", self.0);
        } else {
            tracing::warn!("patient request rejected: {}", self.0);
        }

        (status, Json(self.0.field_errors())).into_response()
    }
}

/// Main entry point for the patient service
///
/// Starts the REST server and wires the lifecycle service to the in-memory
/// patient store and the gRPC billing client. The billing channel connects
/// lazily, so an unreachable billing service does not block startup.
///
/// # Environment Variables
/// - `PATIENT_REST_ADDR`: REST server address (default: "0.0.0.0:4000")
/// - `BILLING_SERVICE_ADDR`: billing gRPC endpoint (default: "http://localhost:9001")
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("patient_service=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr =
        std::env::var("PATIENT_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:4000".into());
    let billing_addr =
        std::env::var("BILLING_SERVICE_ADDR").unwrap_or_else(|_| "http://localhost:9001".into());

    tracing::info!("++ Starting patient REST on {}", rest_addr);
    tracing::info!("++ Billing provisioning via {}", billing_addr);

    let repository = Arc::new(InMemoryPatientRepository::new());
    let billing = Arc::new(
        GrpcBillingClient::from_addr(&billing_addr)
            .map_err(|err| anyhow::anyhow!("invalid BILLING_SERVICE_ADDR: {err}"))?,
    );
    let patient_service = PatientService::new(repository, billing);

    let app = Router::new()
        .route("/health", get(health))
        .route("/patients", get(list_patients).post(create_patient))
        .route("/patients/:id", put(update_patient).delete(delete_patient))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(AppState { patient_service });

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers
async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "patient service is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/patients",
    responses(
        (status = 200, description = "List of patients", body = [PatientResponse]),
        (status = 500, description = "Patient store unavailable")
    )
)]
/// List all patients in store order
async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<PatientResponse>>, ApiError> {
    let patients = state.patient_service.list_patients().await?;
    Ok(Json(patients))
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = PatientRequest,
    responses(
        (status = 201, description = "Patient created", body = PatientResponse),
        (status = 400, description = "Invalid patient data or duplicate email"),
        (status = 500, description = "Patient store unavailable")
    )
)]
/// Register a new patient and provision its billing account
async fn create_patient(
    State(state): State<AppState>,
    Json(request): Json<PatientRequest>,
) -> Result<(StatusCode, Json<PatientResponse>), ApiError> {
    let created = state.patient_service.create_patient(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    request_body = PatientRequest,
    params(
        ("id" = Uuid, Path, description = "Id of the patient to update")
    ),
    responses(
        (status = 200, description = "Patient updated", body = PatientResponse),
        (status = 400, description = "Invalid patient data or duplicate email"),
        (status = 404, description = "Patient not found"),
        (status = 500, description = "Patient store unavailable")
    )
)]
/// Update an existing patient's details
async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PatientRequest>,
) -> Result<Json<PatientResponse>, ApiError> {
    let updated = state.patient_service.update_patient(id, request).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/patients/{id}",
    params(
        ("id" = Uuid, Path, description = "Id of the patient to delete")
    ),
    responses(
        (status = 204, description = "Patient deleted"),
        (status = 404, description = "Patient not found"),
        (status = 500, description = "Patient store unavailable")
    )
)]
/// Delete a patient by id
async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.patient_service.delete_patient(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
