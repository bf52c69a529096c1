use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Wire shape of a stored service request; dates are RFC 3339 strings.
#[derive(ToSchema)]
pub struct ServiceRequestDoc {
    pub id: Uuid,
    pub building_code: String,
    pub description: String,
    pub current_status: String,
    pub created_by: String,
    pub created_date: String,
    pub last_modified_by: Option<String>,
    pub last_modified_date: Option<String>,
}

#[derive(ToSchema)]
pub struct ServiceRequestPayloadDoc {
    pub id: Option<Uuid>,
    pub building_code: String,
    pub description: String,
    pub current_status: Option<String>,
    pub created_by: Option<String>,
    pub last_modified_by: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::service_requests::list,
        crate::routes::service_requests::get,
        crate::routes::service_requests::create,
        crate::routes::service_requests::update,
        crate::routes::service_requests::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ServiceRequestDoc,
            ServiceRequestPayloadDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "servicerequest"),
    )
)]
pub struct ApiDoc;
