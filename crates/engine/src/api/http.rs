//! HTTP routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use ambassador_domain::{GrantRecord, Member, RoleId, ServerContext, ServerId, UserId};
use ambassador_shared::{
    CheckPermissionRequest, ErrorCode, ErrorResponse, GrantInfo, ModifyPermissionRequest,
    PermissionInfo,
};

use crate::app::App;
use crate::use_cases::PermissionError;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/permissions", get(list_permissions))
        .route(
            "/api/servers/{server_id}/users/{user_id}/permissions",
            get(list_user_grants),
        )
        .route(
            "/api/servers/{server_id}/users/{user_id}/permissions/{name}/grant",
            post(grant_user),
        )
        .route(
            "/api/servers/{server_id}/users/{user_id}/permissions/{name}/revoke",
            post(revoke_user),
        )
        .route("/api/roles/{role_id}/permissions", get(list_role_grants))
        .route(
            "/api/roles/{role_id}/permissions/{name}/grant",
            post(grant_role),
        )
        .route(
            "/api/roles/{role_id}/permissions/{name}/revoke",
            post(revoke_role),
        )
        .route(
            "/api/servers/{server_id}/permissions/check",
            post(check_permission),
        )
}

async fn health() -> &'static str {
    "OK"
}

async fn list_permissions(State(app): State<Arc<App>>) -> Json<Vec<PermissionInfo>> {
    Json(app.catalog.iter().map(PermissionInfo::from).collect())
}

// =============================================================================
// Grant / revoke
// =============================================================================

async fn grant_user(
    State(app): State<Arc<App>>,
    Path((server_id, user_id, name)): Path<(u64, u64, String)>,
    body: Result<Json<ModifyPermissionRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(body) = body?;
    let permission = app.permission(&name)?;
    app.use_cases
        .permissions
        .grant
        .to_user(
            ServerId::new(server_id),
            UserId::new(user_id),
            permission,
            body.target,
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn revoke_user(
    State(app): State<Arc<App>>,
    Path((server_id, user_id, name)): Path<(u64, u64, String)>,
    body: Result<Json<ModifyPermissionRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(body) = body?;
    let permission = app.permission(&name)?;
    app.use_cases
        .permissions
        .revoke
        .from_user(
            ServerId::new(server_id),
            UserId::new(user_id),
            permission,
            body.target,
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn grant_role(
    State(app): State<Arc<App>>,
    Path((role_id, name)): Path<(u64, String)>,
    body: Result<Json<ModifyPermissionRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(body) = body?;
    let permission = app.permission(&name)?;
    app.use_cases
        .permissions
        .grant
        .to_role(RoleId::new(role_id), permission, body.target)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn revoke_role(
    State(app): State<Arc<App>>,
    Path((role_id, name)): Path<(u64, String)>,
    body: Result<Json<ModifyPermissionRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(body) = body?;
    let permission = app.permission(&name)?;
    app.use_cases
        .permissions
        .revoke
        .from_role(RoleId::new(role_id), permission, body.target)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Listing
// =============================================================================

async fn list_user_grants(
    State(app): State<Arc<App>>,
    Path((server_id, user_id)): Path<(u64, u64)>,
) -> Result<Json<Vec<GrantInfo>>, ApiError> {
    let records = app
        .use_cases
        .permissions
        .list
        .for_user(ServerId::new(server_id), UserId::new(user_id))
        .await?;
    Ok(Json(describe_grants(&app, &records)))
}

async fn list_role_grants(
    State(app): State<Arc<App>>,
    Path(role_id): Path<u64>,
) -> Result<Json<Vec<GrantInfo>>, ApiError> {
    let records = app
        .use_cases
        .permissions
        .list
        .for_role(RoleId::new(role_id))
        .await?;
    Ok(Json(describe_grants(&app, &records)))
}

fn describe_grants(app: &App, records: &[GrantRecord]) -> Vec<GrantInfo> {
    records
        .iter()
        .map(|record| GrantInfo::from_record(record, app.catalog.get(record.permission)))
        .collect()
}

// =============================================================================
// Check
// =============================================================================

async fn check_permission(
    State(app): State<Arc<App>>,
    Path(server_id): Path<u64>,
    body: Result<Json<CheckPermissionRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(body) = body?;
    let permission = app.permission(&body.permission)?;
    let server = ServerContext::new(ServerId::new(server_id), UserId::new(body.owner_id));
    let member = Member::new(
        UserId::new(body.user_id),
        body.role_ids.into_iter().map(RoleId::new).collect(),
    );
    let check = &app.use_cases.permissions.check;

    match body.entity_owner_id {
        Some(owner) => {
            check
                .for_entity(&server, &member, UserId::new(owner), permission, body.target)
                .await?
        }
        None => check.execute(&server, &member, permission, body.target).await?,
    }

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Forbidden(String),
    NotFound(String),
    Conflict(ErrorCode, String),
    Internal(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(ErrorCode::BadRequest, msg),
            ),
            ApiError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                ErrorResponse::new(ErrorCode::PermissionDenied, msg),
            ),
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new(ErrorCode::UnknownPermission, msg),
            ),
            ApiError::Conflict(code, msg) => (StatusCode::CONFLICT, ErrorResponse::new(code, msg)),
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(ErrorCode::InternalError, "Internal error"),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PermissionError> for ApiError {
    fn from(e: PermissionError) -> Self {
        let message = e.to_string();
        match e {
            PermissionError::AlreadyGranted(_) => {
                ApiError::Conflict(ErrorCode::AlreadyGranted, message)
            }
            PermissionError::AlreadyRevoked(_) => {
                ApiError::Conflict(ErrorCode::AlreadyRevoked, message)
            }
            PermissionError::PermissionDenied => ApiError::Forbidden(message),
            PermissionError::UnknownPermission(_) => ApiError::NotFound(message),
            PermissionError::Repo(_) => ApiError::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryGrantRepo;
    use ambassador_domain::PermissionCatalog;
    use axum::{
        body::Body,
        http::{header, Request},
        response::Response,
    };
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    fn router() -> Router {
        let app = App::new(
            PermissionCatalog::builtin(),
            Arc::new(InMemoryGrantRepo::new()),
            3,
        );
        routes().with_state(Arc::new(app))
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&body).expect("json body")
    }

    fn check_body(user_id: u64, role_ids: &[u64], permission: &str, target: &str) -> serde_json::Value {
        serde_json::json!({
            "owner_id": 1,
            "user_id": user_id,
            "role_ids": role_ids,
            "permission": permission,
            "target": target,
        })
    }

    #[tokio::test]
    async fn health_responds_ok() {
        let response = router()
            .oneshot(get_request("/api/health"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn lists_the_builtin_catalog() {
        let response = router()
            .oneshot(get_request("/api/permissions"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let permissions: Vec<PermissionInfo> = read_json(response).await;
        assert_eq!(permissions.len(), 10);
        let create = permissions
            .iter()
            .find(|p| p.name == "CreateCharacter")
            .expect("CreateCharacter listed");
        assert!(create.granted_to_self_by_default);
        assert!(!create.granted_to_others_by_default);
    }

    #[tokio::test]
    async fn granting_twice_conflicts() {
        let app = router();
        let uri = "/api/servers/100/users/5/permissions/EditDossier/grant";

        let first = app
            .clone()
            .oneshot(post_json(uri, serde_json::json!({ "target": "self" })))
            .await
            .expect("response");
        assert_eq!(first.status(), StatusCode::NO_CONTENT);

        let second = app
            .oneshot(post_json(uri, serde_json::json!({ "target": "self" })))
            .await
            .expect("response");
        assert_eq!(second.status(), StatusCode::CONFLICT);

        let error: ErrorResponse = read_json(second).await;
        assert_eq!(error.code, ErrorCode::AlreadyGranted);
        assert_eq!(error.message, "The user already has permission to do that.");
    }

    #[tokio::test]
    async fn unknown_permission_is_not_found() {
        let response = router()
            .oneshot(post_json(
                "/api/roles/7/permissions/Fly/grant",
                serde_json::json!({ "target": "all" }),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ErrorResponse = read_json(response).await;
        assert_eq!(error.code, ErrorCode::UnknownPermission);
    }

    #[tokio::test]
    async fn invalid_target_is_rejected() {
        let response = router()
            .oneshot(post_json(
                "/api/roles/7/permissions/Transform/grant",
                serde_json::json!({ "target": "everyone" }),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = read_json(response).await;
        assert_eq!(error.code, ErrorCode::BadRequest);
        assert!(error.message.contains("everyone"), "message: {}", error.message);
    }

    #[tokio::test]
    async fn malformed_check_body_is_a_json_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/servers/100/permissions/check")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"user_id\": 5"))
            .expect("request");

        let response = router().oneshot(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = read_json(response).await;
        assert_eq!(error.code, ErrorCode::BadRequest);
    }

    #[tokio::test]
    async fn targets_are_accepted_in_any_case() {
        let response = router()
            .oneshot(post_json(
                "/api/roles/7/permissions/Transform/grant",
                serde_json::json!({ "target": "Other" }),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn role_grant_flows_into_checks() {
        let app = router();
        let check_uri = "/api/servers/100/permissions/check";

        let denied = app
            .clone()
            .oneshot(post_json(check_uri, check_body(5, &[7], "EditDossier", "other")))
            .await
            .expect("response");
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);
        let error: ErrorResponse = read_json(denied).await;
        assert_eq!(error.code, ErrorCode::PermissionDenied);

        let granted = app
            .clone()
            .oneshot(post_json(
                "/api/roles/7/permissions/editdossier/grant",
                serde_json::json!({ "target": "all" }),
            ))
            .await
            .expect("response");
        assert_eq!(granted.status(), StatusCode::NO_CONTENT);

        let allowed = app
            .oneshot(post_json(check_uri, check_body(5, &[7], "EditDossier", "all")))
            .await
            .expect("response");
        assert_eq!(allowed.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn owner_and_entity_owner_pass_checks() {
        let app = router();
        let uri = "/api/servers/100/permissions/check";

        let owner = app
            .clone()
            .oneshot(post_json(uri, check_body(1, &[], "EditDossier", "all")))
            .await
            .expect("response");
        assert_eq!(owner.status(), StatusCode::NO_CONTENT);

        let mut body = check_body(5, &[], "EditCharacter", "other");
        body["entity_owner_id"] = serde_json::json!(5);
        let entity_owner = app.oneshot(post_json(uri, body)).await.expect("response");
        assert_eq!(entity_owner.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn revoked_user_grants_are_listed_with_names() {
        let app = router();

        let revoked = app
            .clone()
            .oneshot(post_json(
                "/api/servers/100/users/5/permissions/CreateCharacter/revoke",
                serde_json::json!({ "target": "self" }),
            ))
            .await
            .expect("response");
        assert_eq!(revoked.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(get_request("/api/servers/100/users/5/permissions"))
            .await
            .expect("response");
        let grants: Vec<GrantInfo> = read_json(response).await;

        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].permission_name.as_deref(), Some("CreateCharacter"));
        assert!(!grants[0].is_granted);
    }
}
