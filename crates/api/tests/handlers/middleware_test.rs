use axum::extract::FromRequestParts;
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;

use bandsync_api::middleware::error_handling::AppError;
use bandsync_api::middleware::identity::{Identity, IDENTITY_HEADER};
use bandsync_core::errors::BandError;

fn status_for(error: BandError) -> StatusCode {
    AppError(error).into_response().status()
}

#[tokio::test]
async fn test_error_status_mapping() {
    assert_eq!(
        status_for(BandError::NotFound("missing".into())),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        status_for(BandError::Validation("bad input".into())),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        status_for(BandError::Authentication("no header".into())),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        status_for(BandError::PermissionDenied("not the owner".into())),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        status_for(BandError::Database(eyre::eyre!("connection refused"))),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn test_error_response_body_is_json() {
    let response = AppError(BandError::NotFound("No band matches this token".into()))
        .into_response();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("No band matches this token"));
}

#[tokio::test]
async fn test_identity_extractor_reads_header() {
    let request = Request::builder()
        .uri("/api/bands")
        .header(IDENTITY_HEADER, "user@example.com")
        .body(())
        .unwrap();
    let (mut parts, _) = request.into_parts();

    let identity = Identity::from_request_parts(&mut parts, &()).await.unwrap();
    assert_eq!(identity.0, "user@example.com");
}

#[tokio::test]
async fn test_identity_extractor_rejects_missing_header() {
    let request = Request::builder().uri("/api/bands").body(()).unwrap();
    let (mut parts, _) = request.into_parts();

    let result = Identity::from_request_parts(&mut parts, &()).await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        BandError::Authentication(_) => {}
        e => panic!("Expected Authentication error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_identity_extractor_rejects_empty_header() {
    let request = Request::builder()
        .uri("/api/bands")
        .header(IDENTITY_HEADER, "")
        .body(())
        .unwrap();
    let (mut parts, _) = request.into_parts();

    let result = Identity::from_request_parts(&mut parts, &()).await;
    assert!(result.is_err());
}
