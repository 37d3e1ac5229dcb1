use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::ApiError;

/// `Json<T>` whose rejection is an `ApiError::BadRequest`, so malformed or
/// incomplete bodies get the same `{"error": ...}` shape as every other failure.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ApiError::from)?;
        Ok(ApiJson(value))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let detail = rejection.body_text();
        warn!(status = %rejection.status(), error = %detail, "rejected request body");
        ApiError::BadRequest(detail)
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, StatusCode},
    };
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: String,
        count: u32,
    }

    fn request(content_type: Option<&str>, body: &str) -> Request {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn well_formed_body_is_extracted() {
        let req = request(Some("application/json"), r#"{"name":"a","count":2}"#);
        let ApiJson(payload) = ApiJson::<Payload>::from_request(req, &()).await.unwrap();
        assert_eq!(payload.name, "a");
        assert_eq!(payload.count, 2);
    }

    #[tokio::test]
    async fn missing_field_is_a_bad_request() {
        let req = request(Some("application/json"), r#"{"name":"a"}"#);
        let err = ApiJson::<Payload>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("count"));
    }

    #[tokio::test]
    async fn syntax_error_and_wrong_content_type_are_bad_requests() {
        let req = request(Some("application/json"), r#"{"name":"#);
        let err = ApiJson::<Payload>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let req = request(
            Some("application/x-www-form-urlencoded"),
            "name=a&count=2",
        );
        let err = ApiJson::<Payload>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let req = request(None, r#"{"name":"a","count":2}"#);
        let err = ApiJson::<Payload>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
