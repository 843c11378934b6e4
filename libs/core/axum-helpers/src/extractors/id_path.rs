//! Numeric id path parameter extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};

/// Message returned when a path id is not a positive integer.
pub const INVALID_ID: &str = "invalid id";

/// Extractor for positive integer ids in the path.
///
/// Anything that is not a base-10 integer greater than zero is rejected
/// with `400 Bad Request` and the message `"invalid id"`.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::get;
/// use axum_helpers::extractors::IdPath;
///
/// async fn get_product(IdPath(id): IdPath) -> String {
///     format!("Product ID: {}", id)
/// }
///
/// let app = Router::new().route("/products/{id}", get(get_product));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i32);

impl IdPath {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().parse::<i32>() {
            Ok(id) if id > 0 => Some(Self(id)),
            _ => None,
        }
    }
}

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        IdPath::parse(&raw)
            .ok_or_else(|| AppError::BadRequest(INVALID_ID.to_string()).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;

    async fn echo(IdPath(id): IdPath) -> String {
        id.to_string()
    }

    fn app() -> Router {
        Router::new().route("/items/{id}", get(echo))
    }

    #[test]
    fn test_parse_accepts_positive_integers() {
        assert_eq!(IdPath::parse("42"), Some(IdPath(42)));
        assert_eq!(IdPath::parse("1"), Some(IdPath(1)));
    }

    #[test]
    fn test_parse_rejects_zero_negative_and_text() {
        assert_eq!(IdPath::parse("0"), None);
        assert_eq!(IdPath::parse("-3"), None);
        assert_eq!(IdPath::parse("abc"), None);
        assert_eq!(IdPath::parse("1.5"), None);
        assert_eq!(IdPath::parse(""), None);
    }

    #[tokio::test]
    async fn test_extractor_returns_400_for_invalid_id() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/items/abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_extractor_passes_valid_id() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/items/7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
