// src/routes/mod.rs
pub mod health;
pub mod landing;
pub mod users;

use crate::state::AppState;
use hyper::body::{Bytes, HttpBody};
use hyper::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Body, Method, Request, Response, StatusCode};
use serde::Serialize;
use serde_json::json;

/// Largest request body a handler will buffer.
pub const MAX_BODY_BYTES: usize = 2_621_440;

#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("request body too large")]
    TooLarge,

    #[error("failed to read request body: {0}")]
    Read(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Dispatch a request to its handler.
pub async fn route(state: &AppState, req: Request<Body>) -> Response<Body> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match (&method, path.as_str()) {
        (&Method::GET, "/") => landing::landing_page(),
        (&Method::HEAD, "/") => without_body(landing::landing_page()),
        (&Method::GET, landing::STYLESHEET_PATH) => landing::stylesheet(),
        (&Method::HEAD, landing::STYLESHEET_PATH) => without_body(landing::stylesheet()),
        (_, "/" | landing::STYLESHEET_PATH) => method_not_allowed(),
        (_, "/health" | "/api/health") => health::health(),
        (_, "/users/orm" | "/api/users/orm") => users::users_orm(state, req).await,
        _ => not_found(),
    }
}

pub fn json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response<Body> {
    match serde_json::to_vec(body) {
        Ok(bytes) => with_content_type(status, Body::from(bytes), "application/json"),
        Err(e) => {
            tracing::error!("Failed to serialize response body: {}", e);
            with_content_type(
                StatusCode::INTERNAL_SERVER_ERROR,
                Body::from("Internal Server Error"),
                "text/plain; charset=utf-8",
            )
        }
    }
}

pub fn with_content_type(
    status: StatusCode,
    body: Body,
    content_type: &'static str,
) -> Response<Body> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

pub fn not_found() -> Response<Body> {
    json_response(StatusCode::NOT_FOUND, &json!({ "detail": "Not found" }))
}

pub fn method_not_allowed() -> Response<Body> {
    json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        &json!({ "detail": "Method not allowed" }),
    )
}

/// Drop the body of a response, keeping its headers and the length the body
/// would have had.
pub fn without_body(response: Response<Body>) -> Response<Body> {
    let (mut parts, body) = response.into_parts();
    if let Some(len) = body.size_hint().exact() {
        parts.headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
    }
    Response::from_parts(parts, Body::empty())
}

/// Buffer a request body of at most `limit` bytes. A declared
/// `Content-Length` over the limit is rejected before reading.
pub async fn read_body(req: Request<Body>, limit: usize) -> Result<Bytes, BodyError> {
    let declared = req
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());

    if declared.is_some_and(|len| len > limit as u64) {
        return Err(BodyError::TooLarge);
    }

    match hyper::body::to_bytes(http_body::Limited::new(req.into_body(), limit)).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.downcast_ref::<http_body::LengthLimitError>().is_some() => {
            Err(BodyError::TooLarge)
        }
        Err(e) => Err(BodyError::Read(e)),
    }
}

impl From<BodyError> for Response<Body> {
    fn from(err: BodyError) -> Self {
        let status = match err {
            BodyError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            BodyError::Read(_) => StatusCode::BAD_REQUEST,
        };
        tracing::warn!("Rejected request body: {}", err);

        json_response(status, &json!({ "error": err.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(body: Body) -> Request<Body> {
        Request::post("/").body(body).unwrap()
    }

    #[tokio::test]
    async fn test_read_body_within_limit() {
        let bytes = read_body(post(Body::from("hello")), 5).await.unwrap();
        assert_eq!(&bytes[..], b"hello");
    }

    #[tokio::test]
    async fn test_read_body_over_limit_without_length_header() {
        let chunks: Vec<Result<&'static str, std::io::Error>> = vec![Ok("abc"), Ok("def")];
        let body = Body::wrap_stream(futures::stream::iter(chunks));

        let err = read_body(post(body), 5).await.unwrap_err();
        assert!(matches!(err, BodyError::TooLarge));
    }

    #[tokio::test]
    async fn test_declared_length_over_limit_is_rejected_early() {
        let req = Request::post("/")
            .header(CONTENT_LENGTH, "1000000000")
            .body(Body::empty())
            .unwrap();

        let err = read_body(req, 1024).await.unwrap_err();
        assert!(matches!(err, BodyError::TooLarge));

        let response: Response<Body> = err.into();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_head_keeps_headers_and_length() {
        let full = landing::landing_page();
        let expected_len = landing::render_landing_page().len();

        let response = without_body(full);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
        assert_eq!(response.headers()[CONTENT_LENGTH], expected_len.to_string().as_str());

        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        assert!(body.is_empty());
    }
}
