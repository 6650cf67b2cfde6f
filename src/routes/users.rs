// src/routes/users.rs
use super::{json_response, method_not_allowed, read_body, MAX_BODY_BYTES};
use crate::state::AppState;
use crate::users::{NewUser, UserError};
use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{Body, Method, Request, Response, StatusCode};
use serde_json::json;
use std::convert::Infallible;
use tracing::warn;

/// `GET` lists users, `POST` registers one from a JSON, urlencoded or
/// multipart body.
pub async fn users_orm(state: &AppState, req: Request<Body>) -> Response<Body> {
    match *req.method() {
        Method::GET => json_response(StatusCode::OK, &state.users.list().await),
        Method::POST => create_user(state, req).await,
        _ => method_not_allowed(),
    }
}

async fn create_user(state: &AppState, req: Request<Body>) -> Response<Body> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = match read_body(req, MAX_BODY_BYTES).await {
        Ok(body) => body,
        Err(err) => return err.into(),
    };

    let payload = parse_new_user(body, content_type.as_deref()).await;
    let email = payload.email.unwrap_or_default();

    match state.users.register(&email, payload.display_name).await {
        Ok(user) => json_response(StatusCode::CREATED, &user),
        Err(err) => err.into(),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum BodyKind {
    UrlEncoded,
    Multipart,
    Other,
}

/// Media types compare case-insensitively and ignore parameters.
fn body_kind(content_type: Option<&str>) -> BodyKind {
    let media_type = content_type
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .unwrap_or_default();

    match media_type.as_str() {
        "application/x-www-form-urlencoded" => BodyKind::UrlEncoded,
        "multipart/form-data" => BodyKind::Multipart,
        _ => BodyKind::Other,
    }
}

/// Form fields win when they carry an email; otherwise the body is tried as
/// JSON. Unparseable bodies decode as an empty payload.
async fn parse_new_user(body: Bytes, content_type: Option<&str>) -> NewUser {
    let form = match body_kind(content_type) {
        BodyKind::UrlEncoded => parse_urlencoded(&body),
        BodyKind::Multipart => parse_multipart(body.clone(), content_type).await,
        BodyKind::Other => NewUser::default(),
    };

    if form.email.is_some() {
        return form;
    }

    parse_json(&body)
}

fn parse_urlencoded(body: &[u8]) -> NewUser {
    let mut payload = NewUser::default();
    for (key, value) in url::form_urlencoded::parse(body) {
        set_field(&mut payload, &key, value.into_owned());
    }
    payload
}

async fn parse_multipart(body: Bytes, content_type: Option<&str>) -> NewUser {
    let mut payload = NewUser::default();

    let boundary = match content_type.map(multer::parse_boundary) {
        Some(Ok(boundary)) => boundary,
        Some(Err(e)) => {
            warn!("Ignoring multipart body without a usable boundary: {}", e);
            return payload;
        }
        None => return payload,
    };

    let stream = futures::stream::once(async move { Ok::<_, Infallible>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let name = field.name().map(str::to_string);
                match (name, field.text().await) {
                    (Some(name), Ok(value)) => set_field(&mut payload, &name, value),
                    (_, Err(e)) => {
                        warn!("Ignoring unreadable multipart field: {}", e);
                        return payload;
                    }
                    (None, Ok(_)) => {}
                }
            }
            Ok(None) => return payload,
            Err(e) => {
                warn!("Ignoring malformed multipart body: {}", e);
                return payload;
            }
        }
    }
}

fn parse_json(body: &[u8]) -> NewUser {
    if body.is_empty() {
        return NewUser::default();
    }

    serde_json::from_slice(body).unwrap_or_else(|e| {
        warn!("Ignoring malformed JSON body: {}", e);
        NewUser::default()
    })
}

fn set_field(payload: &mut NewUser, key: &str, value: String) {
    match key {
        "email" => payload.email = Some(value),
        "display_name" => payload.display_name = Some(value),
        _ => {}
    }
}

impl From<UserError> for Response<Body> {
    fn from(err: UserError) -> Self {
        let status = match err {
            UserError::EmailRequired | UserError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
            UserError::Duplicate(_) => StatusCode::CONFLICT,
        };

        json_response(status, &json!({ "error": err.to_string() }))
    }
}
