//! `X-Request-ID` propagation.
//!
//! An incoming ID is kept when it is short printable ASCII; otherwise a new
//! UUID is assigned. The ID is echoed on every response and recorded on the
//! request's tracing span.

use actix_web::Error;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::middleware::Next;
use uuid::Uuid;

/// Header name for request ID.
pub static REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

fn request_id_from(value: Option<&HeaderValue>) -> String {
    let inbound = value
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| {
            !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN && v.bytes().all(|b| b.is_ascii_graphic())
        });

    match inbound {
        Some(id) => id.to_string(),
        None => Uuid::new_v4().to_string(),
    }
}

/// Middleware function; install with `actix_web::middleware::from_fn`.
pub async fn request_id(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let id = request_id_from(req.headers().get(REQUEST_ID_HEADER));
    tracing::Span::current().record("request_id", id.as_str());
    tracing::debug!(request_id = %id, "Processing request");

    let mut res = next.call(req).await?;
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    Ok(res)
}
