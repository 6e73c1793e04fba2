//! Security header extractor shared by every protected handler.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use http::HeaderMap;
use http::request::Parts;

use crate::domain::types::DeviceHints;
use crate::usecase::security::SecurityHeaderValues;

/// Raw security and device headers from the request. Extraction is
/// infallible; presence and validity are checked by the security gate so
/// failures map to this service's error body instead of a bare status.
#[derive(Debug, Clone)]
pub struct SecurityHeaders(pub SecurityHeaderValues);

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

impl From<&HeaderMap> for SecurityHeaders {
    fn from(headers: &HeaderMap) -> Self {
        Self(SecurityHeaderValues {
            authorization: header(headers, "authorization"),
            timestamp: header(headers, "x-timestamp"),
            nonce: header(headers, "x-nonce"),
            signature: header(headers, "x-signature"),
            user_id: header(headers, "x-user-id"),
            request_source: header(headers, "x-request-source"),
            device: DeviceHints {
                browser: header(headers, "x-device-browser"),
                os: header(headers, "x-device-os"),
                device_name: header(headers, "x-device-name"),
            },
        })
    }
}

impl<S> FromRequestParts<S> for SecurityHeaders
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let extracted = Self::from(&parts.headers);
        async move { Ok(extracted) }
    }
}
