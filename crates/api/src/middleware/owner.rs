//! Caller identity resolution.
//!
//! Every request is tagged with a [`CallerIdentity`] built from a session
//! token and a network address:
//!
//! - session: `X-User-Session-ID` header, else the `user_session_id`
//!   cookie, else a fresh UUID v4;
//! - address: the first parseable IP among the forwarding headers, else the
//!   peer socket address.
//!
//! The response always echoes both values and refreshes the session cookie.
//! Forwarding headers are client-controlled, so the address is a
//! convenience hint rather than proof of identity.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts, Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use t20_core::ownership::CallerIdentity;

use crate::background::session_reassociation;
use crate::state::AppState;

/// Request/response header carrying the session token.
pub const SESSION_HEADER: HeaderName = HeaderName::from_static("x-user-session-id");

/// Response header echoing the resolved network address.
pub const ADDRESS_HEADER: HeaderName = HeaderName::from_static("x-user-ip");

/// Cookie holding the session token between visits.
pub const SESSION_COOKIE: &str = "user_session_id";

/// Session cookie lifetime: 30 days.
const SESSION_MAX_AGE_SECS: u64 = 30 * 24 * 60 * 60;

/// Longest session token accepted from a client.
const MAX_SESSION_TOKEN_LEN: usize = 128;

/// Forwarding headers consulted in order for the caller's address.
const ADDRESS_SOURCES: [&str; 5] = [
    "x-forwarded-for",
    "x-real-ip",
    "x-client-ip",
    "cf-connecting-ip",
    "true-client-ip",
];

/// Middleware resolving the caller and stamping the response.
///
/// Mount with `axum::middleware::from_fn_with_state`.
pub async fn resolve_owner(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let headers = request.headers();
    let presented = session_from_headers(headers);
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let address = address_from_headers(headers)
        .or(peer)
        .map(|ip| ip.to_string());
    let secure = is_https(headers);

    let session_token = match presented {
        Some(token) => token,
        None => {
            let token = uuid::Uuid::new_v4().to_string();
            if let Some(address) = &address {
                session_reassociation::spawn(state.pool.clone(), address.clone(), token.clone());
            }
            token
        }
    };

    request.extensions_mut().insert(CallerIdentity::new(
        Some(session_token.clone()),
        address.clone(),
    ));

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    if let Ok(value) = HeaderValue::from_str(&session_token) {
        headers.insert(SESSION_HEADER, value);
    }
    if let Some(value) = address.and_then(|a| HeaderValue::from_str(&a).ok()) {
        headers.insert(ADDRESS_HEADER, value);
    }
    if let Ok(value) = HeaderValue::from_str(&session_cookie(&session_token, secure)) {
        headers.append(SET_COOKIE, value);
    }

    response
}

/// Session token from the header, falling back to the cookie.
fn session_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(&SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| is_valid_session_token(t))
        .map(str::to_owned)
        .or_else(|| session_from_cookies(headers))
}

fn session_from_cookies(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().trim_matches('"'))
        .filter(|t| is_valid_session_token(t))
        .map(str::to_owned)
}

/// Tokens end up in a `Set-Cookie` value; keep them to a safe alphabet.
fn is_valid_session_token(token: &str) -> bool {
    !token.is_empty()
        && token.len() <= MAX_SESSION_TOKEN_LEN
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// First forwarding header whose value parses as an IP address.
///
/// `X-Forwarded-For` contributes only its first (client-most) element.
fn address_from_headers(headers: &HeaderMap) -> Option<IpAddr> {
    ADDRESS_SOURCES.iter().find_map(|name| {
        let raw = headers.get(*name)?.to_str().ok()?;
        let first = raw.split(',').next()?.trim();
        first.parse::<IpAddr>().ok()
    })
}

fn is_https(headers: &HeaderMap) -> bool {
    headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|proto| proto.trim().eq_ignore_ascii_case("https"))
}

fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie =
        format!("{SESSION_COOKIE}={token}; Max-Age={SESSION_MAX_AGE_SECS}; Path=/; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

/// The caller resolved by [`resolve_owner`].
///
/// Outside the middleware (unit-tested handlers, misconfigured routers) the
/// caller is anonymous and owns nothing.
#[derive(Debug, Clone)]
pub struct Owner(pub CallerIdentity);

impl<S> FromRequestParts<S> for Owner
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Owner(
            parts
                .extensions
                .get::<CallerIdentity>()
                .cloned()
                .unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn header_session_wins_over_cookie() {
        let h = headers(&[
            ("x-user-session-id", "from-header"),
            ("cookie", "user_session_id=from-cookie"),
        ]);
        assert_eq!(session_from_headers(&h).as_deref(), Some("from-header"));
    }

    #[test]
    fn cookie_session_is_found_among_others() {
        let h = headers(&[("cookie", "theme=dark; user_session_id=abc-123; lang=pt")]);
        assert_eq!(session_from_headers(&h).as_deref(), Some("abc-123"));
    }

    #[test]
    fn malformed_session_is_ignored() {
        let h = headers(&[("x-user-session-id", "a;b")]);
        assert_eq!(session_from_headers(&h), None);
        let h = headers(&[("cookie", "user_session_id=")]);
        assert_eq!(session_from_headers(&h), None);
    }

    #[test]
    fn forwarded_for_uses_first_element() {
        let h = headers(&[("x-forwarded-for", "203.0.113.7, 10.0.0.1")]);
        assert_eq!(address_from_headers(&h), Some("203.0.113.7".parse().unwrap()));
    }

    #[test]
    fn invalid_forwarded_value_falls_through_to_next_header() {
        let h = headers(&[("x-forwarded-for", "unknown"), ("x-real-ip", "198.51.100.2")]);
        assert_eq!(address_from_headers(&h), Some("198.51.100.2".parse().unwrap()));
    }

    #[test]
    fn ipv6_is_accepted() {
        let h = headers(&[("cf-connecting-ip", "2001:db8::1")]);
        assert_eq!(address_from_headers(&h), Some("2001:db8::1".parse().unwrap()));
    }

    #[test]
    fn no_forwarding_headers_yields_none() {
        assert_eq!(address_from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn cookie_is_secure_only_behind_https() {
        let plain = session_cookie("tok", is_https(&HeaderMap::new()));
        assert!(plain.starts_with("user_session_id=tok; Max-Age=2592000; Path=/"));
        assert!(!plain.contains("Secure"));

        let https = session_cookie("tok", is_https(&headers(&[("x-forwarded-proto", "https")])));
        assert!(https.ends_with("; Secure"));
    }
}
