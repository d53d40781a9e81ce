//! Secure-transport detection and HTTPS upgrade redirects.
//!
//! # Responsibilities
//! - Classify a request as secure (scheme, TLS session, forwarding proxy)
//! - Build the `Location` for a permanent redirect to HTTPS
//!
//! # Design Decisions
//! - `X-Forwarded-Proto` is trusted unless the policy opts out; only
//!   correct behind a proxy that overwrites the header
//! - TLS acceptors mark connections by inserting `TlsConnection` into
//!   request extensions

use axum::http::header::{HeaderName, HeaderValue, HOST};
use axum::http::request::Parts;
use axum::http::uri::{Scheme, Uri};

pub const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

/// Request extension marking a connection that carries TLS session state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TlsConnection;

/// Whether the request arrived over a secure transport.
pub fn is_secure_request(parts: &Parts, trust_forwarded_proto: bool) -> bool {
    if parts.uri.scheme() == Some(&Scheme::HTTPS) {
        return true;
    }
    if parts.extensions.get::<TlsConnection>().is_some() {
        return true;
    }
    trust_forwarded_proto
        && parts
            .headers
            .get(X_FORWARDED_PROTO)
            .is_some_and(|proto| proto.as_bytes().eq_ignore_ascii_case(b"https"))
}

/// Host the request was addressed to, port included.
///
/// Absolute-form URIs win over the `Host` header.
pub fn request_host(parts: &Parts) -> Option<&str> {
    parts
        .uri
        .authority()
        .map(|authority| authority.as_str())
        .or_else(|| parts.headers.get(HOST).and_then(|h| h.to_str().ok()))
}

/// The same URL with its scheme rewritten to `https`.
///
/// Returns `None` when the request names no host to redirect to.
pub fn https_redirect_location(parts: &Parts) -> Option<HeaderValue> {
    let host = request_host(parts)?;
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let uri = Uri::builder()
        .scheme(Scheme::HTTPS)
        .authority(host)
        .path_and_query(path_and_query)
        .build()
        .ok()?;
    HeaderValue::try_from(uri.to_string()).ok()
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(builder: axum::http::request::Builder) -> Parts {
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn https_scheme_is_secure() {
        let p = parts(Request::builder().uri("https://example.com/"));
        assert!(is_secure_request(&p, false));
    }

    #[test]
    fn tls_extension_is_secure() {
        let p = parts(Request::builder().uri("/").extension(TlsConnection));
        assert!(is_secure_request(&p, false));
    }

    #[test]
    fn forwarded_proto_respects_trust() {
        let p = parts(
            Request::builder()
                .uri("/")
                .header("Host", "example.com")
                .header("X-Forwarded-Proto", "HTTPS"),
        );
        assert!(is_secure_request(&p, true));
        assert!(!is_secure_request(&p, false));
    }

    #[test]
    fn plain_request_is_insecure() {
        let p = parts(
            Request::builder()
                .uri("/")
                .header("Host", "example.com")
                .header("X-Forwarded-Proto", "http"),
        );
        assert!(!is_secure_request(&p, true));
    }

    #[test]
    fn redirect_keeps_host_path_and_query() {
        let p = parts(
            Request::builder()
                .uri("/a/b?c=d")
                .header("Host", "example.com:8080"),
        );
        assert_eq!(
            https_redirect_location(&p).unwrap(),
            "https://example.com:8080/a/b?c=d"
        );
    }

    #[test]
    fn redirect_prefers_absolute_uri_authority() {
        let p = parts(
            Request::builder()
                .uri("http://api.example.com/x")
                .header("Host", "other.example.com"),
        );
        assert_eq!(request_host(&p), Some("api.example.com"));
        assert_eq!(https_redirect_location(&p).unwrap(), "https://api.example.com/x");
    }

    #[test]
    fn redirect_without_host() {
        let p = parts(Request::builder().uri("/"));
        assert!(https_redirect_location(&p).is_none());
    }
}
