use axum::{
    extract::{Query, Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

use crate::{AppState, error::AppError};

/// RoutePattern
///
/// One entry of the public-endpoint allowlist. Patterns are declared once at
/// gate construction; matching is a plain string comparison per request.
#[derive(Debug, Clone)]
pub enum RoutePattern {
    /// The request path must equal the pattern exactly.
    Exact(&'static str),
    /// The request path must be the given prefix followed by one or more
    /// ASCII digits and nothing else. Covers image fetches by numeric
    /// identifier while keeping every other `/api/images/*` path protected.
    NumericTail(&'static str),
}

impl RoutePattern {
    fn matches(&self, path: &str) -> bool {
        match self {
            RoutePattern::Exact(pattern) => path == *pattern,
            RoutePattern::NumericTail(prefix) => path
                .strip_prefix(prefix)
                .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit())),
        }
    }
}

/// Allowlist
///
/// The set of endpoints that pass the gate without a secret: the public
/// project listing, key validation (used by the SPA to decide whether to show
/// admin controls), and image fetches addressed by a purely numeric id.
#[derive(Debug, Clone)]
pub struct Allowlist {
    patterns: Vec<RoutePattern>,
}

impl Allowlist {
    pub fn standard() -> Self {
        Self {
            patterns: vec![
                RoutePattern::Exact("/api/projects/list"),
                RoutePattern::Exact("/api/projects/validate-key"),
                RoutePattern::NumericTail("/api/images/"),
            ],
        }
    }

    pub fn permits(&self, path: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(path))
    }
}

/// ApiKeyGate
///
/// Binary allow/deny decision per inbound request. The shared secret is
/// injected at construction (never read from a global), and the allowlist is
/// built once alongside it. The check is stateless: no lockout, no rate
/// limiting, a single comparison per request.
pub struct ApiKeyGate {
    api_key: String,
    allowlist: Allowlist,
}

impl ApiKeyGate {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            allowlist: Allowlist::standard(),
        }
    }

    /// Exact, case-sensitive string equality. No trimming, no encoding
    /// tolerance: "Secret " is not "Secret".
    pub fn validate(&self, candidate: &str) -> bool {
        candidate == self.api_key
    }

    /// Whether the path may pass the gate without presenting a secret.
    pub fn permits_anonymous(&self, path: &str) -> bool {
        self.allowlist.permits(path)
    }
}

/// Query-parameter fallback for clients that cannot set headers
/// (e.g. a plain <img src=...> pointing at a protected image path).
#[derive(Deserialize)]
struct ApiKeyParam {
    #[serde(rename = "apiKey")]
    api_key: Option<String>,
}

/// require_api_key
///
/// The gate middleware, applied uniformly ahead of every `/api` handler.
/// Allowlisted paths pass unconditionally. Otherwise the presented secret is
/// the raw `Authorization` header value, falling back to the `apiKey` query
/// parameter when the header is absent; anything but an exact match is
/// rejected with 401 and the plain-text body `Unauthorized`.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if state.gate.permits_anonymous(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .or_else(|| {
            Query::<ApiKeyParam>::try_from_uri(request.uri())
                .ok()
                .and_then(|Query(params)| params.api_key)
        });

    match presented {
        Some(candidate) if state.gate.validate(&candidate) => Ok(next.run(request).await),
        _ => Err(AppError::Unauthorized),
    }
}
