// src/security/csp.rs
use crate::config::Environment;
use hyper::header::{HeaderName, HeaderValue};

const DEV_DIRECTIVES: &[&str] = &[
    "default-src 'self'",
    "img-src 'self' data: blob:",
    "font-src 'self' data:",
    "connect-src 'self' http: https: ws: wss:",
    "style-src 'self' 'unsafe-inline'",
    "script-src 'self' 'unsafe-inline' 'unsafe-eval'",
];

const PROD_DIRECTIVES: &[&str] = &[
    "default-src 'self'",
    "img-src 'self' data:",
    "font-src 'self' data:",
    "connect-src 'self'",
    "style-src 'self'",
    "script-src 'self'",
];

pub const REFERRER_POLICY: &str = "no-referrer";
pub const CONTENT_TYPE_OPTIONS: &str = "nosniff";
pub const PERMISSIONS_POLICY: &str = "geolocation=(), microphone=(), camera=()";
pub const STRICT_TRANSPORT_SECURITY: &str = "max-age=63072000; includeSubDomains; preload";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentSecurityPolicy {
    directives: &'static [&'static str],
}

impl ContentSecurityPolicy {
    /// Development builds get the permissive policy (inline scripts, eval,
    /// any connect origin).
    pub fn for_environment(env: Environment) -> Self {
        let directives = if env.is_development() {
            DEV_DIRECTIVES
        } else {
            PROD_DIRECTIVES
        };
        Self { directives }
    }

    pub fn directives(&self) -> &'static [&'static str] {
        self.directives
    }

    pub fn render(&self) -> String {
        self.directives.join("; ")
    }
}

/// The fixed response headers for `env`. Production additionally pins HSTS.
pub fn security_headers(env: Environment) -> Vec<(HeaderName, HeaderValue)> {
    let csp = ContentSecurityPolicy::for_environment(env).render();

    let mut headers = vec![
        (
            hyper::header::CONTENT_SECURITY_POLICY,
            // directives are ASCII literals; fall back to the strictest policy
            HeaderValue::from_str(&csp)
                .unwrap_or_else(|_| HeaderValue::from_static("default-src 'self'")),
        ),
        (
            hyper::header::REFERRER_POLICY,
            HeaderValue::from_static(REFERRER_POLICY),
        ),
        (
            hyper::header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static(CONTENT_TYPE_OPTIONS),
        ),
        (
            HeaderName::from_static("permissions-policy"),
            HeaderValue::from_static(PERMISSIONS_POLICY),
        ),
    ];

    if env == Environment::Production {
        headers.push((
            hyper::header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(STRICT_TRANSPORT_SECURITY),
        ));
    }

    headers
}
