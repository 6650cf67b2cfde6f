// src/security/mod.rs
mod csp;
mod layer;
mod rules;

pub use csp::{
    security_headers, ContentSecurityPolicy, CONTENT_TYPE_OPTIONS, PERMISSIONS_POLICY,
    REFERRER_POLICY, STRICT_TRANSPORT_SECURITY,
};
pub use layer::{SecurityHeaders, SecurityHeadersLayer};
pub use rules::{HeaderRule, HeaderRules, PathPattern, PatternError, ALL_ROUTES};
