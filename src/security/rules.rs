// src/security/rules.rs
//
// Route-scoped header rules. A rule pairs a source pattern such as
// `/:path*` with the headers to attach to every matching response.
//
use super::csp::security_headers;
use crate::config::Environment;
use hyper::header::{HeaderName, HeaderValue};

pub const ALL_ROUTES: &str = "/:path*";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `:name`, exactly one segment
    Param(String),
    /// `:name*`, zero or more trailing segments
    CatchAll(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("Pattern must start with '/': {0:?}")]
    NotAbsolute(String),

    #[error("Catch-all parameter must be the last segment: {0:?}")]
    CatchAllNotLast(String),

    #[error("Empty parameter name in {0:?}")]
    EmptyParam(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        let rest = source
            .strip_prefix('/')
            .ok_or_else(|| PatternError::NotAbsolute(source.to_string()))?;

        let raw: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        let mut segments = Vec::with_capacity(raw.len());

        for (i, part) in raw.iter().enumerate() {
            let segment = match part.strip_prefix(':') {
                Some(name) => match name.strip_suffix('*') {
                    Some(name) => {
                        if i + 1 != raw.len() {
                            return Err(PatternError::CatchAllNotLast(source.to_string()));
                        }
                        Segment::CatchAll(name.to_string())
                    }
                    None => Segment::Param(name.to_string()),
                },
                None => Segment::Literal(part.to_string()),
            };

            match &segment {
                Segment::Param(name) | Segment::CatchAll(name) if name.is_empty() => {
                    return Err(PatternError::EmptyParam(source.to_string()));
                }
                _ => {}
            }

            segments.push(segment);
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut idx = 0;

        for segment in &self.segments {
            match segment {
                Segment::CatchAll(_) => return true,
                Segment::Param(_) => {
                    if idx >= parts.len() {
                        return false;
                    }
                }
                Segment::Literal(lit) => {
                    if parts.get(idx) != Some(&lit.as_str()) {
                        return false;
                    }
                }
            }
            idx += 1;
        }

        idx == parts.len()
    }
}

#[derive(Debug, Clone)]
pub struct HeaderRule {
    pub source: PathPattern,
    pub headers: Vec<(HeaderName, HeaderValue)>,
}

#[derive(Debug, Clone, Default)]
pub struct HeaderRules {
    rules: Vec<HeaderRule>,
}

impl HeaderRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// One rule covering every route with the security headers for `env`.
    pub fn for_environment(env: Environment) -> Self {
        let source = PathPattern {
            source: ALL_ROUTES.to_string(),
            segments: vec![Segment::CatchAll("path".to_string())],
        };

        Self::new().with_rule(HeaderRule {
            source,
            headers: security_headers(env),
        })
    }

    pub fn with_rule(mut self, rule: HeaderRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[HeaderRule] {
        &self.rules
    }

    /// Headers of every rule whose source matches `path`, in rule order.
    pub fn headers_for(&self, path: &str) -> Vec<(HeaderName, HeaderValue)> {
        self.rules
            .iter()
            .filter(|rule| rule.source.matches(path))
            .flat_map(|rule| rule.headers.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_routes_pattern_matches_everything() {
        let pattern = PathPattern::parse(ALL_ROUTES).unwrap();
        for path in ["/", "", "/health", "/api/health", "/users/orm/", "/a/b/c/d"] {
            assert!(pattern.matches(path), "{path} should match");
        }
    }

    #[test]
    fn test_parsed_all_routes_equals_builtin() {
        let rules = HeaderRules::for_environment(Environment::Development);
        assert_eq!(rules.rules().len(), 1);
        assert_eq!(rules.rules()[0].source, PathPattern::parse(ALL_ROUTES).unwrap());
        assert_eq!(rules.rules()[0].source.source(), "/:path*");
    }

    #[test]
    fn test_literal_and_param_segments() {
        let pattern = PathPattern::parse("/users/:id").unwrap();
        assert!(pattern.matches("/users/42"));
        assert!(!pattern.matches("/users"));
        assert!(!pattern.matches("/users/42/edit"));
        assert!(!pattern.matches("/accounts/42"));

        let pattern = PathPattern::parse("/api/:rest*").unwrap();
        assert!(pattern.matches("/api"));
        assert!(pattern.matches("/api/health"));
        assert!(!pattern.matches("/health"));
    }

    #[test]
    fn test_invalid_patterns() {
        assert_eq!(
            PathPattern::parse("health"),
            Err(PatternError::NotAbsolute("health".into()))
        );
        assert_eq!(
            PathPattern::parse("/:rest*/tail"),
            Err(PatternError::CatchAllNotLast("/:rest*/tail".into()))
        );
        assert_eq!(
            PathPattern::parse("/:"),
            Err(PatternError::EmptyParam("/:".into()))
        );
    }

    #[test]
    fn test_headers_for_collects_matching_rules() {
        let extra = HeaderRule {
            source: PathPattern::parse("/api/:rest*").unwrap(),
            headers: vec![(
                HeaderName::from_static("cache-control"),
                HeaderValue::from_static("no-store"),
            )],
        };
        let rules = HeaderRules::for_environment(Environment::Production).with_rule(extra);

        assert_eq!(rules.headers_for("/").len(), 5);
        assert_eq!(rules.headers_for("/api/health").len(), 6);
    }
}
