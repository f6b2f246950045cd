//! Path pattern parsing and matching.
//!
//! # Responsibilities
//! - Parse route templates: literals, `:name` params, optional `?` suffix,
//!   trailing `*` wildcard
//! - Match a request path and capture named parameters
//! - Reject malformed templates at parse time
//!
//! # Design Decisions
//! - A `:name` param captures exactly one non-empty segment
//! - A trailing `*` captures the rest of the path, slashes included, under
//!   the reserved name `"*"`
//! - Optional segments are one alternative: present or absent, tried in
//!   that order
//! - At most one wildcard, final segment only

use std::collections::HashMap;

use thiserror::Error;

/// Reserved parameter name for the trailing wildcard capture.
pub const WILDCARD_PARAM: &str = "*";

/// Captured path parameters, name → raw segment text.
pub type Params = HashMap<String, String>;

/// Error raised while parsing a route template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("wildcard must be the final segment in `{0}`")]
    InteriorWildcard(String),
    #[error("pattern `{0}` declares more than one wildcard")]
    MultipleWildcards(String),
    #[error("empty parameter name in `{0}`")]
    EmptyParamName(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Literal { value: String, optional: bool },
    Param { name: String, optional: bool },
    Wildcard,
}

/// A compiled path template.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a template such as `/users/:id`, `/docs/:lang?/intro`,
    /// or `/files/*`.
    pub fn parse(template: &str) -> Result<Self, PatternError> {
        let mut segments = Vec::new();
        for part in template.split('/').filter(|p| !p.is_empty()) {
            if part == "*" {
                if segments.iter().any(|s| matches!(s, Segment::Wildcard)) {
                    return Err(PatternError::MultipleWildcards(template.to_string()));
                }
                segments.push(Segment::Wildcard);
                continue;
            }
            // anything after a wildcard makes it interior
            if segments.iter().any(|s| matches!(s, Segment::Wildcard)) {
                return Err(PatternError::InteriorWildcard(template.to_string()));
            }
            let (body, optional) = match part.strip_suffix('?') {
                Some(body) => (body, true),
                None => (part, false),
            };
            if let Some(name) = body.strip_prefix(':') {
                if name.is_empty() {
                    return Err(PatternError::EmptyParamName(template.to_string()));
                }
                segments.push(Segment::Param {
                    name: name.to_string(),
                    optional,
                });
            } else {
                segments.push(Segment::Literal {
                    value: body.to_string(),
                    optional,
                });
            }
        }
        Ok(Self {
            raw: template.to_string(),
            segments,
        })
    }

    /// The original template text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a request path, capturing parameters on success.
    pub fn match_path(&self, path: &str) -> Option<Params> {
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        let mut params = Params::new();
        if match_segments(&self.segments, &parts, &mut params) {
            Some(params)
        } else {
            None
        }
    }

    pub(crate) fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub(crate) fn has_wildcard(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Wildcard))
    }

    pub(crate) fn optional_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| {
                matches!(
                    s,
                    Segment::Literal { optional: true, .. } | Segment::Param { optional: true, .. }
                )
            })
            .count()
    }
}

/// Recursive segment match. Optional segments try the present alternative
/// first, then the absent one.
fn match_segments(segments: &[Segment], parts: &[&str], params: &mut Params) -> bool {
    let Some((segment, rest)) = segments.split_first() else {
        return parts.is_empty();
    };
    match segment {
        Segment::Wildcard => {
            params.insert(WILDCARD_PARAM.to_string(), parts.join("/"));
            true
        }
        Segment::Literal { value, optional } => {
            if let Some((part, remaining)) = parts.split_first() {
                if part == value && match_segments(rest, remaining, params) {
                    return true;
                }
            }
            *optional && match_segments(rest, parts, params)
        }
        Segment::Param { name, optional } => {
            if let Some((part, remaining)) = parts.split_first() {
                if !part.is_empty() {
                    let mut trial = params.clone();
                    trial.insert(name.clone(), part.to_string());
                    if match_segments(rest, remaining, &mut trial) {
                        *params = trial;
                        return true;
                    }
                }
            }
            *optional && match_segments(rest, parts, params)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_match() {
        let p = PathPattern::parse("/users/list").unwrap();
        assert!(p.match_path("/users/list").is_some());
        assert!(p.match_path("/users").is_none());
        assert!(p.match_path("/users/list/extra").is_none());
    }

    #[test]
    fn param_captures_one_segment() {
        let p = PathPattern::parse("/users/:id").unwrap();
        let params = p.match_path("/users/42").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
        assert!(p.match_path("/users").is_none());
        assert!(p.match_path("/users/42/posts").is_none());
    }

    #[test]
    fn wildcard_captures_remaining_path() {
        let p = PathPattern::parse("/files/*").unwrap();
        let params = p.match_path("/files/a/b/c.txt").unwrap();
        assert_eq!(params.get(WILDCARD_PARAM).map(String::as_str), Some("a/b/c.txt"));
        // an absent tail still matches, capturing the empty string
        let params = p.match_path("/files").unwrap();
        assert_eq!(params.get(WILDCARD_PARAM).map(String::as_str), Some(""));
    }

    #[test]
    fn optional_param_present_or_absent() {
        let p = PathPattern::parse("/docs/:lang?/intro").unwrap();
        let params = p.match_path("/docs/en/intro").unwrap();
        assert_eq!(params.get("lang").map(String::as_str), Some("en"));
        let params = p.match_path("/docs/intro").unwrap();
        assert!(params.get("lang").is_none());
    }

    #[test]
    fn optional_literal_segment() {
        let p = PathPattern::parse("/about/index?").unwrap();
        assert!(p.match_path("/about/index").is_some());
        assert!(p.match_path("/about").is_some());
    }

    #[test]
    fn interior_wildcard_rejected() {
        assert_eq!(
            PathPattern::parse("/files/*/meta").unwrap_err(),
            PatternError::InteriorWildcard("/files/*/meta".to_string())
        );
    }

    #[test]
    fn double_wildcard_rejected() {
        assert!(matches!(
            PathPattern::parse("/a/*/*"),
            Err(PatternError::InteriorWildcard(_)) | Err(PatternError::MultipleWildcards(_))
        ));
    }

    #[test]
    fn empty_param_name_rejected() {
        assert_eq!(
            PathPattern::parse("/users/:").unwrap_err(),
            PatternError::EmptyParamName("/users/:".to_string())
        );
    }

    #[test]
    fn root_pattern_matches_root_only() {
        let p = PathPattern::parse("/").unwrap();
        assert!(p.match_path("/").is_some());
        assert!(p.match_path("/x").is_none());
    }
}
