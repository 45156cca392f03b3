use indexmap::IndexMap;
use regex::Regex;

use super::error::RouteError;

/// `/` stays `/`; every other path loses its trailing slashes. Query
/// strings and fragments are not part of routing.
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Decode `%XX` escapes. Malformed sequences are kept literally and
/// invalid UTF-8 is replaced rather than rejected.
pub fn percent_decode(raw: &str) -> String {
    fn hex(b: u8) -> Option<u8> {
        match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(b - b'a' + 10),
            b'A'..=b'F' => Some(b - b'A' + 10),
            _ => None,
        }
    }

    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex(bytes[i + 1]), hex(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// A pattern compiled into a regex plus its ordered parameter names.
#[derive(Debug)]
pub(crate) struct CompiledPattern {
    regex: Regex,
    params: Vec<String>,
    /// Capture index of the unmatched remainder, for patterns with children.
    rest_group: Option<usize>,
}

/// Structural match of one pattern against a path.
pub(crate) struct PatternMatch {
    pub params: IndexMap<String, String>,
    /// What is left for child routes; `/` when the pattern consumed it all.
    pub remainder: String,
}

impl CompiledPattern {
    /// Compile `pattern`. With `prefix` set the pattern may match the
    /// start of a path and leave the rest to children.
    pub fn compile(pattern: &str, prefix: bool) -> Result<Self, RouteError> {
        let mut body = String::new();
        let mut params = Vec::new();
        let mut wildcard = false;

        for segment in pattern.split('/').filter(|s| !s.is_empty()) {
            if segment == "*" {
                body.push_str("(?:/.*)?");
                wildcard = true;
                break;
            }
            body.push('/');
            match segment.strip_prefix(':') {
                Some(name) if !name.is_empty() => {
                    body.push_str("([^/]+)");
                    params.push(name.to_string());
                }
                _ => body.push_str(&regex::escape(segment)),
            }
        }

        let (source, rest_group) = if wildcard {
            (format!("^{body}$"), None)
        } else if prefix {
            (format!("^{body}(/.*)?$"), Some(params.len() + 1))
        } else {
            (format!("^{body}/?$"), None)
        };

        let regex = Regex::new(&source).map_err(|e| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            source: e,
        })?;

        Ok(Self {
            regex,
            params,
            rest_group,
        })
    }

    pub fn matches(&self, path: &str) -> Option<PatternMatch> {
        let caps = self.regex.captures(path)?;

        let params = self
            .params
            .iter()
            .enumerate()
            .filter_map(|(i, name)| {
                caps.get(i + 1)
                    .map(|m| (name.clone(), percent_decode(m.as_str())))
            })
            .collect();

        let remainder = self
            .rest_group
            .and_then(|idx| caps.get(idx))
            .map(|m| m.as_str())
            .filter(|rest| !rest.is_empty() && *rest != "/")
            .map(normalize_path)
            .unwrap_or_else(|| "/".to_string());

        Some(PatternMatch { params, remainder })
    }
}
