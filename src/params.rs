use serde::Deserialize;

/// A field that may arrive as a JSON number (body) or as a string (query
/// string, path segment). Validation happens at the call site so that a
/// malformed value becomes a 400, not a deserialization rejection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawParam {
    Int(i64),
    Text(String),
}

impl RawParam {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RawParam::Int(n) => Some(*n),
            RawParam::Text(s) => s.trim().parse().ok(),
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, RawParam::Text(s) if s.is_empty())
    }
}

impl From<String> for RawParam {
    fn from(s: String) -> Self {
        RawParam::Text(s)
    }
}

/// Empty strings count as absent, mirroring how the endpoints treat
/// `?email=` the same as no email at all.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

pub fn present(value: Option<RawParam>) -> Option<RawParam> {
    value.filter(|p| !p.is_empty())
}
