use std::fmt;

/// Opaque subject identifier supplied by the upstream identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallerId(String);

impl CallerId {
    pub fn new(subject: impl Into<String>) -> Self {
        Self(subject.into())
    }

    /// Returns `None` for absent or blank subjects.
    pub fn from_claim(subject: Option<&str>) -> Option<Self> {
        subject
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
