//! Knowledge domain module - calibrates how harshly low confidence is scored

use serde::Serialize;
use std::fmt;

/// Knowledge domain of a claim
///
/// Each domain carries the exponent applied to confidence in the H-Factor.
/// Higher exponents penalize low confidence more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Empirical science (alpha 0.9)
    #[default]
    Scientific,

    /// Clinical and medical claims (alpha 0.85)
    Medical,

    /// Social-science claims (alpha 0.7)
    Social,

    /// Anything else (alpha 0.8)
    Default,
}

impl Domain {
    /// Get the domain name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Scientific => "scientific",
            Domain::Medical => "medical",
            Domain::Social => "social",
            Domain::Default => "default",
        }
    }

    /// Parse a domain name; unknown names fall back to [`Domain::Default`]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "scientific" => Domain::Scientific,
            "medical" => Domain::Medical,
            "social" => Domain::Social,
            _ => Domain::Default,
        }
    }

    /// Domain-specific confidence exponent used by the H-Factor
    pub fn alpha(&self) -> f64 {
        match self {
            Domain::Scientific => 0.9,
            Domain::Medical => 0.85,
            Domain::Social => 0.7,
            Domain::Default => 0.8,
        }
    }

    /// All domains, in declaration order
    pub fn all() -> [Domain; 4] {
        [Domain::Scientific, Domain::Medical, Domain::Social, Domain::Default]
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Domain {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}
