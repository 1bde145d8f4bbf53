//! Size tiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Abstract dataset size label.
///
/// The label is an a-priori estimate of the staged volume. Concrete record
/// counts come from the catalog, never from measuring produced bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SizeTier {
    #[serde(rename = "1mb")]
    Mb1,
    #[serde(rename = "10mb")]
    Mb10,
    #[serde(rename = "100mb")]
    Mb100,
    #[serde(rename = "1gb")]
    Gb1,
}

impl SizeTier {
    /// All tiers, smallest first.
    pub const ALL: [SizeTier; 4] = [SizeTier::Mb1, SizeTier::Mb10, SizeTier::Mb100, SizeTier::Gb1];

    /// The token used in storage keys and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeTier::Mb1 => "1mb",
            SizeTier::Mb10 => "10mb",
            SizeTier::Mb100 => "100mb",
            SizeTier::Gb1 => "1gb",
        }
    }

    /// Parse a size token, ignoring case and surrounding whitespace.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|tier| tier.as_str() == token)
    }

    /// Valid tokens, for error messages.
    pub fn tokens() -> Vec<String> {
        Self::ALL.iter().map(|t| t.as_str().to_string()).collect()
    }
}

impl fmt::Display for SizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeTier {
    type Err = crate::CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| crate::CatalogError::InvalidSizeTier {
            given: s.to_string(),
            valid: Self::tokens(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tokens() {
        assert_eq!(SizeTier::parse("1mb"), Some(SizeTier::Mb1));
        assert_eq!(SizeTier::parse("10MB"), Some(SizeTier::Mb10));
        assert_eq!(SizeTier::parse(" 100mb "), Some(SizeTier::Mb100));
        assert_eq!(SizeTier::parse("1gb"), Some(SizeTier::Gb1));
        assert_eq!(SizeTier::parse("2mb"), None);
    }

    #[test]
    fn test_from_str_error_lists_options() {
        let err = "5tb".parse::<SizeTier>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("5tb"));
        assert!(msg.contains("1mb"));
        assert!(msg.contains("1gb"));
    }

    #[test]
    fn test_display_matches_serde() {
        for tier in SizeTier::ALL {
            let json = serde_json::to_string(&tier).unwrap();
            assert_eq!(json, format!("\"{tier}\""));
        }
    }
}
