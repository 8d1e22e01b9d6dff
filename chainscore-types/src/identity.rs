use crate::error::ScoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated blockchain account address: `0x` followed by exactly 40 hex
/// characters. Original casing is preserved; normalization is display-only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn parse(raw: &str) -> Result<Self, ScoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ScoreError::EmptyInput);
        }
        let body = trimmed
            .strip_prefix("0x")
            .ok_or(ScoreError::MalformedIdentity)?;
        if body.len() != 40 {
            return Err(ScoreError::MalformedIdentity);
        }
        hex::decode(body).map_err(|_| ScoreError::MalformedIdentity)?;
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `0x1234...abcd` form used wherever the full address is too long.
    pub fn short(&self) -> String {
        format!("{}...{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_addresses_any_case() {
        let mixed = "0xABCDEF0123456789abcdef0123456789ABCDEF01";
        let id = Identity::parse(mixed).unwrap();
        // Casing preserved, not normalized.
        assert_eq!(id.as_str(), mixed);

        assert!(Identity::parse("0x0000000000000000000000000000000000000000").is_ok());
        assert!(Identity::parse("0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF").is_ok());
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let id = Identity::parse("  0x0000000000000000000000000000000000000001  ").unwrap();
        assert_eq!(id.as_str(), "0x0000000000000000000000000000000000000001");
    }

    #[test]
    fn rejects_empty_and_whitespace() {
        assert_eq!(Identity::parse(""), Err(ScoreError::EmptyInput));
        assert_eq!(Identity::parse("   "), Err(ScoreError::EmptyInput));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for raw in [
            "not-an-address",
            "0x12345",                                       // too short
            "0x0000000000000000000000000000000000000000ff",  // too long
            "0xGGGG000000000000000000000000000000000000",    // non-hex
            "1x0000000000000000000000000000000000000000",    // wrong prefix
            "0000000000000000000000000000000000000000",      // no prefix
        ] {
            assert_eq!(Identity::parse(raw), Err(ScoreError::MalformedIdentity), "{raw}");
        }
    }

    #[test]
    fn short_form() {
        let id = Identity::parse("0xABCDEF0123456789abcdef0123456789ABCDEF01").unwrap();
        assert_eq!(id.short(), "0xABCD...EF01");
    }
}
