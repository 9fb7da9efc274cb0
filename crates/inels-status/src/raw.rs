//! Raw, line-oriented device status

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A device status broken into its field tokens
///
/// The wire form is one token per line followed by a trailing newline, so
/// splitting yields one empty token at the end which is discarded. Note the
/// last split token is always dropped, whatever its content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RawStatus {
    tokens: Vec<String>,
}

impl RawStatus {
    /// Split a status dump into tokens
    pub fn parse(data: &str) -> Self {
        let mut tokens: Vec<String> = data.split('\n').map(str::to_string).collect();
        tokens.pop();
        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn get(&self, position: usize) -> Option<&str> {
        self.tokens.get(position).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl From<Vec<String>> for RawStatus {
    fn from(tokens: Vec<String>) -> Self {
        Self { tokens }
    }
}

impl From<&str> for RawStatus {
    fn from(data: &str) -> Self {
        Self::parse(data)
    }
}

impl From<String> for RawStatus {
    fn from(data: String) -> Self {
        Self::parse(&data)
    }
}

impl From<RawStatus> for String {
    fn from(status: RawStatus) -> String {
        status.to_string()
    }
}

impl FromStr for RawStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Renders the wire form, including the trailing newline
impl fmt::Display for RawStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            writeln!(f, "{}", token)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drops_trailing_token() {
        let status = RawStatus::parse("0A\n1B\n2C\n");
        assert_eq!(status.len(), 3);
        assert_eq!(status.get(0), Some("0A"));
        assert_eq!(status.get(2), Some("2C"));
        assert_eq!(status.get(3), None);
    }

    #[test]
    fn test_parse_without_trailing_newline_drops_last_field() {
        let status = RawStatus::parse("0A\n1B");
        assert_eq!(status.tokens(), &["0A".to_string()]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(RawStatus::parse("").is_empty());
        assert_eq!(RawStatus::parse("\n").get(0), Some(""));
    }

    #[test]
    fn test_display_is_wire_form() {
        let wire = "00\n86\n08\n";
        assert_eq!(RawStatus::parse(wire).to_string(), wire);
    }

    #[test]
    fn test_serde_as_string() {
        let status = RawStatus::parse("01\n02\n");
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, "\"01\\n02\\n\"");
        let parsed: RawStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, status);
    }
}
