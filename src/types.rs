//! Basic type definitions for the chat relay
//!
//! Provides the `ClientId` newtype: a sequential, positive client identifier.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Unique client identifier (newtype pattern)
///
/// Ids are handed out sequentially starting at 1, in connection arrival
/// order. Implements `Ord` so the registry can iterate in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(pub u64);

impl ClientId {
    /// The id given to the first client ever accepted
    pub const FIRST: ClientId = ClientId(1);

    /// The id that follows this one
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClientId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_display() {
        assert_eq!(ClientId(42).to_string(), "42");
        assert_eq!(ClientId::FIRST.to_string(), "1");
    }

    #[test]
    fn test_client_id_next() {
        assert_eq!(ClientId::FIRST.next(), ClientId(2));
    }

    #[test]
    fn test_client_id_parse() {
        assert_eq!("17".parse::<ClientId>().unwrap(), ClientId(17));
        assert!("".parse::<ClientId>().is_err());
        assert!("99999999999999999999999".parse::<ClientId>().is_err());
    }

    #[test]
    fn test_client_id_ordering() {
        assert!(ClientId(2) < ClientId(10));
    }
}
