//! External room identifiers
//!
//! Games hand out room ids in whatever shape they like: small integers,
//! negative numbers, hashes rendered as strings. The map addresses rooms only
//! by these ids and keeps its own dense node handles private.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Anything usable as an external room id.
pub trait ExternalId:
    Clone + Eq + Hash + Ord + fmt::Debug + fmt::Display + Serialize + DeserializeOwned
{
}

impl<T> ExternalId for T where
    T: Clone + Eq + Hash + Ord + fmt::Debug + fmt::Display + Serialize + DeserializeOwned
{
}

/// Default room id: an integer or a text id as reported by the game.
///
/// Integers order before text ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoomId {
    Number(i64),
    Text(String),
}

impl RoomId {
    /// Parse a command-line style id: integers when they parse, text otherwise.
    pub fn parse(raw: &str) -> RoomId {
        match raw.trim().parse::<i64>() {
            Ok(n) => RoomId::Number(n),
            Err(_) => RoomId::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RoomId::Number(n) => write!(f, "{}", n),
            RoomId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RoomId {
    fn from(n: i64) -> Self {
        RoomId::Number(n)
    }
}

impl From<i32> for RoomId {
    fn from(n: i32) -> Self {
        RoomId::Number(n as i64)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        RoomId::Text(s.to_string())
    }
}

impl From<String> for RoomId {
    fn from(s: String) -> Self {
        RoomId::Text(s)
    }
}
