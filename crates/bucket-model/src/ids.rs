use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// Identifier assigned by the remote store when an array is created.
///
/// The value is opaque to clients: it is only ever read back from a create
/// response or typed in by a user, never computed locally.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ArrayId(u64);

impl ArrayId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl FromStr for ArrayId {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        trimmed
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ModelError::InvalidArrayId(value.to_string()))
    }
}

impl fmt::Display for ArrayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
