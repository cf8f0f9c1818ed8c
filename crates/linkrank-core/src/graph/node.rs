use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a page in a [`GraphStore`](super::GraphStore).
///
/// Ids are allocated from 1 upward and never reused until the store is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// The first id handed out by a fresh (or reset) store.
    pub const FIRST: Self = Self(1);

    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The id after this one, or `None` once the `u32` space is used up.
    pub(crate) const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(Self)
    }
}

/// A page held by the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub id: NodeId,
    /// Latest rank written back by a compute pass. Stale between a mutation
    /// and the next compute.
    pub rank: f64,
}
