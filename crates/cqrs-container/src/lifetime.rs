//! Service lifetimes

use serde::{Deserialize, Serialize};
use std::fmt;

/// How long a resolved instance is reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifetime {
    /// One instance for the whole provider tree, built from the root
    Singleton,
    /// One instance per scope
    #[default]
    Scoped,
    /// A new instance on every request
    Transient,
}

impl Lifetime {
    fn rank(self) -> u8 {
        match self {
            Self::Singleton => 2,
            Self::Scoped => 1,
            Self::Transient => 0,
        }
    }

    /// Whether an instance with this lifetime lives longer than one with `other`
    ///
    /// A service that outlives its dependencies captures them past their
    /// intended lifetime.
    pub fn outlives(self, other: Lifetime) -> bool {
        self.rank() > other.rank()
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Singleton => "singleton",
            Self::Scoped => "scoped",
            Self::Transient => "transient",
        };
        f.write_str(name)
    }
}
