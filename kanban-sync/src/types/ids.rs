//! Server-assigned identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Sentinel carried by an entity created locally and not yet
            /// confirmed by the server.
            pub const TEMPORARY: Self = Self(-1);

            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            pub const fn get(self) -> i64 {
                self.0
            }

            /// The server never hands out negative ids.
            pub const fn is_temporary(self) -> bool {
                self.0 < 0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::TEMPORARY
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

define_id!(
    /// Identifies a board
    BoardId
);
define_id!(
    /// Identifies a column
    ColumnId
);
define_id!(
    /// Identifies a card
    CardId
);
