//! Opaque ID newtypes for placement graph entities.
//!
//! [`NodeId`], [`EdgeId`], and [`GroupId`] are thin `u32` wrappers used as
//! arena indices into the placement graph. They are `Copy`, `Hash`, `Ord`,
//! and `Serialize`/`Deserialize`.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Creates an ID from a `usize` arena position.
            pub fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }

            /// Returns the index as a `usize`, for slicing into arena vectors.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a component node in the placement graph.
    NodeId
);

define_id!(
    /// Opaque, copyable ID for a weighted edge in the placement graph.
    EdgeId
);

define_id!(
    /// Opaque, copyable ID for a hierarchical group of nodes.
    GroupId
);
