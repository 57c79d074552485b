//! Opaque ID newtypes for the entities a path identity refers to.
//!
//! Clock edges, pins, graph vertices, analysis points and exceptions are owned
//! by external collaborators. The search layer only ever stores their ids,
//! compares them by identity and mixes them into hashes.

use aion_common::HashMix;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize,
        )]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl HashMix for $name {
            fn mix_into(&self, hash: &mut u64) {
                self.0.mix_into(hash);
            }
        }
    };
}

define_id!(
    /// Identity of a clock transition (a clock and its rise or fall edge).
    ClockEdgeId
);

define_id!(
    /// Identity of a pin in the network.
    PinId
);

define_id!(
    /// Identity of a vertex in the timing graph.
    VertexId
);

define_id!(
    /// Index of a path analysis point (corner and min/max view).
    PathApIndex
);

define_id!(
    /// Identity of a timing exception (false path, multicycle, ...).
    ExceptionId
);

/// Reference to a path stored on a graph vertex.
///
/// The vertex owns an array of paths indexed by tag; this pair is enough for
/// the path layer to recover the path itself.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct PathRef {
    /// The vertex holding the path.
    pub vertex: VertexId,
    /// Index of the path's tag within the vertex.
    pub tag_index: u32,
}

impl PathRef {
    /// Creates a path reference.
    pub fn new(vertex: VertexId, tag_index: u32) -> Self {
        Self { vertex, tag_index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aion_common::QuantizedHasher;
    use std::collections::HashSet;

    #[test]
    fn pin_id_roundtrip() {
        let id = PinId::from_raw(42);
        assert_eq!(id.as_raw(), 42);
    }

    #[test]
    fn clock_edge_ordering_follows_index() {
        let a = ClockEdgeId::from_raw(1);
        let b = ClockEdgeId::from_raw(2);
        assert!(a < b);
        assert!(Some(a) > None, "absent edge sorts first");
    }

    #[test]
    fn vertex_id_hash_in_set() {
        let mut set = HashSet::new();
        set.insert(VertexId::from_raw(1));
        set.insert(VertexId::from_raw(2));
        set.insert(VertexId::from_raw(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn id_mixes_like_raw_index() {
        let a = QuantizedHasher::new().mix(&PinId::from_raw(9)).finish();
        let b = QuantizedHasher::new().mix(&9u32).finish();
        assert_eq!(a, b);
    }

    #[test]
    fn path_ref_orders_by_vertex_then_tag() {
        let a = PathRef::new(VertexId::from_raw(1), 5);
        let b = PathRef::new(VertexId::from_raw(2), 0);
        let c = PathRef::new(VertexId::from_raw(2), 1);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn path_ref_serde_roundtrip() {
        let path = PathRef::new(VertexId::from_raw(7), 3);
        let json = serde_json::to_string(&path).unwrap();
        let restored: PathRef = serde_json::from_str(&json).unwrap();
        assert_eq!(path, restored);
    }

    #[test]
    fn id_debug_format() {
        let id = ExceptionId::from_raw(42);
        let debug = format!("{id:?}");
        assert!(debug.contains("42"));
    }
}
