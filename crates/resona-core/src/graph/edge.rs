//! Graph edge types.

use super::node::NodeId;

/// Unique identifier for an edge in the audio graph.
///
/// Like [`NodeId`], edge slots are reused after a disconnect and carry a
/// generation so stale IDs are rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeId {
    pub(crate) slot: u32,
    pub(crate) generation: u32,
}

impl EdgeId {
    /// Returns the slot index.
    #[inline]
    pub fn index(self) -> u32 {
        self.slot
    }
}

impl core::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "EdgeId({}v{})", self.slot, self.generation)
    }
}

/// A directed connection carrying audio from `from` to `to`.
#[derive(Debug)]
pub(crate) struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}
