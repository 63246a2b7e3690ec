//! Block-lookup collaborator boundary.
//!
//! Live chunk adapters that query a running backend belong to the hosting
//! bootstrap; the translation core only consumes this interface.

/// Queries against the backend's live block storage.
pub trait WorldBlockLookup: Send + Sync {
    /// Source-protocol block runtime ID at a world coordinate.
    fn block_at(&self, x: i32, y: i32, z: i32) -> i32;

    /// The block palette visible to this player.
    fn palette(&self) -> Vec<i32>;
}

/// Lookup that knows nothing — every query answers air. Used when the
/// bootstrap provides no world adapter.
#[derive(Debug, Default)]
pub struct EmptyWorldLookup;

impl WorldBlockLookup for EmptyWorldLookup {
    fn block_at(&self, _x: i32, _y: i32, _z: i32) -> i32 {
        0
    }

    fn palette(&self) -> Vec<i32> {
        Vec::new()
    }
}
