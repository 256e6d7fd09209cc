//! The two-step query artifact returned to callers.
//!
//! A single split always produces one map entry (this crate does not
//! support nested splits), but the shape is a list so a caller fanning a
//! query out to multiple merge stages has somewhere to grow without a
//! breaking change.

/// One query to run on a data-bearing node, and the merge table its
/// results should be streamed into.
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry<P> {
    pub merge_table: String,
    pub map_sql: String,
    pub params: Vec<P>,
}

/// The result of [`crate::split`]: one reduce query plus the map query (or
/// queries) that feed it.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitArtifact<P> {
    pub reduce_sql: String,
    pub map_entries: Vec<MapEntry<P>>,
}

impl<P> SplitArtifact<P> {
    /// The single map entry, for the common case of a non-nested split.
    pub fn map_entry(&self) -> &MapEntry<P> {
        &self.map_entries[0]
    }
}
