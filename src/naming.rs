//! Deterministic synthetic identifiers.
//!
//! `__T` and `__C` are reserved prefixes: callers must keep user schemas
//! from colliding with them (typically by rejecting such identifiers at
//! parse time), since the splitter never checks for collisions itself.

/// Merge table name for split invocation `i`. A single (non-nested) split
/// always uses `i = 0`.
pub fn table_name(i: usize) -> String {
    format!("__T{i}")
}

/// Synthetic column alias for projection slot `i`.
pub fn column_alias(i: usize) -> String {
    format!("__C{i}")
}
