//! Constants used throughout the cfgtree library.

/// Maximum number of hops a chained reference may follow before resolution
/// fails with `ReferenceDepthExceeded`.
pub const MAX_REFERENCE_DEPTH: usize = 32;
