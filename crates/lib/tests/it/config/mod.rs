//! Configuration tree integration tests
//!
//! Tests are organized by concern: basic access, merging, references,
//! snapshots, change tracking, metadata, path assignment and linked trees.

mod backup_tests;
mod extend_tests;
mod metadata_tests;
mod reference_tests;
mod serialization_tests;
