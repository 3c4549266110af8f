//! Tooling for the icon catalog: the markdown tracker of 150 icon slots, the
//! ingestion of new icon images into the tiered icon tree, and the JSON export
//! the game reads.

pub mod args;
pub mod error;
pub mod export;
pub mod ingest;
pub mod matcher;
pub mod tier;
pub mod tracker;
