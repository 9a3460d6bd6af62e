//! partdb - storage locations, the parts placed in them, and how to find both.
//!
//! Parts are searched either lexically (tantivy over the part descriptions) or
//! semantically (cosine distance between embedding vectors). Every search row
//! is enriched with the nearest empty locations on either side of the part's
//! own location, which is what you want when deciding where to put the next
//! thing.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod embeddings;
pub mod error;
pub mod search;
pub mod storage;
pub mod test_utils;

pub use error::{PartDbError, Result};
