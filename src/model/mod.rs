//! Data model for the reading service's history payloads.
//!
//! This module provides strongly-typed structures for the shapes the client
//! consumes: bulk history records, per-title chapter marks, and title cards
//! for the shelf. Identifiers arrive in several shapes (bare string, bare
//! number, embedded object) and are normalized before use; unknown fields
//! are ignored for forward compatibility.

pub mod history;
pub mod id;
pub mod title;

pub use history::*;
pub use id::*;
pub use title::*;
