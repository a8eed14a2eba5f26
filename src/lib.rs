//! # seglog
//!
//! On-disk storage primitive for an append-only record log: a durable,
//! sequentially-written **store** file paired with a fixed-width,
//! memory-mapped position **index** giving O(1) lookup of the byte offset
//! of any logical record number.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Segment (caller)                     │
//! │        owns one Store and one Index per log file        │
//! └───────────┬─────────────────────────────────┬───────────┘
//!             │                                 │
//!   append(payload) → position     write(record, position)
//!   read(position)  → payload      read(record) → position
//!             │                                 │
//!             ▼                                 ▼
//!      ┌─────────────┐                  ┌──────────────┐
//!      │    Store    │                  │    Index     │
//!      │ framed log, │                  │ mmap array,  │
//!      │ buffered    │                  │ fixed width  │
//!      └─────────────┘                  └──────────────┘
//! ```
//!
//! Data flows one direction on write: the caller appends a payload to the
//! store, gets back the frame's byte position, and records it in the index
//! under the next record number. Reads run the reverse path. Composing many
//! such pairs into a rotating, replicated log is the caller's concern; this
//! crate guarantees correctness and durability of a single pair.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod index;
pub mod store;

mod codec;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::Config;
pub use error::{LogError, Result};
pub use index::{EntryRef, Index};
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of seglog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
