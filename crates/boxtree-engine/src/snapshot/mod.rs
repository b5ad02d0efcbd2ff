//! # Snapshot Testing Support
//!
//! Utilities for looking at box trees in tests and on the command line.
//!
//! ## Modules
//!
//! - **`outline`**: Renders a tree as indented text, one box per line, stable
//!   enough for `insta` inline snapshots
//! - **`invariants`**: Whole-tree assertion of the structural rules the
//!   constructor enforces node by node

pub mod invariants;
pub mod outline;

pub use invariants::check as invariants;
pub use outline::outline;
