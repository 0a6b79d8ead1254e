//! # srt-io: Instance Formats and Generation
//!
//! Importers and exporters for routing instances, plus a seeded random
//! generator of connected test graphs.
//!
//! All imports validate before any optimization runs: malformed incidence
//! matrices, mismatched parameter vectors, and out-of-range correlations are
//! rejected with descriptive errors by the `srt-core` constructors this crate
//! funnels everything through.
//!
//! ## Formats
//!
//! - **JSON instance** ([`RouteInstance`]): incidence matrix, per-link
//!   `mu`/`sigma` vectors, sparse correlation list, optional default
//!   correlation for unlisted pairs. Round-trips through [`Graph`].
//! - **CSV incidence matrix** ([`read_incidence_csv`]): one row per node,
//!   integer cells, headerless.

pub mod generate;
pub mod instance;

pub use generate::generate_connected;
pub use instance::{read_incidence_csv, CorrelationEntry, RouteInstance};

// Re-exported so binary crates can construct graphs without naming srt-core
pub use srt_core::Graph;
