// SPDX-License-Identifier: MIT OR Apache-2.0
//! Core merge engine for portal configuration documents
//!
//! A portal configuration is assembled from two independently authored JSON
//! documents:
//!
//! - the **template** (base), holding the defaults shared by many sites
//! - the **system** (delta), holding only what differs for one site
//!
//! This crate turns the pair into one effective document:
//!
//! - [`merge`] - Recursive object merge and keyed array merge
//! - [`strategy`] - Declarative per-field merge table
//! - [`error`] - Error types and Result alias
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//!
//! let template = json!({
//!     "devices": [{"uid": 1, "name": "tpad"}],
//!     "global": {"x": 1}
//! });
//! let system = json!({
//!     "devices": [{"uid": 1, "volume": 50}, {"uid": 9, "name": "ignored"}],
//!     "global": {"y": 2}
//! });
//!
//! let merged = portalcfg_core::merge_documents(&template, &system).unwrap();
//! assert_eq!(merged["devices"], json!([{"uid": 1, "name": "tpad", "volume": 50}]));
//! assert_eq!(merged["global"], json!({"x": 1, "y": 2}));
//! assert_eq!(merged["tieLines"], json!([]));
//! ```
//!
//! Merging never mutates its inputs and never logs. Fields outside the merge
//! table are dropped from the result.

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]

/// Error types for merge operations
pub mod error;
/// Recursive object and keyed array merging
pub mod merge;
/// Field-level merge strategies and the portal merge table
pub mod strategy;

// Re-exports for convenience
pub use error::{MergeError, Result, Side, value_kind};
pub use merge::{merge_arrays_on_key, merge_objects, merge_value};
pub use strategy::{FieldDefault, FieldRule, MergeSpec, MergeStrategy, merge_documents};
