// SPDX-License-Identifier: MIT OR Apache-2.0
//! # portalcfg-cli
//!
//! Command-line interface and file resolver for portal configurations.
//!
//! A portal configuration file is either a plain configuration document, or a
//! "double config" carrying a `template` and a `system` document side by side:
//!
//! ```json
//! {
//!   "template": { "devices": [ ... ], "rooms": [ ... ] },
//!   "system":   { "devices": [ ... ] },
//!   "template_url": "https://portal/templates/42",
//!   "system_url": "https://portal/systems/7"
//! }
//! ```
//!
//! Resolving a double config merges the system onto the template with
//! [`portalcfg_core::merge_documents`] and records the two source URLs as
//! `templateUrl` / `systemUrl` on the result. Any other document is passed
//! through unchanged.
//!
//! ## Usage
//!
//! ```bash
//! # Resolve a downloaded config into the effective one
//! portalcfg resolve portal-config.json -o configurationFile.json
//!
//! # Merge two separate documents
//! portalcfg merge template.json system.json
//!
//! # Show what a file contains and which fields would be dropped
//! portalcfg check portal-config.json
//! ```
//!
//! ## Subcommands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `resolve` | Merge a double config if necessary and write the result |
//! | `merge` | Merge a system document onto a template document |
//! | `check` | Report the layout of a configuration file |

#![warn(missing_docs)]

/// Output formatting for merged documents
pub mod output;
/// Double-config detection, merging and file resolution
pub mod resolve;

pub use output::OutputFormat;
pub use resolve::{
    DocumentReport, Resolution, ResolveError, inspect, is_double_config, merge_double_config,
    read_document, resolve_file, resolve_value, write_document,
};

/// Re-export of portalcfg-core for the merge engine.
pub use portalcfg_core as core;
