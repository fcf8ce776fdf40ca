// SPDX-License-Identifier: MIT OR Apache-2.0
//! Resolution of portal configuration files.
//!
//! The portal hands out a single file. When it carries both a `template` and
//! a `system` member it must be merged before use; otherwise it already is
//! the effective configuration.

use crate::output::OutputFormat;
use portalcfg_core::{MergeError, MergeSpec, value_kind};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Member holding the base document of a double config.
pub const TEMPLATE_KEY: &str = "template";
/// Member holding the override document of a double config.
pub const SYSTEM_KEY: &str = "system";

/// Source URL members copied onto the merged document, as (from, to).
const URL_KEYS: [(&str, &str); 2] = [("system_url", "systemUrl"), ("template_url", "templateUrl")];

/// Errors raised while resolving a configuration file.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The input file does not exist.
    #[error("configuration file not present: {}", .0.display())]
    NotFound(PathBuf),

    /// The input file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The input file is not valid JSON.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        /// File being parsed
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// A double-config operation was given a document without both members.
    #[error("document is not a double config: `template` and `system` are both required")]
    NotDoubleConfig,

    /// The two documents could not be merged.
    #[error(transparent)]
    Merge(#[from] MergeError),

    /// The merged document could not be serialized.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The output file could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// File being written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Result type alias for resolution
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Outcome of resolving a configuration document.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The document was a double config and has been merged.
    Merged(Value),
    /// The document was used as-is.
    Passthrough(Value),
}

impl Resolution {
    /// The effective configuration.
    #[must_use]
    pub const fn value(&self) -> &Value {
        match self {
            Self::Merged(value) | Self::Passthrough(value) => value,
        }
    }

    /// Consume the resolution, returning the effective configuration.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Merged(value) | Self::Passthrough(value) => value,
        }
    }

    /// Whether a merge took place.
    #[must_use]
    pub const fn is_merged(&self) -> bool {
        matches!(self, Self::Merged(_))
    }
}

/// Whether `root` carries both a non-null `template` and `system` member.
#[must_use]
pub fn is_double_config(root: &Value) -> bool {
    present(root, TEMPLATE_KEY).is_some() && present(root, SYSTEM_KEY).is_some()
}

fn present<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    root.get(key).filter(|value| !value.is_null())
}

/// Merge the `system` member of a double config onto its `template` member.
///
/// The source URLs `system_url` and `template_url` are copied to `systemUrl`
/// and `templateUrl` on the result. Strings are copied verbatim, other
/// scalars are stringified, and null or composite values are skipped.
///
/// # Errors
///
/// Returns [`ResolveError::NotDoubleConfig`] if either member is missing, or
/// [`ResolveError::Merge`] if the members are malformed.
pub fn merge_double_config(root: &Value) -> Result<Value> {
    let (Some(template), Some(system)) = (present(root, TEMPLATE_KEY), present(root, SYSTEM_KEY))
    else {
        return Err(ResolveError::NotDoubleConfig);
    };

    let mut merged = MergeSpec::portal().apply(template, system)?;
    if let Value::Object(map) = &mut merged {
        copy_urls(root, map);
    }
    debug!(merged = %merged, "merged config result");
    Ok(merged)
}

fn copy_urls(root: &Value, merged: &mut Map<String, Value>) {
    for (from, to) in URL_KEYS {
        let url = match root.get(from) {
            Some(Value::String(url)) => url.clone(),
            Some(scalar @ (Value::Number(_) | Value::Bool(_))) => scalar.to_string(),
            Some(other @ (Value::Array(_) | Value::Object(_))) => {
                warn!(member = from, found = value_kind(other), "ignoring non-scalar source url");
                continue;
            }
            Some(Value::Null) | None => continue,
        };
        merged.insert(to.to_owned(), Value::String(url));
    }
}

/// Resolve a parsed configuration document.
///
/// # Errors
///
/// See [`merge_double_config`].
pub fn resolve_value(root: Value) -> Result<Resolution> {
    if is_double_config(&root) {
        debug!("double config detected, merging");
        merge_double_config(&root).map(Resolution::Merged)
    } else {
        Ok(Resolution::Passthrough(root))
    }
}

/// Read and parse a JSON document from disk.
///
/// # Errors
///
/// Returns [`ResolveError::NotFound`], [`ResolveError::Read`] or
/// [`ResolveError::Parse`].
pub fn read_document(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ResolveError::NotFound(path.to_path_buf())
        } else {
            ResolveError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_str(&text).map_err(|source| ResolveError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Render `value` and write it to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`ResolveError::Serialize`] or [`ResolveError::Write`].
pub fn write_document(path: &Path, value: &Value, format: OutputFormat) -> Result<()> {
    let text = format.render(value)?;
    fs::write(path, text).map_err(|source| ResolveError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Read `input`, merge it if it is a double config, and save the effective
/// configuration to `output`.
///
/// Documents that need no merge are still written to `output`, so `output`
/// always holds the effective configuration afterwards.
///
/// # Errors
///
/// Any error from [`read_document`], [`resolve_value`] or [`write_document`].
/// Nothing is written when reading or merging fails.
pub fn resolve_file(input: &Path, output: &Path, format: OutputFormat) -> Result<Resolution> {
    let root = read_document(input)?;
    let resolution = resolve_value(root)?;
    write_document(output, resolution.value(), format)?;
    if resolution.is_merged() {
        info!(output = %output.display(), "JSON config merged and saved");
    } else {
        info!(output = %output.display(), "JSON config saved without merge");
    }
    Ok(resolution)
}

/// Layout of a configuration file as seen by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReport {
    /// Whether the file carries both `template` and `system`
    pub double_config: bool,
    /// Top-level fields of the template document
    pub template_fields: Vec<String>,
    /// Top-level fields of the system document
    pub system_fields: Vec<String>,
    /// Fields on either side that the merge table drops
    pub dropped_fields: Vec<String>,
    /// `system_url`, when present as a string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_url: Option<String>,
    /// `template_url`, when present as a string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_url: Option<String>,
}

/// Describe the layout of a configuration document without merging it.
#[must_use]
pub fn inspect(root: &Value) -> DocumentReport {
    let double_config = is_double_config(root);
    let fields = |key: &str| -> Vec<String> {
        present(root, key)
            .and_then(Value::as_object)
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    };
    let (template_fields, system_fields) = if double_config {
        (fields(TEMPLATE_KEY), fields(SYSTEM_KEY))
    } else {
        (Vec::new(), Vec::new())
    };

    let spec = MergeSpec::portal();
    let mut dropped_fields: Vec<String> = Vec::new();
    for field in template_fields.iter().chain(&system_fields) {
        if spec.rule(field).is_none() && !dropped_fields.contains(field) {
            dropped_fields.push(field.clone());
        }
    }

    let url = |key: &str| root.get(key).and_then(Value::as_str).map(str::to_owned);

    DocumentReport {
        double_config,
        template_fields,
        system_fields,
        dropped_fields,
        system_url: url("system_url"),
        template_url: url("template_url"),
    }
}
