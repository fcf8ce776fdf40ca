// SPDX-License-Identifier: MIT OR Apache-2.0
//! Rendering of JSON documents for writing.

use serde::Serialize;
use serde_json::Value;
use std::io;

/// How a document is rendered to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFormat {
    /// Spaces per indentation level when pretty-printing
    pub indent: usize,
    /// Emit a single line instead of pretty-printing
    pub compact: bool,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::pretty(2)
    }
}

impl OutputFormat {
    /// Pretty-print with the given indentation.
    #[must_use]
    pub const fn pretty(indent: usize) -> Self {
        Self {
            indent,
            compact: false,
        }
    }

    /// Single-line output.
    #[must_use]
    pub const fn compact() -> Self {
        Self {
            indent: 0,
            compact: true,
        }
    }

    /// Render `value` as text terminated by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render(&self, value: &Value) -> serde_json::Result<String> {
        let mut output = if self.compact {
            serde_json::to_string(value)?
        } else {
            let indent_str = " ".repeat(self.indent);
            let mut buf = Vec::new();
            let formatter = serde_json::ser::PrettyFormatter::with_indent(indent_str.as_bytes());
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            value.serialize(&mut ser)?;
            String::from_utf8(buf).map_err(|e| {
                serde_json::Error::io(io::Error::new(io::ErrorKind::InvalidData, e))
            })?
        };
        output.push('\n');
        Ok(output)
    }
}
