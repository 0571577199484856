//! Presentation of tree snapshots.
//!
//! Renderers are pure: they read a [`TreeSnapshot`] and produce a string.
//! The same snapshot always renders to the same output.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use crate::btree::{NodeSnapshot, TreeSnapshot};

/// Turns a snapshot into displayable text.
pub trait Renderer {
    fn render(&self, snapshot: &TreeSnapshot) -> Result<String, RenderError>;
}

/// Output format selected by configuration or by the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderFormat {
    #[default]
    Text,
    Json,
}

impl RenderFormat {
    /// Build the renderer for this format.
    #[must_use]
    pub fn renderer(self, show_ids: bool) -> Box<dyn Renderer> {
        match self {
            Self::Text => Box::new(TextRenderer { show_ids }),
            Self::Json => Box::new(JsonRenderer { pretty: true }),
        }
    }
}

impl FromStr for RenderFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("'{other}' is not a render format (expected text or json)")),
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// One line per level, each node drawn as a row of key cells.
///
/// ```text
/// L0  [20]
/// L1  [10] [30|40]
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer {
    /// Prefix every node with its id, e.g. `n3[30|40]`.
    pub show_ids: bool,
}

impl TextRenderer {
    fn write_node(self, out: &mut String, node: &NodeSnapshot) -> fmt::Result {
        if self.show_ids {
            write!(out, "{}", node.id)?;
        }
        out.push('[');
        for (i, key) in node.keys.iter().enumerate() {
            if i > 0 {
                out.push('|');
            }
            write!(out, "{key}")?;
        }
        out.push(']');
        Ok(())
    }
}

impl Renderer for TextRenderer {
    fn render(&self, snapshot: &TreeSnapshot) -> Result<String, RenderError> {
        let mut out = String::new();
        for (depth, level) in snapshot.levels().iter().enumerate() {
            if depth > 0 {
                out.push('\n');
            }
            write!(out, "L{depth} ")?;
            for node in level {
                out.push(' ');
                self.write_node(&mut out, node)?;
            }
        }
        Ok(out)
    }
}

/// The snapshot as JSON, for copying out of the tool.
#[derive(Debug, Clone, Copy)]
pub struct JsonRenderer {
    pub pretty: bool,
}

impl Renderer for JsonRenderer {
    fn render(&self, snapshot: &TreeSnapshot) -> Result<String, RenderError> {
        let text = if self.pretty {
            serde_json::to_string_pretty(snapshot)?
        } else {
            serde_json::to_string(snapshot)?
        };
        Ok(text)
    }
}

/// Errors that can occur while rendering.
#[derive(Debug)]
pub enum RenderError {
    /// Writing into the output buffer failed.
    Format(fmt::Error),
    /// JSON serialization failed.
    Json(serde_json::Error),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(e) => write!(f, "format error: {e}"),
            Self::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Format(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

impl From<fmt::Error> for RenderError {
    fn from(e: fmt::Error) -> Self {
        Self::Format(e)
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
