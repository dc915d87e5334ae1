//! Minimal nbformat v4 support: wrap an HTML report in a single markdown
//! cell so it renders when the notebook is opened.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

use crate::Result;

pub const NBFORMAT: u32 = 4;
pub const NBFORMAT_MINOR: u32 = 5;

// Fields are declared in alphabetical order: nbformat writes sorted keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub nbformat: u32,
    pub nbformat_minor: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub cell_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub source: Source,
}

/// Cell source: nbformat accepts a single string or a list of lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    Lines(Vec<String>),
    Text(String),
}

impl Source {
    /// Splits on line endings, keeping them, like nbformat does on write.
    pub fn from_text(text: &str) -> Self {
        Source::Lines(text.split_inclusive('\n').map(String::from).collect())
    }

    pub fn text(&self) -> String {
        match self {
            Source::Lines(lines) => lines.concat(),
            Source::Text(text) => text.clone(),
        }
    }
}

impl Cell {
    pub fn markdown(source: &str) -> Self {
        Cell {
            cell_type: "markdown".to_string(),
            id: Some(cell_id(source)),
            metadata: Map::new(),
            source: Source::from_text(source),
        }
    }

    pub fn source_text(&self) -> String {
        self.source.text()
    }
}

impl Notebook {
    pub fn new(cells: Vec<Cell>) -> Self {
        Notebook {
            cells,
            metadata: Map::new(),
            nbformat: NBFORMAT,
            nbformat_minor: NBFORMAT_MINOR,
        }
    }

    /// JSON text with one-space indentation and a trailing newline.
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        buf.push(b'\n');
        Ok(String::from_utf8(buf)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Eight hex characters derived from the cell source, so rewriting the same
/// report yields the same file.
fn cell_id(source: &str) -> String {
    let mut hasher = DefaultHasher::new();
    source.hash(&mut hasher);
    format!("{:016x}", hasher.finish())[..8].to_string()
}

/// Writes a notebook holding exactly one markdown cell with `html` as its source.
pub fn write_notebook(html: &str, notebook_path: impl AsRef<Path>) -> Result<()> {
    let notebook_path = notebook_path.as_ref();
    let notebook = Notebook::new(vec![Cell::markdown(html)]);
    fs::write(notebook_path, notebook.to_json()?)?;
    log::info!("wrote notebook {}", notebook_path.display());
    Ok(())
}

pub fn read_notebook(notebook_path: impl AsRef<Path>) -> Result<Notebook> {
    Notebook::from_json(&fs::read_to_string(notebook_path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn layout_matches_nbformat() {
        let json = Notebook::new(vec![Cell::markdown("<p>a</p>\n<p>b</p>")])
            .to_json()
            .unwrap();
        let id = cell_id("<p>a</p>\n<p>b</p>");
        let expected = format!(
            r#"{{
 "cells": [
  {{
   "cell_type": "markdown",
   "id": "{id}",
   "metadata": {{}},
   "source": [
    "<p>a</p>\n",
    "<p>b</p>"
   ]
  }}
 ],
 "metadata": {{}},
 "nbformat": 4,
 "nbformat_minor": 5
}}
"#
        );
        assert_eq!(json, expected);
    }

    #[test]
    fn string_sources_are_accepted() {
        let notebook = Notebook::from_json(
            r#"{"cells": [{"cell_type": "markdown", "metadata": {}, "source": "x\ny"}],
                "metadata": {}, "nbformat": 4, "nbformat_minor": 4}"#,
        )
        .unwrap();
        assert_eq!(notebook.cells[0].source_text(), "x\ny");
        assert_eq!(notebook.cells[0].id, None);
    }

    #[test]
    fn cell_ids_are_stable_and_short() {
        assert_eq!(cell_id("same"), cell_id("same"));
        assert_eq!(cell_id("same").len(), 8);
    }
}
