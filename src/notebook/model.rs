//! In-memory notebook model.
//!
//! Mirrors the nbformat 4 JSON layout closely enough that `serde` can read a
//! notebook file directly into it.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A parsed notebook: metadata plus an ordered list of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    /// Major nbformat version
    pub nbformat: u32,

    /// Minor nbformat version
    #[serde(default)]
    pub nbformat_minor: u32,

    /// Notebook-level metadata (kernelspec, language_info, ...)
    #[serde(default)]
    pub metadata: Map<String, Value>,

    /// Cells in document order
    #[serde(default)]
    pub cells: Vec<Cell>,
}

/// A single notebook cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Kind of cell
    pub cell_type: CellType,

    /// Cell text, joined from the multiline representation
    #[serde(default, deserialize_with = "deserialize_source")]
    pub source: String,

    /// Cell metadata (tags, collapsed, ...)
    #[serde(default)]
    pub metadata: Map<String, Value>,

    /// Code cell outputs, kept opaque
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<Value>,

    /// Code cell execution counter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_count: Option<u64>,
}

/// The kinds of cell nbformat defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    /// Executable code
    Code,
    /// Narrative Markdown text
    Markdown,
    /// Unrendered text passed through as-is
    Raw,
}

/// nbformat stores text either as one string or as a list of lines.
#[derive(Deserialize)]
#[serde(untagged)]
enum MultilineString {
    Single(String),
    Lines(Vec<String>),
}

fn deserialize_source<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match MultilineString::deserialize(deserializer)? {
        MultilineString::Single(text) => text,
        MultilineString::Lines(lines) => lines.concat(),
    })
}

impl Notebook {
    /// Create an nbformat 4.5 notebook with empty metadata.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { nbformat: 4, nbformat_minor: 5, metadata: Map::new(), cells }
    }

    /// Attach a `kernelspec` entry to the notebook metadata.
    pub fn with_kernelspec(mut self, name: &str, display_name: &str, language: &str) -> Self {
        self.metadata.insert(
            "kernelspec".to_string(),
            serde_json::json!({
                "display_name": display_name,
                "language": language,
                "name": name,
            }),
        );
        self
    }

    /// The `kernelspec` metadata, if present.
    pub fn kernelspec(&self) -> Option<&Value> {
        self.metadata.get("kernelspec")
    }

    /// The notebook language, from the kernelspec or the language info.
    pub fn language(&self) -> Option<&str> {
        self.kernelspec()
            .and_then(|spec| spec.get("language"))
            .and_then(Value::as_str)
            .or_else(|| {
                self.metadata
                    .get("language_info")
                    .and_then(|info| info.get("name"))
                    .and_then(Value::as_str)
            })
            .filter(|lang| !lang.is_empty())
    }
}

impl Cell {
    fn new(cell_type: CellType, source: impl Into<String>) -> Self {
        Self {
            cell_type,
            source: source.into(),
            metadata: Map::new(),
            outputs: Vec::new(),
            execution_count: None,
        }
    }

    /// Create a code cell.
    pub fn code(source: impl Into<String>) -> Self {
        Self::new(CellType::Code, source)
    }

    /// Create a markdown cell.
    pub fn markdown(source: impl Into<String>) -> Self {
        Self::new(CellType::Markdown, source)
    }

    /// Create a raw cell.
    pub fn raw(source: impl Into<String>) -> Self {
        Self::new(CellType::Raw, source)
    }

    /// Set the cell's `tags` metadata.
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.metadata.insert("tags".to_string(), Value::from(tags.to_vec()));
        self
    }

    /// String tags from the cell metadata. Non-string entries are ignored.
    pub fn tags(&self) -> Vec<&str> {
        self.metadata
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Source text without trailing line breaks.
    pub fn trimmed_source(&self) -> &str {
        self.source.trim_end_matches(['\n', '\r'])
    }
}
