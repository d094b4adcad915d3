//! Markdown writer following the jupytext "md" conventions.
//!
//! Code cells become fenced blocks, markdown cells are written verbatim and
//! raw cells are fenced with HTML comments. Outputs are not rendered.

use serde_json::Value;

use super::{Cell, CellType, Notebook, NotebookError};
use crate::core::MarkdownConfig;

/// Version of the jupytext markdown representation written in the header.
pub const FORMAT_VERSION: &str = "1.3";

const REGION_END: &str = "<!-- #endregion -->";
const RAW_START: &str = "<!-- #raw -->";
const RAW_END: &str = "<!-- #endraw -->";

/// Options controlling the Markdown output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    /// Write the YAML front matter when the notebook has a kernelspec
    pub header: bool,

    /// Fence language used when the notebook does not declare one
    pub default_language: String,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self::from(&MarkdownConfig::default())
    }
}

impl From<&MarkdownConfig> for WriterOptions {
    fn from(config: &MarkdownConfig) -> Self {
        Self { header: config.header, default_language: config.default_language.clone() }
    }
}

/// Render a notebook as Markdown text.
///
/// Blocks are separated by one blank line and the result ends with a single
/// newline. A notebook with no cells and no header renders as an empty string.
pub fn render_markdown(
    notebook: &Notebook,
    options: &WriterOptions,
) -> Result<String, NotebookError> {
    let mut blocks = Vec::with_capacity(notebook.cells.len() + 1);

    if options.header {
        if let Some(header) = front_matter(notebook)? {
            blocks.push(header);
        }
    }

    let language = notebook.language().unwrap_or(options.default_language.as_str());
    let mut previous: Option<CellType> = None;

    for cell in &notebook.cells {
        let block = match cell.cell_type {
            CellType::Code => code_block(cell, language),
            CellType::Markdown => markdown_block(cell, previous == Some(CellType::Markdown)),
            CellType::Raw => raw_block(cell),
        };
        blocks.push(block);
        previous = Some(cell.cell_type);
    }

    if blocks.is_empty() {
        return Ok(String::new());
    }

    let mut out = blocks.join("\n\n");
    out.push('\n');
    Ok(out)
}

/// YAML front matter carrying the kernelspec, or `None` without one.
fn front_matter(notebook: &Notebook) -> Result<Option<String>, NotebookError> {
    let Some(kernelspec) = notebook.kernelspec() else {
        return Ok(None);
    };

    let header = serde_json::json!({
        "jupyter": {
            "jupytext": {
                "text_representation": {
                    "extension": ".md",
                    "format_name": "markdown",
                    "format_version": FORMAT_VERSION,
                }
            },
            "kernelspec": kernelspec,
        }
    });

    let yaml = serde_yaml::to_string(&header)?;
    Ok(Some(format!("---\n{}---", yaml)))
}

fn code_block(cell: &Cell, language: &str) -> String {
    let source = cell.trimmed_source();
    let fence = "`".repeat(fence_width(source));

    let mut info = language.to_string();
    if let Some(tags) = tags_attribute(cell) {
        info.push(' ');
        info.push_str(&tags);
    }

    if source.is_empty() {
        format!("{fence}{info}\n{fence}")
    } else {
        format!("{fence}{info}\n{source}\n{fence}")
    }
}

fn markdown_block(cell: &Cell, follows_markdown: bool) -> String {
    let source = cell.trimmed_source();
    let tags = tags_attribute(cell);

    // Adjacent markdown cells, paragraphs split by two blank lines and empty
    // cells would merge or vanish when read back without explicit markers.
    let needs_region =
        follows_markdown || tags.is_some() || source.is_empty() || source.contains("\n\n\n");
    if !needs_region {
        return source.to_string();
    }

    let start = match tags {
        Some(tags) => format!("<!-- #region {tags} -->"),
        None => "<!-- #region -->".to_string(),
    };
    if source.is_empty() {
        format!("{start}\n{REGION_END}")
    } else {
        format!("{start}\n{source}\n{REGION_END}")
    }
}

fn raw_block(cell: &Cell) -> String {
    let source = cell.trimmed_source();
    if source.is_empty() {
        format!("{RAW_START}\n{RAW_END}")
    } else {
        format!("{RAW_START}\n{source}\n{RAW_END}")
    }
}

/// `tags=[...]` attribute for cells with tag metadata.
fn tags_attribute(cell: &Cell) -> Option<String> {
    let tags = cell.tags();
    if tags.is_empty() {
        return None;
    }
    Some(format!("tags={}", Value::from(tags)))
}

/// Backtick count for a fence that cannot be closed by the cell's content.
fn fence_width(source: &str) -> usize {
    let mut longest = 0;
    let mut run = 0;
    for ch in source.chars() {
        if ch == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    (longest + 1).max(3)
}
