//! Notebook parsing and serialization.
//!
//! The converter only sees the [`NotebookCodec`] trait: one call to read
//! notebook bytes into a [`Notebook`], one call to write it out in a textual
//! format. [`JupytextCodec`] is the built-in implementation.

mod ipynb;
mod markdown;
mod model;

pub use ipynb::{parse_notebook, MIN_NBFORMAT};
pub use markdown::{render_markdown, WriterOptions, FORMAT_VERSION};
pub use model::{Cell, CellType, Notebook};

use thiserror::Error;

/// Errors raised while reading or writing a notebook.
#[derive(Debug, Error)]
pub enum NotebookError {
    /// The file is not valid UTF-8.
    #[error("Notebook is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// The file is not a well-formed notebook document.
    #[error("Invalid notebook JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The top-level `nbformat` field is missing.
    #[error("Notebook has no nbformat version")]
    MissingVersion,

    /// The notebook predates nbformat 4.
    #[error("Unsupported nbformat version {0} (version 4 or later required)")]
    UnsupportedVersion(u64),

    /// The front matter could not be written.
    #[error("Failed to write front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Textual formats a notebook can be serialized to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextFormat {
    /// jupytext-style Markdown
    Markdown,
}

impl TextFormat {
    /// File extension for this format, without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
        }
    }

    /// Format identifier.
    pub fn name(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
        }
    }
}

/// Capability that reads notebooks and writes them as text.
pub trait NotebookCodec {
    /// Get the name of this codec.
    fn name(&self) -> &str;

    /// Parse notebook bytes into the in-memory model.
    fn parse(&self, bytes: &[u8]) -> Result<Notebook, NotebookError>;

    /// Serialize a notebook to the given textual format.
    fn serialize(&self, notebook: &Notebook, format: TextFormat) -> Result<String, NotebookError>;
}

/// Built-in codec: nbformat 4 JSON in, jupytext-style Markdown out.
#[derive(Debug, Clone, Default)]
pub struct JupytextCodec {
    options: WriterOptions,
}

impl JupytextCodec {
    /// Create a codec with the given writer options.
    pub fn new(options: WriterOptions) -> Self {
        Self { options }
    }
}

impl NotebookCodec for JupytextCodec {
    fn name(&self) -> &str {
        "jupytext"
    }

    fn parse(&self, bytes: &[u8]) -> Result<Notebook, NotebookError> {
        parse_notebook(bytes)
    }

    fn serialize(&self, notebook: &Notebook, format: TextFormat) -> Result<String, NotebookError> {
        match format {
            TextFormat::Markdown => render_markdown(notebook, &self.options),
        }
    }
}
