//! # nb2md
//!
//! Convert a tree of Jupyter notebooks into Markdown documents.
//!
//! nb2md walks an input directory, converts every `.ipynb` file it finds into
//! jupytext-style Markdown and writes the result at the same relative path
//! under an output directory. By default the output directory is wiped first,
//! so outputs of deleted or renamed notebooks never linger.
//!
//! ## Quick Start
//!
//! ```bash
//! # Convert ./notebooks into ./markdown
//! nb2md
//!
//! # Or pick the directories
//! nb2md docs/notebooks site/content
//! ```
//!
//! ## Library use
//!
//! ```no_run
//! use nb2md::TreeConverter;
//!
//! let report = TreeConverter::new("notebooks", "markdown").run()?;
//! println!("{} notebooks converted", report.converted());
//! # Ok::<(), nb2md::ConvertError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::uninlined_format_args)]

pub mod converter;
pub mod core;
pub mod notebook;

// Re-export commonly used types
pub use converter::{Conversion, ConversionReport, TreeConverter};
pub use crate::core::{Config, ConvertError, ConvertResult};
pub use notebook::{
    Cell, CellType, JupytextCodec, Notebook, NotebookCodec, NotebookError, TextFormat,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
