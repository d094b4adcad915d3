//! Tree converter.
//!
//! Walks a notebook tree and writes a Markdown file for every notebook at
//! the mirrored path under the output root. A run is sequential and stops at
//! the first error; files written before the error stay on disk.

mod paths;

pub use paths::{mirrored_path, normalize_extension};

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::core::{Config, ConvertError, ConvertResult};
use crate::notebook::{JupytextCodec, NotebookCodec, TextFormat, WriterOptions};

/// A single notebook written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Notebook that was read
    pub source: PathBuf,

    /// Markdown file that was written
    pub destination: PathBuf,
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Converted {} to {}", self.source.display(), self.destination.display())
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Conversions in walk order
    pub conversions: Vec<Conversion>,

    /// Files that did not carry the notebook extension
    pub skipped: usize,
}

impl ConversionReport {
    /// Number of notebooks converted.
    pub fn converted(&self) -> usize {
        self.conversions.len()
    }
}

/// Converts every notebook under an input root into a mirrored output tree.
pub struct TreeConverter {
    input_root: PathBuf,
    output_root: PathBuf,
    extension: String,
    clean_output: bool,
    format: TextFormat,
    codec: Box<dyn NotebookCodec>,
}

impl TreeConverter {
    /// Create a converter with the default extension, reset enabled and the
    /// built-in codec.
    pub fn new(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
            extension: "ipynb".to_string(),
            clean_output: true,
            format: TextFormat::Markdown,
            codec: Box::new(JupytextCodec::default()),
        }
    }

    /// Create a converter from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.convert.input_dir, &config.convert.output_dir)
            .with_extension(&config.convert.extension)
            .clean_output(config.convert.clean_output)
            .with_codec(Box::new(JupytextCodec::new(WriterOptions::from(&config.markdown))))
    }

    /// Set the notebook extension (with or without the leading dot).
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = normalize_extension(extension);
        self
    }

    /// Enable or disable wiping the output root before converting.
    pub fn clean_output(mut self, clean: bool) -> Self {
        self.clean_output = clean;
        self
    }

    /// Replace the notebook codec.
    pub fn with_codec(mut self, codec: Box<dyn NotebookCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Root of the notebook tree.
    pub fn input_root(&self) -> &Path {
        &self.input_root
    }

    /// Root of the output tree.
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Output path for a notebook under the input root, or `None` for files
    /// that are not notebooks.
    pub fn mirrored_path(&self, notebook: &Path) -> Option<PathBuf> {
        mirrored_path(
            &self.input_root,
            &self.output_root,
            notebook,
            &self.extension,
            self.format.extension(),
        )
    }

    /// Convert the whole tree.
    pub fn run(&self) -> ConvertResult<ConversionReport> {
        self.run_with(|_| {})
    }

    /// Convert the whole tree, calling `on_converted` after each file is
    /// written.
    pub fn run_with<F>(&self, mut on_converted: F) -> ConvertResult<ConversionReport>
    where
        F: FnMut(&Conversion),
    {
        let input = fs::canonicalize(&self.input_root)
            .map_err(|e| ConvertError::io(&self.input_root, e))?;

        self.prepare_output(&input)?;
        let excluded = self.nested_output_root(&input)?;

        let mut report = ConversionReport::default();
        let walker = WalkDir::new(&self.input_root)
            .into_iter()
            .filter_entry(|e| excluded.as_deref() != Some(e.path()));

        for entry in walker {
            let entry = entry?;
            if is_directory(&entry) {
                continue;
            }

            let Some(destination) = self.mirrored_path(entry.path()) else {
                tracing::debug!(path = %entry.path().display(), "Skipping non-notebook file");
                report.skipped += 1;
                continue;
            };

            let conversion = self.convert_file(entry.path(), destination)?;
            on_converted(&conversion);
            report.conversions.push(conversion);
        }

        tracing::info!(
            codec = self.codec.name(),
            format = self.format.name(),
            converted = report.converted(),
            skipped = report.skipped,
            "Conversion finished"
        );

        Ok(report)
    }

    /// Convert one notebook: parse, serialize, write.
    fn convert_file(&self, source: &Path, destination: PathBuf) -> ConvertResult<Conversion> {
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| ConvertError::io(parent, e))?;
        }

        let bytes = fs::read(source).map_err(|e| ConvertError::io(source, e))?;
        let notebook = self.codec.parse(&bytes).map_err(|e| ConvertError::notebook(source, e))?;
        let text = self
            .codec
            .serialize(&notebook, self.format)
            .map_err(|e| ConvertError::notebook(source, e))?;
        fs::write(&destination, text).map_err(|e| ConvertError::io(&destination, e))?;

        tracing::debug!(
            source = %source.display(),
            destination = %destination.display(),
            cells = notebook.cells.len(),
            "Converted notebook"
        );

        Ok(Conversion { source: source.to_path_buf(), destination })
    }

    /// Clear (when enabled) and create the output root.
    fn prepare_output(&self, input: &Path) -> ConvertResult<()> {
        if self.clean_output {
            if let Some(output) = canonicalize_existing(&self.output_root)? {
                if input.starts_with(&output) {
                    return Err(ConvertError::UnsafeOutputRoot {
                        output: self.output_root.clone(),
                        input: self.input_root.clone(),
                    });
                }

                fs::remove_dir_all(&self.output_root)
                    .map_err(|e| ConvertError::io(&self.output_root, e))?;
                tracing::info!(output = %self.output_root.display(), "Cleared output directory");
            }
        }

        fs::create_dir_all(&self.output_root).map_err(|e| ConvertError::io(&self.output_root, e))
    }

    /// Walk path of the output root when it sits inside the input tree.
    fn nested_output_root(&self, input: &Path) -> ConvertResult<Option<PathBuf>> {
        let output = fs::canonicalize(&self.output_root)
            .map_err(|e| ConvertError::io(&self.output_root, e))?;

        Ok(output.strip_prefix(input).ok().map(|relative| self.input_root.join(relative)))
    }
}

/// Directories, including symlinks that resolve to one. The walk does not
/// follow links, so a linked directory shows up as a non-directory entry.
fn is_directory(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_dir()
        || (file_type.is_symlink()
            && fs::metadata(entry.path()).is_ok_and(|metadata| metadata.is_dir()))
}

/// Canonical form of `path`, or `None` if it does not exist.
fn canonicalize_existing(path: &Path) -> ConvertResult<Option<PathBuf>> {
    match fs::canonicalize(path) {
        Ok(canonical) => Ok(Some(canonical)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConvertError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTEBOOK: &str = r#"{"nbformat": 4, "nbformat_minor": 5, "metadata": {},
        "cells": [{"cell_type": "code", "metadata": {}, "source": "x = 1"}]}"#;

    #[test]
    fn test_conversion_display() {
        let conversion = Conversion {
            source: PathBuf::from("notebooks/intro.ipynb"),
            destination: PathBuf::from("markdown/intro.md"),
        };
        assert_eq!(conversion.to_string(), "Converted notebooks/intro.ipynb to markdown/intro.md");
    }

    #[test]
    fn test_mirrored_path_uses_configured_extension() {
        let converter = TreeConverter::new("in", "out").with_extension(".json");
        assert_eq!(
            converter.mirrored_path(Path::new("in/a/nb.json")),
            Some(PathBuf::from("out/a/nb.md"))
        );
        assert_eq!(converter.mirrored_path(Path::new("in/a/nb.ipynb")), None);
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.convert.input_dir = PathBuf::from("src-notebooks");
        config.convert.output_dir = PathBuf::from("docs");

        let converter = TreeConverter::from_config(&config);
        assert_eq!(converter.input_root(), Path::new("src-notebooks"));
        assert_eq!(converter.output_root(), Path::new("docs"));
        assert!(converter.clean_output);
    }

    #[test]
    fn test_missing_input_root_is_fatal() {
        let temp = tempfile::TempDir::new().unwrap();
        let converter =
            TreeConverter::new(temp.path().join("missing"), temp.path().join("markdown"));

        let err = converter.run().unwrap_err();
        assert!(matches!(err, ConvertError::Io { .. }));
        assert!(!temp.path().join("markdown").exists());
    }

    #[test]
    fn test_refuses_to_clear_input_ancestor() {
        let temp = tempfile::TempDir::new().unwrap();
        let input = temp.path().join("notebooks");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("nb.ipynb"), NOTEBOOK).unwrap();

        let converter = TreeConverter::new(&input, temp.path());
        let err = converter.run().unwrap_err();
        assert!(matches!(err, ConvertError::UnsafeOutputRoot { .. }));
        assert!(input.join("nb.ipynb").exists());

        let converter = TreeConverter::new(&input, &input);
        assert!(matches!(converter.run().unwrap_err(), ConvertError::UnsafeOutputRoot { .. }));
        assert!(input.join("nb.ipynb").exists());
    }

    #[test]
    fn test_output_inside_input_is_not_walked() {
        let temp = tempfile::TempDir::new().unwrap();
        let input = temp.path().join("notebooks");
        fs::create_dir_all(input.join("rendered")).unwrap();
        fs::write(input.join("nb.ipynb"), NOTEBOOK).unwrap();
        // A notebook-named file left in the output tree must not be picked up.
        fs::write(input.join("rendered").join("stale.ipynb"), NOTEBOOK).unwrap();

        let converter = TreeConverter::new(&input, input.join("rendered")).clean_output(false);
        let report = converter.run().unwrap();

        assert_eq!(report.converted(), 1);
        assert!(input.join("rendered").join("nb.md").exists());
        assert!(!input.join("rendered").join("stale.md").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_notebook_name_is_converted() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = tempfile::TempDir::new().unwrap();
        let input = temp.path().join("notebooks");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join(OsStr::from_bytes(b"caf\xe9.ipynb")), NOTEBOOK).unwrap();

        let output = temp.path().join("markdown");
        let report = TreeConverter::new(&input, &output).run().unwrap();

        assert_eq!(report.converted(), 1);
        assert_eq!(report.skipped, 0);
        assert!(output.join(OsStr::from_bytes(b"caf\xe9.md")).is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_with_notebook_name_is_skipped() {
        let temp = tempfile::TempDir::new().unwrap();
        let input = temp.path().join("notebooks");
        let real = temp.path().join("real");
        fs::create_dir_all(&input).unwrap();
        fs::create_dir_all(&real).unwrap();
        fs::write(input.join("a.ipynb"), NOTEBOOK).unwrap();
        std::os::unix::fs::symlink(&real, input.join("linked.ipynb")).unwrap();

        let output = temp.path().join("markdown");
        let report = TreeConverter::new(&input, &output).run().unwrap();

        assert_eq!(report.converted(), 1);
        assert!(output.join("a.md").is_file());
        assert!(!output.join("linked.md").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_notebook_is_converted() {
        let temp = tempfile::TempDir::new().unwrap();
        let input = temp.path().join("notebooks");
        fs::create_dir_all(&input).unwrap();
        fs::write(temp.path().join("shared.ipynb"), NOTEBOOK).unwrap();
        std::os::unix::fs::symlink(temp.path().join("shared.ipynb"), input.join("nb.ipynb"))
            .unwrap();

        let output = temp.path().join("markdown");
        let report = TreeConverter::new(&input, &output).run().unwrap();

        assert_eq!(report.converted(), 1);
        assert_eq!(fs::read_to_string(output.join("nb.md")).unwrap(), "```python\nx = 1\n```\n");
    }

    #[test]
    fn test_callback_sees_each_conversion() {
        let temp = tempfile::TempDir::new().unwrap();
        let input = temp.path().join("notebooks");
        fs::create_dir_all(input.join("sub")).unwrap();
        fs::write(input.join("a.ipynb"), NOTEBOOK).unwrap();
        fs::write(input.join("sub").join("b.ipynb"), NOTEBOOK).unwrap();
        fs::write(input.join("notes.txt"), "not a notebook").unwrap();

        let converter = TreeConverter::new(&input, temp.path().join("markdown"));
        let mut seen = Vec::new();
        let report = converter.run_with(|c| seen.push(c.clone())).unwrap();

        assert_eq!(seen, report.conversions);
        assert_eq!(report.converted(), 2);
        assert_eq!(report.skipped, 1);
    }
}
