//! Path mapping between the notebook tree and the Markdown tree.

use std::path::{Path, PathBuf};

/// Map a notebook path to its mirrored output path.
///
/// Returns `None` when `notebook` is not under `input_root` or its file name
/// does not end with `.{extension}`. The match is case-sensitive and done on
/// the raw file name bytes, so names that are not valid UTF-8 still match.
/// Only the last extension is replaced; a bare `.ipynb` has no extension and
/// maps to `.ipynb.md`.
pub fn mirrored_path(
    input_root: &Path,
    output_root: &Path,
    notebook: &Path,
    extension: &str,
    target_extension: &str,
) -> Option<PathBuf> {
    let relative = notebook.strip_prefix(input_root).ok()?;
    let name = relative.file_name()?;
    let suffix = format!(".{extension}");
    if !name.as_encoded_bytes().ends_with(suffix.as_bytes()) {
        return None;
    }

    Some(output_root.join(relative.with_extension(target_extension)))
}

/// Normalize a user-supplied extension (`.ipynb` and `ipynb` are the same).
pub fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_string()
}
