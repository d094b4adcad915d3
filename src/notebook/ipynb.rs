//! Reader for `.ipynb` (nbformat 4 JSON) files.

use serde_json::Value;

use super::{Notebook, NotebookError};

/// Oldest nbformat major version with a flat `cells` list.
pub const MIN_NBFORMAT: u64 = 4;

/// Parse notebook bytes into the in-memory model.
///
/// The version is checked before the cells are decoded, so an nbformat 3
/// file reports an unsupported version rather than a missing field.
pub fn parse_notebook(bytes: &[u8]) -> Result<Notebook, NotebookError> {
    let text = std::str::from_utf8(bytes)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let value: Value = serde_json::from_str(text)?;
    let version =
        value.get("nbformat").and_then(Value::as_u64).ok_or(NotebookError::MissingVersion)?;
    if version < MIN_NBFORMAT {
        return Err(NotebookError::UnsupportedVersion(version));
    }

    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notebook::CellType;

    const SAMPLE: &str = r##"{
 "cells": [
  {
   "cell_type": "markdown",
   "metadata": {},
   "source": ["# Title\n", "\n", "Some text."]
  },
  {
   "cell_type": "code",
   "execution_count": 1,
   "metadata": {"tags": ["setup"]},
   "outputs": [{"name": "stdout", "output_type": "stream", "text": ["1\n"]}],
   "source": ["x = 1\n", "print(x)"]
  }
 ],
 "metadata": {
  "kernelspec": {"display_name": "Python 3", "language": "python", "name": "python3"}
 },
 "nbformat": 4,
 "nbformat_minor": 5
}"##;

    #[test]
    fn test_parse_sample_notebook() {
        let nb = parse_notebook(SAMPLE.as_bytes()).unwrap();

        assert_eq!(nb.nbformat, 4);
        assert_eq!(nb.nbformat_minor, 5);
        assert_eq!(nb.cells.len(), 2);
        assert_eq!(nb.cells[0].cell_type, CellType::Markdown);
        assert_eq!(nb.cells[0].source, "# Title\n\nSome text.");
        assert_eq!(nb.cells[1].cell_type, CellType::Code);
        assert_eq!(nb.cells[1].source, "x = 1\nprint(x)");
        assert_eq!(nb.cells[1].execution_count, Some(1));
        assert_eq!(nb.cells[1].outputs.len(), 1);
        assert_eq!(nb.cells[1].tags(), vec!["setup"]);
        assert_eq!(nb.language(), Some("python"));
    }

    #[test]
    fn test_parse_with_byte_order_mark() {
        let bytes = format!("\u{feff}{SAMPLE}");
        let nb = parse_notebook(bytes.as_bytes()).unwrap();
        assert_eq!(nb.cells.len(), 2);
    }

    #[test]
    fn test_parse_without_cells() {
        let nb = parse_notebook(br#"{"nbformat": 4, "nbformat_minor": 2, "metadata": {}}"#).unwrap();
        assert!(nb.cells.is_empty());
    }

    #[test]
    fn test_reject_nbformat_3() {
        let err = parse_notebook(br#"{"nbformat": 3, "worksheets": []}"#).unwrap_err();
        assert!(matches!(err, NotebookError::UnsupportedVersion(3)));
    }

    #[test]
    fn test_reject_missing_version() {
        let err = parse_notebook(br#"{"cells": []}"#).unwrap_err();
        assert!(matches!(err, NotebookError::MissingVersion));
    }

    #[test]
    fn test_reject_invalid_json() {
        let err = parse_notebook(b"{ not json").unwrap_err();
        assert!(matches!(err, NotebookError::Json(_)));
    }

    #[test]
    fn test_reject_invalid_utf8() {
        let err = parse_notebook(&[0x7b, 0xff, 0xfe, 0x7d]).unwrap_err();
        assert!(matches!(err, NotebookError::Encoding(_)));
    }

    #[test]
    fn test_reject_unknown_cell_type() {
        let err = parse_notebook(
            br#"{"nbformat": 4, "nbformat_minor": 0, "cells": [{"cell_type": "widget", "source": ""}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, NotebookError::Json(_)));
    }
}
