//! Jupyter notebook (nbformat v4) text extraction.
//!
//! Only cell types and sources are read; outputs, metadata and execution
//! counts are ignored by serde.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotebookError {
    #[error("notebook is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("notebook is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Code,
    Markdown,
    Raw,
    #[serde(other)]
    Other,
}

/// nbformat allows a cell source as one string or as a list of line strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum CellSource {
    Text(String),
    Lines(Vec<String>),
}

impl Default for CellSource {
    fn default() -> Self {
        CellSource::Text(String::new())
    }
}

impl CellSource {
    fn into_text(self) -> String {
        match self {
            CellSource::Text(text) => text,
            CellSource::Lines(lines) => lines.concat(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCell {
    cell_type: CellType,
    #[serde(default)]
    source: CellSource,
}

#[derive(Debug, Deserialize)]
struct RawNotebook {
    #[serde(default)]
    cells: Vec<RawCell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub cell_type: CellType,
    pub source: String,
}

/// The cells of one uploaded notebook, in document order.
#[derive(Debug, Clone, Default)]
pub struct Notebook {
    pub cells: Vec<Cell>,
}

impl Notebook {
    /// Parses notebook bytes. A document without a `cells` array has no cells.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, NotebookError> {
        let text = std::str::from_utf8(bytes)?;
        let raw: RawNotebook = serde_json::from_str(text)?;
        Ok(Self {
            cells: raw
                .cells
                .into_iter()
                .map(|c| Cell {
                    cell_type: c.cell_type,
                    source: c.source.into_text(),
                })
                .collect(),
        })
    }

    fn sources_of(&self, cell_type: CellType) -> Vec<&str> {
        self.cells
            .iter()
            .filter(|c| c.cell_type == cell_type)
            .map(|c| c.source.as_str())
            .collect()
    }

    pub fn code_cells(&self) -> Vec<&str> {
        self.sources_of(CellType::Code)
    }

    pub fn markdown_cells(&self) -> Vec<&str> {
        self.sources_of(CellType::Markdown)
    }

    /// All code cells, then all markdown cells, separated by blank lines.
    pub fn combined_content(&self) -> String {
        let mut parts = self.code_cells();
        parts.extend(self.markdown_cells());
        parts.join("\n\n")
    }

    /// Code cells only, one per line group; input for the code analysis.
    pub fn code_content(&self) -> String {
        self.code_cells().join("\n")
    }
}
