// Report layout: header classification, font metrics, and pagination.
// Pure and synchronous; callers run it inside tokio::task::spawn_blocking.

pub mod document;
pub mod font_metrics;
pub mod headers;
pub mod paginator;

// Re-export the public API consumed by the renderers and the grading pipeline.
pub use document::Document;
pub use font_metrics::{AfmWrapper, FontFace};
pub use headers::{classify, LineClass};
pub use paginator::{paginate, Page, PageGeometry};
