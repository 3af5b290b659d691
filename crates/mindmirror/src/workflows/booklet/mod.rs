//! Page composition, booklet assembly and PDF output.

pub mod assembler;
pub mod composer;
pub mod layout;
pub mod pdf;

pub use assembler::{booklet_file_name, default_pages, Booklet, BookletAssembler, CoverImage};
pub use composer::{
    fallback_paragraphs, ComposedPage, IllustratedPage, PageComposer, PageSpec, ReportContext,
};
pub use layout::{DrawOp, PageCanvas};
pub use pdf::render_pdf;

#[derive(Debug, thiserror::Error)]
pub enum BookletError {
    #[error("booklet has no renderable pages")]
    Empty,
    #[error("pdf encoding failed: {0}")]
    Pdf(String),
}
