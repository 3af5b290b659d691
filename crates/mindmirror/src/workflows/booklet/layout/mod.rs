pub mod canvas;
pub mod metrics;

pub use canvas::{
    Align, Cursor, DrawOp, PageBuilder, PageCanvas, Rgb, TextStyle, ACCENT, INK, PAGE_BACKGROUND,
    RULE,
};
pub use metrics::{line_height, text_width, wrap, FontStyle};
