use super::metrics::{line_height, FontStyle};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn components(self) -> [f32; 3] {
        [self.r, self.g, self.b].map(|channel| f32::from(channel) / 255.0)
    }
}

pub const PAGE_BACKGROUND: Rgb = Rgb::new(0xF5, 0xEF, 0xE6);
pub const INK: Rgb = Rgb::new(0x1B, 0x22, 0x36);
pub const ACCENT: Rgb = Rgb::new(0x8A, 0x5A, 0x3C);
pub const RULE: Rgb = Rgb::new(0xC9, 0xBB, 0xA6);

/// Page geometry in points, origin top-left with y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageCanvas {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl Default for PageCanvas {
    fn default() -> Self {
        // 5.5in x 8.5in
        Self {
            width: 396.0,
            height: 612.0,
            margin: 40.0,
        }
    }
}

impl PageCanvas {
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn left(&self) -> f32 {
        self.margin
    }

    pub fn right(&self) -> f32 {
        self.width - self.margin
    }

    pub fn top(&self) -> f32 {
        self.margin
    }

    pub fn bottom(&self) -> f32 {
        self.height - self.margin
    }

    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    pub size: f32,
    pub font: FontStyle,
    pub color: Rgb,
    pub align: Align,
}

impl TextStyle {
    pub const fn new(size: f32, font: FontStyle) -> Self {
        Self {
            size,
            font,
            color: INK,
            align: Align::Left,
        }
    }

    pub const fn colored(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub const fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn line_height(&self) -> f32 {
        line_height(self.size)
    }
}

/// One entry of a page's rendering program.
///
/// Text `x` is the anchor for `align`; text `y` is the baseline. Rectangles and
/// images are positioned by their top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        font: FontStyle,
        color: Rgb,
        align: Align,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: Rgb,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    Image {
        path: String,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        #[serde(skip)]
        data: Arc<[u8]>,
    },
}

impl DrawOp {
    pub fn text(text: impl Into<String>, x: f32, y: f32, style: TextStyle) -> Self {
        Self::Text {
            text: text.into(),
            x,
            y,
            size: style.size,
            font: style.font,
            color: style.color,
            align: style.align,
        }
    }

    pub fn text_content(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Vertical layout position, returned by every layout step.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Cursor {
    pub y: f32,
}

impl Cursor {
    pub const fn at(y: f32) -> Self {
        Self { y }
    }

    pub fn advance(self, by: f32) -> Self {
        Self { y: self.y + by }
    }

    pub fn max(self, other: Self) -> Self {
        Self {
            y: self.y.max(other.y),
        }
    }
}

/// Accumulates draw operations for one page.
#[derive(Debug, Clone)]
pub struct PageBuilder {
    canvas: PageCanvas,
    ops: Vec<DrawOp>,
    overflow_lines: usize,
}

impl PageBuilder {
    pub fn new(canvas: PageCanvas) -> Self {
        Self {
            canvas,
            ops: Vec::new(),
            overflow_lines: 0,
        }
    }

    pub fn canvas(&self) -> &PageCanvas {
        &self.canvas
    }

    pub fn start(&self) -> Cursor {
        Cursor::at(self.canvas.top())
    }

    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    /// Draws `lines` from `cursor` down, one line height apart.
    ///
    /// Lines that would cross the bottom margin are dropped and counted as
    /// overflow. The returned cursor sits below the last line that fit.
    pub fn lines(&mut self, cursor: Cursor, lines: &[String], x: f32, style: TextStyle) -> Cursor {
        let line_height = style.line_height();
        let mut cursor = cursor;
        for line in lines {
            if cursor.y + line_height > self.canvas.bottom() {
                self.overflow_lines += 1;
                continue;
            }
            if !line.is_empty() {
                self.ops
                    .push(DrawOp::text(line.clone(), x, cursor.y + style.size, style));
            }
            cursor = cursor.advance(line_height);
        }
        cursor
    }

    pub fn line(&mut self, cursor: Cursor, text: impl Into<String>, x: f32, style: TextStyle) -> Cursor {
        self.lines(cursor, &[text.into()], x, style)
    }

    pub fn rule(&mut self, cursor: Cursor, color: Rgb, width: f32) -> Cursor {
        self.ops.push(DrawOp::Line {
            x1: self.canvas.left(),
            y1: cursor.y,
            x2: self.canvas.right(),
            y2: cursor.y,
            width,
            color,
        });
        cursor
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    pub fn overflow_lines(&self) -> usize {
        self.overflow_lines
    }

    pub fn finish(self) -> (Vec<DrawOp>, usize) {
        (self.ops, self.overflow_lines)
    }
}
