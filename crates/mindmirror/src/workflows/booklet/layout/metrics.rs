use serde::{Deserialize, Serialize};

/// Baseline-to-baseline distance as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.15;

const DEFAULT_ADVANCE: u16 = 556;

/// Standard Helvetica family faces available without embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

impl FontStyle {
    pub const fn ordered() -> [Self; 3] {
        [Self::Regular, Self::Bold, Self::Italic]
    }

    pub const fn base_font(self) -> &'static str {
        match self {
            Self::Regular => "Helvetica",
            Self::Bold => "Helvetica-Bold",
            Self::Italic => "Helvetica-Oblique",
        }
    }

    pub const fn resource_name(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
            Self::Italic => "F3",
        }
    }

    fn widths(self) -> &'static [u16; 95] {
        match self {
            Self::Regular | Self::Italic => &HELVETICA_WIDTHS,
            Self::Bold => &HELVETICA_BOLD_WIDTHS,
        }
    }
}

// Advance widths in 1/1000 em for code points 32..=126.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

fn advance(ch: char, style: FontStyle) -> u16 {
    let code = ch as u32;
    if (32..=126).contains(&code) {
        return style.widths()[(code - 32) as usize];
    }

    match ch {
        '\u{2018}' | '\u{2019}' => match style {
            FontStyle::Bold => 278,
            _ => 222,
        },
        '\u{201c}' | '\u{201d}' => 333,
        '\u{2013}' => 556,
        '\u{2014}' | '\u{2026}' => 1000,
        '\u{2022}' => 350,
        '\u{a0}' => 278,
        _ => DEFAULT_ADVANCE,
    }
}

pub fn text_width(text: &str, style: FontStyle, size: f32) -> f32 {
    let units: u32 = text.chars().map(|ch| u32::from(advance(ch, style))).sum();
    units as f32 * size / 1000.0
}

pub fn line_height(size: f32) -> f32 {
    size * LINE_HEIGHT_FACTOR
}

/// Greedy word wrap. Explicit newlines always break; a word wider than
/// `max_width` is split across lines at character boundaries.
pub fn wrap(text: &str, style: FontStyle, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for segment in text.split('\n') {
        wrap_segment(segment, style, size, max_width, &mut lines);
    }
    lines
}

fn wrap_segment(segment: &str, style: FontStyle, size: f32, max_width: f32, lines: &mut Vec<String>) {
    let space = text_width(" ", style, size);
    let mut current = String::new();
    let mut current_width = 0.0_f32;
    let mut emitted = false;

    for word in segment.split_whitespace() {
        let word_width = text_width(word, style, size);

        if !current.is_empty() && current_width + space + word_width <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width += space + word_width;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            emitted = true;
        }

        if word_width <= max_width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        current_width = 0.0;
        for ch in word.chars() {
            let ch_width = f32::from(advance(ch, style)) * size / 1000.0;
            if !current.is_empty() && current_width + ch_width > max_width {
                lines.push(std::mem::take(&mut current));
                emitted = true;
                current_width = 0.0;
            }
            current.push(ch);
            current_width += ch_width;
        }
    }

    if !current.is_empty() || !emitted {
        lines.push(current);
    }
}
