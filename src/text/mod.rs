//! # Text Metrics
//!
//! Line breaking and character advances for height measurement.
//!
//! Advances come either from a built-in Helvetica-like table or from a real
//! TrueType/OpenType font parsed with ttf-parser. Break opportunities follow
//! UAX#14 via `unicode-linebreak`; lines are filled greedily, the same way a
//! browser fills a block of prose.

pub mod bidi;

use std::collections::HashMap;

use unicode_linebreak::{linebreaks, BreakOpportunity};

/// Font-independent style inputs of one run of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStyle {
    pub font_size: f64,
    pub bold: bool,
    /// Extra space after every character, in em.
    pub letter_spacing: f64,
    pub uppercase: bool,
}

impl RunStyle {
    pub fn new(font_size: f64, bold: bool) -> Self {
        Self {
            font_size,
            bold,
            letter_spacing: 0.0,
            uppercase: false,
        }
    }
}

/// Bold faces are a little wider than regular ones.
const BOLD_WIDTH_FACTOR: f64 = 1.06;

/// Helvetica advance widths (per 1000 em) for U+0020 ..= U+007E.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' .. '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0' .. '9'
    278, 278, 584, 584, 584, 556, 1015, // ':' .. '@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A' .. 'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N' .. 'Z'
    278, 278, 278, 469, 556, 333, // '[' .. '`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a' .. 'm'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n' .. 'z'
    334, 260, 334, 584, // '{' .. '~'
];

/// Where character advances come from.
#[derive(Debug, Clone, Default)]
pub enum FontMetrics {
    /// Built-in estimates.
    #[default]
    Builtin,
    /// Advances read from a font file.
    Custom(CustomFontMetrics),
}

impl FontMetrics {
    /// Advance of `ch` in px, before letter spacing.
    pub fn char_width(&self, ch: char, font_size: f64, bold: bool) -> f64 {
        let base = match self {
            FontMetrics::Builtin => builtin_width(ch) as f64 / 1000.0 * font_size,
            FontMetrics::Custom(m) => m.char_width(ch, font_size),
        };
        if bold {
            base * BOLD_WIDTH_FACTOR
        } else {
            base
        }
    }
}

fn builtin_width(ch: char) -> u16 {
    let code = ch as u32;
    match code {
        0x20..=0x7E => HELVETICA_ASCII[(code - 0x20) as usize],
        // Zero-width joiners and marks.
        0x200B..=0x200F | 0x0300..=0x036F | 0x064B..=0x065F | 0x0670 => 0,
        0x00A0 => 278,
        // Arabic and Hebrew letters.
        0x0590..=0x06FF | 0x0750..=0x077F | 0xFB50..=0xFEFF => 500,
        // CJK and full-width forms take a full em.
        0x1100..=0x115F | 0x2E80..=0xA4CF | 0xAC00..=0xD7A3 | 0xF900..=0xFAFF | 0xFF00..=0xFF60 => 1000,
        _ => 556,
    }
}

/// Advance widths parsed from a TrueType/OpenType font.
#[derive(Debug, Clone)]
pub struct CustomFontMetrics {
    pub units_per_em: u16,
    pub advance_widths: HashMap<char, u16>,
    pub default_advance: u16,
}

impl CustomFontMetrics {
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let w = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        (w as f64 / self.units_per_em as f64) * font_size
    }

    /// Parse advances from font data. Samples the Basic Multilingual Plane.
    pub fn from_font_data(data: &[u8]) -> Option<Self> {
        let face = ttf_parser::Face::parse(data, 0).ok()?;
        let units_per_em = face.units_per_em();
        if units_per_em == 0 {
            return None;
        }

        let mut advance_widths = HashMap::new();
        let mut default_advance = 0u16;
        for code in 32u32..=0xFFFF {
            if let Some(ch) = char::from_u32(code) {
                if let Some(glyph_id) = face.glyph_index(ch) {
                    let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                    advance_widths.insert(ch, advance);
                    if ch == ' ' {
                        default_advance = advance;
                    }
                }
            }
        }
        if default_advance == 0 {
            default_advance = units_per_em / 2;
        }

        Some(Self {
            units_per_em,
            advance_widths,
            default_advance,
        })
    }
}

/// Compute UAX#14 break opportunities indexed by char position.
///
/// Entry `i` is the opportunity *before* `chars[i]`. Index 0 is always
/// `None`.
fn compute_break_opportunities(text: &str) -> Vec<Option<BreakOpportunity>> {
    let char_count = text.chars().count();
    let mut result = vec![None; char_count];

    let mut byte_to_char = vec![0usize; text.len() + 1];
    let mut char_idx = 0;
    for (byte_idx, _) in text.char_indices() {
        byte_to_char[byte_idx] = char_idx;
        char_idx += 1;
    }
    byte_to_char[text.len()] = char_idx;

    for (byte_offset, opp) in linebreaks(text) {
        let idx = byte_to_char[byte_offset];
        if idx > 0 && idx < char_count {
            result[idx] = Some(opp);
        }
    }
    result
}

fn is_newline(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Number of lines `text` occupies when filled greedily into `max_width`.
///
/// Whitespace-only text takes no lines. Mandatory breaks (newlines) always
/// start a new line. A word wider than the line is broken where it
/// overflows. Trailing spaces hang past the edge, as they do in CSS.
pub fn count_lines(text: &str, max_width: f64, style: RunStyle, metrics: &FontMetrics) -> usize {
    if text.trim().is_empty() {
        return 0;
    }

    let chars: Vec<char> = if style.uppercase {
        text.chars().flat_map(|c| c.to_uppercase()).collect()
    } else {
        text.chars().collect()
    };
    let source: String = chars.iter().collect();
    let spacing = style.letter_spacing * style.font_size;
    let widths: Vec<f64> = chars
        .iter()
        .map(|&ch| {
            if is_newline(ch) {
                0.0
            } else {
                metrics.char_width(ch, style.font_size, style.bold) + spacing
            }
        })
        .collect();
    let break_opps = compute_break_opportunities(&source);

    let mut lines = 1;
    let mut line_start = 0;
    let mut line_width = 0.0;
    let mut last_break_point: Option<usize> = None;

    for (i, &ch) in chars.iter().enumerate() {
        match break_opps[i] {
            Some(BreakOpportunity::Mandatory) => {
                lines += 1;
                line_start = i;
                line_width = 0.0;
                last_break_point = None;
            }
            Some(BreakOpportunity::Allowed) => {
                last_break_point = Some(i);
            }
            None => {}
        }

        if is_newline(ch) {
            continue;
        }

        let w = widths[i];
        if line_width + w > max_width && line_start < i && !ch.is_whitespace() {
            lines += 1;
            match last_break_point {
                Some(bp) if bp > line_start => {
                    line_start = bp;
                    line_width = widths[bp..=i].iter().sum();
                }
                _ => {
                    line_start = i;
                    line_width = w;
                }
            }
            last_break_point = None;
            continue;
        }
        line_width += w;
    }

    lines
}

/// Width of the text on a single line.
pub fn measure_width(text: &str, style: RunStyle, metrics: &FontMetrics) -> f64 {
    let spacing = style.letter_spacing * style.font_size;
    text.chars()
        .filter(|c| !is_newline(*c))
        .map(|ch| metrics.char_width(ch, style.font_size, style.bold) + spacing)
        .sum()
}
