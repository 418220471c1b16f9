//! # Prose Style
//!
//! The typographic rules for page content. One `ProseStyle` drives both
//! sides of the pipeline: the measurer computes heights from it, and the
//! renderer turns it into the CSS of the final frames. Keeping a single
//! source is what makes a measured chunk fit once it is printed.
//!
//! All lengths are CSS px.

use std::fmt::Write as _;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Text direction of a chunk or a title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    /// Value for the HTML `dir` attribute.
    pub fn as_attr(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }

    pub fn text_align(&self) -> &'static str {
        match self {
            Direction::Ltr => "left",
            Direction::Rtl => "right",
        }
    }
}

/// Typography of one kind of text block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMetrics {
    pub font_size: f64,
    /// Line height as a multiplier of font size.
    pub line_height: f64,
    #[serde(default)]
    pub margin_top: f64,
    #[serde(default)]
    pub margin_bottom: f64,
    #[serde(default = "default_weight")]
    pub font_weight: u32,
}

fn default_weight() -> u32 {
    400
}

impl TextMetrics {
    pub const fn new(font_size: f64, line_height: f64, margin_top: f64, margin_bottom: f64, font_weight: u32) -> Self {
        Self {
            font_size,
            line_height,
            margin_top,
            margin_bottom,
            font_weight,
        }
    }

    /// Height of one line box.
    pub fn line_box(&self) -> f64 {
        self.font_size * self.line_height
    }

    pub fn is_bold(&self) -> bool {
        self.font_weight >= 600
    }
}

/// List box rules: outer margins, item indent and the gap between items.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMetrics {
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub indent: f64,
    pub item_gap: f64,
}

/// Cell rules for one row kind (header or body).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellMetrics {
    pub font_size: f64,
    pub line_height: f64,
    pub font_weight: u32,
    pub padding_x: f64,
    pub padding_y: f64,
    /// Bottom border width.
    pub border: f64,
    /// Letter spacing in em.
    #[serde(default)]
    pub letter_spacing: f64,
    #[serde(default)]
    pub uppercase: bool,
}

impl CellMetrics {
    pub fn text(&self) -> TextMetrics {
        TextMetrics::new(self.font_size, self.line_height, 0.0, 0.0, self.font_weight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMetrics {
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub header: CellMetrics,
    pub body: CellMetrics,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetrics {
    pub margin_top: f64,
    pub margin_bottom: f64,
    /// Height / width ratio used when the intrinsic size is unknown.
    pub fallback_aspect: f64,
}

/// The complete content stylesheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProseStyle {
    /// `h1` .. `h6`, in order.
    pub headings: [TextMetrics; 6],
    pub paragraph: TextMetrics,
    pub list_item: TextMetrics,
    pub list: ListMetrics,
    pub table: TableMetrics,
    pub image: ImageMetrics,
    /// Blocks the parser classified as `Other`.
    pub other: TextMetrics,
    /// Font family used in the generated CSS.
    pub font_family: String,
    /// A TrueType/OpenType file whose advance widths replace the built-in
    /// estimates during measurement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
}

impl Default for ProseStyle {
    fn default() -> Self {
        Self {
            headings: [
                TextMetrics::new(30.0, 1.2, 24.0, 16.0, 700),
                TextMetrics::new(24.0, 1.333, 20.0, 12.0, 700),
                TextMetrics::new(20.0, 1.4, 16.0, 8.0, 700),
                TextMetrics::new(18.0, 1.556, 12.0, 8.0, 600),
                TextMetrics::new(14.0, 1.5, 12.0, 8.0, 700),
                TextMetrics::new(14.0, 1.5, 12.0, 8.0, 700),
            ],
            paragraph: TextMetrics::new(14.0, 1.625, 0.0, 12.0, 400),
            list_item: TextMetrics::new(14.0, 1.625, 0.0, 0.0, 400),
            list: ListMetrics {
                margin_top: 16.0,
                margin_bottom: 16.0,
                indent: 24.0,
                item_gap: 8.0,
            },
            table: TableMetrics {
                margin_top: 24.0,
                margin_bottom: 24.0,
                header: CellMetrics {
                    font_size: 14.0,
                    line_height: 1.5,
                    font_weight: 700,
                    padding_x: 20.0,
                    padding_y: 16.0,
                    border: 2.0,
                    letter_spacing: 0.05,
                    uppercase: true,
                },
                body: CellMetrics {
                    font_size: 14.0,
                    line_height: 1.5,
                    font_weight: 400,
                    padding_x: 20.0,
                    padding_y: 14.0,
                    border: 1.0,
                    letter_spacing: 0.0,
                    uppercase: false,
                },
            },
            image: ImageMetrics {
                margin_top: 0.0,
                margin_bottom: 12.0,
                fallback_aspect: 0.75,
            },
            other: TextMetrics::new(14.0, 1.5, 16.0, 16.0, 400),
            font_family: "Helvetica, Arial, sans-serif".to_string(),
            font_path: None,
        }
    }
}

impl ProseStyle {
    /// Metrics for a heading level (clamped to 1..=6).
    pub fn heading(&self, level: u8) -> &TextMetrics {
        let idx = (level.clamp(1, 6) - 1) as usize;
        &self.headings[idx]
    }

    /// Render the stylesheet as CSS scoped under `scope` (e.g. `.prose`).
    pub fn to_css(&self, scope: &str) -> String {
        let mut css = String::new();
        let _ = writeln!(
            css,
            "{scope} {{ font-family: {}; font-size: 14px; line-height: 1.5; }}",
            self.font_family
        );
        for (i, h) in self.headings.iter().enumerate() {
            write_text_rule(&mut css, scope, &format!("h{}", i + 1), h);
        }
        write_text_rule(&mut css, scope, "p", &self.paragraph);
        write_text_rule(&mut css, scope, "li", &self.list_item);
        let l = &self.list;
        let _ = writeln!(
            css,
            "{scope} ul, {scope} ol {{ margin: {}px 0 {}px 0; padding-inline-start: {}px; }}",
            l.margin_top, l.margin_bottom, l.indent
        );
        let _ = writeln!(css, "{scope} ul {{ list-style: disc; }} {scope} ol {{ list-style: decimal; }}");
        let _ = writeln!(css, "{scope} li + li {{ margin-top: {}px; }}", l.item_gap);
        let t = &self.table;
        let _ = writeln!(
            css,
            "{scope} table {{ width: 100%; border-collapse: collapse; border-spacing: 0; margin: {}px 0 {}px 0; }}",
            t.margin_top, t.margin_bottom
        );
        write_cell_rule(&mut css, scope, "th", &t.header);
        write_cell_rule(&mut css, scope, "td", &t.body);
        let img = &self.image;
        let _ = writeln!(
            css,
            "{scope} img {{ display: block; max-width: 100%; margin: {}px 0 {}px 0; }}",
            img.margin_top, img.margin_bottom
        );
        let _ = writeln!(
            css,
            "{scope} blockquote, {scope} pre, {scope} hr {{ margin: {}px 0 {}px 0; }}",
            self.other.margin_top, self.other.margin_bottom
        );
        css
    }
}

fn write_text_rule(css: &mut String, scope: &str, selector: &str, m: &TextMetrics) {
    let _ = writeln!(
        css,
        "{scope} {selector} {{ font-size: {}px; line-height: {}; font-weight: {}; margin: {}px 0 {}px 0; }}",
        m.font_size, m.line_height, m.font_weight, m.margin_top, m.margin_bottom
    );
}

fn write_cell_rule(css: &mut String, scope: &str, selector: &str, c: &CellMetrics) {
    let _ = writeln!(
        css,
        "{scope} {selector} {{ font-size: {}px; line-height: {}; font-weight: {}; padding: {}px {}px; \
         border: none; border-bottom: {}px solid #e2e8f0; letter-spacing: {}em;{} }}",
        c.font_size,
        c.line_height,
        c.font_weight,
        c.padding_y,
        c.padding_x,
        c.border,
        c.letter_spacing,
        if c.uppercase { " text-transform: uppercase;" } else { "" }
    );
}
