//! # Content Model
//!
//! The input representation for the pagination engine. One content page is a
//! flat, ordered sequence of top-level [`Block`]s (the block tree). Blocks are
//! immutable values: the engine never edits one in place, it only reads them
//! and, for the two derived kinds (a slice of a list, a scaled table), builds
//! new blocks out of existing ones.
//!
//! Only lists carry meaningful children (their items). Tables keep their row
//! and cell text in [`BlockKind::Table`] for measurement, but are never split.

pub mod proposal;

use std::fmt::Write as _;
use std::ops::Range;

use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};

use crate::config::FrameConfig;

/// Smallest height budget a chunk may have. Smaller (or non-finite) budgets
/// are clamped up to this so the fill loop always has room to make progress.
pub const MIN_PAGE_HEIGHT: f64 = 48.0;

/// One logical unit of rich content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// What kind of block this is.
    pub kind: BlockKind,

    /// The serialized markup fragment for this block.
    pub markup: String,

    /// Plain text content, used for measurement and direction detection.
    #[serde(default)]
    pub text: String,

    /// Element attributes in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,

    /// Child blocks. List items for lists, the wrapped table for a scaled
    /// table, empty otherwise.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Block>,
}

/// The different kinds of blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BlockKind {
    /// `<h1>` .. `<h6>`.
    Heading { level: u8 },

    Paragraph,

    /// `<ul>` or `<ol>`. `start` is the number of the first item.
    List {
        ordered: bool,
        #[serde(default = "default_one")]
        start: i64,
    },

    ListItem,

    /// A table. Rows are kept for measurement only.
    Table {
        #[serde(default)]
        rows: Vec<TableRow>,
    },

    /// An image, with its display size in px when known.
    Image {
        #[serde(default)]
        width: Option<f64>,
        #[serde(default)]
        height: Option<f64>,
    },

    /// Anything else (blockquote, pre, hr, stray inline content).
    Other,

    /// Fixed-height wrapper around a uniformly shrunk table. Produced by the
    /// engine only, never by the parser.
    ScaledTable { scale: f64, frame_height: f64 },
}

/// One row of a table: whether it is a header row, plus each cell's text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub header: bool,
    pub cells: Vec<String>,
}

fn default_one() -> i64 {
    1
}

impl Block {
    pub fn new(kind: BlockKind, markup: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind,
            markup: markup.into(),
            text: text.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Vec<(String, String)>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }

    /// Create a heading block from plain text.
    pub fn heading(level: u8, text: &str) -> Self {
        let level = level.clamp(1, 6);
        Self::new(
            BlockKind::Heading { level },
            format!("<h{level}>{}</h{level}>", escape(text)),
            text,
        )
    }

    /// Create a paragraph block from plain text.
    pub fn paragraph(text: &str) -> Self {
        Self::new(BlockKind::Paragraph, format!("<p>{}</p>", escape(text)), text)
    }

    /// Create a list item from plain text.
    pub fn list_item(text: &str) -> Self {
        Self::new(BlockKind::ListItem, format!("<li>{}</li>", escape(text)), text)
    }

    /// Create a list from items. The markup is rebuilt from the items.
    pub fn list(ordered: bool, items: Vec<Block>) -> Self {
        Self::assemble_list(ordered, 1, &[], items)
    }

    /// Create a table from rows of plain-text cells.
    pub fn table(rows: Vec<TableRow>) -> Self {
        let mut markup = String::from("<table>");
        let mut text = String::new();
        for row in &rows {
            let cell_tag = if row.header { "th" } else { "td" };
            markup.push_str("<tr>");
            for cell in &row.cells {
                let _ = write!(markup, "<{cell_tag}>{}</{cell_tag}>", escape(cell.as_str()));
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(cell);
            }
            markup.push_str("</tr>");
        }
        markup.push_str("</table>");
        Self::new(BlockKind::Table { rows }, markup, text)
    }

    /// Look up an attribute by (ASCII case-insensitive) name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_heading(&self) -> bool {
        matches!(self.kind, BlockKind::Heading { .. })
    }

    pub fn is_table(&self) -> bool {
        matches!(self.kind, BlockKind::Table { .. })
    }

    /// A list with at least one item, i.e. something the engine can split.
    pub fn is_splittable_list(&self) -> bool {
        matches!(self.kind, BlockKind::List { .. }) && !self.children.is_empty()
    }

    /// Build a list of the same kind holding only the items in `range`.
    ///
    /// Ordered lists keep their numbering: a slice starting at item 12 of a
    /// list that starts at 1 gets `start="13"`.
    pub fn list_slice(&self, range: Range<usize>) -> Block {
        let (ordered, start) = match self.kind {
            BlockKind::List { ordered, start } => (ordered, start),
            _ => (false, 1),
        };
        let end = range.end.min(self.children.len());
        let begin = range.start.min(end);
        let items = self.children[begin..end].to_vec();
        let offset = i64::try_from(begin).unwrap_or(i64::MAX);
        Self::assemble_list(ordered, start.saturating_add(offset), &self.attributes, items)
    }

    fn assemble_list(
        ordered: bool,
        start: i64,
        attributes: &[(String, String)],
        items: Vec<Block>,
    ) -> Block {
        let tag = if ordered { "ol" } else { "ul" };
        let mut attrs: Vec<(String, String)> = attributes
            .iter()
            .filter(|(k, _)| !k.eq_ignore_ascii_case("start"))
            .cloned()
            .collect();
        if ordered && start != 1 {
            attrs.push(("start".to_string(), start.to_string()));
        }

        let mut markup = open_tag(tag, &attrs);
        for item in &items {
            markup.push_str(&item.markup);
        }
        let _ = write!(markup, "</{tag}>");

        let text = items
            .iter()
            .map(|item| item.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Block::new(BlockKind::List { ordered, start }, markup, text)
            .with_attributes(attrs)
            .with_children(items)
    }

    /// Wrap `table` in a fixed-height frame that shows it shrunk by `scale`.
    pub fn scaled_table(table: Block, scale: f64, frame_height: f64) -> Block {
        let scale = scale.clamp(f64::EPSILON, 1.0);
        let markup = format!(
            "<div class=\"scaled-table\" style=\"height:{frame_height:.2}px;overflow:hidden\">\
             <div style=\"transform:scale({scale:.4});transform-origin:top left;width:{:.2}%\">{}</div></div>",
            100.0 / scale,
            table.markup
        );
        let text = table.text.clone();
        Block::new(BlockKind::ScaledTable { scale, frame_height }, markup, text)
            .with_children(vec![table])
    }
}

/// Serialize an opening tag with escaped attribute values.
pub(crate) fn open_tag(tag: &str, attributes: &[(String, String)]) -> String {
    let mut out = format!("<{tag}");
    for (name, value) in attributes {
        let _ = write!(out, " {}=\"{}\"", name, escape(value.as_str()));
    }
    out.push('>');
    out
}

/// Page content width plus the height budgets for the first and the
/// following pages, in CSS px.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConstraint {
    pub content_width: f64,
    pub first_page_max_height: f64,
    pub other_page_max_height: f64,
}

impl LayoutConstraint {
    pub fn new(content_width: f64, first_page_max_height: f64, other_page_max_height: f64) -> Self {
        Self {
            content_width,
            first_page_max_height,
            other_page_max_height,
        }
    }

    /// Derive the constraint from page frame geometry.
    ///
    /// The first page gets the taller budget: later pages reserve the
    /// continuation gap at the top of the body.
    pub fn from_frame(frame: &FrameConfig) -> Self {
        let (page_w, page_h) = frame.page_size.dimensions();
        let content_width = page_w - frame.body_padding.horizontal();
        let first = page_h - frame.header_height - frame.footer_height - frame.body_padding.vertical();
        Self {
            content_width,
            first_page_max_height: first,
            other_page_max_height: first - frame.continuation_gap,
        }
    }

    /// Height budget for the chunk at `index`.
    pub fn max_height_for(&self, index: usize) -> f64 {
        if index == 0 {
            self.first_page_max_height
        } else {
            self.other_page_max_height
        }
    }

    /// Clamp the budgets to [`MIN_PAGE_HEIGHT`]. Returns the sanitized
    /// constraint and whether anything had to change.
    pub fn sanitized(&self) -> (Self, bool) {
        let clamp = |h: f64| {
            if h.is_finite() && h >= MIN_PAGE_HEIGHT {
                h
            } else {
                MIN_PAGE_HEIGHT
            }
        };
        let fixed = Self {
            content_width: self.content_width,
            first_page_max_height: clamp(self.first_page_max_height),
            other_page_max_height: clamp(self.other_page_max_height),
        };
        let changed = fixed.first_page_max_height != self.first_page_max_height
            || fixed.other_page_max_height != self.other_page_max_height;
        (fixed, changed)
    }
}

/// Standard page sizes, in CSS px at 96 dpi.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in px.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (793.7, 1122.52),
            PageSize::A3 => (1122.52, 1587.4),
            PageSize::A5 => (559.37, 793.7),
            PageSize::Letter => (816.0, 1056.0),
            PageSize::Legal => (816.0, 1344.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }

    /// The CSS `@page size` value.
    pub fn css_size(&self) -> String {
        match self {
            PageSize::A4 => "A4".to_string(),
            PageSize::A3 => "A3".to_string(),
            PageSize::A5 => "A5".to_string(),
            PageSize::Letter => "letter".to_string(),
            PageSize::Legal => "legal".to_string(),
            PageSize::Custom { width, height } => format!("{width}px {height}px"),
        }
    }
}

/// Edge values (top, right, bottom, left), used for frame padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}
