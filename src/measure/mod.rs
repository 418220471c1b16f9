//! # Height Measurement
//!
//! The pagination engine asks one question over and over: how tall is this
//! sequence of blocks at the page's content width? A [`Measurer`] answers it
//! through a [`MeasureSurface`], a measuring area opened once per
//! pagination pass and released when the surface is dropped.
//!
//! [`TextMetricsMeasurer`] computes heights from the same [`ProseStyle`] the
//! renderer turns into CSS: line boxes from greedy UAX#14 line breaking,
//! element margins collapsed between siblings the way CSS collapses them,
//! list indents and item gaps, and table cell padding.

use std::cell::Cell;
use std::collections::HashMap;

use crate::error::MeasureError;
use crate::model::{Block, BlockKind, TableRow};
use crate::style::{CellMetrics, ProseStyle, TextMetrics};
use crate::text::{count_lines, CustomFontMetrics, FontMetrics, RunStyle};

/// A source of measurement surfaces.
pub trait Measurer {
    /// Open a surface that measures at `content_width` px.
    fn begin(&self, content_width: f64) -> Result<Box<dyn MeasureSurface + '_>, MeasureError>;
}

/// A live measuring area. Dropping it releases it.
pub trait MeasureSurface {
    /// Rendered height of `blocks` laid out one after another.
    fn height(&mut self, blocks: &[Block]) -> f64;
}

/// Vertical box of one block: its own height plus its outer margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockBox {
    pub margin_top: f64,
    pub height: f64,
    pub margin_bottom: f64,
}

impl BlockBox {
    fn new(margin_top: f64, height: f64, margin_bottom: f64) -> Self {
        Self {
            margin_top,
            height,
            margin_bottom,
        }
    }
}

/// Stack boxes vertically. Adjacent margins collapse to the larger of the
/// two; the outer margins of the first and last box are kept.
pub fn stack_height(boxes: &[BlockBox]) -> f64 {
    let mut total = 0.0;
    let mut prev_margin: Option<f64> = None;
    for b in boxes {
        total += match prev_margin {
            None => b.margin_top,
            Some(m) => m.max(b.margin_top),
        };
        total += b.height;
        prev_margin = Some(b.margin_bottom);
    }
    total + prev_margin.unwrap_or(0.0)
}

/// Measurer backed by font metrics and the prose stylesheet.
pub struct TextMetricsMeasurer {
    style: ProseStyle,
    font: Result<FontMetrics, String>,
    live: Cell<usize>,
}

impl TextMetricsMeasurer {
    /// Build a measurer for `style`. When `style.font_path` is set the font
    /// is read now; if it cannot be used every later [`Measurer::begin`]
    /// fails with [`MeasureError::Unavailable`].
    pub fn new(style: ProseStyle) -> Self {
        let font = match &style.font_path {
            None => Ok(FontMetrics::Builtin),
            Some(path) => load_font(path),
        };
        if let Err(e) = &font {
            log::warn!("{}", e);
        }
        Self {
            style,
            font,
            live: Cell::new(0),
        }
    }

    /// Build a measurer from font data already in memory.
    pub fn with_font_data(style: ProseStyle, data: &[u8]) -> Self {
        let font = CustomFontMetrics::from_font_data(data)
            .map(FontMetrics::Custom)
            .ok_or_else(|| "font data could not be parsed".to_string());
        Self {
            style,
            font,
            live: Cell::new(0),
        }
    }

    pub fn style(&self) -> &ProseStyle {
        &self.style
    }

    /// Number of surfaces opened and not yet released.
    pub fn live_surfaces(&self) -> usize {
        self.live.get()
    }
}

impl Default for TextMetricsMeasurer {
    fn default() -> Self {
        Self::new(ProseStyle::default())
    }
}

fn load_font(path: &std::path::Path) -> Result<FontMetrics, String> {
    let data = std::fs::read(path)
        .map_err(|e| format!("Failed to read font '{}': {}", path.display(), e))?;
    CustomFontMetrics::from_font_data(&data)
        .map(FontMetrics::Custom)
        .ok_or_else(|| format!("Failed to parse font '{}'", path.display()))
}

impl Measurer for TextMetricsMeasurer {
    fn begin(&self, content_width: f64) -> Result<Box<dyn MeasureSurface + '_>, MeasureError> {
        if !content_width.is_finite() || content_width <= 0.0 {
            return Err(MeasureError::Unavailable(format!(
                "content width {content_width} is not a positive length"
            )));
        }
        let font = self
            .font
            .as_ref()
            .map_err(|e| MeasureError::Unavailable(e.clone()))?;

        self.live.set(self.live.get() + 1);
        log::trace!("measure surface opened at {:.2}px", content_width);
        Ok(Box::new(TextSurface {
            style: &self.style,
            font,
            width: content_width,
            cache: HashMap::new(),
            live: &self.live,
        }))
    }
}

/// Per-pass surface. Caches block boxes by markup.
struct TextSurface<'a> {
    style: &'a ProseStyle,
    font: &'a FontMetrics,
    width: f64,
    cache: HashMap<String, BlockBox>,
    live: &'a Cell<usize>,
}

impl Drop for TextSurface<'_> {
    fn drop(&mut self) {
        self.live.set(self.live.get().saturating_sub(1));
        log::trace!("measure surface released ({} cached boxes)", self.cache.len());
    }
}

impl MeasureSurface for TextSurface<'_> {
    fn height(&mut self, blocks: &[Block]) -> f64 {
        let boxes: Vec<BlockBox> = blocks.iter().map(|b| self.block_box(b)).collect();
        stack_height(&boxes)
    }
}

impl TextSurface<'_> {
    fn block_box(&mut self, block: &Block) -> BlockBox {
        if let Some(b) = self.cache.get(&block.markup) {
            return *b;
        }
        let b = self.compute_box(block);
        self.cache.insert(block.markup.clone(), b);
        b
    }

    fn compute_box(&self, block: &Block) -> BlockBox {
        let style = self.style;
        match &block.kind {
            BlockKind::Heading { level } => self.text_box(&block.text, style.heading(*level), self.width),
            BlockKind::Paragraph => self.text_box(&block.text, &style.paragraph, self.width),
            BlockKind::Other => self.text_box(&block.text, &style.other, self.width),
            BlockKind::ListItem => {
                let h = self.item_height(&block.text);
                BlockBox::new(style.list_item.margin_top, h, style.list_item.margin_bottom)
            }
            BlockKind::List { .. } => {
                let height = if block.children.is_empty() {
                    self.item_height(&block.text)
                } else {
                    self.items_height(&block.children)
                };
                BlockBox::new(style.list.margin_top, height, style.list.margin_bottom)
            }
            BlockKind::Table { rows } => {
                let height = if rows.is_empty() {
                    let fallback = TableRow {
                        header: false,
                        cells: vec![block.text.clone()],
                    };
                    self.row_height(&fallback, 1)
                } else {
                    let columns = rows.iter().map(|r| r.cells.len()).max().unwrap_or(1).max(1);
                    rows.iter().map(|r| self.row_height(r, columns)).sum()
                };
                BlockBox::new(style.table.margin_top, height, style.table.margin_bottom)
            }
            BlockKind::Image { width, height } => {
                let h = self.image_height(*width, *height);
                BlockBox::new(style.image.margin_top, h, style.image.margin_bottom)
            }
            BlockKind::ScaledTable { frame_height, .. } => BlockBox::new(0.0, *frame_height, 0.0),
        }
    }

    fn text_box(&self, text: &str, m: &TextMetrics, width: f64) -> BlockBox {
        let lines = count_lines(text, width, RunStyle::new(m.font_size, m.is_bold()), self.font);
        BlockBox::new(m.margin_top, lines as f64 * m.line_box(), m.margin_bottom)
    }

    /// One list item at the indented width. An item always shows at least
    /// its marker line.
    fn item_height(&self, text: &str) -> f64 {
        let m = &self.style.list_item;
        let width = (self.width - self.style.list.indent).max(1.0);
        let lines = count_lines(text, width, RunStyle::new(m.font_size, m.is_bold()), self.font).max(1);
        lines as f64 * m.line_box()
    }

    fn items_height(&self, items: &[Block]) -> f64 {
        let m = &self.style.list_item;
        let gap = self.style.list.item_gap;
        let boxes: Vec<BlockBox> = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let top = if i == 0 { m.margin_top } else { m.margin_top + gap };
                BlockBox::new(top, self.item_height(&item.text), m.margin_bottom)
            })
            .collect();
        stack_height(&boxes)
    }

    fn row_height(&self, row: &TableRow, columns: usize) -> f64 {
        let cell: &CellMetrics = if row.header {
            &self.style.table.header
        } else {
            &self.style.table.body
        };
        let text = cell.text();
        let run = RunStyle {
            font_size: text.font_size,
            bold: text.is_bold(),
            letter_spacing: cell.letter_spacing,
            uppercase: cell.uppercase,
        };
        let inner = (self.width / columns as f64 - 2.0 * cell.padding_x).max(1.0);
        let lines = row
            .cells
            .iter()
            .map(|c| count_lines(c, inner, run, self.font))
            .max()
            .unwrap_or(0)
            .max(1);
        lines as f64 * text.line_box() + 2.0 * cell.padding_y + cell.border
    }

    fn image_height(&self, width: Option<f64>, height: Option<f64>) -> f64 {
        let aspect = self.style.image.fallback_aspect;
        match (width, height) {
            (Some(w), Some(h)) if w > 0.0 => {
                let shown = w.min(self.width);
                h * shown / w
            }
            (Some(w), None) if w > 0.0 => w.min(self.width) * aspect,
            (None, Some(h)) => h,
            _ => self.width * aspect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurer() -> TextMetricsMeasurer {
        TextMetricsMeasurer::default()
    }

    #[test]
    fn empty_sequence_has_no_height() {
        let m = measurer();
        let mut surface = m.begin(700.0).unwrap();
        assert_eq!(surface.height(&[]), 0.0);
    }

    #[test]
    fn paragraph_height_is_lines_plus_margins() {
        let m = measurer();
        let mut surface = m.begin(700.0).unwrap();
        let h = surface.height(&[Block::paragraph("Short line.")]);
        let p = ProseStyle::default().paragraph;
        assert!((h - (p.line_box() + p.margin_bottom)).abs() < 1e-9);
    }

    #[test]
    fn longer_text_is_taller() {
        let m = measurer();
        let mut surface = m.begin(300.0).unwrap();
        let short = surface.height(&[Block::paragraph("word")]);
        let long = surface.height(&[Block::paragraph(&"word ".repeat(80))]);
        assert!(long > short * 5.0);
    }

    #[test]
    fn sibling_margins_collapse() {
        let boxes = [BlockBox::new(10.0, 20.0, 12.0), BlockBox::new(24.0, 30.0, 5.0)];
        // 10 + 20 + max(12, 24) + 30 + 5
        assert_eq!(stack_height(&boxes), 89.0);
    }

    #[test]
    fn height_is_monotonic_in_prefix() {
        let m = measurer();
        let mut surface = m.begin(700.0).unwrap();
        let blocks = vec![
            Block::heading(1, "Title"),
            Block::paragraph("First paragraph of text."),
            Block::list(false, vec![Block::list_item("a"), Block::list_item("b")]),
            Block::paragraph("Closing."),
        ];
        let mut last = 0.0;
        for n in 1..=blocks.len() {
            let h = surface.height(&blocks[..n]);
            assert!(h > last);
            last = h;
        }
    }

    #[test]
    fn list_grows_per_item() {
        let m = measurer();
        let mut surface = m.begin(700.0).unwrap();
        let items: Vec<Block> = (0..5).map(|i| Block::list_item(&format!("item {i}"))).collect();
        let list = Block::list(false, items);
        let one = surface.height(&[list.list_slice(0..1)]);
        let two = surface.height(&[list.list_slice(0..2)]);
        let style = ProseStyle::default();
        let step = style.list_item.line_box() + style.list.item_gap;
        assert!((two - one - step).abs() < 1e-9);
    }

    #[test]
    fn table_rows_add_up() {
        let m = measurer();
        let mut surface = m.begin(700.0).unwrap();
        let row = |header: bool| TableRow {
            header,
            cells: vec!["a".into(), "b".into()],
        };
        let small = surface.height(&[Block::table(vec![row(true), row(false)])]);
        let big = surface.height(&[Block::table(vec![row(true), row(false), row(false)])]);
        let body = ProseStyle::default().table.body;
        let body_row = body.text().line_box() + 2.0 * body.padding_y + body.border;
        assert!((big - small - body_row).abs() < 1e-9);
    }

    #[test]
    fn scaled_table_is_its_frame() {
        let m = measurer();
        let mut surface = m.begin(700.0).unwrap();
        let table = Block::table(vec![TableRow {
            header: false,
            cells: vec!["x".into()],
        }]);
        let scaled = Block::scaled_table(table, 0.5, 321.0);
        assert_eq!(surface.height(&[scaled]), 321.0);
    }

    #[test]
    fn heading_plus_frame_is_additive() {
        let m = measurer();
        let mut surface = m.begin(700.0).unwrap();
        let heading = Block::heading(2, "Pricing");
        let alone = surface.height(&[heading.clone()]);
        let table = Block::table(vec![TableRow {
            header: false,
            cells: vec!["x".into()],
        }]);
        let pair = surface.height(&[heading, Block::scaled_table(table, 0.5, 200.0)]);
        assert!((pair - alone - 200.0).abs() < 1e-9);
    }

    #[test]
    fn images_scale_to_width() {
        let m = measurer();
        let mut surface = m.begin(400.0).unwrap();
        let img = |w, h| {
            Block::new(BlockKind::Image { width: w, height: h }, format!("<img w={w:?} h={h:?}>"), "")
        };
        let mb = ProseStyle::default().image.margin_bottom;
        assert_eq!(surface.height(&[img(Some(800.0), Some(600.0))]), 300.0 + mb);
        assert_eq!(surface.height(&[img(Some(200.0), Some(100.0))]), 100.0 + mb);
        assert_eq!(surface.height(&[img(None, None)]), 300.0 + mb);
    }

    #[test]
    fn surfaces_are_released_on_drop() {
        let m = measurer();
        {
            let _a = m.begin(500.0).unwrap();
            let _b = m.begin(500.0).unwrap();
            assert_eq!(m.live_surfaces(), 2);
        }
        assert_eq!(m.live_surfaces(), 0);
    }

    #[test]
    fn bad_width_is_unavailable() {
        let m = measurer();
        assert!(matches!(m.begin(0.0), Err(MeasureError::Unavailable(_))));
        assert!(matches!(m.begin(f64::NAN), Err(MeasureError::Unavailable(_))));
        assert_eq!(m.live_surfaces(), 0);
    }

    #[test]
    fn unreadable_font_is_unavailable() {
        let style = ProseStyle {
            font_path: Some("/no/such/font.ttf".into()),
            ..ProseStyle::default()
        };
        let m = TextMetricsMeasurer::new(style);
        assert!(matches!(m.begin(700.0), Err(MeasureError::Unavailable(_))));

        let m = TextMetricsMeasurer::with_font_data(ProseStyle::default(), b"garbage");
        assert!(m.begin(700.0).is_err());
    }
}
