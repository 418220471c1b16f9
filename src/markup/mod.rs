//! # Markup Parser
//!
//! Turns one page's rich-text HTML into the block tree the engine consumes.
//!
//! Parsing happens in two steps. First a small element tree is built from
//! quick-xml events, tolerating the usual editor HTML quirks: void elements
//! written without a closing slash (`<br>`, `<img ...>`), unclosed `<li>` and
//! `<p>`, stray end tags and HTML entities such as `&nbsp;`. Then each
//! top-level node becomes one [`Block`] whose `markup` is the exact source
//! slice it came from, so chunks can be re-serialized without loss.
//!
//! Generic containers (`div`, `section`, ...) that hold block-level children
//! are flattened into those children: a wrapper would otherwise turn a whole
//! page into one unbreakable block.

mod entities;

use std::ops::Range;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::PaginatorError;
use crate::image_probe::image_dimensions;
use crate::model::{Block, BlockKind, TableRow};

/// Elements that never have content or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements that start a new block and implicitly close an open `<p>`.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "div", "dl", "fieldset", "figure", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "main", "nav", "ol", "p", "pre",
    "section", "table", "ul",
];

/// Containers that are flattened when they hold block-level children.
const TRANSPARENT_CONTAINERS: &[&str] = &["div", "section", "article", "main", "body", "html"];

#[derive(Debug, Clone)]
enum Node {
    Element(Element),
    Text { text: String, span: Range<usize> },
}

#[derive(Debug, Clone)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
    span: Range<usize>,
}

impl Element {
    fn new(name: String, attributes: Vec<(String, String)>, start: usize) -> Self {
        Self {
            name,
            attributes,
            children: Vec::new(),
            span: start..start,
        }
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn has_block_children(&self) -> bool {
        self.children.iter().any(|child| match child {
            Node::Element(e) => BLOCK_ELEMENTS.contains(&e.name.as_str()) || e.name == "img",
            Node::Text { .. } => false,
        })
    }
}

/// Parse page HTML into top-level blocks, in document order.
pub fn parse_blocks(html: &str) -> Result<Vec<Block>, PaginatorError> {
    let root = build_tree(html)?;
    let mut blocks = Vec::new();
    for node in &root.children {
        push_blocks(node, html, &mut blocks);
    }
    Ok(blocks)
}

/// Like [`parse_blocks`], but never fails: unreadable markup becomes a single
/// `Other` block carrying the raw content, which still renders as one page.
pub fn parse_blocks_lossy(html: &str) -> Vec<Block> {
    match parse_blocks(html) {
        Ok(blocks) => blocks,
        Err(e) => {
            log::warn!("unparsable page markup, keeping it as one block: {}", e);
            vec![Block::new(BlockKind::Other, html, html)]
        }
    }
}

// ── Tree building ───────────────────────────────────────────────

fn build_tree(html: &str) -> Result<Element, PaginatorError> {
    let mut reader = Reader::from_str(html);
    {
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
    }

    let mut stack: Vec<Element> = vec![Element::new("#root".to_string(), Vec::new(), 0)];

    loop {
        let event_start = reader.buffer_position() as usize;
        let event = reader.read_event().map_err(|e| PaginatorError::Markup {
            position: reader.buffer_position() as usize,
            message: e.to_string(),
        })?;
        let event_end = reader.buffer_position() as usize;

        match event {
            Event::Start(e) => {
                let element = open_element(&e, event_start);
                close_implicit(&mut stack, &element.name, event_start);
                if VOID_ELEMENTS.contains(&element.name.as_str()) {
                    push_child(&mut stack, finish(element, event_end));
                } else {
                    stack.push(element);
                }
            }
            Event::Empty(e) => {
                let element = open_element(&e, event_start);
                close_implicit(&mut stack, &element.name, event_start);
                push_child(&mut stack, finish(element, event_end));
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                // Only close when the element is actually open; stray end
                // tags are dropped.
                if let Some(depth) = stack.iter().skip(1).rposition(|el| el.name == name) {
                    let depth = depth + 1;
                    while stack.len() > depth + 1 {
                        close_top(&mut stack, event_start);
                    }
                    close_top(&mut stack, event_end);
                }
            }
            Event::Text(t) => {
                let text = match t.unescape_with(entities::resolve) {
                    Ok(text) => text.into_owned(),
                    Err(_) => String::from_utf8_lossy(&t).into_owned(),
                };
                push_child(
                    &mut stack,
                    Node::Text {
                        text,
                        span: event_start..event_end,
                    },
                );
            }
            Event::CData(c) => {
                push_child(
                    &mut stack,
                    Node::Text {
                        text: String::from_utf8_lossy(&c).into_owned(),
                        span: event_start..event_end,
                    },
                );
            }
            Event::Eof => break,
            // Comments, processing instructions, doctype, declarations.
            _ => {}
        }
    }

    let end = html.len();
    while stack.len() > 1 {
        close_top(&mut stack, end);
    }
    let mut root = stack.pop().unwrap_or_else(|| Element::new("#root".to_string(), Vec::new(), 0));
    root.span = 0..end;
    Ok(root)
}

fn open_element(e: &BytesStart<'_>, start: usize) -> Element {
    let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
    let mut attributes = Vec::new();
    for attr in e.html_attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
        let value = match attr.unescape_value() {
            Ok(v) => v.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        attributes.push((key, value));
    }
    Element::new(name, attributes, start)
}

/// HTML's implied end tags for the common editor cases.
fn close_implicit(stack: &mut Vec<Element>, opening: &str, at: usize) {
    let Some(top) = stack.last() else { return };
    let closes = match top.name.as_str() {
        "li" => opening == "li",
        "p" => BLOCK_ELEMENTS.contains(&opening) || opening == "li",
        "td" | "th" => matches!(opening, "td" | "th" | "tr"),
        _ => false,
    };
    if closes && stack.len() > 1 {
        close_top(stack, at);
    }
}

fn finish(mut element: Element, end: usize) -> Node {
    element.span.end = end;
    Node::Element(element)
}

fn close_top(stack: &mut Vec<Element>, end: usize) {
    if stack.len() <= 1 {
        return;
    }
    if let Some(element) = stack.pop() {
        push_child(stack, finish(element, end));
    }
}

fn push_child(stack: &mut [Element], node: Node) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

// ── Block conversion ────────────────────────────────────────────

fn push_blocks(node: &Node, html: &str, out: &mut Vec<Block>) {
    match node {
        Node::Text { text, span } => {
            let text = normalize_whitespace(&source_spaces(text));
            if !text.is_empty() {
                out.push(Block::new(BlockKind::Other, &html[span.clone()], text));
            }
        }
        Node::Element(e) => {
            if TRANSPARENT_CONTAINERS.contains(&e.name.as_str()) && e.has_block_children() {
                for child in &e.children {
                    push_blocks(child, html, out);
                }
            } else {
                out.push(element_block(e, html));
            }
        }
    }
}

fn element_block(e: &Element, html: &str) -> Block {
    let markup = &html[e.span.clone()];
    let attributes = e.attributes.clone();
    let kind = match e.name.as_str() {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = e.name[1..].parse::<u8>().unwrap_or(1);
            BlockKind::Heading { level }
        }
        "p" => match sole_image(e) {
            Some(img) => image_kind(img),
            None => BlockKind::Paragraph,
        },
        "ul" | "ol" => {
            let ordered = e.name == "ol";
            let start = e
                .attribute("start")
                .and_then(|s| s.trim().parse::<i64>().ok())
                .unwrap_or(1);
            let items = list_items(e, html);
            let text = items
                .iter()
                .map(|item| item.text.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            return Block::new(BlockKind::List { ordered, start }, markup, text)
                .with_attributes(attributes)
                .with_children(items);
        }
        "li" => BlockKind::ListItem,
        "table" => BlockKind::Table {
            rows: table_rows(e),
        },
        "img" => image_kind(e),
        _ => BlockKind::Other,
    };

    let text = if e.name == "pre" {
        raw_text(e)
    } else {
        element_text(e)
    };
    Block::new(kind, markup, text).with_attributes(attributes)
}

/// Every non-blank child of a list becomes an item; non-`li` children are
/// kept as `Other` so nothing is lost when the list is re-serialized.
fn list_items(list: &Element, html: &str) -> Vec<Block> {
    let mut items = Vec::new();
    for child in &list.children {
        match child {
            Node::Element(li) if li.name == "li" => {
                items.push(
                    Block::new(BlockKind::ListItem, &html[li.span.clone()], element_text(li))
                        .with_attributes(li.attributes.clone()),
                );
            }
            other => push_blocks(other, html, &mut items),
        }
    }
    items
}

fn table_rows(table: &Element) -> Vec<TableRow> {
    let mut rows = Vec::new();
    collect_rows(table, false, &mut rows);
    rows
}

fn collect_rows(e: &Element, in_head: bool, rows: &mut Vec<TableRow>) {
    for child in &e.children {
        let Node::Element(child) = child else { continue };
        match child.name.as_str() {
            "thead" => collect_rows(child, true, rows),
            "tbody" | "tfoot" => collect_rows(child, false, rows),
            "tr" => {
                let mut cells = Vec::new();
                for cell in &child.children {
                    if let Node::Element(cell) = cell {
                        if cell.name == "th" || cell.name == "td" {
                            cells.push(element_text(cell));
                        }
                    }
                }
                // A row made only of <th> cells is a header row even
                // outside <thead>.
                let all_th = !cells.is_empty()
                    && child.children.iter().all(|c| match c {
                        Node::Element(cell) => cell.name == "th",
                        Node::Text { text, .. } => text.trim().is_empty(),
                    });
                rows.push(TableRow {
                    header: in_head || all_th,
                    cells,
                });
            }
            _ => {}
        }
    }
}

/// `<p><img></p>` is measured as the image it holds.
fn sole_image(p: &Element) -> Option<&Element> {
    let mut found = None;
    for child in &p.children {
        match child {
            Node::Text { text, .. } if text.trim().is_empty() => {}
            Node::Element(e) if e.name == "img" && found.is_none() => found = Some(e),
            _ => return None,
        }
    }
    found
}

fn image_kind(img: &Element) -> BlockKind {
    let mut width = img.attribute("width").and_then(parse_px);
    let mut height = img.attribute("height").and_then(parse_px);
    if width.is_none() && height.is_none() {
        if let Some((w, h)) = img.attribute("src").and_then(image_dimensions) {
            width = Some(w as f64);
            height = Some(h as f64);
        }
    }
    BlockKind::Image { width, height }
}

/// `"320"` or `"320px"`. Percentages are not a pixel size.
fn parse_px(value: &str) -> Option<f64> {
    let v = value.trim();
    let v = v.strip_suffix("px").unwrap_or(v);
    v.trim().parse::<f64>().ok().filter(|n| n.is_finite() && *n > 0.0)
}

// ── Text extraction ─────────────────────────────────────────────

fn element_text(e: &Element) -> String {
    let mut out = String::new();
    collect_text(e, &mut out);
    normalize_whitespace(&out)
}

fn raw_text(e: &Element) -> String {
    let mut out = String::new();
    for child in &e.children {
        match child {
            Node::Text { text, .. } => out.push_str(text),
            Node::Element(inner) => out.push_str(&raw_text(inner)),
        }
    }
    out.trim_matches('\n').to_string()
}

fn collect_text(e: &Element, out: &mut String) {
    for child in &e.children {
        match child {
            Node::Text { text, .. } => out.push_str(&source_spaces(text)),
            Node::Element(inner) if inner.name == "br" => out.push('\n'),
            Node::Element(inner) => {
                let block = BLOCK_ELEMENTS.contains(&inner.name.as_str())
                    || matches!(inner.name.as_str(), "li" | "tr");
                if block && !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                collect_text(inner, out);
                if block && !out.ends_with('\n') {
                    out.push('\n');
                } else if matches!(inner.name.as_str(), "td" | "th") {
                    out.push(' ');
                }
            }
        }
    }
}

/// Line breaks in the source are plain whitespace in HTML.
fn source_spaces(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}

/// Collapse runs of spaces and tabs to one space, keep explicit line breaks,
/// trim each line.
fn normalize_whitespace(text: &str) -> String {
    text.split('\n')
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_paragraphs_lists() {
        let html = "<h2>Scope</h2>\n<p>We build <strong>things</strong>.</p>\n<ul><li>One</li><li>Two</li></ul>";
        let blocks = parse_blocks(html).unwrap();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].kind, BlockKind::Heading { level: 2 });
        assert_eq!(blocks[0].markup, "<h2>Scope</h2>");
        assert_eq!(blocks[1].kind, BlockKind::Paragraph);
        assert_eq!(blocks[1].text, "We build things.");
        assert_eq!(blocks[2].kind, BlockKind::List { ordered: false, start: 1 });
        assert_eq!(blocks[2].children.len(), 2);
        assert_eq!(blocks[2].children[1].markup, "<li>Two</li>");
    }

    #[test]
    fn markup_slices_are_lossless() {
        let html = "<p>a</p><ol start=\"3\"><li>x</li></ol><table><tr><td>1</td></tr></table>";
        let blocks = parse_blocks(html).unwrap();
        let joined: String = blocks.iter().map(|b| b.markup.as_str()).collect();
        assert_eq!(joined, html);
        assert_eq!(blocks[1].kind, BlockKind::List { ordered: true, start: 3 });
    }

    #[test]
    fn ordered_list_start_is_signed_and_wide() {
        let blocks = parse_blocks("<ol start=\"-2\"><li>a</li><li>b</li></ol>").unwrap();
        assert_eq!(blocks[0].kind, BlockKind::List { ordered: true, start: -2 });
        assert_eq!(blocks[0].list_slice(1..2).attribute("start"), Some("-1"));

        let blocks = parse_blocks("<ol start=\"4294967295\"><li>a</li><li>b</li></ol>").unwrap();
        let rest = blocks[0].list_slice(1..2);
        assert_eq!(rest.kind, BlockKind::List { ordered: true, start: 4294967296 });
        assert!(rest.markup.starts_with("<ol start=\"4294967296\">"));
    }

    #[test]
    fn tolerates_editor_html() {
        let html = "<p>line<br>break&nbsp;here</p><ul><li>one<li>two</ul></div><p>end";
        let blocks = parse_blocks(html).unwrap();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].text, "line\nbreak here");
        assert_eq!(blocks[1].children.len(), 2);
        assert_eq!(blocks[1].children[0].text, "one");
        assert_eq!(blocks[2].text, "end");
    }

    #[test]
    fn wrapper_div_is_flattened() {
        let html = "<div class=\"doc\"><h1>T</h1><p>x</p></div>";
        let blocks = parse_blocks(html).unwrap();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].is_heading());
    }

    #[test]
    fn inline_div_stays_one_block() {
        let blocks = parse_blocks("<div>just <em>text</em></div>").unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Other);
        assert_eq!(blocks[0].text, "just text");
    }

    #[test]
    fn table_rows_and_headers() {
        let html = "<table><thead><tr><th>Item</th><th>Cost</th></tr></thead>\
                    <tbody><tr><td>Design</td><td>$1</td></tr><tr><td>Build</td><td>$2</td></tr></tbody></table>";
        let blocks = parse_blocks(html).unwrap();
        let BlockKind::Table { rows } = &blocks[0].kind else {
            panic!("expected a table");
        };
        assert_eq!(rows.len(), 3);
        assert!(rows[0].header);
        assert!(!rows[1].header);
        assert_eq!(rows[2].cells, vec!["Build".to_string(), "$2".to_string()]);
    }

    #[test]
    fn image_sizes_from_attributes() {
        let blocks = parse_blocks("<p><img src=\"/x.png\" width=\"300px\" height=\"150\"></p><img src=\"y.png\">").unwrap();
        assert_eq!(
            blocks[0].kind,
            BlockKind::Image {
                width: Some(300.0),
                height: Some(150.0)
            }
        );
        assert_eq!(
            blocks[1].kind,
            BlockKind::Image {
                width: None,
                height: None
            }
        );
    }

    #[test]
    fn source_newlines_are_spaces() {
        let blocks = parse_blocks("<p>one\ntwo\r\n  three</p>").unwrap();
        assert_eq!(blocks[0].text, "one two three");
    }

    #[test]
    fn dir_attribute_is_kept() {
        let blocks = parse_blocks("<p dir=\"rtl\">مرحبا</p>").unwrap();
        assert_eq!(blocks[0].attribute("dir"), Some("rtl"));
    }

    #[test]
    fn bare_text_becomes_other_block() {
        let blocks = parse_blocks("  hello   world  <p>x</p>").unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].kind, BlockKind::Other);
        assert_eq!(blocks[0].text, "hello world");
    }

    #[test]
    fn empty_input_gives_no_blocks() {
        assert!(parse_blocks("").unwrap().is_empty());
        assert!(parse_blocks("  \n ").unwrap().is_empty());
    }

    #[test]
    fn lossy_parse_never_fails() {
        let blocks = parse_blocks_lossy("<p>fine</p>");
        assert_eq!(blocks.len(), 1);
        let broken = parse_blocks_lossy("<p a=\"unterminated>text");
        assert_eq!(broken.len(), 1);
    }
}
