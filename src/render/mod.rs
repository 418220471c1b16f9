//! # Proposal Renderer
//!
//! Turns a [`Proposal`] into its sequence of fixed-size page frames: the
//! cover, the optional showcase slides, then every visible content page.
//! Content pages are parsed, paginated and framed with the shared header
//! (title banner) and footer (contact line). Process pages are framed once,
//! unpaginated.
//!
//! The output is a [`RenderedProposal`]: serializable as a JSON manifest, or
//! printable as one HTML document whose stylesheet is generated from the
//! same [`ProseStyle`](crate::style::ProseStyle) the measurer used.

use std::fmt::Write as _;

use quick_xml::escape::escape;
use serde::Serialize;

use crate::config::PaginatorConfig;
use crate::layout::{PageChunk, Paginator};
use crate::markup::parse_blocks_lossy;
use crate::measure::Measurer;
use crate::model::proposal::{ContentPage, Proposal};
use crate::style::Direction;
use crate::text::bidi;

/// What a frame shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FrameKind {
    Cover,
    #[serde(rename_all = "camelCase")]
    Showcase { slide_number: u32 },
    /// One chunk of a paginated content page.
    #[serde(rename_all = "camelCase")]
    Content {
        page_id: String,
        chunk_index: usize,
        chunk_count: usize,
        overflowing: bool,
    },
    #[serde(rename_all = "camelCase")]
    Process { page_id: String },
}

/// One printed page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFrame {
    /// 1-based page number within the document.
    pub number: usize,
    pub kind: FrameKind,
    /// Header title (empty for cover and showcase frames).
    pub title: String,
    /// Direction of the frame body.
    pub direction: Direction,
    /// Direction of the header title.
    pub title_direction: Direction,
    /// The title needs the Arabic font face.
    pub arabic_title: bool,
    /// The frame's HTML.
    pub html: String,
}

/// All frames of a proposal plus the stylesheet they are printed with.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedProposal {
    pub proposal_id: String,
    pub language: String,
    pub frames: Vec<PageFrame>,
    /// Content pages whose pagination ran without measurement.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub degraded_pages: Vec<String>,
    #[serde(skip)]
    stylesheet: String,
}

impl RenderedProposal {
    pub fn total_pages(&self) -> usize {
        self.frames.len()
    }

    /// The print-ready document.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Proposal {}</title>\n<style>\n{}</style>\n</head>\n<body>\n",
            escape(self.language.as_str()),
            escape(self.proposal_id.as_str()),
            self.stylesheet
        );
        for frame in &self.frames {
            html.push_str(&frame.html);
            html.push('\n');
        }
        html.push_str("</body>\n</html>\n");
        html
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Cover labels in the proposal's language.
struct CoverLabels {
    title: &'static str,
    prepared_for: &'static str,
    prepared_by: &'static str,
    project_type: &'static str,
    date: &'static str,
}

const EN_LABELS: CoverLabels = CoverLabels {
    title: "Project<br>Proposal",
    prepared_for: "Prepared For:",
    prepared_by: "Prepared By:",
    project_type: "Project Type:",
    date: "Date:",
};

const AR_LABELS: CoverLabels = CoverLabels {
    title: "عرض<br>المشروع",
    prepared_for: "مُعد لـ:",
    prepared_by: "مُعد بواسطة:",
    project_type: "نوع المشروع:",
    date: "التاريخ:",
};

/// Builds page frames for proposals.
pub struct ProposalRenderer<'a> {
    config: &'a PaginatorConfig,
    measurer: &'a dyn Measurer,
}

impl<'a> ProposalRenderer<'a> {
    pub fn new(config: &'a PaginatorConfig, measurer: &'a dyn Measurer) -> Self {
        Self { config, measurer }
    }

    /// Render every frame of `proposal`.
    pub fn render(&self, proposal: &Proposal) -> RenderedProposal {
        let mut frames = Vec::new();
        let mut degraded_pages = Vec::new();

        frames.push(self.cover_frame(proposal));

        if proposal.include_showcase {
            for (slide_number, image) in self.showcase_slides(proposal) {
                let number = frames.len() + 1;
                frames.push(self.showcase_frame(number, slide_number, &image));
            }
        }

        for page in proposal.visible_pages() {
            if page.is_process() {
                let number = frames.len() + 1;
                frames.push(self.process_frame(number, page));
                continue;
            }
            let (page_frames, degraded) = self.content_frames(frames.len() + 1, page);
            if degraded {
                degraded_pages.push(page.id.clone());
            }
            frames.extend(page_frames);
        }

        log::info!(
            "rendered proposal '{}' into {} pages",
            proposal.id,
            frames.len()
        );
        RenderedProposal {
            proposal_id: proposal.id.clone(),
            language: proposal.language.clone().unwrap_or_else(|| "en".to_string()),
            frames,
            degraded_pages,
            stylesheet: self.stylesheet(),
        }
    }

    /// Render a single content page on its own, without cover or slides.
    pub fn render_page(&self, page: &ContentPage) -> RenderedProposal {
        let (frames, degraded) = if page.is_process() {
            (vec![self.process_frame(1, page)], false)
        } else {
            self.content_frames(1, page)
        };
        RenderedProposal {
            proposal_id: page.id.clone(),
            language: "en".to_string(),
            frames,
            degraded_pages: if degraded { vec![page.id.clone()] } else { Vec::new() },
            stylesheet: self.stylesheet(),
        }
    }

    /// Paginate one content page and frame each chunk. Page numbers start
    /// at `first_number`. Returns whether measurement was unavailable.
    pub fn content_frames(&self, first_number: usize, page: &ContentPage) -> (Vec<PageFrame>, bool) {
        let blocks = parse_blocks_lossy(&page.content);
        let pagination = Paginator::new(self.measurer)
            .with_policy(self.config.policy)
            .paginate(&blocks, &self.config.layout_constraint());
        log::debug!(
            "page '{}' paginated into {} chunks",
            page.id,
            pagination.chunks.len()
        );

        let chunk_count = pagination.chunks.len();
        let frames = pagination
            .chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| self.chunk_frame(first_number + i, page, chunk, chunk_count))
            .collect();
        (frames, pagination.degraded)
    }

    fn showcase_slides(&self, proposal: &Proposal) -> Vec<(u32, String)> {
        if proposal.static_slides.is_empty() {
            return self
                .config
                .showcase
                .slide_numbers
                .iter()
                .map(|&n| (n, self.config.showcase.image_for(n)))
                .collect();
        }
        let mut slides: Vec<_> = proposal.static_slides.iter().collect();
        slides.sort_by_key(|s| s.order);
        slides
            .into_iter()
            .map(|s| (s.slide_number, s.image_url.clone()))
            .collect()
    }

    fn cover_frame(&self, proposal: &Proposal) -> PageFrame {
        let arabic = proposal.is_arabic();
        let labels = if arabic { &AR_LABELS } else { &EN_LABELS };
        let direction = if arabic { Direction::Rtl } else { Direction::Ltr };
        let face = if arabic { " font-arabic" } else { "" };
        let branding = &self.config.branding;

        let prepared_by = match proposal.prepared_by() {
            "" => branding.company_name.as_str(),
            name => name,
        };

        let mut html = String::new();
        let _ = write!(
            html,
            "<section class=\"page cover\" data-page=\"1\" dir=\"{dir}\">\
             <div class=\"cover-banner\"><div class=\"cover-heading\"><h1 class=\"cover-title{face}\">{title}</h1>{subtitle}</div>{logo}</div>\
             <div class=\"cover-body\" style=\"text-align:{align}\">",
            dir = direction.as_attr(),
            title = labels.title,
            subtitle = proposal
                .sub_heading()
                .map(|s| format!("<p class=\"cover-subtitle{face}\">{}</p>", escape(s)))
                .unwrap_or_default(),
            logo = branding
                .logo_path
                .as_deref()
                .map(|p| format!("<img class=\"cover-logo\" src=\"{}\" alt=\"{}\">", escape(p), escape(branding.company_name.as_str())))
                .unwrap_or_default(),
            align = direction.text_align(),
        );
        let fields = [
            (labels.prepared_for, proposal.prepared_for()),
            (labels.prepared_by, prepared_by),
            (labels.project_type, proposal.project_type()),
            (labels.date, proposal.date()),
        ];
        for (label, value) in fields {
            let _ = write!(
                html,
                "<div class=\"cover-field\"><p class=\"cover-label\">{}</p><p class=\"cover-value{face}\">{}</p></div>",
                label,
                escape(value)
            );
        }
        let _ = write!(
            html,
            "</div><div class=\"cover-contact\"><p>{}</p><p>{}</p></div></section>",
            escape(branding.website.as_str()),
            escape(branding.email.as_str())
        );

        PageFrame {
            number: 1,
            kind: FrameKind::Cover,
            title: String::new(),
            direction,
            title_direction: direction,
            arabic_title: arabic,
            html,
        }
    }

    fn showcase_frame(&self, number: usize, slide_number: u32, image: &str) -> PageFrame {
        let html = format!(
            "<section class=\"page showcase\" data-page=\"{number}\">\
             <img src=\"{}\" alt=\"Slide {slide_number}\"></section>",
            escape(image)
        );
        PageFrame {
            number,
            kind: FrameKind::Showcase { slide_number },
            title: String::new(),
            direction: Direction::Ltr,
            title_direction: Direction::Ltr,
            arabic_title: false,
            html,
        }
    }

    fn process_frame(&self, number: usize, page: &ContentPage) -> PageFrame {
        let blocks = parse_blocks_lossy(&page.content);
        let direction = bidi::chunk_direction(&blocks);
        let body = format!(
            "<div class=\"page-body process-body\"><div class=\"process-display\" dir=\"{}\">{}</div></div>",
            direction.as_attr(),
            page.content
        );
        self.framed(number, FrameKind::Process { page_id: page.id.clone() }, &page.title, direction, &body, "process")
    }

    fn chunk_frame(&self, number: usize, page: &ContentPage, chunk: &PageChunk, chunk_count: usize) -> PageFrame {
        let frame = &self.config.frame;
        let padding = &frame.body_padding;
        let (variant, top) = if chunk.index == 0 {
            ("first", padding.top)
        } else {
            ("continued", padding.top + frame.continuation_gap)
        };
        let body = format!(
            "<div class=\"page-body\" style=\"padding:{top}px {}px {}px {}px\">\
             <div class=\"prose\" dir=\"{}\" style=\"text-align:{}\">{}</div></div>",
            padding.right,
            padding.bottom,
            padding.left,
            chunk.direction.as_attr(),
            chunk.direction.text_align(),
            chunk.markup()
        );
        let kind = FrameKind::Content {
            page_id: page.id.clone(),
            chunk_index: chunk.index,
            chunk_count,
            overflowing: chunk.overflowing,
        };
        self.framed(number, kind, &page.title, chunk.direction, &body, variant)
    }

    /// Wrap a body in the page frame with header and footer.
    fn framed(&self, number: usize, kind: FrameKind, title: &str, direction: Direction, body: &str, variant: &str) -> PageFrame {
        let title_direction = bidi::detect_direction(title);
        let arabic_title = bidi::needs_arabic_face(title);
        let branding = &self.config.branding;

        let mut html = String::new();
        let _ = write!(
            html,
            "<section class=\"page content-page {variant}\" data-page=\"{number}\">\
             <header class=\"page-header\"><h1 class=\"page-title{}\" dir=\"{}\" style=\"text-align:{}\">{}</h1></header>",
            if arabic_title { " font-arabic" } else { "" },
            title_direction.as_attr(),
            title_direction.text_align(),
            escape(title)
        );
        html.push_str(body);
        let _ = write!(
            html,
            "<footer class=\"page-footer\"><p>{}</p>{}<p>{}</p></footer></section>",
            escape(branding.email.as_str()),
            branding
                .logo_path
                .as_deref()
                .map(|p| format!("<img class=\"footer-logo\" src=\"{}\" alt=\"\">", escape(p)))
                .unwrap_or_default(),
            escape(branding.website.as_str())
        );

        PageFrame {
            number,
            kind,
            title: title.to_string(),
            direction,
            title_direction,
            arabic_title,
            html,
        }
    }

    /// Page geometry plus the prose rules.
    fn stylesheet(&self) -> String {
        let frame = &self.config.frame;
        let (width, height) = frame.page_size.dimensions();
        let mut css = String::new();
        let _ = writeln!(css, "@page {{ size: {}; margin: 0; }}", frame.page_size.css_size());
        let _ = writeln!(css, "* {{ box-sizing: border-box; }} body {{ margin: 0; }}");
        let _ = writeln!(
            css,
            ".page {{ width: {width}px; height: {height}px; position: relative; overflow: hidden; \
             display: flex; flex-direction: column; background: #fff; break-after: page; page-break-after: always; }}"
        );
        let _ = writeln!(css, ".page:last-child {{ break-after: auto; page-break-after: auto; }}");
        let header_bg = match &self.config.branding.header_pattern_path {
            Some(path) => format!(
                "url(\"{}\") right center / auto 100% no-repeat, linear-gradient(90deg, #252E5D, #0230F5)",
                escape(path.as_str())
            ),
            None => "linear-gradient(90deg, #252E5D, #0230F5)".to_string(),
        };
        let _ = writeln!(
            css,
            ".page-header {{ height: {}px; flex-shrink: 0; display: flex; flex-direction: column; \
             justify-content: center; padding: 0 40px; background: {header_bg}; }}",
            frame.header_height
        );
        let _ = writeln!(css, ".page-title {{ margin: 0; color: #fff; font-size: 36px; font-weight: 700; }}");
        let _ = writeln!(css, ".page-body {{ flex: 1; min-height: 0; overflow: hidden; }}");
        let _ = writeln!(css, ".process-body {{ padding: 32px 40px; background: #f9fafb; }}");
        let _ = writeln!(
            css,
            ".page-footer {{ height: {}px; flex-shrink: 0; display: flex; align-items: center; \
             justify-content: space-between; padding: 0 40px; border-top: 1px solid #e5e7eb; \
             font-size: 12px; color: #4b5563; }}",
            frame.footer_height
        );
        let _ = writeln!(css, ".footer-logo {{ height: 24px; }}");
        let _ = writeln!(css, ".showcase img {{ width: 100%; height: 100%; object-fit: cover; }}");
        let _ = writeln!(
            css,
            ".cover {{ background: #f9fafb; }} .cover-banner {{ height: 280px; display: flex; align-items: center; \
             justify-content: space-between; padding: 0 64px; background: linear-gradient(90deg, #252E5D, #0230F5); }}"
        );
        let _ = writeln!(css, ".cover[dir=rtl] .cover-banner {{ flex-direction: row-reverse; }}");
        let _ = writeln!(css, ".cover-title {{ margin: 0; color: #fff; font-size: 60px; line-height: 1.25; }}");
        let _ = writeln!(css, ".cover-subtitle {{ margin: 12px 0 0; color: #dbeafe; font-size: 24px; }}");
        let _ = writeln!(css, ".cover-logo {{ height: 64px; }}");
        let _ = writeln!(
            css,
            ".cover-body {{ padding: 64px; display: grid; grid-template-columns: 1fr 1fr; gap: 32px 48px; }}"
        );
        let _ = writeln!(
            css,
            ".cover-label {{ margin: 0 0 8px; color: #2563eb; font-size: 12px; font-weight: 700; \
             text-transform: uppercase; letter-spacing: 0.05em; }}"
        );
        let _ = writeln!(css, ".cover-value {{ margin: 0; color: #111827; font-size: 20px; font-weight: 600; }}");
        let _ = writeln!(
            css,
            ".cover-contact {{ position: absolute; bottom: 32px; left: 64px; font-size: 14px; color: #374151; }}"
        );
        let _ = writeln!(css, ".font-arabic {{ font-family: \"Noto Naskh Arabic\", \"Geeza Pro\", serif; }}");
        let _ = writeln!(css, ".scaled-table {{ overflow: hidden; }}");
        css.push_str(&self.config.prose.to_css(".prose"));
        css
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::TextMetricsMeasurer;
    use crate::model::proposal::{ContentPageType, LegacyCover, StaticSlide};

    fn page(id: &str, title: &str, content: &str, order: i64) -> ContentPage {
        ContentPage {
            id: id.to_string(),
            page_type: ContentPageType::Text,
            title: title.to_string(),
            content: content.to_string(),
            is_visible: true,
            order,
        }
    }

    fn proposal(pages: Vec<ContentPage>) -> Proposal {
        Proposal {
            id: "prop-1".into(),
            prepared_for: "Acme".into(),
            prepared_by: String::new(),
            project_type: String::new(),
            date: "2026-10-19".into(),
            language: None,
            cover: None,
            include_showcase: false,
            static_slides: Vec::new(),
            pages,
        }
    }

    #[test]
    fn cover_comes_first_then_pages_in_order() {
        let config = PaginatorConfig::default();
        let measurer = TextMetricsMeasurer::default();
        let renderer = ProposalRenderer::new(&config, &measurer);
        let doc = renderer.render(&proposal(vec![
            page("b", "Second", "<p>two</p>", 2),
            page("a", "First", "<p>one</p>", 1),
        ]));
        assert_eq!(doc.total_pages(), 3);
        assert_eq!(doc.frames[0].kind, FrameKind::Cover);
        assert_eq!(doc.frames[1].title, "First");
        assert_eq!(doc.frames[2].title, "Second");
        let numbers: Vec<usize> = doc.frames.iter().map(|f| f.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn cover_uses_fallbacks() {
        let config = PaginatorConfig::default();
        let measurer = TextMetricsMeasurer::default();
        let doc = ProposalRenderer::new(&config, &measurer).render(&proposal(vec![]));
        let cover = &doc.frames[0].html;
        assert!(cover.contains("Acme"));
        assert!(cover.contains("Development"));
        assert!(cover.contains(&config.branding.company_name));
        assert!(cover.contains("Prepared For:"));
    }

    #[test]
    fn cover_shows_legacy_sub_heading() {
        let config = PaginatorConfig::default();
        let measurer = TextMetricsMeasurer::default();
        let mut p = proposal(vec![]);
        p.cover = Some(LegacyCover {
            sub_heading: Some("Phase two & beyond".into()),
            ..LegacyCover::default()
        });
        let doc = ProposalRenderer::new(&config, &measurer).render(&p);
        assert!(doc.frames[0]
            .html
            .contains("<p class=\"cover-subtitle\">Phase two &amp; beyond</p>"));

        let plain = ProposalRenderer::new(&config, &measurer).render(&proposal(vec![]));
        assert!(!plain.frames[0].html.contains("cover-subtitle"));
    }

    #[test]
    fn arabic_cover_is_rtl() {
        let config = PaginatorConfig::default();
        let measurer = TextMetricsMeasurer::default();
        let mut p = proposal(vec![]);
        p.language = Some("ar".into());
        let doc = ProposalRenderer::new(&config, &measurer).render(&p);
        assert_eq!(doc.frames[0].direction, Direction::Rtl);
        assert!(doc.frames[0].html.contains("مُعد لـ:"));
        assert!(doc.to_html().contains("lang=\"ar\""));
    }

    #[test]
    fn default_showcase_has_twelve_slides() {
        let config = PaginatorConfig::default();
        let measurer = TextMetricsMeasurer::default();
        let mut p = proposal(vec![page("a", "Intro", "<p>x</p>", 0)]);
        p.include_showcase = true;
        let doc = ProposalRenderer::new(&config, &measurer).render(&p);
        assert_eq!(doc.total_pages(), 1 + 12 + 1);
        assert_eq!(doc.frames[1].kind, FrameKind::Showcase { slide_number: 2 });
        assert!(doc.frames[12].html.contains("/assets/slides/13.png"));
    }

    #[test]
    fn proposal_slides_replace_defaults() {
        let config = PaginatorConfig::default();
        let measurer = TextMetricsMeasurer::default();
        let mut p = proposal(vec![]);
        p.include_showcase = true;
        p.static_slides = vec![
            StaticSlide {
                slide_number: 7,
                image_url: "/s/7.png".into(),
                title: String::new(),
                description: String::new(),
                order: 2,
            },
            StaticSlide {
                slide_number: 3,
                image_url: "/s/3.png".into(),
                title: String::new(),
                description: String::new(),
                order: 1,
            },
        ];
        let doc = ProposalRenderer::new(&config, &measurer).render(&p);
        assert_eq!(doc.total_pages(), 3);
        assert_eq!(doc.frames[1].kind, FrameKind::Showcase { slide_number: 3 });
    }

    #[test]
    fn process_page_is_one_frame() {
        let config = PaginatorConfig::default();
        let measurer = TextMetricsMeasurer::default();
        let long = "<p>step</p>".repeat(400);
        let doc = ProposalRenderer::new(&config, &measurer).render(&proposal(vec![page("p", "Our Process", &long, 0)]));
        assert_eq!(doc.total_pages(), 2);
        assert!(matches!(doc.frames[1].kind, FrameKind::Process { .. }));
    }

    #[test]
    fn long_page_spans_frames_with_continued_margins() {
        let config = PaginatorConfig::default();
        let measurer = TextMetricsMeasurer::default();
        let long = "<p>Lorem ipsum dolor sit amet, consectetur adipiscing elit.</p>".repeat(60);
        let doc = ProposalRenderer::new(&config, &measurer).render(&proposal(vec![page("t", "Scope", &long, 0)]));
        assert!(doc.total_pages() > 2);
        assert!(doc.frames[1].html.contains("content-page first"));
        assert!(doc.frames[2].html.contains("content-page continued"));
        match &doc.frames[2].kind {
            FrameKind::Content { chunk_index, chunk_count, .. } => {
                assert_eq!(*chunk_index, 1);
                assert_eq!(*chunk_count, doc.total_pages() - 1);
            }
            other => panic!("unexpected frame {other:?}"),
        }
    }

    #[test]
    fn arabic_title_gets_rtl_header() {
        let config = PaginatorConfig::default();
        let measurer = TextMetricsMeasurer::default();
        let doc = ProposalRenderer::new(&config, &measurer)
            .render(&proposal(vec![page("a", "نطاق العمل", "<p>مرحبا بكم في العرض</p>", 0)]));
        let frame = &doc.frames[1];
        assert_eq!(frame.title_direction, Direction::Rtl);
        assert!(frame.arabic_title);
        assert_eq!(frame.direction, Direction::Rtl);
        assert!(frame.html.contains("font-arabic"));
    }

    #[test]
    fn html_document_has_page_rules_and_escapes() {
        let config = PaginatorConfig::default();
        let measurer = TextMetricsMeasurer::default();
        let doc = ProposalRenderer::new(&config, &measurer)
            .render(&proposal(vec![page("a", "R&D <plan>", "<p>x</p>", 0)]));
        let html = doc.to_html();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("@page { size: A4; margin: 0; }"));
        assert!(html.contains(".prose h1"));
        assert!(html.contains("R&amp;D &lt;plan&gt;"));
    }

    #[test]
    fn unmeasurable_pages_are_reported() {
        let style = crate::style::ProseStyle {
            font_path: Some("/missing/font.ttf".into()),
            ..Default::default()
        };
        let measurer = TextMetricsMeasurer::new(style);
        let config = PaginatorConfig::default();
        let doc = ProposalRenderer::new(&config, &measurer).render(&proposal(vec![page("a", "Intro", "<p>x</p>", 0)]));
        assert_eq!(doc.degraded_pages, vec!["a".to_string()]);
        assert_eq!(doc.total_pages(), 2);
    }

    #[test]
    fn single_page_document() {
        let config = PaginatorConfig::default();
        let measurer = TextMetricsMeasurer::default();
        let doc = ProposalRenderer::new(&config, &measurer).render_page(&page("a", "Intro", "<p>x</p>", 0));
        assert_eq!(doc.total_pages(), 1);
        assert_eq!(doc.frames[0].number, 1);
        assert!(doc.to_html().contains("Intro"));
    }

    #[test]
    fn manifest_serializes_frames() {
        let config = PaginatorConfig::default();
        let measurer = TextMetricsMeasurer::default();
        let doc = ProposalRenderer::new(&config, &measurer).render(&proposal(vec![page("a", "Intro", "<p>x</p>", 0)]));
        let json: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(json["frames"][1]["kind"]["type"], "content");
        assert_eq!(json["frames"][1]["kind"]["pageId"], "a");
        assert!(json.get("stylesheet").is_none());
    }
}
