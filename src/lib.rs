//! # Proposal Paginator
//!
//! A measurement-driven pagination engine for proposal documents.
//!
//! A proposal is a cover, an optional run of showcase slides, and a set of
//! rich-text content pages. Each content page's HTML has to be split into
//! fixed-size A4 frames. The engine does that with a deterministic greedy
//! fill: it measures candidate chunks, keeps what fits, splits lists between
//! items, keeps a heading with the table under it, and shrinks a table that
//! can never fit a page instead of letting it run off the edge.
//!
//! ## Architecture
//!
//! ```text
//! Page HTML
//!       ↓
//!   [markup]   Block tree: headings, paragraphs, lists, tables, images
//!       ↓
//!   [layout]   Greedy page fill, asking [measure] for heights
//!       ↓
//!   [text]     Direction tagging of finished chunks
//!       ↓
//!   [render]   Cover, showcase and framed content pages as HTML
//! ```

pub mod config;
pub mod error;
pub mod image_probe;
pub mod layout;
pub mod markup;
pub mod measure;
pub mod model;
pub mod render;
pub mod session;
pub mod style;
pub mod text;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::PaginatorConfig;
pub use error::{MeasureError, PaginatorError};
pub use layout::{PageChunk, Pagination, Paginator};
pub use measure::{MeasureSurface, Measurer, TextMetricsMeasurer};
pub use model::{Block, BlockKind, LayoutConstraint};
pub use render::{ProposalRenderer, RenderedProposal};

use model::proposal::Proposal;

/// Parse one page's HTML and paginate it with the text-metrics measurer.
///
/// Markup that cannot be parsed is an error here; the renderer instead
/// falls back to a single raw chunk.
pub fn paginate_markup(html: &str, config: &PaginatorConfig) -> Result<Pagination, PaginatorError> {
    let blocks = markup::parse_blocks(html)?;
    let measurer = TextMetricsMeasurer::new(config.prose.clone());
    let pagination = Paginator::new(&measurer)
        .with_policy(config.policy)
        .paginate(&blocks, &config.layout_constraint());
    Ok(pagination)
}

/// Render a proposal described as JSON.
pub fn render_proposal_json(json: &str, config: &PaginatorConfig) -> Result<RenderedProposal, PaginatorError> {
    let proposal: Proposal = serde_json::from_str(json)?;
    let measurer = TextMetricsMeasurer::new(config.prose.clone());
    Ok(ProposalRenderer::new(config, &measurer).render(&proposal))
}
