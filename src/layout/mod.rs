//! # Page Fill Engine
//!
//! Splits one content page's block tree into page-sized chunks.
//!
//! ## How It Works
//!
//! The engine never slices a tall canvas. It opens a chunk with a known
//! height budget and asks, block by block, "does this still fit?":
//!
//! 1. Take the head of the queue and measure the chunk with it appended.
//! 2. If it fits: commit it and look at the next block.
//! 3. If it doesn't: roll back and ask the overflow policy what to do with
//!    this kind of block. Lists split at the largest fitting item prefix,
//!    a heading stays glued to the table after it, tables too tall for any
//!    page are shrunk to fill one, anything else moves to the next chunk.
//! 4. A block that overflows an empty chunk is placed anyway, so every
//!    chunk consumes at least one block (or one list item) and the loop
//!    terminates.
//!
//! Blocks are immutable values. "Tentatively append" means measuring a
//! candidate slice; rollback is just not committing it. The remaining work
//! is an explicit queue, and split lists go back to its head.
//!
//! Direction tagging runs after all chunks exist and never feeds back into
//! break decisions.

pub mod page_break;

use std::collections::VecDeque;

use serde::Serialize;

use crate::config::BreakPolicy;
use crate::measure::{MeasureSurface, Measurer};
use crate::model::{Block, LayoutConstraint};
use crate::style::Direction;
use crate::text::bidi;

use page_break::{decide_list_break, BreakDecision};

/// Measured heights may exceed the budget by this much and still fit. Covers
/// float error when a scaled table is sized to exactly fill the rest of a
/// chunk.
const FIT_TOLERANCE: f64 = 0.01;

/// One printable page's worth of blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageChunk {
    /// Position in the page's chunk sequence, from 0.
    pub index: usize,
    pub blocks: Vec<Block>,
    /// The height budget this chunk was filled against.
    pub max_height: f64,
    /// Measured height of `blocks`.
    pub height: f64,
    /// A single block was force-placed and exceeds `max_height`.
    pub overflowing: bool,
    pub direction: Direction,
}

impl PageChunk {
    /// Serialized markup of every block, in order.
    pub fn markup(&self) -> String {
        self.blocks.iter().map(|b| b.markup.as_str()).collect()
    }
}

/// Result of one pagination pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub chunks: Vec<PageChunk>,
    /// Measurement was unavailable and everything went into one chunk.
    pub degraded: bool,
}

impl Pagination {
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// The greedy page filler.
pub struct Paginator<'m> {
    measurer: &'m dyn Measurer,
    policy: BreakPolicy,
}

impl<'m> Paginator<'m> {
    pub fn new(measurer: &'m dyn Measurer) -> Self {
        Self {
            measurer,
            policy: BreakPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: BreakPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Split `blocks` into chunks that fit `constraint`.
    ///
    /// Never fails. Bad budgets are clamped, and if no measurement surface
    /// can be opened the whole tree comes back as one degraded chunk.
    pub fn paginate(&self, blocks: &[Block], constraint: &LayoutConstraint) -> Pagination {
        let (constraint, clamped) = constraint.sanitized();
        if clamped {
            log::warn!(
                "height budgets clamped to at least {}px (first {}, other {})",
                crate::model::MIN_PAGE_HEIGHT,
                constraint.first_page_max_height,
                constraint.other_page_max_height
            );
        }

        if blocks.is_empty() {
            return Pagination {
                chunks: vec![empty_chunk(constraint.first_page_max_height)],
                degraded: false,
            };
        }

        let mut surface = match self.measurer.begin(constraint.content_width) {
            Ok(surface) => surface,
            Err(e) => {
                log::warn!("{}; placing all {} blocks on one chunk", e, blocks.len());
                return degraded(blocks, &constraint);
            }
        };

        let mut queue: VecDeque<Block> = blocks.iter().cloned().collect();
        let mut chunks = Vec::new();
        while !queue.is_empty() {
            let index = chunks.len();
            let max_height = constraint.max_height_for(index);
            chunks.push(self.fill_chunk(surface.as_mut(), &mut queue, index, max_height));
        }
        drop(surface);

        tag_directions(&mut chunks);
        Pagination {
            chunks,
            degraded: false,
        }
    }

    /// Fill one chunk from the head of `queue`.
    fn fill_chunk(
        &self,
        surface: &mut dyn MeasureSurface,
        queue: &mut VecDeque<Block>,
        index: usize,
        max_height: f64,
    ) -> PageChunk {
        let mut fill = ChunkFill {
            surface,
            acc: Vec::new(),
            max_height,
            overflowing: false,
        };

        while let Some(head) = queue.pop_front() {
            let next_is_table = queue.front().is_some_and(Block::is_table);
            let step = if head.is_heading() && next_is_table {
                match queue.pop_front() {
                    Some(table) => self.place_glued(&mut fill, queue, head, table),
                    None => self.place_block(&mut fill, queue, head),
                }
            } else if head.is_table() {
                self.place_table(&mut fill, queue, head)
            } else if head.is_splittable_list() {
                self.place_list(&mut fill, queue, head)
            } else {
                self.place_block(&mut fill, queue, head)
            };
            if step == Step::EndChunk {
                break;
            }
        }

        let height = fill.measure(&[]);
        log::debug!(
            "chunk {} closed with {} blocks, {:.1}/{:.1}px{}",
            index,
            fill.acc.len(),
            height,
            max_height,
            if fill.overflowing { " (overflowing)" } else { "" }
        );
        PageChunk {
            index,
            blocks: fill.acc,
            max_height,
            height,
            overflowing: fill.overflowing,
            direction: Direction::Ltr,
        }
    }

    /// Heading directly followed by a table: place both, defer both, or on
    /// a fresh chunk shrink the table into the space under the heading.
    fn place_glued(&self, fill: &mut ChunkFill<'_>, queue: &mut VecDeque<Block>, heading: Block, table: Block) -> Step {
        if fill.fits(&[heading.clone(), table.clone()]) {
            fill.commit(heading);
            fill.commit(table);
            return Step::Continue;
        }
        if !fill.acc.is_empty() {
            log::debug!("heading/table pair deferred to next chunk");
            queue.push_front(table);
            queue.push_front(heading);
            return Step::EndChunk;
        }

        let heading_height = fill.measure(std::slice::from_ref(&heading));
        if heading_height > fill.max_height + FIT_TOLERANCE {
            log::warn!("heading taller than the chunk budget was force-placed");
            fill.overflowing = true;
            fill.commit(heading);
            queue.push_front(table);
            return Step::EndChunk;
        }

        let remaining = (fill.max_height - heading_height).max(0.0);
        if self.policy.min_scaled_table_height > 0.0 && remaining < self.policy.min_scaled_table_height {
            log::debug!(
                "only {:.1}px left under heading; table moves to next chunk",
                remaining
            );
            fill.commit(heading);
            queue.push_front(table);
            return Step::EndChunk;
        }

        let table_height = fill.measure_alone(&table);
        let scale = if table_height > 0.0 {
            (remaining / table_height).min(1.0)
        } else {
            1.0
        };
        log::debug!("table scaled to {:.3} under its heading ({:.1}px frame)", scale, remaining);
        fill.commit(heading);
        fill.commit(Block::scaled_table(table, scale, remaining));
        Step::EndChunk
    }

    /// A table without a heading in front of it.
    fn place_table(&self, fill: &mut ChunkFill<'_>, queue: &mut VecDeque<Block>, table: Block) -> Step {
        if fill.fits(std::slice::from_ref(&table)) {
            fill.commit(table);
            return Step::Continue;
        }
        if !fill.acc.is_empty() {
            queue.push_front(table);
            return Step::EndChunk;
        }

        let table_height = fill.measure_alone(&table);
        let scale = if table_height > 0.0 {
            (fill.max_height / table_height).min(1.0)
        } else {
            1.0
        };
        log::debug!("table scaled to {:.3} to fill a chunk", scale);
        let frame = fill.max_height;
        fill.commit(Block::scaled_table(table, scale, frame));
        Step::EndChunk
    }

    /// A list with items: place whole, or split at the largest fitting
    /// prefix allowed by the break policy.
    fn place_list(&self, fill: &mut ChunkFill<'_>, queue: &mut VecDeque<Block>, list: Block) -> Step {
        if fill.fits(std::slice::from_ref(&list)) {
            fill.commit(list);
            return Step::Continue;
        }

        let total = list.children.len();
        let mut fit_count = 0;
        while fit_count < total && fill.fits(&[list.list_slice(0..fit_count + 1)]) {
            fit_count += 1;
        }

        let decision = decide_list_break(
            fit_count,
            total,
            self.policy.min_items_before_break,
            self.policy.min_items_after_break,
        );
        let keep = match decision {
            BreakDecision::Place => {
                fill.commit(list);
                return Step::Continue;
            }
            BreakDecision::Split {
                items_on_current_page,
            } => items_on_current_page,
            BreakDecision::MoveToNextPage if !fill.acc.is_empty() => {
                log::debug!("list of {} items deferred to next chunk", total);
                queue.push_front(list);
                return Step::EndChunk;
            }
            BreakDecision::MoveToNextPage => {
                // Fresh chunk: progress wins over the orphan/widow minimums.
                if fit_count == 0 {
                    log::warn!("list item taller than the chunk budget was force-placed");
                    fill.overflowing = true;
                }
                fit_count.max(1)
            }
        };

        if keep >= total {
            fill.commit(list);
            return Step::EndChunk;
        }
        log::debug!("list split after item {} of {}", keep, total);
        queue.push_front(list.list_slice(keep..total));
        fill.commit(list.list_slice(0..keep));
        Step::EndChunk
    }

    /// Paragraphs, headings, images and everything else that never splits.
    fn place_block(&self, fill: &mut ChunkFill<'_>, queue: &mut VecDeque<Block>, block: Block) -> Step {
        if fill.fits(std::slice::from_ref(&block)) {
            if block.is_heading() && !fill.acc.is_empty() && self.policy.avoid_orphan_headings {
                if let Some(follower) = queue.front() {
                    let first_part = if follower.is_splittable_list() {
                        follower.list_slice(0..1)
                    } else {
                        follower.clone()
                    };
                    if !fill.fits(&[block.clone(), first_part]) {
                        log::debug!("heading deferred to stay with the block after it");
                        queue.push_front(block);
                        return Step::EndChunk;
                    }
                }
            }
            fill.commit(block);
            return Step::Continue;
        }

        if !fill.acc.is_empty() {
            queue.push_front(block);
            return Step::EndChunk;
        }

        log::warn!("block taller than the chunk budget was force-placed");
        fill.overflowing = true;
        fill.commit(block);
        Step::EndChunk
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    EndChunk,
}

/// The chunk under construction and the surface it is measured on.
struct ChunkFill<'s> {
    surface: &'s mut dyn MeasureSurface,
    acc: Vec<Block>,
    max_height: f64,
    overflowing: bool,
}

impl ChunkFill<'_> {
    /// Height of the committed blocks followed by `extra`.
    fn measure(&mut self, extra: &[Block]) -> f64 {
        if extra.is_empty() {
            return self.surface.height(&self.acc);
        }
        let mut candidate = Vec::with_capacity(self.acc.len() + extra.len());
        candidate.extend_from_slice(&self.acc);
        candidate.extend_from_slice(extra);
        self.surface.height(&candidate)
    }

    fn measure_alone(&mut self, block: &Block) -> f64 {
        self.surface.height(std::slice::from_ref(block))
    }

    fn fits(&mut self, extra: &[Block]) -> bool {
        self.measure(extra) <= self.max_height + FIT_TOLERANCE
    }

    fn commit(&mut self, block: Block) {
        self.acc.push(block);
    }
}

fn empty_chunk(max_height: f64) -> PageChunk {
    PageChunk {
        index: 0,
        blocks: Vec::new(),
        max_height,
        height: 0.0,
        overflowing: false,
        direction: Direction::Ltr,
    }
}

/// Everything on one chunk, unmeasured.
fn degraded(blocks: &[Block], constraint: &LayoutConstraint) -> Pagination {
    let mut chunk = empty_chunk(constraint.first_page_max_height);
    chunk.blocks = blocks.to_vec();
    chunk.direction = bidi::chunk_direction(&chunk.blocks);
    Pagination {
        chunks: vec![chunk],
        degraded: true,
    }
}

/// Presentation pass: tag every chunk with its text direction.
pub fn tag_directions(chunks: &mut [PageChunk]) {
    for chunk in chunks {
        chunk.direction = bidi::chunk_direction(&chunk.blocks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeasureError;
    use crate::model::{BlockKind, TableRow};

    /// Height of a block is its text read as a number; lists sum their
    /// items, scaled tables are their frame. No margins.
    struct StubMeasurer;

    struct StubSurface;

    fn stub_height(block: &Block) -> f64 {
        match &block.kind {
            BlockKind::ScaledTable { frame_height, .. } => *frame_height,
            BlockKind::List { .. } if !block.children.is_empty() => block.children.iter().map(stub_height).sum(),
            _ => block.text.trim().parse().unwrap_or(0.0),
        }
    }

    impl Measurer for StubMeasurer {
        fn begin(&self, _width: f64) -> Result<Box<dyn MeasureSurface + '_>, MeasureError> {
            Ok(Box::new(StubSurface))
        }
    }

    impl MeasureSurface for StubSurface {
        fn height(&mut self, blocks: &[Block]) -> f64 {
            blocks.iter().map(stub_height).sum()
        }
    }

    struct Unavailable;

    impl Measurer for Unavailable {
        fn begin(&self, _width: f64) -> Result<Box<dyn MeasureSurface + '_>, MeasureError> {
            Err(MeasureError::Unavailable("headless".into()))
        }
    }

    fn para(h: f64) -> Block {
        Block::paragraph(&h.to_string())
    }

    fn heading(h: f64) -> Block {
        Block::heading(2, &h.to_string())
    }

    fn table(h: f64) -> Block {
        Block::table(vec![TableRow {
            header: false,
            cells: vec![h.to_string()],
        }])
    }

    fn list(heights: &[f64]) -> Block {
        Block::list(false, heights.iter().map(|h| Block::list_item(&h.to_string())).collect())
    }

    fn budget(first: f64, other: f64) -> LayoutConstraint {
        LayoutConstraint::new(700.0, first, other)
    }

    #[test]
    fn everything_fits_on_one_chunk() {
        let p = Paginator::new(&StubMeasurer).paginate(&[para(100.0), para(100.0), para(100.0)], &budget(500.0, 500.0));
        assert_eq!(p.len(), 1);
        assert_eq!(p.chunks[0].blocks.len(), 3);
        assert_eq!(p.chunks[0].height, 300.0);
        assert!(!p.degraded);
    }

    #[test]
    fn overflow_moves_block_to_next_chunk() {
        let p = Paginator::new(&StubMeasurer).paginate(&[para(300.0), para(300.0)], &budget(500.0, 400.0));
        assert_eq!(p.len(), 2);
        assert_eq!(p.chunks[1].max_height, 400.0);
        assert_eq!(p.chunks[1].index, 1);
    }

    #[test]
    fn empty_input_yields_one_empty_chunk() {
        let p = Paginator::new(&StubMeasurer).paginate(&[], &budget(500.0, 500.0));
        assert_eq!(p.len(), 1);
        assert!(p.chunks[0].blocks.is_empty());
    }

    #[test]
    fn list_splits_at_largest_prefix() {
        let p = Paginator::new(&StubMeasurer).paginate(&[para(200.0), list(&[100.0; 5])], &budget(500.0, 500.0));
        assert_eq!(p.len(), 2);
        assert_eq!(p.chunks[0].blocks[1].children.len(), 3);
        assert_eq!(p.chunks[1].blocks[0].children.len(), 2);
    }

    #[test]
    fn list_respects_widow_minimum() {
        let policy = BreakPolicy {
            min_items_after_break: 2,
            ..BreakPolicy::default()
        };
        // 4 of 5 items fit; one widow would be left, so 3 stay.
        let p = Paginator::new(&StubMeasurer)
            .with_policy(policy)
            .paginate(&[list(&[100.0; 5])], &budget(400.0, 500.0));
        assert_eq!(p.chunks[0].blocks[0].children.len(), 3);
        assert_eq!(p.chunks[1].blocks[0].children.len(), 2);
    }

    #[test]
    fn oversized_list_item_is_forced_on_fresh_chunk() {
        let p = Paginator::new(&StubMeasurer).paginate(&[list(&[900.0, 10.0])], &budget(500.0, 500.0));
        assert_eq!(p.len(), 2);
        assert!(p.chunks[0].overflowing);
        assert_eq!(p.chunks[0].blocks[0].children.len(), 1);
        assert_eq!(p.chunks[1].blocks[0].children.len(), 1);
    }

    #[test]
    fn glued_pair_is_deferred_together() {
        let blocks = [para(300.0), heading(50.0), table(300.0)];
        let p = Paginator::new(&StubMeasurer).paginate(&blocks, &budget(500.0, 500.0));
        assert_eq!(p.len(), 2);
        assert_eq!(p.chunks[0].blocks.len(), 1);
        assert!(p.chunks[1].blocks[0].is_heading());
        assert!(p.chunks[1].blocks[1].is_table());
    }

    #[test]
    fn glued_pair_scales_table_on_fresh_chunk() {
        let p = Paginator::new(&StubMeasurer).paginate(&[heading(100.0), table(800.0)], &budget(500.0, 500.0));
        assert_eq!(p.len(), 1);
        let chunk = &p.chunks[0];
        match chunk.blocks[1].kind {
            BlockKind::ScaledTable { scale, frame_height } => {
                assert_eq!(frame_height, 400.0);
                assert!((scale - 0.5).abs() < 1e-9);
            }
            ref other => panic!("expected a scaled table, got {other:?}"),
        }
        assert!(chunk.height <= 500.0 + FIT_TOLERANCE);
        assert!(!chunk.overflowing);
    }

    #[test]
    fn tall_heading_still_shares_chunk_with_table() {
        let p = Paginator::new(&StubMeasurer).paginate(&[heading(480.0), table(800.0)], &budget(500.0, 500.0));
        assert_eq!(p.len(), 1);
        assert!(matches!(
            p.chunks[0].blocks[1].kind,
            BlockKind::ScaledTable { frame_height, .. } if frame_height == 20.0
        ));
    }

    #[test]
    fn scaled_table_minimum_is_opt_in() {
        let policy = BreakPolicy {
            min_scaled_table_height: 48.0,
            ..BreakPolicy::default()
        };
        let p = Paginator::new(&StubMeasurer)
            .with_policy(policy)
            .paginate(&[heading(480.0), table(800.0)], &budget(500.0, 500.0));
        assert_eq!(p.len(), 2);
        assert_eq!(p.chunks[0].blocks.len(), 1);
        assert!(p.chunks[0].blocks[0].is_heading());
        assert!(matches!(p.chunks[1].blocks[0].kind, BlockKind::ScaledTable { .. }));
    }

    #[test]
    fn lone_table_scales_to_full_budget() {
        let p = Paginator::new(&StubMeasurer).paginate(&[para(100.0), table(900.0)], &budget(500.0, 450.0));
        assert_eq!(p.len(), 2);
        assert!(matches!(
            p.chunks[1].blocks[0].kind,
            BlockKind::ScaledTable { frame_height, .. } if frame_height == 450.0
        ));
    }

    #[test]
    fn orphan_heading_moves_with_follower() {
        let blocks = [para(400.0), heading(50.0), para(200.0)];
        let p = Paginator::new(&StubMeasurer).paginate(&blocks, &budget(500.0, 500.0));
        assert_eq!(p.len(), 2);
        assert_eq!(p.chunks[0].blocks.len(), 1);
        assert!(p.chunks[1].blocks[0].is_heading());
    }

    #[test]
    fn orphan_rule_can_be_disabled() {
        let policy = BreakPolicy {
            avoid_orphan_headings: false,
            ..BreakPolicy::default()
        };
        let blocks = [para(400.0), heading(50.0), para(200.0)];
        let p = Paginator::new(&StubMeasurer).with_policy(policy).paginate(&blocks, &budget(500.0, 500.0));
        assert_eq!(p.chunks[0].blocks.len(), 2);
    }

    #[test]
    fn heading_stays_when_first_list_item_fits() {
        let blocks = [para(300.0), heading(50.0), list(&[100.0, 100.0, 100.0])];
        let p = Paginator::new(&StubMeasurer).paginate(&blocks, &budget(500.0, 500.0));
        assert!(p.chunks[0].blocks[1].is_heading());
        assert_eq!(p.chunks[0].blocks[2].children.len(), 1);
    }

    #[test]
    fn oversized_block_is_force_placed() {
        let p = Paginator::new(&StubMeasurer).paginate(&[para(100.0), para(2000.0), para(100.0)], &budget(500.0, 500.0));
        assert_eq!(p.len(), 3);
        assert!(p.chunks[1].overflowing);
        assert_eq!(p.chunks[1].blocks.len(), 1);
        assert!(!p.chunks[0].overflowing);
        assert!(!p.chunks[2].overflowing);
    }

    #[test]
    fn unavailable_measurement_degrades() {
        let blocks = [para(100.0), para(2000.0)];
        let p = Paginator::new(&Unavailable).paginate(&blocks, &budget(500.0, 500.0));
        assert!(p.degraded);
        assert_eq!(p.len(), 1);
        assert_eq!(p.chunks[0].blocks.len(), 2);
    }

    #[test]
    fn zero_budget_is_clamped_and_terminates() {
        let blocks: Vec<Block> = (0..10).map(|_| para(30.0)).collect();
        let p = Paginator::new(&StubMeasurer).paginate(&blocks, &budget(0.0, -5.0));
        assert_eq!(p.chunks[0].max_height, crate::model::MIN_PAGE_HEIGHT);
        assert_eq!(p.len(), 10);
    }

    #[test]
    fn rtl_chunks_are_tagged() {
        let p = Paginator::new(&StubMeasurer).paginate(&[Block::paragraph("مرحبا بالعالم")], &budget(500.0, 500.0));
        assert_eq!(p.chunks[0].direction, Direction::Rtl);
    }
}
