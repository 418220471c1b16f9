//! # Text Direction
//!
//! Decides whether a chunk (or a title) reads left-to-right or right-to-left.
//! Uses `unicode-bidi` for the bidi class of each character and
//! `unicode-script` to tell when the Arabic font face is needed.
//!
//! Direction is presentation only. It is computed after pagination and never
//! feeds back into measurement or break decisions.

use unicode_bidi::{bidi_class, BidiClass};
use unicode_script::{Script, UnicodeScript};

use crate::model::Block;
use crate::style::Direction;

/// Counts of strong directional characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionTally {
    pub ltr: usize,
    pub rtl: usize,
}

impl DirectionTally {
    /// RTL wins only on a strict majority; ties and empty text are LTR.
    pub fn direction(&self) -> Direction {
        if self.rtl > self.ltr {
            Direction::Rtl
        } else {
            Direction::Ltr
        }
    }

    fn strong(&self) -> usize {
        self.ltr + self.rtl
    }

    fn add(&mut self, other: DirectionTally) {
        self.ltr += other.ltr;
        self.rtl += other.rtl;
    }
}

/// Count strong LTR (L) and strong RTL (R, AL) characters. Weak and neutral
/// characters (digits, punctuation, spaces) are not counted.
pub fn tally(text: &str) -> DirectionTally {
    let mut t = DirectionTally::default();
    for ch in text.chars() {
        match bidi_class(ch) {
            BidiClass::L => t.ltr += 1,
            BidiClass::R | BidiClass::AL => t.rtl += 1,
            _ => {}
        }
    }
    t
}

/// Direction of a piece of text by strong-character majority.
pub fn detect_direction(text: &str) -> Direction {
    tally(text).direction()
}

/// Direction of a chunk of blocks.
///
/// A block with an explicit `dir` attribute puts all of its strong
/// characters on that side; other blocks are tallied character by character.
pub fn chunk_direction(blocks: &[Block]) -> Direction {
    let mut total = DirectionTally::default();
    for block in blocks {
        total.add(block_tally(block));
    }
    total.direction()
}

fn block_tally(block: &Block) -> DirectionTally {
    let hinted = block.attribute("dir").map(|d| d.trim().to_ascii_lowercase());
    match hinted.as_deref() {
        Some("rtl") => {
            let strong = tally(&block.text).strong();
            DirectionTally { ltr: 0, rtl: strong }
        }
        Some("ltr") => {
            let strong = tally(&block.text).strong();
            DirectionTally { ltr: strong, rtl: 0 }
        }
        _ if !block.children.is_empty() => {
            let mut t = DirectionTally::default();
            for child in &block.children {
                t.add(block_tally(child));
            }
            t
        }
        _ => tally(&block.text),
    }
}

/// Whether any character is in the Arabic script, which switches titles to
/// the Arabic font face.
pub fn needs_arabic_face(text: &str) -> bool {
    text.chars().any(|ch| ch.script() == Script::Arabic)
}
