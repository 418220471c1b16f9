//! # Page Break Decisions
//!
//! Where to cut a list that does not fit on the current chunk. The fill loop
//! finds how many items fit; this module applies the orphan/widow minimums
//! on top of that count.

/// What to do with a list that overflows the current chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakDecision {
    /// Place the entire list on the current chunk (it fits).
    Place,
    /// Move the entire list to the next chunk.
    MoveToNextPage,
    /// Split the list: the first items stay, the rest continue on the next chunk.
    Split {
        /// How many items stay on the current chunk.
        items_on_current_page: usize,
    },
}

/// Decide how to break a list of `total_items` items of which the first
/// `fit_count` fit on the current chunk.
///
/// `min_before` is the fewest items allowed at the bottom of a chunk,
/// `min_after` the fewest carried to the next one. With both at 1 this is
/// the plain "largest fitting prefix" rule.
pub fn decide_list_break(
    fit_count: usize,
    total_items: usize,
    min_before: usize,
    min_after: usize,
) -> BreakDecision {
    if fit_count >= total_items {
        return BreakDecision::Place;
    }

    // Orphan control: too few items would stay behind.
    if fit_count == 0 || fit_count < min_before {
        return BreakDecision::MoveToNextPage;
    }

    // Widow control: pull items back so enough move on together.
    let remaining_items = total_items - fit_count;
    if remaining_items < min_after {
        let adjusted = fit_count.saturating_sub(min_after - remaining_items);
        if adjusted == 0 || adjusted < min_before {
            return BreakDecision::MoveToNextPage;
        }
        return BreakDecision::Split {
            items_on_current_page: adjusted,
        };
    }

    BreakDecision::Split {
        items_on_current_page: fit_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_fits() {
        assert_eq!(decide_list_break(3, 3, 1, 1), BreakDecision::Place);
    }

    #[test]
    fn nothing_fits_moves() {
        assert_eq!(decide_list_break(0, 5, 1, 1), BreakDecision::MoveToNextPage);
    }

    #[test]
    fn split_at_largest_prefix() {
        assert_eq!(
            decide_list_break(12, 20, 1, 1),
            BreakDecision::Split {
                items_on_current_page: 12,
            }
        );
    }

    #[test]
    fn orphan_control() {
        // Only 1 item would fit, but at least 2 must stay together.
        assert_eq!(decide_list_break(1, 3, 2, 2), BreakDecision::MoveToNextPage);
    }

    #[test]
    fn widow_control() {
        // 3 of 4 fit, leaving 1 widow (min=2): pull one back.
        assert_eq!(
            decide_list_break(3, 4, 2, 2),
            BreakDecision::Split {
                items_on_current_page: 2,
            }
        );
    }

    #[test]
    fn widow_control_can_empty_the_chunk() {
        assert_eq!(decide_list_break(2, 3, 2, 2), BreakDecision::MoveToNextPage);
    }
}
