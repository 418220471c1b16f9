//! Newest-result-wins bookkeeping for hosts that re-paginate on every
//! content change.
//!
//! The engine has no cancellation. A host that may still be holding the
//! result of an older pass asks for a [`Ticket`] before each pass and hands
//! it back with the result; only the ticket of the latest request is
//! accepted.

use crate::layout::Pagination;

/// Revision stamp of one pagination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn revision(&self) -> u64 {
        self.0
    }
}

/// The chunks currently on display, plus the latest requested revision.
#[derive(Debug, Default)]
pub struct PreviewState {
    requested: u64,
    committed: Option<u64>,
    current: Option<Pagination>,
}

impl PreviewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a content change. Every earlier ticket becomes stale.
    pub fn request(&mut self) -> Ticket {
        self.requested += 1;
        Ticket(self.requested)
    }

    /// Offer the result of the pass started with `ticket`. Returns `false`
    /// and drops the result when a newer request has been made since.
    pub fn commit(&mut self, ticket: Ticket, pagination: Pagination) -> bool {
        if ticket.0 != self.requested {
            log::debug!(
                "discarding stale pagination (revision {}, latest {})",
                ticket.0,
                self.requested
            );
            return false;
        }
        self.committed = Some(ticket.0);
        self.current = Some(pagination);
        true
    }

    /// The latest accepted pagination.
    pub fn current(&self) -> Option<&Pagination> {
        self.current.as_ref()
    }

    /// Revision of the latest accepted pagination.
    pub fn committed_revision(&self) -> Option<u64> {
        self.committed
    }

    /// A request is outstanding that has not been committed yet.
    pub fn is_pending(&self) -> bool {
        self.committed != Some(self.requested) && self.requested > 0
    }
}
