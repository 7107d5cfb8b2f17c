/// Ticket handed out when an asynchronous request is issued.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub u64);

/// Last-write-wins guard for superseding requests.
///
/// Every `issue` supersedes all earlier tickets. A response is applied only if
/// it carries the most recently issued ticket and has not been applied yet, so
/// a slow early response can never overwrite a later one.
#[derive(Debug, Default, Clone)]
pub struct RequestSequencer {
    latest: u64,
    applied: bool,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> Ticket {
        self.latest = self.latest.wrapping_add(1);
        self.applied = false;
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest && !self.applied
    }

    /// Marks `ticket` as applied. Returns `false` for stale or already-applied tickets.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.applied = true;
        true
    }

    /// Supersedes any outstanding ticket without issuing a new one.
    pub fn invalidate(&mut self) {
        self.latest = self.latest.wrapping_add(1);
        self.applied = true;
    }
}
