//! Delayed transitions with explicit cancellation.
//!
//! The host owns the real timer; it asks for [`Timeline::next_deadline`],
//! sleeps until then and calls [`Timeline::drain_due`]. Nothing fires on its
//! own, so ordering under test depends only on the timestamps passed in.
//! At most one transition of each kind is pending, so cancellation is by kind.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingTransition<K> {
    pub due_ms: f64,
    pub kind: K,
    seq: u64,
}

#[derive(Clone, Debug)]
pub struct Timeline<K> {
    pending: Vec<PendingTransition<K>>,
    next_seq: u64,
    closed: bool,
}

impl<K> Default for Timeline<K> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
            closed: false,
        }
    }
}

impl<K: Copy + PartialEq> Timeline<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `kind` after `delay_ms`, replacing a pending one of the same
    /// kind. Returns `false` once the timeline is closed.
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, kind: K) -> bool {
        if self.closed {
            return false;
        }
        self.cancel_kind(kind);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(PendingTransition {
            due_ms: now_ms + delay_ms.max(0.0),
            kind,
            seq,
        });
        true
    }

    pub fn cancel_kind(&mut self, kind: K) -> bool {
        let before = self.pending.len();
        self.pending.retain(|entry| entry.kind != kind);
        self.pending.len() != before
    }

    pub fn is_pending(&self, kind: K) -> bool {
        self.pending.iter().any(|entry| entry.kind == kind)
    }

    pub fn next_deadline(&self) -> Option<f64> {
        self.pending
            .iter()
            .map(|entry| entry.due_ms)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Removes and returns every transition due at `now_ms`, earliest first;
    /// ties keep scheduling order.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<PendingTransition<K>> {
        let mut due = Vec::new();
        let mut keep = Vec::with_capacity(self.pending.len());
        for entry in self.pending.drain(..) {
            if entry.due_ms <= now_ms {
                due.push(entry);
            } else {
                keep.push(entry);
            }
        }
        self.pending = keep;
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due
    }

    /// Drops everything and refuses new work; used on teardown.
    pub fn close(&mut self) {
        self.pending.clear();
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
