use crate::engine::IntDomainEvent;

/// A value that left a domain, together with the kind of change that removed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DeltaEntry {
    pub(crate) value: i32,
    pub(crate) event: IntDomainEvent,
}

/// The values removed from one domain at the current search node.
///
/// The log is only ever appended to. It is cleared lazily: the first removal at a node with a
/// newer timestamp than the one the log was last written at starts a fresh log.
#[derive(Debug, Clone, Default)]
pub(crate) struct DomainDelta {
    entries: Vec<DeltaEntry>,
    timestamp: Option<u64>,
}

impl DomainDelta {
    pub(crate) fn record(&mut self, value: i32, event: IntDomainEvent, timestamp: u64) {
        if self.timestamp != Some(timestamp) {
            self.entries.clear();
            self.timestamp = Some(timestamp);
        }
        self.entries.push(DeltaEntry { value, event });
    }

    pub(crate) fn timestamp(&self) -> Option<u64> {
        self.timestamp
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn entries(&self, start: usize, end: usize) -> &[DeltaEntry] {
        &self.entries[start..end]
    }
}
