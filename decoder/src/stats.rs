use strum::{EnumCount, IntoEnumIterator};
use tracing::{debug, info};

use crate::{
    event::{AccessKind, MemoryEvent},
    opcodes::OpcodeCategory,
};

/// Counters collected over one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionStats {
    /// Records decoded, which is also the final cycle count.
    pub records: u64,
    /// Decompressed bytes consumed as whole records.
    pub bytes: u64,
    /// Bytes of a trailing partial record that were dropped.
    pub truncated_bytes: u64,
    events: [u64; AccessKind::COUNT],
    categories: [u64; OpcodeCategory::COUNT],
}

impl Default for ConversionStats {
    fn default() -> Self {
        Self {
            records: 0,
            bytes: 0,
            truncated_bytes: 0,
            events: [0; AccessKind::COUNT],
            categories: [0; OpcodeCategory::COUNT],
        }
    }
}

impl ConversionStats {
    pub(crate) fn record(&mut self, category: OpcodeCategory, events: &[MemoryEvent]) {
        self.records += 1;
        self.categories[u8::from(category) as usize] += 1;
        for event in events {
            self.events[event.kind as usize] += 1;
        }
    }

    /// Number of emitted events of the given kind.
    pub fn events(&self, kind: AccessKind) -> u64 {
        self.events[kind as usize]
    }

    /// Total number of emitted events (output lines).
    pub fn total_events(&self) -> u64 {
        self.events.iter().sum()
    }

    /// Number of records of the given category.
    pub fn category(&self, category: OpcodeCategory) -> u64 {
        self.categories[u8::from(category) as usize]
    }

    pub fn log_summary(&self) {
        info!(
            records = self.records,
            bytes = self.bytes,
            prefetches = self.events(AccessKind::Prefetch),
            reads = self.events(AccessKind::Read),
            writes = self.events(AccessKind::Write),
            truncated_bytes = self.truncated_bytes,
            "conversion finished"
        );
        for category in OpcodeCategory::iter() {
            let count = self.category(category);
            if count == 0 {
                continue;
            }
            debug!(category = category.name(), count, "records by category");
        }
    }
}
