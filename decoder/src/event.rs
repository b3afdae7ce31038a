//! Memory events emitted for each decoded instruction.
//!
//! Every instruction record is mapped to at most two events: one for its load
//! group and one for its store. They are written out in the K6 text format
//! understood by the downstream cache simulators,
//! `0x<address> <TAG> <cycle>`.

use std::fmt;

use smallvec::SmallVec;
use strum_macros::{Display, EnumCount};

use crate::{opcodes::OpcodeCategory, record::TraceInstruction};

/// Events produced by a single record, in emission order.
pub type MemoryEvents = SmallVec<[MemoryEvent; 2]>;

/// Kind of memory access, displayed as its K6 tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumCount, Display)]
pub enum AccessKind {
    #[strum(serialize = "P_FETCH")]
    Prefetch,
    #[strum(serialize = "P_MEM_RD")]
    Read,
    #[strum(serialize = "P_MEM_WR")]
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryEvent {
    pub kind: AccessKind,
    pub addr: u32,
    pub cycle: u64,
}

impl MemoryEvent {
    pub const fn new(kind: AccessKind, addr: u32, cycle: u64) -> Self {
        Self { kind, addr, cycle }
    }
}

impl fmt::Display for MemoryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x} {} {}", self.addr, self.kind, self.cycle)
    }
}

/// Decides which memory events `instr` produces at `cycle`.
///
/// `category` is the record's already-validated opcode category. A record
/// with loads yields one event for `load_addr_1`, a prefetch if `category` is
/// a prefetch category and a read otherwise. `load_addr_2` is never emitted,
/// even for two-load records. A store then yields a write for `store_addr`.
/// Both events share `cycle`.
pub fn classify(instr: &TraceInstruction, category: OpcodeCategory, cycle: u64) -> MemoryEvents {
    let mut events = MemoryEvents::new();

    if instr.num_loads > 0 {
        let kind = if category.is_prefetch() {
            AccessKind::Prefetch
        } else {
            AccessKind::Read
        };
        events.push(MemoryEvent::new(kind, instr.load_addr_1, cycle));
    }

    if instr.has_store() {
        events.push(MemoryEvent::new(AccessKind::Write, instr.store_addr, cycle));
    }

    events
}
