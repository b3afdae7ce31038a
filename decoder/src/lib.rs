//! Decoder for gzip-compressed MacSim CPU instruction traces.
//!
//! The decoder frames the decompressed stream into fixed-size
//! [`TraceInstruction`] records, classifies each one into at most two
//! [`MemoryEvent`]s and writes them out as a memory-access trace, one
//! `0x<address> <TAG> <cycle>` line per event.

mod error;
mod event;
mod execution;
mod opcodes;
mod record;
mod stats;
mod stream;
mod util;

pub use error::{Result, TraceError};
pub use event::{classify, AccessKind, MemoryEvent, MemoryEvents};
pub use execution::{
    convert, detect_container, Container, Outcome, Rewound, TraceConverter, GZIP_MAGIC,
};
pub use opcodes::OpcodeCategory;
pub use record::{RawInstruction, TraceInstruction, MAX_DST_REGS, MAX_SRC_REGS, RECORD_LEN};
pub use stats::ConversionStats;
pub use stream::{DecoderConfig, StreamDecoder, DEFAULT_CHUNK_SIZE};
pub use util::init_logger;
