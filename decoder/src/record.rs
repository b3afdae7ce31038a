//! On-disk layout of a MacSim CPU trace record.
//!
//! Records are stored back to back with no padding. Multi-byte fields are
//! big-endian, which is how the existing trace corpus is read.

use bytemuck::{Pod, Zeroable};

use crate::{
    error::{Result, TraceError},
    opcodes::OpcodeCategory,
};

/// Maximum number of source registers a record can name.
pub const MAX_SRC_REGS: usize = 9;
/// Maximum number of destination registers a record can name.
pub const MAX_DST_REGS: usize = 6;

/// Size in bytes of one encoded record.
pub const RECORD_LEN: usize = size_of::<RawInstruction>();

/// Byte-exact view of an encoded record.
///
/// Every field is a byte or a byte array, so the struct has alignment 1 and no
/// padding and can be cast directly from the decompressed stream.
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct RawInstruction {
    pub num_read_regs: u8,
    pub num_dest_regs: u8,
    pub src_regs: [u8; MAX_SRC_REGS],
    pub dst_regs: [u8; MAX_DST_REGS],
    pub cf_type: u8,
    pub has_immediate: u8,
    pub opcode: u8,
    pub has_store: u8,
    pub is_fp: u8,
    pub write_flag: u8,
    pub num_loads: u8,
    pub size: u8,
    pub load_addr_1: [u8; 4],
    pub load_addr_2: [u8; 4],
    pub store_addr: [u8; 4],
    pub instruction_addr: [u8; 4],
    pub branch_target: [u8; 4],
    pub mem_read_size: u8,
    pub mem_write_size: u8,
    pub rep_dir: u8,
    pub actually_taken: u8,
}

const _: () = assert!(RECORD_LEN == 49);

/// One decoded instruction record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceInstruction {
    pub num_read_regs: u8,
    pub num_dest_regs: u8,
    pub src_regs: [u8; MAX_SRC_REGS],
    pub dst_regs: [u8; MAX_DST_REGS],
    pub cf_type: u8,
    pub has_immediate: u8,
    /// Raw opcode byte; see [`TraceInstruction::opcode_category`].
    pub opcode: u8,
    pub has_store: u8,
    pub is_fp: u8,
    pub write_flag: u8,
    pub num_loads: u8,
    pub size: u8,
    pub load_addr_1: u32,
    pub load_addr_2: u32,
    pub store_addr: u32,
    pub instruction_addr: u32,
    pub branch_target: u32,
    pub mem_read_size: u8,
    pub mem_write_size: u8,
    pub rep_dir: u8,
    pub actually_taken: u8,
}

impl TraceInstruction {
    /// Decodes one record.
    pub fn parse(raw: &[u8; RECORD_LEN]) -> Self {
        let raw: &RawInstruction = bytemuck::cast_ref(raw);
        Self::from(raw)
    }

    /// Decodes one record from an unsized slice, which must be exactly
    /// [`RECORD_LEN`] bytes long.
    pub fn from_slice(raw: &[u8]) -> Result<Self> {
        let raw: &[u8; RECORD_LEN] = raw.try_into().map_err(|_| TraceError::RecordLength {
            expected: RECORD_LEN,
            actual: raw.len(),
        })?;
        Ok(Self::parse(raw))
    }

    /// Encodes this record back into its on-disk form.
    pub fn to_bytes(&self) -> [u8; RECORD_LEN] {
        bytemuck::cast(RawInstruction::from(self))
    }

    /// Resolves the opcode byte. `cycle` is only used for error reporting.
    pub fn opcode_category(&self, cycle: u64) -> Result<OpcodeCategory> {
        OpcodeCategory::category_of(self.opcode, cycle)
    }

    pub fn has_store(&self) -> bool {
        self.has_store != 0
    }

    pub fn has_immediate(&self) -> bool {
        self.has_immediate != 0
    }

    pub fn is_fp(&self) -> bool {
        self.is_fp != 0
    }

    pub fn actually_taken(&self) -> bool {
        self.actually_taken != 0
    }

    /// Source register ids actually used by the instruction.
    pub fn src_regs(&self) -> &[u8] {
        &self.src_regs[..(self.num_read_regs as usize).min(MAX_SRC_REGS)]
    }

    /// Destination register ids actually used by the instruction.
    pub fn dst_regs(&self) -> &[u8] {
        &self.dst_regs[..(self.num_dest_regs as usize).min(MAX_DST_REGS)]
    }
}

impl From<&RawInstruction> for TraceInstruction {
    fn from(raw: &RawInstruction) -> Self {
        Self {
            num_read_regs: raw.num_read_regs,
            num_dest_regs: raw.num_dest_regs,
            src_regs: raw.src_regs,
            dst_regs: raw.dst_regs,
            cf_type: raw.cf_type,
            has_immediate: raw.has_immediate,
            opcode: raw.opcode,
            has_store: raw.has_store,
            is_fp: raw.is_fp,
            write_flag: raw.write_flag,
            num_loads: raw.num_loads,
            size: raw.size,
            load_addr_1: u32::from_be_bytes(raw.load_addr_1),
            load_addr_2: u32::from_be_bytes(raw.load_addr_2),
            store_addr: u32::from_be_bytes(raw.store_addr),
            instruction_addr: u32::from_be_bytes(raw.instruction_addr),
            branch_target: u32::from_be_bytes(raw.branch_target),
            mem_read_size: raw.mem_read_size,
            mem_write_size: raw.mem_write_size,
            rep_dir: raw.rep_dir,
            actually_taken: raw.actually_taken,
        }
    }
}

impl From<&TraceInstruction> for RawInstruction {
    fn from(instr: &TraceInstruction) -> Self {
        Self {
            num_read_regs: instr.num_read_regs,
            num_dest_regs: instr.num_dest_regs,
            src_regs: instr.src_regs,
            dst_regs: instr.dst_regs,
            cf_type: instr.cf_type,
            has_immediate: instr.has_immediate,
            opcode: instr.opcode,
            has_store: instr.has_store,
            is_fp: instr.is_fp,
            write_flag: instr.write_flag,
            num_loads: instr.num_loads,
            size: instr.size,
            load_addr_1: instr.load_addr_1.to_be_bytes(),
            load_addr_2: instr.load_addr_2.to_be_bytes(),
            store_addr: instr.store_addr.to_be_bytes(),
            instruction_addr: instr.instruction_addr.to_be_bytes(),
            branch_target: instr.branch_target.to_be_bytes(),
            mem_read_size: instr.mem_read_size,
            mem_write_size: instr.mem_write_size,
            rep_dir: instr.rep_dir,
            actually_taken: instr.actually_taken,
        }
    }
}
