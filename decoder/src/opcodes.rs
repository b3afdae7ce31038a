use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::EnumCount;
use strum_macros::{Display, EnumCount, EnumIter, IntoStaticStr};

use crate::error::TraceError;

/// Instruction categories as numbered by the MacSim trace generator.
///
/// The discriminants are shared with the producer of the trace files and must
/// never be renumbered. Categories `1..=55` follow Intel XED's
/// `XED_CATEGORY_*` ordering, the rest are MacSim additions.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumCount,
    EnumIter,
    Display,
    IntoStaticStr,
    TryFromPrimitive,
    IntoPrimitive,
)]
#[repr(u8)]
pub enum OpcodeCategory {
    #[default]
    #[strum(serialize = "XED_CATEGORY_INVALID")]
    Invalid = 0,
    #[strum(serialize = "XED_CATEGORY_3DNOW")]
    ThreeDNow = 1,
    #[strum(serialize = "XED_CATEGORY_AES")]
    Aes = 2,
    #[strum(serialize = "XED_CATEGORY_AVX")]
    Avx = 3,
    #[strum(serialize = "XED_CATEGORY_AVX2")]
    Avx2 = 4,
    #[strum(serialize = "XED_CATEGORY_AVX2GATHER")]
    Avx2Gather = 5,
    #[strum(serialize = "XED_CATEGORY_BDW")]
    Bdw = 6,
    #[strum(serialize = "XED_CATEGORY_BINARY")]
    Binary = 7,
    #[strum(serialize = "XED_CATEGORY_BITBYTE")]
    BitByte = 8,
    #[strum(serialize = "XED_CATEGORY_BMI1")]
    Bmi1 = 9,
    #[strum(serialize = "XED_CATEGORY_BMI2")]
    Bmi2 = 10,
    #[strum(serialize = "XED_CATEGORY_BROADCAST")]
    Broadcast = 11,
    #[strum(serialize = "XED_CATEGORY_CALL")]
    Call = 12,
    #[strum(serialize = "XED_CATEGORY_CMOV")]
    Cmov = 13,
    #[strum(serialize = "XED_CATEGORY_COND_BR")]
    CondBr = 14,
    #[strum(serialize = "XED_CATEGORY_CONVERT")]
    Convert = 15,
    #[strum(serialize = "XED_CATEGORY_DATAXFER")]
    DataXfer = 16,
    #[strum(serialize = "XED_CATEGORY_DECIMAL")]
    Decimal = 17,
    #[strum(serialize = "XED_CATEGORY_FCMOV")]
    Fcmov = 18,
    #[strum(serialize = "XED_CATEGORY_FLAGOP")]
    FlagOp = 19,
    #[strum(serialize = "XED_CATEGORY_FMA4")]
    Fma4 = 20,
    #[strum(serialize = "XED_CATEGORY_INTERRUPT")]
    Interrupt = 21,
    #[strum(serialize = "XED_CATEGORY_IO")]
    Io = 22,
    #[strum(serialize = "XED_CATEGORY_IOSTRINGOP")]
    IoStringOp = 23,
    #[strum(serialize = "XED_CATEGORY_LOGICAL")]
    Logical = 24,
    #[strum(serialize = "XED_CATEGORY_LZCNT")]
    Lzcnt = 25,
    #[strum(serialize = "XED_CATEGORY_MISC")]
    Misc = 26,
    #[strum(serialize = "XED_CATEGORY_MMX")]
    Mmx = 27,
    #[strum(serialize = "XED_CATEGORY_NOP")]
    Nop = 28,
    #[strum(serialize = "XED_CATEGORY_PCLMULQDQ")]
    Pclmulqdq = 29,
    #[strum(serialize = "XED_CATEGORY_POP")]
    Pop = 30,
    #[strum(serialize = "XED_CATEGORY_PREFETCH")]
    Prefetch = 31,
    #[strum(serialize = "XED_CATEGORY_PUSH")]
    Push = 32,
    #[strum(serialize = "XED_CATEGORY_RDRAND")]
    Rdrand = 33,
    #[strum(serialize = "XED_CATEGORY_RDSEED")]
    Rdseed = 34,
    #[strum(serialize = "XED_CATEGORY_RDWRFSGS")]
    RdWrFsGs = 35,
    #[strum(serialize = "XED_CATEGORY_RET")]
    Ret = 36,
    #[strum(serialize = "XED_CATEGORY_ROTATE")]
    Rotate = 37,
    #[strum(serialize = "XED_CATEGORY_SEGOP")]
    SegOp = 38,
    #[strum(serialize = "XED_CATEGORY_SEMAPHORE")]
    Semaphore = 39,
    #[strum(serialize = "XED_CATEGORY_SHIFT")]
    Shift = 40,
    #[strum(serialize = "XED_CATEGORY_SSE")]
    Sse = 41,
    #[strum(serialize = "XED_CATEGORY_STRINGOP")]
    StringOp = 42,
    #[strum(serialize = "XED_CATEGORY_STTNI")]
    Sttni = 43,
    #[strum(serialize = "XED_CATEGORY_SYSCALL")]
    Syscall = 44,
    #[strum(serialize = "XED_CATEGORY_SYSRET")]
    Sysret = 45,
    #[strum(serialize = "XED_CATEGORY_SYSTEM")]
    System = 46,
    #[strum(serialize = "XED_CATEGORY_TBM")]
    Tbm = 47,
    #[strum(serialize = "XED_CATEGORY_UNCOND_BR")]
    UncondBr = 48,
    #[strum(serialize = "XED_CATEGORY_VFMA")]
    Vfma = 49,
    #[strum(serialize = "XED_CATEGORY_VTX")]
    Vtx = 50,
    #[strum(serialize = "XED_CATEGORY_WIDENOP")]
    WideNop = 51,
    #[strum(serialize = "XED_CATEGORY_X87_ALU")]
    X87Alu = 52,
    #[strum(serialize = "XED_CATEGORY_XOP")]
    Xop = 53,
    #[strum(serialize = "XED_CATEGORY_XSAVE")]
    Xsave = 54,
    #[strum(serialize = "XED_CATEGORY_XSAVEOPT")]
    XsaveOpt = 55,

    // MacSim-specific categories
    #[strum(serialize = "TR_MUL")]
    TrMul = 56,
    #[strum(serialize = "TR_DIV")]
    TrDiv = 57,
    #[strum(serialize = "TR_FMUL")]
    TrFmul = 58,
    #[strum(serialize = "TR_FDIV")]
    TrFdiv = 59,
    #[strum(serialize = "TR_NOP")]
    TrNop = 60,
    #[strum(serialize = "PREFETCH_NTA")]
    PrefetchNta = 61,
    #[strum(serialize = "PREFETCH_T0")]
    PrefetchT0 = 62,
    #[strum(serialize = "PREFETCH_T1")]
    PrefetchT1 = 63,
    #[strum(serialize = "PREFETCH_T2")]
    PrefetchT2 = 64,
    #[strum(serialize = "GPU_EN")]
    GpuEn = 65,
}

impl OpcodeCategory {
    /// The trace generator's `CPU_OPCODE_LAST` sentinel. Any raw opcode at or
    /// above this value is corrupt.
    pub const LAST: u8 = Self::COUNT as u8;

    /// Looks up the category of a raw opcode byte taken from the record
    /// decoded at `cycle`.
    pub fn category_of(code: u8, cycle: u64) -> Result<Self, TraceError> {
        Self::try_from(code).map_err(|_| TraceError::InvalidOpcode { code, cycle })
    }

    /// Returns the producer's name for this category, e.g. `PREFETCH_NTA`.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Whether a load performed by this category is a software prefetch.
    ///
    /// Covers the generic XED prefetch category as well as the MacSim hint
    /// subtypes `PREFETCH_NTA..=PREFETCH_T2`.
    pub fn is_prefetch(self) -> bool {
        self == Self::Prefetch
            || (u8::from(Self::PrefetchNta)..=u8::from(Self::PrefetchT2)).contains(&u8::from(self))
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_sentinel_matches_producer() {
        assert_eq!(OpcodeCategory::LAST, 66);
        assert_eq!(u8::from(OpcodeCategory::GpuEn) + 1, OpcodeCategory::LAST);
    }

    #[test]
    fn test_discriminants_are_dense() {
        for (index, category) in OpcodeCategory::iter().enumerate() {
            assert_eq!(u8::from(category) as usize, index, "{category} is out of order");
            assert_eq!(OpcodeCategory::try_from(index as u8).ok(), Some(category));
        }
    }

    #[test]
    fn test_wire_values() {
        assert_eq!(u8::from(OpcodeCategory::DataXfer), 16);
        assert_eq!(u8::from(OpcodeCategory::Prefetch), 31);
        assert_eq!(u8::from(OpcodeCategory::UncondBr), 48);
        assert_eq!(u8::from(OpcodeCategory::TrMul), 56);
        assert_eq!(u8::from(OpcodeCategory::PrefetchNta), 61);
        assert_eq!(u8::from(OpcodeCategory::PrefetchT2), 64);
    }

    #[test]
    fn test_out_of_range_codes_are_rejected() {
        for code in OpcodeCategory::LAST..=u8::MAX {
            match OpcodeCategory::category_of(code, 7) {
                Err(TraceError::InvalidOpcode { code: c, cycle }) => {
                    assert_eq!(c, code);
                    assert_eq!(cycle, 7);
                }
                other => panic!("code {code} decoded as {other:?}"),
            }
        }
    }

    #[test]
    fn test_prefetch_categories() {
        let prefetches: Vec<_> = OpcodeCategory::iter()
            .filter(|c| c.is_prefetch())
            .collect();
        assert_eq!(
            prefetches,
            vec![
                OpcodeCategory::Prefetch,
                OpcodeCategory::PrefetchNta,
                OpcodeCategory::PrefetchT0,
                OpcodeCategory::PrefetchT1,
                OpcodeCategory::PrefetchT2,
            ]
        );
    }

    #[test]
    fn test_names() {
        assert_eq!(OpcodeCategory::ThreeDNow.name(), "XED_CATEGORY_3DNOW");
        assert_eq!(OpcodeCategory::PrefetchT1.to_string(), "PREFETCH_T1");
        assert_eq!(OpcodeCategory::default(), OpcodeCategory::Invalid);
    }
}
