use disk::DiskError;
use memory::MemoryError;

/// Why an address was rejected. Every reason prints as `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidAddress {
    #[error("offset within segment is not below the segment limit")]
    SegmentBoundary,
    #[error("word offset is not below the segment limit")]
    OffsetBeyondLimit,
    #[error("segment has no page table")]
    UnassignedSegment,
    #[error("table entry points outside memory or disk")]
    BadTableEntry,
    #[error("physical address out of range")]
    PhysicalOutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TranslationError {
    #[error("invalid address: {0}")]
    InvalidAddress(#[from] InvalidAddress),
    #[error("no free frames")]
    FramesExhausted,
}

impl From<MemoryError> for TranslationError {
    fn from(_: MemoryError) -> Self {
        TranslationError::InvalidAddress(InvalidAddress::BadTableEntry)
    }
}

impl From<DiskError> for TranslationError {
    fn from(_: DiskError) -> Self {
        TranslationError::InvalidAddress(InvalidAddress::BadTableEntry)
    }
}
