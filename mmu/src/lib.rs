//! Address translation for a segmented, paged virtual memory.
//!
//! Virtual addresses carry a 9-bit segment, page and word field. The segment
//! table lives in frames 0 and 1 of physical memory, every resident page table
//! fills one frame, and non-resident tables and pages are fetched from the
//! paging disk the first time a translation touches them.

pub mod address;
pub mod constants;
pub mod entry;
pub mod error;
pub mod frame_allocator;
pub mod init;
pub mod page_table;
pub mod segment_table;
pub mod translation;

pub use address::VirtualAddress;
pub use constants::*;
pub use entry::Location;
pub use error::{InvalidAddress, TranslationError};
pub use init::{PageInit, SegmentInit};
pub use translation::{Fault, Mmu, Stats, Translation};
