use log::{debug, warn};

use crate::constants::*;
use crate::entry::Location;
use crate::page_table::PageTable;
use crate::segment_table::{SegmentEntry, SegmentTable};
use crate::translation::Mmu;

/// Segment table entry `(s, z, f)` from the first initialization line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentInit {
    pub segment: u32,
    pub limit: i32,
    pub pointer: i32,
}

/// Page table entry `(s, p, f)` from the second initialization line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInit {
    pub segment: u32,
    pub page: u32,
    pub pointer: i32,
}

impl Mmu {
    /// Write segment table entries. A resident page table takes its frame
    /// out of the allocator. Returns how many entries were applied.
    pub fn load_segments(&mut self, entries: &[SegmentInit]) -> usize {
        let mut applied = 0;
        for entry in entries {
            let written = SegmentTable::new(&mut self.memory).set_entry(
                entry.segment,
                SegmentEntry {
                    limit: entry.limit,
                    pointer: entry.pointer,
                },
            );
            if written.is_err() {
                warn!("Ignoring segment {}: outside the segment table", entry.segment);
                continue;
            }
            if let Location::Resident { frame } = Location::from_word(entry.pointer) {
                self.frames.mark_used(frame);
            }
            debug!(
                "ST[{}] = (z={}, f={})",
                entry.segment, entry.limit, entry.pointer
            );
            applied += 1;
        }
        applied
    }

    /// Write page table entries, either into the resident page table or,
    /// when the segment's page table is still on disk, into its block.
    ///
    /// Data frames named here are not reserved in the allocator.
    pub fn load_pages(&mut self, entries: &[PageInit]) -> usize {
        let mut applied = 0;
        for entry in entries {
            let segment = match SegmentTable::new(&self.memory).get_entry(entry.segment) {
                Ok(segment) => segment,
                Err(_) => {
                    warn!("Ignoring page entry for segment {}: outside the segment table", entry.segment);
                    continue;
                }
            };
            if !segment.is_assigned() {
                warn!(
                    "Page entry ({}, {}) targets unassigned segment {}; writing PM[{}]",
                    entry.segment, entry.page, entry.segment, entry.page
                );
            }
            let written = match segment.page_table() {
                Location::Resident { frame } => PageTable::read(&mut self.memory, frame)
                    .set_raw(entry.page, entry.pointer)
                    .is_ok(),
                Location::Disk { block } => {
                    (entry.page as usize) < PT_SIZE
                        && self
                            .disk
                            .write_word(block as usize, entry.page as usize, entry.pointer)
                            .is_ok()
                }
            };
            if !written {
                warn!(
                    "Ignoring page entry ({}, {}, {}): page table location {:?} is out of range",
                    entry.segment,
                    entry.page,
                    entry.pointer,
                    segment.page_table()
                );
                continue;
            }
            applied += 1;
        }
        applied
    }
}
