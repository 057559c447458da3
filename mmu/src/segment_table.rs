use std::ops::{Deref, DerefMut};

use memory::MemoryError;

use crate::constants::*;
use crate::entry::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentEntry {
    /// Segment length in words.
    pub limit: i32,
    /// Page table location, see [`Location`]. `0` means never assigned.
    pub pointer: i32,
}

impl SegmentEntry {
    pub fn is_assigned(&self) -> bool {
        self.pointer != 0
    }

    pub fn page_table(&self) -> Location {
        Location::from_word(self.pointer)
    }
}

/// The segment table, kept in frames 0 and 1 of physical memory.
/// Entry `s` occupies `PM[2s]` (limit) and `PM[2s + 1]` (pointer).
pub struct SegmentTable<M> {
    memory: M,
}

fn base(segment: u32) -> Result<u64, MemoryError> {
    if segment as usize >= MAX_SEGMENTS {
        return Err(MemoryError::OverCapacity);
    }
    Ok(2 * segment as u64)
}

impl<M: Deref<Target = Memory>> SegmentTable<M> {
    pub fn new(memory: M) -> Self {
        Self { memory }
    }

    pub fn get_entry(&self, segment: u32) -> Result<SegmentEntry, MemoryError> {
        let base = base(segment)?;
        Ok(SegmentEntry {
            limit: self.memory.read_word(base)?,
            pointer: self.memory.read_word(base + 1)?,
        })
    }
}

impl<M: DerefMut<Target = Memory>> SegmentTable<M> {
    pub fn set_entry(&mut self, segment: u32, entry: SegmentEntry) -> Result<(), MemoryError> {
        let base = base(segment)?;
        self.memory.write_word(base, entry.limit)?;
        self.memory.write_word(base + 1, entry.pointer)
    }

    pub fn set_page_table(&mut self, segment: u32, location: Location) -> Result<(), MemoryError> {
        let base = base(segment)?;
        self.memory.write_word(base + 1, location.to_word())
    }
}
