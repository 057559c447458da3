use std::ops::{Deref, DerefMut};

use memory::MemoryError;

use crate::constants::*;
use crate::entry::Location;

/// A resident page table: one whole frame, entry `p` at `frame * FRAME_SIZE + p`.
pub struct PageTable<M> {
    memory: M,
    frame: u32,
}

impl<M> PageTable<M> {
    fn entry_address(&self, page: u32) -> Result<u64, MemoryError> {
        if page as usize >= PT_SIZE {
            return Err(MemoryError::OverCapacity);
        }
        Ok(self.frame as u64 * FRAME_SIZE as u64 + page as u64)
    }
}

impl<M: Deref<Target = Memory>> PageTable<M> {
    pub fn read(memory: M, frame: u32) -> Self {
        Self { memory, frame }
    }

    pub fn get_raw(&self, page: u32) -> Result<i32, MemoryError> {
        self.memory.read_word(self.entry_address(page)?)
    }

    pub fn get_entry(&self, page: u32) -> Result<Location, MemoryError> {
        self.get_raw(page).map(Location::from_word)
    }
}

impl<M: DerefMut<Target = Memory>> PageTable<M> {
    pub fn set_raw(&mut self, page: u32, word: i32) -> Result<(), MemoryError> {
        let address = self.entry_address(page)?;
        self.memory.write_word(address, word)
    }

    pub fn map_to_frame(&mut self, page: u32, frame: u32) -> Result<(), MemoryError> {
        self.set_raw(page, Location::Resident { frame }.to_word())
    }
}
