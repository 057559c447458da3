use log::{debug, info};

#[derive(Debug, PartialEq)]
pub enum DiskError {
    IncorrectBlockSize,
    OverCapacity,
    OffsetOutOfBlock,
}

/// Paging disk. `CAPACITY` words split into `CAPACITY / BLOCKSIZE` blocks,
/// each block the size of one memory frame.
#[derive(Debug, Clone)]
pub struct Disk<const BLOCKSIZE: usize, const CAPACITY: usize> {
    words: Box<[i32]>,
}

impl<const BLOCKSIZE: usize, const CAPACITY: usize> Disk<BLOCKSIZE, CAPACITY> {
    pub fn create() -> Self {
        assert!(BLOCKSIZE > 0, "Block size must not be zero");
        assert_eq!(
            CAPACITY % BLOCKSIZE,
            0,
            "Capacity must be a multiply of BlockSize"
        );
        Self {
            words: vec![0; CAPACITY].into_boxed_slice(),
        }
    }

    pub const fn block_count() -> usize {
        CAPACITY / BLOCKSIZE
    }

    fn check_block(block_number: usize) -> Result<(), DiskError> {
        if block_number >= Self::block_count() {
            return Err(DiskError::OverCapacity);
        }
        Ok(())
    }

    fn block_range(block_number: usize) -> std::ops::Range<usize> {
        block_number * BLOCKSIZE..(block_number + 1) * BLOCKSIZE
    }

    pub fn read_block(&self, block_number: usize) -> Result<&[i32], DiskError> {
        Self::check_block(block_number)?;
        info!("Reading block[{}]", block_number);
        Ok(&self.words[Self::block_range(block_number)])
    }

    pub fn write_block(&mut self, block_number: usize, block: &[i32]) -> Result<(), DiskError> {
        if block.len() != BLOCKSIZE {
            return Err(DiskError::IncorrectBlockSize);
        }
        Self::check_block(block_number)?;
        info!("Writing block[{}]", block_number);
        self.words[Self::block_range(block_number)].copy_from_slice(block);
        Ok(())
    }

    pub fn read_word(&self, block_number: usize, offset: usize) -> Result<i32, DiskError> {
        Self::check_block(block_number)?;
        if offset >= BLOCKSIZE {
            return Err(DiskError::OffsetOutOfBlock);
        }
        Ok(self.words[block_number * BLOCKSIZE + offset])
    }

    pub fn write_word(
        &mut self,
        block_number: usize,
        offset: usize,
        word: i32,
    ) -> Result<(), DiskError> {
        Self::check_block(block_number)?;
        if offset >= BLOCKSIZE {
            return Err(DiskError::OffsetOutOfBlock);
        }
        debug!("D[{}][{}] = {}", block_number, offset, word);
        self.words[block_number * BLOCKSIZE + offset] = word;
        Ok(())
    }
}

impl<const BLOCKSIZE: usize, const CAPACITY: usize> Default for Disk<BLOCKSIZE, CAPACITY> {
    fn default() -> Self {
        Self::create()
    }
}
