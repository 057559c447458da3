use log::info;

#[derive(Debug, PartialEq)]
pub enum MemoryError {
    OverCapacity,
    IncorrectFrameSize,
}

/// Word-addressed physical memory of `CAPACITY` words, zeroed at creation.
#[derive(Debug, Clone)]
pub struct PhysicalMemory<const CAPACITY: usize> {
    buffer: Box<[i32]>,
}

impl<const CAPACITY: usize> PhysicalMemory<CAPACITY> {
    pub fn create() -> Self {
        assert!(
            CAPACITY.is_power_of_two(),
            "Capacity {} is not a power of 2",
            CAPACITY
        );
        Self {
            buffer: vec![0; CAPACITY].into_boxed_slice(),
        }
    }

    pub fn check_address(&self, address: u64) -> Result<(), MemoryError> {
        if address >= CAPACITY as u64 {
            return Err(MemoryError::OverCapacity);
        }
        Ok(())
    }

    pub fn read_word(&self, address: u64) -> Result<i32, MemoryError> {
        self.check_address(address)?;
        Ok(self.buffer[address as usize])
    }

    pub fn write_word(&mut self, address: u64, word: i32) -> Result<(), MemoryError> {
        self.check_address(address)?;
        self.buffer[address as usize] = word;
        Ok(())
    }

    /// Overwrite the frame `frame_number` (of `frame.len()` words) with `frame`.
    pub fn load_frame(&mut self, frame_number: usize, frame: &[i32]) -> Result<(), MemoryError> {
        let frame_size = frame.len();
        if frame_size == 0 || CAPACITY % frame_size != 0 {
            return Err(MemoryError::IncorrectFrameSize);
        }
        if frame_number >= CAPACITY / frame_size {
            return Err(MemoryError::OverCapacity);
        }
        let start = frame_number * frame_size;
        info!(
            "Loading frame[{}] (PM[{}..{}])",
            frame_number,
            start,
            start + frame_size
        );
        self.buffer[start..start + frame_size].copy_from_slice(frame);
        Ok(())
    }
}

impl<const CAPACITY: usize> Default for PhysicalMemory<CAPACITY> {
    fn default() -> Self {
        Self::create()
    }
}
