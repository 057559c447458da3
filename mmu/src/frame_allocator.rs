use log::{debug, warn};

/// Bitmap over `FRAMES` physical frames, one bit per frame, set when used.
///
/// Frames are handed out lowest index first and never given back.
#[derive(Debug, Clone)]
pub struct FrameAllocator<const FRAMES: usize> {
    bitmap: Vec<u8>,
}

impl<const FRAMES: usize> FrameAllocator<FRAMES> {
    /// How many bytes are required to store the bitmap
    pub fn bitmap_size() -> usize {
        FRAMES / 8 + if FRAMES % 8 == 0 { 0 } else { 1 }
    }

    /// Allocator with frames `0..reserved` already taken.
    pub fn new(reserved: usize) -> Self {
        let mut allocator = Self {
            bitmap: vec![0u8; Self::bitmap_size()],
        };
        for _ in 0..reserved.min(FRAMES) {
            allocator.allocate();
        }
        allocator
    }

    pub fn allocate(&mut self) -> Option<u32> {
        for i in 0..self.bitmap.len() {
            if self.bitmap[i] == u8::MAX {
                continue;
            }
            for j in 0..8 {
                let frame = i * 8 + j;
                if frame >= FRAMES {
                    break;
                }
                if self.bitmap[i] & (1 << j) == 0 {
                    self.bitmap[i] |= 1 << j;
                    debug!("Allocated frame {}", frame);
                    return Some(frame as u32);
                }
            }
        }
        debug!("No free frames");
        None
    }

    /// Mark a frame as in use without going through `allocate`.
    pub fn mark_used(&mut self, frame: u32) {
        let frame = frame as usize;
        if frame >= FRAMES {
            warn!("Frame {} is outside physical memory, not reserving it", frame);
            return;
        }
        self.bitmap[frame / 8] |= 1 << (frame % 8);
    }

    pub fn is_free(&self, frame: u32) -> bool {
        let frame = frame as usize;
        frame < FRAMES && self.bitmap[frame / 8] & (1 << (frame % 8)) == 0
    }

    pub fn free_count(&self) -> usize {
        let used: usize = self.bitmap.iter().map(|b| b.count_ones() as usize).sum();
        FRAMES - used
    }
}
