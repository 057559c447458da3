use disk::Disk;
use memory::PhysicalMemory;

pub const S_BITS: u32 = 9;
pub const P_BITS: u32 = 9;
pub const W_BITS: u32 = 9;

pub const FRAME_SIZE: usize = 1 << W_BITS;
pub const PT_SIZE: usize = 1 << P_BITS;
pub const MAX_SEGMENTS: usize = 1 << S_BITS;

pub const NUM_FRAMES: usize = 1024;
pub const PM_SIZE: usize = NUM_FRAMES * FRAME_SIZE;
/// Frames 0 and 1 hold the segment table and are never handed out.
pub const ST_FRAMES: usize = 2;

pub const DISK_BLOCKS: usize = NUM_FRAMES;
pub const DISK_CAPACITY: usize = DISK_BLOCKS * FRAME_SIZE;

pub const W_MASK: u32 = (1 << W_BITS) - 1;
pub const P_MASK: u32 = (1 << P_BITS) - 1;
pub const S_MASK: u32 = (1 << S_BITS) - 1;
pub const PW_MASK: u32 = (1 << (P_BITS + W_BITS)) - 1;

pub const P_SHIFT: u32 = W_BITS;
pub const S_SHIFT: u32 = P_BITS + W_BITS;

/// Output word for an address that cannot be translated or read.
pub const INVALID_ADDRESS: i32 = -1;

pub type Memory = PhysicalMemory<PM_SIZE>;
pub type PagingDisk = Disk<FRAME_SIZE, DISK_CAPACITY>;
