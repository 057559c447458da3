use std::fmt;

use log::{debug, error, info};

use crate::address::VirtualAddress;
use crate::constants::*;
use crate::entry::Location;
use crate::error::{InvalidAddress, TranslationError};
use crate::frame_allocator::FrameAllocator;
use crate::page_table::PageTable;
use crate::segment_table::SegmentTable;

/// Counters kept across the lifetime of one [`Mmu`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub translations: u64,
    pub resolved: u64,
    pub invalid: u64,
    pub exhausted: u64,
    pub page_table_faults: u64,
    pub page_faults: u64,
    pub frames_allocated: u64,
}

/// A block brought in from the paging disk while resolving a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fault {
    pub block: u32,
    pub frame: u32,
}

/// Outcome of one translation together with the faults it resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub address: VirtualAddress,
    pub page_table_fault: Option<Fault>,
    pub page_fault: Option<Fault>,
    pub result: Result<u32, TranslationError>,
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> ", self.address)?;
        match &self.result {
            Ok(pa) => write!(f, "PA {}", pa)?,
            Err(e) => write!(f, "ERROR: {}", e)?,
        }
        if let Some(fault) = self.page_table_fault {
            write!(f, " [PT fault: block {} -> frame {}]", fault.block, fault.frame)?;
        }
        if let Some(fault) = self.page_fault {
            write!(f, " [page fault: block {} -> frame {}]", fault.block, fault.frame)?;
        }
        Ok(())
    }
}

/// Segmented, paged address translation over a word-addressed physical
/// memory, with page tables and pages loaded on demand from a paging disk.
pub struct Mmu {
    pub(crate) memory: Memory,
    pub(crate) disk: PagingDisk,
    pub(crate) frames: FrameAllocator<NUM_FRAMES>,
    stats: Stats,
}

impl Mmu {
    pub fn new() -> Self {
        Mmu {
            memory: Memory::create(),
            disk: PagingDisk::create(),
            frames: FrameAllocator::new(ST_FRAMES),
            stats: Stats::default(),
        }
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn disk(&self) -> &PagingDisk {
        &self.disk
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn free_frames(&self) -> usize {
        self.frames.free_count()
    }

    pub fn translate(&mut self, va: VirtualAddress) -> Result<u32, TranslationError> {
        self.translate_traced(va).result
    }

    pub fn translate_traced(&mut self, va: VirtualAddress) -> Translation {
        let mut translation = Translation {
            address: va,
            page_table_fault: None,
            page_fault: None,
            result: Ok(0),
        };
        let result = self.walk(&va, &mut translation);
        translation.result = result;

        self.stats.translations += 1;
        match translation.result {
            Ok(_) => self.stats.resolved += 1,
            Err(TranslationError::InvalidAddress(_)) => self.stats.invalid += 1,
            Err(TranslationError::FramesExhausted) => {
                error!("Out of frames while translating {}", va);
                self.stats.exhausted += 1;
            }
        }
        debug!("{}", translation);
        translation
    }

    fn walk(
        &mut self,
        va: &VirtualAddress,
        translation: &mut Translation,
    ) -> Result<u32, TranslationError> {
        let segment = SegmentTable::new(&self.memory).get_entry(va.s)?;

        if va.pw as i64 >= segment.limit as i64 {
            return Err(InvalidAddress::SegmentBoundary.into());
        }
        // w <= pw, so this never fires once the check above has passed.
        if va.w as i64 >= segment.limit as i64 {
            return Err(InvalidAddress::OffsetBeyondLimit.into());
        }
        if !segment.is_assigned() {
            return Err(InvalidAddress::UnassignedSegment.into());
        }

        let pt_frame = match segment.page_table() {
            Location::Resident { frame } => frame,
            Location::Disk { block } => {
                let frame = self.load_block(block)?;
                SegmentTable::new(&mut self.memory)
                    .set_page_table(va.s, Location::Resident { frame })?;
                self.stats.page_table_faults += 1;
                translation.page_table_fault = Some(Fault { block, frame });
                frame
            }
        };

        let entry = PageTable::read(&self.memory, pt_frame).get_entry(va.p)?;
        let page_frame = match entry {
            Location::Resident { frame } => frame,
            Location::Disk { block } => {
                let frame = self.load_block(block)?;
                PageTable::read(&mut self.memory, pt_frame).map_to_frame(va.p, frame)?;
                self.stats.page_faults += 1;
                translation.page_fault = Some(Fault { block, frame });
                frame
            }
        };

        let pa = page_frame as u64 * FRAME_SIZE as u64 + va.w as u64;
        if pa >= PM_SIZE as u64 {
            return Err(InvalidAddress::BadTableEntry.into());
        }
        Ok(pa as u32)
    }

    /// Claim a frame and copy `block` from the paging disk into it.
    fn load_block(&mut self, block: u32) -> Result<u32, TranslationError> {
        // An unreadable block must not cost a frame.
        let data = self.disk.read_block(block as usize)?;
        let frame = self
            .frames
            .allocate()
            .ok_or(TranslationError::FramesExhausted)?;
        self.memory.load_frame(frame as usize, data)?;
        self.stats.frames_allocated += 1;
        info!("Loaded block {} into frame {}", block, frame);
        Ok(frame)
    }

    /// Direct read of a physical word.
    pub fn read_physical(&self, pa: i64) -> Result<i32, TranslationError> {
        if pa < 0 {
            return Err(InvalidAddress::PhysicalOutOfRange.into());
        }
        self.memory
            .read_word(pa as u64)
            .map_err(|_| InvalidAddress::PhysicalOutOfRange.into())
    }
}

impl Default for Mmu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::{PageInit, SegmentInit};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn mmu_with(segments: &[(u32, i32, i32)], pages: &[(u32, u32, i32)]) -> Mmu {
        init_logger();
        let mut mmu = Mmu::new();
        let segments: Vec<SegmentInit> = segments
            .iter()
            .map(|&(segment, limit, pointer)| SegmentInit {
                segment,
                limit,
                pointer,
            })
            .collect();
        let pages: Vec<PageInit> = pages
            .iter()
            .map(|&(segment, page, pointer)| PageInit {
                segment,
                page,
                pointer,
            })
            .collect();
        mmu.load_segments(&segments);
        mmu.load_pages(&pages);
        mmu
    }

    fn translate_raw(mmu: &mut Mmu, va: u32) -> Result<u32, TranslationError> {
        mmu.translate(VirtualAddress::from_raw(va))
    }

    fn invalid(reason: InvalidAddress) -> Result<u32, TranslationError> {
        Err(TranslationError::InvalidAddress(reason))
    }

    #[test]
    fn resident_translation() {
        let mut mmu = mmu_with(&[(6, 3000, 4)], &[(6, 5, 9)]);
        assert_eq!(translate_raw(&mut mmu, 1575424), Ok(4608));
        assert_eq!(translate_raw(&mut mmu, 1575863), Ok(5047));
        assert_eq!(
            translate_raw(&mut mmu, 1575864),
            invalid(InvalidAddress::SegmentBoundary)
        );
        assert_eq!(mmu.stats().frames_allocated, 0);
    }

    #[test]
    fn demand_paging_translation() {
        let mut mmu = mmu_with(
            &[(8, 4000, 3), (9, 5000, -7)],
            &[(8, 0, 10), (8, 1, -20), (9, 0, 13), (9, 1, -25)],
        );
        assert_eq!(translate_raw(&mut mmu, 2097162), Ok(10 * 512 + 10));
        // page 1 of segment 8 faults into the lowest free frame
        assert_eq!(translate_raw(&mut mmu, 2097674), Ok(2 * 512 + 10));
        // page table of segment 9 faults into frame 4 (3 is taken)
        assert_eq!(translate_raw(&mut mmu, 2359306), Ok(13 * 512 + 10));
        assert_eq!(translate_raw(&mut mmu, 2359818), Ok(5 * 512 + 10));

        let stats = mmu.stats();
        assert_eq!(stats.page_table_faults, 1);
        assert_eq!(stats.page_faults, 2);
        assert_eq!(stats.frames_allocated, 3);
        assert_eq!(
            SegmentTable::new(mmu.memory()).get_entry(9).unwrap().pointer,
            4
        );
    }

    #[test]
    fn page_table_fault_copies_block() {
        // page entry is written to block 3 because the page table is not resident
        let mut mmu = mmu_with(&[(0, 1, -3)], &[(0, 0, 9)]);
        assert_eq!(mmu.disk().read_word(3, 0), Ok(9));

        let translation = mmu.translate_traced(VirtualAddress::from_raw(0));
        assert_eq!(translation.result, Ok(4608));
        assert_eq!(
            translation.page_table_fault,
            Some(Fault { block: 3, frame: 2 })
        );
        assert_eq!(translation.page_fault, None);
        assert_eq!(mmu.read_physical(2 * 512), Ok(9));
        assert_eq!(mmu.read_physical(4608), Ok(0));
    }

    #[test]
    fn second_translation_does_not_fault() {
        let mut mmu = mmu_with(&[(1, 2048, -5)], &[(1, 2, -6)]);
        let va = VirtualAddress::from_parts(1, 2, 7);

        let first = mmu.translate_traced(va);
        assert!(first.page_table_fault.is_some());
        assert!(first.page_fault.is_some());
        let allocated = mmu.stats().frames_allocated;
        assert_eq!(allocated, 2);

        let second = mmu.translate_traced(va);
        assert_eq!(second.result, first.result);
        assert_eq!(second.page_table_fault, None);
        assert_eq!(second.page_fault, None);
        assert_eq!(mmu.stats().frames_allocated, allocated);
    }

    #[test]
    fn page_data_is_copied_from_disk() {
        let mut mmu = mmu_with(&[(1, 1024, 2)], &[(1, 0, -40)]);
        let mut block = [0; FRAME_SIZE];
        block[17] = 1234;
        mmu.disk.write_block(40, &block).unwrap();

        let pa = translate_raw(&mut mmu, VirtualAddress::from_parts(1, 0, 17).va).unwrap();
        // frame 2 holds the page table, so the page lands in frame 3
        assert_eq!(pa, 3 * 512 + 17);
        assert_eq!(mmu.read_physical(pa as i64), Ok(1234));
    }

    #[test]
    fn unassigned_segment_is_invalid() {
        let mut mmu = mmu_with(&[(6, 3000, 4)], &[]);
        assert_eq!(
            translate_raw(&mut mmu, VirtualAddress::from_parts(7, 0, 0).va),
            invalid(InvalidAddress::SegmentBoundary)
        );
        let mut mmu = mmu_with(&[(7, 100, 0)], &[]);
        assert_eq!(
            translate_raw(&mut mmu, VirtualAddress::from_parts(7, 0, 0).va),
            invalid(InvalidAddress::UnassignedSegment)
        );
    }

    #[test]
    fn boundary_edge() {
        let mut mmu = mmu_with(&[(1, 512, 3)], &[(1, 0, 8)]);
        assert_eq!(
            translate_raw(&mut mmu, VirtualAddress::from_parts(1, 0, 511).va),
            Ok(8 * 512 + 511)
        );
        assert_eq!(
            translate_raw(&mut mmu, VirtualAddress::from_parts(1, 1, 0).va),
            invalid(InvalidAddress::SegmentBoundary)
        );
    }

    #[test]
    fn bounds_hold_regardless_of_residency() {
        let mut mmu = mmu_with(&[(2, 600, -9)], &[(2, 1, -10)]);
        assert_eq!(
            translate_raw(&mut mmu, VirtualAddress::from_parts(2, 1, 88).va),
            invalid(InvalidAddress::SegmentBoundary)
        );
        assert_eq!(mmu.stats().frames_allocated, 0);
        assert_eq!(
            SegmentTable::new(mmu.memory()).get_entry(2).unwrap().pointer,
            -9
        );
    }

    #[test]
    fn offset_gate_is_shadowed_by_segment_boundary() {
        for limit in [0, 1, 511, 512, 513, 3000, 262143] {
            let mut mmu = mmu_with(&[(1, limit, 2)], &[]);
            for pw in 0..(1u32 << (P_BITS + W_BITS)) {
                let va = VirtualAddress::from_raw((1 << S_SHIFT) | pw);
                let result = mmu.translate(va);
                assert_ne!(result, invalid(InvalidAddress::OffsetBeyondLimit));
                if (pw as i32) < limit {
                    assert_eq!(result, Ok(va.w), "limit {} pw {}", limit, pw);
                } else {
                    assert_eq!(result, invalid(InvalidAddress::SegmentBoundary));
                }
            }
        }
    }

    #[test]
    fn unset_page_entry_maps_to_frame_zero() {
        let mut mmu = mmu_with(&[(0, 1024, 2)], &[]);
        assert_eq!(translate_raw(&mut mmu, 0), Ok(0));
        assert_eq!(translate_raw(&mut mmu, 5), Ok(5));
    }

    #[test]
    fn bad_block_does_not_consume_a_frame() {
        let mut mmu = mmu_with(&[(0, 1024, 2)], &[(0, 0, -1000)]);
        mmu.memory.write_word(2 * 512 + 1, -5000).unwrap();
        let free = mmu.free_frames();
        assert_eq!(
            translate_raw(&mut mmu, VirtualAddress::from_parts(0, 1, 0).va),
            invalid(InvalidAddress::BadTableEntry)
        );
        assert_eq!(mmu.free_frames(), free);
    }

    #[test]
    fn frames_exhausted() {
        // segment s keeps its page table on block s, whose entries all point at block 1
        let mut segments = Vec::new();
        for s in 1..=3 {
            segments.push((s, 512 * 512, -(s as i32)));
        }
        let mut mmu = mmu_with(&segments, &[]);
        for s in 1..=3 {
            for p in 0..PT_SIZE {
                mmu.disk.write_word(s as usize, p, -1).unwrap();
            }
        }

        // 2 page tables + 1020 pages = 1022 frames
        let mut expected_frame = 2;
        'outer: for s in 1..=3u32 {
            for p in 0..PT_SIZE as u32 {
                if expected_frame == NUM_FRAMES as u32 {
                    break 'outer;
                }
                let translation = mmu.translate_traced(VirtualAddress::from_parts(s, p, 0));
                if let Some(fault) = translation.page_table_fault {
                    assert_eq!(fault.frame, expected_frame);
                    expected_frame += 1;
                }
                assert_eq!(translation.result, Ok(expected_frame * 512));
                expected_frame += 1;
            }
        }
        // the 1023rd allocation
        assert_eq!(
            mmu.translate(VirtualAddress::from_parts(2, 508, 0)),
            Err(TranslationError::FramesExhausted)
        );
        assert_eq!(mmu.free_frames(), 0);
        assert_eq!(mmu.stats().frames_allocated, 1022);

        let next = VirtualAddress::from_parts(3, 511, 0);
        assert_eq!(mmu.translate(next), Err(TranslationError::FramesExhausted));
        // already resident addresses still resolve
        assert_eq!(
            mmu.translate(VirtualAddress::from_parts(1, 0, 3)),
            Ok(3 * 512 + 3)
        );
    }

    #[test]
    fn exhaustion_keeps_page_table_promotion() {
        let mut mmu = mmu_with(&[(1, 1024, -1)], &[]);
        for p in 0..2 {
            mmu.disk.write_word(1, p, -2).unwrap();
        }
        for frame in 2..NUM_FRAMES as u32 - 1 {
            mmu.frames.mark_used(frame);
        }
        assert_eq!(mmu.free_frames(), 1);

        let translation = mmu.translate_traced(VirtualAddress::from_parts(1, 0, 0));
        assert_eq!(translation.result, Err(TranslationError::FramesExhausted));
        assert_eq!(
            translation.page_table_fault,
            Some(Fault { block: 1, frame: 1023 })
        );
        let entry = SegmentTable::new(mmu.memory()).get_entry(1).unwrap();
        assert_eq!(entry.pointer, 1023);
        assert_eq!(mmu.memory().read_word(1023 * 512).unwrap(), -2);
    }

    #[test]
    fn read_physical_bounds() {
        let mmu = mmu_with(&[(6, 3000, 4)], &[]);
        assert_eq!(mmu.read_physical(12), Ok(3000));
        assert_eq!(mmu.read_physical(13), Ok(4));
        assert_eq!(mmu.read_physical(PM_SIZE as i64 - 1), Ok(0));
        assert_eq!(
            mmu.read_physical(PM_SIZE as i64),
            Err(TranslationError::InvalidAddress(InvalidAddress::PhysicalOutOfRange))
        );
        assert_eq!(
            mmu.read_physical(-1),
            Err(TranslationError::InvalidAddress(InvalidAddress::PhysicalOutOfRange))
        );
    }

    #[test]
    fn bounds_law_over_random_addresses() {
        use rand::Rng;

        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let limit = rng.gen_range(1..262144);
            let pointer = if rng.gen_bool(0.5) { 2 } else { -3 };
            let mut mmu = mmu_with(&[(4, limit, pointer)], &[]);
            let pw = rng.gen_range(limit as u32..262144);
            let va = VirtualAddress::from_raw((4 << S_SHIFT) | pw);
            assert_eq!(mmu.translate(va), invalid(InvalidAddress::SegmentBoundary));
            assert_eq!(mmu.stats().frames_allocated, 0);
        }
    }

    #[test]
    fn display_trace() {
        let mut mmu = mmu_with(&[(0, 1, -3)], &[(0, 0, 9)]);
        let text = mmu.translate_traced(VirtualAddress::from_raw(0)).to_string();
        assert!(text.contains("PA 4608"));
        assert!(text.contains("PT fault: block 3 -> frame 2"));
    }
}
