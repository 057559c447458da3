use std::{fs, path::Path};

use log::warn;
use mmu::{Mmu, PageInit, SegmentInit, MAX_SEGMENTS, NUM_FRAMES, PT_SIZE};

use crate::error::Error;

/// The two initialization lines: segment table triples `(s, z, f)` and
/// page table triples `(s, p, f)`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InitData {
    pub segments: Vec<SegmentInit>,
    pub pages: Vec<PageInit>,
}

fn in_frame_range(f: i32) -> bool {
    f > -(NUM_FRAMES as i32) && f < NUM_FRAMES as i32
}

fn parse_triples(line: &str) -> Vec<(&str, &str, &str)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() % 3 != 0 {
        warn!(
            "Ignoring {} trailing token(s) of an incomplete triple",
            tokens.len() % 3
        );
    }
    tokens
        .chunks_exact(3)
        .map(|chunk| (chunk[0], chunk[1], chunk[2]))
        .collect()
}

impl InitData {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| Error::Read {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&content))
    }

    /// Lenient: malformed triples are skipped with a warning, never rejected.
    pub fn parse(content: &str) -> Self {
        let mut lines = content.lines();
        let segments = lines.next().map(Self::parse_segments).unwrap_or_default();
        let pages = lines.next().map(Self::parse_pages).unwrap_or_default();
        InitData { segments, pages }
    }

    fn parse_segments(line: &str) -> Vec<SegmentInit> {
        let mut entries = Vec::new();
        for (s, z, f) in parse_triples(line) {
            let (Ok(segment), Ok(limit), Ok(pointer)) =
                (s.parse::<u32>(), z.parse::<i32>(), f.parse::<i32>())
            else {
                warn!("Ignoring malformed segment entry: {} {} {}", s, z, f);
                continue;
            };
            if segment as usize >= MAX_SEGMENTS || !in_frame_range(pointer) {
                warn!("Ignoring out of range segment entry: {} {} {}", s, z, f);
                continue;
            }
            entries.push(SegmentInit {
                segment,
                limit,
                pointer,
            });
        }
        entries
    }

    fn parse_pages(line: &str) -> Vec<PageInit> {
        let mut entries = Vec::new();
        for (s, p, f) in parse_triples(line) {
            let (Ok(segment), Ok(page), Ok(pointer)) =
                (s.parse::<u32>(), p.parse::<u32>(), f.parse::<i32>())
            else {
                warn!("Ignoring malformed page entry: {} {} {}", s, p, f);
                continue;
            };
            if segment as usize >= MAX_SEGMENTS
                || page as usize >= PT_SIZE
                || !in_frame_range(pointer)
            {
                warn!("Ignoring out of range page entry: {} {} {}", s, p, f);
                continue;
            }
            entries.push(PageInit {
                segment,
                page,
                pointer,
            });
        }
        entries
    }

    /// Segment entries go in first so page entries can find their tables.
    pub fn apply(&self, mmu: &mut Mmu) {
        mmu.load_segments(&self.segments);
        mmu.load_pages(&self.pages);
    }

    pub fn needs_demand_paging(&self) -> bool {
        self.segments.iter().any(|e| e.pointer < 0) || self.pages.iter().any(|e| e.pointer < 0)
    }
}
