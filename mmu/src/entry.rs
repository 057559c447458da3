/// Where a page table or a page lives, as encoded in a single table word.
///
/// | word >= 0 | resident in frame `word` |
/// | word <  0 | on the paging disk in block `-word` |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Resident { frame: u32 },
    Disk { block: u32 },
}

impl Location {
    pub fn from_word(word: i32) -> Self {
        if word >= 0 {
            Location::Resident { frame: word as u32 }
        } else {
            Location::Disk {
                block: word.unsigned_abs(),
            }
        }
    }

    pub fn to_word(&self) -> i32 {
        match *self {
            Location::Resident { frame } => frame as i32,
            Location::Disk { block } => (block as i32).wrapping_neg(),
        }
    }
}
