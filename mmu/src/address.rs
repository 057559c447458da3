use std::fmt;

use crate::constants::*;

/// A virtual address split into segment, page and word fields (9 bits each).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualAddress {
    pub va: u32,
    pub s: u32,
    pub p: u32,
    pub w: u32,
    /// Offset within the segment, `p * FRAME_SIZE + w`.
    pub pw: u32,
}

impl VirtualAddress {
    pub fn from_raw(va: u32) -> Self {
        VirtualAddress {
            va,
            s: (va >> S_SHIFT) & S_MASK,
            p: (va >> P_SHIFT) & P_MASK,
            w: va & W_MASK,
            pw: va & PW_MASK,
        }
    }

    pub fn from_parts(s: u32, p: u32, w: u32) -> Self {
        Self::from_raw(((s & S_MASK) << S_SHIFT) | ((p & P_MASK) << P_SHIFT) | (w & W_MASK))
    }
}

impl From<i32> for VirtualAddress {
    /// Same bit pattern as the signed command operand.
    fn from(va: i32) -> Self {
        Self::from_raw(va as u32)
    }
}

impl fmt::Display for VirtualAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VA({}) = (s={}, p={}, w={}, pw={})",
            self.va, self.s, self.p, self.w, self.pw
        )
    }
}
