// Dense bit-per-cell sets
//
// One bit per board cell, packed most significant bit first: cell `i` lives
// in byte `i >> 3` under mask `0x80 >> (i % 8)`. Used for both board
// occupancy and food.

/// A fixed-size set of cell indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitfield {
    buffer: Vec<u8>,
}

impl Bitfield {
    /// Creates a set able to hold indices `0..size`, all clear
    pub fn with_capacity(size: usize) -> Self {
        // size / 8 + 1 bytes is always enough
        Bitfield {
            buffer: vec![0; (size >> 3) + 1],
        }
    }

    #[inline]
    fn mask(i: usize) -> u8 {
        0x80 >> (i % 8)
    }

    /// Returns true if index `i` is set
    #[inline]
    pub fn test(&self, i: usize) -> bool {
        self.buffer[i >> 3] & Self::mask(i) != 0
    }

    #[inline]
    pub fn set(&mut self, i: usize) {
        self.buffer[i >> 3] |= Self::mask(i);
    }

    #[inline]
    pub fn clear(&mut self, i: usize) {
        self.buffer[i >> 3] &= !Self::mask(i);
    }

    pub fn set_to(&mut self, i: usize, value: bool) {
        if value {
            self.set(i);
        } else {
            self.clear(i);
        }
    }

    /// Number of set indices
    pub fn count_ones(&self) -> usize {
        self.buffer.iter().map(|byte| byte.count_ones() as usize).sum()
    }
}
