use core::fmt;

/// Position of a block on the radial block lattice.
///
/// Block `i` spans `[r_ref e^{iL}, r_ref e^{(i+1)L}]`, so indices are signed:
/// blocks below the reference radius have negative indices.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockIndex(pub i32);

impl BlockIndex {
    pub fn get(self) -> i32 {
        self.0
    }

    /// The next block outward.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Debug for BlockIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockIndex({})", self.0)
    }
}

impl fmt::Display for BlockIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
