pub type FileId = u64;

/// Source position range of a node, used only for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct Span {
    pub file: FileId,
    pub lo: u32,
    pub hi: u32,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.file, self.lo, self.hi)
    }
}

impl Span {
    pub fn new(file: FileId, lo: u32, hi: u32) -> Span {
        Span { file, lo, hi }
    }

    pub const fn null() -> Span {
        Span {
            file: 0,
            lo: 0,
            hi: 0,
        }
    }

    pub fn is_null(&self) -> bool {
        self.lo == 0 && self.hi == 0
    }

    /// Smallest span covering both; null spans are ignored.
    pub fn union(self, other: Span) -> Span {
        if self.is_null() {
            return other;
        }
        if other.is_null() {
            return self;
        }
        Span {
            file: self.file,
            lo: self.lo.min(other.lo),
            hi: self.hi.max(other.hi),
        }
    }
}
