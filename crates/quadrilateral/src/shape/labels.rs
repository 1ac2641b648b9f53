//! Fixed vertex/side identifiers and unordered vertex pairs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Vertex identifier; cyclic order A → B → C → D → A.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VertexLabel {
    A,
    B,
    C,
    D,
}

impl VertexLabel {
    pub const ALL: [VertexLabel; 4] = [Self::A, Self::B, Self::C, Self::D];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Label at `i` modulo 4.
    #[inline]
    pub fn from_index(i: usize) -> Self {
        Self::ALL[i % 4]
    }

    #[inline]
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    #[inline]
    pub fn prev(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    #[inline]
    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// The two sides meeting at this vertex: (incoming, outgoing).
    #[inline]
    pub fn sides(self) -> [SideLabel; 2] {
        [SideLabel::from_index(self.index() + 3), SideLabel::from_index(self.index())]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl fmt::Display for VertexLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side identifier; side `AB` runs from vertex A to vertex B.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SideLabel {
    AB,
    BC,
    CD,
    DA,
}

impl SideLabel {
    pub const ALL: [SideLabel; 4] = [Self::AB, Self::BC, Self::CD, Self::DA];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(i: usize) -> Self {
        Self::ALL[i % 4]
    }

    /// Endpoints in traversal order.
    #[inline]
    pub fn vertices(self) -> (VertexLabel, VertexLabel) {
        let start = VertexLabel::from_index(self.index());
        (start, start.next())
    }

    /// The side sharing no vertex with this one.
    #[inline]
    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    #[inline]
    pub fn touches(self, v: VertexLabel) -> bool {
        let (a, b) = self.vertices();
        a == v || b == v
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AB => "AB",
            Self::BC => "BC",
            Self::CD => "CD",
            Self::DA => "DA",
        }
    }
}

impl fmt::Display for SideLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown label text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelParseError {
    pub input: String,
}

impl fmt::Display for LabelParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown label: {:?}", self.input)
    }
}

impl std::error::Error for LabelParseError {}

impl FromStr for VertexLabel {
    type Err = LabelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LabelParseError {
                input: s.to_string(),
            })
    }
}

impl FromStr for SideLabel {
    type Err = LabelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        Self::ALL
            .into_iter()
            .find(|l| {
                let name = l.as_str();
                let rev: String = name.chars().rev().collect();
                name.eq_ignore_ascii_case(t) || rev.eq_ignore_ascii_case(t)
            })
            .ok_or_else(|| LabelParseError {
                input: s.to_string(),
            })
    }
}

/// Unordered pair of distinct vertices. `VertexPair::new(A, C) == VertexPair::new(C, A)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VertexPair {
    lo: VertexLabel,
    hi: VertexLabel,
}

impl VertexPair {
    /// `None` if both labels are the same vertex.
    pub fn new(a: VertexLabel, b: VertexLabel) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { lo: a, hi: b }),
            std::cmp::Ordering::Greater => Some(Self { lo: b, hi: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The two opposite pairs `{A, C}` and `{B, D}`.
    pub fn diagonals() -> [VertexPair; 2] {
        [
            Self {
                lo: VertexLabel::A,
                hi: VertexLabel::C,
            },
            Self {
                lo: VertexLabel::B,
                hi: VertexLabel::D,
            },
        ]
    }

    #[inline]
    pub fn labels(&self) -> (VertexLabel, VertexLabel) {
        (self.lo, self.hi)
    }

    #[inline]
    pub fn contains(&self, v: VertexLabel) -> bool {
        self.lo == v || self.hi == v
    }

    /// The partner of `v`, if `v` is in the pair.
    pub fn other(&self, v: VertexLabel) -> Option<VertexLabel> {
        if v == self.lo {
            Some(self.hi)
        } else if v == self.hi {
            Some(self.lo)
        } else {
            None
        }
    }

    /// Connected by a side.
    #[inline]
    pub fn is_adjacent(&self) -> bool {
        self.lo.next() == self.hi || self.hi.next() == self.lo
    }

    /// Joined by a diagonal.
    #[inline]
    pub fn is_opposite(&self) -> bool {
        self.lo.opposite() == self.hi
    }

    /// The side joining an adjacent pair.
    pub fn side(&self) -> Option<SideLabel> {
        SideLabel::ALL.into_iter().find(|s| {
            let (a, b) = s.vertices();
            self.contains(a) && self.contains(b)
        })
    }
}
