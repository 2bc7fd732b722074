//! Position types for the four coordinate systems
//!
//! | System | Type | Numbering |
//! |--------|------|-----------|
//! | `g.` | [`GenomePos`] | 1-based on the genomic accession |
//! | `n.` | [`TxPos`] | 1-based on the spliced transcript, optional intronic offset |
//! | `c.` | [`CdsPos`] | relative to the CDS: `-N` 5'UTR, `N` coding, `*N` 3'UTR |
//! | `p.` | [`ProtPos`] | 1-based amino acid from the initiator methionine |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Genomic position (g. coordinates, 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GenomePos {
    pub base: u64,
}

impl GenomePos {
    pub fn new(base: u64) -> Self {
        Self { base }
    }
}

impl fmt::Display for GenomePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)
    }
}

fn write_offset(f: &mut fmt::Formatter<'_>, offset: Option<i64>) -> fmt::Result {
    match offset {
        Some(o) if o > 0 => write!(f, "+{}", o),
        Some(o) if o < 0 => write!(f, "{}", o),
        _ => Ok(()),
    }
}

/// Transcript position (n. coordinates)
///
/// `base` is the 1-based position on the spliced transcript. A non-zero
/// `offset` places the position inside an intron, relative to the nearest
/// exon boundary base (`n.285+3`, `n.286-2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxPos {
    pub base: i64,
    pub offset: Option<i64>,
}

impl TxPos {
    pub fn new(base: i64) -> Self {
        Self { base, offset: None }
    }

    pub fn with_offset(base: i64, offset: i64) -> Self {
        Self {
            base,
            offset: (offset != 0).then_some(offset),
        }
    }

    pub fn is_intronic(&self) -> bool {
        self.offset.is_some_and(|o| o != 0)
    }

    /// Intronic offset, zero for exonic positions
    pub fn offset_or_zero(&self) -> i64 {
        self.offset.unwrap_or(0)
    }
}

impl fmt::Display for TxPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        write_offset(f, self.offset)
    }
}

/// Region of a transcript relative to its coding sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CdsRegion {
    FivePrimeUtr,
    Coding,
    ThreePrimeUtr,
}

/// CDS position (c. coordinates)
///
/// - 5'UTR: `base` is negative, the distance upstream of `c.1` (`c.-12`)
/// - coding: `base` is 1-based and positive (`c.1582`)
/// - 3'UTR: `utr3` is set and `base` counts past the stop codon (`c.*110`)
///
/// There is no `c.0` and no `c.*0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CdsPos {
    pub base: i64,
    pub offset: Option<i64>,
    pub utr3: bool,
}

impl CdsPos {
    /// A coding (or 5'UTR, when negative) position
    pub fn new(base: i64) -> Self {
        Self {
            base,
            offset: None,
            utr3: false,
        }
    }

    /// A 3'UTR position (`c.*base`)
    pub fn utr3(base: i64) -> Self {
        Self {
            base,
            offset: None,
            utr3: true,
        }
    }

    /// Build a position from its region and region-relative offset
    pub fn from_region(region: CdsRegion, base: i64) -> Self {
        match region {
            CdsRegion::ThreePrimeUtr => Self::utr3(base),
            CdsRegion::FivePrimeUtr | CdsRegion::Coding => Self::new(base),
        }
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = (offset != 0).then_some(offset);
        self
    }

    pub fn region(&self) -> CdsRegion {
        if self.utr3 {
            CdsRegion::ThreePrimeUtr
        } else if self.base < 0 {
            CdsRegion::FivePrimeUtr
        } else {
            CdsRegion::Coding
        }
    }

    pub fn is_intronic(&self) -> bool {
        self.offset.is_some_and(|o| o != 0)
    }

    pub fn offset_or_zero(&self) -> i64 {
        self.offset.unwrap_or(0)
    }

    /// Codon number (`ceil(base / 3)`) for exonic coding positions
    pub fn codon(&self) -> Option<u64> {
        (self.region() == CdsRegion::Coding && !self.is_intronic() && self.base > 0)
            .then(|| (self.base as u64).div_ceil(3))
    }
}

impl fmt::Display for CdsPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.utr3 {
            write!(f, "*{}", self.base)?;
        } else {
            write!(f, "{}", self.base)?;
        }
        write_offset(f, self.offset)
    }
}

/// Amino acid enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AminoAcid {
    Ala, // A
    Arg, // R
    Asn, // N
    Asp, // D
    Cys, // C
    Gln, // Q
    Glu, // E
    Gly, // G
    His, // H
    Ile, // I
    Leu, // L
    Lys, // K
    Met, // M
    Phe, // F
    Pro, // P
    Sec, // U (selenocysteine)
    Ser, // S
    Thr, // T
    Trp, // W
    Tyr, // Y
    Val, // V
    Ter, // * (stop codon)
    Xaa, // X (unknown)
}

const AMINO_ACIDS: [(AminoAcid, &str, char); 23] = [
    (AminoAcid::Ala, "Ala", 'A'),
    (AminoAcid::Arg, "Arg", 'R'),
    (AminoAcid::Asn, "Asn", 'N'),
    (AminoAcid::Asp, "Asp", 'D'),
    (AminoAcid::Cys, "Cys", 'C'),
    (AminoAcid::Gln, "Gln", 'Q'),
    (AminoAcid::Glu, "Glu", 'E'),
    (AminoAcid::Gly, "Gly", 'G'),
    (AminoAcid::His, "His", 'H'),
    (AminoAcid::Ile, "Ile", 'I'),
    (AminoAcid::Leu, "Leu", 'L'),
    (AminoAcid::Lys, "Lys", 'K'),
    (AminoAcid::Met, "Met", 'M'),
    (AminoAcid::Phe, "Phe", 'F'),
    (AminoAcid::Pro, "Pro", 'P'),
    (AminoAcid::Sec, "Sec", 'U'),
    (AminoAcid::Ser, "Ser", 'S'),
    (AminoAcid::Thr, "Thr", 'T'),
    (AminoAcid::Trp, "Trp", 'W'),
    (AminoAcid::Tyr, "Tyr", 'Y'),
    (AminoAcid::Val, "Val", 'V'),
    (AminoAcid::Ter, "Ter", '*'),
    (AminoAcid::Xaa, "Xaa", 'X'),
];

impl AminoAcid {
    pub fn from_three_letter(s: &str) -> Option<Self> {
        AMINO_ACIDS
            .iter()
            .find(|(_, three, _)| *three == s)
            .map(|(aa, _, _)| *aa)
    }

    pub fn from_one_letter(c: char) -> Option<Self> {
        AMINO_ACIDS
            .iter()
            .find(|(_, _, one)| *one == c)
            .map(|(aa, _, _)| *aa)
    }

    pub fn to_three_letter(&self) -> &'static str {
        AMINO_ACIDS
            .iter()
            .find(|(aa, _, _)| aa == self)
            .map(|(_, three, _)| *three)
            .unwrap_or("Xaa")
    }

    pub fn to_one_letter(&self) -> char {
        AMINO_ACIDS
            .iter()
            .find(|(aa, _, _)| aa == self)
            .map(|(_, _, one)| *one)
            .unwrap_or('X')
    }

    pub fn is_stop(&self) -> bool {
        *self == AminoAcid::Ter
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_three_letter())
    }
}

/// Protein position (p. coordinates): the reference residue and its number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProtPos {
    pub aa: AminoAcid,
    pub number: u64,
}

impl ProtPos {
    pub fn new(aa: AminoAcid, number: u64) -> Self {
        Self { aa, number }
    }
}

impl fmt::Display for ProtPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.aa, self.number)
    }
}
