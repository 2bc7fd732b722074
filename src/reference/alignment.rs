//! Transcript-to-genome alignments
//!
//! An [`Alignment`] is what the alignment collaborator supplies for one
//! transcript/genome pair: a strand and the ordered exon blocks.
//!
//! # Coordinate conventions
//!
//! | Field | Convention |
//! |-------|------------|
//! | `tx_start`, `tx_end` | 0-based half-open on the spliced transcript |
//! | `alt_start`, `alt_end` | 0-based half-open on the genomic accession, `alt_start < alt_end` on both strands |
//! | `cigar` | transcript 5'→3' orientation |
//!
//! CIGAR operations: `=`/`M` and `X` consume both sequences, `I` consumes
//! transcript bases absent from the genome, `D` consumes genomic bases absent
//! from the transcript.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FerroError;

/// Transcript orientation relative to the genomic accession
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl Strand {
    /// `+1` or `-1`
    pub fn sign(&self) -> i64 {
        match self {
            Strand::Plus => 1,
            Strand::Minus => -1,
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Plus => write!(f, "+"),
            Strand::Minus => write!(f, "-"),
        }
    }
}

/// A single CIGAR operation with its length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CigarOp {
    /// Aligned, identical bases (`=` or `M`)
    Match(u64),
    /// Aligned, differing bases (`X`)
    Mismatch(u64),
    /// Transcript bases not in the genome (`I`)
    Insertion(u64),
    /// Genome bases not in the transcript (`D`)
    Deletion(u64),
}

impl CigarOp {
    fn from_parts(op: char, length: u64) -> Option<Self> {
        match op {
            '=' | 'M' => Some(CigarOp::Match(length)),
            'X' => Some(CigarOp::Mismatch(length)),
            'I' => Some(CigarOp::Insertion(length)),
            'D' => Some(CigarOp::Deletion(length)),
            _ => None,
        }
    }

    pub fn len(&self) -> u64 {
        match self {
            CigarOp::Match(n) | CigarOp::Mismatch(n) | CigarOp::Insertion(n) | CigarOp::Deletion(n) => *n,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Transcript bases consumed
    pub fn tx_len(&self) -> u64 {
        match self {
            CigarOp::Deletion(_) => 0,
            other => other.len(),
        }
    }

    /// Genomic bases consumed
    pub fn alt_len(&self) -> u64 {
        match self {
            CigarOp::Insertion(_) => 0,
            other => other.len(),
        }
    }
}

impl fmt::Display for CigarOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CigarOp::Match(n) => write!(f, "{}=", n),
            CigarOp::Mismatch(n) => write!(f, "{}X", n),
            CigarOp::Insertion(n) => write!(f, "{}I", n),
            CigarOp::Deletion(n) => write!(f, "{}D", n),
        }
    }
}

/// Parse a CIGAR string into operations.
///
/// Accepts SAM style (`284=1X32=`, `100M2I50M`) and GFF3 Gap style
/// (`M185 I3 M250`). Returns an empty vector for blank input.
///
/// # Errors
///
/// Returns [`FerroError::InvalidAlignment`] for unknown operations or
/// missing lengths.
pub fn parse_cigar(cigar_str: &str) -> Result<Vec<CigarOp>, FerroError> {
    let trimmed = cigar_str.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let invalid = |msg: String| {
        log::warn!("{}", msg);
        FerroError::InvalidAlignment { msg }
    };

    if trimmed.contains(char::is_whitespace) {
        // GFF3 Gap: letter-first tokens
        return trimmed
            .split_whitespace()
            .map(|token| {
                let mut chars = token.chars();
                let op = chars.next().unwrap_or(' ');
                let length: u64 = chars
                    .as_str()
                    .parse()
                    .map_err(|_| invalid(format!("Invalid CIGAR length in token: '{token}'")))?;
                CigarOp::from_parts(op, length)
                    .ok_or_else(|| invalid(format!("Unknown CIGAR operation '{op}' in token: '{token}'")))
            })
            .collect();
    }

    let mut ops = Vec::new();
    let mut digits = String::new();
    for c in trimmed.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        // SAM allows a bare operation to mean length 1
        let length = if digits.is_empty() {
            1
        } else {
            digits
                .parse()
                .map_err(|_| invalid(format!("Invalid CIGAR length '{digits}' in '{trimmed}'")))?
        };
        let op = CigarOp::from_parts(c, length)
            .ok_or_else(|| invalid(format!("Unknown CIGAR operation '{c}' in '{trimmed}'")))?;
        ops.push(op);
        digits.clear();
    }
    if !digits.is_empty() {
        return Err(invalid(format!("CIGAR '{trimmed}' ends without an operation")));
    }
    Ok(ops)
}

/// CIGAR operations of one exon block, serialized as a SAM-style string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cigar(pub Vec<CigarOp>);

impl Cigar {
    pub fn ops(&self) -> &[CigarOp] {
        &self.0
    }

    pub fn tx_len(&self) -> u64 {
        self.0.iter().map(CigarOp::tx_len).sum()
    }

    pub fn alt_len(&self) -> u64 {
        self.0.iter().map(CigarOp::alt_len).sum()
    }
}

impl TryFrom<String> for Cigar {
    type Error = FerroError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_cigar(&value).map(Cigar)
    }
}

impl From<Cigar> for String {
    fn from(cigar: Cigar) -> Self {
        cigar.to_string()
    }
}

impl fmt::Display for Cigar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.0 {
            write!(f, "{}", op)?;
        }
        Ok(())
    }
}

/// One aligned exon
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExonBlock {
    /// Exon ordinal in transcript order, 0-based
    pub ord: u32,
    pub tx_start: u64,
    pub tx_end: u64,
    pub alt_start: u64,
    pub alt_end: u64,
    pub cigar: Cigar,
}

impl ExonBlock {
    /// A block with a CIGAR string; blank CIGARs mean an ungapped match
    pub fn new(
        ord: u32,
        tx: (u64, u64),
        alt: (u64, u64),
        cigar: &str,
    ) -> Result<Self, FerroError> {
        let mut ops = parse_cigar(cigar)?;
        if ops.is_empty() {
            ops.push(CigarOp::Match(tx.1.saturating_sub(tx.0)));
        }
        Ok(Self {
            ord,
            tx_start: tx.0,
            tx_end: tx.1,
            alt_start: alt.0,
            alt_end: alt.1,
            cigar: Cigar(ops),
        })
    }

    pub fn tx_len(&self) -> u64 {
        self.tx_end - self.tx_start
    }

    pub fn alt_len(&self) -> u64 {
        self.alt_end - self.alt_start
    }

    pub fn contains_tx(&self, tx: u64) -> bool {
        self.tx_start <= tx && tx < self.tx_end
    }

    pub fn contains_alt(&self, alt: u64) -> bool {
        self.alt_start <= alt && alt < self.alt_end
    }
}

/// Alignment of a transcript to a genomic accession
///
/// Deserialization goes through [`Alignment::new`], so a decoded alignment
/// is always validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "AlignmentFields")]
pub struct Alignment {
    pub tx_ac: String,
    pub alt_ac: String,
    pub method: String,
    pub strand: Strand,
    pub exons: Vec<ExonBlock>,
}

/// Unchecked field layout of a serialized [`Alignment`]
#[derive(Deserialize)]
struct AlignmentFields {
    tx_ac: String,
    alt_ac: String,
    method: String,
    strand: Strand,
    exons: Vec<ExonBlock>,
}

impl TryFrom<AlignmentFields> for Alignment {
    type Error = FerroError;

    fn try_from(f: AlignmentFields) -> Result<Self, Self::Error> {
        Alignment::new(f.tx_ac, f.alt_ac, f.method, f.strand, f.exons)
    }
}

impl Alignment {
    /// Build and validate an alignment
    pub fn new(
        tx_ac: impl Into<String>,
        alt_ac: impl Into<String>,
        method: impl Into<String>,
        strand: Strand,
        exons: Vec<ExonBlock>,
    ) -> Result<Self, FerroError> {
        let alignment = Self {
            tx_ac: tx_ac.into(),
            alt_ac: alt_ac.into(),
            method: method.into(),
            strand,
            exons,
        };
        alignment.validate()?;
        Ok(alignment)
    }

    /// Check that the blocks tile the transcript and agree with their CIGARs
    pub fn validate(&self) -> Result<(), FerroError> {
        let invalid = |msg: String| {
            log::warn!("{} ({} / {})", msg, self.tx_ac, self.alt_ac);
            Err(FerroError::InvalidAlignment { msg })
        };

        if self.exons.is_empty() {
            return invalid("alignment has no exon blocks".to_string());
        }
        if self.exons[0].tx_start != 0 {
            return invalid(format!(
                "first exon starts at transcript offset {}",
                self.exons[0].tx_start
            ));
        }
        for (i, block) in self.exons.iter().enumerate() {
            if block.tx_end <= block.tx_start || block.alt_end <= block.alt_start {
                return invalid(format!("exon {} has an empty or inverted span", block.ord));
            }
            if block.cigar.tx_len() != block.tx_len() || block.cigar.alt_len() != block.alt_len() {
                return invalid(format!(
                    "exon {} CIGAR {} covers {}/{} bases, span is {}/{}",
                    block.ord,
                    block.cigar,
                    block.cigar.tx_len(),
                    block.cigar.alt_len(),
                    block.tx_len(),
                    block.alt_len()
                ));
            }
            if i > 0 {
                let prev = &self.exons[i - 1];
                if block.tx_start != prev.tx_end {
                    return invalid(format!(
                        "exon {} does not follow exon {} on the transcript",
                        block.ord, prev.ord
                    ));
                }
                let ordered = match self.strand {
                    Strand::Plus => block.alt_start >= prev.alt_end,
                    Strand::Minus => block.alt_end <= prev.alt_start,
                };
                if !ordered {
                    return invalid(format!(
                        "exon {} overlaps or precedes exon {} on the genome",
                        block.ord, prev.ord
                    ));
                }
            }
        }
        Ok(())
    }

    /// Length of the spliced transcript
    pub fn tx_len(&self) -> u64 {
        self.exons.last().map(|e| e.tx_end).unwrap_or(0)
    }

    /// Genomic span `(start, end)` covered by the exons, 0-based half-open
    pub fn alt_span(&self) -> (u64, u64) {
        let start = self.exons.iter().map(|e| e.alt_start).min().unwrap_or(0);
        let end = self.exons.iter().map(|e| e.alt_end).max().unwrap_or(0);
        (start, end)
    }
}
