//! Edit types: what a located variant does to the reference
//!
//! Nucleotide edits carry an optional reference literal. The literal is
//! advisory: after every transformation it is re-derived from the sequence
//! of the target accession, and it never decides the position.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FerroError;
use crate::hgvs::location::AminoAcid;

/// DNA/RNA nucleotide base (including IUPAC ambiguity codes)
///
/// Uses `#[repr(u8)]` with ASCII discriminants for zero-cost `as u8` conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Base {
    A = b'A',
    C = b'C',
    G = b'G',
    T = b'T',
    U = b'U',

    R = b'R', // A or G
    Y = b'Y', // C or T
    S = b'S', // G or C
    W = b'W', // A or T
    K = b'K', // G or T
    M = b'M', // A or C
    B = b'B', // not A
    D = b'D', // not C
    H = b'H', // not G
    V = b'V', // not T
    N = b'N', // any
}

impl Base {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Base::A),
            'C' => Some(Base::C),
            'G' => Some(Base::G),
            'T' => Some(Base::T),
            'U' => Some(Base::U),
            'R' => Some(Base::R),
            'Y' => Some(Base::Y),
            'S' => Some(Base::S),
            'W' => Some(Base::W),
            'K' => Some(Base::K),
            'M' => Some(Base::M),
            'B' => Some(Base::B),
            'D' => Some(Base::D),
            'H' => Some(Base::H),
            'V' => Some(Base::V),
            'N' => Some(Base::N),
            _ => None,
        }
    }

    #[inline]
    pub fn to_char(self) -> char {
        self as u8 as char
    }

    /// Watson-Crick complement; ambiguity codes map to their complementary set
    pub fn complement(self) -> Self {
        match self {
            Base::A => Base::T,
            Base::T | Base::U => Base::A,
            Base::C => Base::G,
            Base::G => Base::C,
            Base::R => Base::Y,
            Base::Y => Base::R,
            Base::S => Base::S,
            Base::W => Base::W,
            Base::K => Base::M,
            Base::M => Base::K,
            Base::B => Base::V,
            Base::V => Base::B,
            Base::D => Base::H,
            Base::H => Base::D,
            Base::N => Base::N,
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Nucleotide sequence
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Sequence(pub Vec<Base>);

impl Sequence {
    pub fn new(bases: Vec<Base>) -> Self {
        Self(bases)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bases(&self) -> &[Base] {
        &self.0
    }

    pub fn reverse_complement(&self) -> Self {
        Self(self.0.iter().rev().map(|b| b.complement()).collect())
    }

    /// Parse sequence text returned by a sequence collaborator
    pub fn parse(accession: &str, start: u64, end: u64, text: &str) -> Result<Self, FerroError> {
        text.parse().map_err(|_| FerroError::SequenceFetch {
            accession: accession.to_string(),
            start,
            end,
            msg: format!("invalid bases in '{}'", text),
        })
    }
}

impl FromStr for Sequence {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bases: Option<Vec<Base>> = s.chars().map(Base::from_char).collect();
        bases.map(Self).ok_or("Invalid base character")
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for base in &self.0 {
            write!(f, "{}", base)?;
        }
        Ok(())
    }
}

/// Nucleic acid edit (g., n. and c. variants)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NaEdit {
    /// `C>T`
    Substitution { reference: Base, alternative: Base },
    /// `del` or `delTAG`
    Deletion { reference: Option<Sequence> },
    /// `insNN`, between the two flanking positions
    Insertion { sequence: Sequence },
    /// `delinsNN` or `delTAGinsNN`
    Delins {
        reference: Option<Sequence>,
        alternative: Sequence,
    },
    /// `dup` or `dupA`
    Duplication { reference: Option<Sequence> },
    /// `=`
    Identity,
    /// `?`
    Unknown,
}

impl NaEdit {
    pub fn substitution(reference: Base, alternative: Base) -> Self {
        NaEdit::Substitution {
            reference,
            alternative,
        }
    }

    /// Whether the edit carries a reference literal the resolver maintains
    pub fn has_reference_slot(&self) -> bool {
        matches!(
            self,
            NaEdit::Substitution { .. }
                | NaEdit::Deletion { .. }
                | NaEdit::Delins { .. }
                | NaEdit::Duplication { .. }
        )
    }

    /// The stated reference literal, if any
    pub fn reference(&self) -> Option<Sequence> {
        match self {
            NaEdit::Substitution { reference, .. } => Some(Sequence(vec![*reference])),
            NaEdit::Deletion { reference }
            | NaEdit::Delins { reference, .. }
            | NaEdit::Duplication { reference } => reference.clone(),
            NaEdit::Insertion { .. } | NaEdit::Identity | NaEdit::Unknown => None,
        }
    }

    /// Return a copy with the reference literal replaced
    ///
    /// Edits without a reference slot are returned unchanged. A substitution
    /// needs exactly one base.
    pub fn with_reference(&self, seq: Sequence) -> Result<Self, FerroError> {
        Ok(match self {
            NaEdit::Substitution { alternative, .. } => match seq.bases() {
                [base] => NaEdit::Substitution {
                    reference: *base,
                    alternative: *alternative,
                },
                _ => {
                    return Err(FerroError::ConversionError {
                        msg: format!("substitution reference must be one base, got '{}'", seq),
                    })
                }
            },
            NaEdit::Deletion { .. } => NaEdit::Deletion {
                reference: Some(seq),
            },
            NaEdit::Delins { alternative, .. } => NaEdit::Delins {
                reference: Some(seq),
                alternative: alternative.clone(),
            },
            NaEdit::Duplication { .. } => NaEdit::Duplication {
                reference: Some(seq),
            },
            other => other.clone(),
        })
    }

    /// Express the edit on the opposite strand
    pub fn reverse_complement(&self) -> Self {
        let rc = |s: &Option<Sequence>| s.as_ref().map(Sequence::reverse_complement);
        match self {
            NaEdit::Substitution {
                reference,
                alternative,
            } => NaEdit::Substitution {
                reference: reference.complement(),
                alternative: alternative.complement(),
            },
            NaEdit::Deletion { reference } => NaEdit::Deletion {
                reference: rc(reference),
            },
            NaEdit::Insertion { sequence } => NaEdit::Insertion {
                sequence: sequence.reverse_complement(),
            },
            NaEdit::Delins {
                reference,
                alternative,
            } => NaEdit::Delins {
                reference: rc(reference),
                alternative: alternative.reverse_complement(),
            },
            NaEdit::Duplication { reference } => NaEdit::Duplication {
                reference: rc(reference),
            },
            NaEdit::Identity => NaEdit::Identity,
            NaEdit::Unknown => NaEdit::Unknown,
        }
    }
}

impl fmt::Display for NaEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opt = |s: &Option<Sequence>| s.as_ref().map(|s| s.to_string()).unwrap_or_default();
        match self {
            NaEdit::Substitution {
                reference,
                alternative,
            } => write!(f, "{}>{}", reference, alternative),
            NaEdit::Deletion { reference } => write!(f, "del{}", opt(reference)),
            NaEdit::Insertion { sequence } => write!(f, "ins{}", sequence),
            NaEdit::Delins {
                reference: Some(reference),
                alternative,
            } => write!(f, "del{}ins{}", reference, alternative),
            NaEdit::Delins {
                reference: None,
                alternative,
            } => write!(f, "delins{}", alternative),
            NaEdit::Duplication { reference } => write!(f, "dup{}", opt(reference)),
            NaEdit::Identity => write!(f, "="),
            NaEdit::Unknown => write!(f, "?"),
        }
    }
}

fn write_residues(f: &mut fmt::Formatter<'_>, residues: &[AminoAcid]) -> fmt::Result {
    for aa in residues {
        write!(f, "{}", aa)?;
    }
    Ok(())
}

fn write_stop(f: &mut fmt::Formatter<'_>, stop: Option<u64>) -> fmt::Result {
    match stop {
        Some(n) => write!(f, "Ter{}", n),
        None => write!(f, "Ter?"),
    }
}

/// Protein edit (p. variants)
///
/// Frameshift and extension `stop` distances count the first new residue
/// as 1; `None` means the new stop codon could not be located.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProteinEdit {
    /// Missense (`Gly528Arg`) or nonsense (`Arg373Ter`)
    Substitution { alternative: AminoAcid },
    Deletion,
    Insertion { sequence: Vec<AminoAcid> },
    Delins { sequence: Vec<AminoAcid> },
    Duplication,
    /// `Arg97ProfsTer23`
    Frameshift {
        alternative: AminoAcid,
        stop: Option<u64>,
    },
    /// Stop loss: `Ter110GlnextTer17`
    Extension {
        alternative: AminoAcid,
        stop: Option<u64>,
    },
    Identity,
    Unknown,
}

impl ProteinEdit {
    pub fn is_nonsense(&self) -> bool {
        matches!(
            self,
            ProteinEdit::Substitution {
                alternative: AminoAcid::Ter
            }
        )
    }
}

impl fmt::Display for ProteinEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProteinEdit::Substitution { alternative } => write!(f, "{}", alternative),
            ProteinEdit::Deletion => write!(f, "del"),
            ProteinEdit::Insertion { sequence } => {
                write!(f, "ins")?;
                write_residues(f, sequence)
            }
            ProteinEdit::Delins { sequence } => {
                write!(f, "delins")?;
                write_residues(f, sequence)
            }
            ProteinEdit::Duplication => write!(f, "dup"),
            ProteinEdit::Frameshift { alternative, stop } => {
                write!(f, "{}fs", alternative)?;
                write_stop(f, *stop)
            }
            ProteinEdit::Extension { alternative, stop } => {
                write!(f, "{}ext", alternative)?;
                write_stop(f, *stop)
            }
            ProteinEdit::Identity => write!(f, "="),
            ProteinEdit::Unknown => write!(f, "?"),
        }
    }
}
