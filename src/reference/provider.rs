//! Data provider traits
//!
//! The mapping engine performs no I/O of its own. Alignments, CDS bounds and
//! sequences come from collaborators implementing these traits, passed
//! explicitly to every mapper. Implementations decide their own caching and
//! concurrency discipline.

use serde::{Deserialize, Serialize};

use crate::error::FerroError;
use crate::reference::alignment::Alignment;

/// CDS bounds of a coding transcript, in 1-based transcript (`n.`) coordinates
///
/// `start` is the position of `c.1`; `end` is one past the last coding base,
/// so it is the position of `c.*1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CdsBounds {
    pub start: u64,
    pub end: u64,
}

impl CdsBounds {
    pub fn new(start: u64, end: u64) -> Result<Self, FerroError> {
        if start == 0 || end <= start {
            return Err(FerroError::ConversionError {
                msg: format!("invalid CDS bounds {}..{}", start, end),
            });
        }
        Ok(Self { start, end })
    }

    /// From 0-based half-open offsets, as stored by UTA-style databases
    pub fn from_zero_based(start_i: u64, end_i: u64) -> Result<Self, FerroError> {
        Self::new(start_i + 1, end_i + 1)
    }

    /// Number of coding bases, stop codon included
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Supplies exon alignments between a transcript and a genomic accession
pub trait AlignmentProvider {
    /// Fails with [`FerroError::NoAlignment`] if the pair is unknown
    fn get_alignment(&self, tx_ac: &str, alt_ac: &str, method: &str)
        -> Result<Alignment, FerroError>;
}

/// Supplies CDS bounds for transcripts
pub trait TranscriptProvider {
    /// `Ok(None)` marks a known non-coding transcript
    fn get_cds_bounds(&self, tx_ac: &str) -> Result<Option<CdsBounds>, FerroError>;

    /// Protein product of a coding transcript, if known
    fn get_protein_accession(&self, _tx_ac: &str) -> Option<String> {
        None
    }
}

/// Supplies sequence text
pub trait SequenceProvider {
    /// Fetch `accession[start..end]` (0-based, half-open)
    ///
    /// Fails with [`FerroError::SequenceFetch`] for unknown accessions or
    /// out-of-range intervals.
    fn fetch_sequence(&self, accession: &str, start: u64, end: u64) -> Result<String, FerroError>;

    /// Length of the full sequence of `accession`
    fn sequence_len(&self, accession: &str) -> Result<u64, FerroError>;
}

/// Chooses genomic accessions and transcripts for the convenience layer
pub trait TranscriptLookup {
    /// Genomic accession a transcript is aligned to on an assembly
    fn get_alt_ac_for_tx(
        &self,
        tx_ac: &str,
        assembly: &str,
        method: &str,
    ) -> Result<String, FerroError>;

    /// Transcripts aligned to `alt_ac` that overlap `start..end` (0-based, half-open)
    fn get_tx_for_region(
        &self,
        alt_ac: &str,
        method: &str,
        start: u64,
        end: u64,
    ) -> Result<Vec<String>, FerroError>;
}

/// Everything the variant mapper needs
pub trait DataProvider: AlignmentProvider + TranscriptProvider + SequenceProvider {}

impl<T> DataProvider for T where T: AlignmentProvider + TranscriptProvider + SequenceProvider {}

impl<T: AlignmentProvider + ?Sized> AlignmentProvider for &T {
    fn get_alignment(
        &self,
        tx_ac: &str,
        alt_ac: &str,
        method: &str,
    ) -> Result<Alignment, FerroError> {
        (**self).get_alignment(tx_ac, alt_ac, method)
    }
}

impl<T: TranscriptProvider + ?Sized> TranscriptProvider for &T {
    fn get_cds_bounds(&self, tx_ac: &str) -> Result<Option<CdsBounds>, FerroError> {
        (**self).get_cds_bounds(tx_ac)
    }

    fn get_protein_accession(&self, tx_ac: &str) -> Option<String> {
        (**self).get_protein_accession(tx_ac)
    }
}

impl<T: SequenceProvider + ?Sized> SequenceProvider for &T {
    fn fetch_sequence(&self, accession: &str, start: u64, end: u64) -> Result<String, FerroError> {
        (**self).fetch_sequence(accession, start, end)
    }

    fn sequence_len(&self, accession: &str) -> Result<u64, FerroError> {
        (**self).sequence_len(accession)
    }
}

impl<T: TranscriptLookup + ?Sized> TranscriptLookup for &T {
    fn get_alt_ac_for_tx(
        &self,
        tx_ac: &str,
        assembly: &str,
        method: &str,
    ) -> Result<String, FerroError> {
        (**self).get_alt_ac_for_tx(tx_ac, assembly, method)
    }

    fn get_tx_for_region(
        &self,
        alt_ac: &str,
        method: &str,
        start: u64,
        end: u64,
    ) -> Result<Vec<String>, FerroError> {
        (**self).get_tx_for_region(alt_ac, method, start, end)
    }
}
