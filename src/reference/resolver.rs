//! Reference resolver
//!
//! Re-derives the reference literal of every nucleotide edit from the
//! sequence of the variant's own accession. Mapping never copies a reference
//! across accessions; the mapped edit is resolved against its new accession.
//!
//! Intronic transcript positions have no transcript sequence. Their
//! reference is read from the genome through the alignment and
//! reverse-complemented on the minus strand; without an alignment the
//! stated reference is left as it is.

use crate::convert::cds;
use crate::convert::projector::AlignmentProjector;
use crate::error::FerroError;
use crate::hgvs::edit::{NaEdit, Sequence};
use crate::hgvs::interval::{GenomeInterval, TxInterval};
use crate::hgvs::uncertainty::Mu;
use crate::hgvs::variant::{Allele, HgvsVariant, LocEdit, LocatedVariant};
use crate::reference::alignment::{Alignment, Strand};
use crate::reference::provider::{CdsBounds, SequenceProvider, TranscriptProvider};

/// Stamps and checks reference literals against a sequence source
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'a, P: ?Sized> {
    provider: &'a P,
}

impl<'a, P> ReferenceResolver<'a, P>
where
    P: SequenceProvider + TranscriptProvider + ?Sized,
{
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Return a copy of `variant` with every reference literal replaced
    ///
    /// `alignment` is only needed for intronic `c.`/`n.` positions.
    /// Insertions, identity and unknown edits are passed through. Protein
    /// variants are returned unchanged.
    pub fn resolve(
        &self,
        variant: &HgvsVariant,
        alignment: Option<&Alignment>,
    ) -> Result<HgvsVariant, FerroError> {
        let acc = variant.accession().as_str();
        Ok(match variant {
            HgvsVariant::Genome(v) => HgvsVariant::Genome(LocatedVariant {
                accession: v.accession.clone(),
                allele: self
                    .resolve_allele(&v.allele, |iv| self.genome_reference(acc, iv).map(Some))?,
            }),
            HgvsVariant::Tx(v) => HgvsVariant::Tx(LocatedVariant {
                accession: v.accession.clone(),
                allele: self
                    .resolve_allele(&v.allele, |iv| self.tx_reference(acc, iv, alignment))?,
            }),
            HgvsVariant::Cds(v) => {
                let bounds = self.cds_bounds(acc)?;
                HgvsVariant::Cds(LocatedVariant {
                    accession: v.accession.clone(),
                    allele: self.resolve_allele(&v.allele, |iv| {
                        self.tx_reference(acc, &cds::c_to_n(iv, &bounds)?, alignment)
                    })?,
                })
            }
            HgvsVariant::Protein(_) => variant.clone(),
        })
    }

    /// Check every stated reference literal against the sequence
    ///
    /// Unstated references pass. The first disagreement fails with
    /// [`FerroError::ReferenceMismatch`].
    pub fn validate(
        &self,
        variant: &HgvsVariant,
        alignment: Option<&Alignment>,
    ) -> Result<(), FerroError> {
        let acc = variant.accession().as_str();
        let system = variant.coordinate_system();
        match variant {
            HgvsVariant::Genome(v) => self.validate_allele(&v.allele, |le| {
                check(
                    &format!("{}:{}{}", acc, system, le.location),
                    &le.edit,
                    || self.genome_reference(acc, &le.location).map(Some),
                )
            }),
            HgvsVariant::Tx(v) => self.validate_allele(&v.allele, |le| {
                check(
                    &format!("{}:{}{}", acc, system, le.location),
                    &le.edit,
                    || self.tx_reference(acc, &le.location, alignment),
                )
            }),
            HgvsVariant::Cds(v) => {
                let bounds = self.cds_bounds(acc)?;
                self.validate_allele(&v.allele, |le| {
                    check(
                        &format!("{}:{}{}", acc, system, le.location),
                        &le.edit,
                        || self.tx_reference(acc, &cds::c_to_n(&le.location, &bounds)?, alignment),
                    )
                })
            }
            HgvsVariant::Protein(_) => Ok(()),
        }
    }

    fn cds_bounds(&self, acc: &str) -> Result<CdsBounds, FerroError> {
        self.provider
            .get_cds_bounds(acc)?
            .ok_or_else(|| FerroError::NotCodingTranscript {
                accession: acc.to_string(),
            })
    }

    fn resolve_allele<L, F>(
        &self,
        allele: &Allele<L, NaEdit>,
        fetch: F,
    ) -> Result<Allele<L, NaEdit>, FerroError>
    where
        L: Clone + std::fmt::Display,
        F: Fn(&L) -> Result<Option<Sequence>, FerroError>,
    {
        allele.try_map_edits(|le| {
            let edit = le.edit.try_map_ref(|edit| {
                if !edit.has_reference_slot() {
                    return Ok(edit.clone());
                }
                let Some(reference) = fetch(&le.location)? else {
                    log::debug!("keeping stated reference at {}", le.location);
                    return Ok(edit.clone());
                };
                if edit.reference().as_ref() != Some(&reference) {
                    log::debug!(
                        "replacing reference at {}: {} -> {}",
                        le.location,
                        edit.reference().map(|s| s.to_string()).unwrap_or_default(),
                        reference
                    );
                }
                edit.with_reference(reference)
            })?;
            Ok(LocEdit {
                location: le.location.clone(),
                edit,
            })
        })
    }

    fn validate_allele<L, F>(&self, allele: &Allele<L, NaEdit>, mut f: F) -> Result<(), FerroError>
    where
        F: FnMut(&LocEdit<L, NaEdit>) -> Result<(), FerroError>,
    {
        allele.edits().into_iter().try_for_each(&mut f)
    }

    fn genome_reference(&self, acc: &str, interval: &GenomeInterval) -> Result<Sequence, FerroError> {
        let (start, end) = (interval.start.base, interval.end.base);
        if start == 0 || end < start {
            return Err(FerroError::coordinates(format!(
                "g.{} is not a valid interval",
                interval
            )));
        }
        self.fetch(acc, start - 1, end)
    }

    fn tx_reference(
        &self,
        acc: &str,
        interval: &TxInterval,
        alignment: Option<&Alignment>,
    ) -> Result<Option<Sequence>, FerroError> {
        if interval.start.is_intronic() || interval.end.is_intronic() {
            let Some(alignment) = alignment else {
                return Ok(None);
            };
            let g = AlignmentProjector::new(alignment).n_to_g(interval)?;
            let seq = self.genome_reference(&alignment.alt_ac, &g)?;
            return Ok(Some(match alignment.strand {
                Strand::Plus => seq,
                Strand::Minus => seq.reverse_complement(),
            }));
        }
        let (start, end) = (interval.start.base, interval.end.base);
        if start < 1 || end < start {
            return Err(FerroError::coordinates(format!(
                "n.{} is not a valid interval",
                interval
            )));
        }
        self.fetch(acc, (start - 1) as u64, end as u64).map(Some)
    }

    fn fetch(&self, acc: &str, start: u64, end: u64) -> Result<Sequence, FerroError> {
        let text = self.provider.fetch_sequence(acc, start, end)?;
        Sequence::parse(acc, start, end, &text)
    }
}

fn check<F>(
    location: &str,
    edit: &Mu<NaEdit>,
    fetch: F,
) -> Result<(), FerroError>
where
    F: FnOnce() -> Result<Option<Sequence>, FerroError>,
{
    let Some(stated) = edit.inner().and_then(NaEdit::reference) else {
        return Ok(());
    };
    let Some(actual) = fetch()? else {
        return Ok(());
    };
    if stated != actual {
        return Err(FerroError::ReferenceMismatch {
            location: location.to_string(),
            expected: actual.to_string(),
            found: stated.to_string(),
        });
    }
    Ok(())
}
