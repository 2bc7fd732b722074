//! Protein consequence translation (`c.` → `p.`)
//!
//! The edit is applied to the transcript sequence from `c.1` to the end of
//! the transcript, both sequences are translated with the standard code, and
//! the first differing residue decides the consequence:
//!
//! | Situation | Result |
//! |-----------|--------|
//! | no residue differs | `p.(Ala2=)` |
//! | reference stop changed | `p.(Ter110GlnextTer17)` |
//! | new stop | `p.(Arg373Ter)` |
//! | length change not a multiple of 3 | `p.(Arg97ProfsTer23)` |
//! | in-frame change | missense, `del`, `ins`, `dup` or `delins` |
//! | first codon no longer `Met` | `p.(Met1?)` |
//! | edit entirely in a UTR, or intronic | `p.?` |
//!
//! Stop distances count the first changed residue as 1 and are `Ter?` when
//! the transcript runs out before a new stop codon.

use crate::convert::codon::CodonTable;
use crate::error::FerroError;
use crate::hgvs::edit::{NaEdit, ProteinEdit};
use crate::hgvs::interval::{CdsInterval, Interval, ProtInterval};
use crate::hgvs::location::{AminoAcid, CdsPos, CdsRegion, ProtPos};
use crate::hgvs::uncertainty::Mu;
use crate::hgvs::variant::{Allele, LocEdit};
use crate::reference::provider::CdsBounds;

type ProteinAllele = Allele<ProtInterval, ProteinEdit>;

/// A coding transcript prepared for translation
#[derive(Debug, Clone)]
pub struct RefTranscript {
    tx_ac: String,
    /// Transcript sequence from `c.1` through the 3' end
    coding: Vec<u8>,
    bounds: CdsBounds,
    ref_aa: Vec<AminoAcid>,
}

impl RefTranscript {
    /// `sequence` is the full transcript (`n.1` onwards)
    pub fn new(tx_ac: &str, sequence: &str, bounds: CdsBounds) -> Result<Self, FerroError> {
        let seq = sequence.as_bytes();
        if (seq.len() as u64) < bounds.end - 1 {
            return Err(FerroError::ConversionError {
                msg: format!(
                    "{} sequence has {} bases but the CDS ends at n.{}",
                    tx_ac,
                    seq.len(),
                    bounds.end - 1
                ),
            });
        }
        let coding: Vec<u8> = seq[(bounds.start - 1) as usize..]
            .iter()
            .map(|b| b.to_ascii_uppercase())
            .collect();
        let ref_aa = CodonTable::standard().translate_to_stop(&coding);
        Ok(Self {
            tx_ac: tx_ac.to_string(),
            coding,
            bounds,
            ref_aa,
        })
    }

    pub fn tx_ac(&self) -> &str {
        &self.tx_ac
    }

    /// Reference protein, terminal `Ter` included when present
    pub fn protein(&self) -> &[AminoAcid] {
        &self.ref_aa
    }

    /// One-letter protein without the terminal stop
    pub fn protein_one_letter(&self) -> String {
        self.ref_aa
            .iter()
            .filter(|aa| !aa.is_stop())
            .map(|aa| aa.to_one_letter())
            .collect()
    }

    /// Translate every located edit of a `c.` allele
    ///
    /// Combinator structure is preserved; the first failure aborts.
    pub fn translate_allele(
        &self,
        allele: &Allele<CdsInterval, NaEdit>,
    ) -> Result<ProteinAllele, FerroError> {
        allele.try_map(&mut |le| self.translate_edit(le))
    }

    /// Translate a single located `c.` edit
    pub fn translate_edit(
        &self,
        le: &LocEdit<CdsInterval, NaEdit>,
    ) -> Result<ProteinAllele, FerroError> {
        let edit = match &le.edit {
            Mu::Certain(edit) | Mu::Uncertain(edit) => edit,
            Mu::Unknown => return Ok(Allele::Unknown),
        };
        if matches!(edit, NaEdit::Unknown) {
            return Ok(Allele::Unknown);
        }

        let (start, end) = (&le.location.start, &le.location.end);
        if start.is_intronic() || end.is_intronic() {
            return Ok(Allele::Unknown);
        }
        match (start.region(), end.region()) {
            (CdsRegion::FivePrimeUtr, CdsRegion::FivePrimeUtr)
            | (CdsRegion::ThreePrimeUtr, CdsRegion::ThreePrimeUtr) => {
                return Ok(Allele::Unknown)
            }
            (CdsRegion::FivePrimeUtr, _) => return self.five_prime_overlap(le, edit),
            _ => {}
        }

        let s = self.offset(start)?;
        let e = self.offset(end)?;
        if e < s || e >= self.coding.len() {
            return Err(FerroError::coordinates(format!(
                "c.{} lies outside {}",
                le.location, self.tx_ac
            )));
        }

        if matches!(edit, NaEdit::Identity) {
            return self.identity_at(s / 3, e / 3);
        }

        let (alt, net) = self.apply(edit, s, e)?;
        let alt_aa = CodonTable::standard().translate_to_stop(&alt);
        log::debug!(
            "{}:c.{}{} translates to {} residues (reference {})",
            self.tx_ac,
            le.location,
            edit,
            alt_aa.len(),
            self.ref_aa.len()
        );
        self.classify(&alt_aa, net, s)
    }

    /// An edit that starts in the 5'UTR and ends in the CDS. Only edits that
    /// remove or replace c.1 lose the start codon.
    fn five_prime_overlap(
        &self,
        le: &LocEdit<CdsInterval, NaEdit>,
        edit: &NaEdit,
    ) -> Result<ProteinAllele, FerroError> {
        match edit {
            NaEdit::Insertion { .. } => {
                let (start, end) = (&le.location.start, &le.location.end);
                if start.base != -1 || end.base != 1 || end.region() != CdsRegion::Coding {
                    return Err(FerroError::coordinates(format!(
                        "insertion c.{} does not lie between adjacent bases",
                        le.location
                    )));
                }
                Ok(Allele::Unknown)
            }
            NaEdit::Identity => Ok(Allele::Unknown),
            _ => Ok(self.start_loss()),
        }
    }

    /// Offset into `coding` (0-based) of an exonic non-5'UTR position
    fn offset(&self, pos: &CdsPos) -> Result<usize, FerroError> {
        let off = match pos.region() {
            CdsRegion::Coding => pos.base - 1,
            CdsRegion::ThreePrimeUtr => self.bounds.len() as i64 + pos.base - 1,
            CdsRegion::FivePrimeUtr => pos.base,
        };
        usize::try_from(off)
            .map_err(|_| FerroError::coordinates(format!("c.{} has no coding offset", pos)))
    }

    /// Apply `edit` over `s..=e`; returns the edited sequence and the length change
    fn apply(&self, edit: &NaEdit, s: usize, e: usize) -> Result<(Vec<u8>, i64), FerroError> {
        let mut alt = self.coding.clone();
        let bytes = |seq: &crate::hgvs::edit::Sequence| -> Vec<u8> {
            seq.bases().iter().map(|b| b.to_char() as u8).collect()
        };
        let net = match edit {
            NaEdit::Substitution { alternative, .. } => {
                if s != e {
                    return Err(FerroError::ConversionError {
                        msg: "substitution must cover a single base".to_string(),
                    });
                }
                alt[s] = alternative.to_char() as u8;
                0
            }
            NaEdit::Deletion { .. } => {
                alt.drain(s..=e);
                -((e - s + 1) as i64)
            }
            NaEdit::Insertion { sequence } => {
                if e != s + 1 {
                    return Err(FerroError::coordinates(format!(
                        "insertion flanks at coding offsets {} and {} are not adjacent",
                        s, e
                    )));
                }
                alt.splice(s + 1..s + 1, bytes(sequence));
                sequence.len() as i64
            }
            NaEdit::Delins { alternative, .. } => {
                alt.splice(s..=e, bytes(alternative));
                alternative.len() as i64 - (e - s + 1) as i64
            }
            NaEdit::Duplication { .. } => {
                let copy = self.coding[s..=e].to_vec();
                let n = copy.len() as i64;
                alt.splice(e + 1..e + 1, copy);
                n
            }
            NaEdit::Identity | NaEdit::Unknown => 0,
        };
        Ok((alt, net))
    }

    fn classify(
        &self,
        alt_aa: &[AminoAcid],
        net: i64,
        s: usize,
    ) -> Result<ProteinAllele, FerroError> {
        let ref_aa = &self.ref_aa;
        if alt_aa.first() != ref_aa.first() {
            return Ok(self.start_loss());
        }

        let first_diff = ref_aa.iter().zip(alt_aa).position(|(r, a)| r != a);
        let p = match first_diff {
            Some(p) => p,
            None if alt_aa.len() == ref_aa.len() => return self.identity_at(s / 3, s / 3),
            None => ref_aa.len().min(alt_aa.len()),
        };
        let (Some(&ref_p), Some(&alt_p)) = (ref_aa.get(p), alt_aa.get(p)) else {
            return Ok(Allele::Unknown);
        };
        let at_p = Interval::point(ProtPos::new(ref_p, p as u64 + 1));
        let stop_distance = || {
            alt_aa[p..]
                .iter()
                .position(|aa| aa.is_stop())
                .map(|i| i as u64 + 1)
        };

        if ref_p.is_stop() {
            return Ok(predicted(
                at_p,
                ProteinEdit::Extension {
                    alternative: alt_p,
                    stop: stop_distance(),
                },
            ));
        }
        if alt_p.is_stop() {
            return Ok(predicted(
                at_p,
                ProteinEdit::Substitution {
                    alternative: AminoAcid::Ter,
                },
            ));
        }
        if net % 3 != 0 {
            return Ok(predicted(
                at_p,
                ProteinEdit::Frameshift {
                    alternative: alt_p,
                    stop: stop_distance(),
                },
            ));
        }

        if alt_aa.last().map_or(true, |aa| !aa.is_stop()) {
            return Ok(Allele::Unknown);
        }
        let max_suffix = ref_aa.len().min(alt_aa.len()) - p;
        let suffix = ref_aa
            .iter()
            .rev()
            .zip(alt_aa.iter().rev())
            .take(max_suffix)
            .take_while(|(r, a)| r == a)
            .count();
        let deleted = &ref_aa[p..ref_aa.len() - suffix];
        let inserted = &alt_aa[p..alt_aa.len() - suffix];

        let edit_over = |first: usize, last: usize, edit: ProteinEdit| {
            let location = Interval::new(
                ProtPos::new(ref_aa[first], first as u64 + 1),
                ProtPos::new(ref_aa[last], last as u64 + 1),
            );
            predicted(location, edit)
        };
        Ok(match (deleted.len(), inserted.len()) {
            (0, 0) => Allele::Unknown,
            (1, 1) => predicted(
                at_p,
                ProteinEdit::Substitution {
                    alternative: inserted[0],
                },
            ),
            (d, 0) => edit_over(p, p + d - 1, ProteinEdit::Deletion),
            (0, i) => {
                if p >= i && ref_aa[p - i..p] == *inserted {
                    edit_over(p - i, p - 1, ProteinEdit::Duplication)
                } else if p == 0 {
                    Allele::Unknown
                } else {
                    edit_over(
                        p - 1,
                        p,
                        ProteinEdit::Insertion {
                            sequence: inserted.to_vec(),
                        },
                    )
                }
            }
            (d, _) => edit_over(
                p,
                p + d - 1,
                ProteinEdit::Delins {
                    sequence: inserted.to_vec(),
                },
            ),
        })
    }

    fn identity_at(&self, first: usize, last: usize) -> Result<ProteinAllele, FerroError> {
        let residue = |i: usize| {
            self.ref_aa
                .get(i)
                .map(|aa| ProtPos::new(*aa, i as u64 + 1))
                .ok_or_else(|| FerroError::ConversionError {
                    msg: format!("codon {} is past the end of the {} protein", i + 1, self.tx_ac),
                })
        };
        Ok(predicted(
            Interval::new(residue(first)?, residue(last)?),
            ProteinEdit::Identity,
        ))
    }

    fn start_loss(&self) -> ProteinAllele {
        let met = ProtPos::new(AminoAcid::Met, 1);
        predicted(Interval::point(met), ProteinEdit::Unknown)
    }
}

fn predicted(location: ProtInterval, edit: ProteinEdit) -> ProteinAllele {
    Allele::Edit(LocEdit::new_predicted(location, edit))
}
