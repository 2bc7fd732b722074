//! Variant mapper
//!
//! Directed conversions between `g.`, `n.`, `c.` and `p.` variants. Each
//! conversion checks that its input is tagged with the coordinate system it
//! expects, maps every located edit of the allele tree, and re-derives the
//! reference literals of the result from the target accession.
//!
//! # Example
//!
//! ```
//! use ferro_varmap::hgvs::edit::{Base, NaEdit};
//! use ferro_varmap::hgvs::interval::Interval;
//! use ferro_varmap::hgvs::location::GenomePos;
//! use ferro_varmap::hgvs::variant::{Allele, HgvsVariant, LocatedVariant};
//! use ferro_varmap::{MockProvider, VariantMapper};
//!
//! let mapper = VariantMapper::new(MockProvider::with_test_data());
//! let var_g = HgvsVariant::Genome(
//!     LocatedVariant::new(
//!         "NC_000007.13",
//!         Allele::single(
//!             Interval::point(GenomePos::new(36561662)),
//!             NaEdit::substitution(Base::C, Base::T),
//!         ),
//!     )
//!     .unwrap(),
//! );
//! let var_c = mapper.g_to_c(&var_g, "NM_001637.3", "splign").unwrap();
//! assert_eq!(var_c.to_string(), "NM_001637.3:c.1582G>A");
//! let var_p = mapper.c_to_p(&var_c, None).unwrap();
//! assert_eq!(var_p.to_string(), "NP_001628.1:p.(Gly528Arg)");
//! ```

pub mod assembly;

pub use assembly::AssemblyMapper;

use md5::{Digest, Md5};

use crate::config::{MapperConfig, ReferenceMode};
use crate::convert::cds;
use crate::convert::mapper::CoordinateMapper;
use crate::convert::protein::RefTranscript;
use crate::error::FerroError;
use crate::hgvs::edit::NaEdit;
use crate::hgvs::variant::{Allele, HgvsVariant, LocEdit, LocatedVariant};
use crate::reference::alignment::{Alignment, Strand};
use crate::reference::provider::{CdsBounds, DataProvider};
use crate::reference::resolver::ReferenceResolver;

/// Maps variants between coordinate systems using a data provider
#[derive(Debug, Clone)]
pub struct VariantMapper<P: DataProvider> {
    provider: P,
    config: MapperConfig,
}

impl<P: DataProvider> VariantMapper<P> {
    /// Create a new mapper with the default configuration
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            config: MapperConfig::default(),
        }
    }

    /// Create a mapper with custom configuration
    pub fn with_config(provider: P, config: MapperConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Genomic to coding
    pub fn g_to_c(
        &self,
        var: &HgvsVariant,
        tx_ac: &str,
        alt_aln_method: &str,
    ) -> Result<HgvsVariant, FerroError> {
        let var_g = var.as_genome()?;
        let alignment =
            self.provider
                .get_alignment(tx_ac, var_g.accession.as_str(), alt_aln_method)?;
        self.check_reference(var, None)?;
        let mapper = CoordinateMapper::new(&alignment, self.provider.get_cds_bounds(tx_ac)?);
        mapper.cds()?;
        let allele = map_allele(&var_g.allele, flips(&alignment), |iv| mapper.g_to_c(iv))?;
        let out = HgvsVariant::Cds(LocatedVariant::new(tx_ac, allele)?);
        self.finish("g_to_c", var, out, Some(&alignment))
    }

    /// Coding to genomic
    pub fn c_to_g(
        &self,
        var: &HgvsVariant,
        alt_ac: &str,
        alt_aln_method: &str,
    ) -> Result<HgvsVariant, FerroError> {
        let var_c = var.as_cds()?;
        let tx_ac = var_c.accession.as_str();
        let alignment = self.provider.get_alignment(tx_ac, alt_ac, alt_aln_method)?;
        self.check_reference(var, Some(&alignment))?;
        let mapper = CoordinateMapper::new(&alignment, self.provider.get_cds_bounds(tx_ac)?);
        mapper.cds()?;
        let allele = map_allele(&var_c.allele, flips(&alignment), |iv| mapper.c_to_g(iv))?;
        let out = HgvsVariant::Genome(LocatedVariant::new(alt_ac, allele)?);
        self.finish("c_to_g", var, out, Some(&alignment))
    }

    /// Genomic to transcript; works for non-coding transcripts
    pub fn g_to_n(
        &self,
        var: &HgvsVariant,
        tx_ac: &str,
        alt_aln_method: &str,
    ) -> Result<HgvsVariant, FerroError> {
        let var_g = var.as_genome()?;
        let alignment =
            self.provider
                .get_alignment(tx_ac, var_g.accession.as_str(), alt_aln_method)?;
        self.check_reference(var, None)?;
        let mapper = CoordinateMapper::new(&alignment, None);
        let allele = map_allele(&var_g.allele, flips(&alignment), |iv| mapper.g_to_n(iv))?;
        let out = HgvsVariant::Tx(LocatedVariant::new(tx_ac, allele)?);
        self.finish("g_to_n", var, out, Some(&alignment))
    }

    /// Transcript to genomic
    pub fn n_to_g(
        &self,
        var: &HgvsVariant,
        alt_ac: &str,
        alt_aln_method: &str,
    ) -> Result<HgvsVariant, FerroError> {
        let var_n = var.as_tx()?;
        let alignment =
            self.provider
                .get_alignment(var_n.accession.as_str(), alt_ac, alt_aln_method)?;
        self.check_reference(var, Some(&alignment))?;
        let mapper = CoordinateMapper::new(&alignment, None);
        let allele = map_allele(&var_n.allele, flips(&alignment), |iv| mapper.n_to_g(iv))?;
        let out = HgvsVariant::Genome(LocatedVariant::new(alt_ac, allele)?);
        self.finish("n_to_g", var, out, Some(&alignment))
    }

    /// Coding to transcript, on the same accession
    pub fn c_to_n(&self, var: &HgvsVariant) -> Result<HgvsVariant, FerroError> {
        let var_c = var.as_cds()?;
        let bounds = self.cds_bounds(var_c.accession.as_str())?;
        self.check_reference(var, None)?;
        let allele = map_allele(&var_c.allele, false, |iv| cds::c_to_n(iv, &bounds))?;
        let out = HgvsVariant::Tx(LocatedVariant {
            accession: var_c.accession.clone(),
            allele,
        });
        self.finish("c_to_n", var, out, None)
    }

    /// Transcript to coding, on the same accession
    pub fn n_to_c(&self, var: &HgvsVariant) -> Result<HgvsVariant, FerroError> {
        let var_n = var.as_tx()?;
        let bounds = self.cds_bounds(var_n.accession.as_str())?;
        self.check_reference(var, None)?;
        let allele = map_allele(&var_n.allele, false, |iv| cds::n_to_c(iv, &bounds))?;
        let out = HgvsVariant::Cds(LocatedVariant {
            accession: var_n.accession.clone(),
            allele,
        });
        self.finish("n_to_c", var, out, None)
    }

    /// Coding to protein
    ///
    /// The protein accession is `pro_ac` when given, else the provider's
    /// protein for the transcript, else `MD5_` and the digest of the
    /// translated reference protein.
    pub fn c_to_p(
        &self,
        var: &HgvsVariant,
        pro_ac: Option<&str>,
    ) -> Result<HgvsVariant, FerroError> {
        let var_c = var.as_cds()?;
        let tx_ac = var_c.accession.as_str();
        let bounds = self.cds_bounds(tx_ac)?;
        self.check_reference(var, None)?;

        let len = self.provider.sequence_len(tx_ac)?;
        let sequence = self.provider.fetch_sequence(tx_ac, 0, len)?;
        let transcript = RefTranscript::new(tx_ac, &sequence, bounds)?;
        let allele = transcript.translate_allele(&var_c.allele)?;

        let pro_ac = match pro_ac {
            Some(ac) => ac.to_string(),
            None => self
                .provider
                .get_protein_accession(tx_ac)
                .unwrap_or_else(|| md5_accession(&transcript.protein_one_letter())),
        };
        let out = HgvsVariant::Protein(LocatedVariant::new(pro_ac, allele)?);
        tracing::debug!(source = %var, target = %out, "c_to_p");
        Ok(out)
    }

    fn cds_bounds(&self, tx_ac: &str) -> Result<CdsBounds, FerroError> {
        self.provider
            .get_cds_bounds(tx_ac)?
            .ok_or_else(|| FerroError::NotCodingTranscript {
                accession: tx_ac.to_string(),
            })
    }

    fn check_reference(
        &self,
        var: &HgvsVariant,
        alignment: Option<&Alignment>,
    ) -> Result<(), FerroError> {
        match self.config.validate_reference {
            ReferenceMode::Ignore => Ok(()),
            ReferenceMode::Strict => {
                ReferenceResolver::new(&self.provider).validate(var, alignment)
            }
        }
    }

    fn finish(
        &self,
        op: &'static str,
        source: &HgvsVariant,
        out: HgvsVariant,
        alignment: Option<&Alignment>,
    ) -> Result<HgvsVariant, FerroError> {
        let out = if self.config.replace_reference {
            ReferenceResolver::new(&self.provider).resolve(&out, alignment)?
        } else {
            out
        };
        tracing::debug!(source = %source, target = %out, "{}", op);
        Ok(out)
    }
}

fn flips(alignment: &Alignment) -> bool {
    alignment.strand == Strand::Minus
}

/// Map every location of an allele, reverse-complementing edits across a strand flip
fn map_allele<L, L2, F>(
    allele: &Allele<L, NaEdit>,
    flip: bool,
    mut f: F,
) -> Result<Allele<L2, NaEdit>, FerroError>
where
    F: FnMut(&L) -> Result<L2, FerroError>,
{
    allele.try_map_edits(|le| {
        let edit = if flip {
            le.edit.clone().map(|e| e.reverse_complement())
        } else {
            le.edit.clone()
        };
        Ok(LocEdit {
            location: f(&le.location)?,
            edit,
        })
    })
}

fn md5_accession(protein: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(protein.as_bytes());
    format!("MD5_{:x}", hasher.finalize())
}
