//! Assembly-level convenience mapper
//!
//! Wraps [`VariantMapper`] with a fixed alignment method and primary
//! assembly taken from [`MapperConfig`], so callers only name the transcript.

use crate::config::MapperConfig;
use crate::error::FerroError;
use crate::hgvs::variant::HgvsVariant;
use crate::reference::provider::{DataProvider, TranscriptLookup};

use super::VariantMapper;

/// Maps variants against one assembly and alignment method
#[derive(Debug, Clone)]
pub struct AssemblyMapper<P: DataProvider + TranscriptLookup> {
    mapper: VariantMapper<P>,
}

impl<P: DataProvider + TranscriptLookup> AssemblyMapper<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, MapperConfig::default())
    }

    pub fn with_config(provider: P, config: MapperConfig) -> Self {
        Self {
            mapper: VariantMapper::with_config(provider, config),
        }
    }

    /// The underlying pairwise mapper
    pub fn mapper(&self) -> &VariantMapper<P> {
        &self.mapper
    }

    pub fn config(&self) -> &MapperConfig {
        self.mapper.config()
    }

    fn method(&self) -> &str {
        &self.mapper.config().alt_aln_method
    }

    /// Genomic accession for `tx_ac` on the primary assembly
    fn alt_ac_for(&self, tx_ac: &str) -> Result<String, FerroError> {
        let config = self.mapper.config();
        let alt_ac = self.mapper.provider().get_alt_ac_for_tx(
            tx_ac,
            &config.primary_assembly,
            &config.alt_aln_method,
        )?;
        log::debug!(
            "Selected {} for {} on {} ({})",
            alt_ac,
            tx_ac,
            config.primary_assembly,
            config.alt_aln_method
        );
        Ok(alt_ac)
    }

    pub fn g_to_c(&self, var: &HgvsVariant, tx_ac: &str) -> Result<HgvsVariant, FerroError> {
        self.mapper.g_to_c(var, tx_ac, self.method())
    }

    pub fn g_to_n(&self, var: &HgvsVariant, tx_ac: &str) -> Result<HgvsVariant, FerroError> {
        self.mapper.g_to_n(var, tx_ac, self.method())
    }

    /// Coding to genomic on the primary assembly
    pub fn c_to_g(&self, var: &HgvsVariant) -> Result<HgvsVariant, FerroError> {
        let alt_ac = self.alt_ac_for(var.as_cds()?.accession.as_str())?;
        self.mapper.c_to_g(var, &alt_ac, self.method())
    }

    /// Transcript to genomic on the primary assembly
    pub fn n_to_g(&self, var: &HgvsVariant) -> Result<HgvsVariant, FerroError> {
        let alt_ac = self.alt_ac_for(var.as_tx()?.accession.as_str())?;
        self.mapper.n_to_g(var, &alt_ac, self.method())
    }

    pub fn c_to_n(&self, var: &HgvsVariant) -> Result<HgvsVariant, FerroError> {
        self.mapper.c_to_n(var)
    }

    pub fn n_to_c(&self, var: &HgvsVariant) -> Result<HgvsVariant, FerroError> {
        self.mapper.n_to_c(var)
    }

    pub fn c_to_p(&self, var: &HgvsVariant) -> Result<HgvsVariant, FerroError> {
        self.mapper.c_to_p(var, None)
    }

    /// Transcripts whose alignment overlaps the span of a genomic variant
    ///
    /// The span runs from the lowest start to the highest end over all
    /// edits. A variant with no located edits overlaps nothing.
    pub fn relevant_transcripts(&self, var: &HgvsVariant) -> Result<Vec<String>, FerroError> {
        let var_g = var.as_genome()?;
        let edits = var_g.allele.edits();
        let (Some(start), Some(end)) = (
            edits.iter().map(|le| le.location.start.base).min(),
            edits.iter().map(|le| le.location.end.base).max(),
        ) else {
            return Ok(Vec::new());
        };
        self.mapper.provider().get_tx_for_region(
            var_g.accession.as_str(),
            self.method(),
            start.saturating_sub(1),
            end,
        )
    }
}
