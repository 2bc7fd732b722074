//! Coordinate mapper for one transcript/genome pair
//!
//! Composes the alignment projector (`g.` ↔ `n.`) with the CDS offset
//! mapper (`n.` ↔ `c.`). Genomic positions inside introns are rejected.

use crate::convert::cds;
use crate::convert::projector::AlignmentProjector;
use crate::error::FerroError;
use crate::hgvs::interval::{CdsInterval, GenomeInterval, TxInterval};
use crate::hgvs::location::{CdsPos, GenomePos, TxPos};
use crate::reference::alignment::{Alignment, Strand};
use crate::reference::provider::CdsBounds;

/// Maps intervals between `g.`, `n.` and `c.` for one alignment
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper<'a> {
    projector: AlignmentProjector<'a>,
    cds: Option<CdsBounds>,
}

impl<'a> CoordinateMapper<'a> {
    /// `cds` is `None` for non-coding transcripts
    pub fn new(alignment: &'a Alignment, cds: Option<CdsBounds>) -> Self {
        Self {
            projector: AlignmentProjector::new(alignment),
            cds,
        }
    }

    pub fn alignment(&self) -> &'a Alignment {
        self.projector.alignment()
    }

    pub fn strand(&self) -> Strand {
        self.projector.strand()
    }

    pub fn is_coding(&self) -> bool {
        self.cds.is_some()
    }

    /// CDS bounds, or [`FerroError::NotCodingTranscript`]
    pub fn cds(&self) -> Result<&CdsBounds, FerroError> {
        self.cds.as_ref().ok_or_else(|| FerroError::NotCodingTranscript {
            accession: self.alignment().tx_ac.clone(),
        })
    }

    pub fn g_to_n(&self, interval: &GenomeInterval) -> Result<TxInterval, FerroError> {
        self.projector.g_to_n(interval)
    }

    pub fn n_to_g(&self, interval: &TxInterval) -> Result<GenomeInterval, FerroError> {
        self.projector.n_to_g(interval)
    }

    pub fn n_to_c(&self, interval: &TxInterval) -> Result<CdsInterval, FerroError> {
        cds::n_to_c(interval, self.cds()?)
    }

    pub fn c_to_n(&self, interval: &CdsInterval) -> Result<TxInterval, FerroError> {
        cds::c_to_n(interval, self.cds()?)
    }

    pub fn g_to_c(&self, interval: &GenomeInterval) -> Result<CdsInterval, FerroError> {
        // non-coding transcripts fail before projection
        let cds = *self.cds()?;
        cds::n_to_c(&self.g_to_n(interval)?, &cds)
    }

    pub fn c_to_g(&self, interval: &CdsInterval) -> Result<GenomeInterval, FerroError> {
        self.n_to_g(&self.c_to_n(interval)?)
    }

    pub fn genomic_to_cds(&self, pos: GenomePos) -> Result<CdsPos, FerroError> {
        let cds = *self.cds()?;
        cds::rna_to_cds(self.projector.genomic_to_tx(pos)?, &cds)
    }

    pub fn cds_to_genomic(&self, pos: CdsPos) -> Result<GenomePos, FerroError> {
        self.projector
            .tx_to_genomic(cds::cds_to_rna(pos, self.cds()?)?)
    }

    pub fn tx_to_genomic(&self, pos: TxPos) -> Result<GenomePos, FerroError> {
        self.projector.tx_to_genomic(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hgvs::interval::Interval;
    use crate::reference::alignment::ExonBlock;

    /// Three exons on the plus strand, CDS n.6 - n.25
    fn make_mapper_plus() -> Alignment {
        Alignment::new(
            "NM_PLUS.1",
            "NC_TEST.1",
            "splign",
            Strand::Plus,
            vec![
                ExonBlock::new(0, (0, 10), (1000, 1010), "").unwrap(),
                ExonBlock::new(1, (10, 20), (2000, 2010), "").unwrap(),
                ExonBlock::new(2, (20, 30), (3000, 3010), "").unwrap(),
            ],
        )
        .unwrap()
    }

    fn make_mapper_minus() -> Alignment {
        Alignment::new(
            "NM_MINUS.1",
            "NC_TEST.1",
            "splign",
            Strand::Minus,
            vec![
                ExonBlock::new(0, (0, 10), (3000, 3010), "").unwrap(),
                ExonBlock::new(1, (10, 20), (2000, 2010), "").unwrap(),
                ExonBlock::new(2, (20, 30), (1000, 1010), "").unwrap(),
            ],
        )
        .unwrap()
    }

    fn cds() -> Option<CdsBounds> {
        Some(CdsBounds::new(6, 26).unwrap())
    }

    #[test]
    fn test_genomic_to_cds_plus() {
        let aln = make_mapper_plus();
        let mapper = CoordinateMapper::new(&aln, cds());
        // g.1006 is n.6 = c.1
        assert_eq!(mapper.genomic_to_cds(GenomePos::new(1006)).unwrap(), CdsPos::new(1));
        // g.1005 is n.5 = c.-1
        assert_eq!(mapper.genomic_to_cds(GenomePos::new(1005)).unwrap(), CdsPos::new(-1));
        // g.2001 is n.11 = c.6
        assert_eq!(mapper.genomic_to_cds(GenomePos::new(2001)).unwrap(), CdsPos::new(6));
        // g.3006 is n.26 = c.*1
        assert_eq!(mapper.genomic_to_cds(GenomePos::new(3006)).unwrap(), CdsPos::utr3(1));
        assert_eq!(mapper.cds_to_genomic(CdsPos::utr3(1)).unwrap(), GenomePos::new(3006));
    }

    #[test]
    fn test_genomic_to_cds_minus() {
        let aln = make_mapper_minus();
        let mapper = CoordinateMapper::new(&aln, cds());
        // n.1 is g.3010, n.6 is g.3005
        assert_eq!(mapper.genomic_to_cds(GenomePos::new(3005)).unwrap(), CdsPos::new(1));
        assert_eq!(mapper.genomic_to_cds(GenomePos::new(3010)).unwrap(), CdsPos::new(-5));
        assert_eq!(mapper.cds_to_genomic(CdsPos::new(6)).unwrap(), GenomePos::new(2010));
    }

    #[test]
    fn test_interval_round_trip_minus() {
        let aln = make_mapper_minus();
        let mapper = CoordinateMapper::new(&aln, cds());
        let g = Interval::new(GenomePos::new(2003), GenomePos::new(3002));
        let c = mapper.g_to_c(&g).unwrap();
        assert_eq!(c.to_string(), "3_13");
        assert_eq!(mapper.c_to_g(&c).unwrap(), g);
    }

    #[test]
    fn test_intronic_cds_to_genomic() {
        let aln = make_mapper_plus();
        let mapper = CoordinateMapper::new(&aln, cds());
        // c.5 is n.10, the last base of exon 1 at g.1010
        let pos = CdsPos::new(5).with_offset(3);
        assert_eq!(mapper.cds_to_genomic(pos).unwrap(), GenomePos::new(1013));
    }

    #[test]
    fn test_non_coding() {
        let aln = make_mapper_plus();
        let mapper = CoordinateMapper::new(&aln, None);
        assert!(!mapper.is_coding());
        let g = Interval::point(GenomePos::new(1006));
        assert!(mapper.g_to_n(&g).is_ok());
        assert!(matches!(
            mapper.g_to_c(&g),
            Err(FerroError::NotCodingTranscript { .. })
        ));
        assert!(matches!(
            mapper.genomic_to_cds(GenomePos::new(1500)),
            Err(FerroError::NotCodingTranscript { .. })
        ));
    }

    #[test]
    fn test_intron_rejected() {
        let aln = make_mapper_plus();
        let mapper = CoordinateMapper::new(&aln, cds());
        assert!(matches!(
            mapper.genomic_to_cds(GenomePos::new(1500)),
            Err(FerroError::InvalidCoordinates { .. })
        ));
        assert_eq!(mapper.tx_to_genomic(TxPos::new(11)).unwrap(), GenomePos::new(2001));
    }
}
