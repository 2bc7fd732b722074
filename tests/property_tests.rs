//! Property-based tests for coordinate mapping
//!
//! Round trips through the CDS offset mapper, the alignment projector and
//! the full variant mapper on both strands.

mod common;

use common::variant;
use ferro_varmap::convert::cds::{cds_to_rna, rna_to_cds};
use ferro_varmap::convert::AlignmentProjector;
use ferro_varmap::hgvs::{CdsPos, CdsRegion, GenomePos, TxPos};
use ferro_varmap::reference::{AlignmentProvider, CdsBounds};
use ferro_varmap::{MockProvider, ReferenceResolver, VariantMapper};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

// =============================================================================
// Strategies
// =============================================================================

/// CDS bounds on a transcript of up to 5000 bases
fn cds_bounds() -> impl Strategy<Value = (CdsBounds, u64)> {
    (1..2000u64, 3..2000u64, 0..1000u64).prop_map(|(start, len, utr3)| {
        let bounds = CdsBounds {
            start,
            end: start + len,
        };
        (bounds, start + len + utr3)
    })
}

/// Exonic genome positions (1-based) of NM_001637.3, which sits on the minus strand
fn nm_001637_exonic() -> impl Strategy<Value = u64> {
    prop_oneof![
        36563145..=36564144u64,
        36561545..=36562644u64,
        36560345..=36560744u64,
    ]
}

/// Exonic genome positions (1-based) of NM_000495.4, on the plus strand
fn nm_000495_exonic() -> impl Strategy<Value = u64> {
    prop_oneof![107828534..=107830533u64, 107936272..=107940771u64]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // -------------------------------------------------------------------------
    // CDS offset mapper
    // -------------------------------------------------------------------------

    /// n. → c. → n. is the identity for every transcript position
    #[test]
    fn test_cds_offset_inverse((bounds, tx_len) in cds_bounds(), frac in 0.0..1.0f64) {
        let n = 1 + ((tx_len - 1) as f64 * frac) as i64;
        let c = rna_to_cds(TxPos::new(n), &bounds).unwrap();
        prop_assert_eq!(cds_to_rna(c, &bounds).unwrap(), TxPos::new(n));

        let expected = if n < bounds.start as i64 {
            CdsRegion::FivePrimeUtr
        } else if n < bounds.end as i64 {
            CdsRegion::Coding
        } else {
            CdsRegion::ThreePrimeUtr
        };
        prop_assert_eq!(c.region(), expected);
    }

    /// Intronic offsets pass through unchanged
    #[test]
    fn test_cds_offset_keeps_intronic_offset(
        (bounds, tx_len) in cds_bounds(),
        offset in prop_oneof![-50..-1i64, 1..50i64],
    ) {
        let n = TxPos::with_offset(tx_len as i64 / 2 + 1, offset);
        let c = rna_to_cds(n, &bounds).unwrap();
        prop_assert_eq!(c.offset, Some(offset));
        prop_assert_eq!(cds_to_rna(c, &bounds).unwrap(), n);
    }

    /// c.-1 and c.1 are adjacent; there is no c.0
    #[test]
    fn test_no_position_zero((bounds, _) in cds_bounds()) {
        prop_assume!(bounds.start > 1);
        let before = cds_to_rna(CdsPos::new(-1), &bounds).unwrap();
        let first = cds_to_rna(CdsPos::new(1), &bounds).unwrap();
        prop_assert_eq!(first.base - before.base, 1);
    }

    // -------------------------------------------------------------------------
    // Alignment projector
    // -------------------------------------------------------------------------

    /// g. → n. → g. on a minus-strand, three-exon alignment
    #[test]
    fn test_projection_round_trip_minus(g in nm_001637_exonic()) {
        let provider = MockProvider::with_test_data();
        let alignment = provider.get_alignment("NM_001637.3", "NC_000007.13", "splign").unwrap();
        let projector = AlignmentProjector::new(&alignment);

        let n = projector.genomic_to_tx(GenomePos::new(g)).unwrap();
        prop_assert!(!n.is_intronic());
        prop_assert!((1..=2500).contains(&n.base));
        prop_assert_eq!(projector.tx_to_genomic(n).unwrap(), GenomePos::new(g));
    }

    /// Genome order is reversed relative to transcript order on the minus strand
    #[test]
    fn test_projection_is_monotonic_minus(g in 36561545..36562644u64) {
        let provider = MockProvider::with_test_data();
        let alignment = provider.get_alignment("NM_001637.3", "NC_000007.13", "splign").unwrap();
        let projector = AlignmentProjector::new(&alignment);

        let a = projector.genomic_to_tx(GenomePos::new(g)).unwrap();
        let b = projector.genomic_to_tx(GenomePos::new(g + 1)).unwrap();
        prop_assert_eq!(a.base - b.base, 1);
    }

    // -------------------------------------------------------------------------
    // Variant mapper
    // -------------------------------------------------------------------------

    /// g → c → g reproduces a resolved deletion on the minus strand
    #[test]
    fn test_variant_round_trip_minus(g in nm_001637_exonic(), len in 0..3u64) {
        prop_assume!(same_exon_001637(g, g + len));
        round_trip("NC_000007.13", "NM_001637.3", g, g + len)?;
    }

    /// g → c → g reproduces a resolved deletion on the plus strand
    #[test]
    fn test_variant_round_trip_plus(g in nm_000495_exonic(), len in 0..3u64) {
        prop_assume!(same_exon_000495(g, g + len));
        round_trip("NC_000023.10", "NM_000495.4", g, g + len)?;
    }
}

fn same_exon_001637(s: u64, e: u64) -> bool {
    [(36563145, 36564144), (36561545, 36562644), (36560345, 36560744)]
        .iter()
        .any(|&(lo, hi)| lo <= s && e <= hi)
}

fn same_exon_000495(s: u64, e: u64) -> bool {
    [(107828534, 107830533), (107936272, 107940771)]
        .iter()
        .any(|&(lo, hi)| lo <= s && e <= hi)
}

fn round_trip(alt_ac: &str, tx_ac: &str, start: u64, end: u64) -> Result<(), TestCaseError> {
    let provider = MockProvider::with_test_data();
    let text = if start == end {
        format!("{}:g.{}del", alt_ac, start)
    } else {
        format!("{}:g.{}_{}del", alt_ac, start, end)
    };
    let var_g = ReferenceResolver::new(&provider)
        .resolve(&variant(&text), None)
        .unwrap();

    let vm = VariantMapper::new(provider);
    let var_c = vm.g_to_c(&var_g, tx_ac, "splign").unwrap();
    let var_n = vm.c_to_n(&var_c).unwrap();
    prop_assert_eq!(&vm.c_to_g(&var_c, alt_ac, "splign").unwrap(), &var_g);
    prop_assert_eq!(&vm.n_to_g(&var_n, alt_ac, "splign").unwrap(), &var_g);
    prop_assert_eq!(&vm.n_to_c(&var_n).unwrap(), &var_c);
    Ok(())
}
