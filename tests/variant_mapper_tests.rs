//! Variant mapper tests
//!
//! End-to-end conversions against the built-in mock fixtures:
//! - g ↔ c ↔ n ↔ p on a minus-strand transcript
//! - composite alleles (compound, mosaic, chimeric)
//! - reference replacement on both strands, including genome/transcript mismatches
//! - coordinate system tag enforcement

mod common;

use common::{variant, with_junk_reference};
use ferro_varmap::{
    AssemblyMapper, FerroError, HgvsVariant, MapperConfig, MockProvider, ReferenceMode,
    ReferenceResolver, VariantMapper,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

const HGVS_G: &str = "NC_000007.13:g.36561662C>T";
const HGVS_C: &str = "NM_001637.3:c.1582G>A";
const HGVS_N: &str = "NM_001637.3:n.1983G>A";
const HGVS_P: &str = "NP_001628.1:p.(Gly528Arg)";

fn mapper() -> VariantMapper<MockProvider> {
    VariantMapper::new(MockProvider::with_test_data())
}

// =============================================================================
// Pairwise mapper
// =============================================================================

#[test]
fn test_variant_mapper_quick() {
    let vm = mapper();
    let var_g = variant(HGVS_G);

    let var_c = vm.g_to_c(&var_g, "NM_001637.3", "splign").unwrap();
    assert_eq!(var_c.to_string(), HGVS_C);

    let var_p = vm.c_to_p(&var_c, None).unwrap();
    assert_eq!(var_p.to_string(), HGVS_P);
}

#[test]
fn test_all_directions_agree() {
    let vm = mapper();
    let (var_g, var_c, var_n) = (variant(HGVS_G), variant(HGVS_C), variant(HGVS_N));

    assert_eq!(vm.c_to_g(&var_c, "NC_000007.13", "splign").unwrap(), var_g);
    assert_eq!(vm.c_to_n(&var_c).unwrap(), var_n);
    assert_eq!(vm.n_to_c(&var_n).unwrap(), var_c);
    assert_eq!(vm.g_to_n(&var_g, "NM_001637.3", "splign").unwrap(), var_n);
    assert_eq!(vm.n_to_g(&var_n, "NC_000007.13", "splign").unwrap(), var_g);
}

#[test]
fn test_complex_variants() {
    let config = MapperConfig::default().with_replace_reference(false);
    let vm = VariantMapper::with_config(MockProvider::with_test_data(), config);

    let cases = [
        (
            "NM_000495.4:c.[1117C>T;4994_5001del]",
            "NC_000023.10:g.[107829929C>T;107939544_107939551del]",
        ),
        ("NM_000495.4:c.[=/1117C>T]", "NC_000023.10:g.[=/107829929C>T]"),
        ("NM_000495.4:c.[=//1117C>T]", "NC_000023.10:g.[=//107829929C>T]"),
    ];
    for (c, g) in cases {
        let var_g = vm.c_to_g(&variant(c), "NC_000023.10", "splign").unwrap();
        assert_eq!(var_g.to_string(), g);
        // and back again
        let var_c = vm.g_to_c(&var_g, "NM_000495.4", "splign").unwrap();
        assert_eq!(var_c.to_string(), c);
    }
}

#[test]
fn test_composite_with_reference_replacement() {
    let vm = mapper();
    let var_g = vm
        .c_to_g(&variant("NM_000495.4:c.[=/1117C>T]"), "NC_000023.10", "splign")
        .unwrap();
    assert_eq!(var_g.to_string(), "NC_000023.10:g.[=/107829929C>T]");

    // the deleted bases are filled in from the genome
    let var_g = vm
        .c_to_g(
            &variant("NM_000495.4:c.[1117C>T;4994_5001del]"),
            "NC_000023.10",
            "splign",
        )
        .unwrap();
    let text = var_g.to_string();
    assert!(text.starts_with("NC_000023.10:g.[107829929C>T;107939544_107939551del"));
    assert_eq!(text.len(), "NC_000023.10:g.[107829929C>T;107939544_107939551del]".len() + 8);
}

#[test]
fn test_composite_protein_consequence() {
    let vm = mapper();
    let var_p = vm
        .c_to_p(&variant("NM_000495.4:c.[1117C>T;4994_5001del]"), None)
        .unwrap();
    let text = var_p.to_string();
    assert!(
        text.starts_with("NP_000486.1:p.[(Arg373Ter);(Lys1665AsnfsTer"),
        "unexpected {}",
        text
    );

    let var_p = vm.c_to_p(&variant("NM_000495.4:c.[=/1117C>T]"), None).unwrap();
    assert_eq!(var_p.to_string(), "NP_000486.1:p.[=/(Arg373Ter)]");
}

#[test]
fn test_protein_consequences() {
    let vm = mapper();
    let cases = [
        ("NM_000495.4:c.1117C>T", "NP_000486.1:p.(Arg373Ter)"),
        ("NM_000495.4:c.1A>G", "NP_000486.1:p.(Met1?)"),
        ("NM_000495.4:c.-5del", "NP_000486.1:p.?"),
        ("NM_000495.4:c.-1_1insGGG", "NP_000486.1:p.?"),
        ("NM_000495.4:c.-3_-2insGGG", "NP_000486.1:p.?"),
        ("NM_000495.4:c.1116+3del", "NP_000486.1:p.?"),
        ("NM_001637.3:c.1584A>G", "NP_001628.1:p.(Gly528=)"),
    ];
    for (c, p) in cases {
        assert_eq!(vm.c_to_p(&variant(c), None).unwrap().to_string(), p, "{}", c);
    }

    assert!(matches!(
        vm.c_to_p(&variant("NM_000495.4:c.10_20insGGG"), None),
        Err(FerroError::InvalidCoordinates { .. })
    ));
}

#[test]
fn test_non_coding_transcript() {
    let vm = mapper();
    let var_g = variant("NC_000001.10:g.11900del");

    let var_n = vm.g_to_n(&var_g, "NR_046018.2", "splign").unwrap();
    assert!(var_n.to_string().starts_with("NR_046018.2:n.27del"));
    let back = vm.n_to_g(&var_n, "NC_000001.10", "splign").unwrap();
    assert!(back.to_string().starts_with("NC_000001.10:g.11900del"));

    assert!(matches!(
        vm.g_to_c(&var_g, "NR_046018.2", "splign"),
        Err(FerroError::NotCodingTranscript { .. })
    ));
    assert!(matches!(
        vm.n_to_c(&var_n),
        Err(FerroError::NotCodingTranscript { .. })
    ));
}

#[test]
fn test_missing_alignment() {
    let vm = mapper();
    let err = vm
        .g_to_c(&variant(HGVS_G), "NM_000024.5", "splign")
        .unwrap_err();
    assert!(matches!(err, FerroError::NoAlignment { .. }));

    let err = vm
        .c_to_g(&variant(HGVS_C), "NC_000007.13", "blat")
        .unwrap_err();
    assert!(matches!(err, FerroError::NoAlignment { .. }));
}

#[test]
fn test_outside_transcript() {
    let vm = mapper();
    let err = vm
        .g_to_c(&variant("NC_000007.13:g.36565000C>T"), "NM_001637.3", "splign")
        .unwrap_err();
    assert!(matches!(err, FerroError::InvalidCoordinates { .. }));
}

#[test]
fn test_strict_reference_validation() {
    let config = MapperConfig::default().with_validate_reference(ReferenceMode::Strict);
    let vm = VariantMapper::with_config(MockProvider::with_test_data(), config);

    assert_eq!(
        vm.g_to_c(&variant(HGVS_G), "NM_001637.3", "splign")
            .unwrap()
            .to_string(),
        HGVS_C
    );

    let err = vm
        .g_to_c(&variant("NC_000007.13:g.36561662A>T"), "NM_001637.3", "splign")
        .unwrap_err();
    assert_eq!(
        err,
        FerroError::ReferenceMismatch {
            location: "NC_000007.13:g.36561662".to_string(),
            expected: "C".to_string(),
            found: "A".to_string(),
        }
    );

    // unstated references are never a mismatch
    assert!(vm
        .c_to_n(&variant("NM_001637.3:c.1582_1584del"))
        .is_ok());
}

// =============================================================================
// Tag enforcement
// =============================================================================

#[rstest]
#[case("gc")]
#[case("gn")]
#[case("ng")]
#[case("cg")]
#[case("cn")]
#[case("nc")]
#[case("cp")]
fn test_invalid_input_type(#[case] key: &str) {
    let vm = mapper();
    let var_g = variant(HGVS_G);
    let var_c = variant(HGVS_C);

    let result = match key {
        "gc" => vm.g_to_c(&var_c, "NM_001637.3", "splign"),
        "gn" => vm.g_to_n(&var_c, "NM_001637.3", "splign"),
        "ng" => vm.n_to_g(&var_c, "NC_000007.13", "splign"),
        "cg" => vm.c_to_g(&var_g, "NC_000007.13", "splign"),
        "cn" => vm.c_to_n(&var_g),
        "nc" => vm.n_to_c(&var_g),
        "cp" => vm.c_to_p(&var_g, None),
        _ => unreachable!(),
    };
    assert!(
        matches!(result, Err(FerroError::InvalidVariantType { .. })),
        "{} did not fail: {:?}",
        key,
        result
    );
}

#[test]
fn test_c_to_p_invalid_inputs() {
    let vm = mapper();
    assert!(matches!(
        vm.c_to_p(&variant(HGVS_G), Some("NM_999999.1")),
        Err(FerroError::InvalidVariantType { .. })
    ));
    assert!(matches!(
        vm.c_to_p(&variant("NM_999999.1:c.10A>G"), None),
        Err(FerroError::NotCodingTranscript { .. })
    ));
}

// =============================================================================
// Reference replacement
// =============================================================================

// ADRB2: tx[280..290] = CAATAGAAGC, genome CAATGGAAGC (differs at n.285).
// IFNA16 (minus strand): tx[685..695] = AAATTTCAAA, genome AAATTTTCAA
// in transcript orientation (differs at n.692_693).
#[rstest]
#[case("NM_000024.5:c.42C>N", "NC_000005.9:g.148206436C>N", "NM_000024.5:n.281C>N")]
#[case("NM_000024.5:c.43A>N", "NC_000005.9:g.148206437A>N", "NM_000024.5:n.282A>N")]
#[case("NM_000024.5:c.44A>N", "NC_000005.9:g.148206438A>N", "NM_000024.5:n.283A>N")]
#[case("NM_000024.5:c.45T>N", "NC_000005.9:g.148206439T>N", "NM_000024.5:n.284T>N")]
#[case("NM_000024.5:c.46A>N", "NC_000005.9:g.148206440G>N", "NM_000024.5:n.285A>N")]
#[case("NM_000024.5:c.47G>N", "NC_000005.9:g.148206441G>N", "NM_000024.5:n.286G>N")]
#[case("NM_000024.5:c.48A>N", "NC_000005.9:g.148206442A>N", "NM_000024.5:n.287A>N")]
#[case("NM_000024.5:c.49A>N", "NC_000005.9:g.148206443A>N", "NM_000024.5:n.288A>N")]
#[case("NM_000024.5:c.50G>N", "NC_000005.9:g.148206444G>N", "NM_000024.5:n.289G>N")]
#[case("NM_000024.5:c.51C>N", "NC_000005.9:g.148206445C>N", "NM_000024.5:n.290C>N")]
#[case(
    "NM_000024.5:c.46_47insNN",
    "NC_000005.9:g.148206440_148206441insNN",
    "NM_000024.5:n.285_286insNN"
)]
#[case(
    "NM_000024.5:c.45_47delTAG",
    "NC_000005.9:g.148206439_148206441delTGG",
    "NM_000024.5:n.284_286delTAG"
)]
#[case(
    "NM_000024.5:c.45_47delTAGinsNNNN",
    "NC_000005.9:g.148206439_148206441delTGGinsNNNN",
    "NM_000024.5:n.284_286delTAGinsNNNN"
)]
#[case(
    "NM_000024.5:c.46dupA",
    "NC_000005.9:g.148206440dupG",
    "NM_000024.5:n.285dupA"
)]
#[case("NM_002173.2:c.*110A>N", "NC_000009.11:g.21216625T>N", "NM_002173.2:n.686A>N")]
#[case("NM_002173.2:c.*111A>N", "NC_000009.11:g.21216624T>N", "NM_002173.2:n.687A>N")]
#[case("NM_002173.2:c.*112A>N", "NC_000009.11:g.21216623T>N", "NM_002173.2:n.688A>N")]
#[case("NM_002173.2:c.*113T>N", "NC_000009.11:g.21216622A>N", "NM_002173.2:n.689T>N")]
#[case("NM_002173.2:c.*114T>N", "NC_000009.11:g.21216621A>N", "NM_002173.2:n.690T>N")]
#[case("NM_002173.2:c.*115T>N", "NC_000009.11:g.21216620A>N", "NM_002173.2:n.691T>N")]
#[case("NM_002173.2:c.*116C>N", "NC_000009.11:g.21216619A>N", "NM_002173.2:n.692C>N")]
#[case("NM_002173.2:c.*117A>N", "NC_000009.11:g.21216618G>N", "NM_002173.2:n.693A>N")]
#[case("NM_002173.2:c.*118A>N", "NC_000009.11:g.21216617T>N", "NM_002173.2:n.694A>N")]
#[case("NM_002173.2:c.*119A>N", "NC_000009.11:g.21216616T>N", "NM_002173.2:n.695A>N")]
#[case(
    "NM_002173.2:c.*115_*117insNN",
    "NC_000009.11:g.21216618_21216620insNN",
    "NM_002173.2:n.691_693insNN"
)]
#[case(
    "NM_002173.2:c.*114_*117delTTCA",
    "NC_000009.11:g.21216618_21216621delGAAA",
    "NM_002173.2:n.690_693delTTCA"
)]
#[case(
    "NM_002173.2:c.*115_*117delTCAinsNN",
    "NC_000009.11:g.21216618_21216620delGAAinsNN",
    "NM_002173.2:n.691_693delTCAinsNN"
)]
#[case(
    "NM_002173.2:c.*115_*117dupTCA",
    "NC_000009.11:g.21216618_21216620dupGAA",
    "NM_002173.2:n.691_693dupTCA"
)]
fn test_replace_reference(#[case] c: &str, #[case] g: &str, #[case] n: &str) {
    let provider = MockProvider::with_test_data();
    let resolver = ReferenceResolver::new(&provider);

    for text in [c, g, n] {
        let junk = with_junk_reference(&variant(text), 6);
        assert_eq!(resolver.resolve(&junk, None).unwrap().to_string(), text);
    }
}

#[rstest]
#[case("NM_000024.5:c.46A>N", "NC_000005.9:g.148206440G>N", "NM_000024.5:n.285A>N")]
#[case(
    "NM_000024.5:c.45_47delTAGinsNNNN",
    "NC_000005.9:g.148206439_148206441delTGGinsNNNN",
    "NM_000024.5:n.284_286delTAGinsNNNN"
)]
#[case("NM_002173.2:c.*116C>N", "NC_000009.11:g.21216619A>N", "NM_002173.2:n.692C>N")]
#[case(
    "NM_002173.2:c.*115_*117insNN",
    "NC_000009.11:g.21216618_21216620insNN",
    "NM_002173.2:n.691_693insNN"
)]
#[case(
    "NM_002173.2:c.*114_*117delTTCA",
    "NC_000009.11:g.21216618_21216621delGAAA",
    "NM_002173.2:n.690_693delTTCA"
)]
#[case(
    "NM_002173.2:c.*115_*117dupTCA",
    "NC_000009.11:g.21216618_21216620dupGAA",
    "NM_002173.2:n.691_693dupTCA"
)]
fn test_mapping_replaces_reference(#[case] c: &str, #[case] g: &str, #[case] n: &str) {
    let vm = mapper();
    let tx_ac = c.split(':').next().unwrap();
    let alt_ac = g.split(':').next().unwrap();
    let junk = |text: &str| with_junk_reference(&variant(text), 6);

    let show = |v: HgvsVariant| v.to_string();
    assert_eq!(show(vm.c_to_g(&junk(c), alt_ac, "splign").unwrap()), g);
    assert_eq!(show(vm.g_to_c(&junk(g), tx_ac, "splign").unwrap()), c);
    assert_eq!(show(vm.c_to_n(&junk(c)).unwrap()), n);
    assert_eq!(show(vm.n_to_c(&junk(n)).unwrap()), c);
    assert_eq!(show(vm.g_to_n(&junk(g), tx_ac, "splign").unwrap()), n);
    assert_eq!(show(vm.n_to_g(&junk(n), alt_ac, "splign").unwrap()), g);
}

#[test]
fn test_reference_carried_across_strand() {
    let config = MapperConfig::default().with_replace_reference(false);
    let vm = VariantMapper::with_config(MockProvider::with_test_data(), config);

    // the transcript reference is carried over, not re-derived from the genome
    let var_g = vm
        .c_to_g(
            &variant("NM_002173.2:c.*114_*117delTTCA"),
            "NC_000009.11",
            "splign",
        )
        .unwrap();
    assert_eq!(var_g.to_string(), "NC_000009.11:g.21216618_21216621delTGAA");
}

// =============================================================================
// Assembly mapper
// =============================================================================

#[test]
fn test_assembly_mapper() {
    let am = AssemblyMapper::new(MockProvider::with_test_data());
    let (var_g, var_c, var_n) = (variant(HGVS_G), variant(HGVS_C), variant(HGVS_N));

    assert_eq!(am.c_to_g(&var_c).unwrap().to_string(), HGVS_G);
    assert_eq!(am.c_to_n(&var_c).unwrap().to_string(), HGVS_N);
    assert_eq!(am.n_to_c(&var_n).unwrap().to_string(), HGVS_C);
    assert_eq!(am.n_to_g(&var_n).unwrap().to_string(), HGVS_G);
    assert_eq!(am.g_to_c(&var_g, "NM_001637.3").unwrap().to_string(), HGVS_C);
    assert_eq!(am.g_to_n(&var_g, "NM_001637.3").unwrap().to_string(), HGVS_N);
    assert_eq!(am.c_to_p(&var_c).unwrap().to_string(), HGVS_P);
}

#[test]
fn test_assembly_mapper_relevant_transcripts() {
    let am = AssemblyMapper::new(MockProvider::with_test_data());
    assert_eq!(
        am.relevant_transcripts(&variant("NC_000023.10:g.[107829929C>T;107939544_107939551del]"))
            .unwrap(),
        vec!["NM_000495.4".to_string()]
    );
    assert!(am
        .relevant_transcripts(&variant("NC_000023.10:g.50del"))
        .unwrap()
        .is_empty());
}
