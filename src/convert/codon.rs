//! Standard genetic code.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::hgvs::location::AminoAcid;

/// Amino acids of the standard code, codons enumerated in `TCAG` order
/// (`TTT`, `TTC`, `TTA`, `TTG`, `TCT`, ...).
const STANDARD_CODE: &[u8; 64] =
    b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

const BASE_ORDER: &[u8; 4] = b"TCAG";

/// Codon to amino acid lookup.
#[derive(Debug, Clone)]
pub struct CodonTable {
    codon_to_aa: HashMap<[u8; 3], AminoAcid>,
}

impl CodonTable {
    /// The standard code (NCBI translation table 1), built once.
    pub fn standard() -> &'static CodonTable {
        static TABLE: OnceLock<CodonTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            let mut codon_to_aa = HashMap::with_capacity(64);
            for (i, b1) in BASE_ORDER.iter().enumerate() {
                for (j, b2) in BASE_ORDER.iter().enumerate() {
                    for (k, b3) in BASE_ORDER.iter().enumerate() {
                        let one = STANDARD_CODE[i * 16 + j * 4 + k] as char;
                        let aa = AminoAcid::from_one_letter(one).unwrap_or(AminoAcid::Xaa);
                        codon_to_aa.insert([*b1, *b2, *b3], aa);
                    }
                }
            }
            CodonTable { codon_to_aa }
        })
    }

    /// Translate one codon; `U` reads as `T`, anything ambiguous is `Xaa`.
    pub fn translate_codon(&self, codon: &[u8]) -> AminoAcid {
        if codon.len() != 3 {
            return AminoAcid::Xaa;
        }
        let mut key = [0u8; 3];
        for (slot, b) in key.iter_mut().zip(codon) {
            *slot = match b.to_ascii_uppercase() {
                b'U' => b'T',
                other => other,
            };
        }
        self.codon_to_aa.get(&key).copied().unwrap_or(AminoAcid::Xaa)
    }

    /// Translate whole codons, ignoring a trailing partial codon.
    pub fn translate(&self, seq: &[u8]) -> Vec<AminoAcid> {
        seq.chunks_exact(3).map(|c| self.translate_codon(c)).collect()
    }

    /// Translate up to and including the first stop codon.
    ///
    /// If the sequence runs out first, the result has no terminal `Ter`.
    pub fn translate_to_stop(&self, seq: &[u8]) -> Vec<AminoAcid> {
        let mut out = Vec::with_capacity(seq.len() / 3);
        for codon in seq.chunks_exact(3) {
            let aa = self.translate_codon(codon);
            out.push(aa);
            if aa.is_stop() {
                break;
            }
        }
        out
    }
}
