//! Mock data provider for testing
//!
//! Holds alignments, CDS bounds and sequences in memory. Genomic sequence is
//! stored as sparse windows, so a fixture only needs the bases around the
//! transcripts it describes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::FerroError;
use crate::reference::alignment::{Alignment, Cigar, CigarOp, ExonBlock, Strand};
use crate::reference::provider::{
    AlignmentProvider, CdsBounds, SequenceProvider, TranscriptLookup, TranscriptProvider,
};

/// Transcript metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub accession: String,
    /// `None` for non-coding transcripts
    #[serde(default)]
    pub cds: Option<CdsBounds>,
    #[serde(default)]
    pub protein_accession: Option<String>,
}

/// A stretch of sequence starting at a 0-based offset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceWindow {
    pub accession: String,
    #[serde(default)]
    pub offset: u64,
    pub sequence: String,
}

impl SequenceWindow {
    fn end(&self) -> u64 {
        self.offset + self.sequence.len() as u64
    }
}

/// On-disk layout read by [`MockProvider::from_json`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MockData {
    #[serde(default)]
    pub alignments: Vec<Alignment>,
    #[serde(default)]
    pub transcripts: Vec<TranscriptRecord>,
    #[serde(default)]
    pub sequences: Vec<SequenceWindow>,
    /// Assembly name to the genomic accessions it contains
    #[serde(default)]
    pub assemblies: HashMap<String, Vec<String>>,
}

/// In-memory provider implementing every collaborator trait
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    alignments: HashMap<(String, String, String), Alignment>,
    transcripts: HashMap<String, TranscriptRecord>,
    sequences: HashMap<String, Vec<SequenceWindow>>,
    assemblies: HashMap<String, Vec<String>>,
}

impl MockProvider {
    /// Create an empty mock provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Load provider data from a JSON file
    pub fn from_json(path: &Path) -> Result<Self, FerroError> {
        let content = std::fs::read_to_string(path)?;
        let data: MockData = serde_json::from_str(&content)?;
        Self::from_data(data)
    }

    /// Build from already deserialized data; alignments are validated
    pub fn from_data(data: MockData) -> Result<Self, FerroError> {
        let mut provider = Self::new();
        for alignment in data.alignments {
            alignment.validate()?;
            provider.add_alignment(alignment);
        }
        for record in data.transcripts {
            provider.add_transcript(record);
        }
        for window in data.sequences {
            provider.add_sequence(window.accession, window.offset, window.sequence);
        }
        for (assembly, accessions) in data.assemblies {
            provider.add_assembly(assembly, accessions);
        }
        Ok(provider)
    }

    pub fn add_alignment(&mut self, alignment: Alignment) {
        let key = (
            alignment.tx_ac.clone(),
            alignment.alt_ac.clone(),
            alignment.method.clone(),
        );
        self.alignments.insert(key, alignment);
    }

    pub fn add_transcript(&mut self, record: TranscriptRecord) {
        self.transcripts.insert(record.accession.clone(), record);
    }

    /// Add a sequence window; windows of one accession may be disjoint
    pub fn add_sequence(
        &mut self,
        accession: impl Into<String>,
        offset: u64,
        sequence: impl Into<String>,
    ) {
        let accession = accession.into();
        self.sequences
            .entry(accession.clone())
            .or_default()
            .push(SequenceWindow {
                accession,
                offset,
                sequence: sequence.into(),
            });
    }

    pub fn add_assembly(&mut self, assembly: impl Into<String>, accessions: Vec<String>) {
        self.assemblies
            .entry(assembly.into())
            .or_default()
            .extend(accessions);
    }

    /// Number of known transcripts
    pub fn len(&self) -> usize {
        self.transcripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }

    /// Known transcript accessions, sorted
    pub fn transcript_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.transcripts.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    /// Create a provider with the built-in fixtures
    ///
    /// | Transcript | Genome | Strand | Notes |
    /// |------------|--------|--------|-------|
    /// | NM_000024.5 (ADRB2) | NC_000005.9 | + | `284=1X32=1X1724=`, tx/genome differ at n.285 |
    /// | NM_002173.2 (IFNA16) | NC_000009.11 | - | `691=2X246=`, differ at n.692_693 |
    /// | NM_001637.3 | NC_000007.13 | - | three exons, Gly528 at c.1582 |
    /// | NM_000495.4 | NC_000023.10 | + | two exons, Arg373 at c.1117 |
    /// | NR_046018.2 | NC_000001.10 | + | non-coding |
    pub fn with_test_data() -> Self {
        let mut provider = Self::new();
        provider.add_adrb2();
        provider.add_ifna16();
        provider.add_nm_001637();
        provider.add_nm_000495();
        provider.add_nr_046018();
        provider.add_assembly(
            "GRCh37",
            ["NC_000001.10", "NC_000005.9", "NC_000007.13", "NC_000009.11", "NC_000023.10"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        provider
    }

    fn add_fixture(&mut self, fixture: Fixture<'_>) {
        let (win_start, win_end) = fixture.window;
        let mut genome = filler(fixture.seed ^ 0x5eed, (win_end - win_start) as usize);
        for block in &fixture.blocks {
            for t in block.tx_start..block.tx_end {
                let base = fixture
                    .mismatches
                    .iter()
                    .find(|(at, _)| *at as u64 == t)
                    .map(|(_, b)| *b)
                    .unwrap_or(fixture.tx[t as usize]);
                let i = t - block.tx_start;
                let (g, base) = match fixture.strand {
                    Strand::Plus => (block.alt_start + i, base),
                    Strand::Minus => (block.alt_end - 1 - i, complement(base)),
                };
                genome[(g - win_start) as usize] = base;
            }
        }

        let exons = fixture
            .blocks
            .iter()
            .enumerate()
            .map(|(ord, b)| ExonBlock {
                ord: ord as u32,
                tx_start: b.tx_start,
                tx_end: b.tx_end,
                alt_start: b.alt_start,
                alt_end: b.alt_end,
                cigar: Cigar(b.cigar.clone()),
            })
            .collect();
        self.add_alignment(Alignment {
            tx_ac: fixture.tx_ac.to_string(),
            alt_ac: fixture.alt_ac.to_string(),
            method: "splign".to_string(),
            strand: fixture.strand,
            exons,
        });
        self.add_transcript(TranscriptRecord {
            accession: fixture.tx_ac.to_string(),
            cds: fixture.cds,
            protein_accession: fixture.protein_ac.map(str::to_string),
        });
        self.add_sequence(fixture.tx_ac, 0, String::from_utf8_lossy(&fixture.tx));
        for (start, end) in fixture.genome_windows(win_start, win_end) {
            let text = &genome[(start - win_start) as usize..(end - win_start) as usize];
            self.add_sequence(fixture.alt_ac, start, String::from_utf8_lossy(text));
        }
    }

    fn add_adrb2(&mut self) {
        let mut tx = filler(24, 2042);
        tx[280..290].copy_from_slice(b"CAATAGAAGC");
        let mismatch_317 = if tx[317] == b'A' { b'C' } else { b'A' };
        self.add_fixture(Fixture {
            tx_ac: "NM_000024.5",
            alt_ac: "NC_000005.9",
            protein_ac: Some("NP_000015.1"),
            strand: Strand::Plus,
            cds: Some(CdsBounds { start: 240, end: 1482 }),
            blocks: vec![Block::new(
                (0, 2042),
                (148206155, 148208197),
                vec![
                    CigarOp::Match(284),
                    CigarOp::Mismatch(1),
                    CigarOp::Match(32),
                    CigarOp::Mismatch(1),
                    CigarOp::Match(1724),
                ],
            )],
            mismatches: vec![(284, b'G'), (317, mismatch_317)],
            window: (148206155, 148208197),
            sparse: false,
            tx,
            seed: 24,
        });
    }

    fn add_ifna16(&mut self) {
        let mut tx = filler(2173, 939);
        tx[685..695].copy_from_slice(b"AAATTTCAAA");
        self.add_fixture(Fixture {
            tx_ac: "NM_002173.2",
            alt_ac: "NC_000009.11",
            protein_ac: Some("NP_002164.1"),
            strand: Strand::Minus,
            cds: Some(CdsBounds { start: 7, end: 577 }),
            blocks: vec![Block::new(
                (0, 939),
                (21216371, 21217310),
                vec![
                    CigarOp::Match(691),
                    CigarOp::Mismatch(2),
                    CigarOp::Match(246),
                ],
            )],
            mismatches: vec![(691, b'T'), (692, b'C')],
            window: (21216371, 21217310),
            sparse: false,
            tx,
            seed: 2173,
        });
    }

    fn add_nm_001637(&mut self) {
        // c.1 at n.402, 576 codons
        let mut codons = coding_sequence(576);
        codons[527 * 3..528 * 3].copy_from_slice(b"GGA");
        let tx = [filler(1637, 401), codons, filler(1638, 371)].concat();
        self.add_fixture(Fixture {
            tx_ac: "NM_001637.3",
            alt_ac: "NC_000007.13",
            protein_ac: Some("NP_001628.1"),
            strand: Strand::Minus,
            cds: Some(CdsBounds { start: 402, end: 2130 }),
            blocks: vec![
                Block::matched((0, 1000), (36563144, 36564144)),
                Block::matched((1000, 2100), (36561544, 36562644)),
                Block::matched((2100, 2500), (36560344, 36560744)),
            ],
            mismatches: vec![],
            window: (36560344, 36564144),
            sparse: false,
            tx,
            seed: 1637,
        });
    }

    fn add_nm_000495(&mut self) {
        // c.1 at n.280, 1691 codons
        let mut codons = coding_sequence(1691);
        codons[372 * 3..373 * 3].copy_from_slice(b"CGA");
        let tx = [filler(495, 279), codons, filler(496, 1148)].concat();
        self.add_fixture(Fixture {
            tx_ac: "NM_000495.4",
            alt_ac: "NC_000023.10",
            protein_ac: Some("NP_000486.1"),
            strand: Strand::Plus,
            cds: Some(CdsBounds { start: 280, end: 5353 }),
            blocks: vec![
                Block::matched((0, 2000), (107828533, 107830533)),
                Block::matched((2000, 6500), (107936271, 107940771)),
            ],
            mismatches: vec![],
            window: (107828533, 107940771),
            sparse: true,
            tx,
            seed: 495,
        });
    }

    fn add_nr_046018(&mut self) {
        self.add_fixture(Fixture {
            tx_ac: "NR_046018.2",
            alt_ac: "NC_000001.10",
            protein_ac: None,
            strand: Strand::Plus,
            cds: None,
            blocks: vec![Block::matched((0, 1000), (11873, 12873))],
            mismatches: vec![],
            window: (11873, 12873),
            sparse: false,
            tx: filler(46018, 1000),
            seed: 46018,
        });
    }
}

/// One exon of a fixture alignment
struct Block {
    tx_start: u64,
    tx_end: u64,
    alt_start: u64,
    alt_end: u64,
    cigar: Vec<CigarOp>,
}

impl Block {
    fn new(tx: (u64, u64), alt: (u64, u64), cigar: Vec<CigarOp>) -> Self {
        Self {
            tx_start: tx.0,
            tx_end: tx.1,
            alt_start: alt.0,
            alt_end: alt.1,
            cigar,
        }
    }

    fn matched(tx: (u64, u64), alt: (u64, u64)) -> Self {
        Self::new(tx, alt, vec![CigarOp::Match(tx.1 - tx.0)])
    }
}

/// A transcript, its alignment and the genome around it
struct Fixture<'a> {
    tx_ac: &'a str,
    alt_ac: &'a str,
    protein_ac: Option<&'a str>,
    strand: Strand,
    cds: Option<CdsBounds>,
    blocks: Vec<Block>,
    /// Genome bases (transcript orientation) differing from the transcript
    mismatches: Vec<(usize, u8)>,
    window: (u64, u64),
    /// Store only the exon windows of the genome
    sparse: bool,
    tx: Vec<u8>,
    seed: u64,
}

impl Fixture<'_> {
    fn genome_windows(&self, win_start: u64, win_end: u64) -> Vec<(u64, u64)> {
        if self.sparse {
            self.blocks.iter().map(|b| (b.alt_start, b.alt_end)).collect()
        } else {
            vec![(win_start, win_end)]
        }
    }
}

/// Deterministic pseudo-random bases
fn filler(seed: u64, len: usize) -> Vec<u8> {
    let mut state = seed.wrapping_mul(0x9e37_79b9_7f4a_7c15).wrapping_add(1);
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            b"ACGT"[(state >> 62) as usize]
        })
        .collect()
}

/// `ATG`, then a repeating stop-free codon cycle, then `TAA`
fn coding_sequence(codons: usize) -> Vec<u8> {
    const CYCLE: [&[u8; 3]; 10] = [
        b"GCT", b"GAA", b"CTG", b"AAA", b"TCC", b"GGC", b"ACC", b"GTG", b"CAG", b"AAC",
    ];
    let mut seq = Vec::with_capacity(codons * 3);
    seq.extend_from_slice(b"ATG");
    for k in 0..codons.saturating_sub(2) {
        seq.extend_from_slice(CYCLE[k % CYCLE.len()]);
    }
    seq.extend_from_slice(b"TAA");
    seq
}

fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        other => other,
    }
}

fn fetch_error(accession: &str, start: u64, end: u64, msg: &str) -> FerroError {
    FerroError::SequenceFetch {
        accession: accession.to_string(),
        start,
        end,
        msg: msg.to_string(),
    }
}

impl AlignmentProvider for MockProvider {
    fn get_alignment(
        &self,
        tx_ac: &str,
        alt_ac: &str,
        method: &str,
    ) -> Result<Alignment, FerroError> {
        self.alignments
            .get(&(tx_ac.to_string(), alt_ac.to_string(), method.to_string()))
            .cloned()
            .ok_or_else(|| FerroError::NoAlignment {
                tx_ac: tx_ac.to_string(),
                alt_ac: alt_ac.to_string(),
                method: method.to_string(),
            })
    }
}

impl TranscriptProvider for MockProvider {
    fn get_cds_bounds(&self, tx_ac: &str) -> Result<Option<CdsBounds>, FerroError> {
        Ok(self.transcripts.get(tx_ac).and_then(|r| r.cds))
    }

    fn get_protein_accession(&self, tx_ac: &str) -> Option<String> {
        self.transcripts
            .get(tx_ac)
            .and_then(|r| r.protein_accession.clone())
    }
}

impl SequenceProvider for MockProvider {
    fn fetch_sequence(&self, accession: &str, start: u64, end: u64) -> Result<String, FerroError> {
        let windows = self
            .sequences
            .get(accession)
            .ok_or_else(|| fetch_error(accession, start, end, "unknown accession"))?;
        if start > end {
            return Err(fetch_error(accession, start, end, "inverted interval"));
        }
        windows
            .iter()
            .find(|w| w.offset <= start && end <= w.end())
            .and_then(|w| {
                w.sequence
                    .get((start - w.offset) as usize..(end - w.offset) as usize)
            })
            .map(str::to_string)
            .ok_or_else(|| fetch_error(accession, start, end, "interval out of range"))
    }

    fn sequence_len(&self, accession: &str) -> Result<u64, FerroError> {
        self.sequences
            .get(accession)
            .and_then(|windows| windows.iter().map(SequenceWindow::end).max())
            .ok_or_else(|| fetch_error(accession, 0, 0, "unknown accession"))
    }
}

impl TranscriptLookup for MockProvider {
    fn get_alt_ac_for_tx(
        &self,
        tx_ac: &str,
        assembly: &str,
        method: &str,
    ) -> Result<String, FerroError> {
        let accessions = self.assemblies.get(assembly).map(Vec::as_slice).unwrap_or(&[]);
        accessions
            .iter()
            .find(|alt_ac| {
                self.alignments.contains_key(&(
                    tx_ac.to_string(),
                    alt_ac.to_string(),
                    method.to_string(),
                ))
            })
            .cloned()
            .ok_or_else(|| FerroError::NoAlignment {
                tx_ac: tx_ac.to_string(),
                alt_ac: assembly.to_string(),
                method: method.to_string(),
            })
    }

    fn get_tx_for_region(
        &self,
        alt_ac: &str,
        method: &str,
        start: u64,
        end: u64,
    ) -> Result<Vec<String>, FerroError> {
        let mut found: Vec<String> = self
            .alignments
            .values()
            .filter(|a| a.alt_ac == alt_ac && a.method == method)
            .filter(|a| {
                let (s, e) = a.alt_span();
                s < end && start < e
            })
            .map(|a| a.tx_ac.clone())
            .collect();
        found.sort();
        found.dedup();
        Ok(found)
    }
}
