//! Coordinate conversion
//!
//! Position machinery behind the variant mapper:
//! - Genomic (g.) ↔ Transcript (n.) through an exon alignment
//! - Transcript (n.) ↔ CDS (c.) through CDS bounds
//! - CDS (c.) → Protein (p.) by translation

pub mod cds;
pub mod codon;
pub mod mapper;
pub mod projector;
pub mod protein;

pub use codon::CodonTable;
pub use mapper::CoordinateMapper;
pub use projector::{AlignmentProjector, Direction, IntronPolicy};
pub use protein::RefTranscript;
