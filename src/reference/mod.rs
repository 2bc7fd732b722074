//! Reference data abstraction
//!
//! Collaborator contracts for alignments, CDS bounds and sequences, an
//! in-memory provider for tests, and the reference resolver.

pub mod alignment;
pub mod mock;
pub mod provider;
pub mod resolver;

pub use alignment::{parse_cigar, Alignment, Cigar, CigarOp, ExonBlock, Strand};
pub use mock::{MockData, MockProvider, SequenceWindow, TranscriptRecord};
pub use provider::{
    AlignmentProvider, CdsBounds, DataProvider, SequenceProvider, TranscriptLookup,
    TranscriptProvider,
};
pub use resolver::ReferenceResolver;
