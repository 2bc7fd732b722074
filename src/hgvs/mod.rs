//! Variant model
//!
//! Structured, immutable values for variants in the genomic (`g.`),
//! transcript (`n.`), coding (`c.`) and protein (`p.`) coordinate systems.
//! Text parsing is handled outside this crate; `Display` renders HGVS text.

pub mod edit;
pub mod interval;
pub mod location;
pub mod uncertainty;
pub mod variant;

// Re-export commonly used types
pub use edit::{Base, NaEdit, ProteinEdit, Sequence};
pub use interval::{CdsInterval, GenomeInterval, Interval, ProtInterval, TxInterval};
pub use location::{AminoAcid, CdsPos, CdsRegion, GenomePos, ProtPos, TxPos};
pub use uncertainty::Mu;
pub use variant::{
    Accession, Allele, CdsVariant, Combinator, CoordinateSystem, GenomeVariant, HgvsVariant,
    LocEdit, LocatedVariant, ProteinVariant, TxVariant,
};
