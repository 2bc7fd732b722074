// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-varmap: variant coordinate mapper
//!
//! Part of the ferro bioinformatics toolkit.
//!
//! Maps structured variants between genomic (`g.`), transcript (`n.`),
//! coding (`c.`) and protein (`p.`) coordinates through exon alignments,
//! CDS bounds and reference sequences supplied by a data provider.
//!
//! # Example
//!
//! ```
//! use ferro_varmap::hgvs::{Allele, Base, CdsPos, HgvsVariant, Interval, LocatedVariant, NaEdit};
//! use ferro_varmap::{MockProvider, VariantMapper};
//!
//! let provider = MockProvider::with_test_data();
//! let mapper = VariantMapper::new(provider);
//!
//! let var_c = HgvsVariant::Cds(
//!     LocatedVariant::new(
//!         "NM_001637.3",
//!         Allele::single(
//!             Interval::point(CdsPos::new(1582)),
//!             NaEdit::substitution(Base::G, Base::A),
//!         ),
//!     )
//!     .unwrap(),
//! );
//!
//! let var_g = mapper.c_to_g(&var_c, "NC_000007.13", "splign").unwrap();
//! println!("Mapped: {}", var_g);
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod hgvs;
pub mod mapper;
pub mod reference;

// Re-export commonly used types
pub use config::{MapperConfig, ReferenceMode};
pub use convert::{AlignmentProjector, CoordinateMapper, IntronPolicy, RefTranscript};
pub use error::{ErrorCode, FerroError};
pub use hgvs::variant::{Allele, Combinator, CoordinateSystem, HgvsVariant};
pub use mapper::{AssemblyMapper, VariantMapper};
pub use reference::{
    Alignment, CdsBounds, DataProvider, MockProvider, ReferenceResolver, Strand,
    TranscriptLookup,
};

/// Result type alias for ferro-varmap operations
pub type Result<T> = std::result::Result<T, FerroError>;
