//! Variant model: accession, coordinate system and allele tree
//!
//! An [`Allele`] is a recursive tree. Leaves are located edits (or the
//! whole-entity markers `=` and `?`); inner nodes join an ordered list of
//! children with a [`Combinator`]. Every transform in this crate is a
//! structural recursion over this tree and never reorders or flattens it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FerroError;
use crate::hgvs::edit::{NaEdit, ProteinEdit};
use crate::hgvs::interval::{CdsInterval, GenomeInterval, ProtInterval, TxInterval};
use crate::hgvs::uncertainty::Mu;

/// Identifier of a genomic, transcript or protein sequence
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Accession(String);

impl Accession {
    pub fn new(value: impl Into<String>) -> Result<Self, FerroError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(FerroError::InvalidAccession {
                msg: "accession must not be empty".to_string(),
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Accession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The coordinate system a variant is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordinateSystem {
    /// `g.`
    Genomic,
    /// `n.`
    Transcript,
    /// `c.`
    Coding,
    /// `p.`
    Protein,
}

impl CoordinateSystem {
    pub fn prefix(&self) -> char {
        match self {
            CoordinateSystem::Genomic => 'g',
            CoordinateSystem::Transcript => 'n',
            CoordinateSystem::Coding => 'c',
            CoordinateSystem::Protein => 'p',
        }
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.", self.prefix())
    }
}

/// How the members of a composite allele relate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combinator {
    /// `;` same molecule, in cis
    Compound,
    /// `/` alternative states within one cell population
    Mosaic,
    /// `//` distinct cell populations
    Chimeric,
}

impl Combinator {
    pub fn separator(&self) -> &'static str {
        match self {
            Combinator::Compound => ";",
            Combinator::Mosaic => "/",
            Combinator::Chimeric => "//",
        }
    }
}

/// A location paired with an edit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocEdit<L, E> {
    pub location: L,
    pub edit: Mu<E>,
}

impl<L, E> LocEdit<L, E> {
    pub fn new(location: L, edit: E) -> Self {
        Self {
            location,
            edit: Mu::Certain(edit),
        }
    }

    /// A predicted edit, rendered in parentheses
    pub fn new_predicted(location: L, edit: E) -> Self {
        Self {
            location,
            edit: Mu::Uncertain(edit),
        }
    }
}

impl<L: fmt::Display, E: fmt::Display> fmt::Display for LocEdit<L, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.edit {
            Mu::Certain(edit) => write!(f, "{}{}", self.location, edit),
            Mu::Uncertain(edit) => write!(f, "({}{})", self.location, edit),
            Mu::Unknown => write!(f, "{}?", self.location),
        }
    }
}

/// One allele: a located edit, a whole-entity marker, or a composite
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Allele<L, E> {
    Edit(LocEdit<L, E>),
    /// `=`: no change anywhere in the sequence
    Unchanged,
    /// `?`: effect on the sequence unknown
    Unknown,
    Composite {
        combinator: Combinator,
        members: Vec<Allele<L, E>>,
    },
}

impl<L, E> Allele<L, E> {
    pub fn single(location: L, edit: E) -> Self {
        Allele::Edit(LocEdit::new(location, edit))
    }

    pub fn compound(members: Vec<Allele<L, E>>) -> Self {
        Allele::Composite {
            combinator: Combinator::Compound,
            members,
        }
    }

    pub fn mosaic(members: Vec<Allele<L, E>>) -> Self {
        Allele::Composite {
            combinator: Combinator::Mosaic,
            members,
        }
    }

    pub fn chimeric(members: Vec<Allele<L, E>>) -> Self {
        Allele::Composite {
            combinator: Combinator::Chimeric,
            members,
        }
    }

    pub fn combinator(&self) -> Option<Combinator> {
        match self {
            Allele::Composite { combinator, .. } => Some(*combinator),
            _ => None,
        }
    }

    /// Located edits in order of appearance
    pub fn edits(&self) -> Vec<&LocEdit<L, E>> {
        let mut out = Vec::new();
        self.collect_edits(&mut out);
        out
    }

    fn collect_edits<'a>(&'a self, out: &mut Vec<&'a LocEdit<L, E>>) {
        match self {
            Allele::Edit(le) => out.push(le),
            Allele::Unchanged | Allele::Unknown => {}
            Allele::Composite { members, .. } => {
                for member in members {
                    member.collect_edits(out);
                }
            }
        }
    }

    /// Rebuild the tree, replacing every located edit with `f(edit)`
    ///
    /// Whole-entity markers and combinators are kept in place. The first
    /// error aborts the whole rebuild.
    pub fn try_map<L2, E2, F>(&self, f: &mut F) -> Result<Allele<L2, E2>, FerroError>
    where
        F: FnMut(&LocEdit<L, E>) -> Result<Allele<L2, E2>, FerroError>,
    {
        match self {
            Allele::Edit(le) => f(le),
            Allele::Unchanged => Ok(Allele::Unchanged),
            Allele::Unknown => Ok(Allele::Unknown),
            Allele::Composite {
                combinator,
                members,
            } => {
                let mut mapped = Vec::with_capacity(members.len());
                for member in members {
                    mapped.push(member.try_map(&mut *f)?);
                }
                Ok(Allele::Composite {
                    combinator: *combinator,
                    members: mapped,
                })
            }
        }
    }

    /// Like [`Allele::try_map`] for leaf-to-leaf transforms
    pub fn try_map_edits<L2, E2, F>(&self, mut f: F) -> Result<Allele<L2, E2>, FerroError>
    where
        F: FnMut(&LocEdit<L, E>) -> Result<LocEdit<L2, E2>, FerroError>,
    {
        self.try_map(&mut |le| f(le).map(Allele::Edit))
    }
}

impl<L: fmt::Display, E: fmt::Display> fmt::Display for Allele<L, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Allele::Edit(le) => write!(f, "{}", le),
            Allele::Unchanged => write!(f, "="),
            Allele::Unknown => write!(f, "?"),
            Allele::Composite {
                combinator,
                members,
            } => {
                write!(f, "[")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{}", combinator.separator())?;
                    }
                    write!(f, "{}", member)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// A variant on one accession in one coordinate system
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocatedVariant<L, E> {
    pub accession: Accession,
    pub allele: Allele<L, E>,
}

impl<L, E> LocatedVariant<L, E> {
    pub fn new(accession: impl Into<String>, allele: Allele<L, E>) -> Result<Self, FerroError> {
        Ok(Self {
            accession: Accession::new(accession)?,
            allele,
        })
    }
}

pub type GenomeVariant = LocatedVariant<GenomeInterval, NaEdit>;
pub type TxVariant = LocatedVariant<TxInterval, NaEdit>;
pub type CdsVariant = LocatedVariant<CdsInterval, NaEdit>;
pub type ProteinVariant = LocatedVariant<ProtInterval, ProteinEdit>;

/// A variant tagged with its coordinate system
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HgvsVariant {
    Genome(GenomeVariant),
    Tx(TxVariant),
    Cds(CdsVariant),
    Protein(ProteinVariant),
}

impl HgvsVariant {
    pub fn coordinate_system(&self) -> CoordinateSystem {
        match self {
            HgvsVariant::Genome(_) => CoordinateSystem::Genomic,
            HgvsVariant::Tx(_) => CoordinateSystem::Transcript,
            HgvsVariant::Cds(_) => CoordinateSystem::Coding,
            HgvsVariant::Protein(_) => CoordinateSystem::Protein,
        }
    }

    pub fn accession(&self) -> &Accession {
        match self {
            HgvsVariant::Genome(v) => &v.accession,
            HgvsVariant::Tx(v) => &v.accession,
            HgvsVariant::Cds(v) => &v.accession,
            HgvsVariant::Protein(v) => &v.accession,
        }
    }

    fn wrong_type(&self, expected: CoordinateSystem) -> FerroError {
        FerroError::InvalidVariantType {
            expected,
            actual: self.coordinate_system(),
        }
    }

    pub fn as_genome(&self) -> Result<&GenomeVariant, FerroError> {
        match self {
            HgvsVariant::Genome(v) => Ok(v),
            _ => Err(self.wrong_type(CoordinateSystem::Genomic)),
        }
    }

    pub fn as_tx(&self) -> Result<&TxVariant, FerroError> {
        match self {
            HgvsVariant::Tx(v) => Ok(v),
            _ => Err(self.wrong_type(CoordinateSystem::Transcript)),
        }
    }

    pub fn as_cds(&self) -> Result<&CdsVariant, FerroError> {
        match self {
            HgvsVariant::Cds(v) => Ok(v),
            _ => Err(self.wrong_type(CoordinateSystem::Coding)),
        }
    }

    pub fn as_protein(&self) -> Result<&ProteinVariant, FerroError> {
        match self {
            HgvsVariant::Protein(v) => Ok(v),
            _ => Err(self.wrong_type(CoordinateSystem::Protein)),
        }
    }
}

impl fmt::Display for HgvsVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let system = self.coordinate_system();
        match self {
            HgvsVariant::Genome(v) => write!(f, "{}:{}{}", v.accession, system, v.allele),
            HgvsVariant::Tx(v) => write!(f, "{}:{}{}", v.accession, system, v.allele),
            HgvsVariant::Cds(v) => write!(f, "{}:{}{}", v.accession, system, v.allele),
            HgvsVariant::Protein(v) => write!(f, "{}:{}{}", v.accession, system, v.allele),
        }
    }
}
