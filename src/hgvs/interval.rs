//! Closed intervals over positions

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::hgvs::location::{CdsPos, GenomePos, ProtPos, TxPos};

/// A closed interval `start..=end` in a single coordinate system
///
/// A single position is an interval with `start == end`. The `uncertain`
/// flag is set when an endpoint had to be placed on a flanking base because
/// it fell inside an alignment gap; such intervals render in parentheses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval<T> {
    pub start: T,
    pub end: T,
    #[serde(default)]
    pub uncertain: bool,
}

impl<T: Clone> Interval<T> {
    pub fn new(start: T, end: T) -> Self {
        Self {
            start,
            end,
            uncertain: false,
        }
    }

    pub fn point(pos: T) -> Self {
        Self::new(pos.clone(), pos)
    }

    pub fn with_uncertain(mut self, uncertain: bool) -> Self {
        self.uncertain = uncertain;
        self
    }
}

impl<T: PartialEq> Interval<T> {
    pub fn is_point(&self) -> bool {
        self.start == self.end
    }
}

impl<T: fmt::Display + PartialEq> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.uncertain {
            write!(f, "(")?;
        }
        if self.is_point() {
            write!(f, "{}", self.start)?;
        } else {
            write!(f, "{}_{}", self.start, self.end)?;
        }
        if self.uncertain {
            write!(f, ")")?;
        }
        Ok(())
    }
}

pub type GenomeInterval = Interval<GenomePos>;
pub type TxInterval = Interval<TxPos>;
pub type CdsInterval = Interval<CdsPos>;
pub type ProtInterval = Interval<ProtPos>;

impl GenomeInterval {
    /// Number of bases covered
    pub fn len(&self) -> u64 {
        self.end.base.saturating_sub(self.start.base) + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end.base < self.start.base
    }
}
