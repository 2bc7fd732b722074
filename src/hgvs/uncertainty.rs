//! Certainty marker for edits and derived values
//!
//! Mapped nucleotide edits keep the certainty of their source. Protein
//! consequences are always predictions and are wrapped as [`Mu::Uncertain`],
//! which renders in parentheses (`p.(Gly528Arg)`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value that is stated, predicted, or unknown
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mu<T> {
    /// Stated value, rendered bare
    Certain(T),
    /// Predicted value, rendered in parentheses
    Uncertain(T),
    /// Unknown value, rendered as `?`
    Unknown,
}

impl<T> Mu<T> {
    /// Get the inner value if present (None for Unknown)
    pub fn inner(&self) -> Option<&T> {
        match self {
            Mu::Certain(v) | Mu::Uncertain(v) => Some(v),
            Mu::Unknown => None,
        }
    }

    pub fn into_inner(self) -> Option<T> {
        match self {
            Mu::Certain(v) | Mu::Uncertain(v) => Some(v),
            Mu::Unknown => None,
        }
    }

    pub fn is_certain(&self) -> bool {
        matches!(self, Mu::Certain(_))
    }

    pub fn is_uncertain(&self) -> bool {
        matches!(self, Mu::Uncertain(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Mu::Unknown)
    }

    /// Map the inner value, keeping the certainty marker
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Mu<U> {
        match self {
            Mu::Certain(v) => Mu::Certain(f(v)),
            Mu::Uncertain(v) => Mu::Uncertain(f(v)),
            Mu::Unknown => Mu::Unknown,
        }
    }

    /// Fallible map over a borrowed value, keeping the certainty marker
    pub fn try_map_ref<U, E, F>(&self, f: F) -> Result<Mu<U>, E>
    where
        F: FnOnce(&T) -> Result<U, E>,
    {
        Ok(match self {
            Mu::Certain(v) => Mu::Certain(f(v)?),
            Mu::Uncertain(v) => Mu::Uncertain(f(v)?),
            Mu::Unknown => Mu::Unknown,
        })
    }

    /// Demote a certain value to a prediction
    pub fn into_predicted(self) -> Self {
        match self {
            Mu::Certain(v) => Mu::Uncertain(v),
            other => other,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Mu<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mu::Certain(v) => write!(f, "{}", v),
            Mu::Uncertain(v) => write!(f, "({})", v),
            Mu::Unknown => write!(f, "?"),
        }
    }
}
