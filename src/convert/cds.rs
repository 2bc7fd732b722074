//! CDS offset mapper: transcript (`n.`) ↔ coding (`c.`) positions
//!
//! With `cds.start` the `n.` position of `c.1` and `cds.end` the `n.`
//! position one past the last coding base:
//!
//! | `n.` position | `c.` position |
//! |---------------|---------------|
//! | `n < start` | `c.(n - start)` (5'UTR, negative) |
//! | `start <= n < end` | `c.(n - start + 1)` |
//! | `n >= end` | `c.*(n - end + 1)` (3'UTR) |
//!
//! Intronic offsets are carried through unchanged.

use crate::error::FerroError;
use crate::hgvs::interval::{CdsInterval, Interval, TxInterval};
use crate::hgvs::location::{CdsPos, CdsRegion, TxPos};
use crate::reference::provider::CdsBounds;

/// Convert a transcript position to a CDS position
pub fn rna_to_cds(pos: TxPos, cds: &CdsBounds) -> Result<CdsPos, FerroError> {
    if pos.base < 1 {
        return Err(FerroError::coordinates(format!(
            "n.{} is not a transcript position",
            pos
        )));
    }
    let (start, end) = (cds.start as i64, cds.end as i64);
    let cds_pos = if pos.base < start {
        CdsPos::new(pos.base - start)
    } else if pos.base < end {
        CdsPos::new(pos.base - start + 1)
    } else {
        CdsPos::utr3(pos.base - end + 1)
    };
    Ok(cds_pos.with_offset(pos.offset_or_zero()))
}

/// Convert a CDS position to a transcript position
pub fn cds_to_rna(pos: CdsPos, cds: &CdsBounds) -> Result<TxPos, FerroError> {
    let (start, end) = (cds.start as i64, cds.end as i64);
    let base = match pos.region() {
        CdsRegion::FivePrimeUtr => pos.base + start,
        CdsRegion::Coding => {
            if pos.base == 0 {
                return Err(FerroError::coordinates("c.0 is not a valid position"));
            }
            if pos.base > end - start {
                return Err(FerroError::coordinates(format!(
                    "c.{} is past the end of the CDS (length {})",
                    pos,
                    end - start
                )));
            }
            pos.base + start - 1
        }
        CdsRegion::ThreePrimeUtr => {
            if pos.base < 1 {
                return Err(FerroError::coordinates(format!("c.{} is not a valid position", pos)));
            }
            pos.base + end - 1
        }
    };
    if base < 1 {
        return Err(FerroError::coordinates(format!(
            "c.{} is upstream of the transcript start",
            pos
        )));
    }
    Ok(TxPos::with_offset(base, pos.offset_or_zero()))
}

/// Convert a transcript interval to a CDS interval
pub fn n_to_c(interval: &TxInterval, cds: &CdsBounds) -> Result<CdsInterval, FerroError> {
    Ok(Interval::new(rna_to_cds(interval.start, cds)?, rna_to_cds(interval.end, cds)?)
        .with_uncertain(interval.uncertain))
}

/// Convert a CDS interval to a transcript interval
pub fn c_to_n(interval: &CdsInterval, cds: &CdsBounds) -> Result<TxInterval, FerroError> {
    Ok(Interval::new(cds_to_rna(interval.start, cds)?, cds_to_rna(interval.end, cds)?)
        .with_uncertain(interval.uncertain))
}
