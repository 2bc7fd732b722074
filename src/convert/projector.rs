//! Alignment projector: genomic ↔ transcript positions
//!
//! Projection walks the CIGAR of the exon block containing a position. On
//! the minus strand a genomic interval's start becomes the transcript
//! interval's end, so endpoints are projected crosswise and the result keeps
//! `start <= end` in the target system.
//!
//! A position inside an `I` or `D` gap has no counterpart base. It is placed
//! on the flanking base that keeps the interval inside the gap's flanks
//! (starts move right, ends move left) and the result is marked uncertain.

use crate::error::FerroError;
use crate::hgvs::interval::{GenomeInterval, Interval, TxInterval};
use crate::hgvs::location::{GenomePos, TxPos};
use crate::reference::alignment::{Alignment, CigarOp, ExonBlock, Strand};

/// What to do with genomic positions that fall between exon blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntronPolicy {
    /// Fail with [`FerroError::InvalidCoordinates`]
    #[default]
    Reject,
    /// Anchor on the nearer exon boundary with a signed offset; ties go to
    /// the upstream (`+`) side
    Anchor,
}

/// Direction of a projection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    GenomicToRna,
    RnaToGenomic,
}

/// Which end of the output interval a projected endpoint becomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Start,
    End,
}

impl Side {
    /// Pick between the two bases flanking a gap
    fn pick(self, before: Option<u64>, after: Option<u64>) -> Option<u64> {
        match self {
            Side::Start => after.or(before),
            Side::End => before.or(after),
        }
    }
}

/// A projected endpoint and whether it landed on an aligned base
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placed<T> {
    pos: T,
    exact: bool,
}

/// Projects positions and intervals through one alignment
#[derive(Debug, Clone, Copy)]
pub struct AlignmentProjector<'a> {
    alignment: &'a Alignment,
    intron_policy: IntronPolicy,
}

impl<'a> AlignmentProjector<'a> {
    pub fn new(alignment: &'a Alignment) -> Self {
        Self {
            alignment,
            intron_policy: IntronPolicy::Reject,
        }
    }

    pub fn with_intron_policy(mut self, policy: IntronPolicy) -> Self {
        self.intron_policy = policy;
        self
    }

    pub fn alignment(&self) -> &'a Alignment {
        self.alignment
    }

    pub fn strand(&self) -> Strand {
        self.alignment.strand
    }

    /// Project a genomic interval onto the transcript
    pub fn g_to_n(&self, interval: &GenomeInterval) -> Result<TxInterval, FerroError> {
        let (first, second) = self.crosswise(&interval.start, &interval.end);
        let start = self.alt_to_tx(first.base, Side::Start)?;
        let end = self.alt_to_tx(second.base, Side::End)?;
        let uncertain = interval.uncertain || !start.exact || !end.exact;
        Ok(ordered_tx(start.pos, end.pos).with_uncertain(uncertain))
    }

    /// Project a transcript interval onto the genome
    pub fn n_to_g(&self, interval: &TxInterval) -> Result<GenomeInterval, FerroError> {
        let (first, second) = self.crosswise(&interval.start, &interval.end);
        let start = self.tx_to_alt(first, Side::Start)?;
        let end = self.tx_to_alt(second, Side::End)?;
        let uncertain = interval.uncertain || !start.exact || !end.exact;
        let (s, e) = if start.pos <= end.pos {
            (start.pos, end.pos)
        } else {
            (end.pos, start.pos)
        };
        Ok(Interval::new(GenomePos::new(s + 1), GenomePos::new(e + 1)).with_uncertain(uncertain))
    }

    /// Project a single genomic position onto the transcript
    pub fn genomic_to_tx(&self, pos: GenomePos) -> Result<TxPos, FerroError> {
        Ok(self.alt_to_tx(pos.base, Side::Start)?.pos)
    }

    /// Project a single transcript position onto the genome
    pub fn tx_to_genomic(&self, pos: TxPos) -> Result<GenomePos, FerroError> {
        Ok(GenomePos::new(self.tx_to_alt(&pos, Side::Start)?.pos + 1))
    }

    /// Project a 1-based exonic position in either direction
    pub fn project_point(&self, direction: Direction, base: i64) -> Result<i64, FerroError> {
        match direction {
            Direction::GenomicToRna => {
                let base = u64::try_from(base)
                    .map_err(|_| FerroError::coordinates(format!("g.{} is not a genomic position", base)))?;
                let tx = self.genomic_to_tx(GenomePos::new(base))?;
                if tx.is_intronic() {
                    return Err(FerroError::coordinates(format!("g.{} is intronic", base)));
                }
                Ok(tx.base)
            }
            Direction::RnaToGenomic => Ok(self.tx_to_genomic(TxPos::new(base))?.base as i64),
        }
    }

    /// Source endpoints in the order they become the output start and end
    fn crosswise<'p, T>(&self, start: &'p T, end: &'p T) -> (&'p T, &'p T) {
        match self.alignment.strand {
            Strand::Plus => (start, end),
            Strand::Minus => (end, start),
        }
    }

    /// 1-based genomic base to transcript position
    fn alt_to_tx(&self, base: u64, side: Side) -> Result<Placed<TxPos>, FerroError> {
        if base == 0 {
            return Err(FerroError::coordinates("g.0 is not a valid position"));
        }
        let alt = base - 1;
        let Some(block) = self.alignment.exons.iter().find(|b| b.contains_alt(alt)) else {
            return self.intronic(alt, base);
        };

        // distance from the block's 5' end, walking in transcript direction
        let g_off = match self.alignment.strand {
            Strand::Plus => alt - block.alt_start,
            Strand::Minus => block.alt_end - 1 - alt,
        };
        let placed = walk_alt(block, g_off, side)?;
        Ok(Placed {
            pos: TxPos::new((block.tx_start + placed.pos + 1) as i64),
            exact: placed.exact,
        })
    }

    fn intronic(&self, alt: u64, base: u64) -> Result<Placed<TxPos>, FerroError> {
        let aln = self.alignment;
        let outside = || {
            FerroError::coordinates(format!(
                "g.{} is outside the exons of {} on {}",
                base, aln.tx_ac, aln.alt_ac
            ))
        };

        // upstream/downstream are in transcript order
        let gap = aln.exons.windows(2).find(|pair| match aln.strand {
            Strand::Plus => pair[0].alt_end <= alt && alt < pair[1].alt_start,
            Strand::Minus => pair[1].alt_end <= alt && alt < pair[0].alt_start,
        });
        let Some([up, down]) = gap else {
            return Err(outside());
        };
        if self.intron_policy == IntronPolicy::Reject {
            return Err(FerroError::coordinates(format!(
                "g.{} is intronic in {} between exons {} and {}",
                base, aln.tx_ac, up.ord, down.ord
            )));
        }

        let (d_up, d_down) = match aln.strand {
            Strand::Plus => (alt + 1 - up.alt_end, down.alt_start - alt),
            Strand::Minus => (up.alt_start - alt, alt + 1 - down.alt_end),
        };
        let pos = if d_up <= d_down {
            TxPos::with_offset(up.tx_end as i64, d_up as i64)
        } else {
            TxPos::with_offset(down.tx_start as i64 + 1, -(d_down as i64))
        };
        Ok(Placed { pos, exact: true })
    }

    /// Transcript position (with optional intronic offset) to 0-based genomic
    fn tx_to_alt(&self, pos: &TxPos, side: Side) -> Result<Placed<u64>, FerroError> {
        let aln = self.alignment;
        if pos.base < 1 || pos.base as u64 > aln.tx_len() {
            return Err(FerroError::coordinates(format!(
                "n.{} is outside transcript {} (length {})",
                pos,
                aln.tx_ac,
                aln.tx_len()
            )));
        }
        let tx = pos.base as u64 - 1;
        let block = aln
            .exons
            .iter()
            .find(|b| b.contains_tx(tx))
            .ok_or_else(|| FerroError::coordinates(format!("n.{} is not aligned", pos)))?;
        let anchored = match pos.offset_or_zero() {
            0 => true,
            o if o > 0 => tx + 1 == block.tx_end,
            _ => tx == block.tx_start,
        };
        if !anchored {
            return Err(FerroError::coordinates(format!(
                "n.{} has an intronic offset but n.{} is not at an edge of exon {} of {}",
                pos, pos.base, block.ord, aln.tx_ac
            )));
        }

        let placed = walk_tx(block, tx - block.tx_start, aln.strand, side)?;
        let shifted = placed.pos as i64 + pos.offset_or_zero() * aln.strand.sign();
        let alt = u64::try_from(shifted).map_err(|_| {
            FerroError::coordinates(format!("n.{} projects before the start of {}", pos, aln.alt_ac))
        })?;
        Ok(Placed {
            pos: alt,
            exact: placed.exact,
        })
    }
}

fn ordered_tx(start: TxPos, end: TxPos) -> TxInterval {
    if (start.base, start.offset_or_zero()) <= (end.base, end.offset_or_zero()) {
        Interval::new(start, end)
    } else {
        Interval::new(end, start)
    }
}

/// Walk a block's CIGAR to the transcript offset matching genomic offset
/// `g_off` (both counted from the block's 5' end in transcript direction).
fn walk_alt(block: &ExonBlock, g_off: u64, side: Side) -> Result<Placed<u64>, FerroError> {
    let (mut t, mut g) = (0u64, 0u64);
    for op in block.cigar.ops() {
        match *op {
            CigarOp::Match(n) | CigarOp::Mismatch(n) => {
                if g_off < g + n {
                    return Ok(Placed {
                        pos: t + (g_off - g),
                        exact: true,
                    });
                }
                t += n;
                g += n;
            }
            CigarOp::Deletion(n) => {
                if g_off < g + n {
                    let before = t.checked_sub(1);
                    let after = (t < block.tx_len()).then_some(t);
                    let pos = side.pick(before, after).ok_or_else(|| {
                        FerroError::coordinates(format!("exon {} has no transcript bases", block.ord))
                    })?;
                    return Ok(Placed { pos, exact: false });
                }
                g += n;
            }
            CigarOp::Insertion(n) => t += n,
        }
    }
    Err(FerroError::InvalidAlignment {
        msg: format!("CIGAR of exon {} is shorter than its genomic span", block.ord),
    })
}

/// Walk a block's CIGAR to the 0-based genomic coordinate of transcript
/// offset `t_off`.
fn walk_tx(block: &ExonBlock, t_off: u64, strand: Strand, side: Side) -> Result<Placed<u64>, FerroError> {
    let to_alt = |g: u64| match strand {
        Strand::Plus => block.alt_start + g,
        Strand::Minus => block.alt_end - 1 - g,
    };
    let (mut t, mut g) = (0u64, 0u64);
    for op in block.cigar.ops() {
        match *op {
            CigarOp::Match(n) | CigarOp::Mismatch(n) => {
                if t_off < t + n {
                    return Ok(Placed {
                        pos: to_alt(g + (t_off - t)),
                        exact: true,
                    });
                }
                t += n;
                g += n;
            }
            CigarOp::Insertion(n) => {
                if t_off < t + n {
                    // flanking genomic bases, in genomic order
                    let mut flanks: Vec<u64> = [g.checked_sub(1), (g < block.alt_len()).then_some(g)]
                        .into_iter()
                        .flatten()
                        .map(to_alt)
                        .collect();
                    flanks.sort_unstable();
                    let (before, after) = match flanks.as_slice() {
                        [only] => (Some(*only), Some(*only)),
                        [lo, hi] => (Some(*lo), Some(*hi)),
                        _ => (None, None),
                    };
                    let pos = side.pick(before, after).ok_or_else(|| {
                        FerroError::coordinates(format!("exon {} has no genomic bases", block.ord))
                    })?;
                    return Ok(Placed { pos, exact: false });
                }
                t += n;
            }
            CigarOp::Deletion(n) => g += n,
        }
    }
    Err(FerroError::InvalidAlignment {
        msg: format!("CIGAR of exon {} is shorter than its transcript span", block.ord),
    })
}
