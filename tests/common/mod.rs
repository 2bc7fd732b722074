//! Shared helpers for integration tests
//!
//! `variant` reads the small subset of HGVS text used by the tests into the
//! structured model, so expectations can be written as plain strings.

#![allow(dead_code)]

use ferro_varmap::hgvs::{
    Allele, Base, CdsPos, GenomePos, HgvsVariant, Interval, LocEdit, LocatedVariant, NaEdit,
    Sequence, TxPos,
};

/// Read `ACC:g.…`, `ACC:n.…` or `ACC:c.…` text
pub fn variant(text: &str) -> HgvsVariant {
    let (acc, rest) = text.split_once(':').expect("missing ':'");
    let (kind, body) = rest.split_once('.').expect("missing coordinate prefix");
    match kind {
        "g" => HgvsVariant::Genome(LocatedVariant::new(acc, allele(body, &genome_pos)).unwrap()),
        "n" => HgvsVariant::Tx(LocatedVariant::new(acc, allele(body, &tx_pos)).unwrap()),
        "c" => HgvsVariant::Cds(LocatedVariant::new(acc, allele(body, &cds_pos)).unwrap()),
        other => panic!("unsupported coordinate system '{}'", other),
    }
}

/// Replace every stated reference with `N`s of length `n`
pub fn with_junk_reference(var: &HgvsVariant, n: usize) -> HgvsVariant {
    let junk: Sequence = "N".repeat(n).parse().unwrap();
    match var {
        HgvsVariant::Genome(v) => HgvsVariant::Genome(LocatedVariant {
            accession: v.accession.clone(),
            allele: v.allele.try_map_edits(|le| Ok(stamp(le, &junk))).unwrap(),
        }),
        HgvsVariant::Tx(v) => HgvsVariant::Tx(LocatedVariant {
            accession: v.accession.clone(),
            allele: v.allele.try_map_edits(|le| Ok(stamp(le, &junk))).unwrap(),
        }),
        HgvsVariant::Cds(v) => HgvsVariant::Cds(LocatedVariant {
            accession: v.accession.clone(),
            allele: v.allele.try_map_edits(|le| Ok(stamp(le, &junk))).unwrap(),
        }),
        HgvsVariant::Protein(_) => var.clone(),
    }
}

fn stamp<L: Clone>(le: &LocEdit<L, NaEdit>, junk: &Sequence) -> LocEdit<L, NaEdit> {
    let mut le = le.clone();
    le.edit = le.edit.map(|e| match e {
        NaEdit::Substitution { alternative, .. } => NaEdit::Substitution {
            reference: Base::N,
            alternative,
        },
        other if other.reference().is_some() => other.with_reference(junk.clone()).unwrap(),
        other => other,
    });
    le
}

fn allele<T: Clone>(body: &str, pos: &dyn Fn(&str) -> T) -> Allele<Interval<T>, NaEdit> {
    if let Some(inner) = body.strip_prefix('[').and_then(|b| b.strip_suffix(']')) {
        type Build<T> = fn(Vec<Allele<Interval<T>, NaEdit>>) -> Allele<Interval<T>, NaEdit>;
        let (members, build): (Vec<&str>, Build<T>) = if inner.contains("//") {
            (inner.split("//").collect(), Allele::chimeric)
        } else if inner.contains('/') {
            (inner.split('/').collect(), Allele::mosaic)
        } else {
            (inner.split(';').collect(), Allele::compound)
        };
        return build(members.into_iter().map(|m| leaf(m, pos)).collect());
    }
    leaf(body, pos)
}

fn leaf<T: Clone>(text: &str, pos: &dyn Fn(&str) -> T) -> Allele<Interval<T>, NaEdit> {
    match text {
        "=" => return Allele::Unchanged,
        "?" => return Allele::Unknown,
        _ => {}
    }
    let split = text
        .find(|c: char| !(c.is_ascii_digit() || "-+*_".contains(c)))
        .expect("missing edit");
    let (loc, edit) = text.split_at(split);
    let interval = match loc.split_once('_') {
        Some((s, e)) => Interval::new(pos(s), pos(e)),
        None => Interval::point(pos(loc)),
    };
    Allele::single(interval, na_edit(edit))
}

fn seq(text: &str) -> Option<Sequence> {
    (!text.is_empty()).then(|| text.parse().unwrap())
}

fn na_edit(text: &str) -> NaEdit {
    if text == "=" {
        return NaEdit::Identity;
    }
    if text == "?" {
        return NaEdit::Unknown;
    }
    if let Some((r, a)) = text.split_once('>') {
        let base = |s: &str| Base::from_char(s.chars().next().unwrap()).unwrap();
        return NaEdit::substitution(base(r), base(a));
    }
    if let Some(alt) = text.strip_prefix("delins") {
        return NaEdit::Delins {
            reference: None,
            alternative: alt.parse().unwrap(),
        };
    }
    if let Some(rest) = text.strip_prefix("del") {
        return match rest.split_once("ins") {
            Some((r, a)) => NaEdit::Delins {
                reference: seq(r),
                alternative: a.parse().unwrap(),
            },
            None => NaEdit::Deletion { reference: seq(rest) },
        };
    }
    if let Some(s) = text.strip_prefix("ins") {
        return NaEdit::Insertion {
            sequence: s.parse().unwrap(),
        };
    }
    if let Some(r) = text.strip_prefix("dup") {
        return NaEdit::Duplication { reference: seq(r) };
    }
    panic!("unsupported edit '{}'", text)
}

/// Split `100+5` / `-12-3` into base and intronic offset
fn base_and_offset(text: &str) -> (i64, i64) {
    match text[1..].find(['+', '-']).map(|i| i + 1) {
        Some(i) => (text[..i].parse().unwrap(), text[i..].parse().unwrap()),
        None => (text.parse().unwrap(), 0),
    }
}

fn genome_pos(text: &str) -> GenomePos {
    GenomePos::new(text.parse().unwrap())
}

fn tx_pos(text: &str) -> TxPos {
    let (base, offset) = base_and_offset(text);
    TxPos::with_offset(base, offset)
}

fn cds_pos(text: &str) -> CdsPos {
    match text.strip_prefix('*') {
        Some(rest) => {
            let (base, offset) = base_and_offset(rest);
            CdsPos::utr3(base).with_offset(offset)
        }
        None => {
            let (base, offset) = base_and_offset(text);
            CdsPos::new(base).with_offset(offset)
        }
    }
}
