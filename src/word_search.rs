//! Word Relation Search
//!
//! Beam search for relations among arbitrary quaternions. Each generator g
//! gets a letter and an inverse letter (the primitive conjugate, which is a
//! positive multiple of g⁻¹). Words are expanded one letter at a time from
//! the identity, and their values are kept primitive with the sign intact.
//! Two things close a relation:
//!
//! ```text
//! value(w) == value(v) for an earlier word v   ⇒   w · v⁻¹ = 1
//! value(w) == -1                               ⇒   w = -1
//! ```
//!
//! Only the `beam_width` values nearest to the identity survive each depth;
//! relations outside the beam are never seen.

use std::collections::HashMap;
use std::fmt;

use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::params::WordSearchParams;
use crate::progress::{self, Progress, Stage};
use crate::quaternion::Quaternion;

/// Generator `index`, or its inverse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Letter {
    pub index: usize,
    pub inverse: bool,
}

impl Letter {
    pub fn new(index: usize) -> Self {
        Letter { index, inverse: false }
    }

    pub fn inverted(self) -> Self {
        Letter {
            index: self.index,
            inverse: !self.inverse,
        }
    }

    pub fn is_inverse_of(self, other: Letter) -> bool {
        self.index == other.index && self.inverse != other.inverse
    }
}

impl fmt::Display for Letter {
    /// `a`, `b`, … for the first 26 generators, `g26`, `g27`, … after that
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match u8::try_from(self.index) {
            Ok(i) if i < 26 => write!(f, "{}", char::from(b'a' + i))?,
            _ => write!(f, "g{}", self.index)?,
        }
        if self.inverse {
            write!(f, "^{{-1}}")?;
        }
        Ok(())
    }
}

pub type Word = Vec<Letter>;

/// Reverse the word and invert every letter
pub fn invert_word(word: &[Letter]) -> Word {
    word.iter().rev().map(|l| l.inverted()).collect()
}

/// Dot-separated letters, `1` for the empty word
pub fn format_word(word: &[Letter]) -> String {
    if word.is_empty() {
        return "1".to_string();
    }
    word.iter().map(Letter::to_string).collect::<Vec<_>>().join(".")
}

/// Whether appending `next` makes the word end in `u·v·u⁻¹·v⁻¹`
pub fn closes_commutator(word: &[Letter], next: Letter) -> bool {
    match word {
        [.., u, v, w] => u.is_inverse_of(*w) && v.is_inverse_of(next),
        _ => false,
    }
}

/// Product of the letters, each generator taken primitive
///
/// `None` if a letter has no generator.
pub fn evaluate_word(word: &[Letter], generators: &[Quaternion]) -> Option<Quaternion> {
    word.iter().try_fold(Quaternion::one(), |acc, letter| {
        let g = generators.get(letter.index)?;
        Some(acc * letter_value(g, letter.inverse))
    })
}

fn letter_value(g: &Quaternion, inverse: bool) -> Quaternion {
    if inverse {
        g.conjugate().primitive()
    } else {
        g.primitive()
    }
}

/// Scalar a relator evaluates to, up to a positive factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationValue {
    One,
    MinusOne,
}

impl fmt::Display for RelationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationValue::One => write!(f, "1"),
            RelationValue::MinusOne => write!(f, "-1"),
        }
    }
}

/// `word · matched⁻¹ = value`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordRelation {
    /// The word whose expansion closed the relation
    pub word: Word,
    /// Earlier word with the same value; empty for the identity and for -1
    pub matched: Word,
    pub value: RelationValue,
}

impl WordRelation {
    /// The full relator `word · matched⁻¹`
    pub fn relator(&self) -> Word {
        let mut relator = self.word.clone();
        relator.extend(invert_word(&self.matched));
        relator
    }

    pub fn len(&self) -> usize {
        self.word.len() + self.matched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn evaluate(&self, generators: &[Quaternion]) -> Option<Quaternion> {
        evaluate_word(&self.relator(), generators)
    }

    /// Whether the relator is a scalar of the right sign
    pub fn holds(&self, generators: &[Quaternion]) -> bool {
        let Some(q) = self.evaluate(generators) else {
            return false;
        };
        if !(q.b.is_zero() && q.c.is_zero() && q.d.is_zero()) {
            return false;
        }
        match self.value {
            RelationValue::One => q.a.is_positive(),
            RelationValue::MinusOne => q.a.is_negative(),
        }
    }
}

impl fmt::Display for WordRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", format_word(&self.relator()), self.value)
    }
}

/// Squared distance from the identity
fn distance_to_one(q: &Quaternion) -> BigInt {
    let a = &q.a - BigInt::one();
    &a * &a + &q.b * &q.b + &q.c * &q.c + &q.d * &q.d
}

/// Beam search for word relations among `generators`
pub fn search_word_relations(
    generators: &[Quaternion],
    params: &WordSearchParams,
) -> EngineResult<Vec<WordRelation>> {
    search_word_relations_with_progress(generators, params, progress::silent)
}

/// As [`search_word_relations`], reporting once per finished depth
///
/// Relations come out in discovery order. A word whose value was already
/// seen is reported and not expanded further; a word reaching -1 is
/// reported and still expanded.
pub fn search_word_relations_with_progress<F>(
    generators: &[Quaternion],
    params: &WordSearchParams,
    mut progress: F,
) -> EngineResult<Vec<WordRelation>>
where
    F: FnMut(&Progress),
{
    if generators.iter().any(Quaternion::is_zero) {
        return Err(EngineError::ZeroQuaternion);
    }

    // a, a⁻¹, b, b⁻¹, …
    let letters: Vec<(Letter, Quaternion)> = generators
        .iter()
        .enumerate()
        .flat_map(|(i, g)| {
            let letter = Letter::new(i);
            [
                (letter, letter_value(g, false)),
                (letter.inverted(), letter_value(g, true)),
            ]
        })
        .collect();

    let minus_one = -Quaternion::one();
    let mut seen: HashMap<Quaternion, Word> = HashMap::from([(Quaternion::one(), Word::new())]);
    let mut beam: Vec<(Quaternion, Word)> = vec![(Quaternion::one(), Word::new())];
    let mut relations = Vec::new();

    for depth in 1..=params.depth {
        let mut candidates: Vec<(BigInt, Quaternion, Word)> = Vec::new();

        for (current, word) in &beam {
            for (letter, value) in &letters {
                if word.last().is_some_and(|last| last.is_inverse_of(*letter)) {
                    continue;
                }
                if params.filter_commutator && closes_commutator(word, *letter) {
                    continue;
                }

                let next = (current * value).primitive();
                let mut next_word = word.clone();
                next_word.push(*letter);

                if next == minus_one {
                    relations.push(WordRelation {
                        word: next_word.clone(),
                        matched: Word::new(),
                        value: RelationValue::MinusOne,
                    });
                }
                if let Some(earlier) = seen.get(&next) {
                    relations.push(WordRelation {
                        word: next_word,
                        matched: earlier.clone(),
                        value: RelationValue::One,
                    });
                    continue;
                }

                seen.insert(next.clone(), next_word.clone());
                candidates.push((distance_to_one(&next), next, next_word));
            }
        }

        progress(&Progress {
            stage: Stage::WordSearch,
            prime: None,
            completed: depth,
            total: Some(params.depth),
        });

        if candidates.is_empty() {
            break;
        }
        // Stable: ties keep expansion order
        candidates.sort_by(|x, y| x.0.cmp(&y.0));
        candidates.truncate(params.beam_width);
        beam = candidates.into_iter().map(|(_, q, w)| (q, w)).collect();
    }

    debug!(
        generators = generators.len(),
        depth = params.depth,
        beam_width = params.beam_width,
        relations = relations.len(),
        "word search finished"
    );
    Ok(relations)
}
