use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Invalid DNA sequence '{0}': expected one or more uppercase A/C/G/T characters")]
    InvalidDna(String),
    #[error("Invalid nucleotide '{0}': expected one of A, C, G, T")]
    InvalidNucleotide(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub enum Nucleotide {
    A,
    C,
    G,
    T,
}

impl Nucleotide {
    pub const ALL: [Nucleotide; 4] = [Nucleotide::A, Nucleotide::C, Nucleotide::G, Nucleotide::T];

    pub fn complement(self) -> Self {
        match self {
            Nucleotide::A => Nucleotide::T,
            Nucleotide::C => Nucleotide::G,
            Nucleotide::G => Nucleotide::C,
            Nucleotide::T => Nucleotide::A,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Nucleotide::A => 'A',
            Nucleotide::C => 'C',
            Nucleotide::G => 'G',
            Nucleotide::T => 'T',
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'A' => Some(Nucleotide::A),
            b'C' => Some(Nucleotide::C),
            b'G' => Some(Nucleotide::G),
            b'T' => Some(Nucleotide::T),
            _ => None,
        }
    }
}

impl TryFrom<char> for Nucleotide {
    type Error = SequenceError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        if !c.is_ascii() {
            return Err(SequenceError::InvalidNucleotide(c));
        }
        Self::from_byte(c as u8).ok_or(SequenceError::InvalidNucleotide(c))
    }
}

impl From<Nucleotide> for char {
    fn from(n: Nucleotide) -> Self {
        n.to_char()
    }
}

impl fmt::Display for Nucleotide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Returns `true` iff `seq` is non-empty and made only of uppercase `A`, `C`, `G`, `T`.
///
/// The check is case-sensitive; lowercase bases, whitespace, IUPAC ambiguity codes and
/// any other character are rejected.
pub fn is_valid_dna_sequence(seq: &str) -> bool {
    !seq.is_empty() && seq.bytes().all(|b| Nucleotide::from_byte(b).is_some())
}

fn ensure_valid(seq: &str) -> Result<(), SequenceError> {
    if is_valid_dna_sequence(seq) {
        Ok(())
    } else {
        Err(SequenceError::InvalidDna(seq.to_string()))
    }
}

/// Parses a validated sequence into nucleotides.
pub fn to_nucleotides(seq: &str) -> Result<Vec<Nucleotide>, SequenceError> {
    ensure_valid(seq)?;
    Ok(seq
        .bytes()
        .filter_map(Nucleotide::from_byte)
        .collect())
}

/// Base-wise complement, keeping the 5′→3′ reading order of the input.
pub fn complement_sequence(seq: &str) -> Result<String, SequenceError> {
    Ok(to_nucleotides(seq)?
        .into_iter()
        .map(|n| n.complement().to_char())
        .collect())
}

pub fn reverse_sequence(seq: &str) -> Result<String, SequenceError> {
    ensure_valid(seq)?;
    Ok(seq.chars().rev().collect())
}

pub fn reverse_complement(seq: &str) -> Result<String, SequenceError> {
    Ok(to_nucleotides(seq)?
        .into_iter()
        .rev()
        .map(|n| n.complement().to_char())
        .collect())
}

/// A sequence is self-complementary when it reads identically on both strands.
/// Odd-length sequences can never be, since the middle base would have to pair with itself.
pub fn is_self_complementary(seq: &str) -> Result<bool, SequenceError> {
    let rc = reverse_complement(seq)?;
    Ok(seq.len() % 2 == 0 && rc == seq)
}

/// Replaces the base at `index`, returning a new sequence.
pub(crate) fn with_base_at(
    seq: &str,
    index: usize,
    base: Nucleotide,
) -> Result<String, SequenceError> {
    let mut nts = to_nucleotides(seq)?;
    match nts.get_mut(index) {
        Some(slot) => *slot = base,
        None => return Err(SequenceError::InvalidDna(seq.to_string())),
    }
    Ok(nts.into_iter().map(Nucleotide::to_char).collect())
}

pub(crate) fn base_at(seq: &str, index: usize) -> Option<Nucleotide> {
    seq.as_bytes().get(index).copied().and_then(Nucleotide::from_byte)
}
