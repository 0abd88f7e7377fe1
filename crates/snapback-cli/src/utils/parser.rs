use snapback::core::sequence::Nucleotide;
use snapback::core::variant::{Mismatch, SnvSite};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid {kind} '{input}'. Expected '{expected}' (e.g., '{example}').")]
    InvalidFormat {
        kind: &'static str,
        input: String,
        expected: &'static str,
        example: &'static str,
    },

    #[error("Invalid position '{0}'. Expected a non-negative integer.")]
    InvalidPosition(String),

    #[error("Invalid base '{0}'. Expected one of A, C, G, T.")]
    InvalidBase(String),
}

fn split_position_base(
    input: &str,
    kind: &'static str,
    expected: &'static str,
    example: &'static str,
) -> Result<(usize, Nucleotide), ParseError> {
    let (position, base) = input
        .trim()
        .split_once(':')
        .ok_or_else(|| ParseError::InvalidFormat {
            kind,
            input: input.to_string(),
            expected,
            example,
        })?;
    let position = position
        .trim()
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidPosition(position.trim().to_string()))?;

    let base = base.trim();
    let mut chars = base.chars();
    let nucleotide = match (chars.next(), chars.next()) {
        (Some(c), None) => Nucleotide::try_from(c).ok(),
        _ => None,
    }
    .ok_or_else(|| ParseError::InvalidBase(base.to_string()))?;

    Ok((position, nucleotide))
}

/// Parses `INDEX:BASE`, e.g. `100:T`.
pub fn parse_snv(input: &str) -> Result<SnvSite, ParseError> {
    let (index, base) = split_position_base(input, "SNV", "INDEX:BASE", "100:T")?;
    Ok(SnvSite::new(index, base))
}

/// Parses `POS:BASE`, e.g. `4:G`.
pub fn parse_mismatch(input: &str) -> Result<Mismatch, ParseError> {
    let (position, base) = split_position_base(input, "mismatch", "POS:BASE", "4:G")?;
    Ok(Mismatch::new(position, base))
}
