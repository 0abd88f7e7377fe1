use super::sequence::Nucleotide;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VariantError {
    #[error("Invalid {kind} object: {reason}")]
    InvalidShape { kind: &'static str, reason: String },
    #[error("Index {index} is out of bounds for a sequence of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// A single-nucleotide variant: the position on the target strand and the alternate base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct SnvSite {
    pub index: usize,
    pub variant_base: Nucleotide,
}

/// A single-base substitution used when computing duplex thermodynamics.
///
/// The partner strand is read as the complement of the sequence with `base` placed at
/// `position`; the duplex therefore carries a mismatch wherever the sequence itself
/// holds a different base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Mismatch {
    pub position: usize,
    #[serde(rename = "type")]
    pub base: Nucleotide,
}

impl SnvSite {
    pub fn new(index: usize, variant_base: Nucleotide) -> Self {
        Self {
            index,
            variant_base,
        }
    }

    pub fn from_value(value: &Value) -> Result<Self, VariantError> {
        check_shape(value, "SNV", "index", "variantBase")?;
        serde_json::from_value(value.clone()).map_err(|e| VariantError::InvalidShape {
            kind: "SNV",
            reason: e.to_string(),
        })
    }
}

impl Mismatch {
    pub fn new(position: usize, base: Nucleotide) -> Self {
        Self { position, base }
    }

    pub fn from_value(value: &Value) -> Result<Self, VariantError> {
        check_shape(value, "mismatch", "position", "type")?;
        serde_json::from_value(value.clone()).map_err(|e| VariantError::InvalidShape {
            kind: "mismatch",
            reason: e.to_string(),
        })
    }
}

fn check_shape(
    value: &Value,
    kind: &'static str,
    index_key: &str,
    base_key: &str,
) -> Result<(), VariantError> {
    let invalid = |reason: String| VariantError::InvalidShape { kind, reason };

    let obj = value
        .as_object()
        .ok_or_else(|| invalid("expected a JSON object".to_string()))?;
    if obj.len() != 2 || !obj.contains_key(index_key) || !obj.contains_key(base_key) {
        return Err(invalid(format!(
            "expected exactly the keys '{}' and '{}'",
            index_key, base_key
        )));
    }
    if obj[index_key].as_u64().is_none() {
        return Err(invalid(format!(
            "'{}' must be a non-negative integer",
            index_key
        )));
    }
    let base_ok = obj[base_key]
        .as_str()
        .is_some_and(|s| s.len() == 1 && s.bytes().all(|b| Nucleotide::from_byte(b).is_some()));
    if !base_ok {
        return Err(invalid(format!(
            "'{}' must be a single uppercase A/C/G/T character",
            base_key
        )));
    }
    Ok(())
}

/// Strict shape check for an SNV object: `{index: u64, variantBase: "A"|"C"|"G"|"T"}`.
pub fn is_valid_snv_value(value: &Value) -> bool {
    check_shape(value, "SNV", "index", "variantBase").is_ok()
}

/// Strict shape check for a mismatch object: `{position: u64, type: "A"|"C"|"G"|"T"}`.
pub fn is_valid_mismatch_value(value: &Value) -> bool {
    check_shape(value, "mismatch", "position", "type").is_ok()
}

/// Maps an SNV onto the reverse-complement strand of a sequence of length `seq_len`.
pub fn rev_comp_snv(snv: &SnvSite, seq_len: usize) -> Result<SnvSite, VariantError> {
    if snv.index >= seq_len {
        return Err(VariantError::IndexOutOfBounds {
            index: snv.index,
            len: seq_len,
        });
    }
    Ok(SnvSite {
        index: seq_len - 1 - snv.index,
        variant_base: snv.variant_base.complement(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn is_valid_snv_value_accepts_exact_shape() {
        assert!(is_valid_snv_value(&json!({"index": 0, "variantBase": "T"})));
        assert!(is_valid_snv_value(&json!({"index": 150, "variantBase": "G"})));
    }

    #[test]
    fn is_valid_snv_value_rejects_malformed_objects() {
        let bad = [
            json!(null),
            json!([100, "T"]),
            json!("100:T"),
            json!({"index": 100}),
            json!({"index": 100, "variantBase": "T", "extra": 1}),
            json!({"index": -1, "variantBase": "T"}),
            json!({"index": 1.5, "variantBase": "T"}),
            json!({"index": "100", "variantBase": "T"}),
            json!({"index": 100, "variantBase": "t"}),
            json!({"index": 100, "variantBase": "TT"}),
            json!({"index": 100, "variantBase": "N"}),
            json!({"index": 100, "base": "T"}),
        ];
        for value in bad {
            assert!(!is_valid_snv_value(&value), "accepted {value}");
        }
    }

    #[test]
    fn is_valid_mismatch_value_uses_position_and_type_keys() {
        assert!(is_valid_mismatch_value(&json!({"position": 3, "type": "A"})));
        assert!(!is_valid_mismatch_value(&json!({"index": 3, "variantBase": "A"})));
        assert!(!is_valid_mismatch_value(&json!({"position": 3, "type": "a"})));
    }

    #[test]
    fn from_value_parses_typed_descriptors() {
        let snv = SnvSite::from_value(&json!({"index": 100, "variantBase": "T"})).unwrap();
        assert_eq!(snv, SnvSite::new(100, Nucleotide::T));

        let mm = Mismatch::from_value(&json!({"position": 5, "type": "G"})).unwrap();
        assert_eq!(mm, Mismatch::new(5, Nucleotide::G));

        assert!(matches!(
            SnvSite::from_value(&json!({"index": 100})),
            Err(VariantError::InvalidShape { kind: "SNV", .. })
        ));
    }

    #[test]
    fn rev_comp_snv_mirrors_index_and_complements_base() {
        let snv = SnvSite::new(2, Nucleotide::A);
        assert_eq!(
            rev_comp_snv(&snv, 10).unwrap(),
            SnvSite::new(7, Nucleotide::T)
        );
        let back = rev_comp_snv(&rev_comp_snv(&snv, 10).unwrap(), 10).unwrap();
        assert_eq!(back, snv);
    }

    #[test]
    fn rev_comp_snv_rejects_out_of_bounds_index() {
        let snv = SnvSite::new(10, Nucleotide::C);
        assert_eq!(
            rev_comp_snv(&snv, 10),
            Err(VariantError::IndexOutOfBounds { index: 10, len: 10 })
        );
    }
}
