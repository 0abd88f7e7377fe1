use super::{GatewayError, ThermoParams};
use regex::Regex;
use std::sync::LazyLock;

fn tag_pattern(tag: &str) -> Regex {
    Regex::new(&format!(r"(?s)<{tag}>\s*(.*?)\s*</{tag}>")).expect("Invalid response tag pattern")
}

static DH_TAG: LazyLock<Regex> = LazyLock::new(|| tag_pattern("dH"));
static DS_TAG: LazyLock<Regex> = LazyLock::new(|| tag_pattern("dS"));
static SALT_TAG: LazyLock<Regex> = LazyLock::new(|| tag_pattern("saltCorrection"));
static TM_TAG: LazyLock<Regex> = LazyLock::new(|| tag_pattern("tm"));
static MISMATCH_TM_TAG: LazyLock<Regex> = LazyLock::new(|| tag_pattern("mmtm"));

fn extract<'a>(pattern: &Regex, raw: &'a str) -> Option<&'a str> {
    pattern
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn required_field(
    pattern: &Regex,
    field: &'static str,
    raw: &str,
) -> Result<f64, GatewayError> {
    let text = extract(pattern, raw).ok_or(GatewayError::MissingField(field))?;
    parse_number(text).ok_or_else(|| GatewayError::NonNumericField {
        field,
        value: text.to_string(),
    })
}

/// Reads `<dH>`, `<dS>` and `<saltCorrection>` from a thermodynamics service response.
pub fn parse_thermo_params_from_response(raw: &str) -> Result<ThermoParams, GatewayError> {
    Ok(ThermoParams {
        dh: required_field(&DH_TAG, "dH", raw)?,
        ds: required_field(&DS_TAG, "dS", raw)?,
        salt_correction: required_field(&SALT_TAG, "saltCorrection", raw)?,
    })
}

/// Reads the service's own Tm: `<mmtm>` when `mismatch` is set, otherwise `<tm>`.
pub fn parse_tm_from_response(raw: &str, mismatch: bool) -> Option<f64> {
    let pattern = if mismatch { &*MISMATCH_TM_TAG } else { &*TM_TAG };
    extract(pattern, raw).and_then(parse_number)
}
