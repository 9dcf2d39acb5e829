//! Asset amount parsing and legacy rendering.
//!
//! Amounts reach the read layer in three encodings: the legacy
//! `"1.000 SBD"` string, the structured `{amount, precision, nai}` object and
//! the `[amount, precision, nai]` triple. Historical and live data mix all
//! three, so every encoding normalizes into one [`Amount`] immediately.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use crate::errors::CondenserError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    Sbd,
    Steem,
    Vests,
}

impl Asset {
    pub fn symbol(&self) -> &'static str {
        match self {
            Asset::Sbd => "SBD",
            Asset::Steem => "STEEM",
            Asset::Vests => "VESTS",
        }
    }

    /// Decimal places used by the legacy string form.
    pub fn precision(&self) -> u32 {
        match self {
            Asset::Sbd | Asset::Steem => 3,
            Asset::Vests => 6,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Asset {
    type Err = CondenserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SBD" => Ok(Asset::Sbd),
            "STEEM" => Ok(Asset::Steem),
            "VESTS" => Ok(Asset::Vests),
            other => Err(CondenserError::InvalidAmount(format!(
                "unknown asset symbol {other:?}"
            ))),
        }
    }
}

/// NAI code → asset. New assets are added here, not in the parser.
pub const NAI_MAP: &[(&str, Asset)] = &[
    ("@@000000013", Asset::Sbd),
    ("@@000000021", Asset::Steem),
    ("@@000000037", Asset::Vests),
];

pub fn asset_for_nai(nai: &str) -> Option<Asset> {
    NAI_MAP
        .iter()
        .find(|(code, _)| *code == nai)
        .map(|(_, asset)| *asset)
}

/// Canonical (value, unit) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amount {
    pub value: Decimal,
    pub asset: Asset,
}

impl Amount {
    pub fn new(value: Decimal, asset: Asset) -> Self {
        Self { value, asset }
    }

    pub fn sbd(value: Decimal) -> Self {
        Self::new(value, Asset::Sbd)
    }

    /// Renders `"<value> <UNIT>"` with the unit's fixed precision.
    pub fn to_legacy(&self) -> String {
        let precision = self.asset.precision();
        let mut value = self
            .value
            .round_dp_with_strategy(precision, RoundingStrategy::MidpointNearestEven);
        value.rescale(precision);
        format!("{value} {}", self.asset)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_legacy())
    }
}

/// Runtime shape of an incoming amount. The object and triple encodings
/// carry the same three fields, so they share one variant.
enum RawAmount<'a> {
    Legacy(&'a str),
    Nai {
        amount: &'a Value,
        precision: &'a Value,
        nai: &'a Value,
    },
}

impl<'a> TryFrom<&'a Value> for RawAmount<'a> {
    type Error = CondenserError;

    fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
        let unsupported = || CondenserError::UnsupportedAmount(value.to_string());
        match value {
            Value::String(s) => Ok(RawAmount::Legacy(s)),
            Value::Object(map) => Ok(RawAmount::Nai {
                amount: map.get("amount").ok_or_else(unsupported)?,
                precision: map.get("precision").ok_or_else(unsupported)?,
                nai: map.get("nai").ok_or_else(unsupported)?,
            }),
            Value::Array(items) => match items.as_slice() {
                [amount, precision, nai] => Ok(RawAmount::Nai {
                    amount,
                    precision,
                    nai,
                }),
                _ => Err(unsupported()),
            },
            _ => Err(unsupported()),
        }
    }
}

impl RawAmount<'_> {
    fn resolve(self, expected: Option<Asset>) -> Result<Amount, CondenserError> {
        match self {
            RawAmount::Legacy(s) => parse_legacy(s),
            RawAmount::Nai {
                amount,
                precision,
                nai,
            } => {
                let satoshis = integer_units(amount)?;
                let precision = precision
                    .as_u64()
                    .and_then(|p| u32::try_from(p).ok())
                    .ok_or_else(|| {
                        CondenserError::InvalidAmount(format!("bad precision {precision}"))
                    })?;
                let value = Decimal::try_from_i128_with_scale(satoshis, precision)
                    .map_err(|e| CondenserError::InvalidAmount(format!("{satoshis}: {e}")))?;

                let nai = nai.as_str().ok_or_else(|| {
                    CondenserError::InvalidAmount(format!("NAI must be a string, got {nai}"))
                })?;
                let asset = asset_for_nai(nai).ok_or_else(|| CondenserError::UnknownNai {
                    nai: nai.to_string(),
                    expected: expected
                        .map(|a| a.to_string())
                        .unwrap_or_else(|| "(any)".to_string()),
                })?;

                Ok(Amount::new(value, asset))
            }
        }
    }
}

fn parse_legacy(s: &str) -> Result<Amount, CondenserError> {
    let mut parts = s.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(number), Some(unit), None) => {
            let value = Decimal::from_str(number)
                .map_err(|e| CondenserError::InvalidAmount(format!("{s:?}: {e}")))?;
            Ok(Amount::new(value, unit.parse()?))
        }
        _ => Err(CondenserError::InvalidAmount(format!(
            "expected \"<number> <UNIT>\", got {s:?}"
        ))),
    }
}

/// Satoshi counts arrive as integer strings, occasionally as JSON integers.
fn integer_units(value: &Value) -> Result<i128, CondenserError> {
    let parsed = match value {
        Value::String(s) => s.parse::<i128>().ok(),
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from)),
        _ => None,
    };
    parsed.ok_or_else(|| CondenserError::InvalidAmount(format!("bad amount units {value}")))
}

fn parse_with(value: &Value, expected: Option<Asset>) -> Result<Amount, CondenserError> {
    RawAmount::try_from(value)?.resolve(expected)
}

/// Parses any supported encoding into its (value, unit) pair.
pub fn parse_amount(value: &Value) -> Result<Amount, CondenserError> {
    parse_with(value, None)
}

/// Parses an amount, failing unless its unit is `expected`.
pub fn parse_amount_expecting(value: &Value, expected: Asset) -> Result<Decimal, CondenserError> {
    let parsed = parse_with(value, Some(expected))?;
    if parsed.asset != expected {
        return Err(CondenserError::UnitMismatch {
            expected: expected.to_string(),
            found: parsed.asset.to_string(),
        });
    }
    Ok(parsed.value)
}

pub fn sbd_amount(value: &Value) -> Result<Decimal, CondenserError> {
    parse_amount_expecting(value, Asset::Sbd)
}

pub fn steem_amount(value: &Value) -> Result<Decimal, CondenserError> {
    parse_amount_expecting(value, Asset::Steem)
}

pub fn vests_amount(value: &Value) -> Result<Decimal, CondenserError> {
    parse_amount_expecting(value, Asset::Vests)
}

/// Parses an amount and discards its unit.
pub fn amount(value: &Value) -> Result<Decimal, CondenserError> {
    Ok(parse_amount(value)?.value)
}

/// Legacy string form of any amount. Strings are already legacy and pass
/// through untouched.
pub fn legacy_amount(value: &Value) -> Result<String, CondenserError> {
    if let Value::String(s) = value {
        return Ok(s.clone());
    }
    Ok(parse_amount(value)?.to_legacy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_all_shapes_parse_to_same_amount() {
        let expected = Amount::new(dec("1.000"), Asset::Sbd);
        let shapes = [
            json!("1.000 SBD"),
            json!({"amount": "1000", "precision": 3, "nai": "@@000000013"}),
            json!(["1000", 3, "@@000000013"]),
        ];
        for shape in &shapes {
            assert_eq!(parse_amount(shape).unwrap(), expected, "shape {shape}");
        }
    }

    #[test]
    fn test_triple_accepts_numeric_units() {
        let parsed = parse_amount(&json!([2500, 3, "@@000000021"])).unwrap();
        assert_eq!(parsed, Amount::new(dec("2.5"), Asset::Steem));
    }

    #[test]
    fn test_legacy_amount_passes_strings_through() {
        assert_eq!(legacy_amount(&json!("1.000 SBD")).unwrap(), "1.000 SBD");
        // even odd precisions stay byte-identical
        assert_eq!(legacy_amount(&json!("1.5 STEEM")).unwrap(), "1.5 STEEM");
    }

    #[test]
    fn test_legacy_amount_uses_unit_precision() {
        assert_eq!(
            legacy_amount(&json!(["1000", 3, "@@000000013"])).unwrap(),
            "1.000 SBD"
        );
        assert_eq!(
            legacy_amount(&json!({"amount": "42", "precision": 3, "nai": "@@000000021"}))
                .unwrap(),
            "0.042 STEEM"
        );
        assert_eq!(
            legacy_amount(&json!(["123456789", 6, "@@000000037"])).unwrap(),
            "123.456789 VESTS"
        );
    }

    #[test]
    fn test_legacy_round_trip_for_each_unit() {
        for s in ["12.345 SBD", "0.001 STEEM", "1024.000001 VESTS"] {
            let parsed = parse_amount(&json!(s)).unwrap();
            assert_eq!(parsed.to_legacy(), s);
        }
    }

    #[test]
    fn test_to_legacy_pads_and_rounds() {
        assert_eq!(Amount::sbd(Decimal::ZERO).to_legacy(), "0.000 SBD");
        assert_eq!(Amount::sbd(dec("7")).to_legacy(), "7.000 SBD");
        assert_eq!(Amount::sbd(dec("1.23456")).to_legacy(), "1.235 SBD");
        assert_eq!(Amount::new(dec("3.5"), Asset::Vests).to_string(), "3.500000 VESTS");
    }

    #[test]
    fn test_amount_discards_unit() {
        assert_eq!(amount(&json!("0.250 STEEM")).unwrap(), dec("0.25"));
    }

    #[test]
    fn test_unknown_nai_is_fatal() {
        let err = parse_amount(&json!(["1", 3, "@@000000099"])).unwrap_err();
        match err {
            CondenserError::UnknownNai { nai, expected } => {
                assert_eq!(nai, "@@000000099");
                assert_eq!(expected, "(any)");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_unknown_nai_names_expected_unit() {
        let err = vests_amount(&json!(["1", 6, "@@000000099"])).unwrap_err();
        assert!(err.to_string().contains("expected VESTS"), "{err}");
    }

    #[test]
    fn test_unsupported_shapes_are_fatal() {
        for value in [json!(5), json!(null), json!(true), json!(["1", 3])] {
            assert!(matches!(
                parse_amount(&value),
                Err(CondenserError::UnsupportedAmount(_))
            ));
        }
        let missing_nai = json!({"amount": "1", "precision": 3});
        assert!(matches!(
            parse_amount(&missing_nai),
            Err(CondenserError::UnsupportedAmount(_))
        ));
    }

    #[test]
    fn test_malformed_legacy_string_is_rejected() {
        assert!(parse_amount(&json!("1.000")).is_err());
        assert!(parse_amount(&json!("1.000  SBD")).is_err());
        assert!(parse_amount(&json!("abc SBD")).is_err());
        assert!(parse_amount(&json!("1.000 DOGE")).is_err());
    }

    #[test]
    fn test_expected_unit_mismatch() {
        assert_eq!(sbd_amount(&json!("3.000 SBD")).unwrap(), dec("3"));
        assert_eq!(
            steem_amount(&json!(["3000", 3, "@@000000021"])).unwrap(),
            dec("3")
        );
        let err = vests_amount(&json!("3.000 SBD")).unwrap_err();
        assert!(matches!(err, CondenserError::UnitMismatch { .. }));
    }

    #[test]
    fn test_parser_does_not_enforce_sign() {
        let parsed = parse_amount(&json!("-1.500 SBD")).unwrap();
        assert_eq!(parsed.value, dec("-1.5"));
    }

    #[test]
    fn test_nai_table_lookup() {
        assert_eq!(asset_for_nai("@@000000037"), Some(Asset::Vests));
        assert_eq!(asset_for_nai("@@000000000"), None);
    }
}
