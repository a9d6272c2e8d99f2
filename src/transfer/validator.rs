// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request validation. Pure, no I/O.

use serde_json::Value;

use super::error::{TransferError, ValidationErrors};
use super::request::{Amount, SecretKey, TransferRequest};
use crate::models::TransferPayload;

/// Check every field of a transfer payload and collect all failures.
pub fn validate_transfer(payload: &TransferPayload) -> Result<TransferRequest, TransferError> {
    let mut errors = ValidationErrors::new();

    let private_key = required_string(&payload.private_key, "privateKey", &mut errors);
    let receiver = required_string(&payload.receiver, "receiver", &mut errors);
    let network = required_string(&payload.network, "network", &mut errors);
    let amount = required_amount(&payload.amount, &mut errors);

    match (private_key, receiver, network, amount) {
        (Some(private_key), Some(receiver), Some(network), Some(amount)) if errors.is_empty() => {
            Ok(TransferRequest {
                private_key: SecretKey::new(private_key),
                receiver,
                amount,
                network,
            })
        }
        _ => Err(TransferError::Validation(errors)),
    }
}

fn required_string(
    value: &Option<Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match value {
        None | Some(Value::Null) => {
            errors.add(field, format!("The {field} field is required."));
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.add(field, format!("The {field} field is required."));
            None
        }
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(_) => {
            errors.add(field, format!("The {field} must be a string."));
            None
        }
    }
}

fn required_amount(value: &Option<Value>, errors: &mut ValidationErrors) -> Option<Amount> {
    let raw = match value {
        None | Some(Value::Null) => {
            errors.add("amount", "The amount field is required.");
            return None;
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.add("amount", "The amount field is required.");
            return None;
        }
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match plain_decimal(&n.to_string()) {
            Some(raw) => raw,
            None => {
                errors.add("amount", "The amount must be a decimal number.");
                return None;
            }
        },
        Some(_) => {
            errors.add("amount", "The amount must be a decimal number.");
            return None;
        }
    };

    Amount::parse(&raw)
        .map_err(|message| errors.add("amount", message))
        .ok()
}

/// Largest exponent magnitude expanded from a JSON number.
const MAX_AMOUNT_EXPONENT: u64 = 96;

/// Rewrite a JSON number such as `1e-7` or `1.5E+3` as a plain decimal.
///
/// serde_json prints very small and very large floats in exponent form, so
/// `0.0000001` in a request body arrives here as `1e-7`.
fn plain_decimal(number: &str) -> Option<String> {
    let Some((mantissa, exponent)) = number.split_once(['e', 'E']) else {
        return Some(number.to_string());
    };
    let exponent: i64 = exponent.parse().ok()?;
    if exponent.unsigned_abs() > MAX_AMOUNT_EXPONENT {
        return None;
    }

    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = format!("{whole}{fraction}");
    let point = whole.len() as i64 + exponent;

    let plain = if point <= 0 {
        format!("0.{}{digits}", "0".repeat(point.unsigned_abs() as usize))
    } else if point as usize >= digits.len() {
        format!("{digits}{}", "0".repeat(point as usize - digits.len()))
    } else {
        let (int, frac) = digits.split_at(point as usize);
        format!("{int}.{frac}")
    };
    Some(format!("{sign}{plain}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> TransferPayload {
        serde_json::from_value(value).unwrap()
    }

    fn full() -> Value {
        json!({
            "privateKey": "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
            "amount": "0.01",
            "receiver": "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
            "network": "eth"
        })
    }

    fn failing_fields(value: Value) -> Vec<String> {
        match validate_transfer(&payload(value)) {
            Err(TransferError::Validation(errors)) => {
                errors.fields().into_iter().map(str::to_string).collect()
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_complete_payload() {
        let request = validate_transfer(&payload(full())).unwrap();
        assert_eq!(request.amount.as_str(), "0.01");
        assert_eq!(request.network, "eth");
        assert_eq!(request.receiver, "0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
    }

    #[test]
    fn accepts_numeric_amount() {
        let mut body = full();
        body["amount"] = json!(1.5);
        let request = validate_transfer(&payload(body)).unwrap();
        assert_eq!(request.amount.as_str(), "1.5");
    }

    #[test]
    fn accepts_numeric_amounts_printed_with_exponent() {
        for (amount, expected) in [
            (json!(0.0000001), "0.0000001"),
            (serde_json::from_str::<Value>("1e-7").unwrap(), "0.0000001"),
            (serde_json::from_str::<Value>("1.25E-3").unwrap(), "0.00125"),
            (json!(1e21), "1000000000000000000000"),
        ] {
            let mut body = full();
            body["amount"] = amount.clone();
            let request = validate_transfer(&payload(body))
                .unwrap_or_else(|e| panic!("{amount} rejected: {e}"));
            assert_eq!(request.amount.as_str(), expected);
        }
    }

    #[test]
    fn expands_exponent_notation() {
        assert_eq!(plain_decimal("1e-7").as_deref(), Some("0.0000001"));
        assert_eq!(plain_decimal("12.5e1").as_deref(), Some("125"));
        assert_eq!(plain_decimal("1.5e+2").as_deref(), Some("150"));
        assert_eq!(plain_decimal("-2e-1").as_deref(), Some("-0.2"));
        assert_eq!(plain_decimal("0.25").as_deref(), Some("0.25"));
        assert_eq!(plain_decimal("1e400"), None);
    }

    #[test]
    fn reports_exactly_the_missing_fields() {
        let fields = ["amount", "network", "privateKey", "receiver"];

        // Every non-empty subset of fields removed.
        for mask in 1u8..16 {
            let mut body = full();
            let mut expected = Vec::new();
            for (i, field) in fields.iter().enumerate() {
                if mask & (1 << i) != 0 {
                    body.as_object_mut().unwrap().remove(*field);
                    expected.push(field.to_string());
                }
            }
            assert_eq!(failing_fields(body), expected, "mask {mask:#06b}");
        }
    }

    #[test]
    fn null_and_blank_count_as_missing() {
        let mut body = full();
        body["privateKey"] = Value::Null;
        body["receiver"] = json!("   ");
        assert_eq!(failing_fields(body), vec!["privateKey", "receiver"]);
    }

    #[test]
    fn rejects_wrong_types() {
        let mut body = full();
        body["privateKey"] = json!(12345);
        body["network"] = json!(["eth"]);
        body["amount"] = json!(true);

        let Err(TransferError::Validation(errors)) = validate_transfer(&payload(body)) else {
            panic!("expected validation error");
        };
        assert_eq!(errors.fields(), vec!["amount", "network", "privateKey"]);
        assert_eq!(errors.messages("privateKey"), ["The privateKey must be a string."]);
    }

    #[test]
    fn rejects_non_positive_amounts() {
        for amount in [json!("0"), json!(0), json!("-1"), json!(-0.5), json!("0.0")] {
            let mut body = full();
            body["amount"] = amount.clone();
            let Err(TransferError::Validation(errors)) = validate_transfer(&payload(body)) else {
                panic!("{amount} should be rejected");
            };
            assert_eq!(errors.messages("amount"), ["The amount must be greater than 0."]);
        }
    }
}
