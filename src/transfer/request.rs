// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Typed transfer request produced by validation.

use std::fmt;

use zeroize::Zeroizing;

/// Private key material supplied by the caller.
///
/// Wiped from memory on drop and never printed.
#[derive(Clone)]
pub struct SecretKey(Zeroizing<String>);

impl SecretKey {
    pub fn new(value: String) -> Self {
        Self(Zeroizing::new(value))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// Strictly positive decimal amount in the network's display unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount(String);

impl Amount {
    /// Parse a plain decimal (`"1"`, `"0.01"`, `".5"`), rejecting zero,
    /// negatives, exponents and anything else that is not digits and one dot.
    pub fn parse(raw: &str) -> Result<Self, &'static str> {
        let raw = raw.trim();
        if raw.starts_with('-') {
            return Err("The amount must be greater than 0.");
        }

        let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));
        let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
            return Err("The amount must be a decimal number.");
        }

        if !raw.chars().any(|c| matches!(c, '1'..='9')) {
            return Err("The amount must be greater than 0.");
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fully validated transfer, ready for network selection.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub private_key: SecretKey,
    pub receiver: String,
    pub amount: Amount,
    pub network: String,
}
