// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfer workflow errors.

use std::{collections::BTreeMap, fmt};

use serde::Serialize;

/// Field-level validation failures, keyed by request field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-field failure.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names of the failing fields, in sorted order.
    pub fn fields(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().flatten().map(String::as_str).collect();
        f.write_str(&messages.join(" "))
    }
}

/// Terminal outcome of a failed transfer, balance or keypair request.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// Client input is malformed.
    #[error("{0}")]
    Validation(ValidationErrors),

    /// Sender balance cannot cover the transfer, either by the advisory
    /// pre-check or as reported by the node at submission.
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("unsupported network: {0}")]
    UnsupportedNetwork(String),

    /// A downstream RPC call failed or timed out.
    #[error("{0}")]
    Execution(String),
}

impl From<ValidationErrors> for TransferError {
    fn from(errors: ValidationErrors) -> Self {
        TransferError::Validation(errors)
    }
}
