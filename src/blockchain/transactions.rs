// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Native transfer building and local signing.
//!
//! EVM transfers are signed as EIP-155 legacy transactions and handed back
//! as raw bytes ready for `eth_sendRawTransaction`. Solana transfers are a
//! single system-program instruction signed by the sender's keypair.

use alloy::{
    consensus::{SignableTransaction, TxEnvelope, TxLegacy},
    eips::Encodable2718,
    network::TxSigner,
    primitives::{Address, Bytes, TxKind, B256, U256},
    signers::local::PrivateKeySigner,
};
use solana_sdk::{
    hash::Hash, pubkey::Pubkey, signature::Keypair, signer::Signer, system_instruction,
    transaction::Transaction,
};

use super::client::ChainClientError;
use super::types::NATIVE_TRANSFER_GAS_LIMIT;

/// Unsigned parameters of an EVM native transfer.
#[derive(Debug, Clone)]
pub struct EvmTransferParams {
    pub to: Address,
    pub value: U256,
    pub nonce: u64,
    pub gas_price: u128,
    pub chain_id: u64,
}

/// A signed EVM transfer, consumed once by submission.
#[derive(Debug, Clone)]
pub struct SignedTransfer {
    /// EIP-2718 encoded transaction
    pub raw: Vec<u8>,
    pub hash: B256,
    pub nonce: u64,
    pub gas_limit: u64,
    pub gas_price: u128,
    /// `gas_limit * gas_price` in wei
    pub estimated_fee: U256,
}

/// Build and sign a legacy value transfer.
pub async fn sign_evm_transfer(
    signer: &PrivateKeySigner,
    params: EvmTransferParams,
) -> Result<SignedTransfer, ChainClientError> {
    let mut tx = TxLegacy {
        chain_id: Some(params.chain_id),
        nonce: params.nonce,
        gas_price: params.gas_price,
        gas_limit: NATIVE_TRANSFER_GAS_LIMIT,
        to: TxKind::Call(params.to),
        value: params.value,
        input: Bytes::new(),
    };

    let signature = signer
        .sign_transaction(&mut tx)
        .await
        .map_err(|e| ChainClientError::TransactionFailed(format!("Failed to sign: {e}")))?;

    let signed = tx.into_signed(signature);
    let hash = *signed.hash();
    let envelope = TxEnvelope::from(signed);

    Ok(SignedTransfer {
        raw: envelope.encoded_2718(),
        hash,
        nonce: params.nonce,
        gas_limit: NATIVE_TRANSFER_GAS_LIMIT,
        gas_price: params.gas_price,
        estimated_fee: U256::from(NATIVE_TRANSFER_GAS_LIMIT) * U256::from(params.gas_price),
    })
}

/// Build and sign a single-instruction SOL transfer.
pub fn sign_solana_transfer(
    sender: &Keypair,
    to: &Pubkey,
    lamports: u64,
    recent_blockhash: Hash,
) -> Transaction {
    let instruction = system_instruction::transfer(&sender.pubkey(), to, lamports);
    Transaction::new_signed_with_payer(
        &[instruction],
        Some(&sender.pubkey()),
        &[sender],
        recent_blockhash,
    )
}

/// Parse a human-readable amount to the smallest unit.
///
/// # Arguments
/// * `amount` - Amount as a string (e.g., "1.5")
/// * `decimals` - Number of decimals (18 for ETH/BNB, 9 for SOL)
pub fn parse_amount(amount: &str, decimals: u8) -> Result<U256, ChainClientError> {
    let amount = amount.trim();
    let (whole, fraction) = match amount.split_once('.') {
        Some((w, f)) => (w, f),
        None => (amount, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(ChainClientError::InvalidAmount("Empty amount".to_string()));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(ChainClientError::InvalidAmount(format!(
            "`{amount}` is not a plain decimal number"
        )));
    }
    if fraction.len() > decimals as usize {
        return Err(ChainClientError::InvalidAmount(format!(
            "Too many decimal places (max {decimals})"
        )));
    }

    let whole = if whole.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(whole, 10)
            .map_err(|_| ChainClientError::InvalidAmount("Amount overflow".to_string()))?
    };
    let fraction = if fraction.is_empty() {
        U256::ZERO
    } else {
        // Pad with zeros to match decimals
        let padded = format!("{:0<width$}", fraction, width = decimals as usize);
        U256::from_str_radix(&padded, 10)
            .map_err(|_| ChainClientError::InvalidAmount("Invalid decimal".to_string()))?
    };

    let multiplier = U256::from(10u64).pow(U256::from(decimals));
    whole
        .checked_mul(multiplier)
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(|| ChainClientError::InvalidAmount("Amount overflow".to_string()))
}

/// Parse a human-readable SOL amount to lamports.
pub fn parse_lamports(amount: &str, decimals: u8) -> Result<u64, ChainClientError> {
    let units = parse_amount(amount, decimals)?;
    u64::try_from(units)
        .map_err(|_| ChainClientError::InvalidAmount("Amount overflow".to_string()))
}

/// Format smallest-unit amounts to a human-readable decimal.
pub fn format_amount(amount: U256, decimals: u8) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let decimal_str = format!("{:0>width$}", remainder.to_string(), width = decimals as usize);
        let trimmed = decimal_str.trim_end_matches('0');
        format!("{}.{}", whole, trimmed)
    }
}
