// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfer execution: balance check, fee pricing, signing and submission.
//!
//! ## Submission semantics
//!
//! EVM transfers are fire-and-acknowledge: the hash is returned as soon as
//! the node accepts the raw transaction, without waiting for a block.
//! Solana transfers wait for `confirmed` commitment before the signature is
//! returned.
//!
//! ## Concurrency
//!
//! Each call performs its RPC requests strictly in sequence. Nothing is
//! coordinated across calls: two concurrent transfers from the same EVM
//! sender read the same nonce and one of them will be rejected or replace
//! the other. Callers that submit concurrently from one account must
//! serialize those submissions themselves. The balance check is advisory and
//! ignores fees and in-flight transfers.

use std::{future::Future, time::Duration};

use alloy::primitives::U256;
use solana_sdk::signer::Signer;

use super::error::{TransferError, ValidationErrors};
use super::registry::{ChainClient, NetworkEntry};
use super::request::TransferRequest;
use super::TransferResult;
use crate::blockchain::{
    client::ChainClientError,
    format_amount, parse_amount, parse_evm_address, parse_lamports,
    solana::{parse_keypair, parse_pubkey},
    transactions::{sign_evm_transfer, sign_solana_transfer, EvmTransferParams},
    EvmClient, EvmRpc, FeeEstimator, FeeModel, NetworkProfile, SolanaRpc,
};

/// Runs validated transfers against a selected network.
#[derive(Debug, Clone)]
pub struct TransferExecutor {
    fees: FeeEstimator,
    /// Bound on every individual RPC call.
    rpc_timeout: Duration,
    /// Bound on Solana submit-and-confirm.
    confirm_timeout: Duration,
}

impl TransferExecutor {
    pub fn new(fees: FeeEstimator, rpc_timeout: Duration, confirm_timeout: Duration) -> Self {
        Self {
            fees,
            rpc_timeout,
            confirm_timeout,
        }
    }

    /// Run a validated transfer on the network described by `entry`.
    ///
    /// The profile's fee model picks the workflow; the client must speak the
    /// matching protocol.
    pub async fn execute(
        &self,
        request: &TransferRequest,
        entry: &NetworkEntry,
    ) -> Result<TransferResult, TransferError> {
        let profile = &entry.profile;
        match (profile.fee_model, &entry.client) {
            (FeeModel::LegacyGasPrice, ChainClient::Evm(rpc)) => {
                self.execute_evm(request, profile, rpc.as_ref()).await
            }
            (FeeModel::SolanaLamports, ChainClient::Solana(rpc)) => {
                self.execute_solana(request, profile, rpc.as_ref()).await
            }
            (fee_model, _) => Err(TransferError::Execution(format!(
                "{} is configured with a client that cannot price {fee_model:?} fees",
                profile.name
            ))),
        }
    }

    async fn execute_evm(
        &self,
        request: &TransferRequest,
        profile: &NetworkProfile,
        rpc: &dyn EvmRpc,
    ) -> Result<TransferResult, TransferError> {
        let mut errors = ValidationErrors::new();
        let signer = EvmClient::create_signer(request.private_key.expose())
            .map_err(|_| {
                errors.add(
                    "privateKey",
                    "The privateKey is not a valid secp256k1 private key.",
                )
            })
            .ok();
        let to = parse_evm_address(&request.receiver)
            .map_err(|e| errors.add("receiver", e.to_string()))
            .ok();
        let value = parse_amount(request.amount.as_str(), profile.decimals)
            .map_err(|e| errors.add("amount", e.to_string()))
            .ok();
        let (Some(signer), Some(to), Some(value)) = (signer, to, value) else {
            return Err(errors.into());
        };

        let chain_id = profile.chain_id().ok_or_else(|| {
            TransferError::Execution(format!("{} has no EVM chain id", profile.name))
        })?;
        let sender = signer.address();

        let balance =
            bounded(self.rpc_timeout, "eth_getBalance", rpc.get_balance(sender)).await?;
        if balance < value {
            return Err(insufficient(balance, value, profile));
        }

        let nonce = bounded(
            self.rpc_timeout,
            "eth_getTransactionCount",
            rpc.get_transaction_count(sender),
        )
        .await?;
        let gas_price =
            bounded(self.rpc_timeout, "gas price", self.fees.gas_price(rpc)).await?;

        let signed = sign_evm_transfer(
            &signer,
            EvmTransferParams {
                to,
                value,
                nonce,
                gas_price,
                chain_id,
            },
        )
        .await
        .map_err(|e| TransferError::Execution(e.to_string()))?;

        tracing::info!(
            network = %profile.network,
            from = %sender,
            to = %to,
            nonce,
            gas_price,
            estimated_fee = %signed.estimated_fee,
            tx_hash = %signed.hash,
            "Submitting transfer"
        );

        let hash = submit(self.rpc_timeout, rpc.send_raw_transaction(signed.raw)).await?;

        Ok(TransferResult::EvmSubmitted {
            hash: hash.to_string(),
        })
    }

    async fn execute_solana(
        &self,
        request: &TransferRequest,
        profile: &NetworkProfile,
        rpc: &dyn SolanaRpc,
    ) -> Result<TransferResult, TransferError> {
        let mut errors = ValidationErrors::new();
        let keypair = parse_keypair(request.private_key.expose())
            .map_err(|_| errors.add("privateKey", "The privateKey is not a valid Solana keypair."))
            .ok();
        let to = parse_pubkey(&request.receiver)
            .map_err(|e| errors.add("receiver", e.to_string()))
            .ok();
        let lamports = parse_lamports(request.amount.as_str(), profile.decimals)
            .map_err(|e| errors.add("amount", e.to_string()))
            .ok();
        let (Some(keypair), Some(to), Some(lamports)) = (keypair, to, lamports) else {
            return Err(errors.into());
        };

        let sender = keypair.pubkey();

        let balance = bounded(self.rpc_timeout, "getBalance", rpc.get_balance(&sender)).await?;
        if balance < lamports {
            return Err(insufficient(U256::from(balance), U256::from(lamports), profile));
        }

        let blockhash = bounded(
            self.rpc_timeout,
            "getLatestBlockhash",
            rpc.get_latest_blockhash(),
        )
        .await?;

        let transaction = sign_solana_transfer(&keypair, &to, lamports, blockhash);

        tracing::info!(
            network = %profile.network,
            from = %sender,
            to = %to,
            lamports,
            "Submitting transfer and waiting for confirmation"
        );

        let signature = submit(
            self.confirm_timeout,
            rpc.send_and_confirm_transaction(&transaction),
        )
        .await?;

        Ok(TransferResult::SolanaConfirmed {
            signature: signature.to_string(),
        })
    }
}

fn insufficient(balance: U256, requested: U256, profile: &NetworkProfile) -> TransferError {
    TransferError::InsufficientFunds(format!(
        "balance {} {symbol} is less than requested {} {symbol}",
        format_amount(balance, profile.decimals),
        format_amount(requested, profile.decimals),
        symbol = profile.symbol,
    ))
}

/// Await a read-only RPC call with a deadline; any failure is an execution error.
pub async fn bounded<T, F>(
    timeout: Duration,
    operation: &str,
    call: F,
) -> Result<T, TransferError>
where
    F: Future<Output = Result<T, ChainClientError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            tracing::warn!(operation, error = %e, "RPC call failed");
            Err(TransferError::Execution(e.to_string()))
        }
        Err(_) => {
            tracing::warn!(operation, timeout_secs = timeout.as_secs(), "RPC call timed out");
            Err(TransferError::Execution(format!(
                "{operation} timed out after {}s",
                timeout.as_secs()
            )))
        }
    }
}

/// Await a submission. Node-side insufficient funds is reported the same way
/// as the pre-check; a timeout leaves the outcome unknown.
async fn submit<T, F>(timeout: Duration, call: F) -> Result<T, TransferError>
where
    F: Future<Output = Result<T, ChainClientError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) if e.is_insufficient_funds() => {
            Err(TransferError::InsufficientFunds(e.to_string()))
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Transaction submission failed");
            Err(TransferError::Execution(e.to_string()))
        }
        Err(_) => {
            tracing::warn!(timeout_secs = timeout.as_secs(), "Transaction submission timed out");
            Err(TransferError::Execution(format!(
                "submission timed out after {}s; outcome unknown, \
                 the transaction may still be processed, check chain state",
                timeout.as_secs()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::{
        client::MockEvmRpc, solana::MockSolanaRpc, Network, NATIVE_TRANSFER_GAS_LIMIT,
    };
    use crate::transfer::request::{Amount, SecretKey};
    use alloy::{
        consensus::TxEnvelope,
        eips::Decodable2718,
        primitives::{Address, B256},
    };
    use async_trait::async_trait;
    use solana_sdk::{
        hash::Hash,
        pubkey::Pubkey,
        signature::{Keypair, Signature},
        transaction::Transaction,
    };
    use std::sync::{Arc, Mutex};

    const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const RECEIVER: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
    const ONE_ETH: u64 = 1_000_000_000_000_000_000;

    fn executor(fees: FeeEstimator) -> TransferExecutor {
        TransferExecutor::new(fees, Duration::from_secs(5), Duration::from_secs(5))
    }

    fn request(key: &str, receiver: &str, amount: &str, network: &str) -> TransferRequest {
        TransferRequest {
            private_key: SecretKey::new(key.to_string()),
            receiver: receiver.to_string(),
            amount: Amount::parse(amount).unwrap(),
            network: network.to_string(),
        }
    }

    fn evm_entry(rpc: MockEvmRpc) -> NetworkEntry {
        NetworkEntry {
            profile: NetworkProfile::evm(Network::Eth, "http://eth.local", 4),
            client: ChainClient::Evm(Arc::new(rpc)),
        }
    }

    fn solana_entry(rpc: MockSolanaRpc) -> NetworkEntry {
        NetworkEntry {
            profile: NetworkProfile::solana("http://sol.local", "devnet"),
            client: ChainClient::Solana(Arc::new(rpc)),
        }
    }

    #[tokio::test]
    async fn evm_transfer_signs_and_returns_hash_without_waiting() {
        let submitted = Arc::new(Mutex::new(Vec::new()));
        let sink = submitted.clone();

        let mut rpc = MockEvmRpc::new();
        rpc.expect_get_balance()
            .times(1)
            .returning(|_| Ok(U256::from(ONE_ETH)));
        rpc.expect_get_transaction_count().times(1).returning(|_| Ok(5));
        rpc.expect_get_gas_price()
            .times(1)
            .returning(|| Ok(20_000_000_000));
        rpc.expect_send_raw_transaction()
            .times(1)
            .returning(move |raw| {
                let envelope = TxEnvelope::decode_2718(&mut raw.as_slice()).unwrap();
                let hash = *envelope.tx_hash();
                sink.lock().unwrap().push(raw);
                Ok(hash)
            });

        let result = executor(FeeEstimator::Rpc)
            .execute(&request(DEV_KEY, RECEIVER, "0.01", "eth"), &evm_entry(rpc))
            .await
            .unwrap();

        let TransferResult::EvmSubmitted { hash } = result else {
            panic!("expected an EVM hash");
        };
        assert!(hash.starts_with("0x"));
        assert_eq!(hash.len(), 66);

        let raw = submitted.lock().unwrap().pop().unwrap();
        let TxEnvelope::Legacy(signed) = TxEnvelope::decode_2718(&mut raw.as_slice()).unwrap()
        else {
            panic!("expected a legacy transaction");
        };
        assert_eq!(signed.hash().to_string(), hash);
        assert_eq!(signed.tx().nonce, 5);
        assert_eq!(signed.tx().gas_limit, NATIVE_TRANSFER_GAS_LIMIT);
        assert_eq!(signed.tx().gas_price, 20_000_000_000);
        assert_eq!(signed.tx().chain_id, Some(4));
        assert_eq!(signed.tx().value, U256::from(10_000_000_000_000_000u64));
    }

    #[tokio::test]
    async fn fixed_fee_strategy_skips_gas_price_rpc() {
        let mut rpc = MockEvmRpc::new();
        rpc.expect_get_balance().returning(|_| Ok(U256::from(ONE_ETH)));
        rpc.expect_get_transaction_count().returning(|_| Ok(0));
        rpc.expect_get_gas_price().never();
        rpc.expect_send_raw_transaction().returning(|raw| {
            let TxEnvelope::Legacy(signed) = TxEnvelope::decode_2718(&mut raw.as_slice()).unwrap()
            else {
                panic!("expected a legacy transaction");
            };
            assert_eq!(signed.tx().gas_price, 3_000_000_000);
            Ok(*signed.hash())
        });

        executor(FeeEstimator::fixed(3_000_000_000))
            .execute(&request(DEV_KEY, RECEIVER, "0.5", "eth"), &evm_entry(rpc))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn low_balance_stops_before_submission() {
        let mut rpc = MockEvmRpc::new();
        rpc.expect_get_balance()
            .times(1)
            .returning(|_| Ok(U256::from(ONE_ETH / 2)));
        rpc.expect_get_transaction_count().never();
        rpc.expect_get_gas_price().never();
        rpc.expect_send_raw_transaction().never();

        let err = executor(FeeEstimator::Rpc)
            .execute(&request(DEV_KEY, RECEIVER, "1", "eth"), &evm_entry(rpc))
            .await
            .unwrap_err();

        match err {
            TransferError::InsufficientFunds(msg) => {
                assert_eq!(msg, "balance 0.5 ETH is less than requested 1 ETH")
            }
            other => panic!("expected insufficient funds, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn node_side_insufficient_funds_is_reported_the_same_way() {
        let mut rpc = MockEvmRpc::new();
        rpc.expect_get_balance().returning(|_| Ok(U256::from(ONE_ETH)));
        rpc.expect_get_transaction_count().returning(|_| Ok(1));
        rpc.expect_get_gas_price().returning(|| Ok(1));
        rpc.expect_send_raw_transaction().returning(|_| {
            Err(ChainClientError::TransactionFailed(
                "insufficient funds for gas * price + value".into(),
            ))
        });

        let err = executor(FeeEstimator::Rpc)
            .execute(&request(DEV_KEY, RECEIVER, "1", "eth"), &evm_entry(rpc))
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::InsufficientFunds(_)));
    }

    #[tokio::test]
    async fn submission_failure_is_execution_error_with_provider_message() {
        let mut rpc = MockEvmRpc::new();
        rpc.expect_get_balance().returning(|_| Ok(U256::from(ONE_ETH)));
        rpc.expect_get_transaction_count().returning(|_| Ok(1));
        rpc.expect_get_gas_price().returning(|| Ok(1));
        rpc.expect_send_raw_transaction()
            .returning(|_| Err(ChainClientError::TransactionFailed("nonce too low".into())));

        let err = executor(FeeEstimator::Rpc)
            .execute(&request(DEV_KEY, RECEIVER, "0.1", "eth"), &evm_entry(rpc))
            .await
            .unwrap_err();
        match err {
            TransferError::Execution(msg) => assert!(msg.contains("nonce too low")),
            other => panic!("expected execution error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn balance_lookup_failure_is_execution_error() {
        let mut rpc = MockEvmRpc::new();
        rpc.expect_get_balance()
            .returning(|_| Err(ChainClientError::RpcError("connection refused".into())));
        rpc.expect_send_raw_transaction().never();

        let err = executor(FeeEstimator::Rpc)
            .execute(&request(DEV_KEY, RECEIVER, "0.1", "eth"), &evm_entry(rpc))
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::Execution(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_rpc_times_out() {
        let result: Result<u64, TransferError> = bounded(Duration::from_secs(1), "slow", async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(1)
        })
        .await;

        match result {
            Err(TransferError::Execution(msg)) => assert_eq!(msg, "slow timed out after 1s"),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_inputs_fail_before_any_rpc_call() {
        let mut rpc = MockEvmRpc::new();
        rpc.expect_get_balance().never();
        rpc.expect_send_raw_transaction().never();

        let err = executor(FeeEstimator::Rpc)
            .execute(
                &request("xyz", "0x1234", "0.0000000000000000001", "eth"),
                &evm_entry(rpc),
            )
            .await
            .unwrap_err();

        let TransferError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.fields(), vec!["amount", "privateKey", "receiver"]);
    }

    #[tokio::test]
    async fn solana_transfer_waits_for_confirmation() {
        let sender = Keypair::new();
        let receiver = Keypair::new().pubkey();
        let sender_pubkey = sender.pubkey();

        let mut rpc = MockSolanaRpc::new();
        rpc.expect_get_balance()
            .withf(move |pubkey| *pubkey == sender_pubkey)
            .times(1)
            .returning(|_| Ok(2_000_000_000));
        rpc.expect_get_latest_blockhash()
            .times(1)
            .returning(|| Ok(Hash::new_unique()));
        rpc.expect_send_and_confirm_transaction()
            .times(1)
            .withf(|tx| tx.verify().is_ok() && tx.message.instructions.len() == 1)
            .returning(|tx| Ok(tx.signatures[0]));

        let result = executor(FeeEstimator::Rpc)
            .execute(
                &request(&sender.to_base58_string(), &receiver.to_string(), "1.5", "solana"),
                &solana_entry(rpc),
            )
            .await
            .unwrap();

        let TransferResult::SolanaConfirmed { signature } = result else {
            panic!("expected a Solana signature");
        };
        assert!(signature.parse::<Signature>().is_ok());
    }

    #[tokio::test]
    async fn solana_low_balance_stops_before_submission() {
        let sender = Keypair::new();

        let mut rpc = MockSolanaRpc::new();
        rpc.expect_get_balance().returning(|_| Ok(1_000));
        rpc.expect_get_latest_blockhash().never();
        rpc.expect_send_and_confirm_transaction().never();

        let err = executor(FeeEstimator::Rpc)
            .execute(
                &request(
                    &sender.to_base58_string(),
                    &Keypair::new().pubkey().to_string(),
                    "1",
                    "solana",
                ),
                &solana_entry(rpc),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::InsufficientFunds(_)));
    }

    #[tokio::test]
    async fn solana_rejects_evm_style_inputs() {
        let mut rpc = MockSolanaRpc::new();
        rpc.expect_get_balance().never();

        let err = executor(FeeEstimator::Rpc)
            .execute(&request(DEV_KEY, RECEIVER, "1", "solana"), &solana_entry(rpc))
            .await
            .unwrap_err();
        let TransferError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.fields(), vec!["privateKey", "receiver"]);
    }

    /// Funded EVM node whose `eth_sendRawTransaction` never answers.
    struct StalledEvmNode;

    #[async_trait]
    impl EvmRpc for StalledEvmNode {
        async fn get_balance(&self, _address: Address) -> Result<U256, ChainClientError> {
            Ok(U256::from(ONE_ETH))
        }

        async fn get_transaction_count(&self, _address: Address) -> Result<u64, ChainClientError> {
            Ok(0)
        }

        async fn get_gas_price(&self) -> Result<u128, ChainClientError> {
            Ok(1_000_000_000)
        }

        async fn send_raw_transaction(&self, _raw: Vec<u8>) -> Result<B256, ChainClientError> {
            tokio::time::sleep(Duration::from_secs(600)).await;
            Err(ChainClientError::TransactionFailed("insufficient funds".into()))
        }
    }

    /// Funded Solana cluster that never confirms.
    struct StalledSolanaCluster;

    #[async_trait]
    impl SolanaRpc for StalledSolanaCluster {
        async fn get_balance(&self, _pubkey: &Pubkey) -> Result<u64, ChainClientError> {
            Ok(10_000_000_000)
        }

        async fn get_latest_blockhash(&self) -> Result<Hash, ChainClientError> {
            Ok(Hash::new_unique())
        }

        async fn send_and_confirm_transaction(
            &self,
            _transaction: &Transaction,
        ) -> Result<Signature, ChainClientError> {
            tokio::time::sleep(Duration::from_secs(600)).await;
            Err(ChainClientError::TransactionFailed("insufficient lamports".into()))
        }
    }

    fn assert_outcome_unknown(err: TransferError) {
        match err {
            TransferError::Execution(msg) => {
                assert!(msg.contains("outcome unknown"), "{msg}");
                assert!(msg.contains("check chain state"), "{msg}");
            }
            other => panic!("expected execution error, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn evm_submission_timeout_reports_unknown_outcome() {
        let entry = NetworkEntry {
            profile: NetworkProfile::evm(Network::Eth, "http://eth.local", 4),
            client: ChainClient::Evm(Arc::new(StalledEvmNode)),
        };

        let err = executor(FeeEstimator::Rpc)
            .execute(&request(DEV_KEY, RECEIVER, "0.01", "eth"), &entry)
            .await
            .unwrap_err();
        assert_outcome_unknown(err);
    }

    #[tokio::test(start_paused = true)]
    async fn solana_confirmation_timeout_reports_unknown_outcome() {
        let entry = NetworkEntry {
            profile: NetworkProfile::solana("http://sol.local", "devnet"),
            client: ChainClient::Solana(Arc::new(StalledSolanaCluster)),
        };
        let executor = TransferExecutor::new(
            FeeEstimator::Rpc,
            Duration::from_secs(5),
            Duration::from_secs(30),
        );

        let err = executor
            .execute(
                &request(
                    &Keypair::new().to_base58_string(),
                    &Keypair::new().pubkey().to_string(),
                    "1",
                    "solana",
                ),
                &entry,
            )
            .await
            .unwrap_err();
        assert_outcome_unknown(err);
    }

    #[tokio::test]
    async fn client_must_match_fee_model() {
        let mut rpc = MockSolanaRpc::new();
        rpc.expect_get_balance().never();
        let entry = NetworkEntry {
            profile: NetworkProfile::evm(Network::Eth, "http://eth.local", 4),
            client: ChainClient::Solana(Arc::new(rpc)),
        };

        let err = executor(FeeEstimator::Rpc)
            .execute(&request(DEV_KEY, RECEIVER, "1", "eth"), &entry)
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::Execution(ref msg) if msg.starts_with("Ethereum")));
    }
}
