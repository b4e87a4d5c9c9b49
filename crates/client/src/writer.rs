//! Transactions against an RFQ contract.

use crate::{ClientError, RfqReader};
use alloy_contract::{private::Provider, SolCallBuilder};
use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_rpc_types_eth::TransactionReceipt;
use alloy_sol_types::SolCall;
use binding::{token::IERC20, IMessageBus, Quote, RouteInfo};
use gateway::MessageProof;
use tracing::{debug, info, warn};

/// Outcome of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutcome {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// Sends RFQ transactions through a signing provider.
///
/// Every method waits for the receipt and maps a reverted transaction to
/// [`ClientError::Reverted`].
#[derive(Debug, Clone)]
pub struct RfqWriter<P> {
    reader: RfqReader<P>,
}

impl<P> RfqWriter<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, address: Address) -> Self {
        Self {
            reader: RfqReader::new(provider, address),
        }
    }

    pub const fn reader(&self) -> &RfqReader<P> {
        &self.reader
    }

    /// Let the RFQ contract pull `amount` of `token` from the signer.
    pub async fn approve(&self, token: Address, amount: U256) -> Result<TxOutcome, ClientError> {
        let contract = IERC20::new(token, self.reader.provider());
        let call = contract.approve(self.reader.address(), amount);
        submit("approve", call).await
    }

    /// Escrow the quote's source amount. `msg_fee` pays the message bus.
    pub async fn src_deposit(
        &self,
        quote: &Quote,
        submission_deadline: u64,
        msg_fee: U256,
    ) -> Result<TxOutcome, ClientError> {
        let contract = self.reader.contract();
        let call = contract
            .srcDeposit(quote.clone(), submission_deadline)
            .value(msg_fee);
        submit("srcDeposit", call).await
    }

    /// Pay the receiver. `value` covers the message fee.
    pub async fn dst_transfer(&self, quote: &Quote, value: U256) -> Result<TxOutcome, ClientError> {
        let contract = self.reader.contract();
        let call = contract.dstTransfer(quote.clone()).value(value);
        submit("dstTransfer", call).await
    }

    pub async fn src_release(
        &self,
        quote: &Quote,
        message: Bytes,
        route: RouteInfo,
        proof: &MessageProof,
    ) -> Result<TxOutcome, ClientError> {
        let contract = self.reader.contract();
        let call = contract.srcRelease(
            quote.clone(),
            message,
            route,
            proof.sigs.clone(),
            proof.signers.clone(),
            proof.powers.clone(),
        );
        submit("srcRelease", call).await
    }

    pub async fn request_refund(
        &self,
        quote: &Quote,
        message: Bytes,
        route: RouteInfo,
        proof: &MessageProof,
        msg_fee: U256,
    ) -> Result<TxOutcome, ClientError> {
        let contract = self.reader.contract();
        let call = contract
            .requestRefund(
                quote.clone(),
                message,
                route,
                proof.sigs.clone(),
                proof.signers.clone(),
                proof.powers.clone(),
            )
            .value(msg_fee);
        submit("requestRefund", call).await
    }

    pub async fn execute_refund(
        &self,
        quote: &Quote,
        message: Bytes,
        route: RouteInfo,
        proof: &MessageProof,
    ) -> Result<TxOutcome, ClientError> {
        let contract = self.reader.contract();
        let call = contract.executeRefund(
            quote.clone(),
            message,
            route,
            proof.sigs.clone(),
            proof.signers.clone(),
            proof.powers.clone(),
        );
        submit("executeRefund", call).await
    }

    /// Deliver a message through the bus without settling a quote.
    pub async fn execute_message(
        &self,
        message: Bytes,
        route: RouteInfo,
        proof: &MessageProof,
    ) -> Result<TxOutcome, ClientError> {
        let bus = self.reader.message_bus().await?;
        let contract = IMessageBus::new(bus, self.reader.provider());
        let call = contract.executeMessage(
            message,
            route,
            proof.sigs.clone(),
            proof.signers.clone(),
            proof.powers.clone(),
        );
        submit("executeMessage", call).await
    }

    pub async fn collect_fee(&self, token: Address, amount: U256) -> Result<TxOutcome, ClientError> {
        let contract = self.reader.contract();
        let call = contract.collectFee(token, amount);
        submit("collectFee", call).await
    }

    pub async fn set_fee_perc(
        &self,
        chain_ids: Vec<u64>,
        fee_percs: Vec<u32>,
    ) -> Result<TxOutcome, ClientError> {
        let contract = self.reader.contract();
        let call = contract.setFeePerc(chain_ids, fee_percs);
        submit("setFeePerc", call).await
    }

    pub async fn set_remote_rfq_contracts(
        &self,
        chain_ids: Vec<u64>,
        remotes: Vec<Address>,
    ) -> Result<TxOutcome, ClientError> {
        let contract = self.reader.contract();
        let call = contract.setRemoteRfqContracts(chain_ids, remotes);
        submit("setRemoteRfqContracts", call).await
    }

    pub async fn set_treasury_addr(&self, treasury: Address) -> Result<TxOutcome, ClientError> {
        let contract = self.reader.contract();
        let call = contract.setTreasuryAddr(treasury);
        submit("setTreasuryAddr", call).await
    }

    pub async fn set_message_bus(&self, bus: Address) -> Result<TxOutcome, ClientError> {
        let contract = self.reader.contract();
        let call = contract.setMessageBus(bus);
        submit("setMessageBus", call).await
    }

    pub async fn pause(&self) -> Result<TxOutcome, ClientError> {
        submit("pause", self.reader.contract().pause()).await
    }

    pub async fn unpause(&self) -> Result<TxOutcome, ClientError> {
        submit("unpause", self.reader.contract().unpause()).await
    }

    pub async fn add_pauser(&self, account: Address) -> Result<TxOutcome, ClientError> {
        submit("addPauser", self.reader.contract().addPauser(account)).await
    }

    pub async fn remove_pauser(&self, account: Address) -> Result<TxOutcome, ClientError> {
        submit("removePauser", self.reader.contract().removePauser(account)).await
    }

    pub async fn transfer_ownership(&self, new_owner: Address) -> Result<TxOutcome, ClientError> {
        let contract = self.reader.contract();
        let call = contract.transferOwnership(new_owner);
        submit("transferOwnership", call).await
    }
}

/// Send `call`, wait for its receipt and check the status.
async fn submit<Q, C>(name: &'static str, call: SolCallBuilder<Q, C>) -> Result<TxOutcome, ClientError>
where
    Q: Provider,
    C: SolCall,
{
    debug!(call = name, "Sending transaction");

    let pending = call.send().await?;
    let tx_hash = *pending.tx_hash();
    info!(call = name, tx_hash = %tx_hash, "Transaction sent, waiting for receipt");

    let receipt = pending
        .get_receipt()
        .await
        .map_err(|e| ClientError::Confirmation(e.to_string()))?;

    check_receipt(name, &receipt)
}

/// Turn a mined receipt into a [`TxOutcome`], failing on a reverted status.
fn check_receipt(name: &'static str, receipt: &TransactionReceipt) -> Result<TxOutcome, ClientError> {
    let tx_hash = receipt.transaction_hash;

    if !receipt.status() {
        warn!(call = name, tx_hash = %tx_hash, "Transaction reverted");
        return Err(ClientError::Reverted(format!(
            "{name} transaction {tx_hash} reverted"
        )));
    }

    info!(
        call = name,
        tx_hash = %tx_hash,
        block = ?receipt.block_number,
        gas_used = receipt.gas_used,
        "Transaction confirmed"
    );

    Ok(TxOutcome {
        tx_hash,
        block_number: receipt.block_number,
        gas_used: receipt.gas_used,
    })
}
