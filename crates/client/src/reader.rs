//! Read-only access to an RFQ contract.

use crate::{events::decode_logs, ClientError, RfqLog};
use alloy_contract::private::Provider;
use alloy_primitives::{Address, B256, U256};
use alloy_rpc_types_eth::Filter;
use binding::{token::IERC20, IMessageBus, IRfq, Quote};

/// View calls and log queries against one deployed RFQ contract.
#[derive(Debug, Clone)]
pub struct RfqReader<P> {
    provider: P,
    address: Address,
}

impl<P> RfqReader<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, address: Address) -> Self {
        Self { provider, address }
    }

    pub const fn address(&self) -> Address {
        self.address
    }

    pub const fn provider(&self) -> &P {
        &self.provider
    }

    pub(crate) fn contract(&self) -> IRfq::IRfqInstance<&P> {
        IRfq::new(self.address, &self.provider)
    }

    pub async fn chain_id(&self) -> Result<u64, ClientError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))
    }

    pub async fn block_number(&self) -> Result<u64, ClientError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))
    }

    /// Quote hash as computed by the contract itself.
    pub async fn quote_hash(&self, quote: &Quote) -> Result<B256, ClientError> {
        Ok(self.contract().getQuoteHash(quote.clone()).call().await?)
    }

    /// Whether the quote is still escrowed on this (source) chain.
    pub async fn is_deposited(&self, hash: B256) -> Result<bool, ClientError> {
        Ok(self.contract().quotes(hash).call().await?)
    }

    /// Whether the quote was transferred or refund-requested on this (destination) chain.
    pub async fn is_executed(&self, hash: B256) -> Result<bool, ClientError> {
        Ok(self.contract().executedQuotes(hash).call().await?)
    }

    pub async fn is_unconsumed(&self, payload: B256) -> Result<bool, ClientError> {
        Ok(self.contract().unconsumedMsg(payload).call().await?)
    }

    pub async fn rfq_fee(&self, dst_chain_id: u64, amount: U256) -> Result<U256, ClientError> {
        Ok(self
            .contract()
            .getRFQFee(dst_chain_id, amount)
            .call()
            .await?)
    }

    pub async fn fee_perc_global(&self) -> Result<u32, ClientError> {
        Ok(self.contract().feePercGlobal().call().await?)
    }

    pub async fn fee_perc_override(&self, chain_id: u64) -> Result<u32, ClientError> {
        Ok(self.contract().feePercOverride(chain_id).call().await?)
    }

    /// Registered peer for `chain_id`, `None` if unset.
    pub async fn remote_rfq(&self, chain_id: u64) -> Result<Option<Address>, ClientError> {
        let remote = self.contract().remoteRfqContracts(chain_id).call().await?;
        Ok((!remote.is_zero()).then_some(remote))
    }

    pub async fn treasury(&self) -> Result<Address, ClientError> {
        Ok(self.contract().treasuryAddr().call().await?)
    }

    pub async fn message_bus(&self) -> Result<Address, ClientError> {
        Ok(self.contract().messageBus().call().await?)
    }

    pub async fn paused(&self) -> Result<bool, ClientError> {
        Ok(self.contract().paused().call().await?)
    }

    pub async fn is_pauser(&self, account: Address) -> Result<bool, ClientError> {
        Ok(self.contract().pausers(account).call().await?)
    }

    pub async fn owner(&self) -> Result<Address, ClientError> {
        Ok(self.contract().owner().call().await?)
    }

    /// Whether the bus on this chain already executed the message with `id`.
    pub async fn is_message_executed(&self, id: B256) -> Result<bool, ClientError> {
        let bus = self.message_bus().await?;
        let status = IMessageBus::new(bus, &self.provider)
            .executedMessages(id)
            .call()
            .await?;
        Ok(status != 0)
    }

    pub async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, ClientError> {
        let contract = IERC20::new(token, &self.provider);
        Ok(contract.balanceOf(owner).call().await?)
    }

    /// Amount of `token` the RFQ contract may pull from `owner`.
    pub async fn allowance(&self, token: Address, owner: Address) -> Result<U256, ClientError> {
        let contract = IERC20::new(token, &self.provider);
        Ok(contract.allowance(owner, self.address).call().await?)
    }

    /// Decoded RFQ events emitted in `[from_block, to_block]`.
    ///
    /// Logs that do not decode as an RFQ event are skipped.
    pub async fn logs(&self, from_block: u64, to_block: u64) -> Result<Vec<RfqLog>, ClientError> {
        let filter = Filter::new()
            .address(self.address)
            .from_block(from_block)
            .to_block(to_block);
        let logs = self
            .provider
            .get_logs(&filter)
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        Ok(decode_logs(logs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockProvider;

    #[test]
    fn test_reader_creation() {
        let address = Address::repeat_byte(0xa1);
        let reader = RfqReader::new(MockProvider, address);

        assert_eq!(reader.address(), address);
        assert_eq!(*reader.contract().address(), address);
    }
}
