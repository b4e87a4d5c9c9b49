use alloy_primitives::Address;

/// Transaction environment of an engine call: `msg.sender` and
/// `block.timestamp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    pub timestamp: u64,
}

impl CallContext {
    pub const fn new(caller: Address, timestamp: u64) -> Self {
        Self { caller, timestamp }
    }
}
