//! RFQ contract bindings.
//!
//! The RFQ contract escrows a quote's source amount on the source chain,
//! pays the receiver on the destination chain and reconciles the two through
//! the message bus. The message bus interface lives here as well since it
//! shares the `RouteInfo` struct.

use alloy_sol_types::sol;

sol! {
    /// A cross-chain swap offer. Its packed keccak hash is the quote identity.
    #[derive(Debug, PartialEq, Eq, Hash)]
    struct Quote {
        uint64 srcChainId;
        address srcToken;
        uint256 srcAmount;
        uint64 dstChainId;
        address dstToken;
        uint256 dstAmount;
        uint64 deadline;
        uint64 nonce;
        address sender;
        address receiver;
        address refundTo;
        address liquidityProvider;
    }

    /// Provenance of a message delivered by the message bus (MsgDataTypes.RouteInfo).
    #[derive(Debug, PartialEq, Eq)]
    struct RouteInfo {
        address sender;
        address receiver;
        uint64 srcChainId;
        bytes32 srcTxHash;
    }

    /// RFQ - quote escrow, destination transfer and refund handling
    #[sol(rpc)]
    interface IRfq {
        event SrcDeposited(bytes32 hash, Quote detail, address srcRecipient, uint64 submissionDeadline);
        event SrcReleased(bytes32 hash, address srcRecipient, address srcToken, uint256 amount);
        event DstTransferred(bytes32 hash);
        event RefundInitiated(bytes32 hash);
        event Refunded(bytes32 hash, address refundTo, address srcToken, uint256 amount);
        event MessageReceived(bytes32 hash);
        event FeeCollected(address treasuryAddr, address token, uint256 amount);
        event FeePercUpdated(uint64[] chainIds, uint32[] feePercs);
        event RfqContractsUpdated(uint64[] chainIds, address[] remoteRfqContracts);
        event TreasuryAddrUpdated(address treasuryAddr);
        event MessageBusUpdated(address messageBus);
        event Paused(address account);
        event Unpaused(address account);
        event PauserAdded(address account);
        event PauserRemoved(address account);
        event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);

        /// Lock the quote's source amount and notify the destination chain
        function srcDeposit(Quote calldata _quote, uint64 _submissionDeadline) external payable returns (bytes32);

        /// Pay the receiver on the destination chain
        function dstTransfer(Quote calldata _quote) external payable;

        /// Release the escrow to the liquidity provider once the transfer is relayed
        function srcRelease(
            Quote calldata _quote,
            bytes calldata _message,
            RouteInfo calldata _route,
            bytes[] calldata _sigs,
            address[] calldata _signers,
            uint256[] calldata _powers
        ) external;

        /// Mark an expired quote as refundable and notify the source chain
        function requestRefund(
            Quote calldata _quote,
            bytes calldata _message,
            RouteInfo calldata _route,
            bytes[] calldata _sigs,
            address[] calldata _signers,
            uint256[] calldata _powers
        ) external payable;

        /// Return the escrow to the quote's refund address
        function executeRefund(
            Quote calldata _quote,
            bytes calldata _message,
            RouteInfo calldata _route,
            bytes[] calldata _sigs,
            address[] calldata _signers,
            uint256[] calldata _powers
        ) external;

        function collectFee(address _token, uint256 _amount) external;
        function setFeePerc(uint64[] calldata _chainIds, uint32[] calldata _feePercs) external;
        function setRemoteRfqContracts(uint64[] calldata _chainIds, address[] calldata _remoteRfqContracts) external;
        function setTreasuryAddr(address _treasuryAddr) external;
        function setMessageBus(address _messageBus) external;
        function pause() external;
        function unpause() external;
        function addPauser(address account) external;
        function removePauser(address account) external;
        function renouncePauser() external;
        function transferOwnership(address newOwner) external;

        function getQuoteHash(Quote calldata _quote) external pure returns (bytes32);
        function getRFQFee(uint64 _dstChainId, uint256 _amount) external view returns (uint256);
        function quotes(bytes32 hash) external view returns (bool);
        function executedQuotes(bytes32 hash) external view returns (bool);
        function unconsumedMsg(bytes32 hash) external view returns (bool);
        function feePercGlobal() external view returns (uint32);
        function feePercOverride(uint64 chainId) external view returns (uint32);
        function remoteRfqContracts(uint64 chainId) external view returns (address);
        function treasuryAddr() external view returns (address);
        function messageBus() external view returns (address);
        function paused() external view returns (bool);
        function pausers(address account) external view returns (bool);
        function owner() external view returns (address);
    }

    /// MessageBus - verifies validator signatures and dispatches inbound messages
    #[sol(rpc)]
    interface IMessageBus {
        function executeMessage(
            bytes calldata _message,
            RouteInfo calldata _route,
            bytes[] calldata _sigs,
            address[] calldata _signers,
            uint256[] calldata _powers
        ) external payable;

        /// Execution status of a message id (0 = never executed)
        function executedMessages(bytes32 messageId) external view returns (uint8);
    }
}
