//! Contract bindings.
//!
//! Function, event and error signatures must match the deployed contracts
//! byte for byte; field names only affect the generated Rust types.

use alloy::sol;

sol! {
    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface IWalletFactory {
        struct WalletView {
            string name;
            address addr;
            address[] signers;
            uint256 minimumApprovals;
            uint256 totalBalanceInUsd;
            uint256 totalLockedBalanceInUsd;
            uint256 totalUnlockedBalanceInUsd;
        }

        error WalletDoesNotExist();
        error WalletExceededMaximum();

        event WalletCreated(address indexed wallet, address[] signers);

        function getWalletAddressesBySigner(address signer, uint256 offset, uint256 limit) external view returns (address[] memory);
        function getNewestWalletsBySigner(address signer, uint256 offset, uint256 limit) external view returns (WalletView[] memory);
        function getWallet(address walletAddress) external view returns (WalletView memory);
        function createWallet(string name, address[] signers, uint256 minimumApprovals, bytes32 passwordHash) external returns (address);
    }
}

sol! {
    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface IMultisigWallet {
        struct TransactionView {
            bytes32 hash;
            address token;
            address to;
            uint256 value;
            uint256 valueInUsd;
            uint8 approvalCount;
            address[] approvers;
            uint256 createdAt;
            uint256 executedAt;
            uint256 cancelledAt;
        }

        struct TokenView {
            address addr;
            string name;
            string symbol;
            uint8 decimals;
            uint256 balance;
            uint256 balanceInUsd;
            uint256 priceInUsd;
        }

        // Validation
        error MustUseFunctionCall();
        error MustBeGreaterThanZero();
        error MustBeNonZeroAddress();
        error MustMatchEtherValue();
        // Wallet configuration
        error InsufficientSigners();
        error ExcessiveSigners();
        error DuplicateSigners();
        error OnlySigner();
        error InvalidPasswordHashLength();
        error PasswordHashMismatch();
        // Transactions
        error DepositFailed();
        error TransactionDoesNotExist();
        error TransactionAlreadyApproved();
        error TransactionNotApproved();
        error TransactionAlreadyRevoked();
        error TransactionNotRevoked();
        error TransactionAlreadyExecuted();
        error TransactionNotExecuted();
        error TransactionAlreadyCancelled();
        error TransactionNotCancelled();
        error TransactionLacksApprovals();
        error TransactionInsufficientBalance();
        error TransactionInsufficientUnlockedBalance();
        error TransactionFailed();

        event Deposited(address indexed sender, uint256 value);
        event TransactionCreated(bytes32 indexed txHash, address indexed to, uint256 value, address token);
        event TransactionApproved(bytes32 indexed txHash, address indexed approver);
        event TransactionRevoked(bytes32 indexed txHash, address indexed revoker);
        event TransactionCancelled(bytes32 indexed txHash, address indexed canceller);
        event TransactionExecuted(bytes32 indexed txHash, address indexed executor);

        function deposit(address token, uint256 value) external payable;
        function lockBalancedInUsd(uint256 usdAmount) external;
        function unlockBalanceInUsd(uint256 usdAmount, string password, string salt) external;

        function createTransaction(address token, address to, uint256 value) external returns (bytes32 txHash);
        function approveTransaction(bytes32 txHash) external;
        function revokeTransaction(bytes32 txHash) external;
        function cancelTransaction(bytes32 txHash) external;
        function executeTransaction(bytes32 txHash) external;
        function getNewestTransactions(uint256 offset, uint256 limit) external view returns (TransactionView[] memory);
        function getTransaction(bytes32 txHash) external view returns (TransactionView memory);

        function getTokens(uint256 offset, uint256 limit) external view returns (TokenView[] memory);
        function getToken(address token) external view returns (TokenView memory);
        function addToken(address token) external;
        function removeToken(address token) external;
        function getBalance(address token) external view returns (uint256 balance, uint256 balanceInUsd);
    }
}

sol! {
    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface IERC20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function approve(address spender, uint256 value) external returns (bool);
    }
}

sol! {
    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface IMulticall3 {
        struct Call3 {
            address target;
            bool allowFailure;
            bytes callData;
        }

        struct Call3Result {
            bool success;
            bytes returnData;
        }

        function aggregate3(Call3[] calldata calls) external payable returns (Call3Result[] memory returnData);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::hex;
    use alloy::sol_types::{SolCall, SolEvent};

    #[test]
    fn test_well_known_selectors() {
        assert_eq!(IERC20::nameCall::SELECTOR, hex!("06fdde03"));
        assert_eq!(IERC20::symbolCall::SELECTOR, hex!("95d89b41"));
        assert_eq!(IERC20::decimalsCall::SELECTOR, hex!("313ce567"));
        assert_eq!(IERC20::approveCall::SELECTOR, hex!("095ea7b3"));
        assert_eq!(IMulticall3::aggregate3Call::SELECTOR, hex!("82ad56cb"));
    }

    #[test]
    fn test_event_signatures() {
        assert_eq!(
            IWalletFactory::WalletCreated::SIGNATURE,
            "WalletCreated(address,address[])"
        );
        assert_eq!(
            IMultisigWallet::TransactionCreated::SIGNATURE,
            "TransactionCreated(bytes32,address,uint256,address)"
        );
        assert_eq!(
            IMultisigWallet::getNewestTransactionsCall::SIGNATURE,
            "getNewestTransactions(uint256,uint256)"
        );
    }
}
