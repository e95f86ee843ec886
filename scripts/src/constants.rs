//! Constants used in the deploy scripts

/// The default RPC URL, that of a local Hardhat / Anvil node
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// The default owner passed to `MarketFactory.initialize`
pub const DEFAULT_OWNER_ADDRESS: &str = "0xf827c3E5fD68e78aa092245D442398E12988901C";

/// The default flat fee set on the `RedeemAndFee` contract, in wei (0.001 ether)
pub const DEFAULT_FLAT_FEE: &str = "1000000000000000";

/// The default directory containing the compiled contract artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The default number of confirmations to wait for on every transaction
pub const DEFAULT_NUM_CONFIRMATIONS: u64 = 1;

/// The directory under which Hardhat nests the artifacts of project sources
pub const HARDHAT_SOURCES_DIR: &str = "contracts";

/// The extension of a Solidity source file, used as the artifact directory suffix
pub const SOLIDITY_EXTENSION: &str = "sol";

/// The extension of a compiled contract artifact
pub const ARTIFACT_EXTENSION: &str = "json";

/// The creation bytecode key in a compiled contract artifact
pub const BYTECODE_KEY: &str = "bytecode";

/// The key nesting the hex bytecode in a Foundry artifact
pub const BYTECODE_OBJECT_KEY: &str = "object";

/// The deployments key in the `deployments.json` file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The `RedeemAndFee` contract key in the `deployments.json` file
pub const REDEEM_AND_FEE_CONTRACT_KEY: &str = "redeem_and_fee_contract";

/// The `MarketFactory` contract key in the `deployments.json` file
pub const MARKET_FACTORY_CONTRACT_KEY: &str = "market_factory_contract";

/// The `Main` marketplace contract key in the `deployments.json` file
pub const MAIN_CONTRACT_KEY: &str = "main_contract";

/// The `ServiceMarket` contract key in the `deployments.json` file
pub const SERVICE_MARKET_CONTRACT_KEY: &str = "service_market_contract";

/// The `Gift` contract key in the `deployments.json` file
pub const GIFT_CONTRACT_KEY: &str = "gift_contract";

/// The interval at which transaction receipts and the chain tip are polled
pub const RECEIPT_POLL_INTERVAL_MS: u64 = 100;
