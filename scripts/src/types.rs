//! Type definitions used throughout the scripts

use std::{
    collections::BTreeMap,
    fmt::{self, Display},
};

use alloy_primitives::Address;

use crate::{
    constants::{
        GIFT_CONTRACT_KEY, MAIN_CONTRACT_KEY, MARKET_FACTORY_CONTRACT_KEY,
        REDEEM_AND_FEE_CONTRACT_KEY, SERVICE_MARKET_CONTRACT_KEY,
    },
    errors::ScriptError,
};

/// The contracts making up the marketplace.
///
/// Variants are declared in deployment order, which is also their ordering.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarketplaceContract {
    /// The redemption & fee contract
    RedeemAndFee,
    /// The market factory contract
    MarketFactory,
    /// The main marketplace contract
    Main,
    /// The service marketplace contract
    ServiceMarket,
    /// The gift contract
    Gift,
}

impl MarketplaceContract {
    /// All marketplace contracts, in deployment order
    pub const ALL: [MarketplaceContract; 5] = [
        MarketplaceContract::RedeemAndFee,
        MarketplaceContract::MarketFactory,
        MarketplaceContract::Main,
        MarketplaceContract::ServiceMarket,
        MarketplaceContract::Gift,
    ];

    /// The Solidity contract name, which also names its compiled artifact
    pub fn artifact_name(&self) -> &'static str {
        match self {
            MarketplaceContract::RedeemAndFee => "RedeemAndFee",
            MarketplaceContract::MarketFactory => "MarketFactory",
            MarketplaceContract::Main => "Main",
            MarketplaceContract::ServiceMarket => "ServiceMarket",
            MarketplaceContract::Gift => "Gift",
        }
    }

    /// The key under which the contract's address is written to the deployments file
    pub fn deployments_key(&self) -> &'static str {
        match self {
            MarketplaceContract::RedeemAndFee => REDEEM_AND_FEE_CONTRACT_KEY,
            MarketplaceContract::MarketFactory => MARKET_FACTORY_CONTRACT_KEY,
            MarketplaceContract::Main => MAIN_CONTRACT_KEY,
            MarketplaceContract::ServiceMarket => SERVICE_MARKET_CONTRACT_KEY,
            MarketplaceContract::Gift => GIFT_CONTRACT_KEY,
        }
    }
}

impl Display for MarketplaceContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketplaceContract::RedeemAndFee => write!(f, "redeem-and-fee"),
            MarketplaceContract::MarketFactory => write!(f, "market-factory"),
            MarketplaceContract::Main => write!(f, "main"),
            MarketplaceContract::ServiceMarket => write!(f, "service-market"),
            MarketplaceContract::Gift => write!(f, "gift"),
        }
    }
}

/// The addresses of the contracts deployed so far in a single run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deployments {
    /// The deployed addresses, keyed by contract
    addresses: BTreeMap<MarketplaceContract, Address>,
}

impl Deployments {
    /// Record the address at which a contract was deployed
    pub fn record(&mut self, contract: MarketplaceContract, address: Address) {
        self.addresses.insert(contract, address);
    }

    /// Get the address of a deployed contract.
    ///
    /// Errors if the contract has not been deployed, or was recorded at the zero address.
    pub fn address(&self, contract: MarketplaceContract) -> Result<Address, ScriptError> {
        match self.addresses.get(&contract) {
            Some(address) if !address.is_zero() => Ok(*address),
            _ => Err(ScriptError::MissingDeployment(contract)),
        }
    }

    /// Iterate over the deployed contracts in deployment order
    pub fn iter(&self) -> impl Iterator<Item = (MarketplaceContract, Address)> + '_ {
        self.addresses.iter().map(|(c, a)| (*c, *a))
    }

    /// The number of contracts deployed
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Whether no contracts have been deployed
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}
