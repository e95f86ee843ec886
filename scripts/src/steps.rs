//! The ordered plan of deployments and configuration calls that stands up the marketplace.
//!
//! Every configuration call declares the contract it targets and the contracts whose
//! addresses it consumes, so that the plan can be checked for ordering before any
//! transaction is sent.

use std::{
    collections::HashSet,
    fmt::{self, Display},
    iter,
};

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;

use crate::{
    errors::ScriptError,
    solidity::{IGift, IMain, IMarketFactory, IRedeemAndFee, IServiceMarket},
    types::{Deployments, MarketplaceContract},
};

/// A configuration call wiring deployed contracts together
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigCall {
    /// `MarketFactory.initialize(owner)`
    InitializeFactory {
        /// The owner of the market factory
        owner: Address,
    },
    /// `MarketFactory.setMarketplace(Main)`
    SetFactoryMarketplace,
    /// `RedeemAndFee.setFlatFee(fee)`
    SetFlatFee {
        /// The flat fee, in wei
        fee: U256,
    },
    /// `Main.setMarketFactory(MarketFactory)`
    SetMainMarketFactory,
    /// `Main.setRedeemFeeContract(RedeemAndFee)`
    SetMainRedeemFeeContract,
    /// `ServiceMarket.setRedeemFeeContract(RedeemAndFee)`
    SetServiceMarketRedeemFeeContract,
    /// `Gift.setMarketPlace(Main)`
    SetGiftMarketplace,
    /// `RedeemAndFee.setMarketPlace(Main)`
    SetRedeemMarketplace,
}

impl ConfigCall {
    /// The contract on which the method is called
    pub fn target(&self) -> MarketplaceContract {
        match self {
            ConfigCall::InitializeFactory { .. } | ConfigCall::SetFactoryMarketplace => {
                MarketplaceContract::MarketFactory
            }
            ConfigCall::SetFlatFee { .. } | ConfigCall::SetRedeemMarketplace => {
                MarketplaceContract::RedeemAndFee
            }
            ConfigCall::SetMainMarketFactory | ConfigCall::SetMainRedeemFeeContract => {
                MarketplaceContract::Main
            }
            ConfigCall::SetServiceMarketRedeemFeeContract => MarketplaceContract::ServiceMarket,
            ConfigCall::SetGiftMarketplace => MarketplaceContract::Gift,
        }
    }

    /// The contracts whose addresses are passed as arguments to the method
    pub fn dependencies(&self) -> &'static [MarketplaceContract] {
        match self {
            ConfigCall::InitializeFactory { .. } | ConfigCall::SetFlatFee { .. } => &[],
            ConfigCall::SetFactoryMarketplace
            | ConfigCall::SetGiftMarketplace
            | ConfigCall::SetRedeemMarketplace => &[MarketplaceContract::Main],
            ConfigCall::SetMainMarketFactory => &[MarketplaceContract::MarketFactory],
            ConfigCall::SetMainRedeemFeeContract
            | ConfigCall::SetServiceMarketRedeemFeeContract => {
                &[MarketplaceContract::RedeemAndFee]
            }
        }
    }

    /// The Solidity signature of the method
    pub fn signature(&self) -> &'static str {
        match self {
            ConfigCall::InitializeFactory { .. } => IMarketFactory::initializeCall::SIGNATURE,
            ConfigCall::SetFactoryMarketplace => IMarketFactory::setMarketplaceCall::SIGNATURE,
            ConfigCall::SetFlatFee { .. } => IRedeemAndFee::setFlatFeeCall::SIGNATURE,
            ConfigCall::SetMainMarketFactory => IMain::setMarketFactoryCall::SIGNATURE,
            ConfigCall::SetMainRedeemFeeContract => IMain::setRedeemFeeContractCall::SIGNATURE,
            ConfigCall::SetServiceMarketRedeemFeeContract => {
                IServiceMarket::setRedeemFeeContractCall::SIGNATURE
            }
            ConfigCall::SetGiftMarketplace => IGift::setMarketPlaceCall::SIGNATURE,
            ConfigCall::SetRedeemMarketplace => IRedeemAndFee::setMarketPlaceCall::SIGNATURE,
        }
    }

    /// ABI-encode the call, resolving the addresses it consumes from the given deployments
    pub fn calldata(&self, deployments: &Deployments) -> Result<Bytes, ScriptError> {
        let calldata = match self {
            ConfigCall::InitializeFactory { owner } => {
                if owner.is_zero() {
                    return Err(ScriptError::CalldataConstruction(
                        "market factory owner is the zero address".to_string(),
                    ));
                }
                IMarketFactory::initializeCall { owner: *owner }.abi_encode()
            }
            ConfigCall::SetFactoryMarketplace => IMarketFactory::setMarketplaceCall {
                marketplace: deployments.address(MarketplaceContract::Main)?,
            }
            .abi_encode(),
            ConfigCall::SetFlatFee { fee } => {
                IRedeemAndFee::setFlatFeeCall { fee: *fee }.abi_encode()
            }
            ConfigCall::SetMainMarketFactory => IMain::setMarketFactoryCall {
                factory: deployments.address(MarketplaceContract::MarketFactory)?,
            }
            .abi_encode(),
            ConfigCall::SetMainRedeemFeeContract => IMain::setRedeemFeeContractCall {
                redeemFee: deployments.address(MarketplaceContract::RedeemAndFee)?,
            }
            .abi_encode(),
            ConfigCall::SetServiceMarketRedeemFeeContract => {
                IServiceMarket::setRedeemFeeContractCall {
                    redeemFee: deployments.address(MarketplaceContract::RedeemAndFee)?,
                }
                .abi_encode()
            }
            ConfigCall::SetGiftMarketplace => IGift::setMarketPlaceCall {
                marketplace: deployments.address(MarketplaceContract::Main)?,
            }
            .abi_encode(),
            ConfigCall::SetRedeemMarketplace => IRedeemAndFee::setMarketPlaceCall {
                marketplace: deployments.address(MarketplaceContract::Main)?,
            }
            .abi_encode(),
        };

        Ok(calldata.into())
    }
}

impl Display for ConfigCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.target().artifact_name(), self.signature())
    }
}

/// A single step of the deployment plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployStep {
    /// Deploy a fresh instance of the contract
    Deploy(MarketplaceContract),
    /// Call a configuration method on an already-deployed contract
    Configure(ConfigCall),
}

impl Display for DeployStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployStep::Deploy(contract) => write!(f, "deploy {}", contract.artifact_name()),
            DeployStep::Configure(call) => write!(f, "call {}", call),
        }
    }
}

/// Build the plan that deploys every marketplace contract and wires them together
pub fn deployment_plan(owner: Address, flat_fee: U256) -> Vec<DeployStep> {
    let deploys = MarketplaceContract::ALL.into_iter().map(DeployStep::Deploy);

    let calls = [
        ConfigCall::InitializeFactory { owner },
        ConfigCall::SetFactoryMarketplace,
        ConfigCall::SetFlatFee { fee: flat_fee },
        ConfigCall::SetMainMarketFactory,
        ConfigCall::SetMainRedeemFeeContract,
        ConfigCall::SetServiceMarketRedeemFeeContract,
        ConfigCall::SetGiftMarketplace,
        ConfigCall::SetRedeemMarketplace,
    ]
    .into_iter()
    .map(DeployStep::Configure);

    deploys.chain(calls).collect()
}

/// Check that every configuration call in the plan only targets and consumes
/// contracts deployed by an earlier step
pub fn validate_plan(plan: &[DeployStep]) -> Result<(), ScriptError> {
    let mut deployed = HashSet::new();
    for step in plan {
        match step {
            DeployStep::Deploy(contract) => {
                deployed.insert(*contract);
            }
            DeployStep::Configure(call) => {
                let mut required =
                    iter::once(call.target()).chain(call.dependencies().iter().copied());
                if let Some(missing) = required.find(|c| !deployed.contains(c)) {
                    return Err(ScriptError::MissingDeployment(missing));
                }
            }
        }
    }

    Ok(())
}
