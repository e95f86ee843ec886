//! Sequential execution of a deployment plan

use std::path::PathBuf;

use tracing::{debug, info};

use crate::{
    backend::DeployBackend,
    errors::ScriptError,
    steps::{validate_plan, DeployStep},
    types::Deployments,
    utils::write_deployed_address,
};

/// Executes deployment plans step by step against a backend, halting on the first failure
pub struct DeploymentRunner<B> {
    /// The backend through which transactions are sent
    backend: B,
    /// Where to record deployed addresses, if anywhere
    deployments_path: Option<PathBuf>,
}

impl<B: DeployBackend> DeploymentRunner<B> {
    /// Create a runner over the given backend
    pub fn new(backend: B) -> Self {
        Self { backend, deployments_path: None }
    }

    /// Record every deployed address in the given deployments file
    pub fn with_deployments_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.deployments_path = Some(path.into());
        self
    }

    /// The backend through which transactions are sent
    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run the plan to completion, returning the addresses of the deployed contracts.
    ///
    /// Each step is only issued once the previous one has been confirmed. No step
    /// after a failed one is issued, and steps already confirmed are not undone.
    pub async fn run(&self, plan: &[DeployStep]) -> Result<Deployments, ScriptError> {
        validate_plan(plan)?;

        let mut deployments = Deployments::default();
        let mut num_calls = 0;
        for (i, step) in plan.iter().enumerate() {
            debug!("step {}/{}: {}", i + 1, plan.len(), step);

            match step {
                DeployStep::Deploy(contract) => {
                    let address = self.backend.deploy(*contract).await?;
                    if address.is_zero() {
                        return Err(ScriptError::ContractDeployment(format!(
                            "{contract}: deployed at the zero address"
                        )));
                    }
                    deployments.record(*contract, address);

                    info!("{} deployed", contract);
                    println!("{} contract deployed at {:#x}", contract.artifact_name(), address);

                    if let Some(path) = &self.deployments_path {
                        write_deployed_address(path, contract.deployments_key(), address)?;
                    }
                }
                DeployStep::Configure(call) => {
                    let target = deployments.address(call.target())?;
                    let calldata = call.calldata(&deployments)?;

                    let tx_hash = self.backend.call(target, calldata).await?;
                    info!("{} confirmed in {:#x}", call, tx_hash);
                    println!("==={}=== {}", num_calls, call);
                    num_calls += 1;
                }
            }
        }

        Ok(deployments)
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Mutex};

    use alloy_primitives::{Address, Bytes, TxHash, U256};
    use alloy_sol_types::SolCall;
    use eyre::Result;
    use tempfile::tempdir;

    use crate::{
        backend::DeployBackend,
        errors::ScriptError,
        solidity::{IGift, IMain, IMarketFactory, IRedeemAndFee, IServiceMarket},
        steps::deployment_plan,
        types::MarketplaceContract,
    };

    use super::DeploymentRunner;

    /// The owner used in the tests
    const OWNER: Address = Address::with_last_byte(0x0e);

    /// The flat fee used in the tests
    const FLAT_FEE: U256 = U256::from_limbs([1_000_000_000_000_000, 0, 0, 0]);

    /// A transaction observed by the mock backend
    #[derive(Debug, Clone, PartialEq)]
    enum Observed {
        /// A contract deployment
        Deploy(MarketplaceContract, Address),
        /// A configuration call
        Call(Address, Bytes),
    }

    /// An in-memory backend which deploys to `CREATE` addresses of a fixed deployer
    /// and confirms every transaction instantly
    #[derive(Default)]
    struct MockBackend {
        /// Every transaction issued, in order
        observed: Mutex<Vec<Observed>>,
        /// The deployer's nonce
        nonce: Mutex<u64>,
        /// Fail the configuration call with this (zero-based) index
        fail_call: Option<usize>,
        /// Fail the deployment of this contract
        fail_deploy: Option<MarketplaceContract>,
    }

    impl MockBackend {
        /// The transactions issued so far
        fn observed(&self) -> Vec<Observed> {
            self.observed.lock().unwrap().clone()
        }

        /// The configuration calls issued so far
        fn calls(&self) -> Vec<(Address, Bytes)> {
            self.observed()
                .into_iter()
                .filter_map(|o| match o {
                    Observed::Call(target, data) => Some((target, data)),
                    Observed::Deploy(..) => None,
                })
                .collect()
        }

        /// The number of configuration calls issued so far
        fn num_calls(&self) -> usize {
            self.calls().len()
        }
    }

    impl DeployBackend for MockBackend {
        async fn deploy(&self, contract: MarketplaceContract) -> Result<Address, ScriptError> {
            if self.fail_deploy == Some(contract) {
                return Err(ScriptError::ContractDeployment("insufficient funds".to_string()));
            }

            let mut nonce = self.nonce.lock().unwrap();
            let address = Address::with_last_byte(0xde).create(*nonce);
            *nonce += 1;

            self.observed.lock().unwrap().push(Observed::Deploy(contract, address));
            Ok(address)
        }

        async fn call(&self, target: Address, calldata: Bytes) -> Result<TxHash, ScriptError> {
            if self.fail_call == Some(self.num_calls()) {
                return Err(ScriptError::ContractInteraction("execution reverted".to_string()));
            }

            *self.nonce.lock().unwrap() += 1;
            self.observed.lock().unwrap().push(Observed::Call(target, calldata));
            Ok(TxHash::with_last_byte(self.num_calls() as u8))
        }
    }

    #[tokio::test]
    async fn test_full_run_order() -> Result<()> {
        let runner = DeploymentRunner::new(MockBackend::default());
        let deployments = runner.run(&deployment_plan(OWNER, FLAT_FEE)).await?;

        let observed = runner.backend().observed();
        assert_eq!(observed.len(), 13);

        // All five deploys come first, in order
        let deployed: Vec<_> = observed[..5]
            .iter()
            .map(|o| match o {
                Observed::Deploy(c, _) => *c,
                Observed::Call(..) => panic!("call issued before all deploys"),
            })
            .collect();
        assert_eq!(deployed, MarketplaceContract::ALL.to_vec());
        assert_eq!(deployments.len(), 5);

        let redeem = deployments.address(MarketplaceContract::RedeemAndFee)?;
        let factory = deployments.address(MarketplaceContract::MarketFactory)?;
        let main = deployments.address(MarketplaceContract::Main)?;
        let service = deployments.address(MarketplaceContract::ServiceMarket)?;
        let gift = deployments.address(MarketplaceContract::Gift)?;

        let expected: Vec<(Address, Vec<u8>)> = vec![
            (factory, IMarketFactory::initializeCall { owner: OWNER }.abi_encode()),
            (factory, IMarketFactory::setMarketplaceCall { marketplace: main }.abi_encode()),
            (redeem, IRedeemAndFee::setFlatFeeCall { fee: FLAT_FEE }.abi_encode()),
            (main, IMain::setMarketFactoryCall { factory }.abi_encode()),
            (main, IMain::setRedeemFeeContractCall { redeemFee: redeem }.abi_encode()),
            (service, IServiceMarket::setRedeemFeeContractCall { redeemFee: redeem }.abi_encode()),
            (gift, IGift::setMarketPlaceCall { marketplace: main }.abi_encode()),
            (redeem, IRedeemAndFee::setMarketPlaceCall { marketplace: main }.abi_encode()),
        ];
        let calls: Vec<(Address, Vec<u8>)> =
            runner.backend().calls().into_iter().map(|(t, d)| (t, d.to_vec())).collect();
        assert_eq!(calls, expected);

        Ok(())
    }

    #[tokio::test]
    async fn test_no_zero_address_referenced() -> Result<()> {
        let runner = DeploymentRunner::new(MockBackend::default());
        runner.run(&deployment_plan(OWNER, FLAT_FEE)).await?;

        let zero_word = [0u8; 32];
        for (target, data) in runner.backend().calls() {
            assert!(!target.is_zero());
            // Every call takes exactly one static argument
            assert_eq!(data.len(), 4 + 32);
            assert_ne!(&data[4..], zero_word.as_slice());
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_failure_at_flat_fee_aborts() {
        let backend = MockBackend { fail_call: Some(2), ..Default::default() };
        let runner = DeploymentRunner::new(backend);

        let res = runner.run(&deployment_plan(OWNER, FLAT_FEE)).await;

        assert!(matches!(res, Err(ScriptError::ContractInteraction(_))));
        assert_eq!(runner.backend().num_calls(), 2);
        assert_eq!(runner.backend().observed().len(), 5 + 2);
    }

    #[tokio::test]
    async fn test_failed_deploy_aborts() {
        let backend =
            MockBackend { fail_deploy: Some(MarketplaceContract::Main), ..Default::default() };
        let runner = DeploymentRunner::new(backend);

        let res = runner.run(&deployment_plan(OWNER, FLAT_FEE)).await;

        assert!(matches!(res, Err(ScriptError::ContractDeployment(_))));
        // Only `RedeemAndFee` and `MarketFactory` were deployed, nothing was configured
        assert_eq!(runner.backend().observed().len(), 2);
        assert_eq!(runner.backend().num_calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_plan_issues_nothing() {
        let mut plan = deployment_plan(OWNER, FLAT_FEE);
        // Move the `Gift` deploy after the configuration calls
        let gift = plan.remove(4);
        plan.push(gift);

        let runner = DeploymentRunner::new(MockBackend::default());
        let res = runner.run(&plan).await;

        assert_eq!(res, Err(ScriptError::MissingDeployment(MarketplaceContract::Gift)));
        assert!(runner.backend().observed().is_empty());
    }

    #[tokio::test]
    async fn test_reruns_deploy_fresh_instances() -> Result<()> {
        let runner = DeploymentRunner::new(MockBackend::default());
        let plan = deployment_plan(OWNER, FLAT_FEE);

        let first = runner.run(&plan).await?;
        let second = runner.run(&plan).await?;

        let addresses: HashSet<Address> =
            first.iter().chain(second.iter()).map(|(_, addr)| addr).collect();
        assert_eq!(addresses.len(), 10);

        Ok(())
    }

    #[tokio::test]
    async fn test_writes_deployments_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("deployments.json");

        let runner = DeploymentRunner::new(MockBackend::default()).with_deployments_path(&path);
        let deployments = runner.run(&deployment_plan(OWNER, FLAT_FEE)).await?;

        for (contract, address) in deployments.iter() {
            let recorded =
                crate::utils::parse_addr_from_deployments_file(&path, contract.deployments_key())?;
            assert_eq!(recorded, address);
        }

        Ok(())
    }
}
