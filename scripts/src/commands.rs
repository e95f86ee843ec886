//! Implementations of the deploy script commands

use tracing::info;

use crate::{
    artifacts::ArtifactStore,
    backend::RpcBackend,
    cli::{DeployArgs, PlanArgs},
    errors::ScriptError,
    runner::DeploymentRunner,
    steps::deployment_plan,
    utils::setup_client,
};

/// Deploy every marketplace contract and wire them together
pub async fn deploy(
    args: DeployArgs,
    priv_key: Option<&str>,
    rpc_url: &str,
) -> Result<(), ScriptError> {
    let priv_key = priv_key.ok_or_else(|| {
        ScriptError::ClientInitialization(
            "no deployer private key, pass --priv-key or set PKEY".to_string(),
        )
    })?;
    let (owner, flat_fee) = args.wiring.parse()?;

    // Load every artifact up front so that a missing one doesn't leave a partial deployment
    let bytecodes = ArtifactStore::new(&args.artifacts_dir).load_all()?;

    let (client, deployer) = setup_client(priv_key, rpc_url).await?;
    info!("deploying marketplace contracts from {:#x}", deployer);

    let backend = RpcBackend::new(client, bytecodes, args.confirmations);
    let mut runner = DeploymentRunner::new(backend);
    if let Some(path) = args.deployments_path {
        runner = runner.with_deployments_path(path);
    }

    let deployments = runner.run(&deployment_plan(owner, flat_fee)).await?;

    println!();
    for (contract, address) in deployments.iter() {
        println!("{:>14}: {:#x}", contract.artifact_name(), address);
    }

    Ok(())
}

/// Print the ordered steps of the deployment plan
pub fn print_plan(args: PlanArgs) -> Result<(), ScriptError> {
    let (owner, flat_fee) = args.wiring.parse()?;

    for (i, step) in deployment_plan(owner, flat_fee).iter().enumerate() {
        println!("{:>2}. {}", i + 1, step);
    }

    Ok(())
}
