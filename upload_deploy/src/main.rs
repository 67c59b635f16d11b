mod config;
mod logging;

use std::{
    io::{self, Write},
    process::ExitCode,
};

use anyhow::Context;
use upload_contract::{
    artifacts::ArtifactStore,
    contracts::{ensure_chain_id, get_writer_ethers_client, upload::UploadContract, EtherSigner},
    deployer::{deploy_and_report, report_failure, EthersDeployer},
};

use crate::config::DeployConfig;

const LOAD_CONFIG_CONTEXT: &str = "loading network profile";

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let status = match prepare().await {
        Ok(deployer) => deploy_and_report(&deployer, &mut io::stdout(), &mut io::stderr()).await,
        Err(e) => startup_failure(&mut io::stderr(), &e),
    };

    ExitCode::from(status)
}

/// Everything up to, but not including, the creation transaction.
async fn prepare() -> anyhow::Result<EthersDeployer<EtherSigner>> {
    let config = DeployConfig::load().context(LOAD_CONFIG_CONTEXT)?;
    prepare_with(config).await
}

async fn prepare_with(config: DeployConfig) -> anyhow::Result<EthersDeployer<EtherSigner>> {
    tracing::info!(
        network = %config.network.name,
        chain_id = config.network.chain_id,
        artifacts = %config.artifacts_dir.display(),
        "deploying {}",
        config.contract_name
    );

    let store = ArtifactStore::new(&config.artifacts_dir);
    let contract = UploadContract::load_named(&store, &config.contract_name)?;

    let client = get_writer_ethers_client(&config.network)?;
    ensure_chain_id(client.as_ref(), config.network.chain_id).await?;

    tracing::info!(deployer = ?client.address(), "signer ready");

    Ok(EthersDeployer::new(contract, client).with_confirmations(config.confirmations))
}

/// Startup errors leave through the same stderr / exit status path as deploy errors.
fn startup_failure<E: Write>(stderr: &mut E, error: &anyhow::Error) -> u8 {
    report_failure(stderr, format!("{error:#}"))
}

#[cfg(test)]
mod tests {
    use anyhow::Context;
    use upload_contract::deployer::EXIT_FAILURE;

    use super::{prepare_with, startup_failure, LOAD_CONFIG_CONTEXT};
    use crate::config::DeployConfig;

    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_config_error_exits_with_failure() {
        let err = DeployConfig::from_lookup(|_| None)
            .context(LOAD_CONFIG_CONTEXT)
            .unwrap_err();

        let mut stderr = Vec::new();
        let status = startup_failure(&mut stderr, &err);

        assert_eq!(status, EXIT_FAILURE);
        let stderr = String::from_utf8(stderr).unwrap();
        assert!(stderr.contains(LOAD_CONFIG_CONTEXT));
        assert!(stderr.contains("ALCHEMY_API_URL"));
        assert_eq!(stderr.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_missing_artifact_fails_before_network() {
        let artifacts_dir = std::env::temp_dir()
            .join(format!("upload-deploy-no-artifacts-{}", std::process::id()));
        let artifacts_dir = artifacts_dir.to_string_lossy().into_owned();

        // nothing listens on port 9, reaching the node would fail differently
        let config = DeployConfig::from_lookup(|key| match key {
            "ALCHEMY_API_URL" => Some(String::from("http://127.0.0.1:9")),
            "PRIVATE_KEY" => Some(KEY.to_owned()),
            "ARTIFACTS_DIR" => Some(artifacts_dir.clone()),
            _ => None,
        })
        .unwrap();

        let err = match prepare_with(config).await {
            Ok(_) => panic!("deployment prepared without an artifact"),
            Err(e) => e,
        };

        let mut stderr = Vec::new();
        let status = startup_failure(&mut stderr, &err);

        assert_eq!(status, EXIT_FAILURE);
        let stderr = String::from_utf8(stderr).unwrap();
        assert!(stderr.contains("has the contract been compiled"));
        assert!(stderr.contains("Upload.json"));
    }
}
