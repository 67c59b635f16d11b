use std::sync::Arc;

use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::LocalWallet,
    types::U256,
};

use crate::{config::NetworkProfile, error::DeployError};

pub mod upload;

pub type EtherSigner = SignerMiddleware<Provider<Http>, LocalWallet>;

pub fn get_writer_ethers_client(profile: &NetworkProfile) -> Result<Arc<EtherSigner>, DeployError> {
    let wallet = profile.wallet()?;

    let provider = Provider::<Http>::try_from(profile.rpc_url.as_str())
        .map_err(|e| DeployError::Config(format!("could not build rpc provider: {e}")))?;

    Ok(Arc::new(SignerMiddleware::new(provider, wallet)))
}

/// Checks the endpoint actually serves the chain the profile signs for.
pub async fn ensure_chain_id<M: Middleware>(client: &M, expected: u64) -> Result<(), DeployError> {
    let actual = client
        .get_chainid()
        .await
        .map_err(|e| DeployError::Deployment(format!("could not query chain id: {e}")))?;

    if actual != U256::from(expected) {
        return Err(DeployError::Config(format!(
            "rpc endpoint serves chain id {actual}, profile expects {expected}"
        )));
    }

    Ok(())
}
