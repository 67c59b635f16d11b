use std::{fmt::Display, io::Write, sync::Arc};

use ethers::{
    providers::Middleware,
    types::{Address, H256, U64},
};

use crate::{contracts::upload::UploadContract, error::DeployError};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// What is left of a contract once it is on chain.
#[derive(Clone, Debug, PartialEq)]
pub struct Deployment {
    pub address: Address,
    pub transaction_hash: Option<H256>,
    pub block_number: Option<u64>,
}

/// Submits one contract creation and waits for it to be confirmed.
#[allow(async_fn_in_trait)]
pub trait Deployer {
    async fn deploy(&self) -> Result<Deployment, DeployError>;
}

pub struct EthersDeployer<M> {
    contract: UploadContract,
    client: Arc<M>,
    confirmations: usize,
}

impl<M> EthersDeployer<M>
where
    M: Middleware + 'static,
{
    pub fn new(contract: UploadContract, client: Arc<M>) -> Self {
        Self {
            contract,
            client,
            confirmations: 1,
        }
    }

    /// Blocks to wait for on top of the inclusion block.
    pub fn with_confirmations(mut self, confirmations: usize) -> Self {
        self.confirmations = confirmations;
        self
    }
}

impl<M> Deployer for EthersDeployer<M>
where
    M: Middleware + 'static,
{
    async fn deploy(&self) -> Result<Deployment, DeployError> {
        let factory = self.contract.factory_with_client(self.client.clone());

        tracing::info!(
            contract = self.contract.name(),
            confirmations = self.confirmations,
            "submitting contract creation"
        );

        let (instance, receipt) = factory
            .deploy(())
            .map_err(|e| DeployError::Deployment(e.to_string()))?
            .confirmations(self.confirmations)
            .send_with_receipt()
            .await
            .map_err(|e| DeployError::Deployment(e.to_string()))?;

        // mined but reverted creations still come back with a contract address
        if receipt.status != Some(U64::one()) {
            return Err(DeployError::Deployment(format!(
                "contract creation {:?} reverted",
                receipt.transaction_hash
            )));
        }

        let deployment = Deployment {
            address: instance.address(),
            transaction_hash: Some(receipt.transaction_hash),
            block_number: receipt.block_number.map(|n| n.as_u64()),
        };

        tracing::info!(
            address = ?deployment.address,
            tx = ?deployment.transaction_hash,
            block = ?deployment.block_number,
            gas_used = ?receipt.gas_used,
            "contract creation confirmed"
        );

        Ok(deployment)
    }
}

/// Runs a single deployment and reports it: the address line on `stdout`, or the
/// full error on `stderr`. Returns the process exit status.
pub async fn deploy_and_report<D, O, E>(deployer: &D, stdout: &mut O, stderr: &mut E) -> u8
where
    D: Deployer,
    O: Write,
    E: Write,
{
    match deployer.deploy().await {
        Ok(deployment) => {
            // debug fmt of an address is the full '0x..' hex encoding
            match writeln!(stdout, "contract deployed at {:?}", deployment.address) {
                Ok(()) => EXIT_SUCCESS,
                Err(e) => report_failure(stderr, format!("could not write result: {e}")),
            }
        }
        Err(e) => report_failure(stderr, e),
    }
}

pub fn report_failure<E: Write>(stderr: &mut E, error: impl Display) -> u8 {
    // nothing else left to tell the user through if stderr is gone
    let _ = writeln!(stderr, "{error}");
    EXIT_FAILURE
}
