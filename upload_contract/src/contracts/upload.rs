use std::sync::Arc;

use ethers::{contract::ContractFactory, providers::Middleware};

use crate::{
    artifacts::{ArtifactStore, ContractArtifact, UPLOAD_CONTRACT_NAME},
    error::DeployError,
};

/// The compiled `Upload` contract, ready to be bound to a client.
#[derive(Clone, Debug)]
pub struct UploadContract {
    artifact: ContractArtifact,
}

impl UploadContract {
    pub fn new(artifact: ContractArtifact) -> Self {
        Self { artifact }
    }

    pub fn load(store: &ArtifactStore) -> Result<Self, DeployError> {
        Self::load_named(store, UPLOAD_CONTRACT_NAME)
    }

    /// Load a differently named build of the contract (e.g. a renamed test deployment).
    pub fn load_named(store: &ArtifactStore, contract_name: &str) -> Result<Self, DeployError> {
        store.load(contract_name).map(Self::new)
    }

    pub fn name(&self) -> &str {
        &self.artifact.contract_name
    }

    pub fn artifact(&self) -> &ContractArtifact {
        &self.artifact
    }

    pub fn factory_with_client<M: Middleware>(&self, client: Arc<M>) -> ContractFactory<M> {
        ContractFactory::new(
            self.artifact.abi.clone(),
            self.artifact.bytecode.clone(),
            client,
        )
    }
}
