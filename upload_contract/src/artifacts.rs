use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use ethers::{abi::Abi, types::Bytes};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::DeployError;

/// Default location of the compiled artifacts, shared with the web client.
pub const DEFAULT_ARTIFACTS_DIR: &str = "./client/src/artifacts";
pub const UPLOAD_CONTRACT_NAME: &str = "Upload";

/// A compiled contract as written by hardhat (`hh-sol-artifact-1`).
#[derive(Clone, Debug)]
pub struct ContractArtifact {
    pub contract_name: String,
    pub source_name: String,
    pub abi: Abi,
    pub bytecode: Bytes,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HardhatArtifact {
    contract_name: String,
    source_name: String,
    abi: Abi,
    // kept as text: unlinked bytecode holds `__$..$__` placeholders which aren't hex
    bytecode: String,
    #[serde(default)]
    link_references: Map<String, Value>,
}

pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// hardhat lays artifacts out as `<root>/<source name>/<contract name>.json`
    pub fn path_for(&self, contract_name: &str) -> PathBuf {
        self.root
            .join("contracts")
            .join(format!("{contract_name}.sol"))
            .join(format!("{contract_name}.json"))
    }

    pub fn load(&self, contract_name: &str) -> Result<ContractArtifact, DeployError> {
        let path = self.path_for(contract_name);
        tracing::debug!(path = %path.display(), "loading contract artifact");

        let raw = fs::read_to_string(&path).map_err(|e| {
            DeployError::artifact(
                &path,
                format!("{e} (has the contract been compiled?)"),
            )
        })?;

        parse_artifact(&path, contract_name, &raw)
    }
}

fn parse_artifact(
    path: &Path,
    contract_name: &str,
    raw: &str,
) -> Result<ContractArtifact, DeployError> {
    let artifact: HardhatArtifact =
        serde_json::from_str(raw).map_err(|e| DeployError::artifact(path, e))?;

    if artifact.contract_name != contract_name {
        return Err(DeployError::artifact(
            path,
            format!(
                "artifact is for contract '{}', expected '{contract_name}'",
                artifact.contract_name
            ),
        ));
    }

    if !artifact.link_references.is_empty() {
        let libraries: Vec<&str> = artifact.link_references.keys().map(String::as_str).collect();
        return Err(DeployError::artifact(
            path,
            format!("bytecode has unlinked libraries from {}", libraries.join(", ")),
        ));
    }

    let bytecode = Bytes::from_str(&artifact.bytecode).map_err(|e| DeployError::artifact(path, e))?;
    if bytecode.is_empty() {
        return Err(DeployError::artifact(
            path,
            "no creation bytecode (abstract contract or interface?)",
        ));
    }

    Ok(ContractArtifact {
        contract_name: artifact.contract_name,
        source_name: artifact.source_name,
        abi: artifact.abi,
        bytecode,
    })
}
