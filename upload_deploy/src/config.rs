use std::path::PathBuf;

use upload_contract::{
    artifacts::{DEFAULT_ARTIFACTS_DIR, UPLOAD_CONTRACT_NAME},
    config::{Credential, NetworkProfile, HOLESKY_CHAIN_ID, HOLESKY_NETWORK_NAME},
    error::DeployError,
};

const RPC_URL_ENV_VAR: &str = "ALCHEMY_API_URL";
const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";
const MNEMONIC_ENV_VAR: &str = "MNEMONIC";
const MNEMONIC_INDEX_ENV_VAR: &str = "MNEMONIC_INDEX";
const CHAIN_ID_ENV_VAR: &str = "CHAIN_ID";
const NETWORK_NAME_ENV_VAR: &str = "NETWORK_NAME";
const ARTIFACTS_DIR_ENV_VAR: &str = "ARTIFACTS_DIR";
const CONTRACT_NAME_ENV_VAR: &str = "CONTRACT_NAME";
const CONFIRMATIONS_ENV_VAR: &str = "CONFIRMATIONS";

const DEFAULT_CONFIRMATIONS: usize = 1;

#[derive(Debug)]
pub struct DeployConfig {
    pub network: NetworkProfile,
    pub artifacts_dir: PathBuf,
    pub contract_name: String,
    pub confirmations: usize,
}

impl DeployConfig {
    /// load from env, with a `.env` file in the working dir taking part
    pub fn load() -> Result<Self, DeployError> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DeployError> {
        // blank values in a .env file count as unset
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let rpc_url = var(RPC_URL_ENV_VAR).ok_or_else(|| missing(RPC_URL_ENV_VAR))?;

        let credential = match (var(PRIVATE_KEY_ENV_VAR), var(MNEMONIC_ENV_VAR)) {
            (Some(key), _) => Credential::PrivateKey(key),
            (None, Some(phrase)) => Credential::Mnemonic {
                phrase,
                index: parse_or(var(MNEMONIC_INDEX_ENV_VAR), MNEMONIC_INDEX_ENV_VAR, 0)?,
            },
            (None, None) => return Err(missing(PRIVATE_KEY_ENV_VAR)),
        };

        let chain_id = parse_or(var(CHAIN_ID_ENV_VAR), CHAIN_ID_ENV_VAR, HOLESKY_CHAIN_ID)?;
        let name = var(NETWORK_NAME_ENV_VAR).unwrap_or_else(|| HOLESKY_NETWORK_NAME.to_owned());

        let network = NetworkProfile::new(name, &rpc_url, chain_id, credential)?;

        Ok(Self {
            network,
            artifacts_dir: var(ARTIFACTS_DIR_ENV_VAR)
                .unwrap_or_else(|| DEFAULT_ARTIFACTS_DIR.to_owned())
                .into(),
            contract_name: var(CONTRACT_NAME_ENV_VAR)
                .unwrap_or_else(|| UPLOAD_CONTRACT_NAME.to_owned()),
            confirmations: parse_or(
                var(CONFIRMATIONS_ENV_VAR),
                CONFIRMATIONS_ENV_VAR,
                DEFAULT_CONFIRMATIONS,
            )?,
        })
    }
}

fn missing(key: &str) -> DeployError {
    DeployError::Config(format!("environment variable {key} is not set"))
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T, DeployError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| DeployError::Config(format!("{key}='{raw}' is invalid: {e}"))),
        None => Ok(default),
    }
}
