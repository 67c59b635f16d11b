use std::fmt;

use ethers::signers::{coins_bip39::English, LocalWallet, MnemonicBuilder, Signer};
use url::Url;

use crate::error::DeployError;

pub const HOLESKY_NETWORK_NAME: &str = "holesky";
pub const HOLESKY_CHAIN_ID: u64 = 17000;

const SUPPORTED_RPC_SCHEMES: [&str; 2] = ["http", "https"];

/// Where, and as whom, a deployment is submitted.
#[derive(Clone, Debug)]
pub struct NetworkProfile {
    pub name: String,
    pub rpc_url: Url,
    pub chain_id: u64,
    pub credential: Credential,
}

impl NetworkProfile {
    /// Validates every field up front, so a bad environment never reaches the network.
    pub fn new(
        name: impl Into<String>,
        rpc_url: &str,
        chain_id: u64,
        credential: Credential,
    ) -> Result<Self, DeployError> {
        let rpc_url = parse_rpc_url(rpc_url)?;

        if chain_id == 0 {
            return Err(DeployError::Config(String::from("chain id must be non-zero")));
        }

        // fail now rather than at signing time
        credential.wallet(chain_id)?;

        Ok(Self {
            name: name.into(),
            rpc_url,
            chain_id,
            credential,
        })
    }

    pub fn holesky(rpc_url: &str, credential: Credential) -> Result<Self, DeployError> {
        Self::new(HOLESKY_NETWORK_NAME, rpc_url, HOLESKY_CHAIN_ID, credential)
    }

    pub fn wallet(&self) -> Result<LocalWallet, DeployError> {
        self.credential.wallet(self.chain_id)
    }
}

fn parse_rpc_url(raw: &str) -> Result<Url, DeployError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| DeployError::Config(format!("rpc url '{raw}' is not a valid url: {e}")))?;

    if !SUPPORTED_RPC_SCHEMES.contains(&url.scheme()) {
        return Err(DeployError::Config(format!(
            "rpc url scheme '{}' is not supported",
            url.scheme()
        )));
    }

    Ok(url)
}

/// The signing credential of a [`NetworkProfile`].
#[derive(Clone, PartialEq)]
pub enum Credential {
    /// hex encoded secp256k1 key, `0x` prefix optional
    PrivateKey(String),
    /// BIP-39 english phrase plus HD derivation index
    Mnemonic { phrase: String, index: u32 },
}

impl Credential {
    pub fn wallet(&self, chain_id: u64) -> Result<LocalWallet, DeployError> {
        let wallet = match self {
            Credential::PrivateKey(key) => {
                let key = key.trim();
                let key = key
                    .strip_prefix("0x")
                    .or_else(|| key.strip_prefix("0X"))
                    .unwrap_or(key);
                key.parse::<LocalWallet>()
                    .map_err(|e| DeployError::Config(format!("invalid private key: {e}")))?
            }
            Credential::Mnemonic { phrase, index } => MnemonicBuilder::<English>::default()
                .phrase(phrase.as_str())
                .index(*index)
                .and_then(|builder| builder.build())
                .map_err(|e| DeployError::Config(format!("invalid mnemonic: {e}")))?,
        };

        Ok(wallet.with_chain_id(chain_id))
    }
}

// never print secrets, even in debug logs
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::PrivateKey(_) => f.write_str("PrivateKey(<redacted>)"),
            Credential::Mnemonic { index, .. } => f
                .debug_struct("Mnemonic")
                .field("phrase", &"<redacted>")
                .field("index", index)
                .finish(),
        }
    }
}


#[cfg(test)]
mod tests {
    use ethers::signers::Signer;

    use super::{test_utils::*, Credential, NetworkProfile, HOLESKY_CHAIN_ID};
    use crate::error::DeployError;

    #[test]
    fn test_holesky_profile() {
        let profile =
            NetworkProfile::holesky("https://eth-holesky.g.alchemy.com/v2/key", dev_credential())
                .unwrap();

        assert_eq!(profile.name, "holesky");
        assert_eq!(profile.chain_id, HOLESKY_CHAIN_ID);
        assert_eq!(profile.rpc_url.host_str(), Some("eth-holesky.g.alchemy.com"));

        let wallet = profile.wallet().unwrap();
        assert_eq!(wallet.chain_id(), HOLESKY_CHAIN_ID);
        assert_eq!(format!("{:?}", wallet.address()), DEV_ADDRESS);
    }

    #[test]
    fn test_private_key_without_prefix() {
        let credential = Credential::PrivateKey(DEV_PRIVATE_KEY.trim_start_matches("0x").to_owned());
        let wallet = credential.wallet(1).unwrap();
        assert_eq!(format!("{:?}", wallet.address()), DEV_ADDRESS);
    }

    #[test]
    fn test_mnemonic_matches_dev_key() {
        let credential = Credential::Mnemonic {
            phrase: DEV_MNEMONIC.to_owned(),
            index: 0,
        };
        let wallet = credential.wallet(31337).unwrap();
        assert_eq!(format!("{:?}", wallet.address()), DEV_ADDRESS);
    }

    #[test]
    fn test_rejects_bad_url() {
        let err = NetworkProfile::holesky("not a url", dev_credential()).unwrap_err();
        assert!(matches!(err, DeployError::Config(_)));

        let err = NetworkProfile::holesky("ftp://example.com", dev_credential()).unwrap_err();
        assert!(matches!(err, DeployError::Config(_)));
    }

    #[test]
    fn test_rejects_zero_chain_id() {
        let err =
            NetworkProfile::new("local", "http://localhost:8545", 0, dev_credential()).unwrap_err();
        assert!(matches!(err, DeployError::Config(_)));
    }

    #[test]
    fn test_rejects_bad_credentials() {
        let err = NetworkProfile::holesky(
            "http://localhost:8545",
            Credential::PrivateKey(String::from("0xnothex")),
        )
        .unwrap_err();
        assert!(matches!(err, DeployError::Config(_)));

        let err = NetworkProfile::holesky(
            "http://localhost:8545",
            Credential::Mnemonic {
                phrase: String::from("definitely not a bip39 phrase"),
                index: 0,
            },
        )
        .unwrap_err();
        assert!(matches!(err, DeployError::Config(_)));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let printed = format!("{:?}", dev_credential());
        assert!(!printed.contains("ac0974"));

        let printed = format!(
            "{:?}",
            Credential::Mnemonic {
                phrase: DEV_MNEMONIC.to_owned(),
                index: 3
            }
        );
        assert!(!printed.contains("junk"));
        assert!(printed.contains("3"));
    }
}
