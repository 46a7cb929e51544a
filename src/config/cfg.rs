use config::Config as _Config;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::error::ConfigError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub networks: HashMap<String, NetworkConfig>,
}

impl Config {
    pub fn from_yaml(file: &str) -> Result<Config, ConfigError> {
        let settings = _Config::builder()
            .add_source(config::File::with_name(file))
            .build()?;

        Ok(settings.try_deserialize::<Config>()?)
    }

    /// Returns the named network, ready to hand to the dispatcher.
    pub fn network(&self, name: &str) -> Result<Network, ConfigError> {
        let config = self
            .networks
            .get(name)
            .ok_or_else(|| ConfigError::UnknownNetwork { name: name.into() })?;

        Ok(Network {
            name: name.to_string(),
            config: config.clone(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Network {
    pub name: String,
    pub config: NetworkConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NetworkConfig {
    pub endpoint: String,
    // only consumed by chains that build clients without a node handshake
    #[serde(default)]
    pub chain_id: String,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub fees: Option<FeeConfig>,
}

/// Per-operation fee overrides for a network.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct FeeConfig {
    pub upload: Option<TxnFee>,
    pub init: Option<TxnFee>,
    pub exec: Option<TxnFee>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TxnFee {
    pub amount: Vec<Coin>,
    pub gas: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

impl Coin {
    pub fn new<S: Into<String>, T: Into<String>>(amount: S, denom: T) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Account {
    /// human readable account name
    pub name: String,
    pub address: String,
    /// DO NOT USE FOR MAINNET
    pub mnemonic: String,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Account")
            .field("name", &self.name)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl Network {
    /// Address of the first configured account, if any.
    pub fn first_address(&self) -> Option<&str> {
        self.config.accounts.first().map(|a| a.address.as_str())
    }

    pub fn fees(&self) -> FeeConfig {
        self.config.fees.clone().unwrap_or_default()
    }
}
