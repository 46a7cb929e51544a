use std::fmt;

use crate::client::key::{HdParams, COSMOS_HUB_PATH, SECRET_PATH};
use crate::config::cfg::Network;
use crate::dispatch::error::DispatchError;

/// Chain identity used when a network has no configured accounts.
pub const DEFAULT_CHAIN: ChainIdentity = ChainIdentity::Neutron;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainIdentity {
    Archway,
    Neutron,
    Osmosis,
    Atom,
    Umee,
    Nibiru,
    Terra,
    Juno,
    Secret,
    Injective,
}

/// Client family that services a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainFamily {
    /// Chains sharing the unified cosmwasm client api.
    Standard,
    /// Secret network with its own compute and bank sub-apis.
    Secret,
}

// Longest prefixes first so no shorter prefix shadows a longer one.
const PREFIXES: &[(&str, ChainIdentity)] = &[
    ("archway", ChainIdentity::Archway),
    ("neutron", ChainIdentity::Neutron),
    ("cosmos", ChainIdentity::Atom),
    ("secret", ChainIdentity::Secret),
    ("terra", ChainIdentity::Terra),
    ("juno", ChainIdentity::Juno),
    ("osmo", ChainIdentity::Osmosis),
    ("umee", ChainIdentity::Umee),
    ("nibi", ChainIdentity::Nibiru),
    ("inj", ChainIdentity::Injective),
];

/// Resolves the chain from the address prefix of the first configured account.
pub fn classify(network: &Network) -> Result<ChainIdentity, DispatchError> {
    let address = match network.first_address() {
        Some(address) => address,
        None => return Ok(DEFAULT_CHAIN),
    };

    ChainIdentity::from_address(address).ok_or_else(|| DispatchError::UnknownNetwork {
        account: address.to_string(),
    })
}

impl ChainIdentity {
    pub fn from_address(address: &str) -> Option<ChainIdentity> {
        PREFIXES
            .iter()
            .find(|(prefix, _)| address.starts_with(prefix))
            .map(|(_, chain)| *chain)
    }

    pub fn family(self) -> Option<ChainFamily> {
        match self {
            ChainIdentity::Secret => Some(ChainFamily::Secret),
            ChainIdentity::Injective => None,
            _ => Some(ChainFamily::Standard),
        }
    }

    pub fn native_denom(self) -> Option<&'static str> {
        match self {
            ChainIdentity::Secret => Some("uscrt"),
            ChainIdentity::Juno => Some("ujuno"),
            ChainIdentity::Archway => Some("aarch"),
            ChainIdentity::Neutron => Some("untrn"),
            ChainIdentity::Atom => Some("uatom"),
            ChainIdentity::Umee => Some("uumee"),
            ChainIdentity::Nibiru => Some("unibi"),
            ChainIdentity::Osmosis => Some("uosmo"),
            ChainIdentity::Terra => Some("uluna"),
            ChainIdentity::Injective => None,
        }
    }

    pub fn hd_params(self) -> Option<HdParams> {
        let hub = |prefix| HdParams {
            prefix,
            path: Some(COSMOS_HUB_PATH),
        };

        match self {
            ChainIdentity::Juno => Some(hub("juno")),
            ChainIdentity::Neutron => Some(hub("neutron")),
            ChainIdentity::Atom => Some(hub("cosmos")),
            ChainIdentity::Umee => Some(hub("umee")),
            ChainIdentity::Nibiru => Some(hub("nibi")),
            ChainIdentity::Osmosis => Some(hub("osmo")),
            ChainIdentity::Terra => Some(hub("terra")),
            // archway relies on the wallet default path
            ChainIdentity::Archway => Some(HdParams {
                prefix: "archway",
                path: None,
            }),
            ChainIdentity::Secret => Some(HdParams {
                prefix: "secret",
                path: Some(SECRET_PATH),
            }),
            ChainIdentity::Injective => None,
        }
    }
}

impl fmt::Display for ChainIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
