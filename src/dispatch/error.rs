use thiserror::Error;

use crate::chain::identity::ChainFamily;
use crate::client::error::ClientError;
use crate::config::cfg::Network;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("unknown network for account: {account:?}")]
    UnknownNetwork { account: String },

    #[error("client is not loaded")]
    ClientNotLoaded,

    #[error("balance response is undefined")]
    BalanceUndefined,

    #[error("store code response not received for {contract_name:?}: {raw_log}")]
    StoreResponseNotReceived {
        contract_name: String,
        raw_log: String,
    },

    #[error("instantiate response not received for {contract_name:?}: {raw_log}")]
    InitResponseNotReceived {
        contract_name: String,
        raw_log: String,
    },

    #[error("contract code hash for {contract_name:?} is a placeholder, deploy the code first")]
    ContractNotDeployed { contract_name: String },

    #[error("client does not belong to the {expected:?} chain family")]
    ClientMismatch { expected: ChainFamily },

    #[error(transparent)]
    ClientError(#[from] ClientError),
}

impl DispatchError {
    pub fn unknown_network(network: &Network) -> DispatchError {
        DispatchError::UnknownNetwork {
            account: network.first_address().unwrap_or_default().to_string(),
        }
    }
}
