use async_trait::async_trait;
use serde_json::Value;
use std::fmt::{self, Debug};
use std::sync::Arc;

use super::error::DispatchError;
use crate::chain::identity::{ChainFamily, ChainIdentity};
use crate::client::chain_res::{ExecResponse, SecretTxResponse};
use crate::client::cosmwasm::{WasmQuerier, WasmSigner};
use crate::client::secret::{SecretQuerier, SecretSigner};
use crate::config::cfg::{Account, Coin, Network, TxnFee};

/// Code hash reported for chains without a code hash concept.
pub const CODE_HASH_NOT_REQUIRED: &str = "not_required";

/// Placeholder code hash left behind by an unresolved upload.
pub const MOCK_CODE_HASH: &str = "mock_hash";

/// Read only client handle, one variant per chain family.
#[derive(Clone)]
pub enum QueryClient {
    Standard(Arc<dyn WasmQuerier>),
    Secret(Arc<dyn SecretQuerier>),
}

/// Signing client handle, one variant per chain family.
#[derive(Clone)]
pub enum SigningClient {
    Standard(Arc<dyn WasmSigner>),
    Secret(Arc<dyn SecretSigner>),
}

impl QueryClient {
    pub fn family(&self) -> ChainFamily {
        match self {
            QueryClient::Standard(_) => ChainFamily::Standard,
            QueryClient::Secret(_) => ChainFamily::Secret,
        }
    }

    pub(crate) fn standard(&self) -> Result<&dyn WasmQuerier, DispatchError> {
        match self {
            QueryClient::Standard(c) => Ok(c.as_ref()),
            _ => Err(DispatchError::ClientMismatch {
                expected: ChainFamily::Standard,
            }),
        }
    }

    pub(crate) fn secret(&self) -> Result<&dyn SecretQuerier, DispatchError> {
        match self {
            QueryClient::Secret(c) => Ok(c.as_ref()),
            _ => Err(DispatchError::ClientMismatch {
                expected: ChainFamily::Secret,
            }),
        }
    }
}

impl SigningClient {
    pub fn family(&self) -> ChainFamily {
        match self {
            SigningClient::Standard(_) => ChainFamily::Standard,
            SigningClient::Secret(_) => ChainFamily::Secret,
        }
    }

    pub(crate) fn standard(&self) -> Result<&dyn WasmSigner, DispatchError> {
        match self {
            SigningClient::Standard(c) => Ok(c.as_ref()),
            _ => Err(DispatchError::ClientMismatch {
                expected: ChainFamily::Standard,
            }),
        }
    }

    pub(crate) fn secret(&self) -> Result<&dyn SecretSigner, DispatchError> {
        match self {
            SigningClient::Secret(c) => Ok(c.as_ref()),
            _ => Err(DispatchError::ClientMismatch {
                expected: ChainFamily::Secret,
            }),
        }
    }
}

impl Debug for QueryClient {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "QueryClient({:?})", self.family())
    }
}

impl Debug for SigningClient {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SigningClient({:?})", self.family())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreCodeRequest {
    pub sender: String,
    pub contract_name: String,
    pub wasm: Vec<u8>,
    pub fees: Option<TxnFee>,
    pub source: Option<String>,
    pub builder: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InstantiateRequest {
    pub code_id: u64,
    pub sender: String,
    pub contract_name: String,
    pub contract_code_hash: String,
    pub init_msg: Value,
    pub label: String,
    pub funds: Vec<Coin>,
    pub fees: Option<TxnFee>,
    /// ignored by secret network
    pub admin: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExecuteRequest {
    pub sender: String,
    pub contract_address: String,
    pub contract_code_hash: String,
    pub msg: Value,
    pub funds: Vec<Coin>,
    pub fees: Option<TxnFee>,
    pub memo: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryRequest {
    pub msg: Value,
    pub contract_address: String,
    pub contract_hash: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadResult {
    pub code_id: u64,
    pub contract_code_hash: String,
}

/// Chain native execute response, passed through untouched.
#[derive(Clone, Debug)]
pub enum ExecuteResponse {
    Standard(ExecResponse),
    Secret(SecretTxResponse),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeInfo {
    pub chain: ChainIdentity,
    pub chain_id: String,
    pub height: u64,
}

/// Chain family specific implementation of every dispatched operation.
#[async_trait]
pub trait ChainDriver: Send + Sync {
    async fn connect(&self, network: &Network) -> Result<QueryClient, DispatchError>;

    async fn connect_signing(
        &self,
        chain: ChainIdentity,
        network: &Network,
        account: &Account,
    ) -> Result<SigningClient, DispatchError>;

    async fn store_code(
        &self,
        network: &Network,
        client: &SigningClient,
        req: StoreCodeRequest,
    ) -> Result<UploadResult, DispatchError>;

    async fn instantiate(
        &self,
        network: &Network,
        client: &SigningClient,
        req: InstantiateRequest,
    ) -> Result<String, DispatchError>;

    async fn execute(
        &self,
        network: &Network,
        client: &SigningClient,
        req: ExecuteRequest,
    ) -> Result<ExecuteResponse, DispatchError>;

    async fn query(&self, client: &QueryClient, req: QueryRequest)
        -> Result<Value, DispatchError>;

    async fn balance(
        &self,
        client: &QueryClient,
        address: &str,
        denom: &str,
    ) -> Result<Option<Coin>, DispatchError>;

    /// Chain id and latest block height.
    async fn node_status(&self, client: &QueryClient) -> Result<(String, u64), DispatchError>;
}
