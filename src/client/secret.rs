use async_trait::async_trait;
use bech32::FromBase32;
use cosmos_sdk_proto::cosmos::base::v1beta1::Coin as ProtoCoin;
use cosmrs::rpc::HttpClient;
use cosmrs::tx::Fee;
use cosmrs::Any;
use log::debug;
use prost::Message;
use serde_json::Value;
use std::fmt::{self, Debug};
use std::sync::Arc;

use super::chain_res::SecretTxResponse;
use super::cosmos::{abci_query, bank_balance, chain_id, height, send_tx};
use super::error::ClientError;
use super::key::Wallet;
use crate::config::cfg::Coin;

pub const FEE_DENOM: &str = "uscrt";
pub const DEFAULT_GAS_LIMIT: u64 = 25_000;
pub const DEFAULT_GAS_PRICE: f64 = 0.1;

const STORE_CODE_TYPE_URL: &str = "/secret.compute.v1beta1.MsgStoreCode";
const INSTANTIATE_TYPE_URL: &str = "/secret.compute.v1beta1.MsgInstantiateContract";
const EXECUTE_TYPE_URL: &str = "/secret.compute.v1beta1.MsgExecuteContract";

const QUERY_CONTRACT_PATH: &str = "/secret.compute.v1beta1.Query/QuerySecretContract";
const QUERY_CODE_HASH_PATH: &str = "/secret.compute.v1beta1.Query/CodeHashByCodeId";

/// Bank balance as reported by the node; either field may be absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BankBalance {
    pub denom: Option<String>,
    pub amount: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TxOptions {
    pub gas_limit: Option<u64>,
    pub gas_price_in_fee_denom: Option<f64>,
    pub memo: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreCodeMsg {
    pub sender: String,
    pub wasm_byte_code: Vec<u8>,
    pub source: String,
    pub builder: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InstantiateContractMsg {
    pub sender: String,
    pub code_id: u64,
    pub code_hash: String,
    pub init_msg: Value,
    pub label: String,
    pub init_funds: Vec<Coin>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExecuteContractMsg {
    pub sender: String,
    pub contract_address: String,
    pub code_hash: String,
    pub msg: Value,
    pub sent_funds: Vec<Coin>,
}

/// Query side of the secret network compute and bank modules.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretQuerier: Send + Sync {
    async fn query_contract(
        &self,
        contract_address: &str,
        code_hash: &str,
        query: &Value,
    ) -> Result<Value, ClientError>;

    async fn code_hash_by_code_id(&self, code_id: u64) -> Result<Option<String>, ClientError>;

    async fn bank_balance(
        &self,
        address: &str,
        denom: &str,
    ) -> Result<Option<BankBalance>, ClientError>;

    async fn chain_id(&self) -> Result<String, ClientError>;

    async fn height(&self) -> Result<u64, ClientError>;
}

/// Transaction side of the secret network compute module.
#[async_trait]
pub trait SecretSigner: SecretQuerier {
    async fn store_code(
        &self,
        msg: StoreCodeMsg,
        opts: TxOptions,
    ) -> Result<SecretTxResponse, ClientError>;

    async fn instantiate_contract(
        &self,
        msg: InstantiateContractMsg,
        opts: TxOptions,
    ) -> Result<SecretTxResponse, ClientError>;

    async fn execute_contract(
        &self,
        msg: ExecuteContractMsg,
        opts: TxOptions,
    ) -> Result<SecretTxResponse, ClientError>;
}

#[cfg(test)]
mockall::mock! {
    pub SecretNetworkSigner {}

    #[async_trait]
    impl SecretQuerier for SecretNetworkSigner {
        async fn query_contract(
            &self,
            contract_address: &str,
            code_hash: &str,
            query: &Value,
        ) -> Result<Value, ClientError>;
        async fn code_hash_by_code_id(&self, code_id: u64) -> Result<Option<String>, ClientError>;
        async fn bank_balance(
            &self,
            address: &str,
            denom: &str,
        ) -> Result<Option<BankBalance>, ClientError>;
        async fn chain_id(&self) -> Result<String, ClientError>;
        async fn height(&self) -> Result<u64, ClientError>;
    }

    #[async_trait]
    impl SecretSigner for SecretNetworkSigner {
        async fn store_code(
            &self,
            msg: StoreCodeMsg,
            opts: TxOptions,
        ) -> Result<SecretTxResponse, ClientError>;
        async fn instantiate_contract(
            &self,
            msg: InstantiateContractMsg,
            opts: TxOptions,
        ) -> Result<SecretTxResponse, ClientError>;
        async fn execute_contract(
            &self,
            msg: ExecuteContractMsg,
            opts: TxOptions,
        ) -> Result<SecretTxResponse, ClientError>;
    }
}

/// Contract message encryption used by the compute module.
pub trait MsgEncryption: Send + Sync {
    /// Seals `msg` for a contract with `code_hash`.
    fn seal(&self, code_hash: &str, msg: &[u8]) -> Result<Vec<u8>, ClientError>;

    /// Opens a query response produced for the `sealed` request.
    fn open(&self, sealed: &[u8], data: &[u8]) -> Result<Vec<u8>, ClientError>;
}

/// Unencrypted payloads laid out as `code_hash ++ msg`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainMsg;

impl MsgEncryption for PlainMsg {
    fn seal(&self, code_hash: &str, msg: &[u8]) -> Result<Vec<u8>, ClientError> {
        let mut out = Vec::with_capacity(code_hash.len() + msg.len());
        out.extend_from_slice(code_hash.as_bytes());
        out.extend_from_slice(msg);
        Ok(out)
    }

    fn open(&self, _sealed: &[u8], data: &[u8]) -> Result<Vec<u8>, ClientError> {
        Ok(data.to_vec())
    }
}

#[derive(Clone)]
pub struct SecretNetworkClient {
    rpc_client: HttpClient,
    chain_id: String,
    wallet: Option<Wallet>,
    encryption: Arc<dyn MsgEncryption>,
}

impl Debug for SecretNetworkClient {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SecretNetworkClient")
            .field("chain_id", &self.chain_id)
            .field("wallet", &self.wallet)
            .finish_non_exhaustive()
    }
}

impl SecretNetworkClient {
    /// Builds a client without contacting the node.
    pub fn new(
        rpc_endpoint: &str,
        chain_id: &str,
        wallet: Option<Wallet>,
        encryption: Arc<dyn MsgEncryption>,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            rpc_client: HttpClient::new(rpc_endpoint)?,
            chain_id: chain_id.to_string(),
            wallet,
            encryption,
        })
    }

    fn wallet(&self) -> Result<&Wallet, ClientError> {
        self.wallet.as_ref().ok_or(ClientError::MissingWallet)
    }

    async fn broadcast(&self, msg: Any, opts: TxOptions) -> Result<SecretTxResponse, ClientError> {
        let res = send_tx(
            &self.rpc_client,
            msg,
            self.wallet()?,
            &self.chain_id,
            secret_fee(&opts)?,
            &opts.memo,
        )
        .await?;

        let res: SecretTxResponse = res.into();
        debug!("{:?}", res);

        Ok(res)
    }
}

#[async_trait]
impl SecretQuerier for SecretNetworkClient {
    async fn query_contract(
        &self,
        contract_address: &str,
        code_hash: &str,
        query: &Value,
    ) -> Result<Value, ClientError> {
        let sealed = self.encryption.seal(code_hash, &serde_json::to_vec(query)?)?;

        let res = abci_query(
            &self.rpc_client,
            QuerySecretContractRequest {
                contract_address: contract_address.to_string(),
                query: sealed.clone(),
            },
            QUERY_CONTRACT_PATH,
        )
        .await?;

        let res = QuerySecretContractResponse::decode(res.value.as_slice())
            .map_err(ClientError::prost_proto_de)?;

        let data = self.encryption.open(&sealed, &res.data)?;

        Ok(serde_json::from_slice(&data)?)
    }

    async fn code_hash_by_code_id(&self, code_id: u64) -> Result<Option<String>, ClientError> {
        let res = abci_query(
            &self.rpc_client,
            QueryByCodeIdRequest { code_id },
            QUERY_CODE_HASH_PATH,
        )
        .await?;

        let code_hash = QueryCodeHashResponse::decode(res.value.as_slice())
            .map_err(ClientError::prost_proto_de)?
            .code_hash;

        Ok(Some(code_hash).filter(|h| !h.is_empty()))
    }

    async fn bank_balance(
        &self,
        address: &str,
        denom: &str,
    ) -> Result<Option<BankBalance>, ClientError> {
        let balance = bank_balance(&self.rpc_client, address, denom).await?;

        Ok(Some(BankBalance {
            denom: balance
                .as_ref()
                .map(|c| c.denom.clone())
                .filter(|d| !d.is_empty()),
            amount: balance.map(|c| c.amount).filter(|a| !a.is_empty()),
        }))
    }

    async fn chain_id(&self) -> Result<String, ClientError> {
        chain_id(&self.rpc_client).await
    }

    async fn height(&self) -> Result<u64, ClientError> {
        height(&self.rpc_client).await
    }
}

#[async_trait]
impl SecretSigner for SecretNetworkClient {
    async fn store_code(
        &self,
        msg: StoreCodeMsg,
        opts: TxOptions,
    ) -> Result<SecretTxResponse, ClientError> {
        let msg = ProtoMsgStoreCode {
            sender: address_bytes(&msg.sender)?,
            wasm_byte_code: msg.wasm_byte_code,
            source: msg.source,
            builder: msg.builder,
        };

        self.broadcast(to_any(STORE_CODE_TYPE_URL, &msg)?, opts)
            .await
    }

    async fn instantiate_contract(
        &self,
        msg: InstantiateContractMsg,
        opts: TxOptions,
    ) -> Result<SecretTxResponse, ClientError> {
        let init_msg = self
            .encryption
            .seal(&msg.code_hash, &serde_json::to_vec(&msg.init_msg)?)?;

        let msg = ProtoMsgInstantiateContract {
            sender: address_bytes(&msg.sender)?,
            callback_code_hash: String::new(),
            code_id: msg.code_id,
            label: msg.label,
            init_msg,
            init_funds: proto_coins(&msg.init_funds),
            callback_sig: vec![],
        };

        self.broadcast(to_any(INSTANTIATE_TYPE_URL, &msg)?, opts)
            .await
    }

    async fn execute_contract(
        &self,
        msg: ExecuteContractMsg,
        opts: TxOptions,
    ) -> Result<SecretTxResponse, ClientError> {
        let payload = self
            .encryption
            .seal(&msg.code_hash, &serde_json::to_vec(&msg.msg)?)?;

        let msg = ProtoMsgExecuteContract {
            sender: address_bytes(&msg.sender)?,
            contract: address_bytes(&msg.contract_address)?,
            msg: payload,
            callback_code_hash: String::new(),
            sent_funds: proto_coins(&msg.sent_funds),
            callback_sig: vec![],
        };

        self.broadcast(to_any(EXECUTE_TYPE_URL, &msg)?, opts)
            .await
    }
}

fn secret_fee(opts: &TxOptions) -> Result<Fee, ClientError> {
    let (gas_limit, amount) = fee_terms(opts);

    let coin = cosmrs::Coin {
        denom: FEE_DENOM.parse().map_err(|_| ClientError::Denom {
            name: FEE_DENOM.to_string(),
        })?,
        amount: amount.into(),
    };

    Ok(Fee::from_amount_and_gas(coin, gas_limit))
}

/// Gas limit and fee amount in `FEE_DENOM` for a tx.
fn fee_terms(opts: &TxOptions) -> (u64, u64) {
    let gas_limit = opts.gas_limit.unwrap_or(DEFAULT_GAS_LIMIT);
    let gas_price = opts.gas_price_in_fee_denom.unwrap_or(DEFAULT_GAS_PRICE);

    (gas_limit, (gas_limit as f64 * gas_price).ceil() as u64)
}

fn address_bytes(address: &str) -> Result<Vec<u8>, ClientError> {
    let invalid = || ClientError::AccountId {
        id: address.to_string(),
    };

    let (_, data, _) = bech32::decode(address).map_err(|_| invalid())?;
    Vec::<u8>::from_base32(&data).map_err(|_| invalid())
}

fn proto_coins(coins: &[Coin]) -> Vec<ProtoCoin> {
    coins
        .iter()
        .map(|c| ProtoCoin {
            denom: c.denom.clone(),
            amount: c.amount.clone(),
        })
        .collect()
}

fn to_any<M: Message>(type_url: &str, msg: &M) -> Result<Any, ClientError> {
    let mut value = Vec::with_capacity(msg.encoded_len());
    msg.encode(&mut value).map_err(ClientError::prost_proto_en)?;

    Ok(Any {
        type_url: type_url.to_string(),
        value,
    })
}

// secret.compute.v1beta1 wire types

#[derive(Clone, PartialEq, Message)]
struct ProtoMsgStoreCode {
    #[prost(bytes = "vec", tag = "1")]
    sender: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    wasm_byte_code: Vec<u8>,
    #[prost(string, tag = "3")]
    source: String,
    #[prost(string, tag = "4")]
    builder: String,
}

#[derive(Clone, PartialEq, Message)]
struct ProtoMsgInstantiateContract {
    #[prost(bytes = "vec", tag = "1")]
    sender: Vec<u8>,
    #[prost(string, tag = "2")]
    callback_code_hash: String,
    #[prost(uint64, tag = "3")]
    code_id: u64,
    #[prost(string, tag = "4")]
    label: String,
    #[prost(bytes = "vec", tag = "5")]
    init_msg: Vec<u8>,
    #[prost(message, repeated, tag = "6")]
    init_funds: Vec<ProtoCoin>,
    #[prost(bytes = "vec", tag = "7")]
    callback_sig: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
struct ProtoMsgExecuteContract {
    #[prost(bytes = "vec", tag = "1")]
    sender: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    contract: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    msg: Vec<u8>,
    #[prost(string, tag = "4")]
    callback_code_hash: String,
    #[prost(message, repeated, tag = "5")]
    sent_funds: Vec<ProtoCoin>,
    #[prost(bytes = "vec", tag = "6")]
    callback_sig: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
struct QuerySecretContractRequest {
    #[prost(string, tag = "1")]
    contract_address: String,
    #[prost(bytes = "vec", tag = "2")]
    query: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
struct QuerySecretContractResponse {
    #[prost(bytes = "vec", tag = "1")]
    data: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
struct QueryByCodeIdRequest {
    #[prost(uint64, tag = "1")]
    code_id: u64,
}

#[derive(Clone, PartialEq, Message)]
struct QueryCodeHashResponse {
    #[prost(string, tag = "1")]
    code_hash: String,
}
