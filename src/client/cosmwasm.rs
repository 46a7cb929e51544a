use async_trait::async_trait;
use cosmos_sdk_proto::cosmwasm::wasm::v1::{
    QuerySmartContractStateRequest, QuerySmartContractStateResponse,
};
use cosmrs::cosmwasm::{MsgExecuteContract, MsgInstantiateContract, MsgStoreCode};
use cosmrs::rpc::HttpClient;
use cosmrs::tx::Msg;
use log::debug;
use prost::Message;
use serde_json::Value;

use super::chain_res::{ExecResponse, InstantiateResponse, StoreCodeResponse};
use super::cosmos::{
    abci_query, bank_balance, chain_id, cosmos_coins, cosmos_fee, event_attribute, height,
    parse_account, send_tx,
};
use super::error::ClientError;
use super::key::Wallet;
use crate::config::cfg::{Coin, TxnFee};

/// Read only capabilities shared by every standard cosmwasm chain.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WasmQuerier: Send + Sync {
    async fn query_contract_smart(&self, address: &str, query: &Value)
        -> Result<Value, ClientError>;

    async fn get_balance(&self, address: &str, denom: &str) -> Result<Option<Coin>, ClientError>;

    async fn chain_id(&self) -> Result<String, ClientError>;

    async fn height(&self) -> Result<u64, ClientError>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstantiateOptions {
    pub funds: Vec<Coin>,
    pub admin: Option<String>,
}

/// Transaction capabilities of a standard cosmwasm chain.
#[async_trait]
pub trait WasmSigner: WasmQuerier {
    async fn upload(
        &self,
        sender: &str,
        wasm: Vec<u8>,
        fee: &TxnFee,
        memo: &str,
    ) -> Result<StoreCodeResponse, ClientError>;

    async fn instantiate(
        &self,
        sender: &str,
        code_id: u64,
        msg: &Value,
        label: &str,
        fee: &TxnFee,
        options: InstantiateOptions,
    ) -> Result<InstantiateResponse, ClientError>;

    async fn execute(
        &self,
        sender: &str,
        contract: &str,
        msg: &Value,
        fee: &TxnFee,
        memo: &str,
        funds: Vec<Coin>,
    ) -> Result<ExecResponse, ClientError>;
}

#[cfg(test)]
mockall::mock! {
    pub CosmWasmSigner {}

    #[async_trait]
    impl WasmQuerier for CosmWasmSigner {
        async fn query_contract_smart(&self, address: &str, query: &Value)
            -> Result<Value, ClientError>;
        async fn get_balance(&self, address: &str, denom: &str) -> Result<Option<Coin>, ClientError>;
        async fn chain_id(&self) -> Result<String, ClientError>;
        async fn height(&self) -> Result<u64, ClientError>;
    }

    #[async_trait]
    impl WasmSigner for CosmWasmSigner {
        async fn upload(
            &self,
            sender: &str,
            wasm: Vec<u8>,
            fee: &TxnFee,
            memo: &str,
        ) -> Result<StoreCodeResponse, ClientError>;
        async fn instantiate(
            &self,
            sender: &str,
            code_id: u64,
            msg: &Value,
            label: &str,
            fee: &TxnFee,
            options: InstantiateOptions,
        ) -> Result<InstantiateResponse, ClientError>;
        async fn execute(
            &self,
            sender: &str,
            contract: &str,
            msg: &Value,
            fee: &TxnFee,
            memo: &str,
            funds: Vec<Coin>,
        ) -> Result<ExecResponse, ClientError>;
    }
}

#[derive(Clone, Debug)]
pub struct CosmWasmClient {
    // http tendermint RPC client
    rpc_client: HttpClient,
}

impl CosmWasmClient {
    pub fn new(rpc_endpoint: &str) -> Result<Self, ClientError> {
        Ok(Self {
            rpc_client: HttpClient::new(rpc_endpoint)?,
        })
    }

    /// Builds the client and checks that the node answers.
    pub async fn connect(rpc_endpoint: &str) -> Result<Self, ClientError> {
        let client = Self::new(rpc_endpoint)?;
        let chain_id = chain_id(&client.rpc_client).await?;
        debug!("connected to {} at {}", chain_id, rpc_endpoint);
        Ok(client)
    }
}

#[async_trait]
impl WasmQuerier for CosmWasmClient {
    async fn query_contract_smart(
        &self,
        address: &str,
        query: &Value,
    ) -> Result<Value, ClientError> {
        smart_query(&self.rpc_client, address, query).await
    }

    async fn get_balance(&self, address: &str, denom: &str) -> Result<Option<Coin>, ClientError> {
        bank_balance(&self.rpc_client, address, denom).await
    }

    async fn chain_id(&self) -> Result<String, ClientError> {
        chain_id(&self.rpc_client).await
    }

    async fn height(&self) -> Result<u64, ClientError> {
        height(&self.rpc_client).await
    }
}

#[derive(Clone, Debug)]
pub struct SigningCosmWasmClient {
    rpc_client: HttpClient,
    wallet: Wallet,
    chain_id: String,
}

impl SigningCosmWasmClient {
    /// Connects to the node and caches its chain id for signing.
    pub async fn connect_with_signer(
        rpc_endpoint: &str,
        wallet: Wallet,
    ) -> Result<Self, ClientError> {
        let rpc_client = HttpClient::new(rpc_endpoint)?;
        let chain_id = chain_id(&rpc_client).await?;

        Ok(Self {
            rpc_client,
            wallet,
            chain_id,
        })
    }
}

#[async_trait]
impl WasmQuerier for SigningCosmWasmClient {
    async fn query_contract_smart(
        &self,
        address: &str,
        query: &Value,
    ) -> Result<Value, ClientError> {
        smart_query(&self.rpc_client, address, query).await
    }

    async fn get_balance(&self, address: &str, denom: &str) -> Result<Option<Coin>, ClientError> {
        bank_balance(&self.rpc_client, address, denom).await
    }

    async fn chain_id(&self) -> Result<String, ClientError> {
        Ok(self.chain_id.clone())
    }

    async fn height(&self) -> Result<u64, ClientError> {
        height(&self.rpc_client).await
    }
}

#[async_trait]
impl WasmSigner for SigningCosmWasmClient {
    async fn upload(
        &self,
        sender: &str,
        wasm: Vec<u8>,
        fee: &TxnFee,
        memo: &str,
    ) -> Result<StoreCodeResponse, ClientError> {
        let msg = MsgStoreCode {
            sender: parse_account(sender)?,
            wasm_byte_code: wasm,
            instantiate_permission: None,
        }
        .to_any()
        .map_err(ClientError::proto_encoding)?;

        let tx_res = send_tx(
            &self.rpc_client,
            msg,
            &self.wallet,
            &self.chain_id,
            cosmos_fee(fee)?,
            memo,
        )
        .await?;

        let code_id = event_attribute(&tx_res, "store_code", "code_id")?;
        let code_id = code_id
            .parse::<u64>()
            .map_err(|_| ClientError::MissingEvent {
                event: "store_code".to_string(),
                attribute: "code_id".to_string(),
            })?;

        Ok(StoreCodeResponse {
            code_id,
            tx_hash: tx_res.hash.to_string(),
            height: tx_res.height.value(),
            res: tx_res.deliver_tx.into(),
        })
    }

    async fn instantiate(
        &self,
        sender: &str,
        code_id: u64,
        msg: &Value,
        label: &str,
        fee: &TxnFee,
        options: InstantiateOptions,
    ) -> Result<InstantiateResponse, ClientError> {
        let msg = MsgInstantiateContract {
            sender: parse_account(sender)?,
            admin: options.admin.as_deref().map(parse_account).transpose()?,
            code_id,
            label: Some(label.to_string()),
            msg: serde_json::to_vec(msg)?,
            funds: cosmos_coins(&options.funds)?,
        }
        .to_any()
        .map_err(ClientError::proto_encoding)?;

        let tx_res = send_tx(
            &self.rpc_client,
            msg,
            &self.wallet,
            &self.chain_id,
            cosmos_fee(fee)?,
            "",
        )
        .await?;

        let address = event_attribute(&tx_res, "instantiate", "_contract_address")?;

        Ok(InstantiateResponse {
            address,
            tx_hash: tx_res.hash.to_string(),
            height: tx_res.height.value(),
            res: tx_res.deliver_tx.into(),
        })
    }

    async fn execute(
        &self,
        sender: &str,
        contract: &str,
        msg: &Value,
        fee: &TxnFee,
        memo: &str,
        funds: Vec<Coin>,
    ) -> Result<ExecResponse, ClientError> {
        let msg = MsgExecuteContract {
            sender: parse_account(sender)?,
            contract: parse_account(contract)?,
            msg: serde_json::to_vec(msg)?,
            funds: cosmos_coins(&funds)?,
        }
        .to_any()
        .map_err(ClientError::proto_encoding)?;

        let tx_res = send_tx(
            &self.rpc_client,
            msg,
            &self.wallet,
            &self.chain_id,
            cosmos_fee(fee)?,
            memo,
        )
        .await?;

        Ok(ExecResponse {
            tx_hash: tx_res.hash.to_string(),
            height: tx_res.height.value(),
            res: tx_res.deliver_tx.into(),
        })
    }
}

async fn smart_query(
    client: &HttpClient,
    address: &str,
    query: &Value,
) -> Result<Value, ClientError> {
    let res = abci_query(
        client,
        QuerySmartContractStateRequest {
            address: address.to_string(),
            query_data: serde_json::to_vec(query)?,
        },
        "/cosmwasm.wasm.v1.Query/SmartContractState",
    )
    .await?;

    let res = QuerySmartContractStateResponse::decode(res.value.as_slice())
        .map_err(ClientError::prost_proto_de)?;

    debug!("{:?}", res);

    Ok(serde_json::from_slice(&res.data)?)
}
