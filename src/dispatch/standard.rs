use async_trait::async_trait;
use log::{debug, info};
use serde_json::Value;
use std::sync::Arc;

use super::driver::{
    ChainDriver, ExecuteRequest, ExecuteResponse, InstantiateRequest, QueryClient, QueryRequest,
    SigningClient, StoreCodeRequest, UploadResult, CODE_HASH_NOT_REQUIRED,
};
use super::error::DispatchError;
use crate::chain::fee::FeeKind;
use crate::chain::identity::ChainIdentity;
use crate::client::connector::{RpcConnector, StandardConnector};
use crate::client::cosmwasm::InstantiateOptions;
use crate::client::key::Wallet;
use crate::config::cfg::{Account, Coin, Network};

const UPLOAD_MEMO: &str = "uploading";
const EXECUTE_MEMO: &str = "executing";

/// Driver for chains sharing the unified cosmwasm client api.
#[derive(Clone)]
pub struct StandardChainDriver {
    connector: Arc<dyn StandardConnector>,
}

impl StandardChainDriver {
    pub fn new(connector: Arc<dyn StandardConnector>) -> Self {
        Self { connector }
    }
}

impl Default for StandardChainDriver {
    fn default() -> Self {
        Self::new(Arc::new(RpcConnector))
    }
}

#[async_trait]
impl ChainDriver for StandardChainDriver {
    async fn connect(&self, network: &Network) -> Result<QueryClient, DispatchError> {
        let client = self.connector.connect(&network.config.endpoint).await?;
        Ok(QueryClient::Standard(client))
    }

    async fn connect_signing(
        &self,
        chain: ChainIdentity,
        network: &Network,
        account: &Account,
    ) -> Result<SigningClient, DispatchError> {
        let params = chain
            .hd_params()
            .ok_or_else(|| DispatchError::unknown_network(network))?;

        let wallet = Wallet::from_mnemonic(&account.mnemonic, &params)?;
        debug!("derived {:?} for {}", wallet, chain);

        let client = self
            .connector
            .connect_with_signer(&network.config.endpoint, wallet)
            .await?;

        Ok(SigningClient::Standard(client))
    }

    async fn store_code(
        &self,
        network: &Network,
        client: &SigningClient,
        req: StoreCodeRequest,
    ) -> Result<UploadResult, DispatchError> {
        let client = client.standard()?;
        let fee = FeeKind::Upload.resolve(req.fees.as_ref(), network);

        info!("Storing {} ({} bytes)", req.contract_name, req.wasm.len());

        let res = client.upload(&req.sender, req.wasm, &fee, UPLOAD_MEMO).await?;
        debug!("{:?}", res.res);

        Ok(UploadResult {
            code_id: res.code_id,
            contract_code_hash: CODE_HASH_NOT_REQUIRED.to_string(),
        })
    }

    async fn instantiate(
        &self,
        network: &Network,
        client: &SigningClient,
        req: InstantiateRequest,
    ) -> Result<String, DispatchError> {
        let client = client.standard()?;
        let fee = FeeKind::Init.resolve(req.fees.as_ref(), network);

        info!("Instantiating {} from code id {}", req.contract_name, req.code_id);

        let res = client
            .instantiate(
                &req.sender,
                req.code_id,
                &req.init_msg,
                &req.label,
                &fee,
                InstantiateOptions {
                    funds: req.funds,
                    admin: req.admin,
                },
            )
            .await?;
        debug!("{:?}", res.res);

        Ok(res.address)
    }

    async fn execute(
        &self,
        network: &Network,
        client: &SigningClient,
        req: ExecuteRequest,
    ) -> Result<ExecuteResponse, DispatchError> {
        let client = client.standard()?;
        let fee = FeeKind::Exec.resolve(req.fees.as_ref(), network);
        let memo = req.memo.as_deref().unwrap_or(EXECUTE_MEMO);

        let res = client
            .execute(
                &req.sender,
                &req.contract_address,
                &req.msg,
                &fee,
                memo,
                req.funds,
            )
            .await?;
        debug!("{:?}", res.res);

        Ok(ExecuteResponse::Standard(res))
    }

    async fn query(
        &self,
        client: &QueryClient,
        req: QueryRequest,
    ) -> Result<Value, DispatchError> {
        let client = client.standard()?;
        Ok(client
            .query_contract_smart(&req.contract_address, &req.msg)
            .await?)
    }

    async fn balance(
        &self,
        client: &QueryClient,
        address: &str,
        denom: &str,
    ) -> Result<Option<Coin>, DispatchError> {
        let client = client.standard()?;
        Ok(client.get_balance(address, denom).await?)
    }

    async fn node_status(&self, client: &QueryClient) -> Result<(String, u64), DispatchError> {
        let client = client.standard()?;
        Ok((client.chain_id().await?, client.height().await?))
    }
}
