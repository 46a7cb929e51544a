use async_trait::async_trait;
use log::{debug, info};
use serde_json::Value;
use std::sync::Arc;

use super::driver::{
    ChainDriver, ExecuteRequest, ExecuteResponse, InstantiateRequest, QueryClient, QueryRequest,
    SigningClient, StoreCodeRequest, UploadResult, MOCK_CODE_HASH,
};
use super::error::DispatchError;
use crate::chain::fee::{FeeKind, GasTerms};
use crate::chain::identity::ChainIdentity;
use crate::chain::logs::extract_log;
use crate::client::connector::{SecretConnector, SecretRpcConnector};
use crate::client::key::Wallet;
use crate::client::secret::{ExecuteContractMsg, InstantiateContractMsg, StoreCodeMsg};
use crate::config::cfg::{Account, Coin, Network};

/// Driver for secret network and its compute module.
#[derive(Clone)]
pub struct SecretChainDriver {
    connector: Arc<dyn SecretConnector>,
}

impl SecretChainDriver {
    pub fn new(connector: Arc<dyn SecretConnector>) -> Self {
        Self { connector }
    }
}

impl Default for SecretChainDriver {
    fn default() -> Self {
        Self::new(Arc::new(SecretRpcConnector::default()))
    }
}

#[async_trait]
impl ChainDriver for SecretChainDriver {
    async fn connect(&self, network: &Network) -> Result<QueryClient, DispatchError> {
        let client = self
            .connector
            .client(&network.config.endpoint, &network.config.chain_id)?;

        Ok(QueryClient::Secret(client))
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

        let client = self.connector.signing_client(
            &network.config.endpoint,
            &network.config.chain_id,
            wallet,
        )?;

        Ok(SigningClient::Secret(client))
    }

    async fn store_code(
        &self,
        network: &Network,
        client: &SigningClient,
        req: StoreCodeRequest,
    ) -> Result<UploadResult, DispatchError> {
        let client = client.secret()?;
        let fee = FeeKind::Upload.resolve(req.fees.as_ref(), network);

        info!("Storing {} ({} bytes)", req.contract_name, req.wasm.len());

        let res = client
            .store_code(
                StoreCodeMsg {
                    sender: req.sender,
                    wasm_byte_code: req.wasm,
                    source: req.source.unwrap_or_default(),
                    builder: req.builder.unwrap_or_default(),
                },
                GasTerms::derive(&fee).tx_options(""),
            )
            .await?;

        let not_received = || DispatchError::StoreResponseNotReceived {
            contract_name: req.contract_name.clone(),
            raw_log: res.serialized_log(),
        };

        let code_id = extract_log(&res.array_log, "message", "code_id")
            .map_err(|_| not_received())?
            .value
            .parse::<u64>()
            .map_err(|_| not_received())?;

        let contract_code_hash = client
            .code_hash_by_code_id(code_id)
            .await?
            .unwrap_or_default();

        Ok(UploadResult {
            code_id,
            contract_code_hash,
        })
    }

    async fn instantiate(
        &self,
        network: &Network,
        client: &SigningClient,
        req: InstantiateRequest,
    ) -> Result<String, DispatchError> {
        if req.contract_code_hash == MOCK_CODE_HASH {
            return Err(DispatchError::ContractNotDeployed {
                contract_name: req.contract_name,
            });
        }

        let client = client.secret()?;
        let fee = FeeKind::Init.resolve(req.fees.as_ref(), network);

        info!("Instantiating {} from code id {}", req.contract_name, req.code_id);

        let res = client
            .instantiate_contract(
                InstantiateContractMsg {
                    sender: req.sender,
                    code_id: req.code_id,
                    code_hash: req.contract_code_hash,
                    init_msg: req.init_msg,
                    label: req.label,
                    init_funds: req.funds,
                },
                GasTerms::derive(&fee).tx_options(""),
            )
            .await?;

        let entry = extract_log(&res.array_log, "message", "contract_address").map_err(|_| {
            DispatchError::InitResponseNotReceived {
                contract_name: req.contract_name.clone(),
                raw_log: res.serialized_log(),
            }
        })?;

        Ok(entry.value.clone())
    }

    async fn execute(
        &self,
        network: &Network,
        client: &SigningClient,
        req: ExecuteRequest,
    ) -> Result<ExecuteResponse, DispatchError> {
        let client = client.secret()?;
        let fee = FeeKind::Exec.resolve(req.fees.as_ref(), network);

        let res = client
            .execute_contract(
                ExecuteContractMsg {
                    sender: req.sender,
                    contract_address: req.contract_address,
                    code_hash: req.contract_code_hash,
                    msg: req.msg,
                    sent_funds: req.funds,
                },
                GasTerms::derive(&fee).tx_options(req.memo.unwrap_or_default()),
            )
            .await?;

        Ok(ExecuteResponse::Secret(res))
    }

    async fn query(
        &self,
        client: &QueryClient,
        req: QueryRequest,
    ) -> Result<Value, DispatchError> {
        let client = client.secret()?;
        Ok(client
            .query_contract(&req.contract_address, &req.contract_hash, &req.msg)
            .await?)
    }

    async fn balance(
        &self,
        client: &QueryClient,
        address: &str,
        denom: &str,
    ) -> Result<Option<Coin>, DispatchError> {
        let client = client.secret()?;
        let balance = client.bank_balance(address, denom).await?;

        Ok(balance.map(|b| match (b.amount, b.denom) {
            (Some(amount), Some(denom)) => Coin::new(amount, denom),
            _ => Coin::new("0", denom),
        }))
    }

    async fn node_status(&self, client: &QueryClient) -> Result<(String, u64), DispatchError> {
        let client = client.secret()?;
        Ok((client.chain_id().await?, client.height().await?))
    }
}
