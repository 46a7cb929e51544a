use log::{debug, error};
use serde_json::Value;

use super::driver::{
    ChainDriver, ExecuteRequest, ExecuteResponse, InstantiateRequest, NodeInfo, QueryClient,
    QueryRequest, SigningClient, StoreCodeRequest, UploadResult,
};
use super::error::DispatchError;
use super::secret::SecretChainDriver;
use super::standard::StandardChainDriver;
use crate::chain::identity::{classify, ChainFamily, ChainIdentity};
use crate::config::cfg::{Account, Coin, Network};

/// Routes every contract operation to the driver of the network's chain family.
///
/// Holds no per-call state: clients are opened by [`Dispatcher::get_client`] and
/// [`Dispatcher::get_signing_client`] and owned by the caller from then on.
pub struct Dispatcher {
    standard: Box<dyn ChainDriver>,
    secret: Box<dyn ChainDriver>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Dispatcher backed by real rpc connections.
    pub fn new() -> Self {
        Self::with_drivers(
            Box::new(StandardChainDriver::default()),
            Box::new(SecretChainDriver::default()),
        )
    }

    pub fn with_drivers(standard: Box<dyn ChainDriver>, secret: Box<dyn ChainDriver>) -> Self {
        Self { standard, secret }
    }

    pub fn classify(&self, network: &Network) -> Result<ChainIdentity, DispatchError> {
        classify(network)
    }

    fn driver(
        &self,
        network: &Network,
        chain: ChainIdentity,
    ) -> Result<&dyn ChainDriver, DispatchError> {
        match chain.family() {
            Some(ChainFamily::Standard) => Ok(self.standard.as_ref()),
            Some(ChainFamily::Secret) => Ok(self.secret.as_ref()),
            None => Err(DispatchError::unknown_network(network)),
        }
    }

    /// Classifies `network` and returns its chain along with the serving driver.
    fn route(
        &self,
        network: &Network,
    ) -> Result<(ChainIdentity, &dyn ChainDriver), DispatchError> {
        let chain = classify(network)?;
        let driver = self.driver(network, chain)?;
        debug!("{} dispatched to the {:?} driver", chain, chain.family());
        Ok((chain, driver))
    }

    pub async fn get_client(&self, network: &Network) -> Result<QueryClient, DispatchError> {
        let (_, driver) = self.route(network).map_err(log_unknown)?;
        driver.connect(network).await
    }

    pub async fn get_signing_client(
        &self,
        network: &Network,
        account: &Account,
    ) -> Result<SigningClient, DispatchError> {
        let (chain, driver) = self.route(network).map_err(log_unknown)?;
        driver.connect_signing(chain, network, account).await
    }

    pub async fn store_code(
        &self,
        network: &Network,
        client: &SigningClient,
        req: StoreCodeRequest,
    ) -> Result<UploadResult, DispatchError> {
        let (_, driver) = self.route(network)?;
        driver.store_code(network, client, req).await
    }

    /// Returns the address of the new contract.
    pub async fn instantiate_contract(
        &self,
        network: &Network,
        client: &SigningClient,
        req: InstantiateRequest,
    ) -> Result<String, DispatchError> {
        let (_, driver) = self.route(network)?;
        driver.instantiate(network, client, req).await
    }

    pub async fn execute_transaction(
        &self,
        network: &Network,
        client: &SigningClient,
        req: ExecuteRequest,
    ) -> Result<ExecuteResponse, DispatchError> {
        let (_, driver) = self.route(network)?;
        driver.execute(network, client, req).await
    }

    pub async fn send_query(
        &self,
        client: &QueryClient,
        network: &Network,
        req: QueryRequest,
    ) -> Result<Value, DispatchError> {
        let (_, driver) = self.route(network)?;
        driver.query(client, req).await
    }

    /// Native token balance of `address`, always a single coin.
    ///
    /// `client` is `None` until [`Dispatcher::get_client`] has been called.
    pub async fn get_balance(
        &self,
        client: Option<&QueryClient>,
        address: &str,
        network: &Network,
    ) -> Result<Vec<Coin>, DispatchError> {
        let client = client.ok_or(DispatchError::ClientNotLoaded)?;
        let (chain, driver) = self.route(network)?;
        let denom = chain
            .native_denom()
            .ok_or_else(|| DispatchError::unknown_network(network))?;

        let balance = driver
            .balance(client, address, denom)
            .await?
            .ok_or(DispatchError::BalanceUndefined)?;

        Ok(vec![balance])
    }

    /// Chain id and latest block height reported by the network's node.
    pub async fn node_info(&self, network: &Network) -> Result<NodeInfo, DispatchError> {
        let (chain, driver) = self.route(network).map_err(log_unknown)?;
        let client = driver.connect(network).await?;
        let (chain_id, height) = driver.node_status(&client).await?;

        Ok(NodeInfo {
            chain,
            chain_id,
            height,
        })
    }
}

fn log_unknown(err: DispatchError) -> DispatchError {
    if let DispatchError::UnknownNetwork { account } = &err {
        error!("Cannot get client for unknown network, account: {:?}", account);
    }
    err
}

#[cfg(test)]
mod tests {
    use super::Dispatcher;
    use crate::chain::identity::{ChainFamily, ChainIdentity};
    use crate::client::chain_res::{
        ArrayLog, ChainResponse, ExecResponse, InstantiateResponse, SecretTxResponse,
        StoreCodeResponse,
    };
    use crate::client::connector::{MockSecretConnector, MockStandardConnector};
    use crate::client::cosmwasm::{MockCosmWasmSigner, MockWasmQuerier, WasmQuerier, WasmSigner};
    use crate::client::secret::{
        BankBalance, MockSecretNetworkSigner, MockSecretQuerier, SecretQuerier, SecretSigner,
    };
    use crate::config::cfg::{Account, Coin, FeeConfig, Network, NetworkConfig, TxnFee};
    use crate::dispatch::driver::{
        ExecuteRequest, ExecuteResponse, InstantiateRequest, QueryClient, QueryRequest,
        SigningClient, StoreCodeRequest, CODE_HASH_NOT_REQUIRED, MOCK_CODE_HASH,
    };
    use crate::dispatch::error::DispatchError;
    use crate::dispatch::secret::SecretChainDriver;
    use crate::dispatch::standard::StandardChainDriver;
    use assert_matches::assert_matches;
    use serde_json::json;
    use std::sync::Arc;

    const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon \
        abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon \
        abandon abandon abandon abandon abandon art";

    const ENDPOINT: &str = "http://localhost:26657";

    fn network(address: Option<&str>, fees: Option<FeeConfig>) -> Network {
        Network {
            name: "testnet".to_string(),
            config: NetworkConfig {
                endpoint: ENDPOINT.to_string(),
                chain_id: "testing-1".to_string(),
                accounts: address
                    .map(|a| Account {
                        name: "admin".to_string(),
                        address: a.to_string(),
                        mnemonic: MNEMONIC.to_string(),
                    })
                    .into_iter()
                    .collect(),
                fees,
            },
        }
    }

    fn txn_fee(amount: &str, denom: &str, gas: &str) -> TxnFee {
        TxnFee {
            amount: vec![Coin::new(amount, denom)],
            gas: gas.to_string(),
        }
    }

    fn dispatcher(standard: MockStandardConnector, secret: MockSecretConnector) -> Dispatcher {
        Dispatcher::with_drivers(
            Box::new(StandardChainDriver::new(Arc::new(standard))),
            Box::new(SecretChainDriver::new(Arc::new(secret))),
        )
    }

    // any connector call panics
    fn offline() -> Dispatcher {
        dispatcher(MockStandardConnector::new(), MockSecretConnector::new())
    }

    fn secret_tx(logs: Vec<ArrayLog>) -> SecretTxResponse {
        SecretTxResponse {
            tx_hash: "ABC".to_string(),
            height: 200,
            raw_log: "raw".to_string(),
            array_log: logs,
            ..Default::default()
        }
    }

    fn exec_response() -> ExecResponse {
        ExecResponse {
            res: ChainResponse::default(),
            tx_hash: "ABC".to_string(),
            height: 100,
        }
    }

    #[tokio::test]
    async fn secret_store_code_without_code_id_log() {
        let mut signer = MockSecretNetworkSigner::new();
        signer
            .expect_store_code()
            .times(1)
            .returning(|_, _| Ok(secret_tx(vec![ArrayLog::new("message", "module", "compute")])));
        signer.expect_code_hash_by_code_id().never();

        let net = network(Some("secret1abc"), None);
        let res = offline()
            .store_code(
                &net,
                &SigningClient::Secret(Arc::new(signer)),
                StoreCodeRequest {
                    sender: "secret1abc".to_string(),
                    contract_name: "cw20_base".to_string(),
                    wasm: vec![0, 97, 115, 109],
                    ..Default::default()
                },
            )
            .await;

        assert_matches!(
            res,
            Err(DispatchError::StoreResponseNotReceived { contract_name, raw_log })
                if contract_name == "cw20_base" && raw_log.contains("compute")
        );
    }

    #[tokio::test]
    async fn secret_store_code_looks_up_code_hash() {
        let mut signer = MockSecretNetworkSigner::new();
        signer
            .expect_store_code()
            .withf(|msg, opts| {
                msg.sender == "secret1abc"
                    && msg.wasm_byte_code == vec![1, 2, 3]
                    && msg.source.is_empty()
                    && msg.builder.is_empty()
                    && opts.gas_limit == Some(200000)
                    && opts.gas_price_in_fee_denom == Some(0.0025)
            })
            .times(1)
            .returning(|_, _| Ok(secret_tx(vec![ArrayLog::new("message", "code_id", "7")])));
        signer
            .expect_code_hash_by_code_id()
            .withf(|code_id| *code_id == 7)
            .times(1)
            .returning(|_| Ok(Some("abc123".to_string())));

        let net = network(Some("secret1abc"), None);
        let res = offline()
            .store_code(
                &net,
                &SigningClient::Secret(Arc::new(signer)),
                StoreCodeRequest {
                    sender: "secret1abc".to_string(),
                    contract_name: "cw20_base".to_string(),
                    wasm: vec![1, 2, 3],
                    fees: Some(txn_fee("500", "uscrt", "200000")),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(res.code_id, 7);
        assert_eq!(res.contract_code_hash, "abc123");
    }

    #[tokio::test]
    async fn secret_store_code_missing_code_hash_is_empty() {
        let mut signer = MockSecretNetworkSigner::new();
        signer
            .expect_store_code()
            .times(1)
            .returning(|_, _| Ok(secret_tx(vec![ArrayLog::new("message", "code_id", "9")])));
        signer
            .expect_code_hash_by_code_id()
            .times(1)
            .returning(|_| Ok(None));

        let net = network(Some("secret1abc"), None);
        let res = offline()
            .store_code(
                &net,
                &SigningClient::Secret(Arc::new(signer)),
                StoreCodeRequest::default(),
            )
            .await
            .unwrap();

        assert_eq!(res.code_id, 9);
        assert_eq!(res.contract_code_hash, "");
    }

    #[tokio::test]
    async fn secret_store_code_non_numeric_code_id() {
        let mut signer = MockSecretNetworkSigner::new();
        signer
            .expect_store_code()
            .times(1)
            .returning(|_, _| Ok(secret_tx(vec![ArrayLog::new("message", "code_id", "seven")])));
        signer.expect_code_hash_by_code_id().never();

        let net = network(Some("secret1abc"), None);
        let res = offline()
            .store_code(
                &net,
                &SigningClient::Secret(Arc::new(signer)),
                StoreCodeRequest {
                    contract_name: "cw721".to_string(),
                    ..Default::default()
                },
            )
            .await;

        assert_matches!(
            res,
            Err(DispatchError::StoreResponseNotReceived { contract_name, .. }) if contract_name == "cw721"
        );
    }

    #[tokio::test]
    async fn standard_store_code_has_no_code_hash() {
        let mut signer = MockCosmWasmSigner::new();
        signer
            .expect_upload()
            .withf(|sender, wasm, fee, memo| {
                sender == "juno1abc"
                    && *wasm == vec![1, 2, 3]
                    && *fee == txn_fee("250000", "untrn", "10000000")
                    && memo == "uploading"
            })
            .times(1)
            .returning(|_, _, _, _| {
                Ok(StoreCodeResponse {
                    code_id: 1,
                    res: ChainResponse::default(),
                    tx_hash: "ABC".to_string(),
                    height: 100,
                })
            });

        let net = network(Some("juno1abc"), None);
        let res = offline()
            .store_code(
                &net,
                &SigningClient::Standard(Arc::new(signer)),
                StoreCodeRequest {
                    sender: "juno1abc".to_string(),
                    contract_name: "cw20_base".to_string(),
                    wasm: vec![1, 2, 3],
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(res.code_id, 1);
        assert_eq!(res.contract_code_hash, CODE_HASH_NOT_REQUIRED);
    }

    #[tokio::test]
    async fn mock_hash_is_never_instantiated() {
        let mut signer = MockSecretNetworkSigner::new();
        signer.expect_instantiate_contract().never();

        let net = network(Some("secret1abc"), None);
        let res = offline()
            .instantiate_contract(
                &net,
                &SigningClient::Secret(Arc::new(signer)),
                InstantiateRequest {
                    code_id: 3,
                    contract_name: "cw20_base".to_string(),
                    contract_code_hash: MOCK_CODE_HASH.to_string(),
                    ..Default::default()
                },
            )
            .await;

        assert_matches!(
            res,
            Err(DispatchError::ContractNotDeployed { contract_name }) if contract_name == "cw20_base"
        );
    }

    #[tokio::test]
    async fn secret_instantiate_reads_contract_address() {
        let mut signer = MockSecretNetworkSigner::new();
        signer
            .expect_instantiate_contract()
            .withf(|msg, _| {
                msg.code_id == 3
                    && msg.code_hash == "abc123"
                    && msg.label == "counter"
                    && msg.init_msg == json!({ "count": 0 })
            })
            .times(1)
            .returning(|_, _| {
                Ok(secret_tx(vec![
                    ArrayLog::new("message", "action", "instantiate"),
                    ArrayLog::new("message", "contract_address", "secret1contract"),
                ]))
            });

        let net = network(Some("secret1abc"), None);
        let addr = offline()
            .instantiate_contract(
                &net,
                &SigningClient::Secret(Arc::new(signer)),
                InstantiateRequest {
                    code_id: 3,
                    sender: "secret1abc".to_string(),
                    contract_name: "cw20_base".to_string(),
                    contract_code_hash: "abc123".to_string(),
                    init_msg: json!({ "count": 0 }),
                    label: "counter".to_string(),
                    admin: Some("secret1admin".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(addr, "secret1contract");
    }

    #[tokio::test]
    async fn secret_instantiate_without_address_log() {
        let mut signer = MockSecretNetworkSigner::new();
        signer
            .expect_instantiate_contract()
            .times(1)
            .returning(|_, _| Ok(secret_tx(vec![])));

        let net = network(Some("secret1abc"), None);
        let res = offline()
            .instantiate_contract(
                &net,
                &SigningClient::Secret(Arc::new(signer)),
                InstantiateRequest {
                    contract_name: "cw20_base".to_string(),
                    contract_code_hash: "abc123".to_string(),
                    ..Default::default()
                },
            )
            .await;

        assert_matches!(
            res,
            Err(DispatchError::InitResponseNotReceived { contract_name, .. }) if contract_name == "cw20_base"
        );
    }

    #[tokio::test]
    async fn standard_instantiate_passes_admin_and_funds() {
        let mut signer = MockCosmWasmSigner::new();
        signer
            .expect_instantiate()
            .withf(|sender, code_id, _msg, label, fee, options| {
                sender == "osmo1abc"
                    && *code_id == 5
                    && label == "counter"
                    && *fee == txn_fee("125000", "untrn", "500000")
                    && options.funds == vec![Coin::new("10", "uosmo")]
                    && options.admin.as_deref() == Some("osmo1admin")
            })
            .times(1)
            .returning(|_, _, _, _, _, _| {
                Ok(InstantiateResponse {
                    address: "osmo1contract".to_string(),
                    res: ChainResponse::default(),
                    tx_hash: "ABC".to_string(),
                    height: 100,
                })
            });

        let net = network(Some("osmo1abc"), None);
        let addr = offline()
            .instantiate_contract(
                &net,
                &SigningClient::Standard(Arc::new(signer)),
                InstantiateRequest {
                    code_id: 5,
                    sender: "osmo1abc".to_string(),
                    contract_name: "cw20_base".to_string(),
                    // ignored outside of secret network
                    contract_code_hash: MOCK_CODE_HASH.to_string(),
                    label: "counter".to_string(),
                    funds: vec![Coin::new("10", "uosmo")],
                    admin: Some("osmo1admin".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(addr, "osmo1contract");
    }

    #[tokio::test]
    async fn standard_execute_defaults_memo_and_uses_network_fee() {
        let net_fee = txn_fee("3000", "ujuno", "300000");
        let expected = net_fee.clone();

        let mut signer = MockCosmWasmSigner::new();
        signer
            .expect_execute()
            .withf(move |sender, contract, msg, fee, memo, funds| {
                sender == "juno1abc"
                    && contract == "juno1contract"
                    && *msg == json!({ "increment": {} })
                    && *fee == expected
                    && memo == "executing"
                    && funds.is_empty()
            })
            .times(1)
            .returning(|_, _, _, _, _, _| Ok(exec_response()));
        signer
            .expect_execute()
            .withf(|_, _, _, fee, memo, _| *fee == txn_fee("1", "ujuno", "1") && memo == "bump")
            .times(1)
            .returning(|_, _, _, _, _, _| Ok(exec_response()));

        let d = offline();
        let net = network(
            Some("juno1abc"),
            Some(FeeConfig {
                exec: Some(net_fee),
                ..Default::default()
            }),
        );
        let client = SigningClient::Standard(Arc::new(signer));

        let req = ExecuteRequest {
            sender: "juno1abc".to_string(),
            contract_address: "juno1contract".to_string(),
            msg: json!({ "increment": {} }),
            ..Default::default()
        };

        let res = d
            .execute_transaction(&net, &client, req.clone())
            .await
            .unwrap();
        assert_matches!(res, ExecuteResponse::Standard(_));

        d.execute_transaction(
            &net,
            &client,
            ExecuteRequest {
                fees: Some(txn_fee("1", "ujuno", "1")),
                memo: Some("bump".to_string()),
                ..req
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn secret_execute_passes_gas_terms_through() {
        let mut signer = MockSecretNetworkSigner::new();
        signer
            .expect_execute_contract()
            .withf(|msg, opts| {
                msg.contract_address == "secret1contract"
                    && msg.code_hash == "abc123"
                    && msg.sent_funds == vec![Coin::new("1", "uscrt")]
                    && opts.gas_limit.is_none()
                    && opts.gas_price_in_fee_denom.is_none()
                    && opts.memo.is_empty()
            })
            .times(1)
            .returning(|_, _| Ok(secret_tx(vec![ArrayLog::new("wasm", "result", "ok")])));

        let net = network(Some("secret1abc"), None);
        let res = offline()
            .execute_transaction(
                &net,
                &SigningClient::Secret(Arc::new(signer)),
                ExecuteRequest {
                    sender: "secret1abc".to_string(),
                    contract_address: "secret1contract".to_string(),
                    contract_code_hash: "abc123".to_string(),
                    msg: json!({ "increment": {} }),
                    funds: vec![Coin::new("1", "uscrt")],
                    fees: Some(txn_fee("500", "uscrt", "lots")),
                    memo: None,
                },
            )
            .await
            .unwrap();

        assert_matches!(res, ExecuteResponse::Secret(tx) if tx.array_log[0].value == "ok");
    }

    #[tokio::test]
    async fn queries_route_by_family() {
        let mut querier = MockWasmQuerier::new();
        querier
            .expect_query_contract_smart()
            .withf(|address, query| address == "juno1contract" && *query == json!({ "count": {} }))
            .times(1)
            .returning(|_, _| Ok(json!({ "count": 5 })));

        let mut standard = MockStandardConnector::new();
        standard
            .expect_connect()
            .withf(|endpoint| endpoint == ENDPOINT)
            .times(1)
            .return_once(move |_| Ok(Arc::new(querier) as Arc<dyn WasmQuerier>));

        let mut secret_querier = MockSecretQuerier::new();
        secret_querier
            .expect_query_contract()
            .withf(|address, code_hash, query| {
                address == "secret1contract" && code_hash == "abc123" && *query == json!({ "count": {} })
            })
            .times(1)
            .returning(|_, _, _| Ok(json!({ "count": 6 })));

        let mut secret = MockSecretConnector::new();
        secret
            .expect_client()
            .withf(|endpoint, chain_id| endpoint == ENDPOINT && chain_id == "testing-1")
            .times(1)
            .return_once(move |_, _| Ok(Arc::new(secret_querier) as Arc<dyn SecretQuerier>));

        let d = dispatcher(standard, secret);

        let juno = network(Some("juno1abc"), None);
        let client = d.get_client(&juno).await.unwrap();
        let res = d
            .send_query(
                &client,
                &juno,
                QueryRequest {
                    msg: json!({ "count": {} }),
                    contract_address: "juno1contract".to_string(),
                    contract_hash: "ignored".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(res, json!({ "count": 5 }));

        let scrt = network(Some("secret1abc"), None);
        let client = d.get_client(&scrt).await.unwrap();
        let res = d
            .send_query(
                &client,
                &scrt,
                QueryRequest {
                    msg: json!({ "count": {} }),
                    contract_address: "secret1contract".to_string(),
                    contract_hash: "abc123".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(res, json!({ "count": 6 }));
    }

    #[tokio::test]
    async fn client_from_another_family_is_rejected() {
        let client = QueryClient::Standard(Arc::new(MockWasmQuerier::new()));
        let scrt = network(Some("secret1abc"), None);

        let res = offline()
            .send_query(&client, &scrt, QueryRequest::default())
            .await;
        assert_matches!(
            res,
            Err(DispatchError::ClientMismatch {
                expected: ChainFamily::Secret
            })
        );
    }

    #[tokio::test]
    async fn balances_use_native_denoms() {
        let cases = [
            ("secret1abc", "uscrt"),
            ("juno1abc", "ujuno"),
            ("osmo1abc", "uosmo"),
            ("terra1abc", "uluna"),
            ("archway1abc", "aarch"),
            ("neutron1abc", "untrn"),
            ("cosmos1abc", "uatom"),
            ("umee1abc", "uumee"),
            ("nibi1abc", "unibi"),
        ];

        for (address, denom) in cases {
            let client = if address.starts_with("secret") {
                let mut querier = MockSecretQuerier::new();
                querier
                    .expect_bank_balance()
                    .withf(move |a, d| a == address && d == denom)
                    .times(1)
                    .returning(move |_, _| {
                        Ok(Some(BankBalance {
                            denom: Some(denom.to_string()),
                            amount: Some("100".to_string()),
                        }))
                    });
                QueryClient::Secret(Arc::new(querier))
            } else {
                let mut querier = MockWasmQuerier::new();
                querier
                    .expect_get_balance()
                    .withf(move |a, d| a == address && d == denom)
                    .times(1)
                    .returning(move |_, _| Ok(Some(Coin::new("100", denom))));
                QueryClient::Standard(Arc::new(querier))
            };

            let net = network(Some(address), None);
            let res = offline()
                .get_balance(Some(&client), address, &net)
                .await
                .unwrap();
            assert_eq!(res, vec![Coin::new("100", denom)], "{}", address);
        }
    }

    #[tokio::test]
    async fn balance_without_client() {
        let d = offline();

        for address in ["secret1abc", "juno1abc", "inj1abc", "stars1abc"] {
            let net = network(Some(address), None);
            assert_matches!(
                d.get_balance(None, address, &net).await,
                Err(DispatchError::ClientNotLoaded)
            );
        }
    }

    #[tokio::test]
    async fn partial_secret_balance_is_zero() {
        let mut querier = MockSecretQuerier::new();
        querier.expect_bank_balance().times(1).returning(|_, _| {
            Ok(Some(BankBalance {
                denom: None,
                amount: Some("12".to_string()),
            }))
        });
        let client = QueryClient::Secret(Arc::new(querier));

        let net = network(Some("secret1abc"), None);
        let res = offline()
            .get_balance(Some(&client), "secret1abc", &net)
            .await
            .unwrap();
        assert_eq!(res, vec![Coin::new("0", "uscrt")]);
    }

    #[tokio::test]
    async fn missing_balance_is_undefined() {
        let mut querier = MockWasmQuerier::new();
        querier.expect_get_balance().times(1).returning(|_, _| Ok(None));
        let standard = QueryClient::Standard(Arc::new(querier));

        let mut querier = MockSecretQuerier::new();
        querier.expect_bank_balance().times(1).returning(|_, _| Ok(None));
        let secret = QueryClient::Secret(Arc::new(querier));

        let d = offline();
        for (address, client) in [("juno1abc", standard), ("secret1abc", secret)] {
            let net = network(Some(address), None);
            assert_matches!(
                d.get_balance(Some(&client), address, &net).await,
                Err(DispatchError::BalanceUndefined)
            );
        }
    }

    #[tokio::test]
    async fn unsupported_chain_fails_every_operation() {
        let mut signer = MockCosmWasmSigner::new();
        signer.expect_upload().never();
        signer.expect_instantiate().never();
        signer.expect_execute().never();
        let signing = SigningClient::Standard(Arc::new(signer));

        let mut querier = MockWasmQuerier::new();
        querier.expect_query_contract_smart().never();
        querier.expect_get_balance().never();
        let client = QueryClient::Standard(Arc::new(querier));

        let d = offline();
        let net = network(Some("inj1abc"), None);

        assert_eq!(d.classify(&net).unwrap(), ChainIdentity::Injective);
        assert_matches!(
            d.get_client(&net).await,
            Err(DispatchError::UnknownNetwork { account }) if account == "inj1abc"
        );
        assert_matches!(
            d.get_signing_client(&net, &net.config.accounts[0]).await,
            Err(DispatchError::UnknownNetwork { account }) if account == "inj1abc"
        );
        assert_matches!(
            d.store_code(&net, &signing, StoreCodeRequest::default()).await,
            Err(DispatchError::UnknownNetwork { account }) if account == "inj1abc"
        );
        assert_matches!(
            d.instantiate_contract(&net, &signing, InstantiateRequest::default()).await,
            Err(DispatchError::UnknownNetwork { account }) if account == "inj1abc"
        );
        assert_matches!(
            d.execute_transaction(&net, &signing, ExecuteRequest::default()).await,
            Err(DispatchError::UnknownNetwork { account }) if account == "inj1abc"
        );
        assert_matches!(
            d.send_query(&client, &net, QueryRequest::default()).await,
            Err(DispatchError::UnknownNetwork { account }) if account == "inj1abc"
        );
        assert_matches!(
            d.get_balance(Some(&client), "inj1abc", &net).await,
            Err(DispatchError::UnknownNetwork { account }) if account == "inj1abc"
        );
        assert_matches!(
            d.node_info(&net).await,
            Err(DispatchError::UnknownNetwork { account }) if account == "inj1abc"
        );
    }

    #[tokio::test]
    async fn unknown_prefix_fails_client_factory() {
        let mut standard = MockStandardConnector::new();
        standard.expect_connect().never();

        let d = dispatcher(standard, MockSecretConnector::new());
        let net = network(Some("stars1abc"), None);

        assert_matches!(
            d.get_client(&net).await,
            Err(DispatchError::UnknownNetwork { account }) if account == "stars1abc"
        );
    }

    #[tokio::test]
    async fn empty_network_balance_end_to_end() {
        let mut querier = MockWasmQuerier::new();
        querier
            .expect_get_balance()
            .withf(|address, denom| address == "neutron1abc" && denom == "untrn")
            .times(1)
            .returning(|_, _| Ok(Some(Coin::new("42", "untrn"))));

        let mut standard = MockStandardConnector::new();
        standard
            .expect_connect()
            .times(1)
            .return_once(move |_| Ok(Arc::new(querier) as Arc<dyn WasmQuerier>));

        let d = dispatcher(standard, MockSecretConnector::new());
        let net = network(None, None);

        assert_eq!(d.classify(&net).unwrap(), ChainIdentity::Neutron);

        let client = d.get_client(&net).await.unwrap();
        assert_eq!(client.family(), ChainFamily::Standard);

        let res = d
            .get_balance(Some(&client), "neutron1abc", &net)
            .await
            .unwrap();
        assert_eq!(res, vec![Coin::new("42", "untrn")]);
    }

    #[tokio::test]
    async fn every_client_call_opens_a_connection() {
        let mut standard = MockStandardConnector::new();
        standard
            .expect_connect()
            .times(2)
            .returning(|_| Ok(Arc::new(MockWasmQuerier::new()) as Arc<dyn WasmQuerier>));
        standard
            .expect_connect_with_signer()
            .times(1)
            .returning(|_, _| Ok(Arc::new(MockCosmWasmSigner::new()) as Arc<dyn WasmSigner>));

        let d = dispatcher(standard, MockSecretConnector::new());
        let net = network(Some("juno1abc"), None);

        d.get_client(&net).await.unwrap();
        d.get_client(&net).await.unwrap();
        d.get_signing_client(&net, &net.config.accounts[0])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn signing_wallet_uses_chain_prefix() {
        let mut standard = MockStandardConnector::new();
        standard
            .expect_connect_with_signer()
            .withf(|endpoint, wallet| {
                endpoint == ENDPOINT && wallet.address().to_string().starts_with("archway1")
            })
            .times(1)
            .returning(|_, _| Ok(Arc::new(MockCosmWasmSigner::new()) as Arc<dyn WasmSigner>));

        let mut secret = MockSecretConnector::new();
        secret
            .expect_signing_client()
            .withf(|endpoint, chain_id, wallet| {
                endpoint == ENDPOINT
                    && chain_id == "testing-1"
                    && wallet.address().to_string().starts_with("secret1")
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(Arc::new(MockSecretNetworkSigner::new()) as Arc<dyn SecretSigner>)
            });

        let d = dispatcher(standard, secret);

        let net = network(Some("archway1abc"), None);
        let client = d
            .get_signing_client(&net, &net.config.accounts[0])
            .await
            .unwrap();
        assert_eq!(client.family(), ChainFamily::Standard);

        let net = network(Some("secret1abc"), None);
        let client = d
            .get_signing_client(&net, &net.config.accounts[0])
            .await
            .unwrap();
        assert_eq!(client.family(), ChainFamily::Secret);
    }

    #[tokio::test]
    async fn node_info_reports_chain_and_height() {
        let mut querier = MockWasmQuerier::new();
        querier
            .expect_chain_id()
            .times(1)
            .returning(|| Ok("juno-local".to_string()));
        querier.expect_height().times(1).returning(|| Ok(100));

        let mut standard = MockStandardConnector::new();
        standard
            .expect_connect()
            .times(1)
            .return_once(move |_| Ok(Arc::new(querier) as Arc<dyn WasmQuerier>));

        // chain id comes from the node, not the config
        let mut secret_querier = MockSecretQuerier::new();
        secret_querier
            .expect_chain_id()
            .times(1)
            .returning(|| Ok("pulsar-3".to_string()));
        secret_querier.expect_height().times(1).returning(|| Ok(200));

        let mut secret = MockSecretConnector::new();
        secret
            .expect_client()
            .times(1)
            .return_once(move |_, _| Ok(Arc::new(secret_querier) as Arc<dyn SecretQuerier>));

        let d = dispatcher(standard, secret);

        let info = d.node_info(&network(Some("juno1abc"), None)).await.unwrap();
        assert_eq!(info.chain, ChainIdentity::Juno);
        assert_eq!(info.chain_id, "juno-local");
        assert_eq!(info.height, 100);

        let info = d
            .node_info(&network(Some("secret1abc"), None))
            .await
            .unwrap();
        assert_eq!(info.chain, ChainIdentity::Secret);
        assert_eq!(info.chain_id, "pulsar-3");
        assert_eq!(info.height, 200);
    }
}
