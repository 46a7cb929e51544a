use async_trait::async_trait;
use std::sync::Arc;

use super::cosmwasm::{CosmWasmClient, SigningCosmWasmClient, WasmQuerier, WasmSigner};
use super::error::ClientError;
use super::key::Wallet;
use super::secret::{MsgEncryption, PlainMsg, SecretNetworkClient, SecretQuerier, SecretSigner};

/// Opens standard family clients. Every call may open a new connection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StandardConnector: Send + Sync {
    async fn connect(&self, endpoint: &str) -> Result<Arc<dyn WasmQuerier>, ClientError>;

    async fn connect_with_signer(
        &self,
        endpoint: &str,
        wallet: Wallet,
    ) -> Result<Arc<dyn WasmSigner>, ClientError>;
}

/// Builds secret network clients, no node handshake involved.
#[cfg_attr(test, mockall::automock)]
pub trait SecretConnector: Send + Sync {
    fn client(&self, endpoint: &str, chain_id: &str)
        -> Result<Arc<dyn SecretQuerier>, ClientError>;

    fn signing_client(
        &self,
        endpoint: &str,
        chain_id: &str,
        wallet: Wallet,
    ) -> Result<Arc<dyn SecretSigner>, ClientError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RpcConnector;

#[async_trait]
impl StandardConnector for RpcConnector {
    async fn connect(&self, endpoint: &str) -> Result<Arc<dyn WasmQuerier>, ClientError> {
        Ok(Arc::new(CosmWasmClient::connect(endpoint).await?))
    }

    async fn connect_with_signer(
        &self,
        endpoint: &str,
        wallet: Wallet,
    ) -> Result<Arc<dyn WasmSigner>, ClientError> {
        Ok(Arc::new(
            SigningCosmWasmClient::connect_with_signer(endpoint, wallet).await?,
        ))
    }
}

#[derive(Clone)]
pub struct SecretRpcConnector {
    encryption: Arc<dyn MsgEncryption>,
}

impl SecretRpcConnector {
    pub fn new(encryption: Arc<dyn MsgEncryption>) -> Self {
        Self { encryption }
    }
}

impl Default for SecretRpcConnector {
    fn default() -> Self {
        Self::new(Arc::new(PlainMsg))
    }
}

impl SecretConnector for SecretRpcConnector {
    fn client(
        &self,
        endpoint: &str,
        chain_id: &str,
    ) -> Result<Arc<dyn SecretQuerier>, ClientError> {
        Ok(Arc::new(SecretNetworkClient::new(
            endpoint,
            chain_id,
            None,
            self.encryption.clone(),
        )?))
    }

    fn signing_client(
        &self,
        endpoint: &str,
        chain_id: &str,
        wallet: Wallet,
    ) -> Result<Arc<dyn SecretSigner>, ClientError> {
        Ok(Arc::new(SecretNetworkClient::new(
            endpoint,
            chain_id,
            Some(wallet),
            self.encryption.clone(),
        )?))
    }
}
