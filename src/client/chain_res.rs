use cosmrs::rpc::endpoint::broadcast::tx_commit::{Response, TxResult};
use cosmrs::tendermint::abci::Code;
use serde::{Deserialize, Serialize};
use tendermint_rpc::endpoint::abci_query::AbciQuery;

use super::error::DeserializeError;

#[derive(Clone, Debug)]
pub struct StoreCodeResponse {
    pub code_id: u64,
    pub res: ChainResponse,
    pub tx_hash: String,
    pub height: u64,
}

#[derive(Clone, Debug)]
pub struct InstantiateResponse {
    pub address: String,
    pub res: ChainResponse,
    pub tx_hash: String,
    pub height: u64,
}

#[derive(Clone, Debug)]
pub struct ExecResponse {
    pub res: ChainResponse,
    pub tx_hash: String,
    pub height: u64,
}
impl ExecResponse {
    pub fn data<'a, T: Deserialize<'a>>(&'a self) -> Result<T, DeserializeError> {
        self.res.data()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ChainResponse {
    pub code: Code,
    pub data: Option<Vec<u8>>,
    pub log: String,
    pub gas_wanted: u64,
    pub gas_used: u64,
}

impl From<TxResult> for ChainResponse {
    fn from(res: TxResult) -> ChainResponse {
        ChainResponse {
            code: res.code,
            data: res.data.map(|d| d.into()),
            log: res.log.to_string(),
            gas_wanted: res.gas_wanted.into(),
            gas_used: res.gas_used.into(),
        }
    }
}

impl From<AbciQuery> for ChainResponse {
    fn from(res: AbciQuery) -> ChainResponse {
        ChainResponse {
            code: res.code,
            data: Some(res.value),
            log: res.log.to_string(),
            gas_wanted: 0,
            gas_used: 0,
        }
    }
}

impl ChainResponse {
    pub fn data<'a, T: Deserialize<'a>>(&'a self) -> Result<T, DeserializeError> {
        let r: T = serde_json::from_slice(
            self.data
                .as_ref()
                .ok_or(DeserializeError::EmptyResponse)?
                .as_slice(),
        )?;
        Ok(r)
    }
}

/// One flattened event attribute of a secret compute transaction.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArrayLog {
    pub msg: u32,
    #[serde(rename = "type")]
    pub ty: String,
    pub key: String,
    pub value: String,
}

impl ArrayLog {
    pub fn new<S: Into<String>>(ty: S, key: S, value: S) -> Self {
        Self {
            msg: 0,
            ty: ty.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SecretTxResponse {
    pub code: u32,
    pub tx_hash: String,
    pub height: u64,
    pub gas_wanted: u64,
    pub gas_used: u64,
    pub data: Option<Vec<u8>>,
    pub raw_log: String,
    pub array_log: Vec<ArrayLog>,
}

impl SecretTxResponse {
    /// Serialized `array_log`, attached to errors for postmortem.
    pub fn serialized_log(&self) -> String {
        serde_json::to_string(&self.array_log).unwrap_or_else(|_| self.raw_log.clone())
    }
}

impl From<Response> for SecretTxResponse {
    fn from(res: Response) -> SecretTxResponse {
        // single message txs, so every attribute belongs to msg 0
        let array_log = res
            .deliver_tx
            .events
            .iter()
            .flat_map(|e| {
                e.attributes.iter().map(move |a| ArrayLog {
                    msg: 0,
                    ty: e.type_str.clone(),
                    key: a.key.to_string(),
                    value: a.value.to_string(),
                })
            })
            .collect();

        SecretTxResponse {
            code: res.deliver_tx.code.value(),
            tx_hash: res.hash.to_string(),
            height: res.height.value(),
            gas_wanted: res.deliver_tx.gas_wanted.into(),
            gas_used: res.deliver_tx.gas_used.into(),
            data: res.deliver_tx.data.map(|d| d.into()),
            raw_log: res.deliver_tx.log.to_string(),
            array_log,
        }
    }
}
