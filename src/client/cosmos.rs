use cosmos_sdk_proto::cosmos::auth::v1beta1::{
    BaseAccount, QueryAccountRequest, QueryAccountResponse,
};
use cosmos_sdk_proto::cosmos::bank::v1beta1::{QueryBalanceRequest, QueryBalanceResponse};
use cosmrs::rpc::endpoint::broadcast::tx_commit::Response;
use cosmrs::rpc::{Client, HttpClient};
use cosmrs::tendermint::abci::{Code, Event, Path};
use cosmrs::tendermint::chain;
use cosmrs::tx::{self, Fee, SignDoc, SignerInfo};
use cosmrs::{AccountId, Any};
use prost::Message;
use tendermint_rpc::endpoint::abci_query::AbciQuery;

use super::error::ClientError;
use super::key::Wallet;
use crate::config::cfg::{Coin, TxnFee};

pub async fn send_tx(
    client: &HttpClient,
    msg: Any,
    wallet: &Wallet,
    chain_id: &str,
    fee: Fee,
    memo: &str,
) -> Result<Response, ClientError> {
    let timeout_height = 0u16;
    let account = account(client, wallet.address()).await?;

    let tx_body = tx::Body::new(vec![msg], memo, timeout_height);

    let chain_id: chain::Id = chain_id.parse().map_err(|_| ClientError::ChainId {
        chain_id: chain_id.to_string(),
    })?;

    // the signing key never lives across an await point
    let tx_raw = {
        let key = wallet.signing_key();

        let auth_info =
            SignerInfo::single_direct(Some(key.public_key()), account.sequence).auth_info(fee);

        let sign_doc = SignDoc::new(&tx_body, &auth_info, &chain_id, account.account_number)
            .map_err(ClientError::proto_encoding)?;

        sign_doc.sign(&key).map_err(ClientError::crypto)?
    };

    let tx_commit_response = tx_raw
        .broadcast_commit(client)
        .await
        .map_err(ClientError::proto_encoding)?;

    if tx_commit_response.check_tx.code.is_err() {
        return Err(ClientError::CosmosSdk {
            res: tx_commit_response.check_tx.into(),
        });
    }
    if tx_commit_response.deliver_tx.code.is_err() {
        return Err(ClientError::CosmosSdk {
            res: tx_commit_response.deliver_tx.into(),
        });
    }

    Ok(tx_commit_response)
}

pub async fn abci_query<T: Message>(
    client: &HttpClient,
    req: T,
    path: &str,
) -> Result<AbciQuery, ClientError> {
    let mut buf = Vec::with_capacity(req.encoded_len());
    req.encode(&mut buf).map_err(ClientError::prost_proto_en)?;

    let query_path: Path = path.parse().map_err(|_| ClientError::QueryPath {
        path: path.to_string(),
    })?;

    let res = client.abci_query(Some(query_path), buf, None, false).await?;

    if res.code != Code::Ok {
        return Err(ClientError::CosmosSdk { res: res.into() });
    }

    Ok(res)
}

async fn account(client: &HttpClient, account_id: &AccountId) -> Result<BaseAccount, ClientError> {
    let res = abci_query(
        client,
        QueryAccountRequest {
            address: account_id.to_string(),
        },
        "/cosmos.auth.v1beta1.Query/Account",
    )
    .await?;

    let res = QueryAccountResponse::decode(res.value.as_slice())
        .map_err(ClientError::prost_proto_de)?
        .account
        .ok_or(ClientError::AccountId {
            id: account_id.to_string(),
        })?;

    let base_account =
        BaseAccount::decode(res.value.as_slice()).map_err(ClientError::prost_proto_de)?;

    Ok(base_account)
}

/// Bank balance of `address` in `denom`, `None` when the node returns no coin.
pub async fn bank_balance(
    client: &HttpClient,
    address: &str,
    denom: &str,
) -> Result<Option<Coin>, ClientError> {
    let res = abci_query(
        client,
        QueryBalanceRequest {
            address: address.to_string(),
            denom: denom.to_string(),
        },
        "/cosmos.bank.v1beta1.Query/Balance",
    )
    .await?;

    let balance = QueryBalanceResponse::decode(res.value.as_slice())
        .map_err(ClientError::prost_proto_de)?
        .balance;

    Ok(balance.map(|c| Coin::new(c.amount, c.denom)))
}

pub async fn chain_id(client: &HttpClient) -> Result<String, ClientError> {
    Ok(client.status().await?.node_info.network.to_string())
}

pub async fn height(client: &HttpClient) -> Result<u64, ClientError> {
    Ok(client.status().await?.sync_info.latest_block_height.value())
}

pub fn find_event(res: &Response, key_name: &str) -> Option<Event> {
    for event in &res.deliver_tx.events {
        if event.type_str == key_name {
            return Some(event.clone());
        }
    }
    None
}

/// Value of `attribute` inside the first `event` emitted by the tx.
pub fn event_attribute(res: &Response, event: &str, attribute: &str) -> Result<String, ClientError> {
    find_event(res, event)
        .and_then(|e| {
            e.attributes
                .iter()
                .find(|a| a.key.to_string() == attribute)
                .map(|a| a.value.to_string())
        })
        .ok_or_else(|| ClientError::MissingEvent {
            event: event.to_string(),
            attribute: attribute.to_string(),
        })
}

pub fn parse_account(address: &str) -> Result<AccountId, ClientError> {
    address.parse().map_err(|_| ClientError::AccountId {
        id: address.to_string(),
    })
}

impl TryFrom<&Coin> for cosmrs::Coin {
    type Error = ClientError;

    fn try_from(coin: &Coin) -> Result<cosmrs::Coin, ClientError> {
        let amount = coin
            .amount
            .trim()
            .parse::<u64>()
            .map_err(|_| ClientError::FeeValue {
                value: coin.amount.clone(),
            })?;

        Ok(cosmrs::Coin {
            denom: coin.denom.parse().map_err(|_| ClientError::Denom {
                name: coin.denom.clone(),
            })?,
            amount: amount.into(),
        })
    }
}

pub fn cosmos_coins(coins: &[Coin]) -> Result<Vec<cosmrs::Coin>, ClientError> {
    coins.iter().map(cosmrs::Coin::try_from).collect()
}

/// Converts a configured fee into the fee attached to a standard tx.
pub fn cosmos_fee(fee: &TxnFee) -> Result<Fee, ClientError> {
    let gas = fee
        .gas
        .trim()
        .parse::<u64>()
        .map_err(|_| ClientError::FeeValue {
            value: fee.gas.clone(),
        })?;

    let mut amount = cosmos_coins(&fee.amount)?.into_iter();
    let first = amount.next().ok_or_else(|| ClientError::FeeValue {
        value: format!("{:?}", fee.amount),
    })?;

    let mut fee = Fee::from_amount_and_gas(first, gas);
    fee.amount.extend(amount);

    Ok(fee)
}
