pub mod error;

pub mod chain_res;

pub(crate) mod cosmos;

pub mod cosmwasm;

pub mod secret;

pub mod key;

pub mod connector;

pub use cosmrs::tendermint::abci::Code;
