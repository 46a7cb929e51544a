//! Chain agnostic Cosmwasm client dispatch
//!
//! Store, instantiate, execute, and query [Cosmwasm] smart contracts on any supported [Cosmos] based chain,
//! including [Secret Network] with its own compute module, through one set of operations.
//!
//! The chain is picked from the address prefix of the first account configured for a network.
//! Networks without accounts are treated as Neutron.
//!
//! [cosmwasm]: https://github.com/CosmWasm/cosmwasm
//! [Cosmos]: https://github.com/cosmos/cosmos-sdk
//! [Secret Network]: https://github.com/scrtlabs/SecretNetwork
//!
//!
//! # Quick Start
//!
//! ```no_run
//! use cosm_dispatch::config::Config;
//! use cosm_dispatch::dispatch::{Dispatcher, QueryRequest};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let network = Config::from_yaml("config.yaml")?.network("testnet")?;
//! let dispatcher = Dispatcher::new();
//!
//! let client = dispatcher.get_client(&network).await?;
//! let balance = dispatcher
//!     .get_balance(Some(&client), "juno1hd9gm4mfk8c4xzmrtvhxexy6wn6qm8y2lsn3hp", &network)
//!     .await?;
//!
//! let count = dispatcher
//!     .send_query(
//!         &client,
//!         &network,
//!         QueryRequest {
//!             msg: json!({ "get_count": {} }),
//!             contract_address: "juno14hj2tavq8fpesdwxxcu44rty3hh90vhujrvcmstl4zr3txmfvw9skjuwg8".to_string(),
//!             contract_hash: String::new(),
//!         },
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;

pub mod client;

pub mod chain;

pub mod dispatch;

