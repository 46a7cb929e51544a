pub mod cfg;

pub mod error;

pub use cfg::{Account, Config, Coin, FeeConfig, Network, NetworkConfig, TxnFee};
