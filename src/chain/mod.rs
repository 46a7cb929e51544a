pub mod identity;

pub mod fee;

pub mod logs;

pub use identity::{classify, ChainFamily, ChainIdentity, DEFAULT_CHAIN};
