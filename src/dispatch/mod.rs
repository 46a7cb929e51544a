pub mod error;

pub mod driver;

pub mod standard;

pub mod secret;

pub mod dispatcher;

pub use dispatcher::Dispatcher;
pub use driver::{
    ChainDriver, ExecuteRequest, ExecuteResponse, InstantiateRequest, NodeInfo, QueryClient,
    QueryRequest, SigningClient, StoreCodeRequest, UploadResult,
};
