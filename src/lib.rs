pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::soap::{ServiceDescription, SoapGateway};
pub use config::ClientConfig;
pub use crate::core::client::EconomicClient;
pub use domain::model::{
    value_handle, CustomerLookup, CustomerQuery, CustomerUpdate, Handle, NewCustomer, Params,
};
pub use domain::ports::{ConnectionSettings, Gateway};
pub use utils::error::{EconomicError, Result};
