pub mod client;

pub use crate::domain::model::{CustomerLookup, CustomerQuery, CustomerUpdate, NewCustomer, Params};
pub use crate::domain::ports::{ConnectionSettings, Gateway};
pub use crate::utils::error::Result;
