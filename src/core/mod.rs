pub mod engine;
pub mod persistence;
pub mod query;
pub mod store;

pub use crate::domain::catalog::Catalog;
pub use crate::domain::model::{Car, CarFields, CarRecord};
pub use crate::domain::ports::{ConfigProvider, Severity, Storage, View};
pub use crate::utils::error::Result;
