pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{open_store, Settings, TomlConfig};

pub use crate::adapters::{LocalStorage, MemoryStorage, TerminalView};
pub use crate::core::{
    engine::{DisplayState, ListingEngine},
    persistence::{LoadReport, Persistence},
    query::{SearchResult, ViewMode},
    store::ListingStore,
};
pub use crate::domain::{
    catalog::Catalog,
    model::{Car, CarFields},
    ports::{Severity, Storage, View},
};
pub use crate::utils::error::{ListingError, Result};
