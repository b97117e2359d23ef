#![forbid(unsafe_code)]

pub mod config;
pub mod logging;
pub mod spelling;
mod store;

pub use config::StoreConfig;
pub use spelling::{SpellChecker, SpellError};
pub use store::*;
