pub mod args;
pub mod coerce;
pub mod commands;
mod config;
mod error;
pub mod export;
pub mod load;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod producer;
pub mod report;
pub mod resolve;
pub mod unify;
mod utils;


pub use config::{Config, SourceFile, Sources};
pub use error::Error;
pub use error::Result;
pub use model::Amount;
