pub mod args;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod session;
pub mod source;
mod utils;


pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use model::Amount;
pub use pipeline::{Pipeline, Settings};
pub use session::{Session, Snapshot};
