pub mod batch;
pub mod bucket;
pub mod commands;
pub mod dir;
pub mod error;
pub mod file;
pub mod inspect;
pub mod output;
pub mod store;

pub use commands::{Args, Subcommands};
pub use error::Error;

type Result<T> = std::result::Result<T, Error>;
