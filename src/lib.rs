#![warn(unreachable_pub)]
#![warn(dead_code)]

pub mod cli;
pub mod collection;
pub mod config;
pub mod error;
pub mod index;
pub mod keys;
pub mod search;
pub mod store;
pub mod tracing;
pub mod types;

// Re-export common types
pub use collection::Collection;
pub use config::{CollectionConfig, TranslitTable};
pub use error::{ConfigError, IndexError, QueryError, Result, StoreError};
pub use search::{Eval, Expr, SearchContext};
pub use store::{Batch, Command, MemoryStore, RedisStore, Store};
pub use types::{Document, Scalar};
