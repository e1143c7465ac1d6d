pub mod cli;
pub mod config;
pub mod error;
pub mod parser;
pub mod schema;
pub mod seed;
pub mod writer;

pub use cli::{Cli, Commands};
pub use error::{SeedError, Stage};
pub use seed::{SeedOptions, SeedReport, Seeder, SkipLog};
pub use writer::SqliteWriter;
