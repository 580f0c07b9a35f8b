pub mod data;
pub mod io;


pub use data::{Config, ResolvedSettings};
pub use io::ConfigError;
