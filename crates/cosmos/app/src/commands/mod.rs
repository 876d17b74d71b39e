//! Command definitions of the Cosmos application
pub mod chunk;
pub use chunk::*;
pub mod get_public_key;
pub use get_public_key::*;
pub mod get_version;
pub use get_version::*;
