mod public_key;
mod signature;
mod version;

pub use public_key::PublicKey;
pub use signature::Signature;
pub use version::Version;
