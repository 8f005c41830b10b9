pub mod config;
pub mod error;
pub mod fs;
pub mod identity;
pub mod json;
pub mod logger;
pub mod session;
pub mod storage;
pub mod url;

#[cfg(test)]
mod testing;

pub use config::IntegrationConfig;
pub use identity::{ApplicationKey, DelegatedAppIdentity, DelegationChain};
pub use session::{IIIntegration, IIIntegrationBuilder, LoginParams};
pub use storage::Storage;
