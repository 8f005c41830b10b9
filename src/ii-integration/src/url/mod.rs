//! Outbound authentication URLs and inbound callback URLs.
pub mod builder;
pub mod callback;
pub mod deep_link;
pub mod provider;

pub use builder::{build_ii_integration_url, normalize_path, IIIntegrationUrlArgs};
pub use callback::{parse_delegation_from_url, CallbackBinding, CallbackBindingKind};
pub use deep_link::{resolve_deep_link_type, DeepLinkType};
pub use provider::ProviderNetwork;
