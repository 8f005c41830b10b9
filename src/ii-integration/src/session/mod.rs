//! The login session: hand-off to the authentication page and the state machine
//! around it.
pub mod handoff;
pub mod orchestrator;
pub mod redirect;
pub mod token;

pub use handoff::{Browser, Handoff, Messenger, MessengerResponse, Platform};
pub use orchestrator::{AuthPhase, AuthStatus, Authenticated, IIIntegration, IIIntegrationBuilder};
pub use redirect::LoginParams;
