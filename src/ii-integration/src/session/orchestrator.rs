use crate::config::{
    IntegrationConfig, APP_KEY_SUFFIX, DELEGATION_SUFFIX, REDIRECT_PATH_SUFFIX,
    SESSION_ID_SUFFIX,
};
use crate::error::config::BuildIntegrationError;
use crate::error::config::BuildIntegrationError::{
    MissingBrowser, MissingMessenger, MissingRegularStorage, MissingSecureStorage,
};
use crate::error::session::HandleCallbackError::{
    ConsumeRedirectPathFailed, FindSessionIdFailed, RemoveSessionIdFailed,
};
use crate::error::session::LoginError::{
    GenerateAppKeyFailed, GenerateSessionIdFailed, SaveAppKeyFailed, SaveRedirectPathFailed,
    SaveSessionIdFailed,
};
use crate::error::session::RestoreSessionError::{
    BuildIdentityFailed, FindAppKeyFailed, FindDelegationFailed, PurgeDelegationFailed,
};
use crate::error::session::{
    HandleCallbackError, InitializeError, LoginError, LogoutError, RestoreSessionError,
};
use crate::identity::{build_identity, build_identity_from_delegation, ApplicationKey};
use crate::identity::{DelegatedAppIdentity, DelegationChain};
use crate::session::handoff::{Browser, Handoff, Messenger, MessengerResponse};
use crate::session::redirect::{consume_redirect_path, save_redirect_path, LoginParams};
use crate::session::token::generate_session_id;
use crate::storage::{AppKeyStorage, DelegationStorage, Storage, StringValueStorage};
use crate::url::{
    build_ii_integration_url, parse_delegation_from_url, CallbackBinding, CallbackBindingKind,
    IIIntegrationUrlArgs,
};
use futures::channel::mpsc::{unbounded, UnboundedReceiver};
use futures::StreamExt;
use ic_agent::identity::AnonymousIdentity;
use ic_agent::Identity;
use slog::{debug, info, warn, Logger};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use url::Url;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthPhase {
    Uninitialized,
    Initializing,
    Authenticated,
    Anonymous,
}

/// Outcome of restoring the session from storage.
pub enum AuthStatus {
    Authenticated(Arc<DelegatedAppIdentity>),
    Anonymous,
}

impl fmt::Debug for AuthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthStatus::Authenticated(identity) => f
                .debug_tuple("Authenticated")
                .field(&identity.principal().to_text())
                .finish(),
            AuthStatus::Anonymous => f.write_str("Anonymous"),
        }
    }
}

/// A completed login.
#[derive(Debug)]
pub struct Authenticated {
    pub identity: Arc<DelegatedAppIdentity>,
    /// Route saved when the login started, already removed from storage.
    pub redirect_path: Option<String>,
}

struct SessionState {
    phase: AuthPhase,
    ready: bool,
    error: Option<String>,
}

/// Receiver for the current web login. `generation` changes whenever the receiver is
/// replaced or dropped, so a waiter holding an older receiver never puts it back.
#[derive(Default)]
struct PendingResponses {
    generation: u64,
    receiver: Option<UnboundedReceiver<MessengerResponse>>,
}

/// Drives the handshake with the Internet Identity integration page.
///
/// `initialize` restores a previous session, `login` hands off to the authentication
/// page, and the delegation comes back either through [`IIIntegration::handle_callback`]
/// (native deep link) or [`IIIntegration::next_messenger_response`] (web).
pub struct IIIntegration {
    log: Logger,
    config: IntegrationConfig,
    app_key_storage: AppKeyStorage,
    delegation_storage: DelegationStorage,
    redirect_path_storage: StringValueStorage,
    session_id_storage: StringValueStorage,
    handoff: Handoff,
    state: Mutex<SessionState>,
    messenger_responses: Mutex<PendingResponses>,
}

pub struct IIIntegrationBuilder {
    config: IntegrationConfig,
    log: Option<Logger>,
    secure_storage: Option<Arc<dyn Storage>>,
    regular_storage: Option<Arc<dyn Storage>>,
    browser: Option<Arc<dyn Browser>>,
    messenger: Option<Arc<dyn Messenger>>,
}

impl IIIntegrationBuilder {
    pub fn new(config: IntegrationConfig) -> Self {
        Self {
            config,
            log: None,
            secure_storage: None,
            regular_storage: None,
            browser: None,
            messenger: None,
        }
    }

    pub fn with_logger(mut self, log: Logger) -> Self {
        self.log = Some(log);
        self
    }

    /// Holds the application key.
    pub fn with_secure_storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.secure_storage = Some(storage);
        self
    }

    /// Holds the delegation, the redirect path and the session id.
    pub fn with_regular_storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.regular_storage = Some(storage);
        self
    }

    pub fn with_browser(mut self, browser: Arc<dyn Browser>) -> Self {
        self.browser = Some(browser);
        self
    }

    pub fn with_messenger(mut self, messenger: Arc<dyn Messenger>) -> Self {
        self.messenger = Some(messenger);
        self
    }

    pub fn build(self) -> Result<IIIntegration, BuildIntegrationError> {
        let platform = self.config.platform;
        let handoff = if platform.is_native() {
            Handoff::Native(self.browser.ok_or(MissingBrowser(platform))?)
        } else {
            Handoff::Web(self.messenger.ok_or(MissingMessenger(platform))?)
        };
        let secure_storage = self.secure_storage.ok_or(MissingSecureStorage())?;
        let regular_storage = self.regular_storage.ok_or(MissingRegularStorage())?;
        let log = self
            .log
            .unwrap_or_else(|| Logger::root(slog::Discard, slog::o!()));
        let config = self.config;

        Ok(IIIntegration {
            app_key_storage: AppKeyStorage::new(
                log.clone(),
                secure_storage,
                config.storage_key(APP_KEY_SUFFIX),
            ),
            delegation_storage: DelegationStorage::new(
                log.clone(),
                regular_storage.clone(),
                config.storage_key(DELEGATION_SUFFIX),
            ),
            redirect_path_storage: StringValueStorage::new(
                regular_storage.clone(),
                config.storage_key(REDIRECT_PATH_SUFFIX),
            ),
            session_id_storage: StringValueStorage::new(
                regular_storage,
                config.storage_key(SESSION_ID_SUFFIX),
            ),
            handoff,
            state: Mutex::new(SessionState {
                phase: AuthPhase::Uninitialized,
                ready: false,
                error: None,
            }),
            messenger_responses: Mutex::new(PendingResponses::default()),
            log,
            config,
        })
    }
}

impl IIIntegration {
    pub fn builder(config: IntegrationConfig) -> IIIntegrationBuilder {
        IIIntegrationBuilder::new(config)
    }

    pub fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    /// True once `initialize` has finished, whatever its outcome.
    pub fn is_auth_ready(&self) -> bool {
        self.lock_state().ready
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock_state().phase == AuthPhase::Authenticated
    }

    pub fn auth_phase(&self) -> AuthPhase {
        self.lock_state().phase
    }

    /// Message of the last failed `initialize`, `handle_callback` or messenger response.
    pub fn auth_error(&self) -> Option<String> {
        self.lock_state().error.clone()
    }

    pub fn clear_auth_error(&self) {
        self.lock_state().error = None;
    }

    /// Restores the session persisted by a previous run. Runs once.
    pub async fn initialize(&self) -> Result<AuthStatus, InitializeError> {
        {
            let mut state = self.lock_state();
            if state.phase != AuthPhase::Uninitialized {
                return Err(InitializeError::AlreadyInitialized());
            }
            state.phase = AuthPhase::Initializing;
        }

        let result = self.restore_session().await;

        let mut state = self.lock_state();
        state.ready = true;
        match &result {
            Ok(AuthStatus::Authenticated(identity)) => {
                info!(self.log, "Restored session for {}", identity.principal());
                state.phase = AuthPhase::Authenticated;
            }
            Ok(AuthStatus::Anonymous) => {
                debug!(self.log, "No session to restore");
                state.phase = AuthPhase::Anonymous;
            }
            Err(err) => {
                warn!(self.log, "Failed to restore session: {}", err);
                state.phase = AuthPhase::Anonymous;
                state.error = Some(err.to_string());
            }
        }
        result.map_err(InitializeError::from)
    }

    /// The identity to sign requests with: the delegated identity while a valid
    /// delegation is stored, the anonymous identity otherwise.
    pub async fn get_identity(&self) -> Result<Arc<dyn Identity>, RestoreSessionError> {
        match self.restore_session().await {
            Ok(AuthStatus::Authenticated(identity)) => Ok(identity),
            Ok(AuthStatus::Anonymous) => Ok(Arc::new(AnonymousIdentity)),
            Err(err) => {
                warn!(self.log, "Failed to get identity: {}", err);
                self.set_phase(AuthPhase::Anonymous);
                Err(err)
            }
        }
    }

    /// Starts a login and returns the URL the authentication page was opened with.
    ///
    /// Each login rotates the application key. Nothing is rolled back when a later
    /// step fails.
    pub async fn login(&self, params: &LoginParams) -> Result<Url, LoginError> {
        info!(self.log, "Logging in");
        save_redirect_path(&self.redirect_path_storage, params)
            .await
            .map_err(SaveRedirectPathFailed)?;

        let app_key = ApplicationKey::generate().map_err(GenerateAppKeyFailed)?;
        self.app_key_storage
            .save(&app_key)
            .await
            .map_err(SaveAppKeyFailed)?;

        let session_id = match self.config.callback_binding {
            CallbackBindingKind::SessionId => {
                let session_id = generate_session_id().map_err(GenerateSessionIdFailed)?;
                self.session_id_storage
                    .save(&session_id)
                    .await
                    .map_err(SaveSessionIdFailed)?;
                Some(session_id)
            }
            CallbackBindingKind::AuthPath => None,
        };

        let public_key = app_key.public_key_der();
        let url = build_ii_integration_url(&IIIntegrationUrlArgs {
            public_key: &public_key,
            network: &self.config.network,
            ii_integration_canister_id: &self.config.ii_integration_canister_id,
            deep_link_type: self.config.deep_link_type,
            deep_link: &self.config.deep_link,
            frontend_canister_id: &self.config.frontend_canister_id,
            auth_path: &self.config.auth_path,
            session_id: session_id.as_deref(),
        })?;
        debug!(self.log, "Opening authentication page");

        match &self.handoff {
            Handoff::Native(browser) => browser.open(&url).await?,
            Handoff::Web(messenger) => {
                let (sink, responses) = unbounded();
                messenger.on_success(sink);
                {
                    let mut pending = self.lock_responses();
                    pending.generation += 1;
                    pending.receiver = Some(responses);
                }
                messenger.open(&url).await?;
            }
        }
        Ok(url)
    }

    /// Handles a deep link that may carry a delegation.
    ///
    /// Returns `Ok(None)` when the URL is not a callback for the pending login.
    pub async fn handle_callback(
        &self,
        url: &str,
    ) -> Result<Option<Authenticated>, HandleCallbackError> {
        if self.is_authenticated() {
            debug!(self.log, "Already authenticated, ignoring callback");
            return Ok(None);
        }

        let result = self.handle_callback_url(url).await;
        if let Err(err) = &result {
            warn!(self.log, "Failed to handle callback: {}", err);
            self.lock_state().error = Some(err.to_string());
        }
        result
    }

    /// Waits for the authentication page to post a delegation back.
    ///
    /// Returns `Ok(None)` when no web login is pending, the messenger was closed, or
    /// another call is already waiting. A later `login` supersedes a pending wait.
    pub async fn next_messenger_response(
        &self,
    ) -> Result<Option<Authenticated>, HandleCallbackError> {
        let (generation, receiver) = {
            let mut pending = self.lock_responses();
            (pending.generation, pending.receiver.take())
        };
        let Some(mut receiver) = receiver else {
            return Ok(None);
        };

        let response = receiver.next().await;
        {
            let mut pending = self.lock_responses();
            if pending.generation != generation {
                debug!(self.log, "Messenger response superseded by a later login");
                return Ok(None);
            }
            if response.is_some() && pending.receiver.is_none() {
                pending.receiver = Some(receiver);
            }
        }
        let Some(MessengerResponse::Success { delegation }) = response else {
            return Ok(None);
        };

        let result = self.authenticate(&delegation).await;
        match &result {
            Ok(_) => self.close_messenger().await,
            Err(err) => {
                warn!(self.log, "Failed to handle messenger response: {}", err);
                self.lock_state().error = Some(err.to_string());
            }
        }
        result.map(Some)
    }

    /// Abandons a pending web login.
    pub async fn close_messenger(&self) {
        // closing drops the sinks, which ends a pending `next_messenger_response`
        if let Handoff::Web(messenger) = &self.handoff {
            messenger.close().await;
        }
        let mut pending = self.lock_responses();
        pending.generation += 1;
        pending.receiver = None;
    }

    /// Forgets the delegation. The session is anonymous afterwards even if the
    /// removal failed.
    pub async fn logout(&self) -> Result<(), LogoutError> {
        info!(self.log, "Logging out");
        let result = self.delegation_storage.remove().await;
        self.set_phase(AuthPhase::Anonymous);
        result.map_err(LogoutError::RemoveDelegationFailed)
    }

    async fn restore_session(&self) -> Result<AuthStatus, RestoreSessionError> {
        let app_key = self.app_key_storage.find().await.map_err(FindAppKeyFailed)?;
        let Some(app_key) = app_key else {
            debug!(self.log, "No app key found, generating one");
            let app_key = ApplicationKey::generate()
                .map_err(RestoreSessionError::GenerateAppKeyFailed)?;
            self.app_key_storage
                .save(&app_key)
                .await
                .map_err(RestoreSessionError::SaveAppKeyFailed)?;
            self.purge_delegation().await?;
            return Ok(AuthStatus::Anonymous);
        };

        let chain = self
            .delegation_storage
            .find()
            .await
            .map_err(FindDelegationFailed)?;
        match chain {
            Some(chain) => self.resolve_stored_chain(app_key, chain).await,
            None => Ok(AuthStatus::Anonymous),
        }
    }

    /// A chain that expired after it was read is purged rather than reported.
    async fn resolve_stored_chain(
        &self,
        app_key: ApplicationKey,
        chain: DelegationChain,
    ) -> Result<AuthStatus, RestoreSessionError> {
        match build_identity(app_key, chain) {
            Ok(identity) => Ok(AuthStatus::Authenticated(Arc::new(identity))),
            Err(err) if err.is_authentication_expired() => {
                info!(self.log, "Authentication expired, removing delegation chain");
                self.purge_delegation().await?;
                Ok(AuthStatus::Anonymous)
            }
            Err(err) => Err(BuildIdentityFailed(err)),
        }
    }

    async fn purge_delegation(&self) -> Result<(), RestoreSessionError> {
        self.delegation_storage
            .remove()
            .await
            .map_err(PurgeDelegationFailed)
    }

    async fn handle_callback_url(
        &self,
        url: &str,
    ) -> Result<Option<Authenticated>, HandleCallbackError> {
        let session_id;
        let binding = match self.config.callback_binding {
            CallbackBindingKind::SessionId => {
                session_id = self
                    .session_id_storage
                    .find()
                    .await
                    .map_err(FindSessionIdFailed)?;
                match session_id.as_deref() {
                    Some(session_id) => CallbackBinding::SessionId(session_id),
                    None => {
                        debug!(self.log, "No session id found");
                        return Ok(None);
                    }
                }
            }
            CallbackBindingKind::AuthPath => CallbackBinding::AuthPath(&self.config.auth_path),
        };

        let delegation = parse_delegation_from_url(url, &binding);
        debug!(
            self.log,
            "Delegation from URL: {}",
            if delegation.is_some() { "present" } else { "not present" }
        );
        let Some(delegation) = delegation else {
            return Ok(None);
        };

        let authenticated = self.authenticate(&delegation).await?;
        if let Handoff::Native(browser) = &self.handoff {
            browser.dismiss().await;
        }
        Ok(Some(authenticated))
    }

    async fn authenticate(&self, delegation: &str) -> Result<Authenticated, HandleCallbackError> {
        let identity = build_identity_from_delegation(
            &self.log,
            delegation,
            &self.delegation_storage,
            &self.app_key_storage,
        )
        .await?;
        info!(self.log, "Authenticated from delegation");
        self.set_phase(AuthPhase::Authenticated);

        self.session_id_storage
            .remove()
            .await
            .map_err(RemoveSessionIdFailed)?;
        let redirect_path = consume_redirect_path(&self.redirect_path_storage)
            .await
            .map_err(ConsumeRedirectPathFailed)?;
        if let Some(path) = &redirect_path {
            debug!(self.log, "Redirecting to {}", path);
        }

        Ok(Authenticated {
            identity: Arc::new(identity),
            redirect_path,
        })
    }

    fn set_phase(&self, phase: AuthPhase) {
        self.lock_state().phase = phase;
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_responses(&self) -> MutexGuard<'_, PendingResponses> {
        self.messenger_responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
