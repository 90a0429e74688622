//! Observable login session.
//!
//! # Design
//! `SessionStore` is constructed once by the host and passed by reference.
//! State lives behind a `RwLock` and is replaced wholesale on every
//! transition. Transitions are serialized by a dispatch lock held from the
//! state write through the last observer call, so observers see
//! transitions in the order they were applied and the last one they see
//! is the stored state. The state lock itself is released before
//! observers run, so an observer may read the store again; it must not
//! call `login`, `register`, `apply_auth` or `logout` from inside the
//! callback. Poisoned locks are recovered.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{info, warn};

use crate::api::SodamApi;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{AuthResponse, LoginRequest, RegisterRequest, User};
use crate::validation::{validate_login, validate_registration};

/// Shown when a rejected auth response carries no message of its own.
pub const DEFAULT_AUTH_FAILURE: &str = "로그인에 실패했습니다.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated {
        user: User,
        /// Absent after a registration that returned no token.
        token: Option<String>,
    },
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Authenticated { user, .. } => Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn as_u64(self) -> u64 {
        self.0
    }

    pub fn from_u64(raw: u64) -> Self {
        Self(raw)
    }
}

pub type Observer = Arc<dyn Fn(&SessionState) + Send + Sync>;

#[derive(Default)]
struct Observers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Observer)>,
}

#[derive(Default)]
pub struct SessionStore {
    state: RwLock<SessionState>,
    observers: Mutex<Observers>,
    dispatch: Mutex<()>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_authenticated()
    }

    /// Validate, call `/auth/login`, then apply the answer.
    ///
    /// Empty fields fail with `ApiError::Validation` before any request.
    pub fn login<T: Transport>(
        &self,
        api: &SodamApi<T>,
        username: &str,
        password: &str,
    ) -> Result<User, ApiError> {
        validate_login(username, password)?;
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = api.login(&request).inspect_err(|e| {
            warn!(username, error = %e, "login request failed");
        })?;
        self.apply_auth(response)
    }

    /// Validate, call `/auth/register`, then apply the answer. A successful
    /// registration signs the user in, with or without a token.
    pub fn register<T: Transport>(
        &self,
        api: &SodamApi<T>,
        input: &RegisterRequest,
    ) -> Result<User, ApiError> {
        validate_registration(input)?;
        let response = api.register(input).inspect_err(|e| {
            warn!(username = %input.username, error = %e, "registration request failed");
        })?;
        self.apply_auth(response)
    }

    /// Transition on an auth response obtained elsewhere.
    ///
    /// On success the state becomes `Authenticated` and observers are
    /// notified once. On failure the state is left as it was.
    pub fn apply_auth(&self, response: AuthResponse) -> Result<User, ApiError> {
        let user = match response.user.clone() {
            Some(user) if response.success() => user,
            _ => {
                let message = response
                    .failure_message()
                    .filter(|m| !m.is_empty())
                    .unwrap_or(DEFAULT_AUTH_FAILURE)
                    .to_string();
                warn!(reason = %message, "auth response rejected");
                return Err(ApiError::AuthRejected(message));
            }
        };
        info!(user_id = user.id, username = %user.username, "signed in");
        self.replace(SessionState::Authenticated {
            user: user.clone(),
            token: response.access_token,
        });
        Ok(user)
    }

    /// Clear the session. Observers are notified even when already signed out.
    pub fn logout(&self) {
        info!("signed out");
        self.replace(SessionState::Anonymous);
    }

    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&SessionState) + Send + Sync + 'static,
    {
        let mut observers = self.observers.lock().unwrap_or_else(PoisonError::into_inner);
        observers.next_id += 1;
        let id = SubscriptionId(observers.next_id);
        observers.entries.push((id, Arc::new(observer)));
        id
    }

    /// Returns false when `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.lock().unwrap_or_else(PoisonError::into_inner);
        let before = observers.entries.len();
        observers.entries.retain(|(sid, _)| *sid != id);
        observers.entries.len() != before
    }

    fn replace(&self, next: SessionState) {
        let _dispatch = self.dispatch.lock().unwrap_or_else(PoisonError::into_inner);
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            *state = next.clone();
        }
        let observers: Vec<Observer> = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .iter()
            .map(|(_, o)| Arc::clone(o))
            .collect();
        for observer in observers {
            observer(&next);
        }
    }
}
