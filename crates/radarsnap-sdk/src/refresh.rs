//! The authenticated request pipeline and its refresh coordinator.
//!
//! Every authenticated request goes through [`RefreshCoordinator::execute`].
//! On a 401 the coordinator runs at most one refresh-token exchange at a
//! time: the first request to hit a 401 starts the exchange, and every
//! request that fails while it is in flight parks on a oneshot channel and
//! is resumed in arrival order once the exchange settles. The exchange and
//! the waiter drain run on a detached task, so neither a failed exchange
//! nor a caller dropping its future mid-refresh can wedge the coordinator.

use std::sync::Arc;

use tokio::sync::{Mutex, oneshot};

use radarsnap_models::{RefreshTokenRequest, RefreshTokenResponse};

use crate::error::ApiError;
use crate::http::{ApiRequest, HttpClient, HttpResponse};
use crate::store::SessionStore;

/// Endpoint the coordinator posts the refresh token to.
pub const REFRESH_PATH: &str = "/api/v1/auth/refresh";

/// Callback fired when the session is terminally unauthenticated (no
/// refresh token, or the exchange itself was rejected). Embedders use it
/// to redirect to a login screen or exit.
pub type AuthTerminalHook = Box<dyn Fn() + Send + Sync>;

enum RefreshState {
    Idle,
    Refreshing {
        waiters: Vec<oneshot::Sender<Result<String, ApiError>>>,
    },
}

/// Serialises token refreshes and retries 401-failed requests.
pub struct RefreshCoordinator {
    shared: Arc<Shared>,
}

/// State the detached refresh task needs to outlive any one caller.
struct Shared {
    http: HttpClient,
    store: SessionStore,
    state: Mutex<RefreshState>,
    on_auth_terminal: Option<AuthTerminalHook>,
}

impl RefreshCoordinator {
    /// Build a coordinator over the given transport and session store.
    pub fn new(
        http: HttpClient,
        store: SessionStore,
        on_auth_terminal: Option<AuthTerminalHook>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                http,
                store,
                state: Mutex::new(RefreshState::Idle),
                on_auth_terminal,
            }),
        }
    }

    /// Send `request` with the stored access token, refreshing and
    /// retrying once on a 401.
    ///
    /// A 401 on the retried request propagates as-is; a request is never
    /// retried more than once. When no refresh token is stored the session
    /// is ended and the original 401 is returned unchanged.
    pub async fn execute(&self, request: &ApiRequest) -> Result<HttpResponse, ApiError> {
        let bearer = self.shared.store.access_token()?;
        match self.shared.http.send(request, bearer.as_deref()).await {
            Err(ApiError::Status { status: 401, body }) => {
                let original = ApiError::Status { status: 401, body };
                let token = match self.fresh_token_after_401().await {
                    Ok(token) => token,
                    Err(ApiError::NoRefreshToken) => return Err(original),
                    Err(e) => return Err(e),
                };
                self.shared.http.send(request, Some(&token)).await
            }
            other => other,
        }
    }

    /// Obtain a usable access token after a 401.
    ///
    /// Every caller, the one that starts the exchange included, parks on a
    /// oneshot and is woken by the refresh task. The task is spawned
    /// detached: dropping a caller's future abandons its slot in the queue
    /// but never interrupts the exchange or the drain back to idle.
    async fn fresh_token_after_401(&self) -> Result<String, ApiError> {
        let (tx, rx) = oneshot::channel();
        let start_exchange = {
            let mut state = self.shared.state.lock().await;
            match &mut *state {
                RefreshState::Refreshing { waiters } => {
                    waiters.push(tx);
                    false
                }
                RefreshState::Idle => {
                    *state = RefreshState::Refreshing { waiters: vec![tx] };
                    true
                }
            }
        };

        if start_exchange {
            let shared = Arc::clone(&self.shared);
            tokio::spawn(async move {
                let outcome = shared.run_refresh_cycle().await;

                // Single drain path: back to idle before anyone resumes,
                // success and failure alike, then wake waiters in arrival
                // order.
                let waiters = {
                    let mut state = shared.state.lock().await;
                    match std::mem::replace(&mut *state, RefreshState::Idle) {
                        RefreshState::Refreshing { waiters } => waiters,
                        RefreshState::Idle => Vec::new(),
                    }
                };
                for waiter in waiters {
                    let _ = waiter.send(clone_outcome(&outcome));
                }
            });
        }

        rx.await
            .map_err(|_| ApiError::RefreshFailed("refresh task dropped".to_string()))?
    }
}

impl Shared {
    /// One full refresh cycle: read the stored refresh token, exchange it,
    /// persist the result. Any failure ends the session.
    async fn run_refresh_cycle(&self) -> Result<String, ApiError> {
        let refresh_token = match self.store.refresh_token() {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::warn!("401 with no refresh token stored, ending session");
                self.terminate_session();
                return Err(ApiError::NoRefreshToken);
            }
            Err(e) => {
                self.terminate_session();
                return Err(ApiError::RefreshFailed(e.to_string()));
            }
        };

        match self.exchange(&refresh_token).await {
            Ok(token) => Ok(token),
            Err(e) => {
                tracing::warn!(error = %e, "refresh token exchange failed, ending session");
                self.terminate_session();
                Err(ApiError::RefreshFailed(e.to_string()))
            }
        }
    }

    /// Exchange the refresh token for a new access token and persist it.
    /// The server may rotate the refresh token; when it does, the rotated
    /// token replaces the stored one.
    async fn exchange(&self, refresh_token: &str) -> Result<String, ApiError> {
        let request = ApiRequest::post(
            REFRESH_PATH,
            &RefreshTokenRequest {
                refresh_token: refresh_token.to_string(),
            },
        )?;
        let response = self.http.send(&request, None).await?;
        let tokens: RefreshTokenResponse = response.json()?;

        self.store.set_access_token(&tokens.access_token)?;
        if let Some(rotated) = &tokens.refresh_token {
            self.store.set_refresh_token(rotated)?;
        }
        tracing::debug!("access token refreshed");
        Ok(tokens.access_token)
    }

    /// End the session: wipe stored credentials and fire the terminal
    /// hook. Neither step can fail the caller.
    fn terminate_session(&self) {
        if let Err(e) = self.store.clear_session() {
            tracing::warn!(error = %e, "failed to clear session state");
        }
        if let Some(hook) = &self.on_auth_terminal {
            hook();
        }
    }
}

/// Duplicate a refresh outcome for a parked waiter. Transport errors are
/// not cloneable, so failures other than the two refresh-specific
/// variants collapse to [`ApiError::RefreshFailed`] with the original
/// message.
fn clone_outcome(outcome: &Result<String, ApiError>) -> Result<String, ApiError> {
    match outcome {
        Ok(token) => Ok(token.clone()),
        Err(ApiError::NoRefreshToken) => Err(ApiError::NoRefreshToken),
        Err(ApiError::RefreshFailed(msg)) => Err(ApiError::RefreshFailed(msg.clone())),
        Err(other) => Err(ApiError::RefreshFailed(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_outcome_preserves_token() {
        let outcome = clone_outcome(&Ok("T2".to_string()));
        assert_eq!(outcome.unwrap(), "T2");
    }

    #[test]
    fn clone_outcome_preserves_refresh_variants() {
        assert!(matches!(
            clone_outcome(&Err(ApiError::NoRefreshToken)),
            Err(ApiError::NoRefreshToken)
        ));
        let cloned = clone_outcome(&Err(ApiError::RefreshFailed("denied".to_string())));
        assert!(matches!(cloned, Err(ApiError::RefreshFailed(msg)) if msg == "denied"));
    }

    #[test]
    fn clone_outcome_collapses_other_errors() {
        let original = ApiError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        let cloned = clone_outcome(&Err(original));
        assert!(matches!(cloned, Err(ApiError::RefreshFailed(_))));
    }
}
