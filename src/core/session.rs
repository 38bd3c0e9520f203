//! Authentication session
//!
//! The session holds the bearer token for the current user. It is created
//! once at start-up with [`Session::restore`], which reads any persisted
//! token, and is shared (behind an `Arc`) with the API client so every
//! request carries the token.
//!
//! Two stores mirror the "remember me" choice at login:
//! - the persistent store survives restarts ([`FileTokenStore`])
//! - the ephemeral store lives as long as the process ([`MemoryTokenStore`])

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised by token stores
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read token from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write token to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove token at {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session state is poisoned")]
    Poisoned,
}

/// Whether the current user is signed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Authenticated,
    Anonymous,
}

/// Storage backend for a bearer token
pub trait TokenStore: Send + Sync {
    /// Read the stored token, if any
    fn load(&self) -> Result<Option<String>, SessionError>;

    /// Store a token, replacing any previous one
    fn save(&self, token: &str) -> Result<(), SessionError>;

    /// Remove the stored token; clearing an empty store is not an error
    fn clear(&self) -> Result<(), SessionError>;
}

/// Token kept in a single file on disk
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SessionError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| SessionError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        std::fs::write(&self.path, token).map_err(|source| SessionError::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// Token kept in memory for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        let token = self.token.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(token.clone())
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        let mut slot = self.token.lock().map_err(|_| SessionError::Poisoned)?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut slot = self.token.lock().map_err(|_| SessionError::Poisoned)?;
        *slot = None;
        Ok(())
    }
}

/// The signed-in user's credentials for the current process
pub struct Session {
    token: RwLock<Option<String>>,
    persistent: Arc<dyn TokenStore>,
    ephemeral: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Build a session and load a previously stored token.
    ///
    /// The persistent store wins over the ephemeral one.
    pub fn restore(
        persistent: Arc<dyn TokenStore>,
        ephemeral: Arc<dyn TokenStore>,
    ) -> Result<Self, SessionError> {
        let token = match persistent.load()? {
            Some(token) => Some(token),
            None => ephemeral.load()?,
        };
        debug!(restored = token.is_some(), "Session initialised");
        Ok(Self {
            token: RwLock::new(token),
            persistent,
            ephemeral,
        })
    }

    /// Session with in-memory stores only
    pub fn in_memory() -> Self {
        Self {
            token: RwLock::new(None),
            persistent: Arc::new(MemoryTokenStore::new()),
            ephemeral: Arc::new(MemoryTokenStore::new()),
        }
    }

    /// Store a freshly issued token.
    ///
    /// With `remember` the token goes to the persistent store, otherwise it
    /// only lives for this process. The other store is cleared so the two
    /// never hold different tokens.
    pub fn login(&self, token: impl Into<String>, remember: bool) -> Result<(), SessionError> {
        let token = token.into();
        let (target, other) = if remember {
            (&self.persistent, &self.ephemeral)
        } else {
            (&self.ephemeral, &self.persistent)
        };
        target.save(&token)?;
        other.clear()?;
        let mut slot = self.token.write().map_err(|_| SessionError::Poisoned)?;
        *slot = Some(token);
        info!(remember, "Signed in");
        Ok(())
    }

    /// Forget the token everywhere
    pub fn logout(&self) -> Result<(), SessionError> {
        self.persistent.clear()?;
        self.ephemeral.clear()?;
        let mut slot = self.token.write().map_err(|_| SessionError::Poisoned)?;
        *slot = None;
        info!("Signed out");
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .map(|t| t.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn state(&self) -> AuthState {
        if self.is_authenticated() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        }
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> Option<String> {
        self.token().map(|t| format!("Bearer {}", t))
    }
}
