// --- File: crates/clinic_api/src/session.rs ---
//! Session ownership.
//!
//! The bearer token and the signed-in identity live in one `SessionContext`
//! that is handed to the HTTP client and to every workflow. Persistence goes
//! through a `SessionStore` so the CLI can keep a session between runs.

use clinic_common::{auth_error, ClinicError, Context, LoginResponse};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, info, warn};

/// Role granted by the backend at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "PACIENTE")]
    Patient,
    #[serde(rename = "ADMIN")]
    Admin,
}

impl Role {
    pub fn as_wire(&self) -> &'static str {
        match self {
            Role::Patient => "PACIENTE",
            Role::Admin => "ADMIN",
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        match self {
            Role::Patient => Capabilities {
                can_administer: false,
                can_book_for_self: true,
            },
            Role::Admin => Capabilities {
                can_administer: true,
                can_book_for_self: true,
            },
        }
    }
}

impl FromStr for Role {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PACIENTE" => Ok(Role::Patient),
            "ADMIN" => Ok(Role::Admin),
            other => Err(auth_error(format!("unsupported role '{}'", other))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// What the signed-in user may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub can_administer: bool,
    pub can_book_for_self: bool,
}

/// An authenticated session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub email: String,
    pub role: Role,
}

impl Session {
    /// Build a session from a login response, rejecting unknown roles.
    pub fn from_login(response: LoginResponse) -> Result<Self, ClinicError> {
        if response.token.trim().is_empty() {
            return Err(auth_error("login response carried no token"));
        }
        Ok(Self {
            role: response.role.parse()?,
            token: response.token,
            email: response.email,
        })
    }

    pub fn capabilities(&self) -> Capabilities {
        self.role.capabilities()
    }
}

// The token stays out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("email", &self.email)
            .field("role", &self.role)
            .finish()
    }
}

/// Where a session survives between runs.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>, ClinicError>;
    fn save(&self, session: &Session) -> Result<(), ClinicError>;
    fn clear(&self) -> Result<(), ClinicError>;
}

/// Session persisted as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, ClinicError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                // A damaged file is the same as being signed out.
                warn!("Ignoring unreadable session file {}: {}", self.path.display(), err);
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), ClinicError> {
        let raw = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("writing session file {}", self.path.display()))
    }

    fn clear(&self) -> Result<(), ClinicError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Session kept only for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, ClinicError> {
        Ok(self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, session: &Session) -> Result<(), ClinicError> {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner()) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClinicError> {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// Where the session stands right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// The store has not been read yet.
    Loading,
    Anonymous,
    Authenticated(Session),
}

pub struct SessionContext {
    store: Arc<dyn SessionStore>,
    state: RwLock<SessionState>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            state: RwLock::new(SessionState::Loading),
        }
    }

    /// A context backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    /// Read the persisted session. Leaves the context anonymous on failure.
    pub fn load(&self) -> Result<SessionState, ClinicError> {
        let loaded = self.store.load();
        let state = match &loaded {
            Ok(Some(session)) => SessionState::Authenticated(session.clone()),
            _ => SessionState::Anonymous,
        };
        self.set_state(state.clone());
        loaded?;
        debug!("Session loaded: {:?}", state);
        Ok(state)
    }

    /// Persist and activate a session after a successful login.
    pub fn establish(&self, session: Session) -> Result<(), ClinicError> {
        self.store.save(&session)?;
        info!("Signed in as {} ({})", session.email, session.role);
        self.set_state(SessionState::Authenticated(session));
        Ok(())
    }

    /// Forget the session, in memory and in the store.
    pub fn clear(&self) -> Result<(), ClinicError> {
        self.set_state(SessionState::Anonymous);
        self.store.clear()
    }

    pub fn state(&self) -> SessionState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn current(&self) -> Option<Session> {
        match self.state() {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<String> {
        self.current().map(|session| session.token)
    }

    fn set_state(&self, state: SessionState) {
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = state;
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("state", &self.state())
            .finish()
    }
}
