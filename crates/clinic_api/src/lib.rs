// --- File: crates/clinic_api/src/lib.rs ---
pub mod client;
pub mod session;

pub use client::{create_client, extract_error_message, ApiClient, LOGIN_FAILED};
pub use session::{
    Capabilities, FileSessionStore, MemorySessionStore, Role, Session, SessionContext,
    SessionState, SessionStore,
};
