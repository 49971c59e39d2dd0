// --- File: crates/clinic_booking/src/guard.rs ---
//! Route access rules.

use clinic_api::{Role, Session, SessionContext, SessionState};
use clinic_common::{auth_error, forbidden, ClinicError};

/// Who may open a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    Authenticated,
    Roles(Vec<Role>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// The session has not finished loading.
    Pending,
    RedirectToLogin,
    /// Signed in, but without a role the route accepts.
    RedirectToHome,
    Allow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Book,
    MyAppointments,
    AdminPanel,
    AdminBook,
    AdminEdit,
}

impl Route {
    /// Where signed-in users land, and where role mismatches are sent.
    pub const HOME: Route = Route::MyAppointments;

    pub const ALL: [Route; 7] = [
        Route::Login,
        Route::Register,
        Route::Book,
        Route::MyAppointments,
        Route::AdminPanel,
        Route::AdminBook,
        Route::AdminEdit,
    ];

    pub fn access(&self) -> RouteAccess {
        match self {
            Route::Login | Route::Register => RouteAccess::Public,
            Route::Book | Route::MyAppointments => {
                RouteAccess::Roles(vec![Role::Patient, Role::Admin])
            }
            Route::AdminPanel | Route::AdminBook | Route::AdminEdit => {
                RouteAccess::Roles(vec![Role::Admin])
            }
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Book => "/agendar",
            Route::MyAppointments => "/mis-citas",
            Route::AdminPanel => "/admin",
            Route::AdminBook => "/admin/agendar-paciente",
            Route::AdminEdit => "/admin/editar",
        }
    }
}

pub fn guard(state: &SessionState, access: &RouteAccess) -> GuardDecision {
    if *access == RouteAccess::Public {
        return GuardDecision::Allow;
    }
    match state {
        SessionState::Loading => GuardDecision::Pending,
        SessionState::Anonymous => GuardDecision::RedirectToLogin,
        SessionState::Authenticated(session) => match access {
            RouteAccess::Roles(roles) if !roles.contains(&session.role) => {
                GuardDecision::RedirectToHome
            }
            _ => GuardDecision::Allow,
        },
    }
}

/// Resolve a protected route to the session allowed to use it.
pub fn require(session: &SessionContext, route: Route) -> Result<Session, ClinicError> {
    match guard(&session.state(), &route.access()) {
        GuardDecision::Pending => Err(auth_error("Cargando sesión")),
        GuardDecision::RedirectToLogin => Err(auth_error("Inicia sesión para continuar")),
        GuardDecision::RedirectToHome => Err(forbidden("Acceso denegado.")),
        GuardDecision::Allow => session
            .current()
            .ok_or_else(|| auth_error("Inicia sesión para continuar")),
    }
}
