//! Page routes and the sign-in gate

use std::fmt;

use crate::core::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Signup,
    Dashboard,
    Employees,
    Shifts,
    Terms,
    Privacy,
}

impl Route {
    pub const ALL: [Route; 8] = [
        Route::Home,
        Route::Login,
        Route::Signup,
        Route::Dashboard,
        Route::Employees,
        Route::Shifts,
        Route::Terms,
        Route::Privacy,
    ];

    /// Sidebar entries, in display order
    pub const NAVIGATION: [Route; 4] = [
        Route::Dashboard,
        Route::Home,
        Route::Employees,
        Route::Shifts,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::Dashboard => "/dashboard",
            Route::Employees => "/employees",
            Route::Shifts => "/shifts",
            Route::Terms => "/terms",
            Route::Privacy => "/privacy",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Login => "Login",
            Route::Signup => "Sign up",
            Route::Dashboard => "Dashboard",
            Route::Employees => "Employees",
            Route::Shifts => "Shifts",
            Route::Terms => "Terms of Service",
            Route::Privacy => "Privacy Policy",
        }
    }

    /// Match a location path; a trailing slash is ignored
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            other => other,
        };
        Self::ALL.into_iter().find(|r| r.path() == normalized)
    }

    /// Pages behind the sign-in gate
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Dashboard | Route::Employees | Route::Shifts)
    }

    /// Page to render for this route given the session
    pub fn resolve(self, session: &Session) -> Route {
        if self.is_protected() && !session.is_authenticated() {
            Route::Login
        } else {
            self
        }
    }

    /// Where to go after signing out
    pub fn after_logout() -> Route {
        Route::Home
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
