//! Route table and navigation guard
//!
//! Routes carry two flags, `requires_auth` and `requires_admin`, checked
//! before entering the route:
//!
//! | Unmet flag | Redirect |
//! |------------|----------|
//! | requires_auth | `/login` |
//! | requires_admin | `/` |

use std::collections::BTreeMap;

use crate::session::Session;
use crate::store::AuthStore;

/// Home route
pub const HOME_PATH: &str = "/";

/// Login route
pub const LOGIN_PATH: &str = "/login";

/// Route gating flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub requires_admin: bool,
}

impl RouteMeta {
    pub const PUBLIC: Self = Self {
        requires_auth: false,
        requires_admin: false,
    };
    pub const AUTH: Self = Self {
        requires_auth: true,
        requires_admin: false,
    };
    pub const ADMIN: Self = Self {
        requires_auth: true,
        requires_admin: true,
    };
}

/// A named route; `:name` segments capture parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub path: &'static str,
    pub meta: RouteMeta,
}

/// Storefront routes
pub const ROUTES: &[Route] = &[
    Route { name: "Home", path: "/", meta: RouteMeta::PUBLIC },
    Route { name: "Products", path: "/products", meta: RouteMeta::PUBLIC },
    Route { name: "ProductDetail", path: "/product/:id", meta: RouteMeta::PUBLIC },
    Route { name: "Cart", path: "/cart", meta: RouteMeta::PUBLIC },
    Route { name: "Checkout", path: "/checkout", meta: RouteMeta::AUTH },
    Route { name: "Login", path: "/login", meta: RouteMeta::PUBLIC },
    Route { name: "Register", path: "/register", meta: RouteMeta::PUBLIC },
    Route { name: "Profile", path: "/profile", meta: RouteMeta::AUTH },
    Route { name: "AdminDashboard", path: "/admin", meta: RouteMeta::ADMIN },
];

/// A resolved path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: &'static Route,
    pub params: BTreeMap<String, String>,
}

impl RouteMatch {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Match `path` against the route table. Query string and fragment are ignored.
pub fn resolve(path: &str) -> Option<RouteMatch> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let wanted = segments(path);

    ROUTES.iter().find_map(|route| {
        let pattern = segments(route.path);
        if pattern.len() != wanted.len() {
            return None;
        }
        let mut params = BTreeMap::new();
        for (pat, seg) in pattern.iter().zip(&wanted) {
            match pat.strip_prefix(':') {
                Some(name) => {
                    params.insert(name.to_string(), (*seg).to_string());
                }
                None if pat == seg => {}
                None => return None,
            }
        }
        Some(RouteMatch { route, params })
    })
}

/// Session flags the guard looks at
pub trait SessionFlags {
    fn is_authenticated(&self) -> bool;
    fn is_admin(&self) -> bool;
}

impl SessionFlags for Session {
    fn is_authenticated(&self) -> bool {
        Session::is_authenticated(self)
    }

    fn is_admin(&self) -> bool {
        Session::is_admin(self)
    }
}

impl SessionFlags for AuthStore {
    fn is_authenticated(&self) -> bool {
        AuthStore::is_authenticated(self)
    }

    fn is_admin(&self) -> bool {
        AuthStore::is_admin(self)
    }
}

/// Guard decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Proceed,
    Redirect(&'static str),
}

/// Check a route's flags against the session before entering it
pub fn before_each(meta: &RouteMeta, session: &impl SessionFlags) -> Navigation {
    if meta.requires_auth && !session.is_authenticated() {
        Navigation::Redirect(LOGIN_PATH)
    } else if meta.requires_admin && !session.is_admin() {
        Navigation::Redirect(HOME_PATH)
    } else {
        Navigation::Proceed
    }
}
