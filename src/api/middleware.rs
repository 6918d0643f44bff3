//! Bearer-key guards for the command routes.
//!
//! Two keys: a member key that may water and read status, and an admin key
//! that may additionally reset. With no keys configured at all, every route
//! is open (local development).

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

/// Key configuration for the dispatcher.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SecurityConfig {
    /// Member key (from PLANTBOT_API_KEY)
    pub api_key: Option<String>,
    /// Admin key (from PLANTBOT_ADMIN_KEY)
    pub admin_key: Option<String>,
}

/// Privilege a route requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Member,
    Admin,
}

impl SecurityConfig {
    /// Load keys through `lookup`, normally `std::env::var`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_key: lookup("PLANTBOT_API_KEY").filter(|k| !k.is_empty()),
            admin_key: lookup("PLANTBOT_ADMIN_KEY").filter(|k| !k.is_empty()),
        }
    }

    /// No authentication (for local development/testing).
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_keys(api_key: Option<&str>, admin_key: Option<&str>) -> Self {
        Self {
            api_key: api_key.map(String::from),
            admin_key: admin_key.map(String::from),
        }
    }

    pub fn is_open(&self) -> bool {
        self.api_key.is_none() && self.admin_key.is_none()
    }

    /// Decide whether `token` grants `access`.
    pub fn authorize(&self, token: Option<&str>, access: Access) -> Result<(), StatusCode> {
        if self.is_open() {
            return Ok(());
        }
        let Some(token) = token else {
            tracing::warn!("Missing Authorization header");
            return Err(StatusCode::UNAUTHORIZED);
        };

        let is_admin = self.admin_key.as_deref() == Some(token);
        let is_member = self.api_key.as_deref() == Some(token);

        match access {
            _ if is_admin => Ok(()),
            Access::Member if is_member => Ok(()),
            Access::Admin if is_member => {
                tracing::warn!("Member key used on an admin route");
                Err(StatusCode::FORBIDDEN)
            }
            _ => {
                tracing::warn!("Invalid API key provided");
                Err(StatusCode::UNAUTHORIZED)
            }
        }
    }
}

pub async fn require_member(
    State(config): State<SecurityConfig>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    config.authorize(bearer_token(&request)?, Access::Member)?;
    Ok(next.run(request).await)
}

pub async fn require_admin(
    State(config): State<SecurityConfig>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    config.authorize(bearer_token(&request)?, Access::Admin)?;
    Ok(next.run(request).await)
}

/// The bearer token, if an Authorization header is present. A header in any
/// other scheme is rejected outright.
fn bearer_token(request: &Request<Body>) -> Result<Option<&str>, StatusCode> {
    let Some(header) = request.headers().get("Authorization") else {
        return Ok(None);
    };
    match header.to_str().ok().and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) => Ok(Some(token)),
        None => {
            tracing::warn!("Invalid Authorization header format");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
