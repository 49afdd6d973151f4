use std::fmt;
use tracing::{debug, info};

/// Where visitors without a token are sent
pub const LOGIN_REDIRECT: &str = "/";

/// Admin bearer token. Never shown in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminToken(String);

impl AdminToken {
    /// Wrap a raw token; blank strings are not tokens
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AdminToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminToken(***)")
    }
}

/// Outcome of the admin access check, decided before any admin view loads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminAccess {
    Granted(AdminToken),
    Redirect { destination: &'static str },
}

impl AdminAccess {
    /// Check a token that may or may not be present
    pub fn check(token: Option<&str>) -> Self {
        match token.and_then(|raw| AdminToken::new(raw)) {
            Some(token) => AdminAccess::Granted(token),
            None => {
                info!("No admin token, redirecting to {}", LOGIN_REDIRECT);
                AdminAccess::Redirect {
                    destination: LOGIN_REDIRECT,
                }
            }
        }
    }

    /// Check the access-token cookie in a `Cookie` request header
    pub fn from_cookie_header(header: Option<&str>, cookie_name: &str) -> Self {
        let token = header.and_then(|h| cookie_value(h, cookie_name));
        debug!("Admin cookie {:?} present: {}", cookie_name, token.is_some());
        Self::check(token)
    }

    pub fn token(&self) -> Option<&AdminToken> {
        match self {
            AdminAccess::Granted(token) => Some(token),
            AdminAccess::Redirect { .. } => None,
        }
    }
}

/// Value of `name` in a `Cookie` header (`a=1; b=2`)
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_redirects() {
        assert_eq!(
            AdminAccess::check(None),
            AdminAccess::Redirect { destination: "/" }
        );
        assert_eq!(
            AdminAccess::check(Some("  ")),
            AdminAccess::Redirect { destination: "/" }
        );
    }

    #[test]
    fn token_from_cookie_header() {
        let header = "theme=dark; access_token=abc.def; lang=pt-BR";
        let access = AdminAccess::from_cookie_header(Some(header), "access_token");
        assert_eq!(access.token().map(AdminToken::expose), Some("abc.def"));

        let other = AdminAccess::from_cookie_header(Some(header), "session");
        assert!(other.token().is_none());
        assert!(AdminAccess::from_cookie_header(None, "access_token").token().is_none());
    }

    #[test]
    fn debug_hides_token() {
        let token = AdminToken::new("super-secret").unwrap();
        assert!(!format!("{:?}", token).contains("super-secret"));
    }

    #[test]
    fn empty_cookie_value_is_no_token() {
        let access = AdminAccess::from_cookie_header(Some("access_token="), "access_token");
        assert!(matches!(access, AdminAccess::Redirect { .. }));
    }
}
