//! Sign-in session credentials.

/// Cookie carrying the server-issued nonce binding.
pub const NONCE_COOKIE: &str = "polymarketnonce";

/// Cookie carrying the authenticated session.
pub const SESSION_COOKIE: &str = "polymarketsession";

/// Cookie naming the wallet provider used to sign in.
pub const AUTH_TYPE_COOKIE: &str = "polymarketauthtype";

/// Wallet provider reported to the platform.
pub const AUTH_PROVIDER: &str = "metamask";

/// A one-time nonce together with the cookie that scopes it.
#[derive(Clone, PartialEq, Eq)]
pub struct NonceGrant {
    pub nonce: String,
    pub nonce_cookie: String,
}

impl NonceGrant {
    pub fn new(nonce: impl Into<String>, nonce_cookie: impl Into<String>) -> Self {
        Self {
            nonce: nonce.into(),
            nonce_cookie: nonce_cookie.into(),
        }
    }
}

impl std::fmt::Debug for NonceGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonceGrant")
            .field("nonce", &self.nonce)
            .field("nonce_cookie", &"[REDACTED]")
            .finish()
    }
}

/// Authenticated session used by every call after login.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    nonce_cookie: String,
    session_cookie: String,
}

impl Session {
    pub fn new(nonce_cookie: impl Into<String>, session_cookie: impl Into<String>) -> Self {
        Self {
            nonce_cookie: nonce_cookie.into(),
            session_cookie: session_cookie.into(),
        }
    }

    pub fn session_cookie(&self) -> &str {
        &self.session_cookie
    }

    /// Value for the `Cookie` request header.
    pub fn cookie_header(&self) -> String {
        format!(
            "{NONCE_COOKIE}={}; {SESSION_COOKIE}={}; {AUTH_TYPE_COOKIE}={AUTH_PROVIDER}",
            self.nonce_cookie, self.session_cookie
        )
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Session cookies are bearer credentials
        f.debug_struct("Session")
            .field("nonce_cookie", &"[REDACTED]")
            .field("session_cookie", &"[REDACTED]")
            .finish()
    }
}
