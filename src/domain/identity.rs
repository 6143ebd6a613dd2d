use std::{
    fmt,
    time::{Duration, Instant},
};

/// Opaque caller identity issued by the code endpoint after verification.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityToken(String);

impl IdentityToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdentityToken([REDACTED])")
    }
}

/// In-memory sign-in state passed explicitly to the flows that need it.
#[derive(Debug, Clone, Default)]
pub struct IdentitySession {
    token: Option<IdentityToken>,
    issued_at: Option<Instant>,
    ttl: Option<Duration>,
}

impl IdentitySession {
    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            ttl,
            ..Self::default()
        }
    }

    pub fn sign_in(&mut self, token: IdentityToken, now: Instant) {
        self.token = Some(token);
        self.issued_at = Some(now);
    }

    pub fn sign_out(&mut self) {
        self.token = None;
        self.issued_at = None;
    }

    /// Returns the token if it has not outlived the configured TTL.
    pub fn live_token(&self, now: Instant) -> Option<&IdentityToken> {
        let token = self.token.as_ref()?;

        match (self.ttl, self.issued_at) {
            (Some(ttl), Some(issued_at)) if now.saturating_duration_since(issued_at) >= ttl => {
                None
            }
            _ => Some(token),
        }
    }

    /// Drops an expired token. Returns true when something was dropped.
    pub fn expire_if_stale(&mut self, now: Instant) -> bool {
        if self.token.is_some() && self.live_token(now).is_none() {
            tracing::info!(code = "SESSION_EXPIRED", "identity token expired");
            self.sign_out();
            return true;
        }

        false
    }

    pub fn is_signed_in(&self, now: Instant) -> bool {
        self.live_token(now).is_some()
    }
}
