//! Anti-forgery tokens ("nonces") for form submissions.
//!
//! A token is bound to an action name and a time window. Forms embed a
//! token created for the action they perform; the handler verifies it
//! before mutating anything.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::ServiceError;

type HmacSha256 = Hmac<Sha256>;

/// Default token lifetime: one day.
pub const DEFAULT_LIFETIME: Duration = Duration::from_secs(86_400);

/// Truncated MAC length in bytes (20 hex chars on the wire).
const TOKEN_BYTES: usize = 10;

/// Outcome of verifying a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceCheck {
    /// Issued in the current half-lifetime window.
    Fresh,
    /// Issued in the previous window; still accepted.
    Aging,
    /// Missing, malformed, expired or issued for another action.
    Invalid,
}

impl NonceCheck {
    pub fn is_valid(self) -> bool {
        !matches!(self, NonceCheck::Invalid)
    }
}

/// Creates and verifies action-scoped tokens.
pub trait NonceVerifier: Send + Sync {
    /// Create a token for `action` valid from now.
    fn create(&self, action: &str) -> String;

    /// Verify `token` against `action`.
    fn verify(&self, token: &str, action: &str) -> NonceCheck;
}

/// HMAC-SHA256 tokens over `"{tick}|{action}"`.
///
/// The clock is divided into ticks of half the lifetime. A token verifies
/// during the tick it was issued in and the one after, so its effective
/// lifetime lies between `lifetime / 2` and `lifetime`.
pub struct HmacNonces {
    mac: HmacSha256,
    tick_secs: u64,
}

impl HmacNonces {
    pub fn new(secret: &[u8], lifetime: Duration) -> Result<Self, ServiceError> {
        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|e| ServiceError::Config(format!("nonce secret: {e}")))?;
        Ok(Self {
            mac,
            tick_secs: (lifetime.as_secs() / 2).max(1),
        })
    }

    /// Token for `action` at unix time `now`.
    pub fn create_at(&self, action: &str, now: u64) -> String {
        hex::encode(self.token_bytes(self.tick(now), action))
    }

    /// Verify `token` for `action` at unix time `now`.
    pub fn verify_at(&self, token: &str, action: &str, now: u64) -> NonceCheck {
        let Ok(bytes) = hex::decode(token) else {
            return NonceCheck::Invalid;
        };
        if bytes.len() != TOKEN_BYTES {
            return NonceCheck::Invalid;
        }

        let tick = self.tick(now);
        if self.matches(tick, action, &bytes) {
            NonceCheck::Fresh
        } else if tick > 0 && self.matches(tick - 1, action, &bytes) {
            NonceCheck::Aging
        } else {
            NonceCheck::Invalid
        }
    }

    fn tick(&self, now: u64) -> u64 {
        now.div_ceil(self.tick_secs)
    }

    fn token_bytes(&self, tick: u64, action: &str) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(format!("{tick}|{action}").as_bytes());
        mac.finalize().into_bytes()[..TOKEN_BYTES].to_vec()
    }

    fn matches(&self, tick: u64, action: &str, candidate: &[u8]) -> bool {
        let mut mac = self.mac.clone();
        mac.update(format!("{tick}|{action}").as_bytes());
        // Constant-time comparison against the leftmost bytes of the MAC.
        mac.verify_truncated_left(candidate).is_ok()
    }
}

impl NonceVerifier for HmacNonces {
    fn create(&self, action: &str) -> String {
        self.create_at(action, unix_now())
    }

    fn verify(&self, token: &str, action: &str) -> NonceCheck {
        self.verify_at(token, action, unix_now())
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
