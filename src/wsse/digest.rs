//! Nonce generation and `PasswordDigest` computation.
//!
//! The WS-Security username token profile defines the digest password as
//!
//! ```text
//! Password_Digest = Base64( SHA-1( nonce + created + password ) )
//! ```
//!
//! The nonce here is the lowercase hex SHA-1 of a random lowercase string
//! and the creation timestamp. It is sent base64 encoded in `wsse:Nonce`
//! while the digest is taken over its raw text.

use crate::wsse::error::WsseError;
use crate::wsse::time_utils::{current_time, xs_datetime};
use base64::Engine;
use chrono::{DateTime, Utc};
use rand::Rng;
use sha1::{Digest, Sha1};

/// A function that returns `n` random characters of nonce entropy.
pub type RandomSourceFn = Box<dyn Fn(usize) -> String + Send + Sync>;

/// A function that provides the current UTC time.
pub type TimeProviderFn = Box<dyn Fn() -> Result<DateTime<Utc>, WsseError> + Send + Sync>;

/// Returns `len` lowercase ASCII letters drawn uniformly at random.
pub fn random_string(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
}

/// Computes `base64(sha1(nonce + timestamp + password))`.
///
/// # Example
///
/// ```rust
/// use wsse_header::digest_password;
///
/// let digest = digest_password("nonce", "2024-01-01T00:00:00Z", "secret");
/// assert_eq!(digest.len(), 28);
/// assert_eq!(digest, digest_password("nonce", "2024-01-01T00:00:00Z", "secret"));
/// ```
pub fn digest_password(nonce: &str, timestamp: &str, password: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(nonce.as_bytes());
    hasher.update(timestamp.as_bytes());
    hasher.update(password.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(hasher.finalize())
}

/// Per-build nonce and timestamp state for digest authentication.
///
/// Both values are computed lazily and memoized so that the nonce, the
/// `wsu:Created` text and the digest all share one timestamp. The nonce
/// must be consumed after one digest so the next token gets fresh entropy;
/// [`consume_nonce`](Self::consume_nonce) does that.
///
/// Not synchronized: one authenticator belongs to one builder.
pub struct DigestAuthenticator {
    nonce: Option<String>,
    timestamp: Option<String>,
    entropy: usize,
    random_source: RandomSourceFn,
    time_provider: TimeProviderFn,
}

impl DigestAuthenticator {
    /// Creates an authenticator drawing `entropy` random characters per nonce.
    pub fn new(entropy: usize) -> Self {
        Self {
            nonce: None,
            timestamp: None,
            entropy,
            random_source: Box::new(random_string),
            time_provider: Box::new(current_time),
        }
    }

    /// Replaces the source of nonce entropy.
    pub fn set_random_source<F>(&mut self, source: F)
    where
        F: Fn(usize) -> String + Send + Sync + 'static,
    {
        self.random_source = Box::new(source);
    }

    /// Replaces the clock.
    pub fn set_time_provider<F>(&mut self, provider: F)
    where
        F: Fn() -> Result<DateTime<Utc>, WsseError> + Send + Sync + 'static,
    {
        self.time_provider = Box::new(provider);
    }

    /// Reads the clock without touching memoized state.
    pub fn now(&self) -> Result<DateTime<Utc>, WsseError> {
        (self.time_provider)()
    }

    /// The memoized `xs:dateTime` of this build.
    pub fn timestamp(&mut self) -> Result<String, WsseError> {
        if let Some(timestamp) = &self.timestamp {
            return Ok(timestamp.clone());
        }
        let timestamp = xs_datetime(&self.now()?);
        self.timestamp = Some(timestamp.clone());
        Ok(timestamp)
    }

    /// The memoized raw nonce: hex SHA-1 of random entropy plus the timestamp.
    pub fn nonce(&mut self) -> Result<String, WsseError> {
        if let Some(nonce) = &self.nonce {
            return Ok(nonce.clone());
        }
        let timestamp = self.timestamp()?;
        let mut hasher = Sha1::new();
        hasher.update((self.random_source)(self.entropy).as_bytes());
        hasher.update(timestamp.as_bytes());
        let nonce = hex::encode(hasher.finalize());
        self.nonce = Some(nonce.clone());
        Ok(nonce)
    }

    /// The nonce as carried in `wsse:Nonce`.
    pub fn encoded_nonce(&mut self) -> Result<String, WsseError> {
        Ok(base64::engine::general_purpose::STANDARD.encode(self.nonce()?))
    }

    /// The digest password for `password` over the memoized nonce and timestamp.
    pub fn digest_password(&mut self, password: &str) -> Result<String, WsseError> {
        let nonce = self.nonce()?;
        let timestamp = self.timestamp()?;
        Ok(digest_password(&nonce, &timestamp, password))
    }

    /// Returns `true` while a nonce is memoized.
    pub fn has_nonce(&self) -> bool {
        self.nonce.is_some()
    }

    /// Discards the memoized nonce.
    pub fn consume_nonce(&mut self) {
        if self.nonce.take().is_some() {
            tracing::trace!("Consumed digest nonce");
        }
    }

    /// Discards both the memoized nonce and timestamp.
    pub fn reset(&mut self) {
        self.nonce = None;
        self.timestamp = None;
    }
}

impl Default for DigestAuthenticator {
    fn default() -> Self {
        Self::new(crate::wsse::config::DEFAULT_NONCE_ENTROPY)
    }
}

impl std::fmt::Debug for DigestAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigestAuthenticator")
            .field("has_nonce", &self.nonce.is_some())
            .field("timestamp", &self.timestamp)
            .field("entropy", &self.entropy)
            .finish_non_exhaustive()
    }
}
