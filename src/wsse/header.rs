//! Assembly of the complete `wsse:Security` header.
//!
//! [`WsseHeader`] decides which fragments the current configuration calls
//! for, builds each through the [`FragmentFactory`], splices a signer's
//! timestamp into its signature and merges the results in header order.

use crate::wsse::config::WsseConfig;
use crate::wsse::constants::{BASE64_URI, PASSWORD_DIGEST_URI, PASSWORD_TEXT_URI, TIMESTAMP_KEY};
use crate::wsse::digest::DigestAuthenticator;
use crate::wsse::encoder::MarkupEncoder;
use crate::wsse::error::WsseError;
use crate::wsse::factory::FragmentFactory;
use crate::wsse::fragment::{Element, SecurityFragment, merge};
use crate::wsse::signer::Signer;
use crate::wsse::time_utils::{expires_after, xs_datetime};
use chrono::{DateTime, Utc};

/// Builder for a WS-Security `<wsse:Security>` header.
///
/// `WsseHeader` holds credentials, the validity window and an optional
/// signer. Every call to [`build_fragment`](Self::build_fragment) or
/// [`to_xml`](Self::to_xml) reads that configuration and assembles the
/// fragments it calls for, in this order:
///
/// 1. the signer's token, when a signer is attached and has a document
/// 2. a `wsu:Timestamp`, when a validity window is wanted
/// 3. a `wsse:UsernameToken`, when both username and password are set
///
/// Nothing configured means an empty header.
///
/// # Reuse
///
/// The digest timestamp and nonce are memoized per instance, not per call.
/// A digest token consumes its nonce, so the next digest token gets fresh
/// entropy, but the timestamp persists until [`reset_state`](Self::reset_state).
/// The `wsu:Id` counter is never reset. A `WsseHeader` is not meant to be
/// shared between threads without external locking.
///
/// # Example
///
/// ```rust
/// use wsse_header::WsseHeader;
///
/// let mut header = WsseHeader::new();
/// header.credentials("alice", "secret", false);
///
/// let xml = header.to_xml()?;
/// assert!(xml.contains("<wsse:Username>alice</wsse:Username>"));
/// assert!(!xml.contains("wsu:Timestamp"));
/// # Ok::<(), wsse_header::WsseError>(())
/// ```
pub struct WsseHeader {
    username: Option<String>,
    password: Option<String>,
    digest: bool,
    created_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
    timestamp: bool,
    signer: Option<Box<dyn Signer>>,
    config: WsseConfig,
    authenticator: DigestAuthenticator,
    factory: FragmentFactory,
    encoder: Option<Box<dyn MarkupEncoder>>,
}

impl WsseHeader {
    /// Creates an empty header with the default configuration.
    pub fn new() -> Self {
        Self::with_config(WsseConfig::default())
    }

    /// Creates an empty header with the given configuration.
    ///
    /// Configuration warnings are logged, not rejected.
    pub fn with_config(config: WsseConfig) -> Self {
        for warning in config.validate() {
            tracing::warn!("{}", warning);
        }

        Self {
            username: None,
            password: None,
            digest: false,
            created_at: None,
            expires_at: None,
            timestamp: false,
            signer: None,
            authenticator: DigestAuthenticator::new(config.nonce_entropy),
            factory: FragmentFactory::new(),
            encoder: default_encoder(),
            config,
        }
    }

    /// Replaces the source of nonce entropy.
    ///
    /// The function receives the configured entropy length.
    pub fn with_random_source<F>(mut self, source: F) -> Self
    where
        F: Fn(usize) -> String + Send + Sync + 'static,
    {
        self.authenticator.set_random_source(source);
        self
    }

    /// Replaces the clock used for digest timestamps and default `wsu:Created`.
    pub fn with_time_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> Result<DateTime<Utc>, WsseError> + Send + Sync + 'static,
    {
        self.authenticator.set_time_provider(provider);
        self
    }

    /// Replaces the markup encoder used by [`to_xml`](Self::to_xml).
    pub fn with_encoder<E>(mut self, encoder: E) -> Self
    where
        E: MarkupEncoder + 'static,
    {
        self.encoder = Some(Box::new(encoder));
        self
    }

    /// Sets username, password and digest mode together.
    pub fn credentials(
        &mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        digest: bool,
    ) {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self.digest = digest;
    }

    /// Sets the username alone.
    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
    }

    /// Sets the password alone.
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = Some(password.into());
    }

    /// Switches between `PasswordDigest` and `PasswordText`.
    pub fn set_digest(&mut self, digest: bool) {
        self.digest = digest;
    }

    /// Requests a `wsu:Timestamp` even without explicit created/expires.
    pub fn set_timestamp(&mut self, timestamp: bool) {
        self.timestamp = timestamp;
    }

    /// Sets `wsu:Created`; also requests a timestamp.
    pub fn set_created_at(&mut self, created_at: DateTime<Utc>) {
        self.created_at = Some(created_at);
    }

    /// Sets `wsu:Expires`; also requests a timestamp.
    pub fn set_expires_at(&mut self, expires_at: DateTime<Utc>) {
        self.expires_at = Some(expires_at);
    }

    /// Attaches an external signer.
    pub fn set_signer<S>(&mut self, signer: S)
    where
        S: Signer + 'static,
    {
        self.signer = Some(Box::new(signer));
    }

    /// Detaches the signer, if any.
    pub fn clear_signer(&mut self) {
        self.signer = None;
    }

    /// The configured username.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The configured password.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Whether the password is sent as a digest.
    pub fn digest(&self) -> bool {
        self.digest
    }

    /// Whether a username token will be produced.
    pub fn username_token(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// Whether a timestamp will be produced by the header itself.
    pub fn timestamp(&self) -> bool {
        self.timestamp || self.created_at.is_some() || self.expires_at.is_some()
    }

    /// Whether a signature will be produced.
    pub fn signature(&self) -> bool {
        self.signer.as_ref().is_some_and(|s| s.has_document())
    }

    /// The active configuration.
    pub fn config(&self) -> &WsseConfig {
        &self.config
    }

    /// Discards the memoized nonce and timestamp.
    ///
    /// The `wsu:Id` counter keeps counting.
    pub fn reset_state(&mut self) {
        self.authenticator.reset();
    }

    /// Assembles the merged fragment, or `None` when nothing is configured.
    pub fn build_fragment(&mut self) -> Result<Option<SecurityFragment>, WsseError> {
        let mut fragment = None;
        let mut signed_timestamp = false;

        let signature = if self.signature() {
            self.signature_fragment()?
        } else {
            None
        };
        if let Some(signature) = signature {
            signed_timestamp = signature.content().contains_key(TIMESTAMP_KEY);
            fragment = Some(signature);
        }

        if self.timestamp() && !signed_timestamp {
            let timestamp = self.timestamp_fragment()?;
            fragment = Some(merge(fragment, timestamp));
        }

        if self.username_token() {
            let token = self.username_token_fragment()?;
            fragment = Some(merge(fragment, token));
        } else if self.username.is_some() || self.password.is_some() {
            tracing::debug!("Incomplete credentials, skipping username token");
        }

        if let Some(fragment) = &fragment {
            tracing::debug!(elements = ?fragment.order(), "Assembled security header");
        }
        Ok(fragment)
    }

    /// Serializes the header, or returns an empty string when nothing is configured.
    pub fn to_xml(&mut self) -> Result<String, WsseError> {
        let Some(fragment) = self.build_fragment()? else {
            return Ok(String::new());
        };
        let encoder = self
            .encoder
            .as_ref()
            .ok_or_else(|| WsseError::Encoding("No markup encoder configured".to_string()))?;
        encoder.encode(&fragment)
    }

    /// Builds the `wsse:UsernameToken` fragment.
    ///
    /// In digest mode the memoized nonce is consumed afterwards, whether or
    /// not the build succeeded.
    pub fn username_token_fragment(&mut self) -> Result<SecurityFragment, WsseError> {
        let username = self.username.clone().unwrap_or_default();
        let password = self.password.clone().unwrap_or_default();

        if !self.digest {
            let body = Element::new()
                .with_text("wsse:Username", username)
                .with_text("wsse:Password", password)
                .with_attribute("wsse:Password", "Type", PASSWORD_TEXT_URI);
            return Ok(self
                .factory
                .build(Some("wsse"), "UsernameToken", body, None, false));
        }

        let body = self.digest_token_body(username, &password);
        self.authenticator.consume_nonce();
        let body = body?;
        Ok(self
            .factory
            .build(Some("wsse"), "UsernameToken", body, None, false))
    }

    fn digest_token_body(&mut self, username: String, password: &str) -> Result<Element, WsseError> {
        Ok(Element::new()
            .with_text("wsse:Username", username)
            .with_text("wsse:Nonce", self.authenticator.encoded_nonce()?)
            .with_text("wsu:Created", self.authenticator.timestamp()?)
            .with_text("wsse:Password", self.authenticator.digest_password(password)?)
            .with_attribute("wsse:Password", "Type", PASSWORD_DIGEST_URI)
            .with_attribute("wsse:Nonce", "EncodingType", BASE64_URI))
    }

    /// Builds the `wsu:Timestamp` fragment.
    ///
    /// `wsu:Created` defaults to now and `wsu:Expires` to created plus the
    /// configured TTL.
    pub fn timestamp_fragment(&mut self) -> Result<SecurityFragment, WsseError> {
        let created = match self.created_at {
            Some(created) => created,
            None => self.authenticator.now()?,
        };
        let expires = self
            .expires_at
            .unwrap_or_else(|| expires_after(created, self.config.timestamp_ttl));

        let body = Element::new()
            .with_text("wsu:Created", xs_datetime(&created))
            .with_text("wsu:Expires", xs_datetime(&expires));
        Ok(self.factory.build(Some("wsu"), "Timestamp", body, None, false))
    }

    /// Builds the signer's fragment, with its timestamp spliced in when wanted.
    ///
    /// Returns `None` if no signer is attached.
    pub fn signature_fragment(&mut self) -> Result<Option<SecurityFragment>, WsseError> {
        let Some(signer) = self.signer.as_ref() else {
            return Ok(None);
        };

        let token = signer.to_token().map_err(WsseError::Signer)?;
        let wants_timestamp = signer.wants_timestamp();
        let contribution = if wants_timestamp {
            signer
                .timestamp_contribution()
                .map_err(WsseError::Signer)?
        } else {
            None
        };

        let mut fragment =
            self.factory
                .build(None, &token.tag, token.body, Some(token.extra), true);

        if wants_timestamp {
            let contribution = match contribution {
                Some(contribution) => contribution,
                None => self.timestamp_fragment()?,
            };
            splice_timestamp(&mut fragment, contribution);
        }

        Ok(Some(fragment))
    }
}

/// Moves the `wsu:Timestamp` child of `contribution` to the end of `fragment`.
///
/// Attributes already recorded for `wsu:Timestamp` in `fragment` are kept;
/// the contribution's attributes are merged over them.
fn splice_timestamp(fragment: &mut SecurityFragment, contribution: SecurityFragment) {
    let root_attributes = contribution.attributes().clone();
    let mut content = contribution.into_content();

    let Some((node, attributes)) = content.remove(TIMESTAMP_KEY) else {
        tracing::debug!("Signer timestamp contribution has no wsu:Timestamp");
        return;
    };

    let target = fragment.content_mut();
    if let Some((_, Some(existing))) = target.remove(TIMESTAMP_KEY) {
        target.merge_attributes(TIMESTAMP_KEY, existing);
    }
    target.insert(TIMESTAMP_KEY, node);
    if let Some(attributes) = attributes {
        target.merge_attributes(TIMESTAMP_KEY, attributes);
    }
    fragment.merge_root_attributes(root_attributes);
}

#[cfg(feature = "xml-encoder")]
fn default_encoder() -> Option<Box<dyn MarkupEncoder>> {
    Some(Box::new(crate::wsse::encoder::XmlEncoder::new()))
}

#[cfg(not(feature = "xml-encoder"))]
fn default_encoder() -> Option<Box<dyn MarkupEncoder>> {
    None
}

impl Default for WsseHeader {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WsseHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsseHeader")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("digest", &self.digest)
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .field("timestamp", &self.timestamp)
            .field("signer", &self.signer.is_some())
            .field("config", &self.config)
            .field("ids_issued", &self.factory.count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wsse::constants::{MUST_UNDERSTAND_ATTRIBUTE, WSU_NAMESPACE};
    use crate::wsse::digest::digest_password;
    use crate::wsse::error::SignerError;
    use crate::wsse::fragment::Node;
    use crate::wsse::signer::SignerToken;
    use base64::Engine;
    use chrono::TimeZone;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn fixed_header() -> WsseHeader {
        WsseHeader::with_config(WsseConfig::from(crate::ConfigPreset::Standard))
            .with_time_provider(|| Ok(fixed_now()))
    }

    fn token(fragment: &SecurityFragment) -> &Element {
        fragment
            .child("wsse:UsernameToken")
            .and_then(Node::as_element)
            .unwrap()
    }

    struct TestSigner {
        document: bool,
        timestamp: Option<Option<SecurityFragment>>,
    }

    impl TestSigner {
        fn plain() -> Self {
            Self {
                document: true,
                timestamp: None,
            }
        }
    }

    impl Signer for TestSigner {
        fn has_document(&self) -> bool {
            self.document
        }

        fn to_token(&self) -> Result<SignerToken, SignerError> {
            let body = Element::new().with_text("SignatureValue", "c2ln");
            let extra = Element::new()
                .with_text("wsse:BinarySecurityToken", "MIIC")
                .with_child("Signature", Element::new())
                .with_attribute("Signature", "xmlns", "http://www.w3.org/2000/09/xmldsig#");
            Ok(SignerToken::new("Signature", body).with_extra(extra))
        }

        fn wants_timestamp(&self) -> bool {
            self.timestamp.is_some()
        }

        fn timestamp_contribution(&self) -> Result<Option<SecurityFragment>, SignerError> {
            Ok(self.timestamp.clone().flatten())
        }
    }

    /// Signer whose `extra` already annotates the timestamp it will sign.
    struct AnnotatingSigner {
        contribution: SecurityFragment,
    }

    impl Signer for AnnotatingSigner {
        fn has_document(&self) -> bool {
            true
        }

        fn to_token(&self) -> Result<SignerToken, SignerError> {
            let body = Element::new().with_text("SignatureValue", "c2ln");
            let extra = Element::new()
                .with_child(TIMESTAMP_KEY, Element::new())
                .with_attribute(TIMESTAMP_KEY, "Signed", "yes")
                .with_attribute(TIMESTAMP_KEY, "wsu:Id", "TS-placeholder");
            Ok(SignerToken::new("Signature", body).with_extra(extra))
        }

        fn wants_timestamp(&self) -> bool {
            true
        }

        fn timestamp_contribution(&self) -> Result<Option<SecurityFragment>, SignerError> {
            Ok(Some(self.contribution.clone()))
        }
    }

    struct FailingSigner;

    impl Signer for FailingSigner {
        fn has_document(&self) -> bool {
            true
        }

        fn to_token(&self) -> Result<SignerToken, SignerError> {
            Err("certificate missing".into())
        }
    }

    #[test]
    fn test_nothing_configured_is_empty() {
        let mut header = WsseHeader::new();
        assert!(header.build_fragment().unwrap().is_none());
        assert_eq!(header.to_xml().unwrap(), "");
    }

    #[test]
    fn test_incomplete_credentials_are_skipped() {
        let mut header = WsseHeader::new();
        header.set_password("secret");
        assert!(!header.username_token());
        assert!(header.build_fragment().unwrap().is_none());

        let mut header = WsseHeader::new();
        header.set_username("alice");
        assert!(header.build_fragment().unwrap().is_none());
    }

    #[test]
    fn test_plaintext_token() {
        let mut header = fixed_header();
        header.credentials("alice", "secret", false);

        let fragment = header.build_fragment().unwrap().unwrap();
        assert_eq!(fragment.order(), ["wsse:UsernameToken"]);

        let token = token(&fragment);
        assert_eq!(token.text("wsse:Username"), Some("alice"));
        assert_eq!(token.text("wsse:Password"), Some("secret"));
        assert_eq!(
            token.attribute("wsse:Password", "Type"),
            Some(PASSWORD_TEXT_URI)
        );
        assert!(token.get("wsse:Nonce").is_none());
        assert_eq!(
            fragment.content().attribute("wsse:UsernameToken", "xmlns:wsu"),
            Some(WSU_NAMESPACE)
        );
    }

    #[test]
    fn test_digest_token() {
        let mut header = fixed_header().with_random_source(|n| "q".repeat(n));
        header.credentials("alice", "secret", true);

        let fragment = header.build_fragment().unwrap().unwrap();
        let token = token(&fragment);

        assert_eq!(
            token.order(),
            ["wsse:Username", "wsse:Nonce", "wsu:Created", "wsse:Password"]
        );
        assert_eq!(token.text("wsu:Created"), Some("2024-01-01T12:00:00Z"));
        assert_eq!(
            token.attribute("wsse:Password", "Type"),
            Some(PASSWORD_DIGEST_URI)
        );
        assert_eq!(
            token.attribute("wsse:Nonce", "EncodingType"),
            Some(BASE64_URI)
        );

        let nonce = base64::engine::general_purpose::STANDARD
            .decode(token.text("wsse:Nonce").unwrap())
            .unwrap();
        let nonce = String::from_utf8(nonce).unwrap();
        assert_eq!(
            token.text("wsse:Password"),
            Some(digest_password(&nonce, "2024-01-01T12:00:00Z", "secret").as_str())
        );
    }

    #[test]
    fn test_digest_consumes_nonce() {
        let mut header = WsseHeader::new();
        header.credentials("alice", "secret", true);

        let first = header.build_fragment().unwrap().unwrap();
        assert!(!header.authenticator.has_nonce());
        let second = header.build_fragment().unwrap().unwrap();

        assert_ne!(
            token(&first).text("wsse:Nonce"),
            token(&second).text("wsse:Nonce")
        );
    }

    #[test]
    fn test_reuse_keeps_created_until_reset() {
        let ticks = Arc::new(AtomicU64::new(0));
        let clock = ticks.clone();
        let mut header = WsseHeader::new().with_time_provider(move || {
            let tick = clock.fetch_add(1, Ordering::SeqCst);
            Ok(fixed_now() + chrono::Duration::seconds(tick as i64))
        });
        header.credentials("alice", "secret", true);

        let first = header.build_fragment().unwrap().unwrap();
        let second = header.build_fragment().unwrap().unwrap();
        assert_eq!(token(&first).text("wsu:Created"), Some("2024-01-01T12:00:00Z"));
        assert_eq!(
            token(&first).text("wsu:Created"),
            token(&second).text("wsu:Created")
        );
        assert_ne!(
            token(&first).text("wsse:Nonce"),
            token(&second).text("wsse:Nonce")
        );
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        header.reset_state();
        let third = header.build_fragment().unwrap().unwrap();
        assert_eq!(token(&third).text("wsu:Created"), Some("2024-01-01T12:00:01Z"));
        assert_ne!(
            token(&third).text("wsse:Nonce"),
            token(&second).text("wsse:Nonce")
        );
        assert_eq!(
            third.content().attribute("wsse:UsernameToken", "wsu:Id"),
            Some("UsernameToken-3")
        );
    }

    #[test]
    fn test_clock_error_propagates() {
        let mut header = WsseHeader::new()
            .with_time_provider(|| Err(WsseError::Clock("stopped".to_string())));
        header.credentials("alice", "secret", true);

        assert!(matches!(header.build_fragment(), Err(WsseError::Clock(_))));
        assert!(!header.authenticator.has_nonce());

        header.set_digest(false);
        header.set_timestamp(true);
        assert!(matches!(header.to_xml(), Err(WsseError::Clock(_))));
    }

    #[test]
    fn test_timestamp_only() {
        let mut header = fixed_header();
        header.set_timestamp(true);

        let fragment = header.build_fragment().unwrap().unwrap();
        assert_eq!(fragment.order(), ["wsu:Timestamp"]);

        let timestamp = fragment.content().element("wsu:Timestamp").unwrap();
        assert_eq!(timestamp.text("wsu:Created"), Some("2024-01-01T12:00:00Z"));
        assert_eq!(timestamp.text("wsu:Expires"), Some("2024-01-01T12:01:00Z"));
    }

    #[test]
    fn test_timestamp_explicit_window() {
        let mut header = WsseHeader::new();
        header.set_created_at(Utc.with_ymd_and_hms(2023, 6, 1, 8, 0, 0).unwrap());
        header.set_expires_at(Utc.with_ymd_and_hms(2023, 6, 1, 9, 0, 0).unwrap());
        assert!(header.timestamp());

        let fragment = header.timestamp_fragment().unwrap();
        let timestamp = fragment.content().element("wsu:Timestamp").unwrap();
        assert_eq!(timestamp.text("wsu:Created"), Some("2023-06-01T08:00:00Z"));
        assert_eq!(timestamp.text("wsu:Expires"), Some("2023-06-01T09:00:00Z"));
    }

    #[test]
    fn test_created_only_derives_expires_from_ttl() {
        let config = WsseConfig {
            timestamp_ttl: std::time::Duration::from_secs(300),
            nonce_entropy: 100,
        };
        let mut header = WsseHeader::with_config(config);
        header.set_created_at(Utc.with_ymd_and_hms(2023, 6, 1, 8, 0, 0).unwrap());

        let fragment = header.timestamp_fragment().unwrap();
        let timestamp = fragment.content().element("wsu:Timestamp").unwrap();
        assert_eq!(timestamp.text("wsu:Expires"), Some("2023-06-01T08:05:00Z"));
    }

    #[test]
    fn test_timestamp_then_token_order_and_ids() {
        let mut header = fixed_header();
        header.credentials("alice", "secret", false);
        header.set_timestamp(true);

        let fragment = header.build_fragment().unwrap().unwrap();
        assert_eq!(fragment.order(), ["wsu:Timestamp", "wsse:UsernameToken"]);
        assert_eq!(
            fragment.content().attribute("wsu:Timestamp", "wsu:Id"),
            Some("Timestamp-1")
        );
        assert_eq!(
            fragment.content().attribute("wsse:UsernameToken", "wsu:Id"),
            Some("UsernameToken-2")
        );

        let again = header.build_fragment().unwrap().unwrap();
        assert_eq!(
            again.content().attribute("wsu:Timestamp", "wsu:Id"),
            Some("Timestamp-3")
        );
        assert_eq!(
            again.content().attribute("wsse:UsernameToken", "wsu:Id"),
            Some("UsernameToken-4")
        );
    }

    #[test]
    fn test_signer_without_document_is_ignored() {
        let mut header = WsseHeader::new();
        header.set_signer(TestSigner {
            document: false,
            timestamp: None,
        });
        assert!(!header.signature());
        assert!(header.build_fragment().unwrap().is_none());
    }

    #[test]
    fn test_signature_fragment() {
        let mut header = fixed_header();
        header.set_signer(TestSigner::plain());
        header.credentials("alice", "secret", false);

        let fragment = header.build_fragment().unwrap().unwrap();
        assert_eq!(
            fragment.order(),
            ["wsse:BinarySecurityToken", "Signature", "wsse:UsernameToken"]
        );
        assert_eq!(
            fragment
                .attributes()
                .get(MUST_UNDERSTAND_ATTRIBUTE)
                .map(String::as_str),
            Some("1")
        );
        assert!(fragment.content().attribute("Signature", "wsu:Id").is_none());
        assert_eq!(
            fragment.content().attribute("wsse:UsernameToken", "wsu:Id"),
            Some("UsernameToken-1")
        );
    }

    #[test]
    fn test_signer_timestamp_contribution_takes_precedence() {
        let contribution = SecurityFragment::new(
            Element::new()
                .with_child(
                    TIMESTAMP_KEY,
                    Element::new()
                        .with_text("wsu:Created", "2020-01-01T00:00:00Z")
                        .with_text("wsu:Expires", "2020-01-01T00:05:00Z"),
                )
                .with_attribute(TIMESTAMP_KEY, "wsu:Id", "Timestamp-signed"),
        );
        let mut header = fixed_header();
        header.set_timestamp(true);
        header.set_signer(TestSigner {
            document: true,
            timestamp: Some(Some(contribution)),
        });

        let fragment = header.build_fragment().unwrap().unwrap();
        assert_eq!(
            fragment.order(),
            ["wsse:BinarySecurityToken", "Signature", "wsu:Timestamp"]
        );
        let timestamp = fragment.content().element(TIMESTAMP_KEY).unwrap();
        assert_eq!(timestamp.text("wsu:Created"), Some("2020-01-01T00:00:00Z"));
        assert_eq!(
            fragment.content().attribute(TIMESTAMP_KEY, "wsu:Id"),
            Some("Timestamp-signed")
        );
        assert_eq!(header.factory.count(), 0);
    }

    #[test]
    fn test_signer_timestamp_keeps_extra_attributes() {
        let contribution = SecurityFragment::new(
            Element::new()
                .with_child(
                    TIMESTAMP_KEY,
                    Element::new().with_text("wsu:Created", "2020-01-01T00:00:00Z"),
                )
                .with_attribute(TIMESTAMP_KEY, "wsu:Id", "TS-9"),
        );
        let mut header = fixed_header();
        header.set_signer(AnnotatingSigner { contribution });

        let fragment = header.build_fragment().unwrap().unwrap();
        assert_eq!(fragment.order(), ["Signature", "wsu:Timestamp"]);

        let content = fragment.content();
        assert_eq!(content.attribute(TIMESTAMP_KEY, "Signed"), Some("yes"));
        assert_eq!(content.attribute(TIMESTAMP_KEY, "wsu:Id"), Some("TS-9"));
        assert_eq!(
            content.element(TIMESTAMP_KEY).unwrap().text("wsu:Created"),
            Some("2020-01-01T00:00:00Z")
        );
    }

    #[test]
    fn test_signer_timestamp_falls_back_to_own() {
        let mut header = fixed_header();
        header.set_signer(TestSigner {
            document: true,
            timestamp: Some(None),
        });

        let fragment = header.build_fragment().unwrap().unwrap();
        assert_eq!(
            fragment.order(),
            ["wsse:BinarySecurityToken", "Signature", "wsu:Timestamp"]
        );
        assert_eq!(
            fragment.content().attribute(TIMESTAMP_KEY, "wsu:Id"),
            Some("Timestamp-1")
        );
    }

    #[test]
    fn test_signer_error_propagates() {
        let mut header = WsseHeader::new();
        header.set_signer(FailingSigner);
        header.credentials("alice", "secret", false);

        let err = header.build_fragment().unwrap_err();
        assert!(matches!(err, WsseError::Signer(_)));
        assert_eq!(err.to_string(), "Signer error: certificate missing");
    }

    #[test]
    fn test_clear_signer() {
        let mut header = WsseHeader::new();
        header.set_signer(TestSigner::plain());
        assert!(header.signature());
        header.clear_signer();
        assert!(!header.signature());
    }

    #[test]
    fn test_signature_fragment_requires_signer() {
        let mut header = WsseHeader::new();
        assert!(header.signature_fragment().unwrap().is_none());

        header.set_signer(TestSigner::plain());
        let fragment = header.signature_fragment().unwrap().unwrap();
        assert_eq!(fragment.order(), ["wsse:BinarySecurityToken", "Signature"]);
    }

    #[test]
    fn test_debug_redacts_password() {
        let mut header = WsseHeader::new();
        header.credentials("alice", "hunter2", false);
        let debug = format!("{header:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_to_xml_without_encoder_errors() {
        struct Failing;
        impl MarkupEncoder for Failing {
            fn encode(&self, _: &SecurityFragment) -> Result<String, WsseError> {
                Err(WsseError::Encoding("boom".to_string()))
            }
        }

        let mut header = WsseHeader::new().with_encoder(Failing);
        header.set_timestamp(true);
        assert!(matches!(header.to_xml(), Err(WsseError::Encoding(_))));
    }
}
