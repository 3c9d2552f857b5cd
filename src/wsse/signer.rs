//! The seam to an external XML-signature implementation.
//!
//! Signing and canonicalization live outside this crate. A [`Signer`]
//! hands back its token as pre-built structure which the header splices
//! into the `wsse:Security` element.

use crate::wsse::error::SignerError;
use crate::wsse::fragment::{Element, SecurityFragment};

/// The structure a signer contributes to the header.
///
/// `tag` and `body` form the primary child (typically `Signature`). `extra`
/// holds supplementary root children such as a `wsse:BinarySecurityToken`,
/// their attributes, and optionally an order that also lists `tag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerToken {
    /// Tag name of the primary child, used as-is as its key.
    pub tag: String,
    /// Content of the primary child.
    pub body: Element,
    /// Supplementary root children, order and attributes.
    pub extra: Element,
}

impl SignerToken {
    /// Creates a token with no supplementary children.
    pub fn new(tag: impl Into<String>, body: Element) -> Self {
        Self {
            tag: tag.into(),
            body,
            extra: Element::new(),
        }
    }

    /// Attaches supplementary root children.
    pub fn with_extra(mut self, extra: Element) -> Self {
        self.extra = extra;
        self
    }
}

/// An external signer the header can consult.
///
/// # Example
///
/// ```rust
/// use wsse_header::{Element, Signer, SignerError, SignerToken};
///
/// struct PresignedEnvelope {
///     signature_value: String,
/// }
///
/// impl Signer for PresignedEnvelope {
///     fn has_document(&self) -> bool {
///         true
///     }
///
///     fn to_token(&self) -> Result<SignerToken, SignerError> {
///         let body = Element::new().with_text("SignatureValue", self.signature_value.as_str());
///         Ok(SignerToken::new("Signature", body))
///     }
/// }
/// ```
pub trait Signer {
    /// Whether there is currently a document to sign.
    ///
    /// A signer without a document contributes nothing.
    fn has_document(&self) -> bool;

    /// Produces the signer's token structure.
    fn to_token(&self) -> Result<SignerToken, SignerError>;

    /// Whether the signature covers a `wsu:Timestamp`.
    fn wants_timestamp(&self) -> bool {
        false
    }

    /// The signer's own timestamp fragment.
    ///
    /// Expected to hold a single `wsu:Timestamp` child. Returning `None`
    /// while [`wants_timestamp`](Self::wants_timestamp) is `true` lets the
    /// header build the timestamp itself.
    fn timestamp_contribution(&self) -> Result<Option<SecurityFragment>, SignerError> {
        Ok(None)
    }
}
