//! Fixed OASIS WS-Security identifiers.
//!
//! These strings are compared byte-for-byte by receiving stacks and must
//! not be altered.

/// WS-Security secext namespace, bound to the `wsse` prefix.
pub const WSE_NAMESPACE: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd";

/// WS-Security utility namespace, bound to the `wsu` prefix.
pub const WSU_NAMESPACE: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd";

/// `Type` of a `wsse:Password` carrying the plaintext password.
pub const PASSWORD_TEXT_URI: &str = "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-username-token-profile-1.0#PasswordText";

/// `Type` of a `wsse:Password` carrying a digest.
pub const PASSWORD_DIGEST_URI: &str = "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-username-token-profile-1.0#PasswordDigest";

/// `EncodingType` of a base64 encoded `wsse:Nonce`.
pub const BASE64_URI: &str = "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-soap-message-security-1.0#Base64Binary";

/// Root key of every security fragment.
pub const SECURITY_KEY: &str = "wsse:Security";

/// Child key of the validity window element.
pub const TIMESTAMP_KEY: &str = "wsu:Timestamp";

/// Attribute set on the root of a signed header.
pub const MUST_UNDERSTAND_ATTRIBUTE: &str = "soapenv:mustUnderstand";
