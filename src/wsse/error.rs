use thiserror::Error;

/// Boxed error type returned by [`Signer`](crate::wsse::Signer) implementations.
pub type SignerError = Box<dyn std::error::Error + Send + Sync>;

/// Error types that can occur while producing a WS-Security header.
///
/// Header assembly itself never fails: missing credentials or an absent
/// signer simply leave the corresponding fragment out. Every variant here
/// comes from an external collaborator the builder calls into.
///
/// # Example
///
/// ```rust
/// use wsse_header::{WsseError, WsseHeader};
///
/// let mut header = WsseHeader::new();
/// header.credentials("alice", "secret", false);
///
/// match header.to_xml() {
///     Ok(xml) => println!("{xml}"),
///     Err(WsseError::Signer(e)) => println!("Signer failed: {e}"),
///     Err(e) => println!("Other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum WsseError {
    /// The attached signer failed to produce its token or timestamp.
    ///
    /// The signer's own error is kept as the source so callers can
    /// downcast it back to the concrete type.
    #[error("Signer error: {0}")]
    Signer(#[source] SignerError),

    /// The structured-to-markup encoder could not serialize the fragment.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The time provider could not produce the current time.
    #[error("Clock error: {0}")]
    Clock(String),
}

#[cfg(feature = "xml-encoder")]
impl From<std::io::Error> for WsseError {
    fn from(e: std::io::Error) -> Self {
        WsseError::Encoding(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct BrokenKey;

    impl std::fmt::Display for BrokenKey {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("private key unreadable")
        }
    }

    impl std::error::Error for BrokenKey {}

    #[test]
    fn test_error_display() {
        let signer_error = WsseError::Signer(Box::new(BrokenKey));
        assert_eq!(
            signer_error.to_string(),
            "Signer error: private key unreadable"
        );

        let encoding_error = WsseError::Encoding("bad utf-8".to_string());
        assert_eq!(encoding_error.to_string(), "Encoding error: bad utf-8");

        let clock_error = WsseError::Clock("clock unavailable".to_string());
        assert_eq!(clock_error.to_string(), "Clock error: clock unavailable");
    }

    #[test]
    fn test_signer_error_keeps_source() {
        use std::error::Error;

        let error = WsseError::Signer(Box::new(BrokenKey));
        let source = error.source().unwrap();
        assert!(source.downcast_ref::<BrokenKey>().is_some());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WsseError>();
    }
}
