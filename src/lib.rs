//! # WSSE Header
//!
//! A Rust library for building WS-Security (`wsse:Security`) headers for
//! SOAP messages.
//!
//! A header is assembled from independently built fragments, merged into
//! one ordered, attributed structure and handed to a markup encoder:
//!
//! - **UsernameToken**: username and password, sent as `PasswordText` or
//!   as a `PasswordDigest` over a fresh nonce and creation time
//! - **Timestamp**: a `wsu:Created` / `wsu:Expires` validity window
//! - **Signature**: a pre-built token contributed by an external [`Signer`]
//!
//! ## Quick Start
//!
//! ### Plaintext credentials
//!
//! ```rust
//! use wsse_header::WsseHeader;
//!
//! # fn example() -> Result<(), wsse_header::WsseError> {
//! let mut header = WsseHeader::new();
//! header.credentials("alice", "secret", false);
//!
//! let xml = header.to_xml()?;
//! assert!(xml.contains("<wsse:Password Type="));
//! # Ok(())
//! # }
//! ```
//!
//! ### Digest credentials with a timestamp
//!
//! ```rust
//! use wsse_header::WsseHeader;
//!
//! # fn example() -> Result<(), wsse_header::WsseError> {
//! let mut header = WsseHeader::new();
//! header.credentials("alice", "secret", true);
//! header.set_timestamp(true);
//!
//! // The nonce is consumed by each digest token, so every build is fresh
//! let first = header.to_xml()?;
//! let second = header.to_xml()?;
//! assert_ne!(first, second);
//! # Ok(())
//! # }
//! ```
//!
//! ### Inspecting the structure
//!
//! ```rust
//! use wsse_header::WsseHeader;
//!
//! # fn example() -> Result<(), wsse_header::WsseError> {
//! let mut header = WsseHeader::new();
//! header.set_timestamp(true);
//!
//! let fragment = header.build_fragment()?.expect("timestamp requested");
//! assert_eq!(fragment.order(), ["wsu:Timestamp"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! The timestamp lifetime and nonce entropy can be configured with
//! [`WsseConfig`], a [`ConfigPreset`], or environment variables:
//!
//! ```bash
//! export WSSE_TIMESTAMP_TTL=120
//! export WSSE_NONCE_ENTROPY=100
//! ```
//!
//! ## Architecture
//!
//! - **[`WsseHeader`]**: Decides which fragments are needed and merges them
//! - **[`FragmentFactory`]**: Builds single fragments and numbers their `wsu:Id`s
//! - **[`SecurityFragment`]** / **[`Element`]**: The ordered, attributed structure
//! - **[`DigestAuthenticator`]**: Nonce, timestamp and password digest
//! - **[`MarkupEncoder`]**: Turns the structure into XML text
//! - **[`WsseError`]**: Errors raised by external collaborators

pub mod wsse;

// Re-export commonly used types
pub use wsse::{
    Attributes, ConfigPreset, DigestAuthenticator, Element, FragmentFactory, MarkupEncoder, Node,
    SecurityFragment, Signer, SignerError, SignerToken, WsseConfig, WsseError, WsseHeader,
    digest_password, merge, random_string, xs_datetime,
};

#[cfg(feature = "xml-encoder")]
pub use wsse::XmlEncoder;
