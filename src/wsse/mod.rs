// Core architecture components
mod config;
mod digest;
mod error;
mod factory;
mod fragment;
mod header;
mod time_utils;

// Protocol identifiers
pub mod constants;

// Collaborator seams
pub mod encoder;
pub mod signer;

// Core components exports
pub use config::{ConfigPreset, DEFAULT_NONCE_ENTROPY, DEFAULT_TIMESTAMP_TTL, WsseConfig};
pub use digest::{
    DigestAuthenticator, RandomSourceFn, TimeProviderFn, digest_password, random_string,
};
pub use error::{SignerError, WsseError};
pub use factory::FragmentFactory;
pub use fragment::{Attributes, Element, Node, SecurityFragment, merge};
pub use header::WsseHeader;
pub use time_utils::xs_datetime;

// Collaborator exports
pub use encoder::MarkupEncoder;
#[cfg(feature = "xml-encoder")]
pub use encoder::XmlEncoder;
pub use signer::{Signer, SignerToken};
