use wsse_header::{ConfigPreset, WsseConfig, WsseHeader};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // Plaintext credentials only
    let mut header = WsseHeader::new();
    header.credentials("alice", "secret", false);
    println!("PasswordText header:\n{}\n", header.to_xml()?);

    // Digest credentials with a validity window
    let mut header = WsseHeader::with_config(WsseConfig::from(ConfigPreset::Strict));
    header.credentials("alice", "secret", true);
    header.set_timestamp(true);
    println!("PasswordDigest header:\n{}\n", header.to_xml()?);

    // Building again yields a fresh nonce
    println!("Second build:\n{}\n", header.to_xml()?);

    // Nothing configured produces nothing
    let mut empty = WsseHeader::new();
    println!("Empty header: {:?}", empty.to_xml()?);

    Ok(())
}
