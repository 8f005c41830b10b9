use ring::error::Unspecified;
use ring::rand::{SecureRandom, SystemRandom};

const SESSION_ID_LENGTH: usize = 32;

/// A fresh random session id, lowercase hex.
pub fn generate_session_id() -> Result<String, Unspecified> {
    let mut bytes = [0u8; SESSION_ID_LENGTH];
    SystemRandom::new().fill(&mut bytes)?;
    Ok(hex::encode(bytes))
}
