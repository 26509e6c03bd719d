//! RSA key material for local `ActivityPub` actors.
//!
//! Every local profile is created with a key pair; the public half is
//! published in the actor document under `#main-key` and the private half
//! never leaves the database.

use rsa::{
    RsaPrivateKey, RsaPublicKey,
    pkcs8::{DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding},
};

use crate::{AppError, AppResult};

/// RSA key pair in PEM form.
#[derive(Clone)]
pub struct RsaKeypair {
    /// Public key (SPKI PEM).
    pub public_key_pem: String,
    /// Private key (PKCS#8 PEM).
    pub private_key_pem: String,
}

impl std::fmt::Debug for RsaKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaKeypair")
            .field("public_key_pem", &self.public_key_pem)
            .field("private_key_pem", &"<redacted>")
            .finish()
    }
}

const RSA_KEY_SIZE: usize = 2048;

/// Generate a 2048-bit RSA key pair.
pub fn generate_rsa_keypair() -> AppResult<RsaKeypair> {
    let mut rng = rand::thread_rng();

    let private_key = RsaPrivateKey::new(&mut rng, RSA_KEY_SIZE)
        .map_err(|e| AppError::Internal(format!("Failed to generate RSA key: {e}")))?;

    let public_key = RsaPublicKey::from(&private_key);

    let private_key_pem = private_key
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| AppError::Internal(format!("Failed to encode private key: {e}")))?
        .to_string();

    let public_key_pem = public_key
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| AppError::Internal(format!("Failed to encode public key: {e}")))?;

    Ok(RsaKeypair {
        public_key_pem,
        private_key_pem,
    })
}

/// Check that a PEM string holds a well-formed SPKI public key.
#[must_use]
pub fn is_valid_public_key(pem: &str) -> bool {
    RsaPublicKey::from_public_key_pem(pem).is_ok()
}
