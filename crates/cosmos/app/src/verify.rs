//! Signature verification against a device public key
//!
//! The device signs the SHA-256 digest of the message it received. Devices do
//! not have to emit low-S signatures, so S is normalized before verifying.

use k256::ecdsa::{Signature, VerifyingKey, signature::hazmat::PrehashVerifier};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Verify a DER signature over `message` with an uncompressed SEC1 key
///
/// Any key or signature that fails to parse yields `false`.
pub fn verify(message: &[u8], signature_der: &[u8], public_key: &[u8]) -> bool {
    let Ok(key) = VerifyingKey::from_sec1_bytes(public_key) else {
        debug!(len = public_key.len(), "Public key does not parse");
        return false;
    };
    let Ok(signature) = Signature::from_der(signature_der) else {
        debug!(len = signature_der.len(), "Signature is not valid DER");
        return false;
    };
    let signature = signature.normalize_s().unwrap_or(signature);

    let digest = Sha256::digest(message);
    key.verify_prehash(&digest, &signature).is_ok()
}

#[cfg(test)]
mod tests {
    use k256::ecdsa::{SigningKey, signature::hazmat::PrehashSigner};

    use super::*;

    fn signing_key() -> SigningKey {
        SigningKey::from_slice(&hex::decode("c9afa9d845ba75166b5c215767b1d6934e50c3db36e89b127b8a622b120f6721").unwrap()).unwrap()
    }

    fn sign(key: &SigningKey, message: &[u8]) -> Signature {
        key.sign_prehash(&Sha256::digest(message)).unwrap()
    }

    fn public_key(key: &SigningKey) -> Vec<u8> {
        key.verifying_key().to_encoded_point(false).as_bytes().to_vec()
    }

    #[test]
    fn test_valid_signature() {
        let key = signing_key();
        let message = b"cosmos";
        let der = sign(&key, message).to_der();

        assert!(verify(message, der.as_bytes(), &public_key(&key)));
    }

    #[test]
    fn test_high_s_signature_is_accepted() {
        let key = signing_key();
        let message = [0x56u8; 205];
        let low = sign(&key, &message);
        let (r, s) = low.split_scalars();
        let high = Signature::from_scalars(r, -*s).unwrap();
        assert!(high.normalize_s().is_some());

        assert!(verify(&message, high.to_der().as_bytes(), &public_key(&key)));
    }

    #[test]
    fn test_tampered_message() {
        let key = signing_key();
        let der = sign(&key, b"cosmos").to_der();

        assert!(!verify(b"cosmoz", der.as_bytes(), &public_key(&key)));
    }

    #[test]
    fn test_wrong_key() {
        let key = signing_key();
        let other = SigningKey::from_slice(&[0x42; 32]).unwrap();
        let der = sign(&key, b"cosmos").to_der();

        assert!(!verify(b"cosmos", der.as_bytes(), &public_key(&other)));
    }

    #[test]
    fn test_malformed_inputs() {
        let key = signing_key();
        let der = sign(&key, b"cosmos").to_der();

        assert!(!verify(b"cosmos", &der.as_bytes()[1..], &public_key(&key)));
        assert!(!verify(b"cosmos", der.as_bytes(), &public_key(&key)[..64]));
        assert!(!verify(b"cosmos", &[], &[]));
    }
}
