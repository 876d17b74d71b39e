use derive_more::{AsRef, Deref};

use crate::constants::PUBLIC_KEY_LEN;

/// Uncompressed SEC1 secp256k1 public key (`0x04 || X || Y`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRef, Deref)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    /// Raw key bytes
    pub const fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Parse into a curve point
    pub fn to_verifying_key(&self) -> Result<k256::ecdsa::VerifyingKey, crate::Error> {
        k256::ecdsa::VerifyingKey::from_sec1_bytes(&self.0)
            .map_err(|_| crate::Error::InvalidResponse("public key is not a curve point"))
    }

    /// Check a DER signature over `message` made by this key
    pub fn verify(&self, message: &[u8], signature: &crate::Signature) -> bool {
        crate::verify::verify(message, signature.as_der(), &self.0)
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = crate::Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let key: [u8; PUBLIC_KEY_LEN] = bytes
            .try_into()
            .map_err(|_| Self::Error::InvalidResponse("public key is not 65 bytes"))?;
        Ok(Self(key))
    }
}

impl From<&k256::ecdsa::VerifyingKey> for PublicKey {
    fn from(key: &k256::ecdsa::VerifyingKey) -> Self {
        let point = key.to_encoded_point(false);
        let mut bytes = [0u8; PUBLIC_KEY_LEN];
        bytes.copy_from_slice(point.as_bytes());
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use k256::ecdsa::SigningKey;

    use super::*;

    #[test]
    fn test_length_is_enforced() {
        assert!(PublicKey::try_from(&[0x04; 64][..]).is_err());
        assert!(PublicKey::try_from(&[0x04; 66][..]).is_err());
        assert!(PublicKey::try_from(&[0x04; 65][..]).is_ok());
    }

    #[test]
    fn test_from_verifying_key() {
        let signing_key = SigningKey::from_slice(&[0x11; 32]).unwrap();
        let key = PublicKey::from(signing_key.verifying_key());

        assert_eq!(key[0], 0x04);
        assert_eq!(key.to_verifying_key().unwrap(), *signing_key.verifying_key());
    }

    #[test]
    fn test_off_curve_key() {
        let mut bytes = [0x00; 65];
        bytes[0] = 0x04;
        let key = PublicKey::try_from(&bytes[..]).unwrap();
        assert!(key.to_verifying_key().is_err());
    }
}
