use bytes::Bytes;
use derive_more::{AsRef, Deref, From};

/// DER encoded ECDSA signature as produced by the device
#[derive(Debug, Clone, PartialEq, Eq, AsRef, Deref, From)]
pub struct Signature(Bytes);

impl Signature {
    /// DER bytes
    pub fn as_der(&self) -> &[u8] {
        &self.0
    }

    /// Parse into a low-S `k256` signature
    pub fn to_ecdsa(&self) -> Result<k256::ecdsa::Signature, crate::Error> {
        let signature = k256::ecdsa::Signature::from_der(&self.0)
            .map_err(|_| crate::Error::InvalidResponse("signature is not valid DER"))?;
        Ok(signature.normalize_s().unwrap_or(signature))
    }
}

impl From<k256::ecdsa::Signature> for Signature {
    fn from(signature: k256::ecdsa::Signature) -> Self {
        Self(Bytes::copy_from_slice(signature.to_der().as_bytes()))
    }
}
