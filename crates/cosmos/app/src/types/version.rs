use derive_more::Display;

use crate::constants::VERSION_LEN;

/// Application version reported by GET_VERSION
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("{}.{}.{}", major, minor, patch)]
pub struct Version {
    /// Application identifier byte
    pub app_id: u8,
    /// Major version
    pub major: u8,
    /// Minor version
    pub minor: u8,
    /// Patch version
    pub patch: u8,
}

impl Version {
    /// Create a version from its four fields
    pub const fn new(app_id: u8, major: u8, minor: u8, patch: u8) -> Self {
        Self {
            app_id,
            major,
            minor,
            patch,
        }
    }

    /// Encode as the four byte response payload
    pub const fn to_bytes(&self) -> [u8; VERSION_LEN] {
        [self.app_id, self.major, self.minor, self.patch]
    }
}

impl TryFrom<&[u8]> for Version {
    type Error = crate::Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        match bytes {
            [app_id, major, minor, patch, ..] => Ok(Self::new(*app_id, *major, *minor, *patch)),
            _ => Err(Self::Error::InvalidResponse("version shorter than 4 bytes")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let version = Version::try_from(&[0x55, 0x00, 0x00, 0x04][..]).unwrap();
        assert_eq!(version, Version::new(0x55, 0, 0, 4));
        assert_eq!(version.to_string(), "0.0.4");
        assert_eq!(version.to_bytes(), [0x55, 0x00, 0x00, 0x04]);
    }

    #[test]
    fn test_short_payload() {
        assert!(matches!(
            Version::try_from(&[0x55, 0x00, 0x00][..]),
            Err(crate::Error::InvalidResponse(_))
        ));
    }
}
