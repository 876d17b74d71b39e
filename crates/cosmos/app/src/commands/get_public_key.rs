use ledger_apdu_core::{ApduCommand, Response};

use crate::{Error, InstructionSet, PublicKey};

/// Public key command for the secp256k1 key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetPublicKeyCommand {
    cla: u8,
    ins: u8,
}

impl GetPublicKeyCommand {
    /// Create the command for an instruction table
    pub const fn new(instructions: &InstructionSet) -> Self {
        Self {
            cla: instructions.cla,
            ins: instructions.get_public_key,
        }
    }
}

impl ApduCommand for GetPublicKeyCommand {
    type Success = PublicKey;
    type Error = Error;

    fn class(&self) -> u8 {
        self.cla
    }

    fn instruction(&self) -> u8 {
        self.ins
    }

    fn p1(&self) -> u8 {
        0x00
    }

    fn p2(&self) -> u8 {
        0x00
    }

    fn data(&self) -> Option<&[u8]> {
        None
    }

    fn parse_response(response: Response) -> Result<PublicKey, Error> {
        PublicKey::try_from(response.payload_bytes())
    }
}
