use ledger_apdu_core::{ApduCommand, Response};

use crate::{Error, InstructionSet, Version};

/// GET_VERSION command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetVersionCommand {
    cla: u8,
    ins: u8,
}

impl GetVersionCommand {
    /// Create the command for an instruction table
    pub const fn new(instructions: &InstructionSet) -> Self {
        Self {
            cla: instructions.cla,
            ins: instructions.get_version,
        }
    }
}

impl ApduCommand for GetVersionCommand {
    type Success = Version;
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

    fn parse_response(response: Response) -> Result<Version, Error> {
        Version::try_from(response.payload_bytes())
    }
}
