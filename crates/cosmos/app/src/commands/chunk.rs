use ledger_apdu_core::{ApduCommand, Bytes, Response};

use crate::Error;

/// One chunk of a chunked sequence
///
/// P1 is the 1-based chunk index and P2 the chunk count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkCommand {
    cla: u8,
    ins: u8,
    index: u8,
    total: u8,
    data: Bytes,
}

impl ChunkCommand {
    /// Create a chunk command
    pub const fn new(cla: u8, ins: u8, index: u8, total: u8, data: Bytes) -> Self {
        Self {
            cla,
            ins,
            index,
            total,
            data,
        }
    }

    /// 1-based chunk index
    pub const fn index(&self) -> u8 {
        self.index
    }

    /// Number of chunks in the sequence
    pub const fn total(&self) -> u8 {
        self.total
    }

    /// Check whether this chunk ends the sequence
    pub const fn is_last(&self) -> bool {
        self.index == self.total
    }
}

impl ApduCommand for ChunkCommand {
    type Success = Bytes;
    type Error = Error;

    fn class(&self) -> u8 {
        self.cla
    }

    fn instruction(&self) -> u8 {
        self.ins
    }

    fn p1(&self) -> u8 {
        self.index
    }

    fn p2(&self) -> u8 {
        self.total
    }

    fn data(&self) -> Option<&[u8]> {
        Some(&self.data)
    }

    fn parse_response(response: Response) -> Result<Bytes, Error> {
        Ok(response.payload().clone().unwrap_or_default())
    }
}
