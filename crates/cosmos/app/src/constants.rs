//! Instruction codes and protocol limits of the Cosmos application

/// Class byte of every Cosmos application command
pub const CLA: u8 = 0x55;

/// Instruction codes
pub mod ins {
    /// Read the application version
    pub const GET_VERSION: u8 = 0x00;
    /// Read the secp256k1 public key
    pub const PUBLIC_KEY_SECP256K1: u8 = 0x01;
    /// Sign a message with the secp256k1 key
    pub const SIGN_SECP256K1: u8 = 0x02;
    /// Echo the payload back (test instruction)
    pub const ECHO: u8 = 0x63;
    /// Hash the payload with SHA-256 (test instruction)
    pub const HASH: u8 = 0x64;
}

/// Bytes of message carried by one chunk command
pub const CHUNK_SIZE: usize = 250;

/// Largest number of chunks a sequence can announce in P2
pub const MAX_CHUNKS: usize = u8::MAX as usize;

/// Longest message a chunked sequence can carry
pub const MAX_MESSAGE_LEN: usize = CHUNK_SIZE * MAX_CHUNKS;

/// Longest prefix the device echoes back
pub const ECHO_CAP: usize = 64;

/// Length of the version response
pub const VERSION_LEN: usize = 4;

/// Length of an uncompressed SEC1 public key
pub const PUBLIC_KEY_LEN: usize = 65;

/// Instruction table used by a client session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionSet {
    /// Class byte
    pub cla: u8,
    /// GET_VERSION instruction
    pub get_version: u8,
    /// Public key instruction
    pub get_public_key: u8,
    /// Sign instruction
    pub sign: u8,
    /// Echo instruction
    pub echo: u8,
    /// Hash instruction
    pub hash: u8,
}

impl Default for InstructionSet {
    fn default() -> Self {
        Self {
            cla: CLA,
            get_version: ins::GET_VERSION,
            get_public_key: ins::PUBLIC_KEY_SECP256K1,
            sign: ins::SIGN_SECP256K1,
            echo: ins::ECHO,
            hash: ins::HASH,
        }
    }
}

impl InstructionSet {
    /// Set the class byte
    pub const fn with_cla(mut self, cla: u8) -> Self {
        self.cla = cla;
        self
    }
}
