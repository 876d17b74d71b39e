//! Cosmos application client
//!
//! [`CosmosApp`] owns an executor, and through it the device handle, for the
//! whole session. Every call is one exchange or one chunked sequence.

use ledger_apdu_core::prelude::*;
use tracing::debug;

use crate::chunking::ChunkedSequence;
use crate::commands::{GetPublicKeyCommand, GetVersionCommand};
use crate::emulator::{Emulator, EmulatorConfig};
use crate::{Error, InstructionSet, PublicKey, Result, Signature, Version};

/// Length of the digest answered by the hash instruction
pub const HASH_LEN: usize = 32;

/// Cosmos application implementation
#[derive(Debug)]
pub struct CosmosApp<E: Executor> {
    /// Command executor
    executor: E,
    /// Instruction table for this session
    instructions: InstructionSet,
}

impl<E: Executor> CosmosApp<E> {
    /// Create a client over an executor
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            instructions: InstructionSet::default(),
        }
    }

    /// Use a different instruction table
    pub const fn with_instructions(mut self, instructions: InstructionSet) -> Self {
        self.instructions = instructions;
        self
    }

    /// Get the instruction table
    pub const fn instructions(&self) -> &InstructionSet {
        &self.instructions
    }

    /// Get a reference to the executor
    pub const fn executor(&self) -> &E {
        &self.executor
    }

    /// Get a mutable reference to the executor
    pub const fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    /// Check whether the device handle is still open
    pub fn is_open(&self) -> bool {
        self.executor.is_open()
    }

    /// Release the device handle
    pub fn close(&mut self) -> Result<()> {
        self.executor.close()?;
        Ok(())
    }

    /// Read the application version
    pub fn get_version(&mut self) -> Result<Version> {
        let version = self
            .executor
            .execute(&GetVersionCommand::new(&self.instructions))?;
        debug!(%version, app_id = version.app_id, "Application version");
        Ok(version)
    }

    /// Read the secp256k1 public key
    pub fn get_public_key(&mut self) -> Result<PublicKey> {
        let key = self
            .executor
            .execute(&GetPublicKeyCommand::new(&self.instructions))?;
        debug!(public_key = %hex::encode(key.as_bytes()), "Public key");
        Ok(key)
    }

    /// Send a message to the echo instruction
    ///
    /// The device answers at most the first 64 bytes.
    pub fn echo(&mut self, message: &[u8]) -> Result<Bytes> {
        self.chunked(self.instructions.echo, message)
    }

    /// Have the device compute SHA-256 of a message
    pub fn hash(&mut self, message: &[u8]) -> Result<[u8; HASH_LEN]> {
        let digest = self.chunked(self.instructions.hash, message)?;
        digest
            .as_ref()
            .try_into()
            .map_err(|_| Error::InvalidResponse("digest is not 32 bytes"))
    }

    /// Sign a message with the secp256k1 key
    ///
    /// The device signs SHA-256 of the message and returns a DER signature.
    /// Waits for the user to confirm on the device.
    pub fn sign_quick(&mut self, message: &[u8]) -> Result<Signature> {
        let der = self.chunked(self.instructions.sign, message)?;
        if der.is_empty() {
            return Err(Error::InvalidResponse("empty signature"));
        }
        debug!(len = der.len(), "Signature received");
        Ok(Signature::from(der))
    }

    fn chunked(&mut self, ins: u8, message: &[u8]) -> Result<Bytes> {
        let mut sequence = ChunkedSequence::new(self.instructions.cla, ins, message)?;
        sequence.run(&mut self.executor)
    }
}

impl<T: PacketTransport> CosmosApp<FramedExecutor<T>> {
    /// Create a client over a packet transport
    pub fn from_transport(transport: T) -> Self {
        Self::new(FramedExecutor::new(transport))
    }

    /// Create a client over a packet transport with custom exchange settings
    pub fn from_transport_with_config(transport: T, config: ExchangeConfig) -> Self {
        Self::new(FramedExecutor::with_config(transport, config))
    }
}

impl CosmosApp<FramedExecutor<Emulator>> {
    /// Create a client talking to a software device
    pub fn emulated(config: EmulatorConfig) -> Result<Self> {
        let instructions = config.instructions;
        let emulator = Emulator::new(config)?;
        Ok(Self::from_transport(emulator).with_instructions(instructions))
    }
}

#[cfg(feature = "hid")]
impl CosmosApp<FramedExecutor<ledger_apdu_transport_hid::HidTransport>> {
    /// Open the first attached device
    ///
    /// Returns [`Error::NotFound`] when no device is attached.
    pub fn find() -> Result<Self> {
        Self::find_with_config(
            ledger_apdu_transport_hid::HidConfig::default(),
            ExchangeConfig::default(),
        )
    }

    /// Open a device chosen by `hid` with custom exchange settings
    pub fn find_with_config(
        hid: ledger_apdu_transport_hid::HidConfig,
        exchange: ExchangeConfig,
    ) -> Result<Self> {
        let manager = ledger_apdu_transport_hid::HidDeviceManager::with_config(hid)?;
        let transport = manager.connect()?;
        tracing::info!(device = %transport.device(), "Connected to Ledger device");
        Ok(Self::from_transport_with_config(transport, exchange))
    }
}

#[cfg(test)]
mod tests {
    use sha2::{Digest, Sha256};

    use super::*;

    fn app() -> CosmosApp<FramedExecutor<Emulator>> {
        CosmosApp::emulated(EmulatorConfig::default()).unwrap()
    }

    #[test]
    fn test_get_version_is_not_cached() {
        let mut app = app();
        assert_eq!(app.get_version().unwrap(), Version::new(0x55, 0, 0, 4));
        let written = app.executor().transport().packets_written();
        app.get_version().unwrap();
        assert_eq!(app.executor().transport().packets_written(), written + 1);
    }

    #[test]
    fn test_hash_of_empty_message() {
        let mut app = app();
        assert_eq!(app.hash(&[]).unwrap().as_slice(), Sha256::digest(b"").as_slice());
    }

    #[test]
    fn test_message_too_large_sends_nothing() {
        let mut app = app();
        let message = vec![0u8; crate::constants::MAX_MESSAGE_LEN + 1];

        assert!(matches!(app.sign_quick(&message), Err(Error::MessageTooLarge { .. })));
        assert_eq!(app.executor().transport().packets_written(), 0);
    }

    #[test]
    fn test_close() {
        let mut app = app();
        app.close().unwrap();
        assert!(!app.is_open());
        assert!(matches!(
            app.get_version(),
            Err(Error::Transport(TransportError::Closed))
        ));
    }
}
