//! Software device speaking the Cosmos application protocol
//!
//! [`Emulator`] implements [`PacketTransport`], so it plugs into a
//! [`FramedExecutor`](ledger_apdu_core::FramedExecutor) like a HID handle.
//! Written packets are reassembled, the APDU is run through the applet logic,
//! and the framed response is queued for the following reads.

mod applet;

use std::collections::VecDeque;
use std::time::Duration;

use k256::ecdsa::SigningKey;
use ledger_apdu_core::{FrameCodec, FrameDecoder, Packet, PacketTransport, TransportError};
use tracing::{debug, trace};

use crate::{Error, InstructionSet, PublicKey, Result, Version};
use applet::Applet;

/// Version reported by the emulated baseline firmware
pub const BASELINE_VERSION: Version = Version::new(0x55, 0, 0, 4);

/// Seed of the emulated secp256k1 key
pub const DEFAULT_SEED: [u8; 32] = [
    0x1e, 0x99, 0x42, 0x3a, 0x4e, 0xd2, 0x76, 0x08, 0xa1, 0x5a, 0x26, 0x16, 0xa2, 0xb0, 0xe9, 0xe5,
    0x2c, 0xed, 0x33, 0x0a, 0xc5, 0x30, 0xed, 0xcc, 0x32, 0xc8, 0xff, 0xc6, 0xa5, 0x26, 0xae, 0xdd,
];

/// Behavior of the software device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatorConfig {
    /// Version answered to GET_VERSION
    pub version: Version,
    /// Private key scalar of the signing key
    pub seed: [u8; 32],
    /// Longest prefix answered to echo
    pub echo_cap: usize,
    /// Refuse every signature as if the user declined
    pub reject_signing: bool,
    /// Instruction table the applet answers to
    pub instructions: InstructionSet,
    /// HID channel of the device
    pub channel: u16,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            version: BASELINE_VERSION,
            seed: DEFAULT_SEED,
            echo_cap: crate::constants::ECHO_CAP,
            reject_signing: false,
            instructions: InstructionSet::default(),
            channel: ledger_apdu_core::frame::DEFAULT_CHANNEL,
        }
    }
}

impl EmulatorConfig {
    /// Set the reported version
    pub const fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Set the signing key seed
    pub const fn with_seed(mut self, seed: [u8; 32]) -> Self {
        self.seed = seed;
        self
    }

    /// Refuse signatures
    pub const fn with_reject_signing(mut self, reject: bool) -> Self {
        self.reject_signing = reject;
        self
    }

    /// Set the instruction table
    pub const fn with_instructions(mut self, instructions: InstructionSet) -> Self {
        self.instructions = instructions;
        self
    }
}

/// Packet-level software device
#[derive(Debug)]
pub struct Emulator {
    codec: FrameCodec,
    decoder: FrameDecoder,
    applet: Applet,
    outbox: VecDeque<Packet>,
    packets_written: usize,
    disconnect_after: Option<usize>,
    connected: bool,
}

impl Emulator {
    /// Create a device with the given behavior
    pub fn new(config: EmulatorConfig) -> Result<Self> {
        let signing_key = SigningKey::from_slice(&config.seed).map_err(|_| Error::InvalidSeed)?;
        let codec = FrameCodec::new(config.channel);

        Ok(Self {
            codec,
            decoder: codec.decoder(),
            applet: Applet::new(config, signing_key),
            outbox: VecDeque::new(),
            packets_written: 0,
            disconnect_after: None,
            connected: true,
        })
    }

    /// Create a device with the baseline behavior
    pub fn baseline() -> Result<Self> {
        Self::new(EmulatorConfig::default())
    }

    /// Drop off the bus once `packets` packets have been written
    pub const fn disconnect_after(mut self, packets: usize) -> Self {
        self.disconnect_after = Some(packets);
        self
    }

    /// Public key of the emulated signing key
    pub fn public_key(&self) -> PublicKey {
        self.applet.public_key()
    }

    /// Number of packets accepted so far
    pub const fn packets_written(&self) -> usize {
        self.packets_written
    }

    fn respond(&mut self, apdu: &[u8]) -> std::result::Result<(), TransportError> {
        let response = self.applet.process(apdu);
        let packets = self
            .codec
            .encode(&response)
            .map_err(TransportError::io)?;
        trace!(len = response.len(), packets = packets.len(), "Queued response");
        self.outbox.extend(packets);
        Ok(())
    }
}

impl PacketTransport for Emulator {
    fn do_write_packet(&mut self, packet: &Packet) -> std::result::Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::Closed);
        }
        if self
            .disconnect_after
            .is_some_and(|limit| self.packets_written >= limit)
        {
            debug!(written = self.packets_written, "Emulated device disconnected");
            self.connected = false;
            return Err(TransportError::io("device disconnected"));
        }
        self.packets_written += 1;

        match self.decoder.push(packet) {
            Ok(Some(apdu)) => {
                self.decoder.reset();
                self.respond(&apdu)
            }
            Ok(None) => Ok(()),
            Err(e) => {
                // Firmware drops malformed frames without answering
                debug!(error = %e, "Dropping malformed frame");
                self.decoder.reset();
                Ok(())
            }
        }
    }

    fn do_read_packet(&mut self, _timeout: Duration) -> std::result::Result<Packet, TransportError> {
        if !self.connected {
            return Err(TransportError::Closed);
        }
        self.outbox.pop_front().ok_or(TransportError::Timeout)
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn close(&mut self) -> std::result::Result<(), TransportError> {
        self.connected = false;
        self.outbox.clear();
        Ok(())
    }
}
