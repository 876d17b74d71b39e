//! Cosmos applet logic behind the emulated device

use bytes::{BufMut, Bytes, BytesMut};
use k256::ecdsa::{Signature, SigningKey, signature::hazmat::PrehashSigner};
use ledger_apdu_core::prelude::status;
use ledger_apdu_core::{Command, StatusWord};
use sha2::{Digest, Sha256};
use tracing::{debug, trace};

use super::EmulatorConfig;
use crate::PublicKey;

/// Message being received chunk by chunk
#[derive(Debug)]
struct PendingMessage {
    ins: u8,
    total: u8,
    received: u8,
    buffer: Vec<u8>,
}

#[derive(Debug)]
pub(super) struct Applet {
    config: EmulatorConfig,
    signing_key: SigningKey,
    pending: Option<PendingMessage>,
}

impl Applet {
    pub(super) const fn new(config: EmulatorConfig, signing_key: SigningKey) -> Self {
        Self {
            config,
            signing_key,
            pending: None,
        }
    }

    pub(super) fn public_key(&self) -> PublicKey {
        PublicKey::from(self.signing_key.verifying_key())
    }

    /// Run one APDU and return the response with its status word
    pub(super) fn process(&mut self, apdu: &[u8]) -> Bytes {
        let Ok(command) = Command::from_bytes(apdu) else {
            debug!(len = apdu.len(), "Malformed APDU");
            return reply(&[], status::WRONG_LENGTH);
        };

        let ins = self.config.instructions;
        if command.cla != ins.cla {
            return reply(&[], status::CLA_NOT_SUPPORTED);
        }

        trace!(ins = command.ins, p1 = command.p1, p2 = command.p2, "Applet command");
        let data = command.data.as_deref().unwrap_or_default();
        match command.ins {
            i if i == ins.get_version => reply(&self.config.version.to_bytes(), status::SUCCESS),
            i if i == ins.get_public_key => reply(self.public_key().as_bytes(), status::SUCCESS),
            i if i == ins.echo || i == ins.hash || i == ins.sign => {
                self.chunk(command.ins, command.p1, command.p2, data)
            }
            _ => reply(&[], status::INS_NOT_SUPPORTED),
        }
    }

    fn chunk(&mut self, ins: u8, index: u8, total: u8, data: &[u8]) -> Bytes {
        if index == 0 || index > total {
            self.pending = None;
            return reply(&[], status::INVALID_P1P2);
        }

        if index == 1 {
            self.pending = Some(PendingMessage {
                ins,
                total,
                received: 0,
                buffer: Vec::with_capacity(total as usize * crate::constants::CHUNK_SIZE),
            });
        }

        let in_sequence = self.pending.as_ref().is_some_and(|pending| {
            pending.ins == ins && pending.total == total && pending.received + 1 == index
        });
        if !in_sequence {
            debug!(ins, index, total, "Chunk out of sequence");
            self.pending = None;
            return reply(&[], status::DATA_INVALID);
        }
        let Some(pending) = self.pending.as_mut() else {
            return reply(&[], status::DATA_INVALID);
        };

        pending.buffer.extend_from_slice(data);
        pending.received = index;
        if index < total {
            return reply(&[], status::SUCCESS);
        }

        let message = self.pending.take().map(|p| p.buffer).unwrap_or_default();
        self.finish(ins, &message)
    }

    fn finish(&self, ins: u8, message: &[u8]) -> Bytes {
        let instructions = self.config.instructions;
        debug!(ins, len = message.len(), "Chunked message complete");

        if ins == instructions.echo {
            let len = message.len().min(self.config.echo_cap);
            reply(&message[..len], status::SUCCESS)
        } else if ins == instructions.hash {
            reply(&Sha256::digest(message), status::SUCCESS)
        } else if self.config.reject_signing {
            reply(&[], status::CONDITIONS_NOT_SATISFIED)
        } else {
            let digest = Sha256::digest(message);
            match PrehashSigner::<Signature>::sign_prehash(&self.signing_key, &digest) {
                Ok(signature) => reply(signature.to_der().as_bytes(), status::SUCCESS),
                Err(_) => reply(&[], status::SIGN_VERIFY_ERROR),
            }
        }
    }
}

fn reply(data: &[u8], status: StatusWord) -> Bytes {
    let mut buf = BytesMut::with_capacity(data.len() + 2);
    buf.put_slice(data);
    buf.put_u8(status.sw1);
    buf.put_u8(status.sw2);
    buf.freeze()
}
