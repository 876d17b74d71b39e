//! Chunked transfer of long messages
//!
//! Echo, hash and sign take messages longer than one APDU. The message is cut
//! into [`CHUNK_SIZE`] byte chunks, each sent as its own command with
//! `P1 = index` (1-based) and `P2 = count`. Only the answer to the last chunk
//! carries the result.

use ledger_apdu_core::{ApduCommand, Bytes, Executor};
use tracing::debug;

use crate::commands::ChunkCommand;
use crate::constants::{CHUNK_SIZE, MAX_CHUNKS, MAX_MESSAGE_LEN};
use crate::{Error, Result};

/// Progress of a chunked sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceState {
    /// Nothing sent yet
    Init,
    /// Intermediate chunk `index` of `total` in flight
    Sending {
        /// 1-based chunk index
        index: u8,
        /// Number of chunks
        total: u8,
    },
    /// Final chunk sent, waiting for the result
    AwaitingResult,
    /// Result received
    Complete,
    /// A chunk failed; the sequence cannot be resumed
    Failed {
        /// Chunk that failed
        index: u8,
    },
}

/// A message split into chunk commands
#[derive(Debug, Clone)]
pub struct ChunkedSequence {
    cla: u8,
    ins: u8,
    chunks: Vec<Bytes>,
    state: SequenceState,
}

impl ChunkedSequence {
    /// Split a message for the given instruction
    ///
    /// Fails with [`Error::MessageTooLarge`] when more than [`MAX_CHUNKS`]
    /// chunks would be needed.
    pub fn new(cla: u8, ins: u8, message: &[u8]) -> Result<Self> {
        if message.len() > MAX_MESSAGE_LEN {
            return Err(Error::MessageTooLarge {
                len: message.len(),
                max: MAX_MESSAGE_LEN,
            });
        }

        let chunks: Vec<Bytes> = if message.is_empty() {
            vec![Bytes::new()]
        } else {
            message
                .chunks(CHUNK_SIZE)
                .map(Bytes::copy_from_slice)
                .collect()
        };
        debug_assert!(chunks.len() <= MAX_CHUNKS);

        Ok(Self {
            cla,
            ins,
            chunks,
            state: SequenceState::Init,
        })
    }

    /// Number of chunks
    pub fn total(&self) -> u8 {
        self.chunks.len() as u8
    }

    /// Current state
    pub const fn state(&self) -> SequenceState {
        self.state
    }

    /// Chunk commands in sending order
    pub fn commands(&self) -> impl Iterator<Item = ChunkCommand> + '_ {
        let total = self.total();
        self.chunks.iter().enumerate().map(move |(i, chunk)| {
            ChunkCommand::new(self.cla, self.ins, (i + 1) as u8, total, chunk.clone())
        })
    }

    /// Send every chunk and return the payload answering the last one
    ///
    /// The first refused or failed chunk ends the sequence; intermediate
    /// payloads are discarded.
    pub fn run<E: Executor>(&mut self, executor: &mut E) -> Result<Bytes> {
        let commands: Vec<_> = self.commands().collect();

        let mut result = Bytes::new();
        for command in &commands {
            self.state = if command.is_last() {
                SequenceState::AwaitingResult
            } else {
                SequenceState::Sending {
                    index: command.index(),
                    total: command.total(),
                }
            };
            debug!(
                ins = self.ins,
                index = command.index(),
                total = command.total(),
                len = command.data().map_or(0, <[u8]>::len),
                "Sending chunk"
            );

            match executor.execute(command) {
                Ok(payload) => result = payload,
                Err(e) => {
                    debug!(index = command.index(), error = %e, "Chunked sequence failed");
                    self.state = SequenceState::Failed {
                        index: command.index(),
                    };
                    return Err(e);
                }
            }
        }

        self.state = SequenceState::Complete;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use ledger_apdu_core::FramedExecutor;

    use super::*;
    use crate::emulator::Emulator;

    #[test]
    fn test_split_boundaries() {
        let cases = [(0, 1), (1, 1), (250, 1), (251, 2), (500, 2), (501, 3), (MAX_MESSAGE_LEN, 255)];
        for (len, chunks) in cases {
            let sequence = ChunkedSequence::new(0x55, 0x63, &vec![0u8; len]).unwrap();
            assert_eq!(sequence.total() as usize, chunks, "length {len}");
            assert_eq!(sequence.state(), SequenceState::Init);
        }
    }

    #[test]
    fn test_message_too_large() {
        let result = ChunkedSequence::new(0x55, 0x63, &vec![0u8; MAX_MESSAGE_LEN + 1]);
        assert!(matches!(
            result,
            Err(Error::MessageTooLarge { len, .. }) if len == MAX_MESSAGE_LEN + 1
        ));
    }

    #[test]
    fn test_command_parameters() {
        let message: Vec<u8> = (0..600).map(|i| (i % 100) as u8).collect();
        let sequence = ChunkedSequence::new(0x55, 0x64, &message).unwrap();
        let commands: Vec<_> = sequence.commands().collect();

        assert_eq!(commands.len(), 3);
        for (i, cmd) in commands.iter().enumerate() {
            assert_eq!(cmd.p1() as usize, i + 1);
            assert_eq!(cmd.p2(), 3);
        }
        assert_eq!(commands[0].data().unwrap(), &message[..250]);
        assert_eq!(commands[2].data().unwrap(), &message[500..]);
        assert!(commands[2].is_last());
    }

    #[test]
    fn test_empty_message_is_one_empty_chunk() {
        let sequence = ChunkedSequence::new(0x55, 0x63, &[]).unwrap();
        let commands: Vec<_> = sequence.commands().collect();

        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].to_bytes().unwrap().as_ref(), &[0x55, 0x63, 0x01, 0x01, 0x00]);
    }

    #[test]
    fn test_run_completes() {
        let mut executor = FramedExecutor::new(Emulator::baseline().unwrap());
        let mut sequence = ChunkedSequence::new(0x55, 0x63, &[0x56; 300]).unwrap();

        let echoed = sequence.run(&mut executor).unwrap();
        assert_eq!(echoed.as_ref(), &[0x56; 64]);
        assert_eq!(sequence.state(), SequenceState::Complete);
    }

    #[test]
    fn test_intermediate_refusal_fails_sequence() {
        // Unknown instruction: the first chunk is already refused
        let mut executor = FramedExecutor::new(Emulator::baseline().unwrap());
        let mut sequence = ChunkedSequence::new(0x55, 0x7F, &[0x00; 600]).unwrap();

        let err = sequence.run(&mut executor).unwrap_err();
        assert!(err.status_word().unwrap().is_instruction_not_supported());
        assert_eq!(sequence.state(), SequenceState::Failed { index: 1 });
    }

    #[test]
    fn test_transport_loss_mid_sequence() {
        // A full chunk is 255 bytes on the wire, five packets
        let emulator = Emulator::baseline().unwrap().disconnect_after(5);
        let mut executor = FramedExecutor::new(emulator);
        let mut sequence = ChunkedSequence::new(0x55, 0x64, &[0x00; 260]).unwrap();

        let err = sequence.run(&mut executor).unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(sequence.state(), SequenceState::Failed { index: 2 });
    }
}
