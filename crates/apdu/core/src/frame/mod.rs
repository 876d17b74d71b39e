//! HID framing for APDU exchanges
//!
//! A logical message (a serialized command, or a response with its status
//! word) is cut into 64 byte packets. Every packet starts with a header:
//!
//! ```text
//! Offset  Length  Description
//! ----------------------------------------------------------------
//! 0       2       Channel identifier (big endian)
//! 2       1       Tag, always 0x05 for APDU traffic
//! 3       2       Sequence index, 0 for the first packet
//! 5       2       Total message length (first packet only)
//! 5 / 7   rest    Message bytes, zero padded
//! ```

mod error;

pub use error::FramingError;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::transport::{PACKET_SIZE, Packet};

/// Channel identifier used by Ledger devices
pub const DEFAULT_CHANNEL: u16 = 0x0101;

/// Tag marking APDU traffic
pub const TAG_APDU: u8 = 0x05;

const FIRST_HEADER_LEN: usize = 7;
const CONTINUATION_HEADER_LEN: usize = 5;

/// Message bytes carried by the first packet
pub const FIRST_PACKET_DATA_LEN: usize = PACKET_SIZE - FIRST_HEADER_LEN;

/// Message bytes carried by every following packet
pub const CONTINUATION_PACKET_DATA_LEN: usize = PACKET_SIZE - CONTINUATION_HEADER_LEN;

/// Longest message the two byte length field can declare
pub const MAX_MESSAGE_LEN: usize = u16::MAX as usize;

/// Decoded packet header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketHeader {
    /// Opens a message and declares its total length
    First {
        /// Channel identifier
        channel: u16,
        /// Length of the whole message in bytes
        total_len: u16,
    },
    /// Carries the next slice of a message already opened
    Continuation {
        /// Channel identifier
        channel: u16,
        /// Sequence index, starting at 1
        sequence: u16,
    },
}

impl PacketHeader {
    /// Channel identifier of the packet
    pub const fn channel(&self) -> u16 {
        match self {
            Self::First { channel, .. } | Self::Continuation { channel, .. } => *channel,
        }
    }

    /// Sequence index of the packet
    pub const fn sequence(&self) -> u16 {
        match self {
            Self::First { .. } => 0,
            Self::Continuation { sequence, .. } => *sequence,
        }
    }

    /// Number of header bytes in front of the message data
    pub const fn header_len(&self) -> usize {
        match self {
            Self::First { .. } => FIRST_HEADER_LEN,
            Self::Continuation { .. } => CONTINUATION_HEADER_LEN,
        }
    }

    /// Parse the header at the start of a packet
    pub fn parse(packet: &Packet) -> Result<Self, FramingError> {
        let channel = u16::from_be_bytes([packet[0], packet[1]]);
        if packet[2] != TAG_APDU {
            return Err(FramingError::UnexpectedTag(packet[2]));
        }

        let sequence = u16::from_be_bytes([packet[3], packet[4]]);
        Ok(if sequence == 0 {
            Self::First {
                channel,
                total_len: u16::from_be_bytes([packet[5], packet[6]]),
            }
        } else {
            Self::Continuation { channel, sequence }
        })
    }

    fn write(&self, buf: &mut BytesMut) {
        buf.put_u16(self.channel());
        buf.put_u8(TAG_APDU);
        buf.put_u16(self.sequence());
        if let Self::First { total_len, .. } = self {
            buf.put_u16(*total_len);
        }
    }
}

/// Splits messages into packets and builds decoders for the way back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCodec {
    channel: u16,
}

impl FrameCodec {
    /// Create a codec for the given channel
    pub const fn new(channel: u16) -> Self {
        Self { channel }
    }

    /// Channel identifier stamped on encoded packets
    pub const fn channel(&self) -> u16 {
        self.channel
    }

    /// Split a message into packets
    ///
    /// An empty message still produces one packet declaring a zero length.
    pub fn encode(&self, message: &[u8]) -> Result<Vec<Packet>, FramingError> {
        if message.len() > MAX_MESSAGE_LEN {
            return Err(FramingError::PayloadTooLarge(message.len()));
        }

        let split_index = message.len().min(FIRST_PACKET_DATA_LEN);
        let (initial, remaining) = message.split_at(split_index);

        let mut packets = Vec::with_capacity(1 + remaining.len().div_ceil(CONTINUATION_PACKET_DATA_LEN));
        packets.push(Self::packet(
            PacketHeader::First {
                channel: self.channel,
                total_len: message.len() as u16,
            },
            initial,
        ));

        for (i, chunk) in remaining.chunks(CONTINUATION_PACKET_DATA_LEN).enumerate() {
            packets.push(Self::packet(
                PacketHeader::Continuation {
                    channel: self.channel,
                    sequence: (i + 1) as u16,
                },
                chunk,
            ));
        }

        trace!(
            message_len = message.len(),
            packets = packets.len(),
            "Encoded message"
        );
        Ok(packets)
    }

    /// Create an empty decoder expecting packets on this codec's channel
    pub const fn decoder(&self) -> FrameDecoder {
        FrameDecoder::new(self.channel)
    }

    /// Reassemble a message from a packet sequence
    ///
    /// Returns the bytes gathered so far and whether the declared length was
    /// reached. Packets left over after completion are an error.
    pub fn decode(&self, packets: &[Packet]) -> Result<(Bytes, bool), FramingError> {
        let mut decoder = self.decoder();
        for (i, packet) in packets.iter().enumerate() {
            if let Some(message) = decoder.push(packet)? {
                return if i + 1 == packets.len() {
                    Ok((message, true))
                } else {
                    Err(FramingError::AlreadyComplete)
                };
            }
        }
        Ok((decoder.received(), false))
    }

    fn packet(header: PacketHeader, data: &[u8]) -> Packet {
        let mut buf = BytesMut::with_capacity(PACKET_SIZE);
        header.write(&mut buf);
        buf.put_slice(data);
        buf.resize(PACKET_SIZE, 0);

        let mut packet = [0u8; PACKET_SIZE];
        packet.copy_from_slice(&buf);
        packet
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL)
    }
}

#[derive(Debug)]
enum DecodeState {
    AwaitingFirst,
    Receiving {
        expected: usize,
        next_sequence: u16,
        buffer: BytesMut,
    },
    Complete,
}

/// Incremental reassembly of one framed message
#[derive(Debug)]
pub struct FrameDecoder {
    channel: u16,
    state: DecodeState,
}

impl FrameDecoder {
    /// Create a decoder expecting packets on `channel`
    pub const fn new(channel: u16) -> Self {
        Self {
            channel,
            state: DecodeState::AwaitingFirst,
        }
    }

    /// Feed the next packet
    ///
    /// Returns the message, trimmed to its declared length, once the last
    /// packet arrived.
    pub fn push(&mut self, packet: &Packet) -> Result<Option<Bytes>, FramingError> {
        let header = PacketHeader::parse(packet)?;
        if header.channel() != self.channel {
            return Err(FramingError::ChannelMismatch {
                expected: self.channel,
                actual: header.channel(),
            });
        }

        let data = &packet[header.header_len()..];

        match (&mut self.state, header) {
            (DecodeState::AwaitingFirst, PacketHeader::First { total_len, .. }) => {
                let expected = total_len as usize;
                let mut buffer = BytesMut::with_capacity(expected);
                buffer.put_slice(&data[..expected.min(data.len())]);
                self.state = DecodeState::Receiving {
                    expected,
                    next_sequence: 1,
                    buffer,
                };
            }
            (DecodeState::AwaitingFirst, PacketHeader::Continuation { sequence, .. }) => {
                return Err(FramingError::OutOfOrder {
                    expected: 0,
                    actual: sequence,
                });
            }
            (
                DecodeState::Receiving {
                    expected,
                    next_sequence,
                    buffer,
                },
                header,
            ) => {
                if header.sequence() != *next_sequence {
                    return Err(FramingError::OutOfOrder {
                        expected: *next_sequence,
                        actual: header.sequence(),
                    });
                }
                let missing = *expected - buffer.len();
                buffer.put_slice(&data[..missing.min(data.len())]);
                *next_sequence += 1;
            }
            (DecodeState::Complete, _) => return Err(FramingError::AlreadyComplete),
        }

        if let DecodeState::Receiving {
            expected, buffer, ..
        } = &mut self.state
        {
            trace!(
                received = buffer.len(),
                expected = *expected,
                sequence = header.sequence(),
                "Decoded packet"
            );
            if buffer.len() == *expected {
                let message = buffer.split().freeze();
                self.state = DecodeState::Complete;
                return Ok(Some(message));
            }
        }

        Ok(None)
    }

    /// Check whether the whole message has been received
    pub const fn is_complete(&self) -> bool {
        matches!(self.state, DecodeState::Complete)
    }

    /// Bytes received so far for a message still in flight
    pub fn received(&self) -> Bytes {
        match &self.state {
            DecodeState::Receiving { buffer, .. } => Bytes::copy_from_slice(buffer),
            _ => Bytes::new(),
        }
    }

    /// Forget any partial message and wait for a new first packet
    pub fn reset(&mut self) {
        self.state = DecodeState::AwaitingFirst;
    }
}
