pub(crate) mod display;

/// Decode a hex argument, allowing an optional `0x` prefix
pub(crate) fn parse_hex(data: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(data.trim_start_matches("0x"))
}
