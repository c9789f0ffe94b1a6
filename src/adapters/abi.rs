//! Minimal ABI codec for the hotel contract.
//!
//! Only the shapes the contract uses are supported: `uint256` words, one
//! dynamic `string` argument, and a `uint256[]` return value.

use crate::domain::model::LedgerCall;
use crate::utils::error::{BookingError, Result};

/// `checkIn(uint256,string,uint256)`
pub const CHECK_IN_SELECTOR: [u8; 4] = [0x60, 0xac, 0x72, 0x8c];
/// `checkOut()`
pub const CHECK_OUT_SELECTOR: [u8; 4] = [0xcb, 0xa5, 0x75, 0x1c];
/// `MAX_DAYS()`
pub const MAX_DAYS_SELECTOR: [u8; 4] = [0x69, 0x3e, 0xaf, 0xff];
/// `getAvailableRooms()`
pub const GET_AVAILABLE_ROOMS_SELECTOR: [u8; 4] = [0xd0, 0x14, 0x45, 0x95];

const WORD: usize = 32;

fn uint_word(value: u128) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

pub fn encode_call(call: &LedgerCall) -> Vec<u8> {
    match call {
        LedgerCall::CheckIn {
            room_number,
            guest_name,
            days_to_stay,
            ..
        } => {
            let name = guest_name.as_bytes();
            let padding = (WORD - name.len() % WORD) % WORD;

            let mut data = Vec::with_capacity(4 + WORD * 4 + name.len() + padding);
            data.extend_from_slice(&CHECK_IN_SELECTOR);
            data.extend_from_slice(&uint_word(u128::from(*room_number)));
            // string 參數放在三個 head word 之後
            data.extend_from_slice(&uint_word((WORD * 3) as u128));
            data.extend_from_slice(&uint_word(u128::from(*days_to_stay)));
            data.extend_from_slice(&uint_word(name.len() as u128));
            data.extend_from_slice(name);
            data.extend(std::iter::repeat(0u8).take(padding));
            data
        }
        LedgerCall::CheckOut => CHECK_OUT_SELECTOR.to_vec(),
    }
}

pub fn to_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

pub fn decode_hex(value: &str) -> Result<Vec<u8>> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(digits).map_err(|e| BookingError::malformed(format!("invalid hex '{}': {}", value, e)))
}

/// Parses a JSON-RPC quantity such as `0x1b4`.
pub fn parse_quantity(value: &str) -> Result<u64> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    u64::from_str_radix(digits, 16)
        .map_err(|e| BookingError::malformed(format!("invalid quantity '{}': {}", value, e)))
}

fn word_at(data: &[u8], offset: usize) -> Result<&[u8]> {
    let end = offset
        .checked_add(WORD)
        .ok_or_else(|| BookingError::malformed(format!("word offset {} out of range", offset)))?;
    data.get(offset..end).ok_or_else(|| {
        BookingError::malformed(format!(
            "expected a 32-byte word at offset {}, got {} bytes",
            offset,
            data.len()
        ))
    })
}

pub fn decode_uint(data: &[u8]) -> Result<u128> {
    decode_uint_at(data, 0)
}

fn decode_uint_at(data: &[u8], offset: usize) -> Result<u128> {
    let word = word_at(data, offset)?;
    if word[..16].iter().any(|b| *b != 0) {
        return Err(BookingError::malformed("uint256 value does not fit in 128 bits"));
    }
    let mut low = [0u8; 16];
    low.copy_from_slice(&word[16..]);
    Ok(u128::from_be_bytes(low))
}

pub fn decode_uint_array(data: &[u8]) -> Result<Vec<u128>> {
    let offset = usize::try_from(decode_uint_at(data, 0)?)
        .map_err(|_| BookingError::malformed("array offset out of range"))?;
    let length = usize::try_from(decode_uint_at(data, offset)?)
        .map_err(|_| BookingError::malformed("array length out of range"))?;

    (0..length)
        .map(|i| {
            let position = (i + 1)
                .checked_mul(WORD)
                .and_then(|step| offset.checked_add(step))
                .ok_or_else(|| BookingError::malformed("array element offset out of range"))?;
            decode_uint_at(data, position)
        })
        .collect()
}
