//! Base58 and Base58Check encoding.
//!
//! The input is treated as a big-endian base-256 number and re-expressed in
//! base 58. Every leading zero byte becomes exactly one leading `'1'`, since
//! leading zeros carry no numeric value but must survive the round trip.
//!
//! Encoding is quadratic in the input length, which is fine for address
//! payloads (at most 25 bytes).

use crate::error::EncodingError;
use crate::hash::{checksum, CHECKSUM_LEN};

pub(crate) const BASE58_ALPHABET: &[u8; 58] =
    b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Encode bytes as Base58.
pub fn encode(input: &[u8]) -> String {
    if input.is_empty() {
        return String::new();
    }

    let zeros = input.iter().take_while(|&&b| b == 0).count();

    // Working copy divided in place; `start` skips the quotient's leading zeros
    let mut number = input[zeros..].to_vec();
    let mut digits = Vec::with_capacity(number.len() * 138 / 100 + 1);
    let mut start = 0;

    while start < number.len() {
        let remainder = divmod58(&mut number[start..]);
        digits.push(BASE58_ALPHABET[remainder as usize]);
        while start < number.len() && number[start] == 0 {
            start += 1;
        }
    }

    let mut encoded = String::with_capacity(zeros + digits.len());
    for _ in 0..zeros {
        encoded.push(BASE58_ALPHABET[0] as char);
    }
    encoded.extend(digits.iter().rev().map(|&d| d as char));
    encoded
}

/// Divide a big-endian number by 58 in place, returning the remainder.
fn divmod58(number: &mut [u8]) -> u8 {
    let mut remainder: u32 = 0;
    for byte in number.iter_mut() {
        let acc = remainder * 256 + *byte as u32;
        *byte = (acc / 58) as u8;
        remainder = acc % 58;
    }
    remainder as u8
}

/// Decode a Base58 string back to bytes.
pub fn decode(input: &str) -> Result<Vec<u8>, EncodingError> {
    let mut result: Vec<u8> = Vec::new();

    // Leading '1's become leading zero bytes
    let leading_zeros = input.chars().take_while(|&c| c == '1').count();

    for c in input.chars() {
        let value = BASE58_ALPHABET
            .iter()
            .position(|&x| x as char == c)
            .ok_or(EncodingError::InvalidBase58Char(c))? as u32;

        // Multiply result by 58 and add value
        let mut carry = value;
        for byte in result.iter_mut().rev() {
            let temp = (*byte as u32) * 58 + carry;
            *byte = (temp & 0xFF) as u8;
            carry = temp >> 8;
        }

        while carry > 0 {
            result.insert(0, (carry & 0xFF) as u8);
            carry >>= 8;
        }
    }

    let mut decoded = vec![0u8; leading_zeros];
    decoded.extend(result);
    Ok(decoded)
}

/// Base58Check: append the 4-byte double-SHA256 checksum, then encode.
pub fn encode_check(payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum(payload));
    encode(&data)
}

/// Decode a Base58Check string, verify and strip its checksum.
pub fn decode_check(input: &str) -> Result<Vec<u8>, EncodingError> {
    let mut decoded = decode(input)?;
    if decoded.len() < CHECKSUM_LEN {
        return Err(EncodingError::PayloadTooShort(decoded.len()));
    }

    let split = decoded.len() - CHECKSUM_LEN;
    if decoded[split..] != checksum(&decoded[..split]) {
        return Err(EncodingError::InvalidChecksum);
    }

    decoded.truncate(split);
    Ok(decoded)
}
