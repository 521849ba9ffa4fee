//! Bech32 encoding (BIP-173).
//!
//! A Bech32 string is `hrp ‖ "1" ‖ data ‖ checksum`, where data and checksum
//! are 5-bit units mapped through [`BECH32_CHARSET`]. The six checksum units
//! come from a BCH code over GF(32) computed by [`polymod`]; a valid string
//! has a polymod of exactly 1 over `hrp_expand(hrp) ‖ data ‖ checksum`.

use crate::error::EncodingError;

pub const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Separator between the human-readable part and the data part.
pub const SEPARATOR: char = '1';

/// Number of 5-bit checksum units.
pub const CHECKSUM_LEN: usize = 6;

/// Maximum total length of a Bech32 string.
pub const MAX_LENGTH: usize = 90;

const GENERATOR: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];

/// Expand the human-readable part for checksum input: the high 3 bits of
/// every character, a zero unit, then the low 5 bits of every character.
pub fn hrp_expand(hrp: &str) -> Vec<u8> {
    let bytes = hrp.as_bytes();
    let mut result = Vec::with_capacity(bytes.len() * 2 + 1);

    result.extend(bytes.iter().map(|&b| b >> 5));
    result.push(0);
    result.extend(bytes.iter().map(|&b| b & 31));

    result
}

/// The Bech32 checksum polynomial over a sequence of 5-bit units.
pub fn polymod(values: &[u8]) -> u32 {
    let mut chk: u32 = 1;

    for &value in values {
        let top = chk >> 25;
        chk = ((chk & 0x1ffffff) << 5) ^ (value as u32);
        for (i, &g) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }

    chk
}

/// Compute the six checksum units for `hrp` and `data`.
pub fn create_checksum(hrp: &str, data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut values = hrp_expand(hrp);
    values.extend_from_slice(data);
    values.extend_from_slice(&[0u8; CHECKSUM_LEN]);

    let pm = polymod(&values) ^ 1;

    let mut checksum = [0u8; CHECKSUM_LEN];
    for (i, unit) in checksum.iter_mut().enumerate() {
        *unit = ((pm >> (5 * (5 - i))) & 31) as u8;
    }
    checksum
}

/// Check that `data` (including its trailing checksum units) verifies under `hrp`.
pub fn verify_checksum(hrp: &str, data: &[u8]) -> bool {
    let mut values = hrp_expand(hrp);
    values.extend_from_slice(data);
    polymod(&values) == 1
}

/// Encode 5-bit `data` under the human-readable part `hrp`.
pub fn encode(hrp: &str, data: &[u8]) -> Result<String, EncodingError> {
    validate_hrp(hrp)?;
    // Encoders must emit lowercase only
    if hrp.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(EncodingError::InvalidBech32("Uppercase human-readable part".into()));
    }

    if hrp.len() + 1 + data.len() + CHECKSUM_LEN > MAX_LENGTH {
        return Err(EncodingError::InvalidBech32(format!(
            "Encoded length exceeds {} characters",
            MAX_LENGTH
        )));
    }

    if let Some(&value) = data.iter().find(|&&v| v > 31) {
        return Err(EncodingError::ValueOutOfRange { value, bits: 5 });
    }

    let charset = BECH32_CHARSET.as_bytes();
    let checksum = create_checksum(hrp, data);

    let mut encoded = String::with_capacity(hrp.len() + 1 + data.len() + CHECKSUM_LEN);
    encoded.push_str(hrp);
    encoded.push(SEPARATOR);
    encoded.extend(data.iter().chain(checksum.iter()).map(|&v| charset[v as usize] as char));

    Ok(encoded)
}

/// Decode a Bech32 string into its human-readable part and 5-bit data,
/// with the checksum verified and stripped.
pub fn decode(input: &str) -> Result<(String, Vec<u8>), EncodingError> {
    if input.len() > MAX_LENGTH {
        return Err(EncodingError::InvalidBech32(format!(
            "Length {} exceeds {}",
            input.len(),
            MAX_LENGTH
        )));
    }

    let has_lower = input.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = input.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(EncodingError::InvalidBech32("Mixed case".into()));
    }

    let input_lower = input.to_ascii_lowercase();

    let sep_pos = input_lower
        .rfind(SEPARATOR)
        .ok_or_else(|| EncodingError::InvalidBech32("No separator found".into()))?;

    if sep_pos == 0 || sep_pos + 1 + CHECKSUM_LEN > input_lower.len() {
        return Err(EncodingError::InvalidBech32("Invalid separator position".into()));
    }

    let hrp = &input_lower[..sep_pos];
    validate_hrp(hrp)?;

    let mut data = Vec::with_capacity(input_lower.len() - sep_pos - 1);
    for c in input_lower[sep_pos + 1..].chars() {
        let idx = BECH32_CHARSET
            .find(c)
            .ok_or_else(|| EncodingError::InvalidBech32(format!("Invalid character: {}", c)))?;
        data.push(idx as u8);
    }

    if !verify_checksum(hrp, &data) {
        return Err(EncodingError::InvalidChecksum);
    }

    data.truncate(data.len() - CHECKSUM_LEN);

    Ok((hrp.to_string(), data))
}

fn validate_hrp(hrp: &str) -> Result<(), EncodingError> {
    if hrp.is_empty() {
        return Err(EncodingError::InvalidBech32("Empty human-readable part".into()));
    }
    if let Some(c) = hrp.chars().find(|&c| !('!'..='~').contains(&c)) {
        return Err(EncodingError::InvalidBech32(format!(
            "Invalid human-readable part character: {:?}",
            c
        )));
    }
    Ok(())
}
