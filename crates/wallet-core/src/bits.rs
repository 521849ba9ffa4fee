//! Regrouping of bit streams between unit widths.
//!
//! Bech32 carries its data part as 5-bit units, so an 8-bit witness program
//! is regrouped before encoding and back again after decoding.

use crate::error::EncodingError;

/// Regroup `data` from `from_bits`-wide units into `to_bits`-wide units.
///
/// With `pad` set, leftover bits are flushed as a final zero-padded unit.
/// Without it, leftover bits must be fewer than `from_bits` and all zero,
/// otherwise the conversion would drop information.
pub fn convert_bits(data: &[u8], from_bits: u8, to_bits: u8, pad: bool) -> Result<Vec<u8>, EncodingError> {
    if !(1..=8).contains(&from_bits) || !(1..=8).contains(&to_bits) {
        return Err(EncodingError::InvalidBitWidth { from_bits, to_bits });
    }

    let mut acc: u32 = 0;
    let mut bits: u8 = 0;
    let mut result = Vec::with_capacity((data.len() * from_bits as usize + to_bits as usize - 1) / to_bits as usize);
    let max_value = (1u32 << to_bits) - 1;

    for &value in data {
        if (value as u32) >> from_bits != 0 {
            return Err(EncodingError::ValueOutOfRange { value, bits: from_bits });
        }
        acc = (acc << from_bits) | (value as u32);
        bits += from_bits;

        while bits >= to_bits {
            bits -= to_bits;
            result.push(((acc >> bits) & max_value) as u8);
        }
        // Only the low `bits` bits are still pending
        acc &= (1u32 << bits) - 1;
    }

    if pad {
        if bits > 0 {
            result.push(((acc << (to_bits - bits)) & max_value) as u8);
        }
    } else if bits >= from_bits || ((acc << (to_bits - bits)) & max_value) != 0 {
        return Err(EncodingError::InvalidPadding);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_twenty_bytes_become_thirty_two_units() {
        let program = [0xffu8; 20];
        let units = convert_bits(&program, 8, 5, true).unwrap();

        assert_eq!(units.len(), 32);
        assert!(units.iter().all(|&u| u == 31));
    }

    #[test]
    fn test_padding_flushes_final_unit() {
        // 8 bits -> 5 + 3 leftover, padded to 5 with two zero bits
        let units = convert_bits(&[0b1010_1100], 8, 5, true).unwrap();
        assert_eq!(units, vec![0b10101, 0b10000]);
    }

    #[test]
    fn test_out_of_range_unit_rejected() {
        let result = convert_bits(&[0, 32], 5, 8, false);
        assert_eq!(result, Err(EncodingError::ValueOutOfRange { value: 32, bits: 5 }));
    }

    #[test]
    fn test_non_zero_padding_rejected() {
        // Two 5-bit units = 10 bits; the trailing 2 bits must be zero
        let result = convert_bits(&[0b10101, 0b10001], 5, 8, false);
        assert_eq!(result, Err(EncodingError::InvalidPadding));
    }

    #[test]
    fn test_excess_padding_rejected() {
        // Three 5-bit units = 15 bits: one full byte plus 7 leftover bits,
        // more than a full 5-bit unit of padding
        let result = convert_bits(&[0, 0, 0], 5, 8, false);
        assert_eq!(result, Err(EncodingError::InvalidPadding));
    }

    #[test]
    fn test_invalid_bit_width() {
        let result = convert_bits(&[1], 0, 5, true);
        assert_eq!(result, Err(EncodingError::InvalidBitWidth { from_bits: 0, to_bits: 5 }));
    }

    proptest! {
        #[test]
        fn prop_regroup_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let units = convert_bits(&bytes, 8, 5, true).unwrap();
            prop_assert!(units.iter().all(|&u| u < 32));
            prop_assert_eq!(convert_bits(&units, 5, 8, false).unwrap(), bytes);
        }
    }
}
