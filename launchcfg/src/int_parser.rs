// SPDX-License-Identifier: Apache-2.0

// Offset parser, radix handling follows C's strtol with base 0

/// Why an `offset` literal was rejected.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OffsetError {
    /// The literal was empty.
    Empty,
    /// The literal consisted only of a sign character (`+` or `-`).
    SignOnly,
    /// The literal denotes a value below zero.
    Negative,
    /// A character did not belong to the literal's radix, including any
    /// trailing text after an otherwise valid number.
    InvalidDigit,
    /// The value does not fit in `usize`.
    Overflow,
}

/// Parses an unsigned offset, detecting the radix from its prefix.
///
/// `0x`/`0X` selects hexadecimal, a leading `0` selects octal, anything else
/// is decimal. A single leading `+` or `-` is accepted, but only zero may be
/// negative. The whole input must be consumed: `12abc` is an error, not 12.
///
/// This function is guaranteed not to panic.
pub const fn parse_offset(src: &[u8]) -> Result<usize, OffsetError> {
    let (is_negative, rest) = match src {
        [] => return Err(OffsetError::Empty),
        [b'+', rest @ ..] => (false, rest),
        [b'-', rest @ ..] => (true, rest),
        _ => (false, src),
    };

    if rest.is_empty() {
        return Err(OffsetError::SignOnly);
    }

    let (radix, mut digits) = match rest {
        // "0x" on its own would leave the x unparsed
        [b'0', b'x' | b'X'] => return Err(OffsetError::InvalidDigit),
        [b'0', b'x' | b'X', hex @ ..] => (16, hex),
        [b'0', octal @ ..] => (8, octal),
        _ => (10, rest),
    };

    let mut result: usize = 0;

    while let Some((&byte, tail)) = digits.split_first() {
        let digit = match byte {
            b'0'..=b'9' => (byte - b'0') as usize,
            b'a'..=b'f' => (byte - b'a' + 10) as usize,
            b'A'..=b'F' => (byte - b'A' + 10) as usize,
            _ => return Err(OffsetError::InvalidDigit),
        };
        if digit >= radix {
            return Err(OffsetError::InvalidDigit);
        }

        result = match result.checked_mul(radix) {
            Some(val) => val,
            None => return Err(OffsetError::Overflow),
        };
        result = match result.checked_add(digit) {
            Some(val) => val,
            None => return Err(OffsetError::Overflow),
        };

        digits = tail;
    }

    if is_negative && result != 0 {
        return Err(OffsetError::Negative);
    }
    Ok(result)
}

impl core::fmt::Display for OffsetError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let reason = match self {
            OffsetError::Empty => "empty number",
            OffsetError::SignOnly => "sign without digits",
            OffsetError::Negative => "negative value",
            OffsetError::InvalidDigit => "unexpected character",
            OffsetError::Overflow => "value too large",
        };
        f.write_str(reason)
    }
}
