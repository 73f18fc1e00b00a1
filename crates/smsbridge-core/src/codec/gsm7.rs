//! GSM 03.38 default alphabet and 7-bit packing

use crate::error::DecodeError;

/// Escape to the extension table
pub const ESCAPE: u8 = 0x1B;

#[rustfmt::skip]
const DEFAULT_ALPHABET: [char; 128] = [
    '@', '£', '$', '¥', 'è', 'é', 'ù', 'ì', 'ò', 'Ç', '\n', 'Ø', 'ø', '\r', 'Å', 'å',
    'Δ', '_', 'Φ', 'Γ', 'Λ', 'Ω', 'Π', 'Ψ', 'Σ', 'Θ', 'Ξ', ' ', 'Æ', 'æ', 'ß', 'É',
    ' ', '!', '"', '#', '¤', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/',
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', ':', ';', '<', '=', '>', '?',
    '¡', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O',
    'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'Ä', 'Ö', 'Ñ', 'Ü', '§',
    '¿', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o',
    'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'ä', 'ö', 'ñ', 'ü', 'à',
];

fn extension(septet: u8) -> Option<char> {
    match septet {
        0x0A => Some('\u{0C}'),
        0x14 => Some('^'),
        0x28 => Some('{'),
        0x29 => Some('}'),
        0x2F => Some('\\'),
        0x3C => Some('['),
        0x3D => Some('~'),
        0x3E => Some(']'),
        0x40 => Some('|'),
        0x65 => Some('€'),
        _ => None,
    }
}

fn default_char(septet: u8) -> char {
    DEFAULT_ALPHABET[usize::from(septet & 0x7F)]
}

/// Unpack `count` septets from packed 7-bit data.
pub fn unpack_septets(data: &[u8], count: usize) -> Result<Vec<u8>, DecodeError> {
    let required = (count * 7).div_ceil(8);
    if data.len() < required {
        return Err(DecodeError::Truncated("7-bit user data"));
    }

    let septets = (0..count)
        .map(|i| {
            let bit = i * 7;
            let idx = bit / 8;
            let shift = bit % 8;
            let mut value = u16::from(data[idx]) >> shift;
            if shift > 1 {
                value |= u16::from(data[idx + 1]) << (8 - shift);
            }
            (value & 0x7F) as u8
        })
        .collect();

    Ok(septets)
}

/// Pack septets into 7-bit data.
pub fn pack_septets(septets: &[u8]) -> Vec<u8> {
    let mut packed = vec![0u8; (septets.len() * 7).div_ceil(8)];
    for (i, septet) in septets.iter().enumerate() {
        let bit = i * 7;
        let idx = bit / 8;
        let shift = bit % 8;
        let value = u16::from(septet & 0x7F) << shift;
        packed[idx] |= (value & 0xFF) as u8;
        if shift > 1 {
            packed[idx + 1] |= (value >> 8) as u8;
        }
    }
    packed
}

/// Map septets to text, resolving escape sequences.
///
/// Unknown extension codes fall back to the default table; a trailing escape
/// renders as a space.
pub fn decode_septets(septets: &[u8]) -> String {
    let mut text = String::with_capacity(septets.len());
    let mut iter = septets.iter().copied();
    while let Some(septet) = iter.next() {
        if septet != ESCAPE {
            text.push(default_char(septet));
            continue;
        }
        match iter.next() {
            Some(next) => text.push(extension(next).unwrap_or_else(|| default_char(next))),
            None => text.push(' '),
        }
    }
    text
}

/// Map text to septets. Returns `None` if a character has no GSM 7-bit form.
pub fn encode_septets(text: &str) -> Option<Vec<u8>> {
    let mut septets = Vec::with_capacity(text.len());
    for c in text.chars() {
        if let Some(pos) = DEFAULT_ALPHABET
            .iter()
            .enumerate()
            .position(|(pos, &a)| a == c && pos != usize::from(ESCAPE))
        {
            septets.push(pos as u8);
        } else if let Some(code) = (0u8..0x80).find(|&s| extension(s) == Some(c)) {
            septets.push(ESCAPE);
            septets.push(code);
        } else {
            return None;
        }
    }
    Some(septets)
}
