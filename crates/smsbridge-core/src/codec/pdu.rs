//! SMS-DELIVER PDU decoding (3GPP TS 23.040)
//!
//! Layout of a delivered unit:
//!
//! ```text
//! ┌──────┬───────┬────┬────┬─────┬──────┬─────┬──────────┐
//! │ SMSC │ first │ OA │ PID│ DCS │ SCTS │ UDL │    UD    │
//! │ len+ │ octet │    │    │     │ (7)  │     │[UDH]text │
//! └──────┴───────┴────┴────┴─────┴──────┴─────┴──────────┘
//! ```

use chrono::NaiveDate;
use tracing::debug;

use super::gsm7;
use crate::domain::{NormalizedRecord, PduFormat};
use crate::error::DecodeError;

const MTI_MASK: u8 = 0x03;
const MTI_DELIVER: u8 = 0x00;
const UDHI_FLAG: u8 = 0x40;

const TON_INTERNATIONAL: u8 = 0x01;
const TON_ALPHANUMERIC: u8 = 0x05;

/// Alphabet selected by the data coding scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataCoding {
    Gsm7,
    EightBit,
    Ucs2,
}

impl DataCoding {
    pub fn from_dcs(dcs: u8) -> Result<Self, DecodeError> {
        match dcs >> 4 {
            // General data coding, with or without automatic deletion
            0x0..=0x7 => {
                if dcs & 0x20 != 0 {
                    return Err(DecodeError::CompressedText);
                }
                Ok(match (dcs >> 2) & 0x03 {
                    0x01 => Self::EightBit,
                    0x02 => Self::Ucs2,
                    _ => Self::Gsm7,
                })
            }
            // Message waiting indication groups
            0xC | 0xD => Ok(Self::Gsm7),
            0xE => Ok(Self::Ucs2),
            0xF if dcs & 0x04 != 0 => Ok(Self::EightBit),
            _ => Ok(Self::Gsm7),
        }
    }
}

/// A decoded SMS-DELIVER unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsDeliver {
    pub originating_address: Option<String>,
    /// `None` for 8-bit data, which has no displayable body
    pub body: Option<String>,
    pub timestamp_millis: i64,
    pub coding: DataCoding,
    pub has_user_data_header: bool,
}

impl SmsDeliver {
    pub fn into_record(self) -> NormalizedRecord {
        NormalizedRecord::from_parts(self.originating_address, self.body, self.timestamp_millis)
    }
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn u8(&mut self, what: &'static str) -> Result<u8, DecodeError> {
        let byte = *self.buf.get(self.pos).ok_or(DecodeError::Truncated(what))?;
        self.pos += 1;
        Ok(byte)
    }

    fn take(&mut self, len: usize, what: &'static str) -> Result<&'a [u8], DecodeError> {
        let end = self.pos.checked_add(len).ok_or(DecodeError::Truncated(what))?;
        let slice = self.buf.get(self.pos..end).ok_or(DecodeError::Truncated(what))?;
        self.pos = end;
        Ok(slice)
    }

    fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos.min(self.buf.len())..]
    }
}

/// Decode one unit of the given format.
pub fn decode(unit: &[u8], format: PduFormat) -> Result<SmsDeliver, DecodeError> {
    match format {
        PduFormat::Gsm => decode_deliver(unit),
        PduFormat::Cdma => Err(DecodeError::UnsupportedFormat(format.as_str().to_string())),
    }
}

fn decode_deliver(unit: &[u8]) -> Result<SmsDeliver, DecodeError> {
    let mut reader = Reader::new(unit);

    let smsc_len = reader.u8("SMSC length")?;
    reader.take(usize::from(smsc_len), "SMSC address")?;

    let first = reader.u8("first octet")?;
    let mti = first & MTI_MASK;
    if mti != MTI_DELIVER {
        return Err(DecodeError::UnsupportedMessageType(mti));
    }
    let has_user_data_header = first & UDHI_FLAG != 0;

    let digits = usize::from(reader.u8("address length")?);
    let type_of_address = reader.u8("address type")?;
    let address = reader.take(digits.div_ceil(2), "originating address")?;
    let originating_address = decode_address(digits, type_of_address, address)?;

    let _protocol_id = reader.u8("protocol identifier")?;
    let coding = DataCoding::from_dcs(reader.u8("data coding scheme")?)?;
    // An unusable timestamp reads as 0; the message itself is still delivered.
    let timestamp_millis = decode_timestamp(reader.take(7, "timestamp")?).unwrap_or_else(|e| {
        debug!(error = %e, "[Codec] Unreadable service centre timestamp, using 0");
        0
    });

    let udl = usize::from(reader.u8("user data length")?);
    let body = decode_user_data(coding, udl, has_user_data_header, reader.rest())?;

    Ok(SmsDeliver {
        originating_address,
        body,
        timestamp_millis,
        coding,
        has_user_data_header,
    })
}

fn decode_address(
    digits: usize,
    type_of_address: u8,
    bytes: &[u8],
) -> Result<Option<String>, DecodeError> {
    if digits == 0 {
        return Ok(None);
    }

    let ton = (type_of_address >> 4) & 0x07;
    if ton == TON_ALPHANUMERIC {
        let septets = gsm7::unpack_septets(bytes, digits * 4 / 7)?;
        return Ok(Some(gsm7::decode_septets(&septets)));
    }

    let mut address = String::with_capacity(digits + 1);
    if ton == TON_INTERNATIONAL {
        address.push('+');
    }
    let nibbles = bytes.iter().flat_map(|b| [b & 0x0F, b >> 4]).take(digits);
    for nibble in nibbles {
        match nibble {
            0x0..=0x9 => address.push(char::from(b'0' + nibble)),
            0xA => address.push('*'),
            0xB => address.push('#'),
            0xC => address.push('a'),
            0xD => address.push('b'),
            0xE => address.push('c'),
            _ => break,
        }
    }
    Ok(Some(address))
}

fn swapped_bcd(byte: u8) -> Result<u32, DecodeError> {
    let (lo, hi) = (byte & 0x0F, byte >> 4);
    if lo > 9 || hi > 9 {
        return Err(DecodeError::InvalidTimestamp);
    }
    Ok(u32::from(lo) * 10 + u32::from(hi))
}

/// Service centre timestamp to UTC epoch milliseconds.
fn decode_timestamp(scts: &[u8]) -> Result<i64, DecodeError> {
    let year = swapped_bcd(scts[0])?;
    let year = if year >= 90 { 1900 + year } else { 2000 + year };
    let month = swapped_bcd(scts[1])?;
    let day = swapped_bcd(scts[2])?;
    let hour = swapped_bcd(scts[3])?;
    let minute = swapped_bcd(scts[4])?;
    let second = swapped_bcd(scts[5])?;

    // Bit 3 of the zone octet is the sign; the rest is swapped BCD quarters.
    let zone = scts[6];
    let quarters = i64::from(swapped_bcd(zone & !0x08)?);
    let offset_minutes = if zone & 0x08 != 0 {
        -quarters * 15
    } else {
        quarters * 15
    };

    let local = NaiveDate::from_ymd_opt(year as i32, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .ok_or(DecodeError::InvalidTimestamp)?;

    Ok(local.and_utc().timestamp_millis() - offset_minutes * 60_000)
}

fn decode_user_data(
    coding: DataCoding,
    udl: usize,
    has_header: bool,
    data: &[u8],
) -> Result<Option<String>, DecodeError> {
    let header_octets = if has_header {
        let udhl = *data.first().ok_or(DecodeError::Truncated("user data header"))?;
        usize::from(udhl) + 1
    } else {
        0
    };

    match coding {
        DataCoding::Gsm7 => {
            let septets = gsm7::unpack_septets(data, udl)?;
            // The header is padded up to a septet boundary.
            let skip = (header_octets * 8).div_ceil(7);
            let text = septets
                .get(skip..)
                .ok_or(DecodeError::Truncated("user data header"))?;
            Ok(Some(gsm7::decode_septets(text)))
        }
        DataCoding::Ucs2 => {
            let octets = data
                .get(..udl)
                .ok_or(DecodeError::Truncated("UCS-2 user data"))?;
            let payload = octets
                .get(header_octets..)
                .ok_or(DecodeError::Truncated("user data header"))?;
            if payload.len() % 2 != 0 {
                return Err(DecodeError::InvalidUcs2);
            }
            let units: Vec<u16> = payload
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16(&units)
                .map(Some)
                .map_err(|_| DecodeError::InvalidUcs2)
        }
        DataCoding::EightBit => {
            data.get(..udl)
                .ok_or(DecodeError::Truncated("8-bit user data"))?;
            Ok(None)
        }
    }
}
