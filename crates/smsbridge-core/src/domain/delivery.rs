use crate::error::DecodeError;

/// Encoding family of the units in a delivery batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PduFormat {
    /// GSM/UMTS/LTE (3GPP TS 23.040)
    Gsm,
    /// CDMA (3GPP2 C.S0015)
    Cdma,
}

impl PduFormat {
    /// Resolve the batch format tag. An absent tag is the legacy
    /// single-format path and means 3GPP.
    pub fn from_tag(tag: Option<&str>) -> Result<Self, DecodeError> {
        match tag {
            None | Some("3gpp") => Ok(Self::Gsm),
            Some("3gpp2") => Ok(Self::Cdma),
            Some(other) => Err(DecodeError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gsm => "3gpp",
            Self::Cdma => "3gpp2",
        }
    }
}

/// One platform delivery: encoded units in arrival order plus one shared
/// format tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDeliveryBatch {
    pub units: Vec<Vec<u8>>,
    pub format: Option<String>,
}

impl RawDeliveryBatch {
    pub fn new(units: Vec<Vec<u8>>, format: Option<String>) -> Self {
        Self { units, format }
    }

    /// Build a batch from hex-encoded units, as some transports log them.
    pub fn from_hex_units<I, S>(units: I, format: Option<&str>) -> Result<Self, DecodeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let units = units
            .into_iter()
            .map(|u| hex::decode(u.as_ref()).map_err(|e| DecodeError::InvalidHex(e.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(units, format.map(str::to_string)))
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// A raw event from the transport. Only the SMS-received action carries a
/// batch we care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportEvent {
    pub action: String,
    pub batch: Option<RawDeliveryBatch>,
}

impl TransportEvent {
    pub fn new(action: impl Into<String>, batch: Option<RawDeliveryBatch>) -> Self {
        Self {
            action: action.into(),
            batch,
        }
    }

    /// An inbound SMS delivery.
    pub fn sms_received(batch: RawDeliveryBatch) -> Self {
        Self::new(crate::branding::SMS_RECEIVED_ACTION, Some(batch))
    }
}
