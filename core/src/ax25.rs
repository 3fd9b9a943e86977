//! AX.25 UI frame data model
//!
//! ```text
//! | Dest (7) | Source (7) | Path (0-56) | Control (1) | PID (1) | Info (N) | FCS (2) |
//! ```
//!
//! Each address is six call sign characters shifted left one bit (space
//! padded) followed by an SSID octet:
//!
//! ```text
//! bit  | 7 | 6 | 5 | 4 | 3 | 2 | 1 | 0 |
//!      | C | 1 | 1 |     SSID      | X |
//! ```
//!
//! `C` is 1 on the destination and 0 on the source; on a digipeater it is the
//! has-been-repeated flag, sent as 0. `X` marks the last address field.

use crate::crc::crc16_x25;
use crate::error::{AprsError, Result};
use crate::{AX25_CONTROL_UI, AX25_PID_NO_LAYER3, CALLSIGN_LEN, MAX_PATH_ENTRIES, MAX_SSID};
use std::fmt;
use std::str::FromStr;

const SSID_RESERVED_BITS: u8 = 0x60;
const SSID_C_BIT: u8 = 0x80;
const SSID_END_BIT: u8 = 0x01;

/// Station address: call sign plus SSID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    callsign: String,
    ssid: u8,
}

impl Address {
    pub fn new(callsign: &str, ssid: u8) -> Result<Self> {
        if callsign.is_empty() {
            return Err(AprsError::EmptyCallsign);
        }
        if !callsign.chars().all(|c| c.is_ascii_graphic()) {
            return Err(AprsError::InvalidCallsignChar {
                callsign: callsign.to_string(),
            });
        }
        if callsign.len() > CALLSIGN_LEN {
            return Err(AprsError::CallsignTooLong {
                callsign: callsign.to_string(),
                len: callsign.len(),
            });
        }
        if ssid > MAX_SSID {
            return Err(AprsError::SsidOutOfRange(ssid as u32));
        }
        Ok(Self {
            callsign: callsign.to_string(),
            ssid,
        })
    }

    pub fn callsign(&self) -> &str {
        &self.callsign
    }

    pub fn ssid(&self) -> u8 {
        self.ssid
    }

    /// Seven address octets for this station in the given role
    pub fn encode(&self, role: AddressRole, last: bool) -> [u8; 7] {
        let mut octets = [b' ' << 1; 7];
        for (octet, byte) in octets.iter_mut().zip(self.callsign.bytes().take(CALLSIGN_LEN)) {
            *octet = byte << 1;
        }

        let mut ssid_octet = SSID_RESERVED_BITS | ((self.ssid & 0x0F) << 1);
        if role.c_bit() {
            ssid_octet |= SSID_C_BIT;
        }
        if last {
            ssid_octet |= SSID_END_BIT;
        }
        octets[6] = ssid_octet;
        octets
    }
}

impl FromStr for Address {
    type Err = AprsError;

    /// Parse `CALL` or `CALL-SSID`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.split_once('-') {
            Some((callsign, ssid)) => {
                // Check the call sign before the SSID, as the CLI reports it
                Address::new(callsign, 0)?;
                let ssid: u32 = ssid
                    .parse()
                    .map_err(|_| AprsError::InvalidSsid(ssid.to_string()))?;
                if ssid > MAX_SSID as u32 {
                    return Err(AprsError::SsidOutOfRange(ssid));
                }
                Address::new(callsign, ssid as u8)
            }
            None => Address::new(s, 0),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.callsign, self.ssid)
    }
}

/// Position of an address field in the frame, which decides its C bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressRole {
    Destination,
    Source,
    /// Not yet repeated
    Digipeater,
}

impl AddressRole {
    fn c_bit(self) -> bool {
        matches!(self, AddressRole::Destination)
    }
}

/// How the digipeater path becomes address fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathEncoding {
    /// One address field per path entry
    #[default]
    PerEntry,
    /// Legacy single field: path call signs joined with ',' and cut to six
    /// characters, SSID of the first entry. Always present, blank when the
    /// path is empty. Multi-hop paths do not survive this.
    Concatenated,
}

/// AX.25 UI frame carrying an APRS information field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub destination: Address,
    pub source: Address,
    pub path: Vec<Address>,
    pub info: Vec<u8>,
}

impl Frame {
    pub fn new(
        destination: Address,
        source: Address,
        path: Vec<Address>,
        info: impl Into<Vec<u8>>,
    ) -> Result<Self> {
        if path.len() > MAX_PATH_ENTRIES {
            return Err(AprsError::TooManyPathEntries(path.len()));
        }
        Ok(Self {
            destination,
            source,
            path,
            info: info.into(),
        })
    }

    /// Build a frame from command-line style arguments.
    ///
    /// `path` is a comma-separated list of `CALL[-SSID]` entries; empty
    /// entries are skipped, so an empty string means no digipeaters.
    pub fn parse(to: &str, from: &str, path: &str, info: impl Into<Vec<u8>>) -> Result<Self> {
        let destination: Address = to.parse()?;
        let source: Address = from.parse()?;
        let path = parse_path(path)?;
        Frame::new(destination, source, path, info)
    }

    /// Address fields in transmission order with their roles
    pub fn address_fields(&self, encoding: PathEncoding) -> Vec<(Address, AddressRole)> {
        let mut fields = vec![
            (self.destination.clone(), AddressRole::Destination),
            (self.source.clone(), AddressRole::Source),
        ];
        match encoding {
            PathEncoding::PerEntry => {
                fields.extend(
                    self.path
                        .iter()
                        .map(|digi| (digi.clone(), AddressRole::Digipeater)),
                );
            }
            PathEncoding::Concatenated => {
                fields.push((self.concatenated_path(), AddressRole::Digipeater));
            }
        }
        fields
    }

    /// Unstuffed byte image covered by the FCS: addresses, control, PID, info
    pub fn to_bytes(&self, encoding: PathEncoding) -> Vec<u8> {
        let fields = self.address_fields(encoding);
        let mut bytes = Vec::with_capacity(fields.len() * 7 + 2 + self.info.len());
        let last = fields.len() - 1;
        for (i, (address, role)) in fields.iter().enumerate() {
            bytes.extend_from_slice(&address.encode(*role, i == last));
        }
        bytes.push(AX25_CONTROL_UI);
        bytes.push(AX25_PID_NO_LAYER3);
        bytes.extend_from_slice(&self.info);
        bytes
    }

    /// Frame check sequence as transmitted (low byte first)
    pub fn fcs(&self, encoding: PathEncoding) -> u16 {
        crc16_x25(&self.to_bytes(encoding))
    }

    fn concatenated_path(&self) -> Address {
        let joined = self
            .path
            .iter()
            .map(|digi| digi.callsign())
            .collect::<Vec<_>>()
            .join(",");
        Address {
            callsign: joined.chars().take(CALLSIGN_LEN).collect(),
            ssid: self.path.first().map_or(0, |digi| digi.ssid()),
        }
    }
}

/// Parse a comma-separated digipeater list
pub fn parse_path(path: &str) -> Result<Vec<Address>> {
    let entries: Vec<&str> = path
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect();
    if entries.len() > MAX_PATH_ENTRIES {
        return Err(AprsError::TooManyPathEntries(entries.len()));
    }
    entries.into_iter().map(str::parse).collect()
}
