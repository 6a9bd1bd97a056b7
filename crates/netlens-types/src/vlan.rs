//! 802.1Q VLAN identifiers.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// A usable VLAN id.
///
/// Collectors report pvid 0 for ports without an access VLAN, so 0 is a
/// legitimate column value but never a valid filter or membership id.
///
/// ```
/// use netlens_types::VlanId;
///
/// assert_eq!("Vlan100".parse::<VlanId>().unwrap().as_u16(), 100);
/// assert!(VlanId::new(0).is_err());
/// assert!(VlanId::new(4095).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct VlanId(u16);

impl VlanId {
    /// Ids that may be configured on a port.
    pub const RANGE: RangeInclusive<u16> = 1..=4094;

    pub fn new(id: u16) -> Result<Self, ParseError> {
        if Self::RANGE.contains(&id) {
            Ok(VlanId(id))
        } else {
            Err(ParseError::InvalidVlanId(id.to_string()))
        }
    }

    pub const fn as_u16(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Accepts `100` as well as VLAN interface names such as `Vlan100`.
impl FromStr for VlanId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let digits = text
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit())
            .filter(|(idx, _)| text[..*idx].eq_ignore_ascii_case("vlan") || *idx == 0)
            .map(|(idx, _)| &text[idx..])
            .ok_or_else(|| ParseError::InvalidVlanId(s.to_string()))?;

        digits
            .parse::<u16>()
            .map_err(|_| ParseError::InvalidVlanId(s.to_string()))
            .and_then(VlanId::new)
    }
}

impl TryFrom<u16> for VlanId {
    type Error = ParseError;

    fn try_from(id: u16) -> Result<Self, Self::Error> {
        VlanId::new(id)
    }
}

impl From<VlanId> for u16 {
    fn from(vlan: VlanId) -> u16 {
        vlan.0
    }
}
