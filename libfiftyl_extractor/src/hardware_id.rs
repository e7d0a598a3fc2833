// A trigger record is addressed by (trigger number, sequence number), and every
// record is built from one fragment per hardware link. The link a fragment came
// from is packed into the upper 16 bits of its 64-bit geographic ID.
use std::fmt::Display;
use std::str::FromStr;

use super::constants::{
    CHANNELS_PER_LINK, GEO_ID_LINK_MASK, GEO_ID_LINK_SHIFT, RECORD_GROUP_PREFIX,
};

/// RecordId identifies one trigger record within a capture file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId {
    pub number: u64,
    pub sequence: u32,
}

impl RecordId {
    pub fn new(number: u64, sequence: u32) -> Self {
        Self { number, sequence }
    }

    /// Parse a record from its capture file group name (`TriggerRecord00012.0000`).
    ///
    /// Returns None if the name is not a record group.
    pub fn from_group_name(name: &str) -> Option<Self> {
        let (number, sequence) = name.strip_prefix(RECORD_GROUP_PREFIX)?.split_once('.')?;
        Some(Self {
            number: number.parse().ok()?,
            sequence: sequence.parse().ok()?,
        })
    }

    pub fn group_name(&self) -> String {
        format!(
            "{RECORD_GROUP_PREFIX}{:0>5}.{:0>4}",
            self.number, self.sequence
        )
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.number, self.sequence)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;
    /// Accepts either `number` (sequence 0) or `number.sequence`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('.') {
            Some((number, sequence)) => Ok(Self::new(number.parse()?, sequence.parse()?)),
            None => Ok(Self::new(s.trim().parse()?, 0)),
        }
    }
}

/// GeoId is the geographic identifier of a single hardware fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeoId(pub u64);

impl GeoId {
    /// Build a GeoId for a link, leaving the remaining fields zeroed
    pub fn from_link(link: usize) -> Self {
        Self(((link as u64) & GEO_ID_LINK_MASK) << GEO_ID_LINK_SHIFT)
    }

    /// The hardware link index, `(id >> 48) & 0xffff`
    pub fn link(&self) -> usize {
        ((self.0 >> GEO_ID_LINK_SHIFT) & GEO_ID_LINK_MASK) as usize
    }
}

impl Display for GeoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Physical channel number of a channel on a given link
pub fn physical_channel(link: usize, link_channel: usize) -> usize {
    link * CHANNELS_PER_LINK + link_channel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_from_geo_id() {
        let gid = GeoId(0x0001_0000_0000_00a3);
        assert_eq!(gid.link(), 1);
        assert_eq!(GeoId(0x00a3).link(), 0);
        assert_eq!(GeoId::from_link(1), GeoId(1 << 48));
        assert_eq!(GeoId::from_link(7).link(), 7);
    }

    #[test]
    fn test_record_group_name() {
        let record = RecordId::new(12, 3);
        assert_eq!(record.group_name(), "TriggerRecord00012.0003");
        assert_eq!(RecordId::from_group_name(&record.group_name()), Some(record));
        assert_eq!(RecordId::from_group_name("RawData"), None);
        assert_eq!(RecordId::from_group_name("TriggerRecordxx.0000"), None);
    }

    #[test]
    fn test_record_from_str() {
        assert_eq!("7".parse::<RecordId>(), Ok(RecordId::new(7, 0)));
        assert_eq!("7.2".parse::<RecordId>(), Ok(RecordId::new(7, 2)));
        assert!("seven".parse::<RecordId>().is_err());
    }

    #[test]
    fn test_physical_channel() {
        assert_eq!(physical_channel(0, 5), 5);
        assert_eq!(physical_channel(1, 5), 69);
    }
}
