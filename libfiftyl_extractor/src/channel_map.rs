// The readout links do not arrive in detector order. Each link carries 64 channels,
// and the pair (link, link channel) gives a physical channel number
// link * 64 + link channel. The detector wants its channels in logical order
// (collection wires first, then the two induction planes), so we map
// logical position -> physical channel
// and keep the inverse around for the assembly step, which goes the other way.
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::constants::{CHANNELS_PER_LINK, NUMBER_OF_CHANNELS, NUMBER_OF_LINKS};
use super::error::ChannelMapError;
use super::hardware_id::physical_channel;

const ENTRIES_PER_LINE: usize = 3; // logical, link, link channel

/// The physical channel held by each logical position of the 50L readout
#[rustfmt::skip]
pub const PHYSICAL_MAP: [usize; NUMBER_OF_CHANNELS] = [
    112, 113, 115, 116, 118, 119, 120, 121, 123, 124, 126, 127,
    64, 65, 67, 68, 70, 71, 72, 73, 75, 76, 78, 79,
    48, 49, 51, 52, 54, 55, 56, 57, 59, 60, 62, 63,
    0, 1, 3, 4, 6, 7, 8, 9, 11, 12, 14, 15,
    50, 53, 58, 61, 2, 5, 10, 13, 16, 17, 18, 19,
    20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31,
    32, 33, 34, 35, 36, 37, 38, 39, 40, 41, 42, 43,
    44, 45, 46, 47, 80, 81, 82, 83, 84, 85, 86, 87,
    88, 89, 90, 91, 92, 93, 94, 95, 96, 97, 98, 99,
    100, 101, 102, 103, 104, 105, 106, 107, 108, 109, 110, 111,
    114, 117, 122, 125, 66, 69, 74, 77,
];

/// The logical position of each physical channel; the inverse of [PHYSICAL_MAP]
pub const LOGICAL_MAP: [usize; NUMBER_OF_CHANNELS] = invert(&PHYSICAL_MAP);

const _: () = assert!(is_permutation(&PHYSICAL_MAP));

const fn is_permutation(map: &[usize; NUMBER_OF_CHANNELS]) -> bool {
    let mut seen = [false; NUMBER_OF_CHANNELS];
    let mut idx = 0;
    while idx < NUMBER_OF_CHANNELS {
        if map[idx] >= NUMBER_OF_CHANNELS || seen[map[idx]] {
            return false;
        }
        seen[map[idx]] = true;
        idx += 1;
    }
    true
}

const fn invert(map: &[usize; NUMBER_OF_CHANNELS]) -> [usize; NUMBER_OF_CHANNELS] {
    let mut inverse = [0; NUMBER_OF_CHANNELS];
    let mut idx = 0;
    while idx < NUMBER_OF_CHANNELS {
        inverse[map[idx]] = idx;
        idx += 1;
    }
    inverse
}

/// ChannelMap translates between logical positions and physical (link) channels.
///
/// The default is the 50L map compiled into the library. A different map can be given as a CSV file
/// where each row contains 3 elements: logical position, link, and link channel. The first row is a header
/// and is skipped. A map read from file must assign every logical position and every physical channel exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMap {
    physical: [usize; NUMBER_OF_CHANNELS],
    logical: [usize; NUMBER_OF_CHANNELS],
}

impl Default for ChannelMap {
    fn default() -> Self {
        Self {
            physical: PHYSICAL_MAP,
            logical: LOGICAL_MAP,
        }
    }
}

impl ChannelMap {
    /// Create a new ChannelMap
    /// If the path is None, we use the default that is bundled with the library
    pub fn new(path: Option<&Path>) -> Result<Self, ChannelMapError> {
        match path {
            Some(p) => {
                let mut contents = String::new();
                let mut file = File::open(p)?;
                file.read_to_string(&mut contents)?;
                Self::from_csv(&contents)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse a map from CSV text
    pub fn from_csv(contents: &str) -> Result<Self, ChannelMapError> {
        let mut physical: [Option<usize>; NUMBER_OF_CHANNELS] = [None; NUMBER_OF_CHANNELS];
        let mut logical: [usize; NUMBER_OF_CHANNELS] = [0; NUMBER_OF_CHANNELS];
        let mut used = [false; NUMBER_OF_CHANNELS];

        let mut lines = contents.lines();
        lines.next(); // Skip the header
        for line in lines.filter(|l| !l.trim().is_empty()) {
            let entries: Vec<&str> = line.split_terminator(',').map(str::trim).collect();
            if entries.len() != ENTRIES_PER_LINE {
                return Err(ChannelMapError::BadFileFormat);
            }

            let position: usize = entries[0].parse()?;
            let link: usize = entries[1].parse()?;
            let link_channel: usize = entries[2].parse()?;
            if link >= NUMBER_OF_LINKS {
                return Err(ChannelMapError::LinkOutOfRange(link));
            } else if link_channel >= CHANNELS_PER_LINK {
                return Err(ChannelMapError::LinkChannelOutOfRange(link_channel));
            }
            let channel = physical_channel(link, link_channel);
            if position >= NUMBER_OF_CHANNELS {
                return Err(ChannelMapError::ChannelOutOfRange(position));
            } else if channel >= NUMBER_OF_CHANNELS {
                return Err(ChannelMapError::ChannelOutOfRange(channel));
            } else if physical[position].is_some() {
                return Err(ChannelMapError::DuplicateLogical(position));
            } else if used[channel] {
                return Err(ChannelMapError::DuplicatePhysical(channel));
            }

            physical[position] = Some(channel);
            logical[channel] = position;
            used[channel] = true;
        }

        let mut map = Self::default();
        for (position, channel) in physical.iter().enumerate() {
            match channel {
                Some(c) => map.physical[position] = *c,
                None => return Err(ChannelMapError::MissingLogical(position)),
            }
        }
        map.logical = logical;
        Ok(map)
    }

    /// Get the physical channel recorded at a logical position.
    ///
    /// Returns None if the position is outside the detector
    pub fn physical_for(&self, logical_position: usize) -> Option<usize> {
        self.physical.get(logical_position).copied()
    }

    /// Get the logical position a physical channel is written to.
    ///
    /// Returns None if the physical channel does not exist in the map
    pub fn logical_position_for(&self, physical_channel: usize) -> Option<usize> {
        self.logical.get(physical_channel).copied()
    }
}
