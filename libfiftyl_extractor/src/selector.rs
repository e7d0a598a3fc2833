//! Channel selection.
//!
//! A [Selector] names which logical channels a caller wants out of a record. Every
//! selector resolves to a mask: an ordered list of logical positions, which is used to
//! pick columns out of the assembled record. Order and duplicates in the mask are kept,
//! so `[5, 5, 10]` yields three columns.
use std::convert::Infallible;
use std::fmt::Display;
use std::str::FromStr;

use super::constants::NUMBER_OF_CHANNELS;
use super::error::SelectorError;
use super::plane::logical_range_for;

/// Collections of at most this many names are read as a group of planes
const MAX_PLANE_GROUP: usize = 3;

/// One element of a [Selector::Collection]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorItem {
    Index(i64),
    PlaneName(String),
}

impl From<i64> for SelectorItem {
    fn from(value: i64) -> Self {
        Self::Index(value)
    }
}

impl From<&str> for SelectorItem {
    fn from(value: &str) -> Self {
        Self::PlaneName(value.to_string())
    }
}

impl Display for SelectorItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::PlaneName(n) => write!(f, "{n}"),
        }
    }
}

impl SelectorItem {
    fn is_plane_name(&self) -> bool {
        matches!(self, Self::PlaneName(_))
    }

    /// Coerce to a channel index. Numeric text is accepted.
    fn as_index(&self) -> Result<i64, SelectorError> {
        match self {
            Self::Index(i) => Ok(*i),
            Self::PlaneName(n) => n
                .trim()
                .parse()
                .map_err(|_| SelectorError::NotAnInteger(n.clone())),
        }
    }
}

/// Selector describes the channels to extract from a record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selector {
    /// Every channel, in logical order
    #[default]
    Absent,
    /// A single logical position; negative values count back from the last channel
    Index(i64),
    /// A plane by name or alias (see [crate::plane::Plane])
    PlaneName(String),
    /// Either a group of up to three plane names, or a list of channel indices
    Collection(Vec<SelectorItem>),
}

impl From<i64> for Selector {
    fn from(value: i64) -> Self {
        Self::Index(value)
    }
}

impl From<&str> for Selector {
    fn from(value: &str) -> Self {
        Self::PlaneName(value.to_string())
    }
}

impl<T: Into<SelectorItem>> FromIterator<T> for Selector {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::Collection(iter.into_iter().map(Into::into).collect())
    }
}

impl FromStr for Selector {
    type Err = Infallible;
    /// Parse a selector as written on the command line or in a config.
    ///
    /// An empty string or `all` selects everything, a comma separated list makes a collection, and
    /// anything else is an index if it parses as one and a plane name otherwise.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(Self::Absent);
        }
        if s.contains(',') {
            return Ok(Self::Collection(
                s.split(',')
                    .map(str::trim)
                    .filter(|token| !token.is_empty())
                    .map(|token| match token.parse::<i64>() {
                        Ok(i) => SelectorItem::Index(i),
                        Err(_) => SelectorItem::PlaneName(token.to_string()),
                    })
                    .collect(),
            ));
        }
        match s.parse::<i64>() {
            Ok(i) => Ok(Self::Index(i)),
            Err(_) => Ok(Self::PlaneName(s.to_string())),
        }
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absent => write!(f, "all"),
            Self::Index(i) => write!(f, "{i}"),
            Self::PlaneName(n) => write!(f, "{n}"),
            Self::Collection(items) => {
                let items: Vec<String> = items.iter().map(|i| i.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}

impl Selector {
    /// Resolve the selector into a mask of logical positions
    pub fn resolve(&self) -> Result<Vec<usize>, SelectorError> {
        match self {
            Self::Absent => Ok((0..NUMBER_OF_CHANNELS).collect()),
            Self::Index(i) => Ok(vec![resolve_index(*i)?]),
            Self::PlaneName(name) => resolve_plane(name),
            Self::Collection(items) => resolve_collection(items),
        }
    }
}

fn resolve_index(index: i64) -> Result<usize, SelectorError> {
    let n_channels = NUMBER_OF_CHANNELS as i64;
    if (0..n_channels).contains(&index) {
        Ok(index as usize)
    } else if (-n_channels..0).contains(&index) {
        Ok((n_channels + index) as usize)
    } else {
        Err(SelectorError::ChannelOutOfRange(index))
    }
}

fn resolve_plane(name: &str) -> Result<Vec<usize>, SelectorError> {
    Ok(logical_range_for(name)?.collect())
}

fn resolve_collection(items: &[SelectorItem]) -> Result<Vec<usize>, SelectorError> {
    if items.is_empty() {
        return Err(SelectorError::EmptyCollection);
    }

    // A short all-text collection is a group of planes, e.g. ("collection", "i2").
    // This wins over reading the names as numeric indices.
    if items.len() <= MAX_PLANE_GROUP && items.iter().all(SelectorItem::is_plane_name) {
        let mut mask = Vec::with_capacity(NUMBER_OF_CHANNELS);
        for item in items {
            if let SelectorItem::PlaneName(name) = item {
                mask.extend(resolve_plane(name)?);
            }
        }
        return Ok(mask);
    }

    items
        .iter()
        .map(|item| resolve_index(item.as_index()?))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlaneError;

    #[test]
    fn test_absent_selects_everything() {
        let mask = Selector::Absent.resolve().unwrap();
        assert_eq!(mask, (0..128).collect::<Vec<usize>>());
    }

    #[test]
    fn test_single_index() {
        assert_eq!(Selector::from(5).resolve(), Ok(vec![5]));
        assert_eq!(Selector::from(-1).resolve(), Ok(vec![127]));
        assert_eq!(
            Selector::from(128).resolve(),
            Err(SelectorError::ChannelOutOfRange(128))
        );
        assert_eq!(
            Selector::from(-129).resolve(),
            Err(SelectorError::ChannelOutOfRange(-129))
        );
    }

    #[test]
    fn test_plane_name() {
        assert_eq!(
            Selector::from("collection").resolve(),
            Ok((0..48).collect::<Vec<usize>>())
        );
        assert_eq!(
            Selector::from("nope").resolve(),
            Err(SelectorError::PlaneError(PlaneError::InvalidName(
                String::from("nope")
            )))
        );
    }

    #[test]
    fn test_plane_group_is_concatenated_in_order() {
        let selector: Selector = ["collection", "i2"].into_iter().collect();
        let expected: Vec<usize> = (0..48).chain(88..128).collect();
        assert_eq!(selector.resolve(), Ok(expected));

        let selector: Selector = ["i2", "c"].into_iter().collect();
        let expected: Vec<usize> = (88..128).chain(0..48).collect();
        assert_eq!(selector.resolve(), Ok(expected));
    }

    #[test]
    fn test_short_numeric_text_is_planes() {
        // ("1", "2") names the two induction planes, not channels 1 and 2
        let selector: Selector = ["1", "2"].into_iter().collect();
        assert_eq!(selector.resolve(), Ok((48..128).collect::<Vec<usize>>()));
    }

    #[test]
    fn test_long_numeric_text_is_indices() {
        let selector: Selector = ["1", "2", "3", "4"].into_iter().collect();
        assert_eq!(selector.resolve(), Ok(vec![1, 2, 3, 4]));
    }

    #[test]
    fn test_index_collection_keeps_duplicates() {
        let selector: Selector = [5_i64, 5, 10].into_iter().collect();
        assert_eq!(selector.resolve(), Ok(vec![5, 5, 10]));
    }

    #[test]
    fn test_mixed_collection_is_type_error() {
        let selector = Selector::Collection(vec![
            SelectorItem::from("collection"),
            SelectorItem::from(5),
        ]);
        assert_eq!(
            selector.resolve(),
            Err(SelectorError::NotAnInteger(String::from("collection")))
        );
    }

    #[test]
    fn test_empty_collection() {
        assert_eq!(
            Selector::Collection(vec![]).resolve(),
            Err(SelectorError::EmptyCollection)
        );
    }

    #[test]
    fn test_parse_selector() {
        assert_eq!("".parse::<Selector>(), Ok(Selector::Absent));
        assert_eq!("ALL".parse::<Selector>(), Ok(Selector::Absent));
        assert_eq!("12".parse::<Selector>(), Ok(Selector::Index(12)));
        assert_eq!(
            "induction 1".parse::<Selector>(),
            Ok(Selector::PlaneName(String::from("induction 1")))
        );
        assert_eq!(
            "collection, i2".parse::<Selector>(),
            Ok(Selector::Collection(vec![
                SelectorItem::from("collection"),
                SelectorItem::from("i2"),
            ]))
        );
        assert_eq!(
            "5,5,10".parse::<Selector>(),
            Ok([5_i64, 5, 10].into_iter().collect::<Selector>())
        );
    }
}
