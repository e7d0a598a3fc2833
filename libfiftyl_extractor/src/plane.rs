use std::ops::Range;
use std::str::FromStr;

use super::error::PlaneError;

/// The wire planes of the detector, in logical channel order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plane {
    Collection,
    Induction1,
    Induction2,
}

impl FromStr for Plane {
    type Err = PlaneError;
    /// Names are case-insensitive and must match a plane or one of its aliases exactly
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "collection" | "collect" | "c" => Ok(Self::Collection),
            "induction1" | "induction 1" | "i1" | "1" => Ok(Self::Induction1),
            "induction2" | "induction 2" | "i2" | "2" => Ok(Self::Induction2),
            _ => Err(PlaneError::InvalidName(s.to_string())),
        }
    }
}

impl Plane {
    /// The logical channel positions read out by this plane
    pub fn logical_range(&self) -> Range<usize> {
        match self {
            Self::Collection => 0..48,
            Self::Induction1 => 48..88,
            Self::Induction2 => 88..128,
        }
    }
}

/// Resolve a plane name straight to its logical positions
pub fn logical_range_for(plane_name: &str) -> Result<Range<usize>, PlaneError> {
    Ok(Plane::from_str(plane_name)?.logical_range())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_aliases() {
        for name in ["collection", "Collect", "C"] {
            assert_eq!(name.parse::<Plane>(), Ok(Plane::Collection));
        }
        for name in ["induction1", "Induction 1", "I1", "1"] {
            assert_eq!(name.parse::<Plane>(), Ok(Plane::Induction1));
        }
        for name in ["INDUCTION2", "induction 2", "i2", "2"] {
            assert_eq!(name.parse::<Plane>(), Ok(Plane::Induction2));
        }
    }

    #[test]
    fn test_unknown_plane() {
        assert_eq!(
            logical_range_for("induction3"),
            Err(PlaneError::InvalidName(String::from("induction3")))
        );
        assert!(logical_range_for(" collection").is_err());
        assert!(logical_range_for("").is_err());
    }

    #[test]
    fn test_planes_cover_detector() {
        assert_eq!(logical_range_for("c"), Ok(0..48));
        assert_eq!(logical_range_for("i1"), Ok(48..88));
        assert_eq!(logical_range_for("i2"), Ok(88..128));
    }
}
