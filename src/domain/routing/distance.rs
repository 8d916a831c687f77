use serde::{Serialize, Serializer};
use std::fmt;

/// Result of a shortest-cost query.
///
/// Unreachability is a value, not an error. `Unreachable` orders after every finite
/// cost, so comparisons like "did the cost go up" work across both cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Distance {
    Finite(u64),
    Unreachable,
}

impl Distance {
    pub(crate) fn from_raw(raw: u64) -> Self {
        if raw == u64::MAX { Distance::Unreachable } else { Distance::Finite(raw) }
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self, Distance::Finite(_))
    }

    pub fn finite(&self) -> Option<u64> {
        match self {
            Distance::Finite(cost) => Some(*cost),
            Distance::Unreachable => None,
        }
    }
}

impl From<Option<u64>> for Distance {
    fn from(cost: Option<u64>) -> Self {
        cost.map_or(Distance::Unreachable, Distance::Finite)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Finite(cost) => write!(f, "{}", cost),
            Distance::Unreachable => write!(f, "unreachable"),
        }
    }
}

/// Finite costs serialize as numbers, unreachable as `null`.
impl Serialize for Distance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Distance::Finite(cost) => serializer.serialize_u64(*cost),
            Distance::Unreachable => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_sorts_last() {
        assert!(Distance::Finite(u64::MAX - 1) < Distance::Unreachable);
        assert!(Distance::Finite(3) < Distance::Finite(4));
        assert_eq!(Distance::from_raw(u64::MAX), Distance::Unreachable);
    }

    #[test]
    fn test_serialization() {
        assert_eq!(serde_json::to_string(&Distance::Finite(12)).unwrap(), "12");
        assert_eq!(serde_json::to_string(&Distance::Unreachable).unwrap(), "null");
    }
}
