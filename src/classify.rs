//! Static economic-development classification of countries.
//!
//! The two membership lists are analyst-assigned constants; a code outside
//! both lists has no tier and its rows fall out of tier-level aggregation.

use crate::models::Tier;
use ahash::AHashMap;
use once_cell::sync::Lazy;

/// ISO2 codes classified as developed economies.
pub const DEVELOPED: [&str; 18] = [
    "BE", "CA", "DK", "FI", "FR", "DE", "HK", "IS", "IE", "IT", "JP", "KR", "MT", "NL", "PT",
    "SI", "ES", "CH",
];

/// ISO2 codes classified as emerging economies.
pub const EMERGING: [&str; 18] = [
    "BR", "CO", "CR", "HR", "CY", "CZ", "EE", "GR", "HU", "KZ", "LV", "LT", "MY", "PE", "PH",
    "SK", "TN", "TR",
];

static TIER_BY_ISO2: Lazy<AHashMap<&'static str, Tier>> = Lazy::new(|| {
    let mut map = AHashMap::with_capacity(DEVELOPED.len() + EMERGING.len());
    for code in DEVELOPED {
        map.insert(code, Tier::Developed);
    }
    for code in EMERGING {
        map.insert(code, Tier::Emerging);
    }
    map
});

/// Look up the development tier for an ISO2 code.
pub fn tier_of(iso2: &str) -> Option<Tier> {
    TIER_BY_ISO2.get(iso2).copied()
}

/// The literal membership list backing a tier, in classification order.
pub fn members(tier: Tier) -> &'static [&'static str] {
    match tier {
        Tier::Developed => &DEVELOPED,
        Tier::Emerging => &EMERGING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_are_disjoint() {
        for code in DEVELOPED {
            assert!(!EMERGING.contains(&code), "{code} in both tiers");
        }
    }
}
