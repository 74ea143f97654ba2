use core::ops::{BitAnd, BitOr};

use serde::Deserialize;

/// Bit set of player orders that can be attached to a voxel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DesignationType(u32);

impl DesignationType {
    pub const NONE: DesignationType = DesignationType(0);
    pub const DIG: DesignationType = DesignationType(1 << 0);
    pub const PUT: DesignationType = DesignationType(1 << 1);
    pub const CHOP: DesignationType = DesignationType(1 << 2);
    pub const GUARD: DesignationType = DesignationType(1 << 3);
    pub const ATTACK: DesignationType = DesignationType(1 << 4);
    pub const GATHER: DesignationType = DesignationType(1 << 5);
    pub const PLANT: DesignationType = DesignationType(1 << 6);
    pub const EXPLORE: DesignationType = DesignationType(1 << 7);
    pub const ALL: DesignationType = DesignationType(0xFF);

    const NAMED: [(&'static str, DesignationType); 8] = [
        ("dig", DesignationType::DIG),
        ("put", DesignationType::PUT),
        ("chop", DesignationType::CHOP),
        ("guard", DesignationType::GUARD),
        ("attack", DesignationType::ATTACK),
        ("gather", DesignationType::GATHER),
        ("plant", DesignationType::PLANT),
        ("explore", DesignationType::EXPLORE),
    ];

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        DesignationType(bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True when every bit of `other` is set in `self`.
    #[inline]
    pub const fn contains(self, other: DesignationType) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn from_name(name: &str) -> Option<DesignationType> {
        Self::NAMED
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, t)| *t)
    }

    /// Parses a list of names into a combined mask; `"all"` selects every type.
    pub fn mask_from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<DesignationType> {
        let mut m = DesignationType::NONE;
        for n in names {
            if n.eq_ignore_ascii_case("all") {
                m = m | DesignationType::ALL;
            } else {
                m = m | Self::from_name(n)?;
            }
        }
        Some(m)
    }
}

impl BitOr for DesignationType {
    type Output = DesignationType;
    fn bitor(self, rhs: Self) -> Self {
        DesignationType(self.0 | rhs.0)
    }
}

impl BitAnd for DesignationType {
    type Output = DesignationType;
    fn bitand(self, rhs: Self) -> Self {
        DesignationType(self.0 & rhs.0)
    }
}

/// How a designation overlay is drawn on its voxel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawBoxType {
    #[default]
    FullBox,
    TopBox,
    PreviewVoxel,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DesignationProperties {
    pub color: [u8; 4],
    pub draw: DrawBoxType,
}

impl Default for DesignationProperties {
    fn default() -> Self {
        Self {
            color: [255, 255, 255, 128],
            draw: DrawBoxType::FullBox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_map_to_distinct_bits() {
        let all = DesignationType::mask_from_names(["dig", "PUT", "chop", "guard", "attack", "gather", "plant", "explore"]);
        assert_eq!(all, Some(DesignationType::ALL));
        assert_eq!(DesignationType::mask_from_names(["all"]), Some(DesignationType::ALL));
        assert_eq!(DesignationType::mask_from_names(["dig", "bogus"]), None);
    }

    #[test]
    fn contains_is_subset_test() {
        let m = DesignationType::DIG | DesignationType::PUT;
        assert!(m.contains(DesignationType::DIG));
        assert!(!m.contains(DesignationType::CHOP));
        assert!(m.contains(DesignationType::NONE));
    }
}
