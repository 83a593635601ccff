//! Structure kinds and the dimensions they generate in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// World dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// The overworld
    Overworld,
    /// The nether
    Nether,
    /// The end
    End,
}

/// A named structure the search can look for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum StructureKind {
    /// Village
    Village = 0,
    /// Desert pyramid
    DesertPyramid = 1,
    /// Jungle pyramid
    JunglePyramid = 2,
    /// Swamp hut
    SwampHut = 3,
    /// Igloo
    Igloo = 4,
    /// Ocean monument
    Monument = 5,
    /// Woodland mansion
    Mansion = 6,
    /// Pillager outpost
    Outpost = 7,
    /// Ancient city
    AncientCity = 8,
    /// Overworld ruined portal
    RuinedPortal = 9,
    /// Shipwreck
    Shipwreck = 10,
    /// Bastion remnant
    Bastion = 11,
    /// Nether fortress
    Fortress = 12,
    /// Nether ruined portal
    NetherRuinedPortal = 13,
    /// End city
    EndCity = 14,
}

impl StructureKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 15] = [
        Self::Village,
        Self::DesertPyramid,
        Self::JunglePyramid,
        Self::SwampHut,
        Self::Igloo,
        Self::Monument,
        Self::Mansion,
        Self::Outpost,
        Self::AncientCity,
        Self::RuinedPortal,
        Self::Shipwreck,
        Self::Bastion,
        Self::Fortress,
        Self::NetherRuinedPortal,
        Self::EndCity,
    ];

    /// Human-readable name, as written into status lines and reports.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Village => "Village",
            Self::DesertPyramid => "Desert Pyramid",
            Self::JunglePyramid => "Jungle Pyramid",
            Self::SwampHut => "Swamp Hut",
            Self::Igloo => "Igloo",
            Self::Monument => "Monument",
            Self::Mansion => "Mansion",
            Self::Outpost => "Outpost",
            Self::AncientCity => "Ancient City",
            Self::RuinedPortal => "Ruined Portal",
            Self::Shipwreck => "Shipwreck",
            Self::Bastion => "Bastion",
            Self::Fortress => "Fortress",
            Self::NetherRuinedPortal => "Nether Ruined Portal",
            Self::EndCity => "End City",
        }
    }

    /// Dimension this structure generates in.
    #[must_use]
    pub const fn dimension(self) -> Dimension {
        match self {
            Self::Bastion | Self::Fortress | Self::NetherRuinedPortal => Dimension::Nether,
            Self::EndCity => Dimension::End,
            _ => Dimension::Overworld,
        }
    }

    /// Structures whose placement does not depend on surface terrain.
    ///
    /// Ancient cities generate deep underground and monuments sit on the
    /// ocean floor, so the terrain viability query is skipped for them.
    #[must_use]
    pub const fn skips_terrain_check(self) -> bool {
        matches!(self, Self::AncientCity | Self::Monument)
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Returned when a structure name is not recognised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown structure kind: {0:?}")]
pub struct ParseKindError(pub String);

impl FromStr for StructureKind {
    type Err = ParseKindError;

    /// Accepts display names and snake_case names, ignoring case,
    /// spaces, dashes and underscores (`"desert pyramid"`, `"Desert-Pyramid"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|kind| normalize(kind.display_name()) == wanted)
            .ok_or_else(|| ParseKindError(s.to_string()))
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_names() {
        for kind in StructureKind::ALL {
            assert_eq!(kind.display_name().parse::<StructureKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_parse_loose_spellings() {
        assert_eq!("ancient_city".parse(), Ok(StructureKind::AncientCity));
        assert_eq!("Desert-Pyramid".parse(), Ok(StructureKind::DesertPyramid));
        assert_eq!("SWAMP HUT".parse(), Ok(StructureKind::SwampHut));
        assert!("stronghold".parse::<StructureKind>().is_err());
    }

    #[test]
    fn test_dimensions() {
        assert_eq!(StructureKind::Village.dimension(), Dimension::Overworld);
        assert_eq!(StructureKind::Fortress.dimension(), Dimension::Nether);
        assert_eq!(StructureKind::EndCity.dimension(), Dimension::End);
    }

    #[test]
    fn test_terrain_exempt_set() {
        let exempt: Vec<_> = StructureKind::ALL
            .into_iter()
            .filter(|k| k.skips_terrain_check())
            .collect();
        assert_eq!(exempt, vec![StructureKind::Monument, StructureKind::AncientCity]);
    }
}
