//! The ten rarity tiers an icon slot can belong to.

#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Ord, PartialOrd)]
pub enum Tier {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    UltraEpic,
    Legendary,
    Mythic,
    Celestial,
    Cosmic,
    Divine,
}

impl Tier {
    pub const ALL: [Tier; 10] = [
        Tier::Common,
        Tier::Uncommon,
        Tier::Rare,
        Tier::Epic,
        Tier::UltraEpic,
        Tier::Legendary,
        Tier::Mythic,
        Tier::Celestial,
        Tier::Cosmic,
        Tier::Divine,
    ];

    pub fn from_number(number: u8) -> Option<Tier> {
        match number {
            1..=10 => Some(Self::ALL[usize::from(number - 1)]),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Tier::Common => 1,
            Tier::Uncommon => 2,
            Tier::Rare => 3,
            Tier::Epic => 4,
            Tier::UltraEpic => 5,
            Tier::Legendary => 6,
            Tier::Mythic => 7,
            Tier::Celestial => 8,
            Tier::Cosmic => 9,
            Tier::Divine => 10,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tier::Common => "Common",
            Tier::Uncommon => "Uncommon",
            Tier::Rare => "Rare",
            Tier::Epic => "Epic",
            Tier::UltraEpic => "Ultra Epic",
            Tier::Legendary => "Legendary",
            Tier::Mythic => "Mythic",
            Tier::Celestial => "Celestial",
            Tier::Cosmic => "Cosmic",
            Tier::Divine => "Divine",
        }
    }

    /// Directory under the icon tree holding this tier's icons.
    ///
    /// Tier 5 keeps the space from its display name ("Tier_5_Ultra Epic"),
    /// downstream consumers of the image paths rely on the exact string.
    pub fn folder_name(&self) -> String {
        format!("Tier_{}_{}", self.number(), self.name())
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tier {}: {}", self.number(), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_round_trip_through_lookup() {
        for tier in Tier::ALL {
            assert_eq!(Tier::from_number(tier.number()), Some(tier));
        }
        assert_eq!(Tier::from_number(0), None);
        assert_eq!(Tier::from_number(11), None);
    }

    #[test]
    fn test_folder_names() {
        assert_eq!(Tier::Common.folder_name(), "Tier_1_Common");
        assert_eq!(Tier::UltraEpic.folder_name(), "Tier_5_Ultra Epic");
        assert_eq!(Tier::Divine.folder_name(), "Tier_10_Divine");
    }
}
