use super::{unexpected_entry, Database};
use crate::error::ScriptError;
use crate::modifier::Modifier;
use crate::scope::CountryId;
use gsml::{Entry, GsmlData};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rank of a domain. The ordinal is what tier comparisons use.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum DomainTier {
    #[default]
    None = 0,
    Barony = 1,
    County = 2,
    Duchy = 3,
    Kingdom = 4,
    Empire = 5,
}

impl DomainTier {
    pub const ALL: [DomainTier; 6] = [
        DomainTier::None,
        DomainTier::Barony,
        DomainTier::County,
        DomainTier::Duchy,
        DomainTier::Kingdom,
        DomainTier::Empire,
    ];

    pub fn identifier(self) -> &'static str {
        match self {
            DomainTier::None => "none",
            DomainTier::Barony => "barony",
            DomainTier::County => "county",
            DomainTier::Duchy => "duchy",
            DomainTier::Kingdom => "kingdom",
            DomainTier::Empire => "empire",
        }
    }

    pub fn from_identifier(identifier: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.identifier() == identifier)
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for DomainTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DomainTier::None => "None",
            DomainTier::Barony => "Barony",
            DomainTier::County => "County",
            DomainTier::Duchy => "Duchy",
            DomainTier::Kingdom => "Kingdom",
            DomainTier::Empire => "Empire",
        };
        f.write_str(name)
    }
}

/// Per-tier data: the country modifier a domain of that tier gets.
#[derive(Default)]
pub struct TierTable {
    modifiers: [Option<Modifier<CountryId>>; 6],
}

impl TierTable {
    pub const CATEGORY: &'static str = "tiers";

    pub fn from_gsml(root: Option<&GsmlData>, db: &Database) -> Result<Self, ScriptError> {
        let mut table = TierTable::default();
        let Some(root) = root else {
            return Ok(table);
        };

        for entry in root.entries() {
            let Entry::Child(block) = entry else {
                return Err(unexpected_entry(entry));
            };
            let tag = block.tag_or_empty();
            let tier = DomainTier::from_identifier(tag).ok_or_else(|| {
                ScriptError::UnknownIdentifier {
                    category: "tier",
                    identifier: tag.to_string(),
                }
            })?;
            for field in block.entries() {
                match field {
                    Entry::Child(child) if child.tag() == Some("modifier") => {
                        let modifier = Modifier::from_gsml(child, db)
                            .map_err(|e| e.in_entry("tier", tag))?;
                        table.modifiers[tier.ordinal() as usize] = Some(modifier);
                    }
                    other => return Err(unexpected_entry(other).in_entry("tier", tag)),
                }
            }
        }
        Ok(table)
    }

    pub fn get_modifier(&self, tier: DomainTier) -> Option<&Modifier<CountryId>> {
        self.modifiers[tier.ordinal() as usize].as_ref()
    }

    pub(crate) fn check_validity(&self, db: &Database) -> Result<(), ScriptError> {
        for tier in DomainTier::ALL {
            if let Some(modifier) = self.get_modifier(tier) {
                modifier
                    .check_validity(db)
                    .map_err(|e| e.in_entry("tier", tier.identifier()))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals() {
        assert_eq!(DomainTier::None.ordinal(), 0);
        assert_eq!(DomainTier::Duchy.ordinal(), 3);
        assert_eq!(DomainTier::Empire.ordinal(), 5);
        assert!(DomainTier::Empire >= DomainTier::Duchy);
        assert!(DomainTier::County < DomainTier::Duchy);
    }

    #[test]
    fn test_identifiers() {
        for tier in DomainTier::ALL {
            assert_eq!(DomainTier::from_identifier(tier.identifier()), Some(tier));
        }
        assert_eq!(DomainTier::from_identifier("principality"), None);
        assert_eq!(DomainTier::Kingdom.to_string(), "Kingdom");
    }
}
