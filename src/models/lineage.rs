//! Lineage: the chain of ancestor ids that identifies a node's position.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::LINEAGE_STRING_SEPARATOR;
use crate::schema::Level;

/// Ids found at each level of a row, from `L0` up to a node's own level.
///
/// Levels whose id cell was blank in the row have no entry. Serialised as
/// `{"L0_ID": "D1", "L1_ID": "LOB1"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lineage {
    entries: BTreeMap<Level, String>,
}

impl Lineage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, level: Level, id: impl Into<String>) {
        self.entries.insert(level, id.into());
    }

    pub fn get(&self, level: Level) -> Option<&str> {
        self.entries.get(&level).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Level, &str)> {
        self.entries.iter().map(|(level, id)| (*level, id.as_str()))
    }

    /// Human-readable form, e.g. `L0_ID=D1 > L1_ID=LOB1`.
    pub fn to_display_string(&self) -> String {
        self.iter()
            .map(|(level, id)| format!("{}={id}", level.lineage_key()))
            .collect::<Vec<_>>()
            .join(LINEAGE_STRING_SEPARATOR)
    }
}

impl fmt::Display for Lineage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

impl FromIterator<(Level, String)> for Lineage {
    fn from_iter<T: IntoIterator<Item = (Level, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Lineage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (level, id) in &self.entries {
            map.serialize_entry(&level.lineage_key(), id)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Lineage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LineageVisitor;

        impl<'de> Visitor<'de> for LineageVisitor {
            type Value = Lineage;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of L<n>_ID keys to ids")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Lineage, A::Error> {
                let mut lineage = Lineage::new();
                while let Some((key, id)) = access.next_entry::<String, String>()? {
                    let level = Level::from_lineage_key(&key).ok_or_else(|| {
                        serde::de::Error::custom(format!("invalid lineage key '{key}'"))
                    })?;
                    lineage.insert(level, id);
                }
                Ok(lineage)
            }
        }

        deserializer.deserialize_map(LineageVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lineage(ids: &[(&str, &str)]) -> Lineage {
        ids.iter()
            .map(|(tag, id)| (tag.parse::<Level>().unwrap(), id.to_string()))
            .collect()
    }

    #[test]
    fn test_serializes_with_lineage_keys() {
        let value = serde_json::to_value(lineage(&[("L0", "D1"), ("L1", "LOB1")])).unwrap();
        assert_eq!(value, json!({"L0_ID": "D1", "L1_ID": "LOB1"}));
    }

    #[test]
    fn test_deserializes_lineage_keys() {
        let parsed: Lineage = serde_json::from_value(json!({"L2_ID": "J1", "L0_ID": "D1"})).unwrap();
        assert_eq!(parsed, lineage(&[("L0", "D1"), ("L2", "J1")]));
        assert!(serde_json::from_value::<Lineage>(json!({"bogus": "x"})).is_err());
    }

    #[test]
    fn test_display_string_is_level_ordered() {
        let l = lineage(&[("L10", "Z"), ("L2", "J1"), ("L0", "D1")]);
        assert_eq!(l.to_display_string(), "L0_ID=D1 > L2_ID=J1 > L10_ID=Z");
    }
}
