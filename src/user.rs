//! Reviewer records
//!
//! Users are the bot's reviewers. In the input map each one is keyed by an
//! abbreviated name (usually initials), which is how the old channel
//! messages refer to them.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A reviewer row in the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Messenger account id, primary key
    pub id: i64,
    /// Display name
    pub name: String,
}

impl User {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// One value of the user map file.
///
/// Current dumps store `[id, full_name]`; dumps made by the first bot
/// version store `[id, first_name, last_name]`. Both decode to a [`User`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UserEntry {
    Full(i64, String),
    Split(i64, String, String),
}

impl UserEntry {
    pub fn id(&self) -> i64 {
        match self {
            UserEntry::Full(id, _) | UserEntry::Split(id, _, _) => *id,
        }
    }

    pub fn full_name(&self) -> String {
        match self {
            UserEntry::Full(_, name) => name.clone(),
            UserEntry::Split(_, first, last) => format!("{} {}", first.trim(), last.trim())
                .trim()
                .to_string(),
        }
    }

    pub fn to_user(&self) -> User {
        User::new(self.id(), self.full_name())
    }
}

/// The decoded user map file: abbreviated name -> [`UserEntry`].
///
/// Entries keep the order they have in the file, so with first-write-wins
/// inserts the earliest abbreviation decides a shared id's name. A key
/// repeated in the file keeps its first position and takes the last value.
#[derive(Debug, Clone, Default)]
pub struct UserMap {
    entries: Vec<(String, UserEntry)>,
    index: HashMap<String, usize>,
}

impl UserMap {
    pub fn get(&self, abbrev: &str) -> Option<&UserEntry> {
        self.index.get(abbrev).map(|&i| &self.entries[i].1)
    }

    /// Entries in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &UserEntry)> {
        self.entries.iter().map(|(abbrev, entry)| (abbrev.as_str(), entry))
    }

    pub fn values(&self) -> impl Iterator<Item = &UserEntry> {
        self.entries.iter().map(|(_, entry)| entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, abbrev: String, entry: UserEntry) {
        match self.index.get(&abbrev) {
            Some(&i) => self.entries[i].1 = entry,
            None => {
                self.index.insert(abbrev.clone(), self.entries.len());
                self.entries.push((abbrev, entry));
            }
        }
    }
}

struct UserMapVisitor;

impl<'de> Visitor<'de> for UserMapVisitor {
    type Value = UserMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object mapping abbreviated names to [id, name] lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<UserMap, A::Error> {
        let mut map = UserMap::default();
        while let Some((abbrev, entry)) = access.next_entry::<String, UserEntry>()? {
            map.insert(abbrev, entry);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for UserMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(UserMapVisitor)
    }
}
