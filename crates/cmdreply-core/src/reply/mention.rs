//! Allowed-mentions policy.
//!
//! Two independent parts: the categories that may ping at all, and explicit
//! allow-lists of user and role ids. Neither is serialized into the reply
//! envelope yet; they are collected so callers and the dispatch layer can
//! inspect them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ReplyError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionType {
    User,
    Role,
    Channel,
    Emote,
    Here,
    Everyone,
}

impl MentionType {
    pub const ALL: [MentionType; 6] = [
        MentionType::User,
        MentionType::Role,
        MentionType::Channel,
        MentionType::Emote,
        MentionType::Here,
        MentionType::Everyone,
    ];
}

/// Entity that can be put on an explicit mention allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mentionable {
    User(u64),
    Role(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionPolicy {
    allowed: BTreeSet<MentionType>,
    users: BTreeSet<u64>,
    roles: BTreeSet<u64>,
}

impl Default for MentionPolicy {
    fn default() -> Self {
        Self {
            allowed: Self::default_types(),
            users: BTreeSet::new(),
            roles: BTreeSet::new(),
        }
    }
}

impl MentionPolicy {
    pub fn default_types() -> BTreeSet<MentionType> {
        MentionType::ALL.into_iter().collect()
    }

    pub fn allowed(&self) -> &BTreeSet<MentionType> {
        &self.allowed
    }

    pub fn users(&self) -> &BTreeSet<u64> {
        &self.users
    }

    pub fn roles(&self) -> &BTreeSet<u64> {
        &self.roles
    }

    /// `None` restores the default categories.
    pub fn set_allowed<I>(&mut self, types: Option<I>)
    where
        I: IntoIterator<Item = MentionType>,
    {
        self.allowed = match types {
            Some(types) => types.into_iter().collect(),
            None => Self::default_types(),
        };
    }

    pub fn allow(&mut self, target: Mentionable) {
        match target {
            Mentionable::User(id) => self.users.insert(id),
            Mentionable::Role(id) => self.roles.insert(id),
        };
    }

    pub fn allow_users(&mut self, ids: impl IntoIterator<Item = u64>) {
        self.users.extend(ids);
    }

    pub fn allow_roles(&mut self, ids: impl IntoIterator<Item = u64>) {
        self.roles.extend(ids);
    }

    pub fn has_targets(&self) -> bool {
        !self.users.is_empty() || !self.roles.is_empty()
    }
}

/// Parse snowflake id strings; all-or-nothing.
pub fn parse_snowflakes<S: AsRef<str>>(ids: &[S], what: &str) -> Result<Vec<u64>> {
    ids.iter()
        .map(|s| {
            let s = s.as_ref();
            s.trim().parse::<u64>().map_err(|_| {
                ReplyError::InvalidParameter(format!("{what} id is not a valid snowflake: {s:?}"))
            })
        })
        .collect()
}
