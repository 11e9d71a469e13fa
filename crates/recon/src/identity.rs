use std::collections::HashMap;

use crate::model::Account;

/// Identity used for every equality and merge decision: the trimmed
/// `user_id` when present, otherwise the lowercased username.
pub fn canonical_key(account: &Account) -> String {
    match account.user_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => username_key(account),
    }
}

/// Key used for within-file dedup, where no user id is ever present.
pub fn username_key(account: &Account) -> String {
    account.username.to_lowercase()
}

fn first_text(a: &Option<String>, b: &Option<String>) -> Option<String> {
    match a {
        Some(s) if !s.is_empty() => a.clone(),
        _ => match b {
            Some(s) if !s.is_empty() => b.clone(),
            // Keep whichever side was defined, even if empty.
            _ => a.clone().or_else(|| b.clone()),
        },
    }
}

/// Merge two records for the same identity. Field by field, `existing`
/// wins when it has a value; `incoming` only fills gaps.
pub fn merge_accounts(existing: &Account, incoming: &Account) -> Account {
    let username = if existing.username.is_empty() {
        incoming.username.clone()
    } else {
        existing.username.clone()
    };

    Account {
        username,
        full_name: first_text(&existing.full_name, &incoming.full_name),
        user_id: first_text(&existing.user_id, &incoming.user_id),
        profile_picture_url: first_text(&existing.profile_picture_url, &incoming.profile_picture_url),
        followed_date: existing.followed_date.or(incoming.followed_date),
        is_verified: existing.is_verified.or(incoming.is_verified),
        is_private: existing.is_private.or(incoming.is_private),
        source: first_text(&existing.source, &incoming.source),
    }
}

/// Insertion-ordered map from identity key to merged account.
#[derive(Debug, Default)]
pub struct IdentityMap {
    index: HashMap<String, usize>,
    entries: Vec<(String, Account)>,
}

impl IdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or merge. Accounts with an empty key are ignored.
    pub fn insert(&mut self, key: String, account: &Account) {
        if key.is_empty() {
            return;
        }
        match self.index.get(&key) {
            Some(&i) => {
                let merged = merge_accounts(&self.entries[i].1, account);
                self.entries[i].1 = merged;
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, account.clone()));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Account> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Account)> {
        self.entries.iter().map(|(k, a)| (k.as_str(), a))
    }

    pub fn into_accounts(self) -> Vec<Account> {
        self.entries.into_iter().map(|(_, a)| a).collect()
    }
}

/// Collapse duplicates under `key_fn`, keeping first-seen order.
pub fn dedupe_by<F>(accounts: &[Account], key_fn: F) -> IdentityMap
where
    F: Fn(&Account) -> String,
{
    let mut map = IdentityMap::new();
    for account in accounts {
        map.insert(key_fn(account), account);
    }
    map
}

/// Collapse duplicates under the canonical key.
pub fn dedupe(accounts: &[Account]) -> IdentityMap {
    dedupe_by(accounts, canonical_key)
}
