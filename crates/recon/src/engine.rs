use crate::collate::compare_text;
use crate::identity::{dedupe, merge_accounts};
use crate::model::{Account, RelationshipEntry, RelationshipKind, Relationships};

/// Reconcile followers against following.
///
/// Every canonical key in the union of the two (deduplicated) lists lands in
/// exactly one of the three outputs. Pure: call again whenever either input
/// changes.
pub fn compare_relationships(followers: &[Account], following: &[Account]) -> Relationships {
    let followers_map = dedupe(followers);
    let following_map = dedupe(following);

    let mut fans = Vec::new();
    let mut dont_follow_back = Vec::new();
    let mut mutuals = Vec::new();

    for (key, account) in following_map.iter() {
        match followers_map.get(key) {
            // Following side goes first, so its fields win.
            Some(follower) => mutuals.push(RelationshipEntry::new(
                merge_accounts(account, follower),
                RelationshipKind::Mutuals,
            )),
            None => dont_follow_back.push(RelationshipEntry::new(
                account.clone(),
                RelationshipKind::DontFollowBack,
            )),
        }
    }

    for (key, account) in followers_map.iter() {
        if following_map.contains_key(key) {
            continue;
        }
        fans.push(RelationshipEntry::new(account.clone(), RelationshipKind::Fans));
    }

    sort_by_username(&mut fans);
    sort_by_username(&mut dont_follow_back);
    sort_by_username(&mut mutuals);

    Relationships {
        fans,
        dont_follow_back,
        mutuals,
    }
}

/// Like [`compare_relationships`], but `None` while nothing has been loaded.
pub fn reconcile(followers: &[Account], following: &[Account]) -> Option<Relationships> {
    if followers.is_empty() && following.is_empty() {
        return None;
    }
    Some(compare_relationships(followers, following))
}

fn sort_by_username(entries: &mut [RelationshipEntry]) {
    entries.sort_by(|a, b| compare_text(a.username(), b.username()));
}
