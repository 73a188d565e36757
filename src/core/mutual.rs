use std::collections::HashSet;

/// Identities that appear both in `liked` (outgoing) and `liked_me` (incoming)
///
/// Order follows the first appearance in `liked`; each identity appears once.
pub fn mutual_matches(liked: &[String], liked_me: &[String]) -> Vec<String> {
    let incoming: HashSet<&str> = liked_me.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();

    liked
        .iter()
        .filter(|id| incoming.contains(id.as_str()))
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}
