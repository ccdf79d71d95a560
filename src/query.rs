//! Search-as-you-type filtering and the canonical contact ordering.
//!
//! Everything here is a pure function of its inputs: no I/O, and input slices
//! are never mutated.
//!
//! Matching ranks each of `first` and `last` against the query and keeps the
//! better of the two. Any case-insensitive substring hit is kept; looser
//! subsequence hits ("adl" in "Ada Lovelace") are kept too but rank lowest.

use crate::contact::Contact;
use std::cmp::Ordering;

/// How well a field matched the query. Higher is better.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Rank {
    /// Query characters appear in order but scattered. The score is in
    /// `(0, 1]`; tighter runs score higher.
    Subsequence(f64),
    /// Query equals the initials of the field's words.
    Acronym,
    /// Query appears somewhere inside the field.
    Contains,
    /// Query starts one of the field's later words.
    WordStartsWith,
    /// Field starts with the query.
    StartsWith,
    /// Same text ignoring case.
    Equal,
    /// Byte-for-byte equal.
    CaseSensitiveEqual,
}

/// Rank one field value against `query`. `None` means no match at all.
#[must_use]
pub fn rank_field(value: &str, query: &str) -> Option<Rank> {
    if query.is_empty() {
        return None;
    }
    if value == query {
        return Some(Rank::CaseSensitiveEqual);
    }

    let value = fold_case(value);
    let query = fold_case(query);
    if value.chars().count() < query.chars().count() {
        return None;
    }

    if value == query {
        return Some(Rank::Equal);
    }
    if value.starts_with(&query) {
        return Some(Rank::StartsWith);
    }
    if value.contains(&format!(" {query}")) {
        return Some(Rank::WordStartsWith);
    }
    if value.contains(&query) {
        return Some(Rank::Contains);
    }
    if query.chars().count() == 1 {
        // A lone character that isn't a substring can't be a looser match.
        return None;
    }
    if acronym(&value).contains(&query) {
        return Some(Rank::Acronym);
    }
    subsequence_score(&value, &query).map(Rank::Subsequence)
}

/// Caseless form of `s`, folded one character at a time.
///
/// `str::to_lowercase` is context sensitive (a word-final `Σ` becomes `ς`),
/// so a substring of the original may not be a substring of the lowered
/// string. Mapping each char independently keeps every substring intact.
/// Going through uppercase first also merges `ς`/`σ` and `ß`/`ss`.
#[must_use]
pub fn fold_case(s: &str) -> String {
    s.chars()
        .flat_map(char::to_uppercase)
        .flat_map(char::to_lowercase)
        .collect()
}

/// Best rank of a contact across `first` and `last`.
#[must_use]
pub fn rank_contact(contact: &Contact, query: &str) -> Option<Rank> {
    let first = contact.first.as_deref().and_then(|v| rank_field(v, query));
    let last = contact.last.as_deref().and_then(|v| rank_field(v, query));
    match (first, last) {
        (Some(a), Some(b)) => Some(if b > a { b } else { a }),
        (a, b) => a.or(b),
    }
}

/// Contacts whose `first` or `last` matches `query`, best matches first.
/// Equal ranks keep their input order. An empty query keeps everything.
#[must_use]
pub fn filter(contacts: &[Contact], query: &str) -> Vec<Contact> {
    if query.is_empty() {
        return contacts.to_vec();
    }
    let mut ranked: Vec<(Rank, &Contact)> = contacts
        .iter()
        .filter_map(|c| rank_contact(c, query).map(|r| (r, c)))
        .collect();
    // Stable sort, so ties stay in input order.
    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    ranked.into_iter().map(|(_, c)| c.clone()).collect()
}

/// Canonical display order: `last` ascending (unset counts as `""`), ties
/// broken by `created_at` ascending.
pub fn canonical_order(a: &Contact, b: &Contact) -> Ordering {
    a.last_or_empty()
        .cmp(b.last_or_empty())
        .then(a.created_at.cmp(&b.created_at))
}

/// Sort in place by [`canonical_order`]. Stable.
pub fn sort(contacts: &mut [Contact]) {
    contacts.sort_by(canonical_order);
}

/// Filter (when `query` is non-empty), then sort. Returns a new vector.
#[must_use]
pub fn apply(contacts: &[Contact], query: &str) -> Vec<Contact> {
    let mut out = filter(contacts, query);
    sort(&mut out);
    out
}

/// How a search-as-you-type navigation should touch history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// Add a new history entry.
    Push,
    /// Overwrite the current entry.
    Replace,
}

impl HistoryMode {
    /// The first keystroke of a search pushes an entry; later keystrokes
    /// replace it so "back" leaves the search in one step. `current_query`
    /// is the query already in the location, if any.
    #[must_use]
    pub fn for_search(current_query: Option<&str>) -> Self {
        match current_query {
            None => HistoryMode::Push,
            Some(_) => HistoryMode::Replace,
        }
    }
}

fn acronym(value: &str) -> String {
    value
        .split(|c: char| c == ' ' || c == '-')
        .filter_map(|word| word.chars().next())
        .collect()
}

fn subsequence_score(value: &str, query: &str) -> Option<f64> {
    let hay: Vec<char> = value.chars().collect();
    let mut first_index = None;
    let mut last_index = 0usize;
    let mut pos = 0usize;
    for qc in query.chars() {
        let offset = hay[pos..].iter().position(|&hc| hc == qc)?;
        let found = pos + offset;
        first_index.get_or_insert(found);
        last_index = found;
        pos = found + 1;
    }
    let first_index = first_index?;
    let spread = (last_index - first_index).max(1) as f64;
    let in_order = query.chars().count() as f64 / hay.len() as f64;
    Some(in_order / spread)
}
