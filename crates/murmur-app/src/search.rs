//! Contact list projection: search, sort and avatar initials.
//!
//! Everything here is a pure function of app state. Nothing is cached or
//! persisted.

use std::{cmp::Ordering, fmt, str::FromStr};

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::state::Contact;

/// Fold case and strip diacritics, so "José" and "jose" compare equal.
pub fn normalize(text: &str) -> String {
    text.to_lowercase().nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Whether `name` contains `term`, ignoring case and diacritics.
pub fn matches(name: &str, term: &str) -> bool {
    let term = normalize(term);
    term.is_empty() || normalize(name).contains(&term)
}

/// Avatar label: first letter of the first word, plus the first letter of
/// the second word if there is one.
pub fn initials(name: &str) -> String {
    name.split_whitespace().take(2).filter_map(|word| word.chars().next()).collect()
}

/// Contact list ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortMode {
    /// Alphabetical, ignoring case and diacritics.
    #[default]
    Name,
    /// Most recent conversation first.
    Recent,
    /// Most unread messages first.
    Unread,
}

impl SortMode {
    /// Next mode in the Tab cycle.
    pub fn next(self) -> Self {
        match self {
            SortMode::Name => SortMode::Recent,
            SortMode::Recent => SortMode::Unread,
            SortMode::Unread => SortMode::Name,
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortMode::Name => "name",
            SortMode::Recent => "recent",
            SortMode::Unread => "unread",
        })
    }
}

/// Unrecognized sort mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort mode {0:?} (expected name, recent or unread)")]
pub struct ParseSortModeError(String);

impl FromStr for SortMode {
    type Err = ParseSortModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortMode::Name),
            "recent" => Ok(SortMode::Recent),
            "unread" => Ok(SortMode::Unread),
            _ => Err(ParseSortModeError(s.to_string())),
        }
    }
}

/// One row of the contact list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactSummary<'a> {
    /// The contact.
    pub contact: &'a Contact,
    /// Unread received messages.
    pub unread: u32,
    /// In the favorites set.
    pub favorite: bool,
    /// Currently shown as typing.
    pub typing: bool,
}

/// Keep the rows whose contact name matches `term`, in order.
pub fn filter<'a>(rows: Vec<ContactSummary<'a>>, term: &str) -> Vec<ContactSummary<'a>> {
    rows.into_iter().filter(|row| matches(&row.contact.name, term)).collect()
}

/// Stable sort of `rows` by `mode`.
pub fn sort(rows: &mut [ContactSummary<'_>], mode: SortMode) {
    match mode {
        SortMode::Name => {
            rows.sort_by_cached_key(|row| (normalize(&row.contact.name), row.contact.name.clone()));
        },
        SortMode::Recent => rows.sort_by(|a, b| {
            match (a.contact.last_message_at, b.contact.last_message_at) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }),
        SortMode::Unread => rows.sort_by(|a, b| b.unread.cmp(&a.unread)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(contact: &Contact, unread: u32) -> ContactSummary<'_> {
        ContactSummary { contact, unread, favorite: false, typing: false }
    }

    #[test]
    fn search_ignores_accents_and_case() {
        assert!(matches("José Pérez", "jose"));
        assert!(matches("Sofía Fernández", "FERNANDEZ"));
        assert!(matches("Jose", "José"));
        assert!(matches("Miguel Ángel", ""));
        assert!(!matches("Laura Torres", "zzz"));
    }

    #[test]
    fn filter_keeps_matching_rows_in_order() {
        let contacts = [
            Contact::new(1, "Ángel Ruiz"),
            Contact::new(2, "Laura Torres"),
            Contact::new(3, "Miguel Ángel"),
        ];
        let rows = || contacts.iter().map(|c| row(c, 0)).collect::<Vec<_>>();

        let ids: Vec<_> = filter(rows(), "ANGEL").iter().map(|r| r.contact.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(filter(rows(), "").len(), 3);
        assert!(filter(rows(), "zzz").is_empty());
    }

    #[test]
    fn initials_use_first_two_words() {
        assert_eq!(initials("Andrea López"), "AL");
        assert_eq!(initials("Miguel Ángel Soto"), "MÁ");
        assert_eq!(initials("Foto"), "F");
        assert_eq!(initials("  "), "");
    }

    #[test]
    fn name_sort_ignores_accents() {
        let contacts =
            [Contact::new(1, "Zoe"), Contact::new(2, "Ángel"), Contact::new(3, "andrea")];
        let mut rows: Vec<_> = contacts.iter().map(|c| row(c, 0)).collect();

        sort(&mut rows, SortMode::Name);

        let names: Vec<_> = rows.iter().map(|r| r.contact.name.as_str()).collect();
        assert_eq!(names, vec!["andrea", "Ángel", "Zoe"]);
    }

    #[test]
    fn recent_sort_puts_silent_contacts_last() {
        let mut old = Contact::new(1, "Old");
        old.last_message_at = Some(10);
        let silent = Contact::new(2, "Silent");
        let mut new = Contact::new(3, "New");
        new.last_message_at = Some(20);
        let contacts = [old, silent, new];
        let mut rows: Vec<_> = contacts.iter().map(|c| row(c, 0)).collect();

        sort(&mut rows, SortMode::Recent);

        let ids: Vec<_> = rows.iter().map(|r| r.contact.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn unread_sort_is_stable() {
        let contacts = [Contact::new(1, "A"), Contact::new(2, "B"), Contact::new(3, "C")];
        let mut rows = vec![row(&contacts[0], 1), row(&contacts[1], 4), row(&contacts[2], 1)];

        sort(&mut rows, SortMode::Unread);

        let ids: Vec<_> = rows.iter().map(|r| r.contact.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn sort_mode_parse_and_cycle() {
        assert_eq!("Recent".parse::<SortMode>(), Ok(SortMode::Recent));
        assert!("newest".parse::<SortMode>().is_err());
        assert_eq!(SortMode::Unread.next(), SortMode::Name);
        assert_eq!(SortMode::Name.to_string(), "name");
    }
}
