//! Navigation paths.
//!
//! | Path         | Resolution                         |
//! |--------------|------------------------------------|
//! | `/`          | home                               |
//! | `/chat/{id}` | conversation `id`                  |
//! | `/contacts`  | placeholder screen                 |
//! | `/settings`  | placeholder screen                 |
//! | anything else| redirect to `/`                    |
//!
//! Query strings, fragments and trailing slashes are ignored.

use std::fmt;

use crate::state::ContactId;

/// A screen the app can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Contact list with no conversation open.
    Home,
    /// Conversation with a contact.
    Chat(ContactId),
    /// Contacts screen (placeholder).
    Contacts,
    /// Settings screen (placeholder).
    Settings,
}

impl Route {
    /// Canonical path for this route.
    pub fn path(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Chat(id) => write!(f, "/chat/{id}"),
            Route::Contacts => write!(f, "/contacts"),
            Route::Settings => write!(f, "/settings"),
        }
    }
}

/// Outcome of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The path names a route.
    Matched(Route),
    /// `/chat/{segment}` where the segment is not a contact id.
    InvalidContact(String),
    /// The path names no route; go to `to` instead.
    Redirect {
        /// Normalized path that failed to match.
        from: String,
        /// Route to show.
        to: Route,
    },
}

/// Resolve a path to a route.
pub fn resolve(path: &str) -> Resolution {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        [] => Resolution::Matched(Route::Home),
        ["chat", id] => match id.parse::<ContactId>() {
            Ok(id) => Resolution::Matched(Route::Chat(id)),
            Err(_) => Resolution::InvalidContact((*id).to_string()),
        },
        ["contacts"] => Resolution::Matched(Route::Contacts),
        ["settings"] => Resolution::Matched(Route::Settings),
        _ => Resolution::Redirect { from: format!("/{}", segments.join("/")), to: Route::Home },
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn known_paths() {
        assert_eq!(resolve("/"), Resolution::Matched(Route::Home));
        assert_eq!(resolve(""), Resolution::Matched(Route::Home));
        assert_eq!(resolve("/chat/3"), Resolution::Matched(Route::Chat(3)));
        assert_eq!(resolve("/contacts"), Resolution::Matched(Route::Contacts));
        assert_eq!(resolve("/settings"), Resolution::Matched(Route::Settings));
    }

    #[test]
    fn decorations_are_ignored() {
        assert_eq!(resolve("/chat/3/"), Resolution::Matched(Route::Chat(3)));
        assert_eq!(resolve("/chat/3?tab=media"), Resolution::Matched(Route::Chat(3)));
        assert_eq!(resolve("/settings#theme"), Resolution::Matched(Route::Settings));
        assert_eq!(resolve("/?q=x"), Resolution::Matched(Route::Home));
    }

    #[test]
    fn unknown_paths_redirect_home() {
        assert_eq!(
            resolve("/home"),
            Resolution::Redirect { from: "/home".to_string(), to: Route::Home }
        );
        assert_eq!(
            resolve("/chat"),
            Resolution::Redirect { from: "/chat".to_string(), to: Route::Home }
        );
        assert_eq!(
            resolve("/chat/1/extra"),
            Resolution::Redirect { from: "/chat/1/extra".to_string(), to: Route::Home }
        );
    }

    #[test]
    fn non_numeric_chat_id() {
        assert_eq!(resolve("/chat/abc"), Resolution::InvalidContact("abc".to_string()));
        assert_eq!(resolve("/chat/-1"), Resolution::InvalidContact("-1".to_string()));
    }

    proptest! {
        #[test]
        fn prop_route_path_resolves_to_itself(id in any::<u64>()) {
            for route in [Route::Home, Route::Chat(id), Route::Contacts, Route::Settings] {
                prop_assert_eq!(resolve(&route.path()), Resolution::Matched(route));
            }
        }
    }
}
