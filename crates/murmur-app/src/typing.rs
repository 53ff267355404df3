//! Typing indicators.
//!
//! Two independent pieces: the local debounce, which turns a stream of draft
//! keystrokes into one start and one stop per burst, and the remote
//! simulation, which flips a random contact's typing flag on a fixed interval.

use std::collections::BTreeSet;

use murmur_core::Environment;

use crate::{
    action::AppAction,
    state::{Contact, ContactId},
    timers::{TimerId, TimerQueue},
};

/// Debounce state for the local user's typing indicator.
#[derive(Debug, Clone, Default)]
pub struct LocalTyping {
    active: Option<ContactId>,
    stop_timer: Option<TimerId>,
}

impl LocalTyping {
    /// Conversation the local user is typing in.
    pub fn active(&self) -> Option<ContactId> {
        self.active
    }

    /// Register a draft change in `contact_id`'s conversation.
    ///
    /// `schedule` arms the idle timer and returns its id; it is only called
    /// for non-empty drafts.
    pub fn keystroke<I, T>(
        &mut self,
        contact_id: ContactId,
        draft_empty: bool,
        timers: &mut TimerQueue<I, T>,
        schedule: impl FnOnce(&mut TimerQueue<I, T>) -> TimerId,
    ) -> Vec<AppAction>
    where
        I: Ord + Copy,
    {
        if draft_empty {
            return self.stop(timers);
        }

        let mut actions = Vec::new();
        if self.active != Some(contact_id) {
            actions.extend(self.stop(timers));
            self.active = Some(contact_id);
            actions.push(AppAction::LocalTyping { contact_id, typing: true });
        } else if let Some(previous) = self.stop_timer.take() {
            timers.cancel(previous);
        }

        self.stop_timer = Some(schedule(timers));
        actions
    }

    /// The idle timer `id` fired.
    pub fn idle_elapsed(&mut self, id: TimerId) -> Vec<AppAction> {
        if self.stop_timer != Some(id) {
            return Vec::new();
        }
        self.stop_timer = None;
        self.active
            .take()
            .map(|contact_id| AppAction::LocalTyping { contact_id, typing: false })
            .into_iter()
            .collect()
    }

    /// Stop typing now, cancelling the idle timer.
    pub fn stop<I: Ord + Copy, T>(&mut self, timers: &mut TimerQueue<I, T>) -> Vec<AppAction> {
        if let Some(id) = self.stop_timer.take() {
            timers.cancel(id);
        }
        self.active
            .take()
            .map(|contact_id| AppAction::LocalTyping { contact_id, typing: false })
            .into_iter()
            .collect()
    }
}

/// Run one simulated typing tick.
///
/// Picks a contact uniformly at random, then flips its typing flag with
/// probability `probability`. Returns the flipped contact and its new flag.
pub fn simulate_tick<E: Environment>(
    env: &E,
    contacts: &[Contact],
    typing: &mut BTreeSet<ContactId>,
    probability: f64,
) -> Option<(ContactId, bool)> {
    if contacts.is_empty() {
        return None;
    }
    let contact_id = contacts[env.random_index(contacts.len())].id;
    if env.random_unit() >= probability {
        return None;
    }

    let now_typing = !typing.remove(&contact_id);
    if now_typing {
        typing.insert(contact_id);
    }
    Some((contact_id, now_typing))
}

#[cfg(test)]
mod tests {
    use murmur_core::env::test_utils::MockEnv;

    use super::*;

    fn arm(timers: &mut TimerQueue<u64, ()>) -> TimerId {
        timers.schedule(1_000, ())
    }

    #[test]
    fn burst_emits_one_start() {
        let mut typing = LocalTyping::default();
        let mut timers = TimerQueue::new();

        let first = typing.keystroke(4, false, &mut timers, arm);
        let second = typing.keystroke(4, false, &mut timers, arm);
        let third = typing.keystroke(4, false, &mut timers, arm);

        assert_eq!(first, vec![AppAction::LocalTyping { contact_id: 4, typing: true }]);
        assert!(second.is_empty());
        assert!(third.is_empty());
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn only_latest_timer_stops_typing() {
        let mut typing = LocalTyping::default();
        let mut timers = TimerQueue::new();

        typing.keystroke(4, false, &mut timers, |t| t.schedule(10u64, ()));
        typing.keystroke(4, false, &mut timers, |t| t.schedule(20, ()));

        let (id, ()) = timers.pop_due(100).unwrap();
        assert_eq!(
            typing.idle_elapsed(id),
            vec![AppAction::LocalTyping { contact_id: 4, typing: false }]
        );
        assert_eq!(typing.active(), None);
    }

    #[test]
    fn empty_draft_stops_immediately() {
        let mut typing = LocalTyping::default();
        let mut timers = TimerQueue::new();

        typing.keystroke(2, false, &mut timers, arm);
        let actions = typing.keystroke(2, true, &mut timers, arm);

        assert_eq!(actions, vec![AppAction::LocalTyping { contact_id: 2, typing: false }]);
        assert!(timers.is_empty());
        assert!(typing.keystroke(2, true, &mut timers, arm).is_empty());
    }

    #[test]
    fn switching_conversation_restarts() {
        let mut typing = LocalTyping::default();
        let mut timers = TimerQueue::new();

        typing.keystroke(1, false, &mut timers, arm);
        let actions = typing.keystroke(2, false, &mut timers, arm);

        assert_eq!(
            actions,
            vec![
                AppAction::LocalTyping { contact_id: 1, typing: false },
                AppAction::LocalTyping { contact_id: 2, typing: true },
            ]
        );
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn simulation_flips_chosen_contact() {
        let env = MockEnv::new();
        let contacts = vec![Contact::new(1, "A"), Contact::new(2, "B")];
        let mut typing = BTreeSet::new();

        // index 1, then a roll of 0 (below any probability)
        env.script_random([1, 0]);
        assert_eq!(simulate_tick(&env, &contacts, &mut typing, 0.3), Some((2, true)));
        assert!(typing.contains(&2));

        env.script_random([1, 0]);
        assert_eq!(simulate_tick(&env, &contacts, &mut typing, 0.3), Some((2, false)));
        assert!(typing.is_empty());
    }

    #[test]
    fn simulation_respects_probability() {
        let env = MockEnv::new();
        let contacts = vec![Contact::new(1, "A")];
        let mut typing = BTreeSet::new();

        env.script_random([0, u64::MAX]);
        assert_eq!(simulate_tick(&env, &contacts, &mut typing, 0.3), None);
        assert_eq!(simulate_tick(&env, &[], &mut typing, 1.0), None);
    }
}
