//! Timing configuration and seed data.

use std::{collections::BTreeMap, time::Duration};

use thiserror::Error;

use crate::state::{Contact, ContactId, Message, Sender, display_timestamp};

/// Timing knobs for the simulated parts of the app.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Delay from send to delivered.
    pub delivered_after: Duration,
    /// Delay from send to read. Must exceed `delivered_after`.
    pub read_after: Duration,
    /// Interval between simulated typing ticks.
    pub typing_interval: Duration,
    /// Chance that a typing tick flips the chosen contact.
    pub typing_probability: f64,
    /// Local typing stops after this long without a keystroke.
    pub typing_idle: Duration,
    /// Auto-dismiss delay for notifications. `None` keeps them until
    /// dismissed.
    pub notification_ttl: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            delivered_after: Duration::from_secs(1),
            read_after: Duration::from_secs(3),
            typing_interval: Duration::from_secs(3),
            typing_probability: 0.3,
            typing_idle: Duration::from_secs(1),
            notification_ttl: Some(Duration::from_secs(5)),
        }
    }
}

/// Rejected configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Read would fire before (or with) delivered.
    #[error("read_after ({read:?}) must exceed delivered_after ({delivered:?})")]
    ReadBeforeDelivered {
        /// Configured delivered delay.
        delivered: Duration,
        /// Configured read delay.
        read: Duration,
    },

    /// Probability outside [0, 1].
    #[error("typing_probability must be within [0, 1], got {0}")]
    Probability(f64),

    /// A zero interval would reschedule forever within one tick.
    #[error("{0} must be non-zero")]
    ZeroInterval(&'static str),
}

impl AppConfig {
    /// Check the cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.read_after <= self.delivered_after {
            return Err(ConfigError::ReadBeforeDelivered {
                delivered: self.delivered_after,
                read: self.read_after,
            });
        }
        if !(0.0..=1.0).contains(&self.typing_probability) {
            return Err(ConfigError::Probability(self.typing_probability));
        }
        if self.typing_interval.is_zero() {
            return Err(ConfigError::ZeroInterval("typing_interval"));
        }
        if self.typing_idle.is_zero() {
            return Err(ConfigError::ZeroInterval("typing_idle"));
        }
        Ok(())
    }
}

/// Initial contacts and conversations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seed {
    /// Contacts, in sidebar order.
    pub contacts: Vec<Contact>,
    /// Conversations by contact.
    pub conversations: BTreeMap<ContactId, Vec<Message>>,
}

const DEMO: [(&str, &str); 7] = [
    ("Andrea López", "¿Qué tipo de estrategia es mejor?"),
    ("Carlos Méndez", "No te preocupes, yo me encargo de eso mañana temprano."),
    ("Laura Torres", "¡Oye, tengo una buena idea!"),
    ("Javier Ramírez", "Foto"),
    ("Sofía Fernández", "En realidad quería consultarte sobre tu plan de negocio online..."),
    ("Miguel Ángel", "Te mando el archivo apenas llegue a casa, dame 10 minutos."),
    ("Valentina Castro", "¡Ok, que tengas un buen viaje!"),
];

impl Seed {
    /// The seven demo contacts, each with one received message stamped
    /// `now_millis`.
    pub fn demo(now_millis: u64) -> Self {
        let mut seed = Self::default();
        for (id, (name, text)) in (1..).zip(DEMO) {
            seed.contacts.push(Contact::new(id, name));
            seed.conversations.insert(
                id,
                vec![Message {
                    id: 1,
                    text: text.to_string(),
                    sender: Sender::Received,
                    timestamp: display_timestamp(now_millis),
                    sent_at: now_millis,
                }],
            );
        }
        seed
    }

    /// The demo contacts with empty conversations.
    pub fn contacts_only() -> Self {
        let contacts = (1..).zip(DEMO).map(|(id, (name, _))| Contact::new(id, name)).collect();
        Self { contacts, conversations: BTreeMap::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(AppConfig::default().validate(), Ok(()));
    }

    #[test]
    fn read_must_follow_delivered() {
        let config = AppConfig { read_after: Duration::from_secs(1), ..AppConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::ReadBeforeDelivered { .. })));
    }

    #[test]
    fn probability_range() {
        let config = AppConfig { typing_probability: 1.5, ..AppConfig::default() };
        assert_eq!(config.validate(), Err(ConfigError::Probability(1.5)));

        let config = AppConfig { typing_probability: f64::NAN, ..AppConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn demo_seed_has_one_received_message_each() {
        let seed = Seed::demo(0);
        assert_eq!(seed.contacts.len(), 7);
        assert!(seed.conversations.values().all(|c| c.len() == 1 && c[0].sender == Sender::Received));
        assert_eq!(seed.contacts[6].name, "Valentina Castro");
    }
}
