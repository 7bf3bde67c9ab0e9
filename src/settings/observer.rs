//! Change notification for front-ends.
//!
//! Front-ends either subscribe a callback or poll [`ObservedConfiguration::revision`].
//! Callbacks run inline, in subscription order, and only for accepted changes.

use super::model::{ExploitConfiguration, SettingChange};

/// Receives accepted changes.
pub trait SettingsObserver {
    /// Called after `change` has been applied; `config` is the new state.
    fn on_change(&mut self, change: &SettingChange, config: &ExploitConfiguration);
}

impl<F> SettingsObserver for F
where
    F: FnMut(&SettingChange, &ExploitConfiguration),
{
    fn on_change(&mut self, change: &SettingChange, config: &ExploitConfiguration) {
        self(change, config);
    }
}

/// Handle returned by [`ObservedConfiguration::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// An [`ExploitConfiguration`] that notifies observers when it changes.
pub struct ObservedConfiguration {
    config: ExploitConfiguration,
    observers: Vec<(SubscriptionId, Box<dyn SettingsObserver>)>,
    next_id: u64,
    revision: u64,
}

// Box<dyn SettingsObserver> is not Debug
impl std::fmt::Debug for ObservedConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservedConfiguration")
            .field("config", &self.config)
            .field("observers", &self.observers.len())
            .field("revision", &self.revision)
            .finish()
    }
}

impl Default for ObservedConfiguration {
    fn default() -> Self {
        Self::new(ExploitConfiguration::default())
    }
}

impl ObservedConfiguration {
    #[must_use]
    pub fn new(config: ExploitConfiguration) -> Self {
        Self {
            config,
            observers: Vec::new(),
            next_id: 0,
            revision: 0,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn config(&self) -> &ExploitConfiguration {
        &self.config
    }

    /// Number of accepted changes so far.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Registers an observer.
    pub fn subscribe(&mut self, observer: impl SettingsObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Applies a change and notifies observers if it was accepted.
    pub fn apply(&mut self, change: &SettingChange) -> bool {
        if !self.config.apply(change) {
            return false;
        }
        self.revision += 1;
        for (_, observer) in &mut self.observers {
            observer.on_change(change, &self.config);
        }
        true
    }

    /// Releases the configuration, dropping all observers.
    #[must_use]
    pub fn into_inner(self) -> ExploitConfiguration {
        self.config
    }
}
