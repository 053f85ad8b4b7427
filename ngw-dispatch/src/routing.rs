//! Channel selection (spec.md §4.2 "Channel selection"): derives which
//! channels an event requires from its severity and channel hint.

use std::collections::HashSet;

use ngw_model::{Channel, ChannelHint, NotificationEvent, Severity};
use serde::{Deserialize, Serialize};

/// `routing.forceBothOnSeverity`: the set of severities that force both
/// channels regardless of the event's `channel` hint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoutingConfig {
    #[serde(default = "defaults::force_both")]
    pub force_both: HashSet<Severity>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self { force_both: defaults::force_both() }
    }
}

mod defaults {
    use std::collections::HashSet;

    use ngw_model::Severity;

    pub fn force_both() -> HashSet<Severity> {
        HashSet::from([Severity::High, Severity::Critical])
    }
}

/// Which channels are required for `event`, per spec.md §4.2.
///
/// A `None` severity never forces both channels — the force-both predicate
/// is false by definition when severity is absent (spec.md §4.2, §8
/// invariant 7's precondition).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredChannels {
    pub email: bool,
    pub sms: bool,
}

impl RequiredChannels {
    #[must_use]
    pub const fn none() -> Self {
        Self { email: false, sms: false }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        !self.email && !self.sms
    }
}

#[must_use]
pub fn required_channels(config: &RoutingConfig, event: &NotificationEvent) -> RequiredChannels {
    let forces_both = event.severity.is_some_and(|severity| config.force_both.contains(&severity));

    let email = forces_both || event.channel.is_some_and(|hint| hint.wants(Channel::Email));
    let sms = forces_both || event.channel.is_some_and(|hint| hint.wants(Channel::Sms));

    RequiredChannels { email, sms }
}
