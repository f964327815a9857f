//! Business event taxonomy and the static event-to-mission matching rules.
//!
//! Every event kind maps to a set of mission categories AND a set of
//! target types. A mission advances only when both sets hit: the
//! mission's category must be in the event's category set and the
//! mission's target type in its target-type set. The double gate keeps a
//! chat message from ever ticking a "miles driven" mission.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{MissionCategory, TargetType};
use crate::error::DomainError;

/// Business events the engine consumes. The engine never originates
/// these; they arrive from load/bid/payment/messaging workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    LoadCreated,
    LoadCompleted,
    LoadDeliveredOnTime,
    BidPlaced,
    BidAccepted,
    PaymentReceived,
    RatingReceived,
    MessageSent,
    DocumentUploaded,
    ProfileCompleted,
    ReferralCompleted,
    MilesLogged,
    InspectionPassed,
    DutyHoursLogged,
    /// Forward compatibility: event kinds this build doesn't know are
    /// accepted and ignored rather than rejected.
    #[serde(other)]
    Unknown,
}

/// The category/target-type gate for one event kind.
#[derive(Debug, Clone, Copy)]
pub struct MatchRule {
    pub categories: &'static [MissionCategory],
    pub target_types: &'static [TargetType],
}

impl MatchRule {
    /// True when a mission with this category and target type should
    /// advance on the event.
    pub fn accepts(&self, category: MissionCategory, target_type: TargetType) -> bool {
        self.categories.contains(&category) && self.target_types.contains(&target_type)
    }
}

use crate::catalog::MissionCategory as C;
use crate::catalog::TargetType as T;

impl EventKind {
    /// The static matching rule for this event, or `None` for events the
    /// engine ignores.
    pub fn match_rule(&self) -> Option<MatchRule> {
        let rule = match self {
            Self::LoadCreated => MatchRule {
                categories: &[C::Deliveries],
                target_types: &[T::Count],
            },
            Self::LoadCompleted => MatchRule {
                categories: &[C::Deliveries, C::Efficiency],
                target_types: &[T::Count],
            },
            Self::LoadDeliveredOnTime => MatchRule {
                categories: &[C::Deliveries],
                target_types: &[T::Streak],
            },
            Self::BidPlaced => MatchRule {
                categories: &[C::Earnings],
                target_types: &[T::Count],
            },
            Self::BidAccepted => MatchRule {
                categories: &[C::Earnings],
                target_types: &[T::Count],
            },
            Self::PaymentReceived => MatchRule {
                categories: &[C::Earnings],
                target_types: &[T::Amount],
            },
            Self::RatingReceived => MatchRule {
                categories: &[C::Social, C::Safety],
                target_types: &[T::Rating],
            },
            Self::MessageSent => MatchRule {
                categories: &[C::Social],
                target_types: &[T::Count],
            },
            Self::DocumentUploaded => MatchRule {
                categories: &[C::Onboarding],
                target_types: &[T::Count],
            },
            Self::ProfileCompleted => MatchRule {
                categories: &[C::Onboarding],
                target_types: &[T::Count],
            },
            Self::ReferralCompleted => MatchRule {
                categories: &[C::Special, C::Social],
                target_types: &[T::Count],
            },
            Self::MilesLogged => MatchRule {
                categories: &[C::Efficiency],
                target_types: &[T::Distance],
            },
            Self::InspectionPassed => MatchRule {
                categories: &[C::Safety],
                target_types: &[T::Count],
            },
            Self::DutyHoursLogged => MatchRule {
                categories: &[C::Efficiency],
                target_types: &[T::Time],
            },
            Self::Unknown => return None,
        };
        Some(rule)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoadCreated => "load_created",
            Self::LoadCompleted => "load_completed",
            Self::LoadDeliveredOnTime => "load_delivered_on_time",
            Self::BidPlaced => "bid_placed",
            Self::BidAccepted => "bid_accepted",
            Self::PaymentReceived => "payment_received",
            Self::RatingReceived => "rating_received",
            Self::MessageSent => "message_sent",
            Self::DocumentUploaded => "document_uploaded",
            Self::ProfileCompleted => "profile_completed",
            Self::ReferralCompleted => "referral_completed",
            Self::MilesLogged => "miles_logged",
            Self::InspectionPassed => "inspection_passed",
            Self::DutyHoursLogged => "duty_hours_logged",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "load_created" => Ok(Self::LoadCreated),
            "load_completed" => Ok(Self::LoadCompleted),
            "load_delivered_on_time" => Ok(Self::LoadDeliveredOnTime),
            "bid_placed" => Ok(Self::BidPlaced),
            "bid_accepted" => Ok(Self::BidAccepted),
            "payment_received" => Ok(Self::PaymentReceived),
            "rating_received" => Ok(Self::RatingReceived),
            "message_sent" => Ok(Self::MessageSent),
            "document_uploaded" => Ok(Self::DocumentUploaded),
            "profile_completed" => Ok(Self::ProfileCompleted),
            "referral_completed" => Ok(Self::ReferralCompleted),
            "miles_logged" => Ok(Self::MilesLogged),
            "inspection_passed" => Ok(Self::InspectionPassed),
            "duty_hours_logged" => Ok(Self::DutyHoursLogged),
            _ => Err(DomainError::parse(format!("Unknown event kind: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_never_advances_distance_missions() {
        let rule = EventKind::MessageSent
            .match_rule()
            .expect("message_sent has a rule");
        assert!(!rule.accepts(C::Efficiency, T::Distance));
        assert!(!rule.accepts(C::Social, T::Distance));
        assert!(rule.accepts(C::Social, T::Count));
    }

    #[test]
    fn test_both_axes_must_match() {
        let rule = EventKind::LoadCompleted
            .match_rule()
            .expect("load_completed has a rule");
        // Right category, wrong target type
        assert!(!rule.accepts(C::Deliveries, T::Streak));
        // Right target type, wrong category
        assert!(!rule.accepts(C::Social, T::Count));
        // Both right
        assert!(rule.accepts(C::Deliveries, T::Count));
    }

    #[test]
    fn test_unknown_events_have_no_rule() {
        assert!(EventKind::Unknown.match_rule().is_none());
    }

    #[test]
    fn test_wire_name_round_trip() {
        let kinds = [
            EventKind::LoadCreated,
            EventKind::LoadCompleted,
            EventKind::BidAccepted,
            EventKind::RatingReceived,
            EventKind::MessageSent,
        ];
        for kind in kinds {
            assert_eq!(kind.as_str().parse::<EventKind>().ok(), Some(kind));
        }
        assert!("truck_washed".parse::<EventKind>().is_err());
    }

    #[test]
    fn test_unknown_deserializes_from_unrecognized_wire_name() {
        let kind: EventKind =
            serde_json::from_str("\"totally_new_event\"").expect("serde(other) catches it");
        assert_eq!(kind, EventKind::Unknown);
    }
}
