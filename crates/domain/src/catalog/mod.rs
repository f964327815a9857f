//! Mission template catalog - the static, versioned pool of mission
//! definitions missions are stamped from.
//!
//! Templates are build-time constants with no lifecycle of their own.
//! Everything a `Mission` row denormalizes (category, target, reward, XP)
//! originates here.

mod templates;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

pub use templates::{catalog, CATALOG_VERSION};

/// Platform role a mission can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Driver,
    Carrier,
    Shipper,
    Broker,
}

impl Role {
    /// All roles the rotation materializes missions for.
    pub const ALL: [Role; 4] = [Role::Driver, Role::Carrier, Role::Shipper, Role::Broker];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Driver => "driver",
            Self::Carrier => "carrier",
            Self::Shipper => "shipper",
            Self::Broker => "broker",
        }
    }

    /// Stable ordinal used to derive per-role selection seeds.
    pub fn ordinal(&self) -> u32 {
        match self {
            Self::Driver => 1,
            Self::Carrier => 2,
            Self::Shipper => 3,
            Self::Broker => 4,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "driver" => Ok(Self::Driver),
            "carrier" => Ok(Self::Carrier),
            "shipper" => Ok(Self::Shipper),
            "broker" => Ok(Self::Broker),
            _ => Err(DomainError::parse(format!("Unknown role: {}", s))),
        }
    }
}

/// Mission category - the coarse matching axis for business events.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum MissionCategory {
    Deliveries,
    Earnings,
    Safety,
    Efficiency,
    Social,
    Special,
    Onboarding,
}

impl MissionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deliveries => "deliveries",
            Self::Earnings => "earnings",
            Self::Safety => "safety",
            Self::Efficiency => "efficiency",
            Self::Social => "social",
            Self::Special => "special",
            Self::Onboarding => "onboarding",
        }
    }
}

impl fmt::Display for MissionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MissionCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deliveries" => Ok(Self::Deliveries),
            "earnings" => Ok(Self::Earnings),
            "safety" => Ok(Self::Safety),
            "efficiency" => Ok(Self::Efficiency),
            "social" => Ok(Self::Social),
            "special" => Ok(Self::Special),
            "onboarding" => Ok(Self::Onboarding),
            _ => Err(DomainError::parse(format!(
                "Unknown mission category: {}",
                s
            ))),
        }
    }
}

/// What kind of quantity a mission accumulates toward its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetType {
    Count,
    Amount,
    Distance,
    Streak,
    Rating,
    Time,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Amount => "amount",
            Self::Distance => "distance",
            Self::Streak => "streak",
            Self::Rating => "rating",
            Self::Time => "time",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "count" => Ok(Self::Count),
            "amount" => Ok(Self::Amount),
            "distance" => Ok(Self::Distance),
            "streak" => Ok(Self::Streak),
            "rating" => Ok(Self::Rating),
            "time" => Ok(Self::Time),
            _ => Err(DomainError::parse(format!("Unknown target type: {}", s))),
        }
    }
}

/// Reward currency granted on completion, independent of XP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RewardType {
    Points,
    Credit,
    Badge,
}

impl RewardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Points => "points",
            Self::Credit => "credit",
            Self::Badge => "badge",
        }
    }
}

impl FromStr for RewardType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "points" => Ok(Self::Points),
            "credit" => Ok(Self::Credit),
            "badge" => Ok(Self::Badge),
            _ => Err(DomainError::parse(format!("Unknown reward type: {}", s))),
        }
    }
}

/// Whether a mission's window spans a day or a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cadence {
    Daily,
    Weekly,
}

impl Cadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

impl FromStr for Cadence {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            _ => Err(DomainError::parse(format!("Unknown cadence: {}", s))),
        }
    }
}

/// Which roles a template applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Applies to every role; feeds the shared slice of each week's picks.
    Universal,
    /// Applies only to the listed roles.
    Roles(&'static [Role]),
}

impl Audience {
    pub fn applies_to(&self, role: Role) -> bool {
        match self {
            Self::Universal => true,
            Self::Roles(roles) => roles.contains(&role),
        }
    }

    pub fn is_universal(&self) -> bool {
        matches!(self, Self::Universal)
    }
}

/// Completion reward attached to a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reward {
    pub kind: RewardType,
    pub value: u32,
}

/// An immutable catalog entry describing a mission's shape.
#[derive(Debug, Clone, Copy)]
pub struct MissionTemplate {
    /// Stable slug, unique across the catalog.
    pub key: &'static str,
    pub name: &'static str,
    /// Description pattern; `{target}` is replaced at materialization.
    pub description: &'static str,
    pub category: MissionCategory,
    pub target_type: TargetType,
    pub target_value: f64,
    pub target_unit: Option<&'static str>,
    pub reward: Reward,
    pub xp: u32,
    pub audience: Audience,
    pub cadence: Cadence,
}

impl MissionTemplate {
    pub fn applies_to(&self, role: Role) -> bool {
        self.audience.applies_to(role)
    }

    /// Render the description pattern against the target value.
    pub fn render_description(&self) -> String {
        self.description
            .replace("{target}", &format_target(self.target_value))
    }
}

/// Formats a target for human-facing text: "5", not "5.0".
pub(crate) fn format_target(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
