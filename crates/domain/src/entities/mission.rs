//! Mission entity - a time-boxed, role-scoped instance of a catalog
//! template.
//!
//! Missions denormalize the template fields they were stamped from so a
//! later catalog edit never retroactively changes live missions. Rows are
//! deactivated when their window passes, never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Cadence, MissionCategory, MissionTemplate, RewardType, Role, TargetType};
use crate::ids::MissionId;

/// A concrete, windowed mission users can hold progress against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    id: MissionId,
    /// Deterministic rotation code, e.g. `wk_23_driver_0`. Unique, and
    /// the idempotency key for regeneration.
    code: String,
    name: String,
    description: String,
    category: MissionCategory,
    target_type: TargetType,
    target_value: f64,
    target_unit: Option<String>,
    reward_kind: RewardType,
    reward_value: u32,
    xp: u32,
    role: Role,
    cadence: Cadence,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    is_active: bool,
    sort_order: u32,
}

impl Mission {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        category: MissionCategory,
        target_type: TargetType,
        target_value: f64,
        role: Role,
        cadence: Cadence,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MissionId::new(),
            code: code.into(),
            name: name.into(),
            description: String::new(),
            category,
            target_type,
            target_value,
            target_unit: None,
            reward_kind: RewardType::Points,
            reward_value: 0,
            xp: 0,
            role,
            cadence,
            starts_at,
            ends_at,
            is_active: true,
            sort_order: 0,
        }
    }

    /// Stamp a mission out of a catalog template for one role and window.
    pub fn from_template(
        template: &MissionTemplate,
        code: impl Into<String>,
        role: Role,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        slot: usize,
    ) -> Self {
        let mut mission = Self::new(
            code,
            template.name,
            template.category,
            template.target_type,
            template.target_value,
            role,
            template.cadence,
            starts_at,
            ends_at,
        );
        mission.description = template.render_description();
        mission.target_unit = template.target_unit.map(str::to_string);
        mission.reward_kind = template.reward.kind;
        mission.reward_value = template.reward.value;
        mission.xp = template.xp;
        mission.sort_order = slot as u32;
        mission
    }

    /// Weekly rotation code: `wk_{weekIndex}_{role}_{slot}`.
    pub fn weekly_code(week_index: u32, role: Role, slot: usize) -> String {
        format!("wk_{}_{}_{}", week_index, role.as_str(), slot)
    }

    /// Daily rotation code: `dy_{dayIndex}_{role}_{slot}`.
    pub fn daily_code(day_index: u32, role: Role, slot: usize) -> String {
        format!("dy_{}_{}_{}", day_index, role.as_str(), slot)
    }

    // === Accessors ===

    pub fn id(&self) -> MissionId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> MissionCategory {
        self.category
    }

    pub fn target_type(&self) -> TargetType {
        self.target_type
    }

    pub fn target_value(&self) -> f64 {
        self.target_value
    }

    pub fn target_unit(&self) -> Option<&str> {
        self.target_unit.as_deref()
    }

    pub fn reward_kind(&self) -> RewardType {
        self.reward_kind
    }

    pub fn reward_value(&self) -> u32 {
        self.reward_value
    }

    pub fn xp(&self) -> u32 {
        self.xp
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn sort_order(&self) -> u32 {
        self.sort_order
    }

    // === Builder Methods (also used to hydrate from storage) ===

    pub fn with_id(mut self, id: MissionId) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_target_unit(mut self, unit: Option<String>) -> Self {
        self.target_unit = unit;
        self
    }

    pub fn with_reward(mut self, kind: RewardType, value: u32) -> Self {
        self.reward_kind = kind;
        self.reward_value = value;
        self
    }

    pub fn with_xp(mut self, xp: u32) -> Self {
        self.xp = xp;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }

    pub fn with_sort_order(mut self, sort_order: u32) -> Self {
        self.sort_order = sort_order;
        self
    }

    // === State ===

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// True once the mission's window has fully elapsed.
    pub fn window_closed(&self, now: DateTime<Utc>) -> bool {
        self.ends_at < now
    }
}
