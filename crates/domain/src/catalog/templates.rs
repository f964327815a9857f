//! The built-in template pool.
//!
//! Ordering matters only as a stable base for the deterministic weekly
//! shuffle; new templates should be appended so historical weeks keep
//! their selections reproducible within a catalog version.

use super::{Audience, Cadence, MissionCategory, MissionTemplate, Reward, RewardType, Role, TargetType};

/// Bumped whenever the pool composition changes.
pub const CATALOG_VERSION: u32 = 3;

const DRIVER_CARRIER: &[Role] = &[Role::Driver, Role::Carrier];
const CARRIER_BROKER: &[Role] = &[Role::Carrier, Role::Broker];
const SHIPPER_BROKER: &[Role] = &[Role::Shipper, Role::Broker];
const DRIVER_ONLY: &[Role] = &[Role::Driver];
const SHIPPER_ONLY: &[Role] = &[Role::Shipper];
const BROKER_ONLY: &[Role] = &[Role::Broker];

const TEMPLATES: &[MissionTemplate] = &[
    // --- Weekly, role-specific ---
    MissionTemplate {
        key: "steady_hauler",
        name: "Steady Hauler",
        description: "Complete {target} loads this week",
        category: MissionCategory::Deliveries,
        target_type: TargetType::Count,
        target_value: 5.0,
        target_unit: Some("loads"),
        reward: Reward { kind: RewardType::Points, value: 500 },
        xp: 250,
        audience: Audience::Roles(DRIVER_CARRIER),
        cadence: Cadence::Weekly,
    },
    MissionTemplate {
        key: "long_haul_week",
        name: "Long Haul",
        description: "Log {target} miles this week",
        category: MissionCategory::Efficiency,
        target_type: TargetType::Distance,
        target_value: 1500.0,
        target_unit: Some("miles"),
        reward: Reward { kind: RewardType::Points, value: 600 },
        xp: 300,
        audience: Audience::Roles(DRIVER_ONLY),
        cadence: Cadence::Weekly,
    },
    MissionTemplate {
        key: "on_time_pro",
        name: "On-Time Pro",
        description: "Make {target} on-time deliveries",
        category: MissionCategory::Deliveries,
        target_type: TargetType::Streak,
        target_value: 4.0,
        target_unit: Some("deliveries"),
        reward: Reward { kind: RewardType::Points, value: 700 },
        xp: 350,
        audience: Audience::Roles(DRIVER_CARRIER),
        cadence: Cadence::Weekly,
    },
    MissionTemplate {
        key: "safety_first",
        name: "Safety First",
        description: "Pass {target} safety inspections",
        category: MissionCategory::Safety,
        target_type: TargetType::Count,
        target_value: 2.0,
        target_unit: Some("inspections"),
        reward: Reward { kind: RewardType::Badge, value: 1 },
        xp: 200,
        audience: Audience::Roles(DRIVER_ONLY),
        cadence: Cadence::Weekly,
    },
    MissionTemplate {
        key: "five_star_service",
        name: "Five-Star Service",
        description: "Receive {target} five-star ratings",
        category: MissionCategory::Social,
        target_type: TargetType::Rating,
        target_value: 5.0,
        target_unit: Some("ratings"),
        reward: Reward { kind: RewardType::Points, value: 400 },
        xp: 220,
        audience: Audience::Roles(DRIVER_CARRIER),
        cadence: Cadence::Weekly,
    },
    MissionTemplate {
        key: "hours_logged",
        name: "Road Warrior",
        description: "Log {target} on-duty hours",
        category: MissionCategory::Efficiency,
        target_type: TargetType::Time,
        target_value: 30.0,
        target_unit: Some("hours"),
        reward: Reward { kind: RewardType::Points, value: 450 },
        xp: 240,
        audience: Audience::Roles(DRIVER_ONLY),
        cadence: Cadence::Weekly,
    },
    MissionTemplate {
        key: "big_earner",
        name: "Big Earner",
        description: "Earn ${target} in settled payments",
        category: MissionCategory::Earnings,
        target_type: TargetType::Amount,
        target_value: 5000.0,
        target_unit: Some("usd"),
        reward: Reward { kind: RewardType::Credit, value: 50 },
        xp: 400,
        audience: Audience::Roles(DRIVER_CARRIER),
        cadence: Cadence::Weekly,
    },
    MissionTemplate {
        key: "bid_winner",
        name: "Bid Winner",
        description: "Win {target} load bids",
        category: MissionCategory::Earnings,
        target_type: TargetType::Count,
        target_value: 3.0,
        target_unit: Some("bids"),
        reward: Reward { kind: RewardType::Points, value: 350 },
        xp: 180,
        audience: Audience::Roles(CARRIER_BROKER),
        cadence: Cadence::Weekly,
    },
    MissionTemplate {
        key: "load_poster",
        name: "Load Poster",
        description: "Post {target} loads to the board",
        category: MissionCategory::Deliveries,
        target_type: TargetType::Count,
        target_value: 10.0,
        target_unit: Some("loads"),
        reward: Reward { kind: RewardType::Points, value: 400 },
        xp: 200,
        audience: Audience::Roles(SHIPPER_BROKER),
        cadence: Cadence::Weekly,
    },
    MissionTemplate {
        key: "repeat_shipper",
        name: "Repeat Shipper",
        description: "Ship {target} loads this week",
        category: MissionCategory::Deliveries,
        target_type: TargetType::Count,
        target_value: 8.0,
        target_unit: Some("loads"),
        reward: Reward { kind: RewardType::Points, value: 450 },
        xp: 230,
        audience: Audience::Roles(SHIPPER_ONLY),
        cadence: Cadence::Weekly,
    },
    MissionTemplate {
        key: "volume_mover",
        name: "Volume Mover",
        description: "Move ${target} through the platform",
        category: MissionCategory::Earnings,
        target_type: TargetType::Amount,
        target_value: 2000.0,
        target_unit: Some("usd"),
        reward: Reward { kind: RewardType::Credit, value: 25 },
        xp: 260,
        audience: Audience::Roles(SHIPPER_ONLY),
        cadence: Cadence::Weekly,
    },
    MissionTemplate {
        key: "margin_master",
        name: "Margin Master",
        description: "Broker ${target} in settled payments",
        category: MissionCategory::Earnings,
        target_type: TargetType::Amount,
        target_value: 3000.0,
        target_unit: Some("usd"),
        reward: Reward { kind: RewardType::Credit, value: 30 },
        xp: 280,
        audience: Audience::Roles(BROKER_ONLY),
        cadence: Cadence::Weekly,
    },
    // --- Weekly, universal ---
    MissionTemplate {
        key: "network_builder",
        name: "Network Builder",
        description: "Send {target} messages",
        category: MissionCategory::Social,
        target_type: TargetType::Count,
        target_value: 20.0,
        target_unit: Some("messages"),
        reward: Reward { kind: RewardType::Points, value: 200 },
        xp: 100,
        audience: Audience::Universal,
        cadence: Cadence::Weekly,
    },
    MissionTemplate {
        key: "referral_champion",
        name: "Referral Champion",
        description: "Refer {target} new member to the platform",
        category: MissionCategory::Special,
        target_type: TargetType::Count,
        target_value: 1.0,
        target_unit: None,
        reward: Reward { kind: RewardType::Credit, value: 100 },
        xp: 500,
        audience: Audience::Universal,
        cadence: Cadence::Weekly,
    },
    MissionTemplate {
        key: "paperwork_pro",
        name: "Paperwork Pro",
        description: "Upload {target} compliance documents",
        category: MissionCategory::Onboarding,
        target_type: TargetType::Count,
        target_value: 3.0,
        target_unit: Some("documents"),
        reward: Reward { kind: RewardType::Points, value: 150 },
        xp: 120,
        audience: Audience::Universal,
        cadence: Cadence::Weekly,
    },
    MissionTemplate {
        key: "profile_polish",
        name: "Profile Polish",
        description: "Complete {target} profile section",
        category: MissionCategory::Onboarding,
        target_type: TargetType::Count,
        target_value: 1.0,
        target_unit: None,
        reward: Reward { kind: RewardType::Points, value: 100 },
        xp: 80,
        audience: Audience::Universal,
        cadence: Cadence::Weekly,
    },
    // --- Daily, role-specific ---
    MissionTemplate {
        key: "daily_dispatch",
        name: "Daily Dispatch",
        description: "Complete {target} load today",
        category: MissionCategory::Deliveries,
        target_type: TargetType::Count,
        target_value: 1.0,
        target_unit: Some("loads"),
        reward: Reward { kind: RewardType::Points, value: 100 },
        xp: 75,
        audience: Audience::Roles(DRIVER_CARRIER),
        cadence: Cadence::Daily,
    },
    MissionTemplate {
        key: "daily_miles",
        name: "Mile Marker",
        description: "Log {target} miles today",
        category: MissionCategory::Efficiency,
        target_type: TargetType::Distance,
        target_value: 300.0,
        target_unit: Some("miles"),
        reward: Reward { kind: RewardType::Points, value: 120 },
        xp: 90,
        audience: Audience::Roles(DRIVER_ONLY),
        cadence: Cadence::Daily,
    },
    MissionTemplate {
        key: "daily_bid",
        name: "Deal Hunter",
        description: "Place {target} bids today",
        category: MissionCategory::Earnings,
        target_type: TargetType::Count,
        target_value: 2.0,
        target_unit: Some("bids"),
        reward: Reward { kind: RewardType::Points, value: 80 },
        xp: 60,
        audience: Audience::Roles(CARRIER_BROKER),
        cadence: Cadence::Daily,
    },
    MissionTemplate {
        key: "daily_post",
        name: "Board Regular",
        description: "Post {target} loads today",
        category: MissionCategory::Deliveries,
        target_type: TargetType::Count,
        target_value: 2.0,
        target_unit: Some("loads"),
        reward: Reward { kind: RewardType::Points, value: 80 },
        xp: 60,
        audience: Audience::Roles(SHIPPER_BROKER),
        cadence: Cadence::Daily,
    },
    // --- Daily, universal ---
    MissionTemplate {
        key: "daily_checkin",
        name: "Daily Check-In",
        description: "Send {target} messages today",
        category: MissionCategory::Social,
        target_type: TargetType::Count,
        target_value: 3.0,
        target_unit: Some("messages"),
        reward: Reward { kind: RewardType::Points, value: 50 },
        xp: 40,
        audience: Audience::Universal,
        cadence: Cadence::Daily,
    },
    MissionTemplate {
        key: "daily_docs",
        name: "Stay Compliant",
        description: "Upload {target} document today",
        category: MissionCategory::Onboarding,
        target_type: TargetType::Count,
        target_value: 1.0,
        target_unit: None,
        reward: Reward { kind: RewardType::Points, value: 50 },
        xp: 40,
        audience: Audience::Universal,
        cadence: Cadence::Daily,
    },
];

/// The full template pool for the current catalog version.
pub fn catalog() -> &'static [MissionTemplate] {
    TEMPLATES
}
