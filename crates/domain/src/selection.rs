//! Deterministic mission selection.
//!
//! Selection must be reproducible: re-invoking within the same period, or
//! from a second process, has to yield the identical ordered list, so the
//! shuffle runs on an explicit linear-congruential generator seeded from
//! the period index and role - never the system clock or thread RNG.

use crate::catalog::{catalog, Cadence, MissionTemplate, Role};

/// Weekly missions materialized per role.
pub const WEEKLY_MISSION_COUNT: usize = 5;

/// Daily missions materialized per role.
pub const DAILY_MISSION_COUNT: usize = 2;

/// Numerical Recipes LCG constants; period 2^32 is plenty for a
/// catalog-sized permutation.
struct Lcg(u32);

impl Lcg {
    fn new(seed: u32) -> Self {
        Self(seed)
    }

    fn next(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.0
    }
}

/// Fisher-Yates driven by the LCG.
fn shuffle<T>(items: &mut [T], rng: &mut Lcg) {
    for i in (1..items.len()).rev() {
        let j = (rng.next() % (i as u32 + 1)) as usize;
        items.swap(i, j);
    }
}

fn role_seed(period_index: u32, role: Role) -> u32 {
    period_index
        .wrapping_mul(2_654_435_761)
        .wrapping_add(role.ordinal().wrapping_mul(97))
}

fn universal_seed(period_index: u32) -> u32 {
    period_index.wrapping_mul(2_654_435_761) ^ 0x9E37_79B9
}

/// Universal templates reserved per pick: two of a weekly slate, one of a
/// daily slate, are shared across roles.
fn universal_slots(cadence: Cadence) -> usize {
    match cadence {
        Cadence::Weekly => 2,
        Cadence::Daily => 1,
    }
}

/// Pick `count` templates for a role and cadence in a fixed order.
///
/// Pure function: identical `(period_index, role, cadence, count)` inputs
/// always return the identical list. Role-specific templates fill
/// `count - universal_slots` positions (fewer if the subset is smaller,
/// with universal picks topping the slate back up), universal templates
/// fill the rest.
pub fn select_missions(
    role: Role,
    cadence: Cadence,
    count: usize,
    period_index: u32,
) -> Vec<&'static MissionTemplate> {
    let mut role_specific: Vec<&'static MissionTemplate> = catalog()
        .iter()
        .filter(|t| t.cadence == cadence && !t.audience.is_universal() && t.applies_to(role))
        .collect();
    let mut universal: Vec<&'static MissionTemplate> = catalog()
        .iter()
        .filter(|t| t.cadence == cadence && t.audience.is_universal())
        .collect();

    shuffle(&mut role_specific, &mut Lcg::new(role_seed(period_index, role)));
    shuffle(&mut universal, &mut Lcg::new(universal_seed(period_index)));

    let shared = universal_slots(cadence).min(count);
    let role_take = (count - shared).min(role_specific.len());

    let mut picked: Vec<&'static MissionTemplate> =
        role_specific.into_iter().take(role_take).collect();
    let remaining = count - picked.len();
    picked.extend(universal.into_iter().take(remaining));
    picked
}
