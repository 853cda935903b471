//! Post-race statistics pass

use super::race::Race;

/// Recompute distance, average speed and accuracy for every competitor.
///
/// Only the derived fields are touched, so running this again yields the same values.
pub fn derive_statistics(race: &mut Race) {
    let lap_len = race.params().lap_len;
    for athlete in race.athletes_mut() {
        athlete.derive_statistics(lap_len);
    }
    log::debug!("Derived statistics for {} competitors", race.athlete_count());
}

impl Race {
    /// See [`derive_statistics`]
    pub fn derive_statistics(&mut self) {
        derive_statistics(self);
    }
}
