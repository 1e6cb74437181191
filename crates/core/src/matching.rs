use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::car::{CarRecommendation, CarRecord};
use crate::domain::contact::ContactEntry;

/// Picks cars for a buyer. Stated preferences are accepted so the call site
/// reads like a recommendation, but selection is uniformly random.
#[derive(Clone, Debug, Default)]
pub struct RandomMatcher;

impl RandomMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Returns at most one car; empty when the catalog is empty.
    pub fn find_matching<R: Rng + ?Sized>(
        &self,
        cars: &[CarRecord],
        _preferences: &str,
        rng: &mut R,
    ) -> Vec<CarRecord> {
        cars.choose(rng).cloned().into_iter().collect()
    }

    pub fn pick_contact<R: Rng + ?Sized>(
        &self,
        directory: &[ContactEntry],
        rng: &mut R,
    ) -> Option<ContactEntry> {
        directory.choose(rng).cloned()
    }

    /// Matches and attaches one contact, shared by every car in the result.
    pub fn recommend<R: Rng + ?Sized>(
        &self,
        cars: &[CarRecord],
        directory: &[ContactEntry],
        preferences: &str,
        rng: &mut R,
    ) -> Vec<CarRecommendation> {
        let matches = self.find_matching(cars, preferences, rng);
        let Some(contact) = self.pick_contact(directory, rng) else {
            return Vec::new();
        };

        matches
            .into_iter()
            .map(|car| CarRecommendation { car, contact: contact.clone() })
            .collect()
    }
}
