use std::collections::{BTreeMap, btree_map::Entry};

use bon::Builder;

use crate::quantity::{
    currency::{Dirhams, KilometerRate},
    distance::Kilometers,
};

/// City tariff: a fixed charge plus a distance-based step function of per-kilometer rates.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Builder)]
pub struct RateSchedule {
    /// Charged once per trip, independently of the distance.
    pub base_charge: Dirhams,

    #[builder(default)]
    pub brackets: Brackets,
}

/// Per-kilometer rates keyed by the distance cutoff from which they apply.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Brackets(BTreeMap<Kilometers, KilometerRate>);

impl Brackets {
    /// Insert the bracket unless its cutoff is already taken, in which case the existing rate is
    /// returned and the brackets are left untouched.
    pub fn insert_new(
        &mut self,
        cutoff: Kilometers,
        rate: KilometerRate,
    ) -> Result<(), KilometerRate> {
        match self.0.entry(cutoff) {
            Entry::Vacant(entry) => {
                entry.insert(rate);
                Ok(())
            }
            Entry::Occupied(entry) => Err(*entry.get()),
        }
    }

    /// Rate of the highest tier the distance qualifies for.
    ///
    /// A distance equal to a cutoff falls into that cutoff's tier. A distance below every cutoff
    /// still pays the lowest tier rate, so that a trip is never charged zero per kilometer
    /// unless there are no brackets at all.
    pub fn rate_for_distance(&self, distance: Kilometers) -> KilometerRate {
        self.0
            .range(..=distance)
            .next_back()
            .or_else(|| self.0.first_key_value())
            .map_or(KilometerRate::ZERO, |(_, rate)| *rate)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Kilometers, KilometerRate)> + '_ {
        self.0.iter().map(|(cutoff, rate)| (*cutoff, *rate))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(f64, f64); N]> for Brackets {
    fn from(brackets: [(f64, f64); N]) -> Self {
        Self(
            brackets
                .into_iter()
                .map(|(cutoff, rate)| (Kilometers(cutoff), KilometerRate(rate)))
                .collect(),
        )
    }
}
