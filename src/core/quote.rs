use bon::Builder;
use chrono::NaiveDate;
use enumset::EnumSet;

use crate::{
    core::{
        schedule::RateSchedule,
        situation::{Multipliers, Situation},
        urgency::Urgency,
    },
    prelude::*,
    quantity::{
        currency::{Dirhams, KilometerRate},
        distance::Kilometers,
        ratios::{Multiplier, Percentage},
    },
};

/// Markup of the carrier on top of the subtotal.
pub const SUPPLIER_MARGIN: Percentage = Percentage(10.0);

/// Markup of the platform on top of the carrier price.
pub const PLATFORM_MARGIN: Percentage = Percentage(20.0);

#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("distance must be a finite non-negative number, got {0:?}")]
    InvalidDistance(Kilometers),

    #[error("the final price is not a finite amount ({0:?})")]
    NonFinitePrice(Dirhams),
}

/// Everything the customer asked for.
#[must_use]
#[derive(Clone, Debug, Builder)]
pub struct Request {
    #[builder(into)]
    pub city: String,

    pub distance: Kilometers,

    #[builder(default)]
    pub urgency: Urgency,

    /// Applicable situations, each of which scales the subtotal.
    #[builder(default)]
    pub situations: EnumSet<Situation>,

    pub generated_on: NaiveDate,
}

impl Request {
    /// Price the trip.
    ///
    /// The pipeline is: urgency-adjusted base charge plus distance cost, scaled by the combined
    /// situational multiplier, then the supplier margin and the platform margin stacked on top
    /// one after another.
    #[instrument(skip_all, fields(city = %self.city, distance = %self.distance))]
    pub fn quote(
        &self,
        schedule: &RateSchedule,
        multipliers: &Multipliers,
    ) -> Result<Breakdown, QuoteError> {
        if !self.distance.is_finite() || self.distance < Kilometers::ZERO {
            return Err(QuoteError::InvalidDistance(self.distance));
        }

        let base_fixed = schedule.base_charge * self.urgency.coefficient();
        let rate_per_km = schedule.brackets.rate_for_distance(self.distance);
        let multiplier = multipliers.combined(self.situations);
        let distance_cost = rate_per_km * self.distance;
        let subtotal_before_multiplier = base_fixed + distance_cost;
        let subtotal = subtotal_before_multiplier * multiplier;
        let supplier_margin = subtotal * SUPPLIER_MARGIN;
        let carrier_price = subtotal + supplier_margin;
        let platform_margin = carrier_price * PLATFORM_MARGIN;
        let final_price = carrier_price + platform_margin;

        if !final_price.is_finite() {
            return Err(QuoteError::NonFinitePrice(final_price));
        }
        debug!(%final_price, "quoted");

        Ok(Breakdown {
            base_charge: schedule.base_charge,
            base_fixed,
            rate_per_km,
            distance_cost,
            subtotal_before_multiplier,
            multiplier,
            subtotal,
            supplier_margin,
            carrier_price,
            platform_margin,
            final_price,
        })
    }
}

/// Every line item of a quote, from the base charge to the final client price.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Breakdown {
    pub base_charge: Dirhams,

    /// Base charge scaled by the urgency coefficient.
    pub base_fixed: Dirhams,

    pub rate_per_km: KilometerRate,
    pub distance_cost: Dirhams,
    pub subtotal_before_multiplier: Dirhams,

    /// Combined situational multiplier.
    pub multiplier: Multiplier,

    /// Subtotal after the situational multiplier.
    pub subtotal: Dirhams,

    pub supplier_margin: Dirhams,

    /// What the carrier is paid: the subtotal plus the supplier margin.
    pub carrier_price: Dirhams,

    pub platform_margin: Dirhams,

    /// Price to propose to the client, excluding taxes.
    pub final_price: Dirhams,
}

impl Breakdown {
    /// Shown in place of a quote that could not be computed.
    pub const ZERO: Self = Self {
        base_charge: Dirhams::ZERO,
        base_fixed: Dirhams::ZERO,
        rate_per_km: KilometerRate::ZERO,
        distance_cost: Dirhams::ZERO,
        subtotal_before_multiplier: Dirhams::ZERO,
        multiplier: Multiplier::ZERO,
        subtotal: Dirhams::ZERO,
        supplier_margin: Dirhams::ZERO,
        carrier_price: Dirhams::ZERO,
        platform_margin: Dirhams::ZERO,
        final_price: Dirhams::ZERO,
    };
}
