use std::fmt::{Display, Formatter};

use enumset::EnumSet;

use crate::quantity::ratios::Multiplier;

/// Timing condition that scales the base-plus-distance subtotal.
#[derive(Debug, enumset::EnumSetType)]
pub enum Situation {
    /// Outside the normal shift (8:00 to 18:00, Monday to Friday).
    OffHours,

    Weekend,

    /// Public holiday.
    Holiday,
}

impl Situation {
    pub const fn default_multiplier(self) -> Multiplier {
        match self {
            Self::OffHours => Multiplier(0.75),
            Self::Weekend => Multiplier(0.93),
            Self::Holiday => Multiplier(1.1),
        }
    }

    /// Recognise a multiplier table key, ignoring case, spaces, dashes, and underscores.
    ///
    /// `non_normal` is what the shared spreadsheets call the off-hours multiplier.
    pub fn from_key(key: &str) -> Option<Self> {
        let normalized: String = key
            .chars()
            .filter(|char| !matches!(char, '_' | '-' | ' '))
            .map(|char| char.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "offhours" | "nonnormal" => Some(Self::OffHours),
            "weekend" => Some(Self::Weekend),
            "holiday" | "holidays" => Some(Self::Holiday),
            _ => None,
        }
    }
}

impl Display for Situation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OffHours => write!(f, "Off-hours"),
            Self::Weekend => write!(f, "Weekend"),
            Self::Holiday => write!(f, "Holiday"),
        }
    }
}

/// Situational multipliers, complete for every [`Situation`].
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Multipliers {
    off_hours: Multiplier,
    weekend: Multiplier,
    holiday: Multiplier,
}

impl Default for Multipliers {
    fn default() -> Self {
        Self {
            off_hours: Situation::OffHours.default_multiplier(),
            weekend: Situation::Weekend.default_multiplier(),
            holiday: Situation::Holiday.default_multiplier(),
        }
    }
}

impl Multipliers {
    pub const fn get(&self, situation: Situation) -> Multiplier {
        match situation {
            Situation::OffHours => self.off_hours,
            Situation::Weekend => self.weekend,
            Situation::Holiday => self.holiday,
        }
    }

    pub fn set(&mut self, situation: Situation, multiplier: Multiplier) {
        match situation {
            Situation::OffHours => self.off_hours = multiplier,
            Situation::Weekend => self.weekend = multiplier,
            Situation::Holiday => self.holiday = multiplier,
        }
    }

    /// Product of the multipliers of all the applicable situations.
    pub fn combined(&self, situations: EnumSet<Situation>) -> Multiplier {
        situations
            .iter()
            .map(|situation| self.get(situation))
            .fold(Multiplier::ONE, |product, multiplier| product * multiplier)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Situation, Multiplier)> + '_ {
        EnumSet::<Situation>::all().into_iter().map(|situation| (situation, self.get(situation)))
    }
}

/// Human-readable service type, for example «Special shift, weekend».
pub struct ServiceType(pub EnumSet<Situation>);

impl Display for ServiceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let shift = if self.0.contains(Situation::OffHours) { "Special" } else { "Normal" };
        let day = if self.0.contains(Situation::Holiday) {
            "holiday"
        } else if self.0.contains(Situation::Weekend) {
            "weekend"
        } else {
            "weekday"
        };
        write!(f, "{shift} shift, {day}")
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_defaults() {
        let multipliers = Multipliers::default();
        assert_eq!(multipliers.get(Situation::OffHours), Multiplier(0.75));
        assert_eq!(multipliers.get(Situation::Weekend), Multiplier(0.93));
        assert_eq!(multipliers.get(Situation::Holiday), Multiplier(1.1));
    }

    #[test]
    fn test_combined_off_hours_weekend() {
        let combined =
            Multipliers::default().combined(Situation::OffHours | Situation::Weekend);
        assert_abs_diff_eq!(combined.0, 0.6975, epsilon = 1e-12);
    }

    #[test]
    fn test_combined_nothing_applies() {
        assert_eq!(Multipliers::default().combined(EnumSet::empty()), Multiplier::ONE);
    }

    #[test]
    fn test_combined_all_three() {
        let combined = Multipliers::default().combined(EnumSet::all());
        assert_abs_diff_eq!(combined.0, 0.75 * 0.93 * 1.1, epsilon = 1e-12);
    }

    #[test]
    fn test_from_key() {
        assert_eq!(Situation::from_key("non_normal"), Some(Situation::OffHours));
        assert_eq!(Situation::from_key("Off-Hours"), Some(Situation::OffHours));
        assert_eq!(Situation::from_key("offHours"), Some(Situation::OffHours));
        assert_eq!(Situation::from_key(" WEEKEND "), Some(Situation::Weekend));
        assert_eq!(Situation::from_key("Holidays"), Some(Situation::Holiday));
        assert_eq!(Situation::from_key("night"), None);
    }

    #[test]
    fn test_service_type() {
        assert_eq!(ServiceType(EnumSet::empty()).to_string(), "Normal shift, weekday");
        assert_eq!(
            ServiceType(Situation::OffHours | Situation::Weekend).to_string(),
            "Special shift, weekend",
        );
        assert_eq!(
            ServiceType(Situation::Weekend | Situation::Holiday).to_string(),
            "Normal shift, holiday",
        );
    }

    proptest! {
        #[test]
        fn test_combined_is_order_independent(
            off_hours in 0.01..5.0_f64,
            weekend in 0.01..5.0_f64,
            holiday in 0.01..5.0_f64,
            mask in 0_u8..8,
        ) {
            let mut multipliers = Multipliers::default();
            multipliers.set(Situation::OffHours, Multiplier(off_hours));
            multipliers.set(Situation::Weekend, Multiplier(weekend));
            multipliers.set(Situation::Holiday, Multiplier(holiday));
            let situations: EnumSet<Situation> = EnumSet::<Situation>::all()
                .iter()
                .enumerate()
                .filter(|(index, _)| mask & (1 << index) != 0)
                .map(|(_, situation)| situation)
                .collect();
            let forward = multipliers.combined(situations);
            let mut reversed: Vec<Situation> = situations.iter().collect();
            reversed.reverse();
            let backward =
                reversed.into_iter().map(|situation| multipliers.get(situation).0).product::<f64>();
            prop_assert!((forward.0 - backward).abs() <= 1e-12 * backward.abs().max(1.0));
        }
    }
}
