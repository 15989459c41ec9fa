//! Parameter document with an explicit schema, as an alternative to the spreadsheet tables.
//!
//! ```toml
//! [multipliers]
//! off_hours = 0.75
//! weekend = 0.93
//! holiday = 1.1
//!
//! [cities.Tanger]
//! base_charge = 1.0
//! brackets = { 10 = 6.5, 30 = 5.5, 50 = 4.5 }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    core::{
        schedule::{Brackets, RateSchedule},
        situation::{Multipliers, Situation},
    },
    parameters::{Parameters, error::SchemaError},
    quantity::{
        currency::{Dirhams, KilometerRate},
        distance::Kilometers,
        ratios::Multiplier,
    },
};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    #[serde(default)]
    pub multipliers: MultiplierSection,

    #[serde(default)]
    pub cities: BTreeMap<String, CitySection>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MultiplierSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub off_hours: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekend: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holiday: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CitySection {
    pub base_charge: f64,

    /// Per-kilometer rates keyed by the distance cutoff, optionally suffixed with `km`.
    #[serde(default)]
    pub brackets: BTreeMap<String, f64>,
}

impl Document {
    pub fn into_parameters(self) -> Result<Parameters, SchemaError> {
        let mut multipliers = Multipliers::default();
        for (situation, value) in [
            (Situation::OffHours, self.multipliers.off_hours),
            (Situation::Weekend, self.multipliers.weekend),
            (Situation::Holiday, self.multipliers.holiday),
        ] {
            let Some(value) = value else { continue };
            if !value.is_finite() || value <= 0.0 {
                return Err(SchemaError::InvalidMultiplier { situation, value: value.to_string() });
            }
            multipliers.set(situation, Multiplier(value));
        }

        let mut cities = BTreeMap::new();
        for (row, (city, section)) in self.cities.into_iter().enumerate() {
            let row = row + 1;
            if !section.base_charge.is_finite() || section.base_charge < 0.0 {
                return Err(SchemaError::InvalidAmount {
                    row,
                    column: format!("{city}.base_charge"),
                    value: section.base_charge.to_string(),
                });
            }
            let mut brackets = Brackets::default();
            for (key, rate) in section.brackets {
                let cutoff = Kilometers::parse_cutoff(&key)
                    .ok_or_else(|| SchemaError::InvalidCutoff(key.clone()))?;
                if !rate.is_finite() || rate < 0.0 {
                    return Err(SchemaError::InvalidAmount {
                        row,
                        column: format!("{city}.brackets.{key}"),
                        value: rate.to_string(),
                    });
                }
                brackets
                    .insert_new(cutoff, KilometerRate(rate))
                    .map_err(|_| SchemaError::DuplicateCutoff { cutoff, column: key })?;
            }
            cities.insert(
                city,
                RateSchedule::builder()
                    .base_charge(Dirhams(section.base_charge))
                    .brackets(brackets)
                    .build(),
            );
        }
        if cities.is_empty() {
            return Err(SchemaError::NoCities);
        }

        Ok(Parameters { cities, multipliers })
    }
}

impl From<&Parameters> for Document {
    fn from(parameters: &Parameters) -> Self {
        let multipliers = &parameters.multipliers;
        Self {
            multipliers: MultiplierSection {
                off_hours: Some(multipliers.get(Situation::OffHours).0),
                weekend: Some(multipliers.get(Situation::Weekend).0),
                holiday: Some(multipliers.get(Situation::Holiday).0),
            },
            cities: parameters
                .cities
                .iter()
                .map(|(city, schedule)| {
                    let section = CitySection {
                        base_charge: schedule.base_charge.0,
                        brackets: schedule
                            .brackets
                            .iter()
                            .map(|(cutoff, rate)| (cutoff.0.to_string(), rate.0))
                            .collect(),
                    };
                    (city.clone(), section)
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_into_parameters_ok() -> Result {
        // language=toml
        let text = r#"
            [multipliers]
            weekend = 0.9

            [cities.Tanger]
            base_charge = 1.0
            brackets = { 10 = 6.5, "30 km" = 5.5, 50 = 4.5 }

            [cities.Casablanca]
            base_charge = 3.0
        "#;
        let parameters = toml::from_str::<Document>(text)?.into_parameters()?;
        assert_eq!(parameters.multipliers.get(Situation::Weekend), Multiplier(0.9));
        assert_eq!(parameters.multipliers.get(Situation::Holiday), Multiplier(1.1));
        assert_eq!(parameters.cities["Tanger"].brackets.len(), 3);
        assert_eq!(
            parameters.cities["Tanger"].brackets.rate_for_distance(Kilometers(34.0)),
            KilometerRate(5.5),
        );
        assert!(parameters.cities["Casablanca"].brackets.is_empty());
        Ok(())
    }

    #[test]
    fn test_colliding_cutoffs_are_rejected() -> Result {
        let text = r#"
            [cities.Tanger]
            base_charge = 1.0
            brackets = { 10 = 6.5, "10 km" = 6.0 }
        "#;
        let result = toml::from_str::<Document>(text)?.into_parameters();
        assert!(matches!(result, Err(SchemaError::DuplicateCutoff { .. })));
        Ok(())
    }

    #[test]
    fn test_invalid_cutoff_is_rejected() -> Result {
        let text = r#"
            [cities.Tanger]
            base_charge = 1.0
            brackets = { far = 6.5 }
        "#;
        let result = toml::from_str::<Document>(text)?.into_parameters();
        assert!(matches!(result, Err(SchemaError::InvalidCutoff(key)) if key == "far"));
        Ok(())
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(toml::from_str::<Document>("[multipliers]\nnight = 1.5\n").is_err());
    }

    #[test]
    fn test_export_is_accepted_back() -> Result {
        let exported = toml::to_string_pretty(&Document::from(&Parameters::fallback()))?;
        let parameters = toml::from_str::<Document>(&exported)?.into_parameters()?;
        assert_eq!(parameters, Parameters::fallback());
        Ok(())
    }
}
