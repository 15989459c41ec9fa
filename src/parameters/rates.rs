use std::collections::{BTreeMap, BTreeSet};

use crate::{
    core::schedule::{Brackets, RateSchedule},
    parameters::{
        error::SchemaError,
        table::{Table, parse_amount},
    },
    prelude::*,
    quantity::{
        currency::{Dirhams, KilometerRate},
        distance::Kilometers,
    },
};

/// Which column holds what in a rate table.
#[derive(Debug, PartialEq, Eq)]
struct Layout {
    city: usize,
    base: usize,

    /// Bracket columns with their cutoffs.
    brackets: Vec<(usize, Kilometers)>,
}

impl Layout {
    fn infer(table: &Table) -> Result<Self, SchemaError> {
        if table.headers.is_empty() {
            return Err(SchemaError::NoColumns);
        }
        let city = table.find_column(&["city", "ville"], None).unwrap_or(0);
        let base = table
            .find_column(&["base"], Some(city))
            .or_else(|| (0..table.headers.len()).find(|&index| index != city))
            .ok_or(SchemaError::MissingColumn("base"))?;

        let mut cutoffs = BTreeSet::new();
        let mut brackets = Vec::new();
        for (index, header) in table.headers.iter().enumerate() {
            if index == city || index == base {
                continue;
            }
            let Some(cutoff) = Kilometers::parse_cutoff(header) else {
                debug!(column = %header, "skipped a column without a distance cutoff");
                continue;
            };
            if !cutoffs.insert(cutoff) {
                return Err(SchemaError::DuplicateCutoff { cutoff, column: header.clone() });
            }
            brackets.push((index, cutoff));
        }

        debug!(
            city = %table.headers[city],
            base = %table.headers[base],
            n_brackets = brackets.len(),
            "inferred the rate table layout",
        );
        Ok(Self { city, base, brackets })
    }
}

/// Convert a rate table, one row per city, into typed rate schedules.
///
/// Rows without a city name are skipped, blank bracket cells mean that the city has no such
/// bracket. Everything else must be a valid non-negative amount.
#[instrument(skip_all, fields(n_rows = table.rows.len()))]
pub fn parse_rate_table(table: &Table) -> Result<BTreeMap<String, RateSchedule>, SchemaError> {
    let layout = Layout::infer(table)?;
    let column_name = |index: usize| table.headers[index].clone();

    let mut cities = BTreeMap::new();
    for (line, row) in table.numbered_rows() {
        let city = row.cell(layout.city);
        if city.is_empty() {
            debug!(line, "skipped a row without a city");
            continue;
        }

        let base_charge = match row.cell(layout.base) {
            "" => {
                return Err(SchemaError::MissingValue {
                    row: line,
                    column: column_name(layout.base),
                });
            }
            value => parse_amount(value).ok_or_else(|| SchemaError::InvalidAmount {
                row: line,
                column: column_name(layout.base),
                value: value.to_owned(),
            })?,
        };

        let mut brackets = Brackets::default();
        for &(index, cutoff) in &layout.brackets {
            let value = row.cell(index);
            if value.is_empty() {
                continue;
            }
            let rate = parse_amount(value).ok_or_else(|| SchemaError::InvalidAmount {
                row: line,
                column: column_name(index),
                value: value.to_owned(),
            })?;
            brackets
                .insert_new(cutoff, KilometerRate(rate))
                .map_err(|_| SchemaError::DuplicateCutoff { cutoff, column: column_name(index) })?;
        }

        if brackets.is_empty() {
            debug!(line, city, "no distance brackets, only the base charge applies");
        } else {
            debug!(line, city, n_brackets = brackets.len(), "parsed the brackets");
        }
        let schedule =
            RateSchedule::builder().base_charge(Dirhams(base_charge)).brackets(brackets).build();
        if cities.insert(city.to_owned(), schedule).is_some() {
            return Err(SchemaError::DuplicateCity(city.to_owned()));
        }
    }

    if cities.is_empty() {
        return Err(SchemaError::NoCities);
    }
    info!(n_cities = cities.len(), "parsed the rate table");
    Ok(cities)
}
