use enumset::EnumSet;

use crate::{
    core::situation::{Multipliers, Situation},
    parameters::{error::SchemaError, table::Table},
    prelude::*,
    quantity::ratios::Multiplier,
};

/// Convert a `Type`/`Value` table into the situational multipliers.
///
/// Situations absent from the table get their default multiplier.
#[instrument(skip_all, fields(n_rows = table.rows.len()))]
pub fn parse_multiplier_table(table: &Table) -> Result<Multipliers, SchemaError> {
    if table.headers.is_empty() {
        return Err(SchemaError::NoColumns);
    }
    let type_column = table.find_column(&["type"], None).unwrap_or(0);
    let value_column = table
        .find_column(&["value"], Some(type_column))
        .or_else(|| (0..table.headers.len()).find(|&index| index != type_column))
        .ok_or(SchemaError::MissingColumn("value"))?;

    let mut seen = EnumSet::<Situation>::empty();
    let mut multipliers = Multipliers::default();
    for (line, row) in table.numbered_rows() {
        let key = row.cell(type_column);
        if key.is_empty() {
            continue;
        }
        let Some(situation) = Situation::from_key(key) else {
            warn!(line, key, "skipped an unknown multiplier");
            continue;
        };
        let value = row.cell(value_column);
        let multiplier = value
            .parse::<f64>()
            .ok()
            .filter(|multiplier| multiplier.is_finite() && *multiplier > 0.0)
            .ok_or_else(|| SchemaError::InvalidMultiplier { situation, value: value.to_owned() })?;
        if !seen.insert(situation) {
            return Err(SchemaError::DuplicateMultiplier(situation));
        }
        multipliers.set(situation, Multiplier(multiplier));
    }

    for situation in EnumSet::all() - seen {
        info!(%situation, default = %situation.default_multiplier(), "using the default multiplier");
    }
    Ok(multipliers)
}
