use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use itertools::Itertools;

use crate::{
    core::{
        quote::{Breakdown, PLATFORM_MARGIN, Request, SUPPLIER_MARGIN},
        situation::{Multipliers, ServiceType},
        urgency::Urgency,
    },
    parameters::Parameters,
    quantity::distance::Kilometers,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

#[must_use]
pub fn build_recap_table(request: &Request, breakdown: &Breakdown) -> Table {
    let mut table = new_table();
    table.set_header(vec!["City", "Distance", "Urgency", "Multiplier", "Service"]);
    table.add_row(vec![
        Cell::new(&request.city).add_attribute(Attribute::Bold),
        Cell::new(request.distance).set_alignment(CellAlignment::Right),
        Cell::new(format!("{} ({})", request.urgency, request.urgency.coefficient())).fg(
            match request.urgency {
                Urgency::Normal => Color::Reset,
                Urgency::Urgent => Color::DarkYellow,
                Urgency::Critical => Color::Red,
            },
        ),
        Cell::new(breakdown.multiplier).set_alignment(CellAlignment::Right),
        Cell::new(ServiceType(request.situations)),
    ]);
    table
}

#[must_use]
pub fn build_breakdown_table(request: &Request, breakdown: &Breakdown) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Item", "Amount", ""]);
    let rows = [
        ("Base charge", Cell::new(breakdown.base_charge), String::new()),
        (
            "Base fixed",
            Cell::new(breakdown.base_fixed),
            format!("{} urgency", request.urgency.coefficient()),
        ),
        ("Rate", Cell::new(breakdown.rate_per_km), String::new()),
        (
            "Distance cost",
            Cell::new(breakdown.distance_cost),
            format!("{} × {}", breakdown.rate_per_km, request.distance),
        ),
        ("Before multiplier", Cell::new(breakdown.subtotal_before_multiplier), String::new()),
        ("Multiplier", Cell::new(breakdown.multiplier), ServiceType(request.situations).to_string()),
        ("After multiplier", Cell::new(breakdown.subtotal), String::new()),
        (
            "Supplier margin",
            Cell::new(breakdown.supplier_margin).add_attribute(Attribute::Dim),
            SUPPLIER_MARGIN.to_string(),
        ),
        ("Carrier price", Cell::new(breakdown.carrier_price), String::new()),
        (
            "Platform margin",
            Cell::new(breakdown.platform_margin).add_attribute(Attribute::Dim),
            PLATFORM_MARGIN.to_string(),
        ),
    ];
    for (label, amount, note) in rows {
        table.add_row(vec![
            Cell::new(label),
            amount.set_alignment(CellAlignment::Right),
            Cell::new(note).add_attribute(Attribute::Dim),
        ]);
    }
    table.add_row(vec![
        Cell::new("Final price, excl. tax").add_attribute(Attribute::Bold),
        Cell::new(breakdown.final_price)
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold)
            .fg(if *breakdown == Breakdown::ZERO { Color::Red } else { Color::Green }),
        Cell::new(""),
    ]);
    table
}

/// One row per city, one column per distance cutoff found in any city.
#[must_use]
pub fn build_rates_table(parameters: &Parameters) -> Table {
    let cutoffs: Vec<Kilometers> = parameters
        .cities
        .values()
        .flat_map(|schedule| schedule.brackets.iter().map(|(cutoff, _)| cutoff))
        .sorted()
        .dedup()
        .collect();

    let mut table = new_table();
    let mut header = vec![Cell::new("City"), Cell::new("Base")];
    header.extend(cutoffs.iter().map(|cutoff| Cell::new(format!("≥ {cutoff}"))));
    table.set_header(header);

    for (city, schedule) in &parameters.cities {
        let mut row = vec![
            Cell::new(city).add_attribute(Attribute::Bold),
            Cell::new(schedule.base_charge).set_alignment(CellAlignment::Right),
        ];
        row.extend(cutoffs.iter().map(|cutoff| {
            schedule
                .brackets
                .iter()
                .find(|(bracket_cutoff, _)| bracket_cutoff == cutoff)
                .map_or_else(
                    || Cell::new("—").add_attribute(Attribute::Dim),
                    |(_, rate)| Cell::new(rate),
                )
                .set_alignment(CellAlignment::Right)
        }));
        table.add_row(row);
    }
    table
}

#[must_use]
pub fn build_multipliers_table(multipliers: &Multipliers) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Situation", "Multiplier"]);
    for (situation, multiplier) in multipliers.iter() {
        table.add_row(vec![
            Cell::new(situation),
            Cell::new(multiplier).set_alignment(CellAlignment::Right).fg(
                if multiplier.0 < 1.0 {
                    Color::Green
                } else if multiplier.0 > 1.0 {
                    Color::Red
                } else {
                    Color::Reset
                },
            ),
        ]);
    }
    table
}

#[must_use]
pub fn build_urgency_table() -> Table {
    let mut table = new_table();
    table.set_header(vec!["Urgency", "Base charge coefficient"]);
    for urgency in [Urgency::Normal, Urgency::Urgent, Urgency::Critical] {
        table.add_row(vec![
            Cell::new(urgency),
            Cell::new(urgency.coefficient()).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_rates_table_lists_every_cutoff() {
        let rendered = build_rates_table(&Parameters::fallback()).to_string();
        assert!(rendered.contains("Tanger"));
        assert!(rendered.contains("Casablanca"));
        assert!(rendered.contains("≥ 50.0 km"));
        assert!(rendered.contains("7.50 MAD/km"));
    }

    #[test]
    fn test_breakdown_table_shows_final_price() {
        let request = Request::builder()
            .city("Tanger")
            .distance(Kilometers(34.0))
            .generated_on(NaiveDate::from_ymd_opt(2025, 10, 15).unwrap())
            .build();
        let parameters = Parameters::fallback();
        let breakdown =
            request.quote(&parameters.cities["Tanger"], &parameters.multipliers).unwrap();
        let rendered = build_breakdown_table(&request, &breakdown).to_string();
        assert!(rendered.contains("248.16 MAD"));
        assert!(rendered.contains("Normal shift, weekday"));
        assert!(rendered.contains("1.00 × urgency"));
        assert!(!rendered.contains("× 1.00 ×"));
    }
}
