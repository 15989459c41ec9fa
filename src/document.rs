//! Flat quote context and the HTML document rendered from it.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use chrono::NaiveDateTime;
use minijinja::{AutoEscape, Environment};
use serde::Serialize;

use crate::{
    core::{
        quote::{Breakdown, Request},
        situation::Situation,
    },
    prelude::*,
};

/// Built-in quote template.
pub const DEFAULT_TEMPLATE: &str = include_str!("document/quote.html");

/// Named values ready for substitution into a document template.
#[must_use]
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct QuoteContext(BTreeMap<&'static str, String>);

impl QuoteContext {
    pub fn new(request: &Request, breakdown: &Breakdown) -> Self {
        let yes_no = |flag: bool| (if flag { "Yes" } else { "No" }).to_owned();
        let amount = |amount: f64| format!("{amount:.2}");
        Self(BTreeMap::from([
            ("date", request.generated_on.format("%d/%m/%Y").to_string()),
            ("city", request.city.clone()),
            ("distance", format!("{:.1}", request.distance.0)),
            ("urgency", format!("{:.1}", request.urgency.coefficient().0)),
            ("shift", yes_no(!request.situations.contains(Situation::OffHours))),
            ("weekend", yes_no(request.situations.contains(Situation::Weekend))),
            ("holiday", yes_no(request.situations.contains(Situation::Holiday))),
            ("base_fixed", amount(breakdown.base_fixed.0)),
            ("rate_per_km", amount(breakdown.rate_per_km.0)),
            ("distance_cost", amount(breakdown.distance_cost.0)),
            ("subtotal_before_multiplier", amount(breakdown.subtotal_before_multiplier.0)),
            ("multiplier", amount(breakdown.multiplier.0)),
            ("subtotal", amount(breakdown.subtotal.0)),
            ("supplier_margin", amount(breakdown.supplier_margin.0)),
            ("carrier_price", amount(breakdown.carrier_price.0)),
            ("platform_margin", amount(breakdown.platform_margin.0)),
            ("final_price", amount(breakdown.final_price.0)),
            ("currency", "MAD".to_owned()),
        ]))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Render the Jinja template against the context, escaping every value as HTML.
    ///
    /// Undefined names render as empty strings.
    pub fn render(&self, template: &str) -> Result<String> {
        let mut environment = Environment::new();
        environment.set_auto_escape_callback(|_| AutoEscape::Html);
        environment.render_str(template, &self.0).context("failed to render the template")
    }

    /// Render the document and write it into the directory.
    #[instrument(skip_all, fields(directory = %directory.display()))]
    pub fn write_document(
        &self,
        template: &str,
        directory: &Path,
        now: NaiveDateTime,
    ) -> Result<PathBuf> {
        let path = directory.join(file_name(self.get("city").unwrap_or_default(), now));
        std::fs::create_dir_all(directory)
            .with_context(|| format!("failed to create `{}`", directory.display()))?;
        let rendered = self.render(template)?;
        std::fs::write(&path, rendered)
            .with_context(|| format!("failed to write `{}`", path.display()))?;
        info!(path = %path.display(), "written the quote");
        Ok(path)
    }
}

/// For example, `quote_tanger_20251015_1430.html`.
fn file_name(city: &str, now: NaiveDateTime) -> String {
    let city: String = city
        .to_lowercase()
        .chars()
        .map(|char| if char.is_alphanumeric() { char } else { '_' })
        .collect();
    format!("quote_{city}_{}.html", now.format("%Y%m%d_%H%M"))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        core::{
            schedule::{Brackets, RateSchedule},
            situation::Multipliers,
        },
        quantity::{currency::Dirhams, distance::Kilometers},
    };

    fn context() -> Result<QuoteContext> {
        let request = Request::builder()
            .city("Tanger")
            .distance(Kilometers(34.0))
            .situations(Situation::OffHours | Situation::Weekend)
            .generated_on(NaiveDate::from_ymd_opt(2025, 10, 15).unwrap())
            .build();
        let schedule = RateSchedule::builder()
            .base_charge(Dirhams(1.0))
            .brackets(Brackets::from([(10.0, 6.5), (30.0, 4.5)]))
            .build();
        let breakdown = request.quote(&schedule, &Multipliers::default())?;
        Ok(QuoteContext::new(&request, &breakdown))
    }

    #[test]
    fn test_context_values() -> Result {
        let context = context()?;
        assert_eq!(context.get("date"), Some("15/10/2025"));
        assert_eq!(context.get("distance"), Some("34.0"));
        assert_eq!(context.get("urgency"), Some("1.0"));
        assert_eq!(context.get("shift"), Some("No"));
        assert_eq!(context.get("weekend"), Some("Yes"));
        assert_eq!(context.get("holiday"), Some("No"));
        assert_eq!(context.get("rate_per_km"), Some("4.50"));
        assert_eq!(context.get("distance_cost"), Some("153.00"));
        assert_eq!(context.get("multiplier"), Some("0.70"));
        assert_eq!(context.get("final_price"), Some("141.79"));
        Ok(())
    }

    #[test]
    fn test_zeroed_context() {
        let context = QuoteContext::new(
            &Request::builder()
                .city("Tanger")
                .distance(Kilometers(34.0))
                .generated_on(NaiveDate::from_ymd_opt(2025, 10, 15).unwrap())
                .build(),
            &Breakdown::ZERO,
        );
        assert_eq!(context.get("final_price"), Some("0.00"));
        assert_eq!(context.get("shift"), Some("Yes"));
    }

    #[test]
    fn test_render() -> Result {
        let rendered = context()?.render("{{city}}: {{ final_price }} {{currency}}[{{ nope }}]")?;
        assert_eq!(rendered, "Tanger: 141.79 MAD[]");
        Ok(())
    }

    #[test]
    fn test_render_statements_and_filters() -> Result {
        let template = "{{ city | upper }}{% if weekend == 'Yes' %}, weekend{% endif %}\
                        {% if holiday == 'Yes' %}, holiday{% endif %}";
        assert_eq!(context()?.render(template)?, "TANGER, weekend");
        Ok(())
    }

    #[test]
    fn test_render_escapes_values() -> Result {
        let context = QuoteContext(BTreeMap::from([("city", "<Tanger & Co>".to_owned())]));
        assert_eq!(context.render("<b>{{ city }}</b>")?, "<b>&lt;Tanger &amp; Co&gt;</b>");
        Ok(())
    }

    #[test]
    fn test_render_malformed_template() -> Result {
        assert!(context()?.render("{% if city %}unterminated").is_err());
        Ok(())
    }

    #[test]
    fn test_default_template_is_fully_substituted() -> Result {
        let rendered = context()?.render(DEFAULT_TEMPLATE)?;
        assert!(!rendered.contains("{{"));
        assert!(rendered.contains("141.79"));
        Ok(())
    }

    #[test]
    fn test_file_name() {
        let now = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap().and_hms_opt(14, 30, 5).unwrap();
        assert_eq!(file_name("Tanger", now), "quote_tanger_20251015_1430.html");
        assert_eq!(file_name("Fès El Bali", now), "quote_fès_el_bali_20251015_1430.html");
    }
}
