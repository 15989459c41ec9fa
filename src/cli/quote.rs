use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use clap::Parser;
use enumset::EnumSet;

use crate::{
    cli::SourceArgs,
    core::{
        quote::{Breakdown, Request},
        schedule::RateSchedule,
        situation::{Multipliers, Situation},
        urgency::Urgency,
    },
    document::{DEFAULT_TEMPLATE, QuoteContext},
    parameters::ParameterStore,
    prelude::*,
    quantity::distance::Kilometers,
    tables::{build_breakdown_table, build_recap_table},
};

#[derive(Parser)]
pub struct QuoteArgs {
    #[clap(flatten)]
    pub sources: SourceArgs,

    /// Departure city.
    #[clap(long, env = "TARIF_CITY")]
    pub city: String,

    /// Estimated distance in kilometers.
    #[clap(long, allow_negative_numbers = true)]
    pub distance: Kilometers,

    /// Urgency of the request, scales the base charge: normal (1.0), urgent (1.5), or critical (2.0).
    #[clap(long, default_value = "normal")]
    pub urgency: Urgency,

    /// Service outside the normal shift (8:00 to 18:00, Monday to Friday).
    #[clap(long)]
    pub off_hours: bool,

    /// Service during the weekend.
    #[clap(long)]
    pub weekend: bool,

    /// Service on a public holiday.
    #[clap(long)]
    pub holiday: bool,

    /// Print the quote context as JSON instead of the tables.
    #[clap(long)]
    pub json: bool,

    /// Write the HTML quote into the directory.
    #[clap(long, env = "TARIF_DOCUMENT_DIR")]
    pub document_dir: Option<PathBuf>,

    /// Quote template with `{{ name }}` placeholders, replaces the built-in one.
    #[clap(long, env = "TARIF_TEMPLATE")]
    pub template: Option<PathBuf>,
}

impl QuoteArgs {
    pub fn situations(&self) -> EnumSet<Situation> {
        [
            (self.off_hours, Situation::OffHours),
            (self.weekend, Situation::Weekend),
            (self.holiday, Situation::Holiday),
        ]
        .into_iter()
        .filter_map(|(is_applicable, situation)| is_applicable.then_some(situation))
        .collect()
    }
}

/// Quote the trip.
///
/// Failures to load the parameters, to compute the price, or to write the document never fail
/// the command: they are reported as advisories next to whatever could still be shown.
#[instrument(skip_all)]
pub fn quote(args: &QuoteArgs, store: &mut ParameterStore) -> Result {
    let loaded = store.get_or_load(&args.sources.sources());
    let mut advisories: Vec<String> = loaded.advisory.iter().cloned().collect();
    let parameters = &loaded.parameters;

    let Some((city, schedule)) = parameters.schedule_or_first(&args.city) else {
        bail!("no cities to quote from");
    };
    if city != args.city {
        warn!(requested = %args.city, used = city, "unknown city");
        advisories.push(format!("Unknown city `{}`, quoting from {city} instead.", args.city));
    }

    let now = Local::now().naive_local();
    let request = Request::builder()
        .city(city)
        .distance(args.distance)
        .urgency(args.urgency)
        .situations(args.situations())
        .generated_on(now.date())
        .build();
    let breakdown = quote_or_zero(&request, schedule, &parameters.multipliers, &mut advisories);
    info!(final_price = %breakdown.final_price, "quoted");

    let context = QuoteContext::new(&request, &breakdown);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&context)?);
    } else {
        println!("{}", build_recap_table(&request, &breakdown));
        println!("{}", build_breakdown_table(&request, &breakdown));
    }

    if let Some(directory) = &args.document_dir {
        let template = args.template.as_ref();
        if let Some(path) = write_or_advise(&context, template, directory, now, &mut advisories) {
            eprintln!("Quote written to {}", path.display());
        }
    }

    for advisory in advisories {
        eprintln!("⚠ {advisory}");
    }
    Ok(())
}

/// Compute the quote, or fall back to the zeroed breakdown and report the reason.
fn quote_or_zero(
    request: &Request,
    schedule: &RateSchedule,
    multipliers: &Multipliers,
    advisories: &mut Vec<String>,
) -> Breakdown {
    request.quote(schedule, multipliers).unwrap_or_else(|error| {
        error!(error = format!("{error:#}"), "failed to compute the quote");
        advisories.push(format!("Calculation error: {error}."));
        Breakdown::ZERO
    })
}

/// Write the quote document, reporting the failure, if any, as an advisory.
fn write_or_advise(
    context: &QuoteContext,
    template: Option<&PathBuf>,
    directory: &Path,
    now: NaiveDateTime,
    advisories: &mut Vec<String>,
) -> Option<PathBuf> {
    read_template(template)
        .and_then(|template| context.write_document(&template, directory, now))
        .inspect_err(|error| {
            error!(error = format!("{error:#}"), "failed to write the quote");
            advisories.push(format!("Failed to generate the quote document: {error:#}."));
        })
        .ok()
}

fn read_template(path: Option<&PathBuf>) -> Result<String> {
    path.map_or_else(
        || Ok(DEFAULT_TEMPLATE.to_owned()),
        |path| {
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read the template `{}`", path.display()))
        },
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        cli::{Args, Command},
        parameters::Parameters,
    };

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 15).unwrap().and_hms_opt(14, 30, 0).unwrap()
    }

    fn request(distance: f64) -> Request {
        Request::builder()
            .city("Tanger")
            .distance(Kilometers(distance))
            .generated_on(now().date())
            .build()
    }

    fn parse(args: &[&str]) -> QuoteArgs {
        let args = Args::try_parse_from(args).unwrap();
        match args.command {
            Command::Quote(args) => *args,
            Command::Parameters(_) => unreachable!(),
        }
    }

    #[test]
    fn test_parse_quote_args() {
        let args = parse(&[
            "tarif",
            "quote",
            "--city",
            "Tanger",
            "--distance",
            "34",
            "--urgency",
            "1.5",
            "--off-hours",
            "--holiday",
        ]);
        assert_eq!(args.city, "Tanger");
        assert_eq!(args.distance, Kilometers(34.0));
        assert_eq!(args.urgency, Urgency::Urgent);
        assert_eq!(args.situations(), Situation::OffHours | Situation::Holiday);
        assert!(!args.json);
    }

    #[test]
    fn test_default_urgency_and_situations() {
        let args = parse(&["tarif", "quote", "--city", "Tanger", "--distance", "12.5"]);
        assert_eq!(args.urgency, Urgency::Normal);
        assert!(args.situations().is_empty());
    }

    #[test]
    fn test_read_default_template() -> Result {
        assert_eq!(read_template(None)?, DEFAULT_TEMPLATE);
        assert!(read_template(Some(&PathBuf::from("/nonexistent/quote.html"))).is_err());
        Ok(())
    }

    #[test]
    fn test_quote_or_zero_ok() {
        let parameters = Parameters::fallback();
        let mut advisories = Vec::new();
        let breakdown = quote_or_zero(
            &request(34.0),
            &parameters.cities["Tanger"],
            &parameters.multipliers,
            &mut advisories,
        );
        assert_abs_diff_eq!(breakdown.final_price.0, 248.16, epsilon = 1e-9);
        assert!(advisories.is_empty());
    }

    #[test]
    fn test_invalid_distance_gives_zeroed_breakdown() {
        let parameters = Parameters::fallback();
        for distance in [-3.0, f64::NAN] {
            let mut advisories = Vec::new();
            let breakdown = quote_or_zero(
                &request(distance),
                &parameters.cities["Tanger"],
                &parameters.multipliers,
                &mut advisories,
            );
            assert_eq!(breakdown, Breakdown::ZERO);
            assert_eq!(advisories.len(), 1);
            assert!(advisories[0].starts_with("Calculation error"));
        }
    }

    #[test]
    fn test_write_or_advise_ok() {
        let directory = std::env::temp_dir().join(format!("tarif-quotes-{}", std::process::id()));
        let context = QuoteContext::new(&request(34.0), &Breakdown::ZERO);
        let mut advisories = Vec::new();
        let path = write_or_advise(&context, None, &directory, now(), &mut advisories);
        let _ = std::fs::remove_dir_all(&directory);
        assert_eq!(path, Some(directory.join("quote_tanger_20251015_1430.html")));
        assert!(advisories.is_empty());
    }

    #[test]
    fn test_unwritable_directory_becomes_advisory() {
        // A regular file cannot be used as the output directory.
        let directory = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
        let context = QuoteContext::new(&request(34.0), &Breakdown::ZERO);
        let mut advisories = Vec::new();
        assert!(write_or_advise(&context, None, &directory, now(), &mut advisories).is_none());
        assert_eq!(advisories.len(), 1);
        assert!(advisories[0].starts_with("Failed to generate the quote document"));
    }

    #[test]
    fn test_unreadable_template_becomes_advisory() {
        let template = PathBuf::from("/nonexistent/quote.html");
        let directory = std::env::temp_dir();
        let context = QuoteContext::new(&request(34.0), &Breakdown::ZERO);
        let mut advisories = Vec::new();
        let path = write_or_advise(&context, Some(&template), &directory, now(), &mut advisories);
        assert!(path.is_none());
        assert_eq!(advisories.len(), 1);
        assert!(advisories[0].contains("/nonexistent/quote.html"));
    }
}
