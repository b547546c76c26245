//! Plain-text rendering of route forecasts

use super::{CityForecast, ForecastOutcome};
use std::fmt::Write;

const NO_DATA_LINE: &str = "Data unavailable for this city🛑.";

/// Render forecasts as chat text: a header per city, one line per day or a
/// fixed no-data line, and a blank line after each city. Temperatures carry
/// one decimal place.
pub fn format_report(results: &[CityForecast]) -> String {
    let mut report = String::new();

    for city in results {
        let _ = writeln!(report, "Weather forecast for {}:", city.location);
        match &city.outcome {
            ForecastOutcome::NoData => {
                let _ = writeln!(report, "{NO_DATA_LINE}");
            }
            ForecastOutcome::Days { days } => {
                for day in days {
                    let _ = writeln!(
                        report,
                        "{}: {:.1} - {:.1} {}, {}",
                        day.date.format("%Y-%m-%d"),
                        day.temp_min,
                        day.temp_max,
                        day.unit.symbol(),
                        day.condition
                    );
                }
            }
        }
        report.push('\n');
    }

    report
}
