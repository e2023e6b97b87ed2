//! Output rendering over a closed set of formats.

pub mod csv;
pub mod json;
pub mod text;

use tickervet_core::BatchResult;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(
    format: OutputFormat,
    results: &[BatchResult],
    float_threshold: u64,
    index_value: Option<f64>,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Text => text::render(results, float_threshold, index_value),
        OutputFormat::Json => json::render(results, float_threshold, index_value),
        OutputFormat::Csv => csv::render(results, float_threshold, index_value),
    }
}
