//! Plan labels for a product batch.
//!
//! Reads a JSON object mapping product ids to product records on stdin and
//! prints one layout outcome per product as JSON.
//!
//! Usage:
//!   plan_labels < products.json
//!   MCMASTER_LABEL_WIDTH=2in MCMASTER_SORT=visual:spectral plan_labels < products.json
//!
//! Environment:
//!   MCMASTER_LABEL_WIDTH, MCMASTER_LABEL_HEIGHT, MCMASTER_IMAGE_RATIO  label geometry
//!   MCMASTER_SORT  fuzzy | fuzzy-clustered | visual[:method] | text[:field]
//!   RUST_LOG       log filter (logs go to stderr)

use std::io::{self, Write};
use std::process::ExitCode;

use label_oxide::planner::LabelPlanner;
use label_oxide::product::read_products;
use label_oxide::sorting::SortSelection;
use label_oxide::{LabelConfig, Result};

const ENV_SORT: &str = "MCMASTER_SORT";

fn run() -> Result<usize> {
    let config = LabelConfig::from_env();
    log::info!(
        "Label {:.2}x{:.2}in, image ratio {:.2}",
        config.label_width_in,
        config.label_height_in,
        config.image_ratio
    );

    let mut planner = LabelPlanner::from_config(&config);
    if let Ok(raw) = std::env::var(ENV_SORT) {
        let selection: SortSelection = raw.parse()?;
        planner = planner.with_sorter(selection.into_sorter());
    }

    let products = read_products(io::stdin().lock())?;
    let outcomes = planner.plan(&products);
    for outcome in &outcomes {
        if let Some(plan) = outcome.plan() {
            log::debug!("{}: {}pt", outcome.id(), plan.base_font_size);
        }
    }
    let failed = outcomes.iter().filter(|o| o.is_failed()).count();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &outcomes)?;
    writeln!(out)?;
    Ok(failed)
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failed) => {
            eprintln!("{} labels could not be laid out", failed);
            ExitCode::from(2)
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}

