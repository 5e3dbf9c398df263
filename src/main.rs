//! Price tracker entry point.
//!
//! Reads one raw listing blob (a file argument or stdin), runs it through
//! the parser dispatcher and prints the resulting envelope as JSON. With
//! `--save`, a successful parse is also appended to the product catalog.
//!
//! ```text
//! price-tracker [--save] [FILE]
//! ```

use std::io::Read;

use price_tracker::model::ParseResult;
use price_tracker::parser::Dispatcher;
use price_tracker::store::{ProductRecord, ProductStore};
use price_tracker::{config, convert};

fn main() {
    let app_config = config::load_app_config().expect("Failed to load AppConfig");
    tracing_subscriber::fmt()
        .with_max_level(app_config.log_level())
        .init();

    let mut save = false;
    let mut input_path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--save" => save = true,
            _ => input_path = Some(arg),
        }
    }

    let text = read_input(input_path.as_deref());
    let dispatcher = Dispatcher::new();
    let result = dispatcher.parse(&text);

    println!(
        "{}",
        serde_json::to_string_pretty(&result).expect("envelope serializes")
    );

    if !result.success {
        std::process::exit(1);
    }

    if let Some(data) = &result.data {
        report_unit_price(data);

        if save {
            let store_config = config::load_store_config().expect("Failed to load StoreConfig");
            match ProductStore::open(&store_config.path) {
                Ok(store) => match store.insert(&ProductRecord::from_parsed(data)) {
                    Ok(record) => tracing::info!(
                        id = record.id,
                        path = %store_config.path,
                        "Saved product to catalog"
                    ),
                    Err(err) => tracing::error!("Failed to save product: {err}"),
                },
                Err(err) => tracing::error!("Failed to open catalog: {err}"),
            }
        }
    }

    log_warnings(&result);
}

fn read_input(path: Option<&str>) -> String {
    match path {
        Some(path) => std::fs::read_to_string(path).expect("Failed to read input file"),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .expect("Failed to read stdin");
            buffer
        }
    }
}

/// Logs the normalized per-unit price when the record carries enough data.
fn report_unit_price(data: &price_tracker::model::ParsedProduct) {
    let (Some(price), Some(quantity), Some(unit), Some(comparison)) =
        (data.price, data.quantity, data.unit, data.comparison_unit)
    else {
        return;
    };

    if let Some(per_unit) = convert::unit_price(price, quantity, unit, comparison) {
        tracing::info!(
            "Unit price: {:.2} per {}",
            convert::ceil_to_two(per_unit),
            comparison
        );
    }
}

fn log_warnings(result: &ParseResult) {
    for warning in &result.warnings {
        tracing::warn!("{warning}");
    }
}
