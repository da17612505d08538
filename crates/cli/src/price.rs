//! `cargos price` - inspect the catalog's price matrix.

use serde::Serialize;

use cargos_core::{LocalityGroup, Money, SizeTier};
use cargos_engine::{normalize_garment, price_for, Pipeline, PriceLookup, Resolution};

use crate::exit_codes::{EXIT_ERROR, EXIT_ISSUES, EXIT_USAGE};
use crate::CliError;

#[derive(Debug, Serialize)]
struct PriceCell<'a> {
    occupation: &'a str,
    garment: &'a str,
    size_tier: SizeTier,
    locality: LocalityGroup,
    price: Option<Money>,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CliError {
        code: EXIT_ERROR,
        message: format!("JSON serialization error: {e}"),
        hint: None,
    })?;
    println!("{json}");
    Ok(())
}

fn show(price: Option<Money>) -> String {
    price.map(Money::soles).unwrap_or_else(|| "-".to_string())
}

/// Every occupation x garment x size tier x locality cell.
pub fn cmd_matrix(pipeline: &Pipeline<'_>, json: bool) -> Result<(), CliError> {
    let mut cells = Vec::new();
    for occupation in pipeline.snapshot().active_occupations() {
        for garment in &occupation.garments {
            for tier in SizeTier::ALL {
                for locality in LocalityGroup::ALL {
                    cells.push(PriceCell {
                        occupation: &occupation.key,
                        garment: &garment.garment_type,
                        size_tier: tier,
                        locality,
                        price: garment.prices.get(tier, locality),
                    });
                }
            }
        }
    }

    if json {
        return print_json(&cells);
    }
    println!("{:<28} {:<16} {:<6} {:<11} PRICE", "OCCUPATION", "GARMENT", "SIZE", "LOCALITY");
    for cell in &cells {
        println!(
            "{:<28} {:<16} {:<6} {:<11} {}",
            cell.occupation,
            cell.garment,
            cell.size_tier.label(),
            cell.locality.key(),
            show(cell.price)
        );
    }
    Ok(())
}

/// Unit price for one occupation label, garment column and size at a store.
pub fn cmd_single(
    pipeline: &Pipeline<'_>,
    occupation: &str,
    garment: &str,
    size: &str,
    store: Option<&str>,
    json: bool,
) -> Result<(), CliError> {
    let key = match pipeline.resolver().resolve(occupation) {
        Resolution::Known(key) => key,
        Resolution::Unknown => {
            return Err(CliError {
                code: EXIT_USAGE,
                message: format!("occupation '{occupation}' is not in the catalog"),
                hint: Some("`cargos price --matrix` lists the configured occupations".to_string()),
            })
        }
    };
    let Some(definition) = pipeline.snapshot().occupation(&key) else {
        return Err(CliError {
            code: EXIT_ERROR,
            message: format!("occupation '{key}' resolved but has no catalog entry"),
            hint: None,
        });
    };

    let garment_type = normalize_garment(garment);
    let tier = SizeTier::from_size(size);
    let locality = store.map(|s| pipeline.locality_for(s)).unwrap_or(pipeline.snapshot().default_locality);
    let lookup = price_for(definition, &garment_type, tier, locality);

    if json {
        print_json(&PriceCell {
            occupation: &key,
            garment: &garment_type,
            size_tier: tier,
            locality,
            price: lookup.price(),
        })?;
    } else {
        println!("{key} / {garment_type} / {} / {}: {}", tier.label(), locality.key(), show(lookup.price()));
    }

    match lookup {
        PriceLookup::Found(_) => Ok(()),
        PriceLookup::NotFound(reason) => Err(CliError {
            code: EXIT_ISSUES,
            message: format!("no price for {garment_type}: {reason}"),
            hint: None,
        }),
    }
}
