use log::{error, info};
use product_sniffer::{
    format_ranking, rank_products, rank_products_with_custom_catalog, ProductCatalog,
    DEFAULT_CATALOG_CONFIG,
};
use std::env;
use std::io::{self, Read};

fn main() {
    // Initialize the logger
    env_logger::init();

    // Read the search phrase from stdin
    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        error!("Failed to read from stdin: {}", e);
        std::process::exit(1);
    }

    // An optional catalog path replaces the embedded sample catalog
    let result = match env::args().nth(1) {
        Some(catalog_path) => {
            info!("Using catalog: {}", catalog_path);

            ProductCatalog::read_catalog_from_path(&catalog_path, DEFAULT_CATALOG_CONFIG)
                .and_then(|catalog| rank_products_with_custom_catalog(&input, &catalog))
        }
        None => rank_products(&input),
    };

    match result {
        Ok(ranking) => {
            for line in format_ranking(&ranking) {
                println!("{}", line);
            }
        }
        Err(e) => {
            error!("Error ranking products: {}", e);
            std::process::exit(1);
        }
    }
}
