use log::{error, info};
use product_sniffer::{
    default_catalog, default_noun_selector, default_taxonomy, format_ranking,
    rank_products_for_phrase,
};
use std::io::{self, BufRead};

fn main() {
    env_logger::init();

    let (selector, catalog, taxonomy) =
        match (default_noun_selector(), default_catalog(), default_taxonomy()) {
            (Ok(selector), Ok(catalog), Ok(taxonomy)) => (selector, catalog, taxonomy),
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                error!("Failed to load defaults: {}", e);
                std::process::exit(1);
            }
        };

    info!("Reading one phrase per line");

    for line in io::stdin().lock().lines() {
        let phrase = match line {
            Ok(phrase) => phrase,
            Err(e) => {
                error!("Failed to read from stdin: {}", e);
                std::process::exit(1);
            }
        };

        if phrase.trim().is_empty() {
            continue;
        }

        println!("{}", phrase.trim());
        match rank_products_for_phrase(&phrase, selector, catalog, taxonomy) {
            Ok(ranking) => {
                for line in format_ranking(&ranking) {
                    println!("  {}", line);
                }
            }
            Err(e) => println!("  {}", e),
        }
    }
}
