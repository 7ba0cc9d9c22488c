use crate::types::{CandidateName, TokenRef};
use crate::Error;
use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use log::{info, warn};
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

#[derive(Debug, Clone, Copy)]
pub struct CatalogConfig {
    pub delimiter: u8,
    pub has_headers: bool,
    /// Header of the product name column, or its zero-based index when the
    /// source has no header row.
    pub name_column: &'static str,
}

/// Source of candidate product names for a noun.
pub trait CatalogLookup {
    /// Names containing `noun`, compared case-insensitively.
    fn lookup(&self, noun: &TokenRef) -> Vec<CandidateName>;
}

/// Product names read from a delimited table.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    names: Vec<CandidateName>,
    lowercase_names: Vec<String>,
}

impl ProductCatalog {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CandidateName>,
    {
        let names: Vec<CandidateName> = names.into_iter().map(Into::into).collect();
        let lowercase_names = names.iter().map(|name| name.to_lowercase()).collect();

        Self {
            names,
            lowercase_names,
        }
    }

    pub fn read_catalog_from_string(csv: &str, config: &CatalogConfig) -> Result<Self, Error> {
        Self::read_catalog_from_reader(Cursor::new(csv), config)
    }

    pub fn read_catalog_from_reader<R: Read>(reader: R, config: &CatalogConfig) -> Result<Self, Error> {
        let mut reader = ReaderBuilder::new()
            .delimiter(config.delimiter)
            .has_headers(config.has_headers)
            .flexible(true)
            .from_reader(reader);

        let name_index = if config.has_headers {
            let headers = reader
                .headers()
                .map_err(|e| Error::ParserError(format!("Failed to read headers: {}", e)))?;

            headers
                .iter()
                .position(|h| h.trim() == config.name_column)
                .ok_or_else(|| {
                    Error::ParserError(format!("Missing {:?} column", config.name_column))
                })?
        } else {
            config.name_column.parse::<usize>().map_err(|_| {
                Error::ParserError(format!(
                    "Name column {:?} must be an index when the catalog has no headers",
                    config.name_column
                ))
            })?
        };

        let mut names = Vec::new();

        for (row_index, record) in reader.records().enumerate() {
            let record =
                record.map_err(|e| Error::ParserError(format!("Failed to read record: {}", e)))?;

            match record.get(name_index) {
                Some(name) => names.push(name.to_string()),
                None => warn!("Skipping row {} without a name field", row_index + 1),
            }
        }

        Ok(Self::from_names(names))
    }

    /// Reads a catalog file; paths ending in `.gz` are decompressed first.
    pub fn read_catalog_from_path<P: AsRef<Path>>(path: P, config: &CatalogConfig) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path)?;

        let catalog = if path.extension().map_or(false, |ext| ext == "gz") {
            Self::read_catalog_from_reader(GzDecoder::new(file), config)?
        } else {
            Self::read_catalog_from_reader(file, config)?
        };

        info!("Loaded {} products from {}", catalog.len(), path.display());

        Ok(catalog)
    }

    /// Decompress and parse a catalog from gzip bytes
    pub fn extract_catalog_from_bytes(read_bytes: &[u8], config: &CatalogConfig) -> Result<Self, Error> {
        let mut decoder = GzDecoder::new(read_bytes);
        let mut decompressed_data = String::new();
        decoder.read_to_string(&mut decompressed_data)?;

        Self::read_catalog_from_string(&decompressed_data, config)
    }

    pub fn names(&self) -> &[CandidateName] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl CatalogLookup for ProductCatalog {
    /// The noun is matched literally; characters such as `%` or `_` carry no
    /// wildcard meaning.
    fn lookup(&self, noun: &TokenRef) -> Vec<CandidateName> {
        let needle = noun.to_lowercase();

        self.lowercase_names
            .iter()
            .zip(&self.names)
            .filter(|(lowercase_name, _)| lowercase_name.contains(&needle))
            .map(|(_, name)| name.clone())
            .collect()
    }
}
