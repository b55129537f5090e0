use crate::error::CoreError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Listing identity as found in the dataset: integer ids stay numbers on the wire, anything else is text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListingId {
    Int(i64),
    Text(String),
}

impl ListingId {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(n) => ListingId::Int(n),
            Err(_) => ListingId::Text(raw.to_string()),
        }
    }
}

impl From<&str> for ListingId {
    fn from(raw: &str) -> Self { Self::parse(raw) }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingId::Int(n) => write!(f, "{n}"),
            ListingId::Text(s) => f.write_str(s),
        }
    }
}

impl PartialEq<&str> for ListingId {
    fn eq(&self, other: &&str) -> bool {
        *self == ListingId::parse(other)
    }
}

/// One apartment listing. Its position in the dataset is its row in the listing matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub name: String,
    pub images: Vec<String>,
    pub detail_url: String,
    pub description: String,
    pub location: String,
    pub address: String,
    pub price: f64,
    pub rating: f64,
    pub size: f64,
}

const COL_ID: &str = "id";
const COL_NAME: &str = "apart_name";
const COL_IMAGES: &str = "images";
const COL_DETAIL_URL: &str = "detail_url";
const COL_DESCRIPTION: &str = "descriptions";
const COL_LOCATION: &str = "apart_location";
const COL_ADDRESS: &str = "apart_address_og";
const COL_PRICE: &str = "apart_price";
const COL_RATING: &str = "apart_rating";
const COL_SIZE: &str = "apart_ukuran";

pub const REQUIRED_COLUMNS: [&str; 10] = [
    COL_ID, COL_NAME, COL_IMAGES, COL_DETAIL_URL, COL_DESCRIPTION,
    COL_LOCATION, COL_ADDRESS, COL_PRICE, COL_RATING, COL_SIZE,
];

/// Load the listing dataset from a CSV file with a header row.
pub fn load_listings<P: AsRef<Path>>(path: P) -> Result<Vec<Listing>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("failed to open dataset {}", path.display()))?;
    let listings = read_listings(f).with_context(|| format!("failed to read dataset {}", path.display()))?;
    tracing::info!(path = %path.display(), num_listings = listings.len(), "loaded listing dataset");
    Ok(listings)
}

/// Parse listings from any CSV source. Rows keep their input order.
/// An empty or non-numeric price, rating or size cell is an error; such rows are not loaded as unmatchable listings.
pub fn read_listings<R: Read>(reader: R) -> Result<Vec<Listing>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    let mut idx = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| CoreError::MissingColumn(name.to_string()))?;
    }
    let [id, name, images, detail_url, description, location, address, price, rating, size] = idx;

    let mut listings = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let text = |i: usize| record.get(i).unwrap_or("").to_string();
        let number = |i: usize, column: &str| parse_number(record.get(i).unwrap_or(""), row, column);
        listings.push(Listing {
            id: ListingId::parse(record.get(id).unwrap_or("")),
            name: text(name),
            images: parse_images(record.get(images).unwrap_or("")),
            detail_url: text(detail_url),
            description: text(description),
            location: text(location),
            address: text(address),
            price: number(price, COL_PRICE)?,
            rating: number(rating, COL_RATING)?,
            size: number(size, COL_SIZE)?,
        });
    }
    Ok(listings)
}

fn parse_number(raw: &str, row: usize, column: &str) -> Result<f64, CoreError> {
    raw.trim().parse::<f64>().map_err(|_| CoreError::InvalidNumber {
        row,
        column: column.to_string(),
        value: raw.to_string(),
    })
}

/// Image cells come as a JSON array, a Python-style list literal, a single URL, or nothing.
pub fn parse_images(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    if let Some(inner) = raw.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        if let Ok(urls) = serde_json::from_str::<Vec<String>>(raw) {
            return urls;
        }
        return inner
            .split(',')
            .map(|s| s.trim().trim_matches(|c| c == '\'' || c == '"').to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    vec![raw.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,apart_name,images,detail_url,descriptions,apart_location,apart_address_og,apart_price,apart_rating,apart_ukuran\n";

    #[test]
    fn reads_rows_in_order() {
        let csv = format!(
            "{HEADER}1,Alpha,\"['http://a/1.jpg', 'http://a/2.jpg']\",http://a,dekat kampus,Depok,Jl. A,3500000,4.5,24\n\
             2,Beta,,http://b,kolam renang,Jakarta,Jl. B,5000000,4.0,36.5\n"
        );
        let listings = read_listings(csv.as_bytes()).unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].id, ListingId::Int(1));
        assert_eq!(listings[0].images, vec!["http://a/1.jpg", "http://a/2.jpg"]);
        assert_eq!(listings[1].name, "Beta");
        assert!(listings[1].images.is_empty());
        assert_eq!(listings[1].size, 36.5);
    }

    #[test]
    fn numeric_ids_serialize_as_numbers() {
        assert_eq!(serde_json::to_value(ListingId::parse("42")).unwrap(), serde_json::json!(42));
        assert_eq!(serde_json::to_value(ListingId::parse("apt-42")).unwrap(), serde_json::json!("apt-42"));
        assert_eq!(ListingId::parse(" 7 "), "7");
    }

    #[test]
    fn empty_price_cell_is_an_error() {
        let csv = format!("{HEADER}1,Alpha,,u,d,l,a,,4.5,24\n");
        let err = read_listings(csv.as_bytes()).unwrap_err();
        assert!(matches!(err.downcast_ref::<CoreError>(), Some(CoreError::InvalidNumber { row: 0, .. })));
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "id,apart_name\n1,Alpha\n";
        let err = read_listings(csv.as_bytes()).unwrap_err();
        let core = err.downcast_ref::<CoreError>().unwrap();
        assert!(matches!(core, CoreError::MissingColumn(c) if c == "images"));
    }

    #[test]
    fn bad_number_names_row_and_column() {
        let csv = format!("{HEADER}1,Alpha,,u,d,l,a,murah,4.5,24\n");
        let err = read_listings(csv.as_bytes()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("apart_price"), "{msg}");
        assert!(msg.contains("row 0"), "{msg}");
    }

    #[test]
    fn image_cell_formats() {
        assert_eq!(parse_images(r#"["x", "y"]"#), vec!["x", "y"]);
        assert_eq!(parse_images("['x','y']"), vec!["x", "y"]);
        assert_eq!(parse_images("http://only.jpg"), vec!["http://only.jpg"]);
        assert_eq!(parse_images("[]"), Vec::<String>::new());
        assert_eq!(parse_images("  "), Vec::<String>::new());
    }
}
