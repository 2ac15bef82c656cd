use crate::config::AuditConfig;
use crate::tokenizer::RawRecord;
use crate::utils::{parse_amount, parse_sale_date};
use chrono::NaiveDate;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// A single normalized sale. Built once per usable row and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleEntry {
    pub date: NaiveDate,
    /// Never negative: the sign is stripped with every other non-numeric character.
    pub amount: f64,
    pub seller: String,
    pub product_name: String,
    /// Raw status text, empty when the column is missing.
    pub status: String,
}

impl SaleEntry {
    pub fn is_guaranteed(&self, marker: &str) -> bool {
        !marker.is_empty() && self.status.to_lowercase().contains(&marker.to_lowercase())
    }
}

/// A row dropped because its date could not be read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRow {
    pub line: usize,
    pub raw_date: String,
}

/// What happened to the rows of one export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestionSummary {
    pub rows_read: usize,
    pub rows_accepted: usize,
    pub rejected: Vec<RejectedRow>,
}

pub struct Normalizer<'a> {
    config: &'a AuditConfig,
}

impl<'a> Normalizer<'a> {
    pub fn new(config: &'a AuditConfig) -> Self {
        Self { config }
    }

    /// Converts one record, or `None` when its date is unusable.
    ///
    /// Amount, seller and product never reject a row; they fall back to `0`
    /// and the configured defaults instead.
    pub fn normalize(&self, record: &RawRecord) -> Option<SaleEntry> {
        let columns = &self.config.columns;

        let date = parse_sale_date(first_present(record, &columns.date).unwrap_or(""))?;

        let amount = first_present(record, &columns.amount)
            .map(parse_amount)
            .unwrap_or(0.0);

        let seller = match first_present(record, &columns.seller) {
            Some(seller) if seller != "0" && !seller.trim().is_empty() => seller.to_string(),
            _ => self.config.default_seller.clone(),
        };

        let product_name = first_present(record, &columns.product)
            .filter(|product| !product.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.config.default_product.clone());

        let status = first_present(record, &columns.status)
            .unwrap_or("")
            .to_string();

        trace!(
            "Line {}: {} {} {} '{}'",
            record.line,
            date,
            amount,
            seller,
            product_name
        );

        Some(SaleEntry {
            date,
            amount,
            seller,
            product_name,
            status,
        })
    }

    /// Normalizes every record, keeping input order and recording rejects.
    pub fn normalize_all(&self, records: &[RawRecord]) -> (Vec<SaleEntry>, IngestionSummary) {
        let mut entries = Vec::with_capacity(records.len());
        let mut summary = IngestionSummary {
            rows_read: records.len(),
            ..IngestionSummary::default()
        };

        for record in records {
            match self.normalize(record) {
                Some(entry) => entries.push(entry),
                None => {
                    let raw_date = first_present(record, &self.config.columns.date)
                        .unwrap_or("")
                        .to_string();
                    debug!(
                        "Skipping line {}: unreadable date '{}'",
                        record.line, raw_date
                    );
                    summary.rejected.push(RejectedRow {
                        line: record.line,
                        raw_date,
                    });
                }
            }
        }

        summary.rows_accepted = entries.len();
        (entries, summary)
    }
}

/// Value of the first alias whose column is present and non-empty.
fn first_present<'r>(record: &'r RawRecord, aliases: &[String]) -> Option<&'r str> {
    aliases
        .iter()
        .filter_map(|alias| record.get(alias))
        .find(|value| !value.is_empty())
}
