//! # Sales Audit
//!
//! A library for turning a messy CSV sales export into the aggregates a sales
//! dashboard shows: total revenue, a daily timeline, a 30-day activity
//! window, seller rankings with trend lines and product rankings with share
//! of revenue.
//!
//! ## Pipeline
//!
//! - **Tokenize**: split the text into header-keyed records, honouring
//!   commas inside double quotes.
//! - **Normalize**: read the date (year-first or day-first), amount, seller,
//!   product and status of each record through configurable header aliases.
//!   Rows without a readable date are dropped; everything else falls back to
//!   defaults.
//! - **Aggregate**: a pure function of the normalized entries. An empty set
//!   gives no report rather than a report full of divisions by zero.
//! - **Assemble**: bundle the report with the ingestion summary and the
//!   revenue target into an [`AuditSnapshot`].
//!
//! ## Example
//!
//! ```rust
//! use sales_audit::*;
//!
//! let csv = "Fecha Ingreso,Cuota Actual,Cargado por,Producto\n\
//!            2024-03-07,1500,Ana,\"Curso de Excel, nivel 1\"\n\
//!            08/03/2024,500,0,Taller de Foto\n";
//!
//! let snapshot = process_sales_csv(csv).unwrap().expect("two usable rows");
//! assert_eq!(snapshot.report.total_count, 2);
//! assert_eq!(snapshot.report.sellers[0].name, "Ana");
//! assert_eq!(snapshot.report.sellers[1].name, "Sitio Web");
//! assert_eq!(snapshot.report.activity_window.len(), 30);
//! ```

pub mod aggregation;
pub mod config;
pub mod error;
pub mod grouping;
pub mod labels;
pub mod normalizer;
pub mod report;
pub mod tokenizer;
pub mod utils;

pub use aggregation::{
    aggregate, ActivitySlot, Aggregator, AuditReport, DailyTotal, ProductRanking, SellerRanking,
    TrendPoint, ACTIVITY_WINDOW_DAYS,
};
pub use config::{AuditConfig, ColumnAliases, LabelRules};
pub use error::{Result, SalesAuditError};
pub use labels::display_label;
pub use normalizer::{IngestionSummary, Normalizer, RejectedRow, SaleEntry};
pub use report::AuditSnapshot;
pub use tokenizer::{tokenize, RawRecord};
pub use utils::*;

use log::{debug, info};
use std::path::Path;

pub struct SalesAuditProcessor;

impl SalesAuditProcessor {
    /// Runs the whole pipeline over one CSV export.
    ///
    /// `Ok(None)` means the text produced no usable rows. Malformed rows
    /// never cause an `Err`; only an invalid `config` does.
    pub fn process(text: &str, config: &AuditConfig) -> Result<Option<AuditSnapshot>> {
        config.validate()?;

        let records = tokenize(text);
        let (entries, ingestion) = Normalizer::new(config).normalize_all(&records);

        info!(
            "Read {} rows: {} accepted, {} rejected",
            ingestion.rows_read,
            ingestion.rows_accepted,
            ingestion.rejected.len()
        );

        let Some(report) = Aggregator::new(config).aggregate(&entries) else {
            debug!("Export produced no usable rows");
            return Ok(None);
        };

        Ok(Some(AuditSnapshot::assemble(
            report,
            ingestion,
            config.revenue_target,
        )))
    }

    /// Reads `path` (invalid UTF-8 is replaced, not rejected) and runs [`Self::process`].
    pub fn process_file<P: AsRef<Path>>(
        path: P,
        config: &AuditConfig,
    ) -> Result<Option<AuditSnapshot>> {
        let bytes = std::fs::read(path.as_ref())?;
        debug!("Loaded {} bytes from {}", bytes.len(), path.as_ref().display());
        let text = String::from_utf8_lossy(&bytes);
        Self::process(&text, config)
    }
}

pub fn process_sales_csv(text: &str) -> Result<Option<AuditSnapshot>> {
    SalesAuditProcessor::process(text, &AuditConfig::default())
}

pub fn process_sales_csv_with_config(
    text: &str,
    config: &AuditConfig,
) -> Result<Option<AuditSnapshot>> {
    SalesAuditProcessor::process(text, config)
}
