use crate::aggregation::AuditReport;
use crate::error::Result;
use crate::normalizer::IngestionSummary;
use serde::{Deserialize, Serialize};

/// Everything the dashboard needs from one upload: the aggregates, how the
/// rows were ingested, and the revenue goal carried through from the config.
///
/// Rebuilt from scratch on every run; nothing here is updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSnapshot {
    pub report: AuditReport,
    pub ingestion: IngestionSummary,
    pub revenue_target: Option<f64>,
}

impl AuditSnapshot {
    pub fn assemble(
        report: AuditReport,
        ingestion: IngestionSummary,
        revenue_target: Option<f64>,
    ) -> Self {
        Self {
            report,
            ingestion,
            revenue_target,
        }
    }

    /// Revenue as a percentage of the target. May exceed 100.
    pub fn target_progress(&self) -> Option<f64> {
        self.revenue_target
            .filter(|target| *target > 0.0)
            .map(|target| self.report.total_revenue / target * 100.0)
    }

    /// [`target_progress`](Self::target_progress) clamped to 100, for progress bars.
    pub fn target_progress_capped(&self) -> Option<f64> {
        self.target_progress().map(|pct| pct.min(100.0))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::aggregate;
    use crate::normalizer::SaleEntry;
    use chrono::NaiveDate;

    fn snapshot(target: Option<f64>) -> AuditSnapshot {
        let entries = vec![SaleEntry {
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            amount: 30_000_000.0,
            seller: "Ana".to_string(),
            product_name: "Curso de Excel".to_string(),
            status: String::new(),
        }];
        let report = aggregate(&entries).unwrap();
        AuditSnapshot::assemble(
            report,
            IngestionSummary {
                rows_read: 1,
                rows_accepted: 1,
                rejected: vec![],
            },
            target,
        )
    }

    #[test]
    fn test_target_progress() {
        let snap = snapshot(Some(120_000_000.0));
        assert!((snap.target_progress().unwrap() - 25.0).abs() < 1e-9);

        let over = snapshot(Some(10_000_000.0));
        assert!((over.target_progress().unwrap() - 300.0).abs() < 1e-9);
        assert_eq!(over.target_progress_capped(), Some(100.0));

        assert_eq!(snapshot(None).target_progress(), None);
    }

    #[test]
    fn test_json_export() {
        let json = snapshot(None).to_json().unwrap();
        assert!(json.contains("\"total_revenue\""));
        assert!(json.contains("\"activity_window\""));
        assert!(json.contains("\"2024-05-02\""));

        let back: AuditSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.report.total_count, 1);
        assert_eq!(back.report.products[0].display_name, "EXCEL");
    }
}
