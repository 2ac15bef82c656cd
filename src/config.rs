use crate::error::{Result, SalesAuditError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Header spellings accepted for each logical column, tried in order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct ColumnAliases {
    #[schemars(description = "Header names holding the sale date (YYYY-MM-DD or DD-MM-YYYY, '/' also accepted)")]
    pub date: Vec<String>,

    #[schemars(description = "Header names holding the sale amount. Everything except digits and '.' is stripped before parsing.")]
    pub amount: Vec<String>,

    #[schemars(description = "Header names holding the seller who registered the sale")]
    pub seller: Vec<String>,

    #[schemars(description = "Header names holding the full product name")]
    pub product: Vec<String>,

    #[schemars(description = "Header names holding the free-text sale status")]
    pub status: Vec<String>,
}

impl Default for ColumnAliases {
    fn default() -> Self {
        Self {
            date: strings(&["Fecha Ingreso", "fecha_ingreso"]),
            amount: strings(&["Cuota Actual", "cuota_actual"]),
            seller: strings(&["Cargado por", "cargado_por"]),
            product: strings(&["Producto"]),
            status: strings(&["Estado", "estado"]),
        }
    }
}

/// Rules for deriving the short display label of a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct LabelRules {
    #[schemars(description = "Filler phrases removed (case-insensitive) from the front of a product name, e.g. 'Curso de '")]
    pub filler_prefixes: Vec<String>,

    #[schemars(description = "Maximum number of characters kept in the label, not counting the ellipsis")]
    pub max_len: usize,

    #[schemars(description = "Marker appended when the label was truncated")]
    pub ellipsis: String,

    #[schemars(description = "Label used when nothing is left after cleaning")]
    pub empty_label: String,
}

impl Default for LabelRules {
    fn default() -> Self {
        Self {
            filler_prefixes: strings(&[
                "Curso de ",
                "Carrera de ",
                "Especialización en ",
                "Taller de ",
            ]),
            max_len: 20,
            ellipsis: "…".to_string(),
            empty_label: "S/N".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct AuditConfig {
    #[schemars(description = "Accepted header spellings for every column the normalizer reads")]
    pub columns: ColumnAliases,

    #[schemars(description = "Seller used when the seller column is absent, blank or '0'")]
    pub default_seller: String,

    #[schemars(description = "Product name used when the product column is absent or blank")]
    pub default_product: String,

    #[schemars(description = "Substring (case-insensitive) marking a sale status as guaranteed")]
    pub guarantee_marker: String,

    #[schemars(description = "How product display labels are derived from full names")]
    pub labels: LabelRules,

    #[schemars(description = "Revenue goal carried through to the report for progress display. Not used by the aggregation itself.")]
    pub revenue_target: Option<f64>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            columns: ColumnAliases::default(),
            default_seller: "Sitio Web".to_string(),
            default_product: "Sin Nombre".to_string(),
            guarantee_marker: "garantiz".to_string(),
            labels: LabelRules::default(),
            revenue_target: Some(120_000_000.0),
        }
    }
}

impl AuditConfig {
    /// Parses a (possibly partial) JSON document; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let alias_sets = [
            ("date", &self.columns.date),
            ("amount", &self.columns.amount),
            ("seller", &self.columns.seller),
            ("product", &self.columns.product),
            ("status", &self.columns.status),
        ];
        for (column, aliases) in alias_sets {
            if aliases.is_empty() {
                return Err(SalesAuditError::InvalidConfig(format!(
                    "Column '{}' has no header aliases",
                    column
                )));
            }
        }

        if self.default_seller.trim().is_empty() {
            return Err(SalesAuditError::InvalidConfig(
                "default_seller must not be blank".to_string(),
            ));
        }

        if self.default_product.trim().is_empty() {
            return Err(SalesAuditError::InvalidConfig(
                "default_product must not be blank".to_string(),
            ));
        }

        if self.labels.max_len == 0 {
            return Err(SalesAuditError::InvalidConfig(
                "labels.max_len must be at least 1".to_string(),
            ));
        }

        if let Some(target) = self.revenue_target {
            if !target.is_finite() || target <= 0.0 {
                return Err(SalesAuditError::InvalidRevenueTarget(target));
            }
        }

        Ok(())
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(AuditConfig)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AuditConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AuditConfig::from_json(
            r#"{ "default_seller": "Direct", "labels": { "max_len": 12 } }"#,
        )
        .unwrap();

        assert_eq!(config.default_seller, "Direct");
        assert_eq!(config.default_product, "Sin Nombre");
        assert_eq!(config.labels.max_len, 12);
        assert_eq!(config.labels.ellipsis, "…");
        assert_eq!(config.columns.date[0], "Fecha Ingreso");
    }

    #[test]
    fn test_rejects_bad_revenue_target() {
        let config = AuditConfig {
            revenue_target: Some(0.0),
            ..AuditConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SalesAuditError::InvalidRevenueTarget(_))
        ));

        let config = AuditConfig {
            revenue_target: Some(f64::NAN),
            ..AuditConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AuditConfig {
            revenue_target: None,
            ..AuditConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_alias_list() {
        let mut config = AuditConfig::default();
        config.columns.date.clear();
        match config.validate() {
            Err(SalesAuditError::InvalidConfig(msg)) => assert!(msg.contains("date")),
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_zero_label_length() {
        let mut config = AuditConfig::default();
        config.labels.max_len = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_schema_generation() {
        let schema_json = AuditConfig::schema_as_json().unwrap();
        assert!(schema_json.contains("guarantee_marker"));
        assert!(schema_json.contains("filler_prefixes"));
        assert!(schema_json.contains("revenue_target"));
    }
}
