//! Carcass analysis record model
//!
//! One row of the `carcass_analysis` table. Every field except the
//! identifier is nullable: `None` means "not computed", never zero.

use serde::{Deserialize, Deserializer, Serialize};

/// One carcass analysis row (legacy and predicted measurements side by side)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CarcassRecord {
    /// Externally assigned identifier; integer keys are carried as text
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub carcass_id: String,

    pub weight_legacy: Option<f64>,

    // Rib-eye area and geometry
    pub rea_legacy: Option<f64>,
    pub rea_predict: Option<f64>,
    pub reheight_mm_legacy: Option<f64>,
    pub rebroad_mm_legacy: Option<f64>,
    pub main_axis_length_predict: Option<f64>,
    pub perpendicular_axis_length_predict: Option<f64>,

    // Yield
    pub yieldgrade_legacy: Option<f64>,
    pub yieldgrade_legacy_grade: Option<String>,
    pub yieldgrade_predict: Option<f64>,
    pub yieldgrade_predict_grade: Option<String>,
    pub adjpyg_legacy: Option<f64>,
    pub adjpyg_predict: Option<f64>,
    pub actualpyg_legacy: Option<f64>,
    pub actualpyg_predict: Option<f64>,

    // Marbling
    pub marbling_legacy: Option<f64>,
    pub marbling_legacy_grade: Option<String>,
    pub marbling_legacy_quality: Option<String>,
    pub marbling_predict: Option<f64>,
    pub marbling_predict_grade: Option<String>,
    pub marbling_predict_quality: Option<String>,
}

impl CarcassRecord {
    /// Create an empty record (all measurements absent)
    pub fn new(carcass_id: impl Into<String>) -> Self {
        Self {
            carcass_id: carcass_id.into(),
            ..Default::default()
        }
    }
}

/// Accept `"123"` or `123` for the identifier
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Float(f) => f.to_string(),
    })
}
