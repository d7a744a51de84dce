//! Static field tables
//!
//! Named access to [`CarcassRecord`] columns, the explicit legacy → predict
//! pairing table, and the presentation grouping used by the detail view.
//! Counterparts are looked up in [`COMPARISON_PAIRS`]; names are never
//! derived by substituting "legacy" with "predict".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::CarcassRecord;

/// A column of the `carcass_analysis` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    CarcassId,
    WeightLegacy,
    ReaLegacy,
    ReaPredict,
    ReheightMmLegacy,
    RebroadMmLegacy,
    MainAxisLengthPredict,
    PerpendicularAxisLengthPredict,
    YieldgradeLegacy,
    YieldgradeLegacyGrade,
    YieldgradePredict,
    YieldgradePredictGrade,
    AdjpygLegacy,
    AdjpygPredict,
    ActualpygLegacy,
    ActualpygPredict,
    MarblingLegacy,
    MarblingLegacyGrade,
    MarblingLegacyQuality,
    MarblingPredict,
    MarblingPredictGrade,
    MarblingPredictQuality,
}

/// Borrowed value of one field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Number(f64),
    Text(&'a str),
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl Field {
    /// All fields in table column order
    pub const ALL: [Field; 22] = [
        Field::CarcassId,
        Field::WeightLegacy,
        Field::ReaLegacy,
        Field::ReaPredict,
        Field::ReheightMmLegacy,
        Field::RebroadMmLegacy,
        Field::MainAxisLengthPredict,
        Field::PerpendicularAxisLengthPredict,
        Field::YieldgradeLegacy,
        Field::YieldgradeLegacyGrade,
        Field::YieldgradePredict,
        Field::YieldgradePredictGrade,
        Field::AdjpygLegacy,
        Field::AdjpygPredict,
        Field::ActualpygLegacy,
        Field::ActualpygPredict,
        Field::MarblingLegacy,
        Field::MarblingLegacyGrade,
        Field::MarblingLegacyQuality,
        Field::MarblingPredict,
        Field::MarblingPredictGrade,
        Field::MarblingPredictQuality,
    ];

    /// Column name as stored in the database and sent over the wire
    pub fn name(self) -> &'static str {
        match self {
            Field::CarcassId => "carcass_id",
            Field::WeightLegacy => "weight_legacy",
            Field::ReaLegacy => "rea_legacy",
            Field::ReaPredict => "rea_predict",
            Field::ReheightMmLegacy => "reheight_mm_legacy",
            Field::RebroadMmLegacy => "rebroad_mm_legacy",
            Field::MainAxisLengthPredict => "main_axis_length_predict",
            Field::PerpendicularAxisLengthPredict => "perpendicular_axis_length_predict",
            Field::YieldgradeLegacy => "yieldgrade_legacy",
            Field::YieldgradeLegacyGrade => "yieldgrade_legacy_grade",
            Field::YieldgradePredict => "yieldgrade_predict",
            Field::YieldgradePredictGrade => "yieldgrade_predict_grade",
            Field::AdjpygLegacy => "adjpyg_legacy",
            Field::AdjpygPredict => "adjpyg_predict",
            Field::ActualpygLegacy => "actualpyg_legacy",
            Field::ActualpygPredict => "actualpyg_predict",
            Field::MarblingLegacy => "marbling_legacy",
            Field::MarblingLegacyGrade => "marbling_legacy_grade",
            Field::MarblingLegacyQuality => "marbling_legacy_quality",
            Field::MarblingPredict => "marbling_predict",
            Field::MarblingPredictGrade => "marbling_predict_grade",
            Field::MarblingPredictQuality => "marbling_predict_quality",
        }
    }

    /// Human-facing label: underscores become spaces, each word capitalised
    pub fn label(self) -> String {
        format_field_name(self.name())
    }

    /// Read this field from a record
    pub fn get<'a>(self, record: &'a CarcassRecord) -> Option<FieldValue<'a>> {
        let num = |v: Option<f64>| v.map(FieldValue::Number);
        let text = |v: &'a Option<String>| v.as_deref().map(FieldValue::Text);

        match self {
            Field::CarcassId => Some(FieldValue::Text(&record.carcass_id)),
            Field::WeightLegacy => num(record.weight_legacy),
            Field::ReaLegacy => num(record.rea_legacy),
            Field::ReaPredict => num(record.rea_predict),
            Field::ReheightMmLegacy => num(record.reheight_mm_legacy),
            Field::RebroadMmLegacy => num(record.rebroad_mm_legacy),
            Field::MainAxisLengthPredict => num(record.main_axis_length_predict),
            Field::PerpendicularAxisLengthPredict => num(record.perpendicular_axis_length_predict),
            Field::YieldgradeLegacy => num(record.yieldgrade_legacy),
            Field::YieldgradeLegacyGrade => text(&record.yieldgrade_legacy_grade),
            Field::YieldgradePredict => num(record.yieldgrade_predict),
            Field::YieldgradePredictGrade => text(&record.yieldgrade_predict_grade),
            Field::AdjpygLegacy => num(record.adjpyg_legacy),
            Field::AdjpygPredict => num(record.adjpyg_predict),
            Field::ActualpygLegacy => num(record.actualpyg_legacy),
            Field::ActualpygPredict => num(record.actualpyg_predict),
            Field::MarblingLegacy => num(record.marbling_legacy),
            Field::MarblingLegacyGrade => text(&record.marbling_legacy_grade),
            Field::MarblingLegacyQuality => text(&record.marbling_legacy_quality),
            Field::MarblingPredict => num(record.marbling_predict),
            Field::MarblingPredictGrade => text(&record.marbling_predict_grade),
            Field::MarblingPredictQuality => text(&record.marbling_predict_quality),
        }
    }

    /// Predict-side counterpart, if this is the legacy side of a pair
    pub fn predict_counterpart(self) -> Option<Field> {
        COMPARISON_PAIRS
            .iter()
            .find(|(legacy, _)| *legacy == self)
            .map(|(_, predict)| *predict)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| crate::Error::InvalidInput(format!("Unknown field: {}", s)))
    }
}

/// Legacy field → predict counterpart, including grade/quality derivatives
pub const COMPARISON_PAIRS: &[(Field, Field)] = &[
    (Field::ReaLegacy, Field::ReaPredict),
    (Field::YieldgradeLegacy, Field::YieldgradePredict),
    (Field::YieldgradeLegacyGrade, Field::YieldgradePredictGrade),
    (Field::AdjpygLegacy, Field::AdjpygPredict),
    (Field::ActualpygLegacy, Field::ActualpygPredict),
    (Field::MarblingLegacy, Field::MarblingPredict),
    (Field::MarblingLegacyGrade, Field::MarblingPredictGrade),
    (Field::MarblingLegacyQuality, Field::MarblingPredictQuality),
];

/// Pairs shown as legacy / predict columns in the list table
pub const LIST_COMPARISON_COLUMNS: &[(&str, Field, Field)] = &[
    ("REA", Field::ReaLegacy, Field::ReaPredict),
    ("Marbling", Field::MarblingLegacy, Field::MarblingPredict),
    ("Grade", Field::MarblingLegacyGrade, Field::MarblingPredictGrade),
    ("Marbling Quality", Field::MarblingLegacyQuality, Field::MarblingPredictQuality),
];

/// Detail view sections, in display order
pub const DETAIL_GROUPS: &[(&str, &[Field])] = &[
    ("General", &[Field::CarcassId, Field::WeightLegacy]),
    (
        "REA Analysis",
        &[
            Field::ReaLegacy,
            Field::ReaPredict,
            Field::ReheightMmLegacy,
            Field::RebroadMmLegacy,
            Field::MainAxisLengthPredict,
            Field::PerpendicularAxisLengthPredict,
        ],
    ),
    (
        "Yield",
        &[
            Field::YieldgradeLegacy,
            Field::YieldgradeLegacyGrade,
            Field::YieldgradePredict,
            Field::YieldgradePredictGrade,
            Field::AdjpygLegacy,
            Field::AdjpygPredict,
            Field::ActualpygLegacy,
            Field::ActualpygPredict,
        ],
    ),
    (
        "Marbling",
        &[
            Field::MarblingLegacy,
            Field::MarblingLegacyGrade,
            Field::MarblingLegacyQuality,
            Field::MarblingPredict,
            Field::MarblingPredictGrade,
            Field::MarblingPredictQuality,
        ],
    ),
];

/// `"rea_legacy"` → `"Rea Legacy"`
pub fn format_field_name(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_field_names_round_trip_through_from_str() {
        for field in Field::ALL {
            assert_eq!(field.name().parse::<Field>().unwrap(), field);
        }
        assert!("rea_legacyy".parse::<Field>().is_err());
    }

    #[test]
    fn test_pairs_are_legacy_to_predict_and_unique() {
        let mut seen = HashSet::new();
        for (legacy, predict) in COMPARISON_PAIRS {
            assert!(legacy.name().contains("_legacy"), "{} is not a legacy field", legacy);
            assert!(predict.name().contains("_predict"), "{} is not a predict field", predict);
            assert!(seen.insert(*legacy), "{} paired twice", legacy);
        }
    }

    #[test]
    fn test_geometry_fields_have_no_counterpart() {
        // Legacy-only geometry has no predict column of the same name
        assert_eq!(Field::ReheightMmLegacy.predict_counterpart(), None);
        assert_eq!(Field::RebroadMmLegacy.predict_counterpart(), None);
        assert_eq!(Field::WeightLegacy.predict_counterpart(), None);
        assert_eq!(
            Field::MarblingLegacyGrade.predict_counterpart(),
            Some(Field::MarblingPredictGrade)
        );
    }

    #[test]
    fn test_detail_groups_cover_every_field_once() {
        let grouped: Vec<Field> = DETAIL_GROUPS
            .iter()
            .flat_map(|(_, fields)| fields.iter().copied())
            .collect();
        assert_eq!(grouped.len(), Field::ALL.len());
        let unique: HashSet<_> = grouped.iter().collect();
        assert_eq!(unique.len(), Field::ALL.len());
    }

    #[test]
    fn test_format_field_name() {
        assert_eq!(format_field_name("rea_legacy"), "Rea Legacy");
        assert_eq!(format_field_name("carcass_id"), "Carcass Id");
        assert_eq!(Field::MarblingPredictQuality.label(), "Marbling Predict Quality");
    }

    #[test]
    fn test_get_reads_typed_values() {
        let mut record = CarcassRecord::new("42");
        record.rea_legacy = Some(81.5);
        record.marbling_predict_grade = Some("Prime".to_string());

        assert_eq!(Field::CarcassId.get(&record), Some(FieldValue::Text("42")));
        assert_eq!(Field::ReaLegacy.get(&record), Some(FieldValue::Number(81.5)));
        assert_eq!(
            Field::MarblingPredictGrade.get(&record),
            Some(FieldValue::Text("Prime"))
        );
        assert_eq!(Field::ReaPredict.get(&record), None);
    }

    #[test]
    fn test_number_display_drops_trailing_zero() {
        assert_eq!(FieldValue::Number(450.0).to_string(), "450");
        assert_eq!(FieldValue::Number(4.5).to_string(), "4.5");
    }
}
