//! Legacy vs predict comparison
//!
//! Absence is never a disagreement: if either side is `None` the pair is
//! "not different" and has no delta.

use serde::Serialize;

use crate::fields::{Field, FieldValue};
use crate::models::CarcassRecord;

/// Numeric pairs closer than this are treated as equal (rounding noise)
pub const NUMERIC_TOLERANCE: f64 = 0.5;

/// Direction of a percentage delta, used only for display colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaSign {
    Positive,
    Negative,
    /// Rounds to 0.0%
    Neutral,
}

/// Percentage change from legacy to predict
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Delta {
    /// `(predict - legacy) / legacy * 100`, one decimal place
    pub percent: f64,
    pub sign: DeltaSign,
}

impl Delta {
    /// `+10.0%`, `-3.2%`, `0.0%`
    pub fn label(&self) -> String {
        match self.sign {
            DeltaSign::Positive => format!("+{:.1}%", self.percent),
            _ => format!("{:.1}%", self.percent),
        }
    }
}

/// True when both values are present and disagree
///
/// Numbers disagree beyond [`NUMERIC_TOLERANCE`]; text must match exactly
/// (case-sensitive). A number never equals a text value.
pub fn is_different(legacy: Option<FieldValue<'_>>, predict: Option<FieldValue<'_>>) -> bool {
    match (legacy, predict) {
        (Some(FieldValue::Number(a)), Some(FieldValue::Number(b))) => {
            (a - b).abs() > NUMERIC_TOLERANCE
        }
        (Some(FieldValue::Text(a)), Some(FieldValue::Text(b))) => a != b,
        (Some(_), Some(_)) => true,
        _ => false,
    }
}

/// Percentage delta between two numeric values
///
/// `None` when either side is absent or non-numeric, or when legacy is
/// zero.
pub fn difference(legacy: Option<FieldValue<'_>>, predict: Option<FieldValue<'_>>) -> Option<Delta> {
    let (Some(FieldValue::Number(legacy)), Some(FieldValue::Number(predict))) = (legacy, predict)
    else {
        return None;
    };
    if legacy == 0.0 || !legacy.is_finite() || !predict.is_finite() {
        return None;
    }

    let percent = round_to_tenth((predict - legacy) / legacy * 100.0);
    let sign = if percent > 0.0 {
        DeltaSign::Positive
    } else if percent < 0.0 {
        DeltaSign::Negative
    } else {
        DeltaSign::Neutral
    };

    Some(Delta {
        // Normalise -0.0
        percent: if percent == 0.0 { 0.0 } else { percent },
        sign,
    })
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Comparison of one legacy/predict field pair of a record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldComparison {
    pub legacy: Field,
    pub predict: Field,
    pub different: bool,
    pub delta: Option<Delta>,
}

/// Compare a record's legacy field against its counterpart
pub fn compare_fields(record: &CarcassRecord, legacy: Field, predict: Field) -> FieldComparison {
    let (l, p) = (legacy.get(record), predict.get(record));
    FieldComparison {
        legacy,
        predict,
        different: is_different(l, p),
        delta: difference(l, p),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(v: f64) -> Option<FieldValue<'static>> {
        Some(FieldValue::Number(v))
    }

    fn text(v: &'static str) -> Option<FieldValue<'static>> {
        Some(FieldValue::Text(v))
    }

    #[test]
    fn test_numeric_tolerance_band() {
        assert!(!is_different(num(10.0), num(10.0)));
        assert!(!is_different(num(10.0), num(10.5)));
        assert!(is_different(num(10.0), num(10.51)));
        assert!(is_different(num(10.0), num(9.4)));

        for (a, b) in [(0.0, 0.3), (100.0, 99.2), (-4.0, -4.6), (3.25, 3.75)] {
            assert_eq!(is_different(num(a), num(b)), (a - b).abs() > 0.5);
            assert!(!is_different(num(a), num(a)));
        }
    }

    #[test]
    fn test_absent_values_are_never_different() {
        assert!(!is_different(None, num(1.0)));
        assert!(!is_different(num(1.0), None));
        assert!(!is_different(None, None));
        assert!(!is_different(text("Prime"), None));
        assert_eq!(difference(None, num(5.0)), None);
        assert_eq!(difference(num(5.0), None), None);
    }

    #[test]
    fn test_text_comparison_is_exact() {
        assert!(!is_different(text("Choice"), text("Choice")));
        assert!(is_different(text("Choice"), text("choice")));
        assert!(is_different(text("Choice"), text("Select")));
        assert!(is_different(text("5"), num(5.0)));
    }

    #[test]
    fn test_difference_percentages() {
        assert_eq!(
            difference(num(100.0), num(110.0)),
            Some(Delta { percent: 10.0, sign: DeltaSign::Positive })
        );
        assert_eq!(
            difference(num(100.0), num(90.0)),
            Some(Delta { percent: -10.0, sign: DeltaSign::Negative })
        );
        assert_eq!(difference(num(3.0), num(4.0)).unwrap().percent, 33.3);
        assert_eq!(difference(num(300.0), num(300.0)).unwrap().sign, DeltaSign::Neutral);
    }

    #[test]
    fn test_difference_zero_legacy_has_no_delta() {
        assert_eq!(difference(num(0.0), num(12.0)), None);
        assert_eq!(difference(num(0.0), num(0.0)), None);
    }

    #[test]
    fn test_difference_of_text_is_none() {
        assert_eq!(difference(text("Prime"), text("Choice")), None);
    }

    #[test]
    fn test_delta_label() {
        assert_eq!(difference(num(100.0), num(110.0)).unwrap().label(), "+10.0%");
        assert_eq!(difference(num(100.0), num(90.0)).unwrap().label(), "-10.0%");
        assert_eq!(difference(num(50.0), num(50.0)).unwrap().label(), "0.0%");
    }

    #[test]
    fn test_compare_fields_on_record() {
        let mut record = CarcassRecord::new("7");
        record.marbling_legacy = Some(400.0);
        record.marbling_predict = Some(460.0);

        let cmp = compare_fields(&record, Field::MarblingLegacy, Field::MarblingPredict);
        assert!(cmp.different);
        assert_eq!(cmp.delta.unwrap().percent, 15.0);

        let cmp = compare_fields(&record, Field::ReaLegacy, Field::ReaPredict);
        assert!(!cmp.different);
        assert_eq!(cmp.delta, None);
    }
}
