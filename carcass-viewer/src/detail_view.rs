//! Single-record detail view
//!
//! The record and its image availability are fetched concurrently; both
//! must arrive before the view is built. Image bytes are then loaded per
//! category through the gallery state machine.

use carcass_common::compare::{difference, is_different, Delta};
use carcass_common::fields::DETAIL_GROUPS;
use carcass_common::{CarcassRecord, Field, ImageAvailability, ImageCategory};
use tracing::warn;

use crate::client::ApiClient;
use crate::gallery::{Gallery, ImageLoader};
use crate::view_state::ViewState;

/// Legacy and predict values shown side by side when they disagree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callout {
    pub legacy: String,
    pub predict: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    pub field: Field,
    pub label: String,
    /// `None` renders as "N/A"
    pub value: Option<String>,
    pub callout: Option<Callout>,
}

impl DetailRow {
    fn new(record: &CarcassRecord, field: Field) -> Self {
        let value = field.get(record);
        let callout = field.predict_counterpart().and_then(|predict| {
            let predict_value = predict.get(record);
            match (value, predict_value) {
                (Some(l), Some(p)) if is_different(value, predict_value) => Some(Callout {
                    legacy: l.to_string(),
                    predict: p.to_string(),
                }),
                _ => None,
            }
        });

        Self {
            field,
            label: field.label(),
            value: value.map(|v| v.to_string()),
            callout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailGroup {
    pub title: &'static str,
    pub rows: Vec<DetailRow>,
}

/// Marbling comparison shown when both analysis images exist
#[derive(Debug, Clone, PartialEq)]
pub struct MarblingPanel {
    pub legacy_score: Option<f64>,
    pub predict_score: Option<f64>,
    pub delta: Option<Delta>,
    pub legacy_grade: Option<String>,
    pub predict_grade: Option<String>,
    pub grade_changed: bool,
    pub legacy_quality: Option<String>,
    pub predict_quality: Option<String>,
    pub quality_changed: bool,
}

impl MarblingPanel {
    /// `None` unless both the legacy and the new analysis image are available
    pub fn build(record: &CarcassRecord, images: &ImageAvailability) -> Option<Self> {
        if !(images.is_available(ImageCategory::Orig) && images.is_available(ImageCategory::New)) {
            return None;
        }

        let changed = |legacy: Field, predict: Field| is_different(legacy.get(record), predict.get(record));

        Some(Self {
            legacy_score: record.marbling_legacy,
            predict_score: record.marbling_predict,
            delta: difference(
                Field::MarblingLegacy.get(record),
                Field::MarblingPredict.get(record),
            ),
            legacy_grade: record.marbling_legacy_grade.clone(),
            predict_grade: record.marbling_predict_grade.clone(),
            grade_changed: changed(Field::MarblingLegacyGrade, Field::MarblingPredictGrade),
            legacy_quality: record.marbling_legacy_quality.clone(),
            predict_quality: record.marbling_predict_quality.clone(),
            quality_changed: changed(Field::MarblingLegacyQuality, Field::MarblingPredictQuality),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub carcass_id: String,
    pub weight: Option<f64>,
    pub groups: Vec<DetailGroup>,
    pub gallery: Gallery,
    pub marbling: Option<MarblingPanel>,
}

impl DetailView {
    pub fn new(record: &CarcassRecord, images: &ImageAvailability) -> Self {
        let groups = DETAIL_GROUPS
            .iter()
            .map(|&(title, fields)| DetailGroup {
                title,
                rows: fields.iter().map(|&f| DetailRow::new(record, f)).collect(),
            })
            .collect();

        Self {
            carcass_id: record.carcass_id.clone(),
            weight: record.weight_legacy,
            groups,
            gallery: Gallery::new(&record.carcass_id, images),
            marbling: MarblingPanel::build(record, images),
        }
    }

    pub fn group(&self, title: &str) -> Option<&DetailGroup> {
        self.groups.iter().find(|g| g.title == title)
    }
}

/// Fetch record and image availability, then load the gallery
///
/// A record that exists with unreadable image state still renders, with
/// every category shown as unavailable.
pub async fn load_detail(client: &ApiClient, id: &str) -> ViewState<DetailView> {
    load_detail_with(client, client, id).await
}

/// As [`load_detail`], with a separate image loader
pub async fn load_detail_with<L: ImageLoader + ?Sized>(
    client: &ApiClient,
    loader: &L,
    id: &str,
) -> ViewState<DetailView> {
    let (record, images) = tokio::join!(client.get_record(id), client.check_images(id));

    let record = match record {
        Ok(record) => record,
        Err(e) => return ViewState::from_error(&e),
    };
    let images = images.unwrap_or_else(|e| {
        warn!("Image availability unknown for {}: {}", id, e);
        ImageAvailability::default()
    });

    let mut view = DetailView::new(&record, &images);
    view.gallery.load_all(loader).await;
    ViewState::Ready(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use carcass_common::images::ImagePaths;
    use carcass_common::DeltaSign;

    fn record() -> CarcassRecord {
        let mut r = CarcassRecord::new("101");
        r.weight_legacy = Some(342.5);
        r.rea_legacy = Some(82.0);
        r.rea_predict = Some(84.1);
        r.marbling_legacy = Some(450.0);
        r.marbling_predict = Some(495.0);
        r.marbling_legacy_grade = Some("Choice".to_string());
        r.marbling_predict_grade = Some("Choice".to_string());
        r.marbling_legacy_quality = Some("Average".to_string());
        r.marbling_predict_quality = Some("High".to_string());
        r
    }

    fn images(orig: bool, new: bool) -> ImageAvailability {
        ImageAvailability {
            raw: false,
            orig,
            new,
            paths: ImagePaths {
                raw: None,
                orig: orig.then(|| "101.png".to_string()),
                new: new.then(|| "101.png".to_string()),
            },
        }
    }

    #[test]
    fn test_groups_follow_presentation_table() {
        let view = DetailView::new(&record(), &images(false, false));
        let titles: Vec<_> = view.groups.iter().map(|g| g.title).collect();
        assert_eq!(titles, vec!["General", "REA Analysis", "Yield", "Marbling"]);

        let general = view.group("General").unwrap();
        assert_eq!(general.rows[0].label, "Carcass Id");
        assert_eq!(general.rows[1].value.as_deref(), Some("342.5"));
        assert_eq!(view.weight, Some(342.5));
    }

    #[test]
    fn test_callouts_only_for_differing_pairs() {
        let view = DetailView::new(&record(), &images(false, false));
        let rea = view.group("REA Analysis").unwrap();

        let rea_legacy = rea.rows.iter().find(|r| r.field == Field::ReaLegacy).unwrap();
        assert_eq!(
            rea_legacy.callout,
            Some(Callout {
                legacy: "82".to_string(),
                predict: "84.1".to_string(),
            })
        );
        // Predict rows never carry their own callout
        let rea_predict = rea.rows.iter().find(|r| r.field == Field::ReaPredict).unwrap();
        assert_eq!(rea_predict.callout, None);

        let marbling = view.group("Marbling").unwrap();
        let grade = marbling
            .rows
            .iter()
            .find(|r| r.field == Field::MarblingLegacyGrade)
            .unwrap();
        assert_eq!(grade.callout, None);

        // Absent counterpart: no callout, value shows as missing
        let yield_group = view.group("Yield").unwrap();
        assert!(yield_group.rows.iter().all(|r| r.callout.is_none()));
        assert!(yield_group.rows.iter().all(|r| r.value.is_none()));
    }

    #[test]
    fn test_marbling_panel_requires_both_analysis_images() {
        assert!(MarblingPanel::build(&record(), &images(true, false)).is_none());
        assert!(MarblingPanel::build(&record(), &images(false, true)).is_none());

        let panel = MarblingPanel::build(&record(), &images(true, true)).unwrap();
        let delta = panel.delta.unwrap();
        assert_eq!(delta.percent, 10.0);
        assert_eq!(delta.sign, DeltaSign::Positive);
        assert!(!panel.grade_changed);
        assert!(panel.quality_changed);
    }

    #[test]
    fn test_marbling_panel_without_legacy_score() {
        let mut r = record();
        r.marbling_legacy = None;
        let panel = MarblingPanel::build(&r, &images(true, true)).unwrap();
        assert_eq!(panel.delta, None);
        assert_eq!(panel.predict_score, Some(495.0));
    }
}
