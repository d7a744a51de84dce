//! Plain-text rendering of views for the terminal

use std::fmt::Write;

use carcass_common::fields::LIST_COMPARISON_COLUMNS;
use carcass_common::{Field, ImageCategory};

use crate::detail_view::DetailView;
use crate::gallery::ImageLoadState;
use crate::list_view::ListView;
use crate::view_state::{ConnectivityBanner, ViewState};

const MISSING: &str = "N/A";

/// Marker appended to a predict cell that disagrees with its legacy value
const DIFF_MARK: &str = "*";

/// Wrap a view renderer with the loading / empty / error states
pub fn render_state<T>(state: &ViewState<T>, render: impl FnOnce(&T) -> String) -> String {
    match state {
        ViewState::Loading => "Loading...".to_string(),
        ViewState::Ready(value) => render(value),
        ViewState::Empty => "No records found.".to_string(),
        ViewState::NotFound => "Data not found.".to_string(),
        ViewState::Failed { message, retryable } => {
            if *retryable {
                format!("Error: {}\nRetry: run the command again.", message)
            } else {
                format!("Error: {}", message)
            }
        }
    }
}

/// `None` while online or before the first check
pub fn render_banner(banner: &ConnectivityBanner) -> Option<String> {
    match banner {
        ConnectivityBanner::Offline(reason) => Some(format!("[offline] Server unreachable: {}", reason)),
        ConnectivityBanner::Online | ConnectivityBanner::Unknown => None,
    }
}

/// Table of the visible rows, sorted column marked with an arrow
pub fn render_list(view: &ListView) -> String {
    let sort = view.sort();
    let header_cell = |label: String, field: Field| {
        if sort.field == field {
            format!("{} {}", label, sort.direction.arrow())
        } else {
            label
        }
    };

    let mut header = vec![
        header_cell("Carcass Id".to_string(), Field::CarcassId),
        header_cell("Weight".to_string(), Field::WeightLegacy),
    ];
    for &(group, legacy, predict) in LIST_COMPARISON_COLUMNS {
        header.push(header_cell(format!("{} (L)", group), legacy));
        header.push(header_cell(format!("{} (P)", group), predict));
    }

    let rows: Vec<Vec<String>> = view
        .rows()
        .iter()
        .map(|row| {
            let mut cells = vec![
                row.record.carcass_id.clone(),
                display(Field::WeightLegacy.get(row.record).map(|v| v.to_string())),
            ];
            for cell in &row.cells {
                cells.push(display(cell.legacy.clone()));
                let mut predict = display(cell.predict.clone());
                if cell.different {
                    predict.push_str(DIFF_MARK);
                }
                cells.push(predict);
            }
            cells
        })
        .collect();

    let mut out = table(&header, &rows);
    let (found, total) = view.summary();
    let _ = write!(out, "\nFound {} of {} records", found, total);
    if !view.search().is_empty() {
        let _ = write!(out, " matching \"{}\"", view.search());
    }
    out
}

pub fn render_detail(view: &DetailView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Carcass {}    Weight: {}",
        view.carcass_id,
        display(view.weight.map(|w| w.to_string()))
    );

    for group in &view.groups {
        let _ = writeln!(out, "\n== {} ==", group.title);
        for row in &group.rows {
            let _ = write!(out, "  {}: {}", row.label, display(row.value.clone()));
            if let Some(callout) = &row.callout {
                let _ = write!(out, "    [legacy {} / predict {}]", callout.legacy, callout.predict);
            }
            out.push('\n');
        }
    }

    let _ = writeln!(out, "\n== Images ==");
    for category in ImageCategory::ALL {
        let status = match view.gallery.slot(category).map(|s| s.state()) {
            Some(ImageLoadState::Loaded(src)) => format!("loaded {}", src),
            Some(ImageLoadState::Loading(src)) | Some(ImageLoadState::FailedRetrying(src)) => {
                format!("loading {}", src)
            }
            Some(ImageLoadState::Failed) => "load failed".to_string(),
            Some(ImageLoadState::Unavailable) | None => "unavailable".to_string(),
        };
        let _ = writeln!(out, "  {}: {}", category.title(), status);
    }

    if let Some(panel) = &view.marbling {
        let _ = writeln!(out, "\n== Marbling Comparison ==");
        let delta = panel
            .delta
            .map(|d| format!(" ({})", d.label()))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  Score: {} -> {}{}",
            display(panel.legacy_score.map(|v| v.to_string())),
            display(panel.predict_score.map(|v| v.to_string())),
            delta
        );
        let _ = writeln!(
            out,
            "  Grade: {} -> {}{}",
            display(panel.legacy_grade.clone()),
            display(panel.predict_grade.clone()),
            changed(panel.grade_changed)
        );
        let _ = writeln!(
            out,
            "  Quality: {} -> {}{}",
            display(panel.legacy_quality.clone()),
            display(panel.predict_quality.clone()),
            changed(panel.quality_changed)
        );
    }

    out
}

fn display(value: Option<String>) -> String {
    value.unwrap_or_else(|| MISSING.to_string())
}

fn changed(flag: bool) -> &'static str {
    if flag {
        " (changed)"
    } else {
        ""
    }
}

/// Left-aligned columns separated by two spaces
fn table(header: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(header);
    for row in rows {
        out.push('\n');
        out.push_str(&line(row));
    }
    out
}
