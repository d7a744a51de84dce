//! Queries against the `carcass_analysis` table

use carcass_common::CarcassRecord;
use sqlx::SqlitePool;
use tracing::debug;

/// Table holding one row per carcass
pub const CARCASS_TABLE: &str = "carcass_analysis";

/// Column list with casts so INTEGER/TEXT ids and INTEGER/REAL metrics
/// decode uniformly.
const SELECT_COLUMNS: &str = r#"
    CAST(carcass_id AS TEXT) AS carcass_id,
    CAST(weight_legacy AS REAL) AS weight_legacy,
    CAST(rea_legacy AS REAL) AS rea_legacy,
    CAST(rea_predict AS REAL) AS rea_predict,
    CAST(reheight_mm_legacy AS REAL) AS reheight_mm_legacy,
    CAST(rebroad_mm_legacy AS REAL) AS rebroad_mm_legacy,
    CAST(main_axis_length_predict AS REAL) AS main_axis_length_predict,
    CAST(perpendicular_axis_length_predict AS REAL) AS perpendicular_axis_length_predict,
    CAST(yieldgrade_legacy AS REAL) AS yieldgrade_legacy,
    CAST(yieldgrade_legacy_grade AS TEXT) AS yieldgrade_legacy_grade,
    CAST(yieldgrade_predict AS REAL) AS yieldgrade_predict,
    CAST(yieldgrade_predict_grade AS TEXT) AS yieldgrade_predict_grade,
    CAST(adjpyg_legacy AS REAL) AS adjpyg_legacy,
    CAST(adjpyg_predict AS REAL) AS adjpyg_predict,
    CAST(actualpyg_legacy AS REAL) AS actualpyg_legacy,
    CAST(actualpyg_predict AS REAL) AS actualpyg_predict,
    CAST(marbling_legacy AS REAL) AS marbling_legacy,
    CAST(marbling_legacy_grade AS TEXT) AS marbling_legacy_grade,
    CAST(marbling_legacy_quality AS TEXT) AS marbling_legacy_quality,
    CAST(marbling_predict AS REAL) AS marbling_predict,
    CAST(marbling_predict_grade AS TEXT) AS marbling_predict_grade,
    CAST(marbling_predict_quality AS TEXT) AS marbling_predict_quality
"#;

/// Full scan in storage order
pub async fn list_carcasses(pool: &SqlitePool) -> Result<Vec<CarcassRecord>, sqlx::Error> {
    let sql = format!("SELECT {} FROM {} ORDER BY rowid", SELECT_COLUMNS, CARCASS_TABLE);
    let records = sqlx::query_as::<_, CarcassRecord>(&sql)
        .fetch_all(pool)
        .await?;

    debug!("Retrieved {} records", records.len());
    Ok(records)
}

/// Primary-key lookup
///
/// The id is first matched as given, which hits the key index for TEXT keys
/// and, through INTEGER affinity, for integer keys. A column without
/// affinity holding integers only matches an integer bind, so numeric ids
/// get a second lookup.
pub async fn get_carcass(pool: &SqlitePool, id: &str) -> Result<Option<CarcassRecord>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM {} WHERE carcass_id = ? LIMIT 1",
        SELECT_COLUMNS, CARCASS_TABLE
    );

    let record = sqlx::query_as::<_, CarcassRecord>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    if record.is_some() {
        return Ok(record);
    }

    match id.parse::<i64>() {
        Ok(numeric_id) => {
            debug!("No text match for {}; retrying as integer", id);
            sqlx::query_as::<_, CarcassRecord>(&sql)
                .bind(numeric_id)
                .fetch_optional(pool)
                .await
        }
        Err(_) => Ok(None),
    }
}
