//! Balloon position feed decoding.
//!
//! The feed publishes one document per hour: a JSON array of `[x, y, z]`
//! ECEF triples in meters. Dropped-out fixes arrive as bare `NaN` tokens,
//! which are not valid JSON.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

use crate::error::DataError;
use crate::geo::Ecef;

/// Document name for a given hour of the day, e.g. `07.json`.
pub fn snapshot_name(hour: u32) -> String {
    format!("{:02}.json", hour % 24)
}

/// Document name for the hour we are in now (UTC).
pub fn current_snapshot_name() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    snapshot_name(utc_hour(secs))
}

fn utc_hour(unix_secs: u64) -> u32 {
    ((unix_secs / 3600) % 24) as u32
}

/// Decode a feed document into the positions that are fully known.
///
/// Entries that are not exactly three finite numbers are skipped.
pub fn decode(text: &str) -> Result<Vec<Ecef>, DataError> {
    let cleaned = text.replace("NaN", "null");
    let entries: Vec<Value> = serde_json::from_str(&cleaned)?;

    let total = entries.len();
    let positions: Vec<Ecef> = entries.iter().filter_map(position).collect();

    let skipped = total - positions.len();
    if skipped > 0 {
        log::debug!("feed: skipped {skipped} of {total} entries without a complete fix");
    }
    Ok(positions)
}

fn position(entry: &Value) -> Option<Ecef> {
    match entry.as_array()?.as_slice() {
        [x, y, z] => {
            let p = Ecef::new(x.as_f64()?, y.as_f64()?, z.as_f64()?);
            p.is_finite().then_some(p)
        }
        _ => None,
    }
}
