//! Horizons-style observer table ingestion
//!
//! Data rows sit between the `$$SOE` and `$$EOE` markers with columns
//! `Date, _, _, Azi, Elev, Delta, Deldot, OneWay_LT`. Only the date and the
//! three angle/distance columns are used.

use anyhow::{Context, Result};
use bevy::log::{info, warn};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::fs;
use std::path::Path;

use crate::trajectory::sampler::{DatasetRow, SampledPath};

const START_OF_EPHEMERIS: &str = "$$SOE";
const END_OF_EPHEMERIS: &str = "$$EOE";

const COL_DATE: usize = 0;
const COL_AZIMUTH: usize = 3;
const COL_ELEVATION: usize = 4;
const COL_DISTANCE: usize = 5;

/// Outcome of reading an ephemeris table
#[derive(Debug, Default)]
pub struct EphemerisLoad {
    pub path: SampledPath,
    /// Data rows seen between the markers
    pub rows_read: usize,
    /// Rows dropped because a numeric field did not parse
    pub rows_dropped: usize,
}

/// Read and parse an ephemeris file
pub fn load_ephemeris(path: &Path) -> Result<EphemerisLoad> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading ephemeris {}", path.display()))?;
    let load = parse_ephemeris(&text)
        .with_context(|| format!("parsing ephemeris {}", path.display()))?;
    info!(
        "Loaded ephemeris {}: {} of {} rows usable ({} dropped)",
        path.display(),
        load.path.len(),
        load.rows_read,
        load.rows_dropped
    );
    Ok(load)
}

/// Parse ephemeris text. A table without `$$SOE` yields no samples.
pub fn parse_ephemeris(text: &str) -> Result<EphemerisLoad> {
    let lines: Vec<&str> = text.lines().collect();
    let Some(soe) = lines.iter().position(|l| l.trim() == START_OF_EPHEMERIS) else {
        warn!("ephemeris has no {} marker", START_OF_EPHEMERIS);
        return Ok(EphemerisLoad::default());
    };
    let body: Vec<&str> = lines[soe + 1..]
        .iter()
        .take_while(|l| l.trim() != END_OF_EPHEMERIS)
        .copied()
        .collect();
    let data = body.join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());

    let mut rows = Vec::new();
    let mut unreadable = 0usize;
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                warn!("unreadable ephemeris record: {}", err);
                unreadable += 1;
                continue;
            }
        };
        let line = record
            .position()
            .map(|p| soe + 1 + p.line() as usize)
            .unwrap_or_default();
        let cell = |i: usize| record.get(i).unwrap_or_default().to_string();
        rows.push(DatasetRow {
            line,
            date: cell(COL_DATE),
            azimuth: cell(COL_AZIMUTH),
            elevation: cell(COL_ELEVATION),
            distance: cell(COL_DISTANCE),
        });
    }

    let parsed = rows.len();
    let path = SampledPath::from_dataset(rows);
    let rows_read = parsed + unreadable;
    Ok(EphemerisLoad {
        rows_dropped: rows_read - path.len(),
        rows_read,
        path,
    })
}

/// Horizons calendar date to a fractional year, e.g. `2025-Jan-01 00:00`.
pub fn fractional_year(date: &str) -> Option<f64> {
    let date = date.trim();
    let date = date.strip_prefix("A.D.").unwrap_or(date).trim();

    let parsed = ["%Y-%b-%d %H:%M:%S%.f", "%Y-%b-%d %H:%M:%S", "%Y-%b-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(date, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(date, "%Y-%b-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    let year = parsed.year();
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?;
    let end = NaiveDate::from_ymd_opt(year + 1, 1, 1)?.and_hms_opt(0, 0, 0)?;
    let elapsed = (parsed - start).num_seconds() as f64;
    let length = (end - start).num_seconds() as f64;
    Some(year as f64 + elapsed / length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bevy::math::DVec3;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    const SAMPLE: &str = "\
*******************************************************************************
 Date__(UT)__HR:MN, , , Azi_(a-app), Elev_(a-app), delta, deldot, 1-way_down_LT,
*******************************************************************************
$$SOE
 2025-Jan-01 00:00, , , 0.0, 0.0, 1000000000.0, 16.9, 1375.2,
 2025-Jan-02 00:00, , , bad, 0.0, 1000000000.0, 16.9, 1375.2,
 2025-Jan-03 00:00, , , 90.0, 0.0, 2.0, 16.9, 1375.2,
 2025-Jan-04 00:00, , , 45.0
$$EOE
 2025-Jan-05 00:00, , , 0.0, 0.0, 9.0, 16.9, 1375.2,
";

    #[test]
    fn test_parse_sample_table() {
        let load = parse_ephemeris(SAMPLE).unwrap();
        assert_eq!(load.rows_read, 4);
        assert_eq!(load.rows_dropped, 2);
        assert_eq!(load.path.len(), 2);
        assert_eq!(load.path.get(0), Some(DVec3::new(1e9, 0.0, 0.0)));
        assert_relative_eq!(load.path.get(1).unwrap().y, 2.0);
        assert_eq!(load.path.epoch(1).unwrap().label, "2025-Jan-03 00:00");
    }

    #[test]
    fn test_parse_without_markers_is_empty() {
        let load = parse_ephemeris("no table here\n1,2,3").unwrap();
        assert!(load.path.is_empty());
        assert_eq!(load.rows_read, 0);
    }

    #[test]
    fn test_parse_all_rows_malformed() {
        let text = "$$SOE\n 2025-Jan-01 00:00, , , x, y, z,\n$$EOE\n";
        let load = parse_ephemeris(text).unwrap();
        assert!(load.path.is_empty());
        assert_eq!(load.rows_dropped, 1);
    }

    #[test]
    fn test_fractional_year() {
        assert_eq!(fractional_year("2025-Jan-01 00:00"), Some(2025.0));
        assert_eq!(fractional_year("A.D. 2024-Jan-01 00:00:00.0000"), Some(2024.0));
        let mid = fractional_year("2023-Jul-02 12:00").unwrap();
        assert_relative_eq!(mid, 2023.5, max_relative = 1e-4);
        assert_eq!(fractional_year("2023-Jul-02"), fractional_year("2023-Jul-02 00:00"));
        assert!(fractional_year("yesterday").is_none());
    }

    #[test]
    fn test_load_ephemeris_from_disk() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let file: PathBuf = std::env::temp_dir().join(format!(
            "voyager-ephemeris-{}-{}.csv",
            std::process::id(),
            nanos
        ));
        fs::write(&file, SAMPLE).unwrap();
        let load = load_ephemeris(&file).unwrap();
        assert_eq!(load.path.len(), 2);

        assert!(load_ephemeris(&file.with_extension("missing")).is_err());
    }
}
