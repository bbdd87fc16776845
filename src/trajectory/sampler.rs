//! Dense position sequences that drive the animation

use bevy::log::debug;
use bevy::math::DVec3;

use crate::trajectory::catalog::EventCatalog;
use crate::trajectory::ephemeris::fractional_year;
use crate::trajectory::error::{Result, TrajectoryError};

/// Date attached to a dataset sample
#[derive(Clone, Debug, PartialEq)]
pub struct SampleEpoch {
    /// Raw date column
    pub label: String,
    /// Fractional year, when the date parses
    pub year: Option<f64>,
}

/// Ordered positions (km) the player steps through
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampledPath {
    positions: Vec<DVec3>,
    /// Empty for generated paths, one per sample for dataset paths
    epochs: Vec<SampleEpoch>,
}

/// One raw ephemeris row as read from the table
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DatasetRow {
    /// 1-based line in the source text, for diagnostics
    pub line: usize,
    pub date: String,
    pub azimuth: String,
    pub elevation: String,
    pub distance: String,
}

impl SampledPath {
    /// `steps` evenly spaced points from `start` to `end`, both included.
    pub fn from_endpoints(start: DVec3, end: DVec3, steps: usize) -> Result<Self> {
        let positions = match steps {
            0 => return Err(TrajectoryError::EmptyCatalog),
            1 => vec![start],
            _ => {
                let last = steps - 1;
                let delta = end - start;
                let mut positions: Vec<DVec3> = (0..last)
                    .map(|i| start + delta * (i as f64 / last as f64))
                    .collect();
                positions.push(end);
                positions
            }
        };
        Ok(Self {
            positions,
            epochs: Vec::new(),
        })
    }

    /// Straight path between the first and last milestone in source order
    pub fn from_catalog(catalog: &EventCatalog, steps: usize) -> Result<Self> {
        if catalog.len() < 2 {
            return Err(TrajectoryError::EmptyCatalog);
        }
        match (catalog.first(), catalog.last()) {
            (Some(first), Some(last)) => Self::from_endpoints(first.position, last.position, steps),
            _ => Err(TrajectoryError::EmptyCatalog),
        }
    }

    /// Convert azimuth/elevation/distance rows to Cartesian samples.
    ///
    /// Rows with a missing or non-numeric field are skipped; the rest keep
    /// their original order.
    pub fn from_dataset<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = DatasetRow>,
    {
        let mut positions = Vec::new();
        let mut epochs = Vec::new();
        for row in rows {
            match parse_row(&row) {
                Ok(position) => {
                    positions.push(position);
                    epochs.push(SampleEpoch {
                        year: fractional_year(&row.date),
                        label: row.date,
                    });
                }
                Err(err) => debug!("skipping ephemeris row: {}", err),
            }
        }
        Self { positions, epochs }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<DVec3> {
        self.positions.get(index).copied()
    }

    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    pub fn epoch(&self, index: usize) -> Option<&SampleEpoch> {
        self.epochs.get(index)
    }

    /// Index of the sample closest to `position`
    pub fn closest_index(&self, position: DVec3) -> Option<usize> {
        self.positions
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.distance_squared(position)
                    .total_cmp(&b.distance_squared(position))
            })
            .map(|(i, _)| i)
    }
}

/// Spherical (degrees, distance) to Cartesian in the distance's unit
pub fn spherical_to_cartesian(azimuth_deg: f64, elevation_deg: f64, distance: f64) -> DVec3 {
    let (sin_az, cos_az) = azimuth_deg.to_radians().sin_cos();
    let (sin_el, cos_el) = elevation_deg.to_radians().sin_cos();
    DVec3::new(
        distance * cos_el * cos_az,
        distance * cos_el * sin_az,
        distance * sin_el,
    )
}

fn parse_row(row: &DatasetRow) -> Result<DVec3> {
    let field = |name: &str, raw: &str| -> Result<f64> {
        let value: f64 = raw.trim().parse().map_err(|_| TrajectoryError::MalformedRow {
            line: row.line,
            reason: format!("{} is not numeric: {:?}", name, raw),
        })?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(TrajectoryError::MalformedRow {
                line: row.line,
                reason: format!("{} is not finite", name),
            })
        }
    };
    let azimuth = field("azimuth", &row.azimuth)?;
    let elevation = field("elevation", &row.elevation)?;
    let distance = field("distance", &row.distance)?;
    Ok(spherical_to_cartesian(azimuth, elevation, distance))
}
