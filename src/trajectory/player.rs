//! Animation state machine and the facade driven by the viewer

use bevy::log::{info, warn};
use bevy::math::DVec3;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::trajectory::catalog::{DEFAULT_EVENT_THRESHOLD_KM, EventCatalog, MilestoneEvent, YearFix};
use crate::trajectory::ephemeris::load_ephemeris;
use crate::trajectory::error::{Result, TrajectoryError};
use crate::trajectory::sampler::{SampleEpoch, SampledPath};

/// Cyclic index into a sampled path. Never out of bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerState {
    index: usize,
    steps: usize,
}

impl PlayerState {
    pub fn new(steps: usize) -> Result<Self> {
        if steps == 0 {
            return Err(TrajectoryError::EmptyCatalog);
        }
        Ok(Self { index: 0, steps })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn advance(&mut self) {
        self.index = (self.index + 1) % self.steps;
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Jump to `index`, wrapping values past the end (`index mod steps`).
    pub fn set_index(&mut self, index: usize) {
        self.index = index % self.steps;
    }

    pub fn current_position(&self, path: &SampledPath) -> Option<DVec3> {
        path.get(self.index)
    }
}

/// Plot projection requested by the viewer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    TwoD,
    #[default]
    ThreeD,
}

impl RenderMode {
    pub fn toggled(self) -> Self {
        match self {
            RenderMode::TwoD => RenderMode::ThreeD,
            RenderMode::ThreeD => RenderMode::TwoD,
        }
    }

    /// Axes that are plotted in this mode
    pub fn axes(self) -> &'static [char] {
        match self {
            RenderMode::TwoD => &['x', 'y'],
            RenderMode::ThreeD => &['x', 'y', 'z'],
        }
    }

    /// Flatten a position onto the plotted axes
    pub fn project(self, position: DVec3) -> DVec3 {
        match self {
            RenderMode::TwoD => DVec3::new(position.x, position.y, 0.0),
            RenderMode::ThreeD => position,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RenderMode::TwoD => "2D View",
            RenderMode::ThreeD => "3D View",
        }
    }
}

/// Where the sampled path comes from
#[derive(Clone, Debug, PartialEq)]
pub enum DataSource {
    /// Straight path between the first and last built-in milestone
    StaticCatalog,
    /// Azimuth/elevation/distance table on disk
    CsvEphemeris(PathBuf),
}

/// What one tick produced
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub index: usize,
    pub position: DVec3,
    pub nearest: Option<MilestoneEvent>,
    /// Closest milestone at any distance
    pub closest: Option<MilestoneEvent>,
    pub epoch: Option<SampleEpoch>,
}

/// Catalog, path and playback state behind a single owner
#[derive(Clone, Debug)]
pub struct TrajectoryPlayer {
    catalog: EventCatalog,
    path: SampledPath,
    state: PlayerState,
    mode: RenderMode,
    threshold_km: f64,
}

impl TrajectoryPlayer {
    pub fn new(catalog: EventCatalog, path: SampledPath) -> Result<Self> {
        let state = PlayerState::new(path.len())?;
        Ok(Self {
            catalog,
            path,
            state,
            mode: RenderMode::default(),
            threshold_km: DEFAULT_EVENT_THRESHOLD_KM,
        })
    }

    /// Build from a data source. An ephemeris that cannot be read or
    /// yields no samples falls back to the built-in catalog path.
    pub fn from_source(source: &DataSource, steps: usize) -> Result<Self> {
        let catalog = EventCatalog::voyager();
        if let DataSource::CsvEphemeris(file) = source {
            match load_ephemeris(file) {
                Ok(load) if !load.path.is_empty() => {
                    return Self::new(catalog, load.path);
                }
                Ok(load) => warn!(
                    "ephemeris {} has no usable rows ({} dropped): {}, using built-in path",
                    file.display(),
                    load.rows_dropped,
                    TrajectoryError::EmptyCatalog
                ),
                Err(err) => warn!("{:#}, using built-in path", err),
            }
        }
        let path = SampledPath::from_catalog(&catalog, steps)?;
        info!("Sampled {} positions from built-in catalog", path.len());
        Self::new(catalog, path)
    }

    pub fn with_threshold(mut self, threshold_km: f64) -> Self {
        self.threshold_km = threshold_km;
        self
    }

    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    pub fn path(&self) -> &SampledPath {
        &self.path
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
    }

    pub fn current_position(&self) -> DVec3 {
        // The state is sized from the path, so the lookup always hits.
        self.state
            .current_position(&self.path)
            .unwrap_or_default()
    }

    /// Report for the current index without advancing
    pub fn report(&self) -> TickReport {
        let position = self.current_position();
        TickReport {
            index: self.state.index(),
            position,
            nearest: self
                .catalog
                .find_nearest(position, self.threshold_km)
                .cloned(),
            closest: self.catalog.find_closest(position).cloned(),
            epoch: self.path.epoch(self.state.index()).cloned(),
        }
    }

    /// Advance one step and report the new position
    pub fn tick(&mut self) -> TickReport {
        self.state.advance();
        self.report()
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Interpolate the position at `year` and move the marker to the
    /// closest sample on the path.
    pub fn search_year(&mut self, year: f64) -> Result<YearFix> {
        let fix = self.catalog.interpolate_at_year(year)?;
        if let Some(index) = self.path.closest_index(fix.position) {
            self.state.set_index(index);
        }
        Ok(fix)
    }

    /// Same as [`Self::search_year`] for raw user text
    pub fn search_text(&mut self, text: &str) -> Result<YearFix> {
        let year = parse_year(text)?;
        self.search_year(year)
    }

    /// Position of the `index`-th milestone; the marker jumps next to it.
    pub fn select_event(&mut self, index: usize) -> Result<DVec3> {
        let event = self.catalog.get(index).ok_or_else(|| {
            TrajectoryError::InvalidInput(format!(
                "event {} does not exist ({} events)",
                index,
                self.catalog.len()
            ))
        })?;
        let position = event.position;
        if let Some(sample) = self.path.closest_index(position) {
            self.state.set_index(sample);
        }
        Ok(position)
    }
}

/// Accept digits with at most one decimal point, nothing else.
pub fn parse_year(text: &str) -> Result<f64> {
    let text = text.trim();
    let digits_only = !text.is_empty()
        && text.chars().all(|c| c.is_ascii_digit() || c == '.')
        && text.chars().filter(|&c| c == '.').count() <= 1
        && text.chars().any(|c| c.is_ascii_digit());
    if !digits_only {
        return Err(TrajectoryError::InvalidInput(format!(
            "{:?} is not a year",
            text
        )));
    }
    text.parse()
        .map_err(|_| TrajectoryError::InvalidInput(format!("{:?} is not a year", text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn voyager_player() -> TrajectoryPlayer {
        let catalog = EventCatalog::voyager();
        let path = SampledPath::from_catalog(&catalog, 500).unwrap();
        TrajectoryPlayer::new(catalog, path).unwrap()
    }

    #[test]
    fn test_player_state_rejects_empty_path() {
        assert_eq!(PlayerState::new(0), Err(TrajectoryError::EmptyCatalog));
        assert!(TrajectoryPlayer::new(EventCatalog::voyager(), SampledPath::default()).is_err());
    }

    #[test]
    fn test_advance_is_cyclic() {
        for steps in [1usize, 2, 5, 500] {
            for start in 0..steps.min(7) {
                let mut state = PlayerState::new(steps).unwrap();
                state.set_index(start);
                for _ in 0..steps {
                    state.advance();
                }
                assert_eq!(state.index(), start);
            }
        }
    }

    #[test]
    fn test_advance_wraps_to_zero() {
        let mut state = PlayerState::new(3).unwrap();
        state.advance();
        state.advance();
        assert_eq!(state.index(), 2);
        state.advance();
        assert_eq!(state.index(), 0);
    }

    #[test]
    fn test_set_index_wraps_and_reset() {
        let mut state = PlayerState::new(10).unwrap();
        state.set_index(7);
        assert_eq!(state.index(), 7);
        state.set_index(10);
        assert_eq!(state.index(), 0);
        state.set_index(23);
        assert_eq!(state.index(), 3);
        state.reset();
        assert_eq!(state.index(), 0);
    }

    #[test]
    fn test_tick_reports_jupiter_near_start() {
        let mut player = voyager_player();
        let report = player.tick();
        assert_eq!(report.index, 1);
        assert_eq!(report.nearest.unwrap().label, "Jupiter Flyby");
        assert!(report.epoch.is_none());
    }

    #[test]
    fn test_tick_reports_nothing_mid_flight() {
        let mut player = voyager_player();
        player.state.set_index(149);
        let report = player.tick();
        assert_eq!(report.index, 150);
        assert!(report.nearest.is_none());
        assert_eq!(report.closest.unwrap().label, "Family Portrait");
    }

    #[test]
    fn test_tick_wraps_back_to_start() {
        let mut player = voyager_player();
        player.state.set_index(499);
        let report = player.tick();
        assert_eq!(report.index, 0);
        assert_eq!(report.position, DVec3::new(7.78e8, 0.0, 0.0));
    }

    #[test]
    fn test_reset_returns_to_first_sample() {
        let mut player = voyager_player();
        player.tick();
        player.tick();
        player.reset();
        assert_eq!(player.state().index(), 0);
        assert_eq!(player.current_position(), DVec3::new(7.78e8, 0.0, 0.0));
    }

    #[test]
    fn test_search_year_moves_marker() {
        let mut player = voyager_player();
        let fix = player.search_year(2025.0).unwrap();
        assert_eq!(fix.position, DVec3::new(2.4e10, 3e9, 1.5e9));
        assert_eq!(player.state().index(), 499);

        assert!(matches!(
            player.search_year(1970.0),
            Err(TrajectoryError::OutOfRange { .. })
        ));
        // Failed search leaves the marker alone
        assert_eq!(player.state().index(), 499);
    }

    #[test]
    fn test_search_text_validation() {
        let mut player = voyager_player();
        assert!(matches!(
            player.search_text("19x0"),
            Err(TrajectoryError::InvalidInput(_))
        ));
        assert!(matches!(
            player.search_text("-1990"),
            Err(TrajectoryError::InvalidInput(_))
        ));
        assert!(matches!(
            player.search_text(""),
            Err(TrajectoryError::InvalidInput(_))
        ));
        let fix = player.search_text(" 1979.5 ").unwrap();
        assert_relative_eq!(fix.position.y, 2.5e7);
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("1990"), Ok(1990.0));
        assert_eq!(parse_year("1990."), Ok(1990.0));
        assert!(parse_year(".").is_err());
        assert!(parse_year("1.9.9").is_err());
        assert!(parse_year("1e3").is_err());
    }

    #[test]
    fn test_select_event() {
        let mut player = voyager_player();
        let position = player.select_event(4).unwrap();
        assert_eq!(position, DVec3::new(2.4e10, 3e9, 1.5e9));
        assert_eq!(player.state().index(), 499);

        player.select_event(0).unwrap();
        assert_eq!(player.state().index(), 0);

        assert!(matches!(
            player.select_event(5),
            Err(TrajectoryError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_render_mode_projection() {
        let p = DVec3::new(1.0, 2.0, 3.0);
        assert_eq!(RenderMode::ThreeD.project(p), p);
        assert_eq!(RenderMode::TwoD.project(p), DVec3::new(1.0, 2.0, 0.0));
        assert_eq!(RenderMode::TwoD.axes(), &['x', 'y']);
        assert_eq!(RenderMode::TwoD.toggled(), RenderMode::ThreeD);

        let mut player = voyager_player();
        assert_eq!(player.mode(), RenderMode::ThreeD);
        player.set_mode(RenderMode::TwoD);
        assert_eq!(player.mode(), RenderMode::TwoD);
    }

    #[test]
    fn test_from_source_falls_back_to_catalog() {
        let missing = DataSource::CsvEphemeris(PathBuf::from("/nonexistent/voyager.csv"));
        let player = TrajectoryPlayer::from_source(&missing, 50).unwrap();
        assert_eq!(player.path().len(), 50);

        let player = TrajectoryPlayer::from_source(&DataSource::StaticCatalog, 500).unwrap();
        assert_eq!(player.path().len(), 500);
    }

    #[test]
    fn test_from_source_falls_back_when_every_row_is_dropped() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let file = std::env::temp_dir().join(format!(
            "voyager-all-dropped-{}-{}.csv",
            std::process::id(),
            nanos
        ));
        std::fs::write(
            &file,
            "$$SOE\n 2025-Jan-01 00:00, , , bad, 0.0, 1000000000.0,\n 2025-Jan-02 00:00, , , 0.0, x, 1000000000.0,\n$$EOE\n",
        )
        .unwrap();

        let player = TrajectoryPlayer::from_source(&DataSource::CsvEphemeris(file), 50).unwrap();
        assert_eq!(player.path().len(), 50);
        assert_eq!(player.current_position(), DVec3::new(7.78e8, 0.0, 0.0));
        assert_eq!(player.state().steps(), 50);
    }

    #[test]
    fn test_custom_threshold() {
        let catalog = EventCatalog::voyager();
        let path = SampledPath::from_catalog(&catalog, 500).unwrap();
        let player = TrajectoryPlayer::new(catalog, path)
            .unwrap()
            .with_threshold(1.0);
        // Index 0 sits exactly on Jupiter
        assert_eq!(player.report().nearest.unwrap().year, 1979);
    }
}
