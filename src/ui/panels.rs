//! Side panel and milestone labels built from Bevy UI nodes
use bevy::prelude::*;

use crate::config::{ViewerConfig, ViewerTheme};
use crate::core::km_to_scene;
use crate::playback::{PlaybackClock, Player};
use crate::trajectory::{EventCatalog, TrajectoryPlayer};
use crate::ui::state::{DetailsPanel, EventSelection, NoticeKind, SearchInput};
use crate::visualization::MainCamera;

const PANEL_WIDTH_PX: f32 = 340.0;
const CONTROLS_HELP: &str =
    "Space play/pause | R reset | V 2D/3D\nUp/Down events | S search year | A axes";

#[derive(Component)]
pub struct ModeText;

#[derive(Component)]
pub struct EventListText;

#[derive(Component)]
pub struct DetailsText;

#[derive(Component)]
pub struct NoticeText;

#[derive(Component)]
pub struct SearchText;

/// Year label that follows a milestone marker on screen
#[derive(Component)]
pub struct MilestoneLabel(pub usize);

fn text_bundle(text: impl Into<String>, size: f32, color: Color) -> (Text, TextFont, TextColor) {
    (
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
    )
}

/// Startup system that builds the right-hand panel
pub fn spawn_panels(
    mut commands: Commands,
    config: Res<ViewerConfig>,
    player: Res<Player>,
    details: Res<DetailsPanel>,
) {
    let theme = &config.theme;
    let text = ViewerTheme::color(theme.text);
    let highlight = ViewerTheme::color(theme.highlight);

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(0.0),
                top: Val::Px(0.0),
                width: Val::Px(PANEL_WIDTH_PX),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(12.0)),
                row_gap: Val::Px(8.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.17, 0.17, 0.24, 0.85)),
            Name::new("Side Panel"),
        ))
        .with_children(|panel| {
            panel.spawn(text_bundle("Voyager 1 Mission Events", 18.0, highlight));
            panel.spawn((text_bundle(mode_line(&player, true), 14.0, text), ModeText));
            panel.spawn((
                text_bundle(event_list(player.catalog(), None), 14.0, text),
                EventListText,
            ));
            panel.spawn(text_bundle("Details:", 14.0, highlight));
            panel.spawn((text_bundle(details.text(), 14.0, text), DetailsText));
            panel.spawn((text_bundle("", 13.0, text), NoticeText));
            panel.spawn((text_bundle(search_line(&SearchInput::default()), 14.0, text), SearchText));
            panel.spawn(text_bundle(CONTROLS_HELP, 12.0, text.with_alpha(0.6)));
        });

    let milestone = ViewerTheme::color(theme.milestone);
    for (index, event) in player.catalog().load().iter().enumerate() {
        commands.spawn((
            text_bundle(event.year.to_string(), 12.0, milestone),
            Node {
                position_type: PositionType::Absolute,
                ..default()
            },
            MilestoneLabel(index),
        ));
    }
}

/// System to copy UI state resources into the panel texts
pub fn refresh_panels(
    details: Res<DetailsPanel>,
    search: Res<SearchInput>,
    selection: Res<EventSelection>,
    player: Res<Player>,
    clock: Res<PlaybackClock>,
    config: Res<ViewerConfig>,
    mut texts: ParamSet<(
        Query<&mut Text, With<ModeText>>,
        Query<&mut Text, With<EventListText>>,
        Query<&mut Text, With<DetailsText>>,
        Query<(&mut Text, &mut TextColor), With<NoticeText>>,
        Query<&mut Text, With<SearchText>>,
    )>,
) {
    if player.is_changed() || clock.is_changed() {
        for mut text in texts.p0().iter_mut() {
            text.0 = mode_line(&player, clock.running);
        }
    }
    if selection.is_changed() {
        for mut text in texts.p1().iter_mut() {
            text.0 = event_list(player.catalog(), selection.index);
        }
    }
    if details.is_changed() {
        for mut text in texts.p2().iter_mut() {
            text.0 = details.text();
        }
        for (mut text, mut color) in texts.p3().iter_mut() {
            match &details.notice {
                Some(notice) => {
                    text.0 = notice.text.clone();
                    color.0 = match notice.kind {
                        NoticeKind::Info => ViewerTheme::color(config.theme.text),
                        NoticeKind::Warning => ViewerTheme::color(config.theme.warning),
                    };
                }
                None => text.0.clear(),
            }
        }
    }
    if search.is_changed() {
        for mut text in texts.p4().iter_mut() {
            text.0 = search_line(&search);
        }
    }
}

/// System to keep milestone year labels next to their markers
pub fn position_milestone_labels(
    camera: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    player: Res<Player>,
    mut labels: Query<(&MilestoneLabel, &mut Node, &mut Visibility)>,
) {
    let Ok((camera, camera_transform)) = camera.single() else {
        return;
    };
    let mode = player.mode();
    for (label, mut node, mut visibility) in &mut labels {
        let Some(event) = player.catalog().get(label.0) else {
            continue;
        };
        let world = km_to_scene(mode.project(event.position));
        match camera.world_to_viewport(camera_transform, world) {
            Ok(screen) => {
                node.left = Val::Px(screen.x + 8.0);
                node.top = Val::Px(screen.y - 8.0);
                *visibility = Visibility::Inherited;
            }
            Err(_) => *visibility = Visibility::Hidden,
        }
    }
}

fn mode_line(player: &TrajectoryPlayer, running: bool) -> String {
    let state = player.state();
    format!(
        "View Mode: {} | {} | Step {}/{}",
        player.mode().label(),
        if running { "Playing" } else { "Paused" },
        state.index() + 1,
        state.steps()
    )
}

/// One line per milestone, `>` marks the selected one
pub fn event_list(catalog: &EventCatalog, selected: Option<usize>) -> String {
    catalog
        .load()
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let marker = if selected == Some(i) { ">" } else { " " };
            format!("{} {} - {}", marker, e.year, e.label)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn search_line(search: &SearchInput) -> String {
    if search.focused {
        format!("Search year: {}_", search.buffer)
    } else {
        "Search year: press S".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_list_marks_selection() {
        let list = event_list(&EventCatalog::voyager(), Some(1));
        let lines: Vec<&str> = list.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "  1979 - Jupiter Flyby");
        assert_eq!(lines[1], "> 1980 - Saturn Flyby");
    }

    #[test]
    fn test_mode_line_shows_step() {
        let mut player =
            TrajectoryPlayer::from_source(&crate::trajectory::DataSource::StaticCatalog, 500).unwrap();
        assert_eq!(mode_line(&player, true), "View Mode: 3D View | Playing | Step 1/500");
        player.tick();
        assert_eq!(mode_line(&player, false), "View Mode: 3D View | Paused | Step 2/500");
    }

    #[test]
    fn test_search_line() {
        let mut search = SearchInput::default();
        assert_eq!(search_line(&search), "Search year: press S");
        search.open();
        search.push_str("1990");
        assert_eq!(search_line(&search), "Search year: 1990_");
    }
}
