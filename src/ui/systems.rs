//! Keyboard handling for playback, view mode, event list and year search

use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;

use crate::playback::{PlaybackClock, Player};
use crate::ui::state::{DetailsPanel, EventSelection, SearchInput};
use crate::visualization::AxesConfig;

/// Feeds typed characters into the search field while it has focus.
/// Runs before [`playback_controls_system`] so the key that opens the
/// field is not typed into it.
pub fn search_input_system(
    mut keys: MessageReader<KeyboardInput>,
    mut search: ResMut<SearchInput>,
    mut player: ResMut<Player>,
    mut details: ResMut<DetailsPanel>,
) {
    for event in keys.read() {
        if !search.focused || event.state != ButtonState::Pressed {
            continue;
        }
        match &event.logical_key {
            Key::Enter => {
                let text = search.submit();
                match player.search_text(&text) {
                    Ok(fix) => {
                        details.clear_notice();
                        details.show_fix(&fix);
                    }
                    Err(err) => {
                        info!("Year search {:?} rejected: {}", text, err);
                        details.show_error(&err);
                    }
                }
            }
            Key::Escape => {
                search.cancel();
                details.clear_notice();
            }
            Key::Backspace => search.backspace(),
            Key::Space => search.push_str(" "),
            Key::Character(text) => search.push_str(text),
            _ => {}
        }
    }
}

/// Playback shortcuts, ignored while the search field has focus
pub fn playback_controls_system(
    input: Res<ButtonInput<KeyCode>>,
    mut search: ResMut<SearchInput>,
    mut clock: ResMut<PlaybackClock>,
    mut player: ResMut<Player>,
    mut selection: ResMut<EventSelection>,
    mut details: ResMut<DetailsPanel>,
    mut axes: ResMut<AxesConfig>,
) {
    if search.focused {
        return;
    }

    if input.just_pressed(KeyCode::Space) {
        clock.toggle();
        details.info(if clock.running { "Playing" } else { "Paused" });
    }

    if input.just_pressed(KeyCode::KeyR) {
        player.reset();
        let report = player.report();
        details.show_tick(&report);
        details.clear_pinned();
        details.info("Back at the start of the path");
    }

    if input.just_pressed(KeyCode::KeyV) {
        let mode = player.mode().toggled();
        player.set_mode(mode);
        info!("View mode: {}", mode.label());
    }

    if input.just_pressed(KeyCode::KeyA) {
        axes.enabled = !axes.enabled;
    }

    if input.just_pressed(KeyCode::KeyS) || input.just_pressed(KeyCode::Slash) {
        search.open();
        details.info("Type a year, Enter to search, Esc to cancel");
    }

    let len = player.catalog().len();
    let picked = if input.just_pressed(KeyCode::ArrowDown) {
        selection.next(len)
    } else if input.just_pressed(KeyCode::ArrowUp) {
        selection.previous(len)
    } else {
        None
    };
    if let Some(index) = picked {
        match player.select_event(index) {
            Ok(_) => {
                if let Some(event) = player.catalog().get(index) {
                    details.show_event(event);
                }
                details.clear_notice();
            }
            Err(err) => details.show_error(&err),
        }
    }
}
