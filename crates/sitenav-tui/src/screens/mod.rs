//! Screen implementations. Each screen is a top-level Component.

pub mod browse;
pub mod submit;

use sitenav_config::UiSettings;
use sitenav_core::Directory;

use crate::component::Component;
use crate::screen::ScreenId;

use self::browse::{BrowseMode, BrowseScreen};
use self::submit::SubmitScreen;

/// Create screen components for the tabs the directory's role can reach.
pub fn create_screens(
    directory: &Directory,
    ui: UiSettings,
) -> Vec<(ScreenId, Box<dyn Component>)> {
    let browse = |mode| -> Box<dyn Component> {
        Box::new(BrowseScreen::new(
            mode,
            directory.clone(),
            ui.header_fade_distance,
            ui.scroll_step,
        ))
    };

    ScreenId::for_role(directory.role())
        .into_iter()
        .map(|id| {
            let screen: Box<dyn Component> = match id {
                ScreenId::Home => browse(BrowseMode::Home),
                ScreenId::Moderation => browse(BrowseMode::Moderation),
                ScreenId::Submit => Box::new(SubmitScreen::new(directory.clone())),
            };
            (id, screen)
        })
        .collect()
}
