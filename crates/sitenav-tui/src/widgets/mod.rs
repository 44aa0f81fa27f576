//! Reusable widgets shared by the screens.

pub mod persistent_header;
pub mod sub_tabs;
pub mod text_input;
pub mod website_card;
