//! A terminal news browser: a filterable card grid with live search,
//! bookmarks, and a detail overlay that grows out of the selected card.

pub mod app;
pub mod article;
pub mod browser;
pub mod config;
pub mod hit;
pub mod keybindings;
pub mod motion;
pub mod theme;
pub mod ui;
pub mod util;
