//! Terminal User Interface module.
//!
//! This module provides the TUI for the news browser, including:
//! - Main event loop (`run`)
//! - Keyboard and mouse input handling for grid, search, and detail modes
//! - Rendering for the header, card grid, and detail overlay
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard and mouse input handling
//! - `render` - Frame layout and draw order
//! - `header` - Title, subtitle, and search box
//! - `grid` - Responsive card grid and the card in flight
//! - `card` - Single article card widget
//! - `detail` - Detail overlay and backdrop
//! - `status` - Status bar widget
//! - `help` - Keybinding help overlay

mod card;
mod detail;
mod grid;
mod header;
mod help;
mod input;
mod loop_runner;
mod render;
mod status;

// Re-export the public API
pub use input::{handle_input, handle_mouse};
pub use loop_runner::{run, Action};
pub use render::render;
