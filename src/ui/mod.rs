//! Terminal UI rendering using ratatui.
//!
//! ## Submodules
//!
//! - [`charts`]: line charts of the four channel windows
//! - [`common`]: header, status bar and help overlay
//! - [`theme`]: light/dark theme support with terminal auto-detection
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────┬───────────────────┤
//! │ Heart rate       │ Temperature       │
//! ├──────────────────┼───────────────────┤
//! │ Acceleration     │ Gyroscope         │
//! ├──────────────────┴───────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    common::render_help draws on top
//! ```

pub mod charts;
pub mod common;
pub mod theme;

pub use theme::Theme;
