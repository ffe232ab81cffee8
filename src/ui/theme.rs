//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::alert::AlertState;
use crate::data::Channel;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for the normal alert state.
    pub normal: Color,
    /// Color for the alerting state.
    pub alerting: Color,
    /// Color for fetch errors and dropped records.
    pub warning: Color,
    /// Color for borders and axes.
    pub border: Color,
    /// Line color of each chart, in [`Channel::CHARTED`] order.
    pub channels: [Color; 4],
    /// Line colors of the x, y and z axes.
    pub axes: [Color; 3],
    pub header: Style,
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            normal: Color::Green,
            alerting: Color::Red,
            warning: Color::Yellow,
            border: Color::Gray,
            channels: [Color::LightRed, Color::LightYellow, Color::White, Color::White],
            axes: [Color::LightRed, Color::LightGreen, Color::LightBlue],
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            normal: Color::Green,
            alerting: Color::Red,
            warning: Color::Yellow,
            border: Color::DarkGray,
            channels: [Color::Red, Color::Magenta, Color::Black, Color::Black],
            axes: [Color::Red, Color::Green, Color::Blue],
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn alert_style(&self, state: AlertState) -> Style {
        match state {
            AlertState::Normal => Style::default().fg(self.normal),
            AlertState::Alerting => Style::default()
                .fg(self.alerting)
                .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
        }
    }

    pub fn channel_style(&self, channel: Channel) -> Style {
        let color = match channel.axis_index() {
            Some(axis) => self.axes[axis],
            None => {
                let index = Channel::CHARTED.iter().position(|c| *c == channel).unwrap_or(0);
                self.channels[index]
            }
        };
        Style::default().fg(color)
    }
}
