//! Common UI components: header bar, status bar and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::alert::{AlertState, EventLocation};
use crate::app::App;

/// Render the header bar.
///
/// Displays: alert state, last known location, cycle count, an empty-fetch
/// marker and dropped records.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref dashboard) = app.dashboard else {
        let line = Line::from(vec![
            Span::styled(" VITALWATCH ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let state_style = app.theme.alert_style(dashboard.alert_state);
    let state_label = match dashboard.alert_state {
        AlertState::Normal => "NORMAL",
        AlertState::Alerting => "EMERGENCY",
    };
    let location = dashboard
        .latest
        .as_ref()
        .map_or(EventLocation::Unknown, |s| s.location);

    let mut spans = vec![
        Span::styled(" ● ", state_style),
        Span::styled("VITALWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(state_label, state_style),
        Span::raw(" │ "),
        Span::raw(format!("📍 {}", location)),
        Span::raw(" │ "),
        Span::raw(format!("cycle {}", dashboard.cycle)),
        Span::raw(" │ "),
        Span::raw(format!("{}/{} samples", dashboard.window_len(), dashboard.window_capacity)),
    ];

    if dashboard.records_in_fetch == 0 {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled("no data", Style::default().fg(app.theme.warning)));
    }

    if dashboard.warnings_total > 0 {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("{} dropped", dashboard.warnings_total),
            Style::default().fg(app.theme.warning),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the status bar at the bottom.
///
/// Shows: source, time since last update, fetch error, available controls.
/// Temporary status messages take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = "e:export ?:help q:quit";
    let fetch_error = app.dashboard.as_ref().and_then(|d| d.fetch_error.as_deref());

    if let Some(err) = fetch_error {
        let paragraph = Paragraph::new(format!(" {} | Error: {} | {}", app.source_description(), err, controls))
            .style(Style::default().fg(app.theme.warning));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = match app.seconds_since_update() {
        Some(secs) => format!(
            " {} | Updated {}s ago | {}",
            app.source_description(),
            secs,
            controls
        ),
        None => format!(" {} | Loading... | q:quit", app.source_description()),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the charts.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from("  e         Export dashboard to JSON"),
        Line::from("  ?         Toggle this help"),
        Line::from("  q / Esc   Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Charts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  Gaps mark missing readings"),
        Line::from("  Header turns red on emergency"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 14u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
