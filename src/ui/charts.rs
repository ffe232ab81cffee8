//! Line charts of the rolling channel windows.
//!
//! Missing readings split a series into separate runs so the gap shows up
//! as a break in the line rather than being interpolated across.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::Line,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::{Channel, ChannelSeries};
use crate::render::Dashboard;

/// Render the four charted channels in a 2x2 grid.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area);
    let cells: Vec<Rect> = rows
        .iter()
        .flat_map(|row| {
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(*row)
                .to_vec()
        })
        .collect();

    for (channel, cell) in Channel::CHARTED.iter().zip(cells) {
        render_chart(frame, app, *channel, app.dashboard.as_ref(), cell);
    }
}

fn render_chart(frame: &mut Frame, app: &App, channel: Channel, dashboard: Option<&Dashboard>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let series = dashboard.and_then(|d| d.series(channel));
    let lines = dashboard.map(|d| plotted_lines(channel, |c| d.series(c))).unwrap_or_default();
    let Some(series) = series.filter(|s| !s.points.is_empty()) else {
        let p = Paragraph::new("Waiting for data...")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block.title(format!(" {} ", channel.title())));
        frame.render_widget(p, area);
        return;
    };

    let with_legend = lines.len() > 1;
    let mut datasets = Vec::new();
    for (line_channel, runs) in &lines {
        let style = app.theme.channel_style(*line_channel);
        for (i, run) in runs.iter().enumerate() {
            let graph_type = if run.len() == 1 { GraphType::Scatter } else { GraphType::Line };
            let mut dataset = Dataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(graph_type)
                .style(style)
                .data(run);
            if with_legend && i == 0 {
                dataset = dataset.name(line_channel.legend());
            }
            datasets.push(dataset);
        }
    }

    let all_runs: Vec<Vec<(f64, f64)>> = lines.iter().flat_map(|(_, runs)| runs.iter().cloned()).collect();
    let (y_min, y_max) = y_bounds(&all_runs);
    let capacity = dashboard.map_or(0, |d| d.window_capacity);
    let x_max = (capacity.max(series.points.len()).saturating_sub(1) as f64).max(1.0);
    let first_label = series.points.first().map_or("", |(label, _)| label.as_str());
    let last_label = series.points.last().map_or("", |(label, _)| label.as_str());

    let axis_style = Style::default().fg(app.theme.border);
    let chart = Chart::new(datasets)
        .block(block.title(format!(" {}  {} ", channel.title(), format_latest(series))))
        .x_axis(
            Axis::default()
                .style(axis_style)
                .bounds([0.0, x_max])
                .labels(vec![Line::from(first_label.to_string()), Line::from(last_label.to_string())]),
        )
        .y_axis(
            Axis::default()
                .style(axis_style)
                .bounds([y_min, y_max])
                .labels(vec![Line::from(format!("{y_min:.1}")), Line::from(format!("{y_max:.1}"))]),
        );

    frame.render_widget(chart, area);
}

/// The runs drawn in one chart: the channel itself, then any of its axes
/// that have at least one present reading.
pub fn plotted_lines<'a>(
    channel: Channel,
    lookup: impl Fn(Channel) -> Option<&'a ChannelSeries>,
) -> Vec<(Channel, Vec<Vec<(f64, f64)>>)> {
    std::iter::once(channel)
        .chain(channel.axes().iter().copied())
        .filter_map(|c| {
            let runs = segments(lookup(c)?);
            (!runs.is_empty()).then_some((c, runs))
        })
        .collect()
}

fn format_latest(series: &ChannelSeries) -> String {
    match series.latest().value() {
        Some(v) => format!("{v:.2}"),
        None => "N/A".to_string(),
    }
}

/// Split a series into runs of consecutive present readings, as
/// `(index, value)` points.
pub fn segments(series: &ChannelSeries) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();

    for (i, (_, reading)) in series.points.iter().enumerate() {
        match reading.value() {
            Some(v) => current.push((i as f64, v)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Y-axis bounds padded around the plotted values.
fn y_bounds(runs: &[Vec<(f64, f64)>]) -> (f64, f64) {
    let values = runs.iter().flatten().map(|&(_, v)| v);
    let (min, max) = values.fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if min > max {
        return (0.0, 1.0);
    }
    let pad = ((max - min) * 0.1).max(0.5);
    (min - pad, max + pad)
}
