//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, Paragraph};

use crate::units::JOULES_PER_WH;

use super::runtime::App;
use super::style;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(10),   // chart
            Constraint::Length(3), // SOC gauge
            Constraint::Length(6), // status panel
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_chart(frame, app, chunks[1]);
    render_soc_gauge(frame, app, chunks[2]);
    render_status(frame, app, chunks[3]);
    render_footer(frame, chunks[4]);
}

/// Header bar: scenario name, step progress, speed, run state.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (state_icon, state_label) = if app.error.is_some() {
        ("✗", "FAILED")
    } else if app.is_finished() {
        ("■", "DONE")
    } else if app.paused {
        ("‖", "PAUSED")
    } else {
        ("▶", "RUNNING")
    };
    let hours = app.last_record().map_or(0.0, |r| r.time_s / 3600.0);

    let header = Line::from(vec![
        Span::styled(
            " VEHICLE-SIM ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            app.scenario_name(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " │ step {}/{} │ {:.2}h │ {}ms │ {} {} ",
            app.timestep(),
            app.total_steps(),
            hours,
            app.tick_interval_ms(),
            state_icon,
            state_label,
        )),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// Rolling chart of the selected series against race time.
fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let data = app.series_points();
    let y_bounds = style::auto_bounds_y(&data);

    let x_lo = data.first().map_or(0.0, |p| p.0);
    let x_hi = data.last().map_or(1.0, |p| p.0).max(x_lo + 0.1);

    let datasets = vec![
        Dataset::default()
            .name(app.series_name().to_string())
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(style::SERIES_COLOR))
            .data(&data),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(format!(" {} ", app.series_name()))
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("h")
                .bounds([x_lo, x_hi])
                .labels(vec![format!("{x_lo:.2}"), format!("{x_hi:.2}")]),
        )
        .y_axis(
            Axis::default()
                .bounds(y_bounds)
                .labels(vec![
                    format!("{:.1}", y_bounds[0]),
                    format!("{:.1}", y_bounds[1]),
                ]),
        );

    frame.render_widget(chart, area);
}

/// Battery state-of-charge gauge.
fn render_soc_gauge(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title(" SOC ").borders(Borders::ALL);
    let gauge = match app.battery_soc() {
        Some(soc) => Gauge::default()
            .block(block)
            .gauge_style(Style::default().fg(style::soc_color(soc)))
            .ratio(soc.clamp(0.0, 1.0))
            .label(format!("{:.0}%", soc * 100.0)),
        None => Gauge::default().block(block).ratio(0.0).label("n/a"),
    };
    frame.render_widget(gauge, area);
}

/// Status panel: latest step and cumulative energy per model.
fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    if let Some(err) = &app.error {
        lines.push(Line::from(Span::styled(
            format!("  {err}"),
            Style::default().fg(style::ERROR_FG),
        )));
    }
    match app.last_record() {
        Some(r) => {
            lines.push(Line::from(format!(
                "  v={:>5.2} m/s  dist={:>7.2} km  energy={:>8.1} Wh  net={:>+7.2} Wh",
                app.param("velocity").unwrap_or(0.0),
                r.distance_m / 1000.0,
                r.total_energy_j / JOULES_PER_WH,
                r.net_energy_j / JOULES_PER_WH,
            )));
            let spans: Vec<Span> = app
                .energy_by_model()
                .map(|(name, e)| {
                    Span::styled(
                        format!("  {name}={:+.1}Wh", e / JOULES_PER_WH),
                        Style::default().fg(style::energy_color(e)),
                    )
                })
                .collect();
            lines.push(Line::from(spans));
        }
        None => lines.push(Line::from("  Waiting for first step...")),
    }

    let block = Block::default().title(" Status ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  Space:Pause  +/-:Speed  Tab:Series  1/2/3:Preset  r:Restart",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}
