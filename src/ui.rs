use chrono::Local;
use ratatui::{prelude::*, widgets::*};

use crate::app::{App, View, ANIMATION_FRAMES};
use crate::controller::{InvalidDurationError, Mode, TimeField, TimerConfiguration};

// ============================================================================
// UI Rendering
// ============================================================================

pub fn render_ui(f: &mut Frame, app: &App) {
    match app.current_view {
        View::Help => render_help(f, app),
        View::Timer => match app.timer.mode() {
            Mode::Configuring(config) => render_configuring(f, app, config),
            Mode::Counting(_) => render_counting(f, app),
        },
    }
}

fn frame_block(app: &App) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme.border_color))
        .title(Span::styled(" ⏳ TMINUS ", Style::default()
            .fg(app.theme.accent_color).add_modifier(Modifier::BOLD)))
        .title_alignment(Alignment::Center)
}

fn render_configuring(f: &mut Frame, app: &App, config: &TimerConfiguration) {
    let outer = frame_block(app);
    let inner = outer.inner(f.size());
    f.render_widget(outer, f.size());

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(3), Constraint::Length(1),
            Constraint::Length(1), Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(inner);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(8), Constraint::Length(8), Constraint::Length(8),
            Constraint::Min(0),
        ])
        .split(rows[1]);

    for (i, field) in TimeField::ALL.into_iter().enumerate() {
        let selected = app.selected_field == field;
        let style = if selected {
            Style::default().fg(app.theme.accent_color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.digits_color)
        };
        let arrow = Style::default().fg(if selected { app.theme.accent_color } else { Color::DarkGray });
        let lines = vec![
            Line::from(Span::styled("▲", arrow)),
            Line::from(Span::styled(format!("{}{}", config.get(field), field.unit()), style)),
            Line::from(Span::styled("▼", arrow)),
        ];
        f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), columns[i + 1]);
    }

    f.render_widget(
        Paragraph::new(format!("= {}", app.timer.formatted_remaining()))
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        rows[3]
    );

    f.render_widget(
        Paragraph::new(Line::from(vec![
            span_key("Enter", app), Span::raw(" Start  •  "),
            span_key("←→", app), Span::raw(" Field  •  "),
            span_key("↑↓", app), Span::raw(" Adjust  •  "),
            span_key("?", app), Span::raw(" Help  •  "),
            span_key("Q", app), Span::raw(" Quit"),
        ]))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center),
        rows[8]
    );

    if app.timer.has_notice() {
        render_snackbar(f, app, rows[7]);
    }
}

fn render_snackbar(f: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(InvalidDurationError.to_string(), Style::default()
            .fg(Color::White).add_modifier(Modifier::BOLD)),
        Span::raw("   "),
        Span::styled("[Esc] Dismiss", Style::default()
            .fg(Color::Magenta).add_modifier(Modifier::BOLD)),
    ]);
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .block(Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(app.theme.urgent_color))),
        area
    );
}

fn render_counting(f: &mut Frame, app: &App) {
    let outer = frame_block(app);
    let inner = outer.inner(f.size());
    f.render_widget(outer, f.size());

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1), Constraint::Length(1),
            Constraint::Length(3), Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    let finished = app.timer.is_finished();
    let urgent = app.timer.is_urgent() && !finished;
    let pulse = pulse_color(app.animation_frame, app.theme.urgent_color);

    let (text, digits) = if finished {
        ("Time is over!".to_string(), app.theme.digits_color)
    } else {
        (app.timer.formatted_remaining(), if urgent { pulse } else { app.theme.digits_color })
    };
    f.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(digits).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        rows[1]
    );

    if let (false, Some(fraction)) = (finished, app.timer.progress_fraction()) {
        let bar = if urgent { pulse } else { app.theme.progress_color };
        let gauge_area = centered_rect(70, 100, rows[3]);
        f.render_widget(
            Gauge::default()
                .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded))
                .gauge_style(Style::default().fg(bar).bg(Color::Black))
                .ratio(fraction.clamp(0.0, 1.0))
                .label(""),
            gauge_area
        );
    }

    let now = Local::now();
    let mut clock = vec![Line::from(Span::styled(
        now.format("%A, %B %d, %Y  %H:%M").to_string(),
        Style::default().fg(Color::Gray),
    ))];
    if let (false, Some(ends)) = (finished, app.ends_at) {
        clock.push(Line::from(Span::styled(
            format!("Ends at {}", ends.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        )));
    }
    f.render_widget(Paragraph::new(clock).alignment(Alignment::Center), rows[5]);

    f.render_widget(
        Paragraph::new(Line::from(vec![
            span_key("R", app), Span::raw(" Restart  •  "),
            span_key("T", app), Span::raw(" Theme  •  "),
            span_key("?", app), Span::raw(" Help  •  "),
            span_key("Q", app), Span::raw(" Quit"),
        ]))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center),
        rows[7]
    );
}

fn span_key<'a>(text: &'a str, app: &App) -> Span<'a> {
    Span::styled(text, Style::default().fg(app.theme.accent_color).add_modifier(Modifier::BOLD))
}

/// White to `urgent` and back once per animation cycle.
pub fn pulse_color(frame: u8, urgent: Color) -> Color {
    let half = ANIMATION_FRAMES / 2;
    let step = frame % ANIMATION_FRAMES;
    let t = f64::from(if step < half { step } else { ANIMATION_FRAMES - step }) / f64::from(half);

    let (r, g, b) = match urgent {
        Color::Rgb(r, g, b) => (r, g, b),
        _ => (255, 0, 0),
    };
    let mix = |to: u8| (255.0 + (f64::from(to) - 255.0) * t).round() as u8;
    Color::Rgb(mix(r), mix(g), mix(b))
}

fn render_help(f: &mut Frame, app: &App) {
    let area = centered_rect(70, 85, f.size());

    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled("⌨️  KEYBOARD SHORTCUTS", Style::default().fg(app.theme.accent_color).add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from("  Setting the time:"),
        help_line("← → / H L / Tab", "Select hours, minutes or seconds"),
        help_line("↑ ↓ / K J", "Adjust the selected field (wraps around)"),
        help_line("Enter / Space", "Start the countdown"),
        help_line("Esc / X", "Dismiss a warning"),
        Line::from(""),
        Line::from("  While counting:"),
        help_line("R / Enter / Esc", "Stop and start over"),
        Line::from(""),
        Line::from("  General:"),
        help_line("T / Shift+T", "Next / previous colour theme"),
        help_line("?", "Toggle help"),
        help_line("Q / Ctrl+C", "Quit"),
        Line::from(""),
        Line::from(Span::styled(format!("💡 Theme: {}", app.theme_name()),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))),
    ];

    f.render_widget(
        Paragraph::new(help_text)
            .alignment(Alignment::Left)
            .block(Block::default()
                .title(" Help ")
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(app.theme.border_color))),
        area
    );
}

fn help_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw("    "),
        Span::styled(key, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {}", desc)),
    ])
}

fn centered_rect(w: u16, h: u16, r: Rect) -> Rect {
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h) / 2),
            Constraint::Percentage(h),
            Constraint::Percentage((100 - h) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w) / 2),
            Constraint::Percentage(w),
            Constraint::Percentage((100 - w) / 2),
        ])
        .split(v[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::controller::{Direction as Dir, TimerController};
    use ratatui::backend::TestBackend;

    fn app_with(timer: TimerController) -> App {
        let config = Config {
            sound_enabled: false,
            notifications_enabled: false,
            ..Config::default()
        };
        App::new(config, timer, std::env::temp_dir())
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| render_ui(f, app)).unwrap();
        terminal.backend().buffer().content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn configuring_screen_shows_fields_and_notice() {
        let mut timer = TimerController::default();
        timer.adjust_field(TimeField::Minutes, Dir::Up);
        let mut app = app_with(timer);
        let text = screen(&app);
        assert!(text.contains("0h"));
        assert!(text.contains("1m"));
        assert!(text.contains("0s"));
        assert!(!text.contains(&InvalidDurationError.to_string()));

        app.timer.adjust_field(TimeField::Minutes, Dir::Down);
        let _ = app.timer.start();
        let text = screen(&app);
        assert!(text.contains("Select a valid amount of time!"));
        assert!(text.contains("Dismiss"));
    }

    #[test]
    fn counting_screen_shows_remaining_then_time_is_over() {
        let preset = TimerConfiguration::from_total_seconds(65).unwrap();
        let mut app = app_with(TimerController::new(preset));
        app.start();
        let text = screen(&app);
        assert!(text.contains("01:05"));
        assert!(text.contains("Ends at"));

        for _ in 0..65 {
            app.timer.tick();
        }
        let text = screen(&app);
        assert!(text.contains("Time is over!"));
        assert!(!text.contains("Ends at"));
    }

    #[test]
    fn help_screen_lists_keys() {
        let mut app = app_with(TimerController::default());
        app.current_view = View::Help;
        assert!(screen(&app).contains("KEYBOARD SHORTCUTS"));
    }

    #[test]
    fn pulse_runs_white_to_urgent_and_back() {
        assert_eq!(pulse_color(0, Color::Red), Color::Rgb(255, 255, 255));
        assert_eq!(pulse_color(10, Color::Red), Color::Rgb(255, 0, 0));
        assert_eq!(pulse_color(10, Color::Rgb(191, 97, 106)), Color::Rgb(191, 97, 106));
        assert_eq!(pulse_color(5, Color::Red), pulse_color(15, Color::Red));
    }
}
