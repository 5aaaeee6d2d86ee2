use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use formation_terminal::config::Config;
use formation_terminal::controller::FormController;
use formation_terminal::fields::Field;
use formation_terminal::form::Focus;
use formation_terminal::panel;
use formation_terminal::predict_fetch::HttpTransport;
use formation_terminal::provider::spawn_prediction_worker;
use formation_terminal::state::{AppState, Delta, ResultPanel, apply_delta};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let config = Config::from_env();

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let mut state = AppState::new();
    let worker = match HttpTransport::new(config.request_timeout) {
        Ok(transport) => Some(spawn_prediction_worker(
            transport,
            config.api_url.clone(),
            tx,
            cmd_rx,
        )),
        Err(err) => {
            state.push_log(format!("[WARN] Prediction client unavailable: {err:#}"));
            None
        }
    };
    let cmd_tx = worker.as_ref().map(|_| cmd_tx);
    state.push_log(format!("[INFO] Endpoint: {}", config.api_url));
    let mut controller = FormController::new(state, &config, cmd_tx);

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend).context("create terminal")?;

    let res = run_app(&mut terminal, &mut controller, rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    controller.shutdown();
    if let Err(err) = res {
        eprintln!("error: {err:#}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    controller: &mut FormController,
    rx: mpsc::Receiver<Delta>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(50);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut controller.state, delta);
        }

        terminal.draw(|f| ui(f, controller))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    controller.on_key(key, Instant::now());
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            controller.tick(Instant::now());
            last_tick = Instant::now();
        }

        if controller.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, controller: &FormController) {
    let state = &controller.state;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new("FORMATION PREDICTOR | match stats -> suggested formation")
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);
    render_form(frame, body[0], controller);
    render_result(frame, body[1], &state.result);

    let console = Paragraph::new(panel::console_text(state, 4))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(
        "Tab/↑/↓ Move | Enter Predict | Esc Cancel | Del Clear | F1 Help | Ctrl+C Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn render_form(frame: &mut Frame, area: Rect, controller: &FormController) {
    let state = &controller.state;
    let mut constraints: Vec<Constraint> =
        Field::ALL.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Length(3));
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for field in Field::ALL {
        let input = state.form.field(field);
        let focused = state.form.focus == Focus::Field(field);
        let mut border = Style::default();
        if input.is_marked_invalid() {
            border = border.fg(Color::Red);
        } else if focused {
            border = border.fg(Color::Cyan);
        }
        let mut block = Block::default()
            .title(panel::field_title(field))
            .borders(Borders::ALL)
            .border_style(border);
        if let Some(err) = &input.error {
            block = block.title_bottom(Line::styled(err.as_str(), Style::default().fg(Color::Red)));
        }
        let text = if focused {
            format!("{}_", input.buffer)
        } else {
            input.buffer.clone()
        };
        frame.render_widget(Paragraph::new(text).block(block), rows[field.index()]);
    }

    let button_style = if !state.submit_enabled() {
        Style::default().fg(Color::DarkGray)
    } else if controller.focus_is_submit() {
        Style::default().fg(Color::Black).bg(Color::Green)
    } else {
        Style::default().fg(Color::Green)
    };
    let button = Paragraph::new(panel::submit_label(state))
        .alignment(Alignment::Center)
        .style(button_style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(button, rows[Field::ALL.len()]);
}

fn render_result(frame: &mut Frame, area: Rect, result: &ResultPanel) {
    let style = match result {
        ResultPanel::Empty => Style::default().fg(Color::DarkGray),
        ResultPanel::Success { .. } => Style::default().fg(Color::Green),
        ResultPanel::Failure { .. } => Style::default().fg(Color::Red),
    };
    let paragraph = Paragraph::new(panel::result_text(result))
        .style(style)
        .wrap(Wrap { trim: false })
        .block(Block::default().title("Result").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Formation Predictor - Help",
        "",
        "Form:",
        "  Tab / ↓      Next field",
        "  Shift+Tab/↑  Previous field",
        "  Backspace    Delete character",
        "  Del          Clear field",
        "  Enter        Predict (Ctrl+S also works)",
        "",
        "While predicting:",
        "  Esc          Cancel the request",
        "  any edit     Cancels and keeps your change",
        "",
        "  F1           Toggle help",
        "  Ctrl+C       Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
