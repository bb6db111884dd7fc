use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyCode, KeyEventKind, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use region_pulse::app::App;
use region_pulse::config::{self, DashboardConfig};
use region_pulse::data::StatisticMode;
use region_pulse::session::SessionStorage;
use region_pulse::{telemetry, ui};
use std::rc::Rc;
use std::time::{Duration, Instant};

fn main() -> Result<()> {
    let (config, source) = config::load_config_from_env();
    telemetry::init(&config.log_path).context("logging setup failed")?;
    source.log();

    // Routing input: first argument, else the configured region
    let route = std::env::args().nth(1).unwrap_or_else(|| config.region.clone());

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    execute!(std::io::stdout(), EnableMouseCapture, EnableFocusChange)?;

    let result = run(&mut terminal, &config, &route);

    let _ = execute!(std::io::stdout(), DisableFocusChange, DisableMouseCapture);
    ratatui::restore();

    if let Err(err) = &result {
        tracing::error!(target: "region_pulse::app", error = %err, "app.exited_with_error");
    }
    result
}

/// Mouse wheel scrolls the left column
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.scroll_by(-3),
        MouseEventKind::ScrollDown => app.scroll_by(3),
        _ => {}
    }
}

fn handle_key(app: &mut App, code: KeyCode) {
    let now = Instant::now();
    match code {
        KeyCode::Char('q') => app.quit(),

        // Statistic mode
        KeyCode::Char('m') | KeyCode::Tab => app.cycle_mode(),
        KeyCode::Char('1') => app.set_mode(StatisticMode::Confirmed),
        KeyCode::Char('2') => app.set_mode(StatisticMode::Active),
        KeyCode::Char('3') => app.set_mode(StatisticMode::Recovered),
        KeyCode::Char('4') => app.set_mode(StatisticMode::Deceased),

        // District highlight
        KeyCode::Right | KeyCode::Down | KeyCode::Char('l') | KeyCode::Char('j') => {
            app.step_highlight(1)
        }
        KeyCode::Left | KeyCode::Up | KeyCode::Char('h') | KeyCode::Char('k') => {
            app.step_highlight(-1)
        }
        KeyCode::Esc => app.clear_highlight(),

        // Parent region
        KeyCode::Char('[') => app.cycle_region(-1),
        KeyCode::Char(']') => app.cycle_region(1),

        KeyCode::Char('v') | KeyCode::Char('V') => app.toggle_expanded(),
        KeyCode::PageUp => app.scroll_by(-10),
        KeyCode::PageDown => app.scroll_by(10),

        KeyCode::Char('r') => app.reload_snapshot(now),
        KeyCode::Char('R') => app.reload_timeseries(now),

        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, config: &DashboardConfig, route: &str) -> Result<()> {
    let size = terminal.size()?;
    let session = Rc::new(match config.session_id() {
        Some(id) => SessionStorage::open(&id),
        None => SessionStorage::in_memory(),
    });
    let mut app = App::new(config, route, session, size.width, size.height);
    app.mount(Instant::now());

    // Main loop
    loop {
        app.observe_visibility();
        let view = app.view();
        terminal.draw(|frame| ui::render(frame, &view))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(&mut app, key.code),
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => app.resize(width, height),
                Event::FocusGained => app.on_focus(Instant::now()),
                _ => {}
            }
        }

        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
