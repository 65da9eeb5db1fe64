use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::{Direction, GameConfig, GameStatus, SnakeEngine, Tile, rasterize_game};
use log::{LevelFilter, info};
use simplelog::{Config, WriteLogger};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

#[derive(Parser)]
#[command(name = "grid-snake")]
#[command(version, about = "Classic snake on a square grid")]
struct Cli {
    /// TOML file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid side length in cells
    #[arg(long)]
    grid_size: Option<i32>,

    /// Milliseconds between ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut cfg = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        if let Some(size) = self.grid_size {
            cfg.grid_size = size;
        }
        if let Some(ms) = self.tick_ms {
            cfg.tick_millis = ms;
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        WriteLogger::init(cli.log_level, Config::default(), file)
            .context("failed to initialize logger")?;
    }

    let cfg = cli.game_config()?;
    let mut game = SnakeEngine::new(cfg).context("failed to start game")?;
    info!(
        "starting with config:\n{}",
        game.config().to_toml_string()?
    );

    // --- Init terminal ---
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let res = run(&mut terminal, &mut game);

    // --- Restore terminal even on error ---
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    game: &mut SnakeEngine,
) -> Result<()> {
    let tick_rate = Duration::from_millis(game.config().tick_millis);
    let mut last_tick = Instant::now();

    loop {
        // --- Input (non-blocking) ---
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(game, key) {
                    info!("quit with score {}", game.state().score());
                    return Ok(());
                }
            }
        }

        // --- Tick ---
        // Ticks stop once the game is over; `r` restarts them.
        if last_tick.elapsed() >= tick_rate {
            if game.state().is_alive() {
                game.step();
            }
            last_tick = Instant::now();
        }

        terminal.draw(|f| draw(f, game))?;
    }
}

fn draw(f: &mut ratatui::Frame, game: &SnakeEngine) {
    let area = f.area();
    let state = game.state();
    let size = game.config().grid_size;

    let status = match state.status() {
        GameStatus::Running => "hjkl/arrows to steer".to_owned(),
        GameStatus::Dead => format!("Game Over! Final score: {}  (r retry, q quit)", state.score()),
        GameStatus::Won => format!("You win! Final score: {}  (r retry, q quit)", state.score()),
    };
    let title = format!(" Snake - score: {} ", state.score());

    let lines: Vec<Line> = rasterize_game(state, size)
        .rows()
        .map(|row| Line::from(row.iter().map(|&t| tile_span(t)).collect::<Vec<_>>()))
        .collect();

    // Two terminal columns per cell keeps cells roughly square.
    let outer_w = (size as u16).saturating_mul(2).saturating_add(2);
    let outer_h = (size as u16).saturating_add(2);
    let x = area.x.saturating_add(area.width.saturating_sub(outer_w) / 2);
    let y = area.y.saturating_add(area.height.saturating_sub(outer_h + 1) / 2);
    let frame_area = Rect::new(x, y, outer_w, outer_h).intersection(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.bold())
        .style(Style::default().bg(Color::Rgb(0, 17, 0)));
    f.render_widget(Paragraph::new(lines).block(block), frame_area);

    let status_area = Rect::new(area.x, frame_area.bottom(), area.width, 1).intersection(area);
    let status_style = match state.status() {
        GameStatus::Running => Style::default(),
        GameStatus::Dead => Style::default().fg(Color::Red).bold(),
        GameStatus::Won => Style::default().fg(Color::Green).bold(),
    };
    f.render_widget(
        Paragraph::new(Span::styled(status, status_style)).alignment(Alignment::Center),
        status_area,
    );
}

fn tile_span(tile: Tile) -> Span<'static> {
    let color = match tile {
        Tile::Empty => return Span::raw("  "),
        Tile::Head => Color::LightGreen,
        Tile::Body => Color::Green,
        Tile::Food => Color::Yellow,
    };
    Span::styled("██", Style::default().fg(color))
}

/// Returns true if the caller should quit.
fn handle_key(game: &mut SnakeEngine, key: KeyEvent) -> bool {
    let dir = match key.code {
        // Quit keys
        KeyCode::Char('q') => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,

        KeyCode::Char('k') | KeyCode::Up => Direction::Up,
        KeyCode::Char('j') | KeyCode::Down => Direction::Down,
        KeyCode::Char('h') | KeyCode::Left => Direction::Left,
        KeyCode::Char('l') | KeyCode::Right => Direction::Right,

        // Retry after the game ends
        KeyCode::Char('r') => {
            if !game.state().is_alive() {
                game.reset();
            }
            return false;
        }

        _ => return false,
    };
    // The pad is disabled while the game is over.
    if game.state().is_alive() {
        game.set_direction(dir);
    }
    false
}
