use anyhow::Result;
use clap::Parser;
use fetch_quest_core::{
    CellKind, Direction as MoveDirection, Game, LevelState, Position,
    level::{LEVELS, MAX_LEVEL, OBSTACLE_TICK_PERIOD},
};
use ratatui::{
    crossterm::{
        self,
        event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::*,
    widgets::*,
};
use std::{
    io::{self, Stdout},
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Starting level (1-5)
    #[arg(short, long, default_value_t = 1)]
    level: u32,

    /// RNG seed for reproducible layouts and obstacle motion
    #[arg(short, long)]
    seed: Option<u64>,
}

struct App {
    /// The core puzzle engine.
    game: Game,
    /// Flag to control the main loop.
    should_quit: bool,
}

impl App {
    fn new(level: u32, seed: u64) -> Result<Self> {
        let game = Game::from_level(level, seed)?;
        Ok(App {
            game,
            should_quit: false,
        })
    }

    /// Translates one key press into an engine command.
    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('w') => {
                self.game.apply_move(MoveDirection::Up);
            }
            KeyCode::Down | KeyCode::Char('s') => {
                self.game.apply_move(MoveDirection::Down);
            }
            KeyCode::Left | KeyCode::Char('a') => {
                self.game.apply_move(MoveDirection::Left);
            }
            KeyCode::Right | KeyCode::Char('d') => {
                self.game.apply_move(MoveDirection::Right);
            }
            KeyCode::Char('r') => self.game.restart_level(),
            KeyCode::Char('n') => {
                if self.game.state().won {
                    self.game.next_level();
                }
            }
            _ => {}
        }
    }

    /// Fires the periodic obstacle relocation.
    fn obstacle_tick(&mut self) {
        self.game.tick_obstacles();
    }

    fn state(&self) -> &LevelState {
        self.game.state()
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or(0)
    });

    // Create the application state before touching the terminal so an
    // invalid --level fails with a plain error message.
    let mut app = App::new(args.level, seed)?;

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;

    result
}

/// Configures the terminal for TUI interaction.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(Into::into)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Runs the main loop of the TUI application.
fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let poll_rate = Duration::from_millis(250);
    let obstacle_period = Duration::from_secs(OBSTACLE_TICK_PERIOD);
    let mut last_obstacle_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        // Poll for events (keyboard, mouse, etc.)
        if crossterm::event::poll(poll_rate)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key.code);
            }
        }

        // The engine owns no timer; the obstacle cadence lives here.
        if last_obstacle_tick.elapsed() >= obstacle_period {
            app.obstacle_tick();
            last_obstacle_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Renders the user interface.
fn ui(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),    // Area for the board
            Constraint::Length(6),  // Area for status
            Constraint::Length(2),  // Area for help text
        ])
        .split(frame.area());

    render_board(frame, main_layout[0], app.state());
    render_status(frame, main_layout[1], app.state());

    let help_text = Paragraph::new(
        "Arrows/WASD move \u{2022} r restart \u{2022} n next level \u{2022} q quit",
    )
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help_text, main_layout[2]);
}

fn cell_span(cell: CellKind) -> Span<'static> {
    match cell {
        CellKind::Empty => Span::raw(" . "),
        CellKind::Wall => Span::styled(" # ", Style::default().fg(Color::DarkGray)),
        CellKind::Agent => Span::styled(" @ ", Style::default().fg(Color::Cyan).bold()),
        CellKind::Goal => Span::styled(" * ", Style::default().fg(Color::Green)),
        CellKind::Key => Span::styled(" k ", Style::default().fg(Color::Yellow)),
        CellKind::Door => Span::styled(" + ", Style::default().fg(Color::Magenta)),
        CellKind::Obstacle => Span::styled(" m ", Style::default().fg(Color::Red)),
    }
}

/// Renders the board onto the frame.
fn render_board(frame: &mut Frame, area: Rect, state: &LevelState) {
    let size = state.grid.size();
    let mut lines: Vec<Line> = Vec::with_capacity(size);
    for y in 0..size {
        let mut spans: Vec<Span> = Vec::with_capacity(size);
        for x in 0..size {
            let pos = Position::new(x, y);
            spans.push(cell_span(state.grid[pos]));
        }
        lines.push(Line::from(spans));
    }

    let board = Paragraph::new(lines)
        .block(Block::default().title("Fetch Quest").borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(board, area);
}

/// Renders the level stats and the win/loss banner.
fn render_status(frame: &mut Frame, area: Rect, state: &LevelState) {
    let tier_name = LEVELS[(state.level_number - 1) as usize].name;

    // Flag the counter once 80% of the budget is spent.
    let moves_style = if state.moves_used * 5 >= state.move_budget * 4 {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };

    let mut lines = vec![
        Line::from(format!(
            "Level {} ({tier_name})  \u{2022}  Goals left: {}",
            state.level_number,
            state.goals_remaining()
        )),
        Line::from(Span::styled(
            format!("Moves: {}/{}", state.moves_used, state.move_budget),
            moves_style,
        )),
    ];
    if state.has_key {
        lines.push(Line::from(Span::styled(
            "Key in paw!",
            Style::default().fg(Color::Yellow),
        )));
    }
    if state.won {
        let hint = if state.level_number < MAX_LEVEL {
            "n: next level, r: replay"
        } else {
            "All levels cleared! r: replay"
        };
        lines.push(Line::from(Span::styled(
            format!("Level complete in {} moves! {hint}", state.moves_used),
            Style::default().fg(Color::Green).bold(),
        )));
    } else if state.lost {
        lines.push(Line::from(Span::styled(
            "Out of moves! r: try again",
            Style::default().fg(Color::Red).bold(),
        )));
    }

    let status =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, area);
}
