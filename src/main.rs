use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{error, info};

use typesprint::app::{App, AppScreen};
use typesprint::config::Config;
use typesprint::event::{AppEvent, EventHandler};
use typesprint::logging;
use typesprint::store::json_store::default_data_dir;
use typesprint::ui;
use typesprint::ui::components::board::Board;
use typesprint::ui::components::game_over::GameOver;
use typesprint::ui::components::hud::Hud;
use typesprint::ui::components::leaderboard::Leaderboard;
use typesprint::ui::components::profile::ProfileView;
use typesprint::ui::components::progress_bar::ProgressBar;
use typesprint::ui::components::{HintSet, hints};
use typesprint::ui::layout::{GameLayout, pack_hint_lines};
use typesprint::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "typesprint", version, about = "Type the falling words before they land")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Player name shown on leaderboards")]
    name: Option<String>,

    #[arg(long, help = "Play with the built-in word list only")]
    offline: bool,

    #[arg(long, help = "Base URL of the word and score service")]
    api_url: Option<String>,

    #[arg(long, help = "Seed for word placement and fall speeds")]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = logging::init(&default_data_dir());

    let mut config = Config::load().unwrap_or_default();
    if let Some(name) = cli.name {
        config.player_name = name;
    }
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    if cli.offline {
        config.network_enabled = false;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    config.normalize();

    let mut app = App::new(config, cli.seed);
    if let Ok(path) = &log_path {
        info!(path = %path.display(), "logging to file");
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let keyboard_enhanced = execute!(
        io::stdout(),
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
    )
    .is_ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let size = terminal.size()?;
    app.resize(size.width, size.height);

    let events = EventHandler::new(Duration::from_millis(50));
    app.connect(events.sender());

    let result = run_app(&mut terminal, &mut app, &events);

    if keyboard_enhanced {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(error = ?err, "game loop failed");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    let mut last_frame = Instant::now();
    loop {
        terminal.draw(|frame| render(frame, app))?;

        let event = events.next()?;
        // Game time follows the wall clock regardless of which event woke us.
        let now = Instant::now();
        app.advance(now.duration_since(last_frame));
        last_frame = now;

        match event {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => {}
            AppEvent::Resize(w, h) => app.resize(w, h),
            AppEvent::WordsFetched { ticket, result } => app.on_words_fetched(ticket, result),
            AppEvent::RemoteScores(Ok(rows)) => app.on_remote_scores(rows),
            AppEvent::RemoteScores(Err(e)) => tracing::warn!(error = %e, "leaderboard fetch failed"),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Only Press events: Repeat would double-type and Release carries no input.
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Game => handle_game_key(app, key),
        AppScreen::GameOver => handle_game_over_key(app, key),
        AppScreen::Leaderboard => handle_leaderboard_key(app, key),
        AppScreen::Profile => handle_profile_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => {
            if let Some(action) = app.menu.selected_action() {
                app.activate_menu(action);
            }
        }
        KeyCode::Char(ch) => {
            if let Some(action) = app.menu.action_for_key(ch) {
                app.activate_menu(action);
            }
        }
        _ => {}
    }
}

fn handle_game_key(app: &mut App, key: KeyEvent) {
    if app.is_paused() {
        match key.code {
            KeyCode::Esc => app.toggle_pause(),
            KeyCode::Char('q') => app.exit_game(),
            _ => {}
        }
        return;
    }
    match key.code {
        KeyCode::Esc => app.toggle_pause(),
        KeyCode::Enter => app.submit(),
        KeyCode::Tab => app.activate_power(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(ch) => app.type_char(ch),
        _ => {}
    }
}

fn handle_game_over_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') | KeyCode::Enter => app.start_game(),
        KeyCode::Char('l') => app.go_to_leaderboard(),
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        _ => {}
    }
}

fn handle_leaderboard_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.go_to_leaderboard(),
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        _ => {}
    }
}

fn handle_profile_key(app: &mut App, key: KeyEvent) {
    if app.bio_draft.is_some() {
        match key.code {
            KeyCode::Enter => app.commit_bio(),
            KeyCode::Esc => app.cancel_bio(),
            KeyCode::Backspace => app.bio_pop(),
            KeyCode::Char(ch) => app.bio_push(ch),
            _ => {}
        }
        return;
    }
    match key.code {
        KeyCode::Char('e') => app.start_bio_edit(),
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, frame.area());

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Game => render_game(frame, app),
        AppScreen::GameOver => render_game_over(frame, app),
        AppScreen::Leaderboard => render_leaderboard(frame, app),
        AppScreen::Profile => render_profile(frame, app),
    }
}

fn render_footer(frame: &mut ratatui::Frame, theme: &Theme, set: HintSet, area: Rect) {
    let entries = hints(set);
    let refs: Vec<&str> = entries.iter().map(String::as_str).collect();
    let line = pack_hint_lines(&refs, area.width as usize)
        .into_iter()
        .next()
        .unwrap_or_default();
    let footer = Paragraph::new(Line::from(Span::styled(
        line,
        Style::default().fg(theme.colors.accent_dim()),
    )));
    frame.render_widget(footer, area);
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let p = &app.profile;
    let streak_text = if p.login_streak > 1 {
        format!(" | {} day streak", p.login_streak)
    } else {
        String::new()
    };
    let header_info = format!(" {} | Best {}{}", p.username, p.highest_score, streak_text);
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " typesprint ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            header_info,
            Style::default().fg(colors.fg()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout[0]);

    let menu_area = ui::layout::centered_rect(50, 80, layout[1]);
    frame.render_widget(&app.menu, menu_area);

    render_footer(frame, app.theme, HintSet::Menu, layout[2]);
}

fn render_game(frame: &mut ratatui::Frame, app: &App) {
    let Some(session) = app.session.as_ref() else {
        return;
    };
    let colors = &app.theme.colors;
    let layout = GameLayout::new(frame.area());

    frame.render_widget(
        Hud::new(session, app.theme).compact(layout.tier.compact_hud()),
        layout.hud,
    );
    frame.render_widget(Board::new(session, app.theme), layout.board);

    if let Some(area) = layout.progress {
        let tuning = session.tuning();
        let bar = match session.intermission_remaining() {
            Some(left) => {
                let total = tuning.intermission_secs.max(1) as f64;
                ProgressBar::new("Next round", 1.0 - left as f64 / total, app.theme)
                    .caption(format!("{left}s"))
            }
            None => {
                let total = tuning.round_secs.max(1) as f64;
                ProgressBar::new(
                    &format!("Round {}", session.round()),
                    session.timer() as f64 / total,
                    app.theme,
                )
                .caption(format!("{}s", session.timer()))
            }
        };
        frame.render_widget(bar, area);
    }

    let input_style = match session.feedback() {
        Some(m) if !m.ok => Style::default().fg(colors.word_wrong()),
        Some(_) => Style::default().fg(colors.word_matched()),
        None => Style::default().fg(colors.fg()),
    };
    let input = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(colors.accent())),
        Span::styled(session.input().to_string(), input_style),
        Span::styled("\u{2588}", Style::default().fg(colors.accent_dim())),
    ]))
    .block(
        Block::bordered().border_style(Style::default().fg(colors.border_focused())),
    );
    frame.render_widget(input, layout.input);

    let set = if session.is_paused() {
        HintSet::Paused
    } else {
        HintSet::Game
    };
    render_footer(frame, app.theme, set, layout.footer);
}

fn render_game_over(frame: &mut ratatui::Frame, app: &App) {
    let Some(summary) = app.last_summary.as_ref() else {
        return;
    };
    let area = ui::layout::centered_rect(50, 60, frame.area());
    frame.render_widget(GameOver::new(summary, app.previous_best, app.theme), area);
}

fn render_leaderboard(frame: &mut ratatui::Frame, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());
    let local = app.local_top();
    frame.render_widget(
        Leaderboard::new(&local, app.remote_top.as_deref(), app.theme),
        layout[0],
    );
    render_footer(frame, app.theme, HintSet::Leaderboard, layout[1]);
}

fn render_profile(frame: &mut ratatui::Frame, app: &App) {
    let area = ui::layout::centered_rect(60, 70, frame.area());
    frame.render_widget(
        ProfileView::new(&app.profile, app.bio_draft.as_deref(), app.theme),
        area,
    );
}
