//! h5lens - a terminal viewer for HDF5 and netCDF-4 files.

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use h5lens::app::{App, Focus};
use h5lens::config::Settings;
use h5lens::data::MemorySource;
use h5lens::ui;
use h5lens::workspace::TabKind;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "h5lens", version)]
#[command(about = "A terminal viewer for HDF5 and netCDF-4 files", long_about = None)]
struct Args {
    /// Files to open, or a directory to browse
    paths: Vec<PathBuf>,

    /// Enable logging to specified file
    #[arg(long)]
    log: Option<PathBuf>,

    /// Settings file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Open a built-in sample file
    #[arg(long)]
    demo: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging if --log option is provided
    if let Some(log_path) = &args.log {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)?;
        let filter = EnvFilter::try_from_env("H5LENS_LOG").unwrap_or_else(|_| EnvFilter::new("debug"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        tracing::info!("Starting h5lens");
    }

    // Validate paths before touching the terminal
    for path in &args.paths {
        if !path.exists() {
            eprintln!("Error: Path not found: {}", path.display());
            std::process::exit(1);
        }
    }

    let settings_path = args.config.clone().or_else(Settings::default_path);
    let settings = settings_path
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();

    let mut app = App::new(settings, settings_path);
    if args.demo {
        app.open_source(Box::new(MemorySource::demo()));
    }
    for path in &args.paths {
        app.open_path(path);
    }
    if app.files.is_empty() && !app.file_browser_mode {
        app.open_file_browser();
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.save_settings();

    if let Err(err) = res {
        eprintln!("Error: {}", err);
    }

    if args.log.is_some() {
        tracing::info!("h5lens exited");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let mut pending_g = false; // For 'gg' vim binding

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key(app, key, &mut pending_g) {
                        return Ok(());
                    }
                },
                // Terminals deliver dropped files as a paste
                Event::Paste(text) => {
                    let opened = app.handle_paste(&text);
                    if opened > 0 {
                        app.status = format!("Opened {} dropped file(s)", opened);
                    }
                },
                _ => {},
            }
        }
    }
}

/// Dispatch one key press. Returns `true` to quit.
fn handle_key(app: &mut App, key: KeyEvent, pending_g: &mut bool) -> bool {
    if app.error_message.is_some() {
        app.dismiss_error();
        return false;
    }
    if app.file_browser_mode {
        return handle_browser_key(app, key);
    }
    match app.focus {
        Focus::Dims => handle_dims_key(app, key),
        Focus::View => handle_view_key(app, key),
        Focus::Tree => handle_tree_key(app, key, pending_g),
    }
}

fn handle_browser_key(app: &mut App, key: KeyEvent) -> bool {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('q')) => return true,

        (KeyModifiers::NONE, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => {
            app.file_browser.cursor_up();
        },
        (KeyModifiers::NONE, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => {
            app.file_browser.cursor_down();
        },
        (KeyModifiers::NONE, KeyCode::Enter)
        | (KeyModifiers::NONE, KeyCode::Char('l'))
        | (KeyModifiers::NONE, KeyCode::Right) => {
            app.browser_select();
        },
        (KeyModifiers::NONE, KeyCode::Char('h')) | (KeyModifiers::NONE, KeyCode::Left) => {
            app.file_browser.go_to_parent();
        },
        (KeyModifiers::NONE, KeyCode::Char('r')) => app.toggle_recent(),
        (KeyModifiers::NONE, KeyCode::Char('.')) => app.file_browser.toggle_hidden(),
        (KeyModifiers::NONE, KeyCode::Esc) => app.close_file_browser(),
        _ => {},
    }
    false
}

fn handle_dims_key(app: &mut App, key: KeyEvent) -> bool {
    let editing = app.workspace().is_some_and(|ws| ws.dims().is_editing());
    if editing {
        match key.code {
            KeyCode::Enter => app.commit_dims(),
            KeyCode::Esc => {
                if let Some(ws) = app.workspace_mut() {
                    ws.dims_mut().cancel();
                }
            },
            KeyCode::Backspace => {
                if let Some(ws) = app.workspace_mut() {
                    ws.dims_mut().pop();
                }
            },
            KeyCode::Char(c) => {
                if let Some(ws) = app.workspace_mut() {
                    ws.dims_mut().push(c);
                }
            },
            _ => {},
        }
        return false;
    }

    let Some(ws) = app.workspace_mut() else {
        app.focus = Focus::Tree;
        return false;
    };
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('q')) => return true,
        (KeyModifiers::NONE, KeyCode::Left) | (KeyModifiers::NONE, KeyCode::Char('h')) => {
            ws.dims_mut().select_column(-1);
        },
        (KeyModifiers::NONE, KeyCode::Right) | (KeyModifiers::NONE, KeyCode::Char('l')) => {
            ws.dims_mut().select_column(1);
        },
        (KeyModifiers::NONE, KeyCode::Enter) | (KeyModifiers::NONE, KeyCode::Char('e')) => {
            ws.dims_mut().begin();
        },
        (KeyModifiers::NONE, KeyCode::Esc) | (KeyModifiers::NONE, KeyCode::Char('d')) => {
            app.focus = Focus::Tree;
        },
        _ => {},
    }
    false
}

fn handle_view_key(app: &mut App, key: KeyEvent) -> bool {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('q')) => return true,
        (KeyModifiers::NONE, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => {
            app.scroll_view(-1, 0);
        },
        (KeyModifiers::NONE, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => {
            app.scroll_view(1, 0);
        },
        (KeyModifiers::NONE, KeyCode::Left) | (KeyModifiers::NONE, KeyCode::Char('h')) => {
            app.scroll_view(0, -1);
        },
        (KeyModifiers::NONE, KeyCode::Right) | (KeyModifiers::NONE, KeyCode::Char('l')) => {
            app.scroll_view(0, 1);
        },
        (KeyModifiers::CONTROL, KeyCode::Char('d')) => app.scroll_view(10, 0),
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => app.scroll_view(-10, 0),
        (KeyModifiers::NONE, KeyCode::PageDown) | (KeyModifiers::NONE, KeyCode::Char(']')) => {
            app.scroll_frame(1);
        },
        (KeyModifiers::NONE, KeyCode::PageUp) | (KeyModifiers::NONE, KeyCode::Char('[')) => {
            app.scroll_frame(-1);
        },
        (KeyModifiers::NONE, KeyCode::Char('y')) => app.copy_table(),
        (KeyModifiers::NONE, KeyCode::Esc) | (KeyModifiers::NONE, KeyCode::Char('v')) => {
            app.focus = Focus::Tree;
        },
        _ => {},
    }
    false
}

fn handle_tree_key(app: &mut App, key: KeyEvent, pending_g: &mut bool) -> bool {
    let was_pending = std::mem::take(pending_g);
    match (key.modifiers, key.code) {
        // Quit
        (KeyModifiers::NONE, KeyCode::Char('q')) => return true,

        // Navigation
        (KeyModifiers::NONE, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => app.tree_up(),
        (KeyModifiers::NONE, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => {
            app.tree_down();
        },
        (KeyModifiers::NONE, KeyCode::Left) | (KeyModifiers::NONE, KeyCode::Char('h')) => {
            app.tree_collapse();
        },
        (KeyModifiers::NONE, KeyCode::Right)
        | (KeyModifiers::NONE, KeyCode::Char('l'))
        | (KeyModifiers::NONE, KeyCode::Enter) => {
            app.tree_expand();
        },
        (KeyModifiers::NONE, KeyCode::Char('g')) => {
            if was_pending {
                app.tree_jump(false);
            } else {
                *pending_g = true;
            }
        },
        (KeyModifiers::SHIFT, KeyCode::Char('G')) => app.tree_jump(true),

        // View tabs
        (KeyModifiers::NONE, KeyCode::Tab) => app.cycle_tab(true),
        (KeyModifiers::SHIFT, KeyCode::BackTab) | (KeyModifiers::NONE, KeyCode::BackTab) => {
            app.cycle_tab(false);
        },
        (KeyModifiers::NONE, KeyCode::Char('i')) => app.add_tab(TabKind::Image),
        (KeyModifiers::NONE, KeyCode::Char('p')) => app.add_tab(TabKind::Plot),
        (KeyModifiers::NONE, KeyCode::Char('x')) => app.close_tab(),
        (KeyModifiers::NONE, KeyCode::Char(']')) | (KeyModifiers::NONE, KeyCode::PageDown) => {
            app.scroll_frame(1);
        },
        (KeyModifiers::NONE, KeyCode::Char('[')) | (KeyModifiers::NONE, KeyCode::PageUp) => {
            app.scroll_frame(-1);
        },

        // Panes
        (KeyModifiers::NONE, KeyCode::Char('d')) => app.toggle_dims_focus(),
        (KeyModifiers::NONE, KeyCode::Char('v')) => app.focus = Focus::View,
        (KeyModifiers::NONE, KeyCode::Char('t')) => app.toggle_details(),
        (_, KeyCode::Char('<')) => app.resize_tree(-5),
        (_, KeyCode::Char('>')) => app.resize_tree(5),

        // Files
        (KeyModifiers::NONE, KeyCode::Char('o')) => app.open_file_browser(),
        (KeyModifiers::NONE, KeyCode::Char('r')) => app.open_recent(),
        (KeyModifiers::NONE, KeyCode::Char('w')) => {
            app.close_file();
            if app.files.is_empty() {
                app.open_file_browser();
            }
        },
        (KeyModifiers::NONE, KeyCode::Char('.')) => app.next_file(),
        (KeyModifiers::NONE, KeyCode::Char(',')) => app.prev_file(),

        // Appearance
        (KeyModifiers::SHIFT, KeyCode::Char('T')) => app.cycle_theme(),
        (KeyModifiers::SHIFT, KeyCode::Char('C')) => app.cycle_palette(),

        // Clipboard
        (KeyModifiers::NONE, KeyCode::Char('y')) => app.copy_details(),
        (KeyModifiers::NONE, KeyCode::Char('c')) => app.copy_table(),

        _ => {},
    }
    false
}
