mod app;
mod editor;
mod ui;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use quizdown_config::Config;
use quizdown_engine::{FileStorage, MountHost, QuizConfig, QuizOptions, SiteLoader, init};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    env, fs,
    io::{Stdout, stdout},
    path::Path,
    process,
    time::{Duration, Instant},
};

use app::App;

const MOUNT_ID: &str = "quiz";
const LOG_FILE: &str = "quizdown.log";
const TICK: Duration = Duration::from_millis(100);

/// The terminal offers a single mount point.
struct TerminalHost;

impl MountHost for TerminalHost {
    fn has_element(&self, id: &str) -> bool {
        id == MOUNT_ID
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [questionnaire-source]", args[0]);
        process::exit(1);
    }

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Fix or remove {}", Config::config_path().display());
            process::exit(1);
        }
    };

    let state_dir = config.state_dir();
    init_logging(&state_dir, config.debug.unwrap_or(false))?;
    log::info!("quizdown starting, state in {}", state_dir.display());

    let options = quiz_options(&config, args.get(1).cloned())?;
    let quiz_config = QuizConfig::from_options(options).with_on_submit(|submission| {
        log::info!(
            "Submission of {} answer(s) at {}",
            submission.answers.len(),
            submission.timestamp.to_rfc3339()
        );
    });

    let current_dir = env::current_dir().context("Failed to read the current directory")?;
    let loader = SiteLoader::new(current_dir);
    let quiz = init(
        &TerminalHost,
        MOUNT_ID,
        quiz_config,
        &loader,
        FileStorage::new(&state_dir),
    )
    .context("Failed to start the quiz")?;
    let mut app = App::new(quiz);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);
    app.finish();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    if let Some(submission) = &app.submission {
        println!("{}", serde_json::to_string_pretty(submission)?);
    }

    Ok(())
}

/// Log to a file in the state directory, since the terminal belongs to the
/// UI. `RUST_LOG` overrides the level picked from the `debug` setting.
fn init_logging(state_dir: &Path, debug: bool) -> Result<()> {
    fs::create_dir_all(state_dir)
        .with_context(|| format!("Failed to create state directory {}", state_dir.display()))?;
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(state_dir.join(LOG_FILE))?;

    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}

/// Quiz options from the config file, with a command-line source taking
/// precedence.
fn quiz_options(config: &Config, source: Option<String>) -> Result<QuizOptions> {
    let state = match &config.state {
        Some(table) => match serde_json::to_value(table)? {
            serde_json::Value::Object(map) => Some(map),
            _ => None,
        },
        None => None,
    };

    Ok(QuizOptions {
        source: source.or_else(|| config.source.clone()),
        debug: config.debug,
        expiry_in_days: config.expiry_in_days,
        submission_id: config.submission_id.clone(),
        state,
    })
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App<FileStorage>) -> Result<()> {
    loop {
        terminal.draw(|f| ui::ui(f, app))?;

        if event::poll(TICK)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key.code, Instant::now());
        }
        app.tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}
