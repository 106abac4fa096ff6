use std::io::{self, Write};
use std::panic;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use inkpost::{app, export, logging, markdown, store::FileStore};

#[derive(Parser)]
#[command(name = "inkpost", version, about = "A terminal editor for markdown posts")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// File to open for editing
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export markdown to a standalone, sanitized HTML page
    Export {
        /// Markdown file to export
        file: PathBuf,
        /// Output .html path (defaults to same name with .html extension)
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<PathBuf>,
        /// Page title (defaults to the file name)
        #[arg(long)]
        title: Option<String>,
        /// Write the page to stdout instead of a file
        #[arg(long)]
        stdout: bool,
    },
    /// Print the sanitized preview markup for a markdown file
    Render {
        /// Markdown file to render
        file: PathBuf,
    },
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    logging::init();

    // Handle subcommands first
    match cli.command {
        Some(Commands::Export {
            file,
            output,
            title,
            stdout,
        }) => return handle_export(&file, output, title.as_deref(), stdout),
        Some(Commands::Render { file }) => return handle_render(&file),
        None => {}
    }

    // No subcommand — must have a file argument
    let file = match cli.file {
        Some(f) => f,
        None => {
            eprintln!("Usage: inkpost <FILE>, inkpost export <FILE> or inkpost render <FILE>");
            std::process::exit(1);
        }
    };

    if !file.exists() {
        std::fs::write(&file, "")?;
    }

    run_editor(file)
}

/// Handles `inkpost export file.md` — writes the HTML page and exits.
fn handle_export(
    file: &Path,
    output: Option<PathBuf>,
    title: Option<&str>,
    stdout: bool,
) -> io::Result<()> {
    if stdout {
        return match export::export_string(file, title) {
            Ok(page) => io::stdout().write_all(page.as_bytes()),
            Err(e) => fail(&format!("Export failed: {}", e)),
        };
    }

    let html_path = output.unwrap_or_else(|| file.with_extension("html"));
    match export::export_file(file, &html_path, title) {
        Ok(()) => {
            println!("Exported to {}", html_path.display());
            Ok(())
        }
        Err(e) => fail(&format!("Export failed: {}", e)),
    }
}

/// Handles `inkpost render file.md` — prints the sanitized markup.
fn handle_render(file: &Path) -> io::Result<()> {
    let source = match std::fs::read_to_string(file) {
        Ok(source) => source,
        Err(e) => return fail(&format!("Error: cannot read {}: {}", file.display(), e)),
    };
    println!("{}", markdown::render_safe(&source));
    Ok(())
}

fn fail(message: &str) -> io::Result<()> {
    tracing::warn!("{}", message);
    eprintln!("{}", message);
    std::process::exit(1);
}

/// Sets up the terminal, runs the TUI editor, and restores the terminal on exit.
fn run_editor(file_path: PathBuf) -> io::Result<()> {
    // Load before touching the terminal so errors print normally
    let app = match app::App::new(Box::new(FileStore::new(file_path))) {
        Ok(app) => app,
        Err(e) => return fail(&format!("Error: {}", e)),
    };

    // Setup panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run app
    let result = run_app(&mut terminal, app);

    // Restore terminal
    restore_terminal()?;

    if let Err(e) = result {
        tracing::warn!(error = %e, "editor exited with error");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: app::App,
) -> io::Result<()> {
    loop {
        app.render_frame(terminal)?;

        // Block up to 100ms waiting for the first event (prevents busy-loop,
        // gives tick() a chance to run ~10x/sec for timer expiry).
        if event::poll(Duration::from_millis(100))? {
            // Drain all queued events without blocking, then render immediately.
            loop {
                let ev = event::read()?;
                app.handle_event(ev);
                if app.should_quit {
                    break;
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    Ok(())
}
