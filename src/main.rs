use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mentorboard::export::Clipboard;
use mentorboard::error::ExportResult;
use mentorboard::lesson::{BundledLessons, FileLessonSource, LESSON_CATALOG, LessonSource, load_lesson_file};
use mentorboard::settings::Settings;
use mentorboard::speech::SilentEngine;
use mentorboard::types::Lesson;
use mentorboard::Workspace;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mentorboard", version)]
#[command(about = "Load writing lessons and export their drafts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the lessons on offer
    List,

    /// Validate a lesson and print a summary
    Check {
        /// Lesson id or path to a lesson JSON file
        lesson: String,
    },

    /// Print the lesson's starting draft, or save it as a .txt file
    Export {
        /// Lesson id or path to a lesson JSON file
        lesson: String,

        /// Directory to save the draft in instead of printing it
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Writes "clipboard" text to stdout.
struct StdoutClipboard;

impl Clipboard for StdoutClipboard {
    fn write_text(&mut self, text: &str) -> ExportResult<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", text)
            .and_then(|_| stdout.flush())
            .map_err(|e| mentorboard::error::ExportError::Clipboard(e.to_string()))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = match &cli.settings {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };

    match cli.command {
        Commands::List => {
            for lesson in LESSON_CATALOG.iter() {
                println!("{:<20} {}", lesson.id, lesson.title);
                println!("{:<20} {}", "", lesson.description);
            }
        }
        Commands::Check { lesson } => {
            let lesson = load(&lesson, &settings)?;
            let content = &lesson.mentor_content;
            println!("{} ({})", lesson.title, lesson.id);
            println!("  mentor text: {}", content.title);
            println!("  paragraphs:  {}", content.paragraphs.len());
            println!("  sentences:   {}", content.sentences.len());
            println!("  bank items:  {}", lesson.default_bank.len());
        }
        Commands::Export { lesson, out } => {
            let lesson = load(&lesson, &settings)?;
            let mut workspace = Workspace::new(lesson, settings, SilentEngine);
            match out {
                Some(dir) => {
                    let path = workspace
                        .download(&dir)
                        .with_context(|| format!("Failed to save draft in {}", dir.display()))?;
                    eprintln!("Saved {}", path.display());
                }
                None => workspace
                    .copy_to_clipboard(&mut StdoutClipboard)
                    .context("Failed to write draft")?,
            }
        }
    }
    Ok(())
}

/// Resolve a lesson argument: an existing file path, else an id looked up in
/// the configured lessons directory, else among the bundled lessons.
fn load(lesson: &str, settings: &Settings) -> Result<Lesson> {
    let path = Path::new(lesson);
    if path.extension().is_some_and(|ext| ext == "json") && path.is_file() {
        return load_lesson_file(path).with_context(|| format!("Failed to load {}", path.display()));
    }
    let loaded = match &settings.lessons_dir {
        Some(dir) => FileLessonSource::new(dir).load(lesson),
        None => BundledLessons.load(lesson),
    };
    loaded.map_err(|e| anyhow::anyhow!("{}: {}", e.user_message(lesson), e))
}
