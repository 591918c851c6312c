mod common;
mod repl;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use log::LevelFilter;
use owo_colors::OwoColorize;

use pylesson_runner::{run, Lesson, FAULT_MESSAGE};
use pylesson_syntax::error::{Error, Result};

use common::{print_flags, print_lessons, render_error, ConsoleTracker};

#[derive(Parser, Debug)]
#[command(name = "pylesson", about = "Run lesson code in the Python collections sandbox")]
struct Cli {
    /// Program to run. Starts the REPL when omitted.
    file: Option<PathBuf>,

    /// Built-in lesson whose grammar and flags apply
    #[arg(short = 'l', long = "lesson", default_value = "playground")]
    lesson: String,

    /// Lesson config as JSON; takes precedence over --lesson
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Print the lesson's progress flags after the run
    #[arg(long = "flags", default_value_t = false)]
    flags: bool,

    /// Award the lesson reward when the run succeeds
    #[arg(long = "complete", default_value_t = false)]
    complete: bool,

    /// List built-in lessons and exit
    #[arg(long = "list", default_value_t = false)]
    list: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn read_source(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::new(format!("File not found: {}", path.display())));
    }
    fs::read_to_string(path)
        .map_err(|e| Error::new(format!("Failed to read {}: {}", path.display(), e)))
}

fn load_lesson(cli: &Cli) -> Result<Lesson> {
    match &cli.config {
        Some(path) => Lesson::from_json(&read_source(path)?),
        None => Lesson::builtin(&cli.lesson),
    }
}

fn fail(err: &Error) -> ! {
    eprintln!("{}: {}", "error".red().bold(), err.to_string().red());
    common::provide_error_suggestions(&err.msg);
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.list {
        print_lessons();
        return;
    }

    let lesson = match load_lesson(&cli) {
        Ok(l) => l,
        Err(e) => fail(&e),
    };

    let path = match &cli.file {
        Some(p) => p,
        None => {
            repl::start_repl(lesson);
            return;
        }
    };
    let src = match read_source(path) {
        Ok(s) => s,
        Err(e) => fail(&e),
    };

    let outcome = run(&src, &lesson);
    match &outcome.fault {
        None => println!("{}", outcome.output),
        Some(e) => {
            eprintln!("{}", FAULT_MESSAGE);
            render_error("Fault", &src, e);
        }
    }
    if cli.flags {
        print_flags(&outcome.flags);
    }
    if outcome.is_fault() {
        std::process::exit(1);
    }
    if cli.complete {
        lesson.award(&mut ConsoleTracker::default());
    }
}
