use std::io::{self, Write};

use owo_colors::OwoColorize;

use pylesson_runner::{run, Lesson, RunOutcome};

use crate::common::{print_flags, print_lessons, render_error};

/// Interactive sandbox: lines collect into a program that `:run` runs fresh.
pub fn start_repl(mut lesson: Lesson) {
    println!(
        "{}",
        "pylesson sandbox. Type code, :run to run it, :help for help.".bold().green()
    );
    println!("{} {}", "lesson:".bright_black(), lesson.id().yellow());

    let mut buffer: Vec<String> = Vec::new();
    let mut last: Option<RunOutcome> = None;
    loop {
        print!("{}", format!("{:>3}> ", buffer.len() + 1).cyan());
        let _ = io::stdout().flush();

        let mut line = String::new();
        let n = match io::stdin().read_line(&mut line) {
            Ok(n) => n,
            Err(_) => {
                println!("<input error>");
                break;
            }
        };
        if n == 0 {
            println!("\nGoodbye.");
            break;
        }
        let trimmed = line.trim_end_matches(&['\r', '\n'][..]);

        if !trimmed.starts_with(':') {
            buffer.push(trimmed.to_string());
            continue;
        }

        let mut parts = trimmed.splitn(2, char::is_whitespace);
        let command = parts.next().unwrap_or("");
        let arg = parts.next().map(str::trim).unwrap_or("");
        match command {
            ":quit" | ":q" | ":exit" => {
                println!("Goodbye.");
                break;
            }
            ":help" | ":h" => print_help(),
            ":run" | ":r" => {
                let source = buffer.join("\n");
                let outcome = run(&source, &lesson);
                match &outcome.fault {
                    None => println!("{}", outcome.output.bright_blue()),
                    Some(e) => {
                        println!("{}", outcome.output.red());
                        render_error("Fault", &source, e);
                    }
                }
                last = Some(outcome);
            }
            ":show" => {
                if buffer.is_empty() {
                    println!("{}", "<empty>".dimmed());
                }
                for (i, l) in buffer.iter().enumerate() {
                    println!("{} {}", format!("{:3} |", i + 1).bright_black(), l);
                }
            }
            ":clear" => {
                buffer.clear();
                last = None;
                println!("{}", "Program cleared.".yellow());
            }
            ":flags" => match &last {
                Some(outcome) => print_flags(&outcome.flags),
                None => println!("{}", "Nothing has run yet. Use :run first.".dimmed()),
            },
            ":lesson" if arg.is_empty() => {
                println!("{} ({})", lesson.id().yellow(), lesson.title());
            }
            ":lesson" => match Lesson::builtin(arg) {
                Ok(l) => {
                    lesson = l;
                    last = None;
                    println!("{} {}", "lesson:".bright_black(), lesson.id().yellow());
                }
                Err(e) => render_error("Error", "", &e),
            },
            ":lessons" => print_lessons(),
            _ => println!("{}", "Unknown command. Type :help.".red()),
        }
    }
}

fn print_help() {
    println!("{}", "Commands:".bold());
    let commands = [
        (":run", "Run the program typed so far"),
        (":show", "Show the program with line numbers"),
        (":clear", "Start a new program"),
        (":flags", "Show progress flags of the last run"),
        (":lesson NAME", "Switch lesson (no NAME shows the current one)"),
        (":lessons", "List built-in lessons"),
        (":help", "Show this help"),
        (":quit", "Exit"),
    ];
    for (name, what) in commands {
        println!("  {:14} {}", name.yellow(), what);
    }
    println!("Any other line is added to the program. Indent loop bodies as in Python.");
}
