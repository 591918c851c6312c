use owo_colors::OwoColorize;

use pylesson_runner::{Lesson, ProgressFlags, ProgressTracker};
use pylesson_syntax::error::Error;

pub fn render_error(kind: &str, source: &str, err: &Error) {
    eprintln!("{}: {}", kind.red().bold(), err.msg.red());
    if let (Some(line), Some(col)) = (err.line, err.col) {
        eprintln!("  --> line {}, column {}", line, col);
        if let Some(src_line) = source.lines().nth(line.saturating_sub(1)) {
            let line_num_str = format!("{:3} | ", line);
            eprintln!("     |");
            eprintln!("{}{}", line_num_str.bright_black(), src_line);

            let mut marker = " ".repeat(line_num_str.len());
            if col > 1 {
                marker.push_str(&" ".repeat(col - 1));
            }
            marker.push('^');
            eprintln!("{}{}", marker.red(), " starts here".red());
            eprintln!("     |");
        }
    }
    provide_error_suggestions(&err.msg);
}

pub fn provide_error_suggestions(err_msg: &str) {
    if err_msg.contains("is never closed") {
        eprintln!("{}", "Help: A bracket opened here has no matching close.".yellow());
        eprintln!("    {}", "Every ( needs a ), every [ a ] and every { a }".bright_black());
    } else if err_msg.contains("spans more than") {
        eprintln!("{}", "Help: This literal is too long for the sandbox.".yellow());
        eprintln!("    {}", "Check for a missing closing bracket further down".bright_black());
    } else if err_msg.contains("elements, the limit is") {
        eprintln!("{}", "Help: Try a smaller collection.".yellow());
    } else if err_msg.contains("output is larger than") {
        eprintln!("{}", "Help: The program printed too much.".yellow());
        eprintln!("    {}", "Print fewer lines, or smaller collections".bright_black());
    } else if err_msg.contains("source is") {
        eprintln!("{}", "Help: The program is too long for the sandbox.".yellow());
    } else if err_msg.contains("unknown lesson") {
        eprintln!("{}", "Help: Use --list to see the built-in lessons.".yellow());
    } else if err_msg.contains("invalid pattern") {
        eprintln!("{}", "Help: Flag patterns use Rust regex syntax.".yellow());
    }
}

pub fn print_flags(flags: &ProgressFlags) {
    if flags.is_empty() {
        println!("{}", "<no flags>".dimmed());
        return;
    }
    for (name, set) in flags.iter() {
        let mark = if set { "x".green().to_string() } else { " ".to_string() };
        println!("[{}] {}", mark, name.yellow());
    }
}

pub fn print_lessons() {
    for id in pylesson_runner::builtin_ids() {
        match Lesson::builtin(id) {
            Ok(lesson) => println!("{:14} {}", id.yellow(), lesson.title()),
            Err(e) => eprintln!("{}: {}", id.red(), e),
        }
    }
}

/// Writes rewards to the terminal instead of a progress store.
#[derive(Debug, Default)]
pub struct ConsoleTracker {
    pub xp: u32,
    pub coins: u32,
}

impl ProgressTracker for ConsoleTracker {
    fn add_xp_and_coins(&mut self, xp: u32, coins: u32) {
        self.xp += xp;
        self.coins += coins;
        println!("{}", format!("+{} XP, +{} coins", xp, coins).bright_yellow());
    }

    fn complete_level(&mut self, lesson_id: &str) {
        println!("{}", format!("Lesson '{}' complete!", lesson_id).green().bold());
        println!("{}", format!("Total: {} XP, {} coins", self.xp, self.coins).bright_black());
    }
}
