use crossterm::style::Stylize;
use std::io::{BufRead, Write};

/// Affirmative answers ("igen").
const AFFIRMATIVE: &[&str] = &["i", "I"];

/// Print the irreversible-deletion warning.
pub fn print_warning_banner(out: &mut dyn Write, styled: bool) -> std::io::Result<()> {
    let lines = [
        "WARNING: this will permanently delete build artifacts, generated",
        "reports, deprecated scripts and temporary files from the project.",
        "There is no undo.",
    ];
    writeln!(out)?;
    for line in lines {
        if styled {
            writeln!(out, "{}", line.red().bold())?;
        } else {
            writeln!(out, "{}", line)?;
        }
    }
    writeln!(out)?;
    writeln!(out, "Continue? Type 'i' to proceed, anything else aborts.")?;
    Ok(())
}

/// Show the `> ` prompt and read one line. Only `i`/`I` confirms; EOF declines.
pub fn confirm(input: &mut dyn BufRead, out: &mut dyn Write) -> std::io::Result<bool> {
    write!(out, "> ")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(false);
    }
    Ok(is_affirmative(&line))
}

fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim_end_matches(['\r', '\n']).trim();
    AFFIRMATIVE.contains(&answer)
}
