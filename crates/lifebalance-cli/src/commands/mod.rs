pub mod balance;
pub mod config;
pub mod habits;
pub mod koan;
pub mod planner;
pub mod timer;

use std::io::{BufRead, Write};

/// Ask a yes/no question on stdin. Anything but `y`/`yes` declines.
pub fn confirm(prompt: &str) -> std::io::Result<bool> {
    let stdin = std::io::stdin();
    confirm_from(prompt, &mut stdin.lock(), &mut std::io::stderr())
}

fn confirm_from(
    prompt: &str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> std::io::Result<bool> {
    write!(output, "{prompt} [y/N] ")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
