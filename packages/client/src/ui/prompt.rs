//! Prompt helpers for the interactive terminal.

use std::io::Write;

/// Prompt shown before user input, e.g. `alice> `
pub fn prompt_for(username: &str) -> String {
    format!("{}> ", username)
}

/// Redisplay the prompt after printing asynchronous output
pub fn redisplay_prompt(username: &str) {
    print!("{}", prompt_for(username));
    std::io::stdout().flush().ok();
}
