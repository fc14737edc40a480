use anyhow::{Context, Result, bail};
use std::io::{self, BufRead, Write};

use crate::logger::Logger;

const YES: &[&str] = &["y", "ye", "yes", "yeah", "sure"];
const NO: &[&str] = &["n", "no", "nah"];

/// Map one line of user input to an answer.
///
/// Case-insensitive; surrounding whitespace ignored. `None` means the input
/// matched neither token set and the caller should re-prompt.
pub fn classify(input: &str) -> Option<bool> {
    let token = input.trim().to_lowercase();
    if YES.contains(&token.as_str()) {
        Some(true)
    } else if NO.contains(&token.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Ask the user a yes/no question and block until a recognized answer.
///
/// The question and the chosen answer are both logged as INFO. Unrecognized
/// input re-prompts. A closed stdin is an error; there is nothing sensible
/// to answer on behalf of an absent user.
pub fn confirm(logger: &Logger, message: &str) -> Result<bool> {
    let prompt = format!("{message} [y/n]: ");
    logger.info("prompt", &format!("Prompting user for input: '{prompt}'"));

    let stdin = io::stdin();
    loop {
        print!("{prompt}");
        io::stdout().flush().context("failed to flush stdout")?;

        let mut input = String::new();
        let read = stdin
            .lock()
            .read_line(&mut input)
            .context("failed to read user input")?;
        if read == 0 {
            bail!("stdin closed while waiting for confirmation");
        }

        match classify(&input) {
            Some(true) => {
                logger.info("prompt", "User selected 'yes' option");
                return Ok(true);
            }
            Some(false) => {
                logger.info("prompt", "User selected 'no' option");
                return Ok(false);
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affirmative_tokens_match_case_insensitively() {
        for token in ["y", "ye", "yes", "yeah", "sure", "YES", "Sure", " y "] {
            assert_eq!(classify(token), Some(true), "token: {token:?}");
        }
    }

    #[test]
    fn negative_tokens_match_case_insensitively() {
        for token in ["n", "no", "nah", "NO", "Nah", "n\n"] {
            assert_eq!(classify(token), Some(false), "token: {token:?}");
        }
    }

    #[test]
    fn anything_else_reprompts() {
        for token in ["", "maybe", "yess", "nope", "0", "true"] {
            assert_eq!(classify(token), None, "token: {token:?}");
        }
    }
}
