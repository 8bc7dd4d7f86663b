//! Password input from the environment, a pipe, or an interactive prompt.

use std::io::{self, IsTerminal, Read};

use dialoguer::Password;
use zeroize::Zeroizing;

use crate::constants::PASSWORD_ENV;
use crate::errors::CliError;

/// Read the password to hash or verify.
///
/// Sources, in order: `COSTFLOOR_PASSWORD`, piped stdin, hidden prompt.
/// `confirm` asks twice when prompting interactively.
pub fn read_password(confirm: bool) -> anyhow::Result<Zeroizing<String>> {
    if let Ok(value) = std::env::var(PASSWORD_ENV) {
        if !value.is_empty() {
            return Ok(Zeroizing::new(value));
        }
    }

    if !io::stdin().is_terminal() {
        let mut buffer = Zeroizing::new(String::new());
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        let password = Zeroizing::new(strip_line_ending(&buffer).to_string());
        if password.is_empty() {
            return Err(CliError::invalid_input("No password provided on stdin").into());
        }
        return Ok(password);
    }

    let prompt = Password::new().with_prompt("Password");
    let prompt = if confirm {
        prompt.with_confirmation("Confirm password", "Passwords do not match")
    } else {
        prompt
    };
    prompt
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Drop one trailing newline; other whitespace is part of the password.
fn strip_line_ending(input: &str) -> &str {
    input
        .strip_suffix("\r\n")
        .or_else(|| input.strip_suffix('\n'))
        .unwrap_or(input)
}
