//! The interactive gate in front of production runs.

use std::io::{self, BufRead, Write};

/// Ask the operator to confirm a production run of `script`.
///
/// Only `yes` (any case, surrounding whitespace ignored) confirms. An empty
/// answer or end of input declines.
pub fn confirm_production(script: &str, mut input: impl BufRead, mut output: impl Write) -> io::Result<bool> {
    write!(
        output,
        "You are about to run '{script}' against PRODUCTION. Type 'yes' to continue: "
    )?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(text: &str) -> bool {
        let mut prompt = Vec::new();
        let confirmed = confirm_production("update-user", text.as_bytes(), &mut prompt).unwrap();
        assert!(String::from_utf8(prompt).unwrap().contains("'update-user' against PRODUCTION"));
        confirmed
    }

    #[test]
    fn yes_in_any_case_confirms() {
        assert!(answer("yes\n"));
        assert!(answer("YES\n"));
        assert!(answer("  Yes  \n"));
    }

    #[test]
    fn anything_else_declines() {
        assert!(!answer("no\n"));
        assert!(!answer("y\n"));
        assert!(!answer("yes please\n"));
        assert!(!answer("\n"));
        assert!(!answer(""));
    }
}
