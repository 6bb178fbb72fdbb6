//! Operator confirmation before a migration starts.

use std::io::{BufRead, Write};

use crate::error::{CoreError, CoreResult};

pub const CONFIRMATION_MESSAGE: &str = "A migration will start, and this assumes you have configured \
the config.yaml file and set the following environment variables \
TF_VAR_spacelift_api_key_id, TF_VAR_spacelift_api_key_secret and VCS_TOKEN.\n\
Press y or yes to continue: ";

/// Only `y` and `yes` (surrounding whitespace ignored) count as consent.
pub fn is_affirmative(input: &str) -> bool {
    matches!(input.trim(), "y" | "yes")
}

/// Print the confirmation message and read one line of consent.
///
/// Returns [`CoreError::Aborted`] for any other answer, including end of input.
pub fn confirm<R: BufRead, W: Write>(mut input: R, mut output: W) -> CoreResult<()> {
    output.write_all(CONFIRMATION_MESSAGE.as_bytes())?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    if is_affirmative(&answer) {
        Ok(())
    } else {
        Err(CoreError::Aborted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_accepts_y_and_yes() {
        for answer in ["y\n", "yes\n", "  yes\r\n", "y"] {
            let mut out = Vec::new();
            confirm(Cursor::new(answer), &mut out).unwrap();
            assert!(String::from_utf8(out).unwrap().ends_with("Press y or yes to continue: "));
        }
    }

    #[test]
    fn test_rejects_everything_else() {
        for answer in ["n\n", "Y\n", "YES\n", "yes please\n", "yess\n", "\n", ""] {
            let err = confirm(Cursor::new(answer), Vec::new()).unwrap_err();
            assert!(matches!(err, CoreError::Aborted), "accepted {answer:?}");
        }
    }
}
