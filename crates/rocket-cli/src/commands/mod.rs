// crates/rocket-cli/src/commands/mod.rs
//
// Command module declarations for the Rocket CLI.

pub mod buyer;
pub mod clock;
pub mod init;
pub mod operator;
pub mod status;

use rocket_core::{parse_units, Amount};

use crate::error::CliError;

/// Parse a decimal token amount, or `max` for the largest representable amount.
pub fn parse_amount(text: &str) -> Result<Amount, CliError> {
    if text.eq_ignore_ascii_case("max") {
        return Ok(Amount::MAX);
    }
    Ok(parse_units(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket_core::units;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12").unwrap(), units(12));
        assert_eq!(parse_amount("MAX").unwrap(), Amount::MAX);
        assert!(parse_amount("twelve").is_err());
    }
}
