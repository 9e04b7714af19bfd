//! Interactive trip input
//!
//! Asks for whatever the command line left out.

use std::io::{BufRead, Write};

use crate::core::config::TripConfig;
use crate::core::{Result, WayfarerError};

/// Print `label` and read one trimmed line. `None` on end of input.
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<Option<String>> {
    write!(output, "{}", label)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Ask until a non-empty destination is given
pub fn read_destination<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
    loop {
        match ask(input, output, "Destination (e.g., Tokyo, Japan): ")? {
            None => return Err(WayfarerError::invalid_input("Please enter a destination")),
            Some(dest) if dest.is_empty() => {
                writeln!(output, "⚠️  Please enter a destination")?;
            }
            Some(dest) => return Ok(dest),
        }
    }
}

/// Ask for a duration within `limits`. An empty answer takes the default.
pub fn read_days<R: BufRead, W: Write>(input: &mut R, output: &mut W, limits: &TripConfig) -> Result<u32> {
    let label = format!(
        "Duration in days ({}-{}) [{}]: ",
        limits.min_days, limits.max_days, limits.default_days
    );

    loop {
        let Some(answer) = ask(input, output, &label)? else {
            return Ok(limits.default_days);
        };

        if answer.is_empty() {
            return Ok(limits.default_days);
        }

        match answer.parse::<u32>() {
            Ok(days) if (limits.min_days..=limits.max_days).contains(&days) => return Ok(days),
            _ => writeln!(
                output,
                "⚠️  Duration must be between {} and {} days",
                limits.min_days, limits.max_days
            )?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_destination_skips_blank() {
        let mut input = Cursor::new("\n  \nOslo\n");
        let mut output = Vec::new();
        let dest = read_destination(&mut input, &mut output).unwrap();
        assert_eq!(dest, "Oslo");
        assert!(String::from_utf8(output).unwrap().contains("Please enter a destination"));
    }

    #[test]
    fn test_read_destination_eof() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert!(read_destination(&mut input, &mut output).is_err());
    }

    #[test]
    fn test_read_days() {
        let limits = TripConfig::default();
        let mut output = Vec::new();

        let mut input = Cursor::new("\n");
        assert_eq!(read_days(&mut input, &mut output, &limits).unwrap(), 3);

        let mut input = Cursor::new("0\nabc\n45\n7\n");
        assert_eq!(read_days(&mut input, &mut output, &limits).unwrap(), 7);
    }
}
