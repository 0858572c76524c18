use std::io::{self, BufRead, Write};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DelayError {
    #[error("{0:?} is not a number of seconds")]
    NotANumber(String),
    #[error("delay cannot be negative")]
    Negative,
    #[error("delay must be a finite number of seconds")]
    NotFinite,
}

/// Parse a broadcast delay such as `12` or `2.5` (seconds).
pub fn parse_delay(raw: &str) -> Result<Duration, DelayError> {
    let raw = raw.trim();
    let secs: f64 = raw
        .parse()
        .map_err(|_| DelayError::NotANumber(raw.to_string()))?;
    if !secs.is_finite() {
        return Err(DelayError::NotFinite);
    }
    if secs < 0.0 {
        return Err(DelayError::Negative);
    }
    Duration::try_from_secs_f64(secs).map_err(|_| DelayError::NotFinite)
}

/// Print `label` and read one line. `None` on end of input.
pub fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> io::Result<Option<String>> {
    write!(output, "{label}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_whole_and_fractional_seconds() {
        assert_eq!(parse_delay("12"), Ok(Duration::from_secs(12)));
        assert_eq!(parse_delay(" 2.5 \n"), Ok(Duration::from_millis(2500)));
        assert_eq!(parse_delay("0"), Ok(Duration::ZERO));
    }

    #[test]
    fn rejects_bad_delays() {
        assert_eq!(parse_delay("soon"), Err(DelayError::NotANumber("soon".into())));
        assert_eq!(parse_delay("-1"), Err(DelayError::Negative));
        assert_eq!(parse_delay("inf"), Err(DelayError::NotFinite));
        assert_eq!(parse_delay("NaN"), Err(DelayError::NotFinite));
    }

    #[test]
    fn ask_reads_one_line_and_echoes_label() {
        let mut input = Cursor::new("alice\r\nbob\n");
        let mut output = Vec::new();
        let first = ask(&mut input, &mut output, "name: ").unwrap();
        let second = ask(&mut input, &mut output, "name: ").unwrap();
        let third = ask(&mut input, &mut output, "name: ").unwrap();
        assert_eq!(first.as_deref(), Some("alice"));
        assert_eq!(second.as_deref(), Some("bob"));
        assert_eq!(third, None);
        assert_eq!(String::from_utf8(output).unwrap(), "name: name: name: ");
    }
}
