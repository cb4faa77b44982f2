use std::io::{self, BufRead, Write};

/// Writes `label`, then reads one line from `input`, trimmed.
/// Returns `None` at end of input.
pub fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> io::Result<Option<String>> {
    write!(output, "{}", label)?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::prompt;
    use std::io::Cursor;

    #[test]
    fn reads_one_line_per_prompt() {
        let mut input = Cursor::new("Asia/Shanghai\nAmerica/New_York\n");
        let mut output = Vec::new();
        assert_eq!(
            prompt(&mut input, &mut output, "Region 1: ").unwrap(),
            Some(String::from("Asia/Shanghai"))
        );
        assert_eq!(
            prompt(&mut input, &mut output, "Region 2: ").unwrap(),
            Some(String::from("America/New_York"))
        );
        assert_eq!(output, b"Region 1: Region 2: ");
    }

    #[test]
    fn trims_whitespace() {
        let mut input = Cursor::new("  Asia/Shanghai \n");
        let mut output = Vec::new();
        assert_eq!(
            prompt(&mut input, &mut output, "").unwrap(),
            Some(String::from("Asia/Shanghai"))
        );
    }

    #[test]
    fn last_line_without_newline() {
        let mut input = Cursor::new("Europe/London");
        let mut output = Vec::new();
        assert_eq!(
            prompt(&mut input, &mut output, "").unwrap(),
            Some(String::from("Europe/London"))
        );
    }

    #[test]
    fn end_of_input_after_first_prompt() {
        let mut input = Cursor::new("Asia/Shanghai\n");
        let mut output = Vec::new();
        assert!(prompt(&mut input, &mut output, "").unwrap().is_some());
        assert_eq!(prompt(&mut input, &mut output, "").unwrap(), None);
    }

    #[test]
    fn empty_input_and_empty_line() {
        let mut output = Vec::new();
        assert_eq!(prompt(&mut Cursor::new(""), &mut output, "").unwrap(), None);
        // A blank line is an answer, not end of input
        assert_eq!(
            prompt(&mut Cursor::new("\n"), &mut output, "").unwrap(),
            Some(String::new())
        );
    }
}
