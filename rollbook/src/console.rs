//! Line-oriented terminal input
//!
//! Every prompt returns `None` once input is exhausted so the menu can wind
//! down cleanly instead of spinning on an empty stdin.

use std::io::{self, BufRead, Write};

use rollbook_engine::storage::record::{validate_gpa, validate_roll_no, validate_year};

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Console { input, output }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    /// Print `prompt` and read one line without its line ending
    ///
    /// Bytes that are not valid UTF-8 become U+FFFD.
    pub fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            return Ok(None);
        }
        let mut line = String::from_utf8_lossy(&raw).into_owned();
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// Keep asking until `parse` accepts the answer, using `retry` after the first try
    pub fn ask_until<T, F>(&mut self, prompt: &str, retry: &str, parse: F) -> io::Result<Option<T>>
    where
        F: Fn(&str) -> Option<T>,
    {
        let mut current = prompt;
        loop {
            let Some(line) = self.ask(current)? else {
                return Ok(None);
            };
            if let Some(value) = parse(&line) {
                return Ok(Some(value));
            }
            current = retry;
        }
    }

    /// Ask for text no longer than `max` bytes
    pub fn ask_text(&mut self, prompt: &str, max: usize) -> io::Result<Option<String>> {
        let retry = format!("⚠ Too long (max {} bytes), try again: ", max);
        self.ask_until(prompt, &retry, |line| {
            let text = line.trim();
            (text.len() <= max).then(|| text.to_string())
        })
    }
}

/// Positive roll number
pub fn parse_roll(line: &str) -> Option<i32> {
    let roll_no = line.trim().parse().ok()?;
    validate_roll_no(roll_no).ok().map(|_| roll_no)
}

/// Year inside the accepted range
pub fn parse_year(line: &str) -> Option<i32> {
    let year = line.trim().parse().ok()?;
    validate_year(year).ok().map(|_| year)
}

/// GPA inside the accepted range
pub fn parse_gpa(line: &str) -> Option<f32> {
    let gpa = line.trim().parse().ok()?;
    validate_gpa(gpa).ok().map(|_| gpa)
}
