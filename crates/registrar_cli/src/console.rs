//! Line-oriented terminal I/O.
//!
//! # Responsibility
//! - Print prompts and read single lines from any `BufRead` source.
//! - Provide validating re-prompt loops for typed input.
//!
//! # Invariants
//! - Returned lines never carry the trailing line terminator.
//! - End of input surfaces as `io::ErrorKind::UnexpectedEof`, never as an
//!   empty line, so loops cannot spin forever on a closed stdin.

use chrono::NaiveDate;
use registrar_core::validation::{
    is_valid_email, is_valid_phone, is_valid_string, parse_age, parse_date, parse_id,
};
use std::io::{self, BufRead, Write};

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writes `text` followed by a newline.
    pub fn say(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{}", text.as_ref())
    }

    /// Writes `text` without a newline and reads the answer.
    pub fn prompt(&mut self, text: &str) -> io::Result<String> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        self.read_line()
    }

    /// Reads one line without its terminator.
    pub fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }

    /// Asks a yes/no question; only `y`/`Y` counts as yes.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        Ok(self.prompt(question)?.trim().eq_ignore_ascii_case("y"))
    }

    pub fn read_integer(&mut self, text: &str) -> io::Result<i64> {
        let mut line = self.prompt(text)?;
        loop {
            if let Some(value) = parse_id(line.trim()) {
                return Ok(value);
            }
            self.say("Invalid input. Please enter a valid integer.")?;
            line = self.read_line()?;
        }
    }

    pub fn read_string(&mut self, text: &str) -> io::Result<String> {
        let mut line = self.prompt(text)?;
        while !is_valid_string(&line) {
            self.say("Invalid input. Please enter a valid string.")?;
            line = self.read_line()?;
        }
        Ok(line.trim().to_string())
    }

    pub fn read_phone(&mut self, text: &str) -> io::Result<String> {
        let mut line = self.prompt(text)?;
        while !is_valid_phone(line.trim()) {
            self.say("Invalid phone number. Please enter 10 digits only.")?;
            line = self.read_line()?;
        }
        Ok(line.trim().to_string())
    }

    pub fn read_email(&mut self, text: &str) -> io::Result<String> {
        let mut line = self.prompt(text)?;
        while !is_valid_email(line.trim()) {
            self.say(
                "Invalid email format. Please enter a valid email address (e.g. user@gmail.com).",
            )?;
            line = self.read_line()?;
        }
        Ok(line.trim().to_string())
    }

    pub fn read_date(&mut self, text: &str) -> io::Result<NaiveDate> {
        let mut line = self.prompt(text)?;
        loop {
            if let Some(date) = parse_date(line.trim()) {
                return Ok(date);
            }
            self.say("Invalid date format. Please enter a valid date (format: yyyy-MM-dd): ")?;
            line = self.read_line()?;
        }
    }

    pub fn read_age(&mut self, text: &str) -> io::Result<u32> {
        let mut line = self.prompt(text)?;
        loop {
            if let Some(age) = parse_age(line.trim()) {
                return Ok(age);
            }
            self.say("Invalid age. Please enter a non-negative whole number.")?;
            line = self.read_line()?;
        }
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::Console;
    use chrono::NaiveDate;
    use std::io::{Cursor, ErrorKind};

    fn console(script: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    fn printed(console: &Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(console.output().clone()).unwrap()
    }

    #[test]
    fn read_line_strips_terminators_and_reports_eof() {
        let mut console = console("first\r\nsecond\n");
        assert_eq!(console.read_line().unwrap(), "first");
        assert_eq!(console.read_line().unwrap(), "second");
        assert_eq!(
            console.read_line().unwrap_err().kind(),
            ErrorKind::UnexpectedEof
        );
    }

    #[test]
    fn read_integer_reprompts_until_valid() {
        let mut console = console("abc\n\n42\n");
        assert_eq!(console.read_integer("Enter your choice: ").unwrap(), 42);
        let out = printed(&console);
        assert!(out.starts_with("Enter your choice: "));
        assert_eq!(
            out.matches("Invalid input. Please enter a valid integer.")
                .count(),
            2
        );
    }

    #[test]
    fn read_phone_rejects_wrong_length_and_letters() {
        let mut console = console("12345\n12345abcde\n9876543210\n");
        assert_eq!(console.read_phone("Phone: ").unwrap(), "9876543210");
        assert_eq!(
            printed(&console)
                .matches("Invalid phone number. Please enter 10 digits only.")
                .count(),
            2
        );
    }

    #[test]
    fn read_date_rejects_impossible_dates() {
        let mut console = console("2023-02-29\n2024/02/01\n2024-02-29\n");
        assert_eq!(
            console.read_date("Dob: ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn read_age_rejects_negative_values() {
        let mut console = console("-3\n20\n");
        assert_eq!(console.read_age("Age: ").unwrap(), 20);
        assert!(printed(&console).contains("Invalid age."));
    }

    #[test]
    fn read_string_gives_up_only_at_eof() {
        let mut console = console("   \n");
        let err = console.read_string("Name: ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn confirm_accepts_only_y() {
        let mut console = console("y\nyes\nN\n");
        assert!(console.confirm("More? ").unwrap());
        assert!(!console.confirm("More? ").unwrap());
        assert!(!console.confirm("More? ").unwrap());
    }
}
