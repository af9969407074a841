//! Line-based prompts that keep asking until the answer is valid.
//!
//! Every prompt reads from a [`BufRead`] and writes to a [`Write`], so the binary hands in the
//! locked terminal streams and tests hand in a scripted buffer. Rejected answers are reported in
//! the [`Style::Error`] style and the same question is asked again, without a retry limit. The
//! only way out of a prompt without a valid answer is the end of the input stream.

use crate::style::{paint, Style};
use std::fmt::Display;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

const QUOTE: char = '"';

pub const INVALID_INTEGER: &str = "Invalid input, please enter a positive integer.";

/// Asks `message` until `validate` accepts the answer and returns the accepted value.
///
/// The answer is passed to `validate` without its line terminator. A rejected answer prints the
/// validation error and asks again. Fails with [`io::ErrorKind::UnexpectedEof`] when the input
/// ends before a valid answer was given.
pub fn prompt_until<R, W, T, E, F>(
    input: &mut R,
    output: &mut W,
    message: &str,
    mut validate: F,
) -> io::Result<T>
where
    R: BufRead,
    W: Write,
    E: Display,
    F: FnMut(&str) -> Result<T, E>,
{
    loop {
        write!(output, "{}", message)?;
        output.flush()?;
        let answer = read_answer(input)?.ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            )
        })?;
        match validate(&answer) {
            Ok(value) => return Ok(value),
            Err(e) => writeln!(output, "{}", paint(Style::Error, &e.to_string()))?,
        }
    }
}

/// Reads one line, `None` at end of input.
fn read_answer<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed_len);
    Ok(Some(line))
}

fn unquote(answer: &str) -> &str {
    answer.trim_matches(QUOTE)
}

/// Accepts a path to an existing regular file. Surrounding double quotes are removed first.
pub fn existing_file(answer: &str) -> Result<PathBuf, String> {
    let path = Path::new(unquote(answer));
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(format!("File not found: {}", path.display()))
    }
}

/// Accepts a directory path, creating it and its parents when missing. An empty answer selects
/// `default_dir`.
pub fn usable_dir(answer: &str, default_dir: &Path) -> Result<PathBuf, String> {
    let answer = unquote(answer);
    let path = if answer.is_empty() {
        default_dir.to_path_buf()
    } else {
        PathBuf::from(answer)
    };
    fs::create_dir_all(&path).map_err(|e| format!("Could not create directory: {}", e))?;
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("Invalid directory: {}", path.display()))
    }
}

/// Accepts ASCII decimal digits only, with a value of at least 1.
pub fn positive_integer(answer: &str) -> Result<u32, &'static str> {
    let answer = answer.trim();
    if answer.is_empty() || !answer.bytes().all(|b| b.is_ascii_digit()) {
        return Err(INVALID_INTEGER);
    }
    match answer.parse::<u32>() {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(INVALID_INTEGER),
    }
}

pub fn file_prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> io::Result<PathBuf> {
    prompt_until(input, output, message, existing_file)
}

pub fn dir_prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
    default_dir: &Path,
) -> io::Result<PathBuf> {
    prompt_until(input, output, message, |answer| {
        usable_dir(answer, default_dir)
    })
}

pub fn int_prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> io::Result<u32> {
    prompt_until(input, output, message, positive_integer)
}

/// Prints `message` and blocks until a line is entered or the input ends.
pub fn wait_for_enter<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> io::Result<()> {
    write!(output, "{}", message)?;
    output.flush()?;
    read_answer(input)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "image_grid_splitter_prompt_{}_{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_positive_integer() {
        assert_eq!(positive_integer("7"), Ok(7));
        assert_eq!(positive_integer("  12 \t"), Ok(12));
        assert_eq!(positive_integer("007"), Ok(7));
        for bad in ["-3", "abc", "0", "", "   ", "+4", "1.5", "3 4", "99999999999"] {
            assert_eq!(positive_integer(bad), Err(INVALID_INTEGER), "{bad:?}");
        }
    }

    #[test]
    fn test_int_prompt_retries_until_valid() {
        let mut input = Cursor::new("-3\nabc\n0\n4\n");
        let mut output = vec![];
        let value = int_prompt(&mut input, &mut output, "Number of rows: ").unwrap();
        assert_eq!(value, 4);

        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.matches("Number of rows: ").count(), 4);
        assert_eq!(output.matches(INVALID_INTEGER).count(), 3);
        assert!(output.contains(&format!("\x1b[31m{}\x1b[0m", INVALID_INTEGER)));
    }

    #[test]
    fn test_prompt_fails_at_end_of_input() {
        let mut input = Cursor::new("abc\n");
        let mut output = vec![];
        let err = int_prompt(&mut input, &mut output, "Number of columns: ").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_prompt_until_passes_answer_without_terminator() {
        let mut input = Cursor::new("first\r\nsecond\n");
        let mut output = vec![];
        let mut seen = vec![];
        let value = prompt_until(&mut input, &mut output, "> ", |answer| {
            seen.push(answer.to_string());
            if answer == "second" {
                Ok(answer.len())
            } else {
                Err("again")
            }
        })
        .unwrap();
        assert_eq!(value, 6);
        assert_eq!(seen, vec!["first", "second"]);
    }

    #[test]
    fn test_file_prompt() {
        let dir = scratch_dir("file_prompt");
        let file = dir.join("map.png");
        fs::write(&file, b"png").unwrap();
        let missing = dir.join("missing.png");

        let script = format!(
            "{}\n{}\n\"{}\"\n",
            missing.display(),
            dir.display(),
            file.display()
        );
        let mut input = Cursor::new(script);
        let mut output = vec![];
        let path = file_prompt(&mut input, &mut output, "Path to the large image: ").unwrap();
        assert_eq!(path, file);

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains(&format!("File not found: {}", missing.display())));
        assert!(output.contains(&format!("File not found: {}", dir.display())));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_dir_prompt_uses_default_on_empty_answer() {
        let dir = scratch_dir("dir_default");
        let default_dir = dir.join("nested").join("output_tiles");
        let mut input = Cursor::new("\n");
        let mut output = vec![];
        let path = dir_prompt(&mut input, &mut output, "Output directory: ", &default_dir).unwrap();
        assert_eq!(path, default_dir);
        assert!(default_dir.is_dir());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_dir_prompt_reprompts_when_creation_fails() {
        let dir = scratch_dir("dir_retry");
        let occupied = dir.join("occupied");
        fs::write(&occupied, b"file").unwrap();
        let wanted = dir.join("tiles");

        let script = format!("{}\n\"{}\"\n", occupied.join("sub").display(), wanted.display());
        let mut input = Cursor::new(script);
        let mut output = vec![];
        let path = dir_prompt(&mut input, &mut output, "Output directory: ", &dir).unwrap();
        assert_eq!(path, wanted);
        assert!(wanted.is_dir());

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Could not create directory: "));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_file_prompt_keeps_single_quotes() {
        let dir = scratch_dir("single_quotes");
        let file = dir.join("'draft'");
        fs::write(&file, b"png").unwrap();

        let script = format!("{}\n", file.display());
        let path = file_prompt(&mut Cursor::new(script), &mut Vec::<u8>::new(), "> ").unwrap();
        assert_eq!(path, file);

        let script = format!("\"{}\"\n", file.display());
        let path = file_prompt(&mut Cursor::new(script), &mut Vec::<u8>::new(), "> ").unwrap();
        assert_eq!(path, file);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_usable_dir_rejects_existing_file() {
        let dir = scratch_dir("dir_file");
        let occupied = dir.join("occupied");
        fs::write(&occupied, b"file").unwrap();
        let answer = occupied.display().to_string();
        assert!(usable_dir(&answer, &dir).is_err());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_wait_for_enter_accepts_end_of_input() {
        let mut output = vec![];
        wait_for_enter(&mut Cursor::new(""), &mut output, "Press Enter to exit.").unwrap();
        assert_eq!(output, b"Press Enter to exit.");
    }
}
