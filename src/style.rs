use std::fmt;
use std::fmt::Formatter;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// How a line of terminal output is colored.
#[derive(Clone, Copy, Default, Eq, PartialEq, Debug, Hash)]
pub enum Style {
    #[default]
    Plain,
    Success,
    Error,
}

impl Style {
    fn escape(self) -> Option<&'static str> {
        match self {
            Style::Plain => None,
            Style::Success => Some(GREEN),
            Style::Error => Some(RED),
        }
    }
}

/// Text wrapped in the escape codes of a [`Style`]. `Plain` text is written unchanged.
#[derive(Debug, Clone, Copy)]
pub struct Painted<'a> {
    style: Style,
    text: &'a str,
}

impl fmt::Display for Painted<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.style.escape() {
            Some(escape) => write!(f, "{}{}{}", escape, self.text, RESET),
            None => f.write_str(self.text),
        }
    }
}

pub fn paint(style: Style, text: &str) -> Painted<'_> {
    Painted { style, text }
}
