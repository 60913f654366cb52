use serde::{Deserialize, Serialize};
use std::fmt;

/// Contiguous text sharing one font family and size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub font: String,
    pub size: f64,
}

impl TextRun {
    pub fn new(text: impl Into<String>, font: impl Into<String>, size: f64) -> Self {
        TextRun {
            text: text.into(),
            font: font.into(),
            size,
        }
    }

    pub fn same_style(&self, font: &str, size: f64) -> bool {
        self.font == font && self.size == size
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Separator {
    Newline,
    Space,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    Run(TextRun),
    Sep(Separator),
}

impl Token {
    pub fn run(text: impl Into<String>, font: impl Into<String>, size: f64) -> Self {
        Token::Run(TextRun::new(text, font, size))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Token::Run(run) => Some(&run.text),
            Token::Sep(_) => None,
        }
    }

    pub fn as_run(&self) -> Option<&TextRun> {
        match self {
            Token::Run(run) => Some(run),
            Token::Sep(_) => None,
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, Token::Sep(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Run(run) => write!(f, "{} [{}]", run.text, run.font),
            Token::Sep(Separator::Newline) => write!(f, "ANNO NL"),
            Token::Sep(Separator::Space) => write!(f, "ANNO SP"),
            Token::Sep(Separator::Empty) => write!(f, "EMPTY"),
        }
    }
}

/// Tokens of one physical line.
pub type Line = Vec<Token>;

/// Render a line for diagnostics.
pub fn describe_line(line: &[Token]) -> String {
    line.iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" | ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Marker {
    Chapter(u32),
    Page(u32),
    Classroom,
    /// Reading-text heading on a word-card page.
    Heading(String),
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Chapter(n) => write!(f, "MARKER CHAPTER {n}"),
            Marker::Page(n) => write!(f, "MARKER PAGE {n}"),
            Marker::Classroom => write!(f, "MARKER CLASS"),
            Marker::Heading(text) => write!(f, "MARKER TEXT \"{text}\""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalEntry {
    pub swedish: String,
    pub english: String,
}

impl LogicalEntry {
    pub fn new(swedish: impl Into<String>, english: impl Into<String>) -> Self {
        LogicalEntry {
            swedish: swedish.into(),
            english: english.into(),
        }
    }
}

/// One item of the word-list stream as it moves through the stages.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Line(Line),
    Marker(Marker),
    Entry(LogicalEntry),
}

/// Final flashcard record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub chapter: Option<String>,
    pub page: Option<String>,
    /// Word-card heading the entry belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub swedish: String,
    pub swedish_conjugation: Option<String>,
    pub english: String,
}
