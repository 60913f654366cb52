use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GlosorError {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftohtml not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftohtmlNotFound,

    #[error("pdftohtml failed with exit code {code}: {stderr}")]
    PdftohtmlFailed { code: i32, stderr: String },

    #[error("failed to read layout: {0}")]
    Layout(String),

    #[error("unexpected layout node '{kind}' inside a text line")]
    UnexpectedLayoutNode { kind: String },

    #[error("unexpected annotation {text:?} in line {line}")]
    UnexpectedAnnotation { line: usize, text: String },

    #[error("line {line} does not start with a character glyph")]
    LeadingAnnotation { line: usize },

    #[error("empty text line at position {line}")]
    EmptyLine { line: usize },

    #[error("unknown line signature: font '{font}' at size {size} ({text:?})")]
    UnknownSignature { font: String, size: f64, text: String },

    #[error("marker line has no number: {line}")]
    MissingMarkerNumber { line: String },

    #[error("no separator found in line: {line}")]
    MissingSeparator { line: String },

    #[error("continuation line has no entry to join: {line}")]
    OrphanContinuation { line: String },

    #[error("word '{word}' must follow another word")]
    OrphanSuffix { word: String },

    #[error("malformed conjugation in '{0}'")]
    MalformedConjugation(String),

    #[error("unbalanced parentheses: '{swedish}' / '{english}'")]
    UnbalancedParentheses { swedish: String, english: String },

    #[error("entry '{swedish}' appears before any chapter marker")]
    NoChapter { swedish: String },

    #[error("chapter value {0} is out of range")]
    ChapterOutOfRange(String),

    #[error("translation request failed: {0}")]
    TranslationRequest(String),

    #[error("translating '{text}' failed after {attempts} attempts: {reason}")]
    TranslationExhausted {
        text: String,
        attempts: u32,
        reason: String,
    },

    #[error("failed to load profile from {path}: {reason}")]
    ProfileLoad { path: PathBuf, reason: String },

    #[error("invalid profile: {0}")]
    ProfileInvalid(String),

    #[error("invalid deck package: {0}")]
    Package(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}
