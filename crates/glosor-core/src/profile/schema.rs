use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One conversion: which PDF to read, how to read it and where the deck goes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub deck_name: String,
    pub input: PathBuf,
    pub output: PathBuf,
    pub grammar: Grammar,
    #[serde(default)]
    pub layout: LayoutSettings,
}

/// How pdftohtml text fragments are grouped into lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// Maximum distance in points between fragment tops on one line.
    #[serde(default = "default_line_tolerance")]
    pub line_tolerance: f64,
    /// Horizontal gap, in multiples of the font size, that starts a new
    /// line even when the fragments share a top.
    #[serde(default = "default_column_gap")]
    pub column_gap: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        LayoutSettings {
            line_tolerance: default_line_tolerance(),
            column_gap: default_column_gap(),
        }
    }
}

/// The document family and its token grammar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "lowercase")]
pub enum Grammar {
    Ordlista(OrdlistaGrammar),
    Ordkort(OrdkortGrammar),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Ordlista,
    Ordkort,
}

impl Grammar {
    pub fn variant(&self) -> Variant {
        match self {
            Grammar::Ordlista(_) => Variant::Ordlista,
            Grammar::Ordkort(_) => Variant::Ordkort,
        }
    }
}

/// Keyword grammar of the word lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdlistaGrammar {
    #[serde(default = "default_chapter_keyword")]
    pub chapter_keyword: String,
    #[serde(default = "default_page_keyword")]
    pub page_keyword: String,
    #[serde(default = "default_classroom_keyword")]
    pub classroom_keyword: String,
    /// Lines starting with any of these (edition banners) are dropped.
    #[serde(default)]
    pub ignore_prefixes: Vec<String>,
}

impl Default for OrdlistaGrammar {
    fn default() -> Self {
        OrdlistaGrammar {
            chapter_keyword: default_chapter_keyword(),
            page_keyword: default_page_keyword(),
            classroom_keyword: default_classroom_keyword(),
            ignore_prefixes: vec!["A1+A2".into(), "B1+B2".into()],
        }
    }
}

/// Font signature grammar of the word cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdkortGrammar {
    #[serde(default = "default_marker_size")]
    pub marker_size: f64,
    pub entry_font: String,
    #[serde(default = "default_entry_size")]
    pub entry_size: f64,
    /// Fonts of running page numbers and headers.
    #[serde(default)]
    pub noise_fonts: Vec<String>,
    #[serde(default = "default_max_chapter")]
    pub max_chapter: u32,
    #[serde(default = "default_translate")]
    pub translate: bool,
}

impl Default for OrdkortGrammar {
    fn default() -> Self {
        OrdkortGrammar {
            marker_size: default_marker_size(),
            entry_font: "MyriadPro-Regular".into(),
            entry_size: default_entry_size(),
            noise_fonts: vec!["AGaramondPro-Regular".into()],
            max_chapter: default_max_chapter(),
            translate: default_translate(),
        }
    }
}

fn default_line_tolerance() -> f64 {
    2.0
}

fn default_column_gap() -> f64 {
    3.0
}

fn default_chapter_keyword() -> String {
    "Kapitel".into()
}

fn default_page_keyword() -> String {
    "Sidan".into()
}

fn default_classroom_keyword() -> String {
    "Klassrumsfraser".into()
}

fn default_marker_size() -> f64 {
    18.0
}

fn default_entry_size() -> f64 {
    16.0
}

fn default_max_chapter() -> u32 {
    18
}

fn default_translate() -> bool {
    true
}
