use crate::error::GlosorError;
use crate::extraction::LayoutNode;
use crate::model::{Line, Separator, TextRun, Token};

/// How whitespace in the glyph stream is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphMode {
    /// Annotations and whitespace glyphs become separators (word lists).
    Spaced,
    /// Annotations are skipped and whitespace glyphs are ordinary text (word cards).
    Flat,
}

/// Strip a font subsetting prefix: `ABCDEF+MyriadPro-Regular` -> `MyriadPro-Regular`.
pub fn simple_font(font: &str) -> &str {
    match font.rsplit_once('+') {
        Some((_, family)) => family,
        None => font,
    }
}

/// Normalize every text line into a token sequence, keeping document order.
pub fn normalize_lines(
    lines: &[&[LayoutNode]],
    mode: GlyphMode,
) -> Result<Vec<Line>, GlosorError> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| normalize_line(i, line, mode))
        .collect()
}

/// Normalize the leaves of one text line.
///
/// Consecutive glyphs sharing (font family, size) are merged into a single
/// run. The first glyph of a line always opens a run, even when it is blank.
pub fn normalize_line(
    index: usize,
    leaves: &[LayoutNode],
    mode: GlyphMode,
) -> Result<Line, GlosorError> {
    let mut tokens: Line = Vec::new();

    for leaf in leaves {
        match leaf {
            LayoutNode::Char {
                text,
                fontname,
                size,
            } => {
                let font = simple_font(fontname);

                if tokens.is_empty() {
                    tokens.push(Token::run(text.as_str(), font, *size));
                    continue;
                }

                if mode == GlyphMode::Spaced && text.trim().is_empty() {
                    tokens.push(Token::Sep(Separator::Empty));
                    continue;
                }

                match tokens.last_mut() {
                    Some(Token::Run(prev)) if prev.same_style(font, *size) => {
                        prev.text.push_str(text);
                    }
                    _ => tokens.push(Token::Run(TextRun::new(text.as_str(), font, *size))),
                }
            }
            LayoutNode::Anno { text } => {
                if mode == GlyphMode::Flat {
                    continue;
                }
                if tokens.is_empty() {
                    return Err(GlosorError::LeadingAnnotation { line: index });
                }
                let sep = match text.as_str() {
                    " " => Separator::Space,
                    "\n" => Separator::Newline,
                    _ => {
                        return Err(GlosorError::UnexpectedAnnotation {
                            line: index,
                            text: text.clone(),
                        })
                    }
                };
                tokens.push(Token::Sep(sep));
            }
            other => {
                return Err(GlosorError::UnexpectedLayoutNode {
                    kind: other.kind().to_string(),
                })
            }
        }
    }

    Ok(tokens)
}
