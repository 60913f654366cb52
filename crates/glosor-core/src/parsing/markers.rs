use crate::error::GlosorError;
use crate::model::{describe_line, Element, Line, Marker, TextRun, Token};
use crate::profile::schema::{OrdkortGrammar, OrdlistaGrammar};

/// Item of the word-card stream after marker detection.
#[derive(Debug, Clone, PartialEq)]
pub enum CardItem {
    Marker(Marker),
    Word(TextRun),
}

/// Classify word-list lines by the text of their first token.
///
/// Marker lines are replaced by markers, edition banners are dropped and
/// every other line passes through untouched.
pub fn detect_ordlista_markers(
    lines: Vec<Line>,
    grammar: &OrdlistaGrammar,
) -> Result<Vec<Element>, GlosorError> {
    let mut elements = Vec::with_capacity(lines.len());

    for (index, line) in lines.into_iter().enumerate() {
        let first = match line.first() {
            Some(token) => token.text().unwrap_or_default(),
            None => return Err(GlosorError::EmptyLine { line: index }),
        };

        if first.starts_with(&grammar.classroom_keyword) {
            elements.push(Element::Marker(Marker::Classroom));
        } else if first.starts_with(&grammar.chapter_keyword) {
            let number = first_number(&line)?;
            elements.push(Element::Marker(Marker::Chapter(number)));
        } else if let Some(rest) = first.strip_prefix(grammar.page_keyword.as_str()) {
            // "Sidan12" comes without a separating space
            let number = match leading_digits(rest) {
                Some(n) => n,
                None => first_number(&line)?,
            };
            elements.push(Element::Marker(Marker::Page(number)));
        } else if grammar
            .ignore_prefixes
            .iter()
            .any(|p| first.starts_with(p.as_str()))
        {
            log::debug!("dropping banner line: {}", describe_line(&line));
        } else {
            elements.push(Element::Line(line));
        }
    }

    Ok(elements)
}

/// Classify word-card lines by the font signature of their first token.
///
/// The signature table is exhaustive: a first token that is neither a
/// marker, known noise, nor an entry aborts the run.
pub fn detect_ordkort_markers(
    lines: Vec<Line>,
    grammar: &OrdkortGrammar,
) -> Result<Vec<CardItem>, GlosorError> {
    let mut items = Vec::with_capacity(lines.len());

    for (index, line) in lines.into_iter().enumerate() {
        let first = match line.into_iter().next() {
            Some(Token::Run(run)) => run,
            _ => return Err(GlosorError::EmptyLine { line: index }),
        };

        let size = first.size.round_ties_even();

        if size == grammar.marker_size {
            if is_numeric(&first.text) {
                let number = parse_number(&first.text)?;
                items.push(CardItem::Marker(Marker::Chapter(number)));
            } else {
                items.push(CardItem::Marker(Marker::Heading(first.text)));
            }
            continue;
        }

        if grammar.noise_fonts.iter().any(|f| *f == first.font) {
            continue;
        }

        if first.font == grammar.entry_font && size == grammar.entry_size {
            items.push(CardItem::Word(first));
            continue;
        }

        return Err(GlosorError::UnknownSignature {
            font: first.font,
            size: first.size,
            text: first.text,
        });
    }

    Ok(items)
}

fn is_numeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(char::is_numeric)
}

fn parse_number(text: &str) -> Result<u32, GlosorError> {
    text.parse::<u32>()
        .map_err(|_| GlosorError::MissingMarkerNumber {
            line: text.to_string(),
        })
}

/// First run of the line made only of digits.
fn first_number(line: &[Token]) -> Result<u32, GlosorError> {
    match line.iter().filter_map(Token::text).find(|t| is_numeric(t)) {
        Some(text) => parse_number(text),
        None => Err(GlosorError::MissingMarkerNumber {
            line: describe_line(line),
        }),
    }
}

fn leading_digits(text: &str) -> Option<u32> {
    let end = text
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text[..end].parse().ok()
}
