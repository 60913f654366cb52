use crate::error::GlosorError;
use crate::extraction::{LayoutNode, LayoutSource};
use crate::profile::schema::LayoutSettings;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::Write;
use std::process::Command;

/// Layout backend using pdftohtml (from poppler-utils).
///
/// Runs `pdftohtml -xml` which reports every text fragment together with
/// its font spec and position. Fragments that share a baseline and sit
/// close together horizontally are joined into one text line, separated by
/// a space annotation, and every line is closed by a newline annotation.
/// Fragments in other columns of the same row start lines of their own.
pub struct PdftohtmlExtractor {
    settings: LayoutSettings,
}

impl PdftohtmlExtractor {
    pub fn from_settings(settings: LayoutSettings) -> Self {
        PdftohtmlExtractor { settings }
    }

    /// Check if pdftohtml is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftohtml")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl LayoutSource for PdftohtmlExtractor {
    fn extract_layout(&self, pdf_bytes: &[u8]) -> Result<LayoutNode, GlosorError> {
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| GlosorError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| GlosorError::Extraction(e.to_string()))?;

        // -fontfullname keeps the subset prefix; the normalizer strips it.
        let output = Command::new("pdftohtml")
            .args(["-xml", "-i", "-q", "-stdout", "-fontfullname"])
            .arg(tmpfile.path())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    GlosorError::PdftohtmlNotFound
                } else {
                    GlosorError::Extraction(format!("pdftohtml failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(GlosorError::PdftohtmlFailed { code, stderr });
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        let root = parse_pdf2xml(&xml, &self.settings)?;
        log::debug!(
            "pdftohtml produced {} page(s)",
            match &root {
                LayoutNode::Container { children } => children.len(),
                _ => 0,
            }
        );
        Ok(root)
    }

    fn backend_name(&self) -> &str {
        "pdftohtml"
    }
}

#[derive(Debug, Clone)]
struct FontSpec {
    family: String,
    size: f64,
}

#[derive(Debug, Clone)]
struct Fragment {
    top: f64,
    left: f64,
    width: f64,
    font_id: String,
    text: String,
}

/// Parse pdftohtml's `pdf2xml` output into a layout tree of pages and lines.
fn parse_pdf2xml(xml: &str, settings: &LayoutSettings) -> Result<LayoutNode, GlosorError> {
    let mut reader = Reader::from_str(xml);

    let mut fonts: HashMap<String, FontSpec> = HashMap::new();
    let mut pages = Vec::new();
    let mut fragments: Vec<Fragment> = Vec::new();
    let mut current: Option<Fragment> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"page" => fragments.clear(),
                b"fontspec" => register_font(&e, &mut fonts)?,
                b"text" => current = Some(start_fragment(&e)?),
                // inline <b>, <i>, <a> inside a fragment carry no layout information
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if e.name().as_ref() == b"fontspec" {
                    register_font(&e, &mut fonts)?;
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(fragment) = current.as_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| GlosorError::Layout(format!("bad text: {e}")))?;
                    fragment.text.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"text" => {
                    if let Some(fragment) = current.take() {
                        if !fragment.text.is_empty() {
                            fragments.push(fragment);
                        }
                    }
                }
                b"page" => {
                    let lines = build_lines(&fragments, &fonts, settings)?;
                    pages.push(LayoutNode::Container { children: lines });
                    fragments.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(GlosorError::Layout(format!(
                    "XML parse error at position {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    Ok(LayoutNode::Container { children: pages })
}

fn attr(e: &BytesStart<'_>, name: &str) -> Option<String> {
    e.try_get_attribute(name)
        .ok()
        .flatten()
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

fn register_font(
    e: &BytesStart<'_>,
    fonts: &mut HashMap<String, FontSpec>,
) -> Result<(), GlosorError> {
    let id = attr(e, "id").ok_or_else(|| GlosorError::Layout("fontspec without id".into()))?;
    let family = attr(e, "family").unwrap_or_default();
    let size = attr(e, "size")
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GlosorError::Layout(format!("fontspec {id} has no size")))?;
    fonts.insert(id, FontSpec { family, size });
    Ok(())
}

fn start_fragment(e: &BytesStart<'_>) -> Result<Fragment, GlosorError> {
    let number = |name: &str| {
        attr(e, name)
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or_else(|| GlosorError::Layout(format!("text fragment without {name}")))
    };
    let font_id =
        attr(e, "font").ok_or_else(|| GlosorError::Layout("text fragment without font".into()))?;
    Ok(Fragment {
        top: number("top")?,
        left: number("left")?,
        width: number("width")?,
        font_id,
        text: String::new(),
    })
}

fn build_lines(
    fragments: &[Fragment],
    fonts: &HashMap<String, FontSpec>,
    settings: &LayoutSettings,
) -> Result<Vec<LayoutNode>, GlosorError> {
    let mut lines = Vec::new();
    let mut children: Vec<LayoutNode> = Vec::new();
    // top, right edge and font size of the previous fragment on the line
    let mut previous: Option<(f64, f64, f64)> = None;

    for fragment in fragments {
        let font = fonts.get(&fragment.font_id).ok_or_else(|| {
            GlosorError::Layout(format!("unknown font id '{}'", fragment.font_id))
        })?;

        if let Some((top, right, size)) = previous {
            let same_row = (fragment.top - top).abs() <= settings.line_tolerance;
            let gap = fragment.left - right;
            if same_row && gap <= settings.column_gap * size.max(font.size) {
                children.push(anno(" "));
            } else {
                if same_row {
                    log::debug!(
                        "gap of {gap:.1}pt before '{}' splits the row",
                        fragment.text
                    );
                }
                children.push(anno("\n"));
                lines.push(LayoutNode::TextLine {
                    children: std::mem::take(&mut children),
                });
            }
        }
        previous = Some((fragment.top, fragment.left + fragment.width, font.size));

        children.extend(fragment.text.chars().map(|c| LayoutNode::Char {
            text: c.to_string(),
            fontname: font.family.clone(),
            size: font.size,
        }));
    }

    if !children.is_empty() {
        children.push(anno("\n"));
        lines.push(LayoutNode::TextLine { children });
    }

    Ok(lines)
}

fn anno(text: &str) -> LayoutNode {
    LayoutNode::Anno { text: text.into() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::text_lines;
    use crate::parsing::{parse_ordkort, parse_ordlista};
    use crate::profile::schema::{OrdkortGrammar, OrdlistaGrammar};
    use crate::translate::RetryPolicy;

    const XML: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE pdf2xml SYSTEM "pdf2xml.dtd">
<pdf2xml producer="poppler" version="22.02.0">
<page number="1" position="absolute" top="0" left="0" height="842" width="595">
	<fontspec id="0" size="18" family="ABCDEF+MyriadPro-Bold" color="#000000"/>
	<fontspec id="1" size="9" family="ABCDEF+MyriadPro-Regular" color="#000000"/>
<text top="60" left="56" width="80" height="22" font="0"><b>Kapitel 4</b></text>
<text top="100" left="56" width="40" height="12" font="1">springa</text>
<text top="101" left="101" width="60" height="12" font="1">to run &amp; jog</text>
</page>
</pdf2xml>
"##;

    fn parse(xml: &str) -> Result<LayoutNode, GlosorError> {
        parse_pdf2xml(xml, &LayoutSettings::default())
    }

    fn line_text(line: &[LayoutNode]) -> String {
        line.iter()
            .map(|node| match node {
                LayoutNode::Char { text, .. } => text.as_str(),
                LayoutNode::Anno { text } if text == " " => "|",
                _ => "",
            })
            .collect()
    }

    #[test]
    fn test_parse_pdf2xml_groups_fragments_into_lines() {
        let root = parse(XML).unwrap();
        let lines = text_lines(&root);
        assert_eq!(lines.len(), 2);

        // "Kapitel 4" + newline
        assert_eq!(lines[0].len(), 10);
        assert_eq!(
            lines[0][0],
            LayoutNode::Char {
                text: "K".into(),
                fontname: "ABCDEF+MyriadPro-Bold".into(),
                size: 18.0,
            }
        );
        assert_eq!(lines[0][9], anno("\n"));

        // "springa" + space anno + "to run & jog" + newline
        assert_eq!(lines[1].len(), 7 + 1 + 12 + 1);
        assert_eq!(lines[1][7], anno(" "));
        assert_eq!(
            lines[1][10],
            LayoutNode::Char {
                text: " ".into(),
                fontname: "ABCDEF+MyriadPro-Regular".into(),
                size: 9.0,
            }
        );
    }

    #[test]
    fn test_distant_fragments_on_one_row_split() {
        let xml = r#"<pdf2xml>
<fontspec id="0" size="10" family="Body"/>
<page number="1">
<text top="100" left="40" width="30" font="0">hund</text>
<text top="100" left="75" width="20" font="0">dog</text>
<text top="100" left="300" width="20" font="0">katt</text>
<text top="101" left="325" width="20" font="0">cat</text>
</page>
</pdf2xml>"#;
        let root = parse(xml).unwrap();
        let lines: Vec<String> = text_lines(&root).iter().map(|l| line_text(l)).collect();
        assert_eq!(lines, vec!["hund|dog", "katt|cat"]);

        let wide = LayoutSettings {
            column_gap: 30.0,
            ..LayoutSettings::default()
        };
        let root = parse_pdf2xml(xml, &wide).unwrap();
        assert_eq!(text_lines(&root).len(), 1);
    }

    #[test]
    fn test_fragment_without_width_is_an_error() {
        let xml = r#"<pdf2xml><fontspec id="0" size="9" family="Body"/><page number="1"><text top="1" left="1" font="0">x</text></page></pdf2xml>"#;
        assert!(matches!(parse(xml), Err(GlosorError::Layout(_))));
    }

    #[test]
    fn test_unknown_font_is_an_error() {
        let xml = r#"<pdf2xml><page number="1"><text top="1" left="1" width="5" font="7">x</text></page></pdf2xml>"#;
        assert!(matches!(parse(xml), Err(GlosorError::Layout(_))));
    }

    #[test]
    fn test_pages_become_containers() {
        let xml = r#"<pdf2xml>
<fontspec id="0" size="9" family="Body"/>
<page number="1"><text top="1" left="1" width="5" font="0">a</text></page>
<page number="2"><text top="1" left="1" width="5" font="0">b</text></page>
</pdf2xml>"#;
        match parse(xml).unwrap() {
            LayoutNode::Container { children } => assert_eq!(children.len(), 2),
            other => panic!("expected container, got {other:?}"),
        }
    }

    #[test]
    fn test_word_cards_on_one_row_stay_separate() {
        let xml = r#"<pdf2xml>
<page number="1">
<fontspec id="0" size="18" family="ABCDEF+MyriadPro-Bold"/>
<fontspec id="1" size="16" family="ABCDEF+MyriadPro-Regular"/>
<text top="60" left="40" width="10" font="0">3</text>
<text top="100" left="40" width="60" font="1">en lön</text>
<text top="100" left="320" width="45" font="1">snart</text>
<text top="100" left="600" width="80" font="1">ett kontor</text>
</page>
</pdf2xml>"#;
        let root = parse(xml).unwrap();
        let pairs = parse_ordkort(
            &root,
            &OrdkortGrammar::default(),
            None,
            &RetryPolicy::immediate(),
        )
        .unwrap();

        let words: Vec<&str> = pairs.iter().map(|p| p.swedish.as_str()).collect();
        assert_eq!(words, vec!["en lön", "snart", "ett kontor"]);
        assert!(pairs.iter().all(|p| p.chapter.as_deref() == Some("3")));
    }

    #[test]
    fn test_two_column_word_list() {
        let xml = r#"<pdf2xml>
<page number="1">
<fontspec id="0" size="18" family="ABCDEF+MyriadPro-BoldCond"/>
<fontspec id="1" size="12" family="ABCDEF+MyriadPro-BoldCond"/>
<fontspec id="2" size="9" family="ABCDEF+MyriadPro-Bold"/>
<fontspec id="3" size="9" family="ABCDEF+MyriadPro-Regular"/>
<text top="60" left="56" width="80" font="0">Kapitel 4</text>
<text top="80" left="56" width="50" font="1">Sidan 37</text>
<text top="100" left="56" width="140" font="2">springa (spring, sprang, sprungit)</text>
<text top="100" left="206" width="30" font="3">to run</text>
<text top="100" left="330" width="25" font="2">en bil</text>
<text top="100" left="362" width="22" font="3">a car</text>
<text top="112" left="56" width="30" font="2">ett hus</text>
<text top="112" left="96" width="30" font="3">a house</text>
</page>
</pdf2xml>"#;
        let root = parse(xml).unwrap();
        let pairs = parse_ordlista(&root, &OrdlistaGrammar::default()).unwrap();

        let entries: Vec<(&str, &str)> = pairs
            .iter()
            .map(|p| (p.swedish.as_str(), p.english.as_str()))
            .collect();
        assert_eq!(
            entries,
            vec![("springa", "to run"), ("en bil", "a car"), ("ett hus", "a house")]
        );
        assert_eq!(
            pairs[0].swedish_conjugation.as_deref(),
            Some("spring, sprang, sprungit")
        );
        assert!(pairs
            .iter()
            .all(|p| p.chapter.as_deref() == Some("4") && p.page.as_deref() == Some("37")));
    }
}
