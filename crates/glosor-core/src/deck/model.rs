use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub name: &'static str,
    /// Question (front) format.
    pub qfmt: &'static str,
    /// Answer (back) format.
    pub afmt: &'static str,
}

/// An Anki note type: fields, card templates and styling.
///
/// Models are plain constants; the writer takes one by reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteModel {
    pub id: i64,
    pub name: &'static str,
    pub fields: &'static [&'static str],
    pub templates: &'static [Template],
    pub css: &'static str,
    /// Fields hashed (with `guid_salt`) into the note guid.
    pub guid_fields: &'static [usize],
    pub guid_salt: &'static str,
}

pub const GUID_SALT: &str = "24752456";

pub const ORDLISTA_MODEL: NoteModel = NoteModel {
    id: 3451223456,
    name: "Word",
    fields: &["Swedish", "Swedish Conjugation", "English", "Chapter", "Page"],
    templates: &[
        Template {
            name: "SWE -> ENG",
            qfmt: include_str!("../../templates/ordlista_front.html"),
            afmt: include_str!("../../templates/ordlista_back.html"),
        },
        Template {
            name: "ENG -> SWE",
            qfmt: include_str!("../../templates/ordlista_reverse_front.html"),
            afmt: include_str!("../../templates/ordlista_reverse_back.html"),
        },
    ],
    css: include_str!("../../templates/ordlista.css"),
    guid_fields: &[0, 2],
    guid_salt: GUID_SALT,
};

/// English comes from a translator and is not stable between runs, so the
/// guid hashes Swedish and Chapter instead.
pub const ORDKORT_MODEL: NoteModel = NoteModel {
    id: 3451223457,
    name: "Word",
    fields: &["Swedish", "English", "Chapter", "Text"],
    templates: &[
        Template {
            name: "SWE -> ENG",
            qfmt: include_str!("../../templates/ordkort_front.html"),
            afmt: include_str!("../../templates/ordkort_back.html"),
        },
        Template {
            name: "ENG -> SWE",
            qfmt: include_str!("../../templates/ordkort_reverse_front.html"),
            afmt: include_str!("../../templates/ordkort_reverse_back.html"),
        },
    ],
    css: include_str!("../../templates/ordkort.css"),
    guid_fields: &[0, 2],
    guid_salt: GUID_SALT,
};

/// Which fields a template needs before a card is generated for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Every listed field must be non-empty.
    All(Vec<usize>),
    /// At least one listed field must be non-empty.
    Any(Vec<usize>),
}

impl Requirement {
    pub fn is_met(&self, fields: &[String]) -> bool {
        let filled = |i: &usize| fields.get(*i).is_some_and(|f| !f.is_empty());
        match self {
            Requirement::All(ords) => ords.iter().all(filled),
            Requirement::Any(ords) => ords.iter().any(filled),
        }
    }

    fn to_json(&self, ord: usize) -> Value {
        match self {
            Requirement::All(ords) => json!([ord, "all", ords]),
            Requirement::Any(ords) => json!([ord, "any", ords]),
        }
    }
}

/// Template ordinals that produce a card for these field values, given the
/// model's precomputed [`NoteModel::requirements`].
pub fn card_ords(requirements: &[Requirement], fields: &[String]) -> Vec<usize> {
    requirements
        .iter()
        .enumerate()
        .filter(|(_, req)| req.is_met(fields))
        .map(|(ord, _)| ord)
        .collect()
}

/// Whether a template shows any field value, given which fields are filled.
///
/// Understands `{{Field}}`, `{{#Field}}`, `{{^Field}}` and `{{/Field}}`;
/// other tags (`{{FrontSide}}`) never count as content.
fn shows_field(template: &str, fields: &[&str], filled: &dyn Fn(&str) -> bool) -> bool {
    let mut visible: Vec<bool> = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };
        let tag = after[..end].trim();
        rest = &after[end + 2..];

        let shown = visible.iter().all(|v| *v);
        if let Some(name) = tag.strip_prefix('#') {
            visible.push(filled(name.trim()));
        } else if let Some(name) = tag.strip_prefix('^') {
            visible.push(!filled(name.trim()));
        } else if tag.starts_with('/') {
            visible.pop();
        } else if shown && fields.contains(&tag) && filled(tag) {
            return true;
        }
    }
    false
}

impl NoteModel {
    /// Card requirements per template, computed the way Anki expects them:
    /// fields whose absence blanks the front are all required; otherwise
    /// any field that alone puts content on the front suffices.
    pub fn requirements(&self) -> Vec<Requirement> {
        self.templates
            .iter()
            .map(|template| {
                let all: Vec<usize> = (0..self.fields.len())
                    .filter(|&i| {
                        let empty = self.fields[i];
                        !shows_field(template.qfmt, self.fields, &|f| f != empty)
                    })
                    .collect();
                if !all.is_empty() {
                    return Requirement::All(all);
                }

                let any = (0..self.fields.len())
                    .filter(|&i| {
                        let only = self.fields[i];
                        shows_field(template.qfmt, self.fields, &|f| f == only)
                    })
                    .collect();
                Requirement::Any(any)
            })
            .collect()
    }

    /// The model entry of the collection's `models` table.
    pub fn to_json(&self, deck_id: i64, modified: i64) -> Value {
        let fields: Vec<Value> = self
            .fields
            .iter()
            .enumerate()
            .map(|(ord, name)| {
                json!({
                    "name": name,
                    "ord": ord,
                    "font": "Liberation Sans",
                    "media": [],
                    "rtl": false,
                    "size": 20,
                    "sticky": false,
                })
            })
            .collect();

        let templates: Vec<Value> = self
            .templates
            .iter()
            .enumerate()
            .map(|(ord, t)| {
                json!({
                    "name": t.name,
                    "ord": ord,
                    "qfmt": t.qfmt,
                    "afmt": t.afmt,
                    "bqfmt": "",
                    "bafmt": "",
                    "bfont": "",
                    "bsize": 0,
                    "did": null,
                })
            })
            .collect();

        let req: Vec<Value> = self
            .requirements()
            .iter()
            .enumerate()
            .map(|(ord, r)| r.to_json(ord))
            .collect();

        json!({
            "id": self.id.to_string(),
            "name": self.name,
            "type": 0,
            "mod": modified,
            "usn": -1,
            "sortf": 0,
            "did": deck_id,
            "tmpls": templates,
            "flds": fields,
            "css": self.css,
            "latexPre": "\\documentclass[12pt]{article}\n\\special{papersize=3in,5in}\n\\usepackage[utf8]{inputenc}\n\\usepackage{amssymb,amsmath}\n\\pagestyle{empty}\n\\setlength{\\parindent}{0in}\n\\begin{document}\n",
            "latexPost": "\\end{document}",
            "latexsvg": false,
            "req": req,
            "tags": [],
            "vers": [],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_shows_field_sections() {
        let fields = &["A", "B"];
        let t = "{{#A}}x {{B}}{{/A}}{{^B}}none{{/B}}";
        assert!(shows_field(t, fields, &|_| true));
        assert!(!shows_field(t, fields, &|f| f == "B"));
        assert!(!shows_field(t, fields, &|f| f == "A"));
        assert!(!shows_field("{{FrontSide}}", &["FrontSide"], &|_| false));
    }

    #[test]
    fn test_ordlista_requirements() {
        let reqs = ORDLISTA_MODEL.requirements();
        assert_eq!(reqs[0], Requirement::Any(vec![0, 1, 3, 4]));
        assert_eq!(reqs[1], Requirement::Any(vec![2, 3, 4]));
    }

    #[test]
    fn test_ordkort_requirements() {
        let reqs = ORDKORT_MODEL.requirements();
        assert_eq!(reqs[0], Requirement::Any(vec![0, 2, 3]));
        assert_eq!(reqs[1], Requirement::Any(vec![1, 2, 3]));
    }

    #[test]
    fn test_card_ords() {
        let reqs = ORDLISTA_MODEL.requirements();
        let fields = strings(&["hund", "", "dog", "3", "12"]);
        assert_eq!(card_ords(&reqs, &fields), vec![0, 1]);

        let fields = strings(&["hund", "", "", "", ""]);
        assert_eq!(card_ords(&reqs, &fields), vec![0]);

        let fields = strings(&["", "", "", "", ""]);
        assert!(card_ords(&reqs, &fields).is_empty());
    }

    #[test]
    fn test_model_json() {
        let json = ORDKORT_MODEL.to_json(42, 1);
        assert_eq!(json["id"], "3451223457");
        assert_eq!(json["flds"][3]["name"], "Text");
        assert_eq!(json["tmpls"][1]["name"], "ENG -> SWE");
        assert_eq!(json["req"][0][1], "any");
        assert_eq!(json["did"], 42);
    }
}
