//! Anki package files.
//!
//! An `.apkg` is a zip holding the SQLite collection `collection.anki2`
//! and a `media` index (empty here, as no media is bundled).

use crate::deck::model::card_ords;
use crate::deck::Deck;
use crate::error::GlosorError;
use rusqlite::{params, Connection};
use serde_json::{json, Value};
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use zip::write::SimpleFileOptions;

const COLLECTION: &str = "collection.anki2";
const MEDIA: &str = "media";
const FIELD_SEPARATOR: char = '\x1f';

const SCHEMA: &str = r"
CREATE TABLE col (
    id INTEGER PRIMARY KEY,
    crt INTEGER NOT NULL,
    mod INTEGER NOT NULL,
    scm INTEGER NOT NULL,
    ver INTEGER NOT NULL,
    dty INTEGER NOT NULL,
    usn INTEGER NOT NULL,
    ls INTEGER NOT NULL,
    conf TEXT NOT NULL,
    models TEXT NOT NULL,
    decks TEXT NOT NULL,
    dconf TEXT NOT NULL,
    tags TEXT NOT NULL
);

CREATE TABLE notes (
    id INTEGER PRIMARY KEY,
    guid TEXT NOT NULL,
    mid INTEGER NOT NULL,
    mod INTEGER NOT NULL,
    usn INTEGER NOT NULL,
    tags TEXT NOT NULL,
    flds TEXT NOT NULL,
    sfld INTEGER NOT NULL,
    csum INTEGER NOT NULL,
    flags INTEGER NOT NULL,
    data TEXT NOT NULL
);

CREATE TABLE cards (
    id INTEGER PRIMARY KEY,
    nid INTEGER NOT NULL,
    did INTEGER NOT NULL,
    ord INTEGER NOT NULL,
    mod INTEGER NOT NULL,
    usn INTEGER NOT NULL,
    type INTEGER NOT NULL,
    queue INTEGER NOT NULL,
    due INTEGER NOT NULL,
    ivl INTEGER NOT NULL,
    factor INTEGER NOT NULL,
    reps INTEGER NOT NULL,
    lapses INTEGER NOT NULL,
    left INTEGER NOT NULL,
    odue INTEGER NOT NULL,
    odid INTEGER NOT NULL,
    flags INTEGER NOT NULL,
    data TEXT NOT NULL
);

CREATE TABLE revlog (
    id INTEGER PRIMARY KEY,
    cid INTEGER NOT NULL,
    usn INTEGER NOT NULL,
    ease INTEGER NOT NULL,
    ivl INTEGER NOT NULL,
    lastIvl INTEGER NOT NULL,
    factor INTEGER NOT NULL,
    time INTEGER NOT NULL,
    type INTEGER NOT NULL
);

CREATE TABLE graves (
    usn INTEGER NOT NULL,
    oid INTEGER NOT NULL,
    type INTEGER NOT NULL
);

CREATE INDEX ix_notes_usn ON notes (usn);
CREATE INDEX ix_cards_usn ON cards (usn);
CREATE INDEX ix_revlog_usn ON revlog (usn);
CREATE INDEX ix_cards_nid ON cards (nid);
CREATE INDEX ix_cards_sched ON cards (did, queue, due);
CREATE INDEX ix_revlog_cid ON revlog (cid);
CREATE INDEX ix_notes_csum ON notes (csum);
";

/// A note as stored in a package.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PackageNote {
    pub guid: String,
    pub fields: Vec<String>,
    pub tags: Vec<String>,
}

/// What `read_package` recovers from an `.apkg`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PackageContents {
    pub decks: Vec<String>,
    pub field_names: Vec<String>,
    pub notes: Vec<PackageNote>,
    pub cards: usize,
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Strip tags so the sort field compares as plain text.
fn strip_html(text: &str) -> String {
    let mut plain = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => plain.push(c),
            _ => {}
        }
    }
    plain
}

/// First 4 bytes of the SHA-1 of the sort field, as Anki's duplicate check expects.
fn field_checksum(sort_field: &str) -> i64 {
    let digest = Sha1::digest(sort_field.as_bytes());
    i64::from(u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]))
}

fn format_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        String::new()
    } else {
        format!(" {} ", tags.join(" "))
    }
}

fn collection_json(deck: &Deck, modified: i64) -> (Value, Value, Value, Value) {
    let secs = modified / 1000;
    let conf = json!({
        "activeDecks": [1],
        "curDeck": 1,
        "newSpread": 0,
        "collapseTime": 1200,
        "timeLim": 0,
        "estTimes": true,
        "dueCounts": true,
        "curModel": null,
        "nextPos": 1,
        "sortType": "noteFld",
        "sortBackwards": false,
        "addToCur": true,
    });

    let mut models = serde_json::Map::new();
    models.insert(deck.model.id.to_string(), deck.model.to_json(deck.id, secs));

    let deck_json = |id: i64, name: &str| {
        json!({
            "id": id,
            "name": name,
            "desc": "",
            "conf": 1,
            "dyn": 0,
            "collapsed": false,
            "extendNew": 10,
            "extendRev": 50,
            "newToday": [0, 0],
            "revToday": [0, 0],
            "lrnToday": [0, 0],
            "timeToday": [0, 0],
            "mod": secs,
            "usn": -1,
        })
    };
    let mut decks = serde_json::Map::new();
    decks.insert("1".into(), deck_json(1, "Default"));
    decks.insert(deck.id.to_string(), deck_json(deck.id, &deck.name));

    let dconf = json!({
        "1": {
            "id": 1,
            "name": "Default",
            "mod": 0,
            "usn": 0,
            "maxTaken": 60,
            "autoplay": true,
            "timer": 0,
            "replayq": true,
            "new": {
                "perDay": 20,
                "delays": [1, 10],
                "separate": true,
                "ints": [1, 4, 7],
                "initialFactor": 2500,
                "bury": true,
                "order": 1,
            },
            "rev": {
                "perDay": 100,
                "fuzz": 0.05,
                "ivlFct": 1,
                "maxIvl": 36500,
                "ease4": 1.3,
                "bury": true,
                "minSpace": 1,
            },
            "lapse": {
                "leechFails": 8,
                "minInt": 1,
                "delays": [10],
                "leechAction": 0,
                "mult": 0,
            },
        }
    });

    (conf, Value::Object(models), Value::Object(decks), dconf)
}

fn write_collection(conn: &mut Connection, deck: &Deck) -> Result<usize, GlosorError> {
    let modified = now_millis();
    let secs = modified / 1000;
    let (conf, models, decks, dconf) = collection_json(deck, modified);

    conn.execute_batch(SCHEMA)?;
    conn.execute(
        "INSERT INTO col VALUES (NULL, ?1, ?2, ?3, 11, 0, 0, 0, ?4, ?5, ?6, ?7, '{}')",
        params![
            secs,
            modified,
            modified,
            conf.to_string(),
            models.to_string(),
            decks.to_string(),
            dconf.to_string(),
        ],
    )?;

    let requirements = deck.model.requirements();
    let tx = conn.transaction()?;
    let mut next_id = modified;
    let mut cards = 0;
    {
        let mut insert_note =
            tx.prepare("INSERT INTO notes VALUES (?1, ?2, ?3, ?4, -1, ?5, ?6, ?7, ?8, 0, '')")?;
        let mut insert_card = tx.prepare(
            "INSERT INTO cards VALUES (?1, ?2, ?3, ?4, ?5, -1, 0, 0, ?6, 0, 0, 0, 0, 0, 0, 0, 0, '')",
        )?;

        for (due, note) in deck.notes.iter().enumerate() {
            let note_id = next_id;
            next_id += 1;

            let sort_field = strip_html(note.fields.first().map(String::as_str).unwrap_or(""));
            let flds = note.fields.join(&FIELD_SEPARATOR.to_string());
            insert_note.execute(params![
                note_id,
                note.guid,
                deck.model.id,
                secs,
                format_tags(&note.tags),
                flds,
                sort_field,
                field_checksum(&sort_field),
            ])?;

            for ord in card_ords(&requirements, &note.fields) {
                insert_card.execute(params![next_id, note_id, deck.id, ord as i64, secs, due as i64])?;
                next_id += 1;
                cards += 1;
            }
        }
    }
    tx.commit()?;
    Ok(cards)
}

/// Write a deck as an `.apkg` package.
///
/// The package is assembled next to the destination and moved into place
/// only when complete.
pub fn write_package(deck: &Deck, path: &Path) -> Result<(), GlosorError> {
    let workdir = tempfile::tempdir()?;
    let db_path = workdir.path().join(COLLECTION);

    let cards = {
        let mut conn = Connection::open(&db_path)?;
        write_collection(&mut conn, deck)?
    };
    let collection = std::fs::read(&db_path)?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    let mut staged = tempfile::NamedTempFile::new_in(&parent)?;
    {
        let mut zip = zip::ZipWriter::new(staged.as_file_mut());
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        zip.start_file(COLLECTION, options)?;
        zip.write_all(&collection)?;
        zip.start_file(MEDIA, options)?;
        zip.write_all(b"{}")?;
        zip.finish()?;
    }
    staged.persist(path).map_err(|e| GlosorError::Io(e.error))?;

    log::info!(
        "wrote {} ({} notes, {} cards)",
        path.display(),
        deck.notes.len(),
        cards
    );
    Ok(())
}

/// Re-open a package and list its decks, note fields and tags.
pub fn read_package(path: &Path) -> Result<PackageContents, GlosorError> {
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    let workdir = tempfile::tempdir()?;
    let db_path = workdir.path().join(COLLECTION);
    {
        let mut entry = archive.by_name(COLLECTION).map_err(|_| {
            GlosorError::Package(format!("{} has no {}", path.display(), COLLECTION))
        })?;
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        std::fs::write(&db_path, bytes)?;
    }

    let conn = Connection::open(&db_path)?;
    let (models, decks): (String, String) =
        conn.query_row("SELECT models, decks FROM col", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?;
    let models: BTreeMap<String, Value> = serde_json::from_str(&models)?;
    let decks: BTreeMap<String, Value> = serde_json::from_str(&decks)?;

    let mut stmt = conn.prepare("SELECT guid, mid, flds, tags FROM notes ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut notes = Vec::new();
    let mut model_id = None;
    for row in rows {
        let (guid, mid, flds, tags) = row?;
        if model_id.is_none() {
            model_id = Some(mid);
        }
        notes.push(PackageNote {
            guid,
            fields: flds.split(FIELD_SEPARATOR).map(String::from).collect(),
            tags: tags.split_whitespace().map(String::from).collect(),
        });
    }

    let model = match model_id {
        Some(mid) => models.get(&mid.to_string()),
        None => models.values().next(),
    };
    let field_names = model
        .and_then(|m| m["flds"].as_array())
        .map(|flds| {
            flds.iter()
                .filter_map(|f| f["name"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default();

    let deck_names = decks
        .values()
        .filter_map(|d| d["name"].as_str().map(String::from))
        .collect();

    let cards: i64 = conn.query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?;

    Ok(PackageContents {
        decks: deck_names,
        field_names,
        notes,
        cards: cards as usize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::schema::Variant;

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<b>hund</b> &amp; katt"), "hund &amp; katt");
    }

    #[test]
    fn test_format_tags() {
        assert_eq!(format_tags(&["Kapitel1".into()]), " Kapitel1 ");
        assert_eq!(format_tags(&[]), "");
    }

    #[test]
    fn test_field_checksum_matches_sha1_prefix() {
        let digest = Sha1::digest(b"hund");
        let expected = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
        assert_eq!(field_checksum("hund"), i64::from(expected));
    }

    #[test]
    fn test_write_and_read_package() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.apkg");

        let mut deck = Deck::new("Test", Variant::Ordlista);
        deck.add_note(
            vec!["hund".into(), "".into(), "dog".into(), "1".into(), "5".into()],
            vec!["Kapitel1".into()],
        );
        deck.add_note(
            vec!["tack".into(), "".into(), "".into(), "".into(), "".into()],
            vec!["Klassrumfraser".into()],
        );
        write_package(&deck, &path).unwrap();

        let contents = read_package(&path).unwrap();
        assert_eq!(
            contents.field_names,
            vec!["Swedish", "Swedish Conjugation", "English", "Chapter", "Page"]
        );
        assert!(contents.decks.contains(&"Test".to_string()));
        assert_eq!(contents.notes.len(), 2);
        assert_eq!(contents.notes[0].fields[2], "dog");
        assert_eq!(contents.notes[0].tags, vec!["Kapitel1"]);
        assert_eq!(contents.notes[1].guid, deck.notes[1].guid);
        // second note has no English, so only the SWE -> ENG card
        assert_eq!(contents.cards, 3);
    }

    #[test]
    fn test_read_rejects_non_package() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.apkg");
        {
            let file = std::fs::File::create(&path).unwrap();
            let mut zip = zip::ZipWriter::new(file);
            zip.start_file("other", SimpleFileOptions::default()).unwrap();
            zip.finish().unwrap();
        }
        assert!(matches!(
            read_package(&path),
            Err(GlosorError::Package(_))
        ));
    }
}
