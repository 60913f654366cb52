use glosor_core::deck::apkg::PackageContents;
use glosor_core::model::Pair;

pub fn print_pairs(pairs: &[Pair]) {
    if pairs.is_empty() {
        println!("No pairs found.");
        return;
    }

    let width = pairs
        .iter()
        .map(|p| p.swedish.chars().count())
        .max()
        .unwrap_or(10);

    let mut section: Option<(Option<&str>, Option<&str>)> = None;
    for pair in pairs {
        let current = (pair.chapter.as_deref(), pair.text.as_deref());
        if section != Some(current) {
            if section.is_some() {
                println!();
            }
            match current {
                (Some(chapter), Some(text)) => println!("=== Kapitel {chapter}: {text} ===\n"),
                (Some(chapter), None) => println!("=== Kapitel {chapter} ===\n"),
                (None, _) => println!("=== Klassrumsfraser ===\n"),
            }
            section = Some(current);
        }

        let page = pair
            .page
            .as_deref()
            .map(|p| format!("s. {p:<4}"))
            .unwrap_or_else(|| " ".repeat(7));
        print!("  {}  {:<width$}  {}", page, pair.swedish, pair.english, width = width);
        if let Some(ref conjugation) = pair.swedish_conjugation {
            print!("  ({conjugation})");
        }
        println!();
    }

    println!("\n{} pair(s)", pairs.len());
}

pub fn print_package(contents: &PackageContents) {
    let decks: Vec<&str> = contents
        .decks
        .iter()
        .map(String::as_str)
        .filter(|d| *d != "Default")
        .collect();
    println!("Deck(s): {}", decks.join(", "));
    println!("Fields:  {}", contents.field_names.join(" | "));
    println!(
        "{} note(s), {} card(s)\n",
        contents.notes.len(),
        contents.cards
    );

    for note in &contents.notes {
        println!("  {}", note.fields.join(" | "));
        if !note.tags.is_empty() {
            println!("    tags: {}", note.tags.join(" "));
        }
    }
}
