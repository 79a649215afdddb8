use std::path::Path;

use colored::Colorize;

use crate::deck::Deck;

/// Print the slides of a deck without opening a window.
pub fn run(file: &Path) -> anyhow::Result<()> {
    let deck = Deck::load(file)?;

    let title = deck.meta.title.clone().unwrap_or_else(|| {
        file.file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    });
    println!("{}", title.bold());
    if let Some(author) = &deck.meta.author {
        println!("{}", author.dimmed());
    }
    println!();

    for (index, slide) in deck.slides.iter().enumerate() {
        println!(
            "  {}  {}  {}",
            format!("{:02}", index + 1).cyan(),
            slide.display_title(index),
            format!("#{}", slide.id).dimmed(),
        );
        if let Some(notes) = &slide.notes {
            for line in notes.lines() {
                println!("      {}", line.dimmed());
            }
        }
    }

    println!();
    println!("{}", format!("{} slide(s)", deck.len()).green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_rejects_missing_file() {
        let result = run(Path::new("/nonexistent/deck.yaml"));
        assert!(result.is_err());
    }
}
