use colored::Colorize;
use incilab_core::view::{Line, Tone};

/// Prints a composed document with the tone-to-color mapping.
pub fn print_document(lines: &[Line]) {
    println!();
    for line in lines {
        println!("{}", styled(line));
    }
    println!();
}

fn styled(line: &Line) -> String {
    match line.tone {
        Tone::Heading => line.text.bold().green().to_string(),
        Tone::Normal => line.text.clone(),
        Tone::Dim => line.text.dimmed().to_string(),
        Tone::Info => line.text.cyan().to_string(),
        Tone::Success => line.text.green().to_string(),
        Tone::Warning => line.text.yellow().to_string(),
        Tone::Error => line.text.red().bold().to_string(),
    }
}
