//! Markdown reference of the language vocabulary.
//!
//! Renders the `adorad_core::lang` registries (keywords, operators, punctuation, attributes) as Markdown tables,
//! including each entry's `since` version and stability. The registries are the single source of truth; this output
//! is derived from them and never edited by hand.

use std::fs;
use std::path::Path;

use crate::lang::{attributes, keywords, operators, punctuation};

use super::{CliError, CliResult, ExitCode};

/// Print the vocabulary reference, or write it to `output` when given.
pub fn vocab_command(output: Option<&Path>) -> CliResult<ExitCode> {
    let reference = render_reference();
    match output {
        Some(path) => {
            fs::write(path, &reference)
                .map_err(|e| CliError::failure(format!("Error writing '{}': {e}", path.display())))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{reference}"),
    }
    Ok(ExitCode::SUCCESS)
}

/// The full reference document.
pub fn render_reference() -> String {
    let mut out = String::new();
    out.push_str("# Adorad vocabulary reference\n\n");
    out.push_str("Generated from the `adorad_core::lang` registries with `adorad vocab`.\n");

    render_keywords(&mut out);
    render_operators(&mut out);
    render_punctuation(&mut out);
    render_attributes(&mut out);

    out
}

fn start_section(out: &mut String, heading: &str, columns: &[&str]) {
    out.push_str(&format!("\n## {heading}\n\n"));
    out.push_str(&format!("| {} |\n", columns.join(" | ")));
    out.push_str(&format!("|{}\n", "---|".repeat(columns.len())));
}

fn render_keywords(out: &mut String) {
    start_section(out, "Keywords", &["Id", "Spelling", "Category", "Since", "Stability"]);
    for k in keywords::KEYWORDS {
        out.push_str(&format!(
            "| {:?} | `{}` | {:?} | {} | {:?} |\n",
            k.id, k.canonical, k.category, k.since, k.stability
        ));
    }
}

fn render_operators(out: &mut String) {
    start_section(
        out,
        "Operators",
        &["Id", "Spelling", "Precedence", "Associativity", "Fixity", "Since", "Stability"],
    );
    for o in operators::OPERATORS {
        // `|` would split the table cell
        let spelling = o.spelling.replace('|', "\\|");
        out.push_str(&format!(
            "| {:?} | `{spelling}` | {} | {:?} | {:?} | {} | {:?} |\n",
            o.id, o.precedence, o.associativity, o.fixity, o.since, o.stability
        ));
    }
}

fn render_punctuation(out: &mut String) {
    start_section(out, "Punctuation", &["Id", "Spelling", "Category", "Since", "Stability"]);
    for p in punctuation::PUNCTUATION {
        out.push_str(&format!(
            "| {:?} | `{}` | {:?} | {} | {:?} |\n",
            p.id, p.canonical, p.category, p.since, p.stability
        ));
    }
}

fn render_attributes(out: &mut String) {
    start_section(out, "Attributes", &["Id", "Spelling", "Description", "Since", "Stability"]);
    for a in attributes::ATTRIBUTES {
        out.push_str(&format!(
            "| {:?} | `[{}]` | {} | {} | {:?} |\n",
            a.id, a.canonical, a.description, a.since, a.stability
        ));
    }
}
