//! Turns catalog data and compile results into embeds ready for display.

use compile_api::{CompileError, CompileResult};
use regex::Regex;
use std::sync::LazyLock;

use crate::{
    catalog::{Catalog, LanguageGroup},
    embed::Embed,
};

/// Fields per page the chat platform will render
pub const PAGE_SIZE: usize = 24;

/// Longest output kept per field, leaving room for the surrounding fence
pub const MAX_FIELD_OUTPUT: usize = 1018;

pub const OUTPUT_TRUNCATED: &str =
    "Output was too long. Click the `Compilation results` hyperlink to see the full output.";

const OUTAGE_HINT: &str = "*This could mean the compile service is experiencing an outage, a network connection error has occured, or you provided a wrong request.*";

const FIRST_LINE_NOTE: &str = "The first line of the code block is never sent to the compiler because that's where syntax highlighting should be.";

static MENTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@(everyone|here|[!&]?[0-9]{17,20})").expect("valid mention pattern")
});

/// Neutralise `@everyone`, `@here` and user/role mentions by inserting a
/// zero-width space after the `@`.
pub fn escape_mentions(text: &str) -> String {
    MENTION_RE.replace_all(text, "@\u{200b}$1").into_owned()
}

/// Split into pages of at most [`PAGE_SIZE`]; always at least one page.
pub fn paginate<T>(items: &[T]) -> Vec<&[T]> {
    if items.is_empty() {
        return vec![items];
    }
    items.chunks(PAGE_SIZE).collect()
}

/// Cut to [`MAX_FIELD_OUTPUT`] characters, reporting whether anything was cut.
pub fn truncate_output(text: &str) -> (String, bool) {
    match text.char_indices().nth(MAX_FIELD_OUTPUT) {
        Some((end, _)) => (text[..end].to_string(), true),
        None => (text.to_string(), false),
    }
}

fn fenced(text: &str) -> String {
    format!("```{}```", text)
}

pub fn language_pages(author: &str, catalog: &Catalog) -> Vec<Embed> {
    paginate(catalog.languages())
        .into_iter()
        .map(|page| {
            page.iter().fold(
                Embed::new(author, "Available languages"),
                |embed, group| {
                    let count = group.compilers.len();
                    let value = if count == 1 {
                        "1 compiler".to_string()
                    } else {
                        format!("{} compilers", count)
                    };
                    embed.field(group.name.as_str(), value)
                },
            )
        })
        .collect()
}

pub fn language_info_pages(author: &str, catalog: &Catalog, group: &LanguageGroup) -> Vec<Embed> {
    let templates = format!("Templates available: `{}`", group.templates.join("`, `"));
    let compilers = catalog.group_compilers(group);

    paginate(&compilers)
        .into_iter()
        .enumerate()
        .map(|(page_idx, page)| {
            let embed = Embed::new(author, "Language compilers").description(templates.as_str());
            page.iter().enumerate().fold(embed, |embed, (idx, compiler)| {
                let name = if page_idx == 0 && idx == 0 {
                    format!("{} (default)", compiler.name)
                } else {
                    compiler.name.clone()
                };
                embed.field(name, format!("Version: {}", compiler.version))
            })
        })
        .collect()
}

pub fn template_message(code: &str) -> String {
    fenced(&escape_mentions(code))
}

pub fn confirmation_embed(author: &str, code: &str) -> Embed {
    Embed::new(
        author,
        "Do you want to run compiler with the following code?",
    )
    .description(fenced(&escape_mentions(code)))
    .field("Note", FIRST_LINE_NOTE)
}

pub fn missing_code_embed(author: &str) -> Embed {
    Embed::new(author, "Critical error:")
        .description("You must attach a code-block containing code to your message")
}

pub fn compile_error_embed(author: &str, error: &CompileError) -> Embed {
    Embed::new(author, "Critical error:").block_field(
        "API replied with:",
        format!("`{}`\n{}", escape_mentions(&error.summary()), OUTAGE_HINT),
    )
}

pub fn compile_result_embed(author: &str, result: &CompileResult) -> Embed {
    let mut embed = Embed::new(author, "Compilation results")
        .description(format!("Status: {}", result.status))
        .url(result.url.as_str());

    let outputs = [
        ("Program Output", &result.program_output),
        ("Program Error", &result.program_error),
        ("Compiler Error", &result.compiler_error),
    ];

    for (name, raw) in outputs {
        let escaped = escape_mentions(raw);
        if escaped.is_empty() {
            continue;
        }
        let (text, truncated) = truncate_output(&escaped);
        if truncated {
            embed.description = Some(OUTPUT_TRUNCATED.to_string());
        }
        embed = embed.field(name, fenced(&text));
    }

    embed
}
