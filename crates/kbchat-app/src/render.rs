//! Terminal rendering for the conversation surface
//!
//! Markdown from the model is rendered to ANSI-styled text; user messages
//! and panels get role-styled prefixes. Layout stays plain so the output
//! reads fine with colors disabled too.

use colored::Colorize;
use kbchat_types::{Message, Role};
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

/// Number of log entries up to which the suggested-questions panel is shown
const SUGGESTIONS_CUTOFF: usize = 3;

/// Render markdown to ANSI-styled terminal text
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);

    let parser = Parser::new_ext(markdown, options);

    let mut out = String::new();
    let mut bold_depth = 0usize;
    let mut italic_depth = 0usize;
    let mut strike_depth = 0usize;
    let mut in_code_block = false;

    for event in parser {
        match event {
            Event::Start(Tag::Heading { .. }) => bold_depth += 1,
            Event::End(TagEnd::Heading(_)) => {
                bold_depth = bold_depth.saturating_sub(1);
                out.push_str("\n\n");
            }
            Event::Start(Tag::Strong) => bold_depth += 1,
            Event::End(TagEnd::Strong) => bold_depth = bold_depth.saturating_sub(1),
            Event::Start(Tag::Emphasis) => italic_depth += 1,
            Event::End(TagEnd::Emphasis) => italic_depth = italic_depth.saturating_sub(1),
            Event::Start(Tag::Strikethrough) => strike_depth += 1,
            Event::End(TagEnd::Strikethrough) => strike_depth = strike_depth.saturating_sub(1),
            Event::Start(Tag::CodeBlock(kind)) => {
                in_code_block = true;
                if let CodeBlockKind::Fenced(language) = kind {
                    if !language.is_empty() {
                        out.push_str(&format!("{}\n", language.bright_black()));
                    }
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                out.push('\n');
            }
            Event::Start(Tag::Item) => out.push_str("  • "),
            Event::End(TagEnd::Item) => out.push('\n'),
            Event::End(TagEnd::Paragraph) => out.push_str("\n\n"),
            Event::End(TagEnd::List(_)) => out.push('\n'),
            Event::Text(text) => {
                if in_code_block {
                    for line in text.lines() {
                        out.push_str(&format!("    {}\n", line.bright_black()));
                    }
                } else {
                    out.push_str(&styled(
                        &text,
                        bold_depth > 0,
                        italic_depth > 0,
                        strike_depth > 0,
                    ));
                }
            }
            Event::Code(code) => out.push_str(&format!("{}", code.yellow())),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::Rule => out.push_str(&format!("{}\n\n", "─".repeat(40).bright_black())),
            _ => {}
        }
    }

    out.trim_end().to_string()
}

fn styled(text: &str, bold: bool, italic: bool, strike: bool) -> String {
    let mut styled = text.normal();
    if bold {
        styled = styled.bold();
    }
    if italic {
        styled = styled.italic();
    }
    if strike {
        styled = styled.strikethrough();
    }
    styled.to_string()
}

/// Render one conversation message, styled by role.
pub fn render_message(message: &Message, bot_name: &str) -> String {
    match message.role {
        Role::User => format!("{} {}", "You:".bright_blue().bold(), message.text),
        Role::Model => format!(
            "{}\n{}",
            format!("{}:", bot_name).green().bold(),
            render_markdown(&message.text)
        ),
    }
}

/// Suggested questions are only offered while the conversation is still at
/// its initial length and no request is in flight.
pub fn suggestions_visible(message_count: usize, is_loading: bool) -> bool {
    !is_loading && message_count < SUGGESTIONS_CUTOFF
}

/// Render the numbered quick-question panel. Entering a number sends the
/// question's literal text.
pub fn render_suggestions(questions: &[String]) -> String {
    let mut out = format!("{}\n", "Quick questions:".bright_black());
    for (index, question) in questions.iter().enumerate() {
        out.push_str(&format!(
            "  {} {}\n",
            format!("[{}]", index + 1).bright_black(),
            question
        ));
    }
    out
}
