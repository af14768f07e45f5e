//! Markdown to HTML for README and introduction documents.
//!
//! Tables, footnotes and heading attributes are enabled, headings get unique
//! slug ids, a lone `[TOC]` paragraph becomes a table of contents and code
//! blocks are highlighted with syntect (CSS classes, no inline styles) inside
//! `<div class="highlight">`. Raw HTML passes through.

use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd,
};
use std::collections::HashMap;
use std::sync::OnceLock;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

const TOC_MARKER: &str = "[TOC]";

struct TocEntry {
    level: usize,
    id: String,
    title: String,
}

pub fn render(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

    let mut events: Vec<Event> = Parser::new_ext(markdown, options).collect();
    let toc = assign_heading_ids(&mut events);
    let events = decorate(events, &toc);

    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, events.into_iter());
    output
}

/// Give every heading a unique id and collect the table of contents
fn assign_heading_ids(events: &mut [Event]) -> Vec<TocEntry> {
    let mut used: HashMap<String, usize> = HashMap::new();
    let mut toc = Vec::new();

    let mut i = 0;
    while i < events.len() {
        if let Event::Start(Tag::Heading { level, .. }) = &events[i] {
            let level = heading_depth(*level);

            let mut title = String::new();
            let mut j = i + 1;
            while j < events.len() {
                match &events[j] {
                    Event::End(TagEnd::Heading(_)) => break,
                    Event::Text(text) | Event::Code(text) => title.push_str(text),
                    _ => {}
                }
                j += 1;
            }

            if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
                let chosen = match id {
                    Some(existing) => existing.to_string(),
                    None => unique_slug(&slugify(&title), &mut used),
                };
                *id = Some(CowStr::from(chosen.clone()));
                toc.push(TocEntry {
                    level,
                    id: chosen,
                    title,
                });
            }

            i = j;
        }
        i += 1;
    }

    toc
}

fn decorate<'a>(events: Vec<Event<'a>>, toc: &[TocEntry]) -> Vec<Event<'a>> {
    let mut out = Vec::with_capacity(events.len() + 8);
    let mut i = 0;

    while i < events.len() {
        match &events[i] {
            Event::Start(Tag::Paragraph) => {
                if let Some(end) = toc_marker_end(&events, i) {
                    out.push(Event::Html(CowStr::from(render_toc(toc))));
                    i = end + 1;
                    continue;
                }
                out.push(events[i].clone());
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().unwrap_or("").to_string()
                    }
                    CodeBlockKind::Indented => String::new(),
                };

                let mut code = String::new();
                let mut j = i + 1;
                while j < events.len() {
                    match &events[j] {
                        Event::End(TagEnd::CodeBlock) => break,
                        Event::Text(text) => code.push_str(text),
                        _ => {}
                    }
                    j += 1;
                }

                out.push(Event::Html(CowStr::from(render_code_block(&code, &lang))));
                i = j + 1;
                continue;
            }
            _ => out.push(events[i].clone()),
        }
        i += 1;
    }

    out
}

/// `<div class="highlight"><pre><code>` with token-level `<span class>` markup
fn render_code_block(code: &str, lang: &str) -> String {
    let mut html = String::from("<div class=\"highlight\">\n<pre><code");
    if !lang.is_empty() {
        html.push_str(&format!(" class=\"language-{}\"", escape_html(lang)));
    }
    html.push('>');

    match highlight(code, lang) {
        Ok(highlighted) => html.push_str(&highlighted),
        Err(e) => {
            log::debug!("Highlighting failed for '{}' block: {}", lang, e);
            html.push_str(&escape_html(code));
        }
    }

    html.push_str("</code></pre>\n</div>\n");
    html
}

fn highlight(code: &str, lang: &str) -> Result<String, syntect::Error> {
    let syntaxes = syntax_set();
    let syntax = syntaxes
        .find_syntax_by_token(lang)
        .unwrap_or_else(|| syntaxes.find_syntax_plain_text());

    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, syntaxes, ClassStyle::Spaced);
    for line in LinesWithEndings::from(code) {
        generator.parse_html_for_line_which_includes_newline(line)?;
    }
    Ok(generator.finalize())
}

/// If the paragraph starting at `start` holds only `[TOC]`, return the index of its end
fn toc_marker_end(events: &[Event], start: usize) -> Option<usize> {
    let mut text = String::new();
    for (offset, event) in events[start + 1..].iter().enumerate() {
        match event {
            Event::Text(t) => text.push_str(t),
            Event::End(TagEnd::Paragraph) => {
                return (text.trim() == TOC_MARKER).then_some(start + 1 + offset);
            }
            _ => return None,
        }
    }
    None
}

fn render_toc(toc: &[TocEntry]) -> String {
    let mut html = String::from("<div class=\"toc\">\n");
    let mut open: Vec<usize> = Vec::new();

    for entry in toc {
        while open.last().map_or(false, |&level| level > entry.level) {
            html.push_str("</li>\n</ul>\n");
            open.pop();
        }

        match open.last() {
            Some(&level) if level == entry.level => html.push_str("</li>\n"),
            _ => {
                html.push_str("<ul>\n");
                open.push(entry.level);
            }
        }

        html.push_str(&format!(
            "<li><a href=\"#{}\">{}</a>",
            escape_html(&entry.id),
            escape_html(&entry.title)
        ));
    }

    while open.pop().is_some() {
        html.push_str("</li>\n</ul>\n");
    }

    html.push_str("</div>\n");
    html
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.trim().chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    }
}

fn unique_slug(base: &str, used: &mut HashMap<String, usize>) -> String {
    let count = used.entry(base.to_string()).or_insert(0);
    let slug = if *count == 0 {
        base.to_string()
    } else {
        format!("{}_{}", base, count)
    };
    *count += 1;
    slug
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
