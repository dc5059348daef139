//! Confluence storage-format emitter.
//!
//! Walks a [`Document`] and writes XHTML storage markup. Native constructs
//! map to plain XHTML elements; constructs that have a registry macro (code
//! blocks, task items) go through the same macro writer that
//! [`render_macro`](crate::render_macro) uses.
//!
//! # Example
//!
//! ```
//! use conflux_storage::{EmitOptions, Emitter, parse};
//!
//! let doc = parse("# Release notes\n\n## Fixes\n\nAll of them.");
//! let emitter = Emitter::new(EmitOptions {
//!     prepend_toc: false,
//!     extract_title: true,
//! });
//! let result = emitter.emit(&doc);
//!
//! assert_eq!(result.title.as_deref(), Some("Release notes"));
//! assert_eq!(result.storage, "<h1>Fixes</h1><p>All of them.</p>");
//! ```

use crate::markup::MarkupWriter;
use crate::model::{
    Alignment, Block, Document, Inline, List, MacroBody, MacroElement, Table, plain_text,
};
use crate::registry::{MacroKind, macro_for};

/// Link targets that are written as plain label text.
const BLOCKED_SCHEMES: &[&str] = &["javascript:", "data:", "vbscript:"];

const HEADING_OPEN: [&str; 6] = ["<h1>", "<h2>", "<h3>", "<h4>", "<h5>", "<h6>"];
const HEADING_CLOSE: [&str; 6] = ["</h1>", "</h2>", "</h3>", "</h4>", "</h5>", "</h6>"];

/// Emitter settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmitOptions {
    /// Prepend a `toc` macro when the output has at least one heading.
    pub prepend_toc: bool,
    /// Remove the first top-level H1, return it as the title and shift later
    /// headings up one level.
    pub extract_title: bool,
}

/// Emitted storage markup and the extracted title.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmitResult {
    pub storage: String,
    /// Title from the first H1, when title extraction is enabled.
    pub title: Option<String>,
}

/// Storage-format emitter.
#[derive(Clone, Debug, Default)]
pub struct Emitter {
    options: EmitOptions,
}

impl Emitter {
    #[must_use]
    pub fn new(options: EmitOptions) -> Self {
        Self { options }
    }

    /// Emit a document. Never fails.
    #[must_use]
    pub fn emit(&self, document: &Document) -> EmitResult {
        let mut state = EmitState::new(self.options);
        state.blocks(&document.blocks, false, true);

        let EmitState {
            out,
            title,
            headings,
            ..
        } = state;

        if self.options.prepend_toc && headings > 0 {
            let mut with_toc = EmitState::new(self.options);
            with_toc.write_macro(&MacroElement::new(MacroKind::Toc, MacroBody::None));
            with_toc.out.append(out);
            return EmitResult {
                storage: with_toc.out.finish(),
                title,
            };
        }

        EmitResult {
            storage: out.finish(),
            title,
        }
    }
}

/// Emit a document with default options.
#[must_use]
pub fn emit(document: &Document) -> String {
    Emitter::default().emit(document).storage
}

/// Storage markup for a single macro instance.
pub(crate) fn emit_macro(element: &MacroElement) -> String {
    let mut state = EmitState::new(EmitOptions::default());
    state.write_macro(element);
    state.out.finish()
}

struct EmitState {
    options: EmitOptions,
    out: MarkupWriter,
    title: Option<String>,
    /// Headings written so far.
    headings: usize,
}

impl EmitState {
    fn new(options: EmitOptions) -> Self {
        Self {
            options,
            out: MarkupWriter::new(),
            title: None,
            headings: 0,
        }
    }

    fn blocks(&mut self, blocks: &[Block], tight: bool, top_level: bool) {
        for block in blocks {
            self.block(block, tight, top_level);
        }
    }

    fn block(&mut self, block: &Block, tight: bool, top_level: bool) {
        match block {
            Block::Paragraph { content } if tight => self.inlines(content),
            Block::Paragraph { content } => {
                self.out.markup("<p>");
                self.inlines(content);
                self.out.markup("</p>");
            }
            Block::Heading { level, content } => self.heading(*level, content, top_level),
            Block::CodeBlock { .. } => {
                if let Some(element) = macro_for(block) {
                    self.write_macro(&element);
                }
            }
            Block::List(list) => self.list(list),
            Block::Table(table) => self.table(table),
            Block::BlockQuote { blocks } => {
                self.out.markup("<blockquote>");
                self.blocks(blocks, false, false);
                self.out.markup("</blockquote>");
            }
            Block::ThematicBreak => self.out.markup("<hr />"),
            Block::RawBlock { text } => {
                self.out.markup("<p>");
                self.out.text(text);
                self.out.markup("</p>");
            }
        }
    }

    fn heading(&mut self, level: u8, content: &[Inline], top_level: bool) {
        if self.options.extract_title && top_level && level == 1 && self.title.is_none() {
            self.title = Some(plain_text(content).trim().to_owned());
            return;
        }
        let level = if self.title.is_some() && level > 1 {
            level - 1
        } else {
            level
        };
        let index = usize::from(level.clamp(1, 6) - 1);
        self.headings += 1;
        self.out.markup(HEADING_OPEN[index]);
        self.inlines(content);
        self.out.markup(HEADING_CLOSE[index]);
    }

    fn list(&mut self, list: &List) {
        match (list.ordered, list.start) {
            (false, _) => self.out.markup("<ul>"),
            (true, Some(start)) if start != 1 => {
                self.out.markup("<ol start=\"");
                self.out.number(start);
                self.out.markup("\">");
            }
            (true, _) => self.out.markup("<ol>"),
        }

        for item in &list.items {
            self.out.markup("<li>");
            match macro_for(item) {
                Some(element) => self.write_macro(&element),
                None => self.blocks(item.blocks(), list.tight, false),
            }
            self.out.markup("</li>");
        }

        self.out.markup(if list.ordered { "</ol>" } else { "</ul>" });
    }

    fn table(&mut self, table: &Table) {
        self.out.markup("<table><thead><tr>");
        for (cell, alignment) in table.header().iter().zip(table.alignments()) {
            self.out.markup(header_cell_open(*alignment));
            self.inlines(cell);
            self.out.markup("</th>");
        }
        self.out.markup("</tr></thead>");

        if !table.rows().is_empty() {
            self.out.markup("<tbody>");
            for row in table.rows() {
                self.out.markup("<tr>");
                for (cell, alignment) in row.iter().zip(table.alignments()) {
                    self.out.markup(data_cell_open(*alignment));
                    self.inlines(cell);
                    self.out.markup("</td>");
                }
                self.out.markup("</tr>");
            }
            self.out.markup("</tbody>");
        }

        self.out.markup("</table>");
    }

    fn inlines(&mut self, inlines: &[Inline]) {
        for inline in inlines {
            self.inline(inline);
        }
    }

    fn inline(&mut self, inline: &Inline) {
        match inline {
            Inline::Text(text) => self.out.text(text),
            Inline::Emphasis(children) => self.wrapped("<em>", children, "</em>"),
            Inline::Strong(children) => self.wrapped("<strong>", children, "</strong>"),
            Inline::Strikethrough(children) => self.wrapped("<del>", children, "</del>"),
            Inline::CodeSpan(code) => {
                self.out.markup("<code>");
                self.out.text(code);
                self.out.markup("</code>");
            }
            Inline::Link { label, url, title } => {
                if is_blocked(url) {
                    self.inlines(label);
                    return;
                }
                self.out.markup("<a");
                self.out.attribute("href", url);
                if let Some(title) = title {
                    self.out.attribute("title", title);
                }
                self.out.markup(">");
                self.inlines(label);
                self.out.markup("</a>");
            }
            Inline::Image { alt, url, title } => self.image(alt, url, title.as_deref()),
            Inline::LineBreak => self.out.markup("<br />"),
            Inline::SoftBreak => self.out.markup("\n"),
        }
    }

    fn wrapped(&mut self, open: &'static str, children: &[Inline], close: &'static str) {
        self.out.markup(open);
        self.inlines(children);
        self.out.markup(close);
    }

    fn image(&mut self, alt: &str, url: &str, title: Option<&str>) {
        if is_blocked(url) {
            self.out.text(alt);
            return;
        }
        self.out.markup("<ac:image");
        if !alt.is_empty() {
            self.out.attribute("ac:alt", alt);
        }
        if let Some(title) = title {
            self.out.attribute("ac:title", title);
        }
        self.out.markup(">");
        if is_remote(url) {
            self.out.markup("<ri:url");
            self.out.attribute("ri:value", url);
        } else {
            self.out.markup("<ri:attachment");
            self.out.attribute("ri:filename", attachment_name(url));
        }
        self.out.markup(" /></ac:image>");
    }

    /// Write one macro instance: name, parameters in order, then the body.
    fn write_macro(&mut self, element: &MacroElement) {
        self.out.markup("<ac:structured-macro");
        self.out.attribute("ac:name", element.kind.name());
        self.out.markup(" ac:schema-version=\"1\"");

        if element.parameters.is_empty() && element.body == MacroBody::None {
            self.out.markup(" />");
            return;
        }
        self.out.markup(">");

        for (name, value) in &element.parameters {
            self.out.markup("<ac:parameter");
            self.out.attribute("ac:name", name);
            self.out.markup(">");
            self.out.text(value);
            self.out.markup("</ac:parameter>");
        }

        match &element.body {
            MacroBody::None => {}
            MacroBody::PlainText(text) => {
                self.out.markup("<ac:plain-text-body>");
                self.out.cdata(text);
                self.out.markup("</ac:plain-text-body>");
            }
            MacroBody::RichBody(blocks) => {
                self.out.markup("<ac:rich-text-body>");
                self.blocks(blocks, false, false);
                self.out.markup("</ac:rich-text-body>");
            }
        }

        self.out.markup("</ac:structured-macro>");
    }
}

fn header_cell_open(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::None => "<th>",
        Alignment::Left => r#"<th style="text-align:left">"#,
        Alignment::Center => r#"<th style="text-align:center">"#,
        Alignment::Right => r#"<th style="text-align:right">"#,
    }
}

fn data_cell_open(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::None => "<td>",
        Alignment::Left => r#"<td style="text-align:left">"#,
        Alignment::Center => r#"<td style="text-align:center">"#,
        Alignment::Right => r#"<td style="text-align:right">"#,
    }
}

/// Whether the URL uses a scheme that must not become a link.
///
/// Browsers ignore whitespace and control characters inside a scheme, so
/// they are dropped before comparing.
fn is_blocked(url: &str) -> bool {
    let normalized: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();
    BLOCKED_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
}

fn is_remote(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Last path segment of a relative image URL.
fn attachment_name(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path.rsplit('/').next() {
        Some(name) if !name.is_empty() => name,
        _ => url,
    }
}
