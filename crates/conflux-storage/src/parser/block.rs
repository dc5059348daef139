//! Block phase: groups source lines into blocks.
//!
//! Containers (block quotes, list items) collect their lines with the
//! container markers stripped and parse them recursively one level deeper.
//! Leaf blocks hand their text to the inline phase.

use crate::model::{Block, Inline, List, ListItem, Table, TableCell};

use super::ParseOptions;
use super::inline::InlineParser;
use super::table::{separator, split_cells, starts_table};

const TAB_STOP: usize = 4;

pub(super) struct BlockParser<'a> {
    options: &'a ParseOptions,
    inline: InlineParser,
}

impl<'a> BlockParser<'a> {
    pub(super) fn new(options: &'a ParseOptions) -> Self {
        Self {
            options,
            inline: InlineParser::new(options.max_nesting_depth),
        }
    }

    pub(super) fn parse_document(&self, source: &str) -> Vec<Block> {
        let mut lines: Vec<String> = source
            .split('\n')
            .map(|line| expand_indent(line.strip_suffix('\r').unwrap_or(line)))
            .collect();
        if source.ends_with('\n') {
            lines.pop();
        }
        self.parse_blocks(&lines, 0)
    }

    fn parse_blocks(&self, lines: &[String], depth: usize) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            let line = lines[i].as_str();
            i = if is_blank(line) {
                i + 1
            } else if let Some(fence) = Fence::open(line) {
                fenced_code(lines, i, &fence, &mut blocks)
            } else if indent(line) >= 4 {
                indented_code(lines, i, &mut blocks)
            } else if let Some((level, text)) = atx_heading(line) {
                blocks.push(Block::Heading {
                    level,
                    content: self.inline(text),
                });
                i + 1
            } else if is_thematic_break(line) {
                blocks.push(Block::ThematicBreak);
                i + 1
            } else if quote_content(line).is_some() {
                self.block_quote(lines, i, depth, &mut blocks)
            } else if let Some(marker) = ListMarker::parse(line) {
                self.list(lines, i, marker, depth, &mut blocks)
            } else if starts_table(line, lines.get(i + 1).map(String::as_str)) {
                self.table(lines, i, &mut blocks)
            } else {
                self.paragraph(lines, i, &mut blocks)
            };
        }
        blocks
    }

    fn inline(&self, text: &str) -> Vec<Inline> {
        self.inline.parse(text)
    }

    fn paragraph(&self, lines: &[String], start: usize, blocks: &mut Vec<Block>) -> usize {
        let mut text = vec![lines[start].trim_start()];
        let mut i = start + 1;
        while i < lines.len() {
            let line = lines[i].as_str();
            if is_blank(line) {
                break;
            }
            if let Some(level) = setext_level(line) {
                blocks.push(Block::Heading {
                    level,
                    content: self.inline(text.join("\n").trim()),
                });
                return i + 1;
            }
            if interrupts_paragraph(lines, i) {
                break;
            }
            text.push(line.trim_start());
            i += 1;
        }
        blocks.push(Block::Paragraph {
            content: self.inline(text.join("\n").trim_end()),
        });
        i
    }

    fn block_quote(
        &self,
        lines: &[String],
        start: usize,
        depth: usize,
        blocks: &mut Vec<Block>,
    ) -> usize {
        let mut inner: Vec<String> = Vec::new();
        let mut i = start;
        while i < lines.len() {
            let line = lines[i].as_str();
            if let Some(content) = quote_content(line) {
                inner.push(content.to_owned());
            } else if !is_blank(line)
                && inner.last().is_some_and(|last| !is_blank(last))
                && !interrupts_paragraph(lines, i)
            {
                // Lazy paragraph continuation.
                inner.push(line.to_owned());
            } else {
                break;
            }
            i += 1;
        }

        if depth >= self.options.max_nesting_depth {
            blocks.push(degraded(&lines[start..i], depth));
        } else {
            blocks.push(Block::BlockQuote {
                blocks: self.parse_blocks(&inner, depth + 1),
            });
        }
        i
    }

    fn list(
        &self,
        lines: &[String],
        start: usize,
        first: ListMarker,
        depth: usize,
        blocks: &mut Vec<Block>,
    ) -> usize {
        let mut items = Vec::new();
        let mut tight = true;
        let mut i = start;

        while let Some(marker) = lines
            .get(i)
            .filter(|line| i == start || !is_thematic_break(line))
            .and_then(|line| ListMarker::parse(line))
            .filter(|marker| marker.same_family(&first))
        {
            let item = collect_item(lines, i, &marker);
            if item.inner_blank {
                tight = false;
            }
            i = item.next;
            items.push(item.lines);

            let continues = lines
                .get(i)
                .and_then(|line| ListMarker::parse(line))
                .is_some_and(|next| next.same_family(&first));
            if item.trailing_blank && continues {
                tight = false;
            }
        }

        if depth >= self.options.max_nesting_depth {
            blocks.push(degraded(&lines[start..i], depth));
            return i;
        }

        let items = items
            .into_iter()
            .map(|mut item_lines| {
                let task = item_lines.first().and_then(|line| task_marker(line));
                match task {
                    Some((checked, rest)) => {
                        item_lines[0] = rest;
                        ListItem::Task {
                            checked,
                            blocks: self.parse_blocks(&item_lines, depth + 1),
                        }
                    }
                    None => ListItem::Plain {
                        blocks: self.parse_blocks(&item_lines, depth + 1),
                    },
                }
            })
            .collect();

        blocks.push(Block::List(List {
            ordered: first.ordered,
            start: first.ordered.then_some(first.number),
            tight,
            items,
        }));
        i
    }

    fn table(&self, lines: &[String], start: usize, blocks: &mut Vec<Block>) -> usize {
        let header: Vec<TableCell> = split_cells(&lines[start])
            .iter()
            .map(|cell| self.inline(cell))
            .collect();
        let alignments = separator(&lines[start + 1]).unwrap_or_default();

        let mut rows: Vec<Vec<TableCell>> = Vec::new();
        let mut i = start + 2;
        while let Some(line) = lines.get(i) {
            if is_blank(line) || !line.contains('|') {
                break;
            }
            rows.push(
                split_cells(line)
                    .iter()
                    .map(|cell| self.inline(cell))
                    .collect(),
            );
            i += 1;
        }

        blocks.push(Block::Table(Table::new(header, alignments, rows)));
        i
    }
}

/// Raw source for a container that would nest too deeply.
fn degraded(lines: &[String], depth: usize) -> Block {
    tracing::debug!(depth, lines = lines.len(), "nesting limit reached, keeping source as raw text");
    Block::RawBlock {
        text: lines.join("\n"),
    }
}

fn fenced_code(lines: &[String], start: usize, fence: &Fence, blocks: &mut Vec<Block>) -> usize {
    let mut body = Vec::new();
    let mut i = start + 1;
    while i < lines.len() {
        let line = lines[i].as_str();
        i += 1;
        if fence.closes(line) {
            break;
        }
        body.push(strip_columns(line, fence.indent));
    }
    blocks.push(Block::CodeBlock {
        language: fence.language(),
        literal: body.join("\n"),
    });
    i
}

fn indented_code(lines: &[String], start: usize, blocks: &mut Vec<Block>) -> usize {
    let mut body = Vec::new();
    let mut i = start;
    while let Some(line) = lines.get(i) {
        if !is_blank(line) && indent(line) < 4 {
            break;
        }
        body.push(strip_columns(line, 4));
        i += 1;
    }
    while body.last().is_some_and(|line| is_blank(line)) {
        body.pop();
    }
    blocks.push(Block::CodeBlock {
        language: None,
        literal: body.join("\n"),
    });
    i
}

struct Item {
    lines: Vec<String>,
    next: usize,
    trailing_blank: bool,
    inner_blank: bool,
}

fn collect_item(lines: &[String], start: usize, marker: &ListMarker) -> Item {
    let offset = marker.content_offset;
    let first = lines[start].get(offset..).unwrap_or("");
    let mut item = vec![first.to_owned()];
    let mut i = start + 1;

    while let Some(line) = lines.get(i) {
        if is_blank(line) {
            item.push(String::new());
        } else if indent(line) >= offset {
            item.push(line[offset..].to_owned());
        } else if item.last().is_some_and(|last| !is_blank(last))
            && ListMarker::parse(line).is_none()
            && !interrupts_paragraph(lines, i)
        {
            // Lazy paragraph continuation.
            item.push(line.trim_start().to_owned());
        } else {
            break;
        }
        i += 1;
    }

    let mut trailing_blank = false;
    while item.len() > 1 && item.last().is_some_and(|line| is_blank(line)) {
        item.pop();
        trailing_blank = true;
    }
    let inner_blank = item.iter().skip(1).any(|line| is_blank(line));

    Item {
        lines: item,
        next: i,
        trailing_blank,
        inner_blank,
    }
}

/// `[ ]`, `[x]` or `[X]` at the start of an item.
fn task_marker(line: &str) -> Option<(bool, String)> {
    let checked = if line.starts_with("[ ]") {
        false
    } else if line.starts_with("[x]") || line.starts_with("[X]") {
        true
    } else {
        return None;
    };
    let rest = &line[3..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }
    Some((checked, rest.trim_start().to_owned()))
}

#[derive(Clone, Copy, Debug)]
struct ListMarker {
    ordered: bool,
    /// Bullet character or ordered delimiter (`.` / `)`).
    symbol: char,
    number: u64,
    /// Column where item content starts.
    content_offset: usize,
    /// Nothing follows the marker on its line.
    empty: bool,
}

impl ListMarker {
    fn parse(line: &str) -> Option<Self> {
        let ind = indent(line);
        if ind > 3 {
            return None;
        }
        let rest = &line[ind..];
        let (ordered, symbol, number, width) = match rest.chars().next()? {
            c @ ('-' | '*' | '+') => (false, c, 0, 1),
            c if c.is_ascii_digit() => {
                let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
                if digits > 9 {
                    return None;
                }
                let delimiter = rest[digits..].chars().next()?;
                if delimiter != '.' && delimiter != ')' {
                    return None;
                }
                (true, delimiter, rest[..digits].parse().ok()?, digits + 1)
            }
            _ => return None,
        };

        let after = &rest[width..];
        if is_blank(after) {
            return Some(Self {
                ordered,
                symbol,
                number,
                content_offset: ind + width + 1,
                empty: true,
            });
        }
        let spaces = after.len() - after.trim_start_matches([' ', '\t']).len();
        if spaces == 0 {
            return None;
        }
        let padding = if spaces > 4 { 1 } else { spaces };
        Some(Self {
            ordered,
            symbol,
            number,
            content_offset: ind + width + padding,
            empty: false,
        })
    }

    fn same_family(&self, other: &Self) -> bool {
        self.ordered == other.ordered && self.symbol == other.symbol
    }
}

struct Fence {
    ch: char,
    len: usize,
    indent: usize,
    info: String,
}

impl Fence {
    fn open(line: &str) -> Option<Self> {
        let ind = indent(line);
        if ind > 3 {
            return None;
        }
        let rest = &line[ind..];
        let ch = rest.chars().next().filter(|c| matches!(c, '`' | '~'))?;
        let len = rest.chars().take_while(|&c| c == ch).count();
        if len < 3 {
            return None;
        }
        let info = rest[len..].trim();
        if ch == '`' && info.contains('`') {
            return None;
        }
        Some(Self {
            ch,
            len,
            indent: ind,
            info: info.to_owned(),
        })
    }

    fn closes(&self, line: &str) -> bool {
        let ind = indent(line);
        if ind > 3 {
            return false;
        }
        let rest = &line[ind..];
        let len = rest.chars().take_while(|&c| c == self.ch).count();
        len >= self.len && is_blank(&rest[len..])
    }

    fn language(&self) -> Option<String> {
        self.info.split_whitespace().next().map(str::to_owned)
    }
}

/// Level and text of an ATX heading.
fn atx_heading(line: &str) -> Option<(u8, &str)> {
    let ind = indent(line);
    if ind > 3 {
        return None;
    }
    let rest = &line[ind..];
    let level = rest.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let after = &rest[level..];
    if !after.is_empty() && !after.starts_with([' ', '\t']) {
        return None;
    }

    let text = after.trim();
    let without_hashes = text.trim_end_matches('#');
    let text = if without_hashes.is_empty() {
        ""
    } else if without_hashes.ends_with([' ', '\t']) {
        without_hashes.trim_end()
    } else {
        text
    };
    // `level` is at most 6.
    Some((u8::try_from(level).unwrap_or(6), text))
}

fn setext_level(line: &str) -> Option<u8> {
    if indent(line) > 3 {
        return None;
    }
    let text = line.trim();
    if text.is_empty() {
        None
    } else if text.chars().all(|c| c == '=') {
        Some(1)
    } else if text.chars().all(|c| c == '-') {
        Some(2)
    } else {
        None
    }
}

fn is_thematic_break(line: &str) -> bool {
    if indent(line) > 3 {
        return false;
    }
    let mut marker = None;
    let mut count = 0;
    for c in line.chars() {
        match c {
            ' ' | '\t' => {}
            '-' | '*' | '_' => {
                if marker.is_some_and(|m| m != c) {
                    return false;
                }
                marker = Some(c);
                count += 1;
            }
            _ => return false,
        }
    }
    count >= 3
}

/// Content of a block quote line with the `>` marker removed.
fn quote_content(line: &str) -> Option<&str> {
    let ind = indent(line);
    if ind > 3 {
        return None;
    }
    let rest = line[ind..].strip_prefix('>')?;
    Some(
        rest.strip_prefix(' ')
            .or_else(|| rest.strip_prefix('\t'))
            .unwrap_or(rest),
    )
}

fn interrupts_paragraph(lines: &[String], i: usize) -> bool {
    let line = lines[i].as_str();
    Fence::open(line).is_some()
        || atx_heading(line).is_some()
        || is_thematic_break(line)
        || quote_content(line).is_some()
        || ListMarker::parse(line)
            .is_some_and(|marker| !marker.empty && (!marker.ordered || marker.number == 1))
        || starts_table(line, lines.get(i + 1).map(String::as_str))
}

fn indent(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn is_blank(line: &str) -> bool {
    line.chars().all(|c| c == ' ' || c == '\t')
}

fn strip_columns(line: &str, columns: usize) -> String {
    line[indent(line).min(columns)..].to_owned()
}

/// Expand tabs in leading whitespace to the next multiple of four columns.
fn expand_indent(line: &str) -> String {
    let leading = line.len() - line.trim_start_matches([' ', '\t']).len();
    if !line[..leading].contains('\t') {
        return line.to_owned();
    }
    let mut out = String::with_capacity(line.len() + TAB_STOP);
    let mut column = 0;
    for c in line[..leading].chars() {
        if c == '\t' {
            let width = TAB_STOP - column % TAB_STOP;
            out.extend(std::iter::repeat_n(' ', width));
            column += width;
        } else {
            out.push(' ');
            column += 1;
        }
    }
    out.push_str(&line[leading..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Alignment;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Vec<Block> {
        BlockParser::new(&ParseOptions::default()).parse_document(source)
    }

    fn parse_with_depth(source: &str, max_nesting_depth: usize) -> Vec<Block> {
        BlockParser::new(&ParseOptions { max_nesting_depth }).parse_document(source)
    }

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_owned())
    }

    fn code(language: Option<&str>, literal: &str) -> Block {
        Block::CodeBlock {
            language: language.map(str::to_owned),
            literal: literal.to_owned(),
        }
    }

    #[test]
    fn test_paragraphs() {
        assert_eq!(
            parse("one\ntwo\n\nthree\n"),
            vec![
                Block::paragraph(vec![text("one"), Inline::SoftBreak, text("two")]),
                Block::text("three"),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(""), vec![]);
        assert_eq!(parse("\n\n   \n"), vec![]);
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(
            parse("# Title\r\n\r\nbody\r\n"),
            vec![
                Block::Heading {
                    level: 1,
                    content: vec![text("Title")],
                },
                Block::text("body"),
            ]
        );
    }

    #[test]
    fn test_atx_headings() {
        assert_eq!(
            parse("## Section ##"),
            vec![Block::Heading {
                level: 2,
                content: vec![text("Section")],
            }]
        );
        assert_eq!(
            parse("#"),
            vec![Block::Heading {
                level: 1,
                content: vec![],
            }]
        );
        assert_eq!(parse("#hashtag"), vec![Block::text("#hashtag")]);
        assert_eq!(parse("####### seven"), vec![Block::text("####### seven")]);
    }

    #[test]
    fn test_atx_heading_keeps_hash_without_space() {
        assert_eq!(
            parse("# C#"),
            vec![Block::Heading {
                level: 1,
                content: vec![text("C#")],
            }]
        );
    }

    #[test]
    fn test_setext_headings() {
        assert_eq!(
            parse("Title\n=====\n\nSub\n---"),
            vec![
                Block::Heading {
                    level: 1,
                    content: vec![text("Title")],
                },
                Block::Heading {
                    level: 2,
                    content: vec![text("Sub")],
                },
            ]
        );
    }

    #[test]
    fn test_thematic_breaks() {
        assert_eq!(
            parse("---\n* * *\n___"),
            vec![Block::ThematicBreak, Block::ThematicBreak, Block::ThematicBreak]
        );
        assert_eq!(parse("-*-"), vec![Block::text("-*-")]);
    }

    #[test]
    fn test_fenced_code() {
        assert_eq!(
            parse("```python extra\nprint('hi')\n```"),
            vec![code(Some("python"), "print('hi')")]
        );
    }

    #[test]
    fn test_fenced_code_keeps_content_verbatim() {
        assert_eq!(
            parse("~~~\n# not a heading\n\n- not a list\n~~~"),
            vec![code(None, "# not a heading\n\n- not a list")]
        );
    }

    #[test]
    fn test_fence_closing_rules() {
        assert_eq!(
            parse("````\n```\n````"),
            vec![code(None, "```")]
        );
        assert_eq!(parse("```\n~~~\n```"), vec![code(None, "~~~")]);
    }

    #[test]
    fn test_unterminated_fence_runs_to_end() {
        assert_eq!(parse("```rust\nfn main() {}\n"), vec![code(Some("rust"), "fn main() {}")]);
    }

    #[test]
    fn test_indented_fence_strips_indent() {
        assert_eq!(
            parse("  ```\n    a\n  b\n  ```"),
            vec![code(None, "  a\nb")]
        );
    }

    #[test]
    fn test_backtick_fence_info_with_backtick() {
        assert_eq!(
            parse("``` a`b\n"),
            vec![Block::text("``` a`b")]
        );
    }

    #[test]
    fn test_indented_code() {
        assert_eq!(
            parse("    let x = 1;\n\n    let y = 2;\n\n\nafter"),
            vec![code(None, "let x = 1;\n\nlet y = 2;"), Block::text("after")]
        );
    }

    #[test]
    fn test_indented_line_continues_paragraph() {
        assert_eq!(
            parse("para\n    more"),
            vec![Block::paragraph(vec![text("para"), Inline::SoftBreak, text("more")])]
        );
    }

    #[test]
    fn test_tab_indentation_expands() {
        assert_eq!(parse("\tcode"), vec![code(None, "code")]);
    }

    #[test]
    fn test_block_quote() {
        assert_eq!(
            parse("> quoted\n> # heading"),
            vec![Block::BlockQuote {
                blocks: vec![
                    Block::text("quoted"),
                    Block::Heading {
                        level: 1,
                        content: vec![text("heading")],
                    },
                ],
            }]
        );
    }

    #[test]
    fn test_block_quote_lazy_continuation() {
        assert_eq!(
            parse("> first\nsecond\n\nafter"),
            vec![
                Block::BlockQuote {
                    blocks: vec![Block::paragraph(vec![
                        text("first"),
                        Inline::SoftBreak,
                        text("second"),
                    ])],
                },
                Block::text("after"),
            ]
        );
    }

    #[test]
    fn test_nested_block_quotes() {
        assert_eq!(
            parse(">> deep"),
            vec![Block::BlockQuote {
                blocks: vec![Block::BlockQuote {
                    blocks: vec![Block::text("deep")],
                }],
            }]
        );
    }

    #[test]
    fn test_tight_bullet_list() {
        assert_eq!(
            parse("- one\n- two"),
            vec![Block::List(List {
                ordered: false,
                start: None,
                tight: true,
                items: vec![
                    ListItem::Plain {
                        blocks: vec![Block::text("one")],
                    },
                    ListItem::Plain {
                        blocks: vec![Block::text("two")],
                    },
                ],
            })]
        );
    }

    #[test]
    fn test_loose_list() {
        let blocks = parse("- one\n\n- two");
        let Block::List(list) = &blocks[0] else {
            panic!("expected list, got {blocks:?}");
        };
        assert!(!list.tight);
        assert_eq!(list.items.len(), 2);
    }

    #[test]
    fn test_ordered_list_start() {
        let blocks = parse("3. three\n4. four");
        let Block::List(list) = &blocks[0] else {
            panic!("expected list, got {blocks:?}");
        };
        assert!(list.ordered);
        assert_eq!(list.start, Some(3));
        assert_eq!(list.items.len(), 2);
    }

    #[test]
    fn test_marker_change_starts_new_list() {
        let blocks = parse("- a\n* b");
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|block| matches!(block, Block::List(_))));
    }

    #[test]
    fn test_nested_list() {
        let blocks = parse("- a\n  - b\n- c");
        let Block::List(outer) = &blocks[0] else {
            panic!("expected list, got {blocks:?}");
        };
        assert_eq!(outer.items.len(), 2);
        let inner = outer.items[0].blocks();
        assert_eq!(inner[0], Block::text("a"));
        assert!(matches!(&inner[1], Block::List(list) if list.items.len() == 1));
    }

    #[test]
    fn test_list_item_continuation() {
        let blocks = parse("1. first\n   still first\nlazy\n\n   second para");
        let Block::List(list) = &blocks[0] else {
            panic!("expected list, got {blocks:?}");
        };
        assert_eq!(list.items.len(), 1);
        assert!(!list.tight);
        assert_eq!(
            list.items[0].blocks(),
            &[
                Block::paragraph(vec![
                    text("first"),
                    Inline::SoftBreak,
                    text("still first"),
                    Inline::SoftBreak,
                    text("lazy"),
                ]),
                Block::text("second para"),
            ]
        );
    }

    #[test]
    fn test_list_ends_at_unindented_paragraph() {
        let blocks = parse("- item\n\nparagraph");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1], Block::text("paragraph"));
        let Block::List(list) = &blocks[0] else {
            panic!("expected list, got {blocks:?}");
        };
        assert!(list.tight);
    }

    #[test]
    fn test_thematic_break_ends_list() {
        let blocks = parse("* a\n* * *");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1], Block::ThematicBreak);
    }

    #[test]
    fn test_task_items() {
        let blocks = parse("- [ ] todo\n- [x] done\n- [link](u)");
        let Block::List(list) = &blocks[0] else {
            panic!("expected list, got {blocks:?}");
        };
        assert_eq!(
            list.items[0],
            ListItem::Task {
                checked: false,
                blocks: vec![Block::text("todo")],
            }
        );
        assert_eq!(
            list.items[1],
            ListItem::Task {
                checked: true,
                blocks: vec![Block::text("done")],
            }
        );
        assert!(matches!(list.items[2], ListItem::Plain { .. }));
    }

    #[test]
    fn test_list_needs_space_after_marker() {
        assert_eq!(parse("-nope"), vec![Block::text("-nope")]);
        assert_eq!(parse("1.nope"), vec![Block::text("1.nope")]);
    }

    #[test]
    fn test_ordered_list_only_interrupts_at_one() {
        assert_eq!(
            parse("The year\n2024. was good"),
            vec![Block::paragraph(vec![
                text("The year"),
                Inline::SoftBreak,
                text("2024. was good"),
            ])]
        );
    }

    #[test]
    fn test_table() {
        let blocks = parse("| a | b |\n|:--|--:|\n| 1 | 2 |\n| 3 |\n\nafter");
        let Block::Table(table) = &blocks[0] else {
            panic!("expected table, got {blocks:?}");
        };
        assert_eq!(table.columns(), 2);
        assert_eq!(table.alignments(), &[Alignment::Left, Alignment::Right]);
        assert_eq!(table.header(), &[vec![text("a")], vec![text("b")]]);
        assert_eq!(
            table.rows(),
            &[
                vec![vec![text("1")], vec![text("2")]],
                vec![vec![text("3")], vec![]],
            ]
        );
        assert_eq!(blocks[1], Block::text("after"));
    }

    #[test]
    fn test_table_escaped_pipe() {
        let blocks = parse("| a |\n|---|\n| x \\| y |");
        let Block::Table(table) = &blocks[0] else {
            panic!("expected table, got {blocks:?}");
        };
        assert_eq!(table.rows(), &[vec![vec![text("x | y")]]]);
    }

    #[test]
    fn test_table_interrupts_paragraph() {
        let blocks = parse("intro\n| a |\n|---|");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], Block::text("intro"));
        assert!(matches!(blocks[1], Block::Table(_)));
    }

    #[test]
    fn test_pipe_without_separator_is_paragraph() {
        assert_eq!(parse("a | b"), vec![Block::text("a | b")]);
    }

    #[test]
    fn test_quote_beyond_depth_is_raw() {
        let blocks = parse_with_depth("> > > deep", 2);
        assert_eq!(
            blocks,
            vec![Block::BlockQuote {
                blocks: vec![Block::BlockQuote {
                    blocks: vec![Block::RawBlock {
                        text: "> deep".to_owned(),
                    }],
                }],
            }]
        );
    }

    #[test]
    fn test_list_beyond_depth_is_raw() {
        let blocks = parse_with_depth("- a\n  - b", 1);
        let Block::List(list) = &blocks[0] else {
            panic!("expected list, got {blocks:?}");
        };
        assert_eq!(
            list.items[0].blocks(),
            &[
                Block::text("a"),
                Block::RawBlock {
                    text: "- b".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn test_zero_depth_degrades_every_container() {
        assert_eq!(
            parse_with_depth("> quote", 0),
            vec![Block::RawBlock {
                text: "> quote".to_owned(),
            }]
        );
    }

    #[test]
    fn test_expand_indent() {
        assert_eq!(expand_indent("\tx"), "    x");
        assert_eq!(expand_indent("  \tx"), "    x");
        assert_eq!(expand_indent("x\ty"), "x\ty");
    }
}
