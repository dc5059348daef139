//! Inline phase: turns the text of one block into inline nodes.
//!
//! A single left-to-right scan produces a linked list of items (text runs,
//! finished nodes, delimiter runs and bracket openers). Code spans are
//! resolved during the scan, links when their closing bracket is seen, and
//! emphasis last by matching delimiter runs against the nearest compatible
//! opener. Lower bounds per delimiter kind keep the matching from
//! rescanning openers that already failed.
//!
//! Nesting depth is tracked incrementally: every delimiter remembers the
//! deepest node between it and the next delimiter, and every open bracket
//! the deepest node in its label so far. Closing a link or an emphasis
//! never walks the nodes it encloses except to move them into the new node.

use std::collections::HashMap;

use crate::model::{Inline, plain_text};

/// Inline parser for one block's text.
pub(crate) struct InlineParser {
    max_depth: usize,
}

impl InlineParser {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Parse `text` into inline nodes. Never fails.
    pub(crate) fn parse(&self, text: &str) -> Vec<Inline> {
        let mut scan = Scan::new(text, self.max_depth);
        scan.run();
        scan.process_emphasis(None);
        scan.finish()
    }
}

#[derive(Debug)]
enum Item {
    Node(Inline),
    Delim(Delim),
    Bracket { image: bool },
    Removed,
}

#[derive(Debug, Clone, Copy)]
struct Delim {
    ch: char,
    count: usize,
    orig: usize,
    can_open: bool,
    can_close: bool,
    /// Deepest node between this run and the next delimiter on the stack.
    gap: usize,
}

#[derive(Debug)]
struct Slot {
    item: Item,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
struct BracketRef {
    slot: usize,
    image: bool,
    /// Links formed before this bracket was opened.
    links_at_open: usize,
    /// Deepest node in the label so far.
    inner: usize,
}

struct Scan {
    chars: Vec<char>,
    pos: usize,
    max_depth: usize,
    buf: String,
    slots: Vec<Slot>,
    head: Option<usize>,
    tail: Option<usize>,
    /// Delimiter slots in document order.
    delims: Vec<usize>,
    brackets: Vec<BracketRef>,
    /// Links formed so far; a `[` opened before the latest link is inactive.
    links: usize,
    /// Start positions of backtick runs, by run length.
    backtick_runs: HashMap<usize, Vec<usize>>,
    titles: TitleScans,
}

impl Scan {
    fn new(text: &str, max_depth: usize) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut backtick_runs: HashMap<usize, Vec<usize>> = HashMap::new();
        let mut i = 0;
        while i < chars.len() {
            if chars[i] == '`' {
                let len = run_length(&chars, i, '`');
                backtick_runs.entry(len).or_default().push(i);
                i += len;
            } else {
                i += 1;
            }
        }
        Self {
            chars,
            pos: 0,
            max_depth,
            buf: String::new(),
            slots: Vec::new(),
            head: None,
            tail: None,
            delims: Vec::new(),
            brackets: Vec::new(),
            links: 0,
            backtick_runs,
            titles: TitleScans::default(),
        }
    }

    fn run(&mut self) {
        while self.pos < self.chars.len() {
            let c = self.chars[self.pos];
            match c {
                '\\' => self.backslash(),
                '`' => self.code_span(),
                '!' if self.peek(1) == Some('[') => {
                    self.open_bracket(true);
                    self.pos += 2;
                }
                '[' => {
                    self.open_bracket(false);
                    self.pos += 1;
                }
                ']' => self.close_bracket(),
                '*' | '_' | '~' => self.delimiter_run(c),
                '<' => self.autolink(),
                '\n' => self.line_ending(),
                _ => {
                    self.buf.push(c);
                    self.pos += 1;
                }
            }
        }
        self.flush_text();
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    // ---- linked list ----------------------------------------------------

    fn push_item(&mut self, item: Item) -> usize {
        let index = self.slots.len();
        self.slots.push(Slot {
            item,
            prev: self.tail,
            next: None,
        });
        match self.tail {
            Some(tail) => self.slots[tail].next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        index
    }

    fn push_node(&mut self, inline: Inline, nest: usize) {
        self.flush_text();
        self.push_item(Item::Node(inline));
        self.record_nest(nest);
    }

    /// Account for a node of depth `nest` added after the last delimiter
    /// and inside the innermost open bracket.
    fn record_nest(&mut self, nest: usize) {
        if nest == 0 {
            return;
        }
        if let Some(&last) = self.delims.last() {
            self.raise_gap(last, nest);
        }
        if let Some(top) = self.brackets.last_mut() {
            top.inner = top.inner.max(nest);
        }
    }

    fn raise_gap(&mut self, slot: usize, nest: usize) {
        if let Item::Delim(delim) = &mut self.slots[slot].item {
            delim.gap = delim.gap.max(nest);
        }
    }

    fn flush_text(&mut self) {
        if !self.buf.is_empty() {
            let text = std::mem::take(&mut self.buf);
            self.push_item(Item::Node(Inline::Text(text)));
        }
    }

    fn unlink(&mut self, index: usize) {
        let (prev, next) = (self.slots[index].prev, self.slots[index].next);
        match prev {
            Some(prev) => self.slots[prev].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.slots[next].prev = prev,
            None => self.tail = prev,
        }
        self.slots[index].item = Item::Removed;
    }

    /// Insert a new slot between two adjacent slots.
    fn link_between(&mut self, before: usize, after: Option<usize>, item: Item) -> usize {
        let index = self.slots.len();
        self.slots.push(Slot {
            item,
            prev: Some(before),
            next: after,
        });
        self.slots[before].next = Some(index);
        match after {
            Some(after) => self.slots[after].prev = Some(index),
            None => self.tail = Some(index),
        }
        index
    }

    /// Detach every slot strictly between `from` and `to` (or to the end).
    fn take_between(&mut self, from: usize, to: Option<usize>) -> Vec<Inline> {
        let mut children = Vec::new();
        let mut cursor = self.slots[from].next;
        while let Some(index) = cursor {
            if Some(index) == to {
                break;
            }
            cursor = self.slots[index].next;
            let item = std::mem::replace(&mut self.slots[index].item, Item::Removed);
            if let Some(inline) = materialize(item) {
                push_merged(&mut children, inline);
            }
        }
        self.slots[from].next = to;
        match to {
            Some(to) => self.slots[to].prev = Some(from),
            None => self.tail = Some(from),
        }
        children
    }

    // ---- recognizers ----------------------------------------------------

    fn backslash(&mut self) {
        match self.peek(1) {
            Some(next) if next.is_ascii_punctuation() => {
                self.buf.push(next);
                self.pos += 2;
            }
            Some('\n') => {
                self.push_node(Inline::LineBreak, 0);
                self.pos += 2;
                self.skip_line_indent();
            }
            _ => {
                self.buf.push('\\');
                self.pos += 1;
            }
        }
    }

    fn code_span(&mut self) {
        let start = self.pos;
        let len = run_length(&self.chars, start, '`');
        let closer = self.backtick_runs.get(&len).and_then(|starts| {
            let next = starts.partition_point(|&s| s <= start);
            starts.get(next).copied()
        });

        let Some(end) = closer else {
            self.buf.extend(std::iter::repeat_n('`', len));
            self.pos += len;
            return;
        };

        let mut content: String = self.chars[start + len..end]
            .iter()
            .map(|&c| if c == '\n' { ' ' } else { c })
            .collect();
        if content.len() >= 2
            && content.starts_with(' ')
            && content.ends_with(' ')
            && !content.chars().all(|c| c == ' ')
        {
            content = content[1..content.len() - 1].to_owned();
        }
        self.push_node(Inline::CodeSpan(content), 0);
        self.pos = end + len;
    }

    fn open_bracket(&mut self, image: bool) {
        self.flush_text();
        let slot = self.push_item(Item::Bracket { image });
        self.brackets.push(BracketRef {
            slot,
            image,
            links_at_open: self.links,
            inner: 0,
        });
    }

    fn close_bracket(&mut self) {
        self.pos += 1;
        let Some(opener) = self.brackets.pop() else {
            self.buf.push(']');
            return;
        };
        self.flush_text();

        // Links may not contain other links.
        let active = opener.image || opener.links_at_open == self.links;
        let tail = if active {
            parse_link_tail(&self.chars, self.pos, &mut self.titles)
        } else {
            None
        };
        let Some((url, title, next)) = tail else {
            self.bracket_to_text(opener, opener.inner);
            self.buf.push(']');
            return;
        };

        let label_nest = opener.inner.max(self.process_emphasis(Some(opener.slot)));
        let nest = label_nest + 1;
        if nest > self.max_depth {
            tracing::debug!(nest, "link nesting too deep, keeping brackets as text");
            self.bracket_to_text(opener, label_nest);
            self.buf.push(']');
            return;
        }

        let label = self.take_between(opener.slot, None);
        let inline = if opener.image {
            Inline::Image {
                alt: plain_text(&label),
                url,
                title,
            }
        } else {
            self.links += 1;
            Inline::Link { label, url, title }
        };
        self.slots[opener.slot].item = Item::Node(inline);
        self.record_nest(nest);
        self.pos = next;
    }

    /// Turn an unused opener into literal text; its label now belongs to the
    /// enclosing bracket.
    fn bracket_to_text(&mut self, bracket: BracketRef, label_nest: usize) {
        let text = if bracket.image { "![" } else { "[" };
        self.slots[bracket.slot].item = Item::Node(Inline::Text(text.to_owned()));
        if let Some(top) = self.brackets.last_mut() {
            top.inner = top.inner.max(label_nest);
        }
    }

    fn delimiter_run(&mut self, ch: char) {
        let start = self.pos;
        let count = run_length(&self.chars, start, ch);
        self.pos += count;

        if ch == '~' && count != 2 {
            self.buf.extend(std::iter::repeat_n('~', count));
            return;
        }

        let before = if start == 0 {
            ' '
        } else {
            self.chars[start - 1]
        };
        let after = self.chars.get(start + count).copied().unwrap_or(' ');
        let left = !after.is_whitespace()
            && (!is_punctuation(after) || before.is_whitespace() || is_punctuation(before));
        let right = !before.is_whitespace()
            && (!is_punctuation(before) || after.is_whitespace() || is_punctuation(after));
        let (can_open, can_close) = if ch == '_' {
            (
                left && (!right || is_punctuation(before)),
                right && (!left || is_punctuation(after)),
            )
        } else {
            (left, right)
        };

        self.flush_text();
        let slot = self.push_item(Item::Delim(Delim {
            ch,
            count,
            orig: count,
            can_open,
            can_close,
            gap: 0,
        }));
        self.delims.push(slot);
    }

    fn autolink(&mut self) {
        let start = self.pos + 1;
        let mut end = start;
        while let Some(&c) = self.chars.get(end) {
            if c == '>' || c == '<' || c.is_whitespace() || c.is_control() {
                break;
            }
            end += 1;
        }
        if self.chars.get(end) == Some(&'>') {
            let url: String = self.chars[start..end].iter().collect();
            if is_absolute_uri(&url) {
                let label = vec![Inline::Text(url.clone())];
                self.push_node(
                    Inline::Link {
                        label,
                        url,
                        title: None,
                    },
                    1,
                );
                self.pos = end + 1;
                return;
            }
        }
        self.buf.push('<');
        self.pos += 1;
    }

    fn line_ending(&mut self) {
        let trimmed = self.buf.trim_end_matches(' ');
        let hard = self.buf.len() - trimmed.len() >= 2;
        let keep = trimmed.len();
        self.buf.truncate(keep);
        self.push_node(if hard { Inline::LineBreak } else { Inline::SoftBreak }, 0);
        self.pos += 1;
        self.skip_line_indent();
    }

    fn skip_line_indent(&mut self) {
        while matches!(self.peek(0), Some(' ' | '\t')) {
            self.pos += 1;
        }
    }

    // ---- emphasis -------------------------------------------------------

    /// Match delimiter runs after `bottom` (exclusive) into emphasis nodes.
    ///
    /// Every delimiter after `bottom` is gone from the stack afterwards;
    /// unmatched ones stay in the list as literal text. Returns the depth of
    /// the deepest node created.
    fn process_emphasis(&mut self, bottom: Option<usize>) -> usize {
        let start = match bottom {
            Some(bottom) => self.delims.partition_point(|&slot| slot <= bottom),
            None => 0,
        };
        // `self.delims[start..]` becomes the stack of potential openers.
        let pending = self.delims.split_off(start);
        let mut openers_bottom: HashMap<(char, bool, usize), usize> = HashMap::new();
        // Openers below this index enclose content too deep to wrap again.
        let mut floor = start;
        let mut created = 0;

        for closer_slot in pending {
            loop {
                let Item::Delim(closer) = self.slots[closer_slot].item else {
                    break;
                };
                if !closer.can_close {
                    self.retire(closer_slot, closer);
                    break;
                }

                let key = (closer.ch, closer.can_open, closer.orig % 3);
                let lower = match (bottom, openers_bottom.get(&key)) {
                    (Some(b), Some(&o)) => Some(b.max(o)),
                    (b, o) => b.or(o.copied()),
                };

                let mut found = None;
                let mut inner = 0;
                let mut m = self.delims.len();
                while m > floor {
                    m -= 1;
                    let slot = self.delims[m];
                    if lower.is_some_and(|lower| slot <= lower) {
                        break;
                    }
                    let Item::Delim(opener) = self.slots[slot].item else {
                        continue;
                    };
                    inner = inner.max(opener.gap);
                    if opener.ch == closer.ch && opener.can_open && compatible(&opener, &closer) {
                        found = Some((m, opener));
                        break;
                    }
                }

                let Some((m, opener)) = found else {
                    let bound = if self.delims.len() > start {
                        self.delims.last().copied()
                    } else {
                        bottom
                    };
                    if let Some(bound) = bound {
                        openers_bottom.insert(key, bound);
                    }
                    self.retire(closer_slot, closer);
                    break;
                };

                let nest = inner + 1;
                if nest > self.max_depth {
                    // Any later pair using this opener or one before it
                    // would enclose the same content.
                    floor = m + 1;
                    self.retire(closer_slot, closer);
                    break;
                }

                let opener_slot = self.delims[m];
                let used = if closer.ch == '~' || (opener.count >= 2 && closer.count >= 2) {
                    2
                } else {
                    1
                };
                let children = self.take_between(opener_slot, Some(closer_slot));
                let inline = match (closer.ch, used) {
                    ('~', _) => Inline::Strikethrough(children),
                    (_, 2) => Inline::Strong(children),
                    _ => Inline::Emphasis(children),
                };
                self.link_between(opener_slot, Some(closer_slot), Item::Node(inline));
                created = created.max(nest);

                // Delimiters between opener and closer were consumed as text.
                self.delims.truncate(m + 1);

                if opener.count == used {
                    self.unlink(opener_slot);
                    self.delims.pop();
                    if let Some(&top) = self.delims.last() {
                        self.raise_gap(top, nest);
                    }
                } else if let Item::Delim(d) = &mut self.slots[opener_slot].item {
                    d.count -= used;
                    d.gap = nest;
                }

                if closer.count == used {
                    self.unlink(closer_slot);
                    if let Some(&top) = self.delims.last() {
                        self.raise_gap(top, closer.gap);
                    }
                    break;
                }
                if let Item::Delim(d) = &mut self.slots[closer_slot].item {
                    d.count -= used;
                }
            }
        }

        let folded = self.delims[start..]
            .iter()
            .filter_map(|&slot| match self.slots[slot].item {
                Item::Delim(delim) => Some(delim.gap),
                _ => None,
            })
            .max()
            .unwrap_or(0);
        self.delims.truncate(start);
        if let Some(&top) = self.delims.last() {
            self.raise_gap(top, folded);
        }
        created
    }

    /// Done with `slot` as a closer: keep it as a potential opener, or fold
    /// its gap into the previous delimiter.
    fn retire(&mut self, slot: usize, delim: Delim) {
        if delim.can_open {
            self.delims.push(slot);
        } else if let Some(&top) = self.delims.last() {
            self.raise_gap(top, delim.gap);
        }
    }

    fn finish(mut self) -> Vec<Inline> {
        let mut out = Vec::new();
        let mut cursor = self.head;
        while let Some(index) = cursor {
            cursor = self.slots[index].next;
            let item = std::mem::replace(&mut self.slots[index].item, Item::Removed);
            if let Some(inline) = materialize(item) {
                push_merged(&mut out, inline);
            }
        }
        out
    }
}

/// Whether a closer may pair with an opener (the "multiple of 3" rule).
fn compatible(opener: &Delim, closer: &Delim) -> bool {
    if closer.ch == '~' {
        return opener.count == 2 && closer.count == 2;
    }
    if (opener.can_close || closer.can_open)
        && (opener.orig + closer.orig) % 3 == 0
        && !(opener.orig % 3 == 0 && closer.orig % 3 == 0)
    {
        return false;
    }
    true
}

fn materialize(item: Item) -> Option<Inline> {
    match item {
        Item::Node(inline) => Some(inline),
        Item::Delim(delim) => Some(Inline::Text(
            std::iter::repeat_n(delim.ch, delim.count).collect(),
        )),
        Item::Bracket { image } => {
            let text = if image { "![" } else { "[" };
            Some(Inline::Text(text.to_owned()))
        }
        Item::Removed => None,
    }
}

/// Append, merging adjacent text runs.
fn push_merged(out: &mut Vec<Inline>, inline: Inline) {
    if let Inline::Text(text) = &inline {
        if text.is_empty() {
            return;
        }
        if let Some(Inline::Text(last)) = out.last_mut() {
            last.push_str(text);
            return;
        }
    }
    out.push(inline);
}

fn run_length(chars: &[char], start: usize, ch: char) -> usize {
    chars[start..].iter().take_while(|&&c| c == ch).count()
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || (!c.is_alphanumeric() && !c.is_whitespace() && !c.is_control())
}

/// `scheme:rest` with a 2-32 character scheme.
fn is_absolute_uri(s: &str) -> bool {
    let Some((scheme, _)) = s.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    (2..=32).contains(&scheme.len())
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}

/// Deepest unescaped parenthesis nesting allowed in a bare link destination.
const MAX_DESTINATION_PARENS: usize = 32;

/// Where the last scan for each title closer started and where it stopped.
///
/// Later scans start further right; one that starts inside an earlier scan
/// stops at the same place, so no stretch of text is scanned twice.
#[derive(Debug, Default)]
struct TitleScans {
    last: HashMap<char, (usize, Option<usize>)>,
}

impl TitleScans {
    /// Position of the first unescaped `close` at or after `start`.
    fn find_close(&mut self, chars: &[char], start: usize, close: char) -> Option<usize> {
        if let Some(&(from, end)) = self.last.get(&close)
            && start >= from
            && end.is_none_or(|end| start <= end)
        {
            return end;
        }
        let mut i = start;
        let end = loop {
            match chars.get(i) {
                None => break None,
                Some(&c) if c == close => break Some(i),
                Some('\\') if chars.get(i + 1).is_some_and(char::is_ascii_punctuation) => i += 2,
                Some(_) => i += 1,
            }
        };
        self.last.insert(close, (start, end));
        end
    }
}

/// Parse `(destination "title")` starting at `pos`.
///
/// Returns the destination, the optional title and the position after `)`.
fn parse_link_tail(
    chars: &[char],
    pos: usize,
    titles: &mut TitleScans,
) -> Option<(String, Option<String>, usize)> {
    if chars.get(pos) != Some(&'(') {
        return None;
    }
    let mut i = skip_whitespace(chars, pos + 1);

    let mut url = String::new();
    if chars.get(i) == Some(&'<') {
        i += 1;
        loop {
            match chars.get(i)? {
                '>' => {
                    i += 1;
                    break;
                }
                '\n' | '<' => return None,
                '\\' if chars.get(i + 1).is_some_and(char::is_ascii_punctuation) => {
                    url.push(chars[i + 1]);
                    i += 2;
                }
                &c => {
                    url.push(c);
                    i += 1;
                }
            }
        }
    } else {
        let mut depth = 0usize;
        while let Some(&c) = chars.get(i) {
            match c {
                '\\' if chars.get(i + 1).is_some_and(char::is_ascii_punctuation) => {
                    url.push(chars[i + 1]);
                    i += 2;
                    continue;
                }
                '(' if depth == MAX_DESTINATION_PARENS => return None,
                '(' => depth += 1,
                ')' if depth == 0 => break,
                ')' => depth -= 1,
                c if c.is_whitespace() || c.is_control() => break,
                _ => {}
            }
            url.push(c);
            i += 1;
        }
        if depth != 0 {
            return None;
        }
    }

    let after_url = i;
    i = skip_whitespace(chars, i);
    let mut title = None;
    if i > after_url
        && let Some(&open) = chars.get(i)
        && matches!(open, '"' | '\'' | '(')
    {
        let close = if open == '(' { ')' } else { open };
        let end = titles.find_close(chars, i + 1, close)?;
        let after_title = skip_whitespace(chars, end + 1);
        if chars.get(after_title) != Some(&')') {
            return None;
        }
        title = Some(unescape(&chars[i + 1..end]));
        i = after_title;
    }

    if chars.get(i) != Some(&')') {
        return None;
    }
    Some((url, title, i + 1))
}

/// Drop backslashes before ASCII punctuation.
fn unescape(chars: &[char]) -> String {
    let mut text = String::with_capacity(chars.len());
    let mut i = 0;
    while let Some(&c) = chars.get(i) {
        if c == '\\' && chars.get(i + 1).is_some_and(char::is_ascii_punctuation) {
            text.push(chars[i + 1]);
            i += 2;
        } else {
            text.push(c);
            i += 1;
        }
    }
    text
}

/// Skip spaces and tabs with at most one line ending.
fn skip_whitespace(chars: &[char], mut i: usize) -> usize {
    let mut newline = false;
    while let Some(&c) = chars.get(i) {
        match c {
            ' ' | '\t' => {}
            '\n' if !newline => newline = true,
            _ => break,
        }
        i += 1;
    }
    i
}
