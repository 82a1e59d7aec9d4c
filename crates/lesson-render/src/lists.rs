//! Line-oriented list nesting.
//!
//! List lines arrive one at a time, possibly spread over several sibling
//! text items. [`ListStack`] keeps the open lists keyed by indentation
//! level and folds each new line into the right place:
//!
//! - deeper than the innermost open list: open one nested list inside that
//!   list's last item;
//! - shallower: close nested lists down to that level, then append;
//! - same level, different marker kind: start a new list at that level.
//!
//! Blank lines leave the stack alone. Anything else closes the whole stack
//! and the finished list is flushed to the output.

use std::sync::LazyLock;

use regex::Regex;

use crate::{Inline, List, ListItem, ListKind, Node};

static UNORDERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([ \t]*)[*-]\s+(.+)$").expect("unordered marker pattern"));

static ORDERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([ \t]*)\d+\.\s+(.+)$").expect("ordered marker pattern"));

/// Indentation step used when nothing else can be detected.
pub const DEFAULT_INDENT_UNIT: usize = 2;

/// Widest indentation step recognized.
pub const MAX_INDENT_UNIT: usize = 4;

/// A list line split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLine<'a> {
    pub kind: ListKind,
    pub indent: &'a str,
    pub content: &'a str,
}

/// Recognize a list marker line. Leading whitespace is kept for nesting.
pub fn parse_list_line(line: &str) -> Option<ListLine<'_>> {
    let line = line.trim_end();
    let (kind, captures) = if let Some(c) = UNORDERED.captures(line) {
        (ListKind::Unordered, c)
    } else {
        (ListKind::Ordered, ORDERED.captures(line)?)
    };

    let indent = captures.get(1).map_or("", |m| m.as_str());
    let content = captures.get(2).map_or("", |m| m.as_str());
    Some(ListLine {
        kind,
        indent,
        content,
    })
}

/// Pick the indentation step for a run of lines: the smallest space indent
/// seen on a list line, widened to [`MAX_INDENT_UNIT`] when every nested
/// line uses at least that much.
pub fn detect_indent_unit<'a>(lines: impl IntoIterator<Item = &'a str>) -> usize {
    let smallest = lines
        .into_iter()
        .filter_map(parse_list_line)
        .filter(|line| !line.indent.contains('\t'))
        .map(|line| line.indent.len())
        .filter(|&width| width > 0)
        .min();

    match smallest {
        Some(width) if width >= MAX_INDENT_UNIT => MAX_INDENT_UNIT,
        _ => DEFAULT_INDENT_UNIT,
    }
}

/// Indentation level of a marker's leading whitespace. A tab is one whole step.
pub fn indent_level(indent: &str, unit: usize) -> usize {
    let width: usize = indent
        .chars()
        .map(|ch| if ch == '\t' { unit } else { 1 })
        .sum();
    width / unit.max(1)
}

/// Open lists for the current run of list lines.
#[derive(Debug)]
pub struct ListStack {
    unit: usize,
    root: Option<List>,
    /// Indentation level of each open list, outermost first.
    levels: Vec<usize>,
}

impl ListStack {
    pub fn new(unit: usize) -> Self {
        Self {
            unit,
            root: None,
            levels: Vec::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.root.is_some()
    }

    /// Open depth, 0 when no list is open.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Add a list line, flushing a finished top-level list to `out` when the
    /// marker kind changes at the outermost level.
    pub fn push(&mut self, line: &ListLine<'_>, out: &mut Vec<Node>) {
        let level = indent_level(line.indent, self.unit);
        let item = ListItem {
            content: Inline::new(line.content),
            children: Vec::new(),
        };

        let Some(root) = self.root.as_mut() else {
            self.start(line.kind, level, item);
            return;
        };

        while self.levels.len() > 1 && self.levels.last().is_some_and(|&open| level < open) {
            self.levels.pop();
        }

        let depth = self.levels.len() - 1;
        let current = self.levels[depth];

        if level > current {
            log::trace!("opening nested {:?} list at level {level}", line.kind);
            let parent = list_at(root, depth);
            if let Some(last) = parent.items.last_mut() {
                last.children.push(new_list(line.kind, item));
                self.levels.push(level);
            }
            return;
        }

        let list = list_at(root, depth);
        if list.kind == line.kind {
            list.items.push(item);
        } else if depth == 0 {
            self.close(out);
            self.start(line.kind, level, item);
        } else {
            let parent = list_at(root, depth - 1);
            if let Some(last) = parent.items.last_mut() {
                last.children.push(new_list(line.kind, item));
            }
            self.levels[depth] = level;
        }
    }

    /// Close every open list and flush the outermost one to `out`.
    pub fn close(&mut self, out: &mut Vec<Node>) {
        if let Some(root) = self.root.take() {
            log::trace!("closing list stack at depth {}", self.levels.len());
            out.push(Node::List(root));
        }
        self.levels.clear();
    }

    fn start(&mut self, kind: ListKind, level: usize, item: ListItem) {
        self.root = Some(new_list(kind, item));
        self.levels = vec![level];
    }
}

fn new_list(kind: ListKind, item: ListItem) -> List {
    List {
        kind,
        items: vec![item],
    }
}

/// The open list `depth` levels below `root`; nested lists are always the
/// last child of the last item.
fn list_at(root: &mut List, depth: usize) -> &mut List {
    let mut list = root;
    for _ in 0..depth {
        let Some(item) = list.items.last() else {
            break;
        };
        if item.children.is_empty() {
            break;
        }
        let item_index = list.items.len() - 1;
        let child_index = list.items[item_index].children.len() - 1;
        list = &mut list.items[item_index].children[child_index];
    }
    list
}
