//! Virtual path grammar.
//!
//! A virtual path addresses the domain tree by depth:
//! `/<project>/<tab>/<name>/<tail...>`. Parsing is total — empty or
//! unparseable segments degrade to empty strings — and the depth, not the
//! content, selects which creation rule applies. Classification returns a
//! closed enum with one variant per depth, so every dispatch site handles
//! every shape or does not compile.

use galley_core::enums::Tab;

/// Raw path segments. All fields may be empty; `tail` re-joins everything
/// past the third segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments {
    pub root: String,
    pub tab: String,
    pub name: String,
    pub tail: String,
}

/// Which level of the tree a path addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target<'a> {
    /// The tree root itself.
    Root,
    /// `/<project>` — a candidate or existing project.
    Project { root: &'a str },
    /// `/<project>/<tab>` — one of a project's sub-collections. `tab` is
    /// `None` when the label is not a known collection; the raw label stays
    /// available on [`Segments::tab`].
    Collection { root: &'a str, tab: Option<Tab> },
    /// `/<project>/<tab>/<name>` — a named entity inside a collection.
    Entry {
        root: &'a str,
        tab: Option<Tab>,
        name: &'a str,
    },
    /// `/<project>/<tab>/<name>/<tail>` — a nested file location under a
    /// named entity.
    Nested {
        root: &'a str,
        tab: Option<Tab>,
        name: &'a str,
        tail: &'a str,
    },
}

impl Segments {
    /// Parse a slash-delimited virtual path. Never fails: separators are
    /// collapsed, `.` segments are dropped, and missing segments come back
    /// empty.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let mut parts = path.split('/').filter(|s| !s.is_empty() && *s != ".");
        let root = parts.next().unwrap_or_default().to_string();
        let tab = parts.next().unwrap_or_default().to_string();
        let name = parts.next().unwrap_or_default().to_string();
        let tail = parts.collect::<Vec<_>>().join("/");
        Self {
            root,
            tab,
            name,
            tail,
        }
    }

    /// Classify by depth.
    #[must_use]
    pub fn target(&self) -> Target<'_> {
        if self.root.is_empty() {
            Target::Root
        } else if self.tab.is_empty() {
            Target::Project { root: &self.root }
        } else if self.name.is_empty() {
            Target::Collection {
                root: &self.root,
                tab: Tab::from_segment(&self.tab),
            }
        } else if self.tail.is_empty() {
            Target::Entry {
                root: &self.root,
                tab: Tab::from_segment(&self.tab),
                name: &self.name,
            }
        } else {
            Target::Nested {
                root: &self.root,
                tab: Tab::from_segment(&self.tab),
                name: &self.name,
                tail: &self.tail,
            }
        }
    }

    /// Canonical `/a/b/c` rendering of the parsed segments.
    #[must_use]
    pub fn canonical(&self) -> String {
        let mut out = String::from("/");
        for segment in [&self.root, &self.tab, &self.name, &self.tail] {
            if segment.is_empty() {
                break;
            }
            if out.len() > 1 {
                out.push('/');
            }
            out.push_str(segment);
        }
        out
    }
}
