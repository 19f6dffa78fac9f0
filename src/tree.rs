//! Schema-less response tree and its flattener.
//!
//! Registry payloads arrive in whatever shape the provider felt like that day,
//! so the decoded JSON is converted once into a closed [`Node`] enum and every
//! later stage works on that instead of poking at `serde_json::Value` ad hoc.
//!
//! [`flatten`] walks the tree and yields one `(path, node)` pair per reachable
//! value. Map children extend the path with `.key`, sequence children with
//! `[i]`. A container's own entry comes after all of its descendants.

use serde_json::{Number, Value};
use std::slice;

/// Scalar leaf of a response tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(Number),
    Bool(bool),
}

/// One node of a decoded response.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// JSON object; children keep document order.
    Map(Vec<(String, Node)>),
    /// JSON array.
    Seq(Vec<Node>),
    Scalar(Scalar),
    /// JSON `null`.
    Absent,
}

impl Node {
    pub fn is_container(&self) -> bool {
        matches!(self, Node::Map(_) | Node::Seq(_))
    }
}

impl From<&Value> for Node {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Node::Absent,
            Value::Bool(b) => Node::Scalar(Scalar::Bool(*b)),
            Value::Number(n) => Node::Scalar(Scalar::Number(n.clone())),
            Value::String(s) => Node::Scalar(Scalar::String(s.clone())),
            Value::Array(items) => Node::Seq(items.iter().map(Node::from).collect()),
            Value::Object(map) => Node::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Node::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Node::from(&value)
    }
}

/// Lazily flattens `root` into `(path, node)` entries.
///
/// The root itself is not emitted. Each call walks the tree again.
pub fn flatten(root: &Node) -> Flatten<'_> {
    Flatten {
        stack: vec![Frame {
            children: Children::of(root, String::new()),
            pending: None,
        }],
    }
}

/// Iterator returned by [`flatten`].
pub struct Flatten<'a> {
    stack: Vec<Frame<'a>>,
}

struct Frame<'a> {
    children: Children<'a>,
    // Container entry held back until all of its descendants are out.
    pending: Option<(String, &'a Node)>,
}

enum Children<'a> {
    Map {
        prefix: String,
        iter: slice::Iter<'a, (String, Node)>,
    },
    Seq {
        prefix: String,
        iter: std::iter::Enumerate<slice::Iter<'a, Node>>,
    },
    Leaf,
}

impl<'a> Children<'a> {
    fn of(node: &'a Node, prefix: String) -> Self {
        match node {
            Node::Map(entries) => Children::Map {
                prefix,
                iter: entries.iter(),
            },
            Node::Seq(items) => Children::Seq {
                prefix,
                iter: items.iter().enumerate(),
            },
            Node::Scalar(_) | Node::Absent => Children::Leaf,
        }
    }
}

impl<'a> Iterator for Children<'a> {
    type Item = (String, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Children::Map { prefix, iter } => iter.next().map(|(key, child)| {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                (path, child)
            }),
            Children::Seq { prefix, iter } => iter
                .next()
                .map(|(i, child)| (format!("{}[{}]", prefix, i), child)),
            Children::Leaf => None,
        }
    }
}

impl<'a> Iterator for Flatten<'a> {
    type Item = (String, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            match frame.children.next() {
                Some((path, child)) if child.is_container() => {
                    self.stack.push(Frame {
                        children: Children::of(child, path.clone()),
                        pending: Some((path, child)),
                    });
                }
                Some(entry) => return Some(entry),
                None => {
                    let done = self.stack.pop()?;
                    if let Some(entry) = done.pending {
                        return Some(entry);
                    }
                }
            }
        }
    }
}
