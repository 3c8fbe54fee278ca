//! Host tree interface and an in-memory implementation.
//!
//! Compiled predicates only need [`Node`], which is object safe. Traversal
//! additionally needs [`TreeNode`] to enumerate children.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::value::Value;

/// Read-only view of a tree node used while evaluating a filter.
pub trait Node {
    /// The node's own name, the last segment of its path.
    fn name(&self) -> &str;

    /// Absolute path of the node.
    fn path(&self) -> &str;

    /// Looks up a property by (possibly nested) path. `None` means absent.
    fn property(&self, path: &str) -> Option<Value>;

    /// Named child, if the host can hand one out as a node.
    fn child(&self, _name: &str) -> Option<Box<dyn Node + '_>> {
        None
    }
}

/// A node the traversal engine can descend through.
pub trait TreeNode: Node + Clone {
    /// Children in their natural order.
    fn children(&self) -> Vec<Self>;
}

#[derive(Debug)]
struct Inner {
    name: String,
    path: String,
    properties: BTreeMap<String, Value>,
    children: Vec<MemoryNode>,
}

/// In-memory tree node. Cloning is cheap; clones share the subtree.
///
/// Built with [`MemoryNode::builder`] or from JSON with
/// [`MemoryNode::from_json`], where nested objects are children and every
/// other member is a property:
///
/// ```
/// use arbor_query::tree::{MemoryNode, Node};
/// use serde_json::json;
///
/// let root = MemoryNode::from_json("content", &json!({
///     "title": "Home",
///     "jcr:content": { "created": "2013-08-07T14:32:59Z" }
/// }));
///
/// assert_eq!(root.path(), "/content");
/// assert!(root.property("jcr:content/created").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct MemoryNode {
    inner: Arc<Inner>,
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{}{}", parent, name)
    } else {
        format!("{}/{}", parent, name)
    }
}

impl MemoryNode {
    pub fn builder(name: impl Into<String>) -> MemoryNodeBuilder {
        MemoryNodeBuilder {
            name: name.into(),
            properties: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Builds a tree from a JSON object. A non-object yields a bare node.
    pub fn from_json(name: &str, json: &serde_json::Value) -> MemoryNode {
        Self::builder_from_json(name, json).build()
    }

    fn builder_from_json(name: &str, json: &serde_json::Value) -> MemoryNodeBuilder {
        let mut builder = MemoryNode::builder(name);
        if let serde_json::Value::Object(members) = json {
            for (key, member) in members {
                if member.is_object() {
                    builder = builder.child(Self::builder_from_json(key, member));
                } else {
                    builder = builder.property(key.as_str(), Value::from(member.clone()));
                }
            }
        }
        builder
    }

    pub fn get_child(&self, name: &str) -> Option<&MemoryNode> {
        self.inner.children.iter().find(|c| c.inner.name == name)
    }

    /// Resolves a path below this node.
    ///
    /// Absolute paths must start with this node's path; relative paths are
    /// read from this node. `""`, `"."` and `"/"` name the node itself.
    pub fn find(&self, path: &str) -> Option<MemoryNode> {
        let relative = if path.starts_with('/') {
            let own = self.inner.path.trim_end_matches('/');
            match path.strip_prefix(own) {
                Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
                _ if path == "/" => "",
                _ => return None,
            }
        } else {
            path
        };

        let mut node = self.clone();
        for segment in relative.split('/').filter(|s| !s.is_empty() && *s != ".") {
            node = node.get_child(segment)?.clone();
        }
        Some(node)
    }

    fn lookup(&self, segments: &[&str]) -> Option<Value> {
        match segments {
            [] => None,
            [last] => self.inner.properties.get(*last).cloned(),
            [first, rest @ ..] => self.get_child(first)?.lookup(rest),
        }
    }
}

impl Node for MemoryNode {
    fn name(&self) -> &str {
        &self.inner.name
    }

    fn path(&self) -> &str {
        &self.inner.path
    }

    /// Slash-separated paths descend through children; if that finds
    /// nothing, a dotted path is tried the same way.
    fn property(&self, path: &str) -> Option<Value> {
        if let Some(value) = self.inner.properties.get(path) {
            return Some(value.clone());
        }
        let slashed: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if slashed.len() > 1
            && let Some(value) = self.lookup(&slashed)
        {
            return Some(value);
        }
        if path.contains('.') {
            let dotted: Vec<&str> = path.split('.').collect();
            return self.lookup(&dotted);
        }
        None
    }

    fn child(&self, name: &str) -> Option<Box<dyn Node + '_>> {
        self.get_child(name)
            .map(|child| Box::new(child.clone()) as Box<dyn Node>)
    }
}

impl TreeNode for MemoryNode {
    fn children(&self) -> Vec<MemoryNode> {
        self.inner.children.clone()
    }
}

/// Builder for [`MemoryNode`]; paths are assigned on [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct MemoryNodeBuilder {
    name: String,
    properties: BTreeMap<String, Value>,
    children: Vec<MemoryNodeBuilder>,
}

impl MemoryNodeBuilder {
    pub fn property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn child(mut self, child: MemoryNodeBuilder) -> Self {
        self.children.push(child);
        self
    }

    /// Builds a root node. Its path is `/name`, or `/` for an empty name.
    pub fn build(self) -> MemoryNode {
        self.build_under("/")
    }

    fn build_under(self, parent_path: &str) -> MemoryNode {
        let path = if self.name.is_empty() {
            parent_path.to_string()
        } else {
            join_path(parent_path, &self.name)
        };
        let children = self
            .children
            .into_iter()
            .map(|child| child.build_under(&path))
            .collect();

        MemoryNode {
            inner: Arc::new(Inner {
                name: self.name,
                path,
                properties: self.properties,
                children,
            }),
        }
    }
}
