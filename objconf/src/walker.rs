//! Tree building over arbitrary settings graphs.
//!
//! The walker needs no per-type traversal code. A value becomes a node when
//! its type declares the label property; ordered containers contribute their
//! elements as children, and properties annotated
//! [`Expandable`](crate::Annotation::Expandable) contribute their values.
//! Both rules apply to the same node independently, so a labelled container
//! of records with expandable properties yields a three-level tree.
//!
//! Values that cannot become nodes are left out of the tree. [`walk`] also
//! reports where that happened so a schema mistake is visible.

use crate::introspect::Introspect;

/// One node of a built tree, borrowing the value it describes.
pub struct TreeNode<'a> {
    label: String,
    path: String,
    value: &'a dyn Introspect,
    children: Vec<TreeNode<'a>>,
}

impl<'a> TreeNode<'a> {
    /// Rendered value of the label property.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Property path from the root to this node's value.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The described value.
    pub fn value(&self) -> &'a dyn Introspect {
        self.value
    }

    /// Child nodes in visiting order.
    pub fn children(&self) -> &[TreeNode<'a>] {
        &self.children
    }

    /// Depth-first search for the node describing `path`.
    pub fn find(&self, path: &str) -> Option<&TreeNode<'a>> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(path))
    }

    /// Total number of nodes in this subtree.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(TreeNode::len).sum::<usize>()
    }

    /// Always false; a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Detached copy holding labels and paths only.
    pub fn outline(&self) -> TreeOutline {
        TreeOutline {
            label: self.label.clone(),
            path: self.path.clone(),
            children: self.children.iter().map(TreeNode::outline).collect(),
        }
    }

    /// Render the subtree with box-drawing branches.
    ///
    /// ```text
    /// Settings
    /// └── Tests
    ///     ├── Diode Test
    ///     └── Flow Rate Test
    /// ```
    pub fn render(&self) -> String {
        self.outline().render()
    }
}

impl std::fmt::Debug for TreeNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeNode")
            .field("label", &self.label)
            .field("path", &self.path)
            .field("children", &self.children)
            .finish()
    }
}

/// Owned snapshot of a tree: labels and paths, no borrowed values.
///
/// Handed to property inspectors, which need the tree and mutable access to
/// the root at the same time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeOutline {
    /// Rendered label.
    pub label: String,
    /// Property path of the node's value.
    pub path: String,
    /// Children in visiting order.
    pub children: Vec<TreeOutline>,
}

impl TreeOutline {
    /// Labels of the direct children.
    pub fn child_labels(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.label.as_str()).collect()
    }

    /// Depth-first search for the node describing `path`.
    pub fn find(&self, path: &str) -> Option<&TreeOutline> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(path))
    }

    /// Render with box-drawing branches, see [`TreeNode::render`].
    pub fn render(&self) -> String {
        let mut out = String::new();
        render_node(&mut out, &self.label, &self.children, "", None);
        out
    }
}

fn render_node(
    out: &mut String,
    label: &str,
    children: &[TreeOutline],
    prefix: &str,
    last: Option<bool>,
) {
    let child_prefix = match last {
        None => {
            out.push_str(label);
            out.push('\n');
            String::new()
        }
        Some(is_last) => {
            out.push_str(prefix);
            out.push_str(if is_last { "└── " } else { "├── " });
            out.push_str(label);
            out.push('\n');
            format!("{prefix}{}", if is_last { "    " } else { "│   " })
        }
    };
    for (i, child) in children.iter().enumerate() {
        let is_last = i + 1 == children.len();
        render_node(out, &child.label, &child.children, &child_prefix, Some(is_last));
    }
}

/// Result of a full walk: the tree plus every pruned value.
#[derive(Debug)]
pub struct Walk<'a> {
    /// Root node, `None` when the root itself is not visitable.
    pub root: Option<TreeNode<'a>>,
    /// Paths of present values that were left out because their type does
    /// not declare the label property. The root's path is empty.
    pub skipped: Vec<String>,
}

/// Build the tree for `root`, labelling nodes with `label_property`.
pub fn build_tree<'a>(root: &'a dyn Introspect, label_property: &str) -> Option<TreeNode<'a>> {
    walk(root, label_property).root
}

/// Build the tree and collect pruning diagnostics.
pub fn walk<'a>(root: &'a dyn Introspect, label_property: &str) -> Walk<'a> {
    let mut walker = Walker {
        label_property,
        skipped: Vec::new(),
    };
    let root = walker.visit(root, String::new());
    Walk {
        root,
        skipped: walker.skipped,
    }
}

struct Walker<'l> {
    label_property: &'l str,
    skipped: Vec<String>,
}

impl Walker<'_> {
    fn visit<'a>(&mut self, instance: &'a dyn Introspect, path: String) -> Option<TreeNode<'a>> {
        let instance = instance.node()?;

        let Some(label) = instance.property(self.label_property) else {
            debug!(
                "skipping `{path}`: {} has no `{}` property",
                instance.type_name(),
                self.label_property
            );
            self.skipped.push(path);
            return None;
        };

        let mut node = TreeNode {
            label: label.value.render(),
            path,
            value: instance,
            children: Vec::new(),
        };

        if let Some(elements) = instance.elements() {
            for (index, element) in elements.into_iter().enumerate() {
                let at = child_path(&node.path, &index.to_string());
                if let Some(child) = self.visit(element, at) {
                    node.children.push(child);
                }
            }
        }

        for property in instance.properties() {
            if !property.is_expandable() {
                continue;
            }
            let at = child_path(&node.path, property.name);
            if let Some(child) = self.visit(property.value, at) {
                node.children.push(child);
            }
        }

        Some(node)
    }
}

fn child_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{parent}.{segment}")
    }
}
