/// One element of the report tree.
///
/// Category, family and type nodes carry their name as `text`, followed by
/// their child elements. Structural nodes (the root and the two sections)
/// have no text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportNode {
    pub tag: String,
    pub text: Option<String>,
    pub children: Vec<ReportNode>,
}

impl ReportNode {
    #[must_use]
    pub fn structural(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            text: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn named(tag: &str, text: &str) -> Self {
        Self {
            tag: tag.to_string(),
            text: Some(text.to_string()),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_child(mut self, child: ReportNode) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn child(&self, tag: &str) -> Option<&ReportNode> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Texts along every root-to-leaf path below this node, this node excluded.
    #[must_use]
    pub fn leaf_paths(&self) -> Vec<Vec<&str>> {
        let mut paths = Vec::new();
        for child in &self.children {
            collect_paths(child, &mut Vec::new(), &mut paths);
        }
        paths
    }

    /// Number of nodes in this subtree, this node included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ReportNode::node_count).sum::<usize>()
    }
}

fn collect_paths<'a>(node: &'a ReportNode, prefix: &mut Vec<&'a str>, out: &mut Vec<Vec<&'a str>>) {
    prefix.push(node.text());
    if node.children.is_empty() {
        out.push(prefix.clone());
    } else {
        for child in &node.children {
            collect_paths(child, prefix, out);
        }
    }
    prefix.pop();
}

/// A flattened view of one leaf of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow<'a> {
    /// Tag of the section (user or system families) the leaf sits in.
    pub section: &'a str,
    /// Texts from the category node down to the leaf.
    pub path: Vec<&'a str>,
}

/// The complete report: a leading comment and the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub comment: String,
    pub root: ReportNode,
}

impl ReportDocument {
    #[must_use]
    pub fn section(&self, tag: &str) -> Option<&ReportNode> {
        self.root.child(tag)
    }

    /// Every leaf of the tree, section by section, in document order.
    #[must_use]
    pub fn rows(&self) -> Vec<ReportRow<'_>> {
        self.root
            .children
            .iter()
            .flat_map(|section| {
                section.leaf_paths().into_iter().map(|path| ReportRow {
                    section: section.tag.as_str(),
                    path,
                })
            })
            .collect()
    }
}
