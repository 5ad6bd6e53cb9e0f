//! Code block tree.
//!
//! Generated TypeScript is built as a tree of [`CodeNode`]s before any text
//! exists. A block has an optional header (`namespace Endpoints`,
//! `if (x != null)`, ...) and ordered children; statements are single lines.
//! Serializing the tree takes care of braces, indentation and blank lines
//! between dissimilar siblings, so emitters only decide structure.
//!
//! Nodes live in an arena owned by [`CodeTree`] and are addressed by
//! [`NodeId`]. Construction goes through the [`BlockMut`] cursor, which
//! supports the chained style emitters use:
//!
//! ```
//! use watts_gen::block::CodeTree;
//!
//! let mut tree = CodeTree::new("namespace Endpoints");
//! tree.root_mut()
//!     .add_and_use_block("export abstract class QueryParam")
//!     .add_statement("abstract getQueryParams(): string")
//!     .parent()
//!     .add_block("export namespace Users");
//!
//! assert_eq!(
//!     tree.to_string(),
//!     "namespace Endpoints {\n\
//!      \x20   export abstract class QueryParam {\n\
//!      \x20       abstract getQueryParams(): string\n\
//!      \x20   }\n\
//!      \n\
//!      \x20   export namespace Users {\n\
//!      \x20   }\n\
//!      }\n"
//! );
//! ```
//!
//! ## Blank lines
//!
//! After a child, one blank line is inserted before its next sibling when the
//! sibling is of a different kind (statement vs. block), or when the sibling is
//! a delimited block that does not continue the previous one with `else`.
//! Function-style blocks (`.then(x => { ... })`) always attach directly to the
//! preceding line and nothing is ever added after the last child.

use std::fmt;
use std::mem;

use crate::writer::IndentWriter;

/// Spaces added per nesting level.
pub const INDENT_PER_LEVEL: usize = 4;

/// Index of a node inside its [`CodeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A node of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeNode {
    /// A single line of code.
    Statement(String),
    /// A delimited region with ordered children.
    Block(Block),
}

/// A delimited region of generated code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    outer: Option<String>,
    suppress_outer: bool,
    children: Vec<NodeId>,
    // Build-time navigation only; serialization never looks at it.
    parent: Option<NodeId>,
    is_function_block: bool,
    termination: String,
}

impl Block {
    /// Header text placed before the opening brace.
    pub fn outer(&self) -> Option<&str> {
        self.outer.as_deref()
    }

    /// Whether the header and braces are omitted.
    pub fn suppress_outer(&self) -> bool {
        self.suppress_outer
    }

    /// Whether the block closes with `})`.
    pub fn is_function_block(&self) -> bool {
        self.is_function_block
    }

    /// Text appended after the closing delimiter.
    pub fn termination(&self) -> &str {
        &self.termination
    }

    fn is_else_continuation(&self) -> bool {
        self.outer
            .as_deref()
            .is_some_and(|outer| outer == "else" || outer.starts_with("else "))
    }
}

/// Shape of a block to append.
///
/// Plain headers convert directly, so `add_block("if (x)")` works; the
/// builder methods cover function-style blocks and terminators.
///
/// ```
/// use watts_gen::block::BlockSpec;
///
/// let spec = BlockSpec::new("return call.then(response =>").function().terminated(";");
/// assert!(spec.is_function_block);
/// assert_eq!(spec.termination, ";");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockSpec {
    /// Header text; empty means a bare `{`.
    pub outer: String,
    /// Omit header and braces, rendering children at the block's own indent.
    pub suppress_outer: bool,
    /// Close with `})` and attach to the preceding sibling.
    pub is_function_block: bool,
    /// Text appended after the closing delimiter.
    pub termination: String,
}

impl BlockSpec {
    /// A plain block with the given header.
    pub fn new(outer: impl Into<String>) -> Self {
        Self {
            outer: outer.into(),
            ..Default::default()
        }
    }

    /// Marks the block as function-style.
    pub fn function(mut self) -> Self {
        self.is_function_block = true;
        self
    }

    /// Sets the text written after the closing delimiter.
    pub fn terminated(mut self, termination: impl Into<String>) -> Self {
        self.termination = termination.into();
        self
    }

    /// Omits header and braces.
    pub fn suppressed(mut self) -> Self {
        self.suppress_outer = true;
        self
    }

    fn into_block(self, parent: Option<NodeId>) -> Block {
        Block {
            outer: Some(self.outer).filter(|o| !o.is_empty()),
            suppress_outer: self.suppress_outer,
            children: Vec::new(),
            parent,
            is_function_block: self.is_function_block,
            termination: self.termination,
        }
    }
}

impl From<&str> for BlockSpec {
    fn from(outer: &str) -> Self {
        Self::new(outer)
    }
}

impl From<String> for BlockSpec {
    fn from(outer: String) -> Self {
        Self::new(outer)
    }
}

/// Arena holding one tree of generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTree {
    nodes: Vec<CodeNode>,
}

impl CodeTree {
    /// Creates a tree whose root block has the given header.
    pub fn new(root: impl Into<BlockSpec>) -> Self {
        Self {
            nodes: vec![CodeNode::Block(root.into().into_block(None))],
        }
    }

    /// Creates a tree whose root renders only its children.
    pub fn suppressed(outer: impl Into<String>) -> Self {
        Self::new(BlockSpec::new(outer).suppressed())
    }

    /// The root block's id.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// A cursor on the root block.
    pub fn root_mut(&mut self) -> BlockMut<'_> {
        BlockMut { tree: self, id: NodeId(0) }
    }

    /// A cursor on a previously created block.
    pub fn block_mut(&mut self, id: NodeId) -> BlockMut<'_> {
        debug_assert!(
            matches!(self.nodes.get(id.0), Some(CodeNode::Block(_))),
            "{id:?} is not a block of this tree"
        );
        BlockMut { tree: self, id }
    }

    /// Looks up a node.
    pub fn node(&self, id: NodeId) -> Option<&CodeNode> {
        self.nodes.get(id.0)
    }

    /// Child ids of a block, in insertion order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.nodes.get(id.0) {
            Some(CodeNode::Block(block)) => &block.children,
            _ => &[],
        }
    }

    /// Number of nodes in the tree, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Renders a node at `indent` spaces.
    pub fn serialize(&self, id: NodeId, indent: usize) -> String {
        match self.nodes.get(id.0) {
            Some(CodeNode::Statement(text)) => {
                let mut writer = IndentWriter::with_indent(indent);
                writer.append_line(text);
                writer.into_string()
            }
            Some(CodeNode::Block(block)) => self.serialize_block(block, indent),
            None => String::new(),
        }
    }

    fn serialize_block(&self, block: &Block, indent: usize) -> String {
        let mut writer = IndentWriter::with_indent(indent);

        if !block.suppress_outer {
            match block.outer.as_deref() {
                Some(outer) => {
                    let padding = if outer.ends_with('(') { "" } else { " " };
                    writer.append_line(&format!("{outer}{padding}{{"));
                }
                None => writer.append_line("{"),
            }
        }

        let child_indent = if block.suppress_outer {
            writer.indent()
        } else {
            writer.indent() + INDENT_PER_LEVEL
        };

        for (idx, &child) in block.children.iter().enumerate() {
            writer.append_without_indent(&self.serialize(child, child_indent));

            if let Some(&next) = block.children.get(idx + 1)
                && self.needs_blank_line(child, next)
            {
                writer.append_line("");
            }
        }

        let block_end = if block.is_function_block {
            "})"
        } else if !block.suppress_outer {
            "}"
        } else {
            ""
        };
        writer.append_line(&format!("{block_end}{}", block.termination));

        writer.into_string()
    }

    fn needs_blank_line(&self, current: NodeId, next: NodeId) -> bool {
        let (Some(current), Some(next)) = (self.nodes.get(current.0), self.nodes.get(next.0)) else {
            return false;
        };

        let kind_differs = mem::discriminant(current) != mem::discriminant(next);

        match next {
            CodeNode::Block(block) if block.is_function_block => false,
            CodeNode::Block(block) => {
                kind_differs || (!block.suppress_outer && !block.is_else_continuation())
            }
            CodeNode::Statement(_) => kind_differs,
        }
    }

    fn push(&mut self, parent: NodeId, node: CodeNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        if let Some(CodeNode::Block(block)) = self.nodes.get_mut(parent.0) {
            block.children.push(id);
        }
        id
    }

    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        match self.nodes.get(id.0) {
            Some(CodeNode::Block(block)) => block.parent,
            _ => None,
        }
    }
}

impl fmt::Display for CodeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize(self.root(), 0))
    }
}

/// Cursor for appending to one block of a [`CodeTree`].
///
/// Methods consume and return cursors so construction reads as a chain:
/// `add_block` stays on the current block, `add_and_use_block` moves into the
/// new child and `parent` moves back out.
#[derive(Debug)]
pub struct BlockMut<'a> {
    tree: &'a mut CodeTree,
    id: NodeId,
}

impl<'a> BlockMut<'a> {
    /// Id of the block under the cursor, for reopening it with
    /// [`CodeTree::block_mut`].
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Appends a statement.
    pub fn add_statement(self, statement: impl Into<String>) -> Self {
        self.add_statement_if(statement, true)
    }

    /// Appends a statement when `condition` holds.
    pub fn add_statement_if(self, statement: impl Into<String>, condition: bool) -> Self {
        if condition {
            self.tree.push(self.id, CodeNode::Statement(statement.into()));
        }
        self
    }

    /// Appends an empty statement, rendered as a blank line.
    pub fn add_new_line(self) -> Self {
        self.add_statement(String::new())
    }

    /// Appends a child block and stays on the current block.
    pub fn add_block(self, spec: impl Into<BlockSpec>) -> Self {
        let block = spec.into().into_block(Some(self.id));
        self.tree.push(self.id, CodeNode::Block(block));
        self
    }

    /// Appends a child block and moves the cursor into it.
    pub fn add_and_use_block(self, spec: impl Into<BlockSpec>) -> BlockMut<'a> {
        let block = spec.into().into_block(Some(self.id));
        let id = self.tree.push(self.id, CodeNode::Block(block));
        BlockMut { tree: self.tree, id }
    }

    /// Moves the cursor to the enclosing block.
    ///
    /// The root has no parent; calling this on the root is a construction bug
    /// and leaves the cursor on the root.
    pub fn parent(self) -> BlockMut<'a> {
        let parent = self.tree.parent_of(self.id);
        debug_assert!(parent.is_some(), "parent() called on the root block");
        BlockMut {
            id: parent.unwrap_or(self.id),
            tree: self.tree,
        }
    }
}
