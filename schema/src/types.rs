use indexmap::IndexMap;
use serde::Serialize;

/// Name of the oneof group that turns a whole message into a union wrapper.
pub const UNION_FIELD: &str = "kind";

/// Raw variant lines collected between the braces of a `oneof` block.
pub type OneofVariantList = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    Message,
    Enum,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaNode {
    pub name:   String,
    pub line:   usize,
    pub kind:   NodeKind,
    /// Messages declared lexically inside this one, in declaration order.
    pub nested: IndexMap<String, SchemaNode>,
    /// Raw declaration line -> `None`, or oneof name -> its variant lines.
    pub fields: IndexMap<String, Option<OneofVariantList>>,
}

impl SchemaNode {
    pub fn new(name: &str, kind: NodeKind, line: usize) -> Self {
        SchemaNode {
            name: name.to_owned(),
            line,
            kind,
            nested: IndexMap::new(),
            fields: IndexMap::new(),
        }
    }

    /// The variants of the `kind` oneof, if this message is a union wrapper.
    pub fn union_variants(&self) -> Option<&OneofVariantList> {
        match self.fields.get(UNION_FIELD) {
            Some(Some(variants)) => Some(variants),
            _ => None,
        }
    }

    pub fn is_union(&self) -> bool {
        self.kind == NodeKind::Message && self.union_variants().is_some()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Schema {
    /// Top-level nodes, in declaration order.
    pub nodes: IndexMap<String, SchemaNode>,
}

impl Schema {
    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.nodes.get(name)
    }

    /// Only top-level declarations are visible to type lookups.
    pub fn is_enum(&self, name: &str) -> bool {
        matches!(self.nodes.get(name), Some(node) if node.kind == NodeKind::Enum)
    }

    pub fn is_union(&self, name: &str) -> bool {
        self.nodes.get(name).map_or(false, SchemaNode::is_union)
    }

    /// Total number of declared nodes, nested ones included.
    pub fn node_count(&self) -> usize {
        fn count(nodes: &IndexMap<String, SchemaNode>) -> usize {
            nodes.values().map(|n| 1 + count(&n.nested)).sum()
        }
        count(&self.nodes)
    }
}

/// Inline override parsed from a trailing `// (guard: value)` comment.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub guard: Option<String>,
    pub value: Option<String>,
}

impl Annotation {
    pub fn is_empty(&self) -> bool {
        self.guard.is_none() && self.value.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Modifier {
    Required,
    Optional,
    Repeated,
}

/// `[modifier] Type name [= value];` split into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDeclaration {
    pub modifier:   Modifier,
    pub type_:      String,
    pub name:       String,
    pub annotation: Annotation,
}

/// One line of a oneof block: `Type name [= value]; // (guard: value)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantDeclaration {
    pub type_:      String,
    pub name:       String,
    pub annotation: Annotation,
}
