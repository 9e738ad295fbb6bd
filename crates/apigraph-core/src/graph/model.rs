//! Graph model types

use serde::{Deserialize, Serialize};

/// Module value carried by nodes whose owning module has not been resolved
pub const UNKNOWN_MODULE: &str = "unknown";

/// Kind of declared entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Module,
    Class,
    Interface,
    Namespace,
    Enum,
    Struct,
    Method,
    Property,
    CallSignature,
    EnumMember,
    TypeAlias,
    ExportImport,
}

impl EntityKind {
    /// Graph label for this kind
    #[must_use]
    pub const fn label(self) -> Label {
        match self {
            Self::Module => Label::Module,
            Self::Class => Label::Class,
            Self::Interface => Label::Interface,
            Self::Namespace => Label::Namespace,
            Self::Enum => Label::Enum,
            Self::Struct => Label::Struct,
            Self::Method => Label::Method,
            Self::Property => Label::Property,
            Self::CallSignature => Label::CallSignature,
            Self::EnumMember => Label::EnumMember,
            Self::TypeAlias => Label::TypeAlias,
            Self::ExportImport => Label::ExportImport,
        }
    }

    /// Whether this kind declares a body that other entities live in
    #[must_use]
    pub const fn is_structural(self) -> bool {
        matches!(
            self,
            Self::Class | Self::Interface | Self::Namespace | Self::Enum | Self::Struct
        )
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Module => "module",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Namespace => "namespace",
            Self::Enum => "enum",
            Self::Struct => "struct",
            Self::Method => "method",
            Self::Property => "property",
            Self::CallSignature => "call_signature",
            Self::EnumMember => "enum_member",
            Self::TypeAlias => "type_alias",
            Self::ExportImport => "export_import",
        };
        write!(f, "{s}")
    }
}

/// Node label in the property graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    Module,
    Class,
    Interface,
    Namespace,
    Enum,
    Struct,
    Method,
    Property,
    CallSignature,
    EnumMember,
    TypeAlias,
    ExportImport,
    Unclassified,
}

impl Label {
    /// Every label, in index creation order
    pub const ALL: [Self; 13] = [
        Self::Module,
        Self::Class,
        Self::Interface,
        Self::Namespace,
        Self::Enum,
        Self::Struct,
        Self::Method,
        Self::Property,
        Self::CallSignature,
        Self::EnumMember,
        Self::TypeAlias,
        Self::ExportImport,
        Self::Unclassified,
    ];

    /// Labels whose nodes receive containment edges to their members
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(
            self,
            Self::Namespace | Self::Class | Self::Interface | Self::Enum | Self::Struct
        )
    }

    /// Parse a label name as stored in the graph
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.as_str() == name)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Module => "Module",
            Self::Class => "Class",
            Self::Interface => "Interface",
            Self::Namespace => "Namespace",
            Self::Enum => "Enum",
            Self::Struct => "Struct",
            Self::Method => "Method",
            Self::Property => "Property",
            Self::CallSignature => "CallSignature",
            Self::EnumMember => "EnumMember",
            Self::TypeAlias => "TypeAlias",
            Self::ExportImport => "ExportImport",
            Self::Unclassified => "Unclassified",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared entity, as emitted by the parser and enriched by the resolver
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityNode {
    /// Entity kind, absent when no classifier rule matched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntityKind>,
    /// Declared identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Signature text of an anonymous call signature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// First line of an unclassified declaration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
    /// Enclosing entity: a bare name before resolution, a unique key after
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    /// Owning module
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Nesting level, 0 for the module root
    #[serde(default)]
    pub depth: u32,
    #[serde(default)]
    pub description: String,
    /// `@tag ...` lines of the selected doc comment, in order
    #[serde(default)]
    pub metadata_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decorators: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    /// `extends` target of a class or interface
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supertype: Option<String>,
    /// Target of an export-import or type alias
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliased_to: Option<String>,
    /// Literal value of an enum member
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Hierarchy-qualified identifier, assigned by the resolver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_key: Option<String>,
}

impl EntityNode {
    /// Create the root node of a module
    #[must_use]
    pub fn module_root(module: impl Into<String>) -> Self {
        Self {
            kind: Some(EntityKind::Module),
            name: Some(module.into()),
            description: "module header node derived from the @kit marker".to_string(),
            ..Self::default()
        }
    }

    /// Name used for this node in keys and parent references
    ///
    /// Call signatures have no identifier and use their signature text;
    /// unclassified nodes fall back to their source line.
    #[must_use]
    pub fn key_segment(&self) -> &str {
        self.name
            .as_deref()
            .or(self.signature.as_deref())
            .or(self.source_text.as_deref())
            .unwrap_or_default()
    }

    /// Graph label for this node
    #[must_use]
    pub fn label(&self) -> Label {
        self.kind.map_or(Label::Unclassified, EntityKind::label)
    }

    /// Owning module, unless absent or still the unknown sentinel
    #[must_use]
    pub fn known_module(&self) -> Option<&str> {
        self.module
            .as_deref()
            .filter(|m| !m.is_empty() && *m != UNKNOWN_MODULE)
    }
}

/// Ordered node list extracted from one source unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeList {
    /// Module name taken from the unit's header marker
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
    /// SHA-256 of the source unit's bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    pub nodes: Vec<EntityNode>,
}

/// Kind of edge/relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKind {
    /// Containment: structural parent to a member it declares
    Has(Option<EntityKind>),
    /// Membership: entity to its owning module
    BelongsTo,
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Has(Some(kind)) => write!(f, "HAS_{}", kind.to_string().to_uppercase()),
            Self::Has(None) => write!(f, "HAS_UNCLASSIFIED"),
            Self::BelongsTo => write!(f, "BELONGS_TO"),
        }
    }
}

/// An edge in the graph, addressed by unique keys
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub source_key: String,
    pub source_label: Label,
    pub target_key: String,
    pub target_label: Label,
    pub kind: EdgeKind,
}
