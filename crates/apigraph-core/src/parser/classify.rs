//! Entity classifier and field extractor
//!
//! A candidate declaration is offered to a fixed, ordered list of matchers:
//!
//! class → interface → namespace → enum → export-import → type alias →
//! function/method → struct → property → call signature → enum member
//!
//! The first matcher that accepts wins. The order is part of the contract:
//! surface patterns overlap (`readonly type: string` is not a type alias,
//! `foo(): void` could otherwise split as a property at its colon), and the
//! later matchers rely on the earlier ones having claimed those inputs.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::graph::model::{EntityKind, EntityNode};

fn regex(pattern: &str) -> Option<Regex> {
    Regex::new(pattern).ok()
}

static CLASS_RE: Lazy<Option<Regex>> = Lazy::new(|| regex(r"\bclass\s+([\w$]+)"));
static INTERFACE_RE: Lazy<Option<Regex>> = Lazy::new(|| regex(r"\binterface\s+([\w$]+)"));
static NAMESPACE_RE: Lazy<Option<Regex>> = Lazy::new(|| regex(r"\bnamespace\s+([\w$.]+)"));
static ENUM_RE: Lazy<Option<Regex>> = Lazy::new(|| regex(r"\benum\s+([\w$]+)"));
static STRUCT_RE: Lazy<Option<Regex>> = Lazy::new(|| regex(r"\bstruct\s+([\w$]+)"));
static EXTENDS_RE: Lazy<Option<Regex>> = Lazy::new(|| regex(r"\bextends\s+([\w$.]+)"));
static EXPORT_IMPORT_RE: Lazy<Option<Regex>> =
    Lazy::new(|| regex(r"^export\s+import\s+([\w$]+)\s*=\s*([\w$.]+)\s*;?$"));
static TYPE_ALIAS_RE: Lazy<Option<Regex>> = Lazy::new(|| {
    regex(r"^(?:export\s+)?(?:declare\s+)?type\s+([\w$]+)\s*(?:<.*?>)?\s*=\s*([\s\S]*)$")
});
static FUNCTION_RE: Lazy<Option<Regex>> = Lazy::new(|| {
    regex(r"^(?:export\s+)?(?:declare\s+)?(?:async\s+)?function\s+([\w$]+)\s*(?:<.*?>)?\s*\(")
});
static COMPUTED_METHOD_RE: Lazy<Option<Regex>> =
    Lazy::new(|| regex(r"^\[\s*([^\]]+?)\s*\]\s*\??\s*(?:<.*?>)?\s*\("));
static MEMBER_METHOD_RE: Lazy<Option<Regex>> = Lazy::new(|| {
    regex(
        r"^(?:(?:public|private|protected|static|readonly|async|abstract|declare|export|get|set)\s+)*([\w$]+)\s*\??\s*(?:<.*?>)?\s*\(",
    )
});
static CALL_SIGNATURE_RE: Lazy<Option<Regex>> =
    Lazy::new(|| regex(r"^(?:<.*?>\s*)?\([\s\S]*\)\s*:\s*[\s\S]+$"));
static ENUM_MEMBER_RE: Lazy<Option<Regex>> =
    Lazy::new(|| regex(r"^([\w$]+)\s*(?:=\s*([\s\S]+?))?\s*,?$"));
static IDENTIFIER_RE: Lazy<Option<Regex>> = Lazy::new(|| regex(r"^[\w$]+$"));

/// Modifiers that may precede a property name
const PROPERTY_MODIFIERS: &[&str] = &[
    "readonly",
    "public",
    "private",
    "protected",
    "static",
    "declare",
    "export",
    "const",
    "let",
    "var",
];

/// Return type recorded for methods that declare none
pub const VOID: &str = "void";

/// A declaration offered to the classifier
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    head: &'a str,
    joined: String,
    enclosing: Option<&'a str>,
}

impl<'a> Candidate<'a> {
    /// Build a candidate from a member's code lines
    ///
    /// `enclosing` is the name of the entity the member is declared in.
    #[must_use]
    pub fn new(text: &'a str, enclosing: Option<&'a str>) -> Self {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        let head = lines.next().unwrap_or_default();
        let joined = std::iter::once(head)
            .chain(lines)
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            head,
            joined,
            enclosing,
        }
    }

    /// First code line
    #[must_use]
    pub const fn head(&self) -> &'a str {
        self.head
    }

    /// All lines joined by single spaces
    #[must_use]
    pub fn joined(&self) -> &str {
        &self.joined
    }

    /// Part of the first line before any parameter list, type or initializer
    fn declaration_head(&self) -> &'a str {
        self.head
            .find(['(', ':', '='])
            .map_or(self.head, |end| &self.head[..end])
    }
}

/// A classified entity with its kind-specific fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Class {
        name: String,
        supertype: Option<String>,
    },
    Interface {
        name: String,
        supertype: Option<String>,
    },
    Namespace {
        name: String,
    },
    Enum {
        name: String,
    },
    ExportImport {
        name: String,
        target: String,
    },
    TypeAlias {
        name: String,
        target: Option<String>,
    },
    Method {
        name: String,
        return_type: String,
    },
    Struct {
        name: String,
    },
    Property {
        name: String,
        property_type: String,
    },
    CallSignature {
        signature: String,
    },
    EnumMember {
        name: String,
        value: Option<String>,
    },
}

impl Entity {
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Class { .. } => EntityKind::Class,
            Self::Interface { .. } => EntityKind::Interface,
            Self::Namespace { .. } => EntityKind::Namespace,
            Self::Enum { .. } => EntityKind::Enum,
            Self::ExportImport { .. } => EntityKind::ExportImport,
            Self::TypeAlias { .. } => EntityKind::TypeAlias,
            Self::Method { .. } => EntityKind::Method,
            Self::Struct { .. } => EntityKind::Struct,
            Self::Property { .. } => EntityKind::Property,
            Self::CallSignature { .. } => EntityKind::CallSignature,
            Self::EnumMember { .. } => EntityKind::EnumMember,
        }
    }

    /// Write kind, name and kind-specific fields onto a node
    pub fn apply_to(self, node: &mut EntityNode) {
        node.kind = Some(self.kind());
        match self {
            Self::Class { name, supertype } | Self::Interface { name, supertype } => {
                node.name = Some(name);
                node.supertype = supertype;
            }
            Self::Namespace { name } | Self::Enum { name } | Self::Struct { name } => {
                node.name = Some(name);
            }
            Self::ExportImport { name, target } => {
                node.name = Some(name);
                node.aliased_to = Some(target);
            }
            Self::TypeAlias { name, target } => {
                node.name = Some(name);
                node.aliased_to = target;
            }
            Self::Method { name, return_type } => {
                node.name = Some(name);
                node.return_type = Some(return_type);
            }
            Self::Property {
                name,
                property_type,
            } => {
                node.name = Some(name);
                node.property_type = Some(property_type);
            }
            Self::CallSignature { signature } => {
                node.signature = Some(signature);
            }
            Self::EnumMember { name, value } => {
                node.name = Some(name);
                node.value = value;
            }
        }
    }
}

type Matcher = fn(&Candidate<'_>) -> Option<Entity>;

/// Matchers in precedence order
const MATCHERS: [Matcher; 11] = [
    match_class,
    match_interface,
    match_namespace,
    match_enum,
    match_export_import,
    match_type_alias,
    match_method,
    match_struct,
    match_property,
    match_call_signature,
    match_enum_member,
];

/// Classify a candidate, or `None` when no rule matches
#[must_use]
pub fn classify(candidate: &Candidate<'_>) -> Option<Entity> {
    MATCHERS.iter().find_map(|matcher| matcher(candidate))
}

fn capture(re: &Lazy<Option<Regex>>, text: &str, group: usize) -> Option<String> {
    re.as_ref()?
        .captures(text)?
        .get(group)
        .map(|m| m.as_str().trim().to_string())
}

fn strip_terminator(text: &str) -> &str {
    text.trim().trim_end_matches(';').trim_end()
}

/// Type named after `extends`, ignoring constraints inside `<...>`
fn supertype(head: &str) -> Option<String> {
    let mut outer = String::with_capacity(head.len());
    let mut depth = 0usize;
    let mut previous = ' ';
    for c in head.chars() {
        match c {
            '<' => depth += 1,
            // `=>` inside a constraint is an arrow, not a closer
            '>' if depth > 0 && previous != '=' => depth -= 1,
            _ if depth == 0 => outer.push(c),
            _ => {}
        }
        previous = c;
    }
    capture(&EXTENDS_RE, &outer, 1)
}

fn match_class(candidate: &Candidate<'_>) -> Option<Entity> {
    let name = capture(&CLASS_RE, candidate.declaration_head(), 1)?;
    Some(Entity::Class {
        name,
        supertype: supertype(candidate.head()),
    })
}

fn match_interface(candidate: &Candidate<'_>) -> Option<Entity> {
    let name = capture(&INTERFACE_RE, candidate.declaration_head(), 1)?;
    Some(Entity::Interface {
        name,
        supertype: supertype(candidate.head()),
    })
}

fn match_namespace(candidate: &Candidate<'_>) -> Option<Entity> {
    capture(&NAMESPACE_RE, candidate.declaration_head(), 1).map(|name| Entity::Namespace { name })
}

fn match_enum(candidate: &Candidate<'_>) -> Option<Entity> {
    capture(&ENUM_RE, candidate.declaration_head(), 1).map(|name| Entity::Enum { name })
}

fn match_export_import(candidate: &Candidate<'_>) -> Option<Entity> {
    let caps = EXPORT_IMPORT_RE.as_ref()?.captures(candidate.head())?;
    Some(Entity::ExportImport {
        name: caps.get(1)?.as_str().to_string(),
        target: caps.get(2)?.as_str().to_string(),
    })
}

fn match_type_alias(candidate: &Candidate<'_>) -> Option<Entity> {
    let caps = TYPE_ALIAS_RE.as_ref()?.captures(candidate.joined())?;
    let target = caps
        .get(2)
        .map(|m| strip_terminator(m.as_str()).to_string())
        .filter(|t| !t.is_empty());
    Some(Entity::TypeAlias {
        name: caps.get(1)?.as_str().to_string(),
        target,
    })
}

fn match_method(candidate: &Candidate<'_>) -> Option<Entity> {
    let text = candidate.joined();
    let name = capture(&FUNCTION_RE, text, 1)
        .or_else(|| capture(&COMPUTED_METHOD_RE, text, 1).map(|inner| format!("[{inner}]")))
        .or_else(|| capture(&MEMBER_METHOD_RE, text, 1))?;

    let return_type = if name == "constructor" {
        candidate.enclosing.unwrap_or(VOID).to_string()
    } else {
        extract_return_type(text)
    };

    Some(Entity::Method { name, return_type })
}

/// Return type written after the parameter list, or `void`
#[must_use]
pub fn extract_return_type(text: &str) -> String {
    let Some(open) = text.find('(') else {
        return VOID.to_string();
    };

    let mut depth = 0i32;
    let mut close = None;
    for (offset, c) in text[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(open + offset);
                    break;
                }
            }
            _ => {}
        }
    }

    close
        .and_then(|close| text[close + 1..].trim_start().strip_prefix(':'))
        .map(|rest| strip_terminator(rest).trim_end_matches('{').trim().to_string())
        .filter(|ty| !ty.is_empty())
        .unwrap_or_else(|| VOID.to_string())
}

fn match_struct(candidate: &Candidate<'_>) -> Option<Entity> {
    capture(&STRUCT_RE, candidate.declaration_head(), 1).map(|name| Entity::Struct { name })
}

fn match_property(candidate: &Candidate<'_>) -> Option<Entity> {
    let text = strip_terminator(candidate.joined());
    let colon = top_level_colon(text)?;

    let mut name = text[..colon].trim();
    while let Some(rest) = PROPERTY_MODIFIERS.iter().find_map(|m| {
        name.strip_prefix(m)
            .filter(|rest| rest.starts_with(char::is_whitespace))
    }) {
        name = rest.trim_start();
    }
    let name = name.trim_end_matches(['?', '!']).trim_end();

    let is_identifier = IDENTIFIER_RE.as_ref().is_some_and(|re| re.is_match(name));
    let is_index_signature = name.starts_with('[') && name.ends_with(']');
    if !is_identifier && !is_index_signature {
        return None;
    }

    let property_type = text[colon + 1..].trim();
    if property_type.is_empty() {
        return None;
    }

    Some(Entity::Property {
        name: name.to_string(),
        property_type: property_type.to_string(),
    })
}

/// Byte offset of the first `:` outside any bracket pair
fn top_level_colon(text: &str) -> Option<usize> {
    let mut depth = 0i32;
    for (offset, c) in text.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            ':' if depth == 0 => return Some(offset),
            _ => {}
        }
    }
    None
}

fn match_call_signature(candidate: &Candidate<'_>) -> Option<Entity> {
    let text = candidate.joined();
    CALL_SIGNATURE_RE
        .as_ref()?
        .is_match(text)
        .then(|| Entity::CallSignature {
            signature: strip_terminator(text).to_string(),
        })
}

fn match_enum_member(candidate: &Candidate<'_>) -> Option<Entity> {
    let text = candidate.joined().trim().trim_end_matches(',').trim_end();
    let caps = ENUM_MEMBER_RE.as_ref()?.captures(text)?;
    Some(Entity::EnumMember {
        name: caps.get(1)?.as_str().to_string(),
        value: caps.get(2).map(|m| m.as_str().trim().to_string()),
    })
}
