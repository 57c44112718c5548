//! Registry data model.
//!
//! This module defines the read-only type graph consumed by the generator:
//! types, struct members, commands, and the feature/extension groupings that
//! partition them. The model is deserialized once from a registry document;
//! every optional attribute is an explicit field, so classification and
//! emission never perform late-bound attribute lookups.

use serde::{Deserialize, Serialize};

/// Length attribute sentinel for C strings.
pub const NULL_TERMINATED: &str = "null-terminated";

/// Feature names with this prefix are core API versions; everything else is
/// an extension.
pub const CORE_VERSION_PREFIX: &str = "VK_VERSION_";

/// Category of a registry type.
///
/// The category decides which output section a type's text lands in, and
/// whether the type goes through the struct pipeline at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeCategory {
    Include,
    Define,
    Basetype,
    Handle,
    Enum,
    Group,
    Bitmask,
    Funcpointer,
    Struct,
    Union,
}

impl TypeCategory {
    /// Whether types of this category carry members and go through the
    /// classifier/emitter.
    pub fn is_structlike(self) -> bool {
        matches!(self, TypeCategory::Struct | TypeCategory::Union)
    }

    /// C keyword used when declaring a wrapper for this category.
    pub fn keyword(self) -> &'static str {
        match self {
            TypeCategory::Union => "union",
            _ => "struct",
        }
    }
}

/// A type definition from the registry.
///
/// Struct and union types additionally carry their ordered member list; for
/// every other category `members` is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDef {
    /// Registry name, e.g. `VkBufferCreateInfo`.
    pub name: String,

    /// Section category. Absent means the registry entry is malformed; the
    /// generator treats that as fatal rather than guessing a section.
    #[serde(default)]
    pub category: Option<TypeCategory>,

    /// Name of the type this one aliases, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Platform protection symbols, comma-separated when more than one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protect: Option<String>,

    /// Members in declaration order (struct/union only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<MemberDef>,
}

impl TypeDef {
    /// Create a type definition with the given name and category.
    pub fn new(name: impl Into<String>, category: TypeCategory) -> Self {
        Self {
            name: name.into(),
            category: Some(category),
            alias: None,
            protect: None,
            members: Vec::new(),
        }
    }

    /// Set the member list.
    pub fn with_members(mut self, members: Vec<MemberDef>) -> Self {
        self.members = members;
        self
    }

    /// Set the alias target.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Set the platform protection attribute.
    pub fn with_protect(mut self, protect: impl Into<String>) -> Self {
        self.protect = Some(protect.into());
        self
    }
}

/// A single struct or union member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDef {
    /// Member name, e.g. `pQueueFamilyIndices`.
    pub name: String,

    /// Raw type reference, e.g. `uint32_t` or `VkBuffer`.
    pub ty: String,

    /// `const` qualifier on the pointee.
    #[serde(default)]
    pub is_const: bool,

    /// Pointer indirection.
    #[serde(default)]
    pub pointer: bool,

    /// Inline fixed-size array extent (a literal count or a constant name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_array: Option<String>,

    /// Length attribute: another member's name, the `null-terminated`
    /// sentinel, or a comma-separated `name,null-terminated` pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub len: Option<String>,

    /// Irregular length expression (e.g. `codeSize / 4`). Presence marks
    /// the member as having a length the generator cannot reason about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_len: Option<String>,

    /// The registry could not state validity rules for this member.
    #[serde(default)]
    pub no_auto_validity: bool,
}

impl MemberDef {
    /// Create a member with the given name and raw type.
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            is_const: false,
            pointer: false,
            fixed_array: None,
            len: None,
            alt_len: None,
            no_auto_validity: false,
        }
    }

    /// Mark as a const pointer member.
    pub fn with_const_pointer(mut self) -> Self {
        self.is_const = true;
        self.pointer = true;
        self
    }

    /// Mark as a mutable pointer member.
    pub fn with_pointer(mut self) -> Self {
        self.pointer = true;
        self
    }

    /// Set the length attribute.
    pub fn with_len(mut self, len: impl Into<String>) -> Self {
        self.len = Some(len.into());
        self
    }

    /// Set an inline fixed-array extent.
    pub fn with_fixed_array(mut self, extent: impl Into<String>) -> Self {
        self.fixed_array = Some(extent.into());
        self
    }

    /// Set an irregular length expression.
    pub fn with_alt_len(mut self, expr: impl Into<String>) -> Self {
        self.alt_len = Some(expr.into());
        self
    }

    /// Mark as lacking automatic validity rules.
    pub fn with_no_auto_validity(mut self) -> Self {
        self.no_auto_validity = true;
        self
    }
}

/// A command (entry point) declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandDef {
    /// Command name, e.g. `vkCreateBuffer`.
    pub name: String,

    /// Raw return type, e.g. `VkResult` or `void`.
    pub return_type: String,

    /// Parameters in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamDef>,

    /// Name of the command this one aliases, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// A single command parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDef {
    /// Full parameter type text, e.g. `const VkBufferCreateInfo*`.
    pub ty: String,

    /// Parameter name.
    pub name: String,
}

impl ParamDef {
    /// Create a parameter with the given type text and name.
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
        }
    }
}

/// A feature: a core API version or an extension.
///
/// Features appear in the registry in dependency order and are generated in
/// exactly that order. The feature name doubles as its guard token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    /// Feature name and guard token, e.g. `VK_VERSION_1_0` or
    /// `VK_KHR_swapchain`.
    pub name: String,

    /// Platform protection symbols for the whole feature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protect: Option<String>,

    /// Names of types this feature requires, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,

    /// Names of commands this feature requires, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,
}

impl Feature {
    /// Create an empty feature with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            protect: None,
            types: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Set the required type names.
    pub fn with_types(mut self, types: Vec<String>) -> Self {
        self.types = types;
        self
    }

    /// Set the required command names.
    pub fn with_commands(mut self, commands: Vec<String>) -> Self {
        self.commands = commands;
        self
    }

    /// Set the platform protection attribute.
    pub fn with_protect(mut self, protect: impl Into<String>) -> Self {
        self.protect = Some(protect.into());
        self
    }

    /// Whether this feature is a core API version rather than an extension.
    pub fn is_core(&self) -> bool {
        self.name.starts_with(CORE_VERSION_PREFIX)
    }
}

/// The complete registry document: the type graph plus its feature
/// partitioning, in dependency order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry {
    /// All type definitions.
    pub types: Vec<TypeDef>,

    /// All command declarations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandDef>,

    /// Features in dependency order.
    pub features: Vec<Feature>,
}
