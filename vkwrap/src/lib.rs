//! # vkwrap
//!
//! Generator core for safer C++ wrapper structs over a Vulkan-style API
//! registry.
//!
//! Given a registry type graph, vkwrap classifies every struct's
//! generability from its member shapes, resolves array/length
//! relationships, and emits a wrapper type plus a `map()` conversion back
//! to the raw ABI-compatible layout — wrapped in correctly nested
//! feature, prototype, and platform guards. Shapes the generator cannot
//! safely reason about are tallied and skipped rather than wrapped
//! unsoundly.
//!
//! ## Architecture
//!
//! - [`registry`] - The read-only type graph: types, members, commands,
//!   features
//! - [`classify`] - Complexity tiers and length/array relations
//! - [`emit`] - Wrapper struct and command text emission
//! - [`sections`] - Per-feature, category-keyed fragment buffers
//! - [`assemble`] - Guard nesting, section flush order, file frame
//! - [`generator`] - The per-feature generation loop
//! - [`options`] - Recognized generation options
//! - [`error`] - Fatal generation errors

pub mod assemble;
pub mod classify;
pub mod emit;
pub mod error;
pub mod generator;
pub mod options;
pub mod registry;
pub mod sections;

// Re-export main types for convenience
pub use classify::{classify, Classification, LengthRelation, Tier};
pub use error::{GenResult, GenerateError};
pub use generator::{GeneratedTarget, Generator, TierCounts};
pub use options::{GeneratorOptions, GuardDirective};
pub use registry::{CommandDef, Feature, MemberDef, ParamDef, Registry, TypeCategory, TypeDef};
pub use sections::{Section, SectionSet};
