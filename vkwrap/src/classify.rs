//! Struct classifier.
//!
//! Derives a complexity tier and the length/array relationships for each
//! struct. The tier controls whether a wrapper is generated at all: only
//! shapes the generator fully understands (one length member counting one
//! or more arrays, nothing irregular) are judged safe enough to wrap.
//!
//! Classification is an ordered table of named rules over the structured
//! member fields. A rule can only ever raise the tier, so any ambiguity
//! resolves toward the less-safe classification and wrapper emission is
//! skipped rather than risked.

use std::collections::HashSet;
use std::fmt;

use crate::options::GeneratorOptions;
use crate::registry::{MemberDef, TypeDef, NULL_TERMINATED};

/// Complexity tier, ordered by decreasing confidence that a safe wrapper
/// can be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// No array/length members and nothing irregular; a wrapper would add
    /// nothing over the raw struct.
    Trivial,
    /// Well-understood length/array shape; a wrapper is generated.
    Straightforward,
    /// A shape the generator cannot safely reason about; tallied and
    /// skipped.
    Complex,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Tier::Trivial => "trivial",
            Tier::Straightforward => "straightforward",
            Tier::Complex => "complex",
        };
        f.write_str(label)
    }
}

/// An array member referenced by a length relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayRef {
    /// Array member name.
    pub name: String,
    /// Whether the array is read-only.
    pub is_const: bool,
}

/// Association between a length-bearing member and the array members it
/// sizes, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthRelation {
    /// The length member's name.
    pub length: String,
    /// The arrays it counts.
    pub arrays: Vec<ArrayRef>,
}

/// Result of classifying one struct.
#[derive(Debug, Clone)]
pub struct Classification {
    /// The derived complexity tier.
    pub tier: Tier,
    /// All length/array relationships found in the struct.
    pub relations: Vec<LengthRelation>,
}

impl Classification {
    /// Whether the named member is a length member in some relation.
    pub fn is_length_member(&self, name: &str) -> bool {
        self.relations.iter().any(|r| r.length == name)
    }

    /// The relation owned by the named length member.
    pub fn relation_for(&self, length: &str) -> Option<&LengthRelation> {
        self.relations.iter().find(|r| r.length == length)
    }

    /// The array reference for the named member, if it is an array.
    pub fn array_ref(&self, name: &str) -> Option<&ArrayRef> {
        self.relations
            .iter()
            .flat_map(|r| r.arrays.iter())
            .find(|a| a.name == name)
    }
}

/// Members that exist purely for polymorphic dispatch: the type tag and the
/// extension-chain pointer. They carry no payload and are excluded from
/// classification and emission.
pub fn is_dispatch_member(name: &str) -> bool {
    name == "sType" || name == "pNext"
}

/// Resolve the candidate length-member name from a `len` attribute.
///
/// Returns `None` when the attribute is the bare `null-terminated`
/// sentinel, which needs no sibling member. A `name,null-terminated` pair
/// resolves against `name`. Anything else is returned whole; if it is not a
/// member name it will fail to resolve.
fn len_candidate(len: &str) -> Option<&str> {
    let parts: Vec<&str> = len.split(',').collect();
    match parts.as_slice() {
        [s] if *s == NULL_TERMINATED => None,
        [name, s] if *s == NULL_TERMINATED => Some(*name),
        [s] => Some(*s),
        _ => Some(len),
    }
}

struct RuleContext<'a> {
    member_names: &'a HashSet<&'a str>,
    allow_listed: bool,
}

struct Rule {
    #[allow(dead_code)]
    name: &'static str,
    effect: Tier,
    applies: fn(&MemberDef, &RuleContext) -> bool,
}

/// The classification rules, applied per member in declaration order. Each
/// entry names the shape it detects and the tier it forces.
const RULES: &[Rule] = &[
    Rule {
        name: "inline-fixed-array",
        effect: Tier::Complex,
        applies: |m, _| m.fixed_array.is_some(),
    },
    Rule {
        name: "irregular-length",
        effect: Tier::Complex,
        applies: |m, _| m.alt_len.is_some(),
    },
    Rule {
        name: "unresolved-length-ref",
        effect: Tier::Complex,
        applies: |m, ctx| {
            m.len
                .as_deref()
                .and_then(len_candidate)
                .is_some_and(|c| !ctx.member_names.contains(c))
        },
    },
    Rule {
        name: "unvalidated-member",
        effect: Tier::Complex,
        applies: |m, ctx| m.no_auto_validity && !ctx.allow_listed,
    },
    Rule {
        name: "counted-array",
        effect: Tier::Straightforward,
        applies: |m, ctx| {
            m.len
                .as_deref()
                .and_then(len_candidate)
                .is_some_and(|c| ctx.member_names.contains(c))
        },
    },
];

/// Classify one struct: derive its tier and its length/array relations.
pub fn classify(ty: &TypeDef, opts: &GeneratorOptions) -> Classification {
    let members: Vec<&MemberDef> = ty
        .members
        .iter()
        .filter(|m| !is_dispatch_member(&m.name))
        .collect();
    let member_names: HashSet<&str> = members.iter().map(|m| m.name.as_str()).collect();
    let ctx = RuleContext {
        member_names: &member_names,
        allow_listed: opts.is_auto_generateable(&ty.name),
    };

    let mut tier = Tier::Trivial;
    let mut relations: Vec<LengthRelation> = Vec::new();

    for member in &members {
        for rule in RULES {
            if (rule.applies)(member, &ctx) {
                tier = tier.max(rule.effect);
            }
        }

        if let Some(target) = member.len.as_deref().and_then(len_candidate) {
            if member_names.contains(target) {
                record_array(&mut relations, target, member);
            }
        }
    }

    Classification { tier, relations }
}

fn record_array(relations: &mut Vec<LengthRelation>, length: &str, member: &MemberDef) {
    let array = ArrayRef {
        name: member.name.clone(),
        is_const: member.is_const,
    };
    match relations.iter_mut().find(|r| r.length == length) {
        Some(relation) => relation.arrays.push(array),
        None => relations.push(LengthRelation {
            length: length.to_string(),
            arrays: vec![array],
        }),
    }
}
