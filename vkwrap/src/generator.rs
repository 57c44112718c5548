//! Generation driver.
//!
//! Walks the registry's features in their declared dependency order. For
//! each feature a fresh `SectionSet` is filled by classifying and emitting
//! every required type and command, then flushed through the assembler.
//! Output accumulates purely in memory; a fatal error aborts the whole
//! target so a partial header can never be observed.

use std::collections::HashMap;

use crate::assemble::{assemble_feature, begin_file, end_file, validate_guard_options, FeatureBlock};
use crate::classify::{classify, Classification, Tier};
use crate::emit::Emitter;
use crate::error::{GenResult, GenerateError};
use crate::options::GeneratorOptions;
use crate::registry::{CommandDef, Feature, Registry, TypeDef};
use crate::sections::{Section, SectionSet};

/// End-of-run tally of structs per complexity tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierCounts {
    pub trivial: usize,
    pub straightforward: usize,
    pub complex: usize,
}

impl TierCounts {
    fn record(&mut self, tier: Tier) {
        match tier {
            Tier::Trivial => self.trivial += 1,
            Tier::Straightforward => self.straightforward += 1,
            Tier::Complex => self.complex += 1,
        }
    }

    /// Number of structs classified in total.
    pub fn total(&self) -> usize {
        self.trivial + self.straightforward + self.complex
    }
}

/// A successfully generated target.
#[derive(Debug)]
pub struct GeneratedTarget {
    /// The complete header text.
    pub content: String,
    /// Struct counts per complexity tier.
    pub counts: TierCounts,
}

/// Generator for one target.
pub struct Generator<'r> {
    registry: &'r Registry,
    opts: GeneratorOptions,
    types: HashMap<&'r str, &'r TypeDef>,
    commands: HashMap<&'r str, &'r CommandDef>,
    classifications: HashMap<&'r str, Classification>,
    counts: TierCounts,
}

impl<'r> Generator<'r> {
    /// Create a generator over a registry.
    ///
    /// Guard options are validated here so a misconfigured target fails
    /// before producing any output.
    pub fn new(registry: &'r Registry, opts: GeneratorOptions) -> GenResult<Self> {
        validate_guard_options(&opts)?;
        let types = registry
            .types
            .iter()
            .map(|t| (t.name.as_str(), t))
            .collect();
        let commands = registry
            .commands
            .iter()
            .map(|c| (c.name.as_str(), c))
            .collect();
        Ok(Self {
            registry,
            opts,
            types,
            commands,
            classifications: HashMap::new(),
            counts: TierCounts::default(),
        })
    }

    /// Generate the target: all features in registry order, inside the file
    /// frame.
    pub fn generate(mut self) -> GenResult<GeneratedTarget> {
        let mut out = begin_file(&self.opts);
        for feature in &self.registry.features {
            let sections = self.feature_sections(feature)?;
            let block = FeatureBlock {
                name: &feature.name,
                protect: feature.protect.as_deref(),
                is_core: feature.is_core(),
                sections,
            };
            assemble_feature(&block, &self.opts, &mut out)?;
        }
        out.push_str(&end_file(&self.opts));
        Ok(GeneratedTarget {
            content: out,
            counts: self.counts,
        })
    }

    fn feature_sections(&mut self, feature: &'r Feature) -> GenResult<SectionSet> {
        let mut sections = SectionSet::new();
        for name in &feature.types {
            self.gen_type(feature, name, &mut sections)?;
        }
        for name in &feature.commands {
            self.gen_command(feature, name, &mut sections)?;
        }
        Ok(sections)
    }

    fn gen_type(
        &mut self,
        feature: &Feature,
        name: &str,
        sections: &mut SectionSet,
    ) -> GenResult<()> {
        let ty = *self
            .types
            .get(name)
            .ok_or_else(|| GenerateError::UnknownType {
                feature: feature.name.clone(),
                name: name.to_string(),
            })?;

        let category = ty
            .category
            .ok_or_else(|| GenerateError::UnresolvedCategory {
                name: ty.name.clone(),
            })?;

        // Aliases are raw typedefs; their declarations are generated
        // elsewhere.
        if ty.alias.is_some() {
            return Ok(());
        }
        if !category.is_structlike() {
            return Ok(());
        }

        if !self.classifications.contains_key(ty.name.as_str()) {
            let classification = classify(ty, &self.opts);
            self.counts.record(classification.tier);
            self.classifications.insert(ty.name.as_str(), classification);
        }
        let classification = &self.classifications[ty.name.as_str()];

        if classification.tier == Tier::Straightforward {
            let text = Emitter::new(&self.opts).wrapper_struct(ty, classification);
            sections.append(Section::for_category(category), text);
        }
        Ok(())
    }

    fn gen_command(
        &mut self,
        feature: &Feature,
        name: &str,
        sections: &mut SectionSet,
    ) -> GenResult<()> {
        let cmd = *self
            .commands
            .get(name)
            .ok_or_else(|| GenerateError::UnknownCommand {
                feature: feature.name.clone(),
                name: name.to_string(),
            })?;

        if cmd.alias.is_some() {
            return Ok(());
        }

        let emitter = Emitter::new(&self.opts);
        sections.append(Section::CommandPointer, emitter.command_pointer(cmd));
        sections.append(Section::Command, emitter.command_prototype(cmd));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{MemberDef, ParamDef, TypeCategory};

    fn counted_struct(name: &str) -> TypeDef {
        TypeDef::new(name, TypeCategory::Struct).with_members(vec![
            MemberDef::new("count", "uint32_t"),
            MemberDef::new("pData", "void")
                .with_const_pointer()
                .with_len("count"),
        ])
    }

    fn trivial_struct(name: &str) -> TypeDef {
        TypeDef::new(name, TypeCategory::Struct).with_members(vec![
            MemberDef::new("width", "uint32_t"),
            MemberDef::new("height", "uint32_t"),
        ])
    }

    fn generate(registry: &Registry) -> GeneratedTarget {
        Generator::new(registry, GeneratorOptions::default())
            .unwrap()
            .generate()
            .unwrap()
    }

    #[test]
    fn test_straightforward_struct_is_emitted_under_feature_guard() {
        let registry = Registry {
            types: vec![counted_struct("VkBlobInfo")],
            commands: Vec::new(),
            features: vec![Feature::new("VK_VERSION_1_0")
                .with_types(vec!["VkBlobInfo".to_string()])],
        };
        let target = generate(&registry);

        assert!(target.content.contains("#ifdef VK_VERSION_1_0"));
        assert!(target.content.contains("struct BlobInfo"));
        assert!(target.content.contains("#endif /* VK_VERSION_1_0 */"));
        assert_eq!(target.counts.straightforward, 1);
        assert_eq!(target.counts.total(), 1);
    }

    #[test]
    fn test_trivial_only_feature_emits_nothing() {
        let registry = Registry {
            types: vec![trivial_struct("VkExtent2D")],
            commands: Vec::new(),
            features: vec![Feature::new("VK_VERSION_1_0")
                .with_types(vec!["VkExtent2D".to_string()])],
        };
        let target = generate(&registry);

        // The feature was selected but produced no sections, so not even
        // its guard appears.
        assert!(!target.content.contains("VK_VERSION_1_0"));
        assert_eq!(target.counts.trivial, 1);
        assert_eq!(target.counts.straightforward, 0);
    }

    #[test]
    fn test_complex_struct_is_tallied_but_skipped() {
        let ty = TypeDef::new("VkMatrixInfo", TypeCategory::Struct)
            .with_members(vec![MemberDef::new("matrix", "float").with_fixed_array("16")]);
        let registry = Registry {
            types: vec![ty],
            commands: Vec::new(),
            features: vec![Feature::new("VK_VERSION_1_0")
                .with_types(vec!["VkMatrixInfo".to_string()])],
        };
        let target = generate(&registry);

        assert!(!target.content.contains("MatrixInfo"));
        assert_eq!(target.counts.complex, 1);
    }

    #[test]
    fn test_alias_struct_is_skipped_entirely() {
        let alias = TypeDef::new("VkBlobInfoKHR", TypeCategory::Struct).with_alias("VkBlobInfo");
        let registry = Registry {
            types: vec![counted_struct("VkBlobInfo"), alias],
            commands: Vec::new(),
            features: vec![
                Feature::new("VK_VERSION_1_0").with_types(vec!["VkBlobInfo".to_string()]),
                Feature::new("VK_KHR_blob").with_types(vec!["VkBlobInfoKHR".to_string()]),
            ],
        };
        let target = generate(&registry);

        assert!(target.content.contains("struct BlobInfo"));
        assert!(!target.content.contains("BlobInfoKHR"));
        // The alias never reaches the classifier.
        assert_eq!(target.counts.total(), 1);
    }

    #[test]
    fn test_struct_required_twice_is_classified_once() {
        let registry = Registry {
            types: vec![counted_struct("VkBlobInfo")],
            commands: Vec::new(),
            features: vec![
                Feature::new("VK_VERSION_1_0").with_types(vec!["VkBlobInfo".to_string()]),
                Feature::new("VK_KHR_blob").with_types(vec!["VkBlobInfo".to_string()]),
            ],
        };
        let target = generate(&registry);
        assert_eq!(target.counts.straightforward, 1);
        assert_eq!(target.counts.total(), 1);
    }

    #[test]
    fn test_missing_category_is_fatal() {
        let mut ty = counted_struct("VkBlobInfo");
        ty.category = None;
        let registry = Registry {
            types: vec![ty],
            commands: Vec::new(),
            features: vec![Feature::new("VK_VERSION_1_0")
                .with_types(vec!["VkBlobInfo".to_string()])],
        };
        let err = Generator::new(&registry, GeneratorOptions::default())
            .unwrap()
            .generate()
            .unwrap_err();
        assert!(matches!(
            err,
            GenerateError::UnresolvedCategory { name } if name == "VkBlobInfo"
        ));
    }

    #[test]
    fn test_unknown_required_type_is_fatal() {
        let registry = Registry {
            types: Vec::new(),
            commands: Vec::new(),
            features: vec![Feature::new("VK_VERSION_1_0")
                .with_types(vec!["VkGhost".to_string()])],
        };
        let err = Generator::new(&registry, GeneratorOptions::default())
            .unwrap()
            .generate()
            .unwrap_err();
        assert!(matches!(err, GenerateError::UnknownType { .. }));
    }

    #[test]
    fn test_commands_flush_after_types() {
        let registry = Registry {
            types: vec![counted_struct("VkBlobInfo")],
            commands: vec![CommandDef {
                name: "vkMakeBlob".to_string(),
                return_type: "VkResult".to_string(),
                params: vec![ParamDef::new("VkDevice", "device")],
                alias: None,
            }],
            features: vec![Feature::new("VK_VERSION_1_0")
                .with_types(vec!["VkBlobInfo".to_string()])
                .with_commands(vec!["vkMakeBlob".to_string()])],
        };
        let target = generate(&registry);

        let struct_pos = target.content.find("struct BlobInfo").unwrap();
        let pfn_pos = target.content.find("PFN_vkMakeBlob").unwrap();
        let proto_pos = target.content.find("VkResult vkMakeBlob(").unwrap();
        assert!(struct_pos < pfn_pos);
        assert!(pfn_pos < proto_pos);
    }

    #[test]
    fn test_aliased_command_is_skipped() {
        let registry = Registry {
            types: Vec::new(),
            commands: vec![CommandDef {
                name: "vkMakeBlobKHR".to_string(),
                return_type: "VkResult".to_string(),
                params: Vec::new(),
                alias: Some("vkMakeBlob".to_string()),
            }],
            features: vec![Feature::new("VK_KHR_blob")
                .with_commands(vec!["vkMakeBlobKHR".to_string()])],
        };
        let target = generate(&registry);
        assert!(!target.content.contains("vkMakeBlobKHR"));
    }
}
