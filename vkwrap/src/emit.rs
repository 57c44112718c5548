//! Wrapper emitter.
//!
//! Turns a classified struct into the text of its wrapper type and `map()`
//! conversion, and renders command prototypes and function-pointer
//! typedefs for the command buckets.
//!
//! The wrapper owns one `Array` field per counted array member and derives
//! the paired length member's value at `map()` time, so a wrapper instance
//! cannot disagree with itself about element counts. Raw scalar members are
//! copied verbatim in declaration order.

use crate::assemble::protect_guard;
use crate::classify::{is_dispatch_member, Classification};
use crate::options::GeneratorOptions;
use crate::registry::{CommandDef, MemberDef, TypeDef};

/// Convert a raw type reference for use inside generated code.
///
/// `VkBool32` becomes plain `bool`; other `Vk` types are referenced through
/// the `vk::` namespace; everything else passes through.
pub fn cpp_type_ref(name: &str) -> String {
    if name == "VkBool32" {
        return "bool".to_string();
    }
    match name.strip_prefix("Vk") {
        Some(rest) => format!("vk::{rest}"),
        None => name.to_string(),
    }
}

/// Convert a raw type name into the wrapper's own declaration name by
/// dropping the API prefix.
pub fn cpp_type_decl(name: &str) -> &str {
    name.strip_prefix("Vk").unwrap_or(name)
}

/// Derive the wrapper field name for a pointer member by stripping the
/// Hungarian `p`/`pp` prefix: `pData` becomes `data`, `ppEnabledLayerNames`
/// becomes `enabledLayerNames`. Names without the prefix pass through.
pub fn array_field_name(member: &str) -> String {
    let stripped = member.trim_start_matches('p');
    let prefix_len = member.len() - stripped.len();
    if prefix_len == 0 || !stripped.starts_with(|c: char| c.is_ascii_uppercase()) {
        return member.to_string();
    }
    let mut chars = stripped.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_ascii_lowercase(), chars.as_str()),
        None => member.to_string(),
    }
}

/// Element type of an `Array` field. Untyped byte blobs become
/// `std::byte`.
fn element_type(member: &MemberDef) -> String {
    let ty = cpp_type_ref(&member.ty);
    if ty == "void" {
        "std::byte".to_string()
    } else {
        ty
    }
}

/// Emitter for one generation target.
#[derive(Debug)]
pub struct Emitter<'o> {
    opts: &'o GeneratorOptions,
}

impl<'o> Emitter<'o> {
    /// Create an emitter over the target's options.
    pub fn new(opts: &'o GeneratorOptions) -> Self {
        Self { opts }
    }

    /// Emit the wrapper type and its `map()` function for one struct.
    ///
    /// The caller is responsible for only invoking this on straightforward
    /// structs; the emitter assumes every length relation in
    /// `classification` is resolvable.
    pub fn wrapper_struct(&self, ty: &TypeDef, classification: &Classification) -> String {
        let members: Vec<&MemberDef> = ty
            .members
            .iter()
            .filter(|m| !is_dispatch_member(&m.name))
            .collect();

        let mut body = String::new();
        let (protect_begin, protect_end) = protect_guard(ty.protect.as_deref());
        body.push_str(&protect_begin);

        let keyword = ty
            .category
            .map(|c| c.keyword())
            .unwrap_or("struct");
        body.push_str(keyword);
        body.push(' ');
        body.push_str(cpp_type_decl(&ty.name));
        body.push_str("\n{\n");
        body.push_str(&format!(
            "    using MappedType = {};\n\n",
            cpp_type_ref(&ty.name)
        ));

        // Field declarations. Length members are omitted; their values are
        // always derived from the paired array field.
        for member in &members {
            if classification.is_length_member(&member.name) {
                continue;
            }
            body.push_str("    ");
            match classification.array_ref(&member.name) {
                Some(array) if array.is_const => {
                    body.push_str(&format!(
                        "Array<{}> {}",
                        element_type(member),
                        array_field_name(&member.name)
                    ));
                }
                Some(_) => {
                    body.push_str(&format!(
                        "Array<{}>* {}",
                        element_type(member),
                        array_field_name(&member.name)
                    ));
                }
                None => {
                    if member.is_const {
                        body.push_str("const ");
                    }
                    body.push_str(&cpp_type_ref(&member.ty));
                    if member.pointer {
                        body.push('*');
                    }
                    body.push(' ');
                    body.push_str(&member.name);
                }
            }
            body.push_str(" = {};\n");
        }
        body.push('\n');

        body.push_str("    MappedType map() const\n    {\n");
        self.push_shared_length_checks(&mut body, classification);
        body.push_str("        MappedType r;\n");
        for member in &members {
            let value = self.mapped_value(member, classification);
            body.push_str(&format!("        r.{} = {};\n", member.name, value));
        }
        body.push_str("        return r;\n");
        body.push_str("    }\n\n");
        body.push_str("    operator MappedType() const { return map(); }\n");
        body.push_str("};\n");
        body.push_str(&protect_end);
        body
    }

    /// Checks and resizes for length members sizing more than one array.
    /// The first array in the relation is authoritative: further read-only
    /// arrays are asserted equal-sized, mutable ones are resized to match.
    fn push_shared_length_checks(&self, body: &mut String, classification: &Classification) {
        for relation in &classification.relations {
            let Some((first, rest)) = relation.arrays.split_first() else {
                continue;
            };
            let first_name = array_field_name(&first.name);
            for other in rest {
                let other_name = array_field_name(&other.name);
                if other.is_const {
                    body.push_str(&format!(
                        "        VKW_ASSERT({other_name}.size() == {first_name}.size());\n"
                    ));
                } else {
                    body.push_str(&format!(
                        "        if ({other_name} && {other_name}->size() != {first_name}.size())\n"
                    ));
                    body.push_str("        {\n");
                    body.push_str(&format!(
                        "            {other_name}->reset({first_name}.size());\n"
                    ));
                    body.push_str("        }\n");
                }
            }
        }
    }

    /// The expression assigned to the raw member in `map()`.
    fn mapped_value(&self, member: &MemberDef, classification: &Classification) -> String {
        if let Some(relation) = classification.relation_for(&member.name) {
            // Length member: derived from the first array it sizes.
            let first = &relation.arrays[0];
            let field = array_field_name(&first.name);
            if first.is_const {
                return format!("{field}.size()");
            }
            return format!("{field} ? {field}->size() : 0");
        }
        if let Some(array) = classification.array_ref(&member.name) {
            let field = array_field_name(&member.name);
            if array.is_const {
                return format!("{field}.data()");
            }
            return format!("{field} ? {field}->data() : nullptr");
        }
        member.name.clone()
    }

    /// Emit a function-pointer typedef for one command.
    pub fn command_pointer(&self, cmd: &CommandDef) -> String {
        format!(
            "typedef {} (*PFN_{})({});",
            cmd.return_type,
            cmd.name,
            self.flat_param_list(cmd)
        )
    }

    /// Emit a command prototype, one parameter per line with names aligned
    /// at the configured column.
    pub fn command_prototype(&self, cmd: &CommandDef) -> String {
        if cmd.params.is_empty() || self.opts.align_func_param == 0 {
            return format!(
                "{} {}({});",
                cmd.return_type,
                cmd.name,
                self.flat_param_list(cmd)
            );
        }

        let mut proto = format!("{} {}(\n", cmd.return_type, cmd.name);
        let last = cmd.params.len() - 1;
        for (i, param) in cmd.params.iter().enumerate() {
            let pad = self
                .opts
                .align_func_param
                .saturating_sub(4 + param.ty.len())
                .max(1);
            proto.push_str("    ");
            proto.push_str(&param.ty);
            proto.push_str(&" ".repeat(pad));
            proto.push_str(&param.name);
            proto.push_str(if i == last { ");" } else { ",\n" });
        }
        proto
    }

    fn flat_param_list(&self, cmd: &CommandDef) -> String {
        if cmd.params.is_empty() {
            // MISRA C requires an explicit void parameter list.
            return if self.opts.misra_c_style() {
                "void".to_string()
            } else {
                String::new()
            };
        }
        cmd.params
            .iter()
            .map(|p| format!("{} {}", p.ty, p.name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::registry::{ParamDef, TypeCategory};

    fn opts() -> GeneratorOptions {
        GeneratorOptions::default()
    }

    fn emit(ty: &TypeDef) -> String {
        let o = opts();
        let classification = classify(ty, &o);
        Emitter::new(&o).wrapper_struct(ty, &classification)
    }

    #[test]
    fn test_type_conversions() {
        assert_eq!(cpp_type_ref("VkBool32"), "bool");
        assert_eq!(cpp_type_ref("VkBuffer"), "vk::Buffer");
        assert_eq!(cpp_type_ref("uint32_t"), "uint32_t");
        assert_eq!(cpp_type_decl("VkBufferCreateInfo"), "BufferCreateInfo");
        assert_eq!(cpp_type_decl("Display"), "Display");
    }

    #[test]
    fn test_array_field_name_strips_pointer_prefix() {
        assert_eq!(array_field_name("pData"), "data");
        assert_eq!(array_field_name("ppEnabledLayerNames"), "enabledLayerNames");
        assert_eq!(array_field_name("priority"), "priority");
        assert_eq!(array_field_name("width"), "width");
    }

    #[test]
    fn test_counted_void_array_wrapper() {
        let ty = TypeDef::new("VkPipelineCacheCreateInfo", TypeCategory::Struct).with_members(vec![
            MemberDef::new("sType", "VkStructureType"),
            MemberDef::new("pNext", "void").with_const_pointer(),
            MemberDef::new("flags", "VkPipelineCacheCreateFlags"),
            MemberDef::new("initialDataSize", "size_t"),
            MemberDef::new("pInitialData", "void")
                .with_const_pointer()
                .with_len("initialDataSize"),
        ]);
        let text = emit(&ty);

        assert!(text.contains("struct PipelineCacheCreateInfo\n{\n"));
        assert!(text.contains("    using MappedType = vk::PipelineCacheCreateInfo;\n"));
        // Scalar copied, length omitted, array renamed and size-checked.
        assert!(text.contains("    vk::PipelineCacheCreateFlags flags = {};\n"));
        assert!(!text.contains("initialDataSize = {};"));
        assert!(text.contains("    Array<std::byte> initialData = {};\n"));
        assert!(text.contains("        r.flags = flags;\n"));
        assert!(text.contains("        r.initialDataSize = initialData.size();\n"));
        assert!(text.contains("        r.pInitialData = initialData.data();\n"));
        // Dispatch members never appear.
        assert!(!text.contains("sType"));
        assert!(!text.contains("pNext"));
        assert!(text.contains("    operator MappedType() const { return map(); }\n"));
    }

    #[test]
    fn test_two_const_arrays_assert_equal_sizes() {
        let ty = TypeDef::new("VkSubmitInfo2", TypeCategory::Struct).with_members(vec![
            MemberDef::new("waitSemaphoreCount", "uint32_t"),
            MemberDef::new("pWaitSemaphores", "VkSemaphore")
                .with_const_pointer()
                .with_len("waitSemaphoreCount"),
            MemberDef::new("pWaitDstStageMask", "VkPipelineStageFlags")
                .with_const_pointer()
                .with_len("waitSemaphoreCount"),
        ]);
        let text = emit(&ty);

        assert!(
            text.contains("        VKW_ASSERT(waitDstStageMask.size() == waitSemaphores.size());\n")
        );
        assert!(!text.contains("reset("));
        assert!(text.contains("        r.waitSemaphoreCount = waitSemaphores.size();\n"));
        assert!(text.contains("        r.pWaitSemaphores = waitSemaphores.data();\n"));
        assert!(text.contains("        r.pWaitDstStageMask = waitDstStageMask.data();\n"));
    }

    #[test]
    fn test_mutable_array_is_resized_not_asserted() {
        let ty = TypeDef::new("VkQueryResults", TypeCategory::Struct).with_members(vec![
            MemberDef::new("queryCount", "uint32_t"),
            MemberDef::new("pQueries", "VkQuery")
                .with_const_pointer()
                .with_len("queryCount"),
            MemberDef::new("pResults", "uint64_t")
                .with_pointer()
                .with_len("queryCount"),
        ]);
        let text = emit(&ty);

        assert!(text.contains("    Array<uint64_t>* results = {};\n"));
        assert!(text.contains("        if (results && results->size() != queries.size())\n"));
        assert!(text.contains("            results->reset(queries.size());\n"));
        assert!(!text.contains("VKW_ASSERT"));
        assert!(text.contains("        r.pResults = results ? results->data() : nullptr;\n"));
    }

    #[test]
    fn test_mutable_first_array_derives_count_through_pointer() {
        let ty = TypeDef::new("VkOutputBuffer", TypeCategory::Struct).with_members(vec![
            MemberDef::new("dataCount", "uint32_t"),
            MemberDef::new("pData", "uint32_t")
                .with_pointer()
                .with_len("dataCount"),
        ]);
        let text = emit(&ty);
        assert!(text.contains("        r.dataCount = data ? data->size() : 0;\n"));
    }

    #[test]
    fn test_platform_protected_struct_is_wrapped() {
        let ty = TypeDef::new("VkWin32SurfaceCreateInfoKHR", TypeCategory::Struct)
            .with_protect("VK_USE_PLATFORM_WIN32_KHR")
            .with_members(vec![
                MemberDef::new("count", "uint32_t"),
                MemberDef::new("pData", "void")
                    .with_const_pointer()
                    .with_len("count"),
            ]);
        let text = emit(&ty);
        assert!(text.starts_with("#ifdef VK_USE_PLATFORM_WIN32_KHR\n"));
        assert!(text.ends_with("#endif // VK_USE_PLATFORM_WIN32_KHR\n"));
    }

    #[test]
    fn test_command_pointer_typedef() {
        let o = opts();
        let emitter = Emitter::new(&o);
        let cmd = CommandDef {
            name: "vkDestroyBuffer".to_string(),
            return_type: "void".to_string(),
            params: vec![
                ParamDef::new("VkDevice", "device"),
                ParamDef::new("VkBuffer", "buffer"),
            ],
            alias: None,
        };
        assert_eq!(
            emitter.command_pointer(&cmd),
            "typedef void (*PFN_vkDestroyBuffer)(VkDevice device, VkBuffer buffer);"
        );
    }

    #[test]
    fn test_command_prototype_aligns_parameter_names() {
        let o = opts();
        let emitter = Emitter::new(&o);
        let cmd = CommandDef {
            name: "vkCreateBuffer".to_string(),
            return_type: "VkResult".to_string(),
            params: vec![
                ParamDef::new("VkDevice", "device"),
                ParamDef::new("const VkBufferCreateInfo*", "pCreateInfo"),
            ],
            alias: None,
        };
        let proto = emitter.command_prototype(&cmd);
        let lines: Vec<&str> = proto.lines().collect();
        assert_eq!(lines[0], "VkResult vkCreateBuffer(");
        // Both parameter names start at the configured column.
        assert_eq!(lines[1].find("device"), Some(48));
        assert_eq!(lines[2].find("pCreateInfo"), Some(48));
        assert!(proto.ends_with(");"));
    }

    #[test]
    fn test_empty_parameter_list_misra_c() {
        let cmd = CommandDef {
            name: "vkNop".to_string(),
            return_type: "void".to_string(),
            params: Vec::new(),
            alias: None,
        };

        let o = opts();
        assert_eq!(Emitter::new(&o).command_prototype(&cmd), "void vkNop();");

        let misra = GeneratorOptions {
            misra_c_style: true,
            ..GeneratorOptions::default()
        };
        assert_eq!(
            Emitter::new(&misra).command_prototype(&cmd),
            "void vkNop(void);"
        );
    }
}
