//! Feature assembler.
//!
//! Flushes a feature's accumulated sections into the output stream inside
//! correctly nested conditional-compilation guards, and renders the file
//! frame around all features. Guard regions always close in exact reverse
//! order of opening.

use crate::error::{GenResult, GenerateError};
use crate::options::{GeneratorOptions, GuardDirective};
use crate::sections::{Section, SectionSet};

/// One feature's worth of accumulated output, ready to flush.
#[derive(Debug)]
pub struct FeatureBlock<'a> {
    /// Feature name, doubling as its guard token.
    pub name: &'a str,
    /// Platform protection symbols for the whole feature.
    pub protect: Option<&'a str>,
    /// Core API version rather than an extension.
    pub is_core: bool,
    /// The feature's section buffers.
    pub sections: SectionSet,
}

/// Build the begin/end lines for a platform protection region.
///
/// A single symbol tests with `#ifdef`; a comma-separated list becomes a
/// conjunction of `defined(...)` tests.
pub fn protect_guard(protect: Option<&str>) -> (String, String) {
    let Some(protect) = protect else {
        return (String::new(), String::new());
    };
    if protect.contains(',') {
        let tests: Vec<String> = protect
            .split(',')
            .map(|sym| format!("defined({sym})"))
            .collect();
        let expr = tests.join(" && ");
        (format!("#if {expr}\n"), format!("#endif // {expr}\n"))
    } else {
        (
            format!("#ifdef {protect}\n"),
            format!("#endif // {protect}\n"),
        )
    }
}

/// Check that every configured guard has both a directive and a symbol.
/// Called before generation starts so a bad configuration never produces
/// partial output.
pub fn validate_guard_options(opts: &GeneratorOptions) -> GenResult<()> {
    guard_pair(opts.proto_directive, opts.proto_symbol.as_deref(), "prototype")?;
    guard_pair(
        opts.extension_proto_directive,
        opts.extension_proto_symbol.as_deref(),
        "extension-prototype",
    )?;
    Ok(())
}

fn guard_pair<'a>(
    directive: Option<GuardDirective>,
    symbol: Option<&'a str>,
    which: &'static str,
) -> GenResult<Option<(GuardDirective, &'a str)>> {
    match (directive, symbol) {
        (Some(directive), Some(symbol)) => Ok(Some((directive, symbol))),
        (None, None) => Ok(None),
        _ => Err(GenerateError::GuardMismatch(which)),
    }
}

/// Flush one feature into the output stream.
///
/// A feature whose sections are all empty emits nothing, even though it was
/// selected for generation.
pub fn assemble_feature(
    block: &FeatureBlock<'_>,
    opts: &GeneratorOptions,
    out: &mut String,
) -> GenResult<()> {
    if block.sections.is_empty() {
        return Ok(());
    }

    let proto = guard_pair(opts.proto_directive, opts.proto_symbol.as_deref(), "prototype")?;
    let extension_proto = guard_pair(
        opts.extension_proto_directive,
        opts.extension_proto_symbol.as_deref(),
        "extension-prototype",
    )?;

    out.push('\n');
    if opts.protect_feature {
        out.push_str(&format!("#ifdef {}\n", block.name));
    }
    let (protect_begin, protect_end) = protect_guard(block.protect);
    out.push_str(&protect_begin);

    for section in Section::TYPE_FLUSH_ORDER {
        let contents = block.sections.contents(section);
        if !contents.is_empty() {
            out.push_str(&contents.join("\n"));
            out.push('\n');
        }
    }

    if opts.gen_func_pointers {
        let pointers = block.sections.contents(Section::CommandPointer);
        if !pointers.is_empty() {
            out.push_str(&pointers.join("\n"));
            out.push_str("\n\n");
        }
    }

    let commands = block.sections.contents(Section::Command);
    if !commands.is_empty() {
        // The extension guard only applies to extensions and must nest
        // inside the prototype guard.
        let inner = if block.is_core { None } else { extension_proto };
        if let Some((directive, symbol)) = proto {
            out.push_str(&format!("{} {symbol}\n", directive.open()));
        }
        if let Some((directive, symbol)) = inner {
            out.push_str(&format!("{} {symbol}\n", directive.open()));
        }
        out.push_str(&commands.join("\n"));
        out.push('\n');
        if let Some((directive, symbol)) = inner {
            out.push_str(&format!("#endif{}\n", directive.end_comment(symbol)));
        }
        if let Some((directive, symbol)) = proto {
            out.push_str(&format!("#endif{}\n", directive.end_comment(symbol)));
        }
    }

    out.push_str(&protect_end);
    if opts.protect_feature {
        out.push_str(&format!("#endif /* {} */\n", block.name));
    }
    Ok(())
}

/// Render the opening file frame: inclusion guard, support include, prefix
/// text, namespace.
pub fn begin_file(opts: &GeneratorOptions) -> String {
    let mut out = String::new();
    if opts.protect_file {
        if let Some(filename) = &opts.filename {
            let symbol = inclusion_guard_symbol(filename);
            out.push_str(&format!("#ifndef {symbol}\n#define {symbol}\n\n"));
        }
    }
    out.push_str("#include \"vkwrap_utils.hpp\"\n");
    if !opts.prefix_text.is_empty() {
        out.push('\n');
        for line in &opts.prefix_text {
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push_str("\nnamespace vkw {\n");
    out
}

/// Render the closing file frame.
pub fn end_file(opts: &GeneratorOptions) -> String {
    let mut out = String::from("\n}\n");
    if opts.protect_file && opts.filename.is_some() {
        out.push_str("\n#endif\n");
    }
    out
}

fn inclusion_guard_symbol(filename: &str) -> String {
    format!("{}_", filename.replace('.', "_").to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block<'a>(name: &'a str, is_core: bool, sections: SectionSet) -> FeatureBlock<'a> {
        FeatureBlock {
            name,
            protect: None,
            is_core,
            sections,
        }
    }

    #[test]
    fn test_empty_feature_emits_nothing() {
        let mut out = String::new();
        let b = block("VK_KHR_swapchain", false, SectionSet::new());
        assemble_feature(&b, &GeneratorOptions::default(), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_feature_guard_wraps_struct_section() {
        let mut sections = SectionSet::new();
        sections.append(Section::Struct, "struct A\n{\n};\n");
        let b = block("VK_VERSION_1_0", true, sections);

        let mut out = String::new();
        assemble_feature(&b, &GeneratorOptions::default(), &mut out).unwrap();

        assert!(out.starts_with("\n#ifdef VK_VERSION_1_0\n"));
        assert!(out.contains("struct A"));
        assert!(out.ends_with("#endif /* VK_VERSION_1_0 */\n"));
    }

    #[test]
    fn test_protect_feature_disabled_drops_guard() {
        let mut sections = SectionSet::new();
        sections.append(Section::Struct, "struct A\n{\n};\n");
        let b = block("VK_VERSION_1_0", true, sections);

        let opts = GeneratorOptions {
            protect_feature: false,
            ..GeneratorOptions::default()
        };
        let mut out = String::new();
        assemble_feature(&b, &opts, &mut out).unwrap();
        assert!(!out.contains("#ifdef VK_VERSION_1_0"));
        assert!(out.contains("struct A"));
    }

    fn proto_opts() -> GeneratorOptions {
        GeneratorOptions {
            proto_directive: Some(GuardDirective::Ifndef),
            proto_symbol: Some("VK_NO_PROTOTYPES".to_string()),
            extension_proto_directive: Some(GuardDirective::Ifdef),
            extension_proto_symbol: Some("VK_ENABLE_EXTENSION_PROTOTYPES".to_string()),
            ..GeneratorOptions::default()
        }
    }

    #[test]
    fn test_extension_commands_nest_both_guards_in_reverse_order() {
        let mut sections = SectionSet::new();
        sections.append(Section::Command, "VkResult vkAcquireNextImageKHR();");
        let b = block("VK_KHR_swapchain", false, sections);

        let mut out = String::new();
        assemble_feature(&b, &proto_opts(), &mut out).unwrap();

        let outer_open = out.find("#ifndef VK_NO_PROTOTYPES").unwrap();
        let inner_open = out.find("#ifdef VK_ENABLE_EXTENSION_PROTOTYPES").unwrap();
        let inner_close = out
            .find("#endif /* VK_ENABLE_EXTENSION_PROTOTYPES */")
            .unwrap();
        let outer_close = out.find("#endif /* !VK_NO_PROTOTYPES */").unwrap();
        assert!(outer_open < inner_open);
        assert!(inner_open < inner_close);
        assert!(inner_close < outer_close);
    }

    #[test]
    fn test_core_commands_skip_extension_guard() {
        let mut sections = SectionSet::new();
        sections.append(Section::Command, "VkResult vkCreateBuffer();");
        let b = block("VK_VERSION_1_0", true, sections);

        let mut out = String::new();
        assemble_feature(&b, &proto_opts(), &mut out).unwrap();

        assert!(out.contains("#ifndef VK_NO_PROTOTYPES"));
        assert!(!out.contains("VK_ENABLE_EXTENSION_PROTOTYPES"));
    }

    #[test]
    fn test_guard_directive_without_symbol_is_fatal() {
        let opts = GeneratorOptions {
            proto_directive: Some(GuardDirective::Ifndef),
            proto_symbol: None,
            ..GeneratorOptions::default()
        };
        assert!(matches!(
            validate_guard_options(&opts),
            Err(GenerateError::GuardMismatch("prototype"))
        ));

        let opts = GeneratorOptions {
            extension_proto_symbol: Some("SYM".to_string()),
            ..GeneratorOptions::default()
        };
        assert!(matches!(
            validate_guard_options(&opts),
            Err(GenerateError::GuardMismatch("extension-prototype"))
        ));
    }

    #[test]
    fn test_command_pointers_respect_gen_func_pointers() {
        let mut sections = SectionSet::new();
        sections.append(Section::CommandPointer, "typedef void (*PFN_vkNop)();");
        let b = block("VK_VERSION_1_0", true, sections);

        let opts = GeneratorOptions {
            gen_func_pointers: false,
            ..GeneratorOptions::default()
        };
        let mut out = String::new();
        assemble_feature(&b, &opts, &mut out).unwrap();
        assert!(!out.contains("PFN_vkNop"));
    }

    #[test]
    fn test_multi_symbol_protect_conjoins_defined_tests() {
        let (begin, end) = protect_guard(Some("VK_USE_PLATFORM_XLIB_KHR,VK_USE_PLATFORM_XLIB_XRANDR_EXT"));
        assert_eq!(
            begin,
            "#if defined(VK_USE_PLATFORM_XLIB_KHR) && defined(VK_USE_PLATFORM_XLIB_XRANDR_EXT)\n"
        );
        assert_eq!(
            end,
            "#endif // defined(VK_USE_PLATFORM_XLIB_KHR) && defined(VK_USE_PLATFORM_XLIB_XRANDR_EXT)\n"
        );
    }

    #[test]
    fn test_feature_platform_guard_nests_inside_feature_guard() {
        let mut sections = SectionSet::new();
        sections.append(Section::Struct, "struct A\n{\n};\n");
        let b = FeatureBlock {
            name: "VK_KHR_win32_surface",
            protect: Some("VK_USE_PLATFORM_WIN32_KHR"),
            is_core: false,
            sections,
        };

        let mut out = String::new();
        assemble_feature(&b, &GeneratorOptions::default(), &mut out).unwrap();

        let feature_open = out.find("#ifdef VK_KHR_win32_surface").unwrap();
        let platform_open = out.find("#ifdef VK_USE_PLATFORM_WIN32_KHR").unwrap();
        let platform_close = out.find("#endif // VK_USE_PLATFORM_WIN32_KHR").unwrap();
        let feature_close = out.find("#endif /* VK_KHR_win32_surface */").unwrap();
        assert!(feature_open < platform_open);
        assert!(platform_open < platform_close);
        assert!(platform_close < feature_close);
    }

    #[test]
    fn test_file_frame() {
        let opts = GeneratorOptions {
            prefix_text: vec!["// generated header".to_string()],
            ..GeneratorOptions::default()
        };
        let begin = begin_file(&opts);
        assert!(begin.starts_with("#ifndef VKWRAP_HPP_\n#define VKWRAP_HPP_\n\n"));
        assert!(begin.contains("#include \"vkwrap_utils.hpp\"\n"));
        assert!(begin.contains("// generated header\n"));
        assert!(begin.ends_with("namespace vkw {\n"));

        let end = end_file(&opts);
        assert!(end.starts_with("\n}\n"));
        assert!(end.ends_with("#endif\n"));
    }

    #[test]
    fn test_file_frame_without_protection() {
        let opts = GeneratorOptions {
            protect_file: false,
            ..GeneratorOptions::default()
        };
        assert!(!begin_file(&opts).contains("#ifndef"));
        assert!(!end_file(&opts).contains("#endif"));
    }
}
