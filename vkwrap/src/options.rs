//! Generator options.
//!
//! The recognized knobs for one generation target. The CLI builds this from
//! its TOML configuration; library users fill it directly.

/// Preprocessor directive used to open an optional guard region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDirective {
    /// Opt-in guard: the region compiles only when the symbol is defined.
    Ifdef,
    /// Opt-out guard: the region compiles unless the symbol is defined.
    Ifndef,
}

impl GuardDirective {
    /// The directive text, e.g. `#ifdef`.
    pub fn open(self) -> &'static str {
        match self {
            GuardDirective::Ifdef => "#ifdef",
            GuardDirective::Ifndef => "#ifndef",
        }
    }

    /// Comment placed after the matching `#endif`, e.g. `/* SYM */` for an
    /// opt-in guard and `/* !SYM */` for an opt-out guard.
    pub fn end_comment(self, symbol: &str) -> String {
        match self {
            GuardDirective::Ifdef => format!(" /* {symbol} */"),
            GuardDirective::Ifndef => format!(" /* !{symbol} */"),
        }
    }
}

/// Options for one generation target.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Output filename, used to derive the multiple-inclusion guard symbol.
    pub filename: Option<String>,

    /// Literal lines prepended verbatim after the support include.
    pub prefix_text: Vec<String>,

    /// Wrap the whole output in a multiple-inclusion guard.
    pub protect_file: bool,

    /// Wrap each feature's emission in its own `#ifdef` guard.
    pub protect_feature: bool,

    /// Include function-pointer typedefs in the output.
    pub gen_func_pointers: bool,

    /// Column at which trailing parameter names are aligned in command
    /// prototypes. Zero keeps the whole prototype on one line.
    pub align_func_param: usize,

    /// MISRA C formatting conventions.
    pub misra_c_style: bool,

    /// MISRA C++ formatting conventions.
    pub misra_cpp_style: bool,

    /// Guard around command prototypes. Directive and symbol must be set
    /// together; a lone half is rejected before generation starts.
    pub proto_directive: Option<GuardDirective>,
    /// Symbol for the prototype guard.
    pub proto_symbol: Option<String>,

    /// Extra guard around extension (non-core) command prototypes, nested
    /// inside the prototype guard.
    pub extension_proto_directive: Option<GuardDirective>,
    /// Symbol for the extension prototype guard.
    pub extension_proto_symbol: Option<String>,

    /// Structs exempt from the no-auto-validity complexity rule: shapes
    /// known to generate correctly even though the registry cannot state
    /// validity rules for every member.
    pub auto_generateable: Vec<String>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            filename: Some("vkwrap.hpp".to_string()),
            prefix_text: Vec::new(),
            protect_file: true,
            protect_feature: true,
            gen_func_pointers: true,
            align_func_param: 48,
            misra_c_style: false,
            misra_cpp_style: false,
            proto_directive: None,
            proto_symbol: None,
            extension_proto_directive: None,
            extension_proto_symbol: None,
            auto_generateable: vec!["VkBufferCreateInfo".to_string()],
        }
    }
}

impl GeneratorOptions {
    /// Whether MISRA C conventions are requested.
    pub fn misra_c_style(&self) -> bool {
        self.misra_c_style
    }

    /// Whether MISRA C++ conventions are requested.
    pub fn misra_cpp_style(&self) -> bool {
        self.misra_cpp_style
    }

    /// Whether the given struct is exempt from the no-auto-validity rule.
    pub fn is_auto_generateable(&self, name: &str) -> bool {
        self.auto_generateable.iter().any(|s| s == name)
    }
}
