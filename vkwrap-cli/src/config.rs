//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `vkwrap.toml` files and
//! merging with command-line arguments, then lowering the result into the
//! core generator's options.

use crate::error::{CliResult, ConfigError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use vkwrap::{GeneratorOptions, GuardDirective};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "vkwrap.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output configuration.
    pub output: OutputConfig,

    /// Generator knobs.
    pub generator: GeneratorConfig,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory for generated files.
    pub dir: PathBuf,

    /// Generated header filename.
    pub file: String,

    /// Whether to write the companion support header next to the output.
    pub emit_support_header: bool,
}

/// Generator configuration, lowered into [`GeneratorOptions`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Wrap the whole output in a multiple-inclusion guard.
    pub protect_file: bool,

    /// Wrap each feature's emission in its own guard.
    pub protect_feature: bool,

    /// Include function-pointer typedefs in the output.
    pub gen_func_pointers: bool,

    /// Column at which trailing parameter names are aligned.
    pub align_func_param: usize,

    /// MISRA C formatting conventions.
    pub misra_c_style: bool,

    /// MISRA C++ formatting conventions.
    pub misra_cpp_style: bool,

    /// Literal lines prepended verbatim to the output.
    pub prefix_text: Vec<String>,

    /// Prototype guard directive: `ifdef` or `ifndef`.
    pub proto_directive: Option<String>,

    /// Prototype guard symbol.
    pub proto_symbol: Option<String>,

    /// Extension prototype guard directive: `ifdef` or `ifndef`.
    pub extension_proto_directive: Option<String>,

    /// Extension prototype guard symbol.
    pub extension_proto_symbol: Option<String>,

    /// Structs exempt from the no-auto-validity complexity rule.
    pub auto_generateable: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./generated"),
            file: "vkwrap.hpp".to_string(),
            emit_support_header: true,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let core = GeneratorOptions::default();
        Self {
            protect_file: core.protect_file,
            protect_feature: core.protect_feature,
            gen_func_pointers: core.gen_func_pointers,
            align_func_param: core.align_func_param,
            misra_c_style: core.misra_c_style,
            misra_cpp_style: core.misra_cpp_style,
            prefix_text: Vec::new(),
            proto_directive: None,
            proto_symbol: None,
            extension_proto_directive: None,
            extension_proto_symbol: None,
            auto_generateable: core.auto_generateable,
        }
    }
}

impl Config {
    /// Lower this configuration into the core generator's options.
    pub fn generator_options(&self) -> Result<GeneratorOptions, ConfigError> {
        let g = &self.generator;
        Ok(GeneratorOptions {
            filename: Some(self.output.file.clone()),
            prefix_text: g.prefix_text.clone(),
            protect_file: g.protect_file,
            protect_feature: g.protect_feature,
            gen_func_pointers: g.gen_func_pointers,
            align_func_param: g.align_func_param,
            misra_c_style: g.misra_c_style,
            misra_cpp_style: g.misra_cpp_style,
            proto_directive: parse_directive(g.proto_directive.as_deref(), "proto_directive")?,
            proto_symbol: g.proto_symbol.clone(),
            extension_proto_directive: parse_directive(
                g.extension_proto_directive.as_deref(),
                "extension_proto_directive",
            )?,
            extension_proto_symbol: g.extension_proto_symbol.clone(),
            auto_generateable: g.auto_generateable.clone(),
        })
    }

    /// Full path of the generated header.
    pub fn output_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.file)
    }
}

fn parse_directive(
    value: Option<&str>,
    key: &str,
) -> Result<Option<GuardDirective>, ConfigError> {
    match value {
        None => Ok(None),
        Some("ifdef") => Ok(Some(GuardDirective::Ifdef)),
        Some("ifndef") => Ok(Some(GuardDirective::Ifndef)),
        Some(other) => Err(ConfigError::invalid_value(
            key,
            format!("expected 'ifdef' or 'ifndef', got '{other}'"),
        )),
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// An explicitly given path must exist. When no path is given, the
    /// default location is tried and missing-file falls back to defaults.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let (config_path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(CONFIG_FILENAME), false),
        };

        if !config_path.exists() {
            if explicit {
                return Err(ConfigError::not_found(config_path).into());
            }
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path, e.to_string()))?;

        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref output) = args.output {
            config.output.dir = output.clone();
        }

        if let Some(ref file) = args.output_file {
            config.output.file = file.clone();
        }

        if let Some(protect) = args.protect {
            config.generator.protect_file = protect;
        }

        config
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# vkwrap configuration file

[output]
# Output directory for generated headers
dir = "./generated"

# Generated header file name
file = "vkwrap.hpp"

# Write the companion support header (Array<T>, assertion macro) next to
# the generated header
emit_support_header = true

[generator]
# Wrap the whole output in a multiple-inclusion guard
protect_file = true

# Wrap each feature's emission in its own #ifdef guard
protect_feature = true

# Include function-pointer typedefs in the output
gen_func_pointers = true

# Column at which trailing parameter names are aligned in prototypes
align_func_param = 48

# Alternate formatting/safety conventions
misra_c_style = false
misra_cpp_style = false

# Literal lines prepended verbatim to the output
prefix_text = []

# Guard around command prototypes ("ifdef" requires opt-in, "ifndef"
# requires opt-out). Directive and symbol must be set together.
# proto_directive = "ifndef"
# proto_symbol = "VK_NO_PROTOTYPES"

# Extra guard around extension command prototypes, nested inside the
# prototype guard
# extension_proto_directive = "ifdef"
# extension_proto_symbol = "VK_ENABLE_EXTENSION_PROTOTYPES"

# Structs exempt from the no-auto-validity complexity rule
auto_generateable = ["VkBufferCreateInfo"]
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Output directory override.
    pub output: Option<PathBuf>,

    /// Output filename override.
    pub output_file: Option<String>,

    /// Multiple-inclusion protection override.
    pub protect: Option<bool>,
}
