//! Configuration resolution and loading.
//!
//! [`resolve`] turns a [`PartialConfiguration`] into a complete
//! [`Configuration`] by filling defaults. [`ConfigLoader`] finds and loads a
//! configuration module from disk through a [`ModuleLoader`], then resolves it.

mod loader;
mod module;
mod types;

pub use loader::{CONFIG_CANDIDATES, ConfigLoader, LoadOptions, LoadedConfig, find_config_file};
pub use module::{ModuleLoader, NodeModuleLoader, StaticModuleLoader};
pub use types::{
    BuildConfig, CONFIG_SHAPE, Configuration, DEFAULT_MAIN_ENTRY, ES_TARGETS, EntriesConfig,
    EsTarget, PartialBuild, PartialConfiguration, PartialEntries, PartialValidation,
    ValidationConfig, parse_size,
};

/// Merges a partial configuration over the defaults.
///
/// Merging happens per section: a section that is present replaces the default
/// field-by-field, a missing section is taken whole from the defaults. Never fails.
pub fn resolve(partial: PartialConfiguration) -> Configuration {
    let defaults = Configuration::default();

    let entries = match partial.entries {
        Some(entries) => EntriesConfig {
            main: entries.main.unwrap_or(defaults.entries.main),
            pre: entries.pre,
            post: entries.post,
        },
        None => defaults.entries,
    };

    let build = match partial.build {
        Some(build) => BuildConfig {
            minify: build.minify.unwrap_or(defaults.build.minify),
            target: build.target.unwrap_or(defaults.build.target),
            source_map: build.source_map.unwrap_or(defaults.build.source_map),
            externals: build.externals.unwrap_or(defaults.build.externals),
            quiet: build.quiet.unwrap_or(defaults.build.quiet),
        },
        None => defaults.build,
    };

    let validation = match partial.validation {
        Some(validation) => ValidationConfig {
            require_action_yml: validation
                .require_action_yml
                .unwrap_or(defaults.validation.require_action_yml),
            max_bundle_size: validation.max_bundle_size,
            strict: validation.strict,
        },
        None => defaults.validation,
    };

    Configuration {
        entries,
        build,
        validation,
    }
}
