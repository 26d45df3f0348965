//! Rendering of `bunup.config.ts`
//!
//! Pure string templating: the same [`InitConfig`] always produces the same
//! text, so the output is checked against golden strings in the tests.

use std::fmt::{self, Write as _};

/// File name of the generated configuration, relative to the project root
pub const CONFIG_FILE: &str = "bunup.config.ts";

/// Output formats bunup can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Esm,
    Cjs,
    Iife,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Esm, Format::Cjs, Format::Iife];

    /// Pre-checked in the format prompt
    pub const DEFAULT: [Format; 2] = [Format::Esm, Format::Cjs];

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Esm => "esm",
            Format::Cjs => "cjs",
            Format::Iife => "iife",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Format::Esm => "ECMAScript modules",
            Format::Cjs => "CommonJS",
            Format::Iife => "Browser script (IIFE)",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Productivity plugins shipped in `bunup/plugins`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plugin {
    Exports,
    Unused,
}

impl Plugin {
    pub const ALL: [Plugin; 2] = [Plugin::Exports, Plugin::Unused];

    /// Pre-checked in the plugin prompt
    pub const DEFAULT: [Plugin; 1] = [Plugin::Exports];

    /// Import name, also the factory function name
    pub fn ident(&self) -> &'static str {
        match self {
            Plugin::Exports => "exports",
            Plugin::Unused => "unused",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Plugin::Exports => "Keep package.json exports in sync with build output",
            Plugin::Unused => "Report dependencies that are never imported",
        }
    }
}

impl fmt::Display for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ident())
    }
}

/// One package of a workspace configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspacePackageSpec {
    pub name: String,
    /// Package root, relative to the project root
    pub root: String,
    /// Entry files, relative to `root`
    pub entries: Vec<String>,
    pub formats: Vec<Format>,
}

/// Shape of the configuration being generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildLayout {
    Single {
        entries: Vec<String>,
        formats: Vec<Format>,
    },
    Workspace {
        packages: Vec<WorkspacePackageSpec>,
    },
}

impl BuildLayout {
    pub fn is_workspace(&self) -> bool {
        matches!(self, BuildLayout::Workspace { .. })
    }
}

/// Everything the init flow collected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitConfig {
    pub layout: BuildLayout,
    pub plugins: Vec<Plugin>,
}

/// Quote a value as a single-quoted TypeScript string literal
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn string_array<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    let items: Vec<String> = values.into_iter().map(quote).collect();
    format!("[{}]", items.join(", "))
}

fn plugin_calls(plugins: &[Plugin]) -> String {
    let calls: Vec<String> = plugins.iter().map(|p| format!("{}()", p.ident())).collect();
    format!("[{}]", calls.join(", "))
}

/// Render the full configuration file
pub fn render_config(config: &InitConfig) -> String {
    let mut out = String::new();
    let define = if config.layout.is_workspace() {
        "defineWorkspace"
    } else {
        "defineConfig"
    };

    let _ = writeln!(out, "import {{ {} }} from 'bunup';", define);
    if !config.plugins.is_empty() {
        let names: Vec<&str> = config.plugins.iter().map(Plugin::ident).collect();
        let _ = writeln!(out, "import {{ {} }} from 'bunup/plugins';", names.join(", "));
    }
    out.push('\n');

    match &config.layout {
        BuildLayout::Single { entries, formats } => {
            out.push_str("export default defineConfig({\n");
            let _ = writeln!(out, "\tentry: {},", string_array(entries.iter().map(String::as_str)));
            let _ = writeln!(out, "\tformat: {},", string_array(formats.iter().map(Format::as_str)));
            if !config.plugins.is_empty() {
                let _ = writeln!(out, "\tplugins: {},", plugin_calls(&config.plugins));
            }
            out.push_str("});\n");
        }
        BuildLayout::Workspace { packages } => {
            out.push_str("export default defineWorkspace([\n");
            for package in packages {
                out.push_str("\t{\n");
                let _ = writeln!(out, "\t\tname: {},", quote(&package.name));
                let _ = writeln!(out, "\t\troot: {},", quote(&package.root));
                out.push_str("\t\tconfig: {\n");
                let _ = writeln!(
                    out,
                    "\t\t\tentry: {},",
                    string_array(package.entries.iter().map(String::as_str))
                );
                let _ = writeln!(
                    out,
                    "\t\t\tformat: {},",
                    string_array(package.formats.iter().map(Format::as_str))
                );
                out.push_str("\t\t},\n");
                out.push_str("\t},\n");
            }
            if config.plugins.is_empty() {
                out.push_str("]);\n");
            } else {
                out.push_str("], {\n");
                let _ = writeln!(out, "\tplugins: {},", plugin_calls(&config.plugins));
                out.push_str("});\n");
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(plugins: Vec<Plugin>) -> InitConfig {
        InitConfig {
            layout: BuildLayout::Single {
                entries: vec!["src/index.ts".to_string()],
                formats: vec![Format::Esm, Format::Cjs],
            },
            plugins,
        }
    }

    fn workspace(plugins: Vec<Plugin>) -> InitConfig {
        InitConfig {
            layout: BuildLayout::Workspace {
                packages: vec![
                    WorkspacePackageSpec {
                        name: "core".to_string(),
                        root: "packages/core".to_string(),
                        entries: vec!["src/index.ts".to_string(), "src/cli.ts".to_string()],
                        formats: vec![Format::Esm, Format::Cjs],
                    },
                    WorkspacePackageSpec {
                        name: "browser".to_string(),
                        root: "packages/browser".to_string(),
                        entries: vec!["src/index.ts".to_string()],
                        formats: vec![Format::Iife],
                    },
                ],
            },
            plugins,
        }
    }

    #[test]
    fn test_single_without_plugins() {
        let expected = "\
import { defineConfig } from 'bunup';

export default defineConfig({
\tentry: ['src/index.ts'],
\tformat: ['esm', 'cjs'],
});
";
        let rendered = render_config(&single(vec![]));
        assert_eq!(rendered, expected);
        assert!(!rendered.contains("plugins"));
    }

    #[test]
    fn test_single_with_plugin() {
        let expected = "\
import { defineConfig } from 'bunup';
import { exports } from 'bunup/plugins';

export default defineConfig({
\tentry: ['src/index.ts'],
\tformat: ['esm', 'cjs'],
\tplugins: [exports()],
});
";
        assert_eq!(render_config(&single(vec![Plugin::Exports])), expected);
    }

    #[test]
    fn test_workspace_without_plugins() {
        let expected = "\
import { defineWorkspace } from 'bunup';

export default defineWorkspace([
\t{
\t\tname: 'core',
\t\troot: 'packages/core',
\t\tconfig: {
\t\t\tentry: ['src/index.ts', 'src/cli.ts'],
\t\t\tformat: ['esm', 'cjs'],
\t\t},
\t},
\t{
\t\tname: 'browser',
\t\troot: 'packages/browser',
\t\tconfig: {
\t\t\tentry: ['src/index.ts'],
\t\t\tformat: ['iife'],
\t\t},
\t},
]);
";
        assert_eq!(render_config(&workspace(vec![])), expected);
    }

    #[test]
    fn test_workspace_with_plugins_has_shared_block() {
        let rendered = render_config(&workspace(vec![Plugin::Exports, Plugin::Unused]));
        assert!(rendered.starts_with(
            "import { defineWorkspace } from 'bunup';\nimport { exports, unused } from 'bunup/plugins';\n"
        ));
        assert!(rendered.ends_with("], {\n\tplugins: [exports(), unused()],\n});\n"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let config = workspace(vec![Plugin::Unused]);
        assert_eq!(render_config(&config), render_config(&config));
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("it's"), "'it\\'s'");
        assert_eq!(quote("a\\b"), "'a\\\\b'");
    }
}
