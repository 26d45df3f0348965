//! Static template descriptors and template directory resolution

use clap::ValueEnum;
use std::fmt;

/// Template families offered by the create flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum TemplateKind {
    LibraryTypescript,
    LibraryReact,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 2] = [TemplateKind::LibraryTypescript, TemplateKind::LibraryReact];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::LibraryTypescript => "library-typescript",
            TemplateKind::LibraryReact => "library-react",
        }
    }

    /// The static descriptor for this template family
    pub fn descriptor(&self) -> &'static TemplateDescriptor {
        match self {
            TemplateKind::LibraryTypescript => &TYPESCRIPT_LIBRARY,
            TemplateKind::LibraryReact => &REACT_LIBRARY,
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named flavor of a template
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum Variant {
    /// Minimal setup
    Basic,
    /// Publish-ready setup (tests, CI, release tooling)
    #[default]
    Full,
}

impl Variant {
    pub fn display_name(&self) -> &'static str {
        match self {
            Variant::Basic => "Basic",
            Variant::Full => "Full",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Source directories per variant. `full` is mandatory, `basic` is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantMap {
    pub full: &'static str,
    pub basic: Option<&'static str>,
}

impl VariantMap {
    /// Directory for `variant`, degrading to `full` when the variant is not offered
    pub fn get(&self, variant: Variant) -> &'static str {
        match variant {
            Variant::Basic => self.basic.unwrap_or(self.full),
            Variant::Full => self.full,
        }
    }
}

/// Literal placeholder tokens present in a template's source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholders {
    pub github_username: &'static str,
    pub github_repo: &'static str,
    pub project_name: &'static str,
    pub monorepo_first_package: &'static str,
}

/// Static metadata describing one scaffold template family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDescriptor {
    pub kind: TemplateKind,
    pub name: &'static str,
    pub description: &'static str,
    pub default_project_name: &'static str,
    pub variants: VariantMap,
    pub monorepo: Option<VariantMap>,
    pub placeholders: Placeholders,
}

impl TemplateDescriptor {
    /// Whether the user gets to choose between variants
    pub fn offers_basic(&self) -> bool {
        self.variants.basic.is_some()
    }

    pub fn supports_monorepo(&self) -> bool {
        self.monorepo.is_some()
    }

    /// Resolve the template subdirectory for the user's answers.
    ///
    /// The monorepo map is only consulted when one exists; unsupported
    /// variants fall back to `full` within whichever map is used.
    pub fn resolve_directory(&self, variant: Variant, monorepo: bool) -> &'static str {
        match (monorepo, &self.monorepo) {
            (true, Some(map)) => map.get(variant),
            _ => self.variants.get(variant),
        }
    }
}

const DEFAULT_PLACEHOLDERS: Placeholders = Placeholders {
    github_username: "placeholder-username",
    github_repo: "placeholder-repo-name",
    project_name: "placeholder-project-name",
    monorepo_first_package: "placeholder-package-1",
};

static TYPESCRIPT_LIBRARY: TemplateDescriptor = TemplateDescriptor {
    kind: TemplateKind::LibraryTypescript,
    name: "TypeScript Library",
    description: "A TypeScript library bundled with bunup",
    default_project_name: "my-ts-lib",
    variants: VariantMap {
        full: "templates/ts-lib",
        basic: Some("templates/ts-lib-basic"),
    },
    monorepo: Some(VariantMap {
        full: "templates/ts-lib-monorepo",
        basic: None,
    }),
    placeholders: DEFAULT_PLACEHOLDERS,
};

static REACT_LIBRARY: TemplateDescriptor = TemplateDescriptor {
    kind: TemplateKind::LibraryReact,
    name: "React Library",
    description: "A React component library bundled with bunup",
    default_project_name: "my-react-lib",
    variants: VariantMap {
        full: "templates/react-lib",
        basic: None,
    },
    monorepo: None,
    placeholders: DEFAULT_PLACEHOLDERS,
};

/// All descriptors in the order they are offered
pub fn descriptors() -> impl Iterator<Item = &'static TemplateDescriptor> {
    TemplateKind::ALL.into_iter().map(|kind| kind.descriptor())
}
