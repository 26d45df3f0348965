//! Create flow: scaffold a new library from a template

use crate::templates::descriptor::{TemplateDescriptor, TemplateKind, Variant};
use crate::templates::fetcher::TemplateFetcher;
use crate::templates::replace::{self, ProjectIdentity};
use crate::validate;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project name; prompted when missing or invalid
    pub project_name: Option<String>,

    /// Template kind; prompted when missing
    pub template: Option<TemplateKind>,

    /// Template variant; prompted when missing and the template offers one
    pub variant: Option<Variant>,

    /// Local checkout to read templates from instead of the remote archive
    pub template_dir: Option<PathBuf>,
}

/// Run the create flow with interactive prompts
pub async fn run_create(args: CreateArgs) -> Result<()> {
    cliclack::intro("create-bunup")?;

    let cwd = std::env::current_dir().context("Failed to read the current directory")?;

    // Step 1: Template selection
    let descriptor = select_template(args.template)?;
    let variant = select_variant(descriptor, args.variant)?;
    let monorepo = select_monorepo(descriptor)?;

    // Step 2: Project identity
    let project_name = select_project_name(descriptor, args.project_name.as_deref(), &cwd)?;
    let first_package = if monorepo {
        Some(input_first_package(descriptor)?)
    } else {
        None
    };
    let (github_username, github_repo) = input_github_identity(&project_name)?;

    let identity = ProjectIdentity {
        project_name,
        github_username,
        github_repo,
        first_package,
    };

    let template_dir = descriptor.resolve_directory(variant, monorepo);
    let target = cwd.join(&identity.project_name);
    tracing::info!(template_dir, target = %target.display(), "resolved template");

    // Step 3: Download, then substitute
    let fetcher = setup_fetcher(&args.template_dir)?;
    download_template(&fetcher, template_dir, &target).await?;
    apply_placeholders(descriptor, &identity, &target)?;

    // Step 4: Next steps
    print_next_steps(&identity.project_name, monorepo)?;

    Ok(())
}

fn select_template(specified: Option<TemplateKind>) -> Result<&'static TemplateDescriptor> {
    if let Some(kind) = specified {
        let descriptor = kind.descriptor();
        cliclack::log::info(format!(
            "Using template: {} - {}",
            descriptor.name, descriptor.description
        ))?;
        return Ok(descriptor);
    }

    let mut select = cliclack::select("Select a template");
    for kind in TemplateKind::ALL {
        let descriptor = kind.descriptor();
        select = select.item(kind, descriptor.name, descriptor.description);
    }
    let kind: TemplateKind = select.interact()?;

    Ok(kind.descriptor())
}

fn select_variant(descriptor: &TemplateDescriptor, specified: Option<Variant>) -> Result<Variant> {
    if let Some(variant) = specified {
        return Ok(variant);
    }
    if !descriptor.offers_basic() {
        return Ok(Variant::Full);
    }

    let variant = cliclack::select("Select a variant")
        .item(Variant::Basic, Variant::Basic.display_name(), "minimal setup")
        .item(
            Variant::Full,
            Variant::Full.display_name(),
            "tests, linting and release workflow",
        )
        .initial_value(Variant::Full)
        .interact()?;

    Ok(variant)
}

fn select_monorepo(descriptor: &TemplateDescriptor) -> Result<bool> {
    if !descriptor.supports_monorepo() {
        return Ok(false);
    }

    let monorepo = cliclack::confirm("Set up a monorepo (workspace with multiple packages)?")
        .initial_value(false)
        .interact()?;

    Ok(monorepo)
}

fn select_project_name(
    descriptor: &TemplateDescriptor,
    specified: Option<&str>,
    cwd: &Path,
) -> Result<String> {
    if let Some(name) = specified {
        match validate::validate_project_name(name, cwd) {
            Ok(()) => {
                cliclack::log::info(format!("Project name: {}", name))?;
                return Ok(name.to_string());
            }
            Err(message) => cliclack::log::warning(message)?,
        }
    }

    let base = cwd.to_path_buf();
    let name: String = cliclack::input("Project name")
        .placeholder(descriptor.default_project_name)
        .default_input(descriptor.default_project_name)
        .validate(move |input: &String| validate::validate_project_name(input, &base))
        .interact()?;

    Ok(name)
}

fn input_first_package(descriptor: &TemplateDescriptor) -> Result<String> {
    let default = "core";
    let name: String = cliclack::input("First package name")
        .placeholder(default)
        .default_input(default)
        .validate(|input: &String| validate::validate_identifier(input, "Package name"))
        .interact()?;

    tracing::debug!(
        placeholder = descriptor.placeholders.monorepo_first_package,
        package = %name,
        "first monorepo package"
    );
    Ok(name)
}

fn input_github_identity(project_name: &str) -> Result<(String, String)> {
    let username: String = cliclack::input("GitHub username")
        .placeholder("your-username")
        .validate(|input: &String| validate::validate_identifier(input, "GitHub username"))
        .interact()?;

    let repo: String = cliclack::input("GitHub repository name")
        .placeholder(project_name)
        .default_input(project_name)
        .validate(|input: &String| validate::validate_identifier(input, "Repository name"))
        .interact()?;

    Ok((username, repo))
}

fn setup_fetcher(template_dir: &Option<PathBuf>) -> Result<TemplateFetcher> {
    let fetcher = match template_dir {
        Some(path) => {
            cliclack::log::info(format!("Using local templates from {}", path.display()))?;
            TemplateFetcher::from_local(path.clone())
        }
        None => TemplateFetcher::from_env()?,
    };

    Ok(fetcher)
}

async fn download_template(
    fetcher: &TemplateFetcher,
    template_dir: &str,
    target: &Path,
) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Downloading template...");

    match fetcher.fetch_into(template_dir, target).await {
        Ok(files) => {
            spinner.stop(format!(
                "Downloaded {} files into {}",
                files.len(),
                target.display()
            ));
            Ok(())
        }
        Err(e) => {
            spinner.error("Failed to download template");
            Err(e)
        }
    }
}

fn apply_placeholders(
    descriptor: &TemplateDescriptor,
    identity: &ProjectIdentity,
    target: &Path,
) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Personalizing project...");

    let replacements = replace::replacements(&descriptor.placeholders, identity);
    let result = replace::replace_in_tree(target, &replacements).and_then(|changed| {
        if let Some(package) = &identity.first_package {
            replace::rename_package_dir(
                target,
                descriptor.placeholders.monorepo_first_package,
                package,
            )?;
        }
        Ok(changed)
    });

    match result {
        Ok(changed) => {
            spinner.stop(format!("Updated {} files", changed.len()));
            Ok(())
        }
        Err(e) => {
            spinner.error("Failed to personalize project");
            Err(e.into())
        }
    }
}

fn print_next_steps(project_name: &str, monorepo: bool) -> Result<()> {
    let mut steps = vec![
        format!("cd {}", project_name),
        "bun install".to_string(),
        "bun run dev".to_string(),
    ];
    if monorepo {
        steps.push("bun run build".to_string());
    }

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy building!")?;

    Ok(())
}
