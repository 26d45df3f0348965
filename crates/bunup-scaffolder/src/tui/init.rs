//! Init flow: add bunup to an existing project

use crate::config::generator::{
    render_config, BuildLayout, Format, InitConfig, Plugin, WorkspacePackageSpec, CONFIG_FILE,
};
use crate::error::ScaffoldError;
use crate::manifest::{self, Manifest, MergeOutcome, ScriptSet};
use crate::runtime::{detect_package_manager, DevDependencyInstaller, PackageManager};
use crate::validate::{EntryCollector, PackageCollector};
use anyhow::{Context, Result};
use std::path::Path;

/// Entry suggested for the first prompt
const DEFAULT_ENTRY: &str = "src/index.ts";

/// Run the init flow with interactive prompts
pub async fn run_init() -> Result<()> {
    cliclack::intro("bunup init")?;

    let cwd = std::env::current_dir().context("Failed to read the current directory")?;

    // Step 1: Locate package.json
    let manifest_path = match manifest::find_manifest(&cwd) {
        Some(path) => path,
        None => {
            let err = ScaffoldError::ManifestNotFound(cwd);
            cliclack::log::error(err.to_string())?;
            return Err(err.into());
        }
    };
    let mut manifest = Manifest::load(&manifest_path)?;
    let project_root = manifest.root().to_path_buf();
    cliclack::log::info(format!("Using {}", manifest.path().display()))?;

    // Step 2: Collect build configuration
    let workspace = select_workspace()?;
    let layout = if workspace {
        collect_workspace(&project_root)?
    } else {
        collect_single(&project_root)?
    };
    let plugins = select_plugins()?;
    let config = InitConfig { layout, plugins };

    // Step 3: Write bunup.config.ts
    write_config(&project_root, &config)?;

    // Step 4: Merge scripts into package.json
    merge_scripts(&mut manifest, workspace)?;

    // Step 5: Install bunup
    let package_manager = detect_package_manager(&project_root);
    install_bunup(package_manager, &project_root).await?;

    // Step 6: Next steps
    print_next_steps(package_manager)?;

    Ok(())
}

fn select_workspace() -> Result<bool> {
    let workspace = cliclack::select("What are you building?")
        .item(false, "Single package", "one package.json, one build")
        .item(true, "Workspace", "several packages built together")
        .initial_value(false)
        .interact()?;

    Ok(workspace)
}

/// Prompt for entry files until the user stops
fn collect_entries(mut collector: EntryCollector) -> Result<Vec<String>> {
    loop {
        let snapshot = collector.clone();
        let prompt = if collector.is_empty() {
            format!("Entry file (relative to {})", collector.base().display())
        } else {
            "Another entry file".to_string()
        };
        let mut input = cliclack::input(prompt)
            .placeholder(DEFAULT_ENTRY)
            .validate(move |input: &String| snapshot.validate(input));
        if collector.is_empty() {
            input = input.default_input(DEFAULT_ENTRY);
        }
        let entry: String = input.interact()?;

        // Validated by the prompt; a race with the filesystem is reported and re-asked
        if let Err(message) = collector.add(&entry) {
            cliclack::log::warning(message)?;
            continue;
        }

        let more = cliclack::confirm("Add another entry file?")
            .initial_value(false)
            .interact()?;
        if !more {
            return Ok(collector.into_entries());
        }
    }
}

fn select_formats(prompt: &str) -> Result<Vec<Format>> {
    let mut multi = cliclack::multiselect(prompt);
    for format in Format::ALL {
        multi = multi.item(format, format.as_str(), format.description());
    }
    let formats: Vec<Format> = multi
        .initial_values(Format::DEFAULT.to_vec())
        .required(true)
        .interact()?;

    Ok(formats)
}

fn select_plugins() -> Result<Vec<Plugin>> {
    let mut multi = cliclack::multiselect("Plugins (optional)");
    for plugin in Plugin::ALL {
        multi = multi.item(plugin, plugin.ident(), plugin.description());
    }
    let plugins: Vec<Plugin> = multi
        .initial_values(Plugin::DEFAULT.to_vec())
        .required(false)
        .interact()?;

    Ok(plugins)
}

fn collect_single(project_root: &Path) -> Result<BuildLayout> {
    let entries = collect_entries(EntryCollector::new(project_root))?;
    let formats = select_formats("Output formats")?;
    Ok(BuildLayout::Single { entries, formats })
}

fn collect_workspace(project_root: &Path) -> Result<BuildLayout> {
    let mut packages = PackageCollector::new(project_root);

    loop {
        let snapshot = packages.clone();
        let name: String = cliclack::input("Package name")
            .placeholder("core")
            .validate(move |input: &String| snapshot.validate_name(input))
            .interact()?;

        let snapshot = packages.clone();
        let root: String = cliclack::input(format!("Root directory of {}", name.trim()))
            .placeholder("packages/core")
            .validate(move |input: &String| snapshot.validate_root(input))
            .interact()?;

        let entries = collect_entries(packages.entry_collector(&root))?;
        let formats = select_formats(&format!("Output formats for {}", name.trim()))?;

        if let Err(message) = packages.add(WorkspacePackageSpec {
            name,
            root,
            entries,
            formats,
        }) {
            cliclack::log::warning(message)?;
            continue;
        }

        let more = cliclack::confirm("Add another package?")
            .initial_value(false)
            .interact()?;
        if !more {
            break;
        }
    }

    let packages = packages.into_packages();
    cliclack::log::success(format!("Configured {} packages", packages.len()))?;
    Ok(BuildLayout::Workspace { packages })
}

fn write_config(project_root: &Path, config: &InitConfig) -> Result<()> {
    let path = project_root.join(CONFIG_FILE);
    if path.exists() {
        let overwrite = cliclack::confirm(format!("{} already exists. Overwrite it?", CONFIG_FILE))
            .initial_value(false)
            .interact()?;
        if !overwrite {
            anyhow::bail!("Setup cancelled.");
        }
    }

    std::fs::write(&path, render_config(config))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    cliclack::log::success(format!("Created {}", CONFIG_FILE))?;

    Ok(())
}

fn merge_scripts(manifest: &mut Manifest, workspace: bool) -> Result<()> {
    let scripts = ScriptSet::for_layout(workspace);
    let outcome = manifest.merge_scripts(&scripts, |message| -> Result<bool> {
        Ok(cliclack::confirm(message).initial_value(false).interact()?)
    })?;

    match outcome {
        MergeOutcome::Merged { added, overwritten } => {
            manifest.save()?;
            let mut changed = added;
            changed.extend(overwritten);
            cliclack::log::success(format!(
                "Updated {} scripts: {}",
                manifest::MANIFEST_FILE,
                changed.join(", ")
            ))?;
        }
        MergeOutcome::Declined { conflicts } => {
            cliclack::log::info(format!(
                "Kept existing scripts ({}); add them yourself: {}",
                conflicts.join(", "),
                scripts
                    .iter()
                    .map(|(k, v)| format!("\"{}\": \"{}\"", k, v))
                    .collect::<Vec<_>>()
                    .join(", ")
            ))?;
        }
    }

    Ok(())
}

async fn install_bunup(package_manager: PackageManager, project_root: &Path) -> Result<()> {
    let installer = DevDependencyInstaller::new(package_manager, project_root);
    cliclack::log::step(format!("Installing bunup with {}", installer.package_manager()))?;

    if let Err(e) = installer.install().await {
        tracing::warn!(error = %e, "installing bunup failed");
        cliclack::log::error(format!("{}", e))?;
        cliclack::log::warning(format!(
            "Install bunup manually: {}",
            installer.install_command()
        ))?;
    } else {
        cliclack::log::success("Installed bunup")?;
    }

    Ok(())
}

fn print_next_steps(package_manager: PackageManager) -> Result<()> {
    let steps = [
        package_manager.run_command("build"),
        package_manager.run_command("dev"),
    ];

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy building!")?;

    Ok(())
}
