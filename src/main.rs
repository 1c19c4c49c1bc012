use anyhow::Result;
use clap::Parser;
use std::path::Path;

use git_autobump::external::ExternalCommand;
use git_autobump::git_ops::{CommitInfo, GitRepo};
use git_autobump::workaround::{AttemptGate, GatePhase};
use git_autobump::{changelog, config, installer, ui, version, workaround};

#[derive(clap::Parser)]
#[command(
    name = "git-autobump",
    about = "Pre-commit hook that bumps the patch version and regenerates the changelog"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Report what would happen without writing anything")]
    dry_run: bool,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("git-autobump {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Locate the repository this hook runs in
    let repo = match GitRepo::new() {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            std::process::exit(1);
        }
    };
    let root = match repo.workdir() {
        Ok(root) => root,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    // Load configuration
    let config = match config::load_config(args.config.as_deref(), &root) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    // Step 1: keep the installed hook fresh. A newer template reinstalls
    // and delegates the rest of this commit to the new version.
    let template = root.join(&config.hook.template);
    let installed = root.join(&config.hook.installed);
    match installer::self_update_needed(&template, &installed) {
        Ok(true) => {
            if args.dry_run {
                ui::display_status("Would reinstall hook from template and re-run");
            } else {
                if let Err(e) = installer::install(&template, &installed) {
                    ui::display_error(&format!("Hook reinstall failed: {}", e));
                    std::process::exit(1);
                }
                ui::display_status("Hook template changed, re-running installed hook");
                match installer::reexec(&installed) {
                    Ok(code) => std::process::exit(code),
                    Err(e) => {
                        ui::display_error(&e.to_string());
                        std::process::exit(1);
                    }
                }
            }
        }
        Ok(false) => {}
        Err(e) => {
            ui::display_error(&format!("Hook self-update check failed: {}", e));
            std::process::exit(1);
        }
    }

    // Step 2: IDE two-phase commit gate
    let gate = AttemptGate::for_repo(&root);
    let ide_detected = config.workaround.enabled
        && workaround::ide_session_detected(
            &config.workaround.probe_env_vars,
            &config.workaround.signatures,
        );

    match workaround::evaluate(&gate, ide_detected) {
        GatePhase::SecondAttempt => {
            // The IDE's retry pass: the previous invocation already did the
            // work, this one only has to let the commit through.
            if let Err(e) = gate.clear() {
                ui::display_warning(&format!("Could not clear attempt state: {}", e));
            }
            ui::display_success("Second commit pass, changes already prepared");
            return Ok(());
        }
        // Recorded at the end, right before the deliberate failure; a
        // fatal abort in between must not leave a pending state behind.
        GatePhase::FirstAttempt => {}
        GatePhase::Inactive => {
            // A leftover from an aborted IDE session must not trip the gate
            // next time the IDE is detected.
            if gate.pending() {
                let _ = gate.clear();
            }
        }
    }

    // Step 3: read, bump, and rewrite the version. A missing or malformed
    // version source aborts before anything has been written.
    let version_path = root.join(&config.files.version_file);
    let current = match version::read_version(&version_path, &config.files.version_pattern) {
        Ok(v) => v,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };
    let next = current.bump_patch();
    ui::display_status(&format!("Bumping version: {} -> {}", current, next));

    // README content is read before any rewrite: the master-tracking marker
    // and the previous release number must come from the pre-bump state.
    let readme_path = root.join(&config.files.readme_file);
    let readme = std::fs::read_to_string(&readme_path).ok();
    if readme.is_none() {
        ui::display_warning(&format!(
            "README not found at {}, skipping its rewrite",
            readme_path.display()
        ));
    }

    if !args.dry_run {
        if let Err(e) = version::rewrite_version(&version_path, &current, &next) {
            ui::display_error(&format!("Version rewrite failed: {}", e));
            std::process::exit(1);
        }
        if readme.is_some() {
            match version::rewrite_version(&readme_path, &current, &next) {
                Ok(true) => {}
                Ok(false) => {
                    ui::display_warning("README does not mention the current version")
                }
                Err(e) => ui::display_warning(&format!("README rewrite skipped: {}", e)),
            }
        }
    }

    // Step 4: regenerate the changelog against the history branch.
    // Failures here are tolerated: the changelog is regenerable and must
    // not brick the commit.
    let minor = changelog::history_minor(&current, readme.as_deref(), &config.git.master_marker);
    let branch =
        changelog::history_branch_name(&config.git.history_branch_format, &current, minor);

    match collect_changelog(&repo, &branch, &config.git.remote) {
        Ok(commits) => {
            ui::display_status(&format!(
                "Changelog: {} commit(s) ahead of {}",
                commits.len(),
                branch
            ));
            if !args.dry_run {
                let changelog_path = root.join(&config.files.changelog_file);
                if let Err(e) =
                    changelog::write_changelog(&changelog_path, &changelog::render(&commits))
                {
                    ui::display_warning(&format!("Changelog write skipped: {}", e));
                }
            }
        }
        Err(e) => {
            ui::display_warning(&format!(
                "Changelog generation skipped ({}): {}",
                branch, e
            ));
        }
    }

    // Step 5: regenerable helper artifacts
    if !args.dry_run {
        run_helper("Release metadata", config.commands.release_metadata.as_deref(), &root);
        run_helper("Permissions fix", config.commands.fix_permissions.as_deref(), &root);
    }

    // Step 6: stage everything the hook touched
    if !args.dry_run {
        let artifacts = vec![
            version_path.clone(),
            readme_path.clone(),
            root.join(&config.files.changelog_file),
        ];
        match repo.stage_changes(&artifacts) {
            Ok(count) => ui::display_success(&format!("Staged {} modified file(s)", count)),
            Err(e) => {
                ui::display_error(&format!("Staging failed: {}", e));
                std::process::exit(1);
            }
        }
    }

    // The first IDE pass fails the commit on purpose so the IDE refreshes
    // its view and the user retries with the staged updates included.
    if ide_detected && !args.dry_run {
        if let Err(e) = gate.arm() {
            // Without the recorded attempt every retry would fail again
            ui::display_warning(&format!("Could not record commit attempt: {}", e));
            return Ok(());
        }
        ui::display_retry_instruction();
        std::process::exit(1);
    }

    Ok(())
}

fn collect_changelog(
    repo: &GitRepo,
    branch: &str,
    remote: &str,
) -> git_autobump::Result<Vec<CommitInfo>> {
    repo.ensure_history_branch(branch, remote)?;
    repo.commits_unique_to_head(branch)
}

fn run_helper(label: &str, command_line: Option<&str>, root: &Path) {
    match command_line {
        Some(cmd) if !cmd.trim().is_empty() => {
            ExternalCommand::run_permissive(label, cmd, root);
        }
        _ => {}
    }
}
