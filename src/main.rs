use anyhow::Result;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use semrel::analyzer::ReleaseOutcome;
use semrel::cli::{self, ReleaseArgs, EXIT_FAILURE};
use semrel::config::{self, ReleaseSettings};
use semrel::domain::LevelBump;
use semrel::git::Git2Repository;
use semrel::ui;

#[derive(clap::Parser)]
#[command(
    name = "semrel",
    version,
    about = "Compute the next semantic version from commit history and tag the release"
)]
#[command(group(ArgGroup::new("level").args(["major", "minor", "patch", "prerelease"])))]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, help = "Print the next version and exit without tagging")]
    print: bool,

    #[arg(long, help = "Print the next tag and exit without tagging")]
    print_tag: bool,

    #[arg(long, help = "Print the last released version and exit")]
    print_last_released: bool,

    #[arg(long, help = "Print the last released tag and exit")]
    print_last_released_tag: bool,

    #[arg(long, help = "Force a major release")]
    major: bool,

    #[arg(long, help = "Force a minor release")]
    minor: bool,

    #[arg(long, help = "Force a patch release")]
    patch: bool,

    #[arg(long, help = "Force a prerelease revision")]
    prerelease: bool,

    #[arg(long, conflicts_with = "as_release", help = "Release as a prerelease")]
    as_prerelease: bool,

    #[arg(long, help = "Release as a full release, even on a prerelease branch")]
    as_release: bool,

    #[arg(long, help = "Override the branch's prerelease token")]
    prerelease_token: Option<String>,

    #[arg(long, help = "Exit with code 2 when no release is made")]
    strict: bool,

    #[arg(long, help = "Push created tags to the configured remote")]
    push: bool,

    #[arg(long, help = "Print the release history as JSON and exit")]
    history_json: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity (-v, -vv)")]
    verbose: u8,
}

impl Args {
    fn release_args(&self) -> ReleaseArgs {
        let force_level = if self.major {
            Some(LevelBump::Major)
        } else if self.minor {
            Some(LevelBump::Minor)
        } else if self.patch {
            Some(LevelBump::Patch)
        } else if self.prerelease {
            Some(LevelBump::PrereleaseRevision)
        } else {
            None
        };

        let as_prerelease = match (self.as_prerelease, self.as_release) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };

        ReleaseArgs {
            force_level,
            as_prerelease,
            prerelease_token: self.prerelease_token.clone(),
        }
    }

    fn print_only(&self) -> bool {
        self.print || self.print_tag
    }
}

fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("semrel=warn")),
        1 => EnvFilter::new("semrel=info"),
        _ => EnvFilter::new("semrel=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let code = match run(&args) {
        Ok(code) => code,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            EXIT_FAILURE
        }
    };
    std::process::exit(code);
}

fn run(args: &Args) -> Result<i32> {
    // Configuration is validated before the repository is touched
    let settings = config::load_config(args.config.as_deref())?.validate()?;
    let repo = Git2Repository::open(".")?;

    if args.print_last_released || args.print_last_released_tag {
        return print_last_released(&repo, &settings, args);
    }

    let plan = cli::plan_release(&repo, &settings, &args.release_args())?;

    if args.history_json {
        println!(
            "{}",
            serde_json::to_string_pretty(&plan.history_with_release())?
        );
        return Ok(cli::exit_code(&plan.outcome, args.strict));
    }

    if args.print_only() {
        print_version(&plan.outcome, args);
        return Ok(cli::exit_code(&plan.outcome, args.strict));
    }

    ui::display_outcome(&plan.outcome);
    if let ReleaseOutcome::Release(version) = &plan.outcome {
        ui::display_unreleased(&plan.history, &plan.branch);
        let last = cli::last_released(&repo, &settings)?;
        ui::display_proposed_tag(
            last.as_ref().map(|(tag, _)| tag.name.as_str()),
            &settings.tag_format.render(version),
        );

        ui::display_status(&format!("Creating tag: {}", version.as_tag()));
        if let Some(applied) = cli::apply_release(&repo, &settings, &plan, args.push)? {
            ui::display_applied(&applied, &settings.remote);
        }
    }

    Ok(cli::exit_code(&plan.outcome, args.strict))
}

/// With `--print`/`--print-tag`, a non-release still prints the current version
fn print_version(outcome: &ReleaseOutcome, args: &Args) {
    let version = match outcome {
        ReleaseOutcome::Release(version) | ReleaseOutcome::AlreadyReleased(version) => {
            Some(version)
        }
        ReleaseOutcome::NoChanges { latest } => latest.as_ref(),
        ReleaseOutcome::NotAReleaseBranch(_) => None,
    };

    if !outcome.is_release() {
        ui::display_outcome(outcome);
    }
    if let Some(version) = version {
        if args.print_tag {
            println!("{}", version.as_tag());
        } else {
            println!("{}", version);
        }
    }
}

fn print_last_released(repo: &Git2Repository, settings: &ReleaseSettings, args: &Args) -> Result<i32> {
    match cli::last_released(repo, settings)? {
        Some((tag, version)) => {
            if args.print_last_released_tag {
                println!("{}", tag.name);
            } else {
                println!("{}", version);
            }
            Ok(cli::EXIT_SUCCESS)
        }
        None => {
            ui::display_status("No release tags found");
            Ok(if args.strict {
                cli::EXIT_NO_RELEASE
            } else {
                cli::EXIT_SUCCESS
            })
        }
    }
}
