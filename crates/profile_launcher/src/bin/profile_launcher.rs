//! Profile Launcher CLI
//!
//! Usage:
//!   profile_launcher --configdir profiles/demo --inputsrc /dev/video0
//!   profile_launcher --configdir profiles/demo --inputsrc rtsp://cam/0 --target-device GPU.0 -e LOG=1
//!   profile_launcher --configdir profiles/demo --inputsrc /dev/video0 --dry-run

use anyhow::Context;
use profile_launcher::{DockerRuntime, Executor, LaunchArgs, LaunchProfile};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args: LaunchArgs = argh::from_env();

    let env = env_logger::Env::default().default_filter_or(args.log_filter());
    env_logger::init_from_env(env);

    if let Err(e) = run(args).await {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: LaunchArgs) -> anyhow::Result<()> {
    log::info!("Loading profile from {}", args.configdir);
    let profile = LaunchProfile::from_dir(&args.configdir)
        .with_context(|| format!("Failed to load profile from '{}'", args.configdir))?;

    if args.validate {
        println!("Profile in '{}' is valid", args.configdir);
        println!("  Containers: {}", profile.container_names().join(", "));
        println!("  Input source: {}", profile.input_source);
        println!("  Target device: {}", profile.target_device);
        return Ok(());
    }

    let working_dir = std::env::current_dir().context("Failed to get current directory")?;
    let plan = args
        .resolve_options(working_dir)
        .resolve(profile)
        .context("Failed to resolve profile")?;

    if args.dry_run {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            println!("{}", plan);
        }
        return Ok(());
    }

    let executor = Executor::new(DockerRuntime::connect()?);
    let launched = executor.launch(&plan).await.context("Launch failed")?;

    for container in &launched {
        println!("{} {}", container.name, container.id);
    }
    log::info!("Profile launcher exiting");
    Ok(())
}
