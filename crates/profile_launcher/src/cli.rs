//! Command-line interface for profile_launcher

use crate::resolve::ResolveOptions;
use argh::FromArgs;
use std::path::PathBuf;

/// Launch the containers of a profile
#[derive(FromArgs, Debug)]
pub struct LaunchArgs {
    /// directory with profile_config.yaml and env files (default: ./test-profile)
    #[argh(option, default = "String::from(\"./test-profile\")")]
    pub configdir: String,

    /// target device: CPU, GPU, GPU.<n>, AUTO or MULTI:... (overrides the profile)
    #[argh(option)]
    pub target_device: Option<String>,

    /// input source, a capture device or stream URL (overrides the profile)
    #[argh(option)]
    pub inputsrc: Option<String>,

    /// extra volume for every container (format: source:target, repeatable)
    #[argh(option, short = 'v')]
    pub volume: Vec<String>,

    /// env override for every container (format: KEY=VALUE, repeatable)
    #[argh(option, short = 'e')]
    pub env: Vec<String>,

    /// keep containers out of the host network and IPC namespaces
    #[argh(switch)]
    pub private_network: bool,

    /// show the resolved launch plan without starting containers
    #[argh(switch)]
    pub dry_run: bool,

    /// print the dry-run plan as JSON
    #[argh(switch)]
    pub json: bool,

    /// validate the profile and exit
    #[argh(switch)]
    pub validate: bool,

    /// log level (error, warn, info, debug, trace)
    #[argh(option, short = 'l', default = "String::from(\"info\")")]
    pub log_level: String,
}

impl LaunchArgs {
    /// Resolution inputs, with relative volume sources anchored at `working_dir`
    pub fn resolve_options(&self, working_dir: PathBuf) -> ResolveOptions {
        ResolveOptions {
            config_dir: PathBuf::from(&self.configdir),
            working_dir,
            target_device: self.target_device.clone(),
            input_source: self.inputsrc.clone(),
            volumes: self.volume.clone(),
            env_overrides: self.env.clone(),
            private_network: self.private_network,
        }
    }

    /// Log filter for env_logger, `info` for unknown levels
    pub fn log_filter(&self) -> &'static str {
        match self.log_level.to_lowercase().as_str() {
            "error" => "error",
            "warn" => "warn",
            "debug" => "debug",
            "trace" => "trace",
            _ => "info",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<LaunchArgs, argh::EarlyExit> {
        LaunchArgs::from_args(&["profile_launcher"], args)
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.configdir, "./test-profile");
        assert_eq!(args.target_device, None);
        assert!(args.volume.is_empty());
        assert!(!args.private_network);
        assert_eq!(args.log_filter(), "info");
    }

    #[test]
    fn test_repeatable_flags() {
        let args = parse(&[
            "--configdir",
            "profiles/demo",
            "--inputsrc",
            "/dev/video0",
            "--target-device",
            "GPU.0",
            "-e",
            "A=1",
            "-e",
            "B=2",
            "-v",
            "./data:/data",
            "--private-network",
        ])
        .unwrap();

        let options = args.resolve_options(PathBuf::from("/work"));
        assert_eq!(options.config_dir, PathBuf::from("profiles/demo"));
        assert_eq!(options.input_source.as_deref(), Some("/dev/video0"));
        assert_eq!(options.target_device.as_deref(), Some("GPU.0"));
        assert_eq!(options.env_overrides, vec!["A=1", "B=2"]);
        assert_eq!(options.volumes, vec!["./data:/data"]);
        assert!(options.private_network);
    }

    #[test]
    fn test_unknown_log_level_falls_back_to_info() {
        let args = parse(&["-l", "verbose"]).unwrap();
        assert_eq!(args.log_filter(), "info");
        let args = parse(&["-l", "DEBUG"]).unwrap();
        assert_eq!(args.log_filter(), "debug");
    }
}
