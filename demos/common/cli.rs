use crate::common::backend::{MainBackend, RecorderTy};
use burn::lr_scheduler::LrScheduler;
use burn::prelude::*;
use burn::record::{FileRecorder, Recorder};
use burn_cosine_decay::prelude::*;
use std::path::{Path, PathBuf};

pub const HELP: &str = "\
Burn Cosine Decay Example

A command-line tool that prints the learning rates produced by a cosine decay scheduler.
The scheduler configuration and its progress are persisted in an artifacts directory.

USAGE:
    cosine-curve [OPTIONS]

BEHAVIOR OVERVIEW
- If --config is given, the config is loaded from the specified file and saved to the artifacts directory (overwriting any existing file).
- Otherwise the program attempts to load the config from the artifacts directory; if absent, a default configuration is created and saved.
- The scheduler progress is loaded from the artifacts directory if present, so repeated runs continue the curve.
  After stepping, the progress is saved back.
- Scheduler messages (cycle restarts, config warnings) are shown through RUST_LOG, e.g. RUST_LOG=debug.

FLAGS:
    -h, --help                  Show this help message and exit

OPTIONS:
    -n, --num-steps <N>         Number of scheduler steps to print [default: 30]
    -r, --restart               Ignore any saved scheduler progress and start from the first step
    -c, --config <PATH>         Load the scheduler configuration from this file (overrides any config in artifacts directory)
    -a, --artifacts-path <PATH>
                                Directory where the configuration and scheduler progress are saved and loaded.
                                If the directory does not exist, it will be created.
                                Defaults to a newly created temporary directory (path will be printed).
";

#[derive(Debug)]
pub struct AppArgs {
    pub num_steps: usize,
    pub restart: bool,
    pub config: Option<PathBuf>,
    pub artifacts_path: PathBuf,
}

impl AppArgs {
    pub fn parse() -> Result<Self, pico_args::Error> {
        let mut pargs = pico_args::Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            println!("{}", HELP);
            std::process::exit(0);
        }

        let args = AppArgs {
            num_steps: pargs
                .opt_value_from_str(["-n", "--num-steps"])?
                .unwrap_or(30),
            config: pargs.opt_value_from_os_str(["-c", "--config"], parse_path)?,
            artifacts_path: pargs
                .opt_value_from_os_str(["-a", "--artifacts-path"], parse_path)?
                .unwrap_or_else(|| {
                    // e.g. /tmp/burn-cosine-decay-cosine-curve-abcd-0
                    let name = format!(
                        "{}-{}-",
                        std::env!("CARGO_PKG_NAME"), // burn-cosine-decay
                        std::env!("CARGO_BIN_NAME")  // cosine-curve
                    );
                    let tmp = temp_dir::TempDir::with_prefix(name)
                        .expect("Failed to create the temporary directory")
                        .dont_delete_on_drop();
                    let path = tmp.path();
                    println!("new artifacts directory: {path:?}");
                    path.into()
                }),
            // must parse flags after values
            restart: pargs.contains(["-r", "--restart"]),
        };

        // It's up to the caller what to do with the remaining arguments.
        let remaining = pargs.finish();
        if !remaining.is_empty() {
            panic!("unused arguments: {remaining:?}");
        }

        Ok(args)
    }

    pub fn create_artifact_dir(&self) {
        create_artifact_dir(&self.artifacts_path, self.restart)
    }

    pub fn save_config(&self, config: &CosineDecayConfig) {
        let path = self.artifacts_path.join(CONFIG_NAME).with_extension("json");
        save_config(&path, config)
    }

    pub fn load_config(&self) -> Option<CosineDecayConfig> {
        self.config
            .as_ref()
            .map(|path| {
                load_config(path)
                    .unwrap_or_else(|| panic!("Failed to find the config file {path:?}"))
            })
            .or_else(|| {
                let path = self.artifacts_path.join(CONFIG_NAME).with_extension("json");
                load_config(&path)
            })
    }

    pub fn save_scheduler(&self, scheduler: &CosineDecay) {
        save_scheduler(&self.artifacts_path, scheduler)
    }

    pub fn load_or_init_scheduler(&self, config: &CosineDecayConfig) -> CosineDecay {
        let scheduler = init_scheduler(config);
        match load_scheduler_record(&self.artifacts_path) {
            Some(iteration) => scheduler.load_record::<MainBackend>(iteration),
            None => {
                println!("Initializing new scheduler");
                scheduler
            }
        }
    }
}

fn parse_path(s: &std::ffi::OsStr) -> Result<std::path::PathBuf, &'static str> {
    Ok(s.into())
}

// Create the artifacts directory, optionally dropping the scheduler progress
pub fn create_artifact_dir(artifact_dir: &Path, restart: bool) {
    std::fs::create_dir_all(artifact_dir).expect("failed to create the artifacts directory");
    if restart {
        let path = scheduler_path(artifact_dir);
        let exists = std::fs::exists(&path).expect("failed to check the scheduler file");
        if exists {
            println!("removing {path:?}");
            std::fs::remove_file(&path).expect("failed to remove the scheduler");
        }
    }
}

pub const CONFIG_NAME: &str = "cosine_decay_config";
pub fn save_config(path: &Path, config: &CosineDecayConfig) {
    println!("Saving config into {path:?}");
    config.save(path).expect("Failed to save the config");
}

pub fn load_config(path: &Path) -> Option<CosineDecayConfig> {
    let exists = std::fs::exists(path).expect("failed to check the config file");
    if exists {
        println!("Loading config from {path:?}");
        let config = CosineDecayConfig::load(path).expect("Failed to load the config");
        Some(config)
    } else {
        None
    }
}

pub fn init_scheduler(config: &CosineDecayConfig) -> CosineDecay {
    config
        .init()
        .unwrap_or_else(|err| panic!("Invalid scheduler config: {err}"))
}

pub const SCHEDULER_NAME: &str = "scheduler";
fn scheduler_path(artifact_dir: &Path) -> PathBuf {
    let file_ext = <RecorderTy as FileRecorder<MainBackend>>::file_extension();
    artifact_dir.join(SCHEDULER_NAME).with_extension(file_ext)
}

pub fn save_scheduler(artifact_dir: &Path, scheduler: &CosineDecay) {
    let path = artifact_dir.join(SCHEDULER_NAME);
    println!("Saving scheduler to {:?}", scheduler_path(artifact_dir));
    let record = scheduler.to_record::<MainBackend>();
    <RecorderTy as Recorder<MainBackend>>::record(&RecorderTy::new(), record, path) // ext added automatically
        .expect("Failed to save the scheduler");
}

pub fn load_scheduler_record(artifact_dir: &Path) -> Option<usize> {
    let path_ext = scheduler_path(artifact_dir);
    let exists = std::fs::exists(&path_ext).expect("failed to check the scheduler file");
    if exists {
        println!("Loading scheduler from {path_ext:?}");
        let device = Default::default();
        let record: usize = <RecorderTy as Recorder<MainBackend>>::load(
            &RecorderTy::new(),
            artifact_dir.join(SCHEDULER_NAME), // ext added automatically
            &device,
        )
        .expect("Failed to load the scheduler");
        Some(record)
    } else {
        None
    }
}
