//! CMake configuration and execution
//!
//! This module builds the two CMake command lines the driver issues and runs
//! them. A step that fails or cannot be launched is reported, never returned
//! as an error; the caller decides what a failed step means.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{BuildOptions, BuildType};
use crate::exec::subprocess::{find_program, run_command};
use crate::utils::flags::cmake_bool;
use crate::utils::terminal::{format_command_line, print_info};

/// Which of the two CMake invocations a report belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Configure,
    Build,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Configure => write!(f, "configure"),
            Step::Build => write!(f, "build"),
        }
    }
}

/// How a step ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    /// Exited with code 0
    Succeeded,
    /// Exited non-zero; `None` when killed by a signal
    Failed(Option<i32>),
    /// The program could not be started
    NotLaunched(String),
}

/// Outcome of one CMake invocation
#[derive(Debug, Clone)]
pub struct StepReport {
    pub step: Step,
    pub status: StepStatus,
    pub duration: Duration,
}

impl StepReport {
    pub fn succeeded(&self) -> bool {
        self.status == StepStatus::Succeeded
    }

    /// One-line description of an unsuccessful step
    pub fn describe_failure(&self) -> Option<String> {
        match &self.status {
            StepStatus::Succeeded => None,
            StepStatus::Failed(Some(code)) => Some(format!("exited with code {}", code)),
            StepStatus::Failed(None) => Some("terminated by a signal".to_string()),
            StepStatus::NotLaunched(reason) => Some(format!("could not be started: {}", reason)),
        }
    }
}

/// The configure and build invocations for one output directory
#[derive(Debug)]
pub struct CMakeInvocation {
    /// CMake program name or path
    cmake: OsString,
    /// Source directory (where CMakeLists.txt is located)
    source_dir: PathBuf,
    /// Build directory, also the working directory of both steps
    build_dir: PathBuf,
    /// Build type
    build_type: BuildType,
    build_tests: bool,
    build_examples: bool,
    /// Generator (e.g., "Ninja", "Unix Makefiles")
    generator: String,
    /// Number of parallel jobs
    jobs: u32,
    /// Extra CMake variables (-D options)
    variables: BTreeMap<String, String>,
    verbose: bool,
}

impl CMakeInvocation {
    /// Create the invocation pair for an already-created build directory
    pub fn new(source_dir: &Path, build_dir: &Path, options: &BuildOptions) -> Self {
        Self {
            cmake: options.cmake.clone(),
            source_dir: source_dir.to_path_buf(),
            build_dir: build_dir.to_path_buf(),
            build_type: options.build_type.clone(),
            build_tests: options.build_tests,
            build_examples: options.build_examples,
            generator: options.generator.clone(),
            jobs: options.jobs,
            variables: options.variables.clone(),
            verbose: options.verbose,
        }
    }

    /// Arguments of the configuration step
    pub fn configure_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            format!("-DCMAKE_BUILD_TYPE={}", self.build_type).into(),
            format!("-DBUILD_NO_UNITTEST={}", cmake_bool(!self.build_tests)).into(),
            format!("-DBUILD_NO_EXAMPLES={}", cmake_bool(!self.build_examples)).into(),
        ];

        for (name, value) in &self.variables {
            args.push(format!("-D{}={}", name, value).into());
        }

        args.push("-G".into());
        args.push(self.generator.clone().into());
        args.push(self.source_dir.clone().into_os_string());
        args
    }

    /// Arguments of the build step
    pub fn build_args(&self) -> Vec<OsString> {
        vec![
            "--build".into(),
            self.build_dir.clone().into_os_string(),
            "--".into(),
            "-j".into(),
            self.jobs.to_string().into(),
        ]
    }

    /// Run CMake configure step
    pub fn configure(&self) -> StepReport {
        self.run(Step::Configure, &self.configure_args())
    }

    /// Run CMake build step
    pub fn build(&self) -> StepReport {
        self.run(Step::Build, &self.build_args())
    }

    fn run(&self, step: Step, args: &[OsString]) -> StepReport {
        if self.verbose {
            print_info(&format!("Running: {}", format_command_line(&self.cmake, args)));
        }

        let Some(program) = find_program(&self.cmake) else {
            return StepReport {
                step,
                status: StepStatus::NotLaunched(format!(
                    "{} not found",
                    self.cmake.to_string_lossy()
                )),
                duration: Duration::ZERO,
            };
        };

        let report = match run_command(&program, args, Some(&self.build_dir)) {
            Ok(result) => StepReport {
                step,
                status: if result.success {
                    StepStatus::Succeeded
                } else {
                    StepStatus::Failed(result.exit_code)
                },
                duration: result.duration,
            },
            Err(e) => StepReport {
                step,
                status: StepStatus::NotLaunched(format!("{:#}", e)),
                duration: Duration::ZERO,
            },
        };

        if self.verbose {
            print_info(&format!(
                "{} step finished in {:.2}s",
                step,
                report.duration.as_secs_f64()
            ));
        }

        report
    }

    /// Whether the configured program can be found at all
    pub fn cmake_available(&self) -> bool {
        find_program(&self.cmake).is_some()
    }

    /// Whether the generator's backend tool is missing
    pub fn ninja_missing(&self) -> bool {
        self.generator.eq_ignore_ascii_case("ninja") && find_program(OsStr::new("ninja")).is_none()
    }
}
