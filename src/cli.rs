//! CLI argument parsing using clap derive macros

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser};

use crate::build::{self, BuildOptions, BuildType, DEFAULT_BUILD_TYPE, DEFAULT_GENERATOR, DEFAULT_JOBS};
use crate::config::GenConfig;
use crate::error::GenError;
use crate::utils::flags::parse_bool_flag;
use crate::utils::paths::{absolutize, locate_project_root};
use crate::utils::terminal::{disable_colors, print_info};

/// ezio-gen - configure and build ezio with CMake
///
/// Creates build/<BuildType>/ under the project root, runs the CMake
/// configuration step there, then builds it. CMake failures are reported as
/// warnings and do not change the exit code unless --strict is given.
#[derive(Parser, Debug)]
#[command(name = "ezio-gen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Build configuration name; its first letter is capitalized to name build/<TYPE>
    #[arg(long, value_name = "TYPE", default_value = DEFAULT_BUILD_TYPE, value_parser = parse_build_type)]
    pub build_type: BuildType,

    /// Generate unit test targets (yes/no, true/false, on/off, 1/0)
    #[arg(
        long = "build-test",
        value_name = "BOOL",
        default_value = "true",
        action = ArgAction::Set,
        value_parser = parse_bool_flag
    )]
    pub build_test: bool,

    /// Generate example targets (yes/no, true/false, on/off, 1/0)
    #[arg(
        long = "build-examples",
        value_name = "BOOL",
        default_value = "true",
        action = ArgAction::Set,
        value_parser = parse_bool_flag
    )]
    pub build_examples: bool,

    /// CMake generator [default: gen.toml or Ninja]
    #[arg(long, value_name = "NAME")]
    pub generator: Option<String>,

    /// Parallel jobs for the build step [default: gen.toml or 4]
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub jobs: Option<u32>,

    /// CMake executable
    #[arg(long, value_name = "PATH", env = "EZIO_GEN_CMAKE", default_value = "cmake")]
    pub cmake: OsString,

    /// Project root [default: nearest directory above this executable with CMakeLists.txt]
    #[arg(long, value_name = "PATH", env = "EZIO_GEN_PROJECT_ROOT")]
    pub project_root: Option<PathBuf>,

    /// Exit with an error if the configure or build step fails
    #[arg(long)]
    pub strict: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

fn parse_build_type(raw: &str) -> Result<BuildType, String> {
    BuildType::new(raw).map_err(|e| match e {
        GenError::InvalidArgument { message, .. } => message,
        other => other.to_string(),
    })
}

/// Parse command-line arguments
///
/// `--help` and `--version` print and exit; every other parse failure is an
/// `InvalidArgument` error.
pub fn parse_options<I, T>(args: I) -> Result<Cli, GenError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|err| {
        if !err.use_stderr() {
            err.exit()
        }
        GenError::from(err)
    })
}

impl Cli {
    /// Merge command-line flags over gen.toml defaults
    pub fn build_options(&self, config: GenConfig) -> BuildOptions {
        let cmake = config.cmake;
        BuildOptions {
            build_type: self.build_type.clone(),
            build_tests: self.build_test,
            build_examples: self.build_examples,
            generator: self
                .generator
                .clone()
                .or(cmake.generator)
                .unwrap_or_else(|| DEFAULT_GENERATOR.to_string()),
            jobs: self.jobs.or(cmake.jobs).unwrap_or(DEFAULT_JOBS),
            cmake: self.cmake.clone(),
            variables: cmake.variables,
            strict: self.strict,
            verbose: self.verbose,
        }
    }

    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        if self.no_color {
            disable_colors();
        }

        let project_root = match &self.project_root {
            Some(root) => absolutize(root)?,
            None => locate_project_root()?,
        };
        if self.verbose {
            print_info(&format!("Project root: {}", project_root.display()));
        }

        let config = GenConfig::load(&project_root)?;
        let options = self.build_options(config);
        if self.verbose && options.cmake != "cmake" {
            print_info(&format!("Using CMake: {}", options.cmake.to_string_lossy()));
        }

        build::run(&project_root, &options)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, GenError> {
        parse_options(std::iter::once("ezio-gen").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.build_type.as_str(), "Debug");
        assert!(cli.build_test);
        assert!(cli.build_examples);
        assert!(cli.generator.is_none());
        assert!(cli.jobs.is_none());
        assert!(!cli.strict);
    }

    #[test]
    fn test_explicit_values() {
        let cli = parse(&[
            "--build-type=release",
            "--build-test=no",
            "--build-examples",
            "OFF",
        ])
        .unwrap();
        assert_eq!(cli.build_type.as_str(), "Release");
        assert!(!cli.build_test);
        assert!(!cli.build_examples);
    }

    #[test]
    fn test_bool_spellings_through_cli() {
        for (spelling, expected) in [("yes", true), ("1", true), ("On", true), ("false", false), ("0", false)] {
            let cli = parse(&["--build-test", spelling]).unwrap();
            assert_eq!(cli.build_test, expected, "spelling: {}", spelling);
        }
    }

    #[test]
    fn test_invalid_bool_is_invalid_argument() {
        let err = parse(&["--build-test=maybe"]).unwrap_err();
        assert!(matches!(err, GenError::InvalidArgument { .. }));
        assert!(err.to_string().contains("maybe"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_missing_value_is_invalid_argument() {
        let err = parse(&["--build-examples"]).unwrap_err();
        assert!(matches!(err, GenError::InvalidArgument { .. }));
    }

    #[test]
    fn test_unknown_flag_is_invalid_argument() {
        let err = parse(&["--build-docs=yes"]).unwrap_err();
        assert!(matches!(err, GenError::InvalidArgument { .. }));
    }

    #[test]
    fn test_empty_build_type_rejected() {
        let err = parse(&["--build-type="]).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_zero_jobs_rejected() {
        assert!(parse(&["--jobs", "0"]).is_err());
        assert_eq!(parse(&["-j", "12"]).unwrap().jobs, Some(12));
    }

    #[test]
    fn test_build_options_from_config() {
        let cli = parse(&[]).unwrap();
        let config = GenConfig::parse(
            "[cmake]\ngenerator = \"Unix Makefiles\"\njobs = 8\n[cmake.variables]\nFOO = \"1\"\n",
        )
        .unwrap();

        let options = cli.build_options(config);
        assert_eq!(options.generator, "Unix Makefiles");
        assert_eq!(options.jobs, 8);
        assert_eq!(options.variables.get("FOO").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = parse(&["--generator", "Ninja Multi-Config", "-j", "2"]).unwrap();
        let config = GenConfig::parse("[cmake]\ngenerator = \"Unix Makefiles\"\njobs = 8\n").unwrap();

        let options = cli.build_options(config);
        assert_eq!(options.generator, "Ninja Multi-Config");
        assert_eq!(options.jobs, 2);
    }

    #[test]
    fn test_build_options_defaults_without_config() {
        let options = parse(&[]).unwrap().build_options(GenConfig::default());
        assert_eq!(options.generator, DEFAULT_GENERATOR);
        assert_eq!(options.jobs, DEFAULT_JOBS);
        assert!(options.variables.is_empty());
    }
}
