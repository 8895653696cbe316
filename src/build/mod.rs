//! Build orchestration
//!
//! ## Flow
//!
//! ```text
//! options → build/<BuildType>/ → cmake -G Ninja <root> → cmake --build
//! ```
//!
//! Both CMake steps always run, in that order, with the output directory as
//! their working directory.

pub mod cmake;

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::error::{hints, GenError};
use crate::utils::paths::{ensure_dir, get_build_root};
use crate::utils::terminal::{print_success, print_warning};
use self::cmake::{CMakeInvocation, StepReport, StepStatus};

/// Default generator for the configuration step
pub const DEFAULT_GENERATOR: &str = "Ninja";

/// Default parallelism hint for the build step
pub const DEFAULT_JOBS: u32 = 4;

/// Default build type when none is given
pub const DEFAULT_BUILD_TYPE: &str = "Debug";

/// Build configuration name, normalized on construction
///
/// Only the first character is uppercased: `"release"` becomes `"Release"`
/// and `"relEASE"` becomes `"RelEASE"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildType(String);

impl BuildType {
    /// Validate and normalize a user-supplied build type
    pub fn new(raw: &str) -> Result<Self, GenError> {
        if raw.is_empty() {
            return Err(GenError::invalid_argument_with_hint(
                "build type must not be empty",
                "Use a CMake build type such as Debug, Release or RelWithDebInfo.",
            ));
        }
        if raw == "." || raw == ".." {
            return Err(GenError::invalid_argument(format!(
                "build type '{}' does not name a directory under build/",
                raw
            )));
        }
        if raw.contains(['/', '\\']) {
            return Err(GenError::invalid_argument(format!(
                "build type '{}' must not contain path separators",
                raw
            )));
        }

        let mut chars = raw.chars();
        let normalized = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BuildType {
    fn default() -> Self {
        Self(DEFAULT_BUILD_TYPE.to_string())
    }
}

impl std::fmt::Display for BuildType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build options passed to the CMake steps
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Normalized build type
    pub build_type: BuildType,
    /// Generate unit test targets
    pub build_tests: bool,
    /// Generate example targets
    pub build_examples: bool,
    /// CMake generator
    pub generator: String,
    /// Parallel jobs for the build step
    pub jobs: u32,
    /// CMake program name or path
    pub cmake: OsString,
    /// Extra cache variables for the configuration step
    pub variables: BTreeMap<String, String>,
    /// Fail the run when a step fails
    pub strict: bool,
    /// Verbose output
    pub verbose: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            build_type: BuildType::default(),
            build_tests: true,
            build_examples: true,
            generator: DEFAULT_GENERATOR.to_string(),
            jobs: DEFAULT_JOBS,
            cmake: OsString::from("cmake"),
            variables: BTreeMap::new(),
            strict: false,
            verbose: false,
        }
    }
}

/// Compute `<project_root>/build/<BuildType>` and create it if missing
pub fn resolve_output_directory(
    project_root: &Path,
    options: &BuildOptions,
) -> Result<PathBuf, GenError> {
    let out_dir = get_build_root(project_root).join(options.build_type.as_str());
    ensure_dir(&out_dir)?;
    Ok(out_dir)
}

/// Run the configuration step in `output_dir`
pub fn run_configuration_step(
    output_dir: &Path,
    project_root: &Path,
    options: &BuildOptions,
) -> StepReport {
    CMakeInvocation::new(project_root, output_dir, options).configure()
}

/// Run the build step for `output_dir`
pub fn run_build_step(output_dir: &Path, project_root: &Path, options: &BuildOptions) -> StepReport {
    CMakeInvocation::new(project_root, output_dir, options).build()
}

/// Create the output directory, then configure and build
///
/// Step failures are printed as warnings. They become an error only when
/// `options.strict` is set, and even then only after both steps have run.
pub fn run(project_root: &Path, options: &BuildOptions) -> Result<Vec<StepReport>> {
    let out_dir = resolve_output_directory(project_root, options)?;

    let reports = vec![
        run_configuration_step(&out_dir, project_root, options),
        run_build_step(&out_dir, project_root, options),
    ];
    let invocation = CMakeInvocation::new(project_root, &out_dir, options);

    for report in &reports {
        if let Some(failure) = report.describe_failure() {
            print_warning(&format!("CMake {} step {}", report.step, failure));
        }
    }
    if reports
        .iter()
        .any(|r| matches!(r.status, StepStatus::NotLaunched(_)))
        && !invocation.cmake_available()
    {
        eprintln!("{}", hints::cmake());
    } else if !reports[0].succeeded() && invocation.ninja_missing() {
        eprintln!("{}", hints::ninja());
    }

    if let Some(failed) = reports.iter().find(|r| !r.succeeded()) {
        if options.strict {
            let message = failed.describe_failure().unwrap_or_default();
            return Err(GenError::step_failed(
                failed.step.to_string(),
                message,
                Some(hints::step_failed().to_string()),
            )
            .into());
        }
    } else {
        print_success(&format!("{} build ready in {}", options.build_type, out_dir.display()));
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_build_type_capitalizes_first_letter_only() {
        assert_eq!(BuildType::new("release").unwrap().as_str(), "Release");
        assert_eq!(BuildType::new("relEASE").unwrap().as_str(), "RelEASE");
        assert_eq!(BuildType::new("Debug").unwrap().as_str(), "Debug");
        assert_eq!(BuildType::new("minSizeRel").unwrap().as_str(), "MinSizeRel");
        assert_eq!(BuildType::new("ünicode").unwrap().as_str(), "Ünicode");
    }

    #[test]
    fn test_build_type_rejects_empty_and_separators() {
        for raw in ["", ".", "..", "../Release", "a/b", "a\\b"] {
            let err = BuildType::new(raw).unwrap_err();
            assert!(matches!(err, GenError::InvalidArgument { .. }), "{}", raw);
        }
    }

    #[test]
    fn test_default_options() {
        let opts = BuildOptions::default();
        assert_eq!(opts.build_type.as_str(), "Debug");
        assert!(opts.build_tests);
        assert!(opts.build_examples);
        assert_eq!(opts.generator, "Ninja");
        assert_eq!(opts.jobs, 4);
        assert!(!opts.strict);
    }

    #[test]
    fn test_resolve_output_directory() {
        let temp_dir = TempDir::new().unwrap();
        let opts = BuildOptions {
            build_type: BuildType::new("release").unwrap(),
            ..Default::default()
        };

        let out_dir = resolve_output_directory(temp_dir.path(), &opts).unwrap();
        assert!(out_dir.ends_with("build/Release"));
        assert!(out_dir.is_dir());
    }

    #[test]
    fn test_resolve_output_directory_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let opts = BuildOptions::default();

        let first = resolve_output_directory(temp_dir.path(), &opts).unwrap();
        fs::write(first.join("build.ninja"), "# generated\n").unwrap();
        let second = resolve_output_directory(temp_dir.path(), &opts).unwrap();

        assert_eq!(first, second);
        assert!(second.join("build.ninja").exists());
    }

    #[test]
    fn test_resolve_output_directory_blocked_by_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("build"), "").unwrap();

        let err = resolve_output_directory(temp_dir.path(), &BuildOptions::default()).unwrap_err();
        assert!(matches!(err, GenError::Filesystem { .. }));
    }

    #[test]
    fn test_run_without_cmake_still_succeeds() {
        let temp_dir = TempDir::new().unwrap();
        let opts = BuildOptions {
            cmake: "/nonexistent/cmake-for-ezio-gen".into(),
            ..Default::default()
        };

        let reports = run(temp_dir.path(), &opts).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].step, cmake::Step::Configure);
        assert_eq!(reports[1].step, cmake::Step::Build);
        assert!(temp_dir.path().join("build/Debug").is_dir());
    }

    #[test]
    fn test_run_strict_surfaces_failure() {
        let temp_dir = TempDir::new().unwrap();
        let opts = BuildOptions {
            cmake: "/nonexistent/cmake-for-ezio-gen".into(),
            strict: true,
            ..Default::default()
        };

        let err = run(temp_dir.path(), &opts).unwrap_err();
        let gen_err = err.downcast_ref::<GenError>().unwrap();
        assert!(matches!(gen_err, GenError::StepFailed { step, .. } if step == "configure"));
    }
}
