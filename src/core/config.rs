//! # Configuration Module / 配置模块
//!
//! Defines the build matrix: the single source file, the flags every
//! specification shares, and the list of compiler/architecture/flags
//! combinations to test. The matrix is either the built-in default or is
//! loaded from a `BuildMatrix.toml` file.
//!
//! 定义构建矩阵：唯一的源文件、所有规格共享的编译选项，以及需要测试的
//! 编译器/架构/选项组合列表。矩阵来自内置默认值或 `BuildMatrix.toml` 文件。

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use crate::infra::t;

/// File name looked up in the current directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "BuildMatrix.toml";

/// One compiler/architecture/flags combination under test.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BuildSpec {
    /// The compiler executable, e.g. `clang` or `gcc`.
    pub compiler: String,
    /// The target architecture handed to the compiler's architecture selector.
    pub arch: String,
    /// Extra flags for this specification only. May be empty.
    #[serde(default)]
    pub flags: String,
}

impl BuildSpec {
    pub fn new(compiler: impl Into<String>, arch: impl Into<String>, flags: impl Into<String>) -> Self {
        Self {
            compiler: compiler.into(),
            arch: arch.into(),
            flags: flags.into(),
        }
    }

    /// The artifact file name for this specification: `<compiler>_<arch><flags>`
    /// with all whitespace removed.
    ///
    /// Path separators in any of the three fields are replaced with `_` so the
    /// artifact always lands directly inside the build directory.
    pub fn output_id(&self) -> String {
        format!(
            "{}_{}{}",
            file_name_part(&self.compiler),
            file_name_part(&self.arch),
            file_name_part(&self.flags)
        )
    }

    /// The human-readable descriptor printed on status lines:
    /// `<compiler>/<arch>/<flags>` with the first space of the flags turned into a comma.
    pub fn descriptor(&self) -> String {
        format!(
            "{}/{}/{}",
            self.compiler,
            self.arch,
            self.flags.replacen(' ', ",", 1)
        )
    }

    /// Splits the per-specification flags into individual arguments.
    pub fn flag_args(&self) -> Result<Vec<String>> {
        split_flags(&self.flags)
    }
}

/// The whole matrix configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BuildMatrix {
    /// Language for the runner's messages (e.g. "en", "zh-CN").
    /// When absent, the system locale is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// The single source file compiled for every specification.
    #[serde(default = "default_source")]
    pub source: PathBuf,

    /// Flags applied to every specification, before the specification's own flags.
    #[serde(default = "default_shared_flags")]
    pub shared_flags: String,

    /// Directory receiving one artifact per specification. Removed at the end of a run.
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,

    /// The compiler argument that selects the target architecture.
    #[serde(default = "default_arch_flag")]
    pub arch_flag: String,

    /// Optional limit for every compiler and artifact process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub specs: Vec<BuildSpec>,
}

impl Default for BuildMatrix {
    fn default() -> Self {
        Self {
            language: None,
            source: default_source(),
            shared_flags: default_shared_flags(),
            build_dir: default_build_dir(),
            arch_flag: default_arch_flag(),
            timeout_secs: None,
            specs: vec![BuildSpec::new("clang", "x86_64", "-O0")],
        }
    }
}

fn default_source() -> PathBuf {
    PathBuf::from("demo.c")
}

fn default_shared_flags() -> String {
    "-std=c99".to_string()
}

fn default_build_dir() -> PathBuf {
    PathBuf::from("build")
}

fn default_arch_flag() -> String {
    "-arch".to_string()
}

/// Drops whitespace and turns path separators into `_`.
fn file_name_part(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect()
}

/// Path components with `.` dropped, for lexical containment checks.
fn components(path: &Path) -> Vec<Component<'_>> {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Whether `path` names `dir` itself or something below it.
fn lies_within(path: &Path, dir: &Path) -> bool {
    let path = components(path);
    let dir = components(dir);
    !dir.is_empty() && path.starts_with(&dir)
}

fn split_flags(flags: &str) -> Result<Vec<String>> {
    shlex::split(flags).ok_or_else(|| anyhow::anyhow!(t!("config.bad_flags", flags = flags).to_string()))
}

impl BuildMatrix {
    /// Parses a matrix from TOML text and validates it.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let matrix: BuildMatrix = toml::from_str(content)?;
        matrix.validate()?;
        Ok(matrix)
    }

    /// Reads, parses and validates a matrix file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| t!("config.read_failed", path = path.display()).to_string())?;
        let matrix: BuildMatrix = toml::from_str(&content)
            .with_context(|| t!("config.parse_failed", path = path.display()).to_string())?;
        matrix
            .validate()
            .and_then(|()| matrix.check_not_in_build_dir(path))
            .with_context(|| t!("config.invalid").to_string())?;
        Ok(matrix)
    }

    /// Resolves the matrix for a run.
    ///
    /// An explicit path must exist. Without one, `BuildMatrix.toml` in the
    /// current directory is used when present, else the built-in matrix.
    /// The returned path is `None` when the built-in matrix was chosen.
    pub fn resolve(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }
        let implicit = Path::new(DEFAULT_CONFIG_FILE);
        if implicit.is_file() {
            return Ok((Self::load(implicit)?, Some(implicit.to_path_buf())));
        }
        let matrix = Self::default();
        matrix.validate()?;
        Ok((matrix, None))
    }

    /// Checks the matrix before anything is built.
    ///
    /// Rejects empty compiler or architecture fields, flag strings that cannot
    /// be split into arguments, a zero timeout, and specifications whose
    /// output identifiers collide.
    ///
    /// The build directory is deleted after every run, so it must be a
    /// non-empty relative path without `.` or `..` components, and must not
    /// contain the source file.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == Some(0) {
            bail!(t!("config.zero_timeout").to_string());
        }
        self.validate_build_dir()?;
        self.check_not_in_build_dir(&self.source)?;
        split_flags(&self.shared_flags)?;

        let mut seen: HashMap<String, &BuildSpec> = HashMap::new();
        for (index, spec) in self.specs.iter().enumerate() {
            let position = index + 1;
            for (field, value) in [("compiler", &spec.compiler), ("arch", &spec.arch)] {
                if value.trim().is_empty() {
                    bail!(t!("config.empty_field", index = position, field = field).to_string());
                }
            }
            spec.flag_args()?;

            let id = spec.output_id();
            if let Some(first) = seen.get(&id) {
                bail!(
                    t!(
                        "config.duplicate_output",
                        first = first.descriptor(),
                        second = spec.descriptor(),
                        id = id
                    )
                    .to_string()
                );
            }
            seen.insert(id, spec);
        }
        Ok(())
    }

    fn validate_build_dir(&self) -> Result<()> {
        let dir = &self.build_dir;
        let plain = !dir.as_os_str().is_empty()
            && dir
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            bail!(t!("config.unsafe_build_dir", path = dir.display()).to_string());
        }
        Ok(())
    }

    /// Fails if `path` would be deleted together with the build directory.
    pub fn check_not_in_build_dir(&self, path: &Path) -> Result<()> {
        if lies_within(path, &self.build_dir) {
            bail!(
                t!(
                    "config.inside_build_dir",
                    path = path.display(),
                    dir = self.build_dir.display()
                )
                .to_string()
            );
        }
        Ok(())
    }

    pub fn shared_flag_args(&self) -> Result<Vec<String>> {
        split_flags(&self.shared_flags)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Where the artifact for `spec` is written and later executed from.
    pub fn artifact_path(&self, spec: &BuildSpec) -> PathBuf {
        self.build_dir.join(spec.output_id())
    }
}
