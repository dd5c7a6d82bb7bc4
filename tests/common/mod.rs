// Shared test helpers for integration tests
#![allow(dead_code)]

use assert_cmd::Command;
use std::env;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

/// A stand-in compiler. It honours `-o <path>` by writing a tiny shell
/// script there, and reacts to a few marker flags:
///
/// - `-DFAIL_BUILD` exits 1 without producing anything
/// - `-DFAIL_RUN` produces an artifact that exits 1
/// - `-DHANG` produces an artifact that sleeps for a long time
const FAKE_COMPILER: &str = r#"#!/bin/sh
out=""
body='echo "demo ran"; exit 0'
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift ;;
    -DFAIL_BUILD) echo "fakecc: error: deliberate build failure" >&2; exit 1 ;;
    -DFAIL_RUN) body='echo "demo failed"; exit 1' ;;
    -DHANG) body='exec sleep 30' ;;
  esac
  shift
done
if [ -z "$out" ]; then
  echo "fakecc: no output file" >&2
  exit 2
fi
printf '#!/bin/sh\n%s\n' "$body" > "$out"
chmod +x "$out"
"#;

/// A scratch working directory with `fakecc` on a private `bin/` directory.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempdir().expect("Failed to create temporary directory");
        let bin = dir.path().join("bin");
        fs::create_dir_all(&bin).expect("Failed to create bin directory");

        let compiler = bin.join("fakecc");
        fs::write(&compiler, FAKE_COMPILER).expect("Failed to write fake compiler");
        fs::set_permissions(&compiler, fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake compiler executable");

        fs::write(dir.path().join("demo.c"), "int main(void) { return 0; }\n")
            .expect("Failed to write demo.c");

        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn build_dir(&self) -> PathBuf {
        self.path().join("build")
    }

    /// Writes a matrix file into the workspace and returns its path.
    pub fn write_matrix(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, content).expect("Failed to write matrix file");
        path
    }

    /// The `build-matrix` binary, run inside the workspace with `fakecc` on `PATH`.
    pub fn command(&self) -> Command {
        let mut path = self.path().join("bin").into_os_string();
        if let Some(existing) = env::var_os("PATH") {
            path.push(":");
            path.push(existing);
        }

        let mut cmd = Command::cargo_bin("build-matrix").expect("binary is built");
        cmd.current_dir(self.path())
            .env("PATH", path)
            .env("NO_COLOR", "1");
        cmd
    }
}
