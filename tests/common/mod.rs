//! Shared fixtures: a throwaway ports tree, a fake `make` and a fake `cvs`.

#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const TARGET: &str = "devel/libfoo";

/// A ports tree under `<temp>/tree` plus a fake build tool under `<temp>/bin`.
pub struct Fixture {
    pub temp: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("tree")).unwrap();
        fs::create_dir(temp.path().join("bin")).unwrap();
        fs::create_dir(temp.path().join("work")).unwrap();

        let fixture = Self { temp };
        // `make -C <dir> -V ...` prints the port's .vars file
        fixture.script("make", "#!/bin/sh\ncat \"$2/.vars\"\n");
        fixture.add_port(TARGET, "PORTNAME=\tlibfoo\nPORTVERSION=\t4.0\n", "\n\n\n0\n");
        fixture
    }

    pub fn root(&self) -> PathBuf {
        self.temp.path().join("tree")
    }

    pub fn work_dir(&self) -> PathBuf {
        self.temp.path().join("work")
    }

    pub fn make(&self) -> PathBuf {
        self.temp.path().join("bin/make")
    }

    pub fn makefile(&self, origin: &str) -> String {
        fs::read_to_string(self.root().join(origin).join("Makefile")).unwrap()
    }

    /// Adds a port with its Makefile and the four lines `make -V` would print.
    pub fn add_port(&self, origin: &str, makefile: impl AsRef<[u8]>, vars: &str) {
        let dir = self.root().join(origin);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("Makefile"), makefile).unwrap();
        fs::write(dir.join(".vars"), vars).unwrap();
    }

    /// Writes an executable script into the fixture's bin directory.
    pub fn script(&self, name: &str, body: &str) -> PathBuf {
        let path = self.temp.path().join("bin").join(name);
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// A `cvs` that records its arguments and copies requested ports from the tree.
    pub fn fake_cvs(&self) -> PathBuf {
        let body = format!(
            r#"#!/bin/sh
echo "$@" > cvs-args
shift 3
for path in "$@"; do
    case "$path" in
        ports/UPDATING) mkdir -p ports && touch ports/UPDATING ;;
        ports/*)
            mkdir -p "$path"
            cp "{root}/${{path#ports/}}/Makefile" "$path/Makefile"
            ;;
    esac
done
"#,
            root = self.root().display()
        );
        self.script("cvs", &body)
    }

    /// Library options for the `libfoo.3` → `libfoo.4` bump.
    pub fn library_args(&self) -> Vec<String> {
        vec![
            "--port-origin".into(),
            TARGET.into(),
            "--lib-name".into(),
            "libfoo".into(),
            "--lib-old-version".into(),
            "3".into(),
            "--lib-new-version".into(),
            "4".into(),
            "--ports-path".into(),
            self.root().display().to_string(),
            "--make".into(),
            self.make().display().to_string(),
        ]
    }

    pub fn run(&self, subcommand: &str, extra_args: &[&str]) -> assert_cmd::assert::Assert {
        let mut cmd = cargo_bin_cmd!("portbump");
        cmd.arg(subcommand)
            .args(self.library_args())
            .args(extra_args)
            .current_dir(self.work_dir())
            .env_remove("RUST_LOG");

        cmd.assert()
    }
}

pub fn backup_exists(path: &Path) -> bool {
    let mut name = path.as_os_str().to_owned();
    name.push(".orig");
    PathBuf::from(name).exists()
}
