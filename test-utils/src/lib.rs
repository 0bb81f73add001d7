//! Fake `rbd`, `file` and `mkfs.*` tools for driver tests.
//!
//! [`FakeTools`] writes small `/bin/sh` scripts into a temp `bin/` dir. The
//! scripts append every invocation to a log and keep per-device state on
//! disk, so `mkfs.<fs>` on a device makes a later `file -s` report that
//! filesystem. They only use shell builtins, so a search path holding just
//! the fake `bin/` dir is enough to run them.

use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use parking_lot::{MutexGuard, const_mutex};
use tempfile::TempDir;

// Writing an executable while another test thread forks can make exec fail
// with ETXTBSY, so fake tool sets are used one at a time per process.
static TOOLS_LOCK: parking_lot::Mutex<()> = const_mutex(());

/// Outcome of one `rbd map` invocation.
#[derive(Debug, Clone)]
pub enum MapOutcome {
    /// Print the device path and exit 0.
    Device(String),
    /// Print `warning` to stderr, then the device path, and exit 0.
    DeviceWithWarning(String, String),
    /// Print `message` to stderr and exit with `code`.
    Fail(i32, String),
}

/// `rbd map` failing with EINVAL the way the kernel client reports it.
pub fn map_einval() -> MapOutcome {
    MapOutcome::Fail(
        22,
        "rbd: sysfs write failed\nrbd: map failed: (22) Invalid argument".to_string(),
    )
}

/// Builder for a [`FakeTools`] set.
#[derive(Debug, Clone)]
pub struct FakeToolsBuilder {
    rbd: bool,
    file: bool,
    map: Vec<MapOutcome>,
    flatten_exit: i32,
    unmap_exit: i32,
    file_exit: i32,
    file_output: Option<String>,
    mkfs: Vec<(String, i32)>,
}

impl Default for FakeToolsBuilder {
    fn default() -> Self {
        Self {
            rbd: true,
            file: true,
            map: vec![MapOutcome::Device("/dev/rbd0".to_string())],
            flatten_exit: 0,
            unmap_exit: 0,
            file_exit: 0,
            file_output: None,
            mkfs: vec![("ext4".to_string(), 0)],
        }
    }
}

impl FakeToolsBuilder {
    /// Outcomes of successive `rbd map` calls; the last one repeats.
    pub fn map(mut self, outcomes: Vec<MapOutcome>) -> Self {
        assert!(!outcomes.is_empty(), "at least one map outcome is required");
        self.map = outcomes;
        self
    }

    pub fn flatten_exit(mut self, code: i32) -> Self {
        self.flatten_exit = code;
        self
    }

    pub fn unmap_exit(mut self, code: i32) -> Self {
        self.unmap_exit = code;
        self
    }

    pub fn file_exit(mut self, code: i32) -> Self {
        self.file_exit = code;
        self
    }

    /// Make `file -s` print `output` instead of the tracked device state.
    pub fn file_output(mut self, output: impl Into<String>) -> Self {
        self.file_output = Some(output.into());
        self
    }

    /// Provide `mkfs.<fs_type>` exiting with `code`, replacing an earlier
    /// `mkfs` for the same fs type. Other `mkfs.*` tools are kept.
    pub fn mkfs(mut self, fs_type: &str, code: i32) -> Self {
        self.mkfs.retain(|(fs, _)| fs != fs_type);
        self.mkfs.push((fs_type.to_string(), code));
        self
    }

    /// Leave out every `mkfs.*` tool.
    pub fn without_mkfs(mut self) -> Self {
        self.mkfs.clear();
        self
    }

    pub fn without_rbd(mut self) -> Self {
        self.rbd = false;
        self
    }

    pub fn without_file(mut self) -> Self {
        self.file = false;
        self
    }

    /// Write the scripts. Blocks while another `FakeTools` is alive.
    pub fn build(self) -> FakeTools {
        let guard = TOOLS_LOCK.lock();
        let dir = TempDir::new().expect("Failed to create fake tools dir");
        let tools = FakeTools { dir, _guard: guard };

        std::fs::create_dir_all(tools.bin_dir()).expect("Failed to create bin dir");
        std::fs::create_dir_all(tools.state_dir()).expect("Failed to create state dir");

        if self.rbd {
            tools.write_script("rbd", &self.rbd_script(&tools));
        }
        if self.file {
            tools.write_script("file", &self.file_script(&tools));
        }
        for (fs_type, code) in &self.mkfs {
            tools.write_script(
                &format!("mkfs.{}", fs_type),
                &mkfs_script(&tools, fs_type, *code),
            );
        }
        tools
    }

    fn rbd_script(&self, tools: &FakeTools) -> String {
        let mut arms = String::new();
        for (i, outcome) in self.map.iter().enumerate() {
            let label = if i + 1 == self.map.len() {
                "*".to_string()
            } else {
                (i + 1).to_string()
            };
            let body = match outcome {
                MapOutcome::Device(device) => format!("echo {}", quote(device)),
                MapOutcome::DeviceWithWarning(device, warning) => {
                    format!("echo {} >&2; echo {}", quote(warning), quote(device))
                }
                MapOutcome::Fail(code, message) => {
                    format!("echo {} >&2; exit {}", quote(message), code)
                }
            };
            arms.push_str(&format!("    {}) {} ;;\n", label, body));
        }

        format!(
            r#"#!/bin/sh
{header}
echo "rbd $*" >> "$LOG"
case "$1" in
map)
    n=0
    if [ -f "$STATE/map.count" ]; then read n < "$STATE/map.count"; fi
    n=$((n + 1))
    echo "$n" > "$STATE/map.count"
    case "$n" in
{arms}    esac
    ;;
unmap)
    if [ {unmap} -ne 0 ]; then echo "rbd: sysfs write failed" >&2; exit {unmap}; fi
    ;;
flatten)
    if [ {flatten} -ne 0 ]; then echo "rbd: flatten error" >&2; exit {flatten}; fi
    echo "Image flatten: 100% complete...done."
    ;;
*)
    echo "rbd: unknown command $1" >&2
    exit 1
    ;;
esac
"#,
            header = tools.header(),
            arms = arms,
            unmap = self.unmap_exit,
            flatten = self.flatten_exit,
        )
    }

    fn file_script(&self, tools: &FakeTools) -> String {
        let describe = match &self.file_output {
            Some(output) => format!("echo {}", quote(output)),
            None => r#"if [ -f "$STATE/fs.${dev##*/}" ]; then
    read fs < "$STATE/fs.${dev##*/}"
    echo "$dev: Linux rev 1.0 $fs filesystem data (extents) (64bit)"
else
    echo "$dev: data"
fi"#
            .to_string(),
        };

        format!(
            r#"#!/bin/sh
{header}
echo "file $*" >> "$LOG"
dev="$2"
if [ {code} -ne 0 ]; then echo "file: cannot open $dev" >&2; exit {code}; fi
{describe}
"#,
            header = tools.header(),
            code = self.file_exit,
            describe = describe,
        )
    }
}

fn mkfs_script(tools: &FakeTools, fs_type: &str, code: i32) -> String {
    format!(
        r#"#!/bin/sh
{header}
echo "mkfs.{fs} $*" >> "$LOG"
dev="$1"
if [ {code} -ne 0 ]; then echo "mkfs.{fs}: cannot format $dev" >&2; exit {code}; fi
echo {fs_quoted} > "$STATE/fs.${{dev##*/}}"
echo "Writing superblocks and filesystem accounting information: done"
"#,
        header = tools.header(),
        fs = fs_type,
        fs_quoted = quote(fs_type),
        code = code,
    )
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// A set of fake tools in a temp dir, removed on drop.
pub struct FakeTools {
    dir: TempDir,
    _guard: MutexGuard<'static, ()>,
}

impl FakeTools {
    pub fn builder() -> FakeToolsBuilder {
        FakeToolsBuilder::default()
    }

    /// Default tools: `rbd map` prints `/dev/rbd0`, blank device, `mkfs.ext4` works.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.dir.path().join("bin")
    }

    fn state_dir(&self) -> PathBuf {
        self.dir.path().join("state")
    }

    fn log_path(&self) -> PathBuf {
        self.dir.path().join("calls.log")
    }

    /// Search path containing only the fake tools.
    pub fn search_path(&self) -> OsString {
        self.bin_dir().into_os_string()
    }

    /// Logged invocations in order, e.g. `"rbd map vol1"`.
    pub fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.log_path())
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Number of logged invocations starting with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    /// Pretend `device` already carries a `fs_type` filesystem.
    pub fn preformat(&self, device: &str, fs_type: &str) {
        let name = Path::new(device)
            .file_name()
            .expect("device path must have a file name");
        std::fs::write(
            self.state_dir().join(format!("fs.{}", name.to_string_lossy())),
            format!("{}\n", fs_type),
        )
        .expect("Failed to write device state");
    }

    fn header(&self) -> String {
        format!(
            "LOG={}\nSTATE={}",
            quote(&self.log_path().to_string_lossy()),
            quote(&self.state_dir().to_string_lossy())
        )
    }

    fn write_script(&self, name: &str, content: &str) {
        let path = self.bin_dir().join(name);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(0o755)
            .open(&path)
            .unwrap_or_else(|e| panic!("Failed to create {}: {}", path.display(), e));
        file.write_all(content.as_bytes())
            .unwrap_or_else(|e| panic!("Failed to write {}: {}", path.display(), e));
    }
}

impl Default for FakeTools {
    fn default() -> Self {
        Self::new()
    }
}
