//! Filesystem detection and creation on a mapped device.

use std::path::Path;

use cinder_shared::{CinderError, CinderResult};

use crate::exec::CommandRunner;

/// Describe the device content with `file -s <device>`.
pub(crate) fn inspect(
    runner: &dyn CommandRunner,
    file: &Path,
    volume: &str,
    device: &str,
) -> CinderResult<String> {
    let info = runner
        .run(file, &["-s", device])
        .map_err(|e| CinderError::InspectFailed {
            volume: volume.to_string(),
            device: device.to_string(),
            source: e,
        })?;

    tracing::debug!(volume, device, info = %info.trim(), "Inspected rbd device");
    Ok(info)
}

/// Whether `file -s` output reports a `fs_type` filesystem.
///
/// Plain case-sensitive substring match on `"<fs_type> filesystem"`, the
/// wording `file` uses for e.g. `Linux rev 1.0 ext4 filesystem data`.
pub(crate) fn has_filesystem(info: &str, fs_type: &str) -> bool {
    info.contains(&format!("{} filesystem", fs_type))
}

/// Run `mkfs.<fs_type> <device>` with no extra flags.
pub(crate) fn make_filesystem(
    runner: &dyn CommandRunner,
    mkfs: &Path,
    volume: &str,
    device: &str,
    fs_type: &str,
) -> CinderResult<()> {
    tracing::info!(volume, device, fs_type, "Creating filesystem on rbd device");

    runner
        .run(mkfs, &[device])
        .map_err(|e| CinderError::FormatFailed {
            volume: volume.to_string(),
            device: device.to_string(),
            fs_type: fs_type.to_string(),
            source: e,
        })?;

    tracing::info!(volume, device, fs_type, "Formatted rbd device successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::testing::{FakeRunner, Reply};

    #[test]
    fn test_has_filesystem() {
        let ext4 = "/dev/rbd0: Linux rev 1.0 ext4 filesystem data, UUID=1b2c (extents) (64bit)";
        assert!(has_filesystem(ext4, "ext4"));
        assert!(!has_filesystem(ext4, "xfs"));
        assert!(!has_filesystem("/dev/rbd0: data", "ext4"));
        assert!(has_filesystem(
            "/dev/rbd0: SGI XFS filesystem data (blksz 4096)",
            "XFS"
        ));
        // Case-sensitive, as `file` prints it
        assert!(!has_filesystem(
            "/dev/rbd0: SGI XFS filesystem data (blksz 4096)",
            "xfs"
        ));
    }

    #[test]
    fn test_inspect_failure() {
        let runner = FakeRunner::new().reply("file", Reply::Exit(1, "file: cannot open".into()));

        let err = inspect(&runner, Path::new("/fake/bin/file"), "vol1", "/dev/rbd0").unwrap_err();
        assert!(matches!(
            err,
            CinderError::InspectFailed { ref device, .. } if device == "/dev/rbd0"
        ));
        assert_eq!(runner.calls(), vec!["file -s /dev/rbd0"]);
    }

    #[test]
    fn test_make_filesystem_failure() {
        let runner = FakeRunner::new().reply("mkfs.ext4", Reply::Exit(1, "mkfs: bad device".into()));

        let err = make_filesystem(
            &runner,
            Path::new("/fake/bin/mkfs.ext4"),
            "vol1",
            "/dev/rbd0",
            "ext4",
        )
        .unwrap_err();
        assert!(matches!(err, CinderError::FormatFailed { ref fs_type, .. } if fs_type == "ext4"));
        assert_eq!(runner.calls(), vec!["mkfs.ext4 /dev/rbd0"]);
    }
}
