//! Shared constants between the driver library and its front ends.

/// External tools invoked by the RBD driver
pub mod tools {
    /// Ceph block device tool (map, unmap, flatten)
    pub const RBD: &str = "rbd";

    /// File-type inspection tool, run as `file -s <device>`
    pub const FILE: &str = "file";

    /// Prefix of the filesystem creation tools (`mkfs.ext4`, `mkfs.xfs`, ...)
    pub const MKFS_PREFIX: &str = "mkfs.";

    /// Build the filesystem creation tool name for a filesystem type.
    pub fn mkfs(fs_type: &str) -> String {
        format!("{}{}", MKFS_PREFIX, fs_type)
    }
}

/// Driver registration names
pub mod drivers {
    /// Name the RBD driver registers under
    pub const RBD: &str = "rbd";
}

/// Keys recognized in a volume descriptor
pub mod descriptor {
    pub const KEYRING: &str = "keyring";
    pub const AUTH_ENABLED: &str = "auth_enabled";
    pub const AUTH_USERNAME: &str = "auth_username";
    pub const HOSTS: &str = "hosts";
    pub const PORTS: &str = "ports";
    pub const NAME: &str = "name";
    pub const ACCESS_MODE: &str = "access_mode";
    pub const VOLUME_TYPE: &str = "volume_type";
}

/// Exit statuses with a meaning for the driver
pub mod status {
    /// `rbd map` exits with EINVAL when the image has too many parent layers.
    /// Flattening the image and mapping again usually succeeds.
    pub const INVALID_ARGUMENT: i32 = libc::EINVAL;
}

/// Environment variables
pub mod envs {
    /// Colon-separated directories searched for tools instead of `PATH`
    pub const SEARCH_PATH: &str = "CINDER_RBD_SEARCH_PATH";

    /// Driver options file read by the CLI when `--config` is not given
    pub const CONFIG: &str = "CINDER_RBD_CONFIG";

    /// Process search path
    pub const PATH: &str = "PATH";
}
