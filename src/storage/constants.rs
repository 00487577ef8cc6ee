// Filesystem default
pub const DEFAULT_FS_ROOT: &str = "./storage";

// Quota granted to an application namespace when none is configured (1 GiB)
pub const DEFAULT_QUOTA_BYTES: u64 = 1024 * 1024 * 1024;

// How many names a confirmation prompt or error summary shows before eliding
pub const PREVIEW_LIMIT: usize = 5;
