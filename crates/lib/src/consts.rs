/// Environment variable overriding the store file location.
pub const STORE_FILE_ENV: &str = "VERSIONS_FILE";

/// File name of the default store, placed at the filesystem root.
pub const DEFAULT_STORE_FILENAME: &str = "versions.json";

/// Suffix appended to the store path to form its lock file.
pub const LOCK_SUFFIX: &str = ".lock";

/// Suffix appended to the store path for the in-flight write.
pub const TEMP_SUFFIX: &str = ".tmp";
