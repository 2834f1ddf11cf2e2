//! Fixed vocabulary tables used by built-in checks across every analyzer layer.
//!
//! These lists are exhaustive and must match spec.md §6 verbatim — they are
//! not configurable, unlike the user-supplied rule sets each layer also
//! consumes.

/// Shells recognized for `is_shell` classification and `-c` recursion.
pub const SHELLS: &[&str] = &["sh", "bash", "zsh", "dash", "ksh", "fish", "csh", "tcsh"];

/// Code interpreters recognized for `-c` recursion alongside shells.
pub const CODE_INTERPRETERS: &[&str] =
    &["python", "python3", "python2", "node", "ruby", "perl", "lua", "php"];

/// Tools whose second token is a meaningful subcommand/verb.
pub const SUBCOMMAND_TOOLS: &[&str] = &[
    "npm", "pip", "pip3", "yarn", "pnpm", "cargo", "go", "git", "docker", "kubectl", "brew",
    "apt", "apt-get", "systemctl", "service",
];

/// Commands whose job is fetching remote content (pipe-to-shell source side).
pub const DOWNLOAD_COMMANDS: &[&str] = &["curl", "wget", "fetch", "aria2c"];

/// Commands that move data over the network (dataflow sinks, guardian signals).
pub const NETWORK_COMMANDS: &[&str] = &[
    "curl", "wget", "nc", "ncat", "socat", "telnet", "ssh", "scp", "rsync", "ftp", "sftp",
];

/// DNS lookup tools, used both as an exfil side-channel check and as an
/// `-safe` allowlist target (DMARC/SPF/etc. record lookups).
pub const DNS_COMMANDS: &[&str] = &["dig", "nslookup", "host"];

/// Commands that transform bytes without being a sink or source themselves.
pub const ENCODING_COMMANDS: &[&str] =
    &["base64", "base32", "xxd", "od", "hexdump", "gzip", "bzip2", "xz"];

/// Targets that make a `pipe-to-X` structurally notable even without being a shell.
pub const DANGEROUS_PIPE_TARGETS: &[&str] =
    &["crontab", "at", "tee", "dd", "mysql", "psql", "sqlite3"];

/// System directories protected against recursive-force deletion and
/// world-writable chmod.
pub const SYSTEM_DIRECTORIES: &[&str] = &[
    "/etc", "/usr", "/usr/local", "/var", "/var/log", "/boot", "/sys", "/proc", "/lib", "/lib64",
    "/sbin", "/bin", "/opt", "/usr/bin", "/usr/lib",
];

/// Paths whose exact value (not just prefix) marks a dataflow source as sensitive.
pub const SENSITIVE_EXACT_PATHS: &[&str] = &["/etc/passwd", "/etc/shadow", "/etc/hosts", "/etc/sudoers"];

/// Path prefixes that also mark a dataflow source as sensitive.
pub const SENSITIVE_PREFIX_PATHS: &[&str] = &["/proc/", "/sys/"];

/// Substrings identifying a credential store, regardless of position in the path.
pub const CREDENTIAL_FRAGMENTS: &[&str] =
    &[".ssh/", ".aws/", ".gnupg/", ".kube/", ".npmrc", ".pypirc", ".netrc"];

/// Prefixes identifying a block device (a legitimate `dd`/zero-source sink).
pub const BLOCK_DEVICE_PREFIXES: &[&str] = &[
    "/dev/sd", "/dev/hd", "/dev/nvme", "/dev/vd", "/dev/xvd", "/dev/md", "/dev/dm-", "/dev/loop",
];

/// Zero/random special files that are a meaningless "source" when written to a
/// real sink — legitimate only as input to disk-imaging tools.
pub const ZERO_SOURCES: &[&str] = &["/dev/zero", "/dev/urandom", "/dev/random"];

/// Returns true when `path`, after trimming one trailing `/`, exactly equals
/// one of `SYSTEM_DIRECTORIES`.
pub fn is_system_directory(path: &str) -> bool {
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    SYSTEM_DIRECTORIES.contains(&trimmed)
}

/// Returns true when `path` is a root target: `/`, `/*`, or empty after
/// trimming a trailing slash.
pub fn is_root_target(path: &str) -> bool {
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    trimmed.is_empty() || trimmed == "/" || path == "/*"
}

/// Returns true when `path` names a block device by prefix.
pub fn is_block_device(path: &str) -> bool {
    BLOCK_DEVICE_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// Returns true when `path` is one of the zero/random special sources.
pub fn is_zero_source(path: &str) -> bool {
    ZERO_SOURCES.contains(&path)
}

/// Returns true when `path` is a sensitive read target (exact or prefix match).
pub fn is_sensitive_path(path: &str) -> bool {
    SENSITIVE_EXACT_PATHS.contains(&path) || SENSITIVE_PREFIX_PATHS.iter().any(|p| path.starts_with(p))
}

/// Returns true when `path` contains a credential-store fragment anywhere.
pub fn has_credential_fragment(path: &str) -> bool {
    CREDENTIAL_FRAGMENTS.iter().any(|f| path.contains(f))
}

/// Returns true when `path` looks like a cron spool/table target.
pub fn is_cron_sink(path: &str) -> bool {
    path.contains("/cron") || path.contains("/spool/cron") || path.contains("/crontabs/")
}

pub fn is_shell(executable: &str) -> bool {
    SHELLS.contains(&executable)
}

pub fn is_code_interpreter(executable: &str) -> bool {
    CODE_INTERPRETERS.contains(&executable)
}

pub fn is_download_command(executable: &str) -> bool {
    DOWNLOAD_COMMANDS.contains(&executable)
}

pub fn is_network_command(executable: &str) -> bool {
    NETWORK_COMMANDS.contains(&executable)
}

pub fn is_dns_command(executable: &str) -> bool {
    DNS_COMMANDS.contains(&executable)
}

pub fn is_encoding_command(executable: &str) -> bool {
    ENCODING_COMMANDS.contains(&executable)
}
