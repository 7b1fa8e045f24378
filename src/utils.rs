/// Appends `name` to a remote directory path without doubling separators.
pub fn join(directory: &str, name: &str) -> String {
    if directory.is_empty() {
        name.to_owned()
    } else if directory.ends_with('/') {
        format!("{directory}{name}")
    } else {
        format!("{directory}/{name}")
    }
}

/// Root-relative form of a remote path, as reported in tree entries.
pub fn relative(path: &str) -> &str {
    path.trim_start_matches('/')
}

/// Non-empty, trimmed segments of a `/` separated path.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').map(str::trim).filter(|s| !s.is_empty())
}

/// Last segment of a name returned by `NLST`, which some servers prefix
/// with the listed directory.
pub fn base_name(name: &str) -> &str {
    name.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(name)
}
