// Linux-specific helpers: /proc/filesystems.

use std::collections::HashSet;

/// Filesystem types the kernel marks `nodev` (proc, tmpfs, overlay, ...). None off Linux
/// or when /proc/filesystems is unreadable.
pub(super) fn nodev_filesystems() -> Option<HashSet<String>> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/filesystems").ok()?;
        let set = parse_nodev(&content);
        if !set.is_empty() {
            return Some(set);
        }
    }
    None
}

/// Lines look like `nodev\tsysfs` or `\text4`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_nodev(content: &str) -> HashSet<String> {
    content
        .lines()
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            match (cols.next(), cols.next()) {
                (Some("nodev"), Some(fs)) => Some(fs.to_string()),
                _ => None,
            }
        })
        .collect()
}
