//! Snapshot file naming
//!
//! Snapshots are named `{base}_{DD_MM_YYYY_HH-MM}.{ext}`. The rotator only
//! matches the `{base}_` prefix and `.{ext}` suffix, so anything in between
//! (including a collision counter) stays within the rotation domain.

use chrono::NaiveDateTime;

/// Base name used when the document has never been saved
pub const UNTITLED_BASE_NAME: &str = "untitled";

/// strftime pattern for the timestamp component (24-hour clock)
pub const TIMESTAMP_FORMAT: &str = "%d_%m_%Y_%H-%M";

/// Format the timestamp component of a snapshot name
pub fn timestamp_component(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Name prefix shared by every snapshot of `base_name`
pub fn snapshot_prefix(base_name: &str) -> String {
    format!("{}_", base_name)
}

/// Name suffix for `extension` (leading dot optional, empty means none)
pub fn snapshot_suffix(extension: &str) -> String {
    let ext = extension.trim_start_matches('.');
    if ext.is_empty() {
        String::new()
    } else {
        format!(".{}", ext)
    }
}

/// File name for the `attempt`-th candidate within one minute
///
/// Attempt 1 is the plain name; later attempts append `_{attempt}` so a
/// second save inside the same minute never overwrites the first.
pub fn snapshot_file_name(
    base_name: &str,
    extension: &str,
    at: NaiveDateTime,
    attempt: u32,
) -> String {
    let stamp = timestamp_component(at);
    let suffix = snapshot_suffix(extension);
    if attempt <= 1 {
        format!("{}{}{}", snapshot_prefix(base_name), stamp, suffix)
    } else {
        format!("{}{}_{}{}", snapshot_prefix(base_name), stamp, attempt, suffix)
    }
}

/// Check whether a file name belongs to the snapshot set of `base_name`
pub fn matches_snapshot(file_name: &str, base_name: &str, extension: &str) -> bool {
    let prefix = snapshot_prefix(base_name);
    let suffix = snapshot_suffix(extension);

    file_name.len() >= prefix.len() + suffix.len()
        && file_name.starts_with(&prefix)
        && file_name.ends_with(&suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(h, m, 42)
            .unwrap()
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(timestamp_component(at(9, 5)), "07_03_2024_09-05");
        assert_eq!(timestamp_component(at(23, 59)), "07_03_2024_23-59");
    }

    #[test]
    fn test_file_name_with_and_without_collision_counter() {
        assert_eq!(
            snapshot_file_name("project", "blend", at(14, 30), 1),
            "project_07_03_2024_14-30.blend"
        );
        assert_eq!(
            snapshot_file_name("project", ".blend", at(14, 30), 3),
            "project_07_03_2024_14-30_3.blend"
        );
        assert_eq!(snapshot_file_name("notes", "", at(14, 30), 1), "notes_07_03_2024_14-30");
    }

    #[test]
    fn test_matches_snapshot() {
        assert!(matches_snapshot("project_07_03_2024_14-30.blend", "project", "blend"));
        assert!(matches_snapshot("project_07_03_2024_14-30_2.blend", "project", "blend"));
        assert!(!matches_snapshot("project.blend", "project", "blend"));
        assert!(!matches_snapshot("project_07_03_2024_14-30.blend1", "project", "blend"));
        assert!(!matches_snapshot("other_07_03_2024_14-30.blend", "project", "blend"));
        assert!(!matches_snapshot("myproject_07_03_2024_14-30.blend", "project", "blend"));
    }

    #[test]
    fn test_prefix_and_suffix_cannot_overlap() {
        // "a_" + ".b" needs at least 4 chars; "a_.b" is the minimum match
        assert!(matches_snapshot("a_.b", "a", "b"));
        assert!(!matches_snapshot("a_b", "a", "_b"));
    }
}
