//! Randomized retention checks
//!
//! Seeded so failures reproduce.

use autosnap_rotation::rotate;
use filetime::{set_file_mtime, FileTime};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_keeps_exactly_the_newest_k() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xA5A5);

    for round in 0..25 {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();

        let n: usize = rng.gen_range(1..20);
        let k: usize = rng.gen_range(1..=n + 2);

        // Distinct mtimes, created in random order
        let mut mtimes: Vec<i64> = (0..n as i64).map(|i| 1_600_000_000 + i * 60).collect();
        mtimes.shuffle(&mut rng);

        let mut expected: Vec<(i64, String)> = Vec::new();
        for (i, mtime) in mtimes.iter().enumerate() {
            let name = format!("doc_{:03}.ext", i);
            let path = dir.join(&name);
            fs::write(&path, b"snapshot").unwrap();
            set_file_mtime(&path, FileTime::from_unix_time(*mtime, 0)).unwrap();
            expected.push((*mtime, name));
        }

        // Noise that must survive
        fs::write(dir.join("doc.ext"), b"live document").unwrap();
        fs::write(dir.join("doc_notes.txt"), b"unrelated").unwrap();

        expected.sort();
        let removed_count = n.saturating_sub(k);
        let expected_removed: BTreeSet<String> =
            expected.iter().take(removed_count).map(|(_, name)| name.clone()).collect();
        let expected_kept: BTreeSet<String> =
            expected.iter().skip(removed_count).map(|(_, name)| name.clone()).collect();

        let report = rotate(dir, "doc", "ext", k, None).unwrap();

        let removed: BTreeSet<String> = report
            .deleted
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(removed, expected_removed, "round {} (n={}, k={})", round, n, k);

        for name in &expected_kept {
            assert!(dir.join(name).exists(), "round {}: {} should remain", round, name);
        }
        for name in &expected_removed {
            assert!(!dir.join(name).exists(), "round {}: {} should be gone", round, name);
        }
        assert!(dir.join("doc.ext").exists());
        assert!(dir.join("doc_notes.txt").exists());
    }
}

#[test]
fn test_ties_resolved_lexically() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    let mut names: Vec<String> = (0..10)
        .map(|i| format!("doc_{}.ext", (b'a' + i) as char))
        .collect();
    names.shuffle(&mut rng);
    for name in &names {
        let path = dir.join(name);
        fs::write(&path, b"x").unwrap();
        set_file_mtime(&path, FileTime::from_unix_time(1_650_000_000, 0)).unwrap();
    }

    let report = rotate(dir, "doc", "ext", 4, None).unwrap();
    let removed: Vec<String> = report
        .deleted
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(
        removed,
        ["doc_a.ext", "doc_b.ext", "doc_c.ext", "doc_d.ext", "doc_e.ext", "doc_f.ext"]
    );
}
