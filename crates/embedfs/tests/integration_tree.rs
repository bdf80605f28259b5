//! Integration tests for building trees from on-disk and in-memory sources.
//!
//! Covers the complete workflow: lay out a source, configure a builder,
//! populate a root and query the result the way a serving runtime would.

use embedfs::{
    DEFAULT_FILE_MODE, DirSource, EmbedFsError, Inode, MemorySource, MountConfig, Node,
    TreeBuilder,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, path: &str, content: &str) {
    let full = root.join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(full, content).unwrap();
}

/// Lays out the two-directory scenario under `testdata/`.
fn testdata() -> TempDir {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "testdata/dir_a/file_a.txt", "Content of file_a.txt");
    write(temp.path(), "testdata/dir_b/file_b.txt", "Content of file_b.txt");
    temp
}

/// Test the reference scenario end to end from a real directory
#[test]
fn test_dir_source_scenario() {
    let temp = testdata();

    let root = TreeBuilder::new(DirSource::new(temp.path()), "testdata")
        .build()
        .unwrap();

    assert_eq!(root.list_dir("/").unwrap(), ["dir_a", "dir_b"]);
    for file in ["dir_a/file_a.txt", "dir_b/file_b.txt"] {
        let name = file.rsplit('/').next().unwrap();
        let content = root.read_file(file).unwrap();
        assert_eq!(content, format!("Content of {name}").as_bytes());
    }
}

/// Test mode override on one file while the other keeps the default
#[test]
fn test_dir_source_mode_override() {
    let temp = testdata();

    let mut builder = TreeBuilder::new(DirSource::new(temp.path()), "testdata");
    builder.chmod("dir_a/file_a.txt", 0o644);
    let root = builder.build().unwrap();

    assert_eq!(root.mode("dir_a/file_a.txt").unwrap(), 0o644);
    assert_eq!(root.mode("dir_b/file_b.txt").unwrap(), DEFAULT_FILE_MODE);
}

/// Test that every file from the source is reachable with identical content
#[test]
fn test_completeness_many_files() {
    let temp = TempDir::new().unwrap();
    let mut expected = Vec::new();
    for dir in 0..5 {
        for file in 0..20 {
            let path = format!("bundle/d{dir}/sub{}/f{file}.txt", file % 3);
            let content = format!("file {dir}/{file}");
            write(temp.path(), &path, &content);
            expected.push((path, content));
        }
    }

    let root = TreeBuilder::new(DirSource::new(temp.path()), "bundle")
        .build()
        .unwrap();

    assert_eq!(root.file_count(), expected.len());
    // d0..d4 plus three sub directories in each
    assert_eq!(root.dir_count(), 5 + 5 * 3);
    for (path, content) in &expected {
        let relative = path.strip_prefix("bundle/").unwrap();
        assert_eq!(root.read_file(relative).unwrap(), content.as_bytes());
    }
}

/// Test that empty directories on disk are not represented
#[test]
fn test_empty_directories_are_skipped() {
    let temp = testdata();
    fs::create_dir_all(temp.path().join("testdata/empty/nested")).unwrap();

    let root = TreeBuilder::new(DirSource::new(temp.path()), "testdata")
        .build()
        .unwrap();

    assert!(root.lookup("empty").is_none());
    assert_eq!(root.list_dir("").unwrap(), ["dir_a", "dir_b"]);
}

/// Test an empty source directory
#[test]
fn test_empty_source_directory() {
    let temp = TempDir::new().unwrap();

    let mut root = Node::new_directory();
    let stats = TreeBuilder::new(DirSource::new(temp.path()), "testdata")
        .populate(&mut root)
        .unwrap();

    assert!(root.list_dir("").unwrap().is_empty());
    assert_eq!(stats.files_placed, 0);
    assert_eq!(stats.directories_created, 0);
}

/// Test source rooted directly at the prefix directory
#[test]
fn test_source_rooted_at_prefix() {
    let temp = testdata();

    let root = TreeBuilder::new(DirSource::new(temp.path().join("testdata")), "")
        .build()
        .unwrap();

    assert_eq!(
        root.read_file("dir_a/file_a.txt").unwrap(),
        b"Content of file_a.txt"
    );
}

/// Test that a missing source root fails the whole build
#[test]
fn test_missing_source_root() {
    let temp = TempDir::new().unwrap();

    let err = TreeBuilder::new(DirSource::new(temp.path().join("gone")), "testdata")
        .build()
        .unwrap_err();

    assert!(matches!(err, EmbedFsError::Enumeration { .. }));
    assert!(err.is_fatal_build_error());
}

/// Test binary content survives unchanged
#[test]
fn test_binary_content() {
    let bytes: Vec<u8> = (0..=255).collect();
    let source = MemorySource::new().with_file("bin/blob.dat", bytes.clone());

    let root = TreeBuilder::new(source, "bin").build().unwrap();
    assert_eq!(root.read_file("blob.dat").unwrap(), bytes.as_slice());
}

/// Test building from a static bundle table
#[test]
fn test_static_bundle() {
    static BUNDLE: &[(&str, &[u8])] = &[
        ("web/index.html", b"<html></html>"),
        ("web/css/site.css", b"body {}"),
        ("web/js/app.js", b"main();"),
    ];

    let root = TreeBuilder::new(MemorySource::from_static(BUNDLE), "web")
        .build()
        .unwrap();

    assert_eq!(root.list_dir("").unwrap(), ["css", "index.html", "js"]);
    assert_eq!(root.read_file("js/app.js").unwrap(), b"main();");
}

/// Test configuration file driving a build
#[test]
fn test_config_file_workflow() {
    let temp = testdata();
    let config_path = temp.path().join("mount.toml");
    fs::write(
        &config_path,
        r#"
prefix = "testdata"
default_mode = 0o440

[modes]
"/dir_b/file_b.txt" = 0o640
"#,
    )
    .unwrap();

    let config = MountConfig::from_file(&config_path).unwrap();
    let root = config
        .builder(DirSource::new(temp.path()))
        .build()
        .unwrap();

    // The config file itself lives outside the prefix
    assert!(!root.read_file("mount.toml").unwrap().is_empty());
    assert_eq!(root.mode("dir_a/file_a.txt").unwrap(), 0o440);
    assert_eq!(root.mode("dir_b/file_b.txt").unwrap(), 0o640);
}

/// Test that a built tree can be shared across threads
#[test]
fn test_concurrent_reads() {
    use std::sync::Arc;
    use std::thread;

    let temp = testdata();
    let root = Arc::new(
        TreeBuilder::new(DirSource::new(temp.path()), "testdata")
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let root = Arc::clone(&root);
            thread::spawn(move || {
                for _ in 0..100 {
                    assert_eq!(
                        root.read_file("dir_b/file_b.txt").unwrap(),
                        b"Content of file_b.txt"
                    );
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
