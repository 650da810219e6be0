//! Two-phase pipeline tests
//!
//! Backup gate, per-file isolation, retry budget and the concurrency
//! ceiling, driven through the public `Pipeline` API.

#[cfg(test)]
mod tests {
    use crate::common::{ScriptedTransformer, Workspace, fast_retry};
    use fixmd::core::providers::Transformer;
    use fixmd::{FixmdError, Pipeline, RetryingTransformer, TransformError};
    use std::fs;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    // ==================== Happy path ====================

    /// Test that a single file is backed up and then rewritten
    #[tokio::test]
    async fn test_single_file_success() {
        let ws = Workspace::new();
        let path = ws.write("a.md", "x");
        let transformer = Arc::new(ScriptedTransformer::uppercase());

        let pipeline = Pipeline::with_transformer(ws.config(), transformer.clone());
        let summary = assert_ok!(pipeline.run(&path, false).await);

        assert_eq!(ws.read("backup/a.md.bak"), "x");
        assert_eq!(ws.read("a.md"), "X");
        assert_eq!(summary.backed_up, 1);
        assert_eq!(summary.progress.success, 1);
        assert_eq!(summary.progress.failed, 0);
        assert!(summary.failures.is_empty());
        assert_eq!(transformer.calls(), 1);
    }

    /// Test that a directory with no matching files is a clean no-op
    #[tokio::test]
    async fn test_empty_directory() {
        let ws = Workspace::new();
        ws.write("notes.txt", "not markdown");
        let transformer = Arc::new(ScriptedTransformer::uppercase());

        let pipeline = Pipeline::with_transformer(ws.config(), transformer.clone());
        let summary = pipeline.run(ws.path(), false).await.unwrap();

        assert!(summary.is_empty());
        assert_eq!(transformer.calls(), 0);
        assert!(!ws.backup_root().exists());
    }

    // ==================== Discovery ====================

    /// Test that non-recursive runs ignore nested files and other extensions
    #[tokio::test]
    async fn test_directory_non_recursive() {
        let ws = Workspace::new();
        for i in 0..5 {
            ws.write(&format!("doc{i}.md"), &format!("doc {i}"));
        }
        ws.write("readme.txt", "skip");
        ws.write("image.png", "skip");
        ws.write("sub/nested.md", "nested");
        let transformer = Arc::new(ScriptedTransformer::uppercase());

        let pipeline = Pipeline::with_transformer(ws.config(), transformer.clone());
        let summary = pipeline.run(ws.path(), false).await.unwrap();

        assert_eq!(summary.progress.total, 5);
        assert_eq!(summary.progress.success, 5);
        assert_eq!(transformer.calls(), 5);
        for i in 0..5 {
            assert_eq!(ws.read(&format!("doc{i}.md")), format!("DOC {i}"));
            assert_eq!(ws.read(&format!("backup/doc{i}.md.bak")), format!("doc {i}"));
        }
        assert_eq!(ws.read("readme.txt"), "skip");
        assert_eq!(ws.read("sub/nested.md"), "nested");
        assert!(!ws.backup_root().join("sub").exists());
    }

    /// Test that recursive runs mirror nested paths under the backup root
    #[tokio::test]
    async fn test_directory_recursive() {
        let ws = Workspace::new();
        ws.write("top.md", "top");
        ws.write("sub/deeper/nested.md", "nested");
        let transformer = Arc::new(ScriptedTransformer::uppercase());

        let pipeline = Pipeline::with_transformer(ws.config(), transformer);
        let summary = pipeline.run(ws.path(), true).await.unwrap();

        assert_eq!(summary.progress.success, 2);
        assert_eq!(ws.read("backup/sub/deeper/nested.md.bak"), "nested");
        assert_eq!(ws.read("sub/deeper/nested.md"), "NESTED");
    }

    // ==================== Failure handling ====================

    /// Test that a file whose every attempt fails keeps its original content
    #[tokio::test]
    async fn test_single_file_exhausts_retries() {
        let ws = Workspace::new();
        let path = ws.write("a.md", "x");
        let inner = Arc::new(ScriptedTransformer::always_failing());
        let retrying = RetryingTransformer::new(inner.clone(), fast_retry(4));

        let pipeline = Pipeline::with_transformer(ws.config(), Arc::new(retrying));
        let summary = pipeline.run(&path, false).await.unwrap();

        assert_eq!(inner.calls(), 4);
        assert_eq!(ws.read("a.md"), "x");
        assert_eq!(ws.read("backup/a.md.bak"), "x");
        assert_eq!(summary.progress.failed, 1);
        assert_eq!(summary.progress.success, 0);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].0, path);
    }

    /// Test that one failing file does not affect its siblings
    #[tokio::test]
    async fn test_failure_is_isolated() {
        let ws = Workspace::new();
        ws.write("good1.md", "fine");
        ws.write("bad.md", "FAIL");
        ws.write("good2.md", "also fine");
        let transformer = Arc::new(ScriptedTransformer::new(|content, _| {
            if content == "FAIL" {
                Err(TransformError::EmptyResponse)
            } else {
                Ok(content.to_uppercase())
            }
        }));

        let pipeline = Pipeline::with_transformer(ws.config(), transformer);
        let summary = pipeline.run(ws.path(), false).await.unwrap();

        assert_eq!(summary.progress.processed, 3);
        assert_eq!(summary.progress.success, 2);
        assert_eq!(summary.progress.failed, 1);
        assert_eq!(ws.read("bad.md"), "FAIL");
        assert_eq!(ws.read("good1.md"), "FINE");
        assert_eq!(ws.read("good2.md"), "ALSO FINE");
    }

    /// Test that a transient failure followed by success rewrites the file
    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let ws = Workspace::new();
        let path = ws.write("a.md", "flaky");
        let inner = Arc::new(ScriptedTransformer::new(|content, call| {
            if call < 2 {
                Err(TransformError::network("connection reset"))
            } else {
                Ok(content.to_uppercase())
            }
        }));
        let retrying = RetryingTransformer::new(inner.clone(), fast_retry(5));

        let pipeline = Pipeline::with_transformer(ws.config(), Arc::new(retrying));
        let summary = pipeline.run(&path, false).await.unwrap();

        assert_eq!(inner.calls(), 3);
        assert_eq!(summary.progress.success, 1);
        assert_eq!(ws.read("a.md"), "FLAKY");
    }

    // ==================== Backup gate ====================

    /// Test that a backup failure aborts the run before any transform
    #[tokio::test]
    async fn test_backup_failure_blocks_all_transforms() {
        let ws = Workspace::new();
        ws.write("a.md", "a");
        ws.write("blocked/b.md", "b");
        ws.write("c.md", "c");
        // A regular file where the backup of blocked/b.md needs a directory
        ws.write("backup/blocked", "not a directory");
        let transformer = Arc::new(ScriptedTransformer::uppercase());

        let pipeline = Pipeline::with_transformer(ws.config(), transformer.clone());
        let err = assert_err!(pipeline.run(ws.path(), true).await);

        assert!(matches!(err, FixmdError::Backup { .. }));
        assert!(err.is_fatal());
        assert_eq!(transformer.calls(), 0);
        assert_eq!(ws.read("a.md"), "a");
        assert_eq!(ws.read("blocked/b.md"), "b");
        assert_eq!(ws.read("c.md"), "c");
    }

    /// Test that every backup exists before the first transform call
    #[tokio::test]
    async fn test_backups_exist_before_transform() {
        let ws = Workspace::new();
        let backup_root = ws.backup_root();
        let names = ["one.md", "two.md", "three.md"];
        for name in names {
            ws.write(name, &format!("original {name}"));
        }
        let checked_root = backup_root.clone();
        let transformer = Arc::new(ScriptedTransformer::new(move |content, _| {
            for name in names {
                let backup = checked_root.join(format!("{name}.bak"));
                let text = fs::read_to_string(&backup).expect("backup missing during transform");
                assert_eq!(text, format!("original {name}"));
            }
            Ok(content.to_uppercase())
        }));

        let pipeline = Pipeline::with_transformer(ws.config(), transformer.clone());
        let summary = pipeline.run(ws.path(), false).await.unwrap();

        assert_eq!(summary.progress.success, 3);
        assert_eq!(transformer.calls(), 3);
    }

    /// Test that files whose backup names collide each keep their own backup
    #[tokio::test]
    async fn test_colliding_backup_names_keep_both_originals() {
        let ws = Workspace::new();
        let outside = tempfile::TempDir::new().unwrap();
        fs::write(outside.path().join("a_b.md"), "first original").unwrap();
        fs::create_dir_all(outside.path().join("a")).unwrap();
        fs::write(outside.path().join("a/b.md"), "second original").unwrap();
        let transformer = Arc::new(ScriptedTransformer::uppercase());

        let pipeline = Pipeline::with_transformer(ws.config(), transformer);
        let summary = pipeline.run(outside.path(), true).await.unwrap();

        assert_eq!(summary.progress.success, 2);
        assert_eq!(summary.backups.len(), 2);
        assert_ne!(summary.backups[0].backup_path, summary.backups[1].backup_path);
        let mut backed_up: Vec<String> = summary
            .backups
            .iter()
            .map(|record| fs::read_to_string(&record.backup_path).unwrap())
            .collect();
        backed_up.sort();
        assert_eq!(backed_up, vec!["first original", "second original"]);
        assert_eq!(
            fs::read_to_string(outside.path().join("a/b.md")).unwrap(),
            "SECOND ORIGINAL"
        );
    }

    /// Test that a second run never replaces the first run's backup
    #[tokio::test]
    async fn test_second_run_preserves_pristine_backup() {
        let ws = Workspace::new();
        let path = ws.write("a.md", "pristine");
        let transformer = Arc::new(ScriptedTransformer::uppercase());
        let pipeline = Pipeline::with_transformer(ws.config(), transformer);

        pipeline.run(&path, false).await.unwrap();
        let second = pipeline.run(&path, false).await.unwrap();

        assert_eq!(ws.read("backup/a.md.bak"), "pristine");
        assert_eq!(ws.read("backup/a.md.1.bak"), "PRISTINE");
        assert_eq!(second.backups[0].backup_path, ws.path().join("backup/a.md.1.bak"));
    }

    // ==================== Symlinks ====================

    /// Test that a symlinked target keeps its link and its target is rewritten
    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_file_is_rewritten_through_link() {
        let ws = Workspace::new();
        let real = ws.write("real.txt", "target text");
        let link = ws.path().join("link.md");
        std::os::unix::fs::symlink(&real, &link).unwrap();
        let transformer = Arc::new(ScriptedTransformer::uppercase());

        let pipeline = Pipeline::with_transformer(ws.config(), transformer);
        let single = pipeline.run(&link, false).await.unwrap();

        assert_eq!(single.progress.success, 1);
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(ws.read("real.txt"), "TARGET TEXT");
        assert_eq!(ws.read("backup/link.md.bak"), "target text");

        let directory = pipeline.run(ws.path(), false).await.unwrap();
        assert_eq!(directory.progress.total, 1);
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    }

    // ==================== Concurrency ====================

    /// Test that no more than `max_concurrent` transforms run at once
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_ceiling() {
        let ws = Workspace::new();
        for i in 0..20 {
            ws.write(&format!("f{i:02}.md"), "body");
        }
        let mut config = ws.config();
        config.max_concurrent = 4;
        let transformer =
            Arc::new(ScriptedTransformer::uppercase().with_delay(Duration::from_millis(20)));

        let pipeline = Pipeline::with_transformer(config, transformer.clone());
        let summary = pipeline.run(ws.path(), false).await.unwrap();

        assert_eq!(summary.progress.processed, 20);
        assert_eq!(summary.progress.success, 20);
        assert_eq!(transformer.calls(), 20);
        assert!(transformer.peak() <= 4, "peak was {}", transformer.peak());
        assert!(transformer.peak() >= 2);
    }

    /// Test that a concurrency of one runs files strictly in sequence
    #[tokio::test]
    async fn test_concurrency_of_one() {
        let ws = Workspace::new();
        for i in 0..4 {
            ws.write(&format!("f{i}.md"), "body");
        }
        let mut config = ws.config();
        config.max_concurrent = 1;
        let transformer =
            Arc::new(ScriptedTransformer::uppercase().with_delay(Duration::from_millis(5)));

        let pipeline = Pipeline::with_transformer(config, transformer.clone());
        pipeline.run(ws.path(), false).await.unwrap();

        assert_eq!(transformer.peak(), 1);
    }

    /// Test that the scripted transformer is usable through the trait object
    #[tokio::test]
    async fn test_transformer_trait_object() {
        let transformer: Arc<dyn Transformer> = Arc::new(ScriptedTransformer::uppercase());
        assert_eq!(transformer.transform("abc").await.unwrap(), "ABC");
    }
}
