// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galleria-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galleria and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::{DeleteOutcome, Gallery, GalleryError};
use crate::model::StoredFilename;
use crate::store::{GalleryLayout, StoreError, StoredUpload, WriteDurability};

struct GalleryTestCtx {
    _tmp: TempDir,
    layout: GalleryLayout,
    gallery: Gallery,
}

impl GalleryTestCtx {
    fn new() -> Self {
        let tmp = tempfile::Builder::new()
            .prefix("galleria-ops")
            .tempdir()
            .unwrap();
        let layout = GalleryLayout::new(tmp.path());
        layout.ensure().unwrap();
        let gallery = Gallery::from_layout(&layout, WriteDurability::BestEffort);
        Self {
            _tmp: tmp,
            layout,
            gallery,
        }
    }

    fn stored(&self, original: &str) -> StoredUpload {
        self.gallery
            .uploads()
            .store_bytes(original, original.as_bytes())
            .unwrap()
    }

    fn len(&self) -> usize {
        self.gallery.records().unwrap().len()
    }
}

#[fixture]
fn ctx() -> GalleryTestCtx {
    GalleryTestCtx::new()
}

#[rstest]
fn upload_returns_exactly_what_is_persisted(ctx: GalleryTestCtx) {
    let added = ctx
        .gallery
        .upload(vec![ctx.stored("a.png"), ctx.stored("b.jpg")])
        .unwrap();

    assert_eq!(ctx.gallery.records().unwrap(), added);
    assert_eq!(ctx.gallery.latest().unwrap().as_ref(), added.last());
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(10)]
fn upload_appends_one_record_per_file(ctx: GalleryTestCtx, #[case] count: usize) {
    let existing = ctx.stored("existing.png");
    ctx.gallery.upload(vec![existing]).unwrap();

    let files = (0..count)
        .map(|i| ctx.stored(&format!("pic{i}.png")))
        .collect::<Vec<_>>();
    let expected_names = files.iter().map(|f| f.filename.clone()).collect::<Vec<_>>();

    let added = ctx.gallery.upload(files).unwrap();

    assert_eq!(added.len(), count);
    let records = ctx.gallery.records().unwrap();
    assert_eq!(records.len(), count + 1);
    assert_eq!(
        records[1..].iter().map(|r| r.filename().clone()).collect::<Vec<_>>(),
        expected_names
    );
    for record in &records {
        assert_eq!(record.path(), format!("/uploads/{}", record.filename()));
    }
}

#[rstest]
fn upload_without_files_leaves_store_untouched(ctx: GalleryTestCtx) {
    let before = std::fs::read_to_string(ctx.layout.data_path()).unwrap();

    let err = ctx.gallery.upload(Vec::new()).unwrap_err();

    assert!(matches!(err, GalleryError::NoFiles));
    assert_eq!(err.to_string(), "No files uploaded!");
    assert_eq!(std::fs::read_to_string(ctx.layout.data_path()).unwrap(), before);
}

#[rstest]
fn latest_is_the_last_appended_record(ctx: GalleryTestCtx) {
    assert_eq!(ctx.gallery.latest().unwrap(), None);

    let first = ctx.stored("a.png");
    let second = ctx.stored("b.png");
    let second_name = second.filename.clone();
    ctx.gallery.upload(vec![first, second]).unwrap();

    let latest = ctx.gallery.latest().unwrap().unwrap();
    assert_eq!(latest.filename(), &second_name);
}

#[rstest]
fn delete_removes_record_and_file(ctx: GalleryTestCtx) {
    let keep = ctx.stored("keep.png");
    let doomed = ctx.stored("doomed.png");
    let doomed_name = doomed.filename.clone();
    ctx.gallery.upload(vec![keep, doomed]).unwrap();

    let outcome = ctx.gallery.delete(&doomed_name).unwrap();

    assert_eq!(
        outcome,
        DeleteOutcome {
            removed_records: 1,
            removed_file: true
        }
    );
    assert_eq!(ctx.len(), 1);
    assert!(!ctx.gallery.uploads().contains(&doomed_name));
}

#[rstest]
fn delete_of_unknown_filename_is_a_no_op(ctx: GalleryTestCtx) {
    ctx.gallery.upload(vec![ctx.stored("a.png")]).unwrap();

    let outcome = ctx
        .gallery
        .delete(&StoredFilename::new("404.png").unwrap())
        .unwrap();

    assert_eq!(outcome, DeleteOutcome::default());
    assert_eq!(ctx.len(), 1);
}

#[rstest]
fn delete_tolerates_stale_record(ctx: GalleryTestCtx) {
    let stale = ctx.stored("stale.png");
    let stale_name = stale.filename.clone();
    ctx.gallery.upload(vec![stale]).unwrap();
    std::fs::remove_file(ctx.gallery.uploads().file_path(&stale_name)).unwrap();

    let outcome = ctx.gallery.delete(&stale_name).unwrap();

    assert_eq!(outcome.removed_records, 1);
    assert!(!outcome.removed_file);
    assert_eq!(ctx.len(), 0);
}

#[rstest]
fn delete_removes_orphaned_file_without_record(ctx: GalleryTestCtx) {
    let orphan = ctx.stored("orphan.png");

    let outcome = ctx.gallery.delete(&orphan.filename).unwrap();

    assert_eq!(outcome.removed_records, 0);
    assert!(outcome.removed_file);
}

#[rstest]
fn replace_swaps_backing_file_and_keeps_upload_time(ctx: GalleryTestCtx) {
    let original = ctx.stored("old.png");
    let old_name = original.filename.clone();
    ctx.gallery.upload(vec![ctx.stored("other.png"), original]).unwrap();
    let before = ctx.gallery.records().unwrap();

    let replacement = ctx.stored("new.jpg");
    let new_name = replacement.filename.clone();
    let updated = ctx.gallery.replace(&old_name, replacement).unwrap();

    assert_eq!(updated.filename(), &new_name);
    assert_eq!(updated.path(), format!("/uploads/{new_name}"));
    assert_eq!(updated.uploaded_at(), before[1].uploaded_at());

    let after = ctx.gallery.records().unwrap();
    assert_eq!(after.len(), 2);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1], updated);
    assert!(!ctx.gallery.uploads().contains(&old_name));
    assert!(ctx.gallery.uploads().contains(&new_name));
}

#[rstest]
fn replace_of_stale_record_still_updates_metadata(ctx: GalleryTestCtx) {
    let original = ctx.stored("old.png");
    let old_name = original.filename.clone();
    ctx.gallery.upload(vec![original]).unwrap();
    std::fs::remove_file(ctx.gallery.uploads().file_path(&old_name)).unwrap();

    let replacement = ctx.stored("new.png");
    let updated = ctx.gallery.replace(&old_name, replacement).unwrap();

    assert_eq!(ctx.gallery.records().unwrap(), vec![updated]);
}

#[rstest]
fn replace_of_unknown_record_leaves_replacement_orphaned(ctx: GalleryTestCtx) {
    ctx.gallery.upload(vec![ctx.stored("a.png")]).unwrap();
    let before = std::fs::read_to_string(ctx.layout.data_path()).unwrap();

    let replacement = ctx.stored("new.png");
    let orphan = replacement.filename.clone();
    let err = ctx
        .gallery
        .replace(&StoredFilename::new("missing.png").unwrap(), replacement)
        .unwrap_err();

    assert!(matches!(err, GalleryError::RecordNotFound { .. }));
    assert_eq!(err.to_string(), "Image not found");
    assert_eq!(std::fs::read_to_string(ctx.layout.data_path()).unwrap(), before);
    assert!(ctx.gallery.uploads().contains(&orphan));
}

#[rstest]
fn corrupt_store_fails_every_operation(ctx: GalleryTestCtx) {
    std::fs::write(ctx.layout.data_path(), "{\"not\": \"an array\"}").unwrap();
    let name = StoredFilename::new("1.png").unwrap();

    for err in [
        ctx.gallery.records().unwrap_err(),
        ctx.gallery.upload(vec![ctx.stored("a.png")]).unwrap_err(),
        ctx.gallery.delete(&name).unwrap_err(),
        ctx.gallery.replace(&name, ctx.stored("b.png")).unwrap_err(),
    ] {
        assert!(
            matches!(err, GalleryError::Store(StoreError::Corrupt { .. })),
            "unexpected error: {err}"
        );
    }
    assert_eq!(
        std::fs::read_to_string(ctx.layout.data_path()).unwrap(),
        "{\"not\": \"an array\"}"
    );
}

#[rstest]
fn parallel_uploads_are_all_persisted(ctx: GalleryTestCtx) {
    let threads = 8;
    let per_thread = 5;

    std::thread::scope(|scope| {
        for t in 0..threads {
            let gallery = ctx.gallery.clone();
            scope.spawn(move || {
                for i in 0..per_thread {
                    let file = gallery
                        .uploads()
                        .store_bytes(&format!("t{t}-{i}.png"), b"x")
                        .unwrap();
                    gallery.upload(vec![file]).unwrap();
                }
            });
        }
    });

    let records = ctx.gallery.records().unwrap();
    assert_eq!(records.len(), threads * per_thread);
    let mut names = records
        .iter()
        .map(|r| r.filename().clone())
        .collect::<Vec<_>>();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), threads * per_thread);
}

#[rstest]
fn independent_galleries_on_one_document_can_lose_updates(ctx: GalleryTestCtx) {
    // Two handles over the same files do not share a writer lock; interleaving their
    // read-modify-write cycles by hand shows the last save wins.
    let other = Gallery::new(ctx.layout.metadata_store(), ctx.layout.uploads());
    let first = ctx.stored("a.png");
    let second = ctx.stored("b.png");

    let mut snapshot = ctx.gallery.records().unwrap();
    other.upload(vec![second]).unwrap();
    snapshot.push(crate::model::ImageRecord::new(first.filename, chrono::Utc::now()));
    ctx.gallery.store().save(&snapshot).unwrap();

    assert_eq!(ctx.len(), 1);
}
