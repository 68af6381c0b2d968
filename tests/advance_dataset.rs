use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use geoload::acquire::{Downloader, FetchDownloader};
use geoload::dataset::{Advance, DatasetConfig};
use geoload::load::AudioDecoder;
use geoload::GeoloadError;

mod common;

/// Copies local fixtures and counts how often it is asked to.
#[derive(Clone, Default)]
struct CountingDownloader {
    calls: Arc<AtomicUsize>,
}

impl Downloader for CountingDownloader {
    fn download(&self, url: &str, destination: &Path) -> Result<(), GeoloadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        FetchDownloader.download(url, destination)
    }
}

fn missing_decoder() -> Result<Box<dyn AudioDecoder>, GeoloadError> {
    Err(GeoloadError::DependencyMissing {
        dependency: "symphonia",
        purpose: "use this dataset",
    })
}

fn downloaded_dataset(root: &Path, fixtures: &Path) -> Advance {
    let archives = common::advance_archives(fixtures, 2);
    Advance::builder(root)
        .sources(archives.urls(), archives.md5s())
        .download(true)
        .checksum(true)
        .transform(|sample| sample)
        .build()
        .expect("construct dataset")
}

#[cfg(feature = "audio")]
#[test]
fn getitem_returns_well_formed_samples() {
    let fixtures = tempfile::tempdir().expect("fixtures");
    let root = tempfile::tempdir().expect("root");
    let dataset = downloaded_dataset(root.path(), fixtures.path());

    for i in 0..dataset.len() {
        let x = dataset.get(i).expect("sample");
        assert_eq!(x.image.ndim(), 3);
        assert_eq!(x.image.shape()[0], 3);
        assert_eq!(x.audio.ndim(), 2);
        assert_eq!(x.audio.shape()[0], 1);
        assert_eq!(x.label.ndim(), 0);
    }
}

#[cfg(feature = "audio")]
#[test]
fn sample_contents_match_fixture() {
    let fixtures = tempfile::tempdir().expect("fixtures");
    let root = tempfile::tempdir().expect("root");
    let dataset = downloaded_dataset(root.path(), fixtures.path());

    let x = dataset.get(1).expect("sample");
    assert_eq!(x.image.shape(), &[3, 6, 8]);
    assert_eq!(x.audio.shape(), &[1, 160]);
    assert_eq!(x.label[()], 0);
    assert!(x.audio.iter().all(|v| (-1.0..=1.0).contains(v)));
    assert!(x.audio.iter().any(|v| *v != 0.0));
}

#[cfg(feature = "audio")]
#[test]
fn len_matches_number_of_images() {
    let fixtures = tempfile::tempdir().expect("fixtures");
    let root = tempfile::tempdir().expect("root");
    let dataset = downloaded_dataset(root.path(), fixtures.path());

    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.classes(), &["airport".to_string()]);
    assert_eq!(dataset.iter().filter(Result::is_ok).count(), 2);
}

#[test]
fn already_downloaded_does_not_download_again() {
    let fixtures = tempfile::tempdir().expect("fixtures");
    let root = tempfile::tempdir().expect("root");
    let archives = common::advance_archives(fixtures.path(), 2);
    let downloader = CountingDownloader::default();

    let build = || {
        Advance::builder(root.path())
            .sources(archives.urls(), archives.md5s())
            .download(true)
            .downloader(downloader.clone())
            .build()
    };

    build().expect("first construction");
    assert_eq!(downloader.calls.load(Ordering::SeqCst), 2);

    let second = build().expect("second construction");
    assert_eq!(downloader.calls.load(Ordering::SeqCst), 2);
    assert_eq!(second.len(), 2);
}

#[test]
fn already_downloaded_with_default_sources() {
    let fixtures = tempfile::tempdir().expect("fixtures");
    let root = tempfile::tempdir().expect("root");
    downloaded_dataset(root.path(), fixtures.path());

    let dataset = Advance::builder(root.path())
        .download(true)
        .build()
        .expect("no-op construction");
    assert_eq!(dataset.len(), 2);
}

#[test]
fn not_downloaded() {
    let root = tempfile::tempdir().expect("root");
    let err = Advance::builder(root.path()).build().unwrap_err();

    assert!(matches!(err, GeoloadError::DatasetNotFound { .. }));
    assert!(err.to_string().contains("Dataset not found or corrupted."));
}

#[test]
fn new_from_config_matches_builder() {
    let fixtures = tempfile::tempdir().expect("fixtures");
    let root = tempfile::tempdir().expect("root");
    let archives = common::advance_archives(fixtures.path(), 3);

    let mut config = DatasetConfig::new(root.path(), archives.urls(), archives.md5s());
    config.download = true;
    config.checksum = true;
    let dataset = Advance::new(config).expect("construct");

    assert_eq!(dataset.len(), 3);
}

#[test]
fn checksum_mismatch_is_an_integrity_error() {
    let fixtures = tempfile::tempdir().expect("fixtures");
    let root = tempfile::tempdir().expect("root");
    let archives = common::advance_archives(fixtures.path(), 2);
    let mut md5s = archives.md5s();
    md5s[1] = "0123456789abcdef0123456789abcdef".to_string();

    let err = Advance::builder(root.path())
        .sources(archives.urls(), md5s)
        .download(true)
        .checksum(true)
        .build()
        .unwrap_err();

    assert!(matches!(err, GeoloadError::Integrity { .. }));
    assert!(!root.path().join("sound").exists());
}

#[test]
fn mismatched_sources_and_checksums_are_rejected() {
    let root = tempfile::tempdir().expect("root");
    let err = Advance::builder(root.path())
        .sources(vec!["a.zip".to_string(), "b.zip".to_string()], vec![])
        .download(true)
        .build()
        .unwrap_err();

    assert!(matches!(err, GeoloadError::InvalidConfig(_)));
}

#[test]
fn missing_audio_dependency_fails_lazily() {
    let fixtures = tempfile::tempdir().expect("fixtures");
    let root = tempfile::tempdir().expect("root");
    let archives = common::advance_archives(fixtures.path(), 2);

    let dataset = Advance::builder(root.path())
        .sources(archives.urls(), archives.md5s())
        .download(true)
        .audio_decoder_factory(missing_decoder)
        .build()
        .expect("construction does not need the audio decoder");

    let err = dataset.get(0).unwrap_err();
    assert!(matches!(err, GeoloadError::DependencyMissing { .. }));
    assert!(err
        .to_string()
        .contains("is not installed and is required to use this dataset"));
}

#[cfg(not(feature = "audio"))]
#[test]
fn default_audio_factory_fails_lazily_without_decoder() {
    let root = tempfile::tempdir().expect("root");
    common::advance_tree(root.path(), &[("lake", "a")]);

    let dataset = Advance::builder(root.path())
        .audio_decoder_factory(geoload::load::try_create)
        .build()
        .expect("construction does not need the audio decoder");

    let err = dataset.get(0).unwrap_err();
    assert!(matches!(
        err,
        GeoloadError::DependencyMissing {
            dependency: "symphonia",
            ..
        }
    ));
    assert_eq!(
        err.to_string(),
        "symphonia is not installed and is required to use this dataset"
    );
}

#[test]
fn truncated_archive_from_earlier_run_is_downloaded_again() {
    let fixtures = tempfile::tempdir().expect("fixtures");
    let root = tempfile::tempdir().expect("root");
    let archives = common::advance_archives(fixtures.path(), 2);
    let full = fs::read(&archives.vision).expect("read vision fixture");
    fs::write(
        root.path().join("ADVANCE_vision.zip"),
        &full[..full.len() / 2],
    )
    .expect("write truncated archive");
    let downloader = CountingDownloader::default();

    let dataset = Advance::builder(root.path())
        .sources(archives.urls(), archives.md5s())
        .download(true)
        .checksum(true)
        .downloader(downloader.clone())
        .build()
        .expect("construct");

    assert_eq!(downloader.calls.load(Ordering::SeqCst), 2);
    assert_eq!(dataset.len(), 2);
    assert!(!root.path().join("ADVANCE_vision.zip.part").exists());
}

#[test]
fn out_of_range_access_fails() {
    let fixtures = tempfile::tempdir().expect("fixtures");
    let root = tempfile::tempdir().expect("root");
    let dataset = downloaded_dataset(root.path(), fixtures.path());

    let err = dataset.get(2).unwrap_err();
    assert!(matches!(
        err,
        GeoloadError::IndexOutOfRange { index: 2, len: 2 }
    ));
}

#[cfg(feature = "audio")]
#[test]
fn transform_is_applied_to_every_sample() {
    let root = tempfile::tempdir().expect("root");
    common::advance_tree(root.path(), &[("beach", "a"), ("lake", "b")]);

    let dataset = Advance::builder(root.path())
        .transform(|mut sample| {
            sample.image.fill(255);
            sample.label += 10;
            sample
        })
        .build()
        .expect("construct");

    let first = dataset.get(0).expect("first");
    let second = dataset.get(1).expect("second");
    assert!(first.image.iter().all(|&px| px == 255));
    assert_eq!(first.label[()], 10);
    assert_eq!(second.label[()], 11);
}

#[test]
fn labels_follow_sorted_class_names() {
    let root = tempfile::tempdir().expect("root");
    common::advance_tree(
        root.path(),
        &[("train station", "t1"), ("beach", "b1"), ("lake", "l1")],
    );

    let dataset = Advance::builder(root.path()).build().expect("construct");
    let labels: Vec<(String, usize)> = dataset
        .entries()
        .iter()
        .map(|entry| (entry.class_name.clone(), entry.label))
        .collect();

    assert_eq!(
        labels,
        vec![
            ("beach".to_string(), 0),
            ("lake".to_string(), 1),
            ("train station".to_string(), 2)
        ]
    );
}

#[cfg(feature = "audio")]
#[test]
fn samples_are_reread_from_disk() {
    let root = tempfile::tempdir().expect("root");
    common::advance_tree(root.path(), &[("forest", "a")]);
    let dataset = Advance::builder(root.path()).build().expect("construct");

    assert_eq!(dataset.get(0).expect("before").image.shape(), &[3, 6, 8]);

    let image = root.path().join("vision/forest/a.jpg");
    fs::write(&image, common::jpeg_bytes(4, 2)).expect("rewrite image");
    assert_eq!(dataset.get(0).expect("after").image.shape(), &[3, 2, 4]);
}

#[cfg(feature = "audio")]
#[test]
fn dataset_is_shareable_across_threads() {
    let root = tempfile::tempdir().expect("root");
    common::advance_tree(root.path(), &[("harbour", "a"), ("harbour", "b")]);
    let dataset = Advance::builder(root.path()).build().expect("construct");

    std::thread::scope(|scope| {
        for i in 0..dataset.len() {
            let dataset = &dataset;
            scope.spawn(move || {
                dataset.get(i).expect("sample");
            });
        }
    });
}
