//! End-to-end builds through the public API: config → resolve → generate.

use docs_qr::config::{self, ParseErrorPolicy};
use docs_qr::generate::{self, BuildConfig};
use docs_qr::manifest::{Manifest, ManifestEntry};
use docs_qr::naming;
use docs_qr::resolve::{self, Resolution, SiteIndexSource};
use docs_qr::scan::ContentScanner;
use docs_qr::types::TargetOrigin;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn copy_dir(src: &Path, dst: &Path) {
    for entry in fs::read_dir(src).unwrap() {
        let entry = entry.unwrap();
        let target = dst.join(entry.file_name());
        if entry.path().is_dir() {
            fs::create_dir_all(&target).unwrap();
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), &target).unwrap();
        }
    }
}

fn fixture_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    copy_dir(
        &Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site"),
        tmp.path(),
    );
    tmp
}

fn resolve_site(site: &Path, index: Option<&Path>) -> Resolution {
    let config = config::load_config(site, None).unwrap();
    let scanner = ContentScanner::new(config.content_dir(site), config.docs.route_base_path.as_str())
        .with_policy(config.docs.on_parse_error);
    resolve::resolve(&SiteIndexSource::load(index).unwrap(), &scanner).unwrap()
}

fn build_site(site: &Path, index: Option<&Path>) -> generate::BuildReport {
    let config = config::load_config(site, None).unwrap();
    let resolution = resolve_site(site, index);
    let build_config = BuildConfig::from_site_config(&config, site).unwrap();
    generate::generate(&resolution.targets, &build_config, None).unwrap()
}

fn write_doc(site: &Path, rel: &str, front_matter: &str) {
    let path = site.join("docs").join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, format!("---\n{front_matter}\n---\n# Body\n")).unwrap();
}

#[test]
fn content_scan_build_writes_images_and_manifest() {
    let site = fixture_site();
    let report = build_site(site.path(), None);

    let out = site.path().join("static/qr");
    assert_eq!(
        report.manifest.entries,
        vec![
            ManifestEntry {
                title: "Deploying".into(),
                url: "https://example.com/docs/ship".into(),
                file: "/qr/docs_ship.png".into(),
            },
            ManifestEntry {
                title: "setup".into(),
                url: "https://example.com/docs/guides/setup".into(),
                file: "/qr/docs_guides_setup.png".into(),
            },
            ManifestEntry {
                title: "Introduction".into(),
                url: "https://example.com/docs/intro".into(),
                file: "/qr/docs_intro.png".into(),
            },
        ]
    );

    for name in ["docs_ship.png", "docs_guides_setup.png", "docs_intro.png"] {
        let img = image::open(out.join(name)).unwrap();
        assert_eq!((img.width(), img.height()), (256, 256), "{name}");
    }
    assert!(!out.join("docs_reference_api.png").exists());
    assert_eq!(
        Manifest::load(&out.join("_manifest.json")).unwrap(),
        report.manifest
    );
}

#[test]
fn site_index_takes_precedence() {
    let site = fixture_site();
    let index = site.path().join("site-index.json");
    let resolution = resolve_site(site.path(), Some(&index));

    assert_eq!(resolution.origin, TargetOrigin::SiteIndex);
    assert_eq!(resolution.consulted.len(), 1);

    let report = build_site(site.path(), Some(&index));
    let titles: Vec<&str> = report
        .manifest
        .entries
        .iter()
        .map(|e| e.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Introduction", "Deploying"]);
}

#[test]
fn index_without_flags_falls_back_to_scan() {
    let site = fixture_site();
    let index = site.path().join("empty-index.json");
    fs::write(
        &index,
        r#"{"default": {"loadedVersions": [{"docs": [
            {"title": "Unflagged", "permalink": "/docs/unflagged", "frontMatter": {}}
        ]}]}}"#,
    )
    .unwrap();

    let resolution = resolve_site(site.path(), Some(&index));
    assert_eq!(resolution.origin, TargetOrigin::ContentScan);
    assert_eq!(resolution.targets.len(), 3);
}

#[test]
fn removing_all_flags_empties_manifest() {
    let site = fixture_site();
    let first = build_site(site.path(), None);
    assert_eq!(first.images_written(), 3);

    fs::remove_dir_all(site.path().join("docs")).unwrap();
    let second = build_site(site.path(), None);

    let manifest_path = site.path().join("static/qr/_manifest.json");
    assert_eq!(fs::read_to_string(&manifest_path).unwrap(), "[]");
    assert!(second.manifest.is_empty());
    assert_eq!(
        second.stale_files,
        vec!["docs_guides_setup.png", "docs_intro.png", "docs_ship.png"]
    );
    // Stale images are reported, not removed
    assert!(site.path().join("static/qr/docs_intro.png").exists());
}

#[test]
fn rebuild_is_deterministic() {
    let site = fixture_site();
    let manifest_path = site.path().join("static/qr/_manifest.json");

    build_site(site.path(), None);
    let first_manifest = fs::read(&manifest_path).unwrap();
    let first_image = fs::read(site.path().join("static/qr/docs_intro.png")).unwrap();

    build_site(site.path(), None);
    assert_eq!(fs::read(&manifest_path).unwrap(), first_manifest);
    assert_eq!(
        fs::read(site.path().join("static/qr/docs_intro.png")).unwrap(),
        first_image
    );
}

#[test]
fn malformed_document_fails_or_is_skipped() {
    let site = fixture_site();
    write_doc(site.path(), "broken.md", "qr: [unclosed");

    let config = config::load_config(site.path(), None).unwrap();
    let scanner = ContentScanner::new(config.content_dir(site.path()), "/docs");
    assert!(resolve::resolve(&SiteIndexSource(None), &scanner).is_err());

    fs::write(
        site.path().join("docs-qr.toml"),
        "[site]\nurl = \"https://example.com\"\n\n[docs]\non_parse_error = \"skip\"\n",
    )
    .unwrap();
    let config = config::load_config(site.path(), None).unwrap();
    assert_eq!(config.docs.on_parse_error, ParseErrorPolicy::Skip);

    let resolution = resolve_site(site.path(), None);
    assert_eq!(resolution.targets.len(), 3);
    assert_eq!(resolution.skipped.len(), 1);
    assert_eq!(resolution.skipped[0].path, "broken.md");
}

#[test]
fn base_url_and_output_overrides() {
    let site = fixture_site();
    let overrides: toml::Value = toml::from_str(
        "[site]\nbase_url = \"/handbook/\"\n\n[output]\ndir = \"build/qr\"\n",
    )
    .unwrap();
    let config = config::load_config(site.path(), Some(overrides)).unwrap();
    let build_config = BuildConfig::from_site_config(&config, site.path()).unwrap();
    let resolution = resolve_site(site.path(), None);

    let report = generate::generate(&resolution.targets, &build_config, None).unwrap();

    let intro = report
        .manifest
        .entries
        .iter()
        .find(|e| e.title == "Introduction")
        .unwrap();
    assert_eq!(intro.url, "https://example.com/handbook/docs/intro");
    assert_eq!(intro.file, "/qr/docs_intro.png");
    assert!(site.path().join("build/qr/docs_intro.png").exists());

    // The widget on that page derives the same image, base path included
    assert_eq!(
        naming::widget_href("/handbook/docs/intro/", "/handbook/", "/qr"),
        "/handbook/qr/docs_intro.png"
    );
}

#[test]
fn manifest_filter_matches_gallery_search() {
    let site = fixture_site();
    build_site(site.path(), None);
    let manifest = Manifest::load(&site.path().join("static/qr/_manifest.json")).unwrap();

    let titles: Vec<&str> = manifest.filter("GUIDES").map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["setup"]);
    assert_eq!(manifest.filter("example.com").count(), 3);
}
