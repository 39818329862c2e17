//! End-to-end install tests against a mock download server.

use cmake_binaries::{
    extract, fetch, pipeline, platform, InstallError, InstallOutcome, ToolConfig,
};
use std::io::Write;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Config pointed at the mock server instead of cmake.org.
fn mock_config(server: &MockServer) -> ToolConfig {
    ToolConfig {
        major_version: "3.24".to_string(),
        full_version: "3.24.2".to_string(),
        download_base: format!("{}/files", server.uri()),
    }
}

/// The server-relative request path for a full download URL.
fn mock_path(server: &MockServer, url: &str) -> String {
    url.strip_prefix(&server.uri())
        .unwrap_or_else(|| panic!("url {url} not rooted at mock server"))
        .to_string()
}

/// Build a synthetic binary distribution archive shaped like a real one:
/// a single root folder holding bin/, share/<ver>/Modules, Templates, and
/// an unrelated doc/ tree that must not be installed. The container format
/// follows the filename, matching whatever the host platform downloads.
fn make_binary_archive(filename: &str) -> Vec<u8> {
    let root = extract::archive_root_name(filename);
    let exe = std::env::consts::EXE_SUFFIX;

    let entries: Vec<(String, &[u8])> = vec![
        (format!("{root}/bin/cmake{exe}"), b"cmake-bin".as_slice()),
        (format!("{root}/bin/cpack{exe}"), b"cpack-bin".as_slice()),
        (
            format!("{root}/share/cmake-3.24/Modules/Foo.cmake"),
            b"# foo".as_slice(),
        ),
        (
            format!("{root}/share/cmake-3.24/Modules/Platform/Linux.cmake"),
            b"# linux".as_slice(),
        ),
        (
            format!("{root}/share/cmake-3.24/Templates/T.in"),
            b"template".as_slice(),
        ),
        (format!("{root}/doc/readme.txt"), b"unrelated".as_slice()),
    ];

    if filename.ends_with(".zip") {
        make_zip(&entries)
    } else {
        make_tar_gz(&entries)
    }
}

fn make_tar_gz(entries: &[(String, &[u8])]) -> Vec<u8> {
    let encoder =
        flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for (path, content) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(if path.contains("/bin/") { 0o755 } else { 0o644 });
        header.set_cksum();
        builder.append_data(&mut header, path, *content).unwrap();
    }

    let encoder = builder.into_inner().unwrap();
    encoder.finish().unwrap()
}

fn make_zip(entries: &[(String, &[u8])]) -> Vec<u8> {
    let mut buf = std::io::Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut buf);
        let options = zip::write::SimpleFileOptions::default();

        for (path, content) in entries {
            zip.start_file(path.as_str(), options).unwrap();
            zip.write_all(content).unwrap();
        }

        zip.finish().unwrap();
    }
    buf.into_inner()
}

fn exe(tool: &str) -> String {
    format!("{}{}", tool, std::env::consts::EXE_SUFFIX)
}

fn assert_installed_layout(root: &Path) {
    assert_eq!(
        std::fs::read(root.join("bin").join(exe("cmake"))).unwrap(),
        b"cmake-bin"
    );
    assert_eq!(
        std::fs::read(root.join("bin").join(exe("cpack"))).unwrap(),
        b"cpack-bin"
    );
    assert!(root.join("share/cmake-3.24/Modules/Foo.cmake").exists());
    assert!(root
        .join("share/cmake-3.24/Modules/Platform/Linux.cmake")
        .exists());
    assert!(root.join("share/cmake-3.24/Templates/T.in").exists());
    assert!(!root.join("doc").exists(), "doc/ must not be installed");
}

#[tokio::test]
async fn test_binary_install_end_to_end() {
    let server = MockServer::start().await;
    let config = mock_config(&server);

    let url = platform::resolve_distribution_url(
        std::env::consts::OS,
        std::env::consts::ARCH,
        &config,
    )
    .expect("host platform should have a binary distribution");

    let filename = fetch::filename_from_url(&url);
    let body = make_binary_archive(&filename);

    Mock::given(method("GET"))
        .and(path(mock_path(&server, &url)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .expect(1)
        .mount(&server)
        .await;

    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("prefix");

    // Force: the host machine may genuinely have cmake in PATH.
    let outcome = pipeline::install(
        &root,
        pipeline::InstallOptions {
            force: true,
            compile: false,
        },
        &config,
    )
    .unwrap();

    assert_eq!(outcome, InstallOutcome::Installed);
    assert_installed_layout(&root);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        for tool in ["cmake", "cpack"] {
            let mode = std::fs::metadata(root.join("bin").join(exe(tool)))
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o777, 0o755, "{tool} should be 0755");
        }
    }
}

#[tokio::test]
async fn test_existing_module_install_skips_without_any_request() {
    let server = MockServer::start().await;
    let config = mock_config(&server);

    // No mounted mocks and .expect(0) on a catch-all: any request fails
    // the test on server verification.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("prefix");
    let bin = root.join("bin").join(exe("cmake"));
    std::fs::create_dir_all(bin.parent().unwrap()).unwrap();
    std::fs::write(&bin, "already here").unwrap();

    let outcome = pipeline::install(&root, pipeline::InstallOptions::default(), &config).unwrap();

    assert_eq!(outcome, InstallOutcome::Skipped);
    assert_eq!(std::fs::read(&bin).unwrap(), b"already here");
}

#[tokio::test]
async fn test_failed_download_leaves_no_partial_install() {
    let server = MockServer::start().await;
    let config = mock_config(&server);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("prefix");

    let err = pipeline::install(
        &root,
        pipeline::InstallOptions {
            force: true,
            compile: false,
        },
        &config,
    )
    .unwrap_err();

    assert!(matches!(err, InstallError::Network { .. }));
    assert!(!root.exists(), "no install root should be created on failure");
}

#[tokio::test]
async fn test_unsupported_platform_falls_back_to_source_url() {
    let server = MockServer::start().await;
    let config = mock_config(&server);

    // linux/aarch64 has no binary distribution, so the pipeline requests
    // the source archive. Serving a 404 keeps the test off the build step
    // while still proving which URL was chosen.
    Mock::given(method("GET"))
        .and(path("/files/v3.24/cmake-3.24.2.tar.gz"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("prefix");

    let err = pipeline::install_for_host(
        &root,
        pipeline::InstallOptions {
            force: true,
            compile: false,
        },
        &config,
        "linux",
        "aarch64",
    )
    .unwrap_err();

    assert!(matches!(err, InstallError::Network { .. }));
}
