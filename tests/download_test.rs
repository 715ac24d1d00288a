//! Integration tests for catalog downloads.

mod common;

use common::{pattern, TestHarness, TRACK_LEN};

fn header_str<'a>(resp: &'a reqwest::Response, name: &str) -> Option<&'a str> {
    resp.headers().get(name).map(|v| v.to_str().unwrap())
}

#[tokio::test]
async fn download_serves_attachment_and_counts() {
    let (h, addr) = TestHarness::with_server().await;

    let resp = reqwest::get(format!("http://{addr}/download/blue-monday"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        header_str(&resp, "content-disposition"),
        Some("attachment; filename=\"Blue Monday - Ada.mp3\"")
    );
    assert_eq!(header_str(&resp, "content-type"), Some("audio/mpeg"));
    assert_eq!(header_str(&resp, "content-length"), Some("100"));
    assert_eq!(header_str(&resp, "accept-ranges"), Some("bytes"));
    let body = resp.bytes().await.unwrap();
    assert_eq!(&body[..], &pattern(TRACK_LEN)[..]);

    let counts = h.wait_for_usage("blue-monday", |c| c.downloads == 1).await;
    assert_eq!(counts.downloads, 1);
    assert_eq!(counts.streams, 0);
}

#[tokio::test]
async fn download_resumes_with_range() {
    let (h, addr) = TestHarness::with_server().await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/download/blue-monday"))
        .header("Range", "bytes=90-")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 206);
    assert_eq!(header_str(&resp, "content-range"), Some("bytes 90-99/100"));
    assert!(header_str(&resp, "content-disposition").is_some());
    let body = resp.bytes().await.unwrap();
    assert_eq!(&body[..], &pattern(TRACK_LEN)[90..]);

    let counts = h.wait_for_usage("blue-monday", |c| c.downloads == 1).await;
    assert_eq!(counts.downloads, 1);
}

#[tokio::test]
async fn unsatisfiable_download_range_is_not_counted() {
    let (h, addr) = TestHarness::with_server().await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/download/blue-monday"))
        .header("Range", "bytes=100-")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 416);
    assert_eq!(header_str(&resp, "content-range"), Some("bytes */100"));
    assert!(header_str(&resp, "content-disposition").is_none());
    assert!(resp.bytes().await.unwrap().is_empty());

    assert_eq!(h.settled_usage("blue-monday").await.downloads, 0);
}

#[tokio::test]
async fn unknown_slug_is_404() {
    let (h, addr) = TestHarness::with_server().await;

    let resp = reqwest::get(format!("http://{addr}/download/nope"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(h.settled_usage("nope").await.downloads, 0);
}

#[tokio::test]
async fn catalog_entry_with_missing_file_is_404() {
    let (_h, addr) = TestHarness::with_server().await;

    let resp = reqwest::get(format!("http://{addr}/download/ghost"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn catalog_entry_outside_root_is_403() {
    let (h, addr) = TestHarness::with_server().await;

    let resp = reqwest::get(format!("http://{addr}/download/escape"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
    let body = resp.text().await.unwrap();
    assert!(!body.contains("not for you"));
    assert_eq!(h.settled_usage("escape").await.downloads, 0);
}
