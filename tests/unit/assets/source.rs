use super::*;

fn client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::new()
}

#[test]
fn embedded_payload_is_decoded_with_mime() {
    let media = MediaRef::embed("image/png", b"\x89PNG-ish");
    let resolved = resolve_bytes(&media, &client()).unwrap();
    assert_eq!(resolved.bytes, b"\x89PNG-ish");
    assert_eq!(resolved.mime.as_deref(), Some("image/png"));
}

#[test]
fn broken_base64_is_an_asset_error() {
    let media = MediaRef::new("data:image/png;base64,@@@not-base64");
    let err = resolve_bytes(&media, &client()).unwrap_err();
    assert!(matches!(err, VibeError::Asset(_)));
}

#[test]
fn file_reference_reads_bytes_and_guesses_mime() {
    let dir = std::env::temp_dir().join(format!("vibeframe_source_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("logo.svg");
    std::fs::write(&path, b"<svg/>").unwrap();

    let media = MediaRef::new(format!("file://{}", path.display()));
    let resolved = resolve_bytes(&media, &client()).unwrap();
    assert_eq!(resolved.bytes, b"<svg/>");
    assert_eq!(resolved.mime.as_deref(), Some("image/svg+xml"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_file_and_empty_ref_fail() {
    let missing = MediaRef::new("/definitely/not/here.png");
    assert!(matches!(
        resolve_bytes(&missing, &client()).unwrap_err(),
        VibeError::Asset(_)
    ));
    assert!(resolve_bytes(&MediaRef::new("  "), &client()).is_err());
}
