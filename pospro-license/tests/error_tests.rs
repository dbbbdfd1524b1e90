use pospro_license::LicenseError;

#[test]
fn error_display_empty_key() {
    let err = LicenseError::EmptyKey;
    assert!(format!("{err}").contains("empty"));
}

#[test]
fn error_display_unknown_key() {
    let err = LicenseError::UnknownKey;
    assert!(format!("{err}").contains("not recognised"));
}

#[test]
fn error_display_storage() {
    let err = LicenseError::Storage("disk full".into());
    let msg = format!("{err}");
    assert!(msg.contains("storage"));
    assert!(msg.contains("disk full"));
}

#[test]
fn error_from_io() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: LicenseError = io.into();
    assert!(format!("{err}").contains("IO error"));
}

#[test]
fn error_from_serde_json() {
    let serde_err: Result<serde_json::Value, _> = serde_json::from_str("not json");
    let license_err: LicenseError = serde_err.unwrap_err().into();
    assert!(format!("{license_err}").contains("serialization"));
}

#[test]
fn invalid_key_classification() {
    assert!(LicenseError::EmptyKey.is_invalid_key());
    assert!(LicenseError::UnknownKey.is_invalid_key());
    assert!(!LicenseError::Storage("x".into()).is_invalid_key());
}
