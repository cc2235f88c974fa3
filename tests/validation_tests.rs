// Upload validator properties
// Author: kelexine (https://github.com/kelexine)

use proptest::prelude::*;
use vision_relay::error::RelayError;
use vision_relay::vision::{validate_upload, UploadPolicy, UploadedImage};

const LIMIT: usize = 64 * 1024;

fn policy() -> UploadPolicy {
    UploadPolicy::new(
        LIMIT,
        &["image/jpeg".to_string(), "image/png".to_string()],
        false,
    )
}

fn mime_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("image/jpeg".to_string()),
        Just("image/png".to_string()),
        Just("image/webp".to_string()),
        Just("text/plain".to_string()),
        "[a-z]{1,10}/[a-z0-9.+-]{1,12}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn oversize_is_rejected_for_any_type(extra in 1usize..4096, mime in mime_strategy()) {
        let upload = UploadedImage::new(vec![0u8; LIMIT + extra], mime);
        match validate_upload(&upload, &policy()) {
            Err(RelayError::Validation(msg)) => prop_assert!(msg.starts_with("Soubor je příliš velký")),
            other => prop_assert!(false, "unexpected: {:?}", other),
        }
    }

    #[test]
    fn unlisted_type_is_rejected_for_any_size(
        size in 1usize..=LIMIT,
        mime in "[a-z]{1,10}/[a-z0-9.+-]{1,12}"
    ) {
        prop_assume!(mime != "image/jpeg" && mime != "image/png" && mime != "image/jpg");
        let upload = UploadedImage::new(vec![0u8; size], mime);
        match validate_upload(&upload, &policy()) {
            Err(RelayError::Validation(msg)) => prop_assert!(msg.starts_with("Podporované formáty")),
            other => prop_assert!(false, "unexpected: {:?}", other),
        }
    }

    #[test]
    fn listed_type_within_limit_is_accepted(
        size in 1usize..=LIMIT,
        mime in prop_oneof![Just("image/jpeg"), Just("image/png")]
    ) {
        let upload = UploadedImage::new(vec![0u8; size], mime);
        prop_assert!(validate_upload(&upload, &policy()).is_ok());
    }
}

#[test]
fn test_configured_limits_are_independent() {
    let analysis = UploadPolicy::new(20 * 1024 * 1024, &["image/jpeg".to_string()], false);
    let generation = UploadPolicy::new(10 * 1024 * 1024, &["image/jpeg".to_string()], false);
    let upload = UploadedImage::new(vec![0u8; 15 * 1024 * 1024], "image/jpeg");

    assert!(validate_upload(&upload, &analysis).is_ok());
    assert!(matches!(
        validate_upload(&upload, &generation),
        Err(RelayError::Validation(msg)) if msg.contains("10MB")
    ));
}
