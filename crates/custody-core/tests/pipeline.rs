//! End-to-end properties of the integrity pipeline.

use custody_canonical::{Canonicalizer, Timestamp};
use custody_core::{
    aggregate_master, build_export_integrity, build_page_record, canonicalize_page,
    verify_against_capture, verify_masters, CaptureBundle, CaptureInfo, IntegrityError, RawPage,
    VerificationVerdict,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;

fn message(id: &str, body: &str) -> Value {
    json!({
        "id": id,
        "createdDateTime": "2026-08-25T09:00:00Z",
        "from": { "user": { "id": "user-1", "displayName": "Ada Lovelace" } },
        "body": { "contentType": "html", "content": body }
    })
}

fn page(messages: Vec<Value>, captured_at: &str) -> RawPage {
    RawPage {
        capture: CaptureInfo {
            requested_url: Some("https://graph.microsoft.com/v1.0/chats/x/messages".into()),
            captured_at: Some(Timestamp::parse(captured_at).unwrap()),
            status_code: Some(200),
            extra: BTreeMap::new(),
        },
        body: json!({
            "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#chats('x')/messages",
            "value": messages
        }),
    }
}

fn export_time() -> Timestamp {
    Timestamp::parse("2026-08-25T12:00:00Z").unwrap()
}

#[test]
fn canonicalization_is_deterministic() {
    let p = page(vec![message("m1", "hi"), message("m2", "bye")], "2026-08-25T10:00:00Z");

    let first = canonicalize_page(&p, 0).unwrap();
    let second = canonicalize_page(&p, 0).unwrap();
    assert_eq!(first, second);

    let canonicalizer = Canonicalizer::new();
    let bytes_first = canonicalizer
        .canonicalize(&serde_json::to_value(&first).unwrap())
        .unwrap();
    let bytes_second = canonicalizer
        .canonicalize(&serde_json::to_value(&second).unwrap())
        .unwrap();
    assert_eq!(bytes_first, bytes_second);
}

#[test]
fn content_hash_ignores_volatile_metadata() {
    let early = page(vec![message("m1", "hi")], "2026-08-25T10:00:00Z");
    let late = page(vec![message("m1", "hi")], "2026-08-25T11:30:00Z");

    let record_early = build_page_record(&early, 0).unwrap();
    let record_late = build_page_record(&late, 0).unwrap();

    assert_eq!(record_early.content_hash, record_late.content_hash);
    assert_ne!(record_early.forensic_hash, record_late.forensic_hash);
}

#[test]
fn content_hash_ignores_pagination_cursor() {
    let mut with_cursor = page(vec![message("m1", "hi")], "2026-08-25T10:00:00Z");
    with_cursor.body["@odata.nextLink"] =
        json!("https://graph.microsoft.com/v1.0/chats/x/messages?$skiptoken=abc");
    let without_cursor = page(vec![message("m1", "hi")], "2026-08-25T10:00:00Z");

    let a = build_page_record(&with_cursor, 0).unwrap();
    let b = build_page_record(&without_cursor, 0).unwrap();
    assert_eq!(a.content_hash, b.content_hash);
    assert_ne!(a.forensic_hash, b.forensic_hash);
}

#[test]
fn message_order_within_page_is_normalized() {
    let forward = page(vec![message("m1", "hi"), message("m2", "bye")], "2026-08-25T10:00:00Z");
    let reversed = page(vec![message("m2", "bye"), message("m1", "hi")], "2026-08-25T10:00:00Z");

    let a = build_page_record(&forward, 0).unwrap();
    let b = build_page_record(&reversed, 0).unwrap();
    assert_eq!(a.content_hash, b.content_hash);
}

#[test]
fn master_hash_is_order_sensitive() {
    let p0 = page(vec![message("m1", "hi")], "2026-08-25T10:00:00Z");
    let p1 = page(vec![message("m2", "bye")], "2026-08-25T10:00:05Z");

    let forward = build_export_integrity(&[p0.clone(), p1.clone()], export_time()).unwrap();
    let swapped = build_export_integrity(&[p1, p0], export_time()).unwrap();

    assert_ne!(forward.master_content_hash, swapped.master_content_hash);
    assert_ne!(forward.master_forensic_hash, swapped.master_forensic_hash);
}

#[test]
fn appending_a_page_changes_both_masters() {
    let p0 = page(vec![message("m1", "hi")], "2026-08-25T10:00:00Z");
    let p1 = page(vec![message("m2", "bye")], "2026-08-25T10:00:05Z");

    let short = build_export_integrity(&[p0.clone()], export_time()).unwrap();
    let long = build_export_integrity(&[p0, p1], export_time()).unwrap();

    assert_ne!(short.master_content_hash, long.master_content_hash);
    assert_ne!(short.master_forensic_hash, long.master_forensic_hash);
}

#[test]
fn editing_a_body_changes_page_and_masters() {
    let original = page(vec![message("m1", "hi"), message("m2", "bye")], "2026-08-25T10:00:00Z");
    let edited = page(vec![message("m1", "hi!"), message("m2", "bye")], "2026-08-25T10:00:00Z");

    let record_original = build_page_record(&original, 0).unwrap();
    let record_edited = build_page_record(&edited, 0).unwrap();
    assert_ne!(record_original.content_hash, record_edited.content_hash);

    let integrity_original = build_export_integrity(&[original], export_time()).unwrap();
    let integrity_edited = build_export_integrity(&[edited], export_time()).unwrap();
    assert_ne!(
        integrity_original.master_content_hash,
        integrity_edited.master_content_hash
    );
    assert_ne!(
        integrity_original.master_forensic_hash,
        integrity_edited.master_forensic_hash
    );
}

#[test]
fn reexport_of_unchanged_content_keeps_master_content_hash() {
    // Run A and run B capture the same two pages at different times.
    let run_a = vec![
        page(vec![message("m1", "hi")], "2026-08-25T10:00:00Z"),
        page(vec![message("m2", "bye")], "2026-08-25T10:00:05Z"),
    ];
    let run_b = vec![
        page(vec![message("m1", "hi")], "2026-08-25T14:00:00Z"),
        page(vec![message("m2", "bye")], "2026-08-25T14:00:05Z"),
    ];

    let integrity_a = build_export_integrity(&run_a, export_time()).unwrap();
    let integrity_b = build_export_integrity(&run_b, export_time()).unwrap();

    assert_eq!(integrity_a.master_content_hash, integrity_b.master_content_hash);
    assert_ne!(integrity_a.master_forensic_hash, integrity_b.master_forensic_hash);
}

#[test]
fn missing_id_fails_without_integrity_block() {
    let bad_message = json!({
        "createdDateTime": "2026-08-25T09:00:00Z",
        "body": { "content": "no id here" }
    });
    let pages = vec![
        page(vec![message("m1", "hi")], "2026-08-25T10:00:00Z"),
        page(vec![bad_message], "2026-08-25T10:00:05Z"),
    ];

    let err = build_export_integrity(&pages, export_time()).unwrap_err();
    match err {
        IntegrityError::MalformedPage { page_index, reason } => {
            assert_eq!(page_index, 1);
            assert!(reason.contains("id"));
        }
        other => panic!("expected MalformedPage, got {other:?}"),
    }
}

#[test]
fn missing_body_fails_with_page_index() {
    let bad_message = json!({ "id": "m9", "createdDateTime": "2026-08-25T09:00:00Z" });
    let pages = vec![page(vec![bad_message], "2026-08-25T10:00:00Z")];

    let err = build_export_integrity(&pages, export_time()).unwrap_err();
    assert!(matches!(err, IntegrityError::MalformedPage { page_index: 0, .. }));
}

#[test]
fn page_without_value_array_is_malformed() {
    let p = RawPage {
        capture: CaptureInfo::default(),
        body: json!({ "error": { "code": "TooManyRequests" } }),
    };
    let err = build_page_record(&p, 0).unwrap_err();
    assert!(matches!(err, IntegrityError::MalformedPage { page_index: 0, .. }));
}

#[test]
fn empty_page_hashes_without_error() {
    let empty = page(vec![], "2026-08-25T10:00:00Z");
    let record = build_page_record(&empty, 0).unwrap();
    assert_eq!(record.index, 0);

    // Empty canonical sequence is still an explicit value, not a skip.
    let other_empty = page(vec![], "2026-08-25T11:00:00Z");
    let other = build_page_record(&other_empty, 0).unwrap();
    assert_eq!(record.content_hash, other.content_hash);
}

#[test]
fn master_content_hash_never_equals_single_page_hash() {
    let p = page(vec![message("m1", "hi")], "2026-08-25T10:00:00Z");
    let integrity = build_export_integrity(&[p], export_time()).unwrap();
    assert_ne!(integrity.master_content_hash, integrity.pages[0].content_hash);
}

#[test]
fn capture_transport_extras_participate_in_forensic_hash() {
    let mut a = page(vec![message("m1", "hi")], "2026-08-25T10:00:00Z");
    let mut b = page(vec![message("m1", "hi")], "2026-08-25T10:00:00Z");
    a.capture
        .extra
        .insert("headers".into(), json!({ "request-id": "aaaa-1111" }));
    b.capture
        .extra
        .insert("headers".into(), json!({ "request-id": "bbbb-2222" }));

    let record_a = build_page_record(&a, 0).unwrap();
    let record_b = build_page_record(&b, 0).unwrap();
    assert_eq!(record_a.content_hash, record_b.content_hash);
    assert_ne!(record_a.forensic_hash, record_b.forensic_hash);
}

#[test]
fn capture_fields_outside_schema_survive_deserialization() {
    let info: CaptureInfo = serde_json::from_value(json!({
        "status_code": 200,
        "headers": { "request-id": "aaaa-1111" }
    }))
    .unwrap();
    assert_eq!(info.status_code, Some(200));
    assert_eq!(info.extra["headers"]["request-id"], "aaaa-1111");

    // Round-trips intact, so nothing is lost before hashing.
    let value = serde_json::to_value(&info).unwrap();
    assert_eq!(value["headers"]["request-id"], "aaaa-1111");
}

#[test]
fn digest_decode_failure_reports_page_index() {
    let pages = vec![
        page(vec![message("m1", "hi")], "2026-08-25T10:00:00Z"),
        page(vec![message("m2", "bye")], "2026-08-25T10:00:05Z"),
    ];
    let integrity = build_export_integrity(&pages, export_time()).unwrap();

    let mut records = integrity.pages.clone();
    records[1].content_hash.b64 = "not base64url at all!!".into();

    let err = aggregate_master(&records).unwrap_err();
    match err {
        IntegrityError::Digest { page_index, .. } => assert_eq!(page_index, 1),
        other => panic!("expected Digest error, got {other:?}"),
    }
}

#[test]
fn master_families_stay_independent() {
    let pages = vec![
        page(vec![message("m1", "hi")], "2026-08-25T10:00:00Z"),
        page(vec![message("m2", "bye")], "2026-08-25T10:00:05Z"),
    ];
    let integrity = build_export_integrity(&pages, export_time()).unwrap();

    // Swapping in a different forensic digest must leave the recomputed
    // master content hash untouched.
    let mut tampered = integrity.pages.clone();
    tampered[0].forensic_hash = tampered[1].forensic_hash.clone();

    let original_masters = aggregate_master(&integrity.pages).unwrap();
    let tampered_masters = aggregate_master(&tampered).unwrap();
    assert_eq!(original_masters.content, tampered_masters.content);
    assert_ne!(original_masters.forensic, tampered_masters.forensic);
}

#[test]
fn verify_masters_detects_tampering() {
    let pages = vec![
        page(vec![message("m1", "hi")], "2026-08-25T10:00:00Z"),
        page(vec![message("m2", "bye")], "2026-08-25T10:00:05Z"),
    ];
    let mut integrity = build_export_integrity(&pages, export_time()).unwrap();

    let report = verify_masters(&integrity).unwrap();
    assert_eq!(report.verdict, VerificationVerdict::Ok);
    assert!(report.masters_ok);

    integrity.master_content_hash = integrity.pages[0].content_hash.clone();
    let report = verify_masters(&integrity).unwrap();
    assert_eq!(report.verdict, VerificationVerdict::Mismatch);
}

#[test]
fn verify_masters_rejects_non_contiguous_indexes() {
    let pages = vec![
        page(vec![message("m1", "hi")], "2026-08-25T10:00:00Z"),
        page(vec![message("m2", "bye")], "2026-08-25T10:00:05Z"),
    ];
    let mut integrity = build_export_integrity(&pages, export_time()).unwrap();
    integrity.pages[1].index = 7;

    assert!(matches!(
        verify_masters(&integrity),
        Err(IntegrityError::InvalidArtifact(_))
    ));
}

#[test]
fn verify_against_capture_flags_edited_page() {
    let pages = vec![
        page(vec![message("m1", "hi")], "2026-08-25T10:00:00Z"),
        page(vec![message("m2", "bye")], "2026-08-25T10:00:05Z"),
    ];
    let integrity = build_export_integrity(&pages, export_time()).unwrap();

    let report = verify_against_capture(&integrity, &pages).unwrap();
    assert_eq!(report.verdict, VerificationVerdict::Ok);

    let mut tampered = pages.clone();
    tampered[1] = page(vec![message("m2", "bye!")], "2026-08-25T10:00:05Z");
    let report = verify_against_capture(&integrity, &tampered).unwrap();
    assert_eq!(report.verdict, VerificationVerdict::Mismatch);
    assert!(report.pages[0].content_ok);
    assert!(!report.pages[1].content_ok);
    assert!(!report.pages[1].forensic_ok);
}

#[test]
fn verify_against_capture_rejects_page_count_mismatch() {
    let pages = vec![page(vec![message("m1", "hi")], "2026-08-25T10:00:00Z")];
    let integrity = build_export_integrity(&pages, export_time()).unwrap();

    assert!(matches!(
        verify_against_capture(&integrity, &[]),
        Err(IntegrityError::InvalidArtifact(_))
    ));
}

#[test]
fn participants_recovered_from_messages_when_absent() {
    let bundle: CaptureBundle = serde_json::from_value(json!({
        "chat_id": "19:abc123@unq.gbl.spaces",
        "pages": [{
            "body": { "value": [
                message("m1", "hi"),
                {
                    "id": "m2",
                    "from": { "user": { "id": "user-2", "displayName": "Grace Hopper" } },
                    "body": { "content": "hello" }
                }
            ]}
        }]
    }))
    .unwrap();

    let participants = bundle.effective_participants();
    let names: Vec<&str> = participants.iter().map(|p| p.display_name.as_str()).collect();
    assert_eq!(names, vec!["Ada Lovelace", "Grace Hopper"]);
}
