use tid::{Keyring, Mode, TagLength, Tid, TidCodec, PROTO_VERSION};
use tid_codec::layout;
use tid_core::TID_LEN;
use tid_crypto::digest;

fn single_secret_codec() -> TidCodec {
    TidCodec::new(Keyring::new([(0, b"topSecret".to_vec())]).expect("keyring"))
}

fn flip_bit(tid: &Tid, byte: usize, mask: u8) -> Tid {
    let mut buf = *tid.as_bytes();
    buf[byte] ^= mask;
    Tid::from_bytes(buf)
}

/// Seals an arbitrary prefix the way `generate` does, so tests can craft
/// identifiers with unusual info bytes.
fn seal_manual(mut buf: [u8; TID_LEN], secret: &[u8], tag_length: TagLength) -> Tid {
    let tag = digest::derive_tag(secret, layout::signed_prefix(&buf, tag_length), tag_length);
    buf[layout::tag_offset(tag_length)..].copy_from_slice(&tag[..tag_length.len()]);
    buf[TID_LEN - 1] |= tag_length.footer_flag();
    Tid::from_bytes(buf)
}

#[test]
fn flipping_an_effective_tag_bit_invalidates_each_tag_length() {
    let codec = single_secret_codec();

    // One-byte tag: byte 15 carries the tag; bit 0 is the footer flag, so
    // bit 1 is the lowest effective tag bit.
    let one = codec
        .generate(b"user", Mode::Random, TagLength::One)
        .expect("generate should succeed");
    let tampered = flip_bit(&one, 15, 0x02);
    let info = codec.decode(&tampered, b"user").expect("decode should succeed");
    assert!(!info.valid_tag);

    // Two-byte tag: byte 14 is fully effective.
    let two = codec
        .generate(b"user", Mode::Random, TagLength::Two)
        .expect("generate should succeed");
    let tampered = flip_bit(&two, 14, 0x01);
    let info = codec.decode(&tampered, b"user").expect("decode should succeed");
    assert!(!info.valid_tag);
}

#[test]
fn flipping_a_payload_bit_invalidates_the_tag() {
    let codec = single_secret_codec();
    for mode in [Mode::Random, Mode::TimeSorted] {
        let tid = codec
            .generate(b"user", mode, TagLength::Two)
            .expect("generate should succeed");
        let tampered = flip_bit(&tid, 0, 0x01);
        let info = codec.decode(&tampered, b"user").expect("decode should succeed");
        assert!(!info.valid_tag, "payload tamper must fail for {mode}");
    }
}

#[test]
fn flipping_an_info_bit_invalidates_the_tag() {
    let codec = single_secret_codec();
    let tid = codec
        .generate(b"user", Mode::Random, TagLength::Two)
        .expect("generate should succeed");

    // Secret-index bits live in the info byte at offset 13 for a 2-byte tag.
    let tampered = flip_bit(&tid, 13, 0x10);
    let info = codec.decode(&tampered, b"user").expect("decode should succeed");
    assert!(!info.valid_tag);
}

#[test]
fn flipping_the_footer_flag_rejects_the_identifier() {
    let codec = single_secret_codec();
    let tid = codec
        .generate(b"user", Mode::Random, TagLength::Two)
        .expect("generate should succeed");

    // The flag is unauthenticated, so decoding reinterprets the layout at
    // the other tag length; the reinterpreted fields and tag must not both
    // line up.
    let tampered = flip_bit(&tid, 15, 0x01);
    let info = codec.decode(&tampered, b"user").expect("decode should succeed");
    assert!(!(info.valid_tag && info.type_matches));
}

#[test]
fn tampered_fingerprint_is_caught_by_the_type_check() {
    let codec = single_secret_codec();
    let tid = codec
        .generate(b"user", Mode::Random, TagLength::Two)
        .expect("generate should succeed");

    let tampered = flip_bit(&tid, layout::fingerprint_offset(TagLength::Two), 0x01);
    let info = codec.decode(&tampered, b"user").expect("decode should succeed");
    assert!(!info.type_matches, "stored fingerprint no longer matches");
}

#[test]
fn mismatched_expected_type_fails_both_checks() {
    let codec = single_secret_codec();
    let tid = codec
        .generate(b"user", Mode::Random, TagLength::Two)
        .expect("generate should succeed");

    let info = codec
        .decode(&tid, b"document")
        .expect("decode should succeed");
    assert!(!info.type_matches);
    // The tag is recomputed against the expected type's fingerprint, so a
    // wrong type also fails verification.
    assert!(!info.valid_tag);
}

#[test]
fn unknown_secret_index_is_invalid_not_an_error() {
    let codec = single_secret_codec();

    let mut buf = [0x5A_u8; TID_LEN];
    layout::write_fingerprint(
        &mut buf,
        TagLength::Two,
        tid_core::fingerprint::fingerprint(b"user"),
    );
    layout::write_info(
        &mut buf,
        TagLength::Two,
        layout::pack_info(9, PROTO_VERSION, Mode::Random),
    );
    let tid = seal_manual(buf, b"topSecret", TagLength::Two);

    let info = codec.decode(&tid, b"user").expect("decode should succeed");
    assert_eq!(info.secret_index, 9);
    assert!(!info.valid_tag, "index 9 is not configured");
    assert!(info.type_matches);
}

#[test]
fn unrecognized_version_decodes_but_never_validates() {
    let codec = single_secret_codec();

    let mut buf = [0x5A_u8; TID_LEN];
    layout::write_fingerprint(
        &mut buf,
        TagLength::Two,
        tid_core::fingerprint::fingerprint(b"user"),
    );
    layout::write_info(&mut buf, TagLength::Two, layout::pack_info(0, 5, Mode::Random));
    let tid = seal_manual(buf, b"topSecret", TagLength::Two);

    let info = codec.decode(&tid, b"user").expect("decode must not fail");
    assert_eq!(info.version, 5, "fields reflect the bits that were present");
    assert_eq!(info.mode, Mode::Random);
    assert!(info.type_matches);
    assert!(!info.valid_tag, "unsupported version never validates");
}
