//! Decode must treat arbitrary adversarial buffers as data, never as a
//! reason to panic or error.

use tid::{Keyring, Tid, TidCodec};
use tid_core::TID_LEN;

fn xorshift64(state: &mut u64) -> u64 {
    *state ^= *state << 13;
    *state ^= *state >> 7;
    *state ^= *state << 17;
    *state
}

fn random_buffer(state: &mut u64) -> [u8; TID_LEN] {
    let mut buf = [0_u8; TID_LEN];
    for chunk in buf.chunks_mut(8) {
        chunk.copy_from_slice(&xorshift64(state).to_be_bytes()[..chunk.len()]);
    }
    buf
}

#[test]
fn decode_never_panics_or_errors_on_arbitrary_buffers() {
    let codec = TidCodec::new(Keyring::new([(0, b"topSecret".to_vec())]).expect("keyring"));
    let mut state = 0x9E37_79B9_7F4A_7C15_u64;

    let mut accepted = 0_usize;
    for _ in 0..4096 {
        let tid = Tid::from_bytes(random_buffer(&mut state));
        let info = codec
            .decode(&tid, b"user")
            .expect("decode of arbitrary bits must not error");
        if info.valid_tag && info.type_matches {
            accepted += 1;
        }
    }

    // Random bits must not forge the keyed tag plus fingerprint plus
    // version; the expected count at this sample size is well below one.
    assert!(accepted <= 1, "accepted {accepted} forged identifiers");
}

#[test]
fn inspect_never_panics_on_arbitrary_buffers() {
    let mut state = 0x0123_4567_89AB_CDEF_u64;
    for _ in 0..1024 {
        let tid = Tid::from_bytes(random_buffer(&mut state));
        let structure = tid::inspect(&tid);
        assert!(structure.tag_length == 1 || structure.tag_length == 2);
        assert!(structure.secret_index < 16);
        assert!(structure.version < 8);
    }
}

#[test]
fn text_form_round_trips_for_arbitrary_buffers() {
    let mut state = 0xFEED_FACE_CAFE_BEEF_u64;
    for _ in 0..256 {
        let tid = Tid::from_bytes(random_buffer(&mut state));
        let reparsed: Tid = tid
            .to_string()
            .parse()
            .expect("canonical text form must parse back");
        assert_eq!(reparsed, tid);
    }
}
