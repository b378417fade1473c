//! Script response vector tests (envelope + body decoding).

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use bytes::Bytes;

use rexpro_core::protocol::{Envelope, ScriptResponse};

use vector_loader::load;

fn decode_response(raw: Vec<u8>) -> rexpro_core::Result<ScriptResponse> {
    let env = Envelope::decode(Bytes::from(raw))?;
    ScriptResponse::parse(env)
}

#[test]
fn script_response_vectors() {
    let files = [
        "sr_two_lines.json",
        "sr_bindings_and_newline.json",
        "sr_empty_line.json",
        "sr_unreadable_bindings.json",
        "sr_bindings_len_overflow.json",
        "sr_negative_bindings_len.json",
        "sr_truncated_segment.json",
        "sr_dangling_prefix.json",
        "sr_wrong_type.json",
        "env_too_short.json",
        "env_body_short.json",
    ];

    for f in files {
        let v = load(f);
        let res = decode_response(v.frame.decode());

        if let Some(err) = v.expect_error {
            let e = res.expect_err("expected error");
            assert_eq!(e.kind().as_str(), err.code, "vector={}", v.description);
            continue;
        }

        let resp = res.expect("expected ok response");
        let ex = v.expect.expect("missing expect block");

        let d = &v.description;
        assert_eq!(resp.session.to_string(), ex["session"].as_str().unwrap(), "vector={d}");
        assert_eq!(resp.flag as u64, ex["flag"].as_u64().unwrap(), "vector={d}");
        assert_eq!(resp.bindings.is_some(), ex["bindings_ok"].as_bool().unwrap(), "vector={d}");
        assert_eq!(resp.bindings.is_none(), resp.bindings_error.is_some(), "vector={d}");

        let want: Vec<String> = ex["lines"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l.as_str().unwrap().to_string())
            .collect();
        assert_eq!(resp.lines, want, "vector={d}");
    }
}

#[test]
fn reencoding_a_vector_is_byte_identical() {
    let raw = load("sr_bindings_and_newline.json").frame.decode();
    let env = Envelope::decode(Bytes::from(raw.clone())).unwrap();
    assert_eq!(env.encode().unwrap().as_ref(), raw.as_slice());
}
