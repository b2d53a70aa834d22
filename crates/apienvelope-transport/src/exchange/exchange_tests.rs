#![allow(non_snake_case)]

use super::*;
use apienvelope_core::Wrapped;
use serde::ser::{Error as _, Serializer};
use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex};
use test_case::test_case;

#[derive(serde::Serialize)]
struct Tournament {
    mode: &'static str,
    participants: u32,
}

/// A body whose serialization always fails
struct Unserializable;

impl Serialize for Unserializable {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(S::Error::custom("cannot encode this value"))
    }
}

/// A reader that fails after yielding a few bytes
struct BrokenReader {
    served: bool,
}

impl Read for BrokenReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.served {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer reset"));
        }
        self.served = true;
        buf[..1].copy_from_slice(b"{");
        Ok(1)
    }
}

/// A writer that rejects every write
struct ClosedWriter;

impl Write for ClosedWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Log sink shared with a fmt subscriber
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn with_captured_logs(f: impl FnOnce()) -> String {
    let logs = CapturedLogs::default();
    let sink = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || sink.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    logs.contents()
}

fn output(buf: Vec<u8>) -> String {
    String::from_utf8(buf).unwrap()
}

// send_success tests

#[test]
fn send_success___plain_message___writes_ok_message_shape() {
    let mut buf = Vec::new();

    send_success(&mut buf, "Hello!");

    assert_eq!(output(buf), r#"{"status":"OK","message":"Hello!"}"#);
}

#[test_case("", r#"{"status":"OK","message":""}"#; "empty")]
#[test_case(r#"say "hi""#, r#"{"status":"OK","message":"say \"hi\""}"#; "quotes")]
#[test_case("line\nbreak\ttab", r#"{"status":"OK","message":"line\nbreak\ttab"}"#; "whitespace escapes")]
#[test_case(r"back\slash", r#"{"status":"OK","message":"back\\slash"}"#; "backslash")]
#[test_case("héllo ✓", r#"{"status":"OK","message":"héllo ✓"}"#; "non ascii")]
#[test_case("\u{1}", r#"{"status":"OK","message":"\u0001"}"#; "control character")]
fn send_success___special_characters___are_json_escaped(message: &str, expected: &str) {
    let mut buf = Vec::new();

    send_success(&mut buf, message);

    assert_eq!(output(buf), expected);
}

// send_error tests

#[test]
fn send_error___simple_error___writes_error_shape() {
    let mut buf = Vec::new();

    send_error(&mut buf, &io::Error::other("Test error 1001"));

    assert_eq!(output(buf), r#"{"status":"Error","message":"Test error 1001"}"#);
}

#[test]
fn send_error___wrapped_error___joins_chain() {
    let mut buf = Vec::new();
    let err = Wrapped::new("Test error 1001", "Test error 1002");

    send_error(&mut buf, &err);

    assert_eq!(
        output(buf),
        r#"{"status":"Error","message":"Test error 1001: Test error 1002"}"#
    );
}

#[test]
fn send_error___deeply_wrapped_error___renders_outermost_first() {
    let mut buf = Vec::new();
    let err = Wrapped::new("A", Wrapped::new("B", io::Error::other("C")));

    send_error(&mut buf, &err);

    assert_eq!(output(buf), r#"{"status":"Error","message":"A: B: C"}"#);
}

#[test_case("failed to load user", "user", "failed to load user: user" ; "cause is tail of context")]
#[test_case("timeout", "timeout", "timeout: timeout" ; "cause equals context")]
#[test_case("A", "", "A: " ; "empty cause")]
fn send_error___wrapped_cause___is_never_dropped(context: &str, cause: &str, expected: &str) {
    let err = Wrapped::new(context, cause);
    let mut buf = Vec::new();

    send_error(&mut buf, &err);

    let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(parsed["message"], expected);
}

#[test]
fn send_error___anyhow_error___renders_context_chain() {
    let mut buf = Vec::new();
    let err = anyhow::anyhow!("B").context("A");

    send_error(&mut buf, &*err);

    assert_eq!(output(buf), r#"{"status":"Error","message":"A: B"}"#);
}

#[test]
fn send_error___decode_error___reports_open_failure() {
    let mut buf = Vec::new();
    let err = open_envelope(&b"{oops"[..]).unwrap_err();

    send_error(&mut buf, &err);

    let text = output(buf);
    assert!(text.starts_with(r#"{"status":"Error","message":"request unmarshal failed: "#));
}

// send_result tests

#[test]
fn send_result___struct_body___writes_result_shape() {
    let mut buf = Vec::new();

    send_result(
        &mut buf,
        &Tournament {
            mode: "test",
            participants: 100,
        },
    );

    assert_eq!(
        output(buf),
        r#"{"status":"OK","body":{"mode":"test","participants":100}}"#
    );
}

#[test]
fn send_result___map_body___writes_map() {
    let mut buf = Vec::new();
    let body: BTreeMap<&str, u32> = [("a", 1), ("b", 2)].into_iter().collect();

    send_result(&mut buf, &body);

    assert_eq!(output(buf), r#"{"status":"OK","body":{"a":1,"b":2}}"#);
}

#[test]
fn send_result___slice_body___writes_array() {
    let mut buf = Vec::new();
    let body: &[&str] = &["x", "y"];

    send_result(&mut buf, body);

    assert_eq!(output(buf), r#"{"status":"OK","body":["x","y"]}"#);
}

#[test_case(serde_json::json!(null), "null")]
#[test_case(serde_json::json!(true), "true")]
#[test_case(serde_json::json!(42), "42")]
#[test_case(serde_json::json!("text"), r#""text""#)]
fn send_result___primitive_body___writes_canonical_json(body: serde_json::Value, expected: &str) {
    let mut buf = Vec::new();

    send_result(&mut buf, &body);

    assert_eq!(output(buf), format!(r#"{{"status":"OK","body":{expected}}}"#));
}

#[test]
fn send_result___raw_request_body___is_echoed_verbatim() {
    let mut buf = Vec::new();
    let env = open_envelope(&br#"{"method":"ECHO","body":{"k":[1,2]}}"#[..]).unwrap();

    send_result(&mut buf, &env.body);

    assert_eq!(output(buf), r#"{"status":"OK","body":{"k":[1,2]}}"#);
}

// Degraded mode

#[test]
fn send_result___unserializable_body___writes_fallback_text() {
    let mut buf = Vec::new();

    send_result(&mut buf, &Unserializable);

    assert_eq!(output(buf), "internal system error");
}

#[test]
fn send_result___unserializable_body___logs_root_cause() {
    let logs = with_captured_logs(|| {
        send_result(io::sink(), &Unserializable);
    });

    assert!(logs.contains("response marshal failed"));
    assert!(logs.contains("cannot encode this value"));
}

#[test]
fn send_result___custom_fallback___writes_configured_text() {
    let codec = EnvelopeCodec::new(EnvelopeConfig::new().with_fallback_message("try again"));
    let mut buf = Vec::new();

    codec.send_result(&mut buf, &Unserializable);

    assert_eq!(output(buf), "try again");
}

#[test]
fn try_send_result___unserializable_body___returns_encode_error() {
    let codec = EnvelopeCodec::default();
    let mut buf = Vec::new();

    let result = codec.try_send_result(&mut buf, &Unserializable);

    assert!(matches!(result, Err(EnvelopeError::Encode(_))));
    assert!(buf.is_empty());
}

#[test]
fn send_success___closed_writer___does_not_panic() {
    let logs = with_captured_logs(|| send_success(ClosedWriter, "lost"));

    assert!(logs.contains("dropping response envelope"));
}

#[test]
fn try_send_success___closed_writer___returns_write_error() {
    let result = EnvelopeCodec::default().try_send_success(ClosedWriter, "lost");

    assert!(matches!(result, Err(EnvelopeError::Write(_))));
}

#[test]
fn try_send_error___writes_same_bytes_as_send_error() {
    let codec = EnvelopeCodec::default();
    let err = Wrapped::new("A", "B");
    let mut fallible = Vec::new();
    let mut infallible = Vec::new();

    codec.try_send_error(&mut fallible, &err).unwrap();
    codec.send_error(&mut infallible, &err);

    assert_eq!(fallible, infallible);
}

// open_envelope tests

#[test]
fn open_envelope___marshaled_get_request___roundtrips() {
    let request = RequestEnvelope::from_typed("GET", &serde_json::json!({"id": 1234})).unwrap();
    let bytes = request.to_bytes().unwrap();

    let env = open_envelope(bytes.as_slice()).unwrap();

    assert_eq!(env.method, "GET");
    let body: serde_json::Value = env.body_as().unwrap();
    assert_eq!(body, serde_json::json!({"id": 1234}));
}

#[test]
fn open_envelope___delete_request___decodes_method_and_body() {
    let env = open_envelope(&br#"{"method":"DELETE","body":{"id":1234}}"#[..]).unwrap();

    assert_eq!(env.method, "DELETE");
    assert_eq!(env.body_str(), r#"{"id":1234}"#);
}

#[test_case(b"" ; "empty input")]
#[test_case(b"{" ; "truncated object")]
#[test_case(b"not json" ; "plain text")]
#[test_case(br#"{"method":"GET"} trailing"# ; "trailing garbage")]
#[test_case(br#""GET""# ; "top level string")]
#[test_case(b"null" ; "top level null")]
#[test_case(b"[]" ; "empty array")]
#[test_case(br#"["DELETE",{"id":1234}]"# ; "positional array")]
#[test_case(b"5" ; "top level number")]
#[test_case(br#"{"method":["GET"]}"# ; "method of wrong type")]
fn open_envelope___malformed_input___returns_parse_error(input: &[u8]) {
    let result = open_envelope(input);

    assert!(matches!(result, Err(EnvelopeError::Parse(_))));
}

#[test_case(br#"{"method":"GET"}"# ; "missing body")]
#[test_case(br#"{"method":"GET","body":null}"# ; "null body")]
fn open_envelope___absent_body___reads_as_null(input: &[u8]) {
    let env = open_envelope(input).unwrap();

    assert!(env.body.is_none());
    assert_eq!(env.body_str(), "null");
    let body: Option<u32> = env.body_as().unwrap();
    assert_eq!(body, None);
}

#[test]
fn open_envelope___missing_method___decodes_as_empty() {
    let env = open_envelope(&br#"{"body":[1,2],"extra":true}"#[..]).unwrap();

    assert_eq!(env.method, "");
    assert_eq!(env.body_str(), "[1,2]");
}

#[test]
fn open_envelope___reader_fails___returns_read_error() {
    let result = open_envelope(BrokenReader { served: false });

    match result {
        Err(err @ EnvelopeError::Read(_)) => {
            assert_eq!(err.to_string(), "request read failed: peer reset");
        }
        other => panic!("expected read error, got {other:?}"),
    }
}

#[test]
fn open_envelope___logs_decoded_method() {
    let logs = with_captured_logs(|| {
        open_envelope(&br#"{"method":"LIST","body":[]}"#[..]).unwrap();
    });

    assert!(logs.contains("opened request envelope"));
    assert!(logs.contains("LIST"));
}

#[test]
fn EnvelopeCodec___open___request_over_limit_is_rejected() {
    let codec = EnvelopeCodec::new(EnvelopeConfig::new().with_max_request_bytes(16));

    let result = codec.open(&br#"{"method":"GET","body":{"id":1234}}"#[..]);

    assert!(matches!(result, Err(EnvelopeError::TooLarge { limit: 16 })));
}

#[test]
fn EnvelopeCodec___open___request_at_limit_is_accepted() {
    let input = br#"{"method":"GET"}"#;
    let codec = EnvelopeCodec::new(EnvelopeConfig::new().with_max_request_bytes(input.len() as u64));

    let env = codec.open(&input[..]).unwrap();

    assert_eq!(env.method, "GET");
}

#[test]
fn EnvelopeCodec___pretty___writes_indented_json() {
    let codec = EnvelopeCodec::new(EnvelopeConfig::new().with_pretty(true));
    let mut buf = Vec::new();

    codec.send_success(&mut buf, "hi");

    let text = output(buf);
    assert!(text.contains('\n'));
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, serde_json::json!({"status": "OK", "message": "hi"}));
}

#[test]
fn EnvelopeCodec___content_type___is_json() {
    assert_eq!(EnvelopeCodec::default().content_type(), "application/json");
}

#[test]
fn EnvelopeCodec___concurrent_callers___share_one_codec() {
    let codec = Arc::new(EnvelopeCodec::default());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let codec = Arc::clone(&codec);
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                codec.send_result(&mut buf, &i);
                output(buf)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(
            handle.join().unwrap(),
            format!(r#"{{"status":"OK","body":{i}}}"#)
        );
    }
}
