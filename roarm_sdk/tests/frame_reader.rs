/// Frame extraction from a fragmented, noisy byte stream.
use roarm_sdk::framing::{FrameBuf, FRAME_END, MAX_FRAME_LEN};

#[test]
fn test_single_frame_split_at_every_byte() {
    let wire = "{\"T\":1}\r\n";
    let mut frames = FrameBuf::new();
    let mut collected = Vec::new();

    for byte in wire.chars() {
        frames.push(&byte.to_string());
        if let Some(frame) = frames.next_frame() {
            collected.push(frame);
        }
    }

    assert_eq!(collected, vec![wire.to_string()]);
    assert!(frames.is_empty());

    let value: serde_json::Value = serde_json::from_str(collected[0].trim()).unwrap();
    assert_eq!(value, serde_json::json!({ "T": 1 }));
}

#[test]
fn test_two_frames_in_one_chunk() {
    let mut frames = FrameBuf::new();
    frames.push("{\"T\":1051,\"x\":1}\r\n{\"T\":1051,\"x\":2}\r\n");
    assert_eq!(frames.next_frame().unwrap(), "{\"T\":1051,\"x\":1}\r\n");
    assert_eq!(frames.next_frame().unwrap(), "{\"T\":1051,\"x\":2}\r\n");
    assert_eq!(frames.next_frame(), None);
}

#[test]
fn test_noise_before_frame_is_dropped() {
    let mut frames = FrameBuf::new();
    // Boot chatter and a half-baked object precede the real frame; the
    // extractor anchors on the last `{` before the terminator.
    frames.push("boot ok\r{\"half\":{\"T\":7}\r\n");
    assert_eq!(frames.next_frame().unwrap(), "{\"T\":7}\r\n");
    assert_eq!(frames.next_frame(), None);
}

#[test]
fn test_overflow_discards_buffer() {
    let mut frames = FrameBuf::new();
    // 600 characters with no terminator anywhere.
    frames.push(&"x".repeat(600));
    assert_eq!(frames.next_frame(), None);
    assert!(frames.is_empty());

    // The reader recovers: the next complete frame comes through.
    frames.push("{\"T\":1}\r\n");
    assert_eq!(frames.next_frame().unwrap(), "{\"T\":1}\r\n");
}

#[test]
fn test_overflow_cap_is_exact() {
    let mut frames = FrameBuf::new();
    frames.push(&"y".repeat(MAX_FRAME_LEN));
    // At the cap the buffer survives...
    assert_eq!(frames.len(), MAX_FRAME_LEN);
    // ...one byte past it, everything goes.
    frames.push("y");
    assert!(frames.is_empty());
}

#[test]
fn test_terminator_inside_string_desyncs_framing() {
    // The extractor does not parse JSON, so a `}\r\n` sequence inside a
    // string value truncates the frame. Known limitation, pinned here:
    // recovery relies on the overflow reset, not on brace balancing.
    let mut frames = FrameBuf::new();
    frames.push("{\"msg\":\"}\r\n\",\"T\":2}\r\n");

    let frame = frames.next_frame().unwrap();
    assert_eq!(frame, "{\"msg\":\"}\r\n");
    assert!(serde_json::from_str::<serde_json::Value>(frame.trim()).is_err());

    // The tail has a terminator but no start brace left, so it sits in
    // the buffer until overflow recovery clears it.
    assert_eq!(frames.next_frame(), None);
    assert!(!frames.is_empty());
}

#[test]
fn test_frame_end_constant_matches_wire() {
    assert_eq!(FRAME_END, "}\r\n");
}
