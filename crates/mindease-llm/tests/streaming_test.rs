use mindease_llm::StreamEvent;

#[test]
fn test_stream_event_message() {
    let event = StreamEvent::Message {
        content: "Hello".to_string(),
    };

    match event {
        StreamEvent::Message { content } => assert_eq!(content, "Hello"),
        _ => panic!("Expected Message variant"),
    }
}

#[test]
fn test_stream_event_done() {
    let event = StreamEvent::Done {
        finish_reason: Some("stop".to_string()),
    };

    match event {
        StreamEvent::Done { finish_reason } => {
            assert_eq!(finish_reason, Some("stop".to_string()));
        }
        _ => panic!("Expected Done variant"),
    }
}

#[test]
fn test_stream_event_serialization_message() {
    let event = StreamEvent::Message {
        content: "Test".to_string(),
    };

    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"type\":\"message\""));
    assert!(json.contains("Test"));
}

#[test]
fn test_stream_event_done_omits_missing_reason() {
    let json = serde_json::to_string(&StreamEvent::Done { finish_reason: None }).unwrap();
    assert_eq!(json, r#"{"type":"done"}"#);
}

#[test]
fn test_stream_event_deserialization_message() {
    let json = r#"{"type":"message","content":"Hello"}"#;
    let event: StreamEvent = serde_json::from_str(json).unwrap();

    assert_eq!(event, StreamEvent::Message { content: "Hello".to_string() });
}
