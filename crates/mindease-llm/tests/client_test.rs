use futures::StreamExt;
use mindease_llm::{ChatClient, ChatOptions, ChatRequest, Message, OpenAIClient, StreamEvent};

fn sse_body(fragments: &[&str]) -> String {
    let mut body = String::new();
    for fragment in fragments {
        body.push_str(&format!(
            "data: {{\"id\":\"chatcmpl-1\",\"model\":\"llama3-70b-8192\",\"choices\":[{{\"index\":0,\"delta\":{{\"content\":\"{}\"}},\"finish_reason\":null}}]}}\n\n",
            fragment
        ));
    }
    body.push_str("data: {\"id\":\"chatcmpl-1\",\"model\":\"llama3-70b-8192\",\"choices\":[{\"index\":0,\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n");
    body.push_str("data: [DONE]\n\n");
    body
}

#[tokio::test]
async fn streams_fragments_from_compatible_endpoint() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(sse_body(&["I hear ", "you."]))
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url("test-key", server.url()).unwrap();
    let request = ChatRequest::new("llama3-70b-8192", vec![Message::human("I feel low")])
        .with_options(ChatOptions::new().temperature(0.7).max_tokens(500));

    let events: Vec<StreamEvent> = client
        .chat_stream(request)
        .await
        .unwrap()
        .map(|e| e.unwrap())
        .collect()
        .await;

    mock.assert_async().await;
    assert_eq!(
        events,
        vec![
            StreamEvent::Message { content: "I hear ".to_string() },
            StreamEvent::Message { content: "you.".to_string() },
            StreamEvent::Done { finish_reason: Some("stop".to_string()) },
        ]
    );
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error":{"message":"Invalid API Key"}}"#)
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url("bad-key", server.url()).unwrap();
    let result = client
        .chat_stream(ChatRequest::new("m", vec![Message::human("hi")]))
        .await;

    let err = result.err().expect("expected an error").to_string();
    assert!(err.contains("401"));
}

#[tokio::test]
async fn single_shot_chat_returns_content() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"id":"chatcmpl-2","model":"m","choices":[{"index":0,"message":{"role":"assistant","content":"What made you smile today?"},"finish_reason":"stop"}],"usage":{"prompt_tokens":10,"completion_tokens":7,"total_tokens":17}}"#,
        )
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url("k", server.url()).unwrap();
    let response = client
        .chat(ChatRequest::new("m", vec![Message::human("prompt please")]))
        .await
        .unwrap();

    assert_eq!(response.content.as_deref(), Some("What made you smile today?"));
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
}
