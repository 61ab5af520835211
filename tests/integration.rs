use pretty_assertions::assert_eq;
use prompt_painter::{
    ai::{ChatService, MockChatClient, MockImageGenerationClient},
    app::{App, AppServices},
    models::{Click, Config, InteractionOutcome},
};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHAT_PATH: &str = "/openai/deployments/gpt-35-turbo/chat/completions";
const SUBMIT_PATH: &str = "/openai/images/generations:submit";
const OPERATION_PATH: &str = "/openai/operations/images/abc123";
const REFINED: &str = "a photorealistic cat in a sunlit garden";

fn test_config(server: &MockServer, max_attempts: Option<u32>) -> Config {
    Config {
        endpoint: format!("{}/", server.uri()),
        api_key: "test-key".to_string(),
        chat_model: "gpt-35-turbo".to_string(),
        poll_interval: Duration::from_millis(10),
        poll_max_attempts: max_attempts,
        bind_addr: "127.0.0.1:0".to_string(),
    }
}

async fn mount_chat(server: &MockServer, user_text: &str) {
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(header("api-key", "test-key"))
        .and(body_partial_json(serde_json::json!({
            "messages": [
                { "role": "system", "content": "You are an expert at generating Dall-E prompts" },
                { "role": "user", "content": user_text }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{
                "message": { "role": "assistant", "content": REFINED },
                "finish_reason": "stop"
            }]
        })))
        .mount(server)
        .await;
}

async fn mount_submit(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(SUBMIT_PATH))
        .and(header("api-key", "test-key"))
        .respond_with(ResponseTemplate::new(202).insert_header(
            "Operation-Location",
            format!("{}{}", server.uri(), OPERATION_PATH).as_str(),
        ))
        .mount(server)
        .await;
}

async fn mount_running_then_succeeded(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(OPERATION_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "running" })),
        )
        .up_to_n_times(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(OPERATION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "succeeded",
            "result": { "data": [{ "url": "https://example/img1.png" }] }
        })))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

async fn count_requests(server: &MockServer, verb: &str, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|req| req.method.as_str() == verb && req.url.path() == request_path)
        .count()
}

#[tokio::test]
async fn test_scenario_a_refines_then_polls_to_image() {
    let server = MockServer::start().await;
    mount_chat(&server, "a cat").await;
    mount_submit(&server).await;
    mount_running_then_succeeded(&server).await;

    let app = App::new(&test_config(&server, Some(10)));
    let outcome = app.handle(&Click::new(1, "a cat")).await.unwrap();

    assert_eq!(
        outcome,
        Some(InteractionOutcome {
            image_url: Some("https://example/img1.png".to_string()),
            loading_indicator: None,
            status: format!("Refined Prompt: {}", REFINED),
        })
    );
    assert_eq!(count_requests(&server, "POST", CHAT_PATH).await, 1);
    assert_eq!(count_requests(&server, "POST", SUBMIT_PATH).await, 1);
    assert_eq!(count_requests(&server, "GET", OPERATION_PATH).await, 2);
}

#[tokio::test]
async fn test_scenario_b_missing_operation_location() {
    let server = MockServer::start().await;
    mount_chat(&server, "a cat").await;

    Mock::given(method("POST"))
        .and(path(SUBMIT_PATH))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let app = App::new(&test_config(&server, Some(10)));
    let outcome = app.handle(&Click::new(1, "a cat")).await.unwrap();

    assert_eq!(
        outcome,
        Some(InteractionOutcome {
            image_url: None,
            loading_indicator: None,
            status: "Error generating image. Please try again.".to_string(),
        })
    );
    assert_eq!(count_requests(&server, "GET", OPERATION_PATH).await, 0);
}

#[tokio::test]
async fn test_scenario_c_zero_clicks_is_idle() {
    let server = MockServer::start().await;

    let app = App::new(&test_config(&server, Some(10)));
    let outcome = app.handle(&Click::new(0, "a cat")).await.unwrap();

    assert_eq!(outcome, None);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_repeating_scenario_a_yields_identical_outcomes() {
    let server = MockServer::start().await;
    mount_chat(&server, "a cat").await;
    mount_submit(&server).await;

    let app = App::new(&test_config(&server, Some(10)));
    let mut outcomes = Vec::new();
    for clicks in 1..=3 {
        mount_running_then_succeeded(&server).await;
        outcomes.push(app.handle(&Click::new(clicks, "a cat")).await.unwrap());
    }

    assert!(outcomes.iter().all(|outcome| outcome == &outcomes[0]));
    assert_eq!(count_requests(&server, "GET", OPERATION_PATH).await, 6);
}

#[tokio::test]
async fn test_failed_job_surfaces_generic_message() {
    let server = MockServer::start().await;
    mount_chat(&server, "a cat").await;
    mount_submit(&server).await;

    Mock::given(method("GET"))
        .and(path(OPERATION_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "failed" })),
        )
        .mount(&server)
        .await;

    let app = App::new(&test_config(&server, None));
    let outcome = app.handle(&Click::new(1, "a cat")).await.unwrap();

    assert_eq!(outcome, Some(InteractionOutcome::image_failed()));
    assert_eq!(count_requests(&server, "GET", OPERATION_PATH).await, 1);
}

#[tokio::test]
async fn test_unbounded_policy_never_resolves_a_running_job() {
    let server = MockServer::start().await;
    mount_chat(&server, "a cat").await;
    mount_submit(&server).await;

    Mock::given(method("GET"))
        .and(path(OPERATION_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "running" })),
        )
        .mount(&server)
        .await;

    let app = App::new(&test_config(&server, None));
    let click = Click::new(1, "a cat");
    let result = tokio::time::timeout(Duration::from_millis(250), app.handle(&click)).await;

    assert!(result.is_err(), "interaction must still be polling");
    assert!(count_requests(&server, "GET", OPERATION_PATH).await > 1);
}

#[tokio::test]
async fn test_bounded_policy_gives_up_with_generic_message() {
    let server = MockServer::start().await;
    mount_chat(&server, "a cat").await;
    mount_submit(&server).await;

    Mock::given(method("GET"))
        .and(path(OPERATION_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "running" })),
        )
        .mount(&server)
        .await;

    let app = App::new(&test_config(&server, Some(3)));
    let outcome = app.handle(&Click::new(1, "a cat")).await.unwrap();

    assert_eq!(outcome, Some(InteractionOutcome::image_failed()));
    assert_eq!(count_requests(&server, "GET", OPERATION_PATH).await, 3);
}

#[tokio::test]
async fn test_app_with_services_is_usable_from_integration_tests() {
    let chat = MockChatClient::new().with_prompt_response(REFINED.to_string());
    assert_eq!(chat.refine_prompt("a cat").await.unwrap(), REFINED);

    let app = App::with_services(AppServices {
        chat: Box::new(chat),
        image_gen: Box::new(
            MockImageGenerationClient::new().with_image_url("https://cdn.test/a.png".to_string()),
        ),
    });

    let outcome = app.handle(&Click::new(1, "a cat")).await.unwrap();
    assert_eq!(
        outcome,
        Some(InteractionOutcome::generated(
            "https://cdn.test/a.png".to_string(),
            REFINED
        ))
    );
}
