mod common;

use assert_matches::assert_matches;
use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
};
use common::{create_entry, get, post_json, send, send_json, test_app, TestAppBuilder};
use serde_json::{json, Value};

//=========================================================================================
// Entries
//=========================================================================================

#[tokio::test]
async fn created_entry_round_trips_with_tag_order() {
    let app = test_app();
    let id = create_entry(
        &app,
        json!({
            "user_id": "dreamer",
            "entry_date": "2024-03-10",
            "dream_title": "Glass Forest",
            "enhanced_description": "I walked through trees made of glass.",
            "themes": ["water", "flying", "water"],
            "emotions": ["awe", "fear"],
            "symbols": ["key"],
            "lucidity_level": 3,
            "vividness_level": 5,
            "art_style": "cosmic"
        }),
    )
    .await;

    let (status, body) = get(&app, &format!("/entries/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    let entry = &body["entry"];
    assert_eq!(entry["themes"], json!(["water", "flying", "water"]));
    assert_eq!(entry["emotions"], json!(["awe", "fear"]));
    assert_eq!(entry["symbols"], json!(["key"]));
    assert_eq!(entry["lucidity_level"], 3);
    assert_eq!(entry["art_style"], "cosmic");
    assert_eq!(entry["entry_date"], "2024-03-10");
    assert_eq!(entry["prompts"], json!([]));
}

#[tokio::test]
async fn create_applies_defaults() {
    let app = test_app();
    let (status, body) = post_json(&app, "/entries", json!({ "art_style": "watercolor" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["entry"]["user_id"], "default_user");
    assert_eq!(body["entry"]["art_style"], "ethereal");
    assert_eq!(body["entry"]["themes"], json!([]));
    assert_eq!(body["entry"]["vividness_level"], 0);
}

#[tokio::test]
async fn out_of_range_rating_is_rejected() {
    let app = test_app();
    let (status, body) = post_json(&app, "/entries", json!({ "lucidity_level": 6 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_matches!(body["error"].as_str(), Some(message) if message.contains("lucidity_level"));
}

#[tokio::test]
async fn non_numeric_rating_is_rejected() {
    let app = test_app();
    let (status, body) = post_json(&app, "/entries", json!({ "vividness_level": "very" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn invalid_entry_date_is_rejected() {
    let app = test_app();
    let (status, _) = post_json(&app, "/entries", json!({ "entry_date": "10/03/2024" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_entry_is_not_found() {
    let app = test_app();
    let (status, body) = get(&app, "/entries/6f1c2a7e-5d8b-4c3e-9a0f-1b2c3d4e5f60").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, _) = send_json(
        &app,
        Method::PUT,
        "/entries/6f1c2a7e-5d8b-4c3e-9a0f-1b2c3d4e5f60",
        json!({ "dream_title": "Lost" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_entry_id_is_a_bad_request() {
    let app = test_app();
    let (status, _) = get(&app, "/entries/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_changes_only_provided_fields() {
    let app = test_app();
    let id = create_entry(
        &app,
        json!({ "dream_title": "First", "themes": ["ocean"], "lucidity_level": 1 }),
    )
    .await;
    let (_, before) = get(&app, &format!("/entries/{id}")).await;

    let (status, body) = send_json(
        &app,
        Method::PUT,
        &format!("/entries/{id}"),
        json!({ "lucidity_level": 4 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entry"]["lucidity_level"], 4);
    assert_eq!(body["entry"]["dream_title"], "First");
    assert_eq!(body["entry"]["themes"], json!(["ocean"]));
    assert_ne!(body["entry"]["updated_at"], before["entry"]["updated_at"]);
}

#[tokio::test]
async fn update_with_null_keeps_stored_text() {
    let app = test_app();
    let id = create_entry(&app, json!({ "dream_title": "Keep me", "ai_prompt": "stars" })).await;

    let (status, body) = send_json(
        &app,
        Method::PUT,
        &format!("/entries/{id}"),
        json!({ "dream_title": null, "ai_prompt": "comets" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entry"]["dream_title"], "Keep me");
    assert_eq!(body["entry"]["ai_prompt"], "comets");
}

#[tokio::test]
async fn list_is_newest_first_and_filtered_by_user() {
    let app = test_app();
    for date in ["2024-01-05", "2024-01-20", "2024-01-10"] {
        create_entry(&app, json!({ "user_id": "sleeper", "entry_date": date })).await;
    }
    create_entry(&app, json!({ "user_id": "someone_else", "entry_date": "2024-01-15" })).await;

    let (status, body) = get(&app, "/entries?user_id=sleeper&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    let dates: Vec<&str> = body["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["entry_date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-01-20", "2024-01-10"]);

    let (_, body) = get(&app, "/entries?user_id=sleeper&start_date=2024-01-06&end_date=2024-01-10").await;
    assert_eq!(body["total"], 1);
}

//=========================================================================================
// Prompts
//=========================================================================================

#[tokio::test]
async fn generate_prompts_skips_explored_categories() {
    let app = test_app();
    let (status, body) = post_json(
        &app,
        "/prompts/generate",
        json!({
            "dream_text": "I was on a boat",
            "current_responses": [
                { "prompt_text": "How did you feel during the dream?" },
                { "prompt_text": "Who else was in your dream?" }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let prompts = body["prompts"].as_array().unwrap();
    assert_eq!(prompts.len(), 3);
    assert_eq!(body["suggested_order"], json!([0, 1, 2]));
    for prompt in prompts {
        let text = prompt.as_str().unwrap().to_lowercase();
        assert!(!text.contains("feel"), "emotions prompt repeated: {text}");
        assert!(!text.starts_with("who"), "characters prompt repeated: {text}");
    }
}

#[tokio::test]
async fn prompt_responses_attach_to_their_entry() {
    let app = test_app();
    let id = create_entry(&app, json!({ "dream_title": "Tide" })).await;

    for (order, text) in [(1, "Where did the dream take place?"), (0, "How did you feel?")] {
        let (status, body) = post_json(
            &app,
            "/prompts",
            json!({
                "dream_entry_id": id,
                "prompt_text": text,
                "response_transcription": "On a beach at night",
                "prompt_order": order
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["prompt"]["prompt_order"], order);
    }

    let (_, body) = get(&app, &format!("/entries/{id}")).await;
    let orders: Vec<i64> = body["entry"]["prompts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|prompt| prompt["prompt_order"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, vec![0, 1]);
}

#[tokio::test]
async fn prompt_response_requires_fields_and_existing_entry() {
    let app = test_app();
    let (status, _) = post_json(&app, "/prompts", json!({ "prompt_text": "Who was there?" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        &app,
        "/prompts",
        json!({
            "dream_entry_id": "6f1c2a7e-5d8b-4c3e-9a0f-1b2c3d4e5f60",
            "prompt_text": "Who was there?"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

//=========================================================================================
// Statistics
//=========================================================================================

#[tokio::test]
async fn statistics_summarise_the_journal() {
    let app = test_app();
    create_entry(
        &app,
        json!({
            "user_id": "stats",
            "entry_date": "2024-02-01",
            "themes": ["flying", "flying"],
            "lucidity_level": 2,
            "image_url": "https://images.test/a.png"
        }),
    )
    .await;
    create_entry(
        &app,
        json!({ "user_id": "stats", "entry_date": "2024-02-02", "themes": ["water"], "lucidity_level": 4 }),
    )
    .await;
    create_entry(
        &app,
        json!({ "user_id": "stats", "entry_date": "2024-02-03", "lucidity_level": 0 }),
    )
    .await;

    let (status, body) = get(&app, "/statistics/stats").await;
    assert_eq!(status, StatusCode::OK);
    let stats = &body["statistics"];
    assert_eq!(stats["total_dreams"], 3);
    assert_eq!(stats["average_lucidity"], 2.0);
    assert_eq!(stats["most_common_themes"], json!([["flying", 2], ["water", 1]]));
    assert_eq!(stats["dreams_with_images"], 1);
    assert_eq!(stats["date_range"], json!({ "start": "all_time", "end": "present" }));

    let (_, body) = get(&app, "/statistics/stats?start_date=2024-02-02").await;
    assert_eq!(body["statistics"]["total_dreams"], 2);
    assert_eq!(body["statistics"]["date_range"]["start"], "2024-02-02");
}

#[tokio::test]
async fn statistics_for_an_empty_journal_are_zero() {
    let app = test_app();
    let (status, body) = get(&app, "/statistics/nobody").await;
    assert_eq!(status, StatusCode::OK);
    let stats = &body["statistics"];
    assert_eq!(stats["total_dreams"], 0);
    assert_eq!(stats["average_lucidity"], 0.0);
    assert_eq!(stats["average_vividness"], 0.0);
    assert_eq!(stats["most_common_emotions"], json!([]));
}

//=========================================================================================
// Enhancement and Cards
//=========================================================================================

#[tokio::test]
async fn enhance_commits_what_succeeded() {
    let app = TestAppBuilder::new().failing_analysis().build();
    let id = create_entry(
        &app,
        json!({ "enhanced_description": "A lighthouse in the desert", "themes": ["light"] }),
    )
    .await;

    let (status, body) = post_json(
        &app,
        &format!("/entries/{id}/enhance"),
        json!({ "generate_image": true, "analyze_content": true, "art_style": "surreal" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let results = &body["results"];
    assert!(results["analysis_error"].is_string());
    assert_eq!(results["analysis"], Value::Null);
    assert_eq!(results["image"]["url"], "https://images.test/surreal.png");
    assert_eq!(results["entry"]["image_url"], "https://images.test/surreal.png");
    assert_eq!(results["entry"]["art_style"], "surreal");
    assert_eq!(results["entry"]["themes"], json!(["light"]));
}

#[tokio::test]
async fn enhance_stores_analysis_tags() {
    let app = TestAppBuilder::new().failing_images().build();
    let id = create_entry(&app, json!({ "enhanced_description": "I could fly over the city" })).await;

    let (status, body) = post_json(
        &app,
        &format!("/entries/{id}/enhance"),
        json!({ "generate_image": true, "analyze_content": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let results = &body["results"];
    assert!(results["image_error"].is_string());
    assert_eq!(results["entry"]["themes"], json!(["flying", "freedom"]));
    assert_eq!(results["entry"]["symbols"], json!(["feather"]));
    assert_eq!(results["entry"]["emotions"], json!(["wonder"]));
    assert_eq!(results["entry"]["image_url"], Value::Null);
}

#[tokio::test]
async fn card_is_built_and_stored() {
    let app = test_app();
    let id = create_entry(
        &app,
        json!({ "entry_date": "2024-04-01", "enhanced_description": "d".repeat(250), "art_style": "nightmare" }),
    )
    .await;

    let (status, body) = post_json(&app, &format!("/cards/{id}"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let card = &body["card_design"];
    assert_eq!(card["name"], "Dream from 2024-04-01");
    assert_eq!(card["type"], "Enchantment — Dream");
    assert_eq!(card["background_style"], "nightmare");
    assert_eq!(card["description"].as_str().unwrap().chars().count(), 203);

    let (_, body) = get(&app, &format!("/entries/{id}")).await;
    assert_eq!(body["entry"]["card_design"]["set_symbol"], "DW");
}

//=========================================================================================
// AI Endpoints
//=========================================================================================

#[tokio::test]
async fn analyze_dream_requires_text() {
    let app = test_app();
    let (status, _) = post_json(&app, "/ai/analyze-dream", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(&app, "/ai/analyze-dream", json!({ "dream_text": "I flew" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis"]["mood"], "wonder");
    assert_eq!(body["tokens_used"], 300);
}

#[tokio::test]
async fn generate_image_falls_back_to_defaults() {
    let app = test_app();
    let (status, body) = post_json(
        &app,
        "/ai/generate-image",
        json!({ "dream_text": "A staircase into clouds", "style": "pixel", "quality": "ultra" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["style"], "ethereal");
    assert_eq!(body["quality"], "standard");
    assert_eq!(body["cost_estimate"], 0.04);
    assert!(body["enhanced_prompt"]
        .as_str()
        .unwrap()
        .contains("A staircase into clouds"));
}

#[tokio::test]
async fn upstream_failures_are_internal_errors() {
    let app = TestAppBuilder::new().failing_analysis().build();
    let (status, body) = post_json(&app, "/ai/analyze-dream", json!({ "dream_text": "I fell" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn speech_to_text_reads_the_audio_part() {
    let app = test_app();
    let boundary = "dreamboundary";
    let payload = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"audio\"; filename=\"memo.m4a\"\r\nContent-Type: audio/mp4\r\n\r\n0123456789\r\n--{boundary}--\r\n"
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/ai/speech-to-text")
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(payload))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "I was walking through a forest of glass");
    assert_eq!(body["duration"], 10.0);
}

#[tokio::test]
async fn speech_to_text_rejects_unknown_formats() {
    let app = test_app();
    let boundary = "dreamboundary";
    let payload = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"audio\"; filename=\"memo.txt\"\r\n\r\nhello\r\n--{boundary}--\r\n"
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/ai/speech-to-text")
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(payload))
        .unwrap();

    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ai_calls_are_rate_limited_per_client() {
    let app = TestAppBuilder::new().rate_limit(1).build();
    let request = |client: &str| {
        Request::builder()
            .method(Method::POST)
            .uri("/ai/enhance-prompt")
            .header(CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", client)
            .body(Body::from(json!({ "dream_text": "A quiet train" }).to_string()))
            .unwrap()
    };

    let (status, _) = send(&app, request("198.51.100.4")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, request("198.51.100.4")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "Rate limit exceeded");
    let (status, _) = send(&app, request("198.51.100.5")).await;
    assert_eq!(status, StatusCode::OK);

    // Unmetered routes are unaffected.
    let (status, _) = get(&app, "/ai/styles").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn entry_enhancement_is_not_metered() {
    let app = TestAppBuilder::new().rate_limit(1).build();
    let id = create_entry(&app, json!({ "enhanced_description": "A bridge over clouds" })).await;

    for _ in 0..3 {
        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/entries/{id}/enhance"))
            .header(CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", "198.51.100.9")
            .body(Body::from(json!({ "analyze_content": true }).to_string()))
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn style_catalogue_lists_every_style() {
    let app = test_app();
    let (status, body) = get(&app, "/ai/styles").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["styles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|style| style["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids.first(), Some(&"ethereal"));
    assert!(ids.contains(&"vibrant"));
    assert_eq!(ids.len(), 7);
}

//=========================================================================================
// Health
//=========================================================================================

#[tokio::test]
async fn readiness_reflects_dependencies() {
    let (status, body) = get(&test_app(), "/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);

    let app = TestAppBuilder::new().database_offline().build();
    let (status, body) = get(&app, "/health/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["checks"]["database"], false);

    let app = TestAppBuilder::new().without_api_key().build();
    let (status, body) = get(&app, "/health/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["checks"]["openai"], false);
}

#[tokio::test]
async fn liveness_and_health() {
    let app = test_app();
    let (status, body) = get(&app, "/health/live").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["alive"], true);

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}
