use axum::http::Method;
use serde_json::json;

use super::test_utils::{mock_request, setup_test_app, EVENT_ID};

#[tokio::test]
async fn test_event_and_questions() {
    let (app, _storage) = setup_test_app().await;

    let (status, response) =
        mock_request(&app, &format!("/api/events/{EVENT_ID}"), Method::GET, None::<()>).await;
    assert_eq!(status.as_u16(), 200);
    assert_eq!(response["data"]["name"], "All hands");
    assert_eq!(response["data"]["currentQuestionId"], "q1");
    assert!(response["data"]["clearedQuestionId"].is_null());

    // sorted by order, not by file position
    let questions = response["data"]["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0]["id"], "q1");
    assert_eq!(questions[1]["id"], "q2");

    let (status, response) = mock_request(
        &app,
        &format!("/api/events/{EVENT_ID}/questions"),
        Method::GET,
        None::<()>,
    )
    .await;
    assert_eq!(status.as_u16(), 200);
    assert_eq!(response["data"][0]["options"][0]["label"], "Tabs");
    assert_eq!(response["data"][0]["options"][0]["color"], "#ff6b6b");
    assert!(response["data"][1]["options"][0].get("color").is_none());

    let (status, response) =
        mock_request(&app, "/api/events/missing", Method::GET, None::<()>).await;
    assert_eq!(status.as_u16(), 404);
    assert_eq!(response["message"], "Event Not Found");
}

#[tokio::test]
async fn test_set_current_question() {
    let (app, _storage) = setup_test_app().await;
    let uri = format!("/api/events/{EVENT_ID}/current-question");

    let (status, response) =
        mock_request(&app, &uri, Method::PUT, Some(json!({ "questionId": "q2" }))).await;
    assert_eq!(status.as_u16(), 200);
    assert_eq!(response["data"]["currentQuestionId"], "q2");

    let (_, response) =
        mock_request(&app, &format!("/api/events/{EVENT_ID}"), Method::GET, None::<()>).await;
    assert_eq!(response["data"]["currentQuestionId"], "q2");

    // a question of another event is rejected
    let (status, _) =
        mock_request(&app, &uri, Method::PUT, Some(json!({ "questionId": "q3" }))).await;
    assert_eq!(status.as_u16(), 404);

    let (status, _) =
        mock_request(&app, &uri, Method::PUT, Some(json!({ "questionId": "nope" }))).await;
    assert_eq!(status.as_u16(), 404);

    let (status, response) =
        mock_request(&app, &uri, Method::PUT, Some(json!({ "questionId": null }))).await;
    assert_eq!(status.as_u16(), 200);
    assert!(response["data"]["currentQuestionId"].is_null());
}

#[tokio::test]
async fn test_vote_create_then_update() {
    let (app, _storage) = setup_test_app().await;

    let vote = json!({ "questionId": "q1", "optionId": "opt1", "deviceId": "device-a" });
    let (status, response) = mock_request(&app, "/api/votes", Method::POST, Some(vote)).await;
    assert_eq!(status.as_u16(), 201);
    assert_eq!(response["data"]["optionId"], "opt1");
    assert!(response["data"].get("updated").is_none());
    let vote_id = response["data"]["id"].as_str().unwrap().to_string();

    let revote = json!({ "questionId": "q1", "optionId": "opt2", "deviceId": "device-a" });
    let (status, response) = mock_request(&app, "/api/votes", Method::POST, Some(revote)).await;
    assert_eq!(status.as_u16(), 200);
    assert_eq!(response["data"]["updated"], true);
    assert_eq!(response["data"]["id"], vote_id.as_str());
    assert_eq!(response["data"]["optionId"], "opt2");

    let other = json!({ "questionId": "q1", "optionId": "opt1", "deviceId": "device-b" });
    let (status, _) = mock_request(&app, "/api/votes", Method::POST, Some(other)).await;
    assert_eq!(status.as_u16(), 201);

    let (status, response) =
        mock_request(&app, "/api/questions/q1/votes", Method::GET, None::<()>).await;
    assert_eq!(status.as_u16(), 200);
    let votes = response["data"].as_array().unwrap();
    assert_eq!(votes.len(), 2);
    let device_a: Vec<_> = votes
        .iter()
        .filter(|vote| vote["deviceId"] == "device-a")
        .collect();
    assert_eq!(device_a.len(), 1);
    assert_eq!(device_a[0]["optionId"], "opt2");
}

#[tokio::test]
async fn test_vote_validation() {
    let (app, _storage) = setup_test_app().await;

    let missing_option = json!({ "questionId": "q1", "deviceId": "device-a" });
    let (status, response) =
        mock_request(&app, "/api/votes", Method::POST, Some(missing_option)).await;
    assert_eq!(status.as_u16(), 400);
    assert_eq!(response["error"], "Vote error: Missing required field: optionId");

    let blank_device = json!({ "questionId": "q1", "optionId": "opt1", "deviceId": "  " });
    let (status, _) = mock_request(&app, "/api/votes", Method::POST, Some(blank_device)).await;
    assert_eq!(status.as_u16(), 400);

    let wrong_option = json!({ "questionId": "q1", "optionId": "yes", "deviceId": "device-a" });
    let (status, response) =
        mock_request(&app, "/api/votes", Method::POST, Some(wrong_option)).await;
    assert_eq!(status.as_u16(), 400);
    assert_eq!(response["message"], "Invalid Vote Option");

    let unknown_question = json!({ "questionId": "q9", "optionId": "opt1", "deviceId": "d" });
    let (status, _) =
        mock_request(&app, "/api/votes", Method::POST, Some(unknown_question)).await;
    assert_eq!(status.as_u16(), 404);

    let (_, response) =
        mock_request(&app, "/api/questions/q1/votes", Method::GET, None::<()>).await;
    assert!(response["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_clear_votes_arms_notification() {
    let (app, _storage) = setup_test_app().await;

    for device in ["d1", "d2", "d3"] {
        let vote = json!({ "questionId": "q1", "optionId": "opt1", "deviceId": device });
        mock_request(&app, "/api/votes", Method::POST, Some(vote)).await;
    }
    let vote = json!({ "questionId": "q2", "optionId": "yes", "deviceId": "d1" });
    mock_request(&app, "/api/votes", Method::POST, Some(vote)).await;

    let (status, response) =
        mock_request(&app, "/api/questions/q1/votes", Method::DELETE, None::<()>).await;
    assert_eq!(status.as_u16(), 200);
    assert_eq!(response["data"]["deleted"], 3);

    let (_, response) =
        mock_request(&app, "/api/questions/q1/votes", Method::GET, None::<()>).await;
    assert!(response["data"].as_array().unwrap().is_empty());
    let (_, response) =
        mock_request(&app, "/api/questions/q2/votes", Method::GET, None::<()>).await;
    assert_eq!(response["data"].as_array().unwrap().len(), 1);

    let cleared_uri = format!("/api/events/{EVENT_ID}/cleared");
    let (status, response) = mock_request(&app, &cleared_uri, Method::GET, None::<()>).await;
    assert_eq!(status.as_u16(), 200);
    assert_eq!(response["data"]["clearedQuestionId"], "q1");

    let (status, _) = mock_request(
        &app,
        &format!("/api/events/{EVENT_ID}/clear-notification"),
        Method::POST,
        None::<()>,
    )
    .await;
    assert_eq!(status.as_u16(), 200);

    let (_, response) = mock_request(&app, &cleared_uri, Method::GET, None::<()>).await;
    assert!(response["data"]["clearedQuestionId"].is_null());

    let (status, _) =
        mock_request(&app, "/api/questions/q9/votes", Method::DELETE, None::<()>).await;
    assert_eq!(status.as_u16(), 404);
}

#[tokio::test]
async fn test_device_votes() {
    let (app, _storage) = setup_test_app().await;

    let first = json!({ "questionId": "q1", "optionId": "opt2", "deviceId": "phone" });
    let second = json!({ "questionId": "q2", "optionId": "no", "deviceId": "phone" });
    let stranger = json!({ "questionId": "q1", "optionId": "opt1", "deviceId": "laptop" });
    for vote in [first, second, stranger] {
        mock_request(&app, "/api/votes", Method::POST, Some(vote)).await;
    }

    let (status, response) =
        mock_request(&app, "/api/devices/phone/votes", Method::GET, None::<()>).await;
    assert_eq!(status.as_u16(), 200);
    assert_eq!(
        response["data"],
        json!([
            { "questionId": "q1", "optionId": "opt2" },
            { "questionId": "q2", "optionId": "no" }
        ])
    );

    let (_, response) =
        mock_request(&app, "/api/devices/unknown/votes", Method::GET, None::<()>).await;
    assert_eq!(response["data"], json!([]));
}

#[tokio::test]
async fn test_votes_survive_restart() {
    let dir = super::test_utils::seed_data_dir().await;
    {
        let storage = crate::config::storage::init_storage(&dir).await.unwrap();
        crate::repositories::vote_repository::VoteRepository::new(storage)
            .cast_vote("q1", "opt1", "device-a")
            .await
            .unwrap();
    }

    let storage = crate::config::storage::init_storage(&dir).await.unwrap();
    let votes = crate::repositories::vote_repository::VoteRepository::new(storage)
        .votes_for_question("q1")
        .await
        .unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].device_id, "device-a");
}

#[tokio::test]
async fn test_votes_of_unknown_question() {
    let (app, _storage) = setup_test_app().await;

    let (status, response) =
        mock_request(&app, "/api/questions/q9/votes", Method::GET, None::<()>).await;
    assert_eq!(status.as_u16(), 404);
    assert_eq!(response["message"], "Question Not Found");
}

#[tokio::test]
async fn test_clear_with_missing_event_keeps_votes() {
    let (app, storage) = setup_test_app().await;

    storage
        .questions
        .update(|questions| {
            questions.push(crate::models::question::Question {
                id: "orphan".into(),
                event_id: "gone".into(),
                title: "Left behind?".into(),
                options: vec![crate::models::question::VoteOption {
                    id: "yes".into(),
                    label: "Yes".into(),
                    color: None,
                }],
                order: 1,
            })
        })
        .await
        .unwrap();

    let vote = json!({ "questionId": "orphan", "optionId": "yes", "deviceId": "d1" });
    let (status, _) = mock_request(&app, "/api/votes", Method::POST, Some(vote)).await;
    assert_eq!(status.as_u16(), 201);

    let (status, response) =
        mock_request(&app, "/api/questions/orphan/votes", Method::DELETE, None::<()>).await;
    assert_eq!(status.as_u16(), 404);
    assert_eq!(response["message"], "Event Not Found");

    let (_, response) =
        mock_request(&app, "/api/questions/orphan/votes", Method::GET, None::<()>).await;
    assert_eq!(response["data"].as_array().unwrap().len(), 1);
}
