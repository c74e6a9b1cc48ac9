mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

fn event_body() -> Value {
    json!({
        "title": "Wellness Week",
        "description": "A week of talks and workshops on stress management",
        "date": "2026-09-14T09:00:00Z",
        "location": "Main campus",
        "venue": "Amphitheater C",
        "starts_at_time": "14:30",
        "contact_email": "events@esprit.tn"
    })
}

#[tokio::test]
async fn event_crud_with_ownership() -> Result<()> {
    let server = common::spawn_server().await?;
    let (owner_token, owner_id) = common::student_session(&server, "owner@esprit.tn").await?;
    let (stranger_token, _) = common::student_session(&server, "stranger@esprit.tn").await?;

    let res = common::client()
        .post(format!("{}/api/events", server.base_url))
        .bearer_auth(&owner_token)
        .json(&event_body())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = res.json::<Value>().await?["data"].clone();
    assert_eq!(created["owner_id"].as_str().unwrap(), owner_id);
    let id = created["id"].as_str().unwrap().to_string();

    // Strangers may read but not mutate
    let res = common::client()
        .get(format!("{}/api/events/{}", server.base_url, id))
        .bearer_auth(&stranger_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = common::client()
        .put(format!("{}/api/events/{}", server.base_url, id))
        .bearer_auth(&stranger_token)
        .json(&json!({ "title": "Hijacked" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = common::client()
        .put(format!("{}/api/events/{}", server.base_url, id))
        .bearer_auth(&owner_token)
        .json(&json!({ "title": "Wellness Fortnight" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["data"]["title"], "Wellness Fortnight");

    let res = common::client()
        .delete(format!("{}/api/events/{}", server.base_url, id))
        .bearer_auth(&owner_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn event_time_and_length_rules_are_field_errors() -> Result<()> {
    let server = common::spawn_server().await?;
    let (token, _) = common::student_session(&server, "owner@esprit.tn").await?;

    let mut body = event_body();
    body["starts_at_time"] = json!("2pm");
    body["title"] = json!("ab");

    let res = common::client()
        .post(format!("{}/api/events", server.base_url))
        .bearer_auth(&token)
        .json(&body)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let errors = res.json::<Value>().await?["errors"].as_array().unwrap().clone();
    let text = errors.iter().map(|e| e.as_str().unwrap()).collect::<Vec<_>>().join("; ");
    assert!(text.contains("starts_at_time"));
    assert!(text.contains("title"));
    Ok(())
}

#[tokio::test]
async fn event_title_substring_filter_with_paging() -> Result<()> {
    let server = common::spawn_server().await?;
    let (token, _) = common::student_session(&server, "owner@esprit.tn").await?;

    for i in 0..3 {
        let mut body = event_body();
        body["title"] = json!(format!("Yoga session {}", i));
        let res = common::client()
            .post(format!("{}/api/events", server.base_url))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }
    let res = common::client()
        .post(format!("{}/api/events", server.base_url))
        .bearer_auth(&token)
        .json(&event_body())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = common::client()
        .get(format!("{}/api/events?title=yoga&page=1&limit=2", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["total_count"], 3);
    Ok(())
}

#[tokio::test]
async fn room_codes_are_unique() -> Result<()> {
    let server = common::spawn_server().await?;
    let (token, _) = common::student_session(&server, "owner@esprit.tn").await?;

    let res = common::client()
        .post(format!("{}/api/rooms", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "room_code": "calm-corner" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = common::client()
        .post(format!("{}/api/rooms", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "room_code": "calm-corner" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn room_key_exchange_updates_the_member_map() -> Result<()> {
    let server = common::spawn_server().await?;
    let (token, _) = common::student_session(&server, "owner@esprit.tn").await?;

    let res = common::client()
        .post(format!("{}/api/rooms", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "room_code": "calm-corner", "public_keys": { "m1": "pk-one" } }))
        .send()
        .await?;
    let created = res.json::<Value>().await?["data"].clone();

    let res = common::client()
        .put(format!("{}/api/rooms/{}", server.base_url, created["id"].as_str().unwrap()))
        .bearer_auth(&token)
        .json(&json!({ "public_keys": { "m1": "pk-one", "m2": "pk-two" } }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<Value>().await?["data"].clone();
    assert_eq!(updated["public_keys"]["m2"], "pk-two");
    assert_eq!(updated["room_code"], "calm-corner");
    Ok(())
}

#[tokio::test]
async fn questionnaire_answers_are_range_checked_and_private() -> Result<()> {
    let server = common::spawn_server().await?;
    let (alice_token, _) = common::student_session(&server, "alice@esprit.tn").await?;
    let (bob_token, _) = common::student_session(&server, "bob@esprit.tn").await?;

    let res = common::client()
        .post(format!("{}/api/questionnaires", server.base_url))
        .bearer_auth(&alice_token)
        .json(&json!({
            "room_code": "calm-corner",
            "responses": [
                { "question": "Sleep quality?", "answer": 2 },
                { "question": "Appetite?", "answer": 7 }
            ]
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let errors = res.json::<Value>().await?["errors"].as_array().unwrap().clone();
    assert!(errors.iter().any(|e| e.as_str().unwrap().contains("between 0 and 3")));

    let res = common::client()
        .post(format!("{}/api/questionnaires", server.base_url))
        .bearer_auth(&alice_token)
        .json(&json!({
            "room_code": "calm-corner",
            "responses": [
                { "question": "Sleep quality?", "answer": 2 },
                { "question": "Appetite?", "answer": 1 }
            ],
            "total_score": 3
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = res.json::<Value>().await?["data"].clone();

    // Bob neither lists nor reads Alice's submission
    let res = common::client()
        .get(format!("{}/api/questionnaires", server.base_url))
        .bearer_auth(&bob_token)
        .send()
        .await?;
    assert_eq!(res.json::<Value>().await?["total_count"], 0);

    let res = common::client()
        .get(format!(
            "{}/api/questionnaires/{}",
            server.base_url,
            created["id"].as_str().unwrap()
        ))
        .bearer_auth(&bob_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn solution_lifecycle_with_admin_verdict() -> Result<()> {
    let server = common::spawn_server().await?;
    let (token, _) = common::student_session(&server, "proposer@esprit.tn").await?;
    let (admin_token, _) = common::admin_session(&server, "root@esprit.tn").await?;

    let res = common::client()
        .post(format!("{}/api/solutions", server.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "problem_id": uuid::Uuid::new_v4(),
            "proposed_solution": "Schedule weekly peer-support sessions",
            "confidence_level": 0.8,
            "estimated_resolution_days": 14
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = res.json::<Value>().await?["data"].clone();
    assert_eq!(created["status"], "pending");
    let id = created["id"].as_str().unwrap().to_string();

    // Confidence outside [0, 1] is rejected on update
    let res = common::client()
        .put(format!("{}/api/solutions/{}", server.base_url, id))
        .bearer_auth(&token)
        .json(&json!({ "confidence_level": 1.5 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Proposer cannot self-accept; the admin can
    let res = common::client()
        .put(format!("{}/api/solutions/{}/status", server.base_url, id))
        .bearer_auth(&token)
        .json(&json!({ "status": "accepted" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = common::client()
        .put(format!("{}/api/solutions/{}/status", server.base_url, id))
        .bearer_auth(&admin_token)
        .json(&json!({ "status": "accepted" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["data"]["status"], "accepted");

    // Status filter sees it
    let res = common::client()
        .get(format!("{}/api/solutions?status=accepted", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.json::<Value>().await?["total_count"], 1);
    Ok(())
}

#[tokio::test]
async fn notification_mark_read_flows_over_http() -> Result<()> {
    let server = common::spawn_server().await?;
    let (owner_token, _) = common::student_session(&server, "alice@esprit.tn").await?;
    let (admin_token, _) = common::admin_session(&server, "root@esprit.tn").await?;

    // Two complaints, two admin verdicts, two notifications
    for subject in ["Cafeteria queue chaos", "Projector flickers in B12"] {
        let res = common::client()
            .post(format!("{}/api/complaints", server.base_url))
            .bearer_auth(&owner_token)
            .json(&json!({
                "subject": subject,
                "description": "Please have a look at this, it keeps happening"
            }))
            .send()
            .await?;
        let id = res.json::<Value>().await?["data"]["id"].as_str().unwrap().to_string();
        common::client()
            .put(format!("{}/api/complaints/{}/status", server.base_url, id))
            .bearer_auth(&admin_token)
            .json(&json!({ "status": "resolved" }))
            .send()
            .await?;
    }

    let res = common::client()
        .get(format!("{}/api/notifications", server.base_url))
        .bearer_auth(&owner_token)
        .send()
        .await?;
    let notifications = res.json::<Value>().await?["data"].as_array().unwrap().clone();
    assert_eq!(notifications.len(), 2);
    let first_id = notifications[0]["id"].as_str().unwrap().to_string();

    let res = common::client()
        .put(format!("{}/api/notifications/{}/read", server.base_url, first_id))
        .bearer_auth(&owner_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = common::client()
        .get(format!("{}/api/notifications?unread_only=true", server.base_url))
        .bearer_auth(&owner_token)
        .send()
        .await?;
    assert_eq!(res.json::<Value>().await?["data"].as_array().unwrap().len(), 1);

    let res = common::client()
        .put(format!("{}/api/notifications/read-all", server.base_url))
        .bearer_auth(&owner_token)
        .send()
        .await?;
    assert_eq!(res.json::<Value>().await?["data"]["marked"], 1);

    // Another user cannot mark someone else's notification
    let res = common::client()
        .put(format!("{}/api/notifications/{}/read", server.base_url, first_id))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
