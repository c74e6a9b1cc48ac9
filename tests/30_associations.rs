mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

fn association_body(n: usize) -> Value {
    json!({
        "name": format!("Espoir Club {:02}", n),
        "description": "Peer support group for first-year students",
        "contact_email": format!("espoir{}@clubs.tn", n),
        "support_type": "educational"
    })
}

async fn create_association(
    server: &common::TestServer,
    token: &str,
    n: usize,
) -> Result<Value> {
    let res = common::client()
        .post(format!("{}/api/associations", server.base_url))
        .bearer_auth(token)
        .json(&association_body(n))
        .send()
        .await?;
    anyhow::ensure!(res.status() == 201, "create failed: {}", res.text().await?);
    Ok(res.json::<Value>().await?["data"].clone())
}

#[tokio::test]
async fn only_association_members_can_create() -> Result<()> {
    let server = common::spawn_server().await?;
    let (student_token, _) = common::student_session(&server, "amira.bs@esprit.tn").await?;

    let res = common::client()
        .post(format!("{}/api/associations", server.base_url))
        .bearer_auth(&student_token)
        .json(&association_body(1))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn create_starts_unapproved_and_round_trips() -> Result<()> {
    let server = common::spawn_server().await?;
    let (token, member_id) = common::member_session(&server, "club.lead@esprit.tn").await?;

    let created = create_association(&server, &token, 1).await?;
    assert_eq!(created["approved"], false);
    assert_eq!(created["owner_id"].as_str().unwrap(), member_id);

    let res = common::client()
        .get(format!("{}/api/associations/{}", server.base_url, created["id"].as_str().unwrap()))
        .bearer_auth(&token)
        .send()
        .await?;
    let fetched = res.json::<Value>().await?["data"].clone();
    assert_eq!(fetched["name"], created["name"]);
    assert_eq!(fetched["contact_email"], created["contact_email"]);
    assert_eq!(fetched["support_type"], "educational");
    Ok(())
}

#[tokio::test]
async fn validation_names_the_short_name_and_bad_email() -> Result<()> {
    let server = common::spawn_server().await?;
    let (token, _) = common::member_session(&server, "club.lead@esprit.tn").await?;

    let res = common::client()
        .post(format!("{}/api/associations", server.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Club",
            "description": "too short",
            "contact_email": "not-an-email"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let errors = res.json::<Value>().await?["errors"].as_array().unwrap().clone();
    let text = errors.iter().map(|e| e.as_str().unwrap()).collect::<Vec<_>>().join("; ");
    assert!(text.contains("name"));
    assert!(text.contains("description"));
    assert!(text.contains("contact_email"));
    Ok(())
}

#[tokio::test]
async fn page_two_of_ten_by_eight_has_two_records() -> Result<()> {
    let server = common::spawn_server().await?;
    let (token, _) = common::member_session(&server, "club.lead@esprit.tn").await?;

    for n in 0..10 {
        create_association(&server, &token, n).await?;
    }

    let res = common::client()
        .get(format!("{}/api/associations?page=2&limit=8", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["total_count"], 10);
    Ok(())
}

#[tokio::test]
async fn non_owner_delete_is_forbidden_and_changes_nothing() -> Result<()> {
    let server = common::spawn_server().await?;
    let (owner_token, _) = common::member_session(&server, "club.lead@esprit.tn").await?;
    let (stranger_token, _) = common::student_session(&server, "amira.bs@esprit.tn").await?;

    let created = create_association(&server, &owner_token, 1).await?;
    let id = created["id"].as_str().unwrap();

    let res = common::client()
        .delete(format!("{}/api/associations/{}", server.base_url, id))
        .bearer_auth(&stranger_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Still retrievable
    let res = common::client()
        .get(format!("{}/api/associations/{}", server.base_url, id))
        .bearer_auth(&stranger_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn approval_is_admin_only_idempotent_and_notifies_once() -> Result<()> {
    let server = common::spawn_server().await?;
    let (owner_token, _) = common::member_session(&server, "club.lead@esprit.tn").await?;
    let (admin_token, _) = common::admin_session(&server, "root@esprit.tn").await?;

    let created = create_association(&server, &owner_token, 1).await?;
    let id = created["id"].as_str().unwrap();
    let approval_url = format!("{}/api/associations/{}/approval", server.base_url, id);

    // The owner cannot approve their own association
    let res = common::client()
        .put(&approval_url)
        .bearer_auth(&owner_token)
        .json(&json!({ "approved": true }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Admin approves; repeating the call leaves the state approved
    for _ in 0..2 {
        let res = common::client()
            .put(&approval_url)
            .bearer_auth(&admin_token)
            .json(&json!({ "approved": true }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.json::<Value>().await?["data"]["approved"], true);
    }

    // Only the actual transition produced a notification
    let res = common::client()
        .get(format!("{}/api/notifications", server.base_url))
        .bearer_auth(&owner_token)
        .send()
        .await?;
    let notifications = res.json::<Value>().await?["data"].as_array().unwrap().clone();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0]["message"].as_str().unwrap().contains("approved"));
    assert_eq!(notifications[0]["kind"], "association_approval");
    Ok(())
}

#[tokio::test]
async fn approved_filter_drives_the_public_listing() -> Result<()> {
    let server = common::spawn_server().await?;
    let (owner_token, _) = common::member_session(&server, "club.lead@esprit.tn").await?;
    let (admin_token, _) = common::admin_session(&server, "root@esprit.tn").await?;

    let a = create_association(&server, &owner_token, 1).await?;
    create_association(&server, &owner_token, 2).await?;

    common::client()
        .put(format!(
            "{}/api/associations/{}/approval",
            server.base_url,
            a["id"].as_str().unwrap()
        ))
        .bearer_auth(&admin_token)
        .json(&json!({ "approved": true }))
        .send()
        .await?;

    let res = common::client()
        .get(format!("{}/api/associations?approved=true", server.base_url))
        .bearer_auth(&owner_token)
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["data"][0]["id"], a["id"]);

    // Flipping back to pending hides it again
    common::client()
        .put(format!(
            "{}/api/associations/{}/approval",
            server.base_url,
            a["id"].as_str().unwrap()
        ))
        .bearer_auth(&admin_token)
        .json(&json!({ "approved": false }))
        .send()
        .await?;

    let res = common::client()
        .get(format!("{}/api/associations?approved=true", server.base_url))
        .bearer_auth(&owner_token)
        .send()
        .await?;
    assert_eq!(res.json::<Value>().await?["total_count"], 0);
    Ok(())
}

#[tokio::test]
async fn update_revalidates_the_merged_record() -> Result<()> {
    let server = common::spawn_server().await?;
    let (token, _) = common::member_session(&server, "club.lead@esprit.tn").await?;
    let created = create_association(&server, &token, 1).await?;
    let id = created["id"].as_str().unwrap();

    let res = common::client()
        .put(format!("{}/api/associations/{}", server.base_url, id))
        .bearer_auth(&token)
        .json(&json!({ "name": "x" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = common::client()
        .put(format!("{}/api/associations/{}", server.base_url, id))
        .bearer_auth(&token)
        .json(&json!({ "name": "Espoir Renewed", "support_type": "material" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<Value>().await?["data"].clone();
    assert_eq!(updated["name"], "Espoir Renewed");
    assert_eq!(updated["support_type"], "material");
    // Approval state never moves through plain updates
    assert_eq!(updated["approved"], false);
    Ok(())
}
