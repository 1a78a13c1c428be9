mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn create_user(client: &reqwest::Client, base: &str, email: &str) -> Result<String> {
    let res = client
        .post(format!("{}/api/users", base))
        .json(&json!({ "email": email, "first_name": "Test", "last_name": "User" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    Ok(res.json::<Value>().await?["id"].as_str().unwrap().to_string())
}

async fn create_ticket(client: &reqwest::Client, base: &str, title: &str) -> Result<String> {
    let res = client
        .post(format!("{}/api/tickets", base))
        .json(&json!({ "title": title }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    Ok(res.json::<Value>().await?["id"].as_str().unwrap().to_string())
}

#[tokio::test]
async fn assigned_users_appear_on_the_next_ticket_read() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    let ticket_id = create_ticket(&client, base, "fix login flow").await?;
    let u1 = create_user(&client, base, "assignee-one@x.com").await?;
    let u2 = create_user(&client, base, "assignee-two@x.com").await?;

    for user_id in [&u1, &u2] {
        let res = client
            .post(format!("{}/api/tickets/{}/assignees", base, ticket_id))
            .json(&json!({ "user_id": user_id }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
        let row = res.json::<Value>().await?;
        assert_eq!(row["ticket_id"].as_str().unwrap(), ticket_id);
        assert_eq!(row["user_id"].as_str().unwrap(), user_id.as_str());
    }

    let ticket = client
        .get(format!("{}/api/tickets/{}", base, ticket_id))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let assignees = ticket["assignees"].as_array().unwrap();
    assert_eq!(assignees.len(), 2);
    let emails: Vec<&str> =
        assignees.iter().map(|a| a["email"].as_str().unwrap()).collect();
    assert!(emails.contains(&"assignee-one@x.com"));
    assert!(emails.contains(&"assignee-two@x.com"));

    // summaries carry exactly id + name fields + email
    assert!(assignees[0]["first_name"].is_string());
    assert!(assignees[0].get("created_at").is_none());
    Ok(())
}

#[tokio::test]
async fn assigning_with_a_blank_user_id_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let ticket_id = create_ticket(&client, &server.base_url, "unassigned").await?;
    let res = client
        .post(format!("{}/api/tickets/{}/assignees", server.base_url, ticket_id))
        .json(&json!({ "user_id": "" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<Value>().await?;
    assert_eq!(body["details"][0]["field"], "user_id");
    Ok(())
}

#[tokio::test]
async fn duplicate_assignment_surfaces_the_store_failure() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    let ticket_id = create_ticket(&client, base, "dup").await?;
    let user_id = create_user(&client, base, "dup@x.com").await?;

    let url = format!("{}/api/tickets/{}/assignees", base, ticket_id);
    let first = client.post(&url).json(&json!({ "user_id": user_id })).send().await?;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = client.post(&url).json(&json!({ "user_id": user_id })).send().await?;
    assert_eq!(second.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(second.json::<Value>().await?["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn assignment_rows_have_their_own_crud_surface() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    let ticket_id = create_ticket(&client, base, "crud").await?;
    let u1 = create_user(&client, base, "crud-one@x.com").await?;
    let u2 = create_user(&client, base, "crud-two@x.com").await?;

    let created = client
        .post(format!("{}/api/ticket_assignees", base))
        .json(&json!({ "ticket_id": ticket_id, "user_id": u1 }))
        .send()
        .await?;
    assert_eq!(created.status(), StatusCode::CREATED);
    let row = created.json::<Value>().await?;
    let id = row["id"].as_str().unwrap();
    assert_eq!(row["createdAt"], row["updatedAt"]);

    let patched = client
        .patch(format!("{}/api/ticket_assignees/{}", base, id))
        .json(&json!({ "user_id": u2 }))
        .send()
        .await?;
    assert_eq!(patched.status(), StatusCode::OK);
    assert_eq!(patched.json::<Value>().await?["user_id"].as_str().unwrap(), u2);

    let deleted = client
        .delete(format!("{}/api/ticket_assignees/{}", base, id))
        .send()
        .await?;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let again = client
        .delete(format!("{}/api/ticket_assignees/{}", base, id))
        .send()
        .await?;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn ticket_description_defaults_to_empty() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/tickets", server.base_url))
        .json(&json!({ "title": "bare" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = res.json::<Value>().await?;
    assert_eq!(body["description"], "");
    assert_eq!(body["assignees"], json!([]));
    Ok(())
}
