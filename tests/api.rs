//! HTTP round-trip tests driving a spawned server with `reqwest`.

use bottega::api::{self, AppState};
use bottega::attachment::adapters::memory::InMemoryAttachmentRepository;
use bottega::auth::adapters::memory::InMemoryAuthRepository;
use bottega::project::adapters::memory::InMemoryProjectRepository;
use bottega::workflow::adapters::memory::InMemoryWorkflowRepository;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;

/// A running server plus a client pointed at it.
struct TestServer {
    base_url: String,
    client: reqwest::Client,
}

impl TestServer {
    /// Binds an ephemeral port and serves a fresh in-memory state.
    async fn spawn() -> Result<Self, eyre::Report> {
        let state = AppState::new(
            Arc::new(InMemoryAuthRepository::new()),
            Arc::new(InMemoryProjectRepository::new()),
            Arc::new(InMemoryWorkflowRepository::new()),
            Arc::new(InMemoryAttachmentRepository::new()),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            axum::serve(listener, api::router(state)).await.ok();
        });
        Ok(Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Registers an account and returns its id and a bearer token.
    async fn signup(&self, name: &str, email: &str) -> Result<(String, String), eyre::Report> {
        let registered: Value = self
            .client
            .post(self.url("/api/register"))
            .json(&json!({
                "full_name": name,
                "email": email,
                "password": "correct horse battery",
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let id = registered["id"]
            .as_str()
            .ok_or_else(|| eyre::eyre!("missing user id"))?
            .to_owned();

        let session: Value = self
            .client
            .post(self.url("/api/login"))
            .json(&json!({"email": email, "password": "correct horse battery"}))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let token = session["token"]
            .as_str()
            .ok_or_else(|| eyre::eyre!("missing token"))?
            .to_owned();
        Ok((id, token))
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn health_probe_is_open() -> Result<(), eyre::Report> {
    let server = TestServer::spawn().await?;

    let response = server.client.get(server.url("/api/health")).send().await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn protected_routes_require_a_bearer_token() -> Result<(), eyre::Report> {
    let server = TestServer::spawn().await?;

    let response = server.client.get(server.url("/api/me")).send().await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await?;
    assert_eq!(body["code"], "unauthorized");
    assert!(body["message"].is_string());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn me_returns_the_token_owner() -> Result<(), eyre::Report> {
    let server = TestServer::spawn().await?;
    let (id, token) = server.signup("Ada Organizer", "ada@example.com").await?;

    let body: Value = server
        .client
        .get(server.url("/api/me"))
        .bearer_auth(&token)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["full_name"], "Ada Organizer");
    assert!(body["code"].as_str().is_some_and(|code| code.starts_with("USR")));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_credentials_return_401() -> Result<(), eyre::Report> {
    let server = TestServer::spawn().await?;
    server.signup("Ada Organizer", "ada@example.com").await?;

    let response = server
        .client
        .post(server.url("/api/login"))
        .json(&json!({"email": "ada@example.com", "password": "nope"}))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn blank_project_names_return_422() -> Result<(), eyre::Report> {
    let server = TestServer::spawn().await?;
    let (_, token) = server.signup("Ada Organizer", "ada@example.com").await?;

    let response = server
        .client
        .post(server.url("/api/projects"))
        .bearer_auth(&token)
        .json(&json!({"name": "   "}))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await?;
    assert_eq!(body["code"], "validation_failed");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn full_pipeline_over_http() -> Result<(), eyre::Report> {
    let server = TestServer::spawn().await?;
    let (organizer_id, organizer) = server.signup("Ada Organizer", "ada@example.com").await?;
    let (executor_id, executor) = server.signup("Eli Executor", "eli@example.com").await?;
    let (qa_id, qa) = server.signup("Quinn Reviewer", "quinn@example.com").await?;

    // Project with a full roster; the creator is added as organizer
    // automatically.
    let project: Value = server
        .client
        .post(server.url("/api/projects"))
        .bearer_auth(&organizer)
        .json(&json!({
            "name": "Render farm overhaul",
            "members": [
                {"user_id": executor_id, "role": "executor"},
                {"user_id": qa_id, "role": "qa"},
            ],
        }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let project_id = project["id"].as_str().ok_or_else(|| eyre::eyre!("no id"))?;
    assert_eq!(project["members"].as_array().map(Vec::len), Some(3));

    // Task, assigned and started.
    let task: Value = server
        .client
        .post(server.url("/api/tasks"))
        .bearer_auth(&organizer)
        .json(&json!({
            "project_id": project_id,
            "title": "Shade pass",
            "executor_id": executor_id,
            "reviewer_id": qa_id,
        }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let task_id = task["id"].as_str().ok_or_else(|| eyre::eyre!("no id"))?;
    assert_eq!(task["status"], "created");
    assert_eq!(task["requester"]["id"], organizer_id.as_str());

    for (actor, status) in [(&organizer, "assigned"), (&executor, "in_progress")] {
        let moved: Value = server
            .client
            .patch(server.url(&format!("/api/tasks/{task_id}/status")))
            .bearer_auth(actor)
            .json(&json!({"status": status}))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        assert_eq!(moved["status"], status);
    }

    // QA may not take the executor's arrows.
    let forbidden = server
        .client
        .patch(server.url(&format!("/api/tasks/{task_id}/status")))
        .bearer_auth(&qa)
        .json(&json!({"status": "pending_qa"}))
        .send()
        .await?;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    // Delivery submission moves the task to pending_qa.
    let submission: Value = server
        .client
        .post(server.url("/api/deliveries"))
        .bearer_auth(&executor)
        .json(&json!({"task_id": task_id, "summary": "First full render"}))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let delivery_id = submission["delivery"]["id"]
        .as_str()
        .ok_or_else(|| eyre::eyre!("no delivery id"))?;
    assert_eq!(submission["delivery"]["version"], 1);
    assert_eq!(submission["task"]["status"], "pending_qa");

    // Verdict completes the task.
    let verdict: Value = server
        .client
        .post(server.url(&format!("/api/deliveries/{delivery_id}/review")))
        .bearer_auth(&qa)
        .json(&json!({"verdict": "approve"}))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    assert_eq!(verdict["review"]["verdict"], "approve");
    assert_eq!(verdict["task"]["status"], "completed");

    // A second verdict on the same delivery conflicts.
    let again = server
        .client
        .post(server.url(&format!("/api/deliveries/{delivery_id}/review")))
        .bearer_auth(&qa)
        .json(&json!({"verdict": "approve"}))
        .send()
        .await?;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    // The delivery listing shows the rendered review.
    let deliveries: Value = server
        .client
        .get(server.url(&format!("/api/tasks/{task_id}/deliveries")))
        .bearer_auth(&organizer)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let entries = deliveries.as_array().ok_or_else(|| eyre::eyre!("no list"))?;
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries.first().and_then(|e| e["review"]["reviewer"]["id"].as_str()),
        Some(qa_id.as_str())
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn attachments_over_http() -> Result<(), eyre::Report> {
    let server = TestServer::spawn().await?;
    let (_, organizer) = server.signup("Ada Organizer", "ada@example.com").await?;

    let project: Value = server
        .client
        .post(server.url("/api/projects"))
        .bearer_auth(&organizer)
        .json(&json!({"name": "Solo project"}))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let task: Value = server
        .client
        .post(server.url("/api/tasks"))
        .bearer_auth(&organizer)
        .json(&json!({"project_id": project["id"], "title": "Storyboard"}))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let task_id = task["id"].as_str().ok_or_else(|| eyre::eyre!("no id"))?;

    let created = server
        .client
        .post(server.url("/api/attachments"))
        .bearer_auth(&organizer)
        .json(&json!({
            "context": "request",
            "parent_id": task_id,
            "resource_type": "document",
            "url": "https://files.example.com/brief.pdf",
            "file_name": "brief.pdf",
        }))
        .send()
        .await?;
    assert_eq!(created.status(), StatusCode::CREATED);
    let attachment: Value = created.json().await?;
    assert_eq!(attachment["file_name"], "brief.pdf");

    let bundle: Value = server
        .client
        .get(server.url(&format!("/api/tasks/{task_id}/attachments")))
        .bearer_auth(&organizer)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    assert_eq!(bundle["request"].as_array().map(Vec::len), Some(1));
    assert_eq!(bundle["delivery"].as_array().map(Vec::len), Some(0));

    let attachment_id = attachment["id"]
        .as_str()
        .ok_or_else(|| eyre::eyre!("no id"))?;
    let removed = server
        .client
        .delete(server.url(&format!("/api/attachments/{attachment_id}")))
        .bearer_auth(&organizer)
        .send()
        .await?;
    assert_eq!(removed.status(), StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn hidden_projects_return_404() -> Result<(), eyre::Report> {
    let server = TestServer::spawn().await?;
    let (_, owner) = server.signup("Ada Organizer", "ada@example.com").await?;
    let (_, outsider) = server.signup("Olly Outsider", "olly@example.com").await?;

    let project: Value = server
        .client
        .post(server.url("/api/projects"))
        .bearer_auth(&owner)
        .json(&json!({"name": "Private project"}))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let project_id = project["id"].as_str().ok_or_else(|| eyre::eyre!("no id"))?;

    let response = server
        .client
        .get(server.url(&format!("/api/projects/{project_id}")))
        .bearer_auth(&outsider)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await?;
    assert_eq!(body["code"], "not_found");
    Ok(())
}
