mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{read_json, TestApp};
use jobboard::status::{ApplicationStatus, CampaignApplicationStatus};
use jobboard::store::{JobApplicationStore, JobCardStore};
use serde_json::{json, Value};

#[tokio::test]
async fn health_is_public_and_everything_else_needs_a_token() -> Result<()> {
    let app = TestApp::new()?;

    let response = app.get("/health", None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = read_json(response).await?;
    assert_eq!(body["status"], "ok");

    for path in ["/employees", "/employers", "/jobcards", "/jobcampaigns", "/users"] {
        let response = app.get(path, None).await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "GET {path}");
    }

    let response = app.get("/jobcards", Some("not-a-jwt")).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = read_json(response).await?;
    assert!(body["error"].is_string());

    let response = app
        .post_json("/jobcards", &json!({ "employer_id": 1, "location": "Pune" }), None)
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(app.store().list_job_cards(false)?.is_empty());

    Ok(())
}

#[tokio::test]
async fn job_card_lifecycle() -> Result<()> {
    let app = TestApp::new()?;
    let (employer_id, token) = app
        .register_verified_employer("Acme", "hr@acme.test", "pw")
        .await?;

    let response = app
        .post_json(
            "/jobcards",
            &json!({
                "employer_id": employer_id,
                "location": "Pune",
                "pincode": 411001,
                "job_type": ["mason", "helper"],
                "salary": "18000/month",
                "available_from": "2025-01-15",
                "vacancy": 3
            }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let card: Value = read_json(response).await?;
    let card_id = card["id"].as_i64().unwrap_or_default();
    assert_eq!(card["active"], true);
    assert_eq!(card["available_from"], "2025-01-15");
    assert_eq!(card["job_type"], json!(["mason", "helper"]));

    let response = app
        .post_json("/jobcards", &json!({ "location": "Pune" }), Some(&token))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .put_json(
            &format!("/jobcards/{card_id}/status"),
            &json!({ "active": "sometimes" }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .put_json(
            &format!("/jobcards/{card_id}/status"),
            &json!({ "active": false }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/jobcards/active", Some(&token)).await?;
    let active: Vec<Value> = read_json(response).await?;
    assert!(active.is_empty());
    let response = app.get("/jobcards", Some(&token)).await?;
    let all: Vec<Value> = read_json(response).await?;
    assert_eq!(all.len(), 1);

    let response = app
        .put_json(
            &format!("/jobcards/{card_id}"),
            &json!({ "salary": "20000/month", "location": "" }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let stored = app.store().get_job_card(card_id as i32)?;
    assert_eq!(stored.salary.as_deref(), Some("20000/month"));
    assert_eq!(stored.location, "Pune");
    assert!(!stored.active);
    assert_eq!(stored.vacancy, 3);

    let response = app
        .put_json("/jobcards/999/status", &json!({ "active": true }), Some(&token))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.delete(&format!("/jobcards/{card_id}"), Some(&token)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.get(&format!("/jobcards/{card_id}"), Some(&token)).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn job_application_flow_with_status_and_rating() -> Result<()> {
    let app = TestApp::new()?;
    let (employer_id, employer_token) = app
        .register_verified_employer("Acme", "hr@acme.test", "pw")
        .await?;
    let (employee_id, _) = app.register_employee("Meena", "98450", "1234").await?;

    let response = app
        .post_json(
            "/jobapplications",
            &json!({ "employer_id": 404, "employee_id": employee_id, "job_id": 1 }),
            Some(&employer_token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .post_json(
            "/jobapplications",
            &json!({ "employer_id": employer_id, "employee_id": employee_id, "job_id": 1 }),
            Some(&employer_token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = read_json(response).await?;
    let application_id = body["id"].as_i64().unwrap_or_default() as i32;

    let notified = app
        .mailer()
        .sent()
        .await
        .into_iter()
        .any(|mail| mail.to == "hr@acme.test" && mail.subject == "New Job Application");
    assert!(notified);

    let stored = app.store().get_job_application(application_id)?;
    assert_eq!(stored.status, ApplicationStatus::Accepted);

    let response = app
        .get(
            &format!("/jobapplications?userType=Employee&userId={employee_id}"),
            Some(&employer_token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let listed: Vec<Value> = read_json(response).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["status"], "accepted");

    let response = app
        .get(
            &format!("/jobapplications?userType=admin&userId={employer_id}"),
            Some(&employer_token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .put_json(
            &format!("/jobapplications/{application_id}/status"),
            &json!({ "status": "pending" }),
            Some(&employer_token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        app.store().get_job_application(application_id)?.status,
        ApplicationStatus::Accepted
    );

    let response = app
        .put_json(
            &format!("/jobapplications/{application_id}/status"),
            &json!({ "status": "rejected" }),
            Some(&employer_token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        app.store().get_job_application(application_id)?.status,
        ApplicationStatus::Rejected
    );

    let response = app
        .post_json(
            &format!("/jobapplications/{application_id}/rating"),
            &json!({ "rating": 6 }),
            Some(&employer_token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post_json(
            &format!("/jobapplications/{application_id}/rating"),
            &json!({ "rating": 4, "comment": "punctual" }),
            Some(&employer_token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let rating: Value = read_json(response).await?;
    assert_eq!(rating["employee_id"], employee_id);
    assert_eq!(rating["employer_id"], employer_id);

    let response = app
        .get(&format!("/employees/{employee_id}/ratings"), Some(&employer_token))
        .await?;
    let ratings: Vec<Value> = read_json(response).await?;
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0]["comment"], "punctual");

    let response = app
        .delete(
            &format!("/jobapplications/{application_id}"),
            Some(&employer_token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let response = app
        .get(
            &format!("/jobapplications/{application_id}"),
            Some(&employer_token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn campaigns_and_campaign_applications() -> Result<()> {
    let app = TestApp::new()?;
    let (employee_id, token) = app.register_employee("Meena", "98450", "1234").await?;

    let response = app
        .post_json(
            "/jobcampaigns",
            &json!({
                "title": "Harvest drive",
                "start_date": "2025-03-10",
                "end_date": "2025-03-01"
            }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post_json(
            "/jobcampaigns",
            &json!({
                "title": "Harvest drive",
                "location": "Nashik",
                "start_date": "2025-03-01",
                "end_date": "2099-03-31"
            }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let campaign: Value = read_json(response).await?;
    let campaign_id = campaign["id"].as_i64().unwrap_or_default();
    assert_eq!(campaign["active"], true);

    let response = app
        .put_json(
            &format!("/jobcampaigns/{campaign_id}"),
            &json!({ "start_date": "2100-01-01" }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post_json(
            "/campaignapplications",
            &json!({ "employee_id": employee_id, "job_campaign_id": campaign_id }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let application: Value = read_json(response).await?;
    assert_eq!(application["status"], "pending");
    let application_id = application["id"].as_i64().unwrap_or_default();

    let response = app
        .put_json(
            &format!("/campaignapplications/{application_id}/status"),
            &json!({ "status": "hired" }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .put_json(
            &format!("/campaignapplications/{application_id}/status"),
            &json!({ "status": "accepted" }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .get(
            &format!("/campaignapplications?campaign_id={campaign_id}"),
            Some(&token),
        )
        .await?;
    let listed: Vec<Value> = read_json(response).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(
        serde_json::from_value::<CampaignApplicationStatus>(listed[0]["status"].clone())?,
        CampaignApplicationStatus::Accepted
    );

    let response = app.get("/campaignapplications", Some(&token)).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .put_json(
            &format!("/jobcampaigns/{campaign_id}"),
            &json!({ "active": false }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.get("/jobcampaigns/active", Some(&token)).await?;
    let active: Vec<Value> = read_json(response).await?;
    assert!(active.is_empty());

    let response = app
        .delete(
            &format!("/campaignapplications/{application_id}"),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let response = app
        .delete(&format!("/jobcampaigns/{campaign_id}"), Some(&token))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let response = app
        .delete(&format!("/jobcampaigns/{campaign_id}"), Some(&token))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn users_require_unique_email() -> Result<()> {
    let app = TestApp::new()?;
    let (_, token) = app.register_employee("Meena", "98450", "1234").await?;

    let response = app
        .post_json(
            "/users",
            &json!({ "name": "Ops", "email": "ops@jobboard.test" }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .post_json(
            "/users",
            &json!({ "name": "Ops again", "email": "ops@jobboard.test" }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app.get("/users", Some(&token)).await?;
    let users: Vec<Value> = read_json(response).await?;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], "ops@jobboard.test");

    Ok(())
}
