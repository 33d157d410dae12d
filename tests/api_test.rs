use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use chrono::Duration;
use serde_json::{Value, json};
use tower::ServiceExt;

use dept_portal::api::router;
use dept_portal::config::Config;
use dept_portal::db::{auth, memory_pool};
use dept_portal::import::template_csv;
use dept_portal::state::AppState;

struct TestApp {
    app: Router,
    state: AppState,
}

impl TestApp {
    async fn new() -> Self {
        let pool = memory_pool().await.expect("Failed to create test db");
        let state = AppState::new(pool, Config::default());
        Self {
            app: router(state.clone()),
            state,
        }
    }

    async fn token_for(&self, email: &str, role: &str) -> String {
        let profile = auth::insert_profile(&self.state.db, email, None, role)
            .await
            .expect("Failed to insert profile");
        auth::create_session(&self.state.db, &profile.id, Duration::hours(1))
            .await
            .expect("Failed to create session")
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body.to_vec())
    }

    async fn json(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let (status, _, bytes) = self.send(request).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let (status, _, _) = app.send(get("/health")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_without_session_redirects_to_login() {
    let app = TestApp::new().await;

    let (status, headers, _) = app.send(get("/admin/subjects")).await;

    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        headers.get(header::LOCATION).unwrap(),
        "/auth/login?redirectTo=%2Fadmin%2Fsubjects"
    );
}

#[tokio::test]
async fn test_admin_with_unknown_token_redirects_to_login() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .uri("/admin")
        .header(header::COOKIE, "session=not-a-real-token")
        .body(Body::empty())
        .unwrap();

    let (status, headers, _) = app.send(request).await;

    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/auth/login?redirectTo=%2Fadmin");
}

#[tokio::test]
async fn test_non_admin_is_sent_to_unauthorized() {
    let app = TestApp::new().await;
    let token = app.token_for("student@college.edu", "user").await;
    let request = Request::builder()
        .uri("/admin/faculty")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let (status, headers, _) = app.send(request).await;

    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/unauthorized");
}

#[tokio::test]
async fn test_admin_dashboard() {
    let app = TestApp::new().await;
    let token = app.token_for("hod@college.edu", "admin").await;

    let (status, body) = app.json(Method::GET, "/admin", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "hod@college.edu");
    assert_eq!(body["counts"]["subjects"], 0);
    assert_eq!(body["recent_feedback"], json!([]));
}

#[tokio::test]
async fn test_session_cookie_grants_access() {
    let app = TestApp::new().await;
    let token = app.token_for("hod@college.edu", "admin").await;
    let request = Request::builder()
        .uri("/admin/subjects")
        .header(header::COOKIE, format!("theme=dark; session={}", token))
        .body(Body::empty())
        .unwrap();

    let (status, _, _) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_subject_is_listed_under_its_semester() {
    let app = TestApp::new().await;
    let token = app.token_for("hod@college.edu", "admin").await;

    let (status, subject) = app
        .json(
            Method::POST,
            "/admin/subjects",
            Some(&token),
            Some(json!({ "name": "Operating Systems", "code": "CS401", "semester": 4 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(subject["old_new"], "regular");

    let (status, page) = app.json(Method::GET, "/course-materials/semester-4", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["semester"]["display_name"], "Semester 4");
    assert_eq!(page["subjects"][0]["code"], "CS401");

    let (status, _) = app.json(Method::GET, "/course-materials/semester-4-old", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_semester_slug_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app.json(Method::GET, "/course-materials/sem-1", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not Found");

    let (status, _) = app
        .json(Method::GET, "/course-materials/semester-1-old/missing", None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bulk_subjects_filter_invalid_rows() {
    let app = TestApp::new().await;
    let token = app.token_for("hod@college.edu", "admin").await;

    let (status, created) = app
        .json(
            Method::POST,
            "/admin/subjects/bulk",
            Some(&token),
            Some(json!([
                { "name": "Physics", "code": "PH101", "semester_slug": "semester-1-new" },
                { "name": "  ", "code": "XX", "semester_slug": "semester-1-new" },
                { "name": "Chemistry", "code": "CH101", "semester_slug": "semester-one" },
            ])),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.as_array().unwrap().len(), 1);
    assert_eq!(created[0]["old_new"], "new");

    let (status, _) = app
        .json(
            Method::POST,
            "/admin/subjects/bulk",
            Some(&token),
            Some(json!([{ "name": "", "semester_slug": "semester-2" }])),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_feedback_submission() {
    let app = TestApp::new().await;

    let (status, _) = app
        .json(
            Method::POST,
            "/feedback",
            None,
            Some(json!({ "name": "Asha", "email": "not-an-email", "message": "Hi" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .json(
            Method::POST,
            "/feedback",
            None,
            Some(json!({ "name": "Asha", "email": "asha@college.edu", "message": "More lab slots please" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Asha");

    let token = app.token_for("hod@college.edu", "admin").await;
    let (_, dashboard) = app.json(Method::GET, "/admin", Some(&token), None).await;
    assert_eq!(dashboard["recent_feedback"][0]["message"], "More lab slots please");
}

#[tokio::test]
async fn test_newsletter_round_trip() {
    let app = TestApp::new().await;
    let token = app.token_for("hod@college.edu", "admin").await;

    let (status, created) = app
        .json(
            Method::POST,
            "/admin/newsletters",
            Some(&token),
            Some(json!({ "title": "Spring Issue", "file_url": "http://files/spring.pdf" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, newsletters) = app.json(Method::GET, "/newsletters", None, None).await;
    assert_eq!(newsletters[0]["title"], "Spring Issue");

    // notices live in their own table
    let (_, notices) = app.json(Method::GET, "/student-corner", None, None).await;
    assert_eq!(notices, json!([]));

    let uri = format!("/admin/newsletters/{}", created["id"].as_str().unwrap());
    let (status, _) = app.json(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.json(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_event_records_creator() {
    let app = TestApp::new().await;
    let token = app.token_for("hod@college.edu", "admin").await;

    let (status, _) = app
        .json(
            Method::POST,
            "/admin/events",
            Some(&token),
            Some(json!({ "title": "Tech Fest", "date": "15/03/2026" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, event) = app
        .json(
            Method::POST,
            "/admin/events",
            Some(&token),
            Some(json!({ "title": "Tech Fest", "date": "2026-03-15", "images": ["http://img/1.png"] })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(event["created_by"].is_string());
    assert_eq!(event["images"], json!(["http://img/1.png"]));
}

#[tokio::test]
async fn test_import_template_download() {
    let app = TestApp::new().await;
    let token = app.token_for("hod@college.edu", "admin").await;
    let request = Request::builder()
        .uri("/admin/import/template")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let (status, headers, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "text/csv");
    assert_eq!(
        headers.get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"subject_template.csv\""
    );
    assert_eq!(String::from_utf8(body).unwrap(), template_csv());
}

#[tokio::test]
async fn test_import_preview_then_commit() {
    let app = TestApp::new().await;
    let token = app.token_for("hod@college.edu", "admin").await;

    let sheet = "Subject,,,Material,,\n\
        Semester,Sub_Code,Subject_Name,Category,URL\n\
        5,CS501,Compilers,Syllabus,http://syllabus\n\
        ,,,Lab,http://lab\n\
        ,,,Previous year papers,http://papers\n";
    let request = Request::builder()
        .method(Method::POST)
        .uri("/admin/import/preview")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "text/csv")
        .body(Body::from(sheet))
        .unwrap();
    let (status, _, bytes) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);

    let preview: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(preview["log"], json!(["Processing CSV…", "Detected 1 subjects."]));
    assert_eq!(preview["skipped_rows"], 0);
    assert_eq!(preview["subjects"][0]["resources"][1]["category"], "Lab Manual");

    let (status, report) = app
        .json(
            Method::POST,
            "/admin/import",
            Some(&token),
            Some(json!({ "subjects": preview["subjects"] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["subjects_inserted"], 1);
    assert_eq!(report["resources_inserted"], 3);
    assert_eq!(report["log"].as_array().unwrap().last().unwrap(), "Upload complete.");

    let (_, page) = app.json(Method::GET, "/course-materials/semester-5", None, None).await;
    let subject_id = page["subjects"][0]["id"].as_str().unwrap().to_string();

    let (status, subject_page) = app
        .json(Method::GET, &format!("/course-materials/semester-5/{}", subject_id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(subject_page["sections"][0]["heading"], "Curriculum");
}

#[tokio::test]
async fn test_unknown_admin_paths_are_gated() {
    let app = TestApp::new().await;

    for (uri, target) in [
        ("/admin/nothing-here", "/auth/login?redirectTo=%2Fadmin%2Fnothing-here"),
        ("/admin/", "/auth/login?redirectTo=%2Fadmin%2F"),
        ("/admin/subjects/x/y/z", "/auth/login?redirectTo=%2Fadmin%2Fsubjects%2Fx%2Fy%2Fz"),
    ] {
        let (status, headers, _) = app.send(get(uri)).await;
        assert_eq!(status, StatusCode::TEMPORARY_REDIRECT, "{}", uri);
        assert_eq!(headers.get(header::LOCATION).unwrap(), target);
    }

    // past the gate an unknown path is a plain 404
    let token = app.token_for("hod@college.edu", "admin").await;
    let (status, _) = app.json(Method::GET, "/admin/nothing-here", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_public_unknown_path_is_not_gated() {
    let app = TestApp::new().await;
    let (status, headers, _) = app.send(get("/administrator")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(headers.get(header::LOCATION).is_none());
}

#[tokio::test]
async fn test_session_without_profile_goes_to_auth_error() {
    let app = TestApp::new().await;
    sqlx::query("PRAGMA foreign_keys = OFF")
        .execute(&app.state.db)
        .await
        .unwrap();
    let token = auth::create_session(&app.state.db, "deleted-user", Duration::hours(1))
        .await
        .unwrap();

    let request = Request::builder()
        .uri("/admin/subjects")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = app.send(request).await;

    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        headers.get(header::LOCATION).unwrap(),
        "/auth/error?error=Profile+not+found"
    );
}

#[tokio::test]
async fn test_store_failure_redirects_to_plain_login() {
    let app = TestApp::new().await;
    let token = app.token_for("hod@college.edu", "admin").await;
    app.state.db.close().await;

    let request = Request::builder()
        .uri("/admin/subjects")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = app.send(request).await;

    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/auth/login");
}

#[tokio::test]
async fn test_import_preview_explains_skipped_rows() {
    let app = TestApp::new().await;
    let token = app.token_for("hod@college.edu", "admin").await;

    let sheet = "Subject,,,Material,,\n\
        Semester,Sub_Code,Subject_Name,Category,URL\n\
        1,CS101,Data Structures,Syllabus,http://a\n\
        III,CS102,Discrete Maths,Notes,http://b\n\
        ,,,Notes,http://c\n";
    let request = Request::builder()
        .method(Method::POST)
        .uri("/admin/import/preview")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(sheet))
        .unwrap();
    let (status, _, bytes) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);

    let preview: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(preview["subjects"].as_array().unwrap().len(), 1);
    assert_eq!(preview["skipped_rows"], 2);
    assert_eq!(preview["skipped"][0]["row"], 4);
    assert_eq!(
        preview["log"],
        json!([
            "Processing CSV…",
            "Row 4 skipped: semester \"III\" of Discrete Maths (CS102) is not a positive whole number",
            "Row 5 skipped: Notes resource has no subject above it",
            "Detected 1 subjects.",
        ])
    );
}

#[tokio::test]
async fn test_import_rejects_non_positive_semester() {
    let app = TestApp::new().await;
    let token = app.token_for("hod@college.edu", "admin").await;

    let (status, body) = app
        .json(
            Method::POST,
            "/admin/import",
            Some(&token),
            Some(json!({ "subjects": [
                { "semester": 2, "code": "CS201", "name": "Algorithms" },
                { "semester": 0, "code": "CS001", "name": "Orientation" },
            ] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "semester of Orientation (CS001) must be positive");

    let (_, subjects) = app.json(Method::GET, "/admin/subjects", Some(&token), None).await;
    assert_eq!(subjects, json!([]));
}
