//! Integration tests for login, session persistence, and the refresh
//! path as backend commands exercise it

mod test_utils;

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use finpilot::backend::BackendClient;

    use crate::test_utils::{TEST_ORG_ID, logged_in_session, test_config, test_session};

    const LOGIN_BODY: &str = r#"{
        "user": {
            "id": "7f1f4a02-9d71-4a5e-a8a0-1c9f35b3f001",
            "email": "owner@acme.test",
            "name": "Acme Owner",
            "plan": "free",
            "created_at": "2025-05-01T10:00:00Z"
        },
        "org": {
            "id": "b52b3b8c-30d1-4e64-a9d6-2a8f17f3d002",
            "name": "Acme LLC",
            "timezone": "UTC",
            "currency": "USD",
            "created_at": "2025-05-01T10:00:00Z"
        },
        "tokens": {"access": "acc_1", "refresh": "ref_1"}
    }"#;

    const INVOICE_LIST_BODY: &str = r#"[{
        "id": "9a8a6a3e-6d1b-4a5f-8c3e-111111111111",
        "invoice_number": "INV-2025-0042",
        "customer_name": "Acme LLC",
        "issue_date": "2025-06-01",
        "due_date": "2025-07-01",
        "total_amount": "1200.00",
        "amount_paid": "200.00",
        "amount_remaining": 1000.0,
        "status": "partial",
        "is_overdue": false,
        "latest_prediction": null,
        "created_at": "2025-06-01T09:00:00Z"
    }]"#;

    /// Tests that a login persists the session for later invocations
    #[tokio::test]
    #[serial]
    async fn it_logs_in_and_reuses_the_session() {
        let mut server = mockito::Server::new_async().await;
        let login_mock = server
            .mock("POST", "/api/auth/login/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(LOGIN_BODY)
            .create_async()
            .await;
        let me_mock = server
            .mock("GET", "/api/auth/me/")
            .match_header("authorization", "Bearer acc_1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "user": {
                        "id": "7f1f4a02-9d71-4a5e-a8a0-1c9f35b3f001",
                        "email": "owner@acme.test",
                        "name": "Acme Owner",
                        "plan": "free",
                        "created_at": "2025-05-01T10:00:00Z"
                    },
                    "organizations": [{
                        "id": "b52b3b8c-30d1-4e64-a9d6-2a8f17f3d002",
                        "name": "Acme LLC",
                        "timezone": "UTC",
                        "currency": "USD",
                        "created_at": "2025-05-01T10:00:00Z"
                    }]
                }"#,
            )
            .create_async()
            .await;

        let config = test_config(&server.url());
        let session = test_session(&config).await;
        session.login("owner@acme.test", "hunter2").await.unwrap();

        // A second session over the same database picks the login up,
        // the way each CLI invocation does
        let session = test_session(&config).await;
        let me = session.me().await.unwrap();
        assert_eq!(me.user.email, "owner@acme.test");
        assert_eq!(me.organizations.len(), 1);

        login_mock.assert_async().await;
        me_mock.assert_async().await;
    }

    /// Tests that a backend request holding an expired token refreshes
    /// it and retries without surfacing the 401
    #[tokio::test]
    #[serial]
    async fn it_refreshes_and_retries_backend_requests() {
        let mut server = mockito::Server::new_async().await;
        let path = format!("/api/orgs/{}/invoices/invoices/", TEST_ORG_ID);
        let stale_mock = server
            .mock("GET", path.as_str())
            .match_header("authorization", "Bearer stale")
            .with_status(401)
            .with_body(r#"{"detail": "Token expired"}"#)
            .expect(1)
            .create_async()
            .await;
        let fresh_mock = server
            .mock("GET", path.as_str())
            .match_header("authorization", "Bearer fresh")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(INVOICE_LIST_BODY)
            .expect(1)
            .create_async()
            .await;
        let refresh_mock = server
            .mock("POST", "/api/auth/refresh/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access": "fresh"}"#)
            .expect(1)
            .create_async()
            .await;

        let config = test_config(&server.url());
        let client = BackendClient::new(logged_in_session(&config, "stale", "ref_1").await);

        let org_id = client.org_id().await.unwrap();
        assert_eq!(org_id, TEST_ORG_ID);
        let invoices = client.invoices(&org_id).await.unwrap();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].invoice_number, "INV-2025-0042");

        stale_mock.assert_async().await;
        fresh_mock.assert_async().await;
        refresh_mock.assert_async().await;
    }

    /// Tests that backend commands demand a login first
    #[tokio::test]
    #[serial]
    async fn it_requires_a_login_for_backend_requests() {
        let mut server = mockito::Server::new_async().await;
        let never_hit = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let config = test_config(&server.url());
        let client = BackendClient::new(test_session(&config).await);

        let err = client.org_id().await.unwrap_err();
        assert!(err.to_string().contains("No active organization"));

        let err = client.invoices(TEST_ORG_ID).await.unwrap_err();
        assert!(err.to_string().contains("Not logged in"));

        never_hit.assert_async().await;
    }
}
