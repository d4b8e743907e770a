//! Integration tests for the chat service file and scam endpoints,
//! driven through the CLI command layer

mod test_utils;

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use mockito::Matcher;
    use serial_test::serial;

    use finpilot::chat::ChatServiceClient;
    use finpilot::cli;

    use crate::test_utils::test_config;

    /// Tests the upload-then-parse flow the upload command runs
    #[tokio::test]
    #[serial]
    async fn it_uploads_and_parses_through_the_cli() {
        let mut server = mockito::Server::new_async().await;
        let upload_mock = server
            .mock("POST", "/api/upload/")
            .match_header(
                "content-type",
                Matcher::Regex("multipart/form-data.*".to_string()),
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "uploadId": "u-42",
                    "filename": "statement.csv",
                    "detectedType": "bank_statement",
                    "previewRecords": 20,
                    "message": "Detected a bank statement"
                }"#,
            )
            .expect(1)
            .create_async()
            .await;
        let parse_mock = server
            .mock("POST", "/api/upload/parse")
            .match_body(Matcher::JsonString(r#"{"uploadId": "u-42"}"#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "taskId": "t-7",
                    "status": "completed",
                    "records": [{"date": "2025-06-01", "amount": -120.5}]
                }"#,
            )
            .expect(1)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statement.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "date,amount,description").unwrap();
        writeln!(file, "2025-06-01,-120.50,Office rent").unwrap();

        let config = test_config(&server.url());
        cli::upload::run(&config, path.to_str().unwrap())
            .await
            .unwrap();

        upload_mock.assert_async().await;
        parse_mock.assert_async().await;
    }

    /// Tests that parsing forwards an explicit column mapping
    #[tokio::test]
    #[serial]
    async fn it_passes_the_column_mapping_when_parsing() {
        let mut server = mockito::Server::new_async().await;
        let parse_mock = server
            .mock("POST", "/api/upload/parse")
            .match_body(Matcher::JsonString(
                r#"{"uploadId": "u-42", "mapping": {"Transaction Date": "date"}}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"taskId": "t-8", "status": "processing"}"#)
            .create_async()
            .await;

        let config = test_config(&server.url());
        let client = ChatServiceClient::new(&config);
        let mut mapping = HashMap::new();
        mapping.insert("Transaction Date".to_string(), "date".to_string());

        let parsed = client.parse("u-42", Some(&mapping)).await.unwrap();
        assert_eq!(parsed.status, "processing");
        assert!(parsed.records.is_none());
        parse_mock.assert_async().await;
    }

    /// Tests the scam check command against a positive verdict
    #[tokio::test]
    #[serial]
    async fn it_checks_text_for_scams_through_the_cli() {
        let mut server = mockito::Server::new_async().await;
        let scam_mock = server
            .mock("POST", "/api/scam/check")
            .match_body(Matcher::JsonString(
                r#"{"text": "Wire $900 in gift cards to unlock your refund"}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "score": 0.97,
                    "is_scam": true,
                    "reason": "Requests payment via gift cards, a common scam pattern"
                }"#,
            )
            .expect(1)
            .create_async()
            .await;

        let config = test_config(&server.url());
        cli::scam::run(&config, "Wire $900 in gift cards to unlock your refund")
            .await
            .unwrap();

        scam_mock.assert_async().await;
    }
}
