#[cfg(test)]
mod errors_e2e_tests {
    use std::{thread, time::Duration};

    use sonic_rs::{JsonValueTrait, Value};

    use crate::testkit::{
        init_gateway_from_config_inline, init_graphql_request, inline_config_for, mock_metadata,
        read_body_string,
    };

    fn first_error_code(body: &str) -> Option<String> {
        let value: Value = sonic_rs::from_str(body).ok()?;
        value
            .get("errors")?
            .get(0)?
            .get("extensions")?
            .get("code")?
            .as_str()
            .map(str::to_string)
    }

    #[ntex::test]
    async fn should_report_empty_downstream_errors_with_the_status() {
        let mut server = mockito::Server::new_async().await;
        let _metadata_mock = mock_metadata(&mut server).await;
        let _odata_mock = server
            .mock("GET", "/odata/books?$select=id")
            .with_status(404)
            .create_async()
            .await;

        let app = init_gateway_from_config_inline(&inline_config_for(&server))
            .await
            .expect("failed to start gateway");

        let req = init_graphql_request("{ books { id } }", None);
        let resp = app.call(req.to_request()).await.expect("failed to call");
        assert_eq!(resp.status().as_u16(), 200);

        insta::assert_snapshot!(read_body_string(resp).await, @r#"{"errors":[{"message":404}]}"#);
    }

    #[ntex::test]
    async fn should_unwrap_odata_error_bodies() {
        let mut server = mockito::Server::new_async().await;
        let _metadata_mock = mock_metadata(&mut server).await;
        let _odata_mock = server
            .mock("GET", "/odata/books?$select=id")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"code":"BadRequest","message":"The query is not valid"}}"#)
            .create_async()
            .await;

        let app = init_gateway_from_config_inline(&inline_config_for(&server))
            .await
            .expect("failed to start gateway");

        let req = init_graphql_request("{ books { id } }", None);
        let resp = app.call(req.to_request()).await.expect("failed to call");
        assert_eq!(resp.status().as_u16(), 200);

        insta::assert_snapshot!(read_body_string(resp).await, @r#"{"errors":[{"code":"BadRequest","message":"The query is not valid"}]}"#);
    }

    #[ntex::test]
    async fn should_reject_unknown_entity_sets_without_calling_the_service() {
        let mut server = mockito::Server::new_async().await;
        let _metadata_mock = mock_metadata(&mut server).await;
        let downstream_mock = server
            .mock("GET", mockito::Matcher::Regex(r"^/odata/(?:authors|Authors)".to_string()))
            .expect(0)
            .create_async()
            .await;

        let app = init_gateway_from_config_inline(&inline_config_for(&server))
            .await
            .expect("failed to start gateway");

        let req = init_graphql_request("{ authors { name } }", None);
        let resp = app.call(req.to_request()).await.expect("failed to call");
        assert_eq!(resp.status().as_u16(), 200);

        let body = read_body_string(resp).await;
        assert_eq!(
            first_error_code(&body).as_deref(),
            Some("SCHEMA_RESOLUTION_FAILED")
        );
        assert!(body.contains("authors"), "unexpected body: {body}");
        downstream_mock.assert_async().await;
    }

    #[ntex::test]
    async fn should_reject_unparsable_operations() {
        let mut server = mockito::Server::new_async().await;
        let _metadata_mock = mock_metadata(&mut server).await;

        let app = init_gateway_from_config_inline(&inline_config_for(&server))
            .await
            .expect("failed to start gateway");

        let req = init_graphql_request("{ books { id ", None);
        let resp = app.call(req.to_request()).await.expect("failed to call");
        assert_eq!(resp.status().as_u16(), 400);

        let body = read_body_string(resp).await;
        assert_eq!(first_error_code(&body).as_deref(), Some("GRAPHQL_PARSE_FAILED"));
    }

    #[ntex::test]
    async fn should_reject_multiple_operations() {
        let mut server = mockito::Server::new_async().await;
        let _metadata_mock = mock_metadata(&mut server).await;

        let app = init_gateway_from_config_inline(&inline_config_for(&server))
            .await
            .expect("failed to start gateway");

        let req = init_graphql_request(
            "query A { books { id } } query B { customers { id } }",
            None,
        );
        let resp = app.call(req.to_request()).await.expect("failed to call");
        assert_eq!(resp.status().as_u16(), 400);

        let body = read_body_string(resp).await;
        assert_eq!(
            first_error_code(&body).as_deref(),
            Some("OPERATION_RESOLUTION_FAILURE")
        );
    }

    #[ntex::test]
    async fn should_reject_malformed_request_bodies() {
        let mut server = mockito::Server::new_async().await;
        let _metadata_mock = mock_metadata(&mut server).await;

        let app = init_gateway_from_config_inline(&inline_config_for(&server))
            .await
            .expect("failed to start gateway");

        let req = ntex::web::test::TestRequest::post()
            .uri("/odata/graphql")
            .header("content-type", "application/json")
            .set_payload("{ not json")
            .to_request();
        let resp = app.call(req).await.expect("failed to call");
        assert_eq!(resp.status().as_u16(), 400);
    }

    #[ntex::test]
    async fn should_fail_with_bad_gateway_when_metadata_is_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let _odata_mock = server
            .mock("GET", "/odata/$metadata?$format=json")
            .with_status(500)
            .create_async()
            .await;

        let app = init_gateway_from_config_inline(&inline_config_for(&server))
            .await
            .expect("failed to start gateway");

        let req = init_graphql_request("{ books { id } }", None);
        let resp = app.call(req.to_request()).await.expect("failed to call");
        assert_eq!(resp.status().as_u16(), 502);

        let body = read_body_string(resp).await;
        assert_eq!(first_error_code(&body).as_deref(), Some("METADATA_UNAVAILABLE"));
        assert!(!app.schema_state.is_ready());
    }

    #[ntex::test]
    async fn should_time_out_slow_downstream_requests() {
        let mut server = mockito::Server::new_async().await;
        let _metadata_mock = mock_metadata(&mut server).await;
        let _odata_mock = server
            .mock("GET", "/odata/books?$select=id")
            .with_status(200)
            .with_chunked_body(|w| {
                thread::sleep(Duration::from_millis(500));
                w.write_all(br#"{"value":[]}"#)
            })
            .create_async()
            .await;

        let app = init_gateway_from_config_inline(&format!(
            r#"
            odata:
                endpoint: {}
                request_timeout: 100ms
            "#,
            server.url()
        ))
        .await
        .expect("failed to start gateway");

        // Loads the model first so only the entity set request is slow.
        app.schema_state.model().await.expect("metadata should load");

        let req = init_graphql_request("{ books { id } }", None);
        let resp = app.call(req.to_request()).await.expect("failed to call");
        assert_eq!(resp.status().as_u16(), 504);

        let body = read_body_string(resp).await;
        assert_eq!(
            first_error_code(&body).as_deref(),
            Some("DOWNSTREAM_REQUEST_FAILED")
        );
    }
}
