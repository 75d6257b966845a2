#[cfg(test)]
mod queries_e2e_tests {
    use ntex::web::test;
    use sonic_rs::json;

    use crate::testkit::{
        init_gateway_from_config_inline, init_graphql_request, inline_config_for, mock_metadata,
        read_body_string,
    };

    #[ntex::test]
    async fn should_unwrap_collections_into_the_root_field() {
        let mut server = mockito::Server::new_async().await;
        let metadata_mock = mock_metadata(&mut server).await;
        let books_mock = server
            .mock("GET", "/odata/books?$select=id,title")
            .match_header("accept", "application/json;odata.metadata=none;odata.streaming=true")
            .match_header("odata-version", "4.0")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"@odata.context":"$metadata#Books","value":[{"id":1,"title":"Dune"},{"id":2,"title":"Emma"}]}"#)
            .create_async()
            .await;

        let app = init_gateway_from_config_inline(&inline_config_for(&server))
            .await
            .expect("failed to start gateway");

        let req = init_graphql_request("{ books { id title } }", None);
        let resp = app.call(req.to_request()).await.expect("failed to call");
        assert!(resp.status().is_success());
        assert_eq!(
            resp.headers()
                .get("content-type")
                .and_then(|value| value.to_str().ok()),
            Some("application/json")
        );

        insta::assert_snapshot!(read_body_string(resp).await, @r#"{"data":{"books":[{"id":1,"title":"Dune"},{"id":2,"title":"Emma"}]}}"#);
        metadata_mock.assert_async().await;
        books_mock.assert_async().await;
    }

    #[ntex::test]
    async fn should_percent_encode_filter_literals() {
        let mut server = mockito::Server::new_async().await;
        let _metadata_mock = mock_metadata(&mut server).await;
        let books_mock = server
            .mock(
                "GET",
                "/odata/books?$select=id&$filter=contains(title,'Dune%20Messiah')&$top=2",
            )
            .with_status(200)
            .with_body(r#"{"value":[{"id":4}]}"#)
            .create_async()
            .await;

        let app = init_gateway_from_config_inline(&inline_config_for(&server))
            .await
            .expect("failed to start gateway");

        let req = init_graphql_request(
            r#"{ books(where: { title_contains: "Dune Messiah" }, first: 2) { id } }"#,
            None,
        );
        let resp = app.call(req.to_request()).await.expect("failed to call");

        insta::assert_snapshot!(read_body_string(resp).await, @r#"{"data":{"books":[{"id":4}]}}"#);
        books_mock.assert_async().await;
    }

    #[ntex::test]
    async fn should_keep_reserved_characters_inside_filter_literals() {
        let mut server = mockito::Server::new_async().await;
        let _metadata_mock = mock_metadata(&mut server).await;
        let books_mock = server
            .mock(
                "GET",
                "/odata/books?$select=id&$filter=contains(title,'Tom%20%26%20Jerry')%20or%20contains(title,'C%2B%2B')",
            )
            .with_status(200)
            .with_body(r#"{"value":[{"id":8}]}"#)
            .create_async()
            .await;

        let app = init_gateway_from_config_inline(&inline_config_for(&server))
            .await
            .expect("failed to start gateway");

        let req = init_graphql_request(
            r#"{ books(where: { OR: [{ title_contains: "Tom & Jerry" }, { title_contains: "C++" }] }) { id } }"#,
            None,
        );
        let resp = app.call(req.to_request()).await.expect("failed to call");

        insta::assert_snapshot!(read_body_string(resp).await, @r#"{"data":{"books":[{"id":8}]}}"#);
        books_mock.assert_async().await;
    }

    #[ntex::test]
    async fn should_substitute_variables() {
        let mut server = mockito::Server::new_async().await;
        let _metadata_mock = mock_metadata(&mut server).await;
        let books_mock = server
            .mock("GET", "/odata/books?$select=id&$top=1")
            .with_status(200)
            .with_body(r#"{"value":[{"id":1}]}"#)
            .create_async()
            .await;

        let app = init_gateway_from_config_inline(&inline_config_for(&server))
            .await
            .expect("failed to start gateway");

        let req = init_graphql_request(
            "query ($first: Int) { books(first: $first) { id } }",
            Some(json!({ "first": 1 })),
        );
        let resp = app.call(req.to_request()).await.expect("failed to call");

        insta::assert_snapshot!(read_body_string(resp).await, @r#"{"data":{"books":[{"id":1}]}}"#);
        books_mock.assert_async().await;
    }

    #[ntex::test]
    async fn should_expand_navigation_properties() {
        let mut server = mockito::Server::new_async().await;
        let _metadata_mock = mock_metadata(&mut server).await;
        let customers_mock = server
            .mock("GET", "/odata/customers?$select=name&$expand=books($select=title)")
            .with_status(200)
            .with_body(r#"{"value":[{"name":"Ada","books":[{"title":"Dune"}]}]}"#)
            .create_async()
            .await;

        let app = init_gateway_from_config_inline(&inline_config_for(&server))
            .await
            .expect("failed to start gateway");

        let req = init_graphql_request("{ customers { name books { title } } }", None);
        let resp = app.call(req.to_request()).await.expect("failed to call");

        insta::assert_snapshot!(read_body_string(resp).await, @r#"{"data":{"customers":[{"name":"Ada","books":[{"title":"Dune"}]}]}}"#);
        customers_mock.assert_async().await;
    }

    #[ntex::test]
    async fn should_accept_queries_over_get() {
        let mut server = mockito::Server::new_async().await;
        let _metadata_mock = mock_metadata(&mut server).await;
        let books_mock = server
            .mock("GET", "/odata/books?$select=title")
            .with_status(200)
            .with_body(r#"{"value":[{"title":"Dune"}]}"#)
            .create_async()
            .await;

        let app = init_gateway_from_config_inline(&inline_config_for(&server))
            .await
            .expect("failed to start gateway");

        let req = test::TestRequest::get()
            .uri("/odata/graphql?query=%7B%20books%20%7B%20title%20%7D%20%7D")
            .to_request();
        let resp = app.call(req).await.expect("failed to call");
        assert!(resp.status().is_success());

        insta::assert_snapshot!(read_body_string(resp).await, @r#"{"data":{"books":[{"title":"Dune"}]}}"#);
        books_mock.assert_async().await;
    }

    #[ntex::test]
    async fn should_load_metadata_only_once() {
        let mut server = mockito::Server::new_async().await;
        let metadata_mock = server
            .mock("GET", "/odata/$metadata?$format=json")
            .with_status(200)
            .with_body(crate::testkit::METADATA)
            .expect(1)
            .create_async()
            .await;
        let _odata_mock = server
            .mock("GET", "/odata/books?$select=id")
            .with_status(200)
            .with_body(r#"{"value":[]}"#)
            .expect(3)
            .create_async()
            .await;

        let app = init_gateway_from_config_inline(&inline_config_for(&server))
            .await
            .expect("failed to start gateway");

        for _ in 0..3 {
            let req = init_graphql_request("{ books { id } }", None);
            let resp = app.call(req.to_request()).await.expect("failed to call");
            assert_eq!(read_body_string(resp).await, r#"{"data":{"books":[]}}"#);
        }

        assert!(app.schema_state.is_ready());
        metadata_mock.assert_async().await;
    }
}
