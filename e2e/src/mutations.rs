#[cfg(test)]
mod mutations_e2e_tests {
    use mockito::Matcher;
    use sonic_rs::json;

    use crate::testkit::{
        init_gateway_from_config_inline, init_graphql_request, inline_config_for, mock_metadata,
        read_body_string,
    };

    #[ntex::test]
    async fn should_post_new_entities() {
        let mut server = mockito::Server::new_async().await;
        let _metadata_mock = mock_metadata(&mut server).await;
        let add_mock = server
            .mock("POST", "/odata/books?$select=id,title")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({ "title": "Dune", "year": 1965 })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":3,"title":"Dune"}"#)
            .create_async()
            .await;

        let app = init_gateway_from_config_inline(&inline_config_for(&server))
            .await
            .expect("failed to start gateway");

        let req = init_graphql_request(
            r#"mutation { add_books(input: { title: "Dune", year: 1965 }) { id title } }"#,
            None,
        );
        let resp = app.call(req.to_request()).await.expect("failed to call");
        assert_eq!(resp.status().as_u16(), 200);

        insta::assert_snapshot!(read_body_string(resp).await, @r#"{"data":{"add_books":{"id":3,"title":"Dune"}}}"#);
        add_mock.assert_async().await;
    }

    #[ntex::test]
    async fn should_patch_with_variables() {
        let mut server = mockito::Server::new_async().await;
        let _metadata_mock = mock_metadata(&mut server).await;
        let update_mock = server
            .mock("PATCH", "/odata/books(12)?$select=id,price")
            .match_body(Matcher::Json(serde_json::json!({ "price": 4.5 })))
            .with_status(200)
            .with_body(r#"{"id":12,"price":4.5}"#)
            .create_async()
            .await;

        let app = init_gateway_from_config_inline(&inline_config_for(&server))
            .await
            .expect("failed to start gateway");

        let req = init_graphql_request(
            "mutation ($id: Int!, $changes: BookPatch) { books_update(id: $id, input: $changes) { id price } }",
            Some(json!({ "id": 12, "changes": { "price": 4.5 } })),
        );
        let resp = app.call(req.to_request()).await.expect("failed to call");

        insta::assert_snapshot!(read_body_string(resp).await, @r#"{"data":{"books_update":{"id":12,"price":4.5}}}"#);
        update_mock.assert_async().await;
    }

    #[ntex::test]
    async fn should_return_null_for_deleted_entities() {
        let mut server = mockito::Server::new_async().await;
        let _metadata_mock = mock_metadata(&mut server).await;
        let delete_mock = server
            .mock("DELETE", "/odata/books(3)")
            .with_status(204)
            .create_async()
            .await;

        let app = init_gateway_from_config_inline(&inline_config_for(&server))
            .await
            .expect("failed to start gateway");

        let req = init_graphql_request("mutation { delete_books(key: 3) }", None);
        let resp = app.call(req.to_request()).await.expect("failed to call");
        assert!(resp.status().is_success());

        insta::assert_snapshot!(read_body_string(resp).await, @r#"{"data":{"delete_books":null}}"#);
        delete_mock.assert_async().await;
    }
}
