#[cfg(test)]
mod batch_e2e_tests {
    use mockito::Matcher;
    use serde_json::json;

    use crate::testkit::{
        init_gateway_from_config_inline, init_graphql_request, inline_config_for, mock_metadata,
        read_body_string,
    };

    const ACCEPT: &str = "application/json;odata.metadata=none;odata.streaming=true";

    #[ntex::test]
    async fn should_send_multiple_root_fields_as_one_batch() {
        let mut server = mockito::Server::new_async().await;
        let _metadata_mock = mock_metadata(&mut server).await;
        let batch_mock = server
            .mock("POST", "/odata/$batch")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "requests": [
                    {
                        "id": "1",
                        "method": "GET",
                        "url": "books?$select=id",
                        "headers": { "Accept": ACCEPT, "OData-Version": "4.0" }
                    },
                    {
                        "id": "2",
                        "method": "GET",
                        "url": "customers?$select=id",
                        "headers": { "Accept": ACCEPT, "OData-Version": "4.0" }
                    }
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"responses":[
                    {"id":"2","status":200,"body":{"value":[{"id":7}]}},
                    {"id":"1","status":200,"body":{"value":[{"id":1}]}}
                ]}"#,
            )
            .create_async()
            .await;

        let app = init_gateway_from_config_inline(&inline_config_for(&server))
            .await
            .expect("failed to start gateway");

        let req = init_graphql_request("{ books { id } customers { id } }", None);
        let resp = app.call(req.to_request()).await.expect("failed to call");
        assert!(resp.status().is_success());

        insta::assert_snapshot!(read_body_string(resp).await, @r#"{"data":{"books":[{"id":1}],"customers":[{"id":7}]}}"#);
        batch_mock.assert_async().await;
    }

    #[ntex::test]
    async fn should_report_failed_sub_responses_under_their_root_field() {
        let mut server = mockito::Server::new_async().await;
        let _metadata_mock = mock_metadata(&mut server).await;
        let _odata_mock = server
            .mock("POST", "/odata/$batch")
            .with_status(200)
            .with_body(
                r#"{"responses":[
                    {"id":"1","status":200,"body":{"value":[{"title":"Dune"}]}},
                    {"id":"2","status":404,"body":{"error":{"code":"NotFound","message":"no such entity set"}}}
                ]}"#,
            )
            .create_async()
            .await;

        let app = init_gateway_from_config_inline(&inline_config_for(&server))
            .await
            .expect("failed to start gateway");

        let req = init_graphql_request("{ shelf: books { title } customers { name } }", None);
        let resp = app.call(req.to_request()).await.expect("failed to call");
        assert!(resp.status().is_success());

        insta::assert_snapshot!(read_body_string(resp).await, @r#"{"data":{"shelf":[{"title":"Dune"}],"customers":null},"errors":[{"code":"NotFound","message":"no such entity set","path":["customers"]}]}"#);
    }

    #[ntex::test]
    async fn should_correlate_sub_responses_by_position_without_ids() {
        let mut server = mockito::Server::new_async().await;
        let _metadata_mock = mock_metadata(&mut server).await;
        let _odata_mock = server
            .mock("POST", "/odata/$batch")
            .with_status(200)
            .with_body(
                r#"{"responses":[
                    {"status":201,"body":{"id":3,"title":"Dune"}},
                    {"status":204}
                ]}"#,
            )
            .create_async()
            .await;

        let app = init_gateway_from_config_inline(&inline_config_for(&server))
            .await
            .expect("failed to start gateway");

        let req = init_graphql_request(
            r#"mutation { add_books(input: { title: "Dune" }) { id title } delete_books(key: 3) }"#,
            None,
        );
        let resp = app.call(req.to_request()).await.expect("failed to call");

        insta::assert_snapshot!(read_body_string(resp).await, @r#"{"data":{"add_books":{"id":3,"title":"Dune"},"delete_books":null}}"#);
    }
}
