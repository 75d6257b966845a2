#[cfg(test)]
mod passthrough_e2e_tests {
    use mockito::Matcher;
    use ntex::web::test;

    use crate::testkit::{init_gateway_from_config_inline, inline_config_for, read_body_string};

    #[ntex::test]
    async fn should_forward_requests_without_a_query() {
        let mut server = mockito::Server::new_async().await;
        let metadata_mock = server
            .mock("GET", "/odata/$metadata?$format=json")
            .expect(0)
            .create_async()
            .await;
        let forwarded_mock = server
            .mock("GET", "/odata/graphql?$top=1")
            .match_header("x-tenant", "acme")
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_header("x-served-by", "odata")
            .with_body("plain answer")
            .create_async()
            .await;

        let app = init_gateway_from_config_inline(&inline_config_for(&server))
            .await
            .expect("failed to start gateway");

        let req = test::TestRequest::get()
            .uri("/odata/graphql?$top=1")
            .header("x-tenant", "acme")
            .to_request();
        let resp = app.call(req).await.expect("failed to call");
        assert_eq!(resp.status().as_u16(), 200);
        assert_eq!(
            resp.headers()
                .get("x-served-by")
                .and_then(|value| value.to_str().ok()),
            Some("odata")
        );

        assert_eq!(read_body_string(resp).await, "plain answer");
        forwarded_mock.assert_async().await;
        metadata_mock.assert_async().await;
    }

    #[ntex::test]
    async fn should_forward_bodies_and_keep_the_downstream_status() {
        let mut server = mockito::Server::new_async().await;
        let forwarded_mock = server
            .mock("POST", "/odata/graphql")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Exact(r#"{"name":"Ada"}"#.to_string()))
            .with_status(201)
            .with_body(r#"{"id":9,"name":"Ada"}"#)
            .create_async()
            .await;

        let app = init_gateway_from_config_inline(&inline_config_for(&server))
            .await
            .expect("failed to start gateway");

        let req = test::TestRequest::post()
            .uri("/odata/graphql")
            .header("content-type", "application/json")
            .set_payload(r#"{"name":"Ada"}"#)
            .to_request();
        let resp = app.call(req).await.expect("failed to call");
        assert_eq!(resp.status().as_u16(), 201);

        assert_eq!(read_body_string(resp).await, r#"{"id":9,"name":"Ada"}"#);
        forwarded_mock.assert_async().await;
    }

    #[ntex::test]
    async fn should_forward_other_methods() {
        let mut server = mockito::Server::new_async().await;
        let forwarded_mock = server
            .mock("DELETE", "/odata/graphql")
            .with_status(404)
            .create_async()
            .await;

        let app = init_gateway_from_config_inline(&inline_config_for(&server))
            .await
            .expect("failed to start gateway");

        let req = test::TestRequest::with_uri("/odata/graphql")
            .method(ntex::http::Method::DELETE)
            .to_request();
        let resp = app.call(req).await.expect("failed to call");
        assert_eq!(resp.status().as_u16(), 404);

        forwarded_mock.assert_async().await;
    }
}
