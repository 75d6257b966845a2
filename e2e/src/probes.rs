#[cfg(test)]
mod probes_e2e_tests {
    use ntex::web::test;

    use crate::testkit::{
        init_gateway_from_config_inline, init_graphql_request, inline_config_for, read_body_string,
        METADATA,
    };

    #[ntex::test]
    async fn should_respond_to_probes_correctly() {
        let mut server = mockito::Server::new_async().await;
        let unavailable_mock = server
            .mock("GET", "/odata/$metadata?$format=json")
            .with_status(503)
            .expect(1)
            .create_async()
            .await;

        let app = init_gateway_from_config_inline(&inline_config_for(&server))
            .await
            .expect("failed to start gateway");

        // Health does not depend on the OData model
        let res = app
            .call(test::TestRequest::get().uri("/health").to_request())
            .await
            .expect("failed to call");
        assert!(res.status().is_success());

        // And readiness fails while metadata cannot be loaded
        let res = app
            .call(test::TestRequest::get().uri("/readiness").to_request())
            .await
            .expect("failed to call");
        assert_eq!(res.status().as_u16(), 503);
        unavailable_mock.assert_async().await;
        unavailable_mock.remove_async().await;

        let _odata_mock = server
            .mock("GET", "/odata/$metadata?$format=json")
            .with_status(200)
            .with_body(METADATA)
            .create_async()
            .await;

        // Once the service is back, the next probe loads the model
        let res = app
            .call(test::TestRequest::get().uri("/readiness").to_request())
            .await
            .expect("failed to call");
        assert!(res.status().is_success());
        assert!(app.schema_state.is_ready());

        let res = app
            .call(test::TestRequest::get().uri("/health").to_request())
            .await
            .expect("failed to call");
        assert!(res.status().is_success());
    }

    #[ntex::test]
    async fn should_load_metadata_from_a_file() {
        let mut server = mockito::Server::new_async().await;
        let remote_mock = server
            .mock("GET", "/odata/$metadata?$format=json")
            .expect(0)
            .create_async()
            .await;

        let app = init_gateway_from_config_inline(&format!(
            r#"
            odata:
                endpoint: {}
            metadata:
                source: file
                path: ../lib/compiler/fixture/metadata.json
            "#,
            server.url()
        ))
        .await
        .expect("failed to start gateway");

        let res = app
            .call(test::TestRequest::get().uri("/readiness").to_request())
            .await
            .expect("failed to call");
        assert!(res.status().is_success());
        remote_mock.assert_async().await;
    }

    #[ntex::test]
    async fn should_load_xml_metadata_from_a_configured_url() {
        let mut server = mockito::Server::new_async().await;
        let metadata_mock = server
            .mock("GET", "/odata/$metadata")
            .with_status(200)
            .with_header("content-type", "application/xml")
            .with_body(include_str!("../../lib/compiler/fixture/metadata.xml"))
            .expect(1)
            .create_async()
            .await;
        let _odata_mock = server
            .mock("GET", "/odata/GetSomeBook()?$select=id&$expand=customer($select=name)")
            .with_status(200)
            .with_body(r#"{"id":4,"customer":{"name":"Ada"}}"#)
            .create_async()
            .await;

        let app = init_gateway_from_config_inline(&format!(
            r#"
            odata:
                endpoint: {url}
            metadata:
                source: remote
                url: {url}/odata/$metadata
            "#,
            url = server.url()
        ))
        .await
        .expect("failed to start gateway");

        let req = init_graphql_request("{ GetSomeBook { id customer { name } } }", None);
        let resp = app.call(req.to_request()).await.expect("failed to call");
        assert!(resp.status().is_success());

        insta::assert_snapshot!(read_body_string(resp).await, @r#"{"data":{"GetSomeBook":{"id":4,"customer":{"name":"Ada"}}}}"#);
        metadata_mock.assert_async().await;
    }
}
