use std::sync::{Arc, Once};

use graphql_odata_config::{parse_yaml_config, GatewayConfig};
use graphql_odata_gateway::{
    configure_app_from_config, configure_ntex_app, GatewaySharedState, SchemaState,
};
use lazy_static::lazy_static;
use mockito::{Mock, ServerGuard};
use ntex::{
    http::Request,
    web::{
        self,
        test::{self, TestRequest},
        WebResponse,
    },
    Pipeline, Service,
};
use sonic_rs::json;
use tracing_subscriber::EnvFilter;

pub const METADATA: &str = include_str!("../../lib/compiler/fixture/metadata.json");

lazy_static! {
    static ref TRACING_INIT: Once = Once::new();
}

pub fn init_logger() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn init_graphql_request(op: &str, variables: Option<sonic_rs::Value>) -> TestRequest {
    let body = json!({
      "query": op,
      "variables": variables
    });

    test::TestRequest::post()
        .uri("/odata/graphql")
        .header("content-type", "application/json")
        .set_payload(body.to_string())
}

/// Serves the bookstore metadata document the gateway fetches on first use.
pub async fn mock_metadata(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/odata/$metadata?$format=json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(METADATA)
        .create_async()
        .await
}

pub fn inline_config_for(server: &ServerGuard) -> String {
    format!(
        r#"
        odata:
            endpoint: {}
        "#,
        server.url()
    )
}

pub async fn read_body_string(response: WebResponse) -> String {
    let body = test::read_body(response).await;
    String::from_utf8(body.to_vec()).expect("response body is not valid UTF-8")
}

pub struct TestGatewayApp<T> {
    pub app: Pipeline<T>,
    #[allow(dead_code)]
    pub shared_state: Arc<GatewaySharedState>,
    pub schema_state: Arc<SchemaState>,
}

impl<S> TestGatewayApp<S> {
    pub async fn call<R>(&self, req: R) -> Result<S::Response, S::Error>
    where
        S: Service<R>,
    {
        self.app.call(req).await
    }
}

pub async fn init_gateway_from_config_inline(
    config_yaml: &str,
) -> Result<
    TestGatewayApp<
        impl ntex::Service<Request, Response = WebResponse, Error = ntex::web::Error>,
    >,
    Box<dyn std::error::Error>,
> {
    let gateway_config = parse_yaml_config(config_yaml.to_string())?;
    init_gateway_from_config(gateway_config).await
}

pub async fn init_gateway_from_config(
    gateway_config: GatewayConfig,
) -> Result<
    TestGatewayApp<
        impl ntex::Service<Request, Response = WebResponse, Error = ntex::web::Error>,
    >,
    Box<dyn std::error::Error>,
> {
    init_logger();
    let (shared_state, schema_state) = configure_app_from_config(gateway_config)?;
    let app_config = shared_state.config.clone();

    let ntex_app = test::init_service(
        web::App::new()
            .state(shared_state.clone())
            .state(schema_state.clone())
            .configure(|service_config| configure_ntex_app(service_config, &app_config)),
    )
    .await;

    Ok(TestGatewayApp {
        app: ntex_app,
        shared_state,
        schema_state,
    })
}
