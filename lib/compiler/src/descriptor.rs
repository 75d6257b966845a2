use std::fmt::{Display, Formatter, Result as FmtResult};

use http::Method;
use serde::Serialize;
use serde_json::Value as JsonValue;

pub const ODATA_ACCEPT: &str = "application/json;odata.metadata=none;odata.streaming=true";
pub const ODATA_VERSION: &str = "4.0";
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestKind {
    Query,
    Function,
    Mutation,
    Action,
    Aggregation,
}

impl RequestKind {
    /// Whether the downstream request carries a JSON body.
    pub fn has_body(&self) -> bool {
        matches!(self, RequestKind::Mutation | RequestKind::Action)
    }
}

/// A single OData request compiled from one root field.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestDescriptor {
    /// Route segment relative to the OData prefix, e.g. `Books(3)` or `GetSomeBook(id=1)`.
    pub name: String,
    pub method: Method,
    /// Either empty or starting with `?`.
    pub query_string: String,
    pub body: Option<JsonValue>,
    pub kind: RequestKind,
}

impl RequestDescriptor {
    pub fn url(&self) -> String {
        format!("{}{}", self.name, self.query_string)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchHeaders {
    #[serde(rename = "Accept")]
    pub accept: &'static str,
    #[serde(rename = "OData-Version")]
    pub odata_version: &'static str,
    #[serde(rename = "Content-Type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<&'static str>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchItem {
    pub id: String,
    pub method: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<JsonValue>,
    pub headers: BatchHeaders,
}

impl BatchItem {
    pub fn from_descriptor(id: usize, descriptor: RequestDescriptor) -> Self {
        let url = descriptor.url();
        let with_body = descriptor.kind.has_body();

        BatchItem {
            id: id.to_string(),
            method: descriptor.method.as_str().to_string(),
            url,
            body: if with_body {
                Some(
                    descriptor
                        .body
                        .unwrap_or_else(|| JsonValue::Object(Default::default())),
                )
            } else {
                None
            },
            headers: BatchHeaders {
                accept: ODATA_ACCEPT,
                odata_version: ODATA_VERSION,
                content_type: with_body.then_some(JSON_CONTENT_TYPE),
            },
        }
    }
}

/// JSON body of an OData `$batch` request.
#[derive(Clone, Debug, PartialEq, Serialize, Default)]
pub struct BatchEnvelope {
    pub requests: Vec<BatchItem>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CompiledRequest {
    Single(RequestDescriptor),
    Batch(BatchEnvelope),
}

impl CompiledRequest {
    pub const BATCH_SEGMENT: &'static str = "$batch";

    /// Route segment to append after the OData prefix.
    pub fn route(&self) -> &str {
        match self {
            CompiledRequest::Single(descriptor) => &descriptor.name,
            CompiledRequest::Batch(_) => Self::BATCH_SEGMENT,
        }
    }

    pub fn method(&self) -> Method {
        match self {
            CompiledRequest::Single(descriptor) => descriptor.method.clone(),
            CompiledRequest::Batch(_) => Method::POST,
        }
    }

    pub fn query_string(&self) -> &str {
        match self {
            CompiledRequest::Single(descriptor) => &descriptor.query_string,
            CompiledRequest::Batch(_) => "",
        }
    }

    pub fn body(&self) -> Result<Option<Vec<u8>>, serde_json::Error> {
        match self {
            CompiledRequest::Single(descriptor) => descriptor
                .body
                .as_ref()
                .map(serde_json::to_vec)
                .transpose(),
            CompiledRequest::Batch(envelope) => serde_json::to_vec(envelope).map(Some),
        }
    }
}

/// The compiled downstream request together with the response keys of the root
/// fields it was compiled from, in request order.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledOperation {
    pub request: CompiledRequest,
    pub correlation: Vec<String>,
}

impl CompiledOperation {
    pub fn is_batch(&self) -> bool {
        matches!(self.request, CompiledRequest::Batch(_))
    }
}

impl Display for RequestDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} {}", self.method, self.url())?;
        if let Some(body) = &self.body {
            write!(f, " {}", body)?;
        }
        Ok(())
    }
}

impl Display for CompiledOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.request {
            CompiledRequest::Single(descriptor) => writeln!(f, "{}", descriptor)?,
            CompiledRequest::Batch(envelope) => {
                writeln!(f, "POST {}", CompiledRequest::BATCH_SEGMENT)?;
                for item in &envelope.requests {
                    write!(f, "  {}: {} {}", item.id, item.method, item.url)?;
                    if let Some(body) = &item.body {
                        write!(f, " {}", body)?;
                    }
                    writeln!(f)?;
                }
            }
        }
        write!(f, "correlation: [{}]", self.correlation.join(", "))
    }
}
