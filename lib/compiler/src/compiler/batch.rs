use tracing::debug;

use crate::ast::SelectionNode;
use crate::compiler::visitor::compile_root_field;
use crate::compiler::CompileContext;
use crate::descriptor::{BatchEnvelope, BatchItem, CompiledOperation, CompiledRequest};
use crate::error::CompileError;

/// Bundles several root fields into one `$batch` request.
///
/// Items get 1-based ids in field order, and the correlation list records each
/// field's response key at the same position.
pub fn compile_batch(
    ctx: &CompileContext<'_>,
    roots: &[&SelectionNode],
) -> Result<CompiledOperation, CompileError> {
    let mut envelope = BatchEnvelope {
        requests: Vec::with_capacity(roots.len()),
    };
    let mut correlation = Vec::with_capacity(roots.len());

    for (index, root) in roots.iter().enumerate() {
        let descriptor = compile_root_field(ctx, root)?;
        envelope
            .requests
            .push(BatchItem::from_descriptor(index + 1, descriptor));
        correlation.push(root.response_key().to_string());
    }

    debug!(requests = envelope.requests.len(), "compiled batch request");

    Ok(CompiledOperation {
        request: CompiledRequest::Batch(envelope),
        correlation,
    })
}
