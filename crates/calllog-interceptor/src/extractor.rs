//! Request metadata and argument extraction.

use crate::{InterceptedCall, Parameter};
use calllog_config::InterceptorConfig;
use calllog_core::{
    ArgValue, CallLogError, CallLogResult, RequestContextAccessor, ValueSerializer,
};
use std::sync::Arc;
use tracing::debug;

/// Derives the module name from a fully qualified type name.
///
/// Strips `prefix` and returns the text up to the next `separator`.
/// `org.example.billing.controller.InvoiceHandler` with prefix `org.example.`
/// yields `billing`.
pub fn derive_module(type_name: &str, prefix: &str, separator: &str) -> CallLogResult<String> {
    let derivation_error = || CallLogError::module_derivation(type_name, prefix);

    let rest = type_name.strip_prefix(prefix).ok_or_else(derivation_error)?;
    let (module, _) = rest.split_once(separator).ok_or_else(derivation_error)?;
    if module.is_empty() {
        return Err(derivation_error());
    }

    Ok(module.to_string())
}

/// Builds an [`InterceptedCall`] from the active request and the target invocation.
#[derive(Clone)]
pub struct MetadataExtractor {
    base_prefix: String,
    separator: String,
    unknown_module: String,
    context: Arc<dyn RequestContextAccessor>,
    serializer: Arc<dyn ValueSerializer>,
}

impl MetadataExtractor {
    /// Creates a new extractor.
    pub fn new(
        config: &InterceptorConfig,
        context: Arc<dyn RequestContextAccessor>,
        serializer: Arc<dyn ValueSerializer>,
    ) -> Self {
        Self {
            base_prefix: config.base_prefix.clone(),
            separator: config.separator.clone(),
            unknown_module: config.unknown_module.clone(),
            context,
            serializer,
        }
    }

    /// Extracts request metadata, target identity and serialized arguments.
    ///
    /// Fails with `MissingRequestContext` outside a dispatched request and with
    /// `ParameterMismatch` when names and values differ in length. Module
    /// derivation and argument serialization never fail the call.
    pub fn extract(
        &self,
        type_name: &str,
        operation: &str,
        parameter_names: &[&str],
        arguments: &[ArgValue],
    ) -> CallLogResult<InterceptedCall> {
        let request = self.context.current_request()?;

        if parameter_names.len() != arguments.len() {
            return Err(CallLogError::ParameterMismatch {
                names: parameter_names.len(),
                values: arguments.len(),
            });
        }

        let module_name = self.module_name(type_name);

        let parameters = parameter_names
            .iter()
            .zip(arguments)
            .map(|(name, value)| Parameter::new(*name, self.serialize(name, value)))
            .collect();

        Ok(InterceptedCall {
            request,
            target_type_name: type_name.to_string(),
            target_operation_name: operation.to_string(),
            module_name,
            parameters,
            started_at: None,
            elapsed: None,
            failure: None,
        })
    }

    /// Derives the module, falling back to the unknown-module marker.
    #[must_use]
    pub fn module_name(&self, type_name: &str) -> String {
        derive_module(type_name, &self.base_prefix, &self.separator).unwrap_or_else(|e| {
            debug!(error = %e, "Module derivation failed");
            self.unknown_module.clone()
        })
    }

    fn serialize(&self, name: &str, value: &ArgValue) -> String {
        match self.serializer.serialize(value) {
            Ok(text) => text,
            Err(e) => {
                debug!(parameter = %name, error = %e, "Argument serialization failed");
                let reason = match e {
                    CallLogError::Serialization(reason) => reason,
                    other => other.to_string(),
                };
                format!("<unserializable: {}>", reason)
            }
        }
    }
}
