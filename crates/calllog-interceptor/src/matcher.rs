//! Scope matching for the handler group.

use calllog_config::InterceptorConfig;

/// Decides whether a handler invocation is wrapped.
///
/// A type belongs to the handler group when the package segment directly
/// containing it equals the handler segment (`*.controller.InvoiceHandler`).
/// An operation is excluded when its name contains any exclusion marker,
/// compared case-sensitively as a plain substring. That rule is coarse:
/// `reupload` and `uploadedCount` are excluded too.
#[derive(Debug, Clone)]
pub struct ScopeMatcher {
    separator: String,
    handler_segment: String,
    exclusion_markers: Vec<String>,
}

impl ScopeMatcher {
    /// Creates a matcher with no exclusion markers.
    pub fn new(separator: impl Into<String>, handler_segment: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            handler_segment: handler_segment.into(),
            exclusion_markers: Vec::new(),
        }
    }

    /// Creates a matcher from interceptor configuration.
    #[must_use]
    pub fn from_config(config: &InterceptorConfig) -> Self {
        Self {
            separator: config.separator.clone(),
            handler_segment: config.handler_segment.clone(),
            exclusion_markers: config.exclusion_markers.clone(),
        }
    }

    /// Adds an exclusion marker.
    #[must_use]
    pub fn with_exclusion_marker(mut self, marker: impl Into<String>) -> Self {
        self.exclusion_markers.push(marker.into());
        self
    }

    /// Returns true if the type sits directly inside the handler package.
    #[must_use]
    pub fn is_handler(&self, type_name: &str) -> bool {
        let mut segments = type_name.rsplit(self.separator.as_str());
        // Simple type name
        segments.next();
        segments.next() == Some(self.handler_segment.as_str())
    }

    /// Returns true if the operation name contains an exclusion marker.
    #[must_use]
    pub fn is_excluded(&self, operation: &str) -> bool {
        self.exclusion_markers
            .iter()
            .any(|marker| operation.contains(marker.as_str()))
    }

    /// Returns true if the invocation is in scope.
    #[must_use]
    pub fn matches(&self, type_name: &str, operation: &str) -> bool {
        self.is_handler(type_name) && !self.is_excluded(operation)
    }
}
