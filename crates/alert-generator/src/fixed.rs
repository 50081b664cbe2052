//! Fixed-value alert constructors that bypass sampling.

use alert_types::Alert;
use std::collections::HashMap;

/// The HIGH/api/timeout canary sent before a full process run.
pub fn boilerplate_alert() -> Alert {
    Alert::boilerplate()
}

/// The LOW/test-source/test-name alert sent first in test mode.
pub fn test_alert() -> Alert {
    Alert::test()
}

/// A single caller-specified alert with an empty context.
pub fn custom_alert(
    severity: impl Into<String>,
    source: impl Into<String>,
    name: impl Into<String>,
) -> Alert {
    Alert::new(severity, source, name, HashMap::new())
}

/// A single caller-specified alert with the given context entries.
pub fn custom_alert_with_context<I, K, V>(
    severity: impl Into<String>,
    source: impl Into<String>,
    name: impl Into<String>,
    context: I,
) -> Alert
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let context = context
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    Alert::new(severity, source, name, context)
}
