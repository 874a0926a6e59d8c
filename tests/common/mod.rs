#![allow(dead_code)]

pub mod mock_executor;
pub mod mock_sink;
pub mod spy_handler;

use std::sync::Arc;

use wayfinder::confirmation::StaleConfirmationPolicy;
use wayfinder::router::{DispatchPolicy, IntentRouter};
use wayfinder::{Assistant, HandlerRegistry};

pub use mock_executor::MockExecutor;
pub use mock_sink::MockSink;
pub use spy_handler::SpyHandler;

/// Wrap `<command>` payloads in an IM extension notification
pub fn envelope(commands: &[String]) -> String {
    let body: String = commands
        .iter()
        .map(|c| format!("<command>{}</command>", c))
        .collect();
    format!(
        concat!(
            r#"<mmi:mmi xmlns:mmi="http://www.w3.org/2008/04/mmi-arch" mmi:version="1.0">"#,
            r#"<mmi:extensionNotification mmi:source="IM" mmi:target="APP" mmi:context="ctx-1">"#,
            r#"<mmi:data><emma:emma xmlns:emma="http://www.w3.org/2003/04/emma" emma:version="1.0">"#,
            r#"<emma:interpretation emma:id="i1" emma:medium="acoustic" emma:mode="command">{}"#,
            r#"</emma:interpretation></emma:emma></mmi:data></mmi:extensionNotification></mmi:mmi>"#
        ),
        body
    )
}

pub fn gesture_command(code: &str, confidence: f32) -> String {
    serde_json::json!({ "recognized": ["GESTURES", code], "confidence": confidence }).to_string()
}

pub fn fusion_command(intent: &str) -> String {
    serde_json::json!({ "recognized": ["FUSION", intent] }).to_string()
}

pub fn speech_command(intent: &str, confidence: f32, text: &str, entities: &[(&str, &str)]) -> String {
    let entities: Vec<_> = entities
        .iter()
        .map(|(k, v)| serde_json::json!({ "entity": k, "value": v }))
        .collect();
    let nlu = serde_json::json!({
        "intent": { "name": intent, "confidence": confidence },
        "text": text,
        "entities": entities,
    });
    serde_json::json!({ "recognized": ["SPEECH", text], "nlu": nlu.to_string() }).to_string()
}

pub fn speech_envelope(intent: &str, confidence: f32) -> String {
    envelope(&[speech_command(intent, confidence, "", &[])])
}

/// Assistant over an explicit registry and a recording executor
pub fn assistant_with(
    registry: HandlerRegistry,
    executor: Arc<MockExecutor>,
    policy: StaleConfirmationPolicy,
) -> Assistant {
    let router = IntentRouter::new(Arc::new(registry), DispatchPolicy::default());
    Assistant::new(router, executor, policy)
}
