//! MMI/EMMA envelope decoder
//!
//! Parses the XML frames pushed by the interaction manager. Each frame holds
//! zero or more `<command>` elements whose text is a JSON object with a
//! `recognized` list (`["SPEECH" | "GESTURES" | "FUSION", ...]`). All
//! fragments of one frame collapse into a single [`RecognitionEvent`].

use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{AssistantError, AssistantResult};
use crate::event::{Entities, Modality, RecognitionEvent};
use crate::gesture;

/// Markers of our own speech output echoed back, or IM acknowledgements
const ECHO_MARKERS: &[&str] = &["target=\"SPEECHOUT\"", "startResponse"];

/// Transport-level keep-alive frames
const KEEPALIVE_FRAMES: &[&str] = &["OK", "RENEW"];

/// Confidence used when a fragment does not carry one
const DEFAULT_CONFIDENCE: f32 = 1.0;

/// True for frames that must never be interpreted as user input.
///
/// Checked on the raw text before any parsing so our own TTS requests can't
/// loop back in as commands.
pub fn is_echo_or_ack(envelope: &str) -> bool {
    let trimmed = envelope.trim();
    trimmed.is_empty()
        || KEEPALIVE_FRAMES.contains(&trimmed)
        || ECHO_MARKERS.iter().any(|m| envelope.contains(m))
}

/// Decode an envelope into one recognition event.
///
/// Returns `None` for echo/ack frames, malformed XML or JSON, and frames from
/// which no intent could be resolved. Never fails past this boundary.
pub fn decode(envelope: &str) -> Option<RecognitionEvent> {
    if is_echo_or_ack(envelope) {
        debug!("Skipping echo/ack frame");
        return None;
    }

    match try_decode(envelope) {
        Ok(Some(event)) => {
            info!(
                "📥 Decoded {} intent '{}' ({:.2}) entities {}",
                event.modality.tag(),
                event.intent,
                event.confidence,
                event.entities
            );
            Some(event)
        }
        Ok(None) => {
            warn!("No intent resolved from envelope");
            None
        }
        Err(e) => {
            warn!("⚠️ Dropping malformed envelope: {}", e);
            None
        }
    }
}

fn try_decode(envelope: &str) -> AssistantResult<Option<RecognitionEvent>> {
    let mut resolution = Resolution::default();

    for fragment in command_fragments(envelope)? {
        let command: Value = serde_json::from_str(fragment.trim())?;
        resolution.apply(&command)?;
    }

    Ok(resolution.into_event())
}

/// Collect the text of every `<command>` element in document order
fn command_fragments(xml: &str) -> AssistantResult<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut fragments = Vec::new();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"command" => {
                current = Some(String::new());
            }
            Event::End(e) if e.local_name().as_ref() == b"command" => {
                if let Some(text) = current.take() {
                    fragments.push(text);
                }
            }
            Event::Text(t) => {
                if let Some(text) = current.as_mut() {
                    text.push_str(&t.unescape()?);
                }
            }
            Event::CData(c) => {
                if let Some(text) = current.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if current.is_some() {
        return Err(AssistantError::Decode(
            "unterminated <command> element".to_string(),
        ));
    }

    Ok(fragments)
}

/// Accumulates fragments of one envelope.
///
/// Priority: FUSION overwrites any intent, GESTURES and SPEECH only fill an
/// empty slot.
#[derive(Debug, Default)]
struct Resolution {
    intent: Option<(String, Modality, f32)>,
    entities: Entities,
    text: String,
    nlu: Option<Value>,
}

impl Resolution {
    fn apply(&mut self, command: &Value) -> AssistantResult<()> {
        let recognized = match command.get("recognized").and_then(Value::as_array) {
            Some(list) if !list.is_empty() => list,
            _ => {
                debug!("Fragment without 'recognized' list ignored");
                return Ok(());
            }
        };

        let tag = recognized[0].as_str().unwrap_or_default();
        let payload = recognized
            .get(1)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty());

        match tag {
            "FUSION" => {
                if let Some(intent) = payload {
                    // Without its own confidence, FUSION keeps the one already resolved
                    let confidence = match parse_confidence(command.get("confidence"))? {
                        Some(confidence) => confidence,
                        None => self
                            .intent
                            .as_ref()
                            .map(|(_, _, confidence)| *confidence)
                            .unwrap_or(DEFAULT_CONFIDENCE),
                    };
                    self.intent = Some((intent.to_string(), Modality::Fusion, confidence));
                }
            }
            "GESTURES" => {
                if let Some(code) = payload {
                    let code = code.to_lowercase();
                    self.entities.insert("gesture", code.clone());
                    let confidence = parse_confidence(command.get("confidence"))?
                        .unwrap_or(DEFAULT_CONFIDENCE);
                    if self.intent.is_none() {
                        let intent = gesture::normalize(&code);
                        debug!("Gesture '{}' -> intent '{}'", code, intent);
                        self.intent = Some((intent, Modality::Gesture, confidence));
                    }
                }
            }
            "SPEECH" => self.apply_speech(command)?,
            other => debug!("Ignoring fragment with modality tag '{}'", other),
        }

        Ok(())
    }

    fn apply_speech(&mut self, command: &Value) -> AssistantResult<()> {
        let nlu = match command.get("nlu") {
            Some(Value::String(encoded)) => serde_json::from_str::<Value>(encoded)?,
            Some(value @ Value::Object(_)) => value.clone(),
            Some(Value::Null) | None => {
                debug!("SPEECH fragment without NLU payload");
                return Ok(());
            }
            Some(other) => {
                return Err(AssistantError::Decode(format!(
                    "unexpected NLU payload: {}",
                    other
                )))
            }
        };

        if self.intent.is_none() {
            let name = nlu
                .pointer("/intent/name")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if !name.is_empty() {
                let confidence = parse_confidence(nlu.pointer("/intent/confidence"))?
                    .unwrap_or(DEFAULT_CONFIDENCE);
                self.intent = Some((name.to_string(), Modality::Speech, confidence));
            }
        }

        if let Some(text) = nlu.get("text").and_then(Value::as_str) {
            self.text = text.to_string();
        }

        if let Some(entities) = nlu.get("entities").and_then(Value::as_array) {
            for entity in entities {
                let key = entity.get("entity").and_then(Value::as_str);
                let value = entity.get("value").and_then(value_as_text);
                if let (Some(key), Some(value)) = (key, value) {
                    if !key.is_empty() && !value.is_empty() {
                        self.entities.insert(key, value);
                    }
                }
            }
        }

        self.nlu = Some(nlu);
        Ok(())
    }

    fn into_event(self) -> Option<RecognitionEvent> {
        let (intent, modality, confidence) = self.intent?;
        let mut event = RecognitionEvent::new(modality, intent, confidence);
        event.entities = self.entities;
        event.raw_text = self.text;
        event.nlu = self.nlu;
        Some(event)
    }
}

/// A `confidence` member, as number or numeric string.
///
/// `Ok(None)` only when the member is absent. Null, non-numeric and
/// non-finite values are malformed and drop the envelope.
fn parse_confidence(value: Option<&Value>) -> AssistantResult<Option<f32>> {
    let value = match value {
        Some(value) => value,
        None => return Ok(None),
    };

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(confidence) if confidence.is_finite() => Ok(Some(confidence as f32)),
        _ => Err(AssistantError::Decode(format!(
            "malformed confidence: {}",
            value
        ))),
    }
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(commands: &[&str]) -> String {
        let body: String = commands
            .iter()
            .map(|c| format!("<command>{}</command>", c))
            .collect();
        format!(
            r#"<mmi:mmi xmlns:mmi="http://www.w3.org/2008/04/mmi-arch" mmi:version="1.0"><mmi:extensionNotification mmi:source="IM" mmi:target="APP"><mmi:data><emma:emma xmlns:emma="http://www.w3.org/2003/04/emma"><emma:interpretation emma:mode="command">{}</emma:interpretation></emma:emma></mmi:data></mmi:extensionNotification></mmi:mmi>"#,
            body
        )
    }

    #[test]
    fn test_echo_and_ack_frames_are_dropped() {
        assert!(decode("OK").is_none());
        assert!(decode(" RENEW ").is_none());
        assert!(decode("").is_none());

        let echo = wrap(&[r#"{"recognized":["FUSION","zoom_in"]}"#])
            .replace("mmi:target=\"APP\"", "mmi:target=\"SPEECHOUT\"");
        assert!(is_echo_or_ack(&echo));
        assert!(decode(&echo).is_none());

        let ack = r#"<mmi:mmi><mmi:startResponse mmi:status="success"/></mmi:mmi>"#;
        assert!(decode(ack).is_none());
    }

    #[test]
    fn test_gesture_fragment() {
        let env = wrap(&[r#"{"recognized": ["GESTURES", "ZOOMI"], "confidence": "0.95"}"#]);
        let event = decode(&env).expect("gesture should decode");
        assert_eq!(event.intent, "gesture_zoom_in");
        assert_eq!(event.modality, Modality::Gesture);
        assert!((event.confidence - 0.95).abs() < 1e-6);
        assert_eq!(event.entities.get("gesture"), Some("zoomi"));
    }

    #[test]
    fn test_fusion_wins_over_gesture() {
        let env = wrap(&[
            r#"{"recognized":["GESTURES","swipell"]}"#,
            r#"{"recognized":["FUSION","search_location"]}"#,
        ]);
        let event = decode(&env).unwrap();
        assert_eq!(event.intent, "search_location");
        assert_eq!(event.modality, Modality::Fusion);
        assert_eq!(event.entities.get("gesture"), Some("swipell"));
    }

    #[test]
    fn test_gesture_wins_over_later_speech() {
        let env = wrap(&[
            r#"{"recognized":["GESTURES","thumbsup"]}"#,
            r#"{"recognized":["SPEECH","nao"],"nlu":{"intent":{"name":"deny","confidence":0.9},"text":"não"}}"#,
        ]);
        let event = decode(&env).unwrap();
        assert_eq!(event.intent, "affirm");
        assert_eq!(event.raw_text, "não");
    }

    #[test]
    fn test_speech_with_double_encoded_nlu() {
        let nlu = r#"{"intent":{"name":"get_directions","confidence":0.82},"text":"directions to Porto by car","entities":[{"entity":"destination","value":"Lisboa"},{"entity":"transport_mode","value":"car"},{"entity":"destination","value":"Porto"}]}"#;
        let command = serde_json::json!({"recognized": ["SPEECH", "x"], "nlu": nlu}).to_string();
        let event = decode(&wrap(&[&command])).unwrap();

        assert_eq!(event.modality, Modality::Speech);
        assert_eq!(event.intent, "get_directions");
        assert!((event.confidence - 0.82).abs() < 1e-6);
        assert_eq!(event.raw_text, "directions to Porto by car");
        assert_eq!(event.entities.get("destination"), Some("Porto"));
        assert_eq!(event.entities.get("transport_mode"), Some("car"));
        assert!(event.nlu.is_some());
    }

    #[test]
    fn test_speech_confidence_defaults_to_one() {
        let env = wrap(&[r#"{"recognized":["SPEECH"],"nlu":{"intent":{"name":"greet"}}}"#]);
        let event = decode(&env).unwrap();
        assert_eq!(event.confidence, 1.0);
    }

    #[test]
    fn test_escaped_command_text() {
        let env = wrap(&[r#"{&quot;recognized&quot;:[&quot;FUSION&quot;,&quot;help&quot;]}"#]);
        assert_eq!(decode(&env).unwrap().intent, "help");
    }

    #[test]
    fn test_unresolved_and_malformed_fail_closed() {
        assert!(decode(&wrap(&[r#"{"recognized":[]}"#])).is_none());
        assert!(decode(&wrap(&[r#"{"recognized":["SPEECH"],"nlu":{"text":"hmm"}}"#])).is_none());
        assert!(decode(&wrap(&["{ not json"])).is_none());
        assert!(decode(&wrap(&[r#"{"recognized":["SPEECH"],"nlu":"{broken"}"#])).is_none());
        assert!(decode("<mmi><command>{\"recognized\":[\"FUSION\",\"help\"]}</mmi>").is_none());
        assert!(decode("plain text, not xml").is_none());
    }

    #[test]
    fn test_non_finite_or_junk_confidence_drops_envelope() {
        for raw in [r#""NaN""#, r#""nan""#, r#""inf""#, r#""-inf""#, r#""high""#, "null"] {
            let gesture = format!(r#"{{"recognized":["GESTURES","zoomi"],"confidence":{}}}"#, raw);
            assert!(decode(&wrap(&[gesture.as_str()])).is_none(), "gesture confidence {}", raw);

            let fusion = format!(r#"{{"recognized":["FUSION","zoom_in"],"confidence":{}}}"#, raw);
            assert!(decode(&wrap(&[fusion.as_str()])).is_none(), "fusion confidence {}", raw);

            let speech = format!(
                r#"{{"recognized":["SPEECH"],"nlu":{{"intent":{{"name":"start_navigation","confidence":{}}}}}}}"#,
                raw
            );
            assert!(decode(&wrap(&[speech.as_str()])).is_none(), "nlu confidence {}", raw);
        }
    }

    #[test]
    fn test_numeric_string_confidence_on_both_paths() {
        let speech = wrap(&[
            r#"{"recognized":["SPEECH"],"nlu":{"intent":{"name":"start_navigation","confidence":" 0.3 "}}}"#,
        ]);
        assert!((decode(&speech).unwrap().confidence - 0.3).abs() < 1e-6);

        let gesture = wrap(&[r#"{"recognized":["GESTURES","zoomi"],"confidence":"0.3"}"#]);
        assert!((decode(&gesture).unwrap().confidence - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_fusion_without_confidence_keeps_speech_confidence() {
        let speech = r#"{"recognized":["SPEECH"],"nlu":{"intent":{"name":"get_directions","confidence":0.4},"text":"go there"}}"#;

        let env = wrap(&[speech, r#"{"recognized":["FUSION","start_navigation"]}"#]);
        let event = decode(&env).unwrap();
        assert_eq!(event.intent, "start_navigation");
        assert_eq!(event.modality, Modality::Fusion);
        assert!((event.confidence - 0.4).abs() < 1e-6);

        let env = wrap(&[
            speech,
            r#"{"recognized":["FUSION","start_navigation"],"confidence":0.9}"#,
        ]);
        assert!((decode(&env).unwrap().confidence - 0.9).abs() < 1e-6);

        let env = wrap(&[r#"{"recognized":["FUSION","help"]}"#]);
        assert_eq!(decode(&env).unwrap().confidence, 1.0);
    }
}
