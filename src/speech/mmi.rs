//! MMI speech request encoding
//!
//! Outbound text is wrapped in SSML, escaped, and carried in the EMMA
//! `<command>` of an `mmi:startRequest` addressed to the IM.

use quick_xml::escape::escape;

const SSML_NS: &str = "http://www.w3.org/2001/10/synthesis";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SSML_SCHEMA: &str =
    "http://www.w3.org/2001/10/synthesis http://www.w3.org/TR/speech-synthesis/synthesis.xsd";

/// SSML document for one utterance
pub fn ssml(text: &str, language: &str) -> String {
    format!(
        r#"<speak version="1.0" xmlns="{}" xmlns:xsi="{}" xsi:schemaLocation="{}" xml:lang="{}"><p>{}</p></speak>"#,
        SSML_NS,
        XSI_NS,
        SSML_SCHEMA,
        escape(language),
        escape(text)
    )
}

/// Full `mmi:startRequest` frame asking the IM to speak `text`
pub fn encode_speech_request(text: &str, language: &str) -> String {
    let document = ssml(text, language);
    format!(
        concat!(
            r#"<mmi:mmi xmlns:mmi="http://www.w3.org/2008/04/mmi-arch" mmi:version="1.0">"#,
            r#"<mmi:startRequest mmi:context="ctx-1" mmi:requestId="text-1" mmi:source="APPSPEECH" mmi:target="IM">"#,
            r#"<mmi:data>"#,
            r#"<emma:emma xmlns:emma="http://www.w3.org/2003/04/emma" emma:version="1.0">"#,
            r#"<emma:interpretation emma:confidence="1" emma:id="text-" emma:medium="text" emma:mode="command" emma:start="0">"#,
            r#"<command>{}</command>"#,
            r#"</emma:interpretation>"#,
            r#"</emma:emma>"#,
            r#"</mmi:data>"#,
            r#"</mmi:startRequest>"#,
            r#"</mmi:mmi>"#
        ),
        escape(document.as_str())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope;

    #[test]
    fn test_request_shape() {
        let frame = encode_speech_request("Hello", "en-US");
        assert!(frame.contains(r#"mmi:source="APPSPEECH""#));
        assert!(frame.contains(r#"mmi:target="IM""#));
        assert!(frame.contains("&lt;p&gt;Hello&lt;/p&gt;"));
        assert!(frame.contains("xml:lang=&quot;en-US&quot;"));
    }

    #[test]
    fn test_text_is_escaped_twice() {
        let frame = encode_speech_request("Fish & <chips>", "en-US");
        assert!(frame.contains("Fish &amp;amp; &amp;lt;chips&amp;gt;"));
        assert!(!frame.contains("<chips>"));
    }

    #[test]
    fn test_own_request_is_not_a_recognition() {
        let frame = encode_speech_request("Should I start navigation?", "en-US");
        assert!(envelope::decode(&frame).is_none());
    }
}
