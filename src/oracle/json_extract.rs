/// Returns the first balanced JSON object embedded in `text`.
///
/// LLM replies wrap their JSON in markdown fences, prose, or both; a
/// balanced-brace scan handles every wrapping the same way, so the
/// parser never needs to know about fence markers.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &byte) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_object_is_returned_whole() {
        let text = r#"{"ready": true, "recommendation_score": 85}"#;
        assert_eq!(extract_json_object(text), Some(text));
    }

    #[test]
    fn unwraps_json_fence() {
        let text = "```json\n{\"ready\": false}\n```";
        assert_eq!(extract_json_object(text), Some("{\"ready\": false}"));
    }

    #[test]
    fn unwraps_anonymous_fence_with_prose() {
        let text = "Here is my analysis:\n```\n{\"selected_urls\": [\"a\"]}\n```\nHope it helps!";
        assert_eq!(
            extract_json_object(text),
            Some("{\"selected_urls\": [\"a\"]}")
        );
    }

    #[test]
    fn nested_objects_and_braces_in_strings() {
        let text = r#"noise {"contacts": [{"name": "J {D}", "email": "j@x.io"}]} trailing"#;
        let extracted = extract_json_object(text).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(extracted).unwrap();
        assert_eq!(parsed["contacts"][0]["name"], "J {D}");
    }

    #[test]
    fn escaped_quotes_inside_strings() {
        let text = r#"{"reasoning": "site says \"we sell\" a lot"}"#;
        assert_eq!(extract_json_object(text), Some(text));
    }

    #[test]
    fn unbalanced_input_yields_nothing() {
        assert_eq!(extract_json_object("{\"ready\": tru"), None);
        assert_eq!(extract_json_object("no json here at all"), None);
    }
}
