use indoc::formatdoc;
use serde_json::json;

use crate::results::Passage;

/// Formats the summarization prompt over the question and the retrieved
/// passages. The wording is fixed; only the JSON payload varies.
#[must_use]
pub fn build_prompt(question: &str, passages: &[Passage]) -> String {
    formatdoc!(
        "Given the following extracts of documents retrieved from a media archive, write a concise answer to the provided question.
        Base the answer only on the extracts and mention which source urls support its main points.
        If the extracts don't answer the question, say so plainly. Don't try to make up an answer.
    INPUT: {}
    OUTPUT:",
        json!({
            "question": question,
            "documents": passages,
        })
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_the_question_and_every_source_url() {
        let passages = vec![
            Passage {
                text: "Grain exports resumed through the corridor.".to_string(),
                url: "https://example.org/grain".to_string(),
            },
            Passage {
                text: "Ports remain blocked according to officials.".to_string(),
                url: "https://example.org/ports".to_string(),
            },
        ];

        let prompt = build_prompt("What happened to grain exports?", &passages);

        assert!(prompt.starts_with("Given the following extracts"));
        assert!(prompt.contains("What happened to grain exports?"));
        assert!(prompt.contains("https://example.org/grain"));
        assert!(prompt.contains("https://example.org/ports"));
        assert!(prompt.contains("INPUT:"));
        assert!(prompt.trim_end().ends_with("OUTPUT:"));
    }

    #[test]
    fn the_payload_is_well_formed_json() {
        let passages = vec![Passage {
            text: "A \"quoted\" claim.".to_string(),
            url: "https://example.org/q".to_string(),
        }];

        let prompt = build_prompt("Any \"quotes\"?", &passages);
        let start = prompt.find("INPUT:").unwrap() + "INPUT:".len();
        let end = prompt.rfind("OUTPUT:").unwrap();

        let value: serde_json::Value = serde_json::from_str(prompt[start..end].trim()).unwrap();

        assert_eq!(value["question"], "Any \"quotes\"?");
        assert_eq!(value["documents"][0]["url"], "https://example.org/q");
    }
}
