//! Prompt construction for each generation strategy

/// Build the question/answer instruction for a subject, topic and subtopic
///
/// Values are inserted as-is: no escaping and no length limits.
pub fn build_qa_prompt(subject: &str, topic: &str, subtopic: &str) -> String {
    format!(
        "You are a Question-answer generator assistant.\n\
        Your role is to provide the question on given subject: {subject}, topic: {topic} and subtopic: {subtopic}.\n\
        Also provide the solution for the question."
    )
}

/// Free-form prompts are forwarded unchanged
pub fn build_freeform_prompt(prompt: &str) -> &str {
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_qa_prompt_exact_text() {
        let prompt = build_qa_prompt("Math", "Algebra", "Linear Equations");
        assert_eq!(
            prompt,
            "You are a Question-answer generator assistant.\n\
            Your role is to provide the question on given subject: Math, topic: Algebra and subtopic: Linear Equations.\n\
            Also provide the solution for the question."
        );
    }

    #[test]
    fn test_qa_prompt_does_not_expand_placeholders_in_values() {
        let prompt = build_qa_prompt("{topic}", "T", "{subject}");
        assert!(prompt.contains("subject: {topic}, topic: T and subtopic: {subject}."));
    }

    #[test]
    fn test_qa_prompt_keeps_markup_verbatim() {
        let prompt = build_qa_prompt("<b>", "\"quoted\"", "a & b");
        assert!(prompt.contains("<b>"));
        assert!(prompt.contains("\"quoted\""));
        assert!(prompt.contains("a & b"));
    }

    #[test]
    fn test_freeform_prompt_is_identity() {
        assert_eq!(build_freeform_prompt("Explain gravity"), "Explain gravity");
        assert_eq!(build_freeform_prompt(""), "");
    }

    proptest! {
        #[test]
        fn prop_freeform_identity(p in ".*") {
            prop_assert_eq!(build_freeform_prompt(&p), p.as_str());
        }

        #[test]
        fn prop_qa_prompt_embeds_values_verbatim(
            subject in ".{0,40}",
            topic in ".{0,40}",
            subtopic in ".{0,40}",
        ) {
            let first = build_qa_prompt(&subject, &topic, &subtopic);
            let second = build_qa_prompt(&subject, &topic, &subtopic);
            prop_assert_eq!(&first, &second);

            let needle = format!("subject: {subject}, topic: {topic} and subtopic: {subtopic}.\n");
            prop_assert!(first.contains(&needle));
            prop_assert!(first.starts_with("You are a Question-answer generator assistant.\n"));
        }
    }
}
