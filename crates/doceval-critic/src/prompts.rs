/// Prompt templates for the scorer and the QA generator
pub struct CriticPrompts;

impl CriticPrompts {
    /// Build the clarity evaluation prompt
    pub fn build_evaluation_prompt(document: &str) -> String {
        format!(
            r#"You are an expert technical editor grading documentation for CLARITY.

## Document
```markdown
{document}
```

---

## Evaluation Steps

1. Read the whole document before judging any part of it.
2. Check that the purpose of the document is stated early and is easy to find.
3. Check that terms, acronyms and prerequisites are explained before they are relied on.
4. Check that instructions are ordered, unambiguous and can be followed without guessing.
5. Check that sentences are concise and headings, lists and examples support the reader.
6. Note every passage a first-time reader would have to re-read to understand.

## Scoring

Give an integer score from 0 to 10:

- 0-2: very unclear, needs a full rewrite
- 3-4: hard to follow, needs significant work
- 5-6: understandable but with clear room for improvement
- 7-8: clear, with minor issues
- 9-10: exceptionally clear

The reason must be concrete, actionable feedback a writer can apply directly: name the
passages that are unclear and say how to fix them.

## Output Format

End your response with exactly one evaluation block:

<evaluation>
{{"score": <0-10>, "reason": "<actionable feedback>"}}
</evaluation>
"#
        )
    }

    /// Build the prompt asking for question/answer pairs about a document
    pub fn build_qa_prompt(document: &str, count: usize) -> String {
        format!(
            r#"Generate {count} diverse questions with ideal answers based on the following documentation.

Respond ONLY with a valid JSON array, with no introduction or trailing comments. Format:

[
  {{"input": "...", "ideal": "..."}},
  ...
]

Documentation:
{document}
"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_prompt_embeds_document() {
        let prompt = CriticPrompts::build_evaluation_prompt("# Install\nRun make.");
        assert!(prompt.contains("# Install\nRun make."));
        assert!(prompt.contains("<evaluation>"));
        assert!(prompt.contains(r#"{"score": <0-10>"#));
    }

    #[test]
    fn test_qa_prompt_requests_count() {
        let prompt = CriticPrompts::build_qa_prompt("doc body", 5);
        assert!(prompt.starts_with("Generate 5 diverse questions"));
        assert!(prompt.contains(r#"{"input": "...", "ideal": "..."}"#));
        assert!(prompt.ends_with("doc body\n"));
    }
}
