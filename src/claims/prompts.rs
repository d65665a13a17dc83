use serde_json::{Value, json};

/// Claim extraction prompt. `{TEXT}` is substituted with the joined transcript.
pub const CLAIMS_PROMPT_TEXT: &str = r#"
Find the main claims made in the provided text.
Include any claims that are significant to the overall narrative of the text.
Include no more than 20 of the most significant claims.

Return a json list of claims in the following format:
{
    "claim": <claim being made. Do not change the meaning of the claim, but rephrase to make the claim clear without context.>,
    "original_text": <the original sentence, exactly as it appears in the input, containing the claim>
}

Here is the text:
```
{TEXT}
```
"#;

/// Follow-up asking the model to repair a malformed claim list. `{INPUT_TEXT}` is substituted.
pub const FIX_CLAIMS_JSON: &str = r#"This JSON string is not quite in the correct format.
The format should be a list of objects, each with exactly the keys "claim" and "original_text", both strings:
[
    {"claim": "a claim", "original_text": "the sentence containing it"},
    ...
]
Please fix this broken json, returning only a correctly json formatted string:
{INPUT_TEXT}"#;

/// Response schema constraining the extraction reply.
pub fn claims_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "claim": {
                    "type": "string",
                    "description": "claim being made. Do not change the meaning of the claim, but rephrase to make the claim clear without context."
                },
                "original_text": {
                    "type": "string",
                    "description": "The original sentence containing the claim, exactly as it appears in the text"
                }
            },
            "required": ["claim", "original_text"]
        }
    })
}
