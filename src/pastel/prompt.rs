//! Question prompt construction and line-oriented answer parsing.
//!
//! The reply contract is one line per question, in order, shaped `<index>. <answer>`.

use crate::constants::{ANSWER_NO, ANSWER_UNSURE, ANSWER_YES};
use crate::parsing::{ParsingError, ParsingResult};

const QUESTION_PROMPT: &str = "
Your task is to answer a series of questions about a sentence. Ensure your answers are truthful and reliable.
You are expected to answer with 'Yes' or 'No' but you are also allowed to answer with 'Unsure' if you do not
have enough information or context to provide a reliable answer.
Your response should be limited to the question number and yes/no/unsure.
Example output:
0. Yes
1. Yes
2. No

Here are the questions:
[QUESTIONS]

Here is the sentence: ```[SENTENCE]```
";

/// Renders the prompt asking every question about `sentence`, numbered from 0.
pub fn build_prompt(sentence: &str, questions: &[&str]) -> String {
    let listing = questions
        .iter()
        .enumerate()
        .map(|(idx, q)| format!("Question {idx} {q}"))
        .collect::<Vec<_>>()
        .join("\n");
    QUESTION_PROMPT
        .replace("[QUESTIONS]", &listing)
        .replace("[SENTENCE]", sentence)
}

/// Maps a yes/no/other token to 1.0/0.0/0.5 by its first letter.
pub fn answer_value(token: &str) -> f64 {
    match token
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .chars()
        .next()
        .map(|c| c.to_ascii_lowercase())
    {
        Some('y') => ANSWER_YES,
        Some('n') => ANSWER_NO,
        _ => ANSWER_UNSURE,
    }
}

/// Parses one `<index>. <answer>` line into its numeric answer.
pub fn parse_answer_line(line: &str) -> ParsingResult<f64> {
    line.split_whitespace()
        .nth(1)
        .map(answer_value)
        .ok_or_else(|| ParsingError::MissingAnswerToken {
            line: line.to_string(),
        })
}

/// Parses a full reply into `(question, value)` pairs in question order.
///
/// Narration before the first line starting with `0` is dropped. The remaining line count
/// must equal the number of questions.
pub fn parse_response<'q>(raw: &str, questions: &[&'q str]) -> ParsingResult<Vec<(&'q str, f64)>> {
    let output = raw.trim().to_lowercase();
    let lines: Vec<&str> = output.lines().collect();
    let start = lines
        .iter()
        .position(|l| l.trim_start().starts_with('0'))
        .unwrap_or(0);
    let answers = &lines[start..];

    if answers.len() != questions.len() {
        return Err(ParsingError::LineCountMismatch {
            expected: questions.len(),
            actual: answers.len(),
            output: answers.join("\n"),
        });
    }

    questions
        .iter()
        .zip(answers)
        .map(|(q, line)| parse_answer_line(line).map(|v| (*q, v)))
        .collect()
}
