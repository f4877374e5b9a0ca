//! Input checks shared by the screens and the transition function

use thiserror::Error;

pub const MIN_PROMPT_CHARS: usize = 10;
pub const MIN_CONTINUATION_CHARS: usize = 3;
pub const MIN_INITIAL_QUESTION_CHARS: usize = 5;
pub const MIN_QUESTION_CHARS: usize = 3;

/// A field-level problem with what the child typed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please tell us what kind of story you'd like to hear!")]
    EmptyPrompt,
    #[error("Please give us a bit more detail about your story idea!")]
    PromptTooShort,
    #[error("Please tell us what happens next!")]
    EmptyContinuation,
    #[error("Please give us a bit more detail!")]
    ContinuationTooShort,
    #[error("Please give us a bit more detail about your question!")]
    InitialQuestionTooShort,
    #[error("Please ask me a question!")]
    EmptyQuestion,
    #[error("Please give me a bit more detail!")]
    QuestionTooShort,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Returns the trimmed prompt
pub fn story_prompt(prompt: &str) -> Result<&str, ValidationError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(ValidationError::EmptyPrompt);
    }
    if char_len(prompt) < MIN_PROMPT_CHARS {
        return Err(ValidationError::PromptTooShort);
    }
    Ok(prompt)
}

/// Returns the trimmed continuation
pub fn story_continuation(input: &str) -> Result<&str, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::EmptyContinuation);
    }
    if char_len(input) < MIN_CONTINUATION_CHARS {
        return Err(ValidationError::ContinuationTooShort);
    }
    Ok(input)
}

/// The opening question is optional; blank means none
pub fn initial_question(question: Option<&str>) -> Result<Option<&str>, ValidationError> {
    match question.map(str::trim) {
        None | Some("") => Ok(None),
        Some(q) if char_len(q) < MIN_INITIAL_QUESTION_CHARS => {
            Err(ValidationError::InitialQuestionTooShort)
        }
        Some(q) => Ok(Some(q)),
    }
}

/// Returns the trimmed question
pub fn tutor_question(question: &str) -> Result<&str, ValidationError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(ValidationError::EmptyQuestion);
    }
    if char_len(question) < MIN_QUESTION_CHARS {
        return Err(ValidationError::QuestionTooShort);
    }
    Ok(question)
}
