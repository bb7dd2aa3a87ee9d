//! Initial answers of a rendered form

use serde_json::Value;

use crate::domain::aggregates::Question;
use crate::domain::value_objects::QuestionType;

use super::validation::Answers;

/// Empty answer for the question's control
pub fn type_default(question: &Question) -> Value {
    match question.kind {
        QuestionType::Number | QuestionType::Range => Value::from(0),
        QuestionType::Select if question.is_multi_select() => Value::Array(vec![]),
        _ => Value::String(String::new()),
    }
}

/// Pre-filled value if present, else the type default
pub fn initial_answer(question: &Question) -> Value {
    question
        .value
        .as_ref()
        .map(|v| v.to_json())
        .unwrap_or_else(|| type_default(question))
}

/// Starting values for every visible question
pub fn initial_answers(questions: &[Question]) -> Answers {
    questions
        .iter()
        .filter(|q| !q.hidden)
        .map(|q| (q.id.to_string(), initial_answer(q)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::FieldEdit;
    use crate::domain::value_objects::QuestionValue;
    use serde_json::json;

    #[test]
    fn test_type_defaults() {
        assert_eq!(type_default(&Question::new(QuestionType::Email)), json!(""));
        assert_eq!(type_default(&Question::new(QuestionType::Number)), json!(0));

        let mut multi = Question::new(QuestionType::Select);
        assert_eq!(type_default(&multi), json!(""));
        multi.apply(FieldEdit::Multi(true));
        assert_eq!(type_default(&multi), json!([]));
    }

    #[test]
    fn test_prefilled_value_wins_and_hidden_skipped() {
        let mut named = Question::new(QuestionType::Text);
        named.value = Some(QuestionValue::Text("Ada".into()));
        let mut hidden = Question::new(QuestionType::Text);
        hidden.hidden = true;

        let answers = initial_answers(&[named.clone(), hidden.clone()]);
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[named.id.as_str()], json!("Ada"));
    }
}
