//! Question commands

use anyhow::bail;
use sase_forms::{FieldEdit, QuestionId, QuestionType, SchemaUseCases};
use serde::Serialize;
use tabled::Tabled;

use super::Context;
use crate::QuestionCommands;

#[derive(Debug, Serialize, Tabled)]
pub struct TypeRow {
    #[tabled(rename = "Type")]
    pub kind: &'static str,
    #[tabled(rename = "Label")]
    pub label: &'static str,
    #[tabled(rename = "Editor heading")]
    pub heading: &'static str,
}

pub async fn handle(action: QuestionCommands, ctx: &Context) -> anyhow::Result<()> {
    if let QuestionCommands::Types = action {
        let rows: Vec<TypeRow> = QuestionType::palette()
            .iter()
            .map(|kind| TypeRow {
                kind: kind.as_str(),
                label: kind.label(),
                heading: kind.heading().unwrap_or_default(),
            })
            .collect();
        return ctx.format.print_rows(&rows);
    }

    let store = ctx.open_store()?;
    match action {
        QuestionCommands::Add { kind } => {
            let q = store.add_question(kind);
            ctx.save_store(&store)?;
            println!("Added {} question {}", kind, q.id);
        }
        QuestionCommands::Edit {
            id,
            title,
            instructions,
            kind,
            required,
            hidden,
            min,
            max,
            pattern,
            clear_min,
            clear_max,
        } => {
            let id = QuestionId::from_string(id);
            let mut edits = Vec::new();
            // Type first: it resets rules that the flags below may set.
            if let Some(kind) = kind {
                edits.push(FieldEdit::Type(kind));
            }
            if let Some(title) = title {
                edits.push(FieldEdit::Title(title));
            }
            if let Some(text) = instructions {
                edits.push(FieldEdit::Instructions(Some(text)));
            }
            if let Some(required) = required {
                edits.push(FieldEdit::Required(required));
            }
            if let Some(hidden) = hidden {
                edits.push(FieldEdit::Hidden(hidden));
            }
            if min.is_some() || clear_min {
                edits.push(FieldEdit::Min(min));
            }
            if max.is_some() || clear_max {
                edits.push(FieldEdit::Max(max));
            }
            if let Some(pattern) = pattern {
                edits.push(FieldEdit::Pattern(Some(pattern).filter(|p| !p.is_empty())));
            }
            if edits.is_empty() {
                bail!("Nothing to edit; pass at least one field flag");
            }

            if ctx.edit_question(&store, &id, edits)? {
                ctx.save_store(&store)?;
                println!("Updated question {}", id);
            } else {
                println!("Question {} unchanged", id);
            }
        }
        QuestionCommands::Delete { id } => {
            let id = QuestionId::from_string(id);
            if !store.delete_question(&id) {
                bail!("No question with id {}", id);
            }
            ctx.save_store(&store)?;
            println!("Deleted question {}", id);
        }
        QuestionCommands::Move { id, direction } => {
            let id = QuestionId::from_string(id);
            if store.find_question(&id).is_none() {
                bail!("No question with id {}", id);
            }
            if store.move_question(&id, direction) {
                ctx.save_store(&store)?;
                println!("Moved question {} {:?}", id, direction);
            } else {
                println!("Question {} is already at the edge", id);
            }
        }
        QuestionCommands::Duplicate { id } => {
            let id = QuestionId::from_string(id);
            let Some(source) = store.find_question(&id) else {
                bail!("No question with id {}", id);
            };
            let copy = store.duplicate_question(&source);
            ctx.save_store(&store)?;
            println!("Duplicated {} as {}", id, copy.id);
        }
        QuestionCommands::Types => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use sase_forms::{Direction, FormSchema};

    fn context(dir: &tempfile::TempDir) -> Context {
        let ctx = Context::new(Config::default(), Some(dir.path().join("form.json")), None);
        super::super::write_schema(&ctx.schema_path, &FormSchema::default()).unwrap();
        ctx
    }

    fn edit(id: &QuestionId) -> QuestionCommands {
        QuestionCommands::Edit {
            id: id.to_string(),
            title: None,
            instructions: None,
            kind: None,
            required: None,
            hidden: None,
            min: None,
            max: None,
            pattern: None,
            clear_min: false,
            clear_max: false,
        }
    }

    #[tokio::test]
    async fn test_add_edit_move_delete() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);

        handle(QuestionCommands::Add { kind: QuestionType::Text }, &ctx).await.unwrap();
        handle(QuestionCommands::Add { kind: QuestionType::Number }, &ctx).await.unwrap();
        let schema = ctx.open_store().unwrap().schema();
        let (first, second) = (schema.questions()[0].id.clone(), schema.questions()[1].id.clone());

        let mut cmd = edit(&second);
        if let QuestionCommands::Edit { min, required, title, .. } = &mut cmd {
            *min = Some(5.0);
            *required = Some(true);
            *title = Some("Age".into());
        }
        handle(cmd, &ctx).await.unwrap();
        let q = ctx.open_store().unwrap().find_question(&second).unwrap();
        assert_eq!(q.title, "Age");
        assert_eq!(q.validation.unwrap().min, Some(5.0));

        handle(QuestionCommands::Move { id: second.to_string(), direction: Direction::Up }, &ctx)
            .await
            .unwrap();
        assert_eq!(ctx.open_store().unwrap().schema().questions()[0].id, second);

        handle(QuestionCommands::Delete { id: first.to_string() }, &ctx).await.unwrap();
        assert!(handle(QuestionCommands::Delete { id: first.to_string() }, &ctx).await.is_err());
        assert_eq!(ctx.open_store().unwrap().schema().len(), 1);
    }

    #[tokio::test]
    async fn test_edit_requires_a_field() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        handle(QuestionCommands::Add { kind: QuestionType::Url }, &ctx).await.unwrap();
        let id = ctx.open_store().unwrap().schema().questions()[0].id.clone();

        assert!(handle(edit(&id), &ctx).await.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_appends_copy() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        handle(QuestionCommands::Add { kind: QuestionType::Select }, &ctx).await.unwrap();
        let id = ctx.open_store().unwrap().schema().questions()[0].id.clone();

        handle(QuestionCommands::Duplicate { id: id.to_string() }, &ctx).await.unwrap();
        let schema = ctx.open_store().unwrap().schema();
        assert_eq!(schema.len(), 2);
        assert_ne!(schema.questions()[1].id, id);
        assert_eq!(schema.questions()[1].kind, QuestionType::Select);
    }
}
