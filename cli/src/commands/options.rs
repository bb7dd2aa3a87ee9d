//! Select option commands

use anyhow::bail;
use sase_forms::{FieldEdit, QuestionId, QuestionType, SchemaUseCases};

use super::Context;
use crate::OptionCommands;

pub async fn handle(action: OptionCommands, ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let (id, edit) = match action {
        OptionCommands::Add { id, label } => {
            if label.trim().is_empty() {
                bail!("Option label must not be empty");
            }
            (id, FieldEdit::AddOption(label))
        }
        OptionCommands::Remove { id, value } => (id, FieldEdit::RemoveOption(value)),
        OptionCommands::Multi { id, enabled } => (id, FieldEdit::Multi(enabled)),
    };
    let id = QuestionId::from_string(id);

    match store.find_question(&id) {
        Some(q) if q.kind == QuestionType::Select => {}
        Some(q) => bail!("Question {} is a {} question, not select", id, q.kind),
        None => bail!("No question with id {}", id),
    }

    let removing = matches!(edit, FieldEdit::RemoveOption(_));
    let applied = ctx.edit_question(&store, &id, vec![edit]);
    match applied {
        Ok(_) => {}
        // Removing an absent value is a no-op.
        Err(_) if removing => {
            println!("No such option on question {}", id);
            return Ok(());
        }
        Err(e) => return Err(e),
    }
    ctx.save_store(&store)?;

    if let Some(opts) = store.find_question(&id).and_then(|q| q.select_options) {
        let values: Vec<&str> = opts.options.iter().map(|o| o.value.as_str()).collect();
        println!(
            "Question {}: {} [{}]",
            id,
            if opts.is_multi { "multi select" } else { "single select" },
            values.join(", ")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use sase_forms::FormSchema;

    fn setup(kind: QuestionType) -> (tempfile::TempDir, Context, QuestionId) {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(Config::default(), Some(dir.path().join("form.json")), None);
        let mut schema = FormSchema::default();
        let id = schema.add_question(kind).id.clone();
        super::super::write_schema(&ctx.schema_path, &schema).unwrap();
        (dir, ctx, id)
    }

    fn options(ctx: &Context, id: &QuestionId) -> Vec<(String, String)> {
        ctx.open_store()
            .unwrap()
            .find_question(id)
            .unwrap()
            .select_options
            .unwrap()
            .options
            .into_iter()
            .map(|o| (o.value, o.label))
            .collect()
    }

    #[tokio::test]
    async fn test_add_colliding_labels() {
        let (_dir, ctx, id) = setup(QuestionType::Select);
        for label in ["Red", "red"] {
            handle(OptionCommands::Add { id: id.to_string(), label: label.into() }, &ctx).await.unwrap();
        }
        assert_eq!(
            options(&ctx, &id),
            vec![("red".into(), "Red".into()), ("red-1".into(), "red".into())]
        );

        handle(OptionCommands::Remove { id: id.to_string(), value: "red".into() }, &ctx).await.unwrap();
        handle(OptionCommands::Remove { id: id.to_string(), value: "red".into() }, &ctx).await.unwrap();
        assert_eq!(options(&ctx, &id), vec![("red-1".into(), "red".into())]);
    }

    #[tokio::test]
    async fn test_multi_toggle() {
        let (_dir, ctx, id) = setup(QuestionType::Select);
        handle(OptionCommands::Multi { id: id.to_string(), enabled: true }, &ctx).await.unwrap();
        let q = ctx.open_store().unwrap().find_question(&id).unwrap();
        assert!(q.is_multi_select());
    }

    #[tokio::test]
    async fn test_rejects_non_select() {
        let (_dir, ctx, id) = setup(QuestionType::Text);
        let result = handle(OptionCommands::Add { id: id.to_string(), label: "Red".into() }, &ctx).await;
        assert!(result.is_err());
    }
}
