use anyhow::{Result, bail};
use todolens_app::{SaveOutcome, SavedQueryStore, TodoAggregator, TodoSource};
use todolens_core::{SavedQuery, StatusRegistry, TaskRecord};

use crate::{Command, LsFormat};

pub async fn run<S, R>(command: Command, aggregator: &mut TodoAggregator<S, R>) -> Result<()>
where
    S: TodoSource + SavedQueryStore,
    R: StatusRegistry,
{
    aggregator.load_user_filters().await?;
    aggregator.load_todos(false).await?;

    match command {
        Command::Ls { query, format } => {
            if let Some(query) = query {
                aggregator.set_search_text(&query);
            }
            let tasks = aggregator.displayed_tasks();
            if tasks.is_empty() {
                if aggregator.search_text().trim().is_empty() {
                    println!("No tasks found");
                } else {
                    println!("No tasks matched the provided query");
                }
                return Ok(());
            }
            print_tasks(tasks, format)?;
        }
        Command::Done { format } => {
            let tasks = aggregator.displayed_done_tasks();
            if tasks.is_empty() {
                println!("No completed tasks found");
                return Ok(());
            }
            print_tasks(tasks, format)?;
        }
        Command::Queries => {
            let queries = aggregator.saved_queries();
            if queries.is_empty() {
                println!("No saved queries");
            } else {
                print!("{}", render_query_table(queries));
            }
        }
        Command::SaveQuery { name } => match aggregator.save_named_query(&name).await? {
            SaveOutcome::AlreadyExists => println!("Saved query already exists: {name}"),
            SaveOutcome::Saved(_) => println!("Saved query: {name}"),
        },
        Command::RemoveQuery { name } => {
            let Some(query) = aggregator
                .saved_queries()
                .iter()
                .find(|query| query.name == name)
                .cloned()
            else {
                bail!("Saved query not found: {name}");
            };
            aggregator.remove_named_query(&query).await?;
            println!("Removed query: {name}");
        }
    }

    Ok(())
}

fn print_tasks(tasks: &[TaskRecord], format: LsFormat) -> Result<()> {
    match format {
        LsFormat::Table => print!("{}", render_task_table(tasks)),
        LsFormat::Json => println!("{}", serde_json::to_string_pretty(tasks)?),
    }
    Ok(())
}

fn render_task_table(tasks: &[TaskRecord]) -> String {
    let mut out = String::from("ID | Status | Task | Entity | Project | Assignees | Due\n");
    out.push_str("-- | ------ | ---- | ------ | ------- | --------- | ---\n");

    for task in tasks {
        let status = or_dash(&task.task_status_short_name);
        let assignees = if task.assignees.is_empty() {
            "-".to_owned()
        } else {
            task.assignees.join(", ")
        };
        let due = task.due_date.as_deref().unwrap_or("-");

        out.push_str(&format!(
            "{} | {} | {} | {} | {} | {} | {}\n",
            task.id,
            status,
            or_dash(&task.name),
            or_dash(&task.full_entity_name),
            or_dash(&task.project_name),
            assignees,
            due
        ));
    }
    out
}

fn render_query_table(queries: &[SavedQuery]) -> String {
    let mut out = String::from("Name | Query\n---- | -----\n");
    for query in queries {
        out.push_str(&format!("{} | {}\n", query.name, or_dash(&query.search_query)));
    }
    out
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todolens_core::{RawTask, StatusMap, TaskId, normalize};

    fn record(id: u64, name: &str, entity: &str) -> TaskRecord {
        let raw = RawTask {
            id: TaskId::from(id),
            name: name.to_owned(),
            entity_name: entity.to_owned(),
            project_name: "Bunny".to_owned(),
            assignees: vec!["alice".to_owned(), "bob".to_owned()],
            ..RawTask::default()
        };
        normalize(raw, &StatusMap::default())
    }

    #[test]
    fn task_table_has_header_and_rows() {
        let table = render_task_table(&[record(1, "Anim", "Shot01"), record(2, "", "Shot02")]);
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "ID | Status | Task | Entity | Project | Assignees | Due");
        assert_eq!(lines[2], "1 | - | Anim | Shot01 | Bunny | alice, bob | -");
        assert!(lines[3].starts_with("2 | - | - | Shot02"));
    }

    #[test]
    fn query_table_lists_names() {
        let queries = [SavedQuery::local("todos", "urgent", "urgent")];
        let table = render_query_table(&queries);
        assert!(table.ends_with("urgent | urgent\n"));
    }
}
