// CRUD operations - Create, Read, Update, Delete

use anyhow::Result;
use clap::ValueEnum;
use std::io::IsTerminal;

use crate::cli::{DeleteArgs, EditArgs, NewArgs, ShowArgs};
use crate::config::Config;
use crate::core::data::{Category, FIVE_ELEMENTS, Record, RecordFields};
use crate::manager::open_catalog;
use crate::utils::{
    self, FlowResult, OutputStyle, handle_flow, pagination::print_or_page, print_warning,
};

/// Ask for one value. Returns `Ok(None)` when the user cancels.
fn ask(label: &str, suggestions: &[String]) -> Result<Option<String>> {
    let prompt = format!("{}: ", OutputStyle::label(label));
    if std::io::stdin().is_terminal() {
        utils::prompt_input_with_autocomplete(&prompt, suggestions)
    } else {
        utils::prompt_input(&prompt).map(Some)
    }
}

/// Answer to a prompt that offers the current value
#[derive(Debug, PartialEq, Eq)]
enum Reply<T> {
    Keep,
    Set(T),
    Cancel,
}

/// Empty or unchanged input keeps `current`; a cancelled prompt cancels
fn text_reply(answer: Option<String>, current: &str) -> Reply<String> {
    match answer {
        None => Reply::Cancel,
        Some(value) if value.is_empty() || value == current => Reply::Keep,
        Some(value) => Reply::Set(value),
    }
}

fn choice_reply<T: PartialEq>(answer: Option<Option<T>>, current: &T) -> Reply<T> {
    match answer {
        None => Reply::Cancel,
        Some(Some(value)) if value != *current => Reply::Set(value),
        Some(_) => Reply::Keep,
    }
}

/// Ask for a value showing `shown` as the current one
fn ask_with_current(
    label: &str,
    shown: &str,
    current: &str,
    suggestions: &[String],
) -> Result<Reply<String>> {
    let answer = ask(&format!("{} [{}]", label, shown), suggestions)?;
    Ok(text_reply(answer, current))
}

fn parse_choice<T: ValueEnum>(input: &str) -> Option<T> {
    T::from_str(input.trim(), true).ok()
}

fn choice_names<T: ValueEnum>() -> String {
    T::value_variants()
        .iter()
        .filter_map(|v| v.to_possible_value())
        .map(|v| v.get_name().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Ask for an enum value until the answer parses.
/// `Ok(None)` means cancelled, `Ok(Some(None))` an empty answer.
fn ask_choice<T: ValueEnum>(label: &str) -> Result<Option<Option<T>>> {
    loop {
        let Some(answer) = ask(&format!("{} ({})", label, choice_names::<T>()), &[])? else {
            return Ok(None);
        };
        if answer.is_empty() {
            return Ok(Some(None));
        }
        if let Some(value) = parse_choice(&answer) {
            return Ok(Some(Some(value)));
        }
        print_warning(&format!("Please enter one of: {}", choice_names::<T>()));
    }
}

fn element_suggestions() -> Vec<String> {
    FIVE_ELEMENTS.iter().map(|e| e.to_string()).collect()
}

fn warn_unused_fields(fields: &RecordFields, category: Category) {
    let unused = fields.unused_for(category);
    if !unused.is_empty() {
        print_warning(&format!(
            "{} do not use: {} (ignored)",
            category.label(),
            unused.join(", ")
        ));
    }
}

// Create operations
pub fn handle_new_command(config: &Config, args: NewArgs) -> Result<()> {
    let mut catalog = open_catalog(config);
    let category = args.category;
    let mut fields: RecordFields = args.fields.into();
    warn_unused_fields(&fields, category);

    if fields.name.is_none() {
        let existing: Vec<String> = catalog
            .records(category)
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        match ask("Name", &existing)? {
            Some(name) if !name.is_empty() => fields.name = Some(name),
            _ => {
                handle_flow(FlowResult::Cancelled("Entry not saved: a name is required".to_string()));
                return Ok(());
            }
        }
    }

    if category != Category::Formation && fields.element.is_none() {
        fields.element = ask("Element", &element_suggestions())?.filter(|e| !e.is_empty());
    }

    if category == Category::Star && fields.yin_yang.is_none() {
        fields.yin_yang = ask_choice("Yin/Yang")?.flatten();
    }

    if category == Category::Formation && fields.auspiciousness.is_none() {
        fields.auspiciousness = ask_choice("Auspiciousness")?.flatten();
    }

    if args.editor {
        fields.description = Some(utils::open_editor_custom(
            fields.description.as_deref(),
            Some(&config.general.editor),
        )?);
    } else if fields.description.is_none() {
        fields.description = Some(utils::prompt_input(&format!(
            "{}: ",
            OutputStyle::label("Description")
        ))?);
    }

    let record = fields.into_record(category);
    let name = record.name().to_string();
    let id = record.id().to_string();
    catalog.create(record)?;

    handle_flow(FlowResult::Success(format!(
        "{} '{}' saved with ID {}",
        category.label(),
        name,
        id
    )));
    Ok(())
}

// Read operations
pub fn handle_show_command(config: &Config, args: &ShowArgs) -> Result<()> {
    let catalog = open_catalog(config);

    if let Some(record) = catalog.find(args.category, &args.id) {
        print_or_page(&OutputStyle::render_record_detailed(&record))?;
    } else {
        handle_flow(FlowResult::NotFound {
            item_type: args.category.label().to_string(),
            search_term: args.id.clone(),
        });
    }

    Ok(())
}

/// Walk through the editable fields of `record`, keeping values left empty.
/// Returns `Ok(None)` as soon as a prompt is cancelled.
fn ask_changes(record: &Record) -> Result<Option<RecordFields>> {
    let mut fields = RecordFields::default();

    match ask_with_current("Name", record.name(), record.name(), &[])? {
        Reply::Cancel => return Ok(None),
        Reply::Set(name) => fields.name = Some(name),
        Reply::Keep => {}
    }

    if let Some(element) = record.element() {
        match ask_with_current("Element", element, element, &element_suggestions())? {
            Reply::Cancel => return Ok(None),
            Reply::Set(element) => fields.element = Some(element),
            Reply::Keep => {}
        }
    }

    match record {
        Record::Star(star) => {
            let label = format!("Yin/Yang [{}]", star.yin_yang.token());
            match choice_reply(ask_choice(&label)?, &star.yin_yang) {
                Reply::Cancel => return Ok(None),
                Reply::Set(polarity) => fields.yin_yang = Some(polarity),
                Reply::Keep => {}
            }
        }
        Record::Formation(formation) => {
            let label = format!("Auspiciousness [{}]", formation.auspiciousness.token());
            match choice_reply(ask_choice(&label)?, &formation.auspiciousness) {
                Reply::Cancel => return Ok(None),
                Reply::Set(value) => fields.auspiciousness = Some(value),
                Reply::Keep => {}
            }
        }
        Record::Gate(_) | Record::Spirit(_) => {}
    }

    if !record.description().is_empty() {
        println!("{}", OutputStyle::content(record.description()));
    }
    match ask_with_current("Description", "empty keeps current", record.description(), &[])? {
        Reply::Cancel => return Ok(None),
        Reply::Set(description) => fields.description = Some(description),
        Reply::Keep => {}
    }
    Ok(Some(fields))
}

// Update operations
pub fn handle_edit_command(config: &Config, args: EditArgs) -> Result<()> {
    let mut catalog = open_catalog(config);
    let category = args.category;

    let Some(record) = catalog.find(category, &args.id) else {
        handle_flow(FlowResult::NotFound {
            item_type: category.label().to_string(),
            search_term: args.id,
        });
        return Ok(());
    };

    let mut fields: RecordFields = args.fields.into();
    warn_unused_fields(&fields, category);

    let nothing_given = fields.name.is_none()
        && fields.element.is_none()
        && fields.yin_yang.is_none()
        && fields.auspiciousness.is_none()
        && fields.description.is_none();

    if args.editor {
        let current = fields.description.as_deref().unwrap_or(record.description());
        fields.description = Some(utils::open_editor_custom(
            Some(current),
            Some(&config.general.editor),
        )?);
    } else if nothing_given {
        println!("Editing {}:", OutputStyle::name(&record.to_string()));
        match ask_changes(&record)? {
            Some(changes) => fields = changes,
            None => {
                handle_flow(FlowResult::Cancelled("Entry not changed".to_string()));
                return Ok(());
            }
        }
    }

    let patch = fields.into_patch(category);
    if patch.is_empty() {
        handle_flow(FlowResult::Cancelled("Nothing to change".to_string()));
        return Ok(());
    }

    if catalog.update(category, &args.id, &patch)? {
        handle_flow(FlowResult::Success(format!(
            "{} '{}' updated",
            category.label(),
            args.id
        )));
    } else {
        handle_flow(FlowResult::NotFound {
            item_type: category.label().to_string(),
            search_term: args.id,
        });
    }

    Ok(())
}

// Delete operations
pub fn handle_delete_command(config: &Config, args: &DeleteArgs) -> Result<()> {
    let mut catalog = open_catalog(config);

    let Some(record) = catalog.find(args.category, &args.id) else {
        handle_flow(FlowResult::NotFound {
            item_type: args.category.label().to_string(),
            search_term: args.id.clone(),
        });
        return Ok(());
    };

    println!("Entry to delete:");
    println!("  {}", OutputStyle::format_record_line(&record, config));

    if !args.force && !utils::prompt_yes_no("\nAre you sure you want to delete this entry?")? {
        handle_flow(FlowResult::Cancelled("Entry not deleted".to_string()));
        return Ok(());
    }

    catalog.delete(args.category, &args.id)?;
    handle_flow(FlowResult::Success(format!("'{}' deleted", record.name())));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::{Auspiciousness, Polarity};

    #[test]
    fn test_parse_choice_accepts_value_names() {
        assert_eq!(parse_choice::<Polarity>("AM"), Some(Polarity::Am));
        assert_eq!(parse_choice::<Auspiciousness>(" tuy-thuoc "), Some(Auspiciousness::TuyThuoc));
        assert_eq!(parse_choice::<Polarity>("yin"), None);
    }

    #[test]
    fn test_choice_names() {
        assert_eq!(choice_names::<Polarity>(), "am/duong");
        assert_eq!(choice_names::<Auspiciousness>(), "cat/hung/tuy-thuoc");
    }

    #[test]
    fn test_cancelled_prompt_cancels_the_edit() {
        assert_eq!(text_reply(None, "Thiên Anh"), Reply::Cancel);
        assert_eq!(choice_reply::<Polarity>(None, &Polarity::Am), Reply::Cancel);
    }

    #[test]
    fn test_empty_or_same_answer_keeps_current() {
        assert_eq!(text_reply(Some(String::new()), "Thiên Anh"), Reply::Keep);
        assert_eq!(text_reply(Some("Thiên Anh".to_string()), "Thiên Anh"), Reply::Keep);
        assert_eq!(choice_reply(Some(None), &Polarity::Am), Reply::Keep);
        assert_eq!(choice_reply(Some(Some(Polarity::Am)), &Polarity::Am), Reply::Keep);
    }

    #[test]
    fn test_new_answer_is_set() {
        assert_eq!(
            text_reply(Some("Thiên Nhậm".to_string()), "Thiên Anh"),
            Reply::Set("Thiên Nhậm".to_string())
        );
        assert_eq!(
            choice_reply(Some(Some(Auspiciousness::Hung)), &Auspiciousness::Cat),
            Reply::Set(Auspiciousness::Hung)
        );
    }
}
