// Lookup and statistics

use anyhow::Result;
use clap::ValueEnum;

use crate::cli::{ListFormat, LookupArgs};
use crate::config::Config;
use crate::manager::open_catalog;
use crate::utils::pagination::print_or_page;
use crate::utils::search::Matcher;
use crate::utils::{DisplayFormatter, FlowResult, handle_flow, print_warning};

/// Format from the command line, then the config default, then simple
fn resolve_format(requested: Option<&ListFormat>, config: &Config) -> ListFormat {
    if let Some(format) = requested {
        return format.clone();
    }

    match config.general.format.as_deref() {
        Some(name) => ListFormat::from_str(name, true).unwrap_or_else(|_| {
            print_warning(&format!("Unknown default format '{}' in config, using simple", name));
            ListFormat::Simple
        }),
        None => ListFormat::Simple,
    }
}

pub fn handle_lookup_command(config: &Config, args: &LookupArgs) -> Result<()> {
    let catalog = open_catalog(config);
    let matcher = Matcher::from_query(
        args.query.as_deref(),
        args.regex,
        config.general.search_case_sensitive,
    )?;

    let records = catalog.lookup(args.category, &matcher);
    let format = resolve_format(args.format.as_ref(), config);

    if records.is_empty() && format != ListFormat::Json {
        let item_type = match args.category {
            Some(category) => format!("{} matching your criteria", category.label().to_lowercase()),
            None => "entries matching your criteria".to_string(),
        };
        handle_flow(FlowResult::EmptyList { item_type });
        return Ok(());
    }

    let rendered = DisplayFormatter::render_list(&records, &format, config)?;
    if format == ListFormat::Json {
        print!("{}", rendered);
    } else {
        print_or_page(&rendered)?;
    }

    Ok(())
}

pub fn handle_stats_command(config: &Config) -> Result<()> {
    let catalog = open_catalog(config);
    print!("{}", DisplayFormatter::render_stats(&catalog.stats()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_format_precedence() {
        let mut config = Config::default();
        assert_eq!(resolve_format(None, &config), ListFormat::Simple);

        config.general.format = Some("Table".to_string());
        assert_eq!(resolve_format(None, &config), ListFormat::Table);
        assert_eq!(resolve_format(Some(&ListFormat::Json), &config), ListFormat::Json);

        config.general.format = Some("fancy".to_string());
        assert_eq!(resolve_format(None, &config), ListFormat::Simple);
    }
}
