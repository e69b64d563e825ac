use crate::cli::ListFormat;
use crate::config::Config;
use crate::core::data::{Auspiciousness, CatalogStats, Category, Polarity, Record};
use crate::utils::error::{AppError, AppResult};
use crate::utils::format::{or_dash, pad_to_width, truncate_string};
use colored::*;
use serde_json::Value;
use std::fmt::Write;

pub struct OutputStyle;

impl OutputStyle {
    pub fn name(text: &str) -> ColoredString {
        text.bright_green()
    }

    pub fn attribute(text: &str) -> ColoredString {
        text.bright_yellow()
    }

    pub fn content(text: &str) -> ColoredString {
        text.clear()
    }

    pub fn category(text: &str) -> ColoredString {
        text.bright_cyan()
    }

    pub fn title(text: &str) -> ColoredString {
        text.bright_blue().bold()
    }

    pub fn header(text: &str) -> ColoredString {
        text.bold()
    }

    pub fn label(text: &str) -> ColoredString {
        text.cyan()
    }

    pub fn success(text: &str) -> ColoredString {
        text.green()
    }

    pub fn error(text: &str) -> ColoredString {
        text.red()
    }

    pub fn warning(text: &str) -> ColoredString {
        text.yellow()
    }

    pub fn info(text: &str) -> ColoredString {
        text.blue()
    }

    pub fn muted(text: &str) -> ColoredString {
        text.dimmed()
    }

    pub fn separator() -> String {
        "─".repeat(50)
    }

    pub fn header_separator() -> String {
        "═".repeat(50)
    }

    fn field_line(out: &mut String, label: &str, value: &str, color_fn: impl Fn(&str) -> ColoredString) {
        let _ = writeln!(out, "{:>16}: {}", Self::label(label), color_fn(value));
    }

    /// Full view of one record, every field on its own line
    pub fn render_record_detailed(record: &Record) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", Self::title(&format!("🧭 {}", record.category())));
        let _ = writeln!(out, "{}", Self::header_separator());

        Self::field_line(&mut out, "ID", record.id(), Self::muted);
        Self::field_line(&mut out, "Name", or_dash(record.name()), Self::name);

        match record {
            Record::Star(star) => {
                Self::field_line(&mut out, "Element type", &star.element_type, Self::content);
                Self::field_line(&mut out, "Element", or_dash(&star.element), Self::attribute);
                Self::field_line(&mut out, "Yin/Yang", star.yin_yang.token(), Self::attribute);
            }
            Record::Gate(gate) => {
                Self::field_line(&mut out, "Element type", &gate.element_type, Self::content);
                Self::field_line(&mut out, "Element", or_dash(&gate.element), Self::attribute);
            }
            Record::Spirit(spirit) => {
                Self::field_line(&mut out, "Element type", &spirit.element_type, Self::content);
                Self::field_line(&mut out, "Element", or_dash(&spirit.element), Self::attribute);
            }
            Record::Formation(formation) => {
                Self::field_line(
                    &mut out,
                    "Auspiciousness",
                    formation.auspiciousness.token(),
                    Self::attribute,
                );
            }
        }

        let extra = match record {
            Record::Star(r) => &r.extra,
            Record::Gate(r) => &r.extra,
            Record::Spirit(r) => &r.extra,
            Record::Formation(r) => &r.extra,
        };
        for (key, value) in extra {
            let shown = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Self::field_line(&mut out, key, &shown, Self::muted);
        }

        let _ = writeln!(out, "\n{}:", Self::title("📄 Description"));
        let _ = writeln!(out, "{}", Self::content(or_dash(record.description())));
        out
    }

    /// One-line summary used by the simple list format
    pub fn format_record_line(record: &Record, config: &Config) -> String {
        let description = if config.general.description_preview && !record.description().is_empty() {
            format!(" {}", Self::muted(&truncate_string(record.description(), 60)))
        } else {
            String::new()
        };

        format!(
            "{} {} {}{}  {}",
            Self::category(&format!("[{}]", record.category().label())),
            Self::name(or_dash(record.name())),
            Self::attribute(&format!("({})", record.attribute())),
            description,
            Self::muted(record.id())
        )
    }
}

pub fn print_warning(message: &str) {
    println!("⚠️  {}", OutputStyle::warning(message));
}

/// Renders record lists and statistics in the supported formats
pub struct DisplayFormatter;

impl DisplayFormatter {
    pub fn render_list(records: &[Record], format: &ListFormat, config: &Config) -> AppResult<String> {
        let rendered = match format {
            ListFormat::Simple => Self::render_simple_list(records, config),
            ListFormat::Detailed => Self::render_detailed_list(records),
            ListFormat::Table => Self::render_table_list(records),
            ListFormat::Json => Self::render_json_list(records)?,
        };
        Ok(rendered)
    }

    fn count_line(count: usize) -> String {
        format!(
            "🧭 {} ({} found)",
            OutputStyle::header("Entries"),
            OutputStyle::info(&count.to_string())
        )
    }

    fn render_simple_list(records: &[Record], config: &Config) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", Self::count_line(records.len()));
        let _ = writeln!(out, "{}", OutputStyle::separator());
        for record in records {
            let _ = writeln!(out, "{}", OutputStyle::format_record_line(record, config));
        }
        out
    }

    fn render_detailed_list(records: &[Record]) -> String {
        let mut out = String::new();
        for (i, record) in records.iter().enumerate() {
            out.push_str(&OutputStyle::render_record_detailed(record));
            if i < records.len() - 1 {
                let _ = writeln!(out, "{}", OutputStyle::separator());
            }
        }
        out
    }

    fn render_table_list(records: &[Record]) -> String {
        let mut name_width = 12;
        let mut attribute_width = 10;
        for record in records {
            name_width = name_width.max(record.name().chars().count());
            attribute_width = attribute_width.max(record.attribute().chars().count());
        }
        let name_width = name_width.min(40);
        let attribute_width = attribute_width.min(24);
        let category_width = 10;
        let id_width = 36;

        let border = |left: &str, mid: &str, right: &str| {
            format!(
                "{}─{}─{}─{}─{}─{}─{}─{}",
                left,
                "─".repeat(category_width),
                mid,
                "─".repeat(name_width),
                mid,
                "─".repeat(attribute_width),
                mid,
                "─".repeat(id_width)
            ) + "─" + right
        };

        let mut out = String::new();
        let _ = writeln!(out, "{}", Self::count_line(records.len()));
        let _ = writeln!(out, "{}", border("┌", "┬", "┐"));
        let _ = writeln!(
            out,
            "│ {} │ {} │ {} │ {} │",
            OutputStyle::header(&pad_to_width("Category", category_width)),
            OutputStyle::header(&pad_to_width("Name", name_width)),
            OutputStyle::header(&pad_to_width("Attribute", attribute_width)),
            OutputStyle::header(&pad_to_width("ID", id_width)),
        );
        let _ = writeln!(out, "{}", border("├", "┼", "┤"));

        for record in records {
            let name = pad_to_width(&truncate_string(record.name(), name_width), name_width);
            let attribute = pad_to_width(
                &truncate_string(&record.attribute(), attribute_width),
                attribute_width,
            );
            let _ = writeln!(
                out,
                "│ {} │ {} │ {} │ {} │",
                OutputStyle::category(&pad_to_width(record.category().label(), category_width)),
                OutputStyle::name(&name),
                OutputStyle::attribute(&attribute),
                OutputStyle::muted(&pad_to_width(&truncate_string(record.id(), id_width), id_width)),
            );
        }

        let _ = writeln!(out, "{}", border("└", "┴", "┘"));
        out
    }

    fn render_json_list(records: &[Record]) -> AppResult<String> {
        serde_json::to_string_pretty(records)
            .map(|json| json + "\n")
            .map_err(|e| AppError::System(format!("Failed to serialize records to JSON: {}", e)))
    }

    pub fn render_stats(stats: &CatalogStats) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", OutputStyle::title("📊 Catalog Statistics"));
        let _ = writeln!(out, "{}", OutputStyle::header_separator());
        let _ = writeln!(
            out,
            "{:>16}: {}",
            OutputStyle::label("Total entries"),
            OutputStyle::info(&stats.total_records.to_string())
        );

        for (category, count) in &stats.category_counts {
            let _ = writeln!(
                out,
                "{:>16}: {}",
                OutputStyle::label(category.label()),
                OutputStyle::info(&count.to_string())
            );
        }

        if stats.category_counts.iter().any(|(c, n)| *c == Category::Star && *n > 0) {
            let _ = writeln!(out, "\n☯️  {}:", OutputStyle::header("Stars by polarity"));
            for polarity in [Polarity::Am, Polarity::Duong] {
                let count = stats.polarity_counts.get(&polarity).copied().unwrap_or(0);
                let _ = writeln!(
                    out,
                    "  {}: {}",
                    OutputStyle::attribute(polarity.token()),
                    OutputStyle::info(&count.to_string())
                );
            }
        }

        if stats.category_counts.iter().any(|(c, n)| *c == Category::Formation && *n > 0) {
            let _ = writeln!(out, "\n🏯 {}:", OutputStyle::header("Formations by auspiciousness"));
            for auspiciousness in [Auspiciousness::Cat, Auspiciousness::Hung, Auspiciousness::TuyThuoc] {
                let count = stats
                    .auspiciousness_counts
                    .get(&auspiciousness)
                    .copied()
                    .unwrap_or(0);
                let _ = writeln!(
                    out,
                    "  {}: {}",
                    OutputStyle::attribute(auspiciousness.token()),
                    OutputStyle::info(&count.to_string())
                );
            }
        }

        out
    }
}
