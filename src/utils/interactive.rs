use anyhow::{Context, Result};
use crossterm::{
    cursor, execute, style,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{self, ClearType},
};
use std::io::{self, Write};
use std::path::Path;
use std::process::Command;
use crate::utils::output::OutputStyle;

pub fn prompt_input(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_string())
}

/// First suggestion that extends `input`, minus the part already typed
fn completion_for(input: &str, suggestions: &[String]) -> String {
    if input.chars().count() < 2 {
        return String::new();
    }
    suggestions
        .iter()
        .find(|s| s.starts_with(input) && s.as_str() != input)
        .map(|s| s[input.len()..].to_string())
        .unwrap_or_default()
}

fn redraw_line(prompt: &str, input: &str, suggestion: &str) -> Result<()> {
    execute!(
        io::stdout(),
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        style::Print(prompt),
        style::Print(input),
        style::Print(OutputStyle::muted(suggestion))
    )?;
    let trailing = suggestion.chars().count() as u16;
    if trailing > 0 {
        execute!(io::stdout(), cursor::MoveLeft(trailing))?;
    }
    io::stdout().flush()?;
    Ok(())
}

/// Read one line with inline completion from `suggestions`.
///
/// Tab accepts the suggestion. Returns `Ok(None)` when the user presses Esc.
pub fn prompt_input_with_autocomplete(prompt: &str, suggestions: &[String]) -> Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    terminal::enable_raw_mode()?;

    let result = (|| -> Result<Option<String>> {
        let mut input = String::new();
        let mut current_suggestion = String::new();

        loop {
            let Event::Key(KeyEvent { code, kind, .. }) = event::read()? else {
                continue;
            };
            if kind == KeyEventKind::Release {
                continue;
            }
            match code {
                KeyCode::Char(c) => {
                    input.push(c);
                    current_suggestion = completion_for(&input, suggestions);
                    redraw_line(prompt, &input, &current_suggestion)?;
                }
                KeyCode::Tab => {
                    if !current_suggestion.is_empty() {
                        input.push_str(&current_suggestion);
                        current_suggestion.clear();
                        redraw_line(prompt, &input, "")?;
                    }
                }
                KeyCode::Backspace => {
                    if input.pop().is_some() {
                        current_suggestion = completion_for(&input, suggestions);
                        redraw_line(prompt, &input, &current_suggestion)?;
                    }
                }
                KeyCode::Enter => break,
                KeyCode::Esc => return Ok(None),
                _ => {}
            }
        }
        Ok(Some(input.trim().to_string()))
    })();

    terminal::disable_raw_mode()?;
    println!();
    result
}

pub fn prompt_yes_no(prompt: &str) -> Result<bool> {
    loop {
        let input = prompt_input(&format!("{} [y/N]: ", prompt))?;
        match input.to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" | "" => return Ok(false),
            _ => println!("Please enter 'y' or 'n'"),
        }
    }
}

/// Pick an editor: explicit command, then `$EDITOR`, then whatever is installed
pub fn detect_editor(editor_cmd: Option<&str>) -> String {
    editor_cmd
        .map(|s| s.to_string())
        .or_else(|| std::env::var("EDITOR").ok().filter(|e| !e.trim().is_empty()))
        .unwrap_or_else(|| {
            if cfg!(windows) {
                "notepad".to_string()
            } else if Path::new("/usr/bin/nvim").exists() {
                "nvim".to_string()
            } else if Path::new("/usr/bin/vim").exists() {
                "vim".to_string()
            } else if Path::new("/usr/bin/nano").exists() {
                "nano".to_string()
            } else {
                "vi".to_string()
            }
        })
}

/// Edit `content` in a temporary file and return the saved text
pub fn open_editor_custom(content: Option<&str>, editor_cmd: Option<&str>) -> Result<String> {
    let editor = detect_editor(editor_cmd);
    let temp_file = std::env::temp_dir().join(format!("fengshui_{}.txt", std::process::id()));

    std::fs::write(&temp_file, content.unwrap_or_default())
        .with_context(|| format!("Failed to create temporary file: {}", temp_file.display()))?;

    let status = Command::new(&editor)
        .arg(&temp_file)
        .status()
        .with_context(|| format!("Failed to launch editor '{}'", editor))?;

    let edited = std::fs::read_to_string(&temp_file)
        .with_context(|| format!("Failed to read temporary file: {}", temp_file.display()));
    let _ = std::fs::remove_file(&temp_file);

    if !status.success() {
        anyhow::bail!("Editor '{}' exited with {}", editor, status);
    }

    Ok(edited?.trim_end().to_string())
}

/// Open an existing file in the editor
pub fn edit_file_direct(path: &Path, editor_cmd: Option<&str>) -> Result<()> {
    let editor = detect_editor(editor_cmd);
    let status = Command::new(&editor)
        .arg(path)
        .status()
        .with_context(|| format!("Failed to launch editor '{}'", editor))?;

    if !status.success() {
        anyhow::bail!("Editor '{}' exited with {}", editor, status);
    }
    Ok(())
}
