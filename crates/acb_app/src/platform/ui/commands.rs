use std::path::PathBuf;

use acb_core::FileId;

pub const HELP: &str = "\
Commands:
  add <path>...   select CSV files
  remove <id>     drop a selected file
  run             load the selected files and compute
  text | table    switch the output view
  list            redraw the current view
  help            show this help
  quit            exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Vec<PathBuf>),
    Remove(FileId),
    Run,
    ShowText,
    ShowTable,
    List,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("add", []) => return Err("add needs at least one path".to_string()),
        ("add", paths) => Command::Add(paths.iter().map(PathBuf::from).collect()),
        ("remove" | "rm", [id]) => Command::Remove(
            id.parse()
                .map_err(|_| format!("'{id}' is not a file id"))?,
        ),
        ("remove" | "rm", _) => return Err("usage: remove <id>".to_string()),
        ("run", []) => Command::Run,
        ("text", []) => Command::ShowText,
        ("table", []) => Command::ShowTable,
        ("list" | "ls", []) => Command::List,
        ("help" | "?", []) => Command::Help,
        ("quit" | "exit" | "q", []) => Command::Quit,
        (other, _) => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(Some(command))
}
