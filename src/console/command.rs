use std::str::FromStr;

use memoria_models::{reminder::ReminderId, time::is_strict_24_hour};
use memoria_storage::UpdateReminder;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command `{0}`. Type `help` for the list of commands.")]
    UnknownCommand(String),

    #[error("Missing {0}.")]
    MissingArgument(&'static str),

    #[error("Please enter a title.")]
    EmptyTitle,

    #[error("Time must be in HH:MM (24-hour) format, got `{0}`.")]
    InvalidTime(String),

    #[error("Unknown field `{0}`. Use title=, time= or description=.")]
    UnknownField(String),

    #[error("Nothing to edit.")]
    NothingToEdit,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConsoleCommand {
    List,
    Add {
        time: String,
        title: String,
        description: String,
    },
    Edit {
        id: ReminderId,
        update: UpdateReminder,
    },
    SetEnabled {
        id: ReminderId,
        enabled: bool,
    },
    Delete {
        id: ReminderId,
    },
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  list                                      show all reminders
  add HH:MM title [| description]           add an enabled reminder
  edit ID title=..; time=HH:MM; description=..
                                            change some fields of a reminder
  enable ID | disable ID                    switch a reminder on or off
  delete ID                                 remove a reminder
  help                                      show this text
  quit                                      leave";

impl FromStr for ConsoleCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (verb, rest) = split_word(line.trim());

        match verb.to_ascii_lowercase().as_str() {
            "list" | "ls" => Ok(Self::List),
            "add" => parse_add(rest),
            "edit" => parse_edit(rest),
            "enable" => Ok(Self::SetEnabled {
                id: parse_id(rest)?,
                enabled: true,
            }),
            "disable" => Ok(Self::SetEnabled {
                id: parse_id(rest)?,
                enabled: false,
            }),
            "delete" | "rm" => Ok(Self::Delete {
                id: parse_id(rest)?,
            }),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::UnknownCommand(other.to_owned())),
        }
    }
}

fn split_word(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn parse_id(rest: &str) -> Result<ReminderId, CommandError> {
    let (id, _) = split_word(rest);
    if id.is_empty() {
        return Err(CommandError::MissingArgument("reminder id"));
    }
    Ok(ReminderId::new(id))
}

fn parse_add(rest: &str) -> Result<ConsoleCommand, CommandError> {
    let (time, rest) = split_word(rest);
    if time.is_empty() {
        return Err(CommandError::MissingArgument("time"));
    }
    let time = validate_time(time)?;

    let (title, description) = rest.split_once('|').unwrap_or((rest, ""));

    Ok(ConsoleCommand::Add {
        time,
        title: validate_title(title)?,
        description: description.trim().to_owned(),
    })
}

fn parse_edit(rest: &str) -> Result<ConsoleCommand, CommandError> {
    let id = parse_id(rest)?;
    let (_, fields) = split_word(rest);

    let mut update = UpdateReminder::default();
    for field in fields.split(';').map(str::trim).filter(|f| !f.is_empty()) {
        let Some((key, value)) = field.split_once('=') else {
            return Err(CommandError::UnknownField(field.to_owned()));
        };

        match key.trim().to_ascii_lowercase().as_str() {
            "title" => update.title = Some(validate_title(value)?),
            "time" => update.time = Some(validate_time(value.trim())?),
            "description" => update.description = Some(value.trim().to_owned()),
            other => return Err(CommandError::UnknownField(other.to_owned())),
        }
    }

    if update.is_empty() {
        return Err(CommandError::NothingToEdit);
    }

    Ok(ConsoleCommand::Edit { id, update })
}

fn validate_title(raw: &str) -> Result<String, CommandError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(CommandError::EmptyTitle);
    }
    Ok(title.to_owned())
}

fn validate_time(raw: &str) -> Result<String, CommandError> {
    if !is_strict_24_hour(raw) {
        return Err(CommandError::InvalidTime(raw.to_owned()));
    }
    Ok(raw.to_owned())
}
