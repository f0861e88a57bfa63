use std::str::FromStr;

use studio_core::{ApiTag, Msg};

/// A line typed on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    Connected,
    Disconnected,
    Status,
    Invalidate,
    Schema,
    Help,
    Quit,
}

pub(crate) const HELP: &str = "\
commands:
  connected     socket (re)connected
  disconnected  socket dropped
  status        print connection, queue and template state
  invalidate    invalidate everything tagged FetchOnReconnect
  schema        reload node templates from the OpenAPI schema
  help          show this text
  quit          shut down";

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "connected" | "c" => Ok(Command::Connected),
            "disconnected" | "d" => Ok(Command::Disconnected),
            "status" | "s" => Ok(Command::Status),
            "invalidate" => Ok(Command::Invalidate),
            "schema" => Ok(Command::Schema),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(format!("unknown command '{other}', try 'help'")),
        }
    }
}

impl Command {
    /// The action this command dispatches, if it maps to one directly.
    pub(crate) fn action(self) -> Option<Msg> {
        match self {
            Command::Connected => Some(Msg::SocketConnected),
            Command::Disconnected => Some(Msg::SocketDisconnected),
            Command::Invalidate => Some(Msg::InvalidateTags(vec![ApiTag::FetchOnReconnect])),
            Command::Schema => Some(Msg::SchemaRequested),
            Command::Status | Command::Help | Command::Quit => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse_case_insensitively() {
        assert_eq!(" Connected ".parse::<Command>(), Ok(Command::Connected));
        assert_eq!("q".parse::<Command>(), Ok(Command::Quit));
        assert!("reboot".parse::<Command>().is_err());
    }

    #[test]
    fn connection_commands_map_to_socket_actions() {
        assert_eq!(Command::Connected.action(), Some(Msg::SocketConnected));
        assert_eq!(Command::Disconnected.action(), Some(Msg::SocketDisconnected));
        assert_eq!(Command::Status.action(), None);
    }
}
