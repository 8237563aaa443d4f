//! Store Commands
//!
//! The primitives the connection handle knows how to send, and the raw
//! replies they come back with.

// == Command ==
/// One store primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `GET key`
    Get(String),
    /// `SET key value` (clears any previous expiry)
    Set(String, String),
    /// `SETEX key seconds value`
    SetEx(String, u64, String),
    /// `DEL key`
    Del(String),
    /// `EXISTS key`
    Exists(String),
    /// `PING`
    Ping,
}

impl Command {
    /// Name of the primitive as the store spells it.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Get(_) => "GET",
            Command::Set(..) => "SET",
            Command::SetEx(..) => "SETEX",
            Command::Del(_) => "DEL",
            Command::Exists(_) => "EXISTS",
            Command::Ping => "PING",
        }
    }

    /// Builds the wire command for the redis client.
    pub fn to_cmd(&self) -> redis::Cmd {
        let mut cmd = redis::cmd(self.name());
        match self {
            Command::Get(key) | Command::Del(key) | Command::Exists(key) => {
                cmd.arg(key);
            }
            Command::Set(key, value) => {
                cmd.arg(key).arg(value);
            }
            Command::SetEx(key, seconds, value) => {
                cmd.arg(key).arg(*seconds).arg(value);
            }
            Command::Ping => {}
        }
        cmd
    }
}

// == Reply ==
/// Raw result of a primitive, before the cache layer interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Bulk string or nil (GET)
    Value(Option<String>),
    /// Plain acknowledgement (SET, SETEX)
    Ok,
    /// Integer reply (DEL, EXISTS)
    Integer(i64),
    /// Status line (PING)
    Status(String),
}
