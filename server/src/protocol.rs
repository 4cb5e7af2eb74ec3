//! Telnet input handling: option negotiation and key-to-command mapping
//!
//! Players connect with a plain telnet client. The server asks the client to
//! send every keystroke immediately (character mode) and not to echo it, then
//! reads single-key commands out of the byte stream:
//!
//! | key | command      |
//! |-----|--------------|
//! | `w` | move up      |
//! | `a` | move left    |
//! | `s` | move down    |
//! | `d` | move right   |
//! | `e` | drop a bomb  |
//!
//! Any other byte is ignored. Telnet command sequences sent by the client
//! (option replies, subnegotiations) are stripped before mapping.

use game::Direction;

const IAC: u8 = 255;
const DONT: u8 = 254;
const DO: u8 = 253;
const WONT: u8 = 252;
const WILL: u8 = 251;
const SB: u8 = 250;
const SE: u8 = 240;

const ECHO: u8 = 1;
const SGA: u8 = 3;
const LINEMODE: u8 = 34;

/// Sent once when a client connects: we echo (so the client must not) and
/// suppress go-ahead, and we refuse line mode.
pub const NEGOTIATION: [u8; 9] = [IAC, WILL, ECHO, IAC, WILL, SGA, IAC, WONT, LINEMODE];

/// A player command decoded from input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    DropBomb,
}

impl Command {
    pub fn from_key(key: u8) -> Option<Self> {
        match key {
            b'w' => Some(Command::Move(Direction::Up)),
            b'a' => Some(Command::Move(Direction::Left)),
            b's' => Some(Command::Move(Direction::Down)),
            b'd' => Some(Command::Move(Direction::Right)),
            b'e' => Some(Command::DropBomb),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Data,
    /// Saw IAC
    Command,
    /// Saw IAC WILL/WONT/DO/DONT, next byte is the option
    Option,
    /// Inside IAC SB ... IAC SE
    Subnegotiation,
    /// Saw IAC inside a subnegotiation
    SubnegotiationIac,
}

/// Incremental decoder; telnet sequences may be split across reads.
#[derive(Debug, Default)]
pub struct InputDecoder {
    state: State,
}

impl InputDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes one chunk of input, returning the commands it contains in order.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Command> {
        let mut commands = Vec::new();
        for &byte in bytes {
            self.state = match (self.state, byte) {
                (State::Data, IAC) => State::Command,
                (State::Data, key) => {
                    commands.extend(Command::from_key(key));
                    State::Data
                }
                (State::Command, WILL | WONT | DO | DONT) => State::Option,
                (State::Command, SB) => State::Subnegotiation,
                // escaped 0xFF data byte or a bare command such as NOP
                (State::Command, _) => State::Data,
                (State::Option, _) => State::Data,
                (State::Subnegotiation, IAC) => State::SubnegotiationIac,
                (State::Subnegotiation, _) => State::Subnegotiation,
                (State::SubnegotiationIac, SE) => State::Data,
                (State::SubnegotiationIac, _) => State::Subnegotiation,
            };
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        let mut decoder = InputDecoder::new();
        assert_eq!(decoder.feed(b"w"), vec![Command::Move(Direction::Up)]);
        assert_eq!(decoder.feed(b"d"), vec![Command::Move(Direction::Right)]);
        assert_eq!(decoder.feed(b"a"), vec![Command::Move(Direction::Left)]);
        assert_eq!(decoder.feed(b"s"), vec![Command::Move(Direction::Down)]);
        assert_eq!(decoder.feed(b"e"), vec![Command::DropBomb]);
    }

    #[test]
    fn test_noise_is_ignored() {
        let mut decoder = InputDecoder::new();
        assert_eq!(
            decoder.feed(b"w\r\ndo\rq\nae"),
            vec![
                Command::Move(Direction::Up),
                Command::Move(Direction::Right),
                Command::Move(Direction::Left),
                Command::DropBomb,
            ]
        );
        assert!(decoder.feed(b"WASD xyz").is_empty());
    }

    #[test]
    fn test_option_replies_are_stripped() {
        let mut decoder = InputDecoder::new();
        // DO ECHO, DO SGA, then 'e'
        let input = [IAC, DO, ECHO, IAC, DO, SGA, b'e'];
        assert_eq!(decoder.feed(&input), vec![Command::DropBomb]);

        // option byte equal to the 'd' key must not be read as a move
        assert!(decoder.feed(&[IAC, WILL, b'd']).is_empty());
    }

    #[test]
    fn test_subnegotiation_is_stripped() {
        let mut decoder = InputDecoder::new();
        let input = [IAC, SB, 24, 0, b'w', b'a', IAC, SE, b's'];
        assert_eq!(decoder.feed(&input), vec![Command::Move(Direction::Down)]);
    }

    #[test]
    fn test_sequences_split_across_reads() {
        let mut decoder = InputDecoder::new();
        assert!(decoder.feed(&[IAC]).is_empty());
        assert!(decoder.feed(&[WILL]).is_empty());
        assert!(decoder.feed(&[b'w']).is_empty());
        assert_eq!(decoder.feed(b"w"), vec![Command::Move(Direction::Up)]);

        assert!(decoder.feed(&[IAC, SB, b'e']).is_empty());
        assert!(decoder.feed(&[b'e', IAC]).is_empty());
        assert_eq!(decoder.feed(&[SE, b'e']), vec![Command::DropBomb]);
    }

    #[test]
    fn test_negotiation_bytes() {
        assert_eq!(NEGOTIATION, [255, 251, 1, 255, 251, 3, 255, 252, 34]);
    }
}
