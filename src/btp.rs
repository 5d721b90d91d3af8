//! Bagh chal Text Protocol (BTP), a GTP-style command protocol.
//!
//! BTP lets a front end (board GUI, test harness, tournament runner) drive
//! the engine over stdin/stdout. Framing follows GTP version 2: an optional
//! numeric id, a command, arguments; success replies start with `=`,
//! failures with `?`, and each reply ends with a blank line.
//!
//! Vertices are written `a1`..`e5`: the letter is the column (`a` = 0) and
//! the digit is the row plus one, with row 0 at the top of the board.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version` - Engine identification
//! - `list_commands`, `known_command <cmd>` - Command discovery
//! - `quit` - Exit the program
//! - `clear_board` - Start a new game
//! - `place <vertex>` - Place a goat
//! - `move <from> <to>` - Move a piece; replies with the captured vertex, if any
//! - `legal <vertex>` - Destinations for the piece on a vertex
//! - `empty` - All empty vertices
//! - `genmove` - Search, play and print a tiger move (`none` if trapped)
//! - `depth <n>`, `seed <n>`, `verbose <on|off>` - Search settings
//! - `showboard`, `status` - Inspect the game
//!
//! ## Example
//!
//! ```ignore
//! use baghchal_rust::btp::BtpEngine;
//! let mut engine = BtpEngine::new();
//! engine.run()?;
//! ```

use std::io::{self, BufRead, Write};

use anyhow::{Context, bail};

use crate::board::{Point, parse_coord, str_coord};
use crate::constants::DEFAULT_DEPTH;
use crate::position::{Position, Side};
use crate::search::{TigerBot, dump_candidates};

/// The list of known BTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "clear_board",
    "depth",
    "empty",
    "genmove",
    "known_command",
    "legal",
    "list_commands",
    "move",
    "name",
    "place",
    "protocol_version",
    "quit",
    "seed",
    "showboard",
    "status",
    "verbose",
    "version",
];

/// BTP engine state.
pub struct BtpEngine {
    /// Current game position
    pos: Position,
    /// Tiger opponent used by `genmove`
    bot: TigerBot,
    /// Dump search details to stderr
    verbose: bool,
}

impl Default for BtpEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BtpEngine {
    /// Create a new engine with default depth and an entropy-seeded bot.
    pub fn new() -> Self {
        Self::with_bot(TigerBot::new(DEFAULT_DEPTH))
    }

    /// Create a new engine around a configured bot.
    pub fn with_bot(bot: TigerBot) -> Self {
        Self {
            pos: Position::new(),
            bot,
            verbose: false,
        }
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn position(&self) -> &Position {
        &self.pos
    }

    /// Run the command loop on stdin/stdout.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_io(stdin.lock(), stdout.lock())
    }

    /// Run the command loop over arbitrary streams until `quit` or end of input.
    pub fn run_io<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> anyhow::Result<()> {
        for line in input.lines() {
            let line = line.context("failed to read command")?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                // An id with no command still gets an answer
                writeln!(output, "?{id_str} empty command\n").context("failed to write response")?;
                output.flush().context("failed to flush response")?;
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };

            writeln!(output, "{prefix}{id_str} {message}\n").context("failed to write response")?;
            output.flush().context("failed to flush response")?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match self.dispatch(command, args) {
            Ok(response) => (true, response),
            Err(e) => (false, e.to_string()),
        }
    }

    fn dispatch(&mut self, command: &str, args: &[&str]) -> anyhow::Result<String> {
        match command {
            "name" => Ok("baghchal-rust".to_string()),

            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => Ok("1".to_string()),

            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let cmd = args.first().context("missing argument")?;
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                Ok(known.to_string())
            }

            "quit" => Ok(String::new()),

            "clear_board" => {
                self.pos = Position::new();
                Ok(String::new())
            }

            "place" => {
                let pt = vertex_arg(args, 0)?;
                self.pos.place_goat(pt)?;
                Ok(String::new())
            }

            "move" => {
                let from = vertex_arg(args, 0)?;
                let to = vertex_arg(args, 1)?;
                let captured = self.pos.play_move(from, to)?;
                Ok(captured.and_then(str_coord).unwrap_or_default())
            }

            "legal" => {
                let pt = vertex_arg(args, 0)?;
                Ok(join_vertices(&self.pos.legal_destinations(pt, true)))
            }

            "empty" => Ok(join_vertices(&self.pos.empty_cells())),

            "genmove" => {
                if let Some(winner) = self.pos.winner() {
                    bail!("game is over, {winner} won");
                }
                if self.pos.turn() != Side::Tiger {
                    bail!("not the tigers' turn");
                }

                let result = self.bot.search(&self.pos, self.bot.depth());
                if self.verbose {
                    dump_candidates(&result);
                }
                match result.best {
                    Some(mv) => {
                        self.pos.apply(mv)?;
                        Ok(mv.to_string())
                    }
                    None => Ok("none".to_string()),
                }
            }

            "depth" => {
                let arg = args.first().context("missing argument")?;
                let depth: u32 = arg
                    .parse()
                    .with_context(|| format!("invalid depth '{arg}'"))?;
                if depth == 0 {
                    bail!("depth must be at least 1");
                }
                self.bot.set_depth(depth);
                Ok(String::new())
            }

            "seed" => {
                let arg = args.first().context("missing argument")?;
                let seed: u64 = arg
                    .parse()
                    .with_context(|| format!("invalid seed '{arg}'"))?;
                self.bot.reseed(seed);
                Ok(String::new())
            }

            "verbose" => {
                match args.first().map(|s| s.to_lowercase()).as_deref() {
                    Some("on") => self.verbose = true,
                    Some("off") => self.verbose = false,
                    Some(other) => bail!("expected on or off, got '{other}'"),
                    None => bail!("missing argument"),
                }
                Ok(String::new())
            }

            "showboard" => Ok(format!("\n{}", self.pos.to_string().trim_end())),

            "status" => {
                let winner = self
                    .pos
                    .winner()
                    .map(|w| w.to_string())
                    .unwrap_or_else(|| "none".to_string());
                Ok(format!(
                    "turn {} phase {} placed {} captured {} winner {}",
                    self.pos.turn(),
                    self.pos.phase(),
                    self.pos.goats_placed(),
                    self.pos.goats_captured(),
                    winner
                ))
            }

            _ => bail!("unknown command: {command}"),
        }
    }
}

fn vertex_arg(args: &[&str], i: usize) -> anyhow::Result<Point> {
    let s = args.get(i).context("missing argument")?;
    parse_coord(s).with_context(|| format!("invalid vertex '{s}'"))
}

fn join_vertices(points: &[Point]) -> String {
    points
        .iter()
        .filter_map(|&pt| str_coord(pt))
        .collect::<Vec<_>>()
        .join(" ")
}
