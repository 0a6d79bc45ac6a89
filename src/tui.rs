//! The Textual User Interface for the Xiangqi client.

use crossterm::style::{style, StyledContent, Stylize};
use std::io::{self, Write};
use tokio::runtime::Runtime;
use tracing::error;

use client::config::Config;
use client::constants::{Color, BOARD_COLS, BOARD_ROWS};
use client::driver::{self, Action, Request};
use client::position::Position;
use client::service::HttpGameClient;
use client::session::{local_side, Session};
use client::snapshot::BoardSnapshot;
use client::status::{StatusClass, StatusLine};

/// One line typed at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Click(Position),
    NewGame,
    AiMove,
    Refresh,
    Help,
    Quit,
}

/// Runs the main loop for the text-based UI.
pub fn run(config: Config) -> io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let service = HttpGameClient::new(config.server_url);
    let mut session = Session::new(config.game, config.ai_move_delay);

    println!("--- Xiangqi ---");
    print_help();

    let request = session.new_game();
    drive(&runtime, &service, &mut session, Some(request));

    loop {
        println!();
        print_board(&session);
        print_prompt(&session)?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let request = match parse_input(&line) {
            Some(Input::Quit) => break,
            Some(Input::Help) => {
                print_help();
                continue;
            }
            Some(Input::NewGame) => Some(session.new_game()),
            Some(Input::AiMove) => session.request_ai_move(),
            Some(Input::Refresh) => session.resync(),
            Some(Input::Click(pos)) => session.click(pos),
            None => {
                println!("Unknown command. Type 'h' for help.");
                continue;
            }
        };
        drive(&runtime, &service, &mut session, request);
    }
    Ok(())
}

/// Performs `request` and its follow-ups, reporting progress as it goes.
fn drive(
    runtime: &Runtime,
    service: &HttpGameClient,
    session: &mut Session,
    request: Option<Request>,
) {
    runtime.block_on(driver::drive(service, session, request, show_step));
}

/// Shows what the session is about to wait for. Before the AI's scheduled
/// turn the board is printed, so the local move is seen on its own.
fn show_step(session: &Session, request: &Request) {
    match request.action {
        Action::Wake { .. } => {
            println!();
            print_board(session);
        }
        Action::ValidMoves { .. } => {}
        _ => println!("{}", styled_status(session.status())),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  <row> <col>  click an intersection (row 0 is Black's back rank)");
    println!("  n            start a new game");
    println!("  a            ask the AI to move");
    println!("  s            reload the game from the server");
    println!("  h            show this help");
    println!("  q            quit");
}

fn print_prompt(session: &Session) -> io::Result<()> {
    if session.is_ai_turn_available() {
        println!("(the AI is to move, type 'a')");
    }
    let side = session
        .snapshot()
        .map(|snapshot| snapshot.current_player)
        .filter(|_| session.is_local_turn())
        .or_else(|| local_side(session.config()));
    match side {
        Some(color) => print!("{} > ", color.name()),
        None => print!("> "),
    }
    io::stdout().flush()
}

/// Parses `"r c"`, or one of the single-letter commands.
fn parse_input(line: &str) -> Option<Input> {
    let mut words = line.split_whitespace();
    let first = words.next()?;
    let input = match first {
        "n" | "new" => Input::NewGame,
        "a" | "ai" => Input::AiMove,
        "s" | "sync" => Input::Refresh,
        "h" | "help" => Input::Help,
        "q" | "quit" | "exit" => Input::Quit,
        row => {
            let row = row.parse().ok()?;
            let col = words.next()?.parse().ok()?;
            Input::Click(Position::new(row, col)?)
        }
    };
    match words.next() {
        Some(_) => None,
        None => Some(input),
    }
}

fn print_board(session: &Session) {
    let Some(snapshot) = session.snapshot() else {
        println!("{}", styled_status(session.status()));
        return;
    };

    println!("   {}", (0..BOARD_COLS).map(|col| format!("{col} ")).collect::<String>());
    for row in 0..BOARD_ROWS {
        if row == 5 {
            println!("   {}", style("  楚河      漢界").dark_cyan());
        }
        let cells: Vec<String> = (0..BOARD_COLS)
            .filter_map(|col| Position::new(row, col))
            .map(|pos| cell(session, snapshot, pos).to_string())
            .collect();
        println!("{row:>2} {}", cells.concat());
    }

    if !snapshot.captured.is_empty() {
        let captured: Vec<String> = snapshot
            .captured
            .iter()
            .filter_map(|piece| Some(paint(piece.glyph()?, piece.color).to_string()))
            .collect();
        println!("Captured: {}", captured.concat());
    }
    if let Some(mv) = session.last_move() {
        println!("Last move: {mv}");
    }
    println!("{}", styled_status(session.status()));
}

fn cell(session: &Session, snapshot: &BoardSnapshot, pos: Position) -> StyledContent<char> {
    let glyph = match snapshot.piece_at(pos) {
        Some(piece) => match piece.glyph() {
            Some(glyph) => paint(glyph, piece.color),
            None => {
                error!(%pos, "cannot draw piece of unknown kind");
                '？'.magenta()
            }
        },
        None => '＋'.dark_grey(),
    };

    if session.selected() == Some(pos) {
        glyph.on_yellow()
    } else if session.candidates().contains(&pos) {
        glyph.on_green()
    } else if session.last_move().is_some_and(|mv| mv.from == pos || mv.to == pos) {
        glyph.on_dark_blue()
    } else {
        glyph
    }
}

fn paint(glyph: char, color: Color) -> StyledContent<char> {
    match color {
        Color::Red => glyph.red().bold(),
        Color::Black => glyph.white().bold(),
    }
}

fn styled_status(status: &StatusLine) -> StyledContent<&str> {
    let text = style(status.text.as_str());
    match status.class {
        StatusClass::Normal => text,
        StatusClass::Check => text.yellow().bold(),
        StatusClass::Checkmate => text.red().bold(),
        StatusClass::Stalemate => text.dark_grey(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clicks() {
        assert_eq!(
            parse_input("9 4\n"),
            Some(Input::Click(Position::new(9, 4).unwrap()))
        );
        assert_eq!(parse_input("  0   8 "), Some(Input::Click(Position::new(0, 8).unwrap())));
    }

    #[test]
    fn rejects_off_board_or_malformed_clicks() {
        assert_eq!(parse_input("10 0"), None);
        assert_eq!(parse_input("0 9"), None);
        assert_eq!(parse_input("3"), None);
        assert_eq!(parse_input("3 4 5"), None);
        assert_eq!(parse_input("-1 2"), None);
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_input("n"), Some(Input::NewGame));
        assert_eq!(parse_input("a\n"), Some(Input::AiMove));
        assert_eq!(parse_input("s"), Some(Input::Refresh));
        assert_eq!(parse_input("exit"), Some(Input::Quit));
        assert_eq!(parse_input(""), None);
        assert_eq!(parse_input("x"), None);
    }
}
