use break_the_code_helper::cli::{CliInterface, parse_cli, read_own_tiles};
use break_the_code_helper::history::{get_session_path, read_session};
use break_the_code_helper::tui::TuiInterface;
use break_the_code_helper::{GameInterface, PlayerCount, Session, game_loop, logging};
use std::io;

fn main() {
    let cli = parse_cli();
    logging::init(cli.verbose);

    let save_path = cli.session_file.clone().or_else(get_session_path);

    let mut session = if cli.resume {
        let Some(path) = save_path.as_deref() else {
            eprintln!("No session file location available to resume from.");
            return;
        };
        match read_session(path) {
            Ok(session) => {
                println!("Resumed {} hints from {}.", session.history().len(), path.display());
                session
            }
            Err(e) => {
                eprintln!("Failed to resume session from '{}': {e}", path.display());
                return;
            }
        }
    } else {
        let players = match PlayerCount::new(cli.players) {
            Ok(players) => players,
            Err(e) => {
                eprintln!("{e}");
                return;
            }
        };
        match &cli.tiles {
            Some(tiles) => match Session::from_tokens(tiles, players) {
                Ok(session) => session,
                Err(e) => {
                    eprintln!("Invalid hand: {e}");
                    return;
                }
            },
            None => match read_own_tiles(&mut io::stdin().lock(), players) {
                Some(session) => session,
                None => return,
            },
        }
    };

    let mut interface: Box<dyn GameInterface> = if cli.tui {
        match TuiInterface::new() {
            Ok(tui) => Box::new(tui),
            Err(e) => {
                eprintln!("Failed to start the terminal interface: {e}");
                return;
            }
        }
    } else {
        Box::new(CliInterface::new(io::stdin().lock()))
    };

    game_loop(&mut session, interface.as_mut(), save_path.as_deref());
}
