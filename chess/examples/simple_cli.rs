// Simple command-line application to play chess between two humans

use chessgate::{board::PrettyStyle, Color, Command, Game, PromotePiece};
use std::io::{self, Write};
use std::str::FromStr;

/// Settings read from environment variables
#[derive(Debug, Clone, Default)]
struct CliConfig {
    /// Board style, from `CHESS_BOARD_STYLE` (`ascii` or `utf8`)
    style: PrettyStyle,
}

impl CliConfig {
    fn from_env() -> Self {
        let style = match std::env::var("CHESS_BOARD_STYLE").as_deref() {
            Ok("utf8") => PrettyStyle::Utf8,
            Ok("ascii") | Err(_) => PrettyStyle::Ascii,
            Ok(other) => {
                tracing::warn!(style = other, "unknown board style, using ascii");
                PrettyStyle::Ascii
            }
        };
        CliConfig { style }
    }
}

fn read_line() -> Option<String> {
    io::stdout().flush().unwrap();
    let mut s = String::new();
    match io::stdin().read_line(&mut s) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(s),
    }
}

fn ask_promote(color: Color) -> PromotePiece {
    loop {
        print!("{} promotes to (Q/R/B/N): ", color);
        let Some(s) = read_line() else {
            // Input is closed, so nobody can answer anymore
            return PromotePiece::Queen;
        };
        match PromotePiece::from_str(&s) {
            Ok(p) => return p,
            Err(e) => println!("Bad piece: {}", e),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chessgate=info".into()),
        )
        .init();

    let config = CliConfig::from_env();
    let mut game = Game::new();

    loop {
        println!("{}", game.board().pretty(config.style));
        if game.is_check() {
            println!("{} is in check!", game.side());
        }
        print!("{} move: ", game.side());
        let Some(s) = read_line() else {
            break;
        };

        let (from, to) = match Command::from_str(&s) {
            Ok(Command::Move { from, to }) => (from, to),
            Ok(Command::Quit) => break,
            Err(e) => {
                println!("Bad command: {}", e);
                println!();
                continue;
            }
        };

        if let Err(e) = game.push(from, to, &mut ask_promote) {
            println!("Bad move: {}", e);
        }
        println!();
    }
}
