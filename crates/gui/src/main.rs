use clap::{Parser, ValueEnum};
use std::time::Duration;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use client::config::{Config, GameConfig};
use client::constants::Color;

mod gui;

#[derive(Parser)]
#[command(about = "Play Xiangqi against a remote engine")]
struct Args {
    /// Base URL of the game API
    #[arg(long, default_value = "http://localhost:8000/api")]
    server: String,

    /// Side played by the AI
    #[arg(long, value_enum, default_value_t = Side::Black)]
    ai_color: Side,

    /// Search depth for the AI
    #[arg(long, default_value_t = 3)]
    ai_depth: u32,

    /// Play both sides locally
    #[arg(long, default_value_t = false)]
    no_ai: bool,

    /// Pause before the AI answers a move, in milliseconds
    #[arg(long, default_value_t = 500)]
    ai_delay_ms: u64,

    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    Red,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::Red => Color::Red,
            Side::Black => Color::Black,
        }
    }
}

fn main() -> iced::Result {
    let args = Args::parse();
    initialize_logging(args.log_level);

    let config = Config {
        server_url: args.server,
        game: GameConfig {
            ai_enabled: !args.no_ai,
            ai_color: args.ai_color.into(),
            ai_depth: args.ai_depth,
        },
        ai_move_delay: Duration::from_millis(args.ai_delay_ms),
        ..Config::default()
    };
    gui::run(config)
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().event_format(format))
        .with(filter)
        .init();
}
