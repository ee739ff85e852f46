use std::{
    collections::VecDeque,
    io::{self, Write},
};

use anyhow::Context as _;
use clap::Parser;
use crossterm::{
    QueueableCommand,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use indicatif::ProgressBar;
use match_three_engine::{Catalog, Engine, KindId, Position, SwapOutcome, TileId};

/// Seeded autoplay over the match-three board engine: repeatedly finds a
/// legal move, swaps, cascades, and reshuffles when the board dries up.
#[derive(Parser)]
struct Args {
    /// Board width in cells
    #[arg(long, default_value_t = 8)]
    width: i32,

    /// Board height in cells
    #[arg(long, default_value_t = 8)]
    height: i32,

    /// RNG seed; the same seed replays the identical session
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of swaps to play
    #[arg(long, default_value_t = 100)]
    moves: u64,

    /// Skip the final board dump
    #[arg(long)]
    quiet: bool,
}

/// A swap request as the input layer hands it over: the swiped tile and the
/// direction of its partner.
struct SwapCommand {
    tile: TileId,
    direction: Position,
}

#[derive(Default)]
struct Stats {
    matched_swaps: u64,
    failed_swaps: u64,
    reshuffles: u64,
    tiles_cleared: usize,
    tiles_spawned: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut engine = Engine::new(Catalog::classic(), args.width, args.height, args.seed);
    let mut queue: VecDeque<SwapCommand> = VecDeque::new();
    let mut stats = Stats::default();

    let bar = ProgressBar::new(args.moves);
    let mut played = 0;
    let mut dry_runs = 0;

    while played < args.moves {
        if queue.is_empty() {
            match engine.find_possible_move() {
                Ok((origin, partner)) => {
                    dry_runs = 0;
                    let direction =
                        engine.tile(partner).position - engine.tile(origin).position;
                    queue.push_back(SwapCommand {
                        tile: origin,
                        direction,
                    });
                }
                Err(_) => {
                    dry_runs += 1;
                    anyhow::ensure!(
                        dry_runs < 100,
                        "board keeps reshuffling into dead positions"
                    );
                    stats.reshuffles += 1;
                    engine.reshuffle();
                    continue;
                }
            }
        }

        let Some(command) = queue.pop_front() else {
            continue;
        };

        let target = engine.tile(command.tile).position + command.direction;
        let partner = engine
            .tile_at(target)
            .context("swap partner left the board")?
            .id;

        played += 1;
        bar.inc(1);

        match engine.swap(command.tile, partner) {
            SwapOutcome::Matched(mut record) => {
                engine.cascade(&mut record);
                stats.matched_swaps += 1;
                stats.tiles_cleared += record.matched.len();
                stats.tiles_spawned += record.created.len();
                engine.clear_record(&mut record);
            }
            SwapOutcome::NoMatch => stats.failed_swaps += 1,
        }
    }

    bar.finish_and_clear();

    if !args.quiet {
        print_board(&engine)?;
    }

    println!(
        "played {played} swaps: {} matched, {} without effect, {} reshuffles",
        stats.matched_swaps, stats.failed_swaps, stats.reshuffles
    );
    println!(
        "{} tiles cleared, {} spawned",
        stats.tiles_cleared, stats.tiles_spawned
    );

    Ok(())
}

fn print_board(engine: &Engine) -> io::Result<()> {
    let mut stdout = io::stdout();
    let bounds = engine.board().bounds();

    for y in (bounds.min.y..=bounds.max.y).rev() {
        for x in bounds.min.x..=bounds.max.x {
            match engine.tile_at(Position::new(x, y)) {
                Some(tile) => {
                    let glyph = (b'A' + tile.kind.0) as char;
                    stdout
                        .queue(SetForegroundColor(kind_color(tile.kind)))?
                        .queue(Print(glyph))?
                        .queue(Print(' '))?;
                }
                None => {
                    stdout.queue(Print(". "))?;
                }
            }
        }
        stdout.queue(ResetColor)?.queue(Print('\n'))?;
    }

    stdout.flush()
}

fn kind_color(kind: KindId) -> Color {
    match kind.0 % 6 {
        0 => Color::Red,
        1 => Color::Yellow,
        2 => Color::Green,
        3 => Color::Blue,
        4 => Color::Magenta,
        _ => Color::Cyan,
    }
}
