//! Terminal front end: wires the puzzle engine, the profile resolver and
//! the leaderboard client into the full game loop. Tiles render as
//! numbers (the numeric placeholder path of the web UI).

use std::io::{self, BufRead, Write};

use inflynced_client::{
    EnvContext, JsonFileStore, LeaderboardClient, ProfileResolver, Resolution, SubmitOutcome,
    Tier, UserProfile,
};
use inflynced_engine::{Board, Cell, Direction, GameSession, MoveOutcome, Phase, ScoreEntry};

fn base_url() -> String {
    std::env::var("LEADERBOARD_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

fn data_dir() -> String {
    std::env::var("INFLYNCED_DATA_DIR").unwrap_or_else(|_| ".inflynced".to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let store = JsonFileStore::new(data_dir());
    let resolver = ProfileResolver::new(EnvContext, store.clone());
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let active = match resolver.resolve() {
        Resolution::Ready(active) => active,
        Resolution::NeedsUsername => {
            let name = prompt(&mut lines, "Enter your username: ")?;
            resolver.complete(&name)?
        }
    };
    println!("Playing as {} (fid {})", active.profile.username, active.profile.fid);

    let client = LeaderboardClient::new(base_url(), store);

    loop {
        let choice = prompt(&mut lines, "\n[p]lay  [l]eaderboard  [q]uit > ")?;
        match choice.trim() {
            "p" => play(&mut lines, &client, &active.profile).await?,
            "l" => {
                let standings = client.fetch().await?;
                render_standings(&standings.entries, standings.tier);
            }
            "q" | "" => break,
            other => println!("unknown command: {other}"),
        }
    }
    Ok(())
}

async fn play(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    client: &LeaderboardClient<JsonFileStore>,
    profile: &UserProfile,
) -> anyhow::Result<()> {
    let mut session = GameSession::new();
    session.start(&mut rand::thread_rng());
    println!(
        "Puzzle art: {} (tiles shown as numbers)",
        session.puzzle().image
    );

    while session.phase() == Phase::Playing {
        session.tick();
        render_board(session.board());
        println!(
            "progress {:>5.1}%   time {:>6.1}s",
            session.progress(),
            session.elapsed().as_secs_f64()
        );
        let input = prompt(lines, "move [w/a/s/d], [q] to abandon > ")?;
        let key = match input.trim().chars().next() {
            Some(c) => c.to_ascii_lowercase(),
            None => continue,
        };
        if key == 'q' {
            println!("abandoned");
            return Ok(());
        }
        let Some(target) = target_for_key(session.board(), key) else {
            println!("  ✗ no tile can move that way");
            continue;
        };
        match session.make_move(target) {
            MoveOutcome::Moved { .. } => {}
            MoveOutcome::Rejected | MoveOutcome::NotPlaying => {
                println!("  ✗ illegal move");
            }
        }
    }

    let Some(final_time) = session.final_time() else {
        return Ok(());
    };
    render_board(session.board());
    let secs = final_time.as_secs_f64();
    println!("🧩 Solved in {secs:.1} seconds!");

    match client.submit(profile, secs).await? {
        SubmitOutcome::Remote(receipt) => {
            println!(
                "Rank {} of {} players",
                receipt.position, receipt.total_scores
            );
            render_standings(&receipt.leaderboard, Tier::Remote);
        }
        SubmitOutcome::LocalFallback(entries) => {
            render_standings(&entries, Tier::LocalFallback);
        }
    }
    Ok(())
}

/// Original keyboard scheme: a key slides the tile on that side of the
/// hole, so `w` moves the tile below the hole up, which is the hole
/// sliding down.
fn target_for_key(board: &Board, key: char) -> Option<Cell> {
    let dir = match key {
        'w' => Direction::Down,
        's' => Direction::Up,
        'a' => Direction::Right,
        'd' => Direction::Left,
        _ => return None,
    };
    board.empty_target(dir)
}

fn render_board(board: &Board) {
    println!("+---+---+---+");
    for row in 0..inflynced_engine::GRID_SIZE {
        let mut line = String::from("|");
        for col in 0..inflynced_engine::GRID_SIZE {
            match board.tile(Cell::new(row, col)) {
                Some(tile) => line.push_str(&format!(" {} |", tile.value)),
                None => line.push_str("   |"),
            }
        }
        println!("{line}");
        println!("+---+---+---+");
    }
}

fn render_standings(entries: &[ScoreEntry], tier: Tier) {
    if tier == Tier::LocalFallback {
        println!("⚠ leaderboard unreachable, showing scores stored on this device");
    }
    if entries.is_empty() {
        println!("no scores yet");
        return;
    }
    for (i, entry) in entries.iter().enumerate() {
        println!("{:>2}. {:<20} {:>6.1}s", i + 1, entry.username, entry.time);
    }
}

fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    message: &str,
) -> io::Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => line,
        None => Ok("q".to_string()),
    }
}
