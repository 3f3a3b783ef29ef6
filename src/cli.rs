use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::instrument;

use crate::shared::{AppError, AppState};
use crate::tournament::{Tournament, TournamentFilter};
use crate::user::User;

/// Track game tournaments, matches and leaderboards
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory holding the JSON records (overrides TOURNEYHUB_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account and log in
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List the game catalog
    Games,
    #[command(subcommand)]
    Tournament(TournamentCommand),
    #[command(subcommand)]
    Match(MatchCommand),
    /// Rank players overall or for one game
    Leaderboard {
        #[arg(long)]
        game: Option<String>,
    },
    /// Show a player's record (defaults to the logged-in user)
    Stats {
        #[arg(long)]
        user: Option<String>,
    },
    #[command(subcommand)]
    Chat(ChatCommand),
    #[command(subcommand)]
    Notifications(NotificationCommand),
}

#[derive(Subcommand, Debug)]
pub enum TournamentCommand {
    List {
        #[arg(long, default_value_t = TournamentFilter::All)]
        filter: TournamentFilter,
        #[arg(long, default_value = "")]
        search: String,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        game: String,
        /// Start date as YYYY-MM-DD
        #[arg(long)]
        start_date: NaiveDate,
    },
    Join {
        id: String,
    },
    /// Show a tournament with its matches
    Show {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum MatchCommand {
    /// Schedule a match between tournament participants (usernames)
    Start {
        #[arg(long)]
        tournament: String,
        #[arg(long, value_delimiter = ',', required = true)]
        players: Vec<String>,
    },
    /// Record the winner (username) of a scheduled match
    Record {
        match_id: String,
        #[arg(long)]
        winner: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ChatCommand {
    Send { message: String },
    List,
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum NotificationCommand {
    List,
    Read { id: String },
    ReadAll,
    Clear,
}

/// Executes one command against the application state
#[instrument(skip(state))]
pub async fn run(state: &AppState, command: Command) -> Result<(), AppError> {
    state.catalog.initialize_demo_data().await?;

    match command {
        Command::Register {
            username,
            email,
            password,
        } => {
            let user = state.auth.register(&username, &email, &password).await?;
            println!("Registered and logged in as {} ({})", user.username, user.id);
        }
        Command::Login { username, password } => {
            let user = state.auth.login(&username, &password).await?;
            println!("Logged in as {}", user.username);
        }
        Command::Logout => {
            state.auth.logout().await?;
            println!("Logged out");
        }
        Command::Whoami => match state.auth.current_user().await? {
            Some(user) => println!("{} <{}> ({})", user.username, user.email, user.id),
            None => println!("Not logged in"),
        },
        Command::Games => {
            for game in state.catalog.list_games().await? {
                println!("{:>3}  {:<24} {}", game.id, game.name, game.description);
            }
        }
        Command::Tournament(command) => run_tournament(state, command).await?,
        Command::Match(command) => run_match(state, command).await?,
        Command::Leaderboard { game } => {
            let names = usernames(state).await?;
            let rows = state.stats.leaderboard(game.as_deref()).await?;
            if rows.is_empty() {
                println!("Complete some matches to see rankings appear here");
            }
            for row in rows {
                println!(
                    "#{:<3} {:<20} W {:<4} L {:<4} {:>3}%",
                    row.position,
                    display_name(&names, &row.user_id),
                    row.wins,
                    row.losses,
                    row.win_rate_percent
                );
            }
        }
        Command::Stats { user } => {
            let user = match user {
                Some(username) => resolve_username(state, &username).await?,
                None => state.auth.require_user().await?,
            };
            match state.stats.user_stats(&user.id).await? {
                Some(stats) => {
                    println!(
                        "{}: rank #{}  {}W / {}L  ({} played, {}% win rate)",
                        user.username,
                        stats.rank,
                        stats.wins,
                        stats.losses,
                        stats.games_played,
                        stats.win_rate_percent()
                    );
                    for (game_id, game) in &stats.game_stats {
                        println!(
                            "  game {:<4} rank #{:<3} {}W / {}L",
                            game_id, game.rank, game.wins, game.losses
                        );
                    }
                }
                None => println!("{} has not played any matches yet", user.username),
            }
        }
        Command::Chat(command) => run_chat(state, command).await?,
        Command::Notifications(command) => run_notifications(state, command).await?,
    }

    Ok(())
}

async fn run_tournament(state: &AppState, command: TournamentCommand) -> Result<(), AppError> {
    match command {
        TournamentCommand::List { filter, search } => {
            let viewer = state.auth.current_user().await?;
            let tournaments = state
                .tournaments
                .search_tournaments(viewer.as_ref(), filter, &search)
                .await?;
            for tournament in tournaments {
                print_tournament(&tournament);
            }
        }
        TournamentCommand::Create {
            name,
            game,
            start_date,
        } => {
            let actor = state.auth.require_user().await?;
            let tournament = state
                .tournaments
                .create_tournament(&actor, &name, &game, start_date)
                .await?;
            println!("Tournament created successfully!");
            print_tournament(&tournament);
        }
        TournamentCommand::Join { id } => {
            let actor = state.auth.require_user().await?;
            let tournament = state.tournaments.join_tournament(&actor, &id).await?;
            println!("Joined tournament {}", tournament.name);
        }
        TournamentCommand::Show { id } => {
            let tournament = state
                .tournaments
                .get_tournament(&id)
                .await?
                .ok_or_else(|| AppError::NotFound("Tournament not found".to_string()))?;
            let names = usernames(state).await?;
            print_tournament(&tournament);
            let players: Vec<&str> = tournament
                .participants
                .iter()
                .map(|id| display_name(&names, id))
                .collect();
            println!("  players: {}", players.join(", "));
            for game_match in state.tournaments.list_matches(&id).await? {
                let winner = game_match
                    .winner_id
                    .as_deref()
                    .map(|id| display_name(&names, id))
                    .unwrap_or("-");
                println!(
                    "  match {} [{}] winner: {}",
                    game_match.id, game_match.status, winner
                );
            }
        }
    }
    Ok(())
}

async fn run_match(state: &AppState, command: MatchCommand) -> Result<(), AppError> {
    let actor = state.auth.require_user().await?;
    match command {
        MatchCommand::Start {
            tournament,
            players,
        } => {
            let mut participants = Vec::with_capacity(players.len());
            for username in &players {
                participants.push(resolve_username(state, username).await?.id);
            }
            let started = state
                .tournaments
                .start_match(&actor, &tournament, participants)
                .await?;
            println!("Match started! id: {}", started.id);
        }
        MatchCommand::Record { match_id, winner } => {
            let winner = resolve_username(state, &winner).await?;
            state
                .tournaments
                .record_match_result(&actor, &match_id, &winner.id)
                .await?;
            println!("Match result recorded! Winner: {}", winner.username);
        }
    }
    Ok(())
}

async fn run_chat(state: &AppState, command: ChatCommand) -> Result<(), AppError> {
    match command {
        ChatCommand::Send { message } => {
            let actor = state.auth.require_user().await?;
            if state.chat.send_message(&actor, &message).await?.is_none() {
                println!("Nothing to send");
            }
        }
        ChatCommand::List => {
            let names = usernames(state).await?;
            for message in state.chat.list_messages().await? {
                println!(
                    "[{}] {}: {}",
                    message.timestamp.format("%Y-%m-%d %H:%M"),
                    display_name(&names, &message.sender_id),
                    message.content
                );
            }
        }
        ChatCommand::Clear => {
            state.chat.clear_chat().await?;
            println!("Chat cleared");
        }
    }
    Ok(())
}

async fn run_notifications(state: &AppState, command: NotificationCommand) -> Result<(), AppError> {
    let actor = state.auth.require_user().await?;
    match command {
        NotificationCommand::List => {
            for notification in state.notifications.notifications_for(&actor.id).await? {
                let marker = if notification.read { " " } else { "*" };
                println!(
                    "{} {} [{}] {}",
                    marker, notification.id, notification.kind, notification.content
                );
            }
            println!(
                "{} unread",
                state.notifications.unread_count(&actor.id).await?
            );
        }
        NotificationCommand::Read { id } => state.notifications.mark_as_read(&id).await?,
        NotificationCommand::ReadAll => state.notifications.mark_all_as_read(&actor).await?,
        NotificationCommand::Clear => state.notifications.clear_notifications(&actor).await?,
    }
    Ok(())
}

fn print_tournament(tournament: &Tournament) {
    println!(
        "{}  {:<24} game {:<3} {:<9} starts {}  ({} players)",
        tournament.id,
        tournament.name,
        tournament.game_id,
        tournament.status,
        tournament.start_date,
        tournament.participants.len()
    );
}

async fn resolve_username(state: &AppState, username: &str) -> Result<User, AppError> {
    state
        .auth
        .find_by_username(username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {username} not found")))
}

async fn usernames(state: &AppState) -> Result<HashMap<String, String>, AppError> {
    Ok(state
        .auth
        .list_users()
        .await?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect())
}

fn display_name<'a>(names: &'a HashMap<String, String>, user_id: &'a str) -> &'a str {
    names.get(user_id).map(String::as_str).unwrap_or(user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_match_start_player_list() {
        let cli = Cli::parse_from([
            "tourneyhub",
            "match",
            "start",
            "--tournament",
            "t1",
            "--players",
            "ann,bob",
        ]);
        match cli.command {
            Command::Match(MatchCommand::Start {
                tournament,
                players,
            }) => {
                assert_eq!(tournament, "t1");
                assert_eq!(players, vec!["ann", "bob"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_tournament_filter_and_date() {
        let cli = Cli::parse_from([
            "tourneyhub",
            "--data-dir",
            "/tmp/th",
            "tournament",
            "list",
            "--filter",
            "joined",
        ]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/th")));
        assert!(matches!(
            cli.command,
            Command::Tournament(TournamentCommand::List {
                filter: TournamentFilter::Joined,
                ..
            })
        ));

        let cli = Cli::parse_from([
            "tourneyhub",
            "tournament",
            "create",
            "--name",
            "Cup",
            "--game",
            "1",
            "--start-date",
            "2026-11-01",
        ]);
        match cli.command {
            Command::Tournament(TournamentCommand::Create { start_date, .. }) => {
                assert_eq!(start_date, NaiveDate::from_ymd_opt(2026, 11, 1).unwrap());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[tokio::test]
    async fn commands_requiring_login_are_rejected() {
        let state = crate::shared::test_utils::test_state().await;
        let result = run(&state, Command::Chat(ChatCommand::Send {
            message: "hi".to_string(),
        }))
        .await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
