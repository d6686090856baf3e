use anyhow::{Context, Result, bail};
use clap::Parser;
use klondike_engine::{CardId, Config, Engine, Hint, PileId, StockClick};
use std::io::{BufRead, IsTerminal, Write, stdin, stdout};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const HELP: &str = r#"Commands:
  d, draw               Draw from the stock (recycles the discard when empty)
  m, move <card> <pile> Move a card and everything on it, e.g. `m QH T3` or `m AS F1`
  u, undo               Undo the last move
  h, hint               Suggest a move
  s, show               Print the board
  n, new                Deal a new game
  ?, help               Show this help
  q, quit               Exit
Piles: T1..T7 tableaus, F1..F4 foundations, S stock, D discard."#;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Seed for a reproducible deal
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
    /// Let hints suggest moves onto empty piles
    #[arg(long)]
    hint_empty: bool,
    /// Log every engine transition to stderr
    #[arg(short, long)]
    verbose: bool,
    /// Path to a game state file to load
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config {
        hint_empty_destinations: cli.hint_empty,
        ..Config::default()
    };
    let mut engine = match &cli.file {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read '{}'", path.display()))?;
            Engine::parse(&content, config).context("Failed to parse board")?
        }
        None => match cli.seed {
            Some(seed) => Engine::from_seed(config, seed),
            None => Engine::new(config),
        },
    };

    let interactive = stdin().is_terminal();
    println!("{}\n", engine.pretty_print());
    if interactive {
        println!("{HELP}");
        prompt()?;
    }

    for line in stdin().lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            prompt_if(interactive)?;
            continue;
        };
        let args: Vec<&str> = words.collect();
        match command {
            "q" | "quit" | "exit" => break,
            "?" | "help" => println!("{HELP}"),
            "s" | "show" => println!("{}", engine.pretty_print()),
            _ => match run_command(&mut engine, command, &args) {
                Ok(message) => {
                    if let Some(message) = message {
                        println!("{message}");
                    }
                    println!("{}", engine.pretty_print());
                    if engine.check_win() {
                        println!("\n✓ You won in {} moves!", engine.move_count());
                        break;
                    }
                }
                Err(err) => println!("Error: {err:#}"),
            },
        }
        prompt_if(interactive)?;
    }

    Ok(())
}

fn run_command(engine: &mut Engine, command: &str, args: &[&str]) -> Result<Option<String>> {
    debug!("Command {command} {args:?}");
    let message = match command {
        "d" | "draw" => match engine.stock_click() {
            StockClick::Drew(card) => Some(format!("Drew {card}")),
            StockClick::Recycled(count) => Some(format!("Recycled {count} cards")),
            StockClick::Empty => Some("Nothing left to draw".to_string()),
        },
        "m" | "move" => {
            let [card, pile] = args else {
                bail!("Usage: move <card> <pile>");
            };
            let card: CardId = card.parse()?;
            let pile: PileId = pile.parse()?;
            let run = engine.begin_drag(card)?;
            if engine.commit_move(run, pile).accepted {
                None
            } else {
                Some(format!("{card} cannot go to {pile}"))
            }
        }
        "u" | "undo" => {
            if engine.undo_last_move() {
                None
            } else {
                Some("Nothing to undo".to_string())
            }
        }
        "h" | "hint" => {
            let hint = engine.show_hint();
            let text = match hint {
                Hint::Move { card, destination } => format!("Try {card} to {destination}"),
                Hint::DrawFromStock => hint.text().unwrap_or_default().to_string(),
            };
            // no renderer here, so the highlights expire right away
            engine.clear_highlights();
            Some(text)
        }
        "n" | "new" => {
            engine.reset_all();
            Some("New game".to_string())
        }
        _ => bail!("Unknown command '{command}', type `help`"),
    };
    Ok(message)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn prompt() -> Result<()> {
    print!("> ");
    stdout().flush().context("Failed to flush stdout")
}

fn prompt_if(interactive: bool) -> Result<()> {
    if interactive { prompt() } else { Ok(()) }
}
