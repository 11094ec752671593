// interactive_mode.rs
use crate::ratio::Resolution;
use crate::studio::{PosterApi, Studio};
use crate::theme::PreferenceStore;
use crate::upload::DiskFile;

use lazy_static::lazy_static;
use log::{error, info};
use regex::Regex;
use std::io::{self, Write};
use std::path::PathBuf;

lazy_static! {
    static ref COMMAND: Regex = Regex::new(r"^(\S+)\s*(.*)$").unwrap();
}

const HELP: &str = "Commands:
  upload <path>          load a product image (JPG, PNG, WEBP, max 5MB)
  ratio <9:16|16:9|1:1|3:4|4:3>
  resolution <auto|N>    long side in pixels
  concept [text]         set the concept, empty to use the placeholder
  refine <on|off>        refine the prompt before generating
  generate               create a poster
  list                   show posters
  history                count posters
  delete <id>
  download <id> [dir]
  theme                  toggle dark/light
  exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Upload(PathBuf),
    Ratio(String),
    Resolution(String),
    Concept(String),
    Refine(bool),
    Generate,
    List,
    History,
    Delete(u64),
    Download(u64, PathBuf),
    Theme,
    Help,
    Exit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let captures = COMMAND
        .captures(line)
        .ok_or_else(|| "Type 'help' for commands".to_string())?;
    let name = captures[1].to_ascii_lowercase();
    let rest = captures[2].trim();

    let poster_id = |raw: &str| {
        raw.parse::<u64>()
            .map_err(|_| format!("'{}' is not a poster id", raw))
    };

    match name.as_str() {
        "upload" if !rest.is_empty() => Ok(Command::Upload(PathBuf::from(rest))),
        "ratio" if !rest.is_empty() => Ok(Command::Ratio(rest.to_string())),
        "resolution" if !rest.is_empty() => Ok(Command::Resolution(rest.to_string())),
        "concept" => Ok(Command::Concept(rest.to_string())),
        "refine" => match rest.to_ascii_lowercase().as_str() {
            "on" => Ok(Command::Refine(true)),
            "off" => Ok(Command::Refine(false)),
            _ => Err("Usage: refine <on|off>".to_string()),
        },
        "generate" => Ok(Command::Generate),
        "list" => Ok(Command::List),
        "history" => Ok(Command::History),
        "delete" => poster_id(rest).map(Command::Delete),
        "download" => {
            let mut parts = rest.splitn(2, char::is_whitespace);
            let id = poster_id(parts.next().unwrap_or(""))?;
            let dir = parts
                .next()
                .map(str::trim)
                .filter(|dir| !dir.is_empty())
                .unwrap_or(".");
            Ok(Command::Download(id, PathBuf::from(dir)))
        }
        "theme" => Ok(Command::Theme),
        "help" => Ok(Command::Help),
        "exit" | "quit" => Ok(Command::Exit),
        _ => Err(format!("Unknown or incomplete command '{}'. Type 'help'.", line)),
    }
}

/// Runs one command. Returns `false` when the session should end.
pub async fn apply_command<A, S>(studio: &mut Studio<A, S>, command: Command) -> bool
where
    A: PosterApi,
    S: PreferenceStore,
{
    match command {
        Command::Upload(path) => match DiskFile::open(&path).await {
            Ok(file) => studio.upload(&file).await,
            Err(e) => {
                error!("Cannot open {}: {:?}", path.display(), e);
                studio.state.notify(e.to_string());
            }
        },
        Command::Ratio(tag) => studio.state.select_ratio(&tag),
        Command::Resolution(raw) => match raw.parse::<Resolution>() {
            Ok(resolution) => studio.state.resolution = resolution,
            Err(e) => studio.state.notify(e),
        },
        Command::Concept(text) => studio.state.concept = text,
        Command::Refine(enabled) => studio.state.refine_enabled = enabled,
        Command::Generate => {
            println!("Generating...");
            studio.generate().await;
        }
        Command::List => {
            if studio.state.gallery.is_empty() {
                println!("No posters yet.");
            }
            for poster in studio.state.gallery.iter() {
                println!("{}  {}  {}  {}", poster.id, poster.ratio, poster.timestamp, first_line(&poster.concept));
            }
        }
        Command::History => studio.state.show_history(),
        Command::Delete(id) => {
            studio.state.delete_poster(id);
        }
        Command::Download(id, dir) => {
            studio.download(id, &dir).await;
        }
        Command::Theme => {
            studio.toggle_theme().await;
            println!("Theme: {}", studio.state.theme.as_str());
        }
        Command::Help => println!("{}", HELP),
        Command::Exit => return false,
    }
    true
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

pub async fn run_interactive_mode<A, S>(mut studio: Studio<A, S>) -> Result<(), Box<dyn std::error::Error>>
where
    A: PosterApi,
    S: PreferenceStore,
{
    studio.load_preferences().await;
    println!("Poster studio ({} theme). Type 'help' for commands.", studio.state.theme.as_str());

    loop {
        print!("\nstudio> ");
        io::stdout().flush()?;
        let mut user_input = String::new();
        if io::stdin().read_line(&mut user_input)? == 0 {
            break;
        }
        let user_input = user_input.trim();
        if user_input.is_empty() {
            continue;
        }
        info!("Console input: {}", user_input);

        let keep_going = match parse_command(user_input) {
            Ok(command) => apply_command(&mut studio, command).await,
            Err(message) => {
                println!("{}", message);
                true
            }
        };
        for notice in studio.state.take_notices() {
            println!("{}", notice);
        }
        if !keep_going {
            info!("User requested exit");
            break;
        }
    }

    Ok(())
}
