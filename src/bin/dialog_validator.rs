//! Checks that every line of `dialogues.toml` fits in the dialog boxes.

use clap::Parser;
use env_logger::Env;
use expt02::cfg;
use expt02::cmtp::DialogData;
use expt02::engine::asset;
use expt02::systems::dialog;
use std::path::PathBuf;
use std::process;
use tcod::console;

const EXTRACT_LENGTH: usize = 20;

#[derive(Debug, Parser)]
#[command(name = "dialog_validator")]
struct Cli {
    /// Dialog file to check
    #[arg(default_value = "assets/data/dialogues.toml")]
    path: PathBuf,
}

fn extract(words: &str) -> String {
    let extract: String = words.chars().take(EXTRACT_LENGTH).collect();
    if words.chars().count() > EXTRACT_LENGTH {
        format!("{}...", extract)
    } else {
        extract
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let dialogs = match asset::load_entries::<DialogData>(&cli.path) {
        Ok(dialogs) => dialogs,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };

    let mut con = console::Offscreen::new(cfg::SCREEN_WIDTH, cfg::SCREEN_HEIGHT);
    let mut failures = 0;
    for (name, dialog) in &dialogs {
        println!("Examining '{}'...", name);
        for line in &dialog.content {
            let problems = dialog::line_problems(&mut con, line);
            if problems.is_empty() {
                continue;
            }
            failures += 1;
            println!("\t{}: \"{}\"", line.speaker, extract(&line.words));
            for problem in problems {
                println!("\t\t{}", problem);
            }
        }
    }

    if failures > 0 {
        println!("{} lines do not fit.", failures);
        process::exit(1);
    }
    println!("All {} dialogs fit.", dialogs.len());
}
