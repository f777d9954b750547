use std::{env, io::Write, path::PathBuf};

use log::error;
use rustyline::{DefaultEditor, Result, error::ReadlineError};
use tumpuk::{
    config::StorageConfig,
    utils::{logger::initialize_logger, self_test::test_heap_storage},
};

const HISTORY_FILE: &str = ".tumpuk_history";

fn read_multiline_command(rl: &mut DefaultEditor) -> Result<String> {
    let mut input = String::new();
    let mut prompt = "tumpuk> ".to_string();

    loop {
        let line = rl.readline(&prompt)?;
        let trimmed_line = line.trim_end();

        // Trailing backslash continues the command on the next line
        if let Some(continued) = trimmed_line.strip_suffix('\\') {
            input.push_str(continued);
            input.push(' ');
            prompt = "    -> ".to_string();
        } else {
            input.push_str(trimmed_line);
            break;
        }
    }

    Ok(input)
}

fn process_command(command: &str, config: &StorageConfig) -> bool {
    let cmd = command.trim();

    match cmd.to_lowercase().as_str() {
        "exit" | "quit" | "q" => {
            println!("Goodbye!");
            return false;
        }
        "help" | "h" => {
            println!(
                r#"
Available commands:
  help, h          - Show this help message
  test             - Run the heap storage self-test
  clear            - Clear the screen
  exit, quit, q    - Exit

Use '\' at the end of a line for multiline input.
"#
            );
        }
        "test" => match test_heap_storage(config) {
            Ok(true) => println!("test_heap_storage: ok"),
            Ok(false) => println!("test_heap_storage: failed"),
            Err(e) => println!("test_heap_storage: failed ({})", e),
        },
        "clear" => {
            print!("\x1B[2J\x1B[1;1H");
            let _ = std::io::stdout().flush();
        }
        "" => {}
        _ => {
            println!("SQL statements are not supported by this shell: {}", cmd);
        }
    }

    true
}

fn main() -> Result<()> {
    initialize_logger();

    let config = match env::args().nth(1) {
        Some(dir) => StorageConfig {
            data_dir: PathBuf::from(dir),
            ..StorageConfig::from_env()
        },
        None => StorageConfig::from_env(),
    };
    if let Err(e) = std::fs::create_dir_all(&config.data_dir) {
        error!("Cannot use data directory {}: {}", config.data_dir.display(), e);
        std::process::exit(1);
    }
    println!("tumpuk: running with data directory {}", config.data_dir.display());

    let history_path = config.data_dir.join(HISTORY_FILE);
    let mut rl = DefaultEditor::new()?;
    if rl.load_history(&history_path).is_err() {
        println!("No previous history.");
    }

    loop {
        match read_multiline_command(&mut rl) {
            Ok(input) => {
                let command = input.trim().to_string();
                if !command.is_empty() {
                    rl.add_history_entry(&command)?;
                }
                if !process_command(&command, &config) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                error!("Readline error: {:?}", err);
                break;
            }
        }
    }

    rl.save_history(&history_path)?;
    Ok(())
}
