//! `reelfetch password` - interactive password generator.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Args;
use rand::Rng;
use tracing::info;

use crate::config::ResolvedConfig;
use crate::password::{generate, CharClass, PasswordRecord, PasswordStore};

#[derive(Args, Debug, Default)]
pub struct PasswordArgs {
    /// Password length (prompted if omitted)
    #[arg(short, long)]
    pub length: Option<usize>,

    /// Include letters
    #[arg(long)]
    pub letters: bool,

    /// Include numbers
    #[arg(long)]
    pub numbers: bool,

    /// Include special characters
    #[arg(long)]
    pub symbols: bool,

    /// Include super special characters (some sites reject these)
    #[arg(long)]
    pub extended: bool,

    /// Save the password for this website without asking
    #[arg(long)]
    pub save_for: Option<String>,
}

impl PasswordArgs {
    /// Classes chosen by flag; empty means "ask"
    fn flagged_classes(&self) -> Vec<CharClass> {
        let flags = [
            (self.letters, CharClass::Letters),
            (self.numbers, CharClass::Numbers),
            (self.symbols, CharClass::Symbols),
            (self.extended, CharClass::Extended),
        ];
        flags
            .into_iter()
            .filter_map(|(on, class)| on.then_some(class))
            .collect()
    }
}

/// Execute the password command against the terminal
pub async fn execute(args: PasswordArgs, config: &ResolvedConfig) -> Result<()> {
    let store = PasswordStore::new(&config.password_store);
    let stdin = io::stdin();
    let mut rng = rand::thread_rng();
    run(args, &store, &mut stdin.lock(), &mut io::stdout(), &mut rng).await?;
    Ok(())
}

/// Generate, print and optionally save a password. Returns it.
pub async fn run<R, W, G>(
    args: PasswordArgs,
    store: &PasswordStore,
    input: &mut R,
    output: &mut W,
    rng: &mut G,
) -> Result<String>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    let mut classes = args.flagged_classes();
    let interactive = classes.is_empty();
    if interactive {
        for class in CharClass::ALL {
            let question = format!("Would you like {}? (ex. {}) ", class, class.example());
            if is_yes(&ask(input, output, &question)?) {
                classes.push(class);
            }
        }
    }

    let length = match args.length {
        Some(length) => length,
        None => {
            let answer = ask(input, output, "How long would you like your password to be? ")?;
            answer
                .trim()
                .parse()
                .with_context(|| format!("Invalid length: {}", answer.trim()))?
        }
    };

    let password = generate(length, &classes, rng)?;
    writeln!(output, "{}", password)?;

    let website = match args.save_for {
        Some(website) if website.trim().is_empty() => {
            anyhow::bail!("--save-for needs a website name")
        }
        Some(website) => Some(website.trim().to_string()),
        None if interactive => {
            let question = format!("Would you like to save your password to {}? (y/n) ", store.path().display());
            if is_yes(&ask(input, output, &question)?) {
                Some(ask_website(input, output)?)
            } else {
                None
            }
        }
        None => None,
    };

    if let Some(website) = website {
        store.append(&PasswordRecord::new(&website, &password)).await?;
        info!(website = %website, store = %store.path().display(), "Password saved");
        writeln!(output, "Your password has been added to your saved passwords!")?;
    }

    Ok(password)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Ask until a non-blank website name is given
fn ask_website<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
    loop {
        let answer = ask(input, output, "What website will this password be used by? ")?;
        let website = answer.trim();
        if !website.is_empty() {
            return Ok(website.to_string());
        }
        writeln!(output, "Please enter a website name.")?;
    }
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String> {
    write!(output, "{}", question)?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line).context("Failed to read from stdin")? == 0 {
        anyhow::bail!("Input closed while waiting for an answer");
    }
    Ok(line)
}
