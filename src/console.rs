// 🖥️ Console - numbered menus over any line reader and writer
//
// stdin/stdout in the binary, byte buffers in tests. End of input always
// leaves the current menu quietly.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::access::{AccessControlSystem, Resource, User};
use crate::battle::{Battle, BattleResult, Campaign, PlayerAction, TurnSource};
use crate::entities::{Character, Monster};
use crate::error::GameResult;

/// What the user typed at a numbered prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Number(u32),
    Invalid,
}

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Console::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Console { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, line: impl Display) -> GameResult<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    /// Print `question` and read one line; None at end of input
    pub fn prompt(&mut self, question: &str) -> GameResult<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Like `prompt`, but an empty answer means `default`
    pub fn prompt_path(&mut self, question: &str, default: &Path) -> GameResult<Option<PathBuf>> {
        let question = format!("{} [{}]: ", question, default.display());
        Ok(self.prompt(&question)?.map(|answer| {
            let answer = answer.trim();
            if answer.is_empty() {
                default.to_path_buf()
            } else {
                PathBuf::from(answer)
            }
        }))
    }

    pub fn choice(&mut self, question: &str) -> GameResult<Option<Choice>> {
        Ok(self.prompt(question)?.map(|answer| match answer.trim().parse::<u32>() {
            Ok(n) => Choice::Number(n),
            Err(_) => Choice::Invalid,
        }))
    }
}

impl<R: BufRead, W: Write> TurnSource for Console<R, W> {
    fn next_action(&mut self, hero: &Character, _battle: &Battle) -> Option<PlayerAction> {
        loop {
            let menu = "\nYour turn:\n1. Attack\n2. Use item\nChoose action: ";
            let choice = match self.choice(menu) {
                Ok(Some(choice)) => choice,
                Ok(None) => return None,
                Err(e) => {
                    tracing::warn!(error = %e, "console read failed");
                    return None;
                }
            };

            match choice {
                Choice::Number(1) => return Some(PlayerAction::Attack),
                Choice::Number(2) => {
                    self.report(&hero.inventory().render());
                    match self.prompt("Enter item name to use: ") {
                        Ok(Some(name)) => return Some(PlayerAction::UseItem(name.trim().to_string())),
                        Ok(None) => return None,
                        Err(e) => {
                            tracing::warn!(error = %e, "console read failed");
                            return None;
                        }
                    }
                }
                _ => self.report("Invalid choice!"),
            }
        }
    }

    fn report(&mut self, line: &str) {
        if let Err(e) = self.say(line) {
            tracing::warn!(error = %e, "console write failed");
        }
    }
}

// ============================================================================
// CAMPAIGN MENU
// ============================================================================

/// Main game loop. Err(Defeated) when the hero falls in battle.
pub fn run_campaign<R: BufRead, W: Write>(console: &mut Console<R, W>, campaign: &mut Campaign) -> GameResult<()> {
    loop {
        console.say("\n=== MAIN MENU ===")?;
        console.say("1. Fight Goblin")?;
        console.say("2. Fight Dragon")?;
        console.say("3. Fight Skeleton")?;
        console.say("4. Show player info")?;
        console.say("5. Show inventory")?;
        console.say("6. Save game")?;
        console.say("7. Load game")?;
        console.say("8. Exit")?;

        let Some(choice) = console.choice("Choose option: ")? else {
            return Ok(());
        };

        let monster = match choice {
            Choice::Number(1) => Monster::goblin(),
            Choice::Number(2) => Monster::dragon(),
            Choice::Number(3) => Monster::skeleton(),
            Choice::Number(4) => {
                console.say(campaign.hero())?;
                continue;
            }
            Choice::Number(5) => {
                console.say(campaign.hero().inventory().render())?;
                continue;
            }
            Choice::Number(6) => {
                match campaign.save() {
                    Ok(()) => console.say("Game saved!")?,
                    Err(e) => console.say(format!("Error saving game: {}", e))?,
                }
                continue;
            }
            Choice::Number(7) => {
                match campaign.load() {
                    Ok(()) => console.say("Game loaded!")?,
                    Err(e) => console.say(format!("Error loading game: {}", e))?,
                }
                continue;
            }
            Choice::Number(8) => return Ok(()),
            _ => {
                console.say("Invalid choice!")?;
                continue;
            }
        };

        if campaign.start_battle(monster, console)? == BattleResult::Abandoned {
            return Ok(());
        }
    }
}

// ============================================================================
// ACCESS MENU
// ============================================================================

fn show_all<R: BufRead, W: Write>(console: &mut Console<R, W>, lines: impl IntoIterator<Item = String>) -> GameResult<()> {
    for line in lines {
        console.say(line)?;
    }
    Ok(())
}

pub fn run_access<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    system: &mut AccessControlSystem<User, Resource>,
    users_path: &Path,
    resources_path: &Path,
) -> GameResult<()> {
    loop {
        console.say("\nChoose an action:")?;
        console.say("1. Show users")?;
        console.say("2. Show resources")?;
        console.say("3. Check user access to a resource")?;
        console.say("4. Search users by name")?;
        console.say("5. Sort users by access level")?;
        console.say("6. Save data to files")?;
        console.say("7. Load data from files")?;
        console.say("8. Exit")?;

        let Some(choice) = console.choice("Enter choice: ")? else {
            return Ok(());
        };

        match choice {
            Choice::Number(1) => show_all(console, system.users().iter().map(|u| u.to_string()))?,
            Choice::Number(2) => show_all(console, system.resources().iter().map(|r| r.to_string()))?,
            Choice::Number(3) => {
                let Some(raw_id) = console.prompt("Enter user ID: ")? else {
                    return Ok(());
                };
                let Ok(user_id) = raw_id.trim().parse::<i64>() else {
                    console.say("Invalid user ID")?;
                    continue;
                };
                let Some(resource) = console.prompt("Enter resource name: ")? else {
                    return Ok(());
                };
                let resource = resource.trim();
                match system.check_user_access(user_id, resource) {
                    Ok(true) => console.say(format!("User with ID {} has access to {}", user_id, resource))?,
                    Ok(false) => console.say(format!(
                        "User with ID {} does not have access to {}",
                        user_id, resource
                    ))?,
                    Err(e) => console.say(format!("Error: {}", e))?,
                }
            }
            Choice::Number(4) => {
                let Some(name) = console.prompt("Enter a name to search for: ")? else {
                    return Ok(());
                };
                let name = name.trim();
                console.say(format!("Search results for users named \"{}\":", name))?;
                show_all(console, system.search_users_by_name(name).iter().map(|u| u.to_string()))?;
            }
            Choice::Number(5) => {
                system.sort_users_by_access_level();
                console.say("Users sorted by access level:")?;
                show_all(console, system.users().iter().map(|u| u.to_string()))?;
            }
            Choice::Number(6) => {
                let Some(users) = console.prompt_path("Users file", users_path)? else {
                    return Ok(());
                };
                let Some(resources) = console.prompt_path("Resources file", resources_path)? else {
                    return Ok(());
                };
                match system.save(&users, &resources) {
                    Ok(()) => console.say("Data saved to files.")?,
                    Err(e) => console.say(format!("Error saving data: {}", e))?,
                }
            }
            Choice::Number(7) => {
                let Some(users) = console.prompt_path("Users file", users_path)? else {
                    return Ok(());
                };
                let Some(resources) = console.prompt_path("Resources file", resources_path)? else {
                    return Ok(());
                };
                match system.load(&users, &resources) {
                    Ok(()) => {
                        console.say("Data loaded from files:")?;
                        show_all(console, system.users().iter().map(|u| u.to_string()))?;
                        show_all(console, system.resources().iter().map(|r| r.to_string()))?;
                    }
                    Err(e) => console.say(format!("Error loading data: {}", e))?,
                }
            }
            Choice::Number(8) => {
                console.say("Exiting the system. Goodbye!")?;
                return Ok(());
            }
            _ => console.say("Invalid choice. Please try again.")?,
        }
    }
}
