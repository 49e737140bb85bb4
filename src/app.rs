// Top-level application: owns the API client, the mirror and the logged-in
// user's id, and wires the menus. Every sub-menu is gated on authentication,
// and the entries that mutate server state are only offered to staff.

use std::io::Write;

use crate::api::ApiClient;
use crate::managers::{auth, goals, group_goals, groups, topics};
use crate::menu::{Console, Description, Entry, Menu};
use crate::mirror::Mirror;

pub struct App {
    pub api: ApiClient,
    pub mirror: Mirror,
    pub user_id: Option<u64>,
}

impl App {
    pub fn new(api: ApiClient) -> Self {
        App {
            api,
            mirror: Mirror::new(),
            user_id: None,
        }
    }

    fn is_authenticated(&self) -> bool {
        self.api.has_token()
    }

    fn print_status(&self, console: &mut Console) -> anyhow::Result<()> {
        if self.is_authenticated() {
            let rule = "=".repeat(80);
            writeln!(console.out, "\n{rule}")?;
            writeln!(
                console.out,
                "Groups: {} | Goals: {} | Topics: {} | Group Goals: {}",
                self.mirror.store.number_of_groups(),
                self.mirror.store.number_of_goals(),
                self.mirror.store.number_of_topics(),
                self.mirror.store.number_of_group_goals(),
            )?;
            writeln!(console.out, "{rule}\n")?;
        } else {
            writeln!(console.out, "\nYou must login first\n")?;
        }
        Ok(())
    }

    fn login(&mut self, console: &mut Console) -> anyhow::Result<()> {
        if let Some(user_id) = auth::login(&mut self.api, &mut self.mirror, &mut console.out)? {
            self.user_id = Some(user_id);
        }
        Ok(())
    }

    fn logout(&mut self, console: &mut Console) -> anyhow::Result<()> {
        if auth::logout(&mut self.api, &mut self.mirror, &mut console.out)? {
            self.user_id = None;
        }
        Ok(())
    }

    fn manage_groups(&mut self, console: &mut Console) -> anyhow::Result<()> {
        if !self.is_authenticated() {
            writeln!(console.out, "You must login first")?;
            return Ok(());
        }

        let mut builder = Menu::<App>::builder(Description::new("Manage Groups")?)
            .auto_display(|app: &mut App, console: &mut Console| {
                groups::render(&app.mirror, &mut console.out)?;
                Ok(())
            })
            .entry(Entry::new("1", "Add Group", |app: &mut App, console: &mut Console| {
                groups::add_group(&app.api, &mut app.mirror, &mut console.out)
            })?)?
            .entry(Entry::new("2", "Join Group", |app: &mut App, console: &mut Console| {
                groups::join_group(&app.api, &mut app.mirror, &mut console.out)
            })?)?
            .entry(Entry::new("3", "Leave Group", |app: &mut App, console: &mut Console| {
                groups::leave_group(&app.api, &mut app.mirror, &mut console.out)
            })?)?;

        if self.api.is_staff() {
            builder = builder
                .entry(Entry::new("4", "Remove Group", |app: &mut App, console: &mut Console| {
                    groups::remove_group(&app.api, &mut app.mirror, &mut console.out)
                })?)?
                .entry(Entry::new("5", "Sort by Name", |app: &mut App, console: &mut Console| {
                    groups::sort_groups(&mut app.mirror, &mut console.out)
                })?)?;
        }

        let mut menu = builder
            .entry(Entry::exit("0", "Back", |_: &mut App, _: &mut Console| Ok(()))?)?
            .build()?;
        menu.run(self, console)?;
        Ok(())
    }

    fn manage_goals(&mut self, console: &mut Console) -> anyhow::Result<()> {
        if !self.is_authenticated() {
            writeln!(console.out, "You must login first")?;
            return Ok(());
        }

        let mut builder = Menu::<App>::builder(Description::new("Manage Goals")?)
            .auto_display(|app: &mut App, console: &mut Console| {
                goals::render(&app.mirror.store, &mut console.out)?;
                Ok(())
            });

        if self.api.is_staff() {
            builder = builder
                .entry(Entry::new("1", "Add Goal", |app: &mut App, console: &mut Console| {
                    goals::add_goal(&app.api, &mut app.mirror, &mut console.out)
                })?)?
                .entry(Entry::new("2", "Remove Goal", |app: &mut App, console: &mut Console| {
                    goals::remove_goal(&app.api, &mut app.mirror, &mut console.out)
                })?)?
                .entry(Entry::new("3", "Sort by Points", |app: &mut App, console: &mut Console| {
                    goals::sort_goals(&mut app.mirror, &mut console.out)
                })?)?;
        } else {
            builder = builder.entry(Entry::new(
                "1",
                "Sort by Points",
                |app: &mut App, console: &mut Console| {
                    goals::sort_goals(&mut app.mirror, &mut console.out)
                },
            )?)?;
        }

        let mut menu = builder
            .entry(Entry::exit("0", "Back", |_: &mut App, _: &mut Console| Ok(()))?)?
            .build()?;
        menu.run(self, console)?;
        Ok(())
    }

    fn manage_topics(&mut self, console: &mut Console) -> anyhow::Result<()> {
        if !self.is_authenticated() {
            writeln!(console.out, "You must login first")?;
            return Ok(());
        }

        let mut builder = Menu::<App>::builder(Description::new("Manage Topics")?)
            .auto_display(|app: &mut App, console: &mut Console| {
                topics::render(&app.mirror.store, &mut console.out)?;
                Ok(())
            });

        if self.api.is_staff() {
            builder = builder
                .entry(Entry::new("1", "Add Topic", |app: &mut App, console: &mut Console| {
                    topics::add_topic(&app.api, &mut app.mirror, &mut console.out)
                })?)?
                .entry(Entry::new("2", "Remove Topic", |app: &mut App, console: &mut Console| {
                    topics::remove_topic(&app.api, &mut app.mirror, &mut console.out)
                })?)?
                .entry(Entry::new("3", "Sort by Title", |app: &mut App, console: &mut Console| {
                    topics::sort_topics(&mut app.mirror, &mut console.out)
                })?)?;
        } else {
            builder = builder.entry(Entry::new(
                "1",
                "Sort by Title",
                |app: &mut App, console: &mut Console| {
                    topics::sort_topics(&mut app.mirror, &mut console.out)
                },
            )?)?;
        }

        let mut menu = builder
            .entry(Entry::exit("0", "Back", |_: &mut App, _: &mut Console| Ok(()))?)?
            .build()?;
        menu.run(self, console)?;
        Ok(())
    }

    fn manage_group_goals(&mut self, console: &mut Console) -> anyhow::Result<()> {
        if !self.is_authenticated() {
            writeln!(console.out, "You must login first")?;
            return Ok(());
        }

        let mut builder = Menu::<App>::builder(Description::new("Manage Group Goals")?)
            .auto_display(|app: &mut App, console: &mut Console| {
                group_goals::render(&app.mirror, &mut console.out)?;
                Ok(())
            });

        if self.api.is_staff() {
            builder = builder
                .entry(Entry::new(
                    "1",
                    "Assign Goal to Group",
                    |app: &mut App, console: &mut Console| {
                        group_goals::add_group_goal(&app.api, &mut app.mirror, &mut console.out)
                    },
                )?)?
                .entry(Entry::new(
                    "2",
                    "Remove Goal from Group",
                    |app: &mut App, console: &mut Console| {
                        group_goals::remove_group_goal(&app.api, &mut app.mirror, &mut console.out)
                    },
                )?)?
                .entry(Entry::new(
                    "3",
                    "Toggle Goal Completion",
                    |app: &mut App, console: &mut Console| {
                        group_goals::toggle_group_goal(&app.api, &mut app.mirror, &mut console.out)
                    },
                )?)?;
        }

        let mut menu = builder
            .entry(Entry::exit("0", "Back", |_: &mut App, _: &mut Console| Ok(()))?)?
            .build()?;
        menu.run(self, console)?;
        Ok(())
    }

    /// Build and run the top-level menu. Blocks until the user exits.
    pub fn run(&mut self, console: &mut Console) -> anyhow::Result<()> {
        let mut menu = Menu::<App>::builder(Description::new("Group Project Manager")?)
            .auto_display(|app: &mut App, console: &mut Console| app.print_status(console))
            .entry(Entry::new("1", "Login", |app: &mut App, console: &mut Console| {
                app.login(console)
            })?)?
            .entry(Entry::new("2", "Manage Groups", App::manage_groups)?)?
            .entry(Entry::new("3", "Manage Goals", App::manage_goals)?)?
            .entry(Entry::new("4", "Manage Topics", App::manage_topics)?)?
            .entry(Entry::new("5", "Manage Group Goals", App::manage_group_goals)?)?
            .entry(Entry::new("6", "Logout", |app: &mut App, console: &mut Console| {
                app.logout(console)
            })?)?
            .entry(Entry::exit("0", "Exit", |_: &mut App, console: &mut Console| {
                writeln!(console.out, "Bye!")?;
                Ok(())
            })?)?
            .build()?;
        menu.run(self, console)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn test_app() -> App {
        App::new(ApiClient::new("http://localhost:1/api/v1/").unwrap())
    }

    fn run_app(app: &mut App, input: &str) -> String {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        let mut console = Console {
            input: &mut reader,
            out: &mut out,
        };
        app.run(&mut console).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn unauthenticated_status_asks_for_login() {
        let mut app = test_app();
        let out = run_app(&mut app, "0\n");
        assert!(out.contains("You must login first"));
        assert!(out.contains("Bye!"));
    }

    #[test]
    fn sub_menus_are_gated_on_authentication() {
        let mut app = test_app();
        let out = run_app(&mut app, "2\n3\n4\n5\n0\n");
        // Four refusals: one per sub-menu attempt, on top of the status hint.
        let refusals = out.matches("You must login first").count();
        assert!(refusals >= 5, "expected gate messages, got:\n{out}");
        assert!(!out.contains("--- Manage Groups ---"));
    }

    #[test]
    fn action_feedback_lands_in_the_session_transcript() {
        let mut app = test_app();
        let out = run_app(&mut app, "6\n0\n");
        assert!(out.contains("You are not logged in"));
    }

    #[test]
    fn unknown_top_level_key_is_rejected() {
        let mut app = test_app();
        let out = run_app(&mut app, "9\n0\n");
        assert!(out.contains("Invalid selection"));
    }
}
