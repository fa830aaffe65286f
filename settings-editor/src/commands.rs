//! Settings subcommands.
//!
//! Every command works on one named settings file of one record type:
//!
//! - Test procedures (`--kind test`, the default)
//! - Project trees (`--kind project`)

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use colored::Colorize;
use objconf::{Decision, EditingSession, Introspect, TreeOutline, assign_path, resolve};

use crate::{
    ctx::AppContext,
    inspector::LineInspector,
    schema::{ProjectItem, SettingsType, TestSettings},
};

/// Record type of the settings file.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SettingsKind {
    /// Test procedure settings.
    #[default]
    Test,
    /// Project tree.
    Project,
}

/// What to do with a settings file.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SettingsCommand {
    /// Print the object tree.
    Show {
        name: String,
        /// Also list values left out of the tree.
        #[arg(long)]
        skipped: bool,
    },
    /// Print the value at a property path.
    Get { name: String, path: Option<String> },
    /// Assign a scalar at a property path and save.
    Set {
        name: String,
        path: String,
        #[arg(required = true, num_args = 1..)]
        value: Vec<String>,
    },
    /// Edit interactively; `save` writes the file, `quit` discards.
    Edit { name: String },
    /// Overwrite the file with the defaults.
    Reset { name: String },
    /// Write the JSON Schema next to the file.
    Schema { name: String },
    /// Print the file path for a settings name.
    Path { name: String },
}

/// Handler for settings commands.
pub struct CommandHandler;

impl CommandHandler {
    /// Runs `cmd` on settings of the given kind.
    ///
    /// Interactive commands read from `input`; everything user-facing is
    /// written to `output`.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be loaded, edited or saved.
    pub fn handle(
        ctx: &AppContext,
        kind: SettingsKind,
        cmd: SettingsCommand,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
    ) -> Result<()> {
        match kind {
            SettingsKind::Test => Self::handle_for::<TestSettings>(ctx, cmd, input, output),
            SettingsKind::Project => Self::handle_for::<ProjectItem>(ctx, cmd, input, output),
        }
    }

    fn handle_for<T: SettingsType>(
        ctx: &AppContext,
        cmd: SettingsCommand,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
    ) -> Result<()> {
        match cmd {
            SettingsCommand::Show { name, skipped } => Self::show::<T>(ctx, &name, skipped, output),
            SettingsCommand::Get { name, path } => {
                Self::get::<T>(ctx, &name, path.as_deref().unwrap_or(""), output)
            }
            SettingsCommand::Set { name, path, value } => {
                Self::set::<T>(ctx, &name, &path, &value.join(" "), output)
            }
            SettingsCommand::Edit { name } => Self::edit::<T>(ctx, &name, input, output),
            SettingsCommand::Reset { name } => {
                ctx.store.save(&T::default(), &name)?;
                writeln!(
                    output,
                    "reset {}",
                    ctx.settings_path(&name).display().to_string().bold()
                )?;
                Ok(())
            }
            SettingsCommand::Schema { name } => {
                let path = ctx.store.save_schema::<T>(&name)?;
                writeln!(output, "{}", path.display())?;
                Ok(())
            }
            SettingsCommand::Path { name } => {
                writeln!(output, "{}", ctx.settings_path(&name).display())?;
                Ok(())
            }
        }
    }

    fn open<'s, T: SettingsType>(
        ctx: &'s AppContext,
        name: &str,
    ) -> Result<EditingSession<'s, T>> {
        EditingSession::open(&ctx.store, name, ctx.label.as_str())
            .with_context(|| format!("can not load {}", ctx.settings_path(name).display()))
    }

    fn show<T: SettingsType>(
        ctx: &AppContext,
        name: &str,
        list_skipped: bool,
        output: &mut dyn Write,
    ) -> Result<()> {
        let session = Self::open::<T>(ctx, name)?;
        let walk = session.walk();
        match &walk.root {
            Some(root) => write!(output, "{}", root.render())?,
            None => writeln!(output, "{}", "nothing to show".yellow())?,
        }

        if list_skipped {
            for path in &walk.skipped {
                let path = if path.is_empty() { "<root>" } else { path };
                writeln!(output, "{} {path}", "skipped".yellow())?;
            }
        } else if !walk.skipped.is_empty() {
            info!(
                "{} values left out of the tree, use --skipped to list them",
                walk.skipped.len()
            );
        }
        Ok(())
    }

    fn get<T: SettingsType>(
        ctx: &AppContext,
        name: &str,
        path: &str,
        output: &mut dyn Write,
    ) -> Result<()> {
        let session = Self::open::<T>(ctx, name)?;
        let target: &dyn Introspect = resolve(session.root(), path)?;
        let Some(node) = target.node() else {
            writeln!(output, "{}", "(absent)".dimmed())?;
            return Ok(());
        };

        let properties = node.properties();
        let elements = node.elements().unwrap_or_default();
        if properties.is_empty() && elements.is_empty() {
            writeln!(output, "{}", node.render())?;
            return Ok(());
        }
        for p in properties {
            writeln!(output, "{} = {}", p.name.bold(), p.value.render())?;
        }
        for (i, e) in elements.iter().enumerate() {
            writeln!(output, "{} = {}", i.to_string().bold(), e.render())?;
        }
        Ok(())
    }

    fn set<T: SettingsType>(
        ctx: &AppContext,
        name: &str,
        path: &str,
        text: &str,
        output: &mut dyn Write,
    ) -> Result<()> {
        let mut session = Self::open::<T>(ctx, name)?;

        let mut failure = None;
        let mut inspector = |_: Option<&TreeOutline>, root: &mut T| {
            match assign_path(root, path, text) {
                Ok(()) => Decision::Accept,
                Err(e) => {
                    failure = Some(e);
                    Decision::Cancel
                }
            }
        };
        session.edit(&mut inspector)?;
        if let Some(e) = failure {
            return Err(e).with_context(|| format!("can not set `{path}`"));
        }

        let shown = resolve(session.root(), path)?.render();
        writeln!(output, "{} = {}", path.bold(), shown.green())?;
        Ok(())
    }

    fn edit<T: SettingsType>(
        ctx: &AppContext,
        name: &str,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
    ) -> Result<()> {
        let mut session = Self::open::<T>(ctx, name)?;
        writeln!(
            output,
            "editing {}, type `help` for commands",
            ctx.settings_path(name).display()
        )?;

        let mut inspector = LineInspector::new(&mut *input, &mut *output);
        let decision = session.edit(&mut inspector)?;
        match decision {
            Decision::Accept => writeln!(output, "{}", "saved".green())?,
            Decision::Cancel => writeln!(output, "{}", "unchanged".dimmed())?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use tempfile::TempDir;

    use super::*;
    use crate::ctx::ContextOptions;

    fn context(dir: &TempDir) -> AppContext {
        AppContext::new(ContextOptions {
            dir: Some(dir.path().display().to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    fn run(ctx: &AppContext, kind: SettingsKind, cmd: SettingsCommand, script: &str) -> Result<String> {
        colored::control::set_override(false);
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        CommandHandler::handle(ctx, kind, cmd, &mut input, &mut output)?;
        Ok(String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_show_does_not_write() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let out = run(
            &ctx,
            SettingsKind::Test,
            SettingsCommand::Show {
                name: "My Settings".to_string(),
                skipped: true,
            },
            "",
        )
        .unwrap();
        assert!(out.starts_with("Settings\n└── Tests\n"), "{out}");
        assert!(out.contains("skipped tests.0.components.0.controlled_variables.0"), "{out}");
        assert!(!ctx.store.exists("My Settings"));
    }

    #[test]
    fn test_set_saves_and_get_reads_back() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let set = SettingsCommand::Set {
            name: "rig".to_string(),
            path: "tests.0.components.0.controlled_variables.0.timeout".to_string(),
            value: vec!["00:01:30".to_string()],
        };
        run(&ctx, SettingsKind::Test, set, "").unwrap();
        assert!(ctx.store.exists("rig"));

        let settings: TestSettings = ctx.store.load("rig").unwrap();
        let timeout = settings.tests[0].components.as_ref().unwrap()[0]
            .controlled_variables
            .as_ref()
            .unwrap()[0]
            .timeout;
        assert_eq!(timeout.as_secs(), 90);

        let get = SettingsCommand::Get {
            name: "rig".to_string(),
            path: Some("tests.0".to_string()),
        };
        let out = run(&ctx, SettingsKind::Test, get, "").unwrap();
        assert!(out.contains("name = Diode Test"), "{out}");
    }

    #[test]
    fn test_rejected_set_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let set = SettingsCommand::Set {
            name: "proj".to_string(),
            path: "assemblies.0.components".to_string(),
            value: vec!["x".to_string()],
        };
        assert!(run(&ctx, SettingsKind::Project, set, "").is_err());
        assert!(!ctx.store.exists("proj"));
    }

    #[test]
    fn test_edit_reset_schema_path() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);

        let edit = SettingsCommand::Edit {
            name: "proj".to_string(),
        };
        let out = run(&ctx, SettingsKind::Project, edit, "set name Renamed\nsave\n").unwrap();
        assert!(out.ends_with("saved\n"), "{out}");
        let project: ProjectItem = ctx.store.load("proj").unwrap();
        assert_eq!(project.name, "Renamed");

        let reset = SettingsCommand::Reset {
            name: "proj".to_string(),
        };
        run(&ctx, SettingsKind::Project, reset, "").unwrap();
        let project: ProjectItem = ctx.store.load("proj").unwrap();
        assert_eq!(project, ProjectItem::default());

        let schema = SettingsCommand::Schema {
            name: "proj".to_string(),
        };
        let out = run(&ctx, SettingsKind::Project, schema, "").unwrap();
        assert!(out.trim_end().ends_with("proj-schema.json"));
        assert!(dir.path().join("proj-schema.json").is_file());

        let path = SettingsCommand::Path {
            name: "a b".to_string(),
        };
        let out = run(&ctx, SettingsKind::Test, path, "").unwrap();
        assert_eq!(out.trim_end(), dir.path().join("a_b.toml").display().to_string());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        std::fs::write(ctx.settings_path("bad"), "name = ").unwrap();
        let show = SettingsCommand::Show {
            name: "bad".to_string(),
            skipped: false,
        };
        let err = run(&ctx, SettingsKind::Test, show, "").unwrap_err();
        assert!(format!("{err:#}").contains("malformed"), "{err:#}");
    }
}
