//! Line-oriented property inspector.
//!
//! Reads commands from any `BufRead` and prints to any `Write`, so the same
//! inspector drives an interactive terminal and scripted input.
//!
//! | Command              | Effect                                        |
//! |----------------------|-----------------------------------------------|
//! | `tree`               | print the object tree                         |
//! | `cd [path]`          | select a value; no path selects the root      |
//! | `ls [path]`          | print the property sheet of a value           |
//! | `set <path> <value>` | assign a scalar                               |
//! | `save`               | accept the edits                              |
//! | `quit`               | discard the edits                             |
//!
//! Paths are relative to the selected value.

use std::io::{self, BufRead, Write};

use colored::Colorize;
use objconf::{Decision, Introspect, PropertyInspector, TreeOutline, assign_path, resolve};

/// Inspector reading commands line by line.
pub struct LineInspector<R, W> {
    input: R,
    output: W,
    selected: String,
}

impl<R: BufRead, W: Write> LineInspector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            selected: String::new(),
        }
    }

    /// Consumes the inspector, returning its output.
    pub fn into_output(self) -> W {
        self.output
    }

    fn absolute(&self, path: &str) -> String {
        match (self.selected.is_empty(), path.is_empty()) {
            (true, _) => path.to_string(),
            (false, true) => self.selected.clone(),
            (false, false) => format!("{}.{path}", self.selected),
        }
    }

    fn run(&mut self, tree: Option<&TreeOutline>, value: &mut dyn Introspect) -> io::Result<Decision> {
        let mut line = String::new();
        loop {
            write!(self.output, "{}> ", self.selected.cyan())?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(Decision::Cancel);
            }
            let line = line.trim();
            let (cmd, args) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            let args = args.trim();

            match cmd {
                "" => {}
                "tree" => match tree {
                    Some(tree) => write!(self.output, "{}", tree.render())?,
                    None => writeln!(self.output, "{}", "(no tree)".dimmed())?,
                },
                "cd" => {
                    let path = if args.is_empty() {
                        String::new()
                    } else {
                        self.absolute(args)
                    };
                    match resolve(value, &path) {
                        Ok(_) => self.selected = path,
                        Err(e) => self.error(&e)?,
                    }
                }
                "ls" => {
                    let path = self.absolute(args);
                    match resolve(value, &path) {
                        Ok(target) => self.sheet(target)?,
                        Err(e) => self.error(&e)?,
                    }
                }
                "set" => {
                    let Some((path, text)) = args.split_once(char::is_whitespace) else {
                        self.error(&"usage: set <path> <value>")?;
                        continue;
                    };
                    let path = self.absolute(path);
                    match assign_path(value, &path, text.trim()) {
                        Ok(()) => {
                            let shown = resolve(value, &path).map(|v| v.render()).unwrap_or_default();
                            writeln!(self.output, "{} = {}", path.bold(), shown.green())?;
                        }
                        Err(e) => self.error(&e)?,
                    }
                }
                "save" => return Ok(Decision::Accept),
                "quit" | "q" => return Ok(Decision::Cancel),
                "help" => writeln!(self.output, "tree | cd [path] | ls [path] | set <path> <value> | save | quit")?,
                other => self.error(&format!("unknown command `{other}`"))?,
            }
        }
    }

    fn sheet(&mut self, target: &dyn Introspect) -> io::Result<()> {
        let Some(node) = target.node() else {
            return writeln!(self.output, "{}", "(absent)".dimmed());
        };
        writeln!(self.output, "{} {}", node.type_name().bold(), node.render())?;

        let mut category = None;
        for p in node.properties() {
            if p.category() != category {
                category = p.category();
                if let Some(c) = category {
                    writeln!(self.output, "[{}]", c.yellow())?;
                }
            }
            let marker = if p.is_expandable() { "+" } else { " " };
            writeln!(
                self.output,
                "{marker} {:<24} {}",
                p.name,
                p.value.render().green()
            )?;
            if p.display_name() != p.name {
                writeln!(self.output, "    {}", p.display_name().dimmed())?;
            }
            if let Some(d) = p.description() {
                writeln!(self.output, "    {}", d.dimmed())?;
            }
        }

        if let Some(elements) = node.elements() {
            for (i, e) in elements.iter().enumerate() {
                writeln!(self.output, "  [{i}] {}", e.render().green())?;
            }
        }
        if let Some(choices) = node.choices() {
            writeln!(self.output, "  one of: {}", choices.join(", "))?;
        }
        Ok(())
    }

    fn error(&mut self, e: &dyn std::fmt::Display) -> io::Result<()> {
        writeln!(self.output, "{} {e}", "error:".red().bold())
    }
}

impl<T, R, W> PropertyInspector<T> for LineInspector<R, W>
where
    T: Introspect,
    R: BufRead,
    W: Write,
{
    fn inspect(&mut self, tree: Option<&TreeOutline>, value: &mut T) -> Decision {
        match self.run(tree, value) {
            Ok(decision) => decision,
            Err(e) => {
                error!("inspector I/O failed, discarding edits: {e}");
                Decision::Cancel
            }
        }
    }
}
