// Generic interactive menu driver. A `Menu<C>` owns a list of key-bound
// entries and runs a blocking select loop against any context type `C`
// (the app passes itself). Input and output travel together as a `Console`
// of injected `BufRead` / `Write` handles, so actions can open sub-menus on
// the same streams and the whole loop can be driven from a test string.
//
// Builder rules: keys are unique, at least one entry, at least one exit
// entry. `build` consumes the builder, so a second build is a move error at
// compile time rather than a runtime check.

use std::fmt;
use std::io::{BufRead, Write};

use crate::error::{Error, Result};

const RESERVED_CHARS: [char; 6] = ['\n', '\r', '*', '^', '$', '@'];

fn has_reserved(value: &str) -> bool {
    value.chars().any(|c| RESERVED_CHARS.contains(&c) || c.is_control())
}

/// The input and output streams a menu runs over. Production wires locked
/// stdin/stdout; tests wire a cursor and a buffer.
pub struct Console<'a> {
    pub input: &'a mut dyn BufRead,
    pub out: &'a mut dyn Write,
}

/// The token a user types to select an entry. 1-10 printable chars, no
/// whitespace, none of the reserved specials.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key(String);

impl Key {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() || value.len() > 10 {
            return Err(Error::validation(
                "key",
                format!("length must be 1-10, got {}", value.len()),
            ));
        }
        if has_reserved(&value) || value.contains(' ') || !value.is_ascii() {
            return Err(Error::validation(
                "key",
                format!("contains a reserved or non-printable character: {value:?}"),
            ));
        }
        Ok(Key(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Label shown beside a key, or as the menu heading. 1-1000 chars, same
/// reserved-character rules as `Key` except that spaces are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description(String);

impl Description {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() || value.len() > 1000 {
            return Err(Error::validation(
                "description",
                format!("length must be 1-1000, got {}", value.len()),
            ));
        }
        if has_reserved(&value) || !value.is_ascii() {
            return Err(Error::validation(
                "description",
                format!("contains a reserved or non-printable character: {value:?}"),
            ));
        }
        Ok(Description(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

type Action<C> = Box<dyn FnMut(&mut C, &mut Console) -> anyhow::Result<()>>;

/// One selectable option: a key, a label, the bound action and whether
/// selecting it ends the loop.
pub struct Entry<C> {
    key: Key,
    description: Description,
    action: Action<C>,
    is_exit: bool,
}

impl<C> Entry<C> {
    pub fn new(
        key: &str,
        description: &str,
        action: impl FnMut(&mut C, &mut Console) -> anyhow::Result<()> + 'static,
    ) -> Result<Self> {
        Ok(Entry {
            key: Key::new(key)?,
            description: Description::new(description)?,
            action: Box::new(action),
            is_exit: false,
        })
    }

    pub fn exit(
        key: &str,
        description: &str,
        action: impl FnMut(&mut C, &mut Console) -> anyhow::Result<()> + 'static,
    ) -> Result<Self> {
        let mut entry = Entry::new(key, description, action)?;
        entry.is_exit = true;
        Ok(entry)
    }
}

impl<C> fmt::Debug for Entry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("description", &self.description)
            .field("is_exit", &self.is_exit)
            .finish_non_exhaustive()
    }
}

pub struct MenuBuilder<C> {
    description: Description,
    entries: Vec<Entry<C>>,
    auto_display: Option<Action<C>>,
}

impl<C> MenuBuilder<C> {
    /// Add an entry; a key already present in the menu is rejected here,
    /// at insertion time.
    pub fn entry(mut self, entry: Entry<C>) -> Result<Self> {
        if self.entries.iter().any(|e| e.key == entry.key) {
            return Err(Error::validation(
                "key",
                format!("duplicate menu key {:?}", entry.key.as_str()),
            ));
        }
        self.entries.push(entry);
        Ok(self)
    }

    /// Hook run once at the top of every loop iteration, before the prompt.
    /// Used for the "refresh the listing" pattern.
    pub fn auto_display(
        mut self,
        hook: impl FnMut(&mut C, &mut Console) -> anyhow::Result<()> + 'static,
    ) -> Self {
        self.auto_display = Some(Box::new(hook));
        self
    }

    pub fn build(self) -> Result<Menu<C>> {
        if self.entries.is_empty() {
            return Err(Error::validation("menu", "a menu needs at least one entry"));
        }
        if !self.entries.iter().any(|e| e.is_exit) {
            return Err(Error::validation("menu", "a menu needs an exit entry"));
        }
        Ok(Menu {
            description: self.description,
            entries: self.entries,
            auto_display: self.auto_display,
        })
    }
}

pub struct Menu<C> {
    description: Description,
    entries: Vec<Entry<C>>,
    auto_display: Option<Action<C>>,
}

impl<C> Menu<C> {
    pub fn builder(description: Description) -> MenuBuilder<C> {
        MenuBuilder {
            description,
            entries: Vec::new(),
            auto_display: None,
        }
    }

    /// Run the select loop until an exit entry fires (or input hits EOF).
    /// An action that returns `Err` aborts that operation only: the error
    /// is printed and the loop goes back to the prompt.
    pub fn run(&mut self, ctx: &mut C, console: &mut Console) -> std::io::Result<()> {
        loop {
            if let Some(hook) = &mut self.auto_display {
                if let Err(e) = hook(ctx, console) {
                    writeln!(console.out, "Error: {e:#}")?;
                }
            }
            writeln!(console.out, "--- {} ---", self.description)?;
            for entry in &self.entries {
                writeln!(console.out, "{}: {}", entry.key, entry.description)?;
            }
            write!(console.out, "> ")?;
            console.out.flush()?;

            let mut line = String::new();
            if console.input.read_line(&mut line)? == 0 {
                // Console closed; nothing left to select.
                return Ok(());
            }
            let choice = line.trim();

            match self.entries.iter_mut().find(|e| e.key.as_str() == choice) {
                None => writeln!(console.out, "Invalid selection. Please, try again...")?,
                Some(entry) => {
                    let is_exit = entry.is_exit;
                    if let Err(e) = (entry.action)(ctx, console) {
                        writeln!(console.out, "Error: {e:#}")?;
                    }
                    if is_exit {
                        return Ok(());
                    }
                }
            }
        }
    }
}
