pub mod messages;
pub mod monitoring;
pub mod notes;
pub mod notifications;

use std::{
    io::Write,
    sync::{Mutex, PoisonError},
};

use uc_poll::RenderError;

/// The block of terminal output owned by exactly one controller.
///
/// Each render replaces the panel's lines wholesale and reprints it.
pub struct Panel {
    title: &'static str,
    lines: Mutex<Vec<String>>,
    echo: bool,
}

impl Panel {
    #[must_use]
    pub const fn new(title: &'static str) -> Self {
        Self {
            title,
            lines: Mutex::new(Vec::new()),
            echo: true,
        }
    }

    /// A panel that keeps its lines without printing them.
    #[must_use]
    pub const fn quiet(title: &'static str) -> Self {
        Self {
            title,
            lines: Mutex::new(Vec::new()),
            echo: false,
        }
    }

    /// Replace the panel's content and print it.
    ///
    /// # Errors
    /// If stdout cannot be written.
    pub fn replace(&self, lines: Vec<String>) -> Result<(), RenderError> {
        let mut current =
            self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        *current = lines;

        if !self.echo {
            return Ok(());
        }

        let stamp = chrono::Local::now().format("%H:%M:%S");
        let mut out = std::io::stdout().lock();
        writeln!(out, "== {} [{}]", self.title, stamp)?;
        for line in current.iter() {
            writeln!(out, "   {line}")?;
        }
        out.flush()?;

        Ok(())
    }

    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Counter shown next to a panel title; large counts are capped.
#[must_use]
pub fn badge(count: u64) -> String {
    if count > 99 {
        "99+".to_string()
    } else {
        count.to_string()
    }
}

#[must_use]
pub fn full_name(prenom: &str, nom: &str) -> String {
    format!("{prenom} {}", nom.to_uppercase())
}
