//! Human-facing status lines on top of `tracing`. Mirrors the teacher's
//! `dev-cli` convention of printing through `console::style` for anything
//! meant for a terminal, while `tracing` carries the structured record.

use console::style;

/// Prints colourised status lines, or plain text when `--monochrome`/`--silent`
/// is set. Errors always go to stderr; everything else goes to stdout.
#[derive(Debug, Clone, Copy)]
pub struct Ui {
    monochrome: bool,
    silent: bool,
    debug: bool,
}

impl Ui {
    pub fn new(monochrome: bool, silent: bool, debug: bool) -> Self {
        Self {
            monochrome,
            silent,
            debug,
        }
    }

    pub fn info(&self, msg: &str) {
        if self.silent {
            return;
        }
        if self.monochrome {
            println!("{msg}");
        } else {
            println!("{}", style(msg).green());
        }
    }

    pub fn debug(&self, msg: &str) {
        if !self.debug || self.silent {
            return;
        }
        if self.monochrome {
            println!("{msg}");
        } else {
            println!("{}", style(msg).magenta());
        }
    }

    pub fn error(&self, msg: &str) {
        if self.monochrome {
            eprintln!("{msg}");
        } else {
            eprintln!("{}", style(msg).red());
        }
    }
}
