//! Completion stream emitter
//!
//! The consuming editor parses a flat line stream:
//!
//! ```text
//! @@settings
//! ##MAX_ITEMS
//! Max items\nper page
//! @@queryset
//! ##filter(self, *args, **kwargs)
//! Return a new QuerySet instance...
//! ##
//! ```
//!
//! `@@` opens a group, `##` introduces a word, and the line after a word is
//! its documentation with every embedded newline re-encoded as the literal
//! two-character sequence `\n`. A final bare `##` marks end-of-stream; some
//! sources are lazy and the consumer cannot otherwise know collection is
//! complete.

use std::io::{self, Write};

/// Group and word names used by the pipeline
pub const GROUP_SETTINGS: &str = "settings";
pub const GROUP_QUERYSET: &str = "queryset";
pub const GROUP_TAGS: &str = "htmldjangotags";
pub const GROUP_FILTERS: &str = "htmldjangofilters";

/// Serializer for the completion stream
pub struct Emitter<W: Write> {
    out: W,
    current_group: Option<String>,
}

impl<W: Write> Emitter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            current_group: None,
        }
    }

    /// Switch to `name`, writing its `@@` header unless it is already the
    /// open group. The previous group is closed implicitly.
    pub fn group(&mut self, name: &str) -> io::Result<()> {
        if self.current_group.as_deref() == Some(name) {
            return Ok(());
        }
        writeln!(self.out, "@@{name}")?;
        self.current_group = Some(name.to_string());
        Ok(())
    }

    /// Write a word with its single documentation line (possibly empty)
    pub fn word(&mut self, text: &str, doc: &str) -> io::Result<()> {
        writeln!(self.out, "##{text}")?;
        writeln!(self.out, "{}", escape_doc(doc))
    }

    /// Write a word with no documentation line at all
    pub fn bare_word(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "##{text}")
    }

    /// Write the end-of-stream terminator and flush
    pub fn finish(&mut self) -> io::Result<()> {
        writeln!(self.out, "##")?;
        self.out.flush()
    }
}

/// Re-encode newlines so a documentation record occupies one physical line
pub fn escape_doc(doc: &str) -> String {
    doc.replace('\n', "\\n")
}

/// Render a template tag the way it is typed
pub fn tag_word(name: &str) -> String {
    format!("{{% {name} %}}")
}

/// Render a template filter the way it is typed
pub fn filter_word(name: &str) -> String {
    format!("|{name}")
}
