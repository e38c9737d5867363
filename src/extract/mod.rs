// Textual extraction of completion symbols from Python sources
//
// Extractors read configuration and framework sources as plain text.
// Nothing is ever executed; scanning stays regex- and line-based on
// purpose.

pub mod pysrc;
pub mod queryset;
pub mod settings;
pub mod templatetags;

pub use queryset::QuerySetMember;
pub use settings::SettingDoc;
pub use templatetags::{TemplateLibrary, TemplateSymbol};
