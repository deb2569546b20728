//! Colour roles for cleanup output.
//!
//! One role list feeds three renderers: `colored` strings for plain lines,
//! prettytable style specs for the tables and clap styles for help text.
//!
//! ```
//! use scenesweep::core::styles::StyleRole;
//! assert_eq!(StyleRole::Clean.paint("ok", false), "ok");
//! assert_eq!(StyleRole::Value.paint("3", true), "3");
//! ```

use clap::builder::styling::AnsiColor;
use colored::{Color, Colorize};

macro_rules! style {
    ( $( $variant:ident => $color:expr ),+ $(,)? ) => {
        #[derive(Copy, Clone, Debug)]
        pub enum StyleRole { $( $variant ),+ }

        impl StyleRole {
            pub fn color(self) -> Option<Color> {
                match self { $( StyleRole::$variant => $color ),+ }
            }

            /// Colour `text` for this role when `enabled`; `colored`'s global
            /// override still applies on top
            pub fn paint(self, text: &str, enabled: bool) -> String {
                match self.color() {
                    Some(color) if enabled => text.color(color).to_string(),
                    _ => text.to_string(),
                }
            }

            /// Convert StyleRole to prettytable style_spec format
            pub fn to_prettytable_spec(self) -> Option<String> {
                let spec_char = match self.color()? {
                    Color::Red => "r",
                    Color::Green => "g",
                    Color::Yellow => "y",
                    Color::Blue => "b",
                    Color::Cyan => "c",
                    Color::BrightBlack => "K",
                    Color::BrightRed => "R",
                    Color::BrightGreen => "G",
                    _ => return None,
                };

                Some(format!("F{}", spec_char))
            }
        }
    }
}

// Value => None (uncoloured)
style! {
    Header   => Some(Color::Yellow),
    Literal  => Some(Color::Cyan),
    Clean    => Some(Color::Green),
    Dirty    => Some(Color::Red),
    Error    => Some(Color::BrightRed),
    Category => Some(Color::BrightGreen),
    Value    => None,
    Dim      => Some(Color::BrightBlack)
}

fn color_to_ansi(c: Color) -> Option<AnsiColor> {
    use self::AnsiColor as A;
    use Color::*;
    Some(match c {
        Red => A::Red,
        Green => A::Green,
        Yellow => A::Yellow,
        Cyan => A::Cyan,
        BrightBlack => A::BrightBlack,
        BrightRed => A::BrightRed,
        BrightGreen => A::BrightGreen,
        _ => return None,
    })
}

/// Build clap Styles for help output from the style roles.
pub fn palette_to_clap(enabled: bool) -> clap::builder::Styles {
    use clap::builder::styling::{Color as ClapColor, Style};
    if !enabled {
        return clap::builder::Styles::plain();
    }

    let style = |role: StyleRole, bold: bool| {
        let mut s = Style::new();
        if let Some(col) = role.color().and_then(color_to_ansi) {
            s = s.fg_color(Some(ClapColor::Ansi(col)));
        }
        if bold {
            s = s.bold();
        }
        s
    };

    clap::builder::Styles::styled()
        .header(style(StyleRole::Header, true))
        .literal(style(StyleRole::Literal, false))
        .placeholder(style(StyleRole::Category, false))
        .valid(style(StyleRole::Clean, false))
        .invalid(style(StyleRole::Dirty, false))
        .error(style(StyleRole::Error, false))
}
