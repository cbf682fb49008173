//! Directive Loader
//!
//! Reads `txtset` declarations from a configuration file:
//!
//! ```text
//! # comment
//! txtset $variableName /path/to/file defaultValue [ttlSeconds];
//! ```
//!
//! Words are separated by whitespace. A word that starts with a single or
//! double quote runs to the matching quote; quotes elsewhere are literal.
//! Each directive ends with `;`.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{ConfigError, ConfigResult};
use crate::registry::Registry;

/// Name of the only supported directive.
pub const TXTSET_DIRECTIVE: &str = "txtset";

// == Directive ==
/// One `;`-terminated statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Line the directive name appears on (1-based)
    pub line: usize,
    pub name: String,
    pub args: Vec<String>,
}

// == Parse ==
/// Splits configuration text into directives.
///
/// Only the statement structure is checked here; directive names and
/// argument counts are checked when loading.
pub fn parse_directives(text: &str) -> ConfigResult<Vec<Directive>> {
    let mut directives = Vec::new();
    let mut words: Vec<String> = Vec::new();
    let mut start_line = 1;
    let mut line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\n' => line += 1,
            c if c.is_whitespace() => {}
            '#' => {
                while chars.next_if(|&next| next != '\n').is_some() {}
            }
            ';' => {
                if words.is_empty() {
                    return Err(ConfigError::Syntax {
                        line,
                        message: "unexpected \";\"".to_string(),
                    });
                }
                let mut args = std::mem::take(&mut words);
                let name = args.remove(0);
                directives.push(Directive {
                    line: start_line,
                    name,
                    args,
                });
            }
            '"' | '\'' => {
                if words.is_empty() {
                    start_line = line;
                }
                let opened_on = line;
                let mut word = String::new();
                let mut closed = false;
                for next in chars.by_ref() {
                    if next == c {
                        closed = true;
                        break;
                    }
                    if next == '\n' {
                        line += 1;
                    }
                    word.push(next);
                }
                if !closed {
                    return Err(ConfigError::Syntax {
                        line: opened_on,
                        message: "unterminated quoted string".to_string(),
                    });
                }
                if let Some(&next) = chars.peek() {
                    if !next.is_whitespace() && next != ';' {
                        return Err(ConfigError::Syntax {
                            line,
                            message: format!("unexpected \"{}\" after quoted string", next),
                        });
                    }
                }
                words.push(word);
            }
            _ => {
                if words.is_empty() {
                    start_line = line;
                }
                let mut word = String::from(c);
                // Quotes inside a word are literal characters
                while let Some(next) = chars.next_if(|&next| !next.is_whitespace() && next != ';') {
                    word.push(next);
                }
                words.push(word);
            }
        }
    }

    if !words.is_empty() {
        return Err(ConfigError::Syntax {
            line: start_line,
            message: "unexpected end of file, expecting \";\"".to_string(),
        });
    }

    Ok(directives)
}

// == Load ==
/// Parses `text` and registers every `txtset` directive.
///
/// Returns the number of directives applied. The first error stops loading.
pub fn load_directives(text: &str, registry: &mut Registry) -> ConfigResult<usize> {
    let directives = parse_directives(text)?;

    for directive in &directives {
        apply(directive, registry)?;
    }

    Ok(directives.len())
}

/// Reads a directive file and registers its variables.
pub fn load_file(path: &Path, registry: &mut Registry) -> ConfigResult<usize> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let count = load_directives(&text, registry)?;
    info!(path = %path.display(), count, "loaded txtset directives");
    Ok(count)
}

fn apply(directive: &Directive, registry: &mut Registry) -> ConfigResult<()> {
    if directive.name != TXTSET_DIRECTIVE {
        return Err(ConfigError::UnknownDirective {
            name: directive.name.clone(),
            line: directive.line,
        });
    }

    let (variable, path, default, ttl) = match directive.args.as_slice() {
        [variable, path, default] => (variable, path, default, None),
        [variable, path, default, ttl] => (variable, path, default, Some(ttl.as_str())),
        args => {
            return Err(ConfigError::InvalidArgumentCount {
                directive: directive.name.clone(),
                line: directive.line,
                count: args.len(),
            })
        }
    };

    registry
        .register(variable, path, default, ttl)
        .map_err(|source| ConfigError::Directive {
            line: directive.line,
            source: Box::new(source),
        })?;

    Ok(())
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn words(directive: &Directive) -> Vec<&str> {
        directive.args.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_parse_single_directive() {
        let directives = parse_directives("txtset $color /etc/color red;").unwrap();

        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].line, 1);
        assert_eq!(directives[0].name, "txtset");
        assert_eq!(words(&directives[0]), vec!["$color", "/etc/color", "red"]);
    }

    #[test]
    fn test_parse_comments_and_lines() {
        let text = "# variables\n\ntxtset $a /a x 30; # trailing\n  txtset $b\n    /b y;\n";
        let directives = parse_directives(text).unwrap();

        assert_eq!(directives.len(), 2);
        assert_eq!(directives[0].line, 3);
        assert_eq!(words(&directives[0]), vec!["$a", "/a", "x", "30"]);
        assert_eq!(directives[1].line, 4);
        assert_eq!(words(&directives[1]), vec!["$b", "/b", "y"]);
    }

    #[test]
    fn test_parse_quoted_words() {
        let directives =
            parse_directives("txtset $a \"/srv/my values/a.txt\" 'semi;colon';").unwrap();

        assert_eq!(
            words(&directives[0]),
            vec!["$a", "/srv/my values/a.txt", "semi;colon"]
        );
    }

    #[test]
    fn test_parse_apostrophe_inside_word() {
        let directives = parse_directives("txtset $a /srv/o'brien/a.txt x;").unwrap();
        assert_eq!(words(&directives[0]), vec!["$a", "/srv/o'brien/a.txt", "x"]);
    }

    #[tokio::test]
    async fn test_parse_quote_inside_word_is_one_argument() {
        let directives = parse_directives("txtset $a /srv/a.txt x\"y\";").unwrap();
        assert_eq!(words(&directives[0]), vec!["$a", "/srv/a.txt", "x\"y\""]);

        let mut registry = Registry::new();
        load_directives("txtset $a /srv/a.txt x\"y\";", &mut registry).unwrap();
        let snapshot = registry.lookup("a").unwrap().snapshot().await;
        assert_eq!(snapshot.ttl_seconds, 10);
    }

    #[test]
    fn test_parse_text_after_closing_quote() {
        let err = parse_directives("txtset $a \"/a\"b x;").unwrap_err();
        assert!(matches!(err, ConfigError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_parse_missing_semicolon() {
        let err = parse_directives("txtset $a /a x;\ntxtset $b /b y").unwrap_err();
        assert!(matches!(err, ConfigError::Syntax { line: 2, .. }));
    }

    #[test]
    fn test_parse_unterminated_quote() {
        let err = parse_directives("txtset $a \"/a x;\n").unwrap_err();
        assert!(matches!(err, ConfigError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_parse_stray_semicolon() {
        let err = parse_directives("txtset $a /a x;;").unwrap_err();
        assert!(matches!(err, ConfigError::Syntax { .. }));
    }

    #[test]
    fn test_load_registers_variables() {
        let mut registry = Registry::new();
        let count = load_directives(
            "txtset $color /etc/color red;\ntxtset $size /etc/size medium 60;",
            &mut registry,
        )
        .unwrap();

        assert_eq!(count, 2);
        assert_eq!(registry.names(), vec!["color", "size"]);
    }

    #[test]
    fn test_load_rejects_unknown_directive() {
        let mut registry = Registry::new();
        let err = load_directives("set $color red;", &mut registry).unwrap_err();

        assert!(matches!(err, ConfigError::UnknownDirective { ref name, line: 1 } if name == "set"));
    }

    #[test]
    fn test_load_rejects_wrong_argument_count() {
        let mut registry = Registry::new();

        let err = load_directives("txtset $color /etc/color;", &mut registry).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidArgumentCount { count: 2, .. }));

        let err = load_directives("txtset $c /c red 10 extra;", &mut registry).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidArgumentCount { count: 5, .. }));
    }

    #[test]
    fn test_load_reports_bad_variable_with_line() {
        let mut registry = Registry::new();
        let err = load_directives("txtset $ok /a x;\n\ntxtset color /b y;", &mut registry)
            .unwrap_err();

        assert_eq!(err.to_string(), "invalid variable name \"color\" on line 3");
    }

    #[test]
    fn test_load_file_missing() {
        let mut registry = Registry::new();
        let err = load_file(Path::new("/nonexistent/txtset.conf"), &mut registry).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
