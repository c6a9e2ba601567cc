//! `$token` interpolation
//!
//! A token is `$` followed by `[a-zA-Z0-9_]+`. Integer tokens (`$0`, `$1`, ...)
//! index into the positional arguments, anything else names an environment
//! variable. Tokens are replaced left to right in a single pass.

use regex::{Captures, Regex};
use std::fmt::Display;
use std::sync::LazyLock;

use crate::environment::{Environment, ProcessEnv};
use crate::error::{Category, InterpolateError};
use crate::session::Session;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([a-zA-Z0-9_]+)").expect("token pattern is valid"));

/// One `$identifier` occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Index(usize),
    Name(&'a str),
}

impl<'a> Token<'a> {
    pub fn parse(ident: &'a str) -> Self {
        match ident.parse::<usize>() {
            Ok(index) => Token::Index(index),
            Err(_) => Token::Name(ident),
        }
    }
}

/// All tokens of `template` in order of appearance
pub fn tokens(template: &str) -> Vec<Token<'_>> {
    TOKEN
        .captures_iter(template)
        .filter_map(|caps| caps.get(1))
        .map(|m| Token::parse(m.as_str()))
        .collect()
}

fn substitute<F>(template: &str, mut resolve: F) -> String
where
    F: FnMut(&str) -> String,
{
    TOKEN
        .replace_all(template, |caps: &Captures<'_>| resolve(&caps[1]))
        .into_owned()
}

/// Interpolate against the process environment, never fails.
///
/// Unknown names become empty. An index past the end of `args` is looked up
/// as a variable name instead.
pub fn env_str(template: &str, args: &[&dyn Display]) -> String {
    env_str_with(&ProcessEnv, template, args)
}

/// [`env_str`] against any [`Environment`]
pub fn env_str_with(env: &dyn Environment, template: &str, args: &[&dyn Display]) -> String {
    substitute(template, |ident| match Token::parse(ident) {
        Token::Index(i) if i < args.len() => args[i].to_string(),
        _ => env.var(ident).unwrap_or_default(),
    })
}

impl Session {
    /// Interpolate `template`, reporting unresolved tokens to this session.
    ///
    /// Failed tokens are replaced by the empty string and the rest of the
    /// template is still substituted. Only the first failure of a call is
    /// recorded, as `EnvStr:ArgIndex` or `EnvStr:EnvName`.
    pub fn env_str(&self, template: &str, args: &[&dyn Display]) -> String {
        let env = self.environment();
        let mut first: Option<InterpolateError> = None;

        let result = substitute(template, |ident| match Token::parse(ident) {
            Token::Index(index) => match args.get(index) {
                Some(arg) => arg.to_string(),
                None => {
                    first.get_or_insert_with(|| InterpolateError::ArgIndex {
                        index,
                        template: template.to_string(),
                    });
                    String::new()
                }
            },
            Token::Name(name) => {
                let value = env.var(name).unwrap_or_default();
                if value.is_empty() {
                    first.get_or_insert_with(|| InterpolateError::EnvName {
                        name: name.to_string(),
                        template: template.to_string(),
                    });
                }
                value
            }
        });

        if let Some(err) = first {
            self.set_error(Category::EnvStr.fail(err.action(), err));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::MapEnv;
    use crate::output::MemorySink;
    use crate::policy::OnError;
    use std::fmt;

    struct HasStringer;

    impl fmt::Display for HasStringer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("has-stringer")
        }
    }

    fn quiet_session(env: MapEnv) -> Session {
        let session = Session::new();
        session.on_error(OnError::Ignore).with_env(env);
        session
    }

    #[test]
    fn test_no_tokens_is_identity() {
        assert_eq!(env_str("no change", &[]), "no change");
        assert_eq!(env_str("", &[]), "");
        assert_eq!(env_str("costs 5$ or $", &[]), "costs 5$ or $");
    }

    #[test]
    fn test_env_names() {
        let env = MapEnv::new()
            .with_var("lower", "value0")
            .with_var("UPPER", "value1")
            .with_var("Mixed", "value2")
            .with_var("aZ_09", "value3");

        let actual = env_str_with(&env, "before $lower$UPPER ($Mixed) $aZ_09 after", &[]);

        assert_eq!(actual, "before value0value1 (value2) value3 after");
    }

    #[test]
    fn test_indexed_arguments() {
        let actual = env_str("$0, $1$2[$3]", &[&10, &"any", &true, &HasStringer]);
        assert_eq!(actual, "10, anytrue[has-stringer]");
    }

    #[test]
    fn test_identifier_stops_at_punctuation() {
        let env = MapEnv::new().with_var("open_file_start", "any");
        let actual = env_str_with(&env, "$open_file_start-$0.txt", &[&"filename"]);
        assert_eq!(actual, "any-filename.txt");
    }

    #[test]
    fn test_unchecked_index_past_end_reads_env() {
        let env = MapEnv::new().with_var("5", "five");
        assert_eq!(env_str_with(&env, "[$5]", &[&1]), "[five]");
        assert_eq!(env_str_with(&env, "[$6]", &[&1]), "[]");
    }

    #[test]
    fn test_tokens_in_order() {
        assert_eq!(
            tokens("$HOME/$0/$name_1 $"),
            vec![Token::Name("HOME"), Token::Index(0), Token::Name("name_1")]
        );
    }

    #[test]
    fn test_checked_missing_argument() {
        let session = quiet_session(MapEnv::new());

        let actual = session.env_str("causes error $0 $1", &[&1]);

        assert_eq!(actual, "causes error 1 ");
        let err = session.err().unwrap();
        assert!(err.is(Category::EnvStr, "ArgIndex"));
        assert!(err.to_string().contains("EnvStr:ArgIndex"));
        assert!(err.to_string().contains("'$1'"));
        assert!(err.to_string().contains("'causes error $0 $1'"));
    }

    #[test]
    fn test_checked_missing_env() {
        let session = quiet_session(MapEnv::new());

        let actual = session.env_str("causes error $no_such_env_var", &[]);

        assert_eq!(actual, "causes error ");
        let message = session.error_string();
        assert!(message.contains("EnvStr:EnvName"));
        assert!(message.contains("'$no_such_env_var'"));
    }

    #[test]
    fn test_checked_empty_env_value_is_missing() {
        let session = quiet_session(MapEnv::new().with_var("blank", ""));

        assert_eq!(session.env_str("[$blank]", &[]), "[]");
        assert!(session.err().unwrap().is(Category::EnvStr, "EnvName"));
    }

    #[test]
    fn test_checked_reports_first_failure_and_keeps_going() {
        let session = quiet_session(MapEnv::new().with_var("known", "ok"));

        let actual = session.env_str("$3 $missing $known $0", &[&"zero"]);

        assert_eq!(actual, "  ok zero");
        let err = session.err().unwrap();
        assert!(err.is(Category::EnvStr, "ArgIndex"));
        assert!(err.to_string().contains("'$3'"));
    }

    #[test]
    fn test_checked_success_leaves_session_clean() {
        let session = quiet_session(MapEnv::new().with_var("some_env", "some value"));

        assert_eq!(session.env_str("$some_env $0", &[&99]), "some value 99");
        assert!(!session.is_error());
    }

    #[test]
    fn test_println_interpolates() {
        let out = MemorySink::new();
        let session = quiet_session(MapEnv::new().with_var("some_value", "the value"));
        session.set_output(out.clone());

        session.println("any text $some_value here ($0)", &[&42]);

        assert_eq!(out.contents(), "any text the value here (42)\n");
    }
}
