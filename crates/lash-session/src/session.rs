//! Session
//!
//! A cheap, cloneable handle over one error slot, the reaction policy, the two
//! output sinks and the environment source. Clones share the same state.

use parking_lot::Mutex;
use serde::Serialize;
use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::io::{self, Write};
use std::sync::Arc;

use crate::environment::{Environment, ProcessEnv};
use crate::error::{Category, SessionError};
use crate::output::{sink, write_line, Sink};
use crate::policy::OnError;
use crate::Result;

#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<State>,
    out: Sink,
    err_out: Sink,
}

struct State {
    /// Last recorded error, last write wins
    error: Option<SessionError>,
    on_error: OnError,
    env: Arc<dyn Environment>,
}

impl Session {
    /// A clean session that terminates the process on the first error
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    error: None,
                    on_error: OnError::Terminate,
                    env: Arc::new(ProcessEnv),
                }),
                out: sink(io::stdout()),
                err_out: sink(io::stderr()),
            }),
        }
    }

    /// Replace the reaction policy. An already recorded error is not re-reported.
    pub fn on_error(&self, policy: OnError) -> &Self {
        self.inner.state.lock().on_error = policy;
        self
    }

    pub fn with_env<E: Environment + 'static>(&self, env: E) -> &Self {
        self.inner.state.lock().env = Arc::new(env);
        self
    }

    pub fn environment(&self) -> Arc<dyn Environment> {
        Arc::clone(&self.inner.state.lock().env)
    }

    /// Destination for [`println`](Self::println), defaults to stdout
    pub fn set_output<W: Write + Send + 'static>(&self, writer: W) -> &Self {
        *self.inner.out.lock() = Box::new(writer);
        self
    }

    /// Destination for Terminate/Warn diagnostics, defaults to stderr
    pub fn set_err_output<W: Write + Send + 'static>(&self, writer: W) -> &Self {
        *self.inner.err_out.lock() = Box::new(writer);
        self
    }

    /// Record an error and run the policy.
    ///
    /// `None` is a no-op: nothing is stored and the policy is not invoked.
    pub fn set_error<E: Into<Option<SessionError>>>(&self, err: E) {
        let Some(err) = err.into() else {
            return;
        };

        tracing::debug!(
            category = %err.category(),
            action = err.action(),
            "Recorded session error"
        );

        // The policy may exit the process, so release the state lock first
        let policy = {
            let mut state = self.inner.state.lock();
            state.error = Some(err.clone());
            state.on_error.clone()
        };

        self.react(&policy, &err);
    }

    fn react(&self, policy: &OnError, err: &SessionError) {
        match policy {
            OnError::Terminate => {
                tracing::error!(error = %err, "Terminating on session error");
                write_line(&self.inner.err_out, &err.to_string());
                std::process::exit(1);
            }
            OnError::Warn => {
                tracing::warn!(error = %err, "Continuing after session error");
                write_line(&self.inner.err_out, &err.to_string());
            }
            OnError::Ignore => {}
            OnError::Custom(hook) => hook(err),
        }
    }

    /// The current error, if any
    pub fn err(&self) -> Option<SessionError> {
        self.inner.state.lock().error.clone()
    }

    pub fn is_error(&self) -> bool {
        self.inner.state.lock().error.is_some()
    }

    /// Rendered current error, empty when clean
    pub fn error_string(&self) -> String {
        self.err().map(|e| e.to_string()).unwrap_or_default()
    }

    pub fn clear_error(&self) {
        self.inner.state.lock().error = None;
    }

    /// The current error as a `Result`, for handing back to `?` code
    pub fn result(&self) -> Result<()> {
        match self.err() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Unwrap a `Result`, recording the error under `category:action`
    pub fn check<T, E>(
        &self,
        category: Category,
        action: &'static str,
        result: std::result::Result<T, E>,
    ) -> Option<T>
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.set_error(category.fail(action, e));
                None
            }
        }
    }

    /// Serialize `value` as JSON
    pub fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> Option<Vec<u8>> {
        self.check(Category::Session, "AsJSON", serde_json::to_vec(value))
    }

    /// Interpolate `template` and write it as a line to the output sink.
    ///
    /// Prints nothing once the session holds an error.
    pub fn println(&self, template: &str, args: &[&dyn Display]) {
        if self.is_error() {
            return;
        }
        let line = self.env_str(template, args);
        write_line(&self.inner.out, &line);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Session")
            .field("error", &state.error)
            .field("on_error", &state.on_error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::MapEnv;
    use crate::output::MemorySink;
    use serde::Deserialize;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_session() -> (Session, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let session = Session::new();
        session.on_error(OnError::custom(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));
        (session, calls)
    }

    #[test]
    fn test_new_session_is_clean() {
        let session = Session::new();
        assert!(!session.is_error());
        assert!(session.err().is_none());
        assert_eq!(session.error_string(), "");
        assert!(session.result().is_ok());
    }

    #[test]
    fn test_set_error_none_is_noop() {
        let (session, calls) = counting_session();

        session.set_error(None::<SessionError>);

        assert!(!session.is_error());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_set_error_stores_and_reacts() {
        let (session, calls) = counting_session();

        session.set_error(Category::File.fail("Delete", "gone"));

        assert!(session.is_error());
        assert_eq!(session.error_string(), "File:Delete:gone");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_last_write_wins() {
        let session = Session::new();
        session.on_error(OnError::Ignore);

        session.set_error(Category::Env.fail("Require", "first"));
        session.set_error(Category::Arg.fail("Require", "second"));

        assert!(session.err().unwrap().is(Category::Arg, "Require"));
    }

    #[test]
    fn test_clear_error_resets_state() {
        let (session, calls) = counting_session();
        session.set_error(Category::File.fail("Mkdir", "denied"));

        session.clear_error();

        assert!(!session.is_error());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(session.to_json(&"still works").is_some());
        assert!(!session.is_error());
    }

    #[test]
    fn test_on_error_does_not_replay() {
        let session = Session::new();
        session.on_error(OnError::Ignore);
        session.set_error(Category::File.fail("Close", "bad fd"));

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        session.on_error(OnError::custom(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(session.is_error());
    }

    #[test]
    fn test_warn_writes_to_error_output() {
        let errors = MemorySink::new();
        let session = Session::new();
        session.on_error(OnError::Warn).set_err_output(errors.clone());

        session.set_error(Category::Env.fail("Require", "missing 'X': needed"));

        assert_eq!(errors.contents(), "Env:Require:missing 'X': needed\n");
        assert!(session.is_error());
    }

    #[test]
    fn test_println_writes_interpolated_line() {
        let out = MemorySink::new();
        let session = Session::new();
        session
            .on_error(OnError::Ignore)
            .with_env(MapEnv::new().with_var("OUT", "/tmp/out"))
            .set_output(out.clone());

        session.println("writing to $OUT ($0)", &[&3]);

        assert_eq!(out.contents(), "writing to /tmp/out (3)\n");
        assert!(!session.is_error());
    }

    #[test]
    fn test_println_keeps_first_error() {
        let out = MemorySink::new();
        let errors = MemorySink::new();
        let session = Session::new();
        session
            .on_error(OnError::Warn)
            .with_env(MapEnv::new())
            .set_output(out.clone())
            .set_err_output(errors.clone());
        session.set_error(Category::Env.fail("Require", "missing 'OUT': output dir"));

        session.println("writing to $OUT", &[]);

        assert!(session.err().unwrap().is(Category::Env, "Require"));
        assert_eq!(errors.contents(), "Env:Require:missing 'OUT': output dir\n");
        assert_eq!(out.contents(), "");
    }

    const TERMINATE_CHILD: &str = "LASH_TERMINATE_CHILD";

    #[test]
    fn test_terminate_prints_record_and_exits() {
        if std::env::var_os(TERMINATE_CHILD).is_some() {
            let session = Session::new();
            session.set_error(Category::Env.fail("Require", "missing 'OUT': output dir"));
            unreachable!("terminate policy returned");
        }

        let output = std::process::Command::new(std::env::current_exe().unwrap())
            .args([
                "--exact",
                "session::tests::test_terminate_prints_record_and_exits",
                "--nocapture",
            ])
            .env(TERMINATE_CHILD, "1")
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert_eq!(
            stderr.lines().last(),
            Some("Env:Require:missing 'OUT': output dir")
        );
        assert!(stderr.ends_with('\n'));
    }

    #[test]
    fn test_clones_share_the_error_slot() {
        let session = Session::new();
        session.on_error(OnError::Ignore);
        let other = session.clone();

        other.set_error(Category::File.fail("Copy", "nope"));

        assert!(session.is_error());
    }

    #[test]
    fn test_check_converts_results() {
        let session = Session::new();
        session.on_error(OnError::Ignore);

        let ok: std::result::Result<i32, io::Error> = Ok(3);
        assert_eq!(session.check(Category::File, "String", ok), Some(3));
        assert!(!session.is_error());

        let failed: std::result::Result<i32, io::Error> =
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(session.check(Category::File, "String", failed), None);
        assert_eq!(session.error_string(), "File:String:denied");
        assert!(session.result().is_err());
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Nested {
        flag: bool,
        label: String,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        text: String,
        number: f64,
        nested: Nested,
    }

    #[test]
    fn test_to_json_round_trip() {
        let session = Session::new();
        let value = Payload {
            text: "some text".to_string(),
            number: 12.34,
            nested: Nested {
                flag: true,
                label: "inner".to_string(),
            },
        };

        let buf = session.to_json(&value).unwrap();
        assert!(!session.is_error());

        let back: Payload = serde_json::from_slice(&buf).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_to_json_field_order() {
        #[derive(Serialize)]
        #[serde(rename_all = "PascalCase")]
        struct Val {
            text: String,
            number: f32,
        }

        let session = Session::new();
        let buf = session
            .to_json(&Val {
                text: "some text".to_string(),
                number: 12.34,
            })
            .unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            r#"{"Text":"some text","Number":12.34}"#
        );
    }

    #[test]
    fn test_to_json_failure_is_recorded() {
        use std::collections::HashMap;

        let session = Session::new();
        session.on_error(OnError::Ignore);

        // Non-string map keys cannot be JSON object keys
        let mut bad = HashMap::new();
        bad.insert(vec![1u8], 1);

        assert!(session.to_json(&bad).is_none());
        assert!(session.err().unwrap().is(Category::Session, "AsJSON"));
    }
}
