//! Redaction of credentials from log output and upstream error text.

use regex::Regex;
use std::fmt;
use std::io::{self, Write};
use std::sync::LazyLock;
use tracing_subscriber::fmt::MakeWriter;

static OPENAI_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"sk-(?:proj-)?[A-Za-z0-9_-]{20,}").expect("valid regex"));
static JWT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"eyJ[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}(?:\.[A-Za-z0-9_-]+)?").expect("valid regex")
});
static BEARER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[A-Za-z0-9_.\-\[\]]+").expect("valid regex"));
static KEY_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"["']?(?:api_key|apikey|service_key|token|secret)["']?\s*([:=])\s*["']?[A-Za-z0-9_.\-]{12,}["']?"#)
        .expect("valid regex")
});
static PASSWORD_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"["']?password["']?\s*[:=]\s*["']?[^"'\s,}]+["']?"#).expect("valid regex")
});

/// Redacts model keys, store service keys and bearer tokens from text.
#[derive(Clone, Copy, Default)]
pub struct SecretScrubber;

impl SecretScrubber {
    /// Scrubber with the built-in credential patterns.
    pub fn new() -> Self {
        Self
    }

    /// Scrub a message of sensitive data
    pub fn scrub_message(&self, message: &str) -> String {
        let scrubbed = BEARER.replace_all(message, "Bearer [TOKEN_REDACTED]");
        let scrubbed = OPENAI_KEY.replace_all(&scrubbed, "[API_KEY_REDACTED]");
        let scrubbed = JWT.replace_all(&scrubbed, "[TOKEN_REDACTED]");
        let scrubbed = KEY_FIELD.replace_all(&scrubbed, |caps: &regex::Captures| {
            let full = &caps[0];
            let sep = &caps[1];
            match full.find(sep) {
                Some(pos) => format!("{}{sep}[REDACTED]", &full[..pos]),
                None => "[REDACTED]".to_string(),
            }
        });
        PASSWORD_FIELD.replace_all(&scrubbed, "password=[REDACTED]").into_owned()
    }
}

impl fmt::Debug for SecretScrubber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretScrubber").finish()
    }
}

/// `MakeWriter` wrapper that scrubs every formatted event before it hits the inner writer.
#[derive(Clone)]
pub struct ScrubbingMakeWriter<M> {
    inner: M,
    scrubber: SecretScrubber,
}

impl<M> ScrubbingMakeWriter<M> {
    /// Wrap `inner` so everything it writes is scrubbed.
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            scrubber: SecretScrubber::new(),
        }
    }
}

impl<'a, M> MakeWriter<'a> for ScrubbingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = ScrubbingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        ScrubbingWriter {
            inner: self.inner.make_writer(),
            scrubber: self.scrubber,
        }
    }
}

/// Writer produced by [`ScrubbingMakeWriter`].
pub struct ScrubbingWriter<W> {
    inner: W,
    scrubber: SecretScrubber,
}

impl<W: Write> Write for ScrubbingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        self.inner.write_all(self.scrubber.scrub_message(&text).as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
