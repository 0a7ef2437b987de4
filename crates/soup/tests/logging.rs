//! Query tracing

use std::io::Write;
use std::sync::{Arc, Mutex};

use soup::{Filter, Soup};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        let bytes = self.0.lock().expect("log buffer").clone();
        String::from_utf8(bytes).expect("utf-8 log output")
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn capture(run: impl FnOnce()) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, run);
    captured.text()
}

#[test]
fn test_find_logs_compiled_query() {
    let soup = Soup::new("<a>1</a><a>2</a>");
    let logs = capture(|| {
        soup.find(&Filter::tag("a")).expect("find");
    });
    assert!(logs.contains("into `(//a)[position() <= 1]`"), "{logs}");
}

#[test]
fn test_find_all_logs_compiled_query() {
    let soup = Soup::new("<a>1</a><a>2</a>");
    let logs = capture(|| {
        soup.find_all(&Filter::tag("a")).expect("find_all");
    });
    assert!(logs.contains("into `//a`"), "{logs}");
    assert!(logs.contains("produced 2 results"), "{logs}");
}
