//! Output sinks receive the text produced by `print`.

use std::cell::RefCell;
use std::rc::Rc;

pub trait OutputSink {
    fn write_line(&mut self, text: &str);
}

/// Prints each line to stdout.
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_line(&mut self, text: &str) {
        println!("{}", text);
    }
}

/// Collects lines in memory. Clones share the same buffer, so a caller can
/// keep one handle and give the other to a runtime.
#[derive(Clone, Default)]
pub struct BufferedSink {
    lines: Rc<RefCell<Vec<String>>>,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub fn take(&self) -> Vec<String> {
        self.lines.borrow_mut().drain(..).collect()
    }
}

impl OutputSink for BufferedSink {
    fn write_line(&mut self, text: &str) {
        self.lines.borrow_mut().push(text.to_string());
    }
}
