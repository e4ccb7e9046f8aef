// src/gui/progress.rs
use std::sync::{Arc, Mutex};
use crate::progress::Progress;

pub struct GuiProgress {
    status: Arc<Mutex<String>>,
    done: usize,
    total: usize,
}

impl GuiProgress {
    pub fn new(status: Arc<Mutex<String>>) -> Self {
        Self { status, done: 0, total: 0 }
    }
    fn set_status(&self, msg: impl Into<String>) {
        if let Ok(mut s) = self.status.lock() {
            *s = msg.into();
        }
    }
}

impl Progress for GuiProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }
    fn log(&mut self, msg: &str) {
        self.set_status(s!(msg));
    }
    fn stage_done(&mut self, stage: &str) {
        self.done += 1;
        logd!("UI: stage {stage} done ({}/{})", self.done, self.total);
    }
    fn finish(&mut self) {
        // the runner's last log line is the summary; keep it on screen
        logd!("UI: refresh finished after {}/{} stage(s)", self.done, self.total);
    }
}
