/// Events emitted by the analysis workflows while they run.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    StageStart { name: &'static str },
    StageFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards [`Progress`] events to an optional callback; silent by default.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Runs `f` between a `StageStart` and a `StageFinish` event.
    pub fn stage<T>(&self, name: &'static str, f: impl FnOnce() -> T) -> T {
        self.report(Progress::StageStart { name });
        let result = f();
        self.report(Progress::StageFinish);
        result
    }
}
