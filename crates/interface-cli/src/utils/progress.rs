use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use openinterface::engine::progress::{Progress, ProgressCallback};
use std::time::Duration;

const SPINNER_TICK_MS: u64 = 80;

/// Draws workflow stages as a spinner on stderr, switching to a bar while a stage reports
/// counted steps.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: ProgressBar,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// A handler that never draws, for `--quiet` runs.
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target).with_style(Self::spinner_style());
        Self { bar }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let bar = self.bar.clone();
        Box::new(move |progress: Progress| match progress {
            Progress::StageStart { name } => {
                bar.reset();
                bar.set_length(0);
                bar.set_style(Self::spinner_style());
                bar.set_message(name);
                bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
            }
            Progress::StageFinish => {
                bar.disable_steady_tick();
                let stage = bar.message();
                bar.finish_with_message(format!("✓ {}", stage));
            }
            Progress::TaskStart { total_steps } => {
                bar.disable_steady_tick();
                bar.set_style(Self::bar_style());
                bar.set_length(total_steps);
                bar.set_position(0);
            }
            Progress::TaskIncrement => bar.inc(1),
            Progress::TaskFinish => {
                if let Some(length) = bar.length() {
                    bar.set_position(length);
                }
            }
            Progress::Message(text) => bar.println(format!("  {}", text)),
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<24} [{bar:32.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn stage_finish_marks_the_stage_done() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        callback(Progress::StageStart {
            name: "Complex SASA",
        });
        assert_eq!(handler.bar.message(), "Complex SASA");
        assert!(!handler.bar.is_finished());

        callback(Progress::StageFinish);
        assert!(handler.bar.is_finished());
        assert_eq!(handler.bar.message(), "✓ Complex SASA");
    }

    #[test]
    fn counted_steps_fill_the_bar() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        callback(Progress::StageStart {
            name: "Van der Waals check",
        });
        callback(Progress::TaskStart { total_steps: 10 });
        callback(Progress::TaskIncrement);
        assert_eq!(handler.bar.length(), Some(10));
        assert_eq!(handler.bar.position(), 1);

        callback(Progress::Message("ignored while hidden".into()));
        callback(Progress::TaskFinish);
        assert_eq!(handler.bar.position(), 10);
    }

    #[test]
    fn callback_can_run_on_another_thread() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::StageStart {
                name: "Interface distances",
            });
            callback(Progress::StageFinish);
        })
        .join()
        .unwrap();

        assert_eq!(handler.bar.message(), "✓ Interface distances");
    }
}
