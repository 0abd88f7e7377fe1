use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use snapback::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Renders design progress on stderr: a spinner per phase and a bar for the stem search.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    #[cfg(test)]
    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::new(0).with_style(Self::spinner_style());
        pb.set_draw_target(target);
        pb.finish_and_clear();
        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb) = pb.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    pb.reset();
                    pb.set_length(0);
                    pb.set_style(Self::spinner_style());
                    pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb.set_message(name);
                }
                Progress::PhaseFinish => {
                    pb.disable_steady_tick();
                    pb.finish_with_message("✓ Done");
                }
                Progress::SearchStart { max_steps } => {
                    pb.disable_steady_tick();
                    pb.reset();
                    pb.set_length(max_steps);
                    pb.set_style(Self::bar_style());
                    pb.set_message("Growing stem");
                }
                Progress::StemGrown {
                    start,
                    end,
                    wild_tm,
                } => {
                    pb.inc(1);
                    pb.set_message(format!("{start}..={end} {wild_tm:.2} °C"));
                }
                Progress::SearchFinish => {
                    pb.finish();
                }
                Progress::Message(msg) => {
                    if pb.is_finished() {
                        pb.set_message(msg);
                    } else {
                        pb.println(format!("  {}", msg));
                    }
                }
            }
        })
    }

    /// A plain bar counting finished rows of a batch.
    pub fn row_bar(&self, rows: u64) -> ProgressBar {
        let bar = ProgressBar::new(rows).with_style(Self::bar_style());
        if let Ok(pb) = self.pb.lock() {
            if pb.is_hidden() {
                bar.set_draw_target(ProgressDrawTarget::hidden());
            }
        }
        bar.set_message("Designing");
        bar
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .expect("Failed to create spinner style template")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<24} [{bar:40.cyan/blue}] {pos}/{len}")
            .expect("Failed to create bar style template")
            .progress_chars("##-")
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
    fn handler_initializes_in_a_clean_state() {
        let handler = CliProgressHandler::hidden();
        let pb = handler.pb.lock().unwrap();
        assert_eq!(pb.length(), Some(0));
        assert!(pb.is_finished());
    }

    #[test]
    fn callback_tracks_phases_and_stem_growth() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: "Stem growth",
        });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.message(), "Stem growth");
            assert!(!pb.is_finished());
        }

        callback(Progress::SearchStart { max_steps: 20 });
        callback(Progress::StemGrown {
            start: 95,
            end: 104,
            wild_tm: 21.5,
        });
        callback(Progress::StemGrown {
            start: 95,
            end: 105,
            wild_tm: 25.25,
        });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.length(), Some(20));
            assert_eq!(pb.position(), 2);
            assert_eq!(pb.message(), "95..=105 25.25 °C");
        }

        callback(Progress::SearchFinish);
        callback(Progress::Message("Stem 95..=105 (11 bp) reached 25.25 °C".to_string()));
        assert_eq!(
            handler.pb.lock().unwrap().message(),
            "Stem 95..=105 (11 bp) reached 25.25 °C"
        );
        callback(Progress::PhaseFinish);
        let pb = handler.pb.lock().unwrap();
        assert!(pb.is_finished());
        assert_eq!(pb.message(), "✓ Done");
    }

    #[test]
    fn callback_is_thread_safe() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart {
                name: "Orientation",
            });
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        let pb = handler.pb.lock().unwrap();
        assert!(pb.is_finished());
    }

    #[test]
    fn row_bar_counts_rows() {
        let handler = CliProgressHandler::hidden();
        let bar = handler.row_bar(3);
        bar.inc(2);
        assert_eq!(bar.length(), Some(3));
        assert_eq!(bar.position(), 2);
    }
}
