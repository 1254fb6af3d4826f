use crate::events::{SlideChanged, SlideshowControl};
use crate::viewer::HeroSlideshow;
use anyhow::Result;
use std::time::Duration;
use tokio::select;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Rotates the hero slideshow every `interval` until cancelled.
///
/// Manual navigation restarts the interval so a slide picked by the user
/// stays up for a full period.
pub async fn run(
    len: usize,
    interval: Duration,
    mut control_rx: Receiver<SlideshowControl>,
    to_renderer: Sender<SlideChanged>,
    cancel: CancellationToken,
) -> Result<()> {
    let Some(mut hero) = HeroSlideshow::new(len) else {
        info!("empty gallery; autoplay not started");
        return Ok(());
    };

    let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        select! {
            _ = cancel.cancelled() => {
                info!("cancel received; exiting autoplay task");
                break;
            }

            _ = ticker.tick() => {
                if let Some(index) = hero.tick() {
                    debug!(index, "autoplay advance");
                    if to_renderer.send(SlideChanged(index)).await.is_err() {
                        break;
                    }
                }
            }

            ctrl = control_rx.recv() => {
                let Some(ctrl) = ctrl else {
                    debug!("control channel closed; exiting autoplay task");
                    break;
                };
                debug!(?ctrl, "slideshow control");
                let moved = match ctrl {
                    SlideshowControl::Pause => {
                        hero.pause();
                        None
                    }
                    SlideshowControl::Resume => {
                        hero.resume();
                        ticker.reset();
                        None
                    }
                    SlideshowControl::Goto(i) => Some(hero.set(i as isize)),
                    SlideshowControl::Step(d) => Some(hero.step(d)),
                };
                if let Some(index) = moved {
                    ticker.reset();
                    if to_renderer.send(SlideChanged(index)).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
    Ok(())
}
