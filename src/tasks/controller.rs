use anyhow::Result;
use tokio::select;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::config::Configuration;
use crate::events::{PointerEvent, SlideChanged, Tick};
use crate::slideshow::{InitOutcome, Slideshow};
use crate::stage::Stage;
use crate::tasks::auto_advance::AutoAdvance;

/// Drive one slideshow until `cancel` fires or the host's event stream ends.
///
/// Pointer events and timer ticks are handled one at a time on this task, so
/// a direction chosen by a click is always seen by the next tick. Returns the
/// stage so the host can inspect or reuse it.
#[instrument(skip_all, fields(container = %cfg.container_id))]
pub async fn run<S>(
    mut stage: S,
    cfg: Configuration,
    mut events: Receiver<PointerEvent>,
    changed: Option<Sender<SlideChanged>>,
    cancel: CancellationToken,
) -> Result<S>
where
    S: Stage + Send,
    S::Handle: Send,
{
    let mut show = match Slideshow::init(&mut stage, &cfg) {
        InitOutcome::Ready(show) => show,
        // Already logged; the page keeps working without a slideshow.
        InitOutcome::Failed(_) => return Ok(stage),
    };

    let (tick_tx, mut tick_rx) = mpsc::channel::<Tick>(1);
    let timer = AutoAdvance::start(cfg.auto_advance, tick_tx, &cancel);

    loop {
        let change = select! {
            _ = cancel.cancelled() => {
                info!("cancel received; stopping slideshow");
                break;
            }

            maybe_ev = events.recv() => match maybe_ev {
                Some(ev) => match stage.route(&ev) {
                    Some(action) => show.handle(&mut stage, action),
                    None => None,
                },
                None => {
                    debug!("pointer event stream closed");
                    break;
                }
            },

            Some(Tick) = tick_rx.recv() => Some(show.on_tick(&mut stage)),
        };

        if let Some(change) = change {
            info!(
                from = change.from,
                to = change.to,
                cause = ?change.cause,
                "slide shown"
            );
            // observers never hold up the event loop
            if let Some(tx) = &changed {
                match tx.try_send(change) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => {
                        warn!(to = change.to, "slide change listener lagging; dropping notification");
                    }
                    Err(TrySendError::Closed(_)) => warn!("slide change listener closed"),
                }
            }
        }
    }

    timer.stop().await;
    Ok(stage)
}
