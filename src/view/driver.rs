use tokio::{sync::watch, task::JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::{
    error::FetchError,
    record::RecordId,
    view::{
        controller::ComparisonController,
        fetch::{ComparisonFetcher, FetchCompletion},
        model::ComparisonView,
        signal::NotificationSink,
    },
};

/// Input from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEvent {
    /// A candidate was picked; a blank id clears the selection.
    Select(RecordId),
    Compare,
    Back,
    Close,
    Cancel,
}

/// Runs a [`ComparisonController`] as an event loop.
///
/// User events arrive on a channel, the backend fetch runs as a spawned task,
/// and a fresh [`ComparisonView`] is published after every change. The loop
/// ends on `Close`, `Cancel`, external cancellation or when the event channel
/// closes.
pub struct ViewDriver<F, N> {
    controller: ComparisonController<F, N>,
    events: async_channel::Receiver<UserEvent>,
    views: watch::Sender<ComparisonView>,
    cx: CancellationToken,
}

impl<F, N> ViewDriver<F, N>
where
    F: ComparisonFetcher,
    N: NotificationSink,
{
    pub fn new(
        controller: ComparisonController<F, N>,
        events: async_channel::Receiver<UserEvent>,
    ) -> (Self, watch::Receiver<ComparisonView>) {
        let (views, rx) = watch::channel(controller.view());
        let driver = Self {
            controller,
            events,
            views,
            cx: CancellationToken::new(),
        };
        (driver, rx)
    }

    /// Ties the loop to an external shutdown token.
    pub fn with_cancellation(self, cx: CancellationToken) -> Self {
        Self { cx, ..self }
    }

    /// Drives the view until it is closed and hands the controller back.
    #[tracing::instrument(skip_all, fields(subject = %self.controller.subject_id()))]
    pub async fn run(self) -> ComparisonController<F, N> {
        let Self {
            mut controller,
            events,
            views,
            cx,
        } = self;
        let mut tasks: JoinSet<FetchCompletion> = JoinSet::new();

        loop {
            tokio::select! {
            // A. External Cancellation
            _ = cx.cancelled() => {
                info!("View driver cancelled, closing view");
                controller.close();
                views.send_replace(controller.view());
                break;
            }

            // B. User Input
            event = events.recv() => {
                let Ok(event) = event else {
                    info!("Event channel closed, closing view");
                    controller.close();
                    views.send_replace(controller.view());
                    break;
                };
                let done = matches!(event, UserEvent::Close | UserEvent::Cancel);
                handle(&mut controller, &mut tasks, event);
                views.send_replace(controller.view());
                if done {
                    break;
                }
            }

            // C. Fetch Supervision
            Some(joined) = tasks.join_next() => {
                let completion = match joined {
                    Ok(completion) => completion,
                    Err(e) => {
                        error!(?e, "Comparison fetch task panicked");
                        FetchCompletion {
                            session: controller.session(),
                            outcome: Err(FetchError::Backend(e.to_string())),
                        }
                    }
                };
                match controller.complete_fetch(completion) {
                    Ok(true) => debug!("Comparison applied"),
                    Ok(false) => debug!("Stale comparison discarded"),
                    Err(e) => debug!(error = %e, "Comparison failed"),
                }
                views.send_replace(controller.view());
            }
            }
        }

        tasks.shutdown().await;
        controller
    }
}

/// Applies one event, spawning the fetch when a comparison starts.
fn handle<F, N>(
    controller: &mut ComparisonController<F, N>,
    tasks: &mut JoinSet<FetchCompletion>,
    event: UserEvent,
) where
    F: ComparisonFetcher,
    N: NotificationSink,
{
    debug!(?event, status = %controller.status(), "User event");
    let result = match event {
        UserEvent::Select(id) => controller.select_target(id),
        UserEvent::Compare => match controller.begin_compare() {
            Ok(pending) => {
                tasks.spawn(pending.run());
                Ok(())
            }
            Err(e) => Err(e),
        },
        UserEvent::Back => controller.go_back(),
        UserEvent::Close => {
            controller.close();
            Ok(())
        }
        UserEvent::Cancel => controller.cancel().or_else(|e| {
            debug!(error = %e, "Cancel rejected, closing instead");
            controller.close();
            Ok(())
        }),
    };

    if let Err(e) = result {
        debug!(error = %e, "User event rejected");
    }
}
