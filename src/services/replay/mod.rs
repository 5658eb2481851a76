//! Headless gesture replay.
//!
//! Drives a [`DraftEngine`] from a JSON script against an in-memory store and
//! records every emitted command, warning and week change. User lookups run as
//! tokio tasks and are delivered between steps, so a script can discard a
//! draft while its lookup is still in flight.

use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use egui::Pos2;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::models::draft::PendingTicket;
use crate::models::event::{Event, Priority};
use crate::models::grid::GridMeasurements;
use crate::models::settings::EngineSettings;
use crate::models::someday::BucketKind;
use crate::models::week::{WeekDirection, WeekViewState};
use crate::services::draft::{DraftEngine, EngineContext, EngineWarning, Effects, InputEvent};
use crate::services::grid::{GridLayout, RemeasureTarget};
use crate::services::navigation::{NavigationRequest, WeekNavigator};
use crate::services::someday::DropTarget;
use crate::services::store::{EventStore, InMemoryEventStore, StoreCommand};

const LOOKUP_DELAY: Duration = Duration::from_millis(5);

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    /// Defaults to the date of `now`
    pub today: Option<NaiveDate>,
    /// Display-zone wall clock at the first step; the system clock when absent
    pub now: Option<NaiveDateTime>,
    #[serde(default)]
    pub sidebar_open: bool,
    /// Known owner. When absent every new draft waits for a lookup.
    pub user: Option<String>,
    pub measurements: Option<GridMeasurements>,
    #[serde(default)]
    pub events: Vec<Event>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Input {
        input: InputEvent,
        /// Time elapsed since the previous step
        #[serde(default)]
        after_ms: u64,
    },
    StartTimed,
    StartAllDay,
    StartSomeday {
        bucket: BucketKind,
    },
    Edit {
        title: Option<String>,
        description: Option<String>,
        priority: Option<Priority>,
    },
    Submit,
    Discard,
    Delete,
    Navigate {
        request: NavigationRequest,
    },
    Remeasure {
        target: RemeasureTarget,
    },
    ToggleSidebar,
    Migrate {
        id: String,
        direction: WeekDirection,
    },
    Promote {
        id: String,
        target: DropTarget,
        pos: Pos2,
    },
    Reorder {
        bucket: BucketKind,
        source_index: usize,
        dest_index: usize,
        id: String,
    },
    DropIntoBacklog {
        bucket: BucketKind,
    },
}

/// One line of replay output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplayRecord {
    Command {
        step: usize,
        command: StoreCommand,
    },
    Warning {
        step: usize,
        warning: EngineWarning,
        message: String,
    },
    Week {
        step: usize,
        week: WeekViewState,
    },
}

/// Replay `script` and return everything it produced, in order
pub async fn run(settings: EngineSettings, mut script: Script) -> Result<Vec<ReplayRecord>> {
    let steps = std::mem::take(&mut script.steps);
    let mut replayer = Replayer::new(settings, script)?;

    for (index, step) in steps.into_iter().enumerate() {
        replayer.deliver_lookups(index)?;
        let effects = replayer
            .perform(step)
            .with_context(|| format!("Step {} failed", index))?;
        replayer.apply(index, effects)?;
        tokio::task::yield_now().await;
    }
    replayer.settle().await?;

    Ok(replayer.records)
}

/// Everything the engine reads through its context
struct World {
    store: InMemoryEventStore,
    navigator: WeekNavigator,
    layout: GridLayout,
    sidebar_open: bool,
    today: NaiveDate,
    now: NaiveDateTime,
    epoch: Instant,
    elapsed: Duration,
}

impl World {
    fn advance(&mut self, ms: u64) {
        self.elapsed += Duration::from_millis(ms);
        self.now += chrono::Duration::milliseconds(ms as i64);
    }

    fn context(&self) -> EngineContext<'_> {
        EngineContext::new(self.navigator.current(), &self.store, self.now)
            .with_measurements(self.layout.current())
            .with_sidebar(self.sidebar_open)
            .at(self.epoch + self.elapsed)
    }

    fn event(&self, id: &str) -> Result<Event> {
        self.store
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("Unknown event {}", id))
    }
}

struct Replayer {
    engine: DraftEngine,
    world: World,
    records: Vec<ReplayRecord>,
    lookup_user: String,
    lookups_tx: UnboundedSender<(PendingTicket, String)>,
    lookups_rx: UnboundedReceiver<(PendingTicket, String)>,
    last_step: usize,
}

impl Replayer {
    fn new(settings: EngineSettings, script: Script) -> Result<Self> {
        let first_day = settings.first_day_of_week;
        let engine = DraftEngine::new(settings).context("Failed to start the draft engine")?;
        let now = script.now.unwrap_or_else(|| engine.zone().now());
        let today = script.today.unwrap_or(now.date());

        let mut layout = GridLayout::new();
        if let Some(measurements) = script.measurements {
            layout.remeasure(RemeasureTarget::All(measurements))?;
        }

        let engine = match script.user {
            Some(user) => engine.with_user(user),
            None => engine,
        };
        let lookup_user = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "local".to_string());
        let (lookups_tx, lookups_rx) = unbounded_channel();

        Ok(Self {
            engine,
            world: World {
                store: InMemoryEventStore::with_events(script.events),
                navigator: WeekNavigator::new(today, first_day),
                layout,
                sidebar_open: script.sidebar_open,
                today,
                now,
                epoch: Instant::now(),
                elapsed: Duration::ZERO,
            },
            records: Vec::new(),
            lookup_user,
            lookups_tx,
            lookups_rx,
            last_step: 0,
        })
    }

    fn perform(&mut self, step: Step) -> Result<Effects> {
        let effects = match step {
            Step::Input { input, after_ms } => {
                self.world.advance(after_ms);
                let ctx = self.world.context();
                self.engine.handle(input, &ctx)
            }
            Step::StartTimed => self.engine.start_timed_draft(&self.world.context()),
            Step::StartAllDay => self.engine.start_all_day_draft(&self.world.context()),
            Step::StartSomeday { bucket } => {
                self.engine.start_someday_draft(bucket, &self.world.context())
            }
            Step::Edit {
                title,
                description,
                priority,
            } => {
                let applied = self.engine.edit(|draft| {
                    if let Some(title) = title {
                        draft.title = title;
                    }
                    if description.is_some() {
                        draft.description = description;
                    }
                    if let Some(priority) = priority {
                        draft.priority = priority;
                    }
                    Ok(())
                })?;
                if !applied {
                    log::warn!("Edit skipped: no draft is open");
                }
                Effects::none()
            }
            Step::Submit => self.engine.submit(&self.world.context()),
            Step::Discard => self.engine.discard(),
            Step::Delete => self.engine.delete(),
            Step::Navigate { request } => Effects::navigate(request),
            Step::Remeasure { target } => {
                let version = self.world.layout.remeasure(target)?;
                log::debug!("Layout at version {}", version);
                Effects::none()
            }
            Step::ToggleSidebar => {
                self.world.sidebar_open = !self.world.sidebar_open;
                Effects::none()
            }
            Step::Migrate { id, direction } => {
                let event = self.world.event(&id)?;
                self.engine.migrate(&event, direction)
            }
            Step::Promote { id, target, pos } => {
                let event = self.world.event(&id)?;
                self.engine
                    .promote_from_backlog(&event, target, pos, &self.world.context())
            }
            Step::Reorder {
                bucket,
                source_index,
                dest_index,
                id,
            } => self.engine.reorder_backlog(
                bucket,
                source_index,
                dest_index,
                &id,
                &self.world.context(),
            ),
            Step::DropIntoBacklog { bucket } => {
                self.engine.drop_into_backlog(bucket, &self.world.context())
            }
        };
        Ok(effects)
    }

    /// Dispatch commands, record warnings, start lookups and follow navigation
    fn apply(&mut self, step: usize, effects: Effects) -> Result<()> {
        self.last_step = step;

        for command in effects.commands {
            self.world
                .store
                .dispatch(command.clone())
                .with_context(|| format!("Store rejected {} command", command.label()))?;
            self.records.push(ReplayRecord::Command { step, command });
        }

        for warning in effects.warnings {
            log::warn!("{}", warning);
            self.records.push(ReplayRecord::Warning {
                step,
                message: warning.to_string(),
                warning,
            });
        }

        if let Some(ticket) = effects.pending_user {
            self.spawn_lookup(ticket);
        }

        if let Some(request) = effects.navigation {
            self.navigate(step, request)?;
        }
        Ok(())
    }

    fn navigate(&mut self, step: usize, request: NavigationRequest) -> Result<()> {
        let previous = *self.world.navigator.current();
        if !self.world.navigator.apply(request, self.world.today) {
            return Ok(());
        }

        let current = *self.world.navigator.current();
        self.records.push(ReplayRecord::Week {
            step,
            week: current,
        });
        let effects = self
            .engine
            .week_changed(&previous, &current, request.cause());
        self.apply(step, effects)
    }

    fn spawn_lookup(&self, ticket: PendingTicket) {
        let tx = self.lookups_tx.clone();
        let user = self.lookup_user.clone();
        tokio::spawn(async move {
            tokio::time::sleep(LOOKUP_DELAY).await;
            if tx.send((ticket, user)).is_err() {
                log::debug!("Replay finished before lookup {:?} completed", ticket);
            }
        });
    }

    /// Hand finished lookups to the engine without waiting
    fn deliver_lookups(&mut self, step: usize) -> Result<()> {
        while let Ok((ticket, user)) = self.lookups_rx.try_recv() {
            let effects = self.engine.resolve_user(ticket, user);
            self.apply(step, effects)?;
        }
        Ok(())
    }

    /// Wait for the lookup the current draft still depends on
    async fn settle(&mut self) -> Result<()> {
        while self.engine.pending_user().is_some() {
            let Some((ticket, user)) = self.lookups_rx.recv().await else {
                break;
            };
            let effects = self.engine.resolve_user(ticket, user);
            self.apply(self.last_step, effects)?;
        }
        Ok(())
    }
}
