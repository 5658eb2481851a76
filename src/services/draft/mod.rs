//! Draft lifecycle engine.
//!
//! Owns the single in-progress draft and drives it through
//! `Idle -> Creating -> Dragging | Resizing -> Open -> Idle`. Every handler
//! reads the world through an [`EngineContext`] and returns [`Effects`]; the
//! engine never writes to the event store directly.

mod flip;
mod input;

pub use flip::{resolve_resize, ResizeOutcome};
pub use input::{EngineContext, EngineWarning, Effects, InputEvent, PointerTarget};

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use egui::{Key, Modifiers, Pos2};

use crate::error::{PlannerError, PlannerResult};
use crate::models::draft::{
    Activity, ActivityKind, Boundary, Draft, DragStatus, PendingTicket, ResizeStatus,
};
use crate::models::event::Event;
use crate::models::settings::EngineSettings;
use crate::models::someday::BucketKind;
use crate::models::week::{WeekDirection, WeekViewState};
use crate::services::grid::{GridMapper, GridTime};
use crate::services::navigation::{EdgeNavigator, NavigationCause, NavigationRequest};
use crate::services::normalize::Normalizer;
use crate::services::shortcuts::Shortcut;
use crate::services::someday::{BacklogManager, DropTarget};
use crate::services::store::StoreCommand;
use crate::utils::date::{at_minute, round_up_to_step, DisplayZone};

pub struct DraftEngine {
    settings: EngineSettings,
    zone: DisplayZone,
    activity: Activity,
    /// Owner stamped on new drafts once known
    user: Option<String>,
    pending: Option<PendingTicket>,
    next_ticket: u64,
    edge: EdgeNavigator,
}

impl DraftEngine {
    pub fn new(settings: EngineSettings) -> PlannerResult<Self> {
        settings.validate().map_err(PlannerError::InvalidSettings)?;
        let zone = settings.display_zone()?;
        let edge = EdgeNavigator::new(&settings);

        Ok(Self {
            settings,
            zone,
            activity: Activity::Idle,
            user: None,
            pending: None,
            next_ticket: 1,
            edge,
        })
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn zone(&self) -> DisplayZone {
        self.zone
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.activity.draft()
    }

    pub fn pending_user(&self) -> Option<PendingTicket> {
        self.pending
    }

    pub fn backlog(&self) -> BacklogManager<'_> {
        BacklogManager::new(&self.settings, self.zone)
    }

    /// Route one pointer, keyboard or timer input through the state machine
    pub fn handle(&mut self, input: InputEvent, ctx: &EngineContext<'_>) -> Effects {
        self.transition(|engine, activity| engine.on_input(activity, input, ctx))
    }

    /// New timed draft at the next rounded step, opened in the form
    pub fn start_timed_draft(&mut self, ctx: &EngineContext<'_>) -> Effects {
        self.transition(|engine, activity| match activity {
            Activity::Idle => engine.new_timed(ctx),
            other => (other, Effects::none()),
        })
    }

    pub fn start_all_day_draft(&mut self, ctx: &EngineContext<'_>) -> Effects {
        self.transition(|engine, activity| match activity {
            Activity::Idle => engine.new_all_day(ctx),
            other => (other, Effects::none()),
        })
    }

    /// New backlog draft; refused with a warning when the bucket is full
    pub fn start_someday_draft(&mut self, bucket: BucketKind, ctx: &EngineContext<'_>) -> Effects {
        self.transition(|engine, activity| match activity {
            Activity::Idle => engine.new_someday(bucket, ctx),
            other => (other, Effects::none()),
        })
    }

    /// Deliver the result of a user lookup. Tickets that no longer match the
    /// current draft are dropped.
    pub fn resolve_user(&mut self, ticket: PendingTicket, user: impl Into<String>) -> Effects {
        if self.pending != Some(ticket) {
            log::debug!("Ignoring stale user lookup {:?}", ticket);
            return Effects::none();
        }
        let user = user.into();
        self.pending = None;
        self.user = Some(user.clone());

        self.transition(|_, activity| match activity {
            Activity::Creating {
                mut draft,
                anchor: None,
            } => {
                draft.user = Some(user);
                (Self::open(draft), Effects::none())
            }
            mut other => {
                if let Some(draft) = other.draft_mut() {
                    if draft.is_new() && draft.user.is_none() {
                        draft.user = Some(user);
                    }
                }
                (other, Effects::none())
            }
        })
    }

    /// Apply a form edit to the open draft. The edit is rolled back when it
    /// leaves the draft invalid. Returns `false` when no draft is open.
    pub fn edit<F>(&mut self, f: F) -> PlannerResult<bool>
    where
        F: FnOnce(&mut Draft) -> PlannerResult<()>,
    {
        let Activity::Open { draft } = &mut self.activity else {
            return Ok(false);
        };
        let mut edited = draft.clone();
        f(&mut edited)?;
        edited.validate()?;
        *draft = edited;
        Ok(true)
    }

    pub fn submit(&mut self, ctx: &EngineContext<'_>) -> Effects {
        self.transition(|engine, activity| match activity {
            Activity::Open { draft } => engine.commit(draft, ctx),
            other => (other, Effects::none()),
        })
    }

    /// Drop the draft without persisting it. Safe to call repeatedly.
    pub fn discard(&mut self) -> Effects {
        self.transition(|_, _| (Activity::Idle, Effects::none()))
    }

    pub fn delete(&mut self) -> Effects {
        self.transition(|_, activity| match activity {
            Activity::Open { draft } => Self::delete_open(draft),
            other => (other, Effects::none()),
        })
    }

    /// Release a dragged grid event over a someday bucket
    pub fn drop_into_backlog(&mut self, bucket: BucketKind, ctx: &EngineContext<'_>) -> Effects {
        self.transition(|engine, activity| match activity {
            Activity::Dragging { draft, .. } if !draft.is_new() && !draft.is_someday => {
                engine.demote(draft, bucket, ctx)
            }
            other => (other, Effects::none()),
        })
    }

    /// Drop a backlog item onto the grid
    pub fn promote_from_backlog(
        &mut self,
        event: &Event,
        target: DropTarget,
        pos: Pos2,
        ctx: &EngineContext<'_>,
    ) -> Effects {
        if !self.activity.is_idle() {
            log::debug!("Backlog drop ignored during {:?}", self.activity.kind());
            return Effects::none();
        }

        let manager = self.backlog();
        let mapper = ctx.mapper(&self.settings);
        let mut bucket = event.id.as_deref().and_then(|id| {
            [BucketKind::Week, BucketKind::Month]
                .into_iter()
                .map(|kind| manager.load_bucket(ctx.store, kind, ctx.week))
                .find(|bucket| bucket.contains(id))
        });

        match manager.promote(event, target, pos, &mapper, ctx.week, bucket.as_mut()) {
            Ok(Some(command)) => {
                let mut commands = vec![command];
                if let Some(bucket) = bucket.filter(|b| !b.is_empty()) {
                    commands.push(StoreCommand::Reorder {
                        bucket: bucket.kind(),
                        order: bucket.order_entries(),
                    });
                }
                Effects::commands(commands)
            }
            Ok(None) => Effects::none(),
            Err(err) => Self::refusal(err),
        }
    }

    pub fn reorder_backlog(
        &self,
        bucket: BucketKind,
        source_index: usize,
        dest_index: usize,
        dragged_id: &str,
        ctx: &EngineContext<'_>,
    ) -> Effects {
        let manager = self.backlog();
        let mut snapshot = manager.load_bucket(ctx.store, bucket, ctx.week);
        match manager.reorder(&mut snapshot, source_index, dest_index, dragged_id) {
            Ok(Some(command)) => Effects::commands(vec![command]),
            Ok(None) => Effects::none(),
            Err(err) => Self::refusal(err),
        }
    }

    /// Move an event one week forward or back
    pub fn migrate(&self, event: &Event, direction: WeekDirection) -> Effects {
        match self.backlog().migrate_command(event, direction) {
            Ok(command) => Effects::commands(vec![command]),
            Err(err) => Self::refusal(err),
        }
    }

    /// Tell the engine the displayed week changed. An edge-triggered change
    /// carries a timed drag into the new week; any other change discards the
    /// draft.
    pub fn week_changed(
        &mut self,
        previous: &WeekViewState,
        current: &WeekViewState,
        cause: NavigationCause,
    ) -> Effects {
        let shift = current.start - previous.start;
        if shift == Duration::zero() || self.activity.is_idle() {
            return Effects::none();
        }

        let carries_drag = cause == NavigationCause::EdgeDrag
            && matches!(&self.activity, Activity::Dragging { draft, .. } if !draft.is_date_only());
        if !carries_drag {
            log::info!(
                "Week changed during {:?}; discarding the draft",
                self.activity.kind()
            );
            return self.discard();
        }

        if let Activity::Dragging { draft, .. } = &mut self.activity {
            let (start, end) = (draft.start() + shift, draft.end() + shift);
            match draft.set_range(start, end) {
                Ok(()) => log::debug!("Carried drag into week {}", current.week),
                Err(err) => log::warn!("Could not carry drag into week {}: {}", current.week, err),
            }
        }
        Effects::none()
    }

    /// Swap the activity through `f`, logging the change and emitting the
    /// store notifications for entering and leaving `Idle`.
    fn transition<F>(&mut self, f: F) -> Effects
    where
        F: FnOnce(&mut Self, Activity) -> (Activity, Effects),
    {
        let previous = std::mem::take(&mut self.activity);
        let before = previous.kind();
        let (next, mut effects) = f(self, previous);
        let after = next.kind();

        if before != after {
            log::debug!("Draft activity {:?} -> {:?}", before, after);
            if next.is_idle() {
                self.pending = None;
                effects.commands.push(StoreCommand::DraftDiscard);
            } else if before == ActivityKind::Idle {
                effects.commands.insert(
                    0,
                    StoreCommand::DraftStart {
                        activity: after,
                        event_id: next.draft().and_then(|d| d.id.clone()),
                    },
                );
            }
        }
        if !matches!(next, Activity::Dragging { .. }) {
            self.edge.reset();
        }

        for command in &effects.commands {
            log::debug!("Emitting {} command", command.label());
        }
        self.activity = next;
        effects
    }

    fn on_input(
        &mut self,
        activity: Activity,
        input: InputEvent,
        ctx: &EngineContext<'_>,
    ) -> (Activity, Effects) {
        match (activity, input) {
            (Activity::Idle, InputEvent::PointerDown { pos, target }) => {
                self.pointer_down(pos, target, ctx)
            }
            (
                Activity::Creating {
                    draft,
                    anchor: Some(anchor),
                },
                InputEvent::PointerMove { pos },
            ) => self.creating_move(draft, anchor, pos, ctx),
            (
                Activity::Creating {
                    draft,
                    anchor: Some(_),
                },
                InputEvent::PointerUp { .. },
            ) => (Self::open(draft), Effects::none()),
            (Activity::Dragging { draft, status }, InputEvent::PointerMove { pos }) => {
                self.drag_to(draft, status, pos, ctx)
            }
            (Activity::Dragging { draft, status }, InputEvent::Tick) => {
                self.edge_tick(draft, status, ctx)
            }
            (Activity::Dragging { draft, status }, InputEvent::PointerUp { .. }) => {
                self.release(draft, status.has_moved, ctx)
            }
            (Activity::Resizing { draft, status }, InputEvent::PointerMove { pos }) => {
                self.resize_to(draft, status, pos, ctx)
            }
            (Activity::Resizing { draft, status }, InputEvent::PointerUp { .. }) => {
                self.release(draft, status.has_moved, ctx)
            }
            (activity, InputEvent::Key { key, modifiers }) => {
                self.on_key(activity, key, modifiers, ctx)
            }
            // Idle moves, stray releases and pointer input behind the form
            (activity, _) => (activity, Effects::none()),
        }
    }

    fn on_key(
        &mut self,
        activity: Activity,
        key: Key,
        modifiers: Modifiers,
        ctx: &EngineContext<'_>,
    ) -> (Activity, Effects) {
        let Some(shortcut) = Shortcut::from_key(key, modifiers) else {
            return (activity, Effects::none());
        };

        match (activity, shortcut) {
            (Activity::Idle, Shortcut::NewTimed) => self.new_timed(ctx),
            (Activity::Idle, Shortcut::NewAllDay) => self.new_all_day(ctx),
            (Activity::Idle, Shortcut::NewSomeday(bucket)) => self.new_someday(bucket, ctx),
            (Activity::Idle, Shortcut::Navigate(direction)) => (
                Activity::Idle,
                Effects::navigate(NavigationRequest::Shift {
                    direction,
                    cause: NavigationCause::Keyboard,
                }),
            ),
            (Activity::Idle, Shortcut::Today) => (
                Activity::Idle,
                Effects::navigate(NavigationRequest::Today {
                    cause: NavigationCause::Keyboard,
                }),
            ),
            (Activity::Open { draft }, Shortcut::Submit) => self.commit(draft, ctx),
            (Activity::Open { draft }, Shortcut::Delete) => Self::delete_open(draft),
            (_, Shortcut::Discard) => (Activity::Idle, Effects::none()),
            (activity, shortcut) => {
                log::debug!("Shortcut {:?} ignored during {:?}", shortcut, activity.kind());
                (activity, Effects::none())
            }
        }
    }

    fn pointer_down(
        &mut self,
        pos: Pos2,
        target: PointerTarget,
        ctx: &EngineContext<'_>,
    ) -> (Activity, Effects) {
        let mapper = ctx.mapper(&self.settings);
        if !mapper.is_ready() {
            log::debug!("Pointer down before the grid was measured");
            return (Activity::Idle, Effects::none());
        }

        match target {
            PointerTarget::EmptyGrid => {
                let draft = match mapper.date_time_for_xy(pos.x, pos.y, ctx.week.start) {
                    Some(GridTime::Date(date)) => Draft::all_day(date, date + Duration::days(1)),
                    Some(GridTime::DateTime(start)) => {
                        Draft::timed(start, start + self.settings.default_duration())
                    }
                    None => return (Activity::Idle, Effects::none()),
                };
                self.present(draft, Some(pos))
            }
            PointerTarget::EventBody { event } => {
                let draft = Draft::from_event(&event, &self.zone);
                if draft.is_someday {
                    return (Activity::Idle, Effects::none());
                }
                let grabbed = mapper
                    .date_for_x(pos.x, ctx.week.start)
                    .unwrap_or(draft.start_date());
                let day_offset = (grabbed - draft.start_date()).num_days();
                let offset_y = if draft.is_date_only() {
                    0.0
                } else {
                    mapper.y_for_time(draft.start()).map_or(0.0, |top| pos.y - top)
                };
                let status = DragStatus::new(&draft, pos, offset_y, day_offset);
                (Activity::Dragging { draft, status }, Effects::none())
            }
            PointerTarget::ResizeHandle { event, boundary } => {
                let draft = Draft::from_event(&event, &self.zone);
                if draft.is_someday {
                    return (Activity::Idle, Effects::none());
                }
                (
                    Activity::Resizing {
                        draft,
                        status: ResizeStatus::new(boundary),
                    },
                    Effects::none(),
                )
            }
        }
    }

    fn creating_move(
        &mut self,
        draft: Draft,
        anchor: Pos2,
        pos: Pos2,
        ctx: &EngineContext<'_>,
    ) -> (Activity, Effects) {
        if pos.distance(anchor) <= self.settings.noop_threshold_px {
            return (
                Activity::Creating {
                    draft,
                    anchor: Some(anchor),
                },
                Effects::none(),
            );
        }
        self.resize_to(draft, ResizeStatus::new(Boundary::End), pos, ctx)
    }

    fn drag_to(
        &mut self,
        mut draft: Draft,
        mut status: DragStatus,
        pos: Pos2,
        ctx: &EngineContext<'_>,
    ) -> (Activity, Effects) {
        if !status.has_moved {
            if pos.distance(status.anchor) <= self.settings.noop_threshold_px {
                return (Activity::Dragging { draft, status }, Effects::none());
            }
            status.has_moved = true;
        }

        let mapper = ctx.mapper(&self.settings);
        let mut effects = Effects::none();
        let Some(column) = mapper.date_for_x(pos.x, ctx.week.start) else {
            return (Activity::Dragging { draft, status }, effects);
        };
        let first_day = column - Duration::days(status.day_offset);

        let moved = if draft.is_date_only() {
            let start = first_day.and_time(NaiveTime::MIN);
            draft.set_range(start, start + status.original_duration)
        } else {
            if let Some(direction) = mapper
                .horizontal_bounds()
                .and_then(|bounds| self.edge.observe(pos.x, bounds, ctx.clock))
            {
                effects.navigation = Some(NavigationRequest::Shift {
                    direction,
                    cause: NavigationCause::EdgeDrag,
                });
            }

            match mapper.slot_start_minute(pos.y - status.offset_y) {
                Some(minute) => {
                    let start = at_minute(first_day, minute);
                    draft.set_range(start, start + status.original_duration)
                }
                None => Ok(()),
            }
        };
        if let Err(err) = moved {
            log::warn!("Drag step rejected: {}", err);
        }

        (Activity::Dragging { draft, status }, effects)
    }

    fn edge_tick(
        &mut self,
        draft: Draft,
        status: DragStatus,
        ctx: &EngineContext<'_>,
    ) -> (Activity, Effects) {
        let effects = match self.edge.poll(ctx.clock) {
            Some(direction) if !draft.is_date_only() => {
                Effects::navigate(NavigationRequest::Shift {
                    direction,
                    cause: NavigationCause::EdgeDrag,
                })
            }
            _ => Effects::none(),
        };
        (Activity::Dragging { draft, status }, effects)
    }

    fn resize_to(
        &mut self,
        mut draft: Draft,
        mut status: ResizeStatus,
        pos: Pos2,
        ctx: &EngineContext<'_>,
    ) -> (Activity, Effects) {
        let mapper = ctx.mapper(&self.settings);
        if let Some(outcome) = self.resize_step(&draft, status.controlled, pos, &mapper, ctx.week) {
            match draft.set_range(outcome.start, outcome.end) {
                Ok(()) => {
                    if outcome.flipped {
                        log::debug!("Resize flipped; now controlling {:?}", outcome.controlled);
                    }
                    status.controlled = outcome.controlled;
                    status.has_moved = true;
                    draft.has_flipped = outcome.flipped;
                }
                Err(err) => log::warn!("Resize step rejected: {}", err),
            }
        }
        (Activity::Resizing { draft, status }, Effects::none())
    }

    /// Next range for a resize step; `None` when the pointer adds nothing.
    /// Date-only drafts resize over inclusive days.
    fn resize_step(
        &self,
        draft: &Draft,
        controlled: Boundary,
        pos: Pos2,
        mapper: &GridMapper<'_>,
        week: &WeekViewState,
    ) -> Option<ResizeOutcome<NaiveDateTime>> {
        if draft.is_date_only() {
            let day = mapper.date_for_x(pos.x, week.start)?;
            let (current, fixed) = match controlled {
                Boundary::Start => (draft.start_date(), draft.last_day()),
                Boundary::End => (draft.last_day(), draft.start_date()),
            };
            if day == current {
                return None;
            }
            let days = resolve_resize(controlled, day, fixed);
            return Some(ResizeOutcome {
                controlled: days.controlled,
                start: days.start.and_time(NaiveTime::MIN),
                end: (days.end + Duration::days(1)).and_time(NaiveTime::MIN),
                flipped: days.flipped,
            });
        }

        let candidate = mapper.timed_at(pos.x, pos.y, week.start)?;
        if candidate == draft.boundary(controlled) {
            return None;
        }
        let mut outcome = resolve_resize(controlled, candidate, draft.boundary(controlled.opposite()));
        // Keep timed drafts at least one step long
        if outcome.start == outcome.end {
            let step = Duration::minutes(i64::from(self.settings.time_step_minutes));
            match outcome.controlled {
                Boundary::End => outcome.end += step,
                Boundary::Start => outcome.start -= step,
            }
        }
        Some(outcome)
    }

    fn release(&mut self, draft: Draft, has_moved: bool, ctx: &EngineContext<'_>) -> (Activity, Effects) {
        if !has_moved && !draft.is_new() {
            return (Self::open(draft), Effects::none());
        }
        if has_moved || !draft.is_all_day {
            return self.commit(draft, ctx);
        }
        (Self::open(draft), Effects::none())
    }

    fn commit(&mut self, draft: Draft, ctx: &EngineContext<'_>) -> (Activity, Effects) {
        if let Some(ticket) = self.pending {
            log::debug!("Submit held until user lookup {:?} resolves", ticket);
            return (Self::open(draft), Effects::none());
        }

        match Normalizer::new(self.zone).submit(&draft, ctx.week) {
            Ok(submission) => {
                log::info!(
                    "Submitting {} draft {:?}",
                    if draft.is_new() { "new" } else { "edited" },
                    draft.id
                );
                (Activity::Idle, Effects::commands(submission.into_commands()))
            }
            Err(err) => {
                log::warn!("Draft rejected at submit: {}", err);
                (
                    Self::open(draft),
                    Effects::warning(EngineWarning::Rejected {
                        reason: err.to_string(),
                    }),
                )
            }
        }
    }

    fn delete_open(draft: Draft) -> (Activity, Effects) {
        match draft.id {
            Some(id) => {
                log::info!("Deleting event {}", id);
                (Activity::Idle, Effects::commands(vec![StoreCommand::Delete { id }]))
            }
            None => (Activity::Idle, Effects::none()),
        }
    }

    fn demote(&self, draft: Draft, bucket: BucketKind, ctx: &EngineContext<'_>) -> (Activity, Effects) {
        let manager = self.backlog();
        let mut snapshot = manager.load_bucket(ctx.store, bucket, ctx.week);
        let result = Normalizer::new(self.zone)
            .normalize(&draft)
            .and_then(|event| manager.demote(&event, &mut snapshot, ctx.week));

        match result {
            Ok(command) => (Activity::Idle, Effects::commands(vec![command])),
            Err(err) => (Activity::Idle, Self::refusal(err)),
        }
    }

    fn new_timed(&mut self, ctx: &EngineContext<'_>) -> (Activity, Effects) {
        let rounded = round_up_to_step(ctx.now, self.settings.time_step_minutes);
        let start = if ctx.week.contains(rounded.date()) {
            rounded
        } else {
            ctx.week.start.and_time(rounded.time())
        };
        let draft = Draft::timed(start, start + self.settings.default_duration());
        self.present(draft, None)
    }

    fn new_all_day(&mut self, ctx: &EngineContext<'_>) -> (Activity, Effects) {
        let day = Self::default_day(ctx);
        self.present(Draft::all_day(day, day + Duration::days(1)), None)
    }

    fn new_someday(&mut self, bucket: BucketKind, ctx: &EngineContext<'_>) -> (Activity, Effects) {
        let manager = self.backlog();
        let snapshot = manager.load_bucket(ctx.store, bucket, ctx.week);
        let result = manager.new_draft(&snapshot, ctx.week);
        match result {
            Ok(draft) => self.present(draft, None),
            Err(err) => (Activity::Idle, Self::refusal(err)),
        }
    }

    fn default_day(ctx: &EngineContext<'_>) -> NaiveDate {
        let today = ctx.now.date();
        if ctx.week.contains(today) {
            today
        } else {
            ctx.week.start
        }
    }

    /// Stamp the owner on a fresh draft, or start a lookup when it is unknown.
    /// Keyboard-created drafts open at once unless the lookup is outstanding.
    fn present(&mut self, mut draft: Draft, anchor: Option<Pos2>) -> (Activity, Effects) {
        let mut effects = Effects::none();
        match &self.user {
            Some(user) => draft.user = Some(user.clone()),
            None => {
                let ticket = PendingTicket(self.next_ticket);
                self.next_ticket += 1;
                self.pending = Some(ticket);
                effects.pending_user = Some(ticket);
                log::debug!("Waiting for user lookup {:?}", ticket);
            }
        }

        let activity = match anchor {
            Some(_) => Activity::Creating { draft, anchor },
            None if self.pending.is_some() => Activity::Creating { draft, anchor: None },
            None => Self::open(draft),
        };
        (activity, effects)
    }

    fn open(mut draft: Draft) -> Activity {
        draft.is_open = true;
        draft.has_flipped = false;
        Activity::Open { draft }
    }

    fn refusal(err: PlannerError) -> Effects {
        match err {
            PlannerError::BucketFull { bucket, capacity } => {
                Effects::warning(EngineWarning::BucketFull { bucket, capacity })
            }
            other => {
                log::warn!("Backlog action refused: {}", other);
                Effects::warning(EngineWarning::Rejected {
                    reason: other.to_string(),
                })
            }
        }
    }
}
