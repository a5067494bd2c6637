//! Async driver for one widget instance.
//!
//! A controller task owns its widget and serializes every input through a
//! single `tokio::select!` loop: UI events, host snapshots, sibling
//! notifications, timer expiries and request completions. The widget itself
//! stays synchronous; the [`Command`]s it returns are carried out here.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};

use crate::config::GridConfig;
use crate::grid::{Command, FavoritesGrid, TimerKind};
use crate::interaction::DropdownRef;
use crate::notify::{FavoriteChanged, NotificationBus, Subscription};
use crate::render::GridView;
use crate::service::{CoverAction, ServiceCall, ServiceClient, ServiceError};
use crate::snapshot::HomeState;
use crate::star::{StarView, StarWrapper};

/// Capacity of the input and internal channels.
const CHANNEL_CAPACITY: usize = 64;

/// Controller failures seen by the handle.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The controller task is gone.
    #[error("Widget controller has stopped")]
    Closed,

    /// The controller task panicked or was cancelled.
    #[error("Widget controller task failed: {0}")]
    Join(#[from] JoinError),
}

/// A widget the controller can drive.
pub trait Widget: Send + 'static {
    /// UI events the widget understands.
    type Event: fmt::Debug + Send + 'static;
    /// Published view state.
    type View: Clone + Send + Sync + 'static;

    /// Current view state.
    fn view(&self) -> Self::View;

    /// Takes in a host snapshot.
    fn ingest(&mut self, home: Arc<HomeState>);

    /// Handles one UI event.
    fn handle(&mut self, event: Self::Event) -> Vec<Command>;

    /// Applies a sibling widget's change.
    fn apply_notification(&mut self, change: &FavoriteChanged) -> bool;

    /// Outcome of a request issued through [`Command::Call`].
    fn request_finished(
        &mut self,
        call: &ServiceCall,
        outcome: Result<(), &ServiceError>,
    ) -> Vec<Command>;

    /// A scheduled timer expired.
    fn fire(&mut self, _timer: TimerKind) -> Vec<Command> {
        Vec::new()
    }

    /// Widget attached to the page.
    fn attach(&mut self) {}

    /// Widget detached from the page.
    fn detach(&mut self) {}
}

/// UI events of the favorites grid.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// Remove button clicked.
    Remove(String),
    /// Item body clicked.
    Activate(String),
    /// Drag started on an item.
    DragStart(String),
    /// Dragged over an item.
    DragOver(String),
    /// Drag cancelled.
    DragEnd,
    /// Dropped onto an item.
    Drop(String),
    /// Hvac menu button clicked.
    ToggleHvac(String),
    /// Fan menu button clicked.
    ToggleFan(String),
    /// Click anywhere; carries the dropdown control it landed on.
    DocumentClick(Option<DropdownRef>),
    /// Hvac mode picked.
    SelectHvacMode {
        /// Climate entity.
        entity_id: String,
        /// Picked mode.
        mode: String,
    },
    /// Fan mode picked.
    SelectFanMode {
        /// Climate entity.
        entity_id: String,
        /// Picked fan mode.
        fan_mode: String,
    },
    /// Temperature stepper pressed.
    AdjustTemperature {
        /// Climate entity.
        entity_id: String,
        /// Steps, negative to lower.
        delta: i32,
    },
    /// Cover button pressed.
    Cover {
        /// Cover entity.
        entity_id: String,
        /// Button pressed.
        action: CoverAction,
    },
    /// Pointer down on an item.
    PressStart {
        /// Pressed entity.
        entity_id: String,
        /// Pointer x.
        x: f64,
        /// Pointer y.
        y: f64,
    },
    /// Pointer moved.
    PressMove {
        /// Pointer x.
        x: f64,
        /// Pointer y.
        y: f64,
    },
    /// Pointer released or left the item.
    PressRelease,
    /// Rename input edited.
    RenameInput(String),
    /// Rename saved.
    RenameSave,
    /// Rename reset to the default name.
    RenameReset,
    /// Rename dialog closed.
    RenameCancel,
    /// New grid configuration.
    SetConfig(GridConfig),
}

impl Widget for FavoritesGrid {
    type Event = GridEvent;
    type View = GridView;

    fn view(&self) -> GridView {
        FavoritesGrid::view(self).clone()
    }

    fn ingest(&mut self, home: Arc<HomeState>) {
        FavoritesGrid::ingest(self, home);
    }

    fn handle(&mut self, event: GridEvent) -> Vec<Command> {
        match event {
            GridEvent::Remove(id) => self.begin_remove(&id),
            GridEvent::Activate(id) => self.activate(&id),
            GridEvent::DragStart(id) => {
                self.drag_start(&id);
                Vec::new()
            }
            GridEvent::DragOver(id) => {
                self.drag_over(&id);
                Vec::new()
            }
            GridEvent::DragEnd => {
                self.drag_end();
                Vec::new()
            }
            GridEvent::Drop(id) => self.drop_on(&id),
            GridEvent::ToggleHvac(id) => {
                self.toggle_hvac_dropdown(&id);
                Vec::new()
            }
            GridEvent::ToggleFan(id) => {
                self.toggle_fan_dropdown(&id);
                Vec::new()
            }
            GridEvent::DocumentClick(origin) => {
                self.document_click(origin.as_ref());
                Vec::new()
            }
            GridEvent::SelectHvacMode { entity_id, mode } => self.select_hvac_mode(&entity_id, &mode),
            GridEvent::SelectFanMode {
                entity_id,
                fan_mode,
            } => self.select_fan_mode(&entity_id, &fan_mode),
            GridEvent::AdjustTemperature { entity_id, delta } => {
                self.adjust_temperature(&entity_id, delta)
            }
            GridEvent::Cover { entity_id, action } => self.cover_command(&entity_id, action),
            GridEvent::PressStart { entity_id, x, y } => self.press_start(&entity_id, x, y),
            GridEvent::PressMove { x, y } => {
                self.press_move(x, y);
                Vec::new()
            }
            GridEvent::PressRelease => {
                self.press_release();
                Vec::new()
            }
            GridEvent::RenameInput(text) => {
                self.rename_input(&text);
                Vec::new()
            }
            GridEvent::RenameSave => self.rename_save(),
            GridEvent::RenameReset => self.rename_reset(),
            GridEvent::RenameCancel => {
                self.rename_cancel();
                Vec::new()
            }
            GridEvent::SetConfig(config) => {
                if let Err(e) = self.set_config(config) {
                    tracing::warn!("rejected grid config: {}", e);
                }
                Vec::new()
            }
        }
    }

    fn apply_notification(&mut self, change: &FavoriteChanged) -> bool {
        FavoritesGrid::apply_notification(self, change)
    }

    fn request_finished(
        &mut self,
        call: &ServiceCall,
        outcome: Result<(), &ServiceError>,
    ) -> Vec<Command> {
        FavoritesGrid::request_finished(self, call, outcome)
    }

    fn fire(&mut self, timer: TimerKind) -> Vec<Command> {
        FavoritesGrid::fire(self, timer)
    }

    fn attach(&mut self) {
        FavoritesGrid::attach(self);
    }

    fn detach(&mut self) {
        FavoritesGrid::detach(self);
    }
}

/// UI events of the star wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarEvent {
    /// Star clicked.
    Toggle,
}

impl Widget for StarWrapper {
    type Event = StarEvent;
    type View = StarView;

    fn view(&self) -> StarView {
        StarWrapper::view(self)
    }

    fn ingest(&mut self, home: Arc<HomeState>) {
        StarWrapper::ingest(self, &home);
    }

    fn handle(&mut self, event: StarEvent) -> Vec<Command> {
        match event {
            StarEvent::Toggle => self.toggle(),
        }
    }

    fn apply_notification(&mut self, change: &FavoriteChanged) -> bool {
        StarWrapper::apply_notification(self, change)
    }

    fn request_finished(
        &mut self,
        call: &ServiceCall,
        outcome: Result<(), &ServiceError>,
    ) -> Vec<Command> {
        StarWrapper::request_finished(self, call, outcome)
    }
}

/// Input accepted by a controller.
#[derive(Debug)]
pub enum WidgetInput<E> {
    /// A UI event for the widget.
    Event(E),
    /// Widget attached: subscribe and resynchronize.
    Attach,
    /// Widget detached: cancel timers and unsubscribe.
    Detach,
}

/// Work finished in the background.
#[derive(Debug)]
enum Internal {
    Timer(TimerKind),
    Finished(ServiceCall, Result<(), ServiceError>),
}

/// Pending timer tasks. Aborted on detach.
#[derive(Debug, Default)]
struct TimerSet {
    handles: Vec<JoinHandle<()>>,
}

impl TimerSet {
    fn schedule(&mut self, kind: TimerKind, delay: Duration, tx: mpsc::Sender<Internal>) {
        self.handles.retain(|h| !h.is_finished());
        self.handles.push(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Internal::Timer(kind)).await;
        }));
    }

    fn cancel_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

/// Handle to a running controller.
pub struct WidgetHandle<W: Widget> {
    input: mpsc::Sender<WidgetInput<W::Event>>,
    view: watch::Receiver<W::View>,
    task: JoinHandle<W>,
}

impl<W: Widget> fmt::Debug for WidgetHandle<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetHandle")
            .field("finished", &self.task.is_finished())
            .finish_non_exhaustive()
    }
}

impl<W: Widget> WidgetHandle<W> {
    /// Sends a UI event.
    pub async fn send(&self, event: W::Event) -> Result<(), ControllerError> {
        self.input
            .send(WidgetInput::Event(event))
            .await
            .map_err(|_| ControllerError::Closed)
    }

    /// Attaches the widget.
    pub async fn attach(&self) -> Result<(), ControllerError> {
        self.input
            .send(WidgetInput::Attach)
            .await
            .map_err(|_| ControllerError::Closed)
    }

    /// Detaches the widget.
    pub async fn detach(&self) -> Result<(), ControllerError> {
        self.input
            .send(WidgetInput::Detach)
            .await
            .map_err(|_| ControllerError::Closed)
    }

    /// Latest published view.
    pub fn view(&self) -> W::View {
        self.view.borrow().clone()
    }

    /// Receiver notified on every view change.
    pub fn watch_view(&self) -> watch::Receiver<W::View> {
        self.view.clone()
    }

    /// Stops the controller and returns the widget.
    pub async fn shutdown(self) -> Result<W, ControllerError> {
        drop(self.input);
        Ok(self.task.await?)
    }
}

/// Starts a controller for `widget`, attached.
///
/// `home` carries host snapshots; `bus` is the page's notification channel;
/// requests go through `client`.
pub fn spawn<W: Widget>(
    widget: W,
    home: watch::Receiver<Option<Arc<HomeState>>>,
    bus: NotificationBus,
    client: Arc<dyn ServiceClient>,
) -> WidgetHandle<W> {
    let (input_tx, input_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (view_tx, view_rx) = watch::channel(widget.view());
    let controller = Controller::new(widget, bus, client, view_tx);
    let task = tokio::spawn(controller.run(input_rx, home));
    WidgetHandle {
        input: input_tx,
        view: view_rx,
        task,
    }
}

struct Controller<W: Widget> {
    widget: W,
    bus: NotificationBus,
    subscription: Option<Subscription>,
    client: Arc<dyn ServiceClient>,
    view: watch::Sender<W::View>,
    timers: TimerSet,
    internal_tx: mpsc::Sender<Internal>,
    internal_rx: mpsc::Receiver<Internal>,
}

impl<W: Widget> Controller<W> {
    fn new(
        widget: W,
        bus: NotificationBus,
        client: Arc<dyn ServiceClient>,
        view: watch::Sender<W::View>,
    ) -> Self {
        let (internal_tx, internal_rx) = mpsc::channel(CHANNEL_CAPACITY);
        Self {
            subscription: Some(bus.subscribe()),
            widget,
            bus,
            client,
            view,
            timers: TimerSet::default(),
            internal_tx,
            internal_rx,
        }
    }

    async fn run(
        mut self,
        mut input: mpsc::Receiver<WidgetInput<W::Event>>,
        mut home: watch::Receiver<Option<Arc<HomeState>>>,
    ) -> W {
        let mut home_open = true;
        let initial = home.borrow_and_update().clone();
        if let Some(snapshot) = initial {
            self.widget.ingest(snapshot);
            self.publish_view();
        }

        loop {
            let attached = self.subscription.is_some();
            tokio::select! {
                message = input.recv() => {
                    let Some(message) = message else {
                        tracing::debug!("widget input closed, stopping controller");
                        break;
                    };
                    match message {
                        WidgetInput::Event(event) => {
                            if !attached {
                                tracing::trace!("dropping event while detached: {:?}", event);
                                continue;
                            }
                            let commands = self.widget.handle(event);
                            self.execute(commands);
                        }
                        WidgetInput::Attach => self.attach(&mut home),
                        WidgetInput::Detach => self.detach(),
                    }
                }
                changed = home.changed(), if home_open && attached => {
                    if changed.is_err() {
                        tracing::debug!("snapshot source closed");
                        home_open = false;
                        continue;
                    }
                    let latest = home.borrow_and_update().clone();
                    if let Some(snapshot) = latest {
                        self.widget.ingest(snapshot);
                    }
                }
                change = next_change(&mut self.subscription) => {
                    if let Some(change) = change {
                        self.widget.apply_notification(&change);
                    }
                }
                Some(internal) = self.internal_rx.recv() => {
                    let commands = match internal {
                        Internal::Timer(kind) => self.widget.fire(kind),
                        Internal::Finished(call, result) => {
                            self.widget.request_finished(&call, result.as_ref().map(|_| ()))
                        }
                    };
                    self.execute(commands);
                }
            }
            self.publish_view();
        }

        self.timers.cancel_all();
        self.widget
    }

    fn attach(&mut self, home: &mut watch::Receiver<Option<Arc<HomeState>>>) {
        if self.subscription.is_some() {
            return;
        }
        tracing::debug!("widget attached");
        self.subscription = Some(self.bus.subscribe());
        self.widget.attach();
        let latest = home.borrow_and_update().clone();
        if let Some(snapshot) = latest {
            self.widget.ingest(snapshot);
        }
    }

    fn detach(&mut self) {
        if self.subscription.take().is_none() {
            return;
        }
        tracing::debug!("widget detached");
        self.timers.cancel_all();
        self.widget.detach();
    }

    fn execute(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Notify(change) => {
                    self.bus.publish(change);
                }
                Command::Schedule(timer) => {
                    self.timers
                        .schedule(timer.kind, timer.delay, self.internal_tx.clone());
                }
                Command::Call(call) => self.dispatch(call),
            }
        }
    }

    fn dispatch(&self, call: ServiceCall) {
        tracing::debug!("calling {}", call);
        let request = self.client.call(call.clone());
        let tx = self.internal_tx.clone();
        tokio::spawn(async move {
            let result = request.await;
            let _ = tx.send(Internal::Finished(call, result)).await;
        });
    }

    fn publish_view(&self) {
        self.view.send_replace(self.widget.view());
    }
}

async fn next_change(subscription: &mut Option<Subscription>) -> Option<FavoriteChanged> {
    match subscription {
        Some(subscription) => subscription.recv().await,
        None => std::future::pending().await,
    }
}
